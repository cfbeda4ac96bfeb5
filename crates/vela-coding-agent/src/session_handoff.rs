//! Session entry point reached once startup has a credential, a model, and a
//! settled readiness report. The interactive loop itself lives outside this
//! binary; the launcher registers the process and reports what it was given.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use console::style;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use vela_startup::{resolve_under, CostMode, GitMode, SessionLaunch, SessionLauncher};

use crate::register_session_process;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SessionSummary {
    pub model: String,
    pub model_version: String,
    pub credential_source: &'static str,
    pub cost_mode: CostMode,
    pub git_mode: Option<GitMode>,
    pub print: bool,
    pub init: bool,
    pub working_directory: String,
    pub agent_id: Option<String>,
    pub agent_params: Option<Value>,
    pub initial_input: Option<String>,
    pub project_files: Option<usize>,
    pub stale_records_removed: Option<usize>,
    pub agents: Vec<String>,
    pub degraded: Vec<&'static str>,
}

impl SessionSummary {
    pub(crate) fn from_launch(launch: &SessionLaunch) -> Self {
        let params = &launch.params;
        let readiness = &launch.readiness;
        Self {
            model: launch.auth.model.identifier.clone(),
            model_version: launch.auth.model.version.to_string(),
            credential_source: launch.auth.credential.source().kind(),
            cost_mode: params.cost_mode,
            git_mode: params.git_mode,
            print: params.print,
            init: params.init,
            working_directory: params.working_directory.display().to_string(),
            agent_id: params.agent_id.clone(),
            agent_params: params.agent_params.clone(),
            initial_input: params.initial_input.clone(),
            project_files: readiness.project_context().map(|context| context.files.len()),
            stale_records_removed: readiness.cleanup_report().map(|report| report.removed),
            agents: readiness
                .agent_definitions()
                .map(|definitions| definitions.keys().cloned().collect())
                .unwrap_or_default(),
            degraded: readiness
                .degraded()
                .into_iter()
                .map(|kind| kind.as_str())
                .collect(),
        }
    }

    fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "{} {} ({})",
                style("model").bold(),
                self.model,
                self.model_version
            ),
            format!("{} {}", style("mode").bold(), self.cost_mode.as_str()),
            format!("{} {}", style("cwd").bold(), self.working_directory),
        ];
        if let Some(files) = self.project_files {
            lines.push(format!("{} {files} file(s) indexed", style("context").bold()));
        }
        if !self.agents.is_empty() {
            lines.push(format!("{} {}", style("agents").bold(), self.agents.join(", ")));
        }
        if let Some(agent) = &self.agent_id {
            lines.push(format!("{} {agent}", style("agent").bold()));
        }
        if let Some(input) = &self.initial_input {
            lines.push(format!("{} {input}", style("input").bold()));
        }
        if !self.degraded.is_empty() {
            lines.push(format!(
                "{} {}",
                style("degraded").yellow().bold(),
                self.degraded.join(", ")
            ));
        }
        lines
    }
}

#[derive(Debug, Clone)]
/// Public struct `SummarySessionLauncher` used across Vela components.
pub(crate) struct SummarySessionLauncher {
    state_dir: PathBuf,
}

impl SummarySessionLauncher {
    pub(crate) fn new(state_dir: PathBuf) -> Self {
        Self { state_dir }
    }
}

#[async_trait]
impl SessionLauncher for SummarySessionLauncher {
    async fn launch(&self, launch: SessionLaunch) -> Result<()> {
        let state_dir = resolve_under(&launch.params.working_directory, &self.state_dir);
        let _guard = register_session_process(&state_dir)?;
        let summary = SessionSummary::from_launch(&launch);
        info!(
            model = %summary.model,
            cost_mode = summary.cost_mode.as_str(),
            degraded = summary.degraded.len(),
            "session started"
        );
        if summary.print {
            let line =
                serde_json::to_string(&summary).context("failed to encode session summary")?;
            println!("{line}");
        } else {
            for line in summary.render_lines() {
                println!("{line}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;
    use vela_ai::ModelVersion;
    use vela_provider::{Credential, CredentialSource, ModelDescriptor};
    use vela_startup::{
        AuthenticatedModel, CleanupReport, CostMode, ProjectContext, ReadinessOutcome,
        ReadinessReport, ReadinessTaskKind, ReadinessValue, SessionLaunch, SessionParams,
    };

    use super::SessionSummary;

    fn launch(readiness: ReadinessReport) -> SessionLaunch {
        SessionLaunch {
            params: SessionParams {
                cost_mode: CostMode::Max,
                git_mode: None,
                print: true,
                working_directory: PathBuf::from("/work"),
                trace: false,
                init: false,
                agent_id: Some("reviewer".to_string()),
                agent_params: Some(json!({"depth": 2})),
                initial_input: Some("fix the tests".to_string()),
            },
            auth: AuthenticatedModel {
                credential: Credential::new(CredentialSource::InteractivePrompt { attempt: 1 }, "k"),
                model: ModelDescriptor {
                    identifier: "models/gemini-2.5-pro".to_string(),
                    display_label: "Gemini 2.5 Pro".to_string(),
                    version: ModelVersion::new(2, 5),
                },
            },
            readiness,
        }
    }

    #[test]
    fn unit_session_summary_reflects_readiness_and_degradation() {
        let readiness = ReadinessReport {
            outcomes: vec![
                ReadinessOutcome {
                    kind: ReadinessTaskKind::FileContext,
                    result: Ok(ReadinessValue::FileContext(ProjectContext {
                        root: PathBuf::from("/work"),
                        files: vec!["a.rs".to_string(), "b.rs".to_string()],
                        truncated: false,
                    })),
                },
                ReadinessOutcome {
                    kind: ReadinessTaskKind::ProcessCleanup,
                    result: Ok(ReadinessValue::ProcessCleanup(CleanupReport {
                        inspected: 3,
                        removed: 1,
                    })),
                },
                ReadinessOutcome {
                    kind: ReadinessTaskKind::AgentDefinitions,
                    result: Err("invalid agent definitions".to_string()),
                },
            ],
        };
        let summary = SessionSummary::from_launch(&launch(readiness));
        assert_eq!(summary.model, "models/gemini-2.5-pro");
        assert_eq!(summary.model_version, "2.5");
        assert_eq!(summary.credential_source, "interactive-prompt");
        assert_eq!(summary.project_files, Some(2));
        assert_eq!(summary.stale_records_removed, Some(1));
        assert!(summary.agents.is_empty());
        assert_eq!(summary.degraded, vec![ReadinessTaskKind::AgentDefinitions.as_str()]);
    }

    #[test]
    fn unit_session_summary_serializes_cost_mode_in_snake_case() {
        let summary = SessionSummary::from_launch(&launch(ReadinessReport::default()));
        let encoded = serde_json::to_value(&summary).expect("encode");
        assert_eq!(encoded["cost_mode"], "max");
        assert_eq!(encoded["agent_params"]["depth"], 2);
        assert_eq!(encoded["project_files"], serde_json::Value::Null);
    }
}
