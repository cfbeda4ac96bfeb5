use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::json;
use vela_ai::{GoogleModelsClient, GoogleModelsConfig, ModelVersion};
use vela_cli::{InvocationOptions, InvocationSpec};
use vela_provider::{
    CredentialPrompt, CredentialSource, CredentialStore, ModelChooser, ModelDescriptor,
    ValidationPolicy,
};
use vela_startup::{
    execute_startup, AgentDefinitionLoader, AgentDefinitionValidator, AgentDefinitions,
    AgentLoadRequest, CleanupReport, CommandContext, CredentialFlow, ProjectContext,
    ProjectContextInitializer, SessionLaunch, SessionLauncher, StaleProcessCleanup,
    StartupCollaborators, StartupCommandActions, StartupConfig, StartupError, StartupOutcome,
};

struct NoPrompt;

#[async_trait]
impl CredentialPrompt for NoPrompt {
    async fn read_api_key(&self, _attempt: u8, _budget: u8) -> Result<String> {
        bail!("prompt must not be shown")
    }
}

/// Records the options it was offered and picks the last one.
#[derive(Default)]
struct LastChooser {
    offered: Mutex<Vec<String>>,
}

#[async_trait]
impl ModelChooser for LastChooser {
    async fn choose(&self, options: &[ModelDescriptor]) -> Result<usize> {
        let mut offered = self.offered.lock().expect("offered lock");
        offered.extend(options.iter().map(|option| option.identifier.clone()));
        Ok(options.len().saturating_sub(1))
    }
}

#[derive(Default)]
struct CapturingRuntime {
    launches: Mutex<Vec<SessionLaunch>>,
}

#[async_trait]
impl ProjectContextInitializer for CapturingRuntime {
    async fn initialize(&self, project_root: &Path) -> Result<ProjectContext> {
        Ok(ProjectContext {
            root: project_root.to_path_buf(),
            files: vec!["README.md".to_string()],
            truncated: false,
        })
    }
}

#[async_trait]
impl StaleProcessCleanup for CapturingRuntime {
    async fn cleanup(&self, _state_dir: &Path) -> Result<CleanupReport> {
        Ok(CleanupReport::default())
    }
}

#[async_trait]
impl AgentDefinitionLoader for CapturingRuntime {
    async fn load(&self, _request: &AgentLoadRequest) -> Result<AgentDefinitions> {
        Ok(AgentDefinitions::new())
    }
}

impl AgentDefinitionValidator for CapturingRuntime {
    fn validate(&self, _definitions: &AgentDefinitions) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl SessionLauncher for CapturingRuntime {
    async fn launch(&self, launch: SessionLaunch) -> Result<()> {
        self.launches.lock().expect("launch lock").push(launch);
        Ok(())
    }
}

#[async_trait]
impl StartupCommandActions for CapturingRuntime {
    async fn scaffold_project(
        &self,
        _context: &CommandContext,
        _template: &str,
        _dir: &Path,
        _name: &str,
    ) -> Result<()> {
        bail!("scaffold not expected")
    }

    async fn publish_agents(&self, _context: &CommandContext, _names: &[String]) -> Result<()> {
        bail!("publish not expected")
    }

    async fn init_agents(&self, _context: &CommandContext) -> Result<()> {
        bail!("init-agents not expected")
    }

    async fn save_agents(&self, _context: &CommandContext, _ids: &[String]) -> Result<()> {
        bail!("save-agent not expected")
    }
}

fn config(server: &MockServer) -> StartupConfig {
    StartupConfig {
        google_api_base: server.base_url(),
        request_timeout_ms: 5_000,
        min_model_version: ModelVersion::new(2, 5),
        preferred_model: None,
        agents_dir: PathBuf::from(".agents"),
        state_dir: PathBuf::from(".vela"),
        agent_library: PathBuf::from(".vela/agent-library"),
        credential_prompt_enabled: false,
        validation_policy: ValidationPolicy {
            attempts_per_candidate: 3,
            retry_delay: Duration::from_millis(5),
        },
    }
}

fn collaborators(
    server: &MockServer,
    env: &'static [(&'static str, &'static str)],
    chooser: Arc<LastChooser>,
    runtime: Arc<CapturingRuntime>,
) -> StartupCollaborators {
    let client = GoogleModelsClient::new(GoogleModelsConfig {
        api_base: server.base_url(),
        request_timeout_ms: 5_000,
    })
    .expect("client");
    let store = CredentialStore::from_lookup(
        |name| {
            env.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        },
        false,
    );
    StartupCollaborators {
        credentials: CredentialFlow {
            store,
            validator: Arc::new(client),
            prompt: Arc::new(NoPrompt),
            chooser,
        },
        project_context: runtime.clone(),
        process_cleanup: runtime.clone(),
        agent_loader: runtime.clone(),
        agent_validator: runtime.clone(),
        launcher: runtime.clone(),
        commands: runtime,
    }
}

fn session_invocation(prompt: &str) -> InvocationSpec {
    InvocationSpec::new(vec![prompt.to_string()], InvocationOptions::default())
}

#[tokio::test]
async fn integration_rejected_primary_key_falls_through_to_secondary() {
    let server = MockServer::start();
    let rejected = server.mock(|when, then| {
        when.method(GET)
            .path("/models")
            .header("x-goog-api-key", "revoked-key");
        then.status(403)
            .json_body(json!({"error": {"message": "permission denied"}}));
    });
    let accepted = server.mock(|when, then| {
        when.method(GET)
            .path("/models")
            .header("x-goog-api-key", "working-key");
        then.status(200).json_body(json!({
            "models": [
                {"name": "models/gemini-2.0-flash", "displayName": "Gemini 2.0 Flash"},
                {"name": "models/gemini-2.5-flash", "displayName": "Gemini 2.5 Flash"},
                {"name": "models/gemini-2.5-pro", "displayName": "Gemini 2.5 Pro"}
            ]
        }));
    });

    static ENV: [(&str, &str); 2] = [
        ("GEMINI_API_KEY", "revoked-key"),
        ("GOOGLE_API_KEY", "working-key"),
    ];
    let chooser = Arc::new(LastChooser::default());
    let runtime = Arc::new(CapturingRuntime::default());
    let outcome = execute_startup(
        &session_invocation("summarize the repo"),
        &config(&server),
        &collaborators(&server, &ENV, chooser.clone(), runtime.clone()),
    )
    .await
    .expect("startup should succeed");

    assert_eq!(outcome, StartupOutcome::SessionCompleted);
    rejected.assert_calls(1);
    accepted.assert_calls(1);
    assert_eq!(
        *chooser.offered.lock().expect("offered"),
        vec![
            "models/gemini-2.5-flash".to_string(),
            "models/gemini-2.5-pro".to_string()
        ]
    );

    let launches = runtime.launches.lock().expect("launches");
    assert_eq!(launches.len(), 1);
    let launch = &launches[0];
    assert_eq!(launch.auth.model.identifier, "models/gemini-2.5-pro");
    assert_eq!(
        launch.auth.credential.source(),
        &CredentialSource::Environment {
            variable: "GOOGLE_API_KEY".to_string()
        }
    );
    assert_eq!(
        launch.params.initial_input.as_deref(),
        Some("summarize the repo")
    );
    assert!(launch.readiness.is_fully_ready());
}

#[tokio::test]
async fn integration_persistent_server_errors_exhaust_retry_budget() {
    let server = MockServer::start();
    let unavailable = server.mock(|when, then| {
        when.method(GET).path("/models");
        then.status(503).body("backend unavailable");
    });

    static ENV: [(&str, &str); 1] = [("GEMINI_API_KEY", "flaky-key")];
    let runtime = Arc::new(CapturingRuntime::default());
    let error = execute_startup(
        &session_invocation("hello"),
        &config(&server),
        &collaborators(
            &server,
            &ENV,
            Arc::new(LastChooser::default()),
            runtime.clone(),
        ),
    )
    .await
    .expect_err("startup should fail");

    assert!(matches!(error, StartupError::Credential(_)));
    assert_eq!(error.reason_code(), "invalid_credential");
    unavailable.assert_calls(3);
    assert!(runtime.launches.lock().expect("launches").is_empty());
}
