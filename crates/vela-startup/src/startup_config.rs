use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vela_ai::ModelVersion;
use vela_cli::Cli;
use vela_provider::ValidationPolicy;

#[derive(Debug, Clone)]
/// Public struct `StartupConfig` used across Vela components.
pub struct StartupConfig {
    pub google_api_base: String,
    pub request_timeout_ms: u64,
    pub min_model_version: ModelVersion,
    pub preferred_model: Option<String>,
    pub agents_dir: PathBuf,
    pub state_dir: PathBuf,
    pub agent_library: PathBuf,
    pub credential_prompt_enabled: bool,
    pub validation_policy: ValidationPolicy,
}

impl StartupConfig {
    /// Builds the config; prompting also requires an interactive stdin.
    pub fn from_cli(cli: &Cli, stdin_interactive: bool) -> Result<Self> {
        let min_model_version = cli
            .min_model_version
            .parse::<ModelVersion>()
            .context("invalid --min-model-version")?;
        Ok(Self {
            google_api_base: cli.google_api_base.clone(),
            request_timeout_ms: cli.request_timeout_ms,
            min_model_version,
            preferred_model: cli
                .model
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            agents_dir: cli.agents_dir.clone(),
            state_dir: cli.state_dir.clone(),
            agent_library: cli.agent_library.clone(),
            credential_prompt_enabled: stdin_interactive && !cli.no_credential_prompt,
            validation_policy: ValidationPolicy::default(),
        })
    }
}

/// Resolves `path` against `root` unless it is already absolute.
pub fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
