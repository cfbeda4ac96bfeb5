use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;
use vela_ai::{GoogleModelsClient, GoogleModelsConfig};
use vela_cli::{Cli, InvocationSpec};
use vela_provider::{
    stdin_is_interactive, CredentialStore, TerminalCredentialPrompt, TerminalModelChooser,
};
use vela_startup::{execute_startup, CredentialFlow, StartupCollaborators, StartupConfig};

use crate::{
    AgentSchemaValidator, FileSystemProjectContext, LocalAgentLoader, LocalCommandActions,
    PidFileCleanup, SummarySessionLauncher,
};

pub(crate) fn build_startup_collaborators(config: &StartupConfig) -> Result<StartupCollaborators> {
    let client = GoogleModelsClient::new(GoogleModelsConfig {
        api_base: config.google_api_base.clone(),
        request_timeout_ms: config.request_timeout_ms,
    })
    .context("failed to build model catalog client")?;

    Ok(StartupCollaborators {
        credentials: CredentialFlow {
            store: CredentialStore::from_env(config.credential_prompt_enabled),
            validator: Arc::new(client),
            prompt: Arc::new(TerminalCredentialPrompt),
            chooser: Arc::new(TerminalModelChooser),
        },
        project_context: Arc::new(FileSystemProjectContext::default()),
        process_cleanup: Arc::new(PidFileCleanup::default()),
        agent_loader: Arc::new(LocalAgentLoader),
        agent_validator: Arc::new(AgentSchemaValidator),
        launcher: Arc::new(SummarySessionLauncher::new(config.state_dir.clone())),
        commands: Arc::new(LocalCommandActions),
    })
}

pub(crate) async fn run_cli(cli: Cli) -> Result<()> {
    let config = StartupConfig::from_cli(&cli, stdin_is_interactive())?;
    let collaborators = build_startup_collaborators(&config)?;
    let invocation = InvocationSpec::from_cli(&cli);
    let outcome = execute_startup(&invocation, &config, &collaborators).await?;
    debug!(?outcome, "startup finished");
    Ok(())
}
