mod agent_commands;
mod agent_definitions;
mod bootstrap_helpers;
mod process_cleanup;
mod project_context;
mod project_scaffold;
mod session_handoff;
mod startup_dispatch;

use std::process::ExitCode;

use clap::Parser;
use console::style;
use vela_cli::Cli;
use vela_startup::StartupError;

pub(crate) use crate::agent_commands::LocalCommandActions;
pub(crate) use crate::agent_definitions::{
    load_agent_definitions, AgentSchemaValidator, LocalAgentLoader,
};
pub(crate) use crate::bootstrap_helpers::init_tracing;
pub(crate) use crate::process_cleanup::{register_session_process, PidFileCleanup};
pub(crate) use crate::project_context::FileSystemProjectContext;
pub(crate) use crate::project_scaffold::scaffold_project;
pub(crate) use crate::session_handoff::SummarySessionLauncher;
use crate::startup_dispatch::run_cli;

fn report_fatal(error: &anyhow::Error) {
    let reason_code = error
        .downcast_ref::<StartupError>()
        .map(StartupError::reason_code)
        .unwrap_or("startup_failed");
    tracing::error!(reason_code, error = %format!("{error:#}"), "startup failed");
    eprintln!("{} {error:#}", style("error:").red().bold());
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.trace);
    match run_cli(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_fatal(&error);
            let code = error
                .downcast_ref::<StartupError>()
                .map(StartupError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
