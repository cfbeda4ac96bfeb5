//! Startup pipeline from a parsed invocation to the session handoff.
//!
//! Order: route (pure, reports input errors first), start readiness for
//! session routes, acquire the validated credential and model, then either run
//! a non-session command handler or await readiness and launch the session.
//! Nothing here terminates the process; callers map `StartupError` to an exit.

use std::path::PathBuf;

use tracing::{info, warn};
use vela_cli::InvocationSpec;
use vela_provider::{acquire_validated_credential, select_model};

use crate::{
    resolve_under, route, AgentLoadRequest, AuthenticatedModel, CommandContext, ReadinessHandle,
    ReadinessOrchestrator, ReadinessTask, ReadinessTaskKind, ReadinessValue, Route,
    SessionLaunch, SessionParams, StartupCollaborators, StartupConfig, StartupError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `StartupOutcome` values.
pub enum StartupOutcome {
    CommandCompleted { command: &'static str },
    SessionCompleted,
}

/// Runs one invocation through routing, authentication, and dispatch.
pub async fn execute_startup(
    invocation: &InvocationSpec,
    config: &StartupConfig,
    collaborators: &StartupCollaborators,
) -> Result<StartupOutcome, StartupError> {
    let route = route(invocation)?;
    info!(route = route.name(), "invocation routed");

    if let Route::DeprecatedFlag { flag, guidance } = route {
        return Err(StartupError::DeprecatedUsage { flag, guidance });
    }

    let readiness = match &route {
        Route::Session(params) => Some(start_readiness(params, config, collaborators)),
        _ => None,
    };

    let auth = authenticate(config, collaborators).await?;

    let root = match &route {
        Route::Session(params) => params.working_directory.clone(),
        _ => invocation
            .options
            .cwd
            .clone()
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let command_context = |auth: AuthenticatedModel| CommandContext {
        agents_dir: resolve_under(&root, &config.agents_dir),
        state_dir: resolve_under(&root, &config.state_dir),
        agent_library: resolve_under(&root, &config.agent_library),
        root: root.clone(),
        auth,
    };
    let commands = &collaborators.commands;

    match route {
        Route::Scaffold {
            template,
            dir,
            name,
        } => {
            let context = command_context(auth);
            let target = resolve_under(&context.root, &dir);
            commands
                .scaffold_project(&context, &template, &target, &name)
                .await
                .map_err(|source| StartupError::Command {
                    command: "scaffold",
                    source,
                })?;
            Ok(StartupOutcome::CommandCompleted {
                command: "scaffold",
            })
        }
        Route::Publish { agent_names } => {
            commands
                .publish_agents(&command_context(auth), &agent_names)
                .await
                .map_err(|source| StartupError::Command {
                    command: "publish",
                    source,
                })?;
            Ok(StartupOutcome::CommandCompleted { command: "publish" })
        }
        Route::InitAgents => {
            commands
                .init_agents(&command_context(auth))
                .await
                .map_err(|source| StartupError::Command {
                    command: "init-agents",
                    source,
                })?;
            Ok(StartupOutcome::CommandCompleted {
                command: "init-agents",
            })
        }
        Route::SaveAgent { agent_ids } => {
            commands
                .save_agents(&command_context(auth), &agent_ids)
                .await
                .map_err(|source| StartupError::Command {
                    command: "save-agent",
                    source,
                })?;
            Ok(StartupOutcome::CommandCompleted {
                command: "save-agent",
            })
        }
        Route::Session(params) => {
            let readiness = match readiness {
                Some(handle) => handle.wait().await,
                None => Default::default(),
            };
            collaborators
                .launcher
                .launch(SessionLaunch {
                    params,
                    auth,
                    readiness,
                })
                .await
                .map_err(StartupError::Launch)?;
            Ok(StartupOutcome::SessionCompleted)
        }
        Route::DeprecatedFlag { flag, guidance } => {
            Err(StartupError::DeprecatedUsage { flag, guidance })
        }
    }
}

/// Validates a credential and resolves the session model.
pub async fn authenticate(
    config: &StartupConfig,
    collaborators: &StartupCollaborators,
) -> Result<AuthenticatedModel, StartupError> {
    let flow = &collaborators.credentials;
    let candidates = flow.store.candidates();
    info!(
        candidates = candidates.len(),
        environment = flow.store.environment_count(),
        prompt_enabled = flow.store.prompt_enabled(),
        "acquiring model provider credential"
    );
    let validated = acquire_validated_credential(
        &candidates,
        flow.validator.as_ref(),
        flow.prompt.as_ref(),
        &config.validation_policy,
    )
    .await?;
    let model = select_model(
        &validated.listing,
        config.min_model_version,
        config.preferred_model.as_deref(),
        flow.chooser.as_ref(),
    )
    .await?;
    info!(
        model = %model.identifier,
        version = %model.version,
        source = validated.credential.source().kind(),
        "model selected"
    );
    Ok(AuthenticatedModel {
        credential: validated.credential,
        model,
    })
}

/// Starts file-context init, stale-process cleanup, and agent loading.
pub fn start_readiness(
    params: &SessionParams,
    config: &StartupConfig,
    collaborators: &StartupCollaborators,
) -> ReadinessHandle {
    ReadinessOrchestrator::start(build_readiness_tasks(params, config, collaborators))
}

pub fn build_readiness_tasks(
    params: &SessionParams,
    config: &StartupConfig,
    collaborators: &StartupCollaborators,
) -> Vec<ReadinessTask> {
    let root = params.working_directory.clone();

    let project_context = collaborators.project_context.clone();
    let context_root = root.clone();
    let file_context = ReadinessTask::new(ReadinessTaskKind::FileContext, async move {
        project_context
            .initialize(&context_root)
            .await
            .map(ReadinessValue::FileContext)
    });

    let process_cleanup = collaborators.process_cleanup.clone();
    let state_dir = resolve_under(&root, &config.state_dir);
    let cleanup = ReadinessTask::new(ReadinessTaskKind::ProcessCleanup, async move {
        process_cleanup
            .cleanup(&state_dir)
            .await
            .map(ReadinessValue::ProcessCleanup)
    });

    let loader = collaborators.agent_loader.clone();
    let validator = collaborators.agent_validator.clone();
    let request = AgentLoadRequest {
        agents_dir: resolve_under(&root, &config.agents_dir),
        requested_agent: params.agent_id.clone(),
    };
    let agents = ReadinessTask::new(ReadinessTaskKind::AgentDefinitions, async move {
        let definitions = loader.load(&request).await?;
        validator.validate(&definitions)?;
        if let Some(agent_id) = request.requested_agent.as_deref() {
            if !definitions.contains_key(agent_id) {
                warn!(
                    agent = agent_id,
                    agents_dir = %request.agents_dir.display(),
                    "requested agent is not defined locally"
                );
            }
        }
        Ok(ReadinessValue::AgentDefinitions(definitions))
    });

    vec![file_context, cleanup, agents]
}
