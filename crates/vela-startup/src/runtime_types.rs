use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use vela_provider::{
    Credential, CredentialPrompt, CredentialStore, CredentialValidator, ModelChooser,
    ModelDescriptor,
};

use crate::{ReadinessReport, SessionParams};

/// Agent definitions keyed by agent id.
pub type AgentDefinitions = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Public struct `ProjectContext` used across Vela components.
pub struct ProjectContext {
    pub root: PathBuf,
    pub files: Vec<String>,
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Public struct `CleanupReport` used across Vela components.
pub struct CleanupReport {
    pub inspected: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Public struct `AgentLoadRequest` used across Vela components.
pub struct AgentLoadRequest {
    pub agents_dir: PathBuf,
    pub requested_agent: Option<String>,
}

#[derive(Debug, Clone)]
/// The validated credential and model pair every non-deprecated route needs.
pub struct AuthenticatedModel {
    pub credential: Credential,
    pub model: ModelDescriptor,
}

#[derive(Debug, Clone)]
/// Filesystem locations and auth material available to non-session commands.
pub struct CommandContext {
    pub root: PathBuf,
    pub agents_dir: PathBuf,
    pub state_dir: PathBuf,
    pub agent_library: PathBuf,
    pub auth: AuthenticatedModel,
}

#[derive(Debug, Clone)]
/// Everything the session layer receives once startup has finished.
pub struct SessionLaunch {
    pub params: SessionParams,
    pub auth: AuthenticatedModel,
    pub readiness: ReadinessReport,
}

#[async_trait]
/// Trait contract for `ProjectContextInitializer` behavior.
pub trait ProjectContextInitializer: Send + Sync {
    async fn initialize(&self, project_root: &Path) -> Result<ProjectContext>;
}

#[async_trait]
/// Trait contract for `StaleProcessCleanup` behavior.
pub trait StaleProcessCleanup: Send + Sync {
    async fn cleanup(&self, state_dir: &Path) -> Result<CleanupReport>;
}

#[async_trait]
/// Trait contract for `AgentDefinitionLoader` behavior.
pub trait AgentDefinitionLoader: Send + Sync {
    async fn load(&self, request: &AgentLoadRequest) -> Result<AgentDefinitions>;
}

/// Schema checks applied to loaded definitions once a credential is in play.
pub trait AgentDefinitionValidator: Send + Sync {
    fn validate(&self, definitions: &AgentDefinitions) -> Result<()>;
}

#[async_trait]
/// Trait contract for `SessionLauncher` behavior.
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self, launch: SessionLaunch) -> Result<()>;
}

#[async_trait]
/// Handlers for the routes that finish without a session.
pub trait StartupCommandActions: Send + Sync {
    async fn scaffold_project(
        &self,
        context: &CommandContext,
        template: &str,
        dir: &Path,
        name: &str,
    ) -> Result<()>;
    async fn publish_agents(&self, context: &CommandContext, agent_names: &[String])
        -> Result<()>;
    async fn init_agents(&self, context: &CommandContext) -> Result<()>;
    async fn save_agents(&self, context: &CommandContext, agent_ids: &[String]) -> Result<()>;
}

#[derive(Clone)]
/// Credential sources and interactive collaborators for the auth flow.
pub struct CredentialFlow {
    pub store: CredentialStore,
    pub validator: Arc<dyn CredentialValidator>,
    pub prompt: Arc<dyn CredentialPrompt>,
    pub chooser: Arc<dyn ModelChooser>,
}

#[derive(Clone)]
/// Public struct `StartupCollaborators` used across Vela components.
pub struct StartupCollaborators {
    pub credentials: CredentialFlow,
    pub project_context: Arc<dyn ProjectContextInitializer>,
    pub process_cleanup: Arc<dyn StaleProcessCleanup>,
    pub agent_loader: Arc<dyn AgentDefinitionLoader>,
    pub agent_validator: Arc<dyn AgentDefinitionValidator>,
    pub launcher: Arc<dyn SessionLauncher>,
    pub commands: Arc<dyn StartupCommandActions>,
}
