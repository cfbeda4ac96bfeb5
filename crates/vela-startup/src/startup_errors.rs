use thiserror::Error;
use vela_provider::{CredentialError, ModelSelectionError};

use crate::RouteError;

#[derive(Debug, Error)]
/// Fatal startup failures. Degraded readiness tasks are never represented here.
pub enum StartupError {
    #[error(transparent)]
    MalformedInput(#[from] RouteError),
    #[error("{flag} is no longer supported: {guidance}")]
    DeprecatedUsage {
        flag: &'static str,
        guidance: &'static str,
    },
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    ModelSelection(#[from] ModelSelectionError),
    #[error("{command} failed: {source:#}")]
    Command {
        command: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("session launch failed: {0:#}")]
    Launch(#[source] anyhow::Error),
}

impl StartupError {
    /// Stable reason code used in diagnostic log records.
    pub fn reason_code(&self) -> &'static str {
        match self {
            StartupError::MalformedInput(_) => "malformed_input",
            StartupError::DeprecatedUsage { .. } => "deprecated_usage",
            StartupError::Credential(CredentialError::NoCandidates) => "missing_credential",
            StartupError::Credential(CredentialError::Prompt(_)) => "credential_prompt_failed",
            StartupError::Credential(CredentialError::Exhausted { .. }) => "invalid_credential",
            StartupError::ModelSelection(ModelSelectionError::NoQualifyingModel { .. }) => {
                "no_qualifying_model"
            }
            StartupError::ModelSelection(_) => "model_selection_failed",
            StartupError::Command { .. } => "command_failed",
            StartupError::Launch(_) => "session_launch_failed",
        }
    }

    /// Every fatal startup path exits with status 1.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

#[cfg(test)]
mod tests {
    use vela_ai::ModelVersion;
    use vela_provider::{CredentialError, ModelSelectionError};

    use super::StartupError;
    use crate::RouteError;

    #[test]
    fn unit_reason_codes_follow_taxonomy() {
        assert_eq!(
            StartupError::from(RouteError::PrintWithoutInput).reason_code(),
            "malformed_input"
        );
        assert_eq!(
            StartupError::from(CredentialError::Exhausted {
                attempts: 3,
                candidates: 1,
                last_failure: "rejected".to_string(),
            })
            .reason_code(),
            "invalid_credential"
        );
        assert_eq!(
            StartupError::from(ModelSelectionError::NoQualifyingModel {
                floor: ModelVersion::new(2, 5),
                catalog_size: 4,
            })
            .reason_code(),
            "no_qualifying_model"
        );
    }

    #[test]
    fn unit_malformed_input_message_is_transparent() {
        let error = StartupError::from(RouteError::PrintWithoutInput);
        assert_eq!(
            error.to_string(),
            "--print requires a prompt argument or --params"
        );
        assert_eq!(error.exit_code(), 1);
    }
}
