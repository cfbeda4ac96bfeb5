//! Credential validation against the provider catalog endpoint.
//!
//! Retry bookkeeping is a pure transition function over `ValidationState`; the
//! async driver only performs I/O and sleeps between attempts. Candidates are
//! validated strictly one at a time and prompts are never overlapped.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};
use vela_ai::{
    is_retryable_http_error, should_retry_status, GoogleModelsClient, ModelListing, VelaAiError,
};

use crate::{
    Credential, CredentialCandidate, CredentialSource, CREDENTIAL_ENV_VARS, PROMPT_ATTEMPT_BUDGET,
};

/// Attempts allowed per candidate before it is abandoned.
pub const VALIDATION_ATTEMPTS_PER_CANDIDATE: u32 = 3;
/// Fixed spacing between attempts on the same candidate.
pub const VALIDATION_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of a single validation attempt.
pub enum ValidationOutcome {
    Valid(ModelListing),
    /// The provider rejected the key; never retried.
    Invalid,
    Transient(String),
}

/// Maps one catalog request result to a validation outcome.
///
/// Client errors reject the key, with one exception to the plain 4xx rule:
/// 408, 409, 425 and 429 are timeout or throttling signals and stay Transient.
pub fn classify_catalog_response(result: Result<ModelListing, VelaAiError>) -> ValidationOutcome {
    match result {
        Ok(listing) => ValidationOutcome::Valid(listing),
        Err(VelaAiError::HttpStatus { status, body }) => {
            if (400..500).contains(&status) && !should_retry_status(status) {
                debug!(status, body = %body, "provider rejected credential");
                ValidationOutcome::Invalid
            } else {
                ValidationOutcome::Transient(format!("provider returned status {status}"))
            }
        }
        Err(VelaAiError::MissingApiKey) => ValidationOutcome::Invalid,
        Err(VelaAiError::Http(error)) => {
            let kind = if error.is_timeout() {
                "request timed out"
            } else if is_retryable_http_error(&error) {
                "network error"
            } else {
                "http client error"
            };
            ValidationOutcome::Transient(format!("{kind}: {error}"))
        }
        Err(VelaAiError::Serde(error)) => {
            ValidationOutcome::Transient(format!("undecodable model catalog: {error}"))
        }
        Err(VelaAiError::InvalidResponse(message)) => ValidationOutcome::Transient(message),
    }
}

#[async_trait]
/// Trait contract for `CredentialValidator` behavior.
pub trait CredentialValidator: Send + Sync {
    /// Performs one validation attempt; called once per retry.
    async fn validate(&self, credential: &Credential) -> ValidationOutcome;
}

#[async_trait]
impl CredentialValidator for GoogleModelsClient {
    async fn validate(&self, credential: &Credential) -> ValidationOutcome {
        classify_catalog_response(self.list_models(credential.secret()).await)
    }
}

#[async_trait]
/// Masked interactive source for an API key.
pub trait CredentialPrompt: Send + Sync {
    async fn read_api_key(&self, attempt: u8, budget: u8) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Public struct `ValidationPolicy` used across Vela components.
pub struct ValidationPolicy {
    pub attempts_per_candidate: u32,
    pub retry_delay: Duration,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            attempts_per_candidate: VALIDATION_ATTEMPTS_PER_CANDIDATE,
            retry_delay: VALIDATION_RETRY_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Position in the candidate sequence plus attempts left for that candidate,
/// counting the attempt about to run.
pub struct ValidationState {
    pub candidate_index: usize,
    pub attempts_remaining: u32,
}

impl ValidationState {
    pub fn initial(policy: &ValidationPolicy) -> Self {
        Self {
            candidate_index: 0,
            attempts_remaining: policy.attempts_per_candidate.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `ValidationStep` values.
pub enum ValidationStep {
    Validated(ModelListing),
    RetrySameCandidate(ValidationState),
    AdvanceCandidate(ValidationState),
    Exhausted,
}

/// Transition function of the validation state machine.
pub fn next_validation_step(
    state: ValidationState,
    outcome: ValidationOutcome,
    policy: &ValidationPolicy,
    candidate_count: usize,
) -> ValidationStep {
    let advance = || {
        let next_index = state.candidate_index + 1;
        if next_index < candidate_count {
            ValidationStep::AdvanceCandidate(ValidationState {
                candidate_index: next_index,
                attempts_remaining: policy.attempts_per_candidate.max(1),
            })
        } else {
            ValidationStep::Exhausted
        }
    };
    match outcome {
        ValidationOutcome::Valid(listing) => ValidationStep::Validated(listing),
        ValidationOutcome::Invalid => advance(),
        ValidationOutcome::Transient(_) if state.attempts_remaining > 1 => {
            ValidationStep::RetrySameCandidate(ValidationState {
                candidate_index: state.candidate_index,
                attempts_remaining: state.attempts_remaining - 1,
            })
        }
        ValidationOutcome::Transient(_) => advance(),
    }
}

#[derive(Debug, Clone)]
/// The credential accepted by the provider and the catalog from that response.
pub struct ValidatedCredential {
    pub credential: Credential,
    pub listing: ModelListing,
}

#[derive(Debug, Error)]
/// Enumerates supported `CredentialError` values.
pub enum CredentialError {
    #[error(
        "no API key available: set {} or run interactively to enter one",
        CREDENTIAL_ENV_VARS.join(" or ")
    )]
    NoCandidates,
    #[error("no valid API key after {attempts} validation attempts across {candidates} candidate(s): {last_failure}")]
    Exhausted {
        attempts: usize,
        candidates: usize,
        last_failure: String,
    },
    #[error("failed to read API key: {0}")]
    Prompt(String),
}

/// Walks `candidates` in order until one validates.
///
/// Invalid candidates are abandoned without delay. Transient failures retry
/// the same candidate after `policy.retry_delay`, up to the per-candidate
/// budget. A prompt slot is shown once; its retries reuse the entered key.
pub async fn acquire_validated_credential(
    candidates: &[CredentialCandidate],
    validator: &dyn CredentialValidator,
    prompt: &dyn CredentialPrompt,
    policy: &ValidationPolicy,
) -> Result<ValidatedCredential, CredentialError> {
    if candidates.is_empty() {
        return Err(CredentialError::NoCandidates);
    }

    let mut state = ValidationState::initial(policy);
    let mut resolved: Option<(usize, Credential)> = None;
    let mut attempts = 0_usize;
    let mut last_failure = String::new();

    loop {
        let candidate = &candidates[state.candidate_index];
        let credential = match resolved.as_ref() {
            Some((index, credential)) if *index == state.candidate_index => credential.clone(),
            _ => {
                let credential = resolve_candidate(candidate, prompt).await?;
                resolved = Some((state.candidate_index, credential.clone()));
                credential
            }
        };

        let outcome = if credential.is_blank() {
            ValidationOutcome::Invalid
        } else {
            attempts += 1;
            debug!(
                source = %credential.source(),
                fingerprint = %credential.fingerprint(),
                attempts_remaining = state.attempts_remaining,
                "validating credential"
            );
            validator.validate(&credential).await
        };

        match &outcome {
            ValidationOutcome::Valid(listing) => info!(
                source = %credential.source(),
                models = listing.models.len(),
                "credential accepted"
            ),
            ValidationOutcome::Invalid => {
                last_failure = format!("{} was rejected by the provider", candidate.describe());
                warn!(source = %credential.source(), "credential rejected");
                if matches!(credential.source(), CredentialSource::InteractivePrompt { .. }) {
                    eprintln!("That API key was not accepted.");
                }
            }
            ValidationOutcome::Transient(reason) => {
                last_failure = format!("{}: {reason}", candidate.describe());
                warn!(
                    source = %credential.source(),
                    reason = %reason,
                    attempts_remaining = state.attempts_remaining - 1,
                    "credential validation failed transiently"
                );
            }
        }

        match next_validation_step(state, outcome, policy, candidates.len()) {
            ValidationStep::Validated(listing) => {
                return Ok(ValidatedCredential {
                    credential,
                    listing,
                });
            }
            ValidationStep::RetrySameCandidate(next) => {
                tokio::time::sleep(policy.retry_delay).await;
                state = next;
            }
            ValidationStep::AdvanceCandidate(next) => state = next,
            ValidationStep::Exhausted => {
                return Err(CredentialError::Exhausted {
                    attempts,
                    candidates: candidates.len(),
                    last_failure,
                });
            }
        }
    }
}

async fn resolve_candidate(
    candidate: &CredentialCandidate,
    prompt: &dyn CredentialPrompt,
) -> Result<Credential, CredentialError> {
    match candidate {
        CredentialCandidate::Environment(credential) => Ok(credential.clone()),
        CredentialCandidate::Prompt { attempt } => {
            let secret = prompt
                .read_api_key(*attempt, PROMPT_ATTEMPT_BUDGET)
                .await
                .map_err(|error| CredentialError::Prompt(format!("{error:#}")))?;
            Ok(Credential::new(
                CredentialSource::InteractivePrompt { attempt: *attempt },
                secret,
            ))
        }
    }
}
