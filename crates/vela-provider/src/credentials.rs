//! Candidate credential discovery.
//!
//! Environment variables are read once in fixed priority order. The prompt is
//! only represented as lazy slots so that no terminal interaction happens
//! unless the flow actually reaches it.

use crate::{Credential, CredentialSource};

/// Environment variables consulted for an API key, highest priority first.
pub const CREDENTIAL_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Number of times the interactive prompt may be shown.
pub const PROMPT_ATTEMPT_BUDGET: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One position in the ordered candidate sequence.
pub enum CredentialCandidate {
    Environment(Credential),
    /// Resolved through `CredentialPrompt` only when the flow reaches it.
    Prompt { attempt: u8 },
}

impl CredentialCandidate {
    pub fn describe(&self) -> String {
        match self {
            CredentialCandidate::Environment(credential) => credential.source().to_string(),
            CredentialCandidate::Prompt { attempt } => {
                CredentialSource::InteractivePrompt { attempt: *attempt }.to_string()
            }
        }
    }
}

#[derive(Debug, Clone)]
/// Public struct `CredentialStore` used across Vela components.
pub struct CredentialStore {
    environment: Vec<Credential>,
    prompt_enabled: bool,
}

impl CredentialStore {
    pub fn from_env(prompt_enabled: bool) -> Self {
        Self::from_lookup(|name| std::env::var(name).ok(), prompt_enabled)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>, prompt_enabled: bool) -> Self {
        let mut environment: Vec<Credential> = Vec::new();
        for variable in CREDENTIAL_ENV_VARS {
            let Some(value) = lookup(variable) else {
                continue;
            };
            let credential = Credential::new(
                CredentialSource::Environment {
                    variable: variable.to_string(),
                },
                value,
            );
            if credential.is_blank()
                || environment
                    .iter()
                    .any(|existing| existing.secret() == credential.secret())
            {
                continue;
            }
            environment.push(credential);
        }
        Self {
            environment,
            prompt_enabled,
        }
    }

    pub fn environment_count(&self) -> usize {
        self.environment.len()
    }

    pub fn prompt_enabled(&self) -> bool {
        self.prompt_enabled
    }

    /// Ordered candidates: environment values, or prompt slots when there are none.
    pub fn candidates(&self) -> Vec<CredentialCandidate> {
        if !self.environment.is_empty() {
            return self
                .environment
                .iter()
                .cloned()
                .map(CredentialCandidate::Environment)
                .collect();
        }
        if !self.prompt_enabled {
            return Vec::new();
        }
        (1..=PROMPT_ATTEMPT_BUDGET)
            .map(|attempt| CredentialCandidate::Prompt { attempt })
            .collect()
    }
}
