use std::fmt;

use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `CredentialSource` values.
pub enum CredentialSource {
    Environment { variable: String },
    InteractivePrompt { attempt: u8 },
}

impl CredentialSource {
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialSource::Environment { .. } => "environment",
            CredentialSource::InteractivePrompt { .. } => "interactive-prompt",
        }
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment { variable } => {
                write!(f, "environment variable {variable}")
            }
            CredentialSource::InteractivePrompt { attempt } => {
                write!(f, "interactive prompt (attempt {attempt})")
            }
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
/// An API key together with where it came from. Never persisted.
pub struct Credential {
    source: CredentialSource,
    secret: String,
}

impl Credential {
    pub fn new(source: CredentialSource, secret: impl Into<String>) -> Self {
        Self {
            source,
            secret: secret.into().trim().to_string(),
        }
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn is_blank(&self) -> bool {
        self.secret.is_empty()
    }

    /// Short digest safe to log in place of the key.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.secret.as_bytes());
        let hex = digest
            .iter()
            .take(6)
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>();
        format!("sha256:{hex}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("source", &self.source)
            .field("secret", &"<redacted>")
            .finish()
    }
}
