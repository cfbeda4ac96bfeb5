//! Credential acquisition and model selection for Vela startup.
//!
//! Candidate credentials come from the environment or an interactive prompt,
//! are validated against the provider catalog endpoint with bounded retry, and
//! the catalog from the accepted request drives model selection.

pub mod credential_validation;
pub mod credentials;
pub mod model_selection;
pub mod terminal_prompts;
pub mod types;

pub use credential_validation::*;
pub use credentials::*;
pub use model_selection::*;
pub use terminal_prompts::*;
pub use types::*;
