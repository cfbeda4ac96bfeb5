//! Google Generative Language model-catalog access for Vela.
//!
//! Provides the authenticated catalog client, HTTP status classification
//! helpers shared by credential validation, and the model version parser.
mod google;
mod model_version;
mod retry;
mod types;

pub use google::{GoogleModelsClient, GoogleModelsConfig, MODEL_CATALOG_PAGE_SIZE};
pub use model_version::{parse_model_version, ModelVersion, ModelVersionParseError};
pub use retry::{is_retryable_http_error, should_retry_status};
pub use types::{GoogleModelEntry, ModelListing, VelaAiError};
