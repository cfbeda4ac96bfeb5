use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// One entry of the provider model catalog.
pub struct GoogleModelEntry {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

impl GoogleModelEntry {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
        }
    }

    /// Display name, falling back to the identifier when the provider sent none.
    pub fn label_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            self.name.as_str()
        } else {
            self.display_name.as_str()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Raw model listing returned by a successful catalog request.
pub struct ModelListing {
    #[serde(default)]
    pub models: Vec<GoogleModelEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl ModelListing {
    pub fn from_entries(models: Vec<GoogleModelEntry>) -> Self {
        Self {
            models,
            next_page_token: None,
        }
    }
}

#[derive(Debug, Error)]
/// Enumerates supported `VelaAiError` values.
pub enum VelaAiError {
    #[error("missing API key")]
    MissingApiKey,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::{GoogleModelEntry, ModelListing};

    #[test]
    fn unit_model_listing_decodes_camel_case_payload() {
        let listing: ModelListing = serde_json::from_str(
            r#"{
                "models": [
                    {"name": "models/gemini-2.5-flash", "displayName": "Gemini 2.5 Flash", "inputTokenLimit": 1048576},
                    {"name": "models/gemini-2.0-pro"}
                ],
                "nextPageToken": "abc"
            }"#,
        )
        .expect("decode listing");
        assert_eq!(listing.models.len(), 2);
        assert_eq!(listing.models[0].display_name, "Gemini 2.5 Flash");
        assert_eq!(listing.models[1].label_name(), "models/gemini-2.0-pro");
        assert_eq!(listing.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn unit_model_listing_tolerates_missing_models_array() {
        let listing: ModelListing = serde_json::from_str("{}").expect("decode empty listing");
        assert!(listing.models.is_empty());
        assert_eq!(
            ModelListing::from_entries(vec![GoogleModelEntry::new("a", "A")]).models[0].name,
            "a"
        );
    }
}
