use crate::{ModelListing, VelaAiError};

/// Catalog page size requested per call; large enough for one round trip.
pub const MODEL_CATALOG_PAGE_SIZE: u32 = 1_000;

#[derive(Debug, Clone)]
/// Public struct `GoogleModelsConfig` used across Vela components.
pub struct GoogleModelsConfig {
    pub api_base: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone)]
/// Authenticated client for the Generative Language `models` listing endpoint.
///
/// A successful listing doubles as proof that the credential is accepted, so
/// callers reuse the returned catalog instead of issuing a second request.
pub struct GoogleModelsClient {
    client: reqwest::Client,
    config: GoogleModelsConfig,
}

impl GoogleModelsClient {
    pub fn new(config: GoogleModelsConfig) -> Result<Self, VelaAiError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(
                config.request_timeout_ms.max(1),
            ))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn models_url(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        if base.ends_with("/models") {
            return base.to_string();
        }
        format!("{base}/models")
    }

    /// Issues one `GET <api_base>/models` with the `x-goog-api-key` header.
    pub async fn list_models(&self, api_key: &str) -> Result<ModelListing, VelaAiError> {
        if api_key.trim().is_empty() {
            return Err(VelaAiError::MissingApiKey);
        }

        let response = self
            .client
            .get(self.models_url())
            .header("x-goog-api-key", api_key.trim())
            .query(&[("pageSize", MODEL_CATALOG_PAGE_SIZE)])
            .send()
            .await?;
        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(VelaAiError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&raw),
            });
        }

        let listing: ModelListing = serde_json::from_str(&raw)?;
        if listing.models.iter().any(|entry| entry.name.trim().is_empty()) {
            return Err(VelaAiError::InvalidResponse(
                "model catalog entry is missing a name".to_string(),
            ));
        }
        Ok(listing)
    }
}

fn truncate_body(raw: &str) -> String {
    const MAX_BODY_CHARS: usize = 512;
    if raw.chars().count() <= MAX_BODY_CHARS {
        return raw.to_string();
    }
    let mut truncated = raw.chars().take(MAX_BODY_CHARS).collect::<String>();
    truncated.push_str("...");
    truncated
}
