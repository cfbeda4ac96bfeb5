//! Model selection from the catalog returned by credential validation.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use vela_ai::{parse_model_version, ModelListing, ModelVersion};

/// Lowest model version offered unless configured otherwise.
pub const DEFAULT_MIN_MODEL_VERSION: ModelVersion = ModelVersion::new(2, 5);

#[derive(Debug, Clone, PartialEq, Eq)]
/// Public struct `ModelDescriptor` used across Vela components.
pub struct ModelDescriptor {
    pub identifier: String,
    pub display_label: String,
    pub version: ModelVersion,
}

impl ModelDescriptor {
    /// Label shown in the selection list: display name followed by identifier.
    pub fn choice_label(&self) -> String {
        format!("{} ({})", self.display_label, self.identifier)
    }
}

#[derive(Debug, Error)]
/// Enumerates supported `ModelSelectionError` values.
pub enum ModelSelectionError {
    #[error("no model at version {floor} or newer is available to this API key ({catalog_size} models listed)")]
    NoQualifyingModel {
        floor: ModelVersion,
        catalog_size: usize,
    },
    #[error("model selection failed: {0}")]
    Chooser(String),
    #[error("model selection returned option {index} but only {options} were offered")]
    ChoiceOutOfRange { index: usize, options: usize },
}

#[async_trait]
/// Presents qualifying models and returns the index of the chosen one.
pub trait ModelChooser: Send + Sync {
    async fn choose(&self, options: &[ModelDescriptor]) -> anyhow::Result<usize>;
}

/// Catalog entries whose parsed version is at least `floor`, in catalog order.
pub fn qualifying_models(listing: &ModelListing, floor: ModelVersion) -> Vec<ModelDescriptor> {
    listing
        .models
        .iter()
        .filter_map(|entry| {
            let version = parse_model_version(&entry.name)?;
            (version >= floor).then(|| ModelDescriptor {
                identifier: entry.name.clone(),
                display_label: entry.label_name().to_string(),
                version,
            })
        })
        .collect()
}

fn same_model(identifier: &str, requested: &str) -> bool {
    let strip = |value: &str| {
        let value = value.trim();
        value.strip_prefix("models/").unwrap_or(value).to_string()
    };
    strip(identifier) == strip(requested)
}

/// Resolves the session model.
///
/// A qualifying `preferred` identifier wins, a single survivor is taken as is,
/// and anything else goes through `chooser`.
pub async fn select_model(
    listing: &ModelListing,
    floor: ModelVersion,
    preferred: Option<&str>,
    chooser: &dyn ModelChooser,
) -> Result<ModelDescriptor, ModelSelectionError> {
    let mut options = qualifying_models(listing, floor);
    if options.is_empty() {
        return Err(ModelSelectionError::NoQualifyingModel {
            floor,
            catalog_size: listing.models.len(),
        });
    }

    if let Some(requested) = preferred.filter(|value| !value.trim().is_empty()) {
        if let Some(position) = options
            .iter()
            .position(|option| same_model(&option.identifier, requested))
        {
            let chosen = options.swap_remove(position);
            info!(model = %chosen.identifier, "using preselected model");
            return Ok(chosen);
        }
        warn!(
            model = requested,
            floor = %floor,
            "preselected model is not available at the version floor; choosing interactively"
        );
    }

    if options.len() == 1 {
        let chosen = options.remove(0);
        info!(model = %chosen.identifier, "only one qualifying model; selected automatically");
        return Ok(chosen);
    }

    let index = chooser
        .choose(&options)
        .await
        .map_err(|error| ModelSelectionError::Chooser(format!("{error:#}")))?;
    if index >= options.len() {
        return Err(ModelSelectionError::ChoiceOutOfRange {
            index,
            options: options.len(),
        });
    }
    Ok(options.swap_remove(index))
}
