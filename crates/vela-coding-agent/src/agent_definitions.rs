//! Agent definitions stored as `<agents-dir>/*.json`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use vela_startup::{
    AgentDefinitionLoader, AgentDefinitionValidator, AgentDefinitions, AgentLoadRequest,
};

#[derive(Debug, Clone, Copy, Default)]
/// Reads every JSON definition in the agents directory.
pub(crate) struct LocalAgentLoader;

#[async_trait]
impl AgentDefinitionLoader for LocalAgentLoader {
    async fn load(&self, request: &AgentLoadRequest) -> Result<AgentDefinitions> {
        load_agent_definitions(&request.agents_dir).await
    }
}

async fn definition_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("failed to read agents directory '{}'", dir.display()))?;
    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("failed to list agents directory '{}'", dir.display()))?
    {
        let path = entry.path();
        if path.extension().and_then(|value| value.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn definition_id(path: &Path, definition: &Value) -> Option<String> {
    definition
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
        })
}

/// Loads definitions keyed by id; a missing directory yields an empty set.
pub(crate) async fn load_agent_definitions(dir: &Path) -> Result<AgentDefinitions> {
    let mut definitions = AgentDefinitions::new();
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Ok(definitions);
    }
    for path in definition_paths(dir).await? {
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read agent definition '{}'", path.display()))?;
        let definition: Value = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse agent definition '{}'", path.display()))?;
        let Some(id) = definition_id(&path, &definition) else {
            bail!("agent definition '{}' has no usable id", path.display());
        };
        if definitions.insert(id.clone(), definition).is_some() {
            bail!(
                "duplicate agent id '{id}' (second definition at '{}')",
                path.display()
            );
        }
    }
    Ok(definitions)
}

fn non_empty_str<'a>(definition: &'a Value, field: &str) -> Option<&'a str> {
    definition
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub(crate) fn schema_violations(definitions: &AgentDefinitions) -> Vec<String> {
    let mut violations = Vec::new();
    for (key, definition) in definitions {
        if !definition.is_object() {
            violations.push(format!("agent '{key}' must be a JSON object"));
            continue;
        }
        match non_empty_str(definition, "id") {
            None => violations.push(format!("agent '{key}' is missing a non-empty string id")),
            Some(id) if id != key => {
                violations.push(format!("agent '{key}' declares mismatched id '{id}'"))
            }
            Some(_) => {}
        }
        if non_empty_str(definition, "model").is_none() {
            violations.push(format!(
                "agent '{key}' is missing a non-empty string model"
            ));
        }
    }
    violations
}

#[derive(Debug, Clone, Copy, Default)]
/// Checks ids and models of loaded definitions.
pub(crate) struct AgentSchemaValidator;

impl AgentDefinitionValidator for AgentSchemaValidator {
    fn validate(&self, definitions: &AgentDefinitions) -> Result<()> {
        let violations = schema_violations(definitions);
        if violations.is_empty() {
            return Ok(());
        }
        bail!("invalid agent definitions: {}", violations.join("; "))
    }
}
