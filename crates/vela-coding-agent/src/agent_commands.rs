//! Handlers for the non-session commands.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use vela_core::{current_unix_timestamp_ms, write_text_atomic};
use vela_startup::{
    AgentDefinitionValidator, AgentDefinitions, CommandContext, StartupCommandActions,
};

use crate::{load_agent_definitions, scaffold_project, AgentSchemaValidator};

pub(crate) const PUBLISH_BUNDLE_SCHEMA_VERSION: u32 = 1;
pub(crate) const EXAMPLE_AGENT_ID: &str = "example-agent";

#[derive(Debug, Clone, Copy, Default)]
/// Public struct `LocalCommandActions` used across Vela components.
pub(crate) struct LocalCommandActions;

fn select_definitions(
    definitions: &AgentDefinitions,
    requested: &[String],
    agents_dir: &Path,
) -> Result<AgentDefinitions> {
    if requested.is_empty() {
        bail!("no agent names given");
    }
    let missing = requested
        .iter()
        .filter(|name| !definitions.contains_key(name.as_str()))
        .cloned()
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        bail!(
            "unknown agent(s) {} in '{}'",
            missing.join(", "),
            agents_dir.display()
        );
    }
    Ok(requested
        .iter()
        .filter_map(|name| {
            definitions
                .get(name.as_str())
                .map(|definition| (name.clone(), definition.clone()))
        })
        .collect())
}

fn short_model_id(identifier: &str) -> &str {
    identifier.strip_prefix("models/").unwrap_or(identifier)
}

pub(crate) fn example_agent_definition(model_identifier: &str) -> Value {
    json!({
        "id": EXAMPLE_AGENT_ID,
        "model": short_model_id(model_identifier),
        "display_name": "Example Agent",
        "instructions": "Describe what this agent should do.",
    })
}

fn encode(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to encode agent json")
}

#[async_trait]
impl StartupCommandActions for LocalCommandActions {
    async fn scaffold_project(
        &self,
        context: &CommandContext,
        template: &str,
        dir: &Path,
        name: &str,
    ) -> Result<()> {
        let manifest = scaffold_project(template, dir, name, &context.auth.model.identifier)?;
        println!("created project '{name}' at {}", manifest.display());
        Ok(())
    }

    async fn publish_agents(&self, context: &CommandContext, agent_names: &[String]) -> Result<()> {
        let definitions = load_agent_definitions(&context.agents_dir).await?;
        let selected = select_definitions(&definitions, agent_names, &context.agents_dir)?;
        AgentSchemaValidator.validate(&selected)?;

        let published_at = chrono::Utc::now().to_rfc3339();
        let bundle = json!({
            "schema_version": PUBLISH_BUNDLE_SCHEMA_VERSION,
            "published_at": published_at,
            "model": context.auth.model.identifier,
            "agents": selected,
        });
        let path = context
            .state_dir
            .join("publish")
            .join(format!("bundle-{}.json", current_unix_timestamp_ms()));
        write_text_atomic(&path, &encode(&bundle)?)?;
        println!("published {} agent(s) to {}", selected.len(), path.display());
        Ok(())
    }

    async fn init_agents(&self, context: &CommandContext) -> Result<()> {
        let path = context.agents_dir.join(format!("{EXAMPLE_AGENT_ID}.json"));
        if path.exists() {
            println!("agent definition already exists at {}", path.display());
            return Ok(());
        }
        let definition = example_agent_definition(&context.auth.model.identifier);
        write_text_atomic(&path, &encode(&definition)?)?;
        println!("created {}", path.display());
        Ok(())
    }

    async fn save_agents(&self, context: &CommandContext, agent_ids: &[String]) -> Result<()> {
        let definitions = load_agent_definitions(&context.agents_dir).await?;
        let selected = select_definitions(&definitions, agent_ids, &context.agents_dir)?;
        let mut saved: Vec<PathBuf> = Vec::with_capacity(selected.len());
        for (id, definition) in &selected {
            let path = context.agent_library.join(format!("{id}.json"));
            write_text_atomic(&path, &encode(definition)?)?;
            saved.push(path);
        }
        for path in saved {
            println!("saved {}", path.display());
        }
        Ok(())
    }
}
