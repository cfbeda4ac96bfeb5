//! Terminal implementations of the credential prompt and model chooser.
//!
//! dialoguer reads are blocking, so each interaction runs on the blocking pool.
//! Only one prompt is ever in flight because the credential flow is sequential.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use async_trait::async_trait;
use dialoguer::{Password, Select};
use tracing::info;

use crate::{CredentialPrompt, ModelChooser, ModelDescriptor};

/// Returns true when stdin can host an interactive prompt.
pub fn stdin_is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

#[derive(Debug, Clone, Copy, Default)]
/// Masked API key prompt on the controlling terminal.
pub struct TerminalCredentialPrompt;

#[async_trait]
impl CredentialPrompt for TerminalCredentialPrompt {
    async fn read_api_key(&self, attempt: u8, budget: u8) -> Result<String> {
        let prompt = if attempt <= 1 {
            "Enter your Gemini API key".to_string()
        } else {
            format!("Enter your Gemini API key (attempt {attempt} of {budget})")
        };
        let secret = tokio::task::spawn_blocking(move || {
            Password::new()
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
        })
        .await
        .context("API key prompt task failed")?
        .context("failed to read API key from terminal")?;
        Ok(secret.trim().to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Interactive model picker.
///
/// Without a terminal it picks the highest version, first listed on ties.
pub struct TerminalModelChooser;

/// Index of the newest model, preferring the earliest entry among equals.
pub fn newest_model_index(options: &[ModelDescriptor]) -> usize {
    let mut best = 0;
    for (index, option) in options.iter().enumerate() {
        if option.version > options[best].version {
            best = index;
        }
    }
    best
}

#[async_trait]
impl ModelChooser for TerminalModelChooser {
    async fn choose(&self, options: &[ModelDescriptor]) -> Result<usize> {
        if !stdin_is_interactive() {
            let index = newest_model_index(options);
            if let Some(option) = options.get(index) {
                info!(model = %option.identifier, "no terminal for model selection; using newest model");
            }
            return Ok(index);
        }
        let labels = options
            .iter()
            .map(ModelDescriptor::choice_label)
            .collect::<Vec<_>>();
        tokio::task::spawn_blocking(move || {
            Select::new()
                .with_prompt("Select a model")
                .items(labels.as_slice())
                .default(0)
                .interact()
        })
        .await
        .context("model selection task failed")?
        .context("failed to read model selection from terminal")
    }
}
