//! Invocation classification.
//!
//! `route` is a pure function of the `InvocationSpec`: no I/O, no hidden state.
//! Input errors are reported here so they surface before any network or
//! orchestration work starts.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use vela_cli::{strip_host_artifact_positional, InvocationSpec};

/// Reserved first-positional command names.
pub const RESERVED_COMMANDS: [&str; 3] = ["publish", "init-agents", "save-agent"];

pub const DEPRECATED_PRO_FLAG: &str = "--pro";
pub const DEPRECATED_PRO_GUIDANCE: &str =
    "--pro has been removed; use --max for the highest-capability cost mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `CostMode` values.
pub enum CostMode {
    Normal,
    Lite,
    Max,
    Experimental,
    Ask,
}

impl CostMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CostMode::Normal => "normal",
            CostMode::Lite => "lite",
            CostMode::Max => "max",
            CostMode::Experimental => "experimental",
            CostMode::Ask => "ask",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GitMode {
    Stage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Parameters the session layer needs from the invocation.
pub struct SessionParams {
    pub cost_mode: CostMode,
    pub git_mode: Option<GitMode>,
    pub print: bool,
    pub working_directory: PathBuf,
    pub trace: bool,
    pub init: bool,
    pub agent_id: Option<String>,
    pub agent_params: Option<Value>,
    pub initial_input: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// The single downstream handling path selected for an invocation.
pub enum Route {
    Scaffold {
        template: String,
        dir: PathBuf,
        name: String,
    },
    Publish {
        agent_names: Vec<String>,
    },
    InitAgents,
    SaveAgent {
        agent_ids: Vec<String>,
    },
    DeprecatedFlag {
        flag: &'static str,
        guidance: &'static str,
    },
    Session(SessionParams),
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Scaffold { .. } => "scaffold",
            Route::Publish { .. } => "publish",
            Route::InitAgents => "init-agents",
            Route::SaveAgent { .. } => "save-agent",
            Route::DeprecatedFlag { .. } => "deprecated-flag",
            Route::Session(_) => "session",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates supported `RouteError` values.
pub enum RouteError {
    #[error("--params is not valid JSON: {message}")]
    MalformedParams { message: String },
    #[error("--params must be a JSON object, got {found}")]
    ParamsNotObject { found: &'static str },
    #[error("--print requires a prompt argument or --params")]
    PrintWithoutInput,
    #[error("--create requires a non-empty template name")]
    EmptyTemplate,
}

/// Classifies `spec` into exactly one route.
pub fn route(spec: &InvocationSpec) -> Result<Route, RouteError> {
    let positionals = strip_host_artifact_positional(&spec.positionals);
    let options = &spec.options;

    if let Some(template) = options.create.as_deref() {
        let template = template.trim();
        if template.is_empty() {
            return Err(RouteError::EmptyTemplate);
        }
        return Ok(Route::Scaffold {
            template: template.to_string(),
            dir: PathBuf::from(positionals.first().map(String::as_str).unwrap_or(".")),
            name: positionals
                .get(1)
                .cloned()
                .unwrap_or_else(|| template.to_string()),
        });
    }

    if let Some((command, rest)) = positionals.split_first() {
        match command.as_str() {
            "publish" => {
                return Ok(Route::Publish {
                    agent_names: rest.to_vec(),
                })
            }
            "init-agents" => return Ok(Route::InitAgents),
            "save-agent" => {
                return Ok(Route::SaveAgent {
                    agent_ids: rest.to_vec(),
                })
            }
            _ => {}
        }
    }

    if options.pro {
        return Ok(Route::DeprecatedFlag {
            flag: DEPRECATED_PRO_FLAG,
            guidance: DEPRECATED_PRO_GUIDANCE,
        });
    }

    let agent_params = options
        .params
        .as_deref()
        .map(parse_agent_params)
        .transpose()?;
    if options.print && positionals.is_empty() && agent_params.is_none() {
        return Err(RouteError::PrintWithoutInput);
    }

    Ok(Route::Session(SessionParams {
        cost_mode: resolve_cost_mode(spec),
        git_mode: options
            .git
            .as_deref()
            .filter(|value| *value == "stage")
            .map(|_| GitMode::Stage),
        print: options.print,
        working_directory: options.cwd.clone().unwrap_or_else(|| PathBuf::from(".")),
        trace: options.trace,
        init: options.init,
        agent_id: options.agent.clone(),
        agent_params,
        initial_input: (!positionals.is_empty()).then(|| positionals.join(" ")),
    }))
}

/// First set flag in `lite > max > experimental > ask`, else `normal`.
pub fn resolve_cost_mode(spec: &InvocationSpec) -> CostMode {
    let options = &spec.options;
    [
        (options.lite, CostMode::Lite),
        (options.max, CostMode::Max),
        (options.experimental, CostMode::Experimental),
        (options.ask, CostMode::Ask),
    ]
    .into_iter()
    .find_map(|(set, mode)| set.then_some(mode))
    .unwrap_or(CostMode::Normal)
}

/// Parses structured agent parameters, which must be a JSON object.
pub fn parse_agent_params(raw: &str) -> Result<Value, RouteError> {
    let value: Value = serde_json::from_str(raw).map_err(|error| RouteError::MalformedParams {
        message: error.to_string(),
    })?;
    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Err(RouteError::ParamsNotObject { found: "null" }),
        Value::Bool(_) => Err(RouteError::ParamsNotObject { found: "a boolean" }),
        Value::Number(_) => Err(RouteError::ParamsNotObject { found: "a number" }),
        Value::String(_) => Err(RouteError::ParamsNotObject { found: "a string" }),
        Value::Array(_) => Err(RouteError::ParamsNotObject { found: "an array" }),
    }
}
