use std::path::PathBuf;

use clap::{ArgAction, Parser};

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "vela",
    about = "Interactive coding assistant backed by Gemini models",
    version
)]
/// Public struct `Cli` used across Vela components.
pub struct Cli {
    #[arg(
        value_name = "ARGS",
        help = "Initial prompt text, or a reserved command: publish <names...>, init-agents, save-agent <ids...>"
    )]
    pub args: Vec<String>,

    #[arg(
        long,
        value_name = "TEMPLATE",
        help = "Scaffold a new project from TEMPLATE into [DIR] (default .) named [NAME] (default TEMPLATE)"
    )]
    pub create: Option<String>,

    #[arg(long, value_name = "ID", help = "Start the session with a local agent definition")]
    pub agent: Option<String>,

    #[arg(
        long,
        value_name = "JSON",
        help = "Structured agent parameters as a JSON object, passed through to the session"
    )]
    pub params: Option<String>,

    #[arg(
        long,
        help = "Run one prompt non-interactively and print the result (requires ARGS or --params)"
    )]
    pub print: bool,

    #[arg(long, value_name = "PATH", help = "Working directory for the session")]
    pub cwd: Option<PathBuf>,

    #[arg(long, help = "Enable debug-level diagnostics on stderr")]
    pub trace: bool,

    #[arg(
        long,
        value_name = "MODE",
        help = "Git integration mode; only 'stage' enables staging of edits"
    )]
    pub git: Option<String>,

    #[arg(long, help = "Use the lite cost mode")]
    pub lite: bool,

    #[arg(long, help = "Use the max cost mode")]
    pub max: bool,

    #[arg(long, help = "Use the experimental cost mode")]
    pub experimental: bool,

    #[arg(long, help = "Use the ask cost mode (answers only, no edits)")]
    pub ask: bool,

    #[arg(long, hide = true, help = "Removed; use --max instead")]
    pub pro: bool,

    #[arg(long, help = "Initialize project files before the session starts")]
    pub init: bool,

    #[arg(
        long = "google-api-base",
        env = "VELA_GOOGLE_API_BASE",
        default_value = "https://generativelanguage.googleapis.com/v1beta",
        help = "Base URL of the Google Generative Language API used for credential validation and model discovery"
    )]
    pub google_api_base: String,

    #[arg(
        long = "request-timeout-ms",
        env = "VELA_REQUEST_TIMEOUT_MS",
        default_value_t = 15_000,
        value_parser = parse_positive_u64,
        help = "Per-request HTTP timeout in milliseconds"
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long = "min-model-version",
        env = "VELA_MIN_MODEL_VERSION",
        default_value = "2.5",
        help = "Lowest model version (<major>.<minor>) offered for selection"
    )]
    pub min_model_version: String,

    #[arg(
        long,
        env = "VELA_MODEL",
        value_name = "IDENTIFIER",
        help = "Preselect a model identifier; used when it meets the version floor"
    )]
    pub model: Option<String>,

    #[arg(
        long = "agents-dir",
        env = "VELA_AGENTS_DIR",
        default_value = ".agents",
        help = "Directory of local agent definitions, relative to the working directory"
    )]
    pub agents_dir: PathBuf,

    #[arg(
        long = "state-dir",
        env = "VELA_STATE_DIR",
        default_value = ".vela",
        help = "Directory for process records and publish bundles, relative to the working directory"
    )]
    pub state_dir: PathBuf,

    #[arg(
        long = "agent-library",
        env = "VELA_AGENT_LIBRARY",
        default_value = ".vela/agent-library",
        help = "Destination directory for save-agent, relative to the working directory"
    )]
    pub agent_library: PathBuf,

    #[arg(
        long = "no-credential-prompt",
        env = "VELA_NO_CREDENTIAL_PROMPT",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Never prompt for an API key; rely on GEMINI_API_KEY or GOOGLE_API_KEY only"
    )]
    pub no_credential_prompt: bool,
}
