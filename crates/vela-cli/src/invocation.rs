use std::path::PathBuf;

use crate::Cli;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Recognized invocation options. Unset options are `None` or `false`.
pub struct InvocationOptions {
    pub create: Option<String>,
    pub agent: Option<String>,
    pub params: Option<String>,
    pub print: bool,
    pub cwd: Option<PathBuf>,
    pub trace: bool,
    pub git: Option<String>,
    pub lite: bool,
    pub max: bool,
    pub experimental: bool,
    pub ask: bool,
    pub pro: bool,
    pub init: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Immutable view of one command line: ordered positionals plus recognized options.
pub struct InvocationSpec {
    pub positionals: Vec<String>,
    pub options: InvocationOptions,
}

impl InvocationSpec {
    pub fn new(positionals: Vec<String>, options: InvocationOptions) -> Self {
        Self {
            positionals,
            options,
        }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            positionals: cli.args.clone(),
            options: InvocationOptions {
                create: cli.create.clone(),
                agent: cli.agent.clone(),
                params: cli.params.clone(),
                print: cli.print,
                cwd: cli.cwd.clone(),
                trace: cli.trace,
                git: cli.git.clone(),
                lite: cli.lite,
                max: cli.max,
                experimental: cli.experimental,
                ask: cli.ask,
                pro: cli.pro,
                init: cli.init,
            },
        }
    }
}
