//! Global CLI options shared across all commands

use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.trendscope/config.yaml)
    pub config: Option<PathBuf>,

    /// Bypass the result cache
    pub no_cache: bool,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            no_cache: cli.no_cache,
        }
    }
}
