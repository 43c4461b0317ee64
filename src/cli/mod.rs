//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trendscope::{FetchError, Result, SectionName};

pub mod args;
pub mod batch;
pub mod config;
pub mod context;
pub mod explore;
pub mod feed;
pub mod sections;

pub use args::{FeedArgs, OutputFormat};

/// trendscope - trending topics and explore exports from the command line
#[derive(Parser, Debug)]
#[command(name = "trendscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "TRENDSCOPE_FORMAT",
        default_value = "pretty",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "TRENDSCOPE_CONFIG", hide_env = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, env = "TRENDSCOPE_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass the result cache
    #[arg(long, global = true, env = "TRENDSCOPE_NO_CACHE", hide_env = true)]
    pub no_cache: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show trending topics for one region
    Feed {
        /// Region code, e.g. US, GB or US-CA (defaults to config)
        #[arg(long, short = 'g')]
        geo: Option<String>,

        #[command(flatten)]
        feed: FeedArgs,
    },

    /// Fetch trending topics for several regions at once
    Batch {
        /// Region codes
        #[arg(required = true, value_name = "GEO")]
        geos: Vec<String>,

        /// Regions fetched at the same time (defaults to config)
        #[arg(long, short = 'c')]
        concurrency: Option<usize>,

        /// Fetch one region at a time, in order
        #[arg(long)]
        serial: bool,

        /// Pause between regions in serial mode, in milliseconds (defaults to config)
        #[arg(long, value_name = "MS", requires = "serial")]
        delay_ms: Option<u64>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,

        #[command(flatten)]
        feed: FeedArgs,
    },

    /// Compare search interest for up to five terms
    Explore {
        /// Search terms
        #[arg(value_name = "QUERY")]
        queries: Vec<String>,

        /// Region code (defaults to config)
        #[arg(long, short = 'g')]
        geo: Option<String>,

        /// Preset like "today 12-m" or a range "YYYY-MM-DD YYYY-MM-DD"
        #[arg(long, default_value = "today 12-m")]
        date_range: String,

        /// Category name or numeric id
        #[arg(long)]
        category: Option<String>,

        /// Interface language, e.g. en-US
        #[arg(long, default_value = "en-US")]
        language: String,

        /// Only keep these sections (repeatable)
        #[arg(long = "section", value_name = "NAME")]
        sections: Vec<String>,
    },

    /// Split a saved export file into its sections
    Sections {
        /// Export file to read
        file: PathBuf,

        /// Only keep these sections (repeatable)
        #[arg(long = "section", value_name = "NAME")]
        sections: Vec<String>,
    },

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show {
        /// Fail if the configuration file does not exist
        #[arg(long)]
        strict: bool,
    },

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file location
    Path,
}

/// Parse `--section` values into section names.
pub fn parse_section_names(names: &[String]) -> Result<Option<Vec<SectionName>>> {
    if names.is_empty() {
        return Ok(None);
    }

    let mut parsed = Vec::with_capacity(names.len());
    for name in names {
        let section = name
            .parse::<SectionName>()
            .map_err(FetchError::InvalidParameter)?;
        parsed.push(section);
    }
    Ok(Some(parsed))
}
