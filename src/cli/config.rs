//! Configuration file commands

use colored::Colorize;
use trendscope::error::ConfigError;
use trendscope::{Config, Error, Result};

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::output::json::format_json;

fn resolve_path(opts: &GlobalOptions) -> Result<std::path::PathBuf> {
    match &opts.config {
        Some(path) => Ok(path.clone()),
        None => Config::default_path(),
    }
}

/// Print the effective configuration
pub fn show(opts: &GlobalOptions, strict: bool) -> Result<()> {
    let path = resolve_path(opts)?;
    let config = if strict {
        Config::load_from(&path)?
    } else {
        Config::load_or_default(Some(path.as_path()))?
    };

    match opts.format {
        OutputFormat::Json => println!("{}", format_json(&config)?),
        _ => {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| Error::Other(format!("Failed to render configuration: {}", e)))?;
            print!("{}", yaml);
        }
    }
    Ok(())
}

/// Write a configuration file with default values
pub fn init(opts: &GlobalOptions, force: bool) -> Result<()> {
    let path = resolve_path(opts)?;
    if path.exists() && !force {
        return Err(ConfigError::Invalid(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ))
        .into());
    }

    Config::default().save_to(&path)?;
    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}

/// Print the configuration file location
pub fn path(opts: &GlobalOptions) -> Result<()> {
    println!("{}", resolve_path(opts)?.display());
    Ok(())
}
