//! Offline section splitting for saved export files

use std::path::Path;

use trendscope::{Result, parse_sections};

use crate::cli::args::GlobalOptions;
use crate::cli::parse_section_names;
use crate::output;

/// Run the sections command
pub fn run(opts: &GlobalOptions, file: &Path, sections: &[String]) -> Result<()> {
    let wanted = parse_section_names(sections)?;
    let payload = std::fs::read_to_string(file)?;

    let parsed = parse_sections(&payload, wanted.as_deref());
    for warning in &parsed.warnings {
        log::warn!("{}", warning);
    }

    output::print(&parsed, opts.format)
}
