//! Output rendering for CLI results

pub mod json;
pub mod pretty;
pub mod table;

use trendscope::{ExploreSections, TrendRecord};

use crate::cli::OutputFormat;
use trendscope::Result;

/// Types the CLI can print in every output format
pub trait Formattable {
    fn format(&self, format: OutputFormat) -> Result<String>;
}

impl Formattable for [TrendRecord] {
    fn format(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Json => json::format_json(self)?,
            OutputFormat::Table => table::format_table(&table::trend_rows(self)),
            OutputFormat::Pretty => pretty::trends(self),
        })
    }
}

impl Formattable for ExploreSections {
    fn format(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Json => json::format_json(self)?,
            OutputFormat::Table => table::format_sections(self),
            OutputFormat::Pretty => pretty::sections(self),
        })
    }
}

/// Format and print data to stdout
pub fn print<T: Formattable + ?Sized>(data: &T, format: OutputFormat) -> Result<()> {
    let output = data.format(format)?;
    println!("{}", output);
    Ok(())
}
