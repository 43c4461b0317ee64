//! Common CLI types shared across commands

use trendscope::SortOrder;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - human-optimized rich formatting
    #[default]
    Pretty,
    /// Table format - one row per entry
    Table,
    /// JSON format - structured for scripts
    Json,
}

/// Feed record ordering
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum SortArg {
    /// Upstream order
    #[default]
    Relevance,
    /// Alphabetical by topic
    Title,
    /// Largest approximate traffic first
    Volume,
    /// Newest first
    Recency,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Relevance => SortOrder::Relevance,
            SortArg::Title => SortOrder::Title,
            SortArg::Volume => SortOrder::Volume,
            SortArg::Recency => SortOrder::Recency,
        }
    }
}
