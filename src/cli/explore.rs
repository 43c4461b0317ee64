//! Explore export command

use trendscope::{ExploreParams, Result};

use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::cli::parse_section_names;
use crate::output;

/// Explore command flags, as given
pub struct ExploreArgs<'a> {
    pub queries: &'a [String],
    pub geo: Option<&'a str>,
    pub date_range: &'a str,
    pub category: Option<&'a str>,
    pub language: &'a str,
    pub sections: &'a [String],
}

/// Run the explore command
pub async fn run(opts: &GlobalOptions, args: ExploreArgs<'_>) -> Result<()> {
    let wanted_sections = parse_section_names(args.sections)?;
    let ctx = CommandContext::new(opts)?;

    let params = ExploreParams {
        queries: args.queries.to_vec(),
        geo: args.geo.unwrap_or(&ctx.config.defaults.geo).to_string(),
        date_range: args.date_range.to_string(),
        category: args.category.map(str::to_string),
        language: args.language.to_string(),
        wanted_sections,
    };

    let sections = ctx.fetcher.fetch_explore(&params, ctx.use_cache).await?;
    ctx.log_cache_stats();

    output::print(&sections, ctx.format)
}
