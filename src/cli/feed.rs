//! Trending feed command

use trendscope::Result;

use crate::cli::args::{FeedArgs, GlobalOptions};
use crate::cli::context::CommandContext;
use crate::output;

/// Run the feed command
pub async fn run(opts: &GlobalOptions, geo: Option<&str>, args: &FeedArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let geo = geo.unwrap_or(&ctx.config.defaults.geo);
    let params = args.to_params(geo, ctx.config.defaults.max_articles);

    let records = ctx.fetcher.fetch_feed(&params, ctx.use_cache).await?;
    ctx.log_cache_stats();

    output::print(records.as_slice(), ctx.format)
}
