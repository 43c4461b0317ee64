//! Feed shaping flags shared by `feed` and `batch`

use clap::Args;
use trendscope::{FeedOptions, FeedParams};

use super::SortArg;

#[derive(Debug, Clone, Args)]
pub struct FeedArgs {
    /// Related articles to keep per topic (defaults to config)
    #[arg(long, value_name = "N")]
    pub max_articles: Option<usize>,

    /// Drop topic images
    #[arg(long)]
    pub no_images: bool,

    /// Drop related articles
    #[arg(long)]
    pub no_articles: bool,

    /// Order of returned topics
    #[arg(long, value_enum, default_value_t = SortArg::Relevance)]
    pub sort: SortArg,

    /// Return at most N topics
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

impl FeedArgs {
    /// Feed parameters for `geo`, with `default_max_articles` when unset
    pub fn to_params(&self, geo: &str, default_max_articles: usize) -> FeedParams {
        FeedParams {
            geo: geo.to_string(),
            options: FeedOptions {
                include_images: !self.no_images,
                include_articles: !self.no_articles,
                max_articles: self.max_articles.unwrap_or(default_max_articles),
            },
            sort: self.sort.into(),
            limit: self.limit,
        }
    }
}
