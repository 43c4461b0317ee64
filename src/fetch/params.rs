//! Fetch parameters and their canonical, validated forms
//!
//! `*Params` hold caller input as given. `canonicalize` validates it against
//! the lookup tables and produces a `*Query` in normalized form, which is what
//! the transport sees and what the cache key is derived from. Two parameter
//! sets that mean the same thing produce equal queries and equal keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::cache_key;
use crate::client::models::SectionName;
use crate::error::FetchError;
use crate::lookup;
use crate::parse::FeedOptions;

/// Most search terms one explore export can compare
pub const MAX_EXPLORE_QUERIES: usize = 5;

/// Ordering applied to feed records before they are returned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Source order
    #[default]
    Relevance,
    /// Topic, case-insensitive
    Title,
    /// Approximate traffic, largest first
    Volume,
    /// Newest first
    Recency,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::Title => "title",
            SortOrder::Volume => "volume",
            SortOrder::Recency => "recency",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SortOrder::Relevance),
            "title" => Ok(SortOrder::Title),
            "volume" => Ok(SortOrder::Volume),
            "recency" => Ok(SortOrder::Recency),
            other => Err(FetchError::InvalidParameter(format!(
                "Invalid sort '{}'. Expected one of: relevance, title, volume, recency",
                other
            ))),
        }
    }
}

/// Caller input for a trending feed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedParams {
    pub geo: String,
    pub options: FeedOptions,
    pub sort: SortOrder,
    /// Cap on the number of records returned
    pub limit: Option<usize>,
}

impl Default for FeedParams {
    fn default() -> Self {
        Self::new("US")
    }
}

impl FeedParams {
    pub fn new(geo: impl Into<String>) -> Self {
        Self {
            geo: geo.into(),
            options: FeedOptions::default(),
            sort: SortOrder::default(),
            limit: None,
        }
    }

    /// Same parameters for a different region
    pub fn for_geo(&self, geo: impl Into<String>) -> Self {
        Self {
            geo: geo.into(),
            ..self.clone()
        }
    }

    pub fn canonicalize(&self) -> Result<FeedQuery, FetchError> {
        let geo = lookup::validate_geo(&self.geo)?;

        if self.limit == Some(0) {
            return Err(FetchError::InvalidParameter(
                "limit must be at least 1".to_string(),
            ));
        }

        let mut options = self.options;
        if !options.include_articles {
            // Article cap is meaningless without articles
            options.max_articles = 0;
        }

        Ok(FeedQuery {
            geo,
            options,
            sort: self.sort,
            limit: self.limit,
        })
    }
}

/// Validated feed query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedQuery {
    pub geo: String,
    pub options: FeedOptions,
    pub sort: SortOrder,
    pub limit: Option<usize>,
}

impl FeedQuery {
    pub fn cache_key(&self) -> String {
        let max_articles = self.options.max_articles.to_string();
        let limit = self
            .limit
            .map(|l| l.to_string())
            .unwrap_or_else(|| "none".to_string());

        cache_key(
            "feed",
            &[
                ("geo", self.geo.as_str()),
                ("images", bool_str(self.options.include_images)),
                ("articles", bool_str(self.options.include_articles)),
                ("max_articles", max_articles.as_str()),
                ("sort", self.sort.as_str()),
                ("limit", limit.as_str()),
            ],
        )
    }
}

/// Caller input for an explore export fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreParams {
    /// Search terms to compare, at most [`MAX_EXPLORE_QUERIES`]
    pub queries: Vec<String>,
    pub geo: String,
    pub date_range: String,
    /// Category name or numeric id
    pub category: Option<String>,
    pub language: String,
    /// Sections to keep; `None` keeps everything the export holds
    pub wanted_sections: Option<Vec<SectionName>>,
}

impl Default for ExploreParams {
    fn default() -> Self {
        Self {
            queries: Vec::new(),
            geo: "US".to_string(),
            date_range: "today 12-m".to_string(),
            category: None,
            language: "en-US".to_string(),
            wanted_sections: None,
        }
    }
}

impl ExploreParams {
    pub fn new<I, S>(queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queries: queries.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Same parameters for a single different search term
    pub fn for_query(&self, query: impl Into<String>) -> Self {
        Self {
            queries: vec![query.into()],
            ..self.clone()
        }
    }

    pub fn canonicalize(&self) -> Result<ExploreQuery, FetchError> {
        if self.queries.len() > MAX_EXPLORE_QUERIES {
            return Err(FetchError::InvalidParameter(format!(
                "At most {} queries can be compared at once, got {}",
                MAX_EXPLORE_QUERIES,
                self.queries.len()
            )));
        }

        let mut queries = Vec::with_capacity(self.queries.len());
        for query in &self.queries {
            let query = query.trim();
            if query.is_empty() {
                return Err(FetchError::InvalidParameter(
                    "Search queries must not be empty".to_string(),
                ));
            }
            if query.contains(',') {
                return Err(FetchError::InvalidParameter(format!(
                    "Search query '{}' must not contain a comma",
                    query
                )));
            }
            queries.push(query.to_string());
        }

        let category = match &self.category {
            Some(c) => lookup::validate_explore_category(c)?,
            None => None,
        };

        if queries.is_empty() && category.is_none() {
            return Err(FetchError::InvalidParameter(
                "Provide at least one search query or a category".to_string(),
            ));
        }

        let sections = self.wanted_sections.as_ref().map(|wanted| {
            let mut wanted = wanted.clone();
            wanted.sort();
            wanted.dedup();
            wanted
        });

        Ok(ExploreQuery {
            queries,
            geo: lookup::validate_geo(&self.geo)?,
            date_range: lookup::validate_date_range(&self.date_range)?,
            category,
            language: lookup::validate_language(&self.language)?,
            sections,
        })
    }
}

/// Validated explore query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExploreQuery {
    pub queries: Vec<String>,
    pub geo: String,
    pub date_range: String,
    pub category: Option<u32>,
    pub language: String,
    /// Sorted and deduplicated
    pub sections: Option<Vec<SectionName>>,
}

impl ExploreQuery {
    /// Queries in the comma-joined form the export endpoint expects
    pub fn joined_queries(&self) -> String {
        self.queries.join(",")
    }

    pub fn cache_key(&self) -> String {
        let queries = self.joined_queries();
        let category = self
            .category
            .map(|c| c.to_string())
            .unwrap_or_else(|| "all".to_string());
        let sections = match &self.sections {
            Some(names) => names
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>()
                .join(","),
            None => "all".to_string(),
        };

        cache_key(
            "explore",
            &[
                ("q", queries.as_str()),
                ("geo", self.geo.as_str()),
                ("date", self.date_range.as_str()),
                ("cat", category.as_str()),
                ("hl", self.language.as_str()),
                ("sections", sections.as_str()),
            ],
        )
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
