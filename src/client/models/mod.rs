//! Result models produced by the fetchers

mod explore;
mod trend;

pub use explore::{Cell, ExploreSection, ExploreSections, SectionName};
pub use trend::{NewsArticle, TrendImage, TrendRecord};
