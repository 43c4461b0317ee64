//! Shared CLI argument types
//!
//! Reusable argument structs that can be flattened into commands using
//! `#[command(flatten)]`.

mod common;
mod feed;
mod global;

pub use common::{OutputFormat, SortArg};
pub use feed::FeedArgs;
pub use global::GlobalOptions;
