//! Payload decoders for the two upstream formats

pub mod feed;
pub mod sections;

pub use feed::{FeedOptions, parse_feed};
pub use sections::parse_sections;
