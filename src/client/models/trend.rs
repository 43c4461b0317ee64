//! Trending topic models decoded from the feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One trending topic from the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    /// Topic label as shown upstream
    pub topic: String,

    /// Coarse popularity indicator, e.g. "2,000+"
    pub traffic: String,

    /// Publication time, when the feed's timestamp could be parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,

    /// Publication time exactly as the feed gave it
    pub published_raw: String,

    /// Representative image (absent when not requested or not provided)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<TrendImage>,

    /// Related articles in source order (absent when not requested)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<NewsArticle>>,
}

impl TrendRecord {
    /// Approximate search volume parsed from `traffic`.
    ///
    /// Understands "200+", "2,000+", "10K+" and "1M+". Returns `None` for
    /// anything else. Volumes too large for `u64` saturate.
    pub fn traffic_volume(&self) -> Option<u64> {
        let text = self.traffic.trim().trim_end_matches('+').replace(',', "");
        let (digits, multiplier) = match text.chars().last()? {
            'K' | 'k' => (&text[..text.len() - 1], 1_000),
            'M' | 'm' => (&text[..text.len() - 1], 1_000_000),
            _ => (text.as_str(), 1),
        };
        digits.trim().parse::<u64>().ok().map(|n| n.saturating_mul(multiplier))
    }
}

/// Image attached to a trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendImage {
    pub url: String,

    /// Publisher credited for the image
    #[serde(default)]
    pub source: String,
}

/// News article related to a trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub headline: String,
    pub url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(traffic: &str) -> TrendRecord {
        TrendRecord {
            topic: "topic".to_string(),
            traffic: traffic.to_string(),
            published: None,
            published_raw: String::new(),
            image: None,
            articles: None,
        }
    }

    #[test]
    fn test_traffic_volume() {
        assert_eq!(record("200+").traffic_volume(), Some(200));
        assert_eq!(record("2,000+").traffic_volume(), Some(2_000));
        assert_eq!(record("10K+").traffic_volume(), Some(10_000));
        assert_eq!(record("1M+").traffic_volume(), Some(1_000_000));
        assert_eq!(record("lots").traffic_volume(), None);
        assert_eq!(record("").traffic_volume(), None);
    }

    #[test]
    fn test_traffic_volume_saturates() {
        assert_eq!(
            record("99999999999999999M+").traffic_volume(),
            Some(u64::MAX)
        );
        assert!(record("99999999999999999M+").traffic_volume() > record("5M+").traffic_volume());
    }

    #[test]
    fn test_optional_fields_skipped_in_json() {
        let json = serde_json::to_value(record("100+")).unwrap();
        assert!(json.get("image").is_none());
        assert!(json.get("articles").is_none());
    }
}
