//! Trending feed (RSS) decoder
//!
//! The feed is an RSS 2.0 document whose items carry extra `ht:` elements:
//! approximate traffic, a picture with its source, and a list of
//! `ht:news_item` blocks describing related articles.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::client::models::{NewsArticle, TrendImage, TrendRecord};
use crate::error::FetchError;

/// What to keep from each feed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedOptions {
    pub include_images: bool,
    pub include_articles: bool,
    /// Upper bound on articles kept per record
    pub max_articles: usize,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            include_images: true,
            include_articles: true,
            max_articles: 5,
        }
    }
}

#[derive(Default)]
struct ItemBuilder {
    title: Option<String>,
    traffic: String,
    pub_date: String,
    picture: Option<String>,
    picture_source: String,
    articles: Vec<NewsArticle>,
}

#[derive(Default)]
struct ArticleBuilder {
    headline: String,
    url: String,
    source: String,
    picture: Option<String>,
}

impl ItemBuilder {
    fn build(self, options: &FeedOptions) -> Option<TrendRecord> {
        let topic = self.title.filter(|t| !t.is_empty())?;
        let published = DateTime::parse_from_rfc2822(self.pub_date.trim())
            .ok()
            .map(|d| d.with_timezone(&Utc));

        let image = if options.include_images {
            self.picture.filter(|u| !u.is_empty()).map(|url| TrendImage {
                url,
                source: self.picture_source,
            })
        } else {
            None
        };

        let articles = if options.include_articles {
            let mut articles = self.articles;
            articles.truncate(options.max_articles);
            Some(articles)
        } else {
            None
        };

        Some(TrendRecord {
            topic,
            traffic: self.traffic,
            published,
            published_raw: self.pub_date,
            image,
            articles,
        })
    }
}

/// Decode a feed document into trend records, in feed order.
///
/// A document without an `<rss>` root and `<channel>` is a parse error; a
/// channel without items is simply an empty list.
pub fn parse_feed(xml: &str, options: &FeedOptions) -> Result<Vec<TrendRecord>, FetchError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut saw_rss = false;
    let mut saw_channel = false;
    let mut records = Vec::new();
    let mut item: Option<ItemBuilder> = None;
    let mut article: Option<ArticleBuilder> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                text.clear();
                match e.name().as_ref() {
                    b"rss" => saw_rss = true,
                    b"channel" => saw_channel = true,
                    b"item" => item = Some(ItemBuilder::default()),
                    b"ht:news_item" if item.is_some() => article = Some(ArticleBuilder::default()),
                    _ => {}
                }
            }
            Ok(Event::Text(t)) => {
                let chunk = t
                    .unescape()
                    .map_err(|e| FetchError::Parse(format!("Bad text in feed: {}", e)))?;
                text.push_str(&chunk);
            }
            Ok(Event::CData(c)) => {
                text.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::End(e)) => {
                let value = std::mem::take(&mut text).trim().to_string();
                match e.name().as_ref() {
                    b"item" => {
                        if let Some(done) = item.take() {
                            match done.build(options) {
                                Some(record) => records.push(record),
                                None => log::warn!("Skipping feed item without a title"),
                            }
                        }
                    }
                    b"ht:news_item" => {
                        if let (Some(current), Some(done)) = (item.as_mut(), article.take()) {
                            if !done.headline.is_empty() || !done.url.is_empty() {
                                current.articles.push(NewsArticle {
                                    headline: done.headline,
                                    url: done.url,
                                    source: done.source,
                                    image: done.picture,
                                });
                            }
                        }
                    }
                    name => {
                        if let Some(current) = article.as_mut() {
                            match name {
                                b"ht:news_item_title" => current.headline = value,
                                b"ht:news_item_url" => current.url = value,
                                b"ht:news_item_source" => current.source = value,
                                b"ht:news_item_picture" if !value.is_empty() => {
                                    current.picture = Some(value)
                                }
                                _ => {}
                            }
                        } else if let Some(current) = item.as_mut() {
                            match name {
                                b"title" => current.title = Some(value),
                                b"ht:approx_traffic" => current.traffic = value,
                                b"pubDate" => current.pub_date = value,
                                b"ht:picture" => current.picture = Some(value),
                                b"ht:picture_source" => current.picture_source = value,
                                _ => {}
                            }
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FetchError::Parse(format!(
                    "Malformed feed at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    if !saw_rss || !saw_channel {
        return Err(FetchError::Parse(
            "Feed document has no <rss><channel> root".to_string(),
        ));
    }

    log::debug!("Decoded {} feed items", records.len());
    Ok(records)
}
