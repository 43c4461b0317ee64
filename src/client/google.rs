//! HTTP transport for the Google Trends feed and explore export

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};

use super::TrendsTransport;
use super::rate_limit::{EndpointKind, RateLimiterSet};
use crate::config::NetworkSettings;
use crate::error::FetchError;
use crate::fetch::ExploreQuery;

/// reqwest-backed transport
pub struct GoogleTrendsClient {
    http: HttpClient,
    feed_url: String,
    export_url: String,
    limiters: RateLimiterSet,
}

impl GoogleTrendsClient {
    /// Create a client with its own connection pool
    pub fn new(settings: &NetworkSettings) -> Result<Self, FetchError> {
        let http = HttpClient::builder()
            .timeout(settings.request_timeout())
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Download(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_http_client(http, settings))
    }

    /// Create a client on top of a caller-owned connection pool.
    ///
    /// Timeout and user agent are whatever `http` was built with.
    pub fn with_http_client(http: HttpClient, settings: &NetworkSettings) -> Self {
        Self {
            http,
            feed_url: settings.feed_url.clone(),
            export_url: settings.export_url.clone(),
            limiters: RateLimiterSet::new(settings.requests_per_second),
        }
    }

    async fn get_text(
        &self,
        kind: EndpointKind,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<String, FetchError> {
        self.limiters.wait_for(kind).await;

        log::debug!("GET {} {:?}", url, query);
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        match status {
            status if status.is_success() => response
                .text()
                .await
                .map_err(|e| FetchError::Download(format!("Failed to read response body: {}", e))),
            StatusCode::TOO_MANY_REQUESTS | StatusCode::FORBIDDEN => {
                self.limiters.activate(kind);
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(FetchError::RateLimit {
                    status: status.as_u16(),
                    retry_after,
                })
            }
            _ => Err(FetchError::Download(format!(
                "Unexpected status {} from {}",
                status, url
            ))),
        }
    }
}

#[async_trait]
impl TrendsTransport for GoogleTrendsClient {
    async fn fetch_feed(&self, geo: &str) -> Result<String, FetchError> {
        self.get_text(EndpointKind::Feed, &self.feed_url, &[("geo", geo)])
            .await
    }

    async fn fetch_export(&self, query: &ExploreQuery) -> Result<String, FetchError> {
        let queries = query.joined_queries();
        let category = query.category.map(|c| c.to_string());

        let mut params = vec![
            ("q", queries.as_str()),
            ("date", query.date_range.as_str()),
            ("geo", query.geo.as_str()),
            ("hl", query.language.as_str()),
        ];
        if let Some(cat) = &category {
            params.push(("cat", cat.as_str()));
        }

        self.get_text(EndpointKind::Export, &self.export_url, &params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GoogleTrendsClient::new(&NetworkSettings::default());
        assert!(client.is_ok());
    }

    #[cfg(feature = "http-tests")]
    mod http {
        use super::*;
        use crate::fetch::ExploreParams;
        use mockito::Matcher;

        fn settings(server: &mockito::ServerGuard) -> NetworkSettings {
            NetworkSettings {
                feed_url: format!("{}/trending/rss", server.url()),
                export_url: format!("{}/explore/csv", server.url()),
                ..NetworkSettings::default()
            }
        }

        #[tokio::test]
        async fn test_feed_success() {
            let mut server = mockito::Server::new_async().await;
            let mock = server
                .mock("GET", "/trending/rss")
                .match_query(Matcher::UrlEncoded("geo".into(), "GB".into()))
                .with_status(200)
                .with_body("<rss><channel></channel></rss>")
                .create_async()
                .await;

            let client = GoogleTrendsClient::new(&settings(&server)).unwrap();
            let body = client.fetch_feed("GB").await.unwrap();

            assert_eq!(body, "<rss><channel></channel></rss>");
            mock.assert_async().await;
        }

        #[tokio::test]
        async fn test_throttling_statuses_are_rate_limits() {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("GET", "/trending/rss")
                .match_query(Matcher::Any)
                .with_status(429)
                .with_header("retry-after", "12")
                .create_async()
                .await;

            let client = GoogleTrendsClient::new(&settings(&server)).unwrap();
            let err = client.fetch_feed("US").await.unwrap_err();

            assert_eq!(
                err,
                FetchError::RateLimit {
                    status: 429,
                    retry_after: Some(Duration::from_secs(12)),
                }
            );
            assert!(client.limiters.is_active(EndpointKind::Feed));
            assert!(!client.limiters.is_active(EndpointKind::Export));

            let mut server = mockito::Server::new_async().await;
            server
                .mock("GET", "/trending/rss")
                .match_query(Matcher::Any)
                .with_status(403)
                .create_async()
                .await;

            let client = GoogleTrendsClient::new(&settings(&server)).unwrap();
            let err = client.fetch_feed("US").await.unwrap_err();
            assert!(err.is_rate_limit());
        }

        #[tokio::test]
        async fn test_server_error_is_download() {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("GET", "/trending/rss")
                .match_query(Matcher::Any)
                .with_status(500)
                .create_async()
                .await;

            let client = GoogleTrendsClient::new(&settings(&server)).unwrap();
            let err = client.fetch_feed("US").await.unwrap_err();

            assert!(matches!(err, FetchError::Download(_)));
            assert!(!err.is_rate_limit());
        }

        #[tokio::test]
        async fn test_export_query_parameters() {
            let mut server = mockito::Server::new_async().await;
            let mock = server
                .mock("GET", "/explore/csv")
                .match_query(Matcher::AllOf(vec![
                    Matcher::UrlEncoded("q".into(), "rust,go".into()),
                    Matcher::UrlEncoded("date".into(), "today 3-m".into()),
                    Matcher::UrlEncoded("geo".into(), "US".into()),
                    Matcher::UrlEncoded("hl".into(), "en-US".into()),
                    Matcher::UrlEncoded("cat".into(), "7".into()),
                ]))
                .with_status(200)
                .with_body("Interest over time\nWeek,rust\n")
                .create_async()
                .await;

            let mut params = ExploreParams::new(["rust", "go"]);
            params.date_range = "today 3-m".to_string();
            params.category = Some("finance".to_string());
            let query = params.canonicalize().unwrap();

            let client = GoogleTrendsClient::new(&settings(&server)).unwrap();
            client.fetch_export(&query).await.unwrap();
            mock.assert_async().await;
        }

        #[tokio::test]
        async fn test_connection_refused_is_download() {
            let settings = NetworkSettings {
                feed_url: "http://127.0.0.1:9/trending/rss".to_string(),
                timeout_secs: 2,
                ..NetworkSettings::default()
            };
            let client = GoogleTrendsClient::new(&settings).unwrap();
            let err = client.fetch_feed("US").await.unwrap_err();
            assert!(matches!(err, FetchError::Download(_)));
        }
    }
}
