//! Where feeds and article details come from.

use crate::error::{Error, Result};
use crate::feed::{ArticleDetail, Feed};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A provider of the article feed and of article details.
///
/// Implementations report a missing article as [`Error::NotFound`]; any other
/// error is treated as a load failure by [`crate::DetailPage`].
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_feed(&self) -> Result<Feed>;

    async fn fetch_article(&self, id: &str) -> Result<ArticleDetail>;
}

/// An [`ArticleSource`] serving JSON documents held in memory.
///
/// Documents are decoded on every fetch, the way a remote source would hand
/// back fresh bytes each time.
#[derive(Debug, Default)]
pub struct StaticSource {
    feed_json: String,
    articles: HashMap<String, String>,
    latency: Option<Duration>,
    fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new(feed_json: impl Into<String>) -> StaticSource {
        StaticSource {
            feed_json: feed_json.into(),
            ..Default::default()
        }
    }

    /// Serve `detail_json` for `id`.
    pub fn with_article(mut self, id: impl Into<String>, detail_json: impl Into<String>) -> Self {
        self.articles.insert(id.into(), detail_json.into());
        self
    }

    /// Delay every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of fetches served so far, feed and articles combined.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    async fn round_trip(&self) {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ArticleSource for StaticSource {
    async fn fetch_feed(&self) -> Result<Feed> {
        self.round_trip().await;
        Feed::from_json(&self.feed_json)
    }

    async fn fetch_article(&self, id: &str) -> Result<ArticleDetail> {
        self.round_trip().await;
        match self.articles.get(id) {
            Some(json) => ArticleDetail::from_json(json),
            None => Err(Error::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> StaticSource {
        StaticSource::new(r#"[{ "info1": ["News"] }, { "id": 1, "title": "One", "type": "News" }]"#)
            .with_article("1", r#"{ "id": 1, "title": "One", "content": ["<p>Hi.</p>"] }"#)
            .with_article("2", "not json")
    }

    #[tokio::test]
    async fn serves_feed_and_articles() {
        let source = source();
        let feed = source.fetch_feed().await.unwrap();
        assert_eq!(feed.articles.len(), 1);
        let detail = source.fetch_article("1").await.unwrap();
        assert_eq!(detail.content, vec!["<p>Hi.</p>".to_string()]);
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found_and_bad_json_is_an_error() {
        let source = source();
        assert_eq!(
            source.fetch_article("9").await,
            Err(Error::NotFound("9".to_string()))
        );
        assert!(matches!(source.fetch_article("2").await, Err(Error::Json(_))));
    }
}
