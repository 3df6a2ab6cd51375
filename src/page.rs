//! Site-wide state and the article detail page.
//!
//! A [`SiteContext`] is built once and shared (behind an `Arc`) by every page.
//! It owns the injected [`ArticleSource`], the [`SiteConfig`], the feed (loaded
//! at most once; pages that need it await the same load) and a cache of
//! article details.

use crate::cache::LoadCache;
use crate::error::{Error, Result};
use crate::feed::{ArticleDetail, Feed};
use crate::models::{ChunkOptions, PageLayout};
use crate::placement::{place, Placement};
use crate::source::ArticleSource;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

const DEFAULT_PAGE_TEMPLATE: &str = concat!(
    r#"<div class="article-content">"#,
    r#"<div class="article-item"></div>"#,
    r#"<div class="article-item"></div>"#,
    r#"<div class="article-item"></div>"#,
    r#"<div class="article-item"></div>"#,
    r#"<div class="article-item"></div>"#,
    "</div>"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub chunking: ChunkOptions,
    pub layout: PageLayout,
    /// Detail page markup containing the placeholder slots.
    pub page_template: String,
    /// Give up on a fetch after this many milliseconds. `None` waits forever.
    pub fetch_timeout_ms: Option<u64>,
    /// How long a loaded article detail is reused. `None` keeps it for the
    /// life of the context.
    pub detail_ttl_secs: Option<u64>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            chunking: ChunkOptions::default(),
            layout: PageLayout::default(),
            page_template: DEFAULT_PAGE_TEMPLATE.to_string(),
            fetch_timeout_ms: Some(10_000),
            detail_ttl_secs: Some(300),
        }
    }
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<SiteConfig> {
        let config: SiteConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.layout.validate()?;
        if self.fetch_timeout_ms == Some(0) {
            return Err(Error::InvalidOptions("fetch_timeout_ms must be positive".into()));
        }
        Ok(())
    }
}

pub struct SiteContext {
    source: Arc<dyn ArticleSource>,
    config: SiteConfig,
    feed: OnceCell<Feed>,
    details: LoadCache<String, ArticleDetail>,
}

impl SiteContext {
    pub fn new(source: Arc<dyn ArticleSource>, config: SiteConfig) -> SiteContext {
        let ttl = config.detail_ttl_secs.map(Duration::from_secs);
        SiteContext {
            source,
            config,
            feed: OnceCell::new(),
            details: LoadCache::new(ttl),
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// The feed, loading it on first use.
    ///
    /// Concurrent callers wait on the one load. A failed load is not kept, so
    /// a later call tries again.
    pub async fn feed(&self) -> Result<&Feed> {
        self.feed
            .get_or_try_init(|| self.bounded(self.source.fetch_feed()))
            .await
    }

    /// An article detail, served from the cache while it is fresh.
    pub async fn article(&self, id: &str) -> Result<ArticleDetail> {
        self.details
            .get_or_load(id.to_string(), || self.bounded(self.source.fetch_article(id)))
            .await
    }

    /// Drop the cached detail for `id` so the next request refetches it.
    pub async fn forget_article(&self, id: &str) {
        self.details.invalidate(&id.to_string()).await;
    }

    async fn bounded<T>(&self, fetch: impl Future<Output = Result<T>>) -> Result<T> {
        match self.config.fetch_timeout_ms {
            Some(ms) => tokio::time::timeout(Duration::from_millis(ms), fetch)
                .await
                .map_err(|_| Error::Timeout(ms))?,
            None => fetch.await,
        }
    }
}

/// What a detail page shows.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedPage {
    Article {
        id: String,
        title: String,
        author: Option<String>,
        source: Option<String>,
        create_time: Option<String>,
        /// The article's type from the feed, if the feed lists it.
        category: Option<String>,
        placement: Placement,
    },
    NotFound {
        id: String,
    },
    Failed {
        message: String,
    },
}

impl RenderedPage {
    /// The headline shown to the reader.
    pub fn headline(&self) -> &str {
        match self {
            RenderedPage::Article { title, .. } => title.as_str(),
            RenderedPage::NotFound { .. } => "Article Not Found",
            RenderedPage::Failed { .. } => "Failed to Load",
        }
    }

    /// The page body markup. Error states have none.
    pub fn html(&self) -> Option<&str> {
        match self {
            RenderedPage::Article { placement, .. } => Some(&placement.html),
            _ => None,
        }
    }
}

/// Renders one article into the site's page template.
pub struct DetailPage {
    site: Arc<SiteContext>,
}

impl DetailPage {
    pub fn new(site: Arc<SiteContext>) -> DetailPage {
        DetailPage { site }
    }

    /// Load, chunk and place article `id`.
    ///
    /// A feed that fails to load only costs the category label; a detail
    /// that fails to load yields [`RenderedPage::NotFound`] or
    /// [`RenderedPage::Failed`]. Nothing is retried.
    pub async fn render(&self, id: &str) -> RenderedPage {
        let detail = match self.site.article(id).await {
            Ok(detail) => detail,
            Err(Error::NotFound(_)) => {
                log::debug!("article {} not found", id);
                return RenderedPage::NotFound { id: id.to_string() };
            }
            Err(e) => {
                log::warn!("failed to load article {}: {}", id, e);
                return RenderedPage::Failed {
                    message: e.to_string(),
                };
            }
        };

        let category = match self.site.feed().await {
            Ok(feed) => feed
                .find(id)
                .map(|summary| summary.category.clone())
                .filter(|c| !c.is_empty()),
            Err(e) => {
                log::warn!("feed unavailable while rendering {}: {}", id, e);
                None
            }
        };

        let config = self.site.config();
        let article = detail.chunk(&config.chunking);
        let placement = place(&config.page_template, &article, &config.layout);

        RenderedPage::Article {
            id: id.to_string(),
            title: detail.title,
            author: detail.author,
            source: detail.source,
            create_time: detail.create_time,
            category,
            placement,
        }
    }
}
