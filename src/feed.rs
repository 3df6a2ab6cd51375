//! The article feed and article detail shapes served by the news API.
//!
//! The feed is a JSON array whose first element is metadata (`info1` holds
//! the category order) and whose remaining elements are article summaries.
//! A detail is a single object whose `content` is an array of raw HTML
//! fragments, the input of [`crate::chunk_article`].

use crate::error::{Error, Result};
use crate::models::{ChunkOptions, ChunkedArticle};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Article ids arrive as numbers in some feeds and strings in others.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleId::Number(n) => write!(f, "{}", n),
            ArticleId::Text(s) => f.write_str(s),
        }
    }
}

impl ArticleId {
    /// Ids compare by their textual form, so `7` matches `"7"`.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            ArticleId::Number(n) => key.trim().parse::<u64>().is_ok_and(|k| k == *n),
            ArticleId::Text(s) => s == key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedMetadata {
    /// Category names in menu order.
    #[serde(default)]
    pub info1: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: ArticleId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub create_time: Option<String>,
    /// Keys this crate does not interpret, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feed {
    pub metadata: FeedMetadata,
    pub articles: Vec<ArticleSummary>,
}

impl Feed {
    /// Decode a feed.  Summaries that do not decode are skipped with a
    /// warning; an empty array or a non-array is an error.
    pub fn from_json(json: &str) -> Result<Feed> {
        let entries: Vec<Value> = serde_json::from_str(json)?;
        let mut entries = entries.into_iter();
        let metadata = match entries.next() {
            Some(first) => serde_json::from_value::<FeedMetadata>(first)
                .map_err(|e| Error::MalformedFeed(format!("bad metadata entry: {}", e)))?,
            None => return Err(Error::MalformedFeed("feed array is empty".into())),
        };
        let articles = entries
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value::<ArticleSummary>(entry) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    log::warn!("skipping feed entry {}: {}", i + 1, e);
                    None
                }
            })
            .collect();
        Ok(Feed { metadata, articles })
    }

    /// Category names: the metadata order first, then any other article
    /// types in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.metadata
            .info1
            .iter()
            .map(String::as_str)
            .chain(self.articles.iter().map(|a| a.category.as_str()))
            .filter(|c| !c.is_empty() && seen.insert(*c))
            .collect()
    }

    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ArticleSummary> + 'a {
        self.articles.iter().filter(move |a| a.category == category)
    }

    pub fn find(&self, id: &str) -> Option<&ArticleSummary> {
        self.articles.iter().find(|a| a.id.matches(id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    pub id: ArticleId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub create_time: Option<String>,
    /// Raw HTML fragments.
    #[serde(default)]
    pub content: Vec<String>,
}

impl ArticleDetail {
    pub fn from_json(json: &str) -> Result<ArticleDetail> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run the chunking pipeline over this article's content.
    pub fn chunk(&self, options: &ChunkOptions) -> ChunkedArticle {
        crate::chunk_article(&self.content, options)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) => Some(s),
        Some(Scalar::Number(n)) => Some(n.to_string()),
        None => None,
    })
}
