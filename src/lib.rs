//! Re-chunks raw article HTML into a fixed number of target-length
//! paragraphs and places them into the placeholder slots of a detail page.
//!
//! ## Quick start
//!
//! ```rust
//! use article_chunker::{chunk_article, place, ChunkOptions, PageLayout};
//!
//! let content = vec![
//!     "<p>Sentence one. Sentence two. </p><img src='a.png'/><p>Sentence three.</p>".to_string(),
//! ];
//! let article = chunk_article(&content, &ChunkOptions::default());
//! let set = article.chunk_set().unwrap();
//! assert_eq!(set.paragraphs.len(), 1);
//! assert_eq!(
//!     set.chunks[0].to_html(),
//!     r#"<img src="a.png"><p>Sentence one. Sentence two. Sentence three.</p>"#
//! );
//!
//! let page = r#"<div class="article-item"></div><div class="article-item"></div>"#;
//! let placed = place(page, &article, &PageLayout::default());
//! assert_eq!(placed.slots_filled, 1);
//! ```
//!
//! ## Module layout
//!
//! * **Top level** – [`chunk_article`] runs the pipeline, [`place`] writes its
//!   output into a page.  [`ChunkOptions`] and [`PageLayout`] are the
//!   configuration, [`ChunkedArticle`] / [`ChunkSet`] the result.
//! * [`stages`] – the individual pipeline stages (tokenizer, sentence
//!   splitter, paragraph packer, leftover reconciler, chunk assembler).
//! * [`parser`] – wrappers around the HTML parser and the conversion into the
//!   crate's owned [`Node`] AST.
//! * [`feed`], [`cache`], [`source`], [`page`] – the async layer that loads
//!   articles and drives a detail page.

#[macro_use]
mod logging;

mod chunker;
mod error;
mod models;
mod node;
mod node_utils;
mod placement;
mod utils;

pub mod cache;
pub mod feed;
pub mod page;
pub mod source;

pub use error::{Error, Result};
pub use feed::{ArticleDetail, ArticleId, ArticleSummary, Feed, FeedMetadata};
pub use logging::logger::DebugLogsCategories;
pub use models::{
    Chunk, ChunkOptions, ChunkSet, ChunkedArticle, ImagePolicy, OverflowMode, PageLayout,
    Paragraph, TerminatorSet,
};
pub use node::{fragment_text, fragment_to_html, Element, Node};
pub use page::{DetailPage, RenderedPage, SiteConfig, SiteContext};
pub use placement::{place, Placement};
pub use source::{ArticleSource, StaticSource};

/// The individual pipeline stages, for callers that need intermediate results.
pub mod stages {
    pub use crate::chunker::{
        assemble, pack, reconcile, split_sentences, tokenize, FlatCursor, Packed, Tokens,
    };
}

/// Thin wrappers around the underlying HTML parser.
///
/// [`NodeRef`] is the parser's reference-counted DOM node; [`NodeExt::to_ast`]
/// turns it into an owned [`Node`](crate::Node).
pub mod parser {
    use crate::node::Node;
    use kuchikikiki::traits::TendrilSink;
    pub use kuchikikiki::NodeRef;
    pub use crate::node_utils::NodeExt;

    /// Parse an HTML string into a [`NodeRef`] document tree.
    ///
    /// The parser follows the HTML5 specification; an implicit `<html>`, `<head>`,
    /// and `<body>` are synthesised when missing, and malformed markup is
    /// repaired rather than rejected.
    pub fn parse_html(html: &str) -> NodeRef {
        kuchikikiki::parse_html().one(html)
    }

    /// Parse a body-level HTML fragment into owned nodes.
    ///
    /// ```rust
    /// use article_chunker::parser::parse_fragment;
    ///
    /// let nodes = parse_fragment("<p>one</p>two");
    /// assert_eq!(nodes.len(), 2);
    /// assert_eq!(nodes[0].tag(), Some("p"));
    /// ```
    pub fn parse_fragment(html: &str) -> Vec<Node> {
        match parse_html(html).select_first("body") {
            Ok(body) => body
                .as_node()
                .children()
                .filter_map(|c| c.to_ast())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Parse every fragment on its own (so an unclosed tag cannot swallow the
    /// next fragment) and concatenate the results in order.
    pub fn parse_fragments<S: AsRef<str>>(fragments: &[S]) -> Vec<Node> {
        fragments
            .iter()
            .flat_map(|f| parse_fragment(f.as_ref()))
            .collect()
    }
}

/// Run the chunking pipeline over an article's raw HTML fragments.
///
/// Flattens the fragments to text, splits it into sentences, packs a prefix
/// of them into at most `options.max_chunks` paragraphs, rebuilds the rest
/// with its original markup and assembles one chunk per paragraph, the first
/// carrying the lead image.
///
/// Returns [`ChunkedArticle::Fallback`] when the article has no text; the
/// fallback holds the unprocessed HTML (or `options.fallback_html` if there
/// is none).  The pipeline is pure and deterministic.
///
/// # Examples
///
/// ```rust
/// use article_chunker::{chunk_article, ChunkOptions, ChunkedArticle};
///
/// let empty: Vec<String> = Vec::new();
/// assert_eq!(
///     chunk_article(&empty, &ChunkOptions::default()),
///     ChunkedArticle::Fallback("<p>Content not available</p>".to_string())
/// );
/// ```
pub fn chunk_article<S: AsRef<str>>(content: &[S], options: &ChunkOptions) -> ChunkedArticle {
    chunker::Chunker::new(options).chunk(content)
}
