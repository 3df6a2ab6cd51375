use crate::error::{Error, Result};
use crate::logging::logger::DebugLogsCategories;
use crate::node::{fragment_to_html, Node};
use kuchikikiki::Selectors;
use serde::{Deserialize, Serialize};

/// Which characters end a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminatorSet {
    /// `.` `!` `?`
    Western,
    /// `.` `!` `?` plus the full-width `。` `！` `？`
    #[default]
    WesternAndFullWidth,
}

/// Where article images end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePolicy {
    /// Only the first image is kept, in front of the first paragraph.
    #[default]
    LeadOnly,
    /// Every image is moved in front of the first paragraph.
    AllInFirstChunk,
}

/// Knobs for the chunking pipeline.
///
/// The defaults reproduce the common news-detail layout: five chunks, a
/// 300-character lead paragraph and 500-character body paragraphs with a
/// 20% overflow allowance.  Layout variants differ only in these values, so
/// a profile can be loaded from JSON with [`ChunkOptions::from_json`];
/// missing keys keep their defaults.
///
/// # Examples
///
/// ```rust
/// use article_chunker::ChunkOptions;
///
/// let opts = ChunkOptions::from_json(r#"{ "max_chunks": 3, "target": 400 }"#).unwrap();
/// assert_eq!(opts.max_chunks, 3);
/// assert_eq!(opts.first_target, 300);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkOptions {
    /// Upper bound on the number of packed paragraphs (and chunks).
    pub max_chunks: usize,
    /// Target length, in characters, of the first paragraph.
    pub first_target: usize,
    /// Target length of every following paragraph.
    pub target: usize,
    /// A paragraph accepts another sentence only while its length stays
    /// within `target * overflow_tolerance`.
    pub overflow_tolerance: f64,
    pub terminators: TerminatorSet,
    pub image_policy: ImagePolicy,
    /// Keep images that fall in the unpacked remainder.  The lead image is
    /// never repeated there.  Ignored with [`ImagePolicy::AllInFirstChunk`].
    pub keep_remainder_images: bool,
    /// Tag wrapping each packed paragraph.
    pub paragraph_tag: String,
    /// Rendered when the article has no text and no raw HTML to fall back on.
    pub fallback_html: String,
    /// Emit `log::debug!` diagnostics for the stages in `debug_categories`.
    pub debug: bool,
    #[serde(skip)]
    pub debug_categories: DebugLogsCategories,
}

impl Default for ChunkOptions {
    fn default() -> ChunkOptions {
        ChunkOptions {
            max_chunks: 5,
            first_target: 300,
            target: 500,
            overflow_tolerance: 1.2,
            terminators: TerminatorSet::default(),
            image_policy: ImagePolicy::default(),
            keep_remainder_images: false,
            paragraph_tag: "p".to_string(),
            fallback_html: "<p>Content not available</p>".to_string(),
            debug: false,
            debug_categories: DebugLogsCategories::ALL,
        }
    }
}

impl ChunkOptions {
    /// Parse a profile from JSON and validate it.
    pub fn from_json(json: &str) -> Result<ChunkOptions> {
        let options: ChunkOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_chunks == 0 {
            return Err(Error::InvalidOptions("max_chunks must be at least 1".into()));
        }
        if self.first_target == 0 || self.target == 0 {
            return Err(Error::InvalidOptions("paragraph targets must be positive".into()));
        }
        if !self.overflow_tolerance.is_finite() || self.overflow_tolerance < 1.0 {
            return Err(Error::InvalidOptions(format!(
                "overflow_tolerance must be >= 1.0, got {}",
                self.overflow_tolerance
            )));
        }
        if self.paragraph_tag.is_empty()
            || !self.paragraph_tag.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(Error::InvalidOptions(format!(
                "invalid paragraph_tag {:?}",
                self.paragraph_tag
            )));
        }
        Ok(())
    }

    /// Target length of the paragraph at `index`.
    pub fn target_for(&self, index: usize) -> usize {
        if index == 0 {
            self.first_target
        } else {
            self.target
        }
    }
}

/// Where unpacked remainder nodes go relative to the last placeholder slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowMode {
    /// Inserted as siblings right after the last slot.
    #[default]
    AfterLastSlot,
    /// Appended as children of the last slot.
    InsideLastSlot,
}

/// Describes the placeholder containers of a detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// An element is a slot when its class list contains any of these.
    pub slot_classes: Vec<String>,
    /// Slots beyond this count are ignored.
    pub max_slots: usize,
    pub overflow: OverflowMode,
}

impl Default for PageLayout {
    fn default() -> PageLayout {
        PageLayout {
            slot_classes: vec!["article-item".to_string(), "detail-item".to_string()],
            max_slots: 5,
            overflow: OverflowMode::default(),
        }
    }
}

impl PageLayout {
    pub fn from_json(json: &str) -> Result<PageLayout> {
        let layout: PageLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_slots == 0 || self.slot_classes.is_empty() {
            return Err(Error::InvalidOptions(
                "a page layout needs at least one slot class and max_slots >= 1".into(),
            ));
        }
        if Selectors::compile(&self.slot_selector()).is_err() {
            return Err(Error::InvalidOptions(format!(
                "slot classes {:?} are not valid CSS class names",
                self.slot_classes
            )));
        }
        Ok(())
    }

    /// A selector list matching any slot class, e.g. `.article-item, .detail-item`.
    pub fn slot_selector(&self) -> String {
        self.slot_classes
            .iter()
            .map(|c| format!(".{}", c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A group of consecutive sentences packed to a target length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Sentences joined by single spaces, trimmed.
    pub text: String,
    /// How many sentence units went into this paragraph.
    pub sentence_count: usize,
    /// Sum of the raw (untrimmed) sentence lengths, in characters.
    pub raw_len: usize,
}

/// The nodes destined for one placeholder slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chunk {
    pub elements: Vec<Node>,
}

impl Chunk {
    pub fn to_html(&self) -> String {
        fragment_to_html(&self.elements)
    }
}

/// Everything the pipeline derives from one article.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChunkSet {
    /// The whitespace-normalized text of the whole article.
    pub flat_text: String,
    pub paragraphs: Vec<Paragraph>,
    /// One chunk per paragraph; chunk 0 carries the lead image.
    pub chunks: Vec<Chunk>,
    /// Original-structure nodes for the text the paragraphs did not absorb.
    pub remainder: Vec<Node>,
    /// Characters of `flat_text` consumed by the paragraphs.
    pub used_text_length: usize,
    /// Number of sentence units consumed by the paragraphs.
    pub sentence_index: usize,
    /// Number of sentence units `flat_text` was split into.
    pub sentence_count: usize,
    /// The article's fragments concatenated, unprocessed.  Rendered instead
    /// of the chunks when a page has no placeholder slots.
    pub source_html: String,
}

/// The output of [`crate::chunk_article`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkedArticle {
    Chunked(ChunkSet),
    /// The article had no text.  Holds the HTML to render unprocessed.
    Fallback(String),
}

impl ChunkedArticle {
    pub fn chunk_set(&self) -> Option<&ChunkSet> {
        match self {
            ChunkedArticle::Chunked(set) => Some(set),
            ChunkedArticle::Fallback(_) => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ChunkedArticle::Fallback(_))
    }
}
