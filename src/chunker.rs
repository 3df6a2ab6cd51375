mod assembler;
mod packer;
mod reconciler;
mod sentences;
mod tokenizer;

pub use assembler::assemble;
pub use packer::{pack, Packed};
pub use reconciler::reconcile;
pub use sentences::split_sentences;
pub use tokenizer::{tokenize, FlatCursor, Tokens};

use crate::logging::console_perf_logger;
use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::models::{ChunkOptions, ChunkSet, ChunkedArticle};
use crate::parser::parse_fragments;
use crate::utils::{char_len, is_blank};

/// One run of the chunking pipeline over one article.
pub(crate) struct Chunker<'a> {
    options: &'a ChunkOptions,
    logger: PerfLogger,
}

impl<'a> Chunker<'a> {
    pub fn new(options: &'a ChunkOptions) -> Chunker<'a> {
        Chunker {
            options,
            logger: console_perf_logger(),
        }
    }

    pub fn chunk<S: AsRef<str>>(&self, content: &[S]) -> ChunkedArticle {
        let logger = &self.logger;
        let options = self.options;
        start_span!(logger, CHUNK_ARTICLE);

        let source_html: String = content.iter().map(|f| f.as_ref()).collect();
        let nodes = parse_fragments(content);
        add_point_to_span_str!(logger, CHUNK_ARTICLE, "parsed");

        start_span!(logger, TOKENIZE);
        let tokens = tokenize(&nodes);
        end_span!(logger, TOKENIZE);
        debug_log!(
            options,
            TOKENIZER,
            "flattened {} fragments to {} chars, {} images",
            content.len(),
            char_len(&tokens.flat_text),
            tokens.images.len()
        );

        if tokens.flat_text.is_empty() {
            end_span!(logger, CHUNK_ARTICLE);
            let fallback = if is_blank(&source_html) {
                options.fallback_html.clone()
            } else {
                source_html
            };
            log::debug!("article has no text, rendering it unprocessed");
            return ChunkedArticle::Fallback(fallback);
        }

        start_span!(logger, SPLIT_SENTENCES);
        let sentences = split_sentences(&tokens.flat_text, options.terminators);
        end_span!(logger, SPLIT_SENTENCES);
        debug_log!(options, SENTENCES, "{} sentence units", sentences.len());

        start_span!(logger, PACK_PARAGRAPHS);
        let packed = pack(&sentences, options);
        annotate_span!(
            logger,
            PACK_PARAGRAPHS,
            format!(
                "{} paragraphs from {} of {} units",
                packed.paragraphs.len(),
                packed.sentence_index,
                sentences.len()
            )
        );
        end_span!(logger, PACK_PARAGRAPHS);
        debug_log!(
            options,
            PACKER,
            "packed {} paragraphs, used {} of {} chars",
            packed.paragraphs.len(),
            packed.used_text_length,
            char_len(&tokens.flat_text)
        );

        start_span!(logger, RECONCILE_REMAINDER);
        let remainder = reconcile(&nodes, packed.used_text_length, options);
        end_span!(logger, RECONCILE_REMAINDER);
        debug_log!(options, RECONCILER, "{} remainder nodes", remainder.len());

        start_span!(logger, ASSEMBLE_CHUNKS);
        let chunks = assemble(&packed.paragraphs, &tokens.images, options);
        end_span!(logger, ASSEMBLE_CHUNKS);
        debug_log!(options, ASSEMBLER, "{} chunks", chunks.len());

        end_span!(logger, CHUNK_ARTICLE);
        let sentence_count = sentences.len();
        ChunkedArticle::Chunked(ChunkSet {
            flat_text: tokens.flat_text,
            paragraphs: packed.paragraphs,
            chunks,
            remainder,
            used_text_length: packed.used_text_length,
            sentence_index: packed.sentence_index,
            sentence_count,
            source_html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::fragment_text;
    use crate::utils::strip_whitespace;

    fn long_article(paragraphs: usize) -> Vec<String> {
        (0..paragraphs)
            .map(|p| {
                let sentences: String = (0..6)
                    .map(|s| format!("Paragraph {} sentence {} has a few more words in it. ", p, s))
                    .collect();
                format!("<p>{}</p>", sentences)
            })
            .collect()
    }

    #[test]
    fn paragraphs_and_remainder_cover_the_text_once() {
        let content = long_article(12);
        let options = ChunkOptions::default();
        let article = Chunker::new(&options).chunk(&content);
        let set = article.chunk_set().unwrap();

        assert_eq!(set.paragraphs.len(), 5);
        assert!(!set.remainder.is_empty());

        let packed: String = set.paragraphs.iter().map(|p| p.text.as_str()).collect();
        let rest = fragment_text(&set.remainder);
        assert_eq!(
            strip_whitespace(&format!("{}{}", packed, rest)),
            strip_whitespace(&set.flat_text)
        );
    }

    #[test]
    fn fallback_keeps_raw_html_when_there_is_no_text() {
        let options = ChunkOptions::default();
        let article = Chunker::new(&options).chunk(&[r#"<img src="only.png">"#]);
        assert_eq!(
            article,
            ChunkedArticle::Fallback(r#"<img src="only.png">"#.to_string())
        );
    }
}
