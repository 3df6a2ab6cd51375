use crate::models::{ChunkOptions, Paragraph};
use crate::utils::char_len;

/// Result of packing a prefix of the sentence units into paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packed {
    pub paragraphs: Vec<Paragraph>,
    /// Number of sentence units consumed.
    pub sentence_index: usize,
    /// Flat-text characters consumed (sum of raw unit lengths).
    pub used_text_length: usize,
}

/// Greedily regroup sentence units into at most `options.max_chunks`
/// paragraphs.
///
/// Each paragraph takes its first unit unconditionally, then keeps taking
/// units while the total stays within `target * overflow_tolerance`, and
/// closes as soon as it reaches `target`.
pub fn pack(sentences: &[&str], options: &ChunkOptions) -> Packed {
    let mut packed = Packed::default();
    let mut index = 0;

    for paragraph_index in 0..options.max_chunks {
        if index >= sentences.len() {
            break;
        }
        let target = options.target_for(paragraph_index);
        let cap = target as f64 * options.overflow_tolerance;

        let start = index;
        let mut current_length = 0;
        while let Some(sentence) = sentences.get(index) {
            let length = char_len(sentence);
            if index > start && (current_length + length) as f64 > cap {
                break;
            }
            current_length += length;
            index += 1;
            if current_length >= target {
                break;
            }
        }

        let taken = sentences.get(start..index).unwrap_or_default();
        if taken.is_empty() {
            break;
        }
        packed.used_text_length += current_length;
        packed.sentence_index = index;

        let text = taken
            .iter()
            .map(|s| s.trim())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        if !text.is_empty() {
            packed.paragraphs.push(Paragraph {
                text,
                sentence_count: taken.len(),
                raw_len: current_length,
            });
        }
    }
    packed
}
