use crate::models::TerminatorSet;
use crate::utils::{FULL_WIDTH_SENTENCE, WESTERN_SENTENCE};

/// Split `flat_text` into sentence units.
///
/// A unit is a run of non-terminators followed by a run of terminators.
/// Units are verbatim slices (leading spaces included), so joining them with
/// no separator gives back `flat_text` exactly.  An unterminated tail
/// becomes the last unit and text without any terminator is a single unit.
/// Abbreviations such as "Dr." end a sentence; downstream layouts expect
/// that length distribution.
pub fn split_sentences(flat_text: &str, terminators: TerminatorSet) -> Vec<&str> {
    if flat_text.is_empty() {
        return Vec::new();
    }
    let pattern = match terminators {
        TerminatorSet::Western => &*WESTERN_SENTENCE,
        TerminatorSet::WesternAndFullWidth => &*FULL_WIDTH_SENTENCE,
    };

    let mut units = Vec::new();
    let mut consumed = 0;
    for m in pattern.find_iter(flat_text) {
        // A leading run of bare terminators can't start a match; it joins
        // the first unit.
        units.push(&flat_text[consumed..m.end()]);
        consumed = m.end();
    }
    if consumed < flat_text.len() {
        units.push(&flat_text[consumed..]);
    }
    units
}
