use crate::logging::console_perf_logger;
use crate::logging::logging_defs::*;
use crate::models::{ChunkedArticle, OverflowMode, PageLayout};
use crate::parser::{parse_html, NodeRef};
use kuchikikiki::iter::NodeIterator;
use kuchikikiki::Selectors;

/// The outcome of writing an article into a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// The page markup with the slots filled.
    pub html: String,
    /// How many placeholder slots received a chunk.
    pub slots_filled: usize,
    /// Chunks that did not get their own slot and were appended to the last one.
    pub overflowed_chunks: usize,
    /// Remainder nodes placed after or inside the last slot.
    pub remainder_nodes: usize,
    /// `true` when the page content was replaced by the unprocessed article.
    pub fell_back: bool,
}

/// Write `article` into the placeholder slots of `page_html`.
///
/// Slots are the elements matching any of `layout.slot_classes`, taken in
/// document order (a slot nested in another slot is not a slot) and capped
/// at `layout.max_slots`.  Chunk `i` replaces the children of slot `i`;
/// chunks beyond the last slot are appended to it.  Remainder nodes go after
/// or inside the last slot per `layout.overflow`.
///
/// A page without slots, or an article that fell back, has its whole
/// content replaced by the unprocessed article HTML.
pub fn place(page_html: &str, article: &ChunkedArticle, layout: &PageLayout) -> Placement {
    let logger = console_perf_logger();
    start_span!(logger, PLACE_CHUNKS);

    let page = parse_html(page_html);
    let body = match page.select_first("body") {
        Ok(body) => body.as_node().clone(),
        Err(()) => page,
    };
    let slots = find_slots(&body, layout);
    add_point_to_span!(logger, PLACE_CHUNKS, format!("found {} slots", slots.len()));

    let (set, last_slot) = match (article, slots.last()) {
        (ChunkedArticle::Chunked(set), Some(last_slot)) => (set, last_slot),
        (ChunkedArticle::Chunked(set), None) => {
            log::warn!("page has no placeholder slots, rendering the article unprocessed");
            end_span!(logger, PLACE_CHUNKS);
            return fallback(&set.source_html);
        }
        (ChunkedArticle::Fallback(html), _) => {
            end_span!(logger, PLACE_CHUNKS);
            return fallback(html);
        }
    };

    let mut slots_filled = 0;
    for (i, chunk) in set.chunks.iter().enumerate() {
        let slot = match slots.get(i) {
            Some(slot) => {
                slot.children().collect::<Vec<_>>().iter().for_each(|n| n.detach());
                slots_filled += 1;
                slot
            }
            None => last_slot,
        };
        chunk.elements.iter().for_each(|n| slot.append(n.to_dom()));
    }

    match layout.overflow {
        OverflowMode::InsideLastSlot => {
            set.remainder.iter().for_each(|n| last_slot.append(n.to_dom()));
        }
        OverflowMode::AfterLastSlot => {
            let mut anchor = last_slot.clone();
            for node in &set.remainder {
                let next = node.to_dom();
                anchor.insert_after(next.clone());
                anchor = next;
            }
        }
    }
    add_point_to_span_str!(logger, PLACE_CHUNKS, "filled");
    end_span!(logger, PLACE_CHUNKS);

    Placement {
        html: body.children().map(|c| c.to_string()).collect(),
        slots_filled,
        overflowed_chunks: set.chunks.len().saturating_sub(slots.len()),
        remainder_nodes: set.remainder.len(),
        fell_back: false,
    }
}

fn fallback(html: &str) -> Placement {
    Placement {
        html: html.to_string(),
        slots_filled: 0,
        overflowed_chunks: 0,
        remainder_nodes: 0,
        fell_back: true,
    }
}

/// The slots under `body`, in document order.
fn find_slots(body: &NodeRef, layout: &PageLayout) -> Vec<NodeRef> {
    let selectors = match Selectors::compile(&layout.slot_selector()) {
        Ok(selectors) => selectors,
        Err(()) => {
            log::warn!("slot classes {:?} do not form a selector", layout.slot_classes);
            return Vec::new();
        }
    };
    selectors
        .filter(body.descendants().elements())
        .filter(|slot| {
            !slot
                .as_node()
                .ancestors()
                .elements()
                .any(|outer| selectors.matches(&outer))
        })
        .take(layout.max_slots)
        .map(|slot| slot.as_node().clone())
        .collect()
}
