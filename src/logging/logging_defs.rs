/// Span IDs for performance-logging events.  Each ID must be unique;
/// simply increment when adding a new span.
pub const CHUNK_ARTICLE: u64 = 1;
pub const TOKENIZE: u64 = 2;
pub const SPLIT_SENTENCES: u64 = 3;
pub const PACK_PARAGRAPHS: u64 = 4;
pub const RECONCILE_REMAINDER: u64 = 5;
pub const ASSEMBLE_CHUNKS: u64 = 6;
pub const PLACE_CHUNKS: u64 = 7;

pub fn name(span_id: u64) -> &'static str {
    match span_id {
        CHUNK_ARTICLE => "CHUNK_ARTICLE",
        TOKENIZE => "TOKENIZE",
        SPLIT_SENTENCES => "SPLIT_SENTENCES",
        PACK_PARAGRAPHS => "PACK_PARAGRAPHS",
        RECONCILE_REMAINDER => "RECONCILE_REMAINDER",
        ASSEMBLE_CHUNKS => "ASSEMBLE_CHUNKS",
        PLACE_CHUNKS => "PLACE_CHUNKS",
        _ => "UNKNOWN_SPAN",
    }
}
