use crate::models::{Chunk, ChunkOptions, ImagePolicy, Paragraph};
use crate::node::Node;

/// Turn packed paragraphs into chunks: one per paragraph, with the lead
/// image (or every image, per [`ImagePolicy`]) in front of the first one.
pub fn assemble(paragraphs: &[Paragraph], images: &[Node], options: &ChunkOptions) -> Vec<Chunk> {
    paragraphs
        .iter()
        .enumerate()
        .map(|(i, paragraph)| {
            let mut elements = Vec::new();
            if i == 0 {
                match options.image_policy {
                    ImagePolicy::LeadOnly => elements.extend(images.first().cloned()),
                    ImagePolicy::AllInFirstChunk => elements.extend(images.iter().cloned()),
                }
            }
            elements.push(Node::element_with_text(
                &options.paragraph_tag,
                &paragraph.text,
            ));
            Chunk { elements }
        })
        .collect()
}
