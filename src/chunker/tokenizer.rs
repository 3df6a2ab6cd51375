use crate::node::Node;
use crate::utils::{collapse_whitespace, BLOCK_ELEMENTS};

/// The flattened text of an article together with its images in document
/// order.  The first image is the lead image.
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    pub flat_text: String,
    pub images: Vec<Node>,
}

impl Tokens {
    pub fn lead_image(&self) -> Option<&Node> {
        self.images.first()
    }
}

/// Flatten `nodes` (the children of the synthetic article root) to text.
///
/// Text nodes are appended verbatim, images are collected instead of read,
/// and block elements get a boundary space on each side so adjacent blocks
/// never glue words together.  The result is whitespace-collapsed and
/// trimmed.
pub fn tokenize(nodes: &[Node]) -> Tokens {
    let mut buffer = String::new();
    let mut images = Vec::new();
    nodes
        .iter()
        .for_each(|n| visit(n, &mut buffer, &mut images));
    Tokens {
        flat_text: collapse_whitespace(&buffer),
        images,
    }
}

fn visit(node: &Node, buffer: &mut String, images: &mut Vec<Node>) {
    match node {
        Node::Text(t) => buffer.push_str(t),
        Node::Element(e) if e.tag() == "img" => images.push(node.clone()),
        Node::Element(e) => {
            let block = BLOCK_ELEMENTS.contains(e.tag());
            if block && !buffer.ends_with(' ') {
                buffer.push(' ');
            }
            e.children.iter().for_each(|c| visit(c, buffer, images));
            if block && !buffer.ends_with(' ') {
                buffer.push(' ');
            }
        }
    }
}

/// Replays [`tokenize`]'s whitespace collapsing one character at a time so
/// that a position in the original tree can be mapped to an offset in the
/// flat text without building it.
///
/// Whitespace and block boundaries only mark a pending space; the space is
/// counted when the next visible character arrives, which reproduces both
/// the run collapsing and the final trim.
#[derive(Debug, Default)]
pub struct FlatCursor {
    emitted: usize,
    pending_space: bool,
}

impl FlatCursor {
    /// A whitespace character or a block-element boundary.
    pub fn boundary(&mut self) {
        if self.emitted > 0 {
            self.pending_space = true;
        }
    }

    /// Feed one character of a text node.  Returns the flat-text offset the
    /// character lands on, or `None` if it is whitespace.
    pub fn push(&mut self, ch: char) -> Option<usize> {
        if ch.is_whitespace() {
            self.boundary();
            return None;
        }
        if self.pending_space {
            self.emitted += 1;
            self.pending_space = false;
        }
        let at = self.emitted;
        self.emitted += 1;
        Some(at)
    }

    /// Number of flat-text characters produced so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}
