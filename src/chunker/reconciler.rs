use super::tokenizer::FlatCursor;
use crate::models::{ChunkOptions, ImagePolicy};
use crate::node::{Element, Node};
use crate::utils::{is_blank, BLOCK_ELEMENTS};

/// Where the unpacked part of the article starts in the original tree.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SplitPoint {
    /// Child indices from the root down to the text node.
    path: Vec<usize>,
    /// Byte offset of the first remaining character in that text node.
    offset: usize,
    /// Images seen before the split.
    images_before: usize,
}

/// Rebuild, with the original markup, everything in `nodes` that lies at or
/// after flat-text offset `used_text_length`.
///
/// The top-level node containing the split keeps only its right half: each
/// element on the way down is cloned without children and receives the rest
/// of the split text node plus its following siblings.  A split text node
/// directly under the root is wrapped in a new paragraph.  Every later
/// top-level node is deep-cloned as is.  Images are then filtered according
/// to `options` and nodes left without text or images are dropped.
pub fn reconcile(nodes: &[Node], used_text_length: usize, options: &ChunkOptions) -> Vec<Node> {
    let mut cursor = FlatCursor::default();
    let mut path = Vec::new();
    let mut images_before = 0;
    let split = match locate(nodes, used_text_length, &mut cursor, &mut path, &mut images_before) {
        Some(split) => split,
        None => return Vec::new(),
    };

    let mut remainder = Vec::new();
    if let Some((&top, rest)) = split.path.split_first() {
        match nodes.get(top) {
            Some(Node::Text(t)) => {
                let tail = t.get(split.offset..).unwrap_or_default();
                remainder.push(Node::element_with_text(&options.paragraph_tag, tail));
            }
            Some(Node::Element(e)) => {
                if let Some(half) = right_half(e, rest, split.offset) {
                    remainder.push(half);
                }
            }
            None => {}
        }
        for node in nodes.iter().skip(top + 1) {
            match node {
                Node::Text(t) if is_blank(t) => {}
                Node::Text(t) => remainder.push(Node::element_with_text(&options.paragraph_tag, t)),
                Node::Element(_) => remainder.push(node.clone()),
            }
        }
    }

    filter_images(&mut remainder, split.images_before == 0, options);
    remainder.retain(|n| !is_blank(&n.text_content()) || n.contains_tag("img"));
    remainder
}

fn locate(
    nodes: &[Node],
    used_text_length: usize,
    cursor: &mut FlatCursor,
    path: &mut Vec<usize>,
    images_before: &mut usize,
) -> Option<SplitPoint> {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        match node {
            Node::Text(t) => {
                for (offset, ch) in t.char_indices() {
                    if cursor.push(ch).is_some_and(|at| at >= used_text_length) {
                        return Some(SplitPoint {
                            path: path.clone(),
                            offset,
                            images_before: *images_before,
                        });
                    }
                }
            }
            Node::Element(e) if e.tag() == "img" => *images_before += 1,
            Node::Element(e) => {
                let block = BLOCK_ELEMENTS.contains(e.tag());
                if block {
                    cursor.boundary();
                }
                if let Some(split) =
                    locate(&e.children, used_text_length, cursor, path, images_before)
                {
                    return Some(split);
                }
                if block {
                    cursor.boundary();
                }
            }
        }
        path.pop();
    }
    None
}

fn right_half(element: &Element, path: &[usize], offset: usize) -> Option<Node> {
    let (&index, rest) = path.split_first()?;
    let mut half = element.shallow_clone();
    match element.children.get(index)? {
        Node::Text(t) => half
            .children
            .push(Node::text(t.get(offset..).unwrap_or_default())),
        Node::Element(child) => half.children.push(right_half(child, rest, offset)?),
    }
    half.children
        .extend(element.children.iter().skip(index + 1).cloned());
    Some(half.into())
}

/// Strip images the chunks already show.  With `lead_in_remainder` the
/// first remaining image is the article's lead image.
fn filter_images(remainder: &mut Vec<Node>, lead_in_remainder: bool, options: &ChunkOptions) {
    let is_img = |n: &Node| n.is_tag("img");
    if options.image_policy == ImagePolicy::AllInFirstChunk || !options.keep_remainder_images {
        remainder.retain(|n| !is_img(n));
        remainder
            .iter_mut()
            .for_each(|n| n.remove_descendants(&is_img));
    } else if lead_in_remainder {
        remove_first_image(remainder);
    }
}

fn remove_first_image(nodes: &mut Vec<Node>) -> bool {
    if let Some(pos) = nodes.iter().position(|n| n.contains_tag("img")) {
        let is_self = nodes.get(pos).is_some_and(|n| n.is_tag("img"));
        if is_self {
            nodes.remove(pos);
            return true;
        }
        if let Some(Node::Element(e)) = nodes.get_mut(pos) {
            return remove_first_image(&mut e.children);
        }
    }
    false
}
