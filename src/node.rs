use html5ever::{LocalName, QualName};
use kuchikikiki::{Attribute, ExpandedName, NodeData, NodeRef};
use std::fmt;

/// A detached, owned HTML tree node.
///
/// The pipeline works on this AST instead of the parser's reference-counted
/// DOM so that remainder nodes and chunks can be cloned, moved between
/// containers and compared without touching the source tree.  `Clone` is a
/// deep copy.  Comments, doctypes and processing instructions are dropped
/// when converting from the parser's DOM (see [`crate::parser`]).
///
/// Serialization goes back through the parser's DOM and html5ever, so void
/// elements, raw-text elements and foreign (SVG, MathML) markup come out the
/// way the parser read them.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its qualified name, attributes in source order and child
/// nodes.
///
/// Names keep their namespace and case as parsed, so `<svg><linearGradient>`
/// stays camel-cased and `xlink:href` keeps its prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: QualName,
    pub attributes: Vec<(ExpandedName, Attribute)>,
    pub children: Vec<Node>,
}

impl Element {
    /// A new HTML element.  The tag is lowercased.
    pub fn new(tag: &str) -> Element {
        Element {
            name: QualName::new(
                None,
                html5ever::ns!(html),
                LocalName::from(tag.to_ascii_lowercase()),
            ),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The local name, e.g. `"p"` or `"linearGradient"`.
    pub fn tag(&self) -> &str {
        &self.name.local
    }

    /// Builder-style attribute setter.  Replaces an existing value.
    pub fn with_attr(mut self, name: &str, value: &str) -> Element {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Node) -> Element {
        self.children.push(child);
        self
    }

    /// Set an attribute without a namespace.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(n, _)| is_plain(n, name)) {
            Some((_, attr)) => attr.value = value.to_string(),
            None => self.attributes.push((
                ExpandedName::new(html5ever::ns!(), name),
                Attribute {
                    prefix: None,
                    value: value.to_string(),
                },
            )),
        }
    }

    /// Value of the attribute `name` without a namespace.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| is_plain(n, name))
            .map(|(_, attr)| attr.value.as_str())
    }

    /// Whether the whitespace-separated `class` attribute contains `class_name`.
    pub fn has_class(&self, class_name: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_ascii_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }

    /// A copy of this element with the same name and attributes but no children.
    pub fn shallow_clone(&self) -> Element {
        Element {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        }
    }
}

fn is_plain(name: &ExpandedName, local: &str) -> bool {
    name.ns == html5ever::ns!() && &*name.local == local
}

impl From<Element> for Node {
    fn from(e: Element) -> Node {
        Node::Element(e)
    }
}

impl Node {
    pub fn text(value: &str) -> Node {
        Node::Text(value.to_string())
    }

    /// Create an element holding a single text child, e.g. `<p>text</p>`.
    pub fn element_with_text(tag: &str, text: &str) -> Node {
        Element::new(tag).with_child(Node::text(text)).into()
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(t.as_str()),
            Node::Element(_) => None,
        }
    }

    /// The local name for element nodes, `None` for text.
    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|e| e.tag())
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag() == Some(tag)
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            Node::Text(_) => &[],
        }
    }

    /// Concatenated text of this node and all descendants, like the DOM's
    /// `textContent`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => e.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Whether this node or any descendant is an element named `tag`.
    pub fn contains_tag(&self, tag: &str) -> bool {
        match self {
            Node::Text(_) => false,
            Node::Element(e) => e.tag() == tag || e.children.iter().any(|c| c.contains_tag(tag)),
        }
    }

    /// Remove every descendant for which `predicate` returns `true`.  The
    /// node itself is never removed.
    pub fn remove_descendants<F>(&mut self, predicate: &F)
    where
        F: Fn(&Node) -> bool,
    {
        if let Node::Element(e) = self {
            e.children.retain(|c| !predicate(c));
            e.children
                .iter_mut()
                .for_each(|c| c.remove_descendants(predicate));
        }
    }

    /// Build a fresh parser DOM subtree holding a copy of this node.
    pub fn to_dom(&self) -> NodeRef {
        match self {
            Node::Text(t) => NodeRef::new_text(t.as_str()),
            Node::Element(e) => {
                let node = NodeRef::new_element(e.name.clone(), e.attributes.iter().cloned());
                // Template children live in the template's content fragment.
                let parent = node
                    .as_element()
                    .and_then(|data| data.template_contents.clone())
                    .unwrap_or_else(|| node.clone());
                e.children.iter().for_each(|c| parent.append(c.to_dom()));
                node
            }
        }
    }

    /// Serialise this node (including its own tags) to HTML.
    pub fn to_html(&self) -> String {
        self.to_dom().to_string()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// Serialise a sequence of sibling nodes to HTML.
pub fn fragment_to_html(nodes: &[Node]) -> String {
    let fragment = NodeRef::new(NodeData::DocumentFragment);
    nodes.iter().for_each(|n| fragment.append(n.to_dom()));
    fragment.to_string()
}

/// Concatenated `textContent` of a sequence of sibling nodes.
pub fn fragment_text(nodes: &[Node]) -> String {
    nodes.iter().map(|n| n.text_content()).collect()
}
