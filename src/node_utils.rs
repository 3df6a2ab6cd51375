use crate::node::{Element, Node};
use crate::parser::NodeRef;

/// Read-only helpers implemented on the parser's [`NodeRef`], including the
/// conversion into the crate's owned [`Node`] AST.
///
/// This trait is automatically in scope when you import from
/// [`crate::parser`].
pub trait NodeExt {
    /// Return the local tag name of this node if it is an element (e.g.
    /// `"div"`, `"p"`), or `None` for text / comment / document nodes.
    fn element_name(&self) -> Option<&str>;

    /// Deep-convert this node into an owned [`Node`].  Text and element
    /// nodes convert; comments, doctypes, processing instructions and
    /// document nodes return `None`.
    fn to_ast(&self) -> Option<Node>;
}

impl NodeExt for NodeRef {
    fn element_name(&self) -> Option<&str> {
        self.as_element().map(|e| e.name.local.as_ref())
    }

    fn to_ast(&self) -> Option<Node> {
        if let Some(text) = self.as_text() {
            return Some(Node::Text(text.borrow().clone()));
        }
        let data = self.as_element()?;
        let attributes = data
            .attributes
            .borrow()
            .map
            .iter()
            .map(|(name, attr)| (name.clone(), attr.clone()))
            .collect();
        let children = match &data.template_contents {
            Some(contents) => contents.children(),
            None => self.children(),
        };
        Some(Node::Element(Element {
            name: data.name.clone(),
            attributes,
            children: children.filter_map(|c| c.to_ast()).collect(),
        }))
    }
}
