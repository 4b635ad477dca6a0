//! Node types for the parsed document tree.

use crate::Attributes;

/// Element nesting depth past which readers and writers stop descending and
/// keep only the text of the remaining subtree.
pub const MAX_NESTING: usize = 256;

/// A node in the parsed document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// What this node is.
    pub kind: NodeKind,
    /// Element attributes, in source order. Always empty for text.
    pub attrs: Attributes,
    /// Child nodes, in document order.
    pub children: Vec<Node>,
}

/// Node kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The root of a parsed document.
    Document,
    /// An element, identified by its lower-cased tag name.
    Element(String),
    /// Text whose character references are already decoded.
    Text(String),
    /// Text that may still contain character references such as `&amp;`.
    EncodedText(String),
}

impl Node {
    /// Create a new node with the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Create a document root.
    pub fn document() -> Self {
        Self::new(NodeKind::Document)
    }

    /// Create an element. The tag name is lower-cased.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::new(NodeKind::Element(tag.into().to_ascii_lowercase()))
    }

    /// Create a decoded text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(content.into()))
    }

    /// Create a text node whose character references are still encoded.
    pub fn encoded_text(content: impl Into<String>) -> Self {
        Self::new(NodeKind::EncodedText(content.into()))
    }

    /// Add an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.set(name, value);
        self
    }

    /// Add a child node.
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Add multiple child nodes.
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// The tag name, if this is an element.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    /// The text payload, if this is a text node.
    pub fn text_payload(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::EncodedText(text) => Some(text),
            _ => None,
        }
    }

    /// Check if this is a text node.
    pub fn is_text(&self) -> bool {
        self.text_payload().is_some()
    }

    /// Check if this is an element with the given tag.
    pub fn is_element(&self, tag: &str) -> bool {
        self.tag() == Some(tag)
    }

    /// Concatenated text payloads of this node and its descendants.
    pub fn text_content(&self) -> String {
        self.descendants().filter_map(Node::text_payload).collect()
    }

    /// This node and all of its descendants in document order.
    ///
    /// The walk keeps its own stack, so any depth of nesting is safe.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Pre-order iterator returned by [`Node::descendants`].
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Document => write!(f, "#document"),
            NodeKind::Element(tag) => write!(f, "<{tag}>"),
            NodeKind::Text(_) | NodeKind::EncodedText(_) => write!(f, "#text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let node = Node::element("P")
            .attr("style", "color: red")
            .child(Node::text("Hello "))
            .child(Node::element("b").child(Node::text("world")));

        assert_eq!(node.tag(), Some("p"));
        assert_eq!(node.attrs.get("style"), Some("color: red"));
        assert_eq!(node.children.len(), 2);
        assert!(node.children[0].is_text());
        assert!(node.children[1].is_element("b"));
    }

    #[test]
    fn test_text_content() {
        let node = Node::document().children([
            Node::element("h1").child(Node::text("Title")),
            Node::element("p").child(Node::encoded_text("a &amp; b")),
        ]);
        assert_eq!(node.text_content(), "Titlea &amp; b");
    }

    #[test]
    fn test_descendants_in_document_order() {
        let node = Node::element("div")
            .child(Node::element("p").child(Node::text("a")))
            .child(Node::text("b"));
        let kinds: Vec<String> = node.descendants().map(|n| n.kind.to_string()).collect();
        assert_eq!(kinds, ["<div>", "<p>", "#text", "#text"]);
        assert_eq!(node.text_content(), "ab");
    }

    #[test]
    fn test_display_kind() {
        assert_eq!(Node::element("td").kind.to_string(), "<td>");
        assert_eq!(Node::document().kind.to_string(), "#document");
    }
}
