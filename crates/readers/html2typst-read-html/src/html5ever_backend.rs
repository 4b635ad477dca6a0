//! HTML parser using html5ever.

use html5ever::tendril::TendrilSink;
use html5ever::{Attribute, QualName, parse_document};
use html2typst_core::{
    ConversionResult, Document, FidelityWarning, MAX_NESTING, Metadata, Node, ParseError,
    Severity, WarningKind,
};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::merge_text_nodes;

/// Parse HTML text into a Document.
pub fn parse(input: &str) -> Result<ConversionResult<Document>, ParseError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut input.as_bytes())
        .map_err(|e| ParseError::Invalid(format!("HTML parse error: {:?}", e)))?;

    let mut metadata = Metadata::default();
    extract_metadata(&dom.document, &mut metadata, false, 0);

    let mut converter = Converter::default();
    let children = converter.convert_children(&dom.document, 0);
    let root = Node::document().children(children);

    tracing::debug!(
        nodes = root.children.len(),
        has_metadata = !metadata.is_empty(),
        warnings = converter.warnings.len(),
        "parsed html"
    );

    Ok(ConversionResult::with_warnings(
        Document::new().with_content(root).with_metadata(metadata),
        converter.warnings,
    ))
}

/// Extract metadata from the HTML head element.
fn extract_metadata(handle: &Handle, metadata: &mut Metadata, in_head: bool, depth: usize) {
    let mut in_head = in_head;
    if depth > MAX_NESTING {
        return;
    }

    if let NodeData::Element { name, attrs, .. } = &handle.data {
        let tag = name.local.as_ref();
        match tag {
            "head" => in_head = true,
            "body" => return,
            "title" if in_head && metadata.title.is_none() => {
                let title = extract_element_text(handle);
                let title = title.trim();
                if !title.is_empty() {
                    metadata.title = Some(title.to_string());
                }
            }
            "meta" if in_head => {
                let attrs = attrs.borrow();
                if let Some(name) = get_attr(&attrs, "name")
                    && let Some(content) = get_attr(&attrs, "content")
                {
                    apply_meta(metadata, &name.to_ascii_lowercase(), content.trim());
                }
            }
            _ => {}
        }
    }

    for child in handle.children.borrow().iter() {
        extract_metadata(child, metadata, in_head, depth + 1);
    }
}

fn apply_meta(metadata: &mut Metadata, name: &str, content: &str) {
    if content.is_empty() {
        return;
    }
    match name {
        "author" => metadata.authors.push(content.to_string()),
        "description" if metadata.description.is_none() => {
            metadata.description = Some(content.to_string());
        }
        "keywords" => metadata.keywords.extend(
            content
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
        ),
        _ => {}
    }
}

/// Extract text content from an element.
fn extract_element_text(handle: &Handle) -> String {
    let mut text = String::new();
    for child in handle.children.borrow().iter() {
        if let NodeData::Text { contents } = &child.data {
            text.push_str(&contents.borrow());
        }
        text.push_str(&extract_element_text(child));
    }
    text
}

/// DOM to node tree conversion, with the warnings it raises.
#[derive(Default)]
struct Converter {
    warnings: Vec<FidelityWarning>,
}

impl Converter {
    /// Convert child nodes of a DOM node at element depth `depth`.
    fn convert_children(&mut self, handle: &Handle, depth: usize) -> Vec<Node> {
        let mut nodes = Vec::new();

        for child in handle.children.borrow().iter() {
            nodes.extend(self.convert_node(child, depth));
        }

        merge_text_nodes(&mut nodes);

        nodes
    }

    /// Convert a single DOM node.
    fn convert_node(&mut self, handle: &Handle, depth: usize) -> Vec<Node> {
        match &handle.data {
            NodeData::Document => self.convert_children(handle, depth),

            NodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.is_empty() {
                    return vec![];
                }
                vec![Node::text(text)]
            }

            NodeData::Element { name, attrs, .. } => {
                let attrs_borrowed = attrs.borrow();
                self.convert_element(name, &attrs_borrowed, handle, depth + 1)
            }

            NodeData::Comment { .. } => vec![],
            NodeData::Doctype { .. } => vec![],
            NodeData::ProcessingInstruction { .. } => vec![],
        }
    }

    /// Convert an HTML element, keeping its tag name and attributes.
    fn convert_element(
        &mut self,
        name: &QualName,
        attrs: &[Attribute],
        handle: &Handle,
        depth: usize,
    ) -> Vec<Node> {
        let tag = name.local.as_ref().to_ascii_lowercase();

        // Head content is carried as document metadata.
        if tag == "head" {
            return vec![];
        }

        if depth > MAX_NESTING {
            return self.flatten(&tag, handle, depth);
        }

        let mut node = Node::element(tag);
        for attr in attrs {
            node = node.attr(attr.name.local.as_ref(), attr.value.to_string());
        }

        vec![node.children(self.convert_children(handle, depth))]
    }

    /// Keep only the text of a subtree nested past [`MAX_NESTING`].
    fn flatten(&mut self, tag: &str, handle: &Handle, depth: usize) -> Vec<Node> {
        tracing::warn!(tag, depth, "nesting limit reached, keeping text only");
        self.warnings.push(FidelityWarning::new(
            Severity::Minor,
            WarningKind::NestingLimit { depth },
            format!("<{tag}> nested {depth} elements deep; kept its text only"),
        ));

        let text = subtree_text(handle);
        if text.is_empty() {
            vec![]
        } else {
            vec![Node::text(text)]
        }
    }
}

/// Text of a subtree in document order, without script-like content.
fn subtree_text(handle: &Handle) -> String {
    let mut text = String::new();
    let mut stack = vec![handle.clone()];
    while let Some(node) = stack.pop() {
        match &node.data {
            NodeData::Text { contents } => text.push_str(&contents.borrow()),
            NodeData::Element { name, .. }
                if matches!(
                    name.local.as_ref(),
                    "script" | "style" | "template" | "noscript"
                ) => {}
            _ => stack.extend(node.children.borrow().iter().rev().cloned()),
        }
    }
    text
}

/// Get an attribute value by name.
fn get_attr(attrs: &[Attribute], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|a| a.name.local.as_ref() == name)
        .map(|a| a.value.to_string())
}
