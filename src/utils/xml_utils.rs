//! Engine-agnostic XML traversal for response parsing.
//!
//! Hosting environments back this crate with different XML engines, so every
//! response parser is written once against [`XmlNode`]; an engine only has to
//! build that tree. Element names are local names — namespace prefixes in the
//! document do not affect matching.

use error_stack::ResultExt;
use quick_xml::events::Event;

use crate::errors::{ConnectorError, CustomResult};

/// Owned element tree shared by all engines. `text` accumulates the direct
/// text and CDATA content of the element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All elements matching the final segment of a `/`-separated local-name
    /// path, in document order, after resolving every earlier segment to its
    /// first match. An unmatched path yields an empty list.
    pub fn nodes_at(&self, path: &str) -> Vec<&XmlNode> {
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        let Some((leaf, parents)) = segments.split_last() else {
            return Vec::new();
        };
        let mut node = self;
        for segment in parents {
            match node.child(segment) {
                Some(next) => node = next,
                None => return Vec::new(),
            }
        }
        node.children
            .iter()
            .filter(|child| child.name == *leaf)
            .collect()
    }

    /// Trimmed text of the first element at `path`, when present and
    /// non-empty.
    pub fn text_at(&self, path: &str) -> Option<&str> {
        self.nodes_at(path)
            .first()
            .map(|node| node.text.trim())
            .filter(|text| !text.is_empty())
    }

    /// First element with the given local name anywhere below this node,
    /// depth-first.
    pub fn descendant(&self, name: &str) -> Option<&XmlNode> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Whether the element holds any child elements.
    pub fn has_elements(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Parses a complete document into the shared element tree.
pub trait XmlEngine {
    fn parse(&self, document: &str) -> CustomResult<XmlNode, ConnectorError>;
}

/// Streaming engine backed by `quick_xml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickXmlEngine;

impl XmlEngine for QuickXmlEngine {
    fn parse(&self, document: &str) -> CustomResult<XmlNode, ConnectorError> {
        let mut reader = quick_xml::Reader::from_str(document);
        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;
        loop {
            let event = reader
                .read_event()
                .change_context(ConnectorError::ResponseDeserializationFailed)?;
            match event {
                Event::Start(start) => {
                    stack.push(XmlNode {
                        name: local_name(start.local_name().as_ref()),
                        ..XmlNode::default()
                    });
                }
                Event::Empty(start) => {
                    let node = XmlNode {
                        name: local_name(start.local_name().as_ref()),
                        ..XmlNode::default()
                    };
                    close_element(&mut stack, &mut root, node);
                }
                Event::Text(text) => {
                    let value = text
                        .unescape()
                        .change_context(ConnectorError::ResponseDeserializationFailed)?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&value);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or(ConnectorError::ResponseDeserializationFailed)?;
                    close_element(&mut stack, &mut root, node);
                }
                Event::Eof => break,
                _ => {}
            }
        }
        root.ok_or_else(|| ConnectorError::ResponseDeserializationFailed.into())
    }
}

/// DOM engine backed by `roxmltree`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoxmltreeEngine;

impl XmlEngine for RoxmltreeEngine {
    fn parse(&self, document: &str) -> CustomResult<XmlNode, ConnectorError> {
        let parsed = roxmltree::Document::parse(document)
            .change_context(ConnectorError::ResponseDeserializationFailed)?;
        Ok(convert(parsed.root_element()))
    }
}

fn convert(source: roxmltree::Node<'_, '_>) -> XmlNode {
    let mut node = XmlNode {
        name: source.tag_name().name().to_string(),
        ..XmlNode::default()
    };
    for child in source.children() {
        if child.is_element() {
            node.children.push(convert(child));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                node.text.push_str(text);
            }
        }
    }
    node
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn close_element(stack: &mut Vec<XmlNode>, root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}
