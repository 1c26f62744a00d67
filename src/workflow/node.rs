//! Raw YAML Nodes
//!
//! An untyped YAML tree that keeps every scalar exactly as written. Trigger
//! configuration is read through this tree rather than `serde_yaml::Value`,
//! which turns `1.20` into the number `1.2` and loses the author's text.

use std::collections::HashMap;

use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::TScalarStyle;

use crate::error::Result;

/// A YAML node with scalars kept as source text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawNode {
    /// Missing value, or a plain `~` / `null`
    #[default]
    Null,
    Scalar(String),
    Sequence(Vec<RawNode>),
    /// Entries in document order
    Mapping(Vec<(RawNode, RawNode)>),
}

impl RawNode {
    /// Parses the first document of a YAML text.
    ///
    /// An empty text is [`RawNode::Null`].
    pub fn parse(content: &str) -> Result<Self> {
        let mut builder = NodeBuilder::default();
        Parser::new(content.chars()).load(&mut builder, false)?;
        Ok(builder.root.unwrap_or_default())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Returns the text of a scalar node.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the entries of a mapping node.
    pub fn as_mapping(&self) -> Option<&[(RawNode, RawNode)]> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up the value of a scalar key in a mapping node.
    pub fn get(&self, key: &str) -> Option<&RawNode> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k.as_scalar() == Some(key))
            .map(|(_, v)| v)
    }

    /// Short name of the node shape, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar(_) => "scalar",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }
}

impl From<&str> for RawNode {
    fn from(text: &str) -> Self {
        Self::Scalar(text.to_string())
    }
}

/// Plain scalars that YAML reads as null.
fn is_plain_null(text: &str) -> bool {
    matches!(text, "" | "~" | "null" | "Null" | "NULL")
}

/// Collection being filled while events arrive.
enum Frame {
    Sequence {
        anchor: usize,
        items: Vec<RawNode>,
    },
    Mapping {
        anchor: usize,
        entries: Vec<(RawNode, RawNode)>,
        key: Option<RawNode>,
    },
}

/// Assembles a [`RawNode`] tree from parser events.
#[derive(Default)]
struct NodeBuilder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, RawNode>,
    root: Option<RawNode>,
}

impl NodeBuilder {
    fn push_node(&mut self, node: RawNode, anchor: usize) {
        if anchor != 0 {
            self.anchors.insert(anchor, node.clone());
        }
        match self.stack.last_mut() {
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping { entries, key, .. }) => match key.take() {
                Some(k) => entries.push((k, node)),
                None => *key = Some(node),
            },
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
        }
    }
}

impl EventReceiver for NodeBuilder {
    fn on_event(&mut self, ev: Event) {
        match ev {
            Event::Scalar(text, style, anchor, ..) => {
                let node = if matches!(style, TScalarStyle::Plain) && is_plain_null(&text) {
                    RawNode::Null
                } else {
                    RawNode::Scalar(text)
                };
                self.push_node(node, anchor);
            }
            Event::Alias(id) => {
                let node = self.anchors.get(&id).cloned().unwrap_or_default();
                self.push_node(node, 0);
            }
            Event::SequenceStart(anchor, ..) => self.stack.push(Frame::Sequence {
                anchor,
                items: Vec::new(),
            }),
            Event::MappingStart(anchor, ..) => self.stack.push(Frame::Mapping {
                anchor,
                entries: Vec::new(),
                key: None,
            }),
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Sequence { anchor, items }) => {
                    self.push_node(RawNode::Sequence(items), anchor)
                }
                Some(Frame::Mapping { anchor, entries, .. }) => {
                    self.push_node(RawNode::Mapping(entries), anchor)
                }
                None => {}
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_keep_source_text() {
        let node = RawNode::parse("a: 1.20\nb: 0x1F\nc: 1e3\nd: true\ne: '007'\n").unwrap();
        assert_eq!(node.get("a").and_then(RawNode::as_scalar), Some("1.20"));
        assert_eq!(node.get("b").and_then(RawNode::as_scalar), Some("0x1F"));
        assert_eq!(node.get("c").and_then(RawNode::as_scalar), Some("1e3"));
        assert_eq!(node.get("d").and_then(RawNode::as_scalar), Some("true"));
        assert_eq!(node.get("e").and_then(RawNode::as_scalar), Some("007"));
    }

    #[test]
    fn test_plain_nulls() {
        let node = RawNode::parse("a:\nb: ~\nc: null\nd: 'null'\n").unwrap();
        assert!(node.get("a").unwrap().is_null());
        assert!(node.get("b").unwrap().is_null());
        assert!(node.get("c").unwrap().is_null());
        assert_eq!(node.get("d").and_then(RawNode::as_scalar), Some("null"));
    }

    #[test]
    fn test_mapping_keeps_order() {
        let node = RawNode::parse("z: 1\na: 2\nm: 3\n").unwrap();
        let keys: Vec<_> = node
            .as_mapping()
            .unwrap()
            .iter()
            .filter_map(|(k, _)| k.as_scalar())
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_nested_collections() {
        let node = RawNode::parse("on:\n  push:\n    branches: [main, dev]\n").unwrap();
        let branches = node.get("on").unwrap().get("push").unwrap().get("branches").unwrap();
        assert_eq!(
            branches,
            &RawNode::Sequence(vec![RawNode::from("main"), RawNode::from("dev")])
        );
    }

    #[test]
    fn test_aliases_resolved() {
        let node = RawNode::parse("base: &opts [a, b]\ncopy: *opts\n").unwrap();
        assert_eq!(node.get("base"), node.get("copy"));
        assert!(node.get("copy").unwrap().is_sequence());
    }

    #[test]
    fn test_empty_document_is_null() {
        assert!(RawNode::parse("").unwrap().is_null());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(RawNode::parse("a: [1, 2").is_err());
    }

    #[test]
    fn test_get_on_non_mapping() {
        assert_eq!(RawNode::from("x").get("x"), None);
        assert_eq!(RawNode::Null.kind_name(), "null");
    }
}
