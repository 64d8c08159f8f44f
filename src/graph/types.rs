//! Core type definitions for the graph layer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node type name (e.g. "user", "post")
///
/// Types partition the row-key namespace: every node of type `user` has a
/// row key starting with `user_`, which is what makes type-bounded column
/// scans possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeType(String);

impl NodeType {
    pub fn new(node_type: impl Into<String>) -> Self {
        NodeType(node_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        NodeType(s)
    }
}

impl From<&str> for NodeType {
    fn from(s: &str) -> Self {
        NodeType(s.to_string())
    }
}

/// Reference to a graph vertex: an (identifier, type) pair
///
/// Node references are not stored as objects; they only address rows in the
/// two mirrored containers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    id: String,
    node_type: NodeType,
}

impl NodeRef {
    pub fn new(id: impl Into<String>, node_type: impl Into<NodeType>) -> Self {
        NodeRef {
            id: id.into(),
            node_type: node_type.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node_type, self.id)
    }
}

/// Traversal direction for neighbor enumeration
///
/// `Out` scans the outgoing container (edges leaving the node), `In` scans
/// the incoming container (edges arriving at the node).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Out,
    In,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type() {
        let t = NodeType::new("user");
        assert_eq!(t.as_str(), "user");
        assert_eq!(format!("{}", t), "user");

        let t2: NodeType = "post".into();
        assert_eq!(t2.as_str(), "post");
    }

    #[test]
    fn test_node_ref() {
        let node = NodeRef::new("1", "user");
        assert_eq!(node.id(), "1");
        assert_eq!(node.node_type().as_str(), "user");
        assert_eq!(format!("{}", node), "user:1");
    }

    #[test]
    fn test_node_ref_equality() {
        let a = NodeRef::new("1", "user");
        let b = NodeRef::new("1", "user");
        let c = NodeRef::new("1", "post");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
