//! Row and column key codec
//!
//! Pure functions mapping node references onto the row/column namespace of
//! the two mirrored containers, plus the type-bounded range markers that
//! delimit one neighbor type's block of columns.
//!
//! The markers rely on ASCII ordering: `'!' < '_' < '~'`, so for any type
//! `T` every row key `T_<id>` sorts strictly between `T!` and `T~` under
//! the store's lexicographic column ordering.

use super::types::{NodeRef, NodeType};

/// Fixed column key holding a node's own property group.
///
/// Carries no `type + "_"` prefix, so the neighbor scan never surfaces it
/// even when it happens to sort inside a type's marker range.
pub(crate) const NODE_PROPERTIES: &str = "node-properties";

/// Row key for a node: `type + "_" + id`.
pub fn row_key(node: &NodeRef) -> String {
    format!("{}_{}", node.node_type().as_str(), node.id())
}

/// Lower range marker for a neighbor type: `type + "!"`.
pub fn range_start(node_type: &NodeType) -> String {
    format!("{}!", node_type.as_str())
}

/// Upper range marker for a neighbor type: `type + "~"`.
pub fn range_end(node_type: &NodeType) -> String {
    format!("{}~", node_type.as_str())
}

/// Recover the bare identifier from a column key by stripping the leading
/// `type + "_"` prefix. `None` for keys without the prefix, which includes
/// range markers and the keys of any type sharing this type's prefix
/// (`user2_g` sorts inside `[user!, user~]` but is not a `user` key).
pub fn strip_type_prefix<'a>(column_key: &'a str, node_type: &NodeType) -> Option<&'a str> {
    column_key
        .strip_prefix(node_type.as_str())
        .and_then(|rest| rest.strip_prefix('_'))
}

/// Immediate lexicographic successor of a key.
///
/// Appending NUL produces the smallest key strictly greater than `key`,
/// used as the inclusive lower bound of the next scan page so the last key
/// of the previous page is never re-fetched.
pub fn successor(key: &str) -> String {
    format!("{}\u{0}", key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_key() {
        let node = NodeRef::new("42", "user");
        assert_eq!(row_key(&node), "user_42");
    }

    #[test]
    fn test_range_markers_bound_row_keys() {
        let t = NodeType::new("user");
        let start = range_start(&t);
        let end = range_end(&t);
        assert_eq!(start, "user!");
        assert_eq!(end, "user~");

        // Every row key of the type sorts strictly inside the range
        for id in ["", "0", "42", "zzz", "~oddball"] {
            let key = row_key(&NodeRef::new(id, "user"));
            assert!(start < key, "{} should sort after {}", key, start);
            assert!(key < end, "{} should sort before {}", key, end);
        }
    }

    #[test]
    fn test_range_isolation_between_types() {
        // Row keys of a different type fall outside the range
        let t = NodeType::new("user");
        let other = row_key(&NodeRef::new("1", "post"));
        assert!(other < range_start(&t) || other > range_end(&t));
    }

    #[test]
    fn test_strip_type_prefix() {
        let t = NodeType::new("user");
        assert_eq!(strip_type_prefix("user_42", &t), Some("42"));
        assert_eq!(strip_type_prefix("user_", &t), Some(""));
        // Foreign keys, markers and prefix-sharing types are rejected
        assert_eq!(strip_type_prefix("post_1", &t), None);
        assert_eq!(strip_type_prefix("userx_1", &t), None);
        assert_eq!(strip_type_prefix("user!", &t), None);
        assert_eq!(strip_type_prefix("user~", &t), None);
        assert_eq!(strip_type_prefix("user2_g", &t), None);
        assert_eq!(strip_type_prefix(NODE_PROPERTIES, &NodeType::new("n")), None);
    }

    #[test]
    fn test_successor_ordering() {
        let key = "user_42".to_string();
        let next = successor(&key);
        assert!(key < next);
        // Nothing sorts between a key and its successor
        assert!(next < "user_42a".to_string());
        assert!(next < "user_43".to_string());
    }
}
