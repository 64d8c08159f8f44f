//! Gossamer
//!
//! A directed, typed property graph layered as a client-side index over a
//! generic wide-column (row / column-family) store. Nodes carry typed
//! string identifiers and arbitrary key-value properties; directed edges
//! between nodes carry properties too; callers can test existence, mutate
//! properties, and enumerate a node's neighbors of a given type with
//! pagination.
//!
//! # Architecture
//!
//! - [`graph`]: the encoding and traversal layer: key codec, property
//!   envelope, node store, adjacency index, neighbor cursor and graph
//!   lifecycle. This is where all the design lives.
//! - [`store`]: the narrow collaborator trait the graph layer consumes,
//!   with an in-memory reference backend and a persistent RocksDB backend.
//!
//! Consistency between the two mirrored containers is best-effort by
//! construction: writes are independent per-container mutations, and read
//! paths lazily repair the divergence they discover. There are no
//! client-side locks, transactions or caches.
//!
//! # Example
//!
//! ```
//! use gossamer::{Direction, Graph, MemoryStore, NodeRef, PropertyMap, PropertyValue};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! let mut graph = Graph::new(store, "social");
//! graph.construct().unwrap();
//! graph.connect().unwrap();
//!
//! let alice = NodeRef::new("1", "user");
//! let bob = NodeRef::new("2", "user");
//! graph.add_node(&alice, None).unwrap();
//! graph.add_node(&bob, None).unwrap();
//!
//! let mut since = PropertyMap::new();
//! since.insert("since".to_string(), PropertyValue::from("2020"));
//! graph.add_edge(&alice, &bob, Some(since)).unwrap();
//!
//! let friends: Vec<_> = graph
//!     .neighbors(&alice, "user", Direction::Out, None)
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(friends.len(), 1);
//! assert_eq!(friends[0].id, "2");
//! ```

#![warn(clippy::all)]

pub mod graph;
pub mod store;

// Re-export main types for convenience
pub use graph::{
    Direction, Graph, GraphError, GraphResult, Neighbor, Neighbors, NodeRef, NodeType,
    PropertyMap, PropertyValue,
};
pub use store::{
    ColumnGroups, MemoryStore, RocksStore, StoreError, StoreResult, WideColumnStore,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
