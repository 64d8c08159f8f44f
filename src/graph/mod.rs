//! Graph-encoding and traversal layer
//!
//! Maps a directed, typed property graph onto two mirrored wide-column
//! containers: an outgoing index (`<name>_OUT`, rows keyed by edge source)
//! and an incoming index (`<name>_IN`, rows keyed by edge destination).
//! Nodes are rows, edges are nested column groups, and a node's neighbors
//! of one type occupy a contiguous, marker-bounded block of columns that
//! can be scanned in pages.
//!
//! The layer is a pure client-side convention: it owns the key encoding
//! and nothing else, and consumes the store through
//! [`WideColumnStore`](crate::store::WideColumnStore).

pub mod envelope;
pub mod keys;
pub mod property;
pub mod types;

mod edges;
mod handle;
mod neighbors;
mod nodes;

// Re-export main types
pub use handle::{Graph, GraphError, GraphResult};
pub use neighbors::{Neighbor, Neighbors};
pub use property::{PropertyMap, PropertyValue};
pub use types::{Direction, NodeRef, NodeType};
