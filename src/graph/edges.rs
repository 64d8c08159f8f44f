//! Adjacency index: the dual representation of directed edges
//!
//! An edge `src -> dst` is stored twice: as a column group in the source's
//! row in the outgoing container, keyed by the destination's row key, and
//! mirrored in the destination's row in the incoming container, keyed by
//! the source's row key. Alongside each half-edge sit the neighbor-type
//! range markers (`T!` / `T~`) that bound the destination type's block of
//! columns for the scans in `neighbors`.
//!
//! The two writes are independent row mutations; a crash or a concurrent
//! reader between them can observe one half without the other. Reads
//! tolerate and lazily repair that divergence instead of preventing it.

use super::envelope;
use super::handle::{found, Graph, GraphResult};
use super::keys::{self, NODE_PROPERTIES};
use super::property::{matches_filter, PropertyMap};
use super::types::{Direction, NodeRef};
use crate::store::{ColumnGroups, WideColumnStore};
use tracing::debug;

impl<S: WideColumnStore> Graph<S> {
    /// Test whether the edge `src -> dst` exists.
    ///
    /// A found half-edge is only believed after both endpoints are
    /// verified: if either node is gone, the orphaned half is deleted on
    /// the spot and the edge reported absent (self-healing read).
    ///
    /// With `filter`, every supplied key/value pair must match the stored
    /// properties exactly; a missing or mismatched key fails the check.
    pub fn edge_exists(
        &self,
        src: &NodeRef,
        dst: &NodeRef,
        filter: Option<&PropertyMap>,
    ) -> GraphResult<bool> {
        self.ready()?;
        let src_row = keys::row_key(src);
        let dst_row = keys::row_key(dst);

        let stored = match found(self.store().read_group(
            self.container(Direction::Out),
            &src_row,
            &dst_row,
        ))? {
            Some(group) => group,
            None => return Ok(false),
        };

        if !self.node_exists(src)? {
            self.store()
                .remove_group(self.container(Direction::In), &dst_row, &src_row)?;
            debug!(src = %src, dst = %dst, "removed dangling incoming half-edge");
            return Ok(false);
        }
        if !self.node_exists(dst)? {
            self.store()
                .remove_group(self.container(Direction::Out), &src_row, &dst_row)?;
            debug!(src = %src, dst = %dst, "removed dangling outgoing half-edge");
            return Ok(false);
        }

        Ok(match filter {
            Some(expected) => matches_filter(&envelope::strip(stored), expected),
            None => true,
        })
    }

    /// Add the edge `src -> dst` with optional properties.
    ///
    /// Returns `false` without effect if the edge already exists. One
    /// insert per container: the outgoing write carries the edge group,
    /// the destination-type range markers and, if the source row has no
    /// property group yet, a placeholder for it; the incoming write
    /// mirrors the edge group with the source-type range markers.
    pub fn add_edge(
        &self,
        src: &NodeRef,
        dst: &NodeRef,
        properties: Option<PropertyMap>,
    ) -> GraphResult<bool> {
        self.ready()?;
        if self.edge_exists(src, dst, None)? {
            return Ok(false);
        }

        let src_row = keys::row_key(src);
        let dst_row = keys::row_key(dst);
        let wrapped = envelope::wrap(properties);

        let mut out_groups = ColumnGroups::new();
        out_groups.insert(dst_row.clone(), wrapped.clone());
        out_groups.insert(keys::range_start(dst.node_type()), envelope::placeholder());
        out_groups.insert(keys::range_end(dst.node_type()), envelope::placeholder());
        if found(self.store().read_group(
            self.container(Direction::Out),
            &src_row,
            NODE_PROPERTIES,
        ))?
        .is_none()
        {
            out_groups.insert(NODE_PROPERTIES.to_string(), envelope::placeholder());
        }
        self.store()
            .insert(self.container(Direction::Out), &src_row, out_groups)?;

        let mut in_groups = ColumnGroups::new();
        in_groups.insert(src_row.clone(), wrapped);
        in_groups.insert(keys::range_start(src.node_type()), envelope::placeholder());
        in_groups.insert(keys::range_end(src.node_type()), envelope::placeholder());
        self.store()
            .insert(self.container(Direction::In), &dst_row, in_groups)?;

        debug!(src = %src, dst = %dst, "added edge");
        Ok(true)
    }

    /// Replace the property map on both mirrored copies of an edge.
    ///
    /// Replacement, not a merge. Returns `false` if the edge does not
    /// exist. Range markers are assumed present from edge creation and are
    /// not re-added.
    pub fn update_edge(
        &self,
        src: &NodeRef,
        dst: &NodeRef,
        properties: PropertyMap,
    ) -> GraphResult<bool> {
        self.ready()?;
        if !self.edge_exists(src, dst, None)? {
            return Ok(false);
        }

        let src_row = keys::row_key(src);
        let dst_row = keys::row_key(dst);
        let wrapped = envelope::wrap(Some(properties));

        let mut out_groups = ColumnGroups::new();
        out_groups.insert(dst_row.clone(), wrapped.clone());
        self.store()
            .insert(self.container(Direction::Out), &src_row, out_groups)?;

        let mut in_groups = ColumnGroups::new();
        in_groups.insert(src_row.clone(), wrapped);
        self.store()
            .insert(self.container(Direction::In), &dst_row, in_groups)?;
        Ok(true)
    }

    /// Read an edge's properties from the outgoing copy.
    ///
    /// `None` if the edge does not exist (after the same endpoint
    /// verification as [`edge_exists`](Graph::edge_exists)).
    pub fn edge_properties(
        &self,
        src: &NodeRef,
        dst: &NodeRef,
    ) -> GraphResult<Option<PropertyMap>> {
        self.ready()?;
        if !self.edge_exists(src, dst, None)? {
            return Ok(None);
        }

        let src_row = keys::row_key(src);
        let dst_row = keys::row_key(dst);
        let stored = found(self.store().read_group(
            self.container(Direction::Out),
            &src_row,
            &dst_row,
        ))?;
        Ok(Some(match stored {
            Some(group) => envelope::strip(group),
            // Raced with a concurrent delete between the existence check
            // and the read
            None => PropertyMap::new(),
        }))
    }

    /// Remove both halves of the edge `src -> dst`.
    ///
    /// Blind removal: succeeds whether or not the edge exists. Range
    /// markers left empty by the removal are not cleaned up; an empty
    /// range scans as zero neighbors.
    pub fn delete_edge(&self, src: &NodeRef, dst: &NodeRef) -> GraphResult<()> {
        self.ready()?;
        let src_row = keys::row_key(src);
        let dst_row = keys::row_key(dst);

        self.store()
            .remove_group(self.container(Direction::Out), &src_row, &dst_row)?;
        self.store()
            .remove_group(self.container(Direction::In), &dst_row, &src_row)?;

        debug!(src = %src, dst = %dst, "deleted edge");
        Ok(())
    }

    /// Discard an edge's properties while preserving the edge.
    ///
    /// Implemented as delete followed by re-add with no properties; the
    /// two steps are not atomic, so a concurrent reader can observe the
    /// edge briefly absent.
    pub fn clear_edge_properties(&self, src: &NodeRef, dst: &NodeRef) -> GraphResult<()> {
        self.delete_edge(src, dst)?;
        self.add_edge(src, dst, None)?;
        Ok(())
    }

    /// Verify the dual representation of `src -> dst` and repair any
    /// divergence. Returns whether the edge exists after repair.
    ///
    /// The outgoing copy is authoritative:
    /// - outgoing half missing: a stray incoming half is removed
    /// - either endpoint missing: both halves are removed
    /// - incoming half missing or disagreeing: re-mirrored from outgoing
    pub fn repair_edge(&self, src: &NodeRef, dst: &NodeRef) -> GraphResult<bool> {
        self.ready()?;
        let src_row = keys::row_key(src);
        let dst_row = keys::row_key(dst);

        let out_half = found(self.store().read_group(
            self.container(Direction::Out),
            &src_row,
            &dst_row,
        ))?;
        let in_half = found(self.store().read_group(
            self.container(Direction::In),
            &dst_row,
            &src_row,
        ))?;

        let out_half = match out_half {
            Some(group) => group,
            None => {
                if in_half.is_some() {
                    self.store().remove_group(
                        self.container(Direction::In),
                        &dst_row,
                        &src_row,
                    )?;
                    debug!(src = %src, dst = %dst, "removed stray incoming half-edge");
                }
                return Ok(false);
            }
        };

        if !self.node_exists(src)? || !self.node_exists(dst)? {
            self.store()
                .remove_group(self.container(Direction::Out), &src_row, &dst_row)?;
            self.store()
                .remove_group(self.container(Direction::In), &dst_row, &src_row)?;
            debug!(src = %src, dst = %dst, "removed half-edges of missing endpoint");
            return Ok(false);
        }

        if in_half.as_ref() != Some(&out_half) {
            let mut in_groups = ColumnGroups::new();
            in_groups.insert(src_row.clone(), out_half);
            self.store()
                .insert(self.container(Direction::In), &dst_row, in_groups)?;
            debug!(src = %src, dst = %dst, "re-mirrored incoming half-edge");
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphError, PropertyValue};
    use crate::store::{MemoryStore, StoreError, WideColumnStore};
    use std::sync::Arc;

    fn connected_graph() -> Graph<MemoryStore> {
        let mut graph = Graph::new(Arc::new(MemoryStore::new()), "test");
        graph.construct().unwrap();
        graph.connect().unwrap();
        graph
    }

    fn props(key: &str, value: &str) -> PropertyMap {
        let mut map = PropertyMap::new();
        map.insert(key.to_string(), PropertyValue::from(value));
        map
    }

    fn user_pair(graph: &Graph<MemoryStore>) -> (NodeRef, NodeRef) {
        let alice = NodeRef::new("1", "user");
        let bob = NodeRef::new("2", "user");
        graph.add_node(&alice, None).unwrap();
        graph.add_node(&bob, None).unwrap();
        (alice, bob)
    }

    #[test]
    fn test_add_and_exists() {
        let graph = connected_graph();
        let (alice, bob) = user_pair(&graph);

        assert!(!graph.edge_exists(&alice, &bob, None).unwrap());
        assert!(graph.add_edge(&alice, &bob, None).unwrap());
        assert!(graph.edge_exists(&alice, &bob, None).unwrap());

        // Directed: the reverse edge does not exist
        assert!(!graph.edge_exists(&bob, &alice, None).unwrap());

        // Second add is a no-op
        assert!(!graph.add_edge(&alice, &bob, Some(props("x", "y"))).unwrap());
        assert!(graph.edge_properties(&alice, &bob).unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_properties_round_trip() {
        let graph = connected_graph();
        let (alice, bob) = user_pair(&graph);

        graph
            .add_edge(&alice, &bob, Some(props("since", "2020")))
            .unwrap();

        let stored = graph.edge_properties(&alice, &bob).unwrap().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get("since").unwrap().as_string(), Some("2020"));

        assert!(graph.edge_properties(&bob, &alice).unwrap().is_none());
    }

    #[test]
    fn test_property_filter() {
        let graph = connected_graph();
        let (alice, bob) = user_pair(&graph);
        graph
            .add_edge(&alice, &bob, Some(props("since", "2020")))
            .unwrap();

        assert!(graph
            .edge_exists(&alice, &bob, Some(&props("since", "2020")))
            .unwrap());
        assert!(!graph
            .edge_exists(&alice, &bob, Some(&props("since", "2021")))
            .unwrap());
        assert!(!graph
            .edge_exists(&alice, &bob, Some(&props("missing", "key")))
            .unwrap());
    }

    #[test]
    fn test_filter_never_sees_storage_internals() {
        // The sentinel entry backing empty groups is an implementation
        // detail; filters match against the same view reads expose
        let graph = connected_graph();
        let (alice, bob) = user_pair(&graph);
        graph.add_edge(&alice, &bob, None).unwrap();

        let mut internal = PropertyMap::new();
        internal.insert("__present".to_string(), PropertyValue::Boolean(true));
        assert!(!graph.edge_exists(&alice, &bob, Some(&internal)).unwrap());

        // And the empty filter still matches a propertyless edge
        assert!(graph
            .edge_exists(&alice, &bob, Some(&PropertyMap::new()))
            .unwrap());
    }

    #[test]
    fn test_update_edge() {
        let graph = connected_graph();
        let (alice, bob) = user_pair(&graph);
        graph
            .add_edge(&alice, &bob, Some(props("since", "2020")))
            .unwrap();

        assert!(graph
            .update_edge(&alice, &bob, props("weight", "3"))
            .unwrap());
        let stored = graph.edge_properties(&alice, &bob).unwrap().unwrap();
        assert!(stored.get("since").is_none());
        assert_eq!(stored.get("weight").unwrap().as_string(), Some("3"));

        assert!(!graph.update_edge(&bob, &alice, props("a", "b")).unwrap());
    }

    #[test]
    fn test_delete_edge() {
        let graph = connected_graph();
        let (alice, bob) = user_pair(&graph);
        graph.add_edge(&alice, &bob, None).unwrap();

        graph.delete_edge(&alice, &bob).unwrap();
        assert!(!graph.edge_exists(&alice, &bob, None).unwrap());

        // Blind: deleting again stays silent
        graph.delete_edge(&alice, &bob).unwrap();
    }

    #[test]
    fn test_clear_edge_properties() {
        let graph = connected_graph();
        let (alice, bob) = user_pair(&graph);
        graph
            .add_edge(&alice, &bob, Some(props("since", "2020")))
            .unwrap();

        graph.clear_edge_properties(&alice, &bob).unwrap();
        assert!(graph.edge_exists(&alice, &bob, None).unwrap());
        assert!(graph.edge_properties(&alice, &bob).unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_dangling_half_edge_repaired_on_read() {
        let graph = connected_graph();
        let (alice, bob) = user_pair(&graph);
        graph.add_edge(&alice, &bob, None).unwrap();

        // Deleting a node leaves the half-edges behind
        graph.delete_node(&bob).unwrap();

        // The next existence check removes the orphaned outgoing half
        assert!(!graph.edge_exists(&alice, &bob, None).unwrap());
        let alice_row = keys::row_key(&alice);
        let bob_row = keys::row_key(&bob);
        assert!(matches!(
            graph
                .store()
                .read_group("test_OUT", &alice_row, &bob_row)
                .unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn test_repair_removes_stray_incoming_half() {
        let graph = connected_graph();
        let (alice, bob) = user_pair(&graph);
        graph.add_edge(&alice, &bob, None).unwrap();

        // Simulate a torn write: outgoing half gone, incoming half left
        let alice_row = keys::row_key(&alice);
        let bob_row = keys::row_key(&bob);
        graph
            .store()
            .remove_group("test_OUT", &alice_row, &bob_row)
            .unwrap();

        assert!(!graph.repair_edge(&alice, &bob).unwrap());
        assert!(matches!(
            graph
                .store()
                .read_group("test_IN", &bob_row, &alice_row)
                .unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn test_repair_remirrors_missing_incoming_half() {
        let graph = connected_graph();
        let (alice, bob) = user_pair(&graph);
        graph
            .add_edge(&alice, &bob, Some(props("since", "2020")))
            .unwrap();

        // Simulate the other torn write: incoming half lost
        let alice_row = keys::row_key(&alice);
        let bob_row = keys::row_key(&bob);
        graph
            .store()
            .remove_group("test_IN", &bob_row, &alice_row)
            .unwrap();

        assert!(graph.repair_edge(&alice, &bob).unwrap());
        let mirrored = graph
            .store()
            .read_group("test_IN", &bob_row, &alice_row)
            .unwrap();
        assert_eq!(mirrored.get("since").unwrap().as_string(), Some("2020"));
    }

    #[test]
    fn test_not_ready() {
        let graph = Graph::new(Arc::new(MemoryStore::new()), "test");
        let alice = NodeRef::new("1", "user");
        let bob = NodeRef::new("2", "user");

        assert!(matches!(
            graph.edge_exists(&alice, &bob, None).unwrap_err(),
            GraphError::GraphNotReady(_)
        ));
        assert!(matches!(
            graph.add_edge(&alice, &bob, None).unwrap_err(),
            GraphError::GraphNotReady(_)
        ));
    }
}
