//! Node CRUD over the mirrored container pair
//!
//! Every node occupies one row per container, keyed by `type + "_" + id`,
//! with its properties in the fixed `node-properties` column group. Writes
//! go to both containers but are not atomic across them; the outgoing
//! container is authoritative for existence checks.

use super::envelope;
use super::handle::{found, Graph, GraphResult};
use super::keys::{self, NODE_PROPERTIES};
use super::property::PropertyMap;
use super::types::{Direction, NodeRef};
use crate::store::{ColumnGroups, WideColumnStore};
use tracing::debug;

impl<S: WideColumnStore> Graph<S> {
    /// Test whether a node exists.
    ///
    /// Consults the outgoing container only; the incoming container is
    /// assumed to agree.
    pub fn node_exists(&self, node: &NodeRef) -> GraphResult<bool> {
        self.ready()?;
        let row_key = keys::row_key(node);
        Ok(self
            .store()
            .contains_row(self.container(Direction::Out), &row_key)?)
    }

    /// Add a node with optional initial properties.
    ///
    /// Returns `false` without effect if the node already exists. The
    /// existence check and the two container writes are not one atomic
    /// step: concurrent adds of the same node are last-writer-wins.
    pub fn add_node(&self, node: &NodeRef, properties: Option<PropertyMap>) -> GraphResult<bool> {
        self.ready()?;
        if self.node_exists(node)? {
            return Ok(false);
        }

        let row_key = keys::row_key(node);
        let mut groups = ColumnGroups::new();
        groups.insert(NODE_PROPERTIES.to_string(), envelope::wrap(properties));

        self.store()
            .insert(self.container(Direction::Out), &row_key, groups.clone())?;
        self.store()
            .insert(self.container(Direction::In), &row_key, groups)?;

        debug!(node = %node, "added node");
        Ok(true)
    }

    /// Delete a node, removing its row from both containers.
    ///
    /// Returns `false` if the node did not exist. Does not cascade to
    /// incident edges: their half-edges dangle until an edge operation
    /// discovers and repairs them.
    pub fn delete_node(&self, node: &NodeRef) -> GraphResult<bool> {
        self.ready()?;
        if !self.node_exists(node)? {
            return Ok(false);
        }

        let row_key = keys::row_key(node);
        self.store()
            .remove_row(self.container(Direction::Out), &row_key)?;
        self.store()
            .remove_row(self.container(Direction::In), &row_key)?;

        debug!(node = %node, "deleted node");
        Ok(true)
    }

    /// Replace a node's property map in both containers.
    ///
    /// Replacement, not a merge: keys absent from `properties` are gone
    /// afterwards. Returns `false` if the node does not exist.
    pub fn update_node_properties(
        &self,
        node: &NodeRef,
        properties: PropertyMap,
    ) -> GraphResult<bool> {
        self.ready()?;
        if !self.node_exists(node)? {
            return Ok(false);
        }

        let row_key = keys::row_key(node);
        let mut groups = ColumnGroups::new();
        groups.insert(NODE_PROPERTIES.to_string(), envelope::wrap(Some(properties)));

        self.store()
            .insert(self.container(Direction::Out), &row_key, groups.clone())?;
        self.store()
            .insert(self.container(Direction::In), &row_key, groups)?;
        Ok(true)
    }

    /// Read a node's properties from the outgoing container.
    ///
    /// `None` if the node does not exist; an existing node with no
    /// caller-supplied properties reads back as an empty map.
    pub fn node_properties(&self, node: &NodeRef) -> GraphResult<Option<PropertyMap>> {
        self.ready()?;
        if !self.node_exists(node)? {
            return Ok(None);
        }

        let row_key = keys::row_key(node);
        let stored = found(self.store().read_group(
            self.container(Direction::Out),
            &row_key,
            NODE_PROPERTIES,
        ))?;
        Ok(Some(match stored {
            Some(group) => envelope::strip(group),
            // Row present but property group missing: an edge write got
            // here first. Read as empty rather than absent.
            None => PropertyMap::new(),
        }))
    }

    /// Discard a node's properties while preserving its existence.
    ///
    /// Removes and reinserts an empty property group in both containers.
    /// Returns `false` if the node does not exist.
    pub fn clear_node_properties(&self, node: &NodeRef) -> GraphResult<bool> {
        self.ready()?;
        if !self.node_exists(node)? {
            return Ok(false);
        }

        let row_key = keys::row_key(node);
        for direction in [Direction::Out, Direction::In] {
            self.store()
                .remove_group(self.container(direction), &row_key, NODE_PROPERTIES)?;
            let mut groups = ColumnGroups::new();
            groups.insert(NODE_PROPERTIES.to_string(), envelope::placeholder());
            self.store()
                .insert(self.container(direction), &row_key, groups)?;
        }
        Ok(true)
    }
}
