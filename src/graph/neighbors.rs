//! Paginated, type-filtered neighbor enumeration
//!
//! Scans one row's columns over the bounded range `[T!, T~]` in fixed-size
//! pages instead of reading the whole row. The range markers written at
//! edge creation bound type `T`'s block of columns, but the range is not
//! exclusive to it: markers, the node's own property group and the keys of
//! any type sharing `T`'s prefix can sort inside it. Only columns carrying
//! the `T + "_"` prefix are yielded; seeing the upper marker ends the scan.
//!
//! Continuation between pages uses the immediate successor of the last key
//! fetched as the next inclusive lower bound, so a key on a page boundary
//! is never fetched or yielded twice.

use super::envelope;
use super::handle::{found, Graph, GraphResult};
use super::keys;
use super::property::{matches_filter, PropertyMap};
use super::types::{Direction, NodeRef, NodeType};
use crate::store::WideColumnStore;
use std::collections::VecDeque;

/// Columns fetched per page, range markers included.
pub(crate) const PAGE_SIZE: usize = 10;

/// One enumerated neighbor: its bare identifier and the connecting edge's
/// properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: String,
    pub properties: PropertyMap,
}

impl<S: WideColumnStore> Graph<S> {
    /// Enumerate a node's neighbors of one type, lazily and in pages.
    ///
    /// `direction` picks the container: `Out` yields destinations of edges
    /// leaving `node`, `In` yields sources of edges arriving at it. With
    /// `filter`, only neighbors whose edge properties match every supplied
    /// key/value pair are yielded.
    ///
    /// A node with no row, or no edges of the requested type, enumerates
    /// as empty rather than failing. The iterator is finite and cannot be
    /// restarted; call again for a fresh scan.
    pub fn neighbors(
        &self,
        node: &NodeRef,
        neighbor_type: impl Into<NodeType>,
        direction: Direction,
        filter: Option<PropertyMap>,
    ) -> GraphResult<Neighbors<'_, S>> {
        self.ready()?;
        let neighbor_type = neighbor_type.into();
        Ok(Neighbors {
            graph: self,
            direction,
            row_key: keys::row_key(node),
            range_end: keys::range_end(&neighbor_type),
            next_start: keys::range_start(&neighbor_type),
            neighbor_type,
            filter,
            buffered: VecDeque::new(),
            done: false,
        })
    }
}

/// Lazy cursor over one node's neighbors of one type
///
/// Fetches one page per underlying read; the caller's iteration suspends
/// between pages but not between items within a page.
pub struct Neighbors<'g, S: WideColumnStore> {
    graph: &'g Graph<S>,
    direction: Direction,
    row_key: String,
    neighbor_type: NodeType,
    range_end: String,
    next_start: String,
    filter: Option<PropertyMap>,
    buffered: VecDeque<Neighbor>,
    done: bool,
}

impl<S: WideColumnStore> Neighbors<'_, S> {
    fn fetch_page(&mut self) -> GraphResult<()> {
        let container = self.graph.container(self.direction);
        let page = match found(self.graph.store().read_range(
            container,
            &self.row_key,
            &self.next_start,
            &self.range_end,
            PAGE_SIZE,
        ))? {
            Some(page) => page,
            // No such row: the node has no neighbors of this type
            None => {
                self.done = true;
                return Ok(());
            }
        };

        let fetched = page.len();
        let mut last_key = None;

        for (column_key, group) in page {
            if column_key == self.range_end {
                self.done = true;
                break;
            }
            last_key = Some(column_key.clone());

            // Markers and prefix-sharing foreign keys fall in the range
            // but carry no `type_` prefix
            let id = match keys::strip_type_prefix(&column_key, &self.neighbor_type) {
                Some(id) => id.to_string(),
                None => continue,
            };

            let properties = envelope::strip(group);
            if let Some(expected) = &self.filter {
                if !matches_filter(&properties, expected) {
                    continue;
                }
            }
            self.buffered.push_back(Neighbor { id, properties });
        }

        if fetched < PAGE_SIZE {
            self.done = true;
        }
        if !self.done {
            match last_key {
                Some(key) => self.next_start = keys::successor(&key),
                None => self.done = true,
            }
        }
        Ok(())
    }
}

impl<S: WideColumnStore> Iterator for Neighbors<'_, S> {
    type Item = GraphResult<Neighbor>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(neighbor) = self.buffered.pop_front() {
                return Some(Ok(neighbor));
            }
            if self.done {
                return None;
            }
            if let Err(err) = self.fetch_page() {
                self.done = true;
                return Some(Err(err));
            }
        }
    }
}
