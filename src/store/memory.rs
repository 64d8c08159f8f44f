//! In-memory wide-column store
//!
//! Reference implementation of [`WideColumnStore`] backed by nested maps.
//! Rows keep their column groups in a `BTreeMap`, which gives the
//! lexicographic column ordering the range scans rely on.

use super::{ColumnGroups, StoreError, StoreResult, WideColumnStore};
use crate::graph::PropertyMap;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound::Included;
use std::sync::RwLock;
use tracing::debug;

type Row = BTreeMap<String, PropertyMap>;
type Container = HashMap<String, Row>;

/// In-memory store, used as the reference backend in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    containers: RwLock<HashMap<String, Container>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl WideColumnStore for MemoryStore {
    fn create_container(&self, name: &str) -> StoreResult<()> {
        let mut containers = self.containers.write().unwrap();
        if containers.contains_key(name) {
            return Err(StoreError::ContainerExists(name.to_string()));
        }
        containers.insert(name.to_string(), Container::new());
        debug!(container = name, "created container");
        Ok(())
    }

    fn drop_container(&self, name: &str) -> StoreResult<()> {
        let mut containers = self.containers.write().unwrap();
        if containers.remove(name).is_none() {
            return Err(StoreError::UnknownContainer(name.to_string()));
        }
        debug!(container = name, "dropped container");
        Ok(())
    }

    fn container_exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.containers.read().unwrap().contains_key(name))
    }

    fn list_containers(&self) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = self.containers.read().unwrap().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn insert(&self, container: &str, row_key: &str, groups: ColumnGroups) -> StoreResult<()> {
        let mut containers = self.containers.write().unwrap();
        let rows = containers
            .get_mut(container)
            .ok_or_else(|| StoreError::UnknownContainer(container.to_string()))?;
        let row = rows.entry(row_key.to_string()).or_default();
        for (column_key, group) in groups {
            row.insert(column_key, group);
        }
        Ok(())
    }

    fn read_group(
        &self,
        container: &str,
        row_key: &str,
        column_key: &str,
    ) -> StoreResult<PropertyMap> {
        let containers = self.containers.read().unwrap();
        let rows = containers
            .get(container)
            .ok_or_else(|| StoreError::UnknownContainer(container.to_string()))?;
        rows.get(row_key)
            .and_then(|row| row.get(column_key))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}/{}", container, row_key, column_key)))
    }

    fn read_range(
        &self,
        container: &str,
        row_key: &str,
        start: &str,
        finish: &str,
        limit: usize,
    ) -> StoreResult<Vec<(String, PropertyMap)>> {
        let containers = self.containers.read().unwrap();
        let rows = containers
            .get(container)
            .ok_or_else(|| StoreError::UnknownContainer(container.to_string()))?;
        let row = rows
            .get(row_key)
            .filter(|row| !row.is_empty())
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", container, row_key)))?;
        Ok(row
            .range::<str, _>((Included(start), Included(finish)))
            .take(limit)
            .map(|(key, group)| (key.clone(), group.clone()))
            .collect())
    }

    fn contains_row(&self, container: &str, row_key: &str) -> StoreResult<bool> {
        let containers = self.containers.read().unwrap();
        let rows = containers
            .get(container)
            .ok_or_else(|| StoreError::UnknownContainer(container.to_string()))?;
        // A row with zero groups is indistinguishable from an absent one
        Ok(rows.get(row_key).is_some_and(|row| !row.is_empty()))
    }

    fn remove_row(&self, container: &str, row_key: &str) -> StoreResult<()> {
        let mut containers = self.containers.write().unwrap();
        let rows = containers
            .get_mut(container)
            .ok_or_else(|| StoreError::UnknownContainer(container.to_string()))?;
        rows.remove(row_key);
        Ok(())
    }

    fn remove_group(&self, container: &str, row_key: &str, column_key: &str) -> StoreResult<()> {
        let mut containers = self.containers.write().unwrap();
        let rows = containers
            .get_mut(container)
            .ok_or_else(|| StoreError::UnknownContainer(container.to_string()))?;
        if let Some(row) = rows.get_mut(row_key) {
            row.remove(column_key);
        }
        Ok(())
    }
}
