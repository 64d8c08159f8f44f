//! Wide-column store collaborator interface
//!
//! The graph layer is a client-side convention over a generic row /
//! column-family store. This module defines the narrow trait the graph
//! layer consumes, along with two implementations:
//! - [`MemoryStore`]: reference semantics, used throughout the test suite
//! - [`RocksStore`]: persistent backend on RocksDB
//!
//! Durability, replication and consistency tuning belong to the store, not
//! to this crate.

pub mod memory;
pub mod rocks;

pub use memory::MemoryStore;
pub use rocks::RocksStore;

use crate::graph::PropertyMap;
use std::collections::BTreeMap;
use thiserror::Error;

/// Nested column groups addressed to one row, keyed by column key.
///
/// Ordered so a multi-group insert enumerates deterministically; the store
/// itself keeps columns in lexicographic byte order.
pub type ColumnGroups = BTreeMap<String, PropertyMap>;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Distinguished absence signal: the addressed row or column group does
    /// not exist. Callers that legitimately expect absence translate this
    /// into `false` / `None` / an empty result instead of propagating it.
    #[error("not found: {0}")]
    NotFound(String),

    /// The named container has not been created
    #[error("unknown container: {0}")]
    UnknownContainer(String),

    /// Attempt to create a container that already exists
    #[error("container already exists: {0}")]
    ContainerExists(String),

    /// Column family error
    #[error("column family error: {0}")]
    ColumnFamily(String),

    /// RocksDB error
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A wide-column (row / column-family) store
///
/// Rows live in named containers; each row holds column groups (nested
/// key-value maps) ordered lexicographically by column key. Writes have
/// per-row atomicity at best; nothing here coordinates across rows or
/// containers.
pub trait WideColumnStore: Send + Sync {
    // Schema operations

    /// Create a named container. Fails with [`StoreError::ContainerExists`]
    /// if it is already present.
    fn create_container(&self, name: &str) -> StoreResult<()>;

    /// Drop a named container and all of its rows.
    fn drop_container(&self, name: &str) -> StoreResult<()>;

    /// Test whether a named container exists.
    fn container_exists(&self, name: &str) -> StoreResult<bool>;

    /// List all containers, sorted by name.
    fn list_containers(&self) -> StoreResult<Vec<String>>;

    // Row operations

    /// Upsert column groups into a row, creating the row if absent.
    ///
    /// Group-level replacement: each named group is replaced whole; groups
    /// not named are left untouched.
    fn insert(&self, container: &str, row_key: &str, groups: ColumnGroups) -> StoreResult<()>;

    /// Read a single column group. Fails with [`StoreError::NotFound`] when
    /// the row or the group is absent.
    fn read_group(
        &self,
        container: &str,
        row_key: &str,
        column_key: &str,
    ) -> StoreResult<PropertyMap>;

    /// Read up to `limit` column groups of a row whose keys fall in the
    /// inclusive range `[start, finish]`, in lexicographic order. Fails
    /// with [`StoreError::NotFound`] when the row itself is absent; an
    /// existing row with no columns in range yields an empty vector.
    fn read_range(
        &self,
        container: &str,
        row_key: &str,
        start: &str,
        finish: &str,
        limit: usize,
    ) -> StoreResult<Vec<(String, PropertyMap)>>;

    /// Test whether a row exists (has at least one column group).
    fn contains_row(&self, container: &str, row_key: &str) -> StoreResult<bool>;

    /// Remove a whole row. Blind delete: succeeds whether or not the row
    /// exists (tombstone semantics).
    fn remove_row(&self, container: &str, row_key: &str) -> StoreResult<()>;

    /// Remove a single column group. Blind delete, like [`remove_row`].
    ///
    /// [`remove_row`]: WideColumnStore::remove_row
    fn remove_group(&self, container: &str, row_key: &str, column_key: &str) -> StoreResult<()>;
}
