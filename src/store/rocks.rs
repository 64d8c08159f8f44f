//! RocksDB-backed wide-column store
//!
//! Maps the container/row/column namespace onto a single RocksDB database:
//! a `meta` column family registers container names, and a `data` column
//! family holds one entry per column group under the composite key
//! `container \0 row \0 column`, with the group bincode-encoded as the
//! value. RocksDB's byte-ordered iteration over those composite keys gives
//! the lexicographic column ordering the range scans rely on.
//!
//! Container, row and column keys must not contain NUL, which is reserved
//! as the key separator.

use super::{ColumnGroups, StoreError, StoreResult, WideColumnStore};
use crate::graph::PropertyMap;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const META_CF: &str = "meta";
const DATA_CF: &str = "data";
const SEPARATOR: u8 = 0;

/// RocksDB-based persistent store
pub struct RocksStore {
    db: Arc<DB>,
}

impl RocksStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        info!(path = %path.as_ref().display(), "opening wide-column store");

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(64 * 1024 * 1024); // 64 MB
        opts.set_max_write_buffer_number(3);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new("default", Options::default()),
            ColumnFamilyDescriptor::new(META_CF, Options::default()),
            ColumnFamilyDescriptor::new(DATA_CF, Self::data_cf_options()),
        ];

        let db = DB::open_cf_descriptors(&opts, path.as_ref(), cf_descriptors)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn data_cf_options() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn meta_cf(&self) -> StoreResult<&ColumnFamily> {
        self.db
            .cf_handle(META_CF)
            .ok_or_else(|| StoreError::ColumnFamily(META_CF.to_string()))
    }

    fn data_cf(&self) -> StoreResult<&ColumnFamily> {
        self.db
            .cf_handle(DATA_CF)
            .ok_or_else(|| StoreError::ColumnFamily(DATA_CF.to_string()))
    }

    fn ensure_container(&self, name: &str) -> StoreResult<()> {
        let meta = self.meta_cf()?;
        if self.db.get_cf(meta, name.as_bytes())?.is_none() {
            return Err(StoreError::UnknownContainer(name.to_string()));
        }
        Ok(())
    }

    /// Composite key for one column group: `container \0 row \0 column`
    fn group_key(container: &str, row_key: &str, column_key: &str) -> Vec<u8> {
        let mut key = Self::row_prefix(container, row_key);
        key.extend_from_slice(column_key.as_bytes());
        key
    }

    /// Key prefix shared by every column group of one row
    fn row_prefix(container: &str, row_key: &str) -> Vec<u8> {
        let mut prefix =
            Vec::with_capacity(container.len() + row_key.len() + 2);
        prefix.extend_from_slice(container.as_bytes());
        prefix.push(SEPARATOR);
        prefix.extend_from_slice(row_key.as_bytes());
        prefix.push(SEPARATOR);
        prefix
    }

    /// Key prefix shared by every row of one container
    fn container_prefix(container: &str) -> Vec<u8> {
        let mut prefix = Vec::with_capacity(container.len() + 1);
        prefix.extend_from_slice(container.as_bytes());
        prefix.push(SEPARATOR);
        prefix
    }

    /// Delete every data entry under a key prefix
    fn delete_prefix(&self, prefix: &[u8]) -> StoreResult<()> {
        let data = self.data_cf()?;
        let mut batch = WriteBatch::default();
        let iter = self
            .db
            .iterator_cf(data, IteratorMode::From(prefix, rocksdb::Direction::Forward));
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            batch.delete_cf(data, key);
        }
        self.db.write(batch)?;
        Ok(())
    }

    fn row_has_entries(&self, container: &str, row_key: &str) -> StoreResult<bool> {
        let data = self.data_cf()?;
        let prefix = Self::row_prefix(container, row_key);
        let mut iter = self
            .db
            .iterator_cf(data, IteratorMode::From(&prefix, rocksdb::Direction::Forward));
        match iter.next() {
            Some(item) => {
                let (key, _) = item?;
                Ok(key.starts_with(prefix.as_slice()))
            }
            None => Ok(false),
        }
    }
}

impl WideColumnStore for RocksStore {
    fn create_container(&self, name: &str) -> StoreResult<()> {
        let meta = self.meta_cf()?;
        if self.db.get_cf(meta, name.as_bytes())?.is_some() {
            return Err(StoreError::ContainerExists(name.to_string()));
        }
        self.db.put_cf(meta, name.as_bytes(), b"")?;
        debug!(container = name, "created container");
        Ok(())
    }

    fn drop_container(&self, name: &str) -> StoreResult<()> {
        self.ensure_container(name)?;
        self.delete_prefix(&Self::container_prefix(name))?;
        let meta = self.meta_cf()?;
        self.db.delete_cf(meta, name.as_bytes())?;
        debug!(container = name, "dropped container");
        Ok(())
    }

    fn container_exists(&self, name: &str) -> StoreResult<bool> {
        let meta = self.meta_cf()?;
        Ok(self.db.get_cf(meta, name.as_bytes())?.is_some())
    }

    fn list_containers(&self) -> StoreResult<Vec<String>> {
        let meta = self.meta_cf()?;
        let mut names = Vec::new();
        for item in self.db.iterator_cf(meta, IteratorMode::Start) {
            let (key, _) = item?;
            names.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(names)
    }

    fn insert(&self, container: &str, row_key: &str, groups: ColumnGroups) -> StoreResult<()> {
        self.ensure_container(container)?;
        let data = self.data_cf()?;
        let mut batch = WriteBatch::default();
        for (column_key, group) in &groups {
            let key = Self::group_key(container, row_key, column_key);
            batch.put_cf(data, key, bincode::serialize(group)?);
        }
        self.db.write(batch)?;
        Ok(())
    }

    fn read_group(
        &self,
        container: &str,
        row_key: &str,
        column_key: &str,
    ) -> StoreResult<PropertyMap> {
        self.ensure_container(container)?;
        let data = self.data_cf()?;
        let key = Self::group_key(container, row_key, column_key);
        match self.db.get_cf(data, key)? {
            Some(value) => Ok(bincode::deserialize(&value)?),
            None => Err(StoreError::NotFound(format!(
                "{}/{}/{}",
                container, row_key, column_key
            ))),
        }
    }

    fn read_range(
        &self,
        container: &str,
        row_key: &str,
        start: &str,
        finish: &str,
        limit: usize,
    ) -> StoreResult<Vec<(String, PropertyMap)>> {
        self.ensure_container(container)?;
        if !self.row_has_entries(container, row_key)? {
            return Err(StoreError::NotFound(format!("{}/{}", container, row_key)));
        }

        let data = self.data_cf()?;
        let prefix = Self::row_prefix(container, row_key);
        let mut scan_start = prefix.clone();
        scan_start.extend_from_slice(start.as_bytes());

        let mut results = Vec::new();
        let iter = self.db.iterator_cf(
            data,
            IteratorMode::From(&scan_start, rocksdb::Direction::Forward),
        );
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix.as_slice()) {
                break;
            }
            let column = &key[prefix.len()..];
            if column > finish.as_bytes() {
                break;
            }
            results.push((
                String::from_utf8_lossy(column).into_owned(),
                bincode::deserialize(&value)?,
            ));
            if results.len() == limit {
                break;
            }
        }
        Ok(results)
    }

    fn contains_row(&self, container: &str, row_key: &str) -> StoreResult<bool> {
        self.ensure_container(container)?;
        self.row_has_entries(container, row_key)
    }

    fn remove_row(&self, container: &str, row_key: &str) -> StoreResult<()> {
        self.ensure_container(container)?;
        self.delete_prefix(&Self::row_prefix(container, row_key))
    }

    fn remove_group(&self, container: &str, row_key: &str, column_key: &str) -> StoreResult<()> {
        self.ensure_container(container)?;
        let data = self.data_cf()?;
        let key = Self::group_key(container, row_key, column_key);
        self.db.delete_cf(data, key)?;
        Ok(())
    }
}
