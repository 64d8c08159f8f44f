//! Graph handle and container lifecycle
//!
//! A graph named `g` is backed by the container pair `g_OUT` / `g_IN`. The
//! lifecycle operations delegate to the store's schema API; every node,
//! edge and traversal operation requires a successful [`Graph::connect`]
//! first and fails with [`GraphError::GraphNotReady`] otherwise.

use super::types::Direction;
use crate::store::{StoreError, StoreResult, WideColumnStore};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during graph operations
#[derive(Error, Debug)]
pub enum GraphError {
    /// The graph has not been connected; call [`Graph::connect`] first
    #[error("graph {0} is not connected")]
    GraphNotReady(String),

    /// Reserved for operation-specific failure signaling; no core
    /// operation currently raises it, and callers should not rely on it
    #[error("operation failed: {0}")]
    OperationFailed(String),

    /// Underlying store failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type GraphResult<T> = Result<T, GraphError>;

const OUT_SUFFIX: &str = "_OUT";
const IN_SUFFIX: &str = "_IN";

/// Handle to a named graph layered over a wide-column store
///
/// The handle itself is cheap: it holds the store, the derived container
/// names and the connection flag. All graph data lives in the store.
pub struct Graph<S: WideColumnStore> {
    store: Arc<S>,
    name: String,
    outgoing: String,
    incoming: String,
    connected: bool,
}

impl<S: WideColumnStore> Graph<S> {
    /// Create a handle for the named graph. Does not touch the store;
    /// follow with [`construct`](Graph::construct) and/or
    /// [`connect`](Graph::connect).
    pub fn new(store: Arc<S>, name: impl Into<String>) -> Self {
        let name = name.into();
        let outgoing = format!("{}{}", name, OUT_SUFFIX);
        let incoming = format!("{}{}", name, IN_SUFFIX);
        Graph {
            store,
            name,
            outgoing,
            incoming,
            connected: false,
        }
    }

    /// Graph name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create the backing container pair. Returns `false` without effect
    /// if the graph already exists.
    pub fn construct(&self) -> GraphResult<bool> {
        if self.exists()? {
            return Ok(false);
        }
        self.store.create_container(&self.incoming)?;
        self.store.create_container(&self.outgoing)?;
        info!(graph = %self.name, "constructed graph containers");
        Ok(true)
    }

    /// Test whether both backing containers exist.
    pub fn exists(&self) -> GraphResult<bool> {
        Ok(self.store.container_exists(&self.incoming)?
            && self.store.container_exists(&self.outgoing)?)
    }

    /// Bind the handle to an existing graph. Returns `false` if the
    /// backing containers are missing, in which case the handle stays
    /// unconnected.
    pub fn connect(&mut self) -> GraphResult<bool> {
        if !self.exists()? {
            return Ok(false);
        }
        self.connected = true;
        info!(graph = %self.name, "connected");
        Ok(true)
    }

    /// Drop both backing containers and disconnect the handle.
    pub fn destroy(&mut self) -> GraphResult<()> {
        self.store.drop_container(&self.incoming)?;
        self.store.drop_container(&self.outgoing)?;
        self.connected = false;
        info!(graph = %self.name, "destroyed graph containers");
        Ok(())
    }

    /// Whether [`connect`](Graph::connect) has succeeded.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub(crate) fn ready(&self) -> GraphResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(GraphError::GraphNotReady(self.name.clone()))
        }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn container(&self, direction: Direction) -> &str {
        match direction {
            Direction::Out => &self.outgoing,
            Direction::In => &self.incoming,
        }
    }
}

/// Translate the store's distinguished absence signal into `None`; every
/// other failure propagates.
pub(crate) fn found<T>(result: StoreResult<T>) -> GraphResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StoreError::NotFound(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
