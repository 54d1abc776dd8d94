use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::Database;
use crate::error::{Result, StoreError};

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// File path, or [`crate::IN_MEMORY`].
    pub address: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            address: crate::IN_MEMORY.to_string(),
        }
    }
}

/// Store client owned by the process entry point and passed to whoever
/// needs it. The underlying connection is opened on the first `connect`
/// and shared by every later call until `close`.
pub struct StoreClient {
    config: StoreConfig,
    handle: Mutex<Option<Arc<Database>>>,
}

impl StoreClient {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            handle: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Return the open handle, opening it first if needed. Open failures are
    /// returned as-is and leave the client unconnected.
    pub fn connect(&self) -> Result<Arc<Database>> {
        let mut handle = self.handle.lock().map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        if let Some(db) = handle.as_ref() {
            return Ok(db.clone());
        }

        debug!("Opening store at {}", self.config.address);
        let db = Arc::new(Database::open(&self.config.address)?);
        *handle = Some(db.clone());
        Ok(db)
    }

    pub fn is_connected(&self) -> bool {
        self.handle.lock().map(|h| h.is_some()).unwrap_or(false)
    }

    /// Drop the client's handle. In-flight operations holding a clone finish
    /// first; the connection closes when the last clone goes away.
    pub fn close(&self) -> Result<()> {
        let mut handle = self.handle.lock().map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        if handle.take().is_some() {
            info!("Store at {} closed", self.config.address);
        }
        Ok(())
    }
}
