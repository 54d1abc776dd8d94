pub mod client;
pub mod error;
pub mod migrations;
pub mod queries;

use rusqlite::Connection;
use std::sync::Mutex;
use tracing::info;

pub use client::{StoreClient, StoreConfig};
pub use error::{Result, StoreError};

/// Address that selects a private, process-local store.
pub const IN_MEMORY: &str = ":memory:";

/// Open store handle. One connection behind a mutex; every operation is a
/// short independent statement or transaction.
#[derive(Debug)]
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(address: &str) -> Result<Self> {
        let conn = if address == IN_MEMORY {
            Connection::open_in_memory()
        } else {
            Connection::open(address)
        }
        .map_err(|source| StoreError::Connection { address: address.to_string(), source })?;

        if address != IN_MEMORY {
            // WAL mode for concurrent readers of the file
            conn.pragma_update(None, "journal_mode", "WAL")?;
        }

        migrations::run(&conn)?;

        info!("Store opened at {}", address);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        f(&conn)
    }

    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        f(&mut conn)
    }
}
