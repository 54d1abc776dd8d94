use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened. Fatal for the request that triggered
    /// the connect; the next `connect` call tries again.
    #[error("store connection failed ({address}): {source}")]
    Connection {
        address: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("store query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
