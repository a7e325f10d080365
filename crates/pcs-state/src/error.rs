//! Error types for the instance store.

use thiserror::Error;

/// Result type alias for state store operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur during state store operations.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("instance not found: {0}")]
    NotFound(String),

    #[error("instance already registered: {0}")]
    AlreadyExists(String),

    #[error("stale status update for {instance_id}: ts {requested} is older than {current}")]
    StaleStatusUpdate {
        instance_id: String,
        current: u64,
        requested: u64,
    },
}
