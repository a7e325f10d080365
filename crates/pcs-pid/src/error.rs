//! PID stage error types.

use thiserror::Error;

/// Errors raised while locating or decoding per-shard PID artifacts.
#[derive(Debug, Error)]
pub enum PidError {
    #[error("PID metrics file doesn't exist at {0}")]
    MetricsNotFound(String),

    #[error("invalid PID metrics format at {path}: {source}")]
    InvalidMetricsFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage error at {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type PidResult<T> = Result<T, PidError>;
