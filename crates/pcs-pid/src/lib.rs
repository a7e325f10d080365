//! pcs-pid — identity-matching (PID) stage bookkeeping.
//!
//! Decides which PID protocol a run uses, owns the single definition of
//! sharded artifact names, and fetches per-shard match metrics from the
//! object store once matching has finished.
//!
//! # Architecture
//!
//! ```text
//! PidConfig ──► selector::PidRunPlan (protocol, column limit, row numbers)
//!
//! get_pid_metrics(storage, base, shard)
//!   ├── paths::get_metrics_filepath      "<base>_<shard>_metrics"
//!   ├── StorageService::file_exists      (blocking pool)
//!   └── StorageService::read + decode    (blocking pool)
//! ```

pub mod error;
pub mod metrics;
pub mod paths;
pub mod selector;
pub mod storage;

pub use error::{PidError, PidResult};
pub use metrics::{PidMetrics, aggregate_pid_metrics, get_all_pid_metrics, get_pid_metrics};
pub use paths::{get_metrics_filepath, get_sharded_filepath};
pub use selector::{
    PidRunPlan, get_max_id_column_cnt, get_pid_protocol_from_num_shards,
    pid_should_use_row_numbers,
};
pub use storage::{InMemoryStorage, LocalStorage, StorageService};
