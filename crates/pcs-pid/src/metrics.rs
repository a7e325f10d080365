//! Per-shard PID match metrics retrieval.
//!
//! The matching stage writes one JSON object of `name → count` per shard at
//! [`get_metrics_filepath`]. Fetching performs one existence check and, if
//! the object is present, one read; both run on the blocking pool so that
//! fetches for different shards proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{PidError, PidResult};
use crate::paths::get_metrics_filepath;
use crate::storage::StorageService;

/// Match counts reported by one shard, keyed by metric name.
pub type PidMetrics = HashMap<String, i64>;

/// Run a blocking storage call off the async runtime.
async fn blocking_call<T, F>(storage: &Arc<dyn StorageService>, path: &str, op: F) -> PidResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn StorageService, &str) -> anyhow::Result<T> + Send + 'static,
{
    let storage = Arc::clone(storage);
    let owned = path.to_string();
    let result = tokio::task::spawn_blocking(move || op(storage.as_ref(), &owned)).await?;
    result.map_err(|source| PidError::Storage {
        path: path.to_string(),
        source,
    })
}

/// Fetch and decode the metrics object for one shard of `path`.
pub async fn get_pid_metrics(
    storage: Arc<dyn StorageService>,
    path: &str,
    shard: usize,
) -> PidResult<PidMetrics> {
    let metrics_path = get_metrics_filepath(path, shard);

    let exists = blocking_call(&storage, &metrics_path, |s, p| s.file_exists(p)).await?;
    if !exists {
        warn!(path = %metrics_path, shard, "PID metrics file missing");
        return Err(PidError::MetricsNotFound(metrics_path));
    }

    let contents = blocking_call(&storage, &metrics_path, |s, p| s.read(p)).await?;
    let metrics: PidMetrics =
        serde_json::from_slice(&contents).map_err(|source| PidError::InvalidMetricsFormat {
            path: metrics_path.clone(),
            source,
        })?;

    debug!(path = %metrics_path, shard, keys = metrics.len(), "PID metrics loaded");
    Ok(metrics)
}

/// Fetch metrics for shards `0..num_shards` concurrently.
///
/// Results are returned in shard order. The first failure is returned and
/// the remaining fetches are aborted.
pub async fn get_all_pid_metrics(
    storage: Arc<dyn StorageService>,
    path: &str,
    num_shards: usize,
) -> PidResult<Vec<PidMetrics>> {
    let mut fetches = JoinSet::new();
    for shard in 0..num_shards {
        let storage = Arc::clone(&storage);
        let path = path.to_string();
        fetches.spawn(async move { (shard, get_pid_metrics(storage, &path, shard).await) });
    }

    let mut results: Vec<Option<PidMetrics>> = vec![None; num_shards];
    while let Some(joined) = fetches.join_next().await {
        let (shard, result) = joined?;
        results[shard] = Some(result?);
    }

    info!(%path, num_shards, "PID metrics fetched for all shards");
    Ok(results.into_iter().flatten().collect())
}

/// Sum per-shard counts into a single report.
pub fn aggregate_pid_metrics(shards: &[PidMetrics]) -> PidMetrics {
    let mut total = PidMetrics::new();
    for metrics in shards {
        for (key, count) in metrics {
            *total.entry(key.clone()).or_insert(0) += count;
        }
    }
    total
}
