//! Canonical names for sharded artifacts.
//!
//! Producers and consumers of shard data must both go through these
//! functions; any stage that formats shard names by hand will drift.

/// `<path>_<shard>`
pub fn get_sharded_filepath(path: &str, shard: usize) -> String {
    format!("{path}_{shard}")
}

/// `<path>_<shard>_metrics`
pub fn get_metrics_filepath(path: &str, shard: usize) -> String {
    get_sharded_filepath(path, shard) + "_metrics"
}
