//! End-to-end PID stage bookkeeping.
//!
//! Loads a run config, resolves the PID plan, registers the instance,
//! has a fake matching stage write per-shard artifacts through file-backed
//! storage, then fetches and aggregates the metrics.

use std::sync::Arc;

use pcs_core::{
    InfraConfig, PidProtocol, PipelineConfig, PrivateComputationInstanceStatus,
    PrivateComputationRole,
};
use pcs_pid::*;
use pcs_state::StateStore;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Stand-in for the matching stage: one data and one metrics object per shard.
fn write_shard_outputs(storage: &dyn StorageService, base: &str, num_shards: usize) {
    for shard in 0..num_shards {
        storage
            .write(&get_sharded_filepath(base, shard), b"id\nrow\n")
            .unwrap();
        let metrics = serde_json::json!({
            "union_file_size": 100 + shard,
            "partner_input_size": 40,
            "publisher_input_size": 60,
        });
        storage
            .write(&get_metrics_filepath(base, shard), metrics.to_string().as_bytes())
            .unwrap();
    }
}

#[tokio::test]
async fn sharded_run_end_to_end() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("pcs.toml");
    std::fs::write(
        &config_path,
        format!(
            "[pid]\nnum_pid_containers = 4\nmultikey_enabled = true\nuse_row_numbers = true\n\n[storage]\nroot = {:?}\n",
            dir.path().join("objects")
        ),
    )
    .unwrap();

    let config = PipelineConfig::from_file(&config_path).unwrap();
    let plan = PidRunPlan::from_config(&config.pid);
    assert_eq!(plan.protocol, PidProtocol::UnionPid);
    assert!(plan.use_row_numbers);

    let state = StateStore::open_in_memory().unwrap();
    state
        .register_instance(&InfraConfig::new(
            "run-42",
            PrivateComputationRole::Partner,
            PrivateComputationInstanceStatus::IdMatchingStarted,
            100,
        ))
        .unwrap();

    let storage: Arc<dyn StorageService> =
        Arc::new(LocalStorage::new(&config.storage.unwrap().root));
    write_shard_outputs(storage.as_ref(), "run-42/pid_out", plan.num_pid_containers);

    let per_shard = get_all_pid_metrics(storage.clone(), "run-42/pid_out", plan.num_pid_containers)
        .await
        .unwrap();
    assert_eq!(per_shard.len(), 4);
    assert_eq!(per_shard[3]["union_file_size"], 103);

    let total = aggregate_pid_metrics(&per_shard);
    assert_eq!(total["union_file_size"], 406);
    assert_eq!(total["partner_input_size"], 160);
    assert_eq!(total["publisher_input_size"], 240);

    let record = state
        .update_status(
            "run-42",
            PrivateComputationInstanceStatus::IdMatchingCompleted,
            200,
        )
        .unwrap();
    assert_eq!(record.role, PrivateComputationRole::Partner);
    assert_eq!(record.status_update_ts, 200);
}

#[tokio::test]
async fn multikey_run_missing_metrics_fails() {
    init_tracing();
    let config = PipelineConfig::from_toml_str("[pid]\nmultikey_enabled = true\nuse_row_numbers = true\n")
        .unwrap();
    let plan = PidRunPlan::from_config(&config.pid);
    assert_eq!(plan.protocol, PidProtocol::UnionPidMultikey);
    assert_eq!(plan.max_id_column_cnt, 6);
    assert!(!plan.use_row_numbers);

    let storage: Arc<dyn StorageService> = Arc::new(InMemoryStorage::new());
    storage
        .write(&get_sharded_filepath("out", 0), b"id\n")
        .unwrap();

    let err = get_pid_metrics(storage, "out", 0).await.unwrap_err();
    assert!(matches!(&err, PidError::MetricsNotFound(path) if path == "out_0_metrics"));
    assert_eq!(err.to_string(), "PID metrics file doesn't exist at out_0_metrics");
}
