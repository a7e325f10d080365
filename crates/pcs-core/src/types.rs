//! Domain types shared by every pipeline stage.
//!
//! All enums serialize as their SCREAMING_SNAKE symbolic names so that
//! records written by one stage decode identically in every other stage.

use serde::{Deserialize, Serialize};

/// Unique identifier for a computation instance.
pub type InstanceId = String;

// ── Role ──────────────────────────────────────────────────────────

/// Which of the two collaborating parties an instance represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivateComputationRole {
    Publisher,
    Partner,
}

// ── Status ────────────────────────────────────────────────────────

/// Stage or outcome of a computation instance.
///
/// Transition rules live with the orchestrating pipeline; this type only
/// names the states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivateComputationInstanceStatus {
    Unknown,
    Created,
    ProcessingRequest,
    Timeout,
    InputDataValidationStarted,
    InputDataValidationCompleted,
    InputDataValidationFailed,
    PidShardStarted,
    PidShardCompleted,
    PidShardFailed,
    PidPrepareStarted,
    PidPrepareCompleted,
    PidPrepareFailed,
    IdMatchingStarted,
    IdMatchingCompleted,
    IdMatchingFailed,
    IdMatchingPostProcessingStarted,
    IdMatchingPostProcessingCompleted,
    IdMatchingPostProcessingFailed,
    PrepareDataStarted,
    PrepareDataCompleted,
    PrepareDataFailed,
    ComputationStarted,
    ComputationCompleted,
    ComputationFailed,
    AggregationStarted,
    AggregationCompleted,
    AggregationFailed,
    PostProcessingHandlersStarted,
    PostProcessingHandlersCompleted,
    PostProcessingHandlersFailed,
}

impl PrivateComputationInstanceStatus {
    /// Every status, in pipeline order.
    pub const ALL: [PrivateComputationInstanceStatus; 31] = [
        Self::Unknown,
        Self::Created,
        Self::ProcessingRequest,
        Self::Timeout,
        Self::InputDataValidationStarted,
        Self::InputDataValidationCompleted,
        Self::InputDataValidationFailed,
        Self::PidShardStarted,
        Self::PidShardCompleted,
        Self::PidShardFailed,
        Self::PidPrepareStarted,
        Self::PidPrepareCompleted,
        Self::PidPrepareFailed,
        Self::IdMatchingStarted,
        Self::IdMatchingCompleted,
        Self::IdMatchingFailed,
        Self::IdMatchingPostProcessingStarted,
        Self::IdMatchingPostProcessingCompleted,
        Self::IdMatchingPostProcessingFailed,
        Self::PrepareDataStarted,
        Self::PrepareDataCompleted,
        Self::PrepareDataFailed,
        Self::ComputationStarted,
        Self::ComputationCompleted,
        Self::ComputationFailed,
        Self::AggregationStarted,
        Self::AggregationCompleted,
        Self::AggregationFailed,
        Self::PostProcessingHandlersStarted,
        Self::PostProcessingHandlersCompleted,
        Self::PostProcessingHandlersFailed,
    ];
}

// ── PID protocol ──────────────────────────────────────────────────

/// Identity-matching protocol family used for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PidProtocol {
    /// Single-column union PID.
    UnionPid,
    /// Many-to-many private set intersection.
    #[serde(rename = "PS3I_M_TO_M")]
    Ps3iMToM,
    /// Union PID matching on several identity columns per row.
    UnionPidMultikey,
}

impl PidProtocol {
    pub const ALL: [PidProtocol; 3] = [Self::UnionPid, Self::Ps3iMToM, Self::UnionPidMultikey];
}

/// Protocol used whenever the multikey variant is not selected.
pub const DEFAULT_PID_PROTOCOL: PidProtocol = PidProtocol::UnionPid;

/// Maximum identity columns per record under [`PidProtocol::UnionPidMultikey`].
pub const DEFAULT_MULTIKEY_PROTOCOL_MAX_COLUMN_COUNT: usize = 6;

// ── Infra config ──────────────────────────────────────────────────

/// Identity, role, and lifecycle status of one computation instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraConfig {
    pub instance_id: InstanceId,
    pub role: PrivateComputationRole,
    pub status: PrivateComputationInstanceStatus,
    /// Unix timestamp (seconds) of the last status change.
    pub status_update_ts: u64,
}

impl InfraConfig {
    pub fn new(
        instance_id: impl Into<InstanceId>,
        role: PrivateComputationRole,
        status: PrivateComputationInstanceStatus,
        status_update_ts: u64,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            role,
            status,
            status_update_ts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infra_config_uses_symbolic_names() {
        let config = InfraConfig::new(
            "inst-1",
            PrivateComputationRole::Publisher,
            PrivateComputationInstanceStatus::PidShardStarted,
            1_650_000_000,
        );
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["instance_id"], "inst-1");
        assert_eq!(json["role"], "PUBLISHER");
        assert_eq!(json["status"], "PID_SHARD_STARTED");
        assert_eq!(json["status_update_ts"], 1_650_000_000u64);
    }

    #[test]
    fn infra_config_round_trips_every_role_and_status() {
        let roles = [
            PrivateComputationRole::Publisher,
            PrivateComputationRole::Partner,
        ];
        for (i, role) in roles.into_iter().enumerate() {
            for status in PrivateComputationInstanceStatus::ALL {
                let config = InfraConfig::new(format!("inst-{i}"), role, status, 1000 + i as u64);
                let text = serde_json::to_string(&config).unwrap();
                let back: InfraConfig = serde_json::from_str(&text).unwrap();
                assert_eq!(back, config);
            }
        }
    }

    #[test]
    fn infra_config_decodes_from_text() {
        let text = r#"{
            "instance_id": "abc",
            "role": "PARTNER",
            "status": "ID_MATCHING_POST_PROCESSING_COMPLETED",
            "status_update_ts": 42
        }"#;
        let config: InfraConfig = serde_json::from_str(text).unwrap();
        assert_eq!(config.role, PrivateComputationRole::Partner);
        assert_eq!(
            config.status,
            PrivateComputationInstanceStatus::IdMatchingPostProcessingCompleted
        );
        assert_eq!(config.status_update_ts, 42);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let text = r#"{"instance_id":"a","role":"ADVERTISER","status":"CREATED","status_update_ts":1}"#;
        assert!(serde_json::from_str::<InfraConfig>(text).is_err());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let text = r#"{"instance_id":"a","role":"PARTNER","status":"DONE","status_update_ts":1}"#;
        assert!(serde_json::from_str::<InfraConfig>(text).is_err());
    }

    #[test]
    fn missing_timestamp_is_rejected() {
        let text = r#"{"instance_id":"a","role":"PARTNER","status":"CREATED"}"#;
        assert!(serde_json::from_str::<InfraConfig>(text).is_err());
    }

    #[test]
    fn pid_protocol_names() {
        assert_eq!(
            serde_json::to_string(&PidProtocol::UnionPidMultikey).unwrap(),
            "\"UNION_PID_MULTIKEY\""
        );
        assert_eq!(
            serde_json::to_string(&PidProtocol::Ps3iMToM).unwrap(),
            "\"PS3I_M_TO_M\""
        );
        assert_eq!(DEFAULT_PID_PROTOCOL, PidProtocol::UnionPid);
    }
}
