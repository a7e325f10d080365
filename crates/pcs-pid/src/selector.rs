//! PID protocol selection.
//!
//! Pure decisions over the run shape. The multikey protocol batches several
//! identity columns per row and has no cross-container merge, so it is only
//! chosen for single-container runs, and it cannot be combined with
//! row-number matching.

use pcs_core::config::PidConfig;
use pcs_core::{DEFAULT_MULTIKEY_PROTOCOL_MAX_COLUMN_COUNT, DEFAULT_PID_PROTOCOL, PidProtocol};
use tracing::debug;

/// Maximum number of identity columns a record may carry under `protocol`.
pub fn get_max_id_column_cnt(protocol: PidProtocol) -> usize {
    match protocol {
        PidProtocol::UnionPidMultikey => DEFAULT_MULTIKEY_PROTOCOL_MAX_COLUMN_COUNT,
        PidProtocol::UnionPid | PidProtocol::Ps3iMToM => 1,
    }
}

/// Multikey iff exactly one container is configured and multikey is enabled.
pub fn get_pid_protocol_from_num_shards(
    num_pid_containers: usize,
    multikey_enabled: bool,
) -> PidProtocol {
    if num_pid_containers == 1 && multikey_enabled {
        PidProtocol::UnionPidMultikey
    } else {
        DEFAULT_PID_PROTOCOL
    }
}

/// Row numbers are honored for every protocol except multikey, where the
/// request is overridden to `false`.
pub fn pid_should_use_row_numbers(use_row_numbers: bool, protocol: PidProtocol) -> bool {
    use_row_numbers && protocol != PidProtocol::UnionPidMultikey
}

/// Resolved PID settings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PidRunPlan {
    pub protocol: PidProtocol,
    pub num_pid_containers: usize,
    pub max_id_column_cnt: usize,
    pub use_row_numbers: bool,
}

impl PidRunPlan {
    pub fn from_config(config: &PidConfig) -> Self {
        let protocol =
            get_pid_protocol_from_num_shards(config.num_pid_containers, config.multikey_enabled);
        let use_row_numbers = pid_should_use_row_numbers(config.use_row_numbers, protocol);
        if config.use_row_numbers && !use_row_numbers {
            debug!(?protocol, "row numbers requested but disabled for protocol");
        }
        let plan = Self {
            protocol,
            num_pid_containers: config.num_pid_containers,
            max_id_column_cnt: get_max_id_column_cnt(protocol),
            use_row_numbers,
        };
        debug!(?plan, "resolved PID run plan");
        plan
    }
}
