//! redb table definitions for the instance store.

use redb::TableDefinition;

/// JSON-encoded `InfraConfig` keyed by `{instance_id}`.
pub const INSTANCES: TableDefinition<&str, &[u8]> = TableDefinition::new("instances");
