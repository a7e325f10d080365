//! StateStore — redb-backed persistence for instance records.
//!
//! Records are created once per instance, then only their status and
//! status timestamp change. Every mutation runs in a single write
//! transaction so `status` and `status_update_ts` never diverge.

use std::path::Path;
use std::sync::Arc;

use pcs_core::{InfraConfig, PrivateComputationInstanceStatus};
use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::{debug, info};

use crate::error::{StateError, StateResult};
use crate::tables::INSTANCES;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe instance store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store.
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(INSTANCES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Store a new instance record. Fails if the id is already registered.
    pub fn register_instance(&self, config: &InfraConfig) -> StateResult<()> {
        let key = config.instance_id.as_str();
        let value = serde_json::to_vec(config).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(INSTANCES).map_err(map_err!(Table))?;
            if table.get(key).map_err(map_err!(Read))?.is_some() {
                return Err(StateError::AlreadyExists(key.to_string()));
            }
            table
                .insert(key, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        info!(instance_id = %key, role = ?config.role, status = ?config.status, "instance registered");
        Ok(())
    }

    /// Get an instance record by id.
    pub fn get_instance(&self, instance_id: &str) -> StateResult<Option<InfraConfig>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(INSTANCES).map_err(map_err!(Table))?;
        match table.get(instance_id).map_err(map_err!(Read))? {
            Some(guard) => {
                let config: InfraConfig =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    /// List every stored instance record.
    pub fn list_instances(&self) -> StateResult<Vec<InfraConfig>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(INSTANCES).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let config: InfraConfig =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(config);
        }
        Ok(results)
    }

    /// Set the status and its timestamp together.
    ///
    /// `ts` must not be older than the stored `status_update_ts`. Equal
    /// timestamps are accepted. Returns the updated record.
    pub fn update_status(
        &self,
        instance_id: &str,
        status: PrivateComputationInstanceStatus,
        ts: u64,
    ) -> StateResult<InfraConfig> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let updated = {
            let mut table = txn.open_table(INSTANCES).map_err(map_err!(Table))?;
            let mut config: InfraConfig = {
                let guard = table
                    .get(instance_id)
                    .map_err(map_err!(Read))?
                    .ok_or_else(|| StateError::NotFound(instance_id.to_string()))?;
                serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?
            };

            if ts < config.status_update_ts {
                return Err(StateError::StaleStatusUpdate {
                    instance_id: instance_id.to_string(),
                    current: config.status_update_ts,
                    requested: ts,
                });
            }

            let previous = config.status;
            config.status = status;
            config.status_update_ts = ts;
            let value = serde_json::to_vec(&config).map_err(map_err!(Serialize))?;
            table
                .insert(instance_id, value.as_slice())
                .map_err(map_err!(Write))?;
            debug!(%instance_id, ?previous, ?status, ts, "instance status updated");
            config
        };
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(updated)
    }
}
