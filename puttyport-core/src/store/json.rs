//! Host store persisted as a JSON document.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{HostRecord, PortForwardRecord};
use crate::tracing::span_names;

use super::{HostStore, MemoryHostStore};

/// Host store backed by a single JSON file.
///
/// The whole document is loaded on open and rewritten after every change.
#[derive(Debug)]
pub struct JsonHostStore {
    path: PathBuf,
    records: MemoryHostStore,
}

impl JsonHostStore {
    /// Opens a store, starting empty when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let _span = crate::trace_operation!(span_names::STORE_LOAD, path = %path.display())
            .entered();

        let records = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)
                .map_err(|e| StoreError::Serialization(e.to_string()))?
        } else {
            MemoryHostStore::new()
        };
        tracing::debug!(hosts = records.host_count(), "Opened host store");
        Ok(Self { path, records })
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the records and keeps it only once the
    /// copy is on disk.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut MemoryHostStore) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut next = self.records.clone();
        let value = change(&mut next)?;
        self.persist(&next)?;
        self.records = next;
        Ok(value)
    }

    fn persist(&self, records: &MemoryHostStore) -> StoreResult<()> {
        let _span = crate::trace_operation!(span_names::STORE_SAVE).entered();
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HostStore for JsonHostStore {
    fn hosts(&self) -> StoreResult<Vec<HostRecord>> {
        self.records.hosts()
    }

    fn forwards_for_host(&self, host_id: Uuid) -> StoreResult<Vec<PortForwardRecord>> {
        self.records.forwards_for_host(host_id)
    }

    fn upsert_host(&mut self, record: HostRecord) -> StoreResult<HostRecord> {
        self.commit(|records| records.upsert_host(record))
    }

    fn insert_forward(&mut self, record: PortForwardRecord) -> StoreResult<PortForwardRecord> {
        self.commit(|records| records.insert_forward(record))
    }

    fn delete_forward(&mut self, id: Uuid) -> StoreResult<()> {
        self.commit(|records| records.delete_forward(id))
    }
}
