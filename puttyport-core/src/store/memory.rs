//! In-memory host store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{HostRecord, PortForwardRecord};

use super::HostStore;

/// Host store kept entirely in memory.
///
/// Used for dry runs and tests, and as the working copy behind
/// [`super::JsonHostStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryHostStore {
    #[serde(default)]
    hosts: Vec<HostRecord>,
    #[serde(default)]
    port_forwards: Vec<PortForwardRecord>,
}

impl MemoryHostStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored hosts
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Number of stored forwards
    #[must_use]
    pub fn forward_count(&self) -> usize {
        self.port_forwards.len()
    }
}

impl HostStore for MemoryHostStore {
    fn hosts(&self) -> StoreResult<Vec<HostRecord>> {
        Ok(self.hosts.clone())
    }

    fn forwards_for_host(&self, host_id: Uuid) -> StoreResult<Vec<PortForwardRecord>> {
        Ok(self
            .port_forwards
            .iter()
            .filter(|f| f.host_id == host_id)
            .cloned()
            .collect())
    }

    fn upsert_host(&mut self, record: HostRecord) -> StoreResult<HostRecord> {
        match self.hosts.iter_mut().find(|h| h.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => self.hosts.push(record.clone()),
        }
        Ok(record)
    }

    fn insert_forward(&mut self, record: PortForwardRecord) -> StoreResult<PortForwardRecord> {
        if !self.hosts.iter().any(|h| h.id == record.host_id) {
            return Err(StoreError::NotFound(record.host_id));
        }
        self.port_forwards.push(record.clone());
        Ok(record)
    }

    fn delete_forward(&mut self, id: Uuid) -> StoreResult<()> {
        let before = self.port_forwards.len();
        self.port_forwards.retain(|f| f.id != id);
        if self.port_forwards.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
