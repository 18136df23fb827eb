//! Destination store contract.
//!
//! The importer only needs to list hosts, read and replace a host's
//! forwards, and upsert hosts. How records are persisted is up to the
//! implementation.

mod json;
mod memory;

pub use json::JsonHostStore;
pub use memory::MemoryHostStore;

use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{HostRecord, PortForwardRecord};

/// Read/upsert/delete access to stored hosts and port forwards.
pub trait HostStore: Send {
    /// All hosts in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn hosts(&self) -> StoreResult<Vec<HostRecord>>;

    /// Forwards owned by a host
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn forwards_for_host(&self, host_id: Uuid) -> StoreResult<Vec<PortForwardRecord>>;

    /// Inserts a new host or replaces the one with the same id
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    fn upsert_host(&mut self, record: HostRecord) -> StoreResult<HostRecord>;

    /// Inserts a forward for an existing host
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the owning host does not exist, or
    /// an error if the record cannot be persisted.
    fn insert_forward(&mut self, record: PortForwardRecord) -> StoreResult<PortForwardRecord>;

    /// Deletes a forward by id
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such forward exists, or an error
    /// if the change cannot be persisted.
    fn delete_forward(&mut self, id: Uuid) -> StoreResult<()>;

    /// Finds a host by exact nickname
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn find_by_nickname(&self, nickname: &str) -> StoreResult<Option<HostRecord>> {
        Ok(self.hosts()?.into_iter().find(|h| h.nickname == nickname))
    }
}
