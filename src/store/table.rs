use anyhow::Result;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::path::Path;

use super::disk::DurableStore;
use crate::protocol::types::LocationRecord;

/// In-memory map from client id to its freshest known record, backed by the
/// durable store.
pub struct LocationTable {
    records: DashMap<String, LocationRecord>,
    disk: DurableStore,
}

impl LocationTable {
    /// Opens the store under `server_dir` and reloads every persisted record
    /// before the table is handed to the listener.
    pub fn recover(server_dir: &Path) -> Result<Self> {
        let disk = DurableStore::open(server_dir)?;
        let records = DashMap::new();

        for record in disk.load()? {
            records.insert(record.client_id.clone(), record);
        }
        tracing::info!("Recovered {} location record(s)", records.len());

        Ok(Self { records, disk })
    }

    /// Compare-and-possibly-replace on one client's entry.
    ///
    /// Returns `Ok(true)` iff `candidate` carried new information: no record
    /// was held for the client, or the held one has a strictly smaller
    /// `client_time` (ties keep the held record). The durable write happens
    /// before the replacement becomes visible; if it fails, the table is
    /// unchanged and the error propagates so the caller does not flood.
    ///
    /// The whole operation runs under the entry guard, so two deliveries
    /// racing for the same client serialize and the strictly fresher one
    /// wins.
    pub fn merge(&self, candidate: LocationRecord) -> Result<bool> {
        match self.records.entry(candidate.client_id.clone()) {
            Entry::Occupied(mut held) => {
                if held.get().client_time.seconds >= candidate.client_time.seconds {
                    return Ok(false);
                }
                self.disk.persist(&candidate)?;
                held.insert(candidate);
                Ok(true)
            }
            Entry::Vacant(slot) => {
                self.disk.persist(&candidate)?;
                slot.insert(candidate);
                Ok(true)
            }
        }
    }

    pub fn lookup(&self, client_id: &str) -> Option<LocationRecord> {
        self.records.get(client_id).map(|held| held.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
