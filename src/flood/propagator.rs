use anyhow::Result;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::protocol::types::LocationRecord;
use crate::store::table::LocationTable;
use crate::topology::types::{ServerId, Topology};

pub struct FloodPropagator {
    identity: ServerId,
    topology: Arc<Topology>,
    table: Arc<LocationTable>,
}

impl FloodPropagator {
    pub fn new(identity: ServerId, topology: Arc<Topology>, table: Arc<LocationTable>) -> Self {
        Self {
            identity,
            topology,
            table,
        }
    }

    /// Commits `record` locally and, if it was new information, forwards it
    /// to every neighbor except `relayed_from`. Returns whether the record
    /// was new.
    ///
    /// Each forward runs as its own task with a fresh connection; one
    /// unreachable neighbor is logged and skipped without touching the
    /// others, and never rolls back the merge that already succeeded. A
    /// failed durable write propagates as an error and nothing is flooded.
    pub async fn ingest(
        &self,
        record: LocationRecord,
        relayed_from: Option<&ServerId>,
    ) -> Result<bool> {
        let client_id = record.client_id.clone();
        let line = record.relayed_line(&self.identity);

        if !self.table.merge(record)? {
            tracing::debug!("Already knew about {client_id}, flood stops here");
            return Ok(false);
        }

        let mut handles = Vec::new();
        for neighbor in self.topology.neighbors_of(&self.identity) {
            if Some(neighbor) == relayed_from {
                continue;
            }
            let addr = match self.topology.addr_of(neighbor) {
                Ok(addr) => addr,
                Err(e) => {
                    tracing::warn!("Skipping neighbor {neighbor}: {e}");
                    continue;
                }
            };

            let neighbor = neighbor.clone();
            let client_id = client_id.clone();
            let line = line.clone();
            handles.push(tokio::spawn(async move {
                match send_line(&addr, &line).await {
                    Ok(()) => {
                        tracing::info!("Forwarded {client_id} to {neighbor}");
                    }
                    Err(e) => {
                        tracing::warn!("Could not forward {client_id} to {neighbor}: {e}");
                    }
                }
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("Flood task for {client_id} aborted: {e}");
            }
        }

        Ok(true)
    }
}

/// One fire-and-forget connection per hop: connect, write the line,
/// half-close, done. Connections are never pooled.
async fn send_line(addr: &str, line: &str) -> Result<()> {
    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(line.as_bytes()).await?;
    stream.write_all(b"\n").await?;
    stream.shutdown().await?;
    Ok(())
}
