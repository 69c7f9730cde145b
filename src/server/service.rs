use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::flood::propagator::FloodPropagator;
use crate::places::PlacesClient;
use crate::protocol::types::{LocationRecord, Message, Position, Timestamp};
use crate::store::table::LocationTable;
use crate::topology::types::{ServerId, Topology};

pub struct LocationServer {
    identity: ServerId,
    table: Arc<LocationTable>,
    propagator: FloodPropagator,
    places: PlacesClient,
}

impl LocationServer {
    pub fn new(
        identity: ServerId,
        topology: Arc<Topology>,
        table: Arc<LocationTable>,
        places: PlacesClient,
    ) -> Arc<Self> {
        let propagator = FloodPropagator::new(identity.clone(), topology, table.clone());
        Arc::new(Self {
            identity,
            table,
            propagator,
            places,
        })
    }

    /// Accept loop: one task per connection, failures contained per
    /// connection.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> Result<()> {
        tracing::info!(
            "Server {} listening on {}",
            self.identity,
            listener.local_addr().context("reading listener address")?
        );

        loop {
            let (stream, peer_addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    // transient (aborted handshake, fd exhaustion); the
                    // listener itself is still good
                    tracing::error!("Failed to accept connection: {e}");
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    continue;
                }
            };
            let server = self.clone();
            tokio::spawn(async move {
                if let Err(e) = server.handle_connection(stream, peer_addr).await {
                    tracing::warn!("Connection from {peer_addr} ended with error: {e}");
                }
            });
        }
    }

    /// Reads one message per line until the peer closes or sends a blank
    /// line. Messages on one connection are handled strictly in arrival
    /// order; the next line is not read until the current dispatch finished.
    async fn handle_connection(
        self: Arc<Self>,
        stream: TcpStream,
        peer_addr: SocketAddr,
    ) -> Result<()> {
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();
        let mut peer_server: Option<ServerId> = None;

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                break;
            }
            tracing::info!("Received from {peer_addr}: {line}");

            let message = Message::parse(&line);
            if peer_server.is_none() {
                if let Message::At {
                    relayed_from: Some(relay),
                    ..
                } = &message
                {
                    // only peer links carry the relay marker
                    tracing::info!("Incoming connection from {relay}");
                    peer_server = Some(relay.clone());
                }
            }

            if let Some(reply) = self.handle_message(message, &line).await {
                write_half.write_all(reply.as_bytes()).await?;
                write_half.write_all(b"\n").await?;
                tracing::info!("Sent to {peer_addr}: {reply}");
            }
        }

        if let Some(peer) = peer_server {
            tracing::info!("Connection ended with {peer}");
        }
        Ok(())
    }

    /// One handler per variant; the raw line travels along only for the
    /// `?`-prefixed echo.
    async fn handle_message(&self, message: Message, raw: &str) -> Option<String> {
        match message {
            Message::IamAt {
                client_id,
                position,
                client_time,
            } => Some(self.handle_iamat(client_id, position, client_time, raw).await),
            Message::WhatsAt {
                client_id,
                radius_km,
                max_results,
            } => Some(
                self.handle_whatsat(&client_id, radius_km, max_results, raw)
                    .await,
            ),
            Message::At {
                record,
                relayed_from,
            } => {
                self.handle_at(record, relayed_from).await;
                None
            }
            Message::Malformed { raw } => {
                tracing::info!("Invalid message");
                Some(format!("? {raw}"))
            }
        }
    }

    /// A client reported its position: stamp provenance, commit, flood, and
    /// echo back what this server now holds for the client (after ingestion
    /// that is this record or a fresher one).
    async fn handle_iamat(
        &self,
        client_id: String,
        position: Position,
        client_time: Timestamp,
        raw: &str,
    ) -> String {
        let record = LocationRecord {
            client_id: client_id.clone(),
            position,
            client_time,
            origin_server: self.identity.clone(),
            server_time: now_posix(),
        };

        if let Err(e) = self.propagator.ingest(record, None).await {
            tracing::error!("Failed to ingest report from {client_id}: {e}");
            return format!("? {raw}");
        }

        match self.table.lookup(&client_id) {
            Some(held) => held.canonical_line(),
            None => format!("? {raw}"),
        }
    }

    /// Answered purely from the local table; no network fan-out. The places
    /// payload rides on a second line and degrades to `{}` on its own.
    async fn handle_whatsat(
        &self,
        client_id: &str,
        radius_km: f64,
        max_results: usize,
        raw: &str,
    ) -> String {
        let Some(held) = self.table.lookup(client_id) else {
            tracing::info!("WHATSAT for unknown client {client_id}");
            return format!("? {raw}");
        };

        let places = self
            .places
            .nearby(
                held.position.latitude,
                held.position.longitude,
                radius_km,
                max_results,
            )
            .await;

        format!("{}\n{}", held.canonical_line(), places)
    }

    /// Peer flood delivery: fire-and-forget, no reply either way.
    async fn handle_at(&self, record: LocationRecord, relayed_from: Option<ServerId>) {
        if let Err(e) = self.propagator.ingest(record, relayed_from.as_ref()).await {
            tracing::error!("Failed to ingest flooded record: {e}");
        }
    }
}

fn now_posix() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
