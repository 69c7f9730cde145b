use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use location_mesh::places::PlacesClient;
use location_mesh::server::service::LocationServer;
use location_mesh::store::table::LocationTable;
use location_mesh::topology::types::{ServerId, Topology};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        usage(&args[0]);
        std::process::exit(1);
    }

    let name = ServerId::from(args[1].as_str());
    let mut config_path = PathBuf::from("config/topology.json");
    let mut data_dir = PathBuf::from(".");

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => match args.get(i + 1) {
                Some(value) => {
                    config_path = PathBuf::from(value);
                    i += 2;
                }
                None => {
                    usage(&args[0]);
                    std::process::exit(1);
                }
            },
            "--data-dir" => match args.get(i + 1) {
                Some(value) => {
                    data_dir = PathBuf::from(value);
                    i += 2;
                }
                None => {
                    usage(&args[0]);
                    std::process::exit(1);
                }
            },
            _ => {
                i += 1;
            }
        }
    }

    let topology = Arc::new(Topology::from_file(&config_path)?);
    if !topology.contains(&name) {
        eprintln!("Server {name} is not in {}", config_path.display());
        std::process::exit(1);
    }

    tracing::info!("Starting server {name}");

    // recovery happens before the listener binds, so the first query a
    // client can reach already sees the last-known view
    let server_dir = data_dir.join(name.as_str());
    let table = Arc::new(LocationTable::recover(&server_dir)?);

    let places = PlacesClient::new(std::env::var("PLACES_API_URL").ok());

    let addr = topology.addr_of(&name)?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding listener on {addr}"))?;

    tracing::info!(
        "Flooding to {} neighbor(s)",
        topology.neighbors_of(&name).len()
    );

    let server = LocationServer::new(name, topology, table, places);
    server.serve(listener).await
}

fn usage(program: &str) {
    eprintln!("Usage: {program} SERVERNAME [--config <topology.json>] [--data-dir <dir>]");
    eprintln!("Example: {program} juneau --config config/topology.json --data-dir /var/lib/location-mesh");
}
