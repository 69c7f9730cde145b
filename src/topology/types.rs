use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Identity of one server in the mesh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ServerId(pub String);

impl ServerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for ServerId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// The static mesh configuration for one deployment.
///
/// `ports` names every server in the mesh together with its listen port on
/// `host`; `neighbors` is the adjacency list consulted when flooding. A
/// server absent from `neighbors` simply has no one to forward to.
#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    pub host: String,
    pub ports: HashMap<ServerId, u16>,
    #[serde(default)]
    pub neighbors: HashMap<ServerId, Vec<ServerId>>,
}

impl Topology {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading topology file {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let topology: Topology = serde_json::from_str(raw).context("parsing topology JSON")?;
        topology.validate()?;
        Ok(topology)
    }

    /// Every neighbor reference must resolve to an addressable server.
    /// Asymmetric adjacency is legal and left as configured.
    fn validate(&self) -> Result<()> {
        for (id, neighbors) in &self.neighbors {
            if !self.ports.contains_key(id) {
                bail!("neighbor list for unknown server {id}");
            }
            for neighbor in neighbors {
                if !self.ports.contains_key(neighbor) {
                    bail!("server {id} lists unknown neighbor {neighbor}");
                }
            }
        }
        Ok(())
    }

    pub fn contains(&self, id: &ServerId) -> bool {
        self.ports.contains_key(id)
    }

    /// `host:port` address of a server, for both listening and dialing.
    pub fn addr_of(&self, id: &ServerId) -> Result<String> {
        let port = self
            .ports
            .get(id)
            .with_context(|| format!("no address configured for server {id}"))?;
        Ok(format!("{}:{}", self.host, port))
    }

    pub fn neighbors_of(&self, id: &ServerId) -> &[ServerId] {
        self.neighbors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}
