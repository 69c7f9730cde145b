use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

use crate::protocol::types::{LocationRecord, Message};

/// File-per-client persistence under `<server_dir>/locations/`.
///
/// Each file holds one canonical `AT` line. The relay marker never appears
/// here; a reloaded record is indistinguishable from a freshly merged one.
pub struct DurableStore {
    dir: PathBuf,
}

impl DurableStore {
    pub fn open(server_dir: &Path) -> Result<Self> {
        let dir = server_dir.join("locations");
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating location store {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Writes the record as temp-then-rename so a crash mid-write can never
    /// leave a truncated record behind.
    pub fn persist(&self, record: &LocationRecord) -> Result<()> {
        let name = file_name_for(&record.client_id)?;
        let path = self.dir.join(&name);
        let tmp = self.dir.join(format!("{name}.tmp"));

        fs::write(&tmp, record.canonical_line())
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("installing {}", path.display()))?;
        Ok(())
    }

    /// Reads every persisted record. Files that cannot be read or no longer
    /// parse are logged and skipped; recovery is best-effort, not
    /// all-or-nothing.
    pub fn load(&self) -> Result<Vec<LocationRecord>> {
        let mut records = Vec::new();

        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("listing location store {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }

            let line = match fs::read_to_string(&path) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Skipping unreadable record {}: {}", path.display(), e);
                    continue;
                }
            };

            match Message::parse(&line) {
                Message::At { record, .. } => records.push(record),
                _ => {
                    tracing::warn!("Skipping corrupt record {}", path.display());
                }
            }
        }

        Ok(records)
    }
}

/// Client identifiers come straight off the wire; anything that cannot be a
/// plain file name in the store directory is refused rather than escaped.
fn file_name_for(client_id: &str) -> Result<String> {
    if client_id.is_empty()
        || client_id.starts_with('.')
        || client_id.contains(['/', '\\'])
    {
        bail!("client id {client_id:?} is not storable");
    }
    Ok(format!("{client_id}.txt"))
}
