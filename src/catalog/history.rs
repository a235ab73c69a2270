// Generation history - tracked ids (GEN-0001, GEN-0002, ...) and the
// parameters needed to reproduce each generation exactly

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::registry::PatternType;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("History serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type HistoryResult<T> = Result<T, HistoryError>;

/// One tracked generation with everything needed to regenerate it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub pattern_type: PatternType,
    pub genre: String,
    pub key: Option<String>,
    pub scale: Option<String>,
    pub bpm: u16,
    pub bars: u32,
    /// RNG seed derived from the id. Stored so recall never depends on
    /// the derivation staying fixed.
    pub seed: u64,
    /// Output filename relative to the workspace
    pub file: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// JSON-backed history of tracked generations
pub struct GeneratorHistory {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl GeneratorHistory {
    /// Open the history at `path`. Missing or corrupt files start empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!(
                        "History at {} is corrupt ({}), starting fresh",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        GeneratorHistory { path, entries }
    }

    /// The id the next tracked generation will get
    pub fn next_id(&self) -> String {
        format!("GEN-{:04}", self.entries.len() + 1)
    }

    /// Record a completed generation
    pub fn record(&mut self, entry: HistoryEntry) -> HistoryResult<()> {
        log::info!("Recorded generation {} -> {}", entry.id, entry.file);
        self.entries.push(entry);
        self.save()
    }

    /// Look up a tracked generation by id
    pub fn find(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> HistoryResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Derive the RNG seed for a tracked id.
///
/// First 8 bytes of SHA256 over the id, big-endian. Any id maps to a
/// stable seed, so recalling GEN-0007 always replays the same pattern.
pub fn seed_from_id(id: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}
