use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::chunk::Chunk;
use super::store::{ChunkStore, Entry, MemoryConfig};
use crate::error::SnapshotError;

/// Current on-disk format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One stored chunk with its usage history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub chunk: Chunk,
    pub references: Vec<f64>,
}

/// Full contents of a [`ChunkStore`] as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub version: u32,
    pub time: f64,
    pub records: Vec<RecordSnapshot>,
}

impl MemorySnapshot {
    pub fn capture(store: &ChunkStore) -> Self {
        MemorySnapshot {
            version: SNAPSHOT_VERSION,
            time: store.time,
            records: store
                .entries
                .iter()
                .map(|entry| RecordSnapshot {
                    chunk: entry.chunk.clone(),
                    references: entry.references.clone(),
                })
                .collect(),
        }
    }

    /// Rebuild a store. Records must carry at least one reference.
    pub fn restore(
        self,
        config: MemoryConfig,
        seed: Option<u64>,
    ) -> Result<ChunkStore, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        let mut entries = Vec::with_capacity(self.records.len());
        for (index, record) in self.records.into_iter().enumerate() {
            if record.references.is_empty() {
                return Err(SnapshotError::InvalidRecord {
                    index,
                    reason: "no references".to_string(),
                });
            }
            if let Some(activation) = record.chunk.fixed_activation {
                if !activation.is_finite() {
                    return Err(SnapshotError::InvalidRecord {
                        index,
                        reason: format!("fixed activation {} is not finite", activation),
                    });
                }
            }
            entries.push(Entry {
                chunk: record.chunk,
                references: record.references,
            });
        }
        Ok(ChunkStore::from_parts(entries, self.time, config, seed))
    }

    /// Write to `path` through a temporary file and an atomic rename.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let json = fs::read_to_string(path).map_err(|e| SnapshotError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| SnapshotError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
