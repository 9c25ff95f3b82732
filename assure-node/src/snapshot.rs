//! Pool store snapshot persistence.
//!
//! The store is written as a single bincode file in the data directory on
//! shutdown and read back on start. Ledger and oracle state are not part of
//! the snapshot.

use std::path::{Path, PathBuf};

use thiserror::Error;

use assure_core::serialization::{deserialize, serialize};
use assure_core::SerializationError;
use assure_state::MemoryPoolStore;

/// Snapshot file name inside the data directory.
pub const SNAPSHOT_FILE: &str = "pools.snapshot";

/// Snapshot errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem error.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding failed.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

/// Path of the snapshot file in `data_dir`.
pub fn snapshot_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SNAPSHOT_FILE)
}

/// Load the store from `data_dir`, if a snapshot exists.
pub fn load_snapshot(data_dir: &Path) -> Result<Option<MemoryPoolStore>, SnapshotError> {
    let path = snapshot_path(data_dir);
    if !path.exists() {
        return Ok(None);
    }
    let bytes = std::fs::read(&path)?;
    Ok(Some(deserialize(&bytes)?))
}

/// Write the store to `data_dir`. The previous snapshot is replaced
/// atomically.
pub fn save_snapshot(data_dir: &Path, store: &MemoryPoolStore) -> Result<(), SnapshotError> {
    std::fs::create_dir_all(data_dir)?;
    let bytes = serialize(store)?;
    let path = snapshot_path(data_dir);
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
}
