use crate::sync::types::{Record, SyncError};
use log::warn;
use std::fs;
use std::path::Path;

/// Reads the persisted record set. A missing, unreadable, or malformed
/// file is treated as an empty collection rather than aborting the run.
pub fn load_records(path: &Path) -> Vec<Record> {
    if !path.exists() {
        return Vec::new();
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("read {} failed, starting from empty: {err}", path.display());
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(err) => {
            warn!("parse {} failed, starting from empty: {err}", path.display());
            Vec::new()
        }
    }
}

pub fn write_records(path: &Path, records: &[Record]) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| SyncError::Io(format!("mkdir {} failed: {e}", parent.display())))?;
    }
    let raw = serde_json::to_string_pretty(records)
        .map_err(|e| SyncError::Io(format!("serialize record set failed: {e}")))?;
    fs::write(path, raw).map_err(|e| SyncError::Io(format!("write {} failed: {e}", path.display())))
}
