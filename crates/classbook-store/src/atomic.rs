//! Atomic write primitives
//!
//! Data files are written to a sibling temp file and renamed into place, so a
//! crash mid-write leaves the previous file intact.

use crate::errors::{io_error, Result};
use std::fs;
use std::path::{Path, PathBuf};

fn temp_path_for(target_path: &Path) -> PathBuf {
    let mut name = target_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target_path.with_file_name(name)
}

/// Atomically write bytes to a file, creating parent directories as needed
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error("save", parent, e))?;
        }
    }

    let temp_path = temp_path_for(target_path);
    fs::write(&temp_path, content).map_err(|e| io_error("save", target_path, e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        fs::remove_file(&temp_path).ok();
        return Err(io_error("save", target_path, e));
    }

    Ok(())
}
