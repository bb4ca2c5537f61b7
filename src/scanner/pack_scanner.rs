//! Pack directory discovery

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collect the immediate subdirectories of `root`
///
/// Directories without a manifest are included; the manifest loader decides
/// whether each one is a pack. Results are sorted so logs are stable between
/// runs, but nothing downstream depends on the order.
pub fn collect_pack_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list {}", root.display()))?;
        // Follows symlinked pack directories, like a plain directory listing would
        if entry.path().is_dir() {
            dirs.push(entry.into_path());
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Directory name used as the pack's key in the aggregate manifest
pub fn pack_key(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
