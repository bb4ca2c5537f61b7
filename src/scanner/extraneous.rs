//! Extraneous file detection
//!
//! Reconciles the files present in a pack directory against the names its
//! manifest declares.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::core::config::ValidationConfig;
use crate::core::error::{Result, ValidationError};

/// List the entries of `pack_dir` that the manifest does not account for.
///
/// An entry is allowed when its full name is the manifest itself or a
/// declared base name, or when its name minus the last extension is a
/// declared base name. With `strict_extensions` that extension must also be
/// a configured asset format. The result is sorted.
pub fn find_extraneous<'a, I>(pack_dir: &Path, declared: I, config: &ValidationConfig) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let allowed: HashSet<&str> = declared.into_iter().collect();

    let entries = fs::read_dir(pack_dir).map_err(|source| ValidationError::Io {
        path: pack_dir.to_path_buf(),
        source,
    })?;

    let mut extraneous = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ValidationError::Io {
            path: pack_dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if !is_allowed(&name, &allowed, config) {
            extraneous.push(name);
        }
    }

    extraneous.sort();
    Ok(extraneous)
}

fn is_allowed(name: &str, allowed: &HashSet<&str>, config: &ValidationConfig) -> bool {
    if name == config.manifest_name || allowed.contains(name) {
        return true;
    }

    let path = Path::new(name);
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    if stem == name || !allowed.contains(stem) {
        return false;
    }

    if config.strict_extensions {
        return path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| config.accepts_extension(ext));
    }
    true
}

/// Fail on the first (in name order) file the manifest does not account for.
pub fn check_extraneous<'a, I>(pack_dir: &Path, declared: I, config: &ValidationConfig) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let extraneous = find_extraneous(pack_dir, declared, config)?;
    match extraneous.into_iter().next() {
        Some(name) => Err(ValidationError::ExtraneousFile {
            dir: pack_dir.to_path_buf(),
            name,
        }),
        None => Ok(()),
    }
}
