//! Pack manifest loading

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::config::ValidationConfig;
use super::error::{Result, ValidationError};

/// A pack manifest as loaded from disk.
///
/// Keys other than `name` and `emoticons` are kept in `extra` so the record
/// serializes back to what the pack author wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub name: String,
    /// Emoticon code -> asset base name (no extension)
    pub emoticons: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One (code, base-filename) pair from a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmoticonEntry<'a> {
    pub code: &'a str,
    pub file: &'a str,
}

impl ManifestRecord {
    pub fn entries(&self) -> impl Iterator<Item = EmoticonEntry<'_>> {
        self.emoticons
            .iter()
            .map(|(code, file)| EmoticonEntry { code, file })
    }

    /// Distinct asset base names referenced by the manifest
    pub fn declared_files(&self) -> impl Iterator<Item = &str> {
        self.emoticons.values().map(String::as_str)
    }
}

/// A manifest that parsed as JSON but has not been checked yet
#[derive(Debug, Clone)]
pub struct RawManifest {
    pub path: PathBuf,
    pub value: Value,
}

/// Load the manifest in `pack_dir`.
///
/// Returns `Ok(None)` when the directory has no manifest; such a directory
/// is not a pack.
pub fn load_manifest(pack_dir: &Path, config: &ValidationConfig) -> Result<Option<ManifestRecord>> {
    match read_manifest(pack_dir, config)? {
        Some(raw) => into_record(raw, config).map(Some),
        None => Ok(None),
    }
}

/// Read and parse the manifest file without checking its fields
pub fn read_manifest(pack_dir: &Path, config: &ValidationConfig) -> Result<Option<RawManifest>> {
    let path = pack_dir.join(&config.manifest_name);
    if !path.is_file() {
        return Ok(None);
    }

    let value = read_manifest_value(&path)?;
    Ok(Some(RawManifest { path, value }))
}

/// Check required fields and convert to a typed record
pub fn into_record(raw: RawManifest, config: &ValidationConfig) -> Result<ManifestRecord> {
    let RawManifest { path, value } = raw;
    check_required_fields(&path, &value, &config.required_fields)?;

    serde_json::from_value(value).map_err(|source| ValidationError::ManifestSchema { path, source })
}

fn read_manifest_value(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|source| ValidationError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| ValidationError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Every required key must be present on the root object.
pub fn check_required_fields(path: &Path, value: &Value, required: &[String]) -> Result<()> {
    for field in required {
        let present = value
            .as_object()
            .is_some_and(|obj| obj.contains_key(field));
        if !present {
            return Err(ValidationError::MissingField {
                path: path.to_path_buf(),
                field: field.clone(),
            });
        }
    }
    Ok(())
}
