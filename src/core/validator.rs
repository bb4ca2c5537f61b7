//! Pack validation
//!
//! Drives the manifest loader, entry checks and extraneous file check for a
//! single pack directory. A pack either passes every check or fails with the
//! first error encountered.

use std::fmt;
use std::path::{Path, PathBuf};

use super::config::ValidationConfig;
use super::entry::{validate_entry, AssetFile};
use super::error::ValidationError;
use super::manifest::{into_record, read_manifest, ManifestRecord};
use crate::scanner::extraneous::check_extraneous;
use crate::scanner::pack_scanner::pack_key;

/// Last stage a pack reached before it finished or failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PackStage {
    Unvisited,
    ManifestLoaded,
    FieldsChecked,
    EntriesChecked,
    ExtraneousChecked,
}

impl fmt::Display for PackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unvisited => "unvisited",
            Self::ManifestLoaded => "manifest loaded",
            Self::FieldsChecked => "fields checked",
            Self::EntriesChecked => "entries checked",
            Self::ExtraneousChecked => "extraneous checked",
        };
        f.write_str(name)
    }
}

/// A pack that passed validation
#[derive(Debug, Clone)]
pub struct PackReport {
    pub key: String,
    pub dir: PathBuf,
    pub manifest: ManifestRecord,
    pub assets: Vec<AssetFile>,
}

impl PackReport {
    pub fn emoticon_count(&self) -> usize {
        self.assets.len()
    }
}

/// A pack that failed validation
#[derive(Debug)]
pub struct PackFailure {
    pub key: String,
    pub dir: PathBuf,
    pub stage: PackStage,
    pub error: ValidationError,
}

impl fmt::Display for PackFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pack `{}` failed after {} [{}]: {}",
            self.key,
            self.stage,
            self.error.rule(),
            self.error
        )
    }
}

impl std::error::Error for PackFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Outcome for one candidate directory
#[derive(Debug)]
pub enum PackOutcome {
    /// No manifest; not a pack
    Skipped(PathBuf),
    Validated(PackReport),
    Failed(PackFailure),
}

#[derive(Debug, Clone, Default)]
pub struct PackValidator {
    config: ValidationConfig,
}

impl PackValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate one pack directory
    ///
    /// The extraneous file check only runs in extended mode.
    pub fn validate(&self, dir: &Path) -> PackOutcome {
        self.validate_as(dir, pack_key(dir))
    }

    /// Validate with an explicit aggregate key
    pub fn validate_as(&self, dir: &Path, key: String) -> PackOutcome {
        let mut stage = PackStage::Unvisited;

        match self.run_stages(dir, &mut stage) {
            Ok(Some((manifest, assets))) => {
                tracing::info!(pack = %key, emoticons = assets.len(), "pack verified");
                PackOutcome::Validated(PackReport {
                    key,
                    dir: dir.to_path_buf(),
                    manifest,
                    assets,
                })
            }
            Ok(None) => {
                tracing::debug!(dir = %dir.display(), "no manifest, skipping");
                PackOutcome::Skipped(dir.to_path_buf())
            }
            Err(error) => {
                tracing::warn!(pack = %key, %stage, rule = error.rule(), "{}", error);
                PackOutcome::Failed(PackFailure {
                    key,
                    dir: dir.to_path_buf(),
                    stage,
                    error,
                })
            }
        }
    }

    fn run_stages(
        &self,
        dir: &Path,
        stage: &mut PackStage,
    ) -> Result<Option<(ManifestRecord, Vec<AssetFile>)>, ValidationError> {
        let Some(raw) = read_manifest(dir, &self.config)? else {
            return Ok(None);
        };
        *stage = PackStage::ManifestLoaded;

        let manifest = into_record(raw, &self.config)?;
        *stage = PackStage::FieldsChecked;
        tracing::debug!(dir = %dir.display(), name = %manifest.name, "manifest loaded");

        let mut assets = Vec::with_capacity(manifest.emoticons.len());
        for entry in manifest.entries() {
            assets.push(validate_entry(dir, entry.code, entry.file, &self.config)?);
        }
        *stage = PackStage::EntriesChecked;

        if self.config.is_extended() {
            check_extraneous(dir, manifest.declared_files(), &self.config)?;
            *stage = PackStage::ExtraneousChecked;
        }

        Ok(Some((manifest, assets)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ValidationMode;
    use std::fs;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        fs::write(dir.join(name), bytes).unwrap();
    }

    fn smile_pack() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("index.json"),
            r#"{"name":"Smile","emoticons":{":)":"smile"}}"#,
        )
        .unwrap();
        write_png(dir.path(), "smile.png", 40, 40);
        dir
    }

    #[test]
    fn test_valid_pack_reaches_final_stage() {
        let dir = smile_pack();
        match PackValidator::default().validate(dir.path()) {
            PackOutcome::Validated(report) => {
                assert_eq!(report.emoticon_count(), 1);
                assert_eq!(report.manifest.name, "Smile");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_directory_without_manifest_is_skipped() {
        let dir = TempDir::new().unwrap();
        let outcome = PackValidator::default().validate(dir.path());
        assert!(matches!(outcome, PackOutcome::Skipped(_)));
    }

    #[test]
    fn test_failure_records_stage() {
        let dir = smile_pack();
        fs::write(dir.path().join("readme.txt"), "hi").unwrap();

        match PackValidator::default().validate(dir.path()) {
            PackOutcome::Failed(failure) => {
                assert_eq!(failure.stage, PackStage::EntriesChecked);
                assert!(matches!(failure.error, ValidationError::ExtraneousFile { .. }));
                assert!(failure.to_string().contains("readme.txt"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_fails_before_entries() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.json"), r#"{"name":"Smile"}"#).unwrap();

        match PackValidator::default().validate(dir.path()) {
            PackOutcome::Failed(failure) => {
                assert_eq!(failure.stage, PackStage::ManifestLoaded);
                assert!(matches!(failure.error, ValidationError::MissingField { .. }));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_basic_mode_skips_extraneous_check() {
        let dir = smile_pack();
        fs::write(dir.path().join("readme.txt"), "hi").unwrap();

        let config = ValidationConfig {
            mode: ValidationMode::Basic,
            ..ValidationConfig::default()
        };
        let outcome = PackValidator::new(config).validate(dir.path());
        assert!(matches!(outcome, PackOutcome::Validated(_)));
    }
}
