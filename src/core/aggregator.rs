//! Multi-pack aggregation
//!
//! Validates every pack under a root directory and folds the manifests of
//! the packs that pass into one aggregate, keyed by pack directory name.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::config::FailurePolicy;
use super::manifest::ManifestRecord;
use super::validator::{PackFailure, PackOutcome, PackReport, PackValidator};
use crate::scanner::pack_scanner::{collect_pack_dirs, pack_key};

/// Pack directory name -> manifest record
pub type AggregateManifest = BTreeMap<String, ManifestRecord>;

/// Everything a run produced
#[derive(Debug, Default)]
pub struct RunSummary {
    pub validated: Vec<PackReport>,
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<PackFailure>,
    pub aggregate: AggregateManifest,
    /// Set when the run stopped early under `FailurePolicy::Abort`
    pub aborted: bool,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn emoticon_count(&self) -> usize {
        self.validated.iter().map(PackReport::emoticon_count).sum()
    }
}

pub struct Aggregator {
    validator: PackValidator,
    policy: FailurePolicy,
    include_path: bool,
    summary: RunSummary,
}

impl Aggregator {
    pub fn new(validator: PackValidator, policy: FailurePolicy) -> Self {
        Self {
            validator,
            policy,
            include_path: false,
            summary: RunSummary::default(),
        }
    }

    /// Add each pack's directory to its aggregated record under `path`
    pub fn include_path(mut self, include: bool) -> Self {
        self.include_path = include;
        self
    }

    /// Whether the failure policy says to stop
    pub fn should_stop(&self) -> bool {
        self.summary.aborted
    }

    /// Validate the pack in `dir` and fold the result in
    pub fn add_pack(&mut self, dir: &Path) -> PackOutcomeKind {
        let key = pack_key(dir);
        self.add_pack_as(dir, key)
    }

    /// Like [`Aggregator::add_pack`] with an explicit aggregate key
    pub fn add_pack_as(&mut self, dir: &Path, key: String) -> PackOutcomeKind {
        match self.validator.validate_as(dir, key) {
            PackOutcome::Skipped(path) => {
                self.summary.skipped.push(path);
                PackOutcomeKind::Skipped
            }
            PackOutcome::Validated(report) => {
                let mut record = report.manifest.clone();
                if self.include_path {
                    record.extra.insert(
                        "path".to_string(),
                        Value::String(report.dir.display().to_string()),
                    );
                }
                self.summary.aggregate.insert(report.key.clone(), record);
                self.summary.validated.push(report);
                PackOutcomeKind::Validated
            }
            PackOutcome::Failed(failure) => {
                self.summary.failures.push(failure);
                if self.policy == FailurePolicy::Abort {
                    self.summary.aborted = true;
                }
                PackOutcomeKind::Failed
            }
        }
    }

    pub fn finish(self) -> RunSummary {
        self.summary
    }

    /// Validate the given directories in order, honoring the failure policy
    pub fn run_dirs<F>(mut self, dirs: &[PathBuf], mut on_pack: F) -> RunSummary
    where
        F: FnMut(&Path, PackOutcomeKind),
    {
        for dir in dirs {
            let kind = self.add_pack(dir);
            on_pack(dir.as_path(), kind);
            if self.should_stop() {
                tracing::warn!("aborting run after first failing pack");
                break;
            }
        }
        self.finish()
    }

    /// Validate every immediate subdirectory of `root`
    pub fn run(self, root: &Path) -> Result<RunSummary> {
        let dirs = collect_pack_dirs(root)?;
        Ok(self.run_dirs(&dirs, |_, _| {}))
    }

    /// Validate `dir` itself as the only pack
    pub fn run_single(mut self, dir: &Path) -> Result<RunSummary> {
        let dir = dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve pack directory {}", dir.display()))?;
        let key = pack_key(&dir);
        self.add_pack_as(&dir, key);
        Ok(self.finish())
    }
}

/// Coarse outcome passed to progress callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackOutcomeKind {
    Skipped,
    Validated,
    Failed,
}
