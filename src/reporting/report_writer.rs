//! Report writing functionality

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::aggregator::{AggregateManifest, RunSummary};

/// Write the aggregate manifest as pretty-printed JSON
///
/// # Arguments
/// * `output_path` - Path to output file, normally `<root>/manifest.json`
/// * `aggregate` - Pack directory name -> manifest record
pub fn write_aggregate_manifest(output_path: &Path, aggregate: &AggregateManifest) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, aggregate)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Read an aggregate manifest back from disk
pub fn read_aggregate_manifest(path: &Path) -> Result<AggregateManifest> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let aggregate = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(aggregate)
}

/// Write a plain-text summary of a run
///
/// # Arguments
/// * `output_path` - Path to output file
/// * `summary` - Results of the run
pub fn write_report(output_path: &Path, summary: &RunSummary) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let mut file = BufWriter::new(file);

    writeln!(file, "Emoticon Pack Validation Report")?;
    writeln!(file, "===============================")?;
    writeln!(file)?;

    let checked = summary.validated.len() + summary.failures.len();
    writeln!(file, "Summary Statistics:")?;
    writeln!(file, "-------------------")?;
    writeln!(file, "  Packs checked: {}", checked)?;
    writeln!(file, "  Valid packs: {}", summary.validated.len())?;
    writeln!(file, "  Failed packs: {}", summary.failures.len())?;
    writeln!(file, "  Skipped directories: {}", summary.skipped.len())?;
    writeln!(file, "  Emoticons verified: {}", summary.emoticon_count())?;
    if summary.aborted {
        writeln!(file, "  Run aborted after the first failing pack")?;
    }
    writeln!(file)?;

    if !summary.failures.is_empty() {
        writeln!(file, "Failed Packs:")?;
        writeln!(file, "-------------")?;
        for failure in &summary.failures {
            writeln!(file, "  {} ({})", failure.key, failure.dir.display())?;
            writeln!(file, "    stage: {}", failure.stage)?;
            writeln!(file, "    rule:  {}", failure.error.rule())?;
            writeln!(file, "    error: {}", failure.error)?;
        }
        writeln!(file)?;
    }

    writeln!(file, "Valid Packs:")?;
    writeln!(file, "------------")?;
    for report in &summary.validated {
        writeln!(
            file,
            "  {} \"{}\": {} emoticon(s)",
            report.key,
            report.manifest.name,
            report.emoticon_count()
        )?;
    }

    if !summary.skipped.is_empty() {
        writeln!(file)?;
        writeln!(file, "Skipped (no manifest):")?;
        writeln!(file, "----------------------")?;
        for dir in &summary.skipped {
            writeln!(file, "  {}", dir.display())?;
        }
    }

    file.flush()
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    Ok(())
}
