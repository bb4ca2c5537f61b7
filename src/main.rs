use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use emote_validator::core::config::AGGREGATE_FILE_NAME;
use emote_validator::prelude::*;

#[derive(Parser)]
#[command(name = "emote_validator")]
#[command(about = "Validates emoticon packs and builds their aggregate manifest", long_about = None)]
struct Cli {
    /// Directory holding one pack per subdirectory
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// `basic` checks manifests and entries only; `extended` also checks for
    /// extraneous files and writes the aggregate manifest
    #[arg(long, value_enum, default_value = "extended")]
    mode: ValidationMode,

    /// Aggregate manifest path (default: <DIRECTORY>/manifest.json, or the
    /// parent directory with --single)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a plain-text report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Keep validating after a pack fails and report every failure at the end
    #[arg(long)]
    keep_going: bool,

    /// Treat DIRECTORY itself as a single pack
    #[arg(long)]
    single: bool,

    /// Only accept declared files with an asset extension (.svg, .png)
    #[arg(long)]
    strict_extensions: bool,

    /// Accept .gif assets after .svg and .png
    #[arg(long)]
    allow_gif: bool,

    /// Add each pack's directory to its aggregate record as `path`
    #[arg(long)]
    include_path: bool,

    /// Maximum emoticon width and height in pixels
    #[arg(long, default_value_t = 64)]
    max_dimension: u32,

    /// Asset files must be smaller than this many bytes
    #[arg(long, default_value_t = 51200)]
    max_file_size: u64,

    /// Minimum emoticon code length
    #[arg(long, default_value_t = 2)]
    min_code_length: usize,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Run in batch mode (no progress bar)
    #[arg(long)]
    batch: bool,
}

impl Cli {
    fn config(&self) -> ValidationConfig {
        let config = ValidationConfig {
            max_dimension: self.max_dimension,
            max_file_size: self.max_file_size,
            min_code_length: self.min_code_length,
            strict_extensions: self.strict_extensions,
            mode: self.mode,
            ..ValidationConfig::default()
        };
        if self.allow_gif {
            config.with_gif()
        } else {
            config
        }
    }

    fn policy(&self) -> FailurePolicy {
        if self.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if run(&cli)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let config = cli.config();
    let extended = config.is_extended();

    println!("Emoticon Pack Validator");
    println!("Scanning {}", cli.directory.display());
    println!();

    let aggregator = Aggregator::new(PackValidator::new(config), cli.policy())
        .include_path(cli.include_path);

    let summary = if cli.single {
        aggregator.run_single(&cli.directory)?
    } else {
        let dirs = collect_pack_dirs(&cli.directory)?;
        let progress = progress_bar(dirs.len() as u64, cli.batch)?;
        let summary = aggregator.run_dirs(&dirs, |dir, _| {
            progress.set_message(pack_key(dir));
            progress.inc(1);
        });
        progress.finish_and_clear();
        summary
    };

    print_summary(&summary);

    if let Some(report_path) = &cli.report {
        write_report(report_path, &summary)?;
        println!("Detailed report saved to: {}", report_path.display());
    }

    if !summary.is_success() {
        // A partial aggregate is never written
        return Ok(false);
    }

    if extended {
        let output = match &cli.output {
            Some(path) => path.clone(),
            None => default_output(cli)?,
        };
        write_aggregate_manifest(&output, &summary.aggregate)
            .context("Failed to write aggregate manifest")?;
        println!("Aggregate manifest saved to: {}", output.display());
    }

    Ok(true)
}

/// `<DIRECTORY>/manifest.json`, or next to the pack when it is validated alone
fn default_output(cli: &Cli) -> Result<PathBuf> {
    if !cli.single {
        return Ok(cli.directory.join(AGGREGATE_FILE_NAME));
    }

    let dir = cli
        .directory
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", cli.directory.display()))?;
    let parent = dir.parent().unwrap_or(&dir);
    Ok(parent.join(AGGREGATE_FILE_NAME))
}

fn progress_bar(len: u64, batch: bool) -> Result<ProgressBar> {
    if batch {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn print_summary(summary: &RunSummary) {
    println!("==================================================");
    println!("VALIDATION COMPLETE");
    println!("==================================================");
    println!("Valid packs: {}", summary.validated.len());
    println!("Failed packs: {}", summary.failures.len());
    println!("Skipped directories: {}", summary.skipped.len());
    println!("Emoticons verified: {}", summary.emoticon_count());
    println!();

    for report in &summary.validated {
        println!("  OK   {} ({} emoticons)", report.key, report.emoticon_count());
    }
    for failure in &summary.failures {
        println!("  FAIL {}", failure);
    }
    if summary.aborted {
        println!();
        println!("Stopped at the first failing pack; rerun with --keep-going to check the rest.");
    }
    println!();
}
