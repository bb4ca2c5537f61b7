//! Output files: aggregate manifest and text report

pub mod report_writer;

pub use report_writer::{read_aggregate_manifest, write_aggregate_manifest, write_report};
