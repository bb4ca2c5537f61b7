//! Emoticon Pack Validator Library
//!
//! Validates directories of emoticon assets against their `index.json`
//! manifests and aggregates the manifests of valid packs.

pub mod core;
pub mod scanner;
pub mod reporting;

pub use crate::core::validator;
pub use crate::scanner::pack_scanner;
pub use crate::reporting::report_writer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::core::aggregator::{AggregateManifest, Aggregator, PackOutcomeKind, RunSummary};
    pub use crate::core::config::{FailurePolicy, ValidationConfig, ValidationMode};
    pub use crate::core::entry::{check_code, resolve_asset, validate_entry, AssetFile};
    pub use crate::core::error::ValidationError;
    pub use crate::core::image_header::{read_dimensions, AssetFormat, Dimensions};
    pub use crate::core::manifest::{load_manifest, ManifestRecord};
    pub use crate::core::validator::{PackFailure, PackOutcome, PackReport, PackStage, PackValidator};
    pub use crate::scanner::extraneous::{check_extraneous, find_extraneous};
    pub use crate::scanner::pack_scanner::{collect_pack_dirs, pack_key};
    pub use crate::reporting::report_writer::{
        read_aggregate_manifest, write_aggregate_manifest, write_report,
    };
}
