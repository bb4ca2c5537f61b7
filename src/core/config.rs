//! Validation thresholds and allow-lists

use super::image_header::AssetFormat;

/// Maximum width and height of an emoticon, in pixels
pub const MAX_DIMENSION: u32 = 64;
/// Asset files must be strictly smaller than this many bytes
pub const MAX_FILE_SIZE: u64 = 1024 * 50;
/// Emoticon codes must be at least this many characters long
pub const MIN_CODE_LENGTH: usize = 2;
pub const MANIFEST_FILE_NAME: &str = "index.json";
pub const AGGREGATE_FILE_NAME: &str = "manifest.json";
pub const REQUIRED_FIELDS: [&str; 2] = ["name", "emoticons"];

/// How much of the pipeline runs per pack
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ValidationMode {
    /// Manifest and entry checks only; nothing is written
    Basic,
    /// Adds the extraneous file check and writes the aggregate manifest
    Extended,
}

/// What the aggregator does when a pack fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing pack
    Abort,
    /// Record the failure and validate the remaining packs
    Continue,
}

#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub manifest_name: String,
    pub required_fields: Vec<String>,
    pub max_dimension: u32,
    pub max_file_size: u64,
    pub min_code_length: usize,
    /// Asset formats in resolution order
    pub formats: Vec<AssetFormat>,
    /// Only accept `<declared>.<format>` as a match for a declared base name
    pub strict_extensions: bool,
    pub mode: ValidationMode,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            manifest_name: MANIFEST_FILE_NAME.to_string(),
            required_fields: REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
            max_dimension: MAX_DIMENSION,
            max_file_size: MAX_FILE_SIZE,
            min_code_length: MIN_CODE_LENGTH,
            formats: vec![AssetFormat::Svg, AssetFormat::Png],
            strict_extensions: false,
            mode: ValidationMode::Extended,
        }
    }
}

impl ValidationConfig {
    /// Append GIF to the resolution order if it is not already there
    pub fn with_gif(mut self) -> Self {
        if !self.formats.contains(&AssetFormat::Gif) {
            self.formats.push(AssetFormat::Gif);
        }
        self
    }

    pub fn is_extended(&self) -> bool {
        self.mode == ValidationMode::Extended
    }

    /// Whether `ext` names one of the configured asset formats
    pub fn accepts_extension(&self, ext: &str) -> bool {
        AssetFormat::from_extension(ext).is_some_and(|fmt| self.formats.contains(&fmt))
    }
}
