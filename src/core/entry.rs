//! Per-emoticon checks: naming, asset resolution, dimensions and size

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use super::config::ValidationConfig;
use super::error::{Result, ValidationError};
use super::image_header::{read_dimensions, AssetFormat};

lazy_static::lazy_static! {
    static ref FILE_NAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// An asset file that passed every entry check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    pub path: PathBuf,
    pub format: AssetFormat,
    pub width: u32,
    pub height: u32,
    pub size: u64,
}

/// Check the naming rules of one manifest entry.
///
/// The character class applies to the asset file name and the length rule
/// applies to the emoticon code. Codes are counted in characters, not bytes.
pub fn check_code(code: &str, file: &str, config: &ValidationConfig) -> Result<()> {
    if !FILE_NAME_RE.is_match(file) {
        return Err(ValidationError::InvalidCode {
            code: code.to_string(),
            file: file.to_string(),
            reason: "file name may only contain A-Z, a-z, 0-9, `_` and `-`".to_string(),
        });
    }

    if code.chars().count() < config.min_code_length {
        return Err(ValidationError::InvalidCode {
            code: code.to_string(),
            file: file.to_string(),
            reason: format!(
                "code must be at least {} characters long",
                config.min_code_length
            ),
        });
    }

    Ok(())
}

/// Find `<base>.<ext>` for the first configured format that exists.
pub fn resolve_asset(pack_dir: &Path, code: &str, file: &str, config: &ValidationConfig) -> Result<PathBuf> {
    let base = pack_dir.join(file);

    for format in &config.formats {
        let candidate = pack_dir.join(format!("{}.{}", file, format.extension()));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    let tried = config
        .formats
        .iter()
        .map(|f| format!(".{}", f.extension()))
        .collect::<Vec<_>>()
        .join(", ");
    Err(ValidationError::FileNotFound {
        code: code.to_string(),
        base,
        tried,
    })
}

/// Run every check for one emoticon and return the asset it resolved to.
pub fn validate_entry(pack_dir: &Path, code: &str, file: &str, config: &ValidationConfig) -> Result<AssetFile> {
    check_code(code, file, config)?;

    let path = resolve_asset(pack_dir, code, file, config)?;
    let (format, dims) = read_dimensions(&path)?;

    if dims.width > config.max_dimension || dims.height > config.max_dimension {
        return Err(ValidationError::Dimension {
            path,
            width: dims.width,
            height: dims.height,
            max: config.max_dimension,
        });
    }

    let size = fs::metadata(&path)
        .map_err(|source| ValidationError::Io {
            path: path.clone(),
            source,
        })?
        .len();
    if size >= config.max_file_size {
        return Err(ValidationError::FileTooLarge {
            path,
            size,
            limit: config.max_file_size,
        });
    }

    tracing::debug!(
        code,
        file = %path.display(),
        width = dims.width,
        height = dims.height,
        size,
        "emoticon verified"
    );

    Ok(AssetFile {
        path,
        format,
        width: dims.width,
        height: dims.height,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32, total: usize) {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.resize(total.max(bytes.len()), 0);
        fs::write(dir.join(name), bytes).unwrap();
    }

    #[test]
    fn test_short_code_is_invalid() {
        let config = ValidationConfig::default();
        for code in ["", ")", "é"] {
            let err = check_code(code, "smile", &config).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidCode { .. }), "code {:?}", code);
        }
        assert!(check_code(":)", "smile", &config).is_ok());
    }

    #[test]
    fn test_file_name_character_class() {
        let config = ValidationConfig::default();
        for file in ["", "smi le", "smile.png", "../smile", "sm:le"] {
            let err = check_code(":)", file, &config).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidCode { .. }), "file {:?}", file);
        }
        assert!(check_code(":)", "Smile_face-2", &config).is_ok());
    }

    #[test]
    fn test_character_class_is_not_applied_to_code() {
        // Codes routinely contain punctuation; only the file name is restricted
        let config = ValidationConfig::default();
        assert!(check_code(":-D <3", "grin", &config).is_ok());
    }

    #[test]
    fn test_svg_is_preferred_over_png() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "smile.png", 40, 40, 100);
        fs::write(
            dir.path().join("smile.svg"),
            r#"<svg viewBox="0 0 32 32"></svg>"#,
        )
        .unwrap();

        let asset = validate_entry(dir.path(), ":)", "smile", &ValidationConfig::default()).unwrap();
        assert_eq!(asset.format, AssetFormat::Svg);
        assert_eq!((asset.width, asset.height), (32, 32));
    }

    #[test]
    fn test_missing_asset_names_base_path() {
        let dir = TempDir::new().unwrap();
        let err = validate_entry(dir.path(), ":)", "smile", &ValidationConfig::default()).unwrap_err();
        match err {
            ValidationError::FileNotFound { base, tried, .. } => {
                assert_eq!(base, dir.path().join("smile"));
                assert_eq!(tried, ".svg, .png");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_each_axis_checked_independently() {
        let dir = TempDir::new().unwrap();
        let config = ValidationConfig::default();

        write_png(dir.path(), "wide.png", 65, 10, 100);
        write_png(dir.path(), "tall.png", 10, 65, 100);
        write_png(dir.path(), "edge.png", 64, 64, 100);

        for file in ["wide", "tall"] {
            let err = validate_entry(dir.path(), ":)", file, &config).unwrap_err();
            assert!(matches!(err, ValidationError::Dimension { .. }), "file {}", file);
        }
        assert!(validate_entry(dir.path(), ":)", "edge", &config).is_ok());
    }

    #[test]
    fn test_huge_view_box_is_dimension_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("big.svg"),
            r#"<svg viewBox="0 0 5000000000 10"></svg>"#,
        )
        .unwrap();

        let err = validate_entry(dir.path(), ":big:", "big", &ValidationConfig::default()).unwrap_err();
        assert!(matches!(err, ValidationError::Dimension { .. }), "got {err}");
        assert_eq!(err.rule(), "dimension");
    }

    #[test]
    fn test_size_limit_is_strict() {
        let dir = TempDir::new().unwrap();
        let config = ValidationConfig::default();

        write_png(dir.path(), "big.png", 16, 16, 51200);
        write_png(dir.path(), "ok.png", 16, 16, 51199);

        let err = validate_entry(dir.path(), ":)", "big", &config).unwrap_err();
        assert!(matches!(err, ValidationError::FileTooLarge { size: 51200, .. }));
        assert_eq!(validate_entry(dir.path(), ":)", "ok", &config).unwrap().size, 51199);
    }

    #[test]
    fn test_alternate_thresholds() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "smile.png", 40, 40, 2048);

        let mut config = ValidationConfig::default();
        config.max_dimension = 32;
        let err = validate_entry(dir.path(), ":)", "smile", &config).unwrap_err();
        assert!(matches!(err, ValidationError::Dimension { max: 32, .. }));

        let mut config = ValidationConfig::default();
        config.max_file_size = 1024;
        let err = validate_entry(dir.path(), ":)", "smile", &config).unwrap_err();
        assert!(matches!(err, ValidationError::FileTooLarge { limit: 1024, .. }));
    }

    #[test]
    fn test_gif_only_resolves_when_enabled() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("wave.gif"), b"GIF89a\x10\x00\x10\x00\x00\x00").unwrap();

        let err = validate_entry(dir.path(), ":wave:", "wave", &ValidationConfig::default()).unwrap_err();
        assert!(matches!(err, ValidationError::FileNotFound { .. }));

        let config = ValidationConfig::default().with_gif();
        let asset = validate_entry(dir.path(), ":wave:", "wave", &config).unwrap();
        assert_eq!(asset.format, AssetFormat::Gif);
    }
}
