//! Image dimension extraction from file headers
//!
//! Only the bytes needed for width and height are read. PNG and GIF store
//! them at fixed offsets near the start of the file; SVG carries them in the
//! root element's `viewBox`.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use super::error::{Result, ValidationError};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
/// Signature + IHDR length + IHDR type + width + height
const PNG_HEADER_LEN: usize = 24;
const GIF_HEADER_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetFormat {
    Svg,
    Png,
    Gif,
}

impl AssetFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    /// Case-insensitive lookup by file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Read the pixel dimensions of an image, choosing the parser by extension
pub fn read_dimensions(path: &Path) -> Result<(AssetFormat, Dimensions)> {
    let format = AssetFormat::from_path(path).ok_or_else(|| ValidationError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let dims = match format {
        AssetFormat::Png => png_dimensions(path)?,
        AssetFormat::Svg => svg_dimensions(path)?,
        AssetFormat::Gif => gif_dimensions(path)?,
    };
    Ok((format, dims))
}

/// Read the first `N` bytes of a file. The handle is dropped on return.
fn read_header<const N: usize>(path: &Path) -> Result<[u8; N]> {
    let mut file = File::open(path).map_err(|source| ValidationError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut header = [0u8; N];
    file.read_exact(&mut header).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => ValidationError::Format {
            path: path.to_path_buf(),
            reason: format!("file is shorter than the {}-byte header", N),
        },
        _ => ValidationError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    Ok(header)
}

/// PNG width and height from the IHDR chunk (bytes 16..24, big-endian)
pub fn png_dimensions(path: &Path) -> Result<Dimensions> {
    let header = read_header::<PNG_HEADER_LEN>(path)?;
    parse_png_header(&header).map_err(|reason| ValidationError::Format {
        path: path.to_path_buf(),
        reason,
    })
}

fn parse_png_header(header: &[u8; PNG_HEADER_LEN]) -> std::result::Result<Dimensions, String> {
    if header[0..8] != PNG_SIGNATURE {
        return Err("missing PNG signature".to_string());
    }
    if &header[12..16] != b"IHDR" {
        return Err("first chunk is not IHDR".to_string());
    }

    let width = u32::from_be_bytes([header[16], header[17], header[18], header[19]]);
    let height = u32::from_be_bytes([header[20], header[21], header[22], header[23]]);
    Ok(Dimensions { width, height })
}

/// GIF logical screen size (bytes 6..10, little-endian u16 pairs)
pub fn gif_dimensions(path: &Path) -> Result<Dimensions> {
    let header = read_header::<GIF_HEADER_LEN>(path)?;
    if &header[0..6] != b"GIF87a" && &header[0..6] != b"GIF89a" {
        return Err(ValidationError::Format {
            path: path.to_path_buf(),
            reason: "missing GIF87a/GIF89a signature".to_string(),
        });
    }

    let width = u16::from_le_bytes([header[6], header[7]]) as u32;
    let height = u16::from_le_bytes([header[8], header[9]]) as u32;
    Ok(Dimensions { width, height })
}

/// SVG width and height from the root `viewBox`
///
/// Fractional values are truncated toward zero. Negative, non-finite or
/// non-numeric values are rejected.
pub fn svg_dimensions(path: &Path) -> Result<Dimensions> {
    let text = fs::read_to_string(path).map_err(|source| ValidationError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let format_err = |reason: String| ValidationError::Format {
        path: path.to_path_buf(),
        reason,
    };

    let doc = roxmltree::Document::parse(&text).map_err(|e| format_err(format!("invalid XML: {e}")))?;
    let view_box = doc
        .root_element()
        .attribute("viewBox")
        .ok_or_else(|| format_err("root element has no viewBox".to_string()))?;

    parse_view_box(view_box).map_err(format_err)
}

fn parse_view_box(value: &str) -> std::result::Result<Dimensions, String> {
    let tokens: Vec<&str> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() != 4 {
        return Err(format!("viewBox `{value}` must have 4 numbers"));
    }

    view_box_number(tokens[0])?;
    view_box_number(tokens[1])?;
    let width = view_box_length(tokens[2])?;
    let height = view_box_length(tokens[3])?;
    Ok(Dimensions { width, height })
}

fn view_box_number(token: &str) -> std::result::Result<f64, String> {
    let value: f64 = token
        .parse()
        .map_err(|_| format!("viewBox value `{token}` is not a number"))?;

    if !value.is_finite() {
        return Err(format!("viewBox value `{token}` is not finite"));
    }
    Ok(value)
}

/// Lengths above `u32::MAX` saturate so they still fail the dimension check
fn view_box_length(token: &str) -> std::result::Result<u32, String> {
    let value = view_box_number(token)?;
    if value < 0.0 {
        return Err(format!("viewBox value `{token}` is negative"));
    }
    Ok(value.trunc() as u32)
}
