//! Shared fixtures for building packs on disk

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Minimal PNG header: signature, IHDR length/type, width, height
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes
}

/// PNG header padded with zeros to `total` bytes
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32, total: usize) -> PathBuf {
    let mut bytes = png_bytes(width, height);
    bytes.resize(total.max(bytes.len()), 0);
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

pub fn write_svg(dir: &Path, name: &str, view_box: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(
        &path,
        format!(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{view_box}"><circle r="4"/></svg>"#),
    )
    .unwrap();
    path
}

pub fn write_manifest(dir: &Path, json: &str) {
    fs::write(dir.join("index.json"), json).unwrap();
}

/// Create `<root>/<name>` holding a manifest and a 40x40, 2 KiB PNG per emoticon
pub fn write_pack(root: &Path, name: &str, emoticons: &[(&str, &str)]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();

    let map: serde_json::Map<String, serde_json::Value> = emoticons
        .iter()
        .map(|(code, file)| (code.to_string(), serde_json::Value::String(file.to_string())))
        .collect();
    let manifest = serde_json::json!({ "name": name, "emoticons": map });
    fs::write(dir.join("index.json"), manifest.to_string()).unwrap();

    for (_, file) in emoticons {
        write_png(&dir, &format!("{file}.png"), 40, 40, 2048);
    }
    dir
}
