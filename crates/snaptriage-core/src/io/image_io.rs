use std::path::{Path, PathBuf};

use image::GenericImageView;
use rayon::prelude::*;

use crate::error::Result;
use crate::payload::{media_type_for_path, ImagePayload};

/// Read a file into a payload, taking the media type from its extension.
pub fn load_payload(path: &Path) -> Result<ImagePayload> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut payload = ImagePayload::new(name, media_type_for_path(path), bytes);
    if let Ok(modified) = std::fs::metadata(path).and_then(|m| m.modified()) {
        payload = payload.with_modified(modified);
    }
    Ok(payload)
}

/// Read several files in parallel. Results keep the order of `paths`.
pub fn load_payloads(paths: &[PathBuf]) -> Vec<(PathBuf, Result<ImagePayload>)> {
    paths
        .par_iter()
        .map(|path| (path.clone(), load_payload(path)))
        .collect()
}

/// Decoded width and height of an image payload.
pub fn image_dimensions(payload: &ImagePayload) -> Result<(u32, u32)> {
    let decoded = image::load_from_memory(payload.bytes())?;
    Ok(decoded.dimensions())
}

/// Write a payload's bytes to `path`.
pub fn save_payload(payload: &ImagePayload, path: &Path) -> Result<()> {
    std::fs::write(path, payload.bytes())?;
    Ok(())
}

/// Output path for a reduced payload: `<stem>.reduced.<ext>` next to `input`.
pub fn reduced_output_path(input: &Path, media_type: &str) -> PathBuf {
    let ext = match media_type {
        "image/webp" => "webp",
        "image/jpeg" => "jpg",
        _ => input.extension().and_then(|e| e.to_str()).unwrap_or("bin"),
    };
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}.reduced.{ext}"))
}
