use std::collections::HashSet;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::batch::Item;
use crate::consts::EXPORT_ARCHIVE_NAME;
use crate::error::{Result, TriageError};

/// Split `name` into base and extension (with its dot).
///
/// A leading dot does not start an extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Assign every entry a distinct archive name.
///
/// Missing names become `image_<pos>.jpg`; a repeated name gets `_<pos>`
/// inserted before its extension, where `<pos>` is the 1-based position.
pub fn unique_entry_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for (index, name) in names.into_iter().enumerate() {
        let position = index + 1;
        let mut candidate = match name.filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => format!("image_{position}.jpg"),
        };
        if used.contains(&candidate) {
            let (base, ext) = split_extension(&candidate);
            let (base, ext) = (base.to_string(), ext.to_string());
            candidate = format!("{base}_{position}{ext}");
            let mut extra = 2;
            while used.contains(&candidate) {
                candidate = format!("{base}_{position}_{extra}{ext}");
                extra += 1;
            }
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Write `entries` (name, bytes) into a zip archive, stored uncompressed.
pub fn write_archive<W: Write + Seek>(writer: W, entries: &[(String, &[u8])]) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, bytes) in entries {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(bytes)
            .map_err(|e| TriageError::ArchiveFailed(format!("{name}: {e}")))?;
    }
    Ok(zip.finish()?)
}

/// Archive the original payloads of `items` in memory.
pub fn build_archive(items: &[&Item]) -> Result<(Vec<String>, Vec<u8>)> {
    let names = unique_entry_names(items.iter().map(|item| Some(item.source().name())));
    let entries: Vec<(String, &[u8])> = names
        .iter()
        .cloned()
        .zip(items.iter().map(|item| item.source().bytes()))
        .collect();
    let cursor = write_archive(Cursor::new(Vec::new()), &entries)?;
    Ok((names, cursor.into_inner()))
}

/// Result of a successful export.
#[derive(Clone, Debug)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub entries: Vec<String>,
    pub bytes: u64,
}

/// Write `people_threshold.zip` into `out_dir` with the originals of `items`.
///
/// The archive appears atomically; on failure nothing is left behind.
pub fn export_archive(items: &[&Item], out_dir: &Path) -> Result<ExportSummary> {
    let (entries, bytes) = build_archive(items)?;
    let path = out_dir.join(EXPORT_ARCHIVE_NAME);

    let archive_failed = |e: std::io::Error| TriageError::ArchiveFailed(format!("{}: {e}", path.display()));
    let mut tmp = tempfile::NamedTempFile::new_in(out_dir).map_err(archive_failed)?;
    tmp.write_all(&bytes).map_err(archive_failed)?;
    tmp.persist(&path).map_err(|e| archive_failed(e.error))?;

    info!(path = %path.display(), entries = entries.len(), "Archive written");
    Ok(ExportSummary {
        path,
        entries,
        bytes: bytes.len() as u64,
    })
}
