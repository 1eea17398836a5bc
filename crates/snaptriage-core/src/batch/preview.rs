use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use tracing::debug;

use crate::error::{Result, TriageError};
use crate::payload::ImagePayload;

/// Scratch directory that hands out displayable preview files.
///
/// Every [`PreviewHandle`] owns one file in the directory and deletes it when
/// dropped, so a handle is released exactly once on every path.
pub struct PreviewStore {
    dir: Arc<TempDir>,
    live: Arc<AtomicUsize>,
    next_id: AtomicU64,
}

impl PreviewStore {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("snaptriage-previews-")
            .tempdir()?;
        Ok(Self {
            dir: Arc::new(dir),
            live: Arc::new(AtomicUsize::new(0)),
            next_id: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Number of handles created by this store that are still alive.
    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Write `payload` to a fresh preview file.
    pub fn create(&self, payload: &ImagePayload) -> Result<PreviewHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let stem = Path::new(payload.name())
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("preview");
        let path = self.dir.path().join(format!("{id:04}-{stem}"));
        std::fs::write(&path, payload.bytes())
            .map_err(|e| TriageError::Preview(format!("{}: {e}", path.display())))?;

        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(PreviewHandle {
            path,
            media_type: payload.media_type().to_string(),
            live: Arc::clone(&self.live),
            _dir: Arc::clone(&self.dir),
        })
    }
}

/// A live reference to preview bytes on disk. Dropping it revokes the preview.
pub struct PreviewHandle {
    path: PathBuf,
    media_type: String,
    live: Arc<AtomicUsize>,
    _dir: Arc<TempDir>,
}

impl PreviewHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }
}

impl std::fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("path", &self.path)
            .field("media_type", &self.media_type)
            .finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %e, "Preview file already gone");
        }
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
