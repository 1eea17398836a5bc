use std::fmt;

use crate::analyze::ScoreEntry;
use crate::error::Result;
use crate::payload::ImagePayload;

use super::preview::{PreviewHandle, PreviewStore};

/// Processing state of one item. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemStatus {
    Queued,
    PreviewReady,
    Analyzing,
    Done,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued | Self::PreviewReady => write!(f, "Queued"),
            Self::Analyzing => write!(f, "Analyzing..."),
            Self::Done => write!(f, "Analysis complete"),
        }
    }
}

/// Which payload a preview was rendered from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewSource {
    Reduced,
    Original,
}

/// Stable identifier derived from name, position and modification time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemId(String);

impl ItemId {
    pub fn derive(payload: &ImagePayload, index: usize) -> Self {
        Self(format!(
            "{}-{}-{}",
            payload.name(),
            index,
            payload.modified_millis()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selected image and everything learned about it so far.
#[derive(Debug)]
pub struct Item {
    id: ItemId,
    source: ImagePayload,
    reduced: Option<ImagePayload>,
    preview: Option<PreviewHandle>,
    preview_source: Option<PreviewSource>,
    status: ItemStatus,
    scores: Vec<ScoreEntry>,
    error: Option<String>,
}

impl Item {
    pub fn new(index: usize, source: ImagePayload) -> Self {
        Self {
            id: ItemId::derive(&source, index),
            source,
            reduced: None,
            preview: None,
            preview_source: None,
            status: ItemStatus::Queued,
            scores: Vec::new(),
            error: None,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn source(&self) -> &ImagePayload {
        &self.source
    }

    pub fn reduced(&self) -> Option<&ImagePayload> {
        self.reduced.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub fn preview_source(&self) -> Option<PreviewSource> {
        self.preview_source
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn scores(&self) -> &[ScoreEntry] {
        &self.scores
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_done(&self) -> bool {
        self.status == ItemStatus::Done
    }

    /// Score of the first entry carrying `label`.
    pub fn score_for(&self, label: &str) -> Option<f32> {
        self.scores.iter().find(|e| e.label == label).map(|e| e.score)
    }

    /// Line shown under the preview: the error if any, otherwise the status.
    pub fn status_text(&self) -> String {
        match self.error.as_deref() {
            Some(message) if !message.is_empty() => format!("Error: {message}"),
            _ => self.status.to_string(),
        }
    }

    /// Move to `next` if it is ahead of the current status.
    pub(crate) fn advance(&mut self, next: ItemStatus) -> bool {
        if next <= self.status {
            return false;
        }
        self.status = next;
        true
    }

    /// Store the reduced payload. Only the first one is kept.
    pub(crate) fn set_reduced(&mut self, reduced: ImagePayload) -> bool {
        if self.reduced.is_some() {
            return false;
        }
        self.reduced = Some(reduced);
        true
    }

    /// Release the current preview, then create one from `from`.
    ///
    /// Falls back to the original when no reduced payload exists.
    pub(crate) fn replace_preview(&mut self, store: &PreviewStore, from: PreviewSource) -> Result<()> {
        self.release_preview();
        let (payload, source) = match (from, self.reduced.as_ref()) {
            (PreviewSource::Reduced, Some(reduced)) => (reduced, PreviewSource::Reduced),
            _ => (&self.source, PreviewSource::Original),
        };
        self.preview = Some(store.create(payload)?);
        self.preview_source = Some(source);
        Ok(())
    }

    pub(crate) fn release_preview(&mut self) {
        self.preview = None;
        self.preview_source = None;
    }

    /// Record a successful analysis. Empty score lists are not stored.
    pub(crate) fn finish_with_scores(&mut self, scores: Vec<ScoreEntry>) {
        if !scores.is_empty() {
            self.scores = scores;
            self.error = None;
        }
        self.advance(ItemStatus::Done);
    }

    pub(crate) fn finish_with_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.scores.clear();
        self.advance(ItemStatus::Done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item::new(0, ImagePayload::new("a.png", "image/png", vec![1u8, 2, 3]))
    }

    #[test]
    fn test_status_never_moves_backwards() {
        let mut it = item();
        assert!(it.advance(ItemStatus::Analyzing));
        assert!(!it.advance(ItemStatus::PreviewReady));
        assert!(!it.advance(ItemStatus::Analyzing));
        assert_eq!(it.status(), ItemStatus::Analyzing);
        assert!(it.advance(ItemStatus::Done));
        assert!(!it.advance(ItemStatus::Queued));
    }

    #[test]
    fn test_reduced_is_set_once() {
        let mut it = item();
        assert!(it.set_reduced(ImagePayload::new("a.png", "image/jpeg", vec![9u8])));
        assert!(!it.set_reduced(ImagePayload::new("a.png", "image/jpeg", vec![8u8])));
        assert_eq!(it.reduced().map(|r| r.bytes().to_vec()), Some(vec![9u8]));
    }

    #[test]
    fn test_error_and_scores_exclusive() {
        let mut it = item();
        it.finish_with_error("boom");
        assert!(it.scores().is_empty());
        assert_eq!(it.status_text(), "Error: boom");
        assert!(it.is_done());
    }

    #[test]
    fn test_empty_scores_leave_item_without_scores() {
        let mut it = item();
        it.finish_with_scores(Vec::new());
        assert!(it.is_done());
        assert!(it.scores().is_empty());
        assert!(it.error().is_none());
        assert_eq!(it.status_text(), "Analysis complete");
    }

    #[test]
    fn test_preview_replaced_not_leaked() {
        let store = PreviewStore::new().unwrap();
        let mut it = item();
        it.replace_preview(&store, PreviewSource::Reduced).unwrap();
        assert_eq!(it.preview_source(), Some(PreviewSource::Original));
        it.set_reduced(ImagePayload::new("a.png", "image/jpeg", vec![7u8]));
        it.replace_preview(&store, PreviewSource::Reduced).unwrap();
        assert_eq!(it.preview_source(), Some(PreviewSource::Reduced));
        assert_eq!(store.live_handles(), 1);
        it.release_preview();
        assert_eq!(store.live_handles(), 0);
    }

    #[test]
    fn test_id_uses_name_index_and_mtime() {
        let t = std::time::UNIX_EPOCH + std::time::Duration::from_millis(1234);
        let payload = ImagePayload::new("cat.jpg", "image/jpeg", vec![0u8]).with_modified(t);
        assert_eq!(ItemId::derive(&payload, 3).as_str(), "cat.jpg-3-1234");
    }
}
