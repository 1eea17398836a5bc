use tracing::debug;

use crate::error::{Result, TriageError};
use crate::payload::ImagePayload;

/// A validated user selection: image payloads only, capped at the limit.
#[derive(Clone, Debug)]
pub struct Selection {
    images: Vec<ImagePayload>,
    offered_images: usize,
    skipped_non_images: usize,
    max_files: usize,
}

impl Selection {
    /// Keep image-typed payloads in order, truncated to `max_files`.
    ///
    /// Fails with [`TriageError::UnsupportedInput`] when nothing image-typed
    /// remains.
    pub fn new(payloads: Vec<ImagePayload>, max_files: usize) -> Result<Self> {
        let max_files = max_files.max(1);
        let total = payloads.len();
        let mut images: Vec<ImagePayload> = payloads.into_iter().filter(|p| p.is_image()).collect();
        let offered_images = images.len();
        let skipped_non_images = total - offered_images;

        if images.is_empty() {
            debug!(total, "Selection contains no images");
            return Err(TriageError::UnsupportedInput);
        }
        images.truncate(max_files);

        Ok(Self {
            images,
            offered_images,
            skipped_non_images,
            max_files,
        })
    }

    pub fn images(&self) -> &[ImagePayload] {
        &self.images
    }

    pub fn into_images(self) -> Vec<ImagePayload> {
        self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.offered_images > self.images.len()
    }

    pub fn skipped_non_images(&self) -> usize {
        self.skipped_non_images
    }

    /// Status line describing what will be processed.
    pub fn status_message(&self) -> String {
        let mut message = if self.is_truncated() {
            format!(
                "Only the first {} of {} images will be processed.",
                self.max_files, self.offered_images
            )
        } else if self.images.len() == 1 {
            format!("Selected: {}", self.images[0].name())
        } else {
            format!("Selected {} images.", self.images.len())
        };
        if self.skipped_non_images > 0 {
            message.push_str(&format!(
                " Skipped {} non-image file(s).",
                self.skipped_non_images
            ));
        }
        message
    }
}
