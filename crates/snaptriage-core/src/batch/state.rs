use super::item::{Item, ItemId};
use super::selection::Selection;

/// Completed/total counter for one batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        Self {
            completed: completed.min(total),
            total,
        }
    }

    /// Rounded completion percentage; 0 for an empty batch.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }

    pub fn label(&self) -> &'static str {
        if self.total == 0 {
            "Waiting for images..."
        } else if self.is_complete() {
            "Analysis complete"
        } else {
            "Analyzing images..."
        }
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

/// The item set of one selection, tagged with its generation.
#[derive(Debug)]
pub struct Batch {
    generation: u64,
    items: Vec<Item>,
    completed: usize,
    completed_ids: Vec<ItemId>,
    skipped_non_images: usize,
    status_message: String,
    revoked: bool,
}

impl Batch {
    pub(crate) fn new(generation: u64, selection: Selection) -> Self {
        let status_message = selection.status_message();
        let skipped_non_images = selection.skipped_non_images();
        let items = selection
            .into_images()
            .into_iter()
            .enumerate()
            .map(|(index, payload)| Item::new(index, payload))
            .collect();
        Self {
            generation,
            items,
            completed: 0,
            completed_ids: Vec::new(),
            skipped_non_images,
            status_message,
            revoked: false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Non-image payloads dropped when the selection was made.
    pub fn skipped_non_images(&self) -> usize {
        self.skipped_non_images
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub(crate) fn item_mut(&mut self, index: usize) -> Option<&mut Item> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.completed, self.items.len())
    }

    /// Ids of items whose status is `Done`, in selection order.
    pub fn completed_ids(&self) -> &[ItemId] {
        &self.completed_ids
    }

    pub fn item_by_id(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Items named by the completed snapshot, in selection order.
    pub fn completed_snapshot(&self) -> Vec<&Item> {
        self.completed_ids
            .iter()
            .filter_map(|id| self.item_by_id(id))
            .collect()
    }

    pub fn completed_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.is_done())
    }

    /// True once a newer selection has replaced this batch.
    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Number of items currently holding a preview handle.
    pub fn live_previews(&self) -> usize {
        self.items.iter().filter(|item| item.preview().is_some()).count()
    }

    pub(crate) fn record_completion(&mut self) {
        self.completed = (self.completed + 1).min(self.items.len());
        self.completed_ids = self
            .completed_items()
            .map(|item| item.id().clone())
            .collect();
    }

    /// Release every preview; the batch accepts no further updates.
    pub(crate) fn revoke(&mut self) {
        for item in &mut self.items {
            item.release_preview();
        }
        self.revoked = true;
    }
}
