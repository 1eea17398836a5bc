use super::state::{Batch, Progress};

/// Subscriber notified on every batch state transition.
///
/// Callbacks run between item steps while the batch is locked, so they see a
/// consistent snapshot and must not call back into the controller. All
/// methods default to no-ops.
pub trait BatchObserver: Send + Sync {
    /// A new selection replaced the previous batch.
    fn batch_started(&self, _batch: &Batch) {}

    /// The item at `index` changed status, preview, scores or error.
    fn item_changed(&self, _batch: &Batch, _index: usize) {}

    /// One more item finished analysis.
    fn progress(&self, _progress: Progress) {}

    /// Every item reached `Done`.
    fn batch_finished(&self, _batch: &Batch) {}

    /// A selection was rejected before any batch started.
    fn selection_rejected(&self, _message: &str) {}
}

/// Observer that ignores everything.
pub struct NoOpObserver;
impl BatchObserver for NoOpObserver {}
