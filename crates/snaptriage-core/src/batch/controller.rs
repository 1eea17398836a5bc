use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::analyze::Analyzer;
use crate::config::TriageConfig;
use crate::consts::DEFAULT_MAX_FILES;
use crate::error::Result;
use crate::payload::ImagePayload;
use crate::reduce::{BudgetReducer, Reducer};

use super::item::{ItemStatus, PreviewSource};
use super::observer::{BatchObserver, NoOpObserver};
use super::preview::PreviewStore;
use super::selection::Selection;
use super::state::{Batch, Progress};

/// Shared handle to a batch driven by [`TriageController::run`].
pub type BatchRef = Arc<Mutex<Batch>>;

/// How a call to [`TriageController::run`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    Completed(Progress),
    /// A newer selection took over; the remaining work was dropped.
    Superseded { generation: u64 },
}

/// Owns the active batch and drives its two-phase pipeline.
///
/// Items are processed strictly one at a time: every preview is prepared
/// before the first analysis starts. The batch lock is never held across an
/// await on reduce or analyze work.
pub struct TriageController {
    analyzer: Arc<dyn Analyzer>,
    reducer: Arc<dyn Reducer>,
    observer: Arc<dyn BatchObserver>,
    previews: PreviewStore,
    max_files: usize,
    generation: AtomicU64,
    active: Mutex<Option<BatchRef>>,
}

impl TriageController {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Result<Self> {
        Ok(Self {
            analyzer,
            reducer: Arc::new(BudgetReducer::default()),
            observer: Arc::new(NoOpObserver),
            previews: PreviewStore::new()?,
            max_files: DEFAULT_MAX_FILES,
            generation: AtomicU64::new(0),
            active: Mutex::new(None),
        })
    }

    /// Controller using the limit and reduce settings of `config`.
    pub fn from_config(config: &TriageConfig, analyzer: Arc<dyn Analyzer>) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(analyzer)?
            .with_max_files(config.max_files)
            .with_reducer(Arc::new(BudgetReducer::new(config.reduce.clone()))))
    }

    pub fn with_reducer(mut self, reducer: Arc<dyn Reducer>) -> Self {
        self.reducer = reducer;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn BatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files.max(1);
        self
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    /// Generation of the most recent selection (0 before the first one).
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn active_batch(&self) -> Option<BatchRef> {
        self.active.lock().await.clone()
    }

    /// Replace the active batch with a new one built from `payloads`.
    ///
    /// The previous batch is revoked (its previews released) before anything
    /// else happens, even when the new selection turns out to be invalid.
    pub async fn select(&self, payloads: Vec<ImagePayload>) -> Result<BatchRef> {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            previous.lock().await.revoke();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let selection = match Selection::new(payloads, self.max_files) {
            Ok(selection) => selection,
            Err(e) => {
                self.observer.selection_rejected(&e.to_string());
                return Err(e);
            }
        };
        if selection.is_truncated() {
            warn!(max = self.max_files, "Selection truncated");
        }

        let batch = Batch::new(generation, selection);
        info!(
            generation,
            items = batch.len(),
            skipped = batch.skipped_non_images(),
            "Batch selected"
        );
        self.observer.batch_started(&batch);

        let batch = Arc::new(Mutex::new(batch));
        *active = Some(Arc::clone(&batch));
        Ok(batch)
    }

    /// [`select`](Self::select) followed by [`run`](Self::run).
    pub async fn process(&self, payloads: Vec<ImagePayload>) -> Result<(BatchRef, BatchOutcome)> {
        let batch = self.select(payloads).await?;
        let outcome = self.run(&batch).await;
        Ok((batch, outcome))
    }

    /// Prepare every preview, then analyze every item, in selection order.
    ///
    /// Failures are recorded on the items; nothing is propagated. Stops early
    /// with [`BatchOutcome::Superseded`] once a newer selection exists.
    pub async fn run(&self, batch: &BatchRef) -> BatchOutcome {
        let (generation, total) = {
            let guard = batch.lock().await;
            (guard.generation(), guard.len())
        };

        info!(generation, total, "Preparing previews");
        for index in 0..total {
            if let Err(outcome) = self.prepare_item(batch, generation, index).await {
                return outcome;
            }
        }

        info!(generation, total, "Analyzing");
        for index in 0..total {
            if let Err(outcome) = self.analyze_item(batch, generation, index).await {
                return outcome;
            }
        }

        let guard = batch.lock().await;
        let progress = guard.progress();
        info!(generation, completed = progress.completed, "Batch complete");
        self.observer.batch_finished(&guard);
        BatchOutcome::Completed(progress)
    }

    async fn prepare_item(
        &self,
        batch: &BatchRef,
        generation: u64,
        index: usize,
    ) -> std::result::Result<(), BatchOutcome> {
        let source = {
            let guard = self.lock_current(batch, generation).await?;
            match guard.item(index) {
                Some(item) => item.source().clone(),
                None => return Ok(()),
            }
        };

        let reduced = self.reducer.reduce(source).await;

        let mut guard = self.lock_current(batch, generation).await?;
        let Some(item) = guard.item_mut(index) else {
            return Ok(());
        };
        let from = match reduced {
            Ok(reduced) => {
                item.set_reduced(reduced);
                PreviewSource::Reduced
            }
            Err(e) => {
                warn!(name = item.name(), error = %e, "Reduce failed, previewing original");
                PreviewSource::Original
            }
        };
        if let Err(e) = item.replace_preview(&self.previews, from) {
            warn!(name = item.name(), error = %e, "Could not create preview");
        }
        item.advance(ItemStatus::PreviewReady);
        self.observer.item_changed(&guard, index);
        Ok(())
    }

    async fn analyze_item(
        &self,
        batch: &BatchRef,
        generation: u64,
        index: usize,
    ) -> std::result::Result<(), BatchOutcome> {
        let (source, reduced) = {
            let mut guard = self.lock_current(batch, generation).await?;
            let Some(item) = guard.item_mut(index) else {
                return Ok(());
            };
            item.advance(ItemStatus::Analyzing);
            let inputs = (item.source().clone(), item.reduced().cloned());
            self.observer.item_changed(&guard, index);
            inputs
        };

        let result = self.analyzer.analyze(&source, reduced.as_ref()).await;

        let mut guard = self.lock_current(batch, generation).await?;
        let Some(item) = guard.item_mut(index) else {
            return Ok(());
        };
        match result {
            Ok(response) => item.finish_with_scores(response.scores()),
            Err(e) => {
                warn!(name = item.name(), error = %e, "Analysis failed");
                item.finish_with_error(e.to_string());
            }
        }
        guard.record_completion();
        self.observer.progress(guard.progress());
        self.observer.item_changed(&guard, index);
        Ok(())
    }

    /// Lock `batch`, or report it as superseded when it is no longer current.
    async fn lock_current<'a>(
        &self,
        batch: &'a BatchRef,
        generation: u64,
    ) -> std::result::Result<MutexGuard<'a, Batch>, BatchOutcome> {
        let guard = batch.lock().await;
        if guard.is_revoked() || self.current_generation() != generation {
            info!(generation, "Batch superseded, discarding remaining work");
            return Err(BatchOutcome::Superseded { generation });
        }
        Ok(guard)
    }
}
