use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use snaptriage_core::batch::{Batch, BatchObserver, ItemStatus, Progress};
use tracing::debug;

/// Renders batch transitions as a terminal progress bar.
pub struct TerminalObserver {
    bar: ProgressBar,
}

impl TerminalObserver {
    pub fn new() -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:32} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }

    /// Clear the bar if the batch ended without reaching `batch_finished`.
    pub fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl BatchObserver for TerminalObserver {
    fn batch_started(&self, batch: &Batch) {
        self.bar.set_length(batch.len() as u64);
        self.bar.set_position(0);
        self.bar.println(batch.status_message());
        self.bar.set_message("Preparing previews");
    }

    fn item_changed(&self, batch: &Batch, index: usize) {
        let Some(item) = batch.item(index) else {
            return;
        };
        debug!(index, name = item.name(), status = %item.status_text(), "Item changed");
        match item.status() {
            ItemStatus::PreviewReady => self.bar.set_message(format!("Prepared {}", item.name())),
            ItemStatus::Analyzing => self.bar.set_message(format!("Analyzing {}", item.name())),
            ItemStatus::Done | ItemStatus::Queued => {}
        }
    }

    fn progress(&self, progress: Progress) {
        self.bar.set_position(progress.completed as u64);
    }

    fn batch_finished(&self, batch: &Batch) {
        self.bar.finish_with_message(batch.progress().label());
    }

    fn selection_rejected(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}
