mod controller;
mod item;
mod observer;
mod preview;
mod selection;
mod state;

pub use controller::{BatchOutcome, BatchRef, TriageController};
pub use item::{Item, ItemId, ItemStatus, PreviewSource};
pub use observer::{BatchObserver, NoOpObserver};
pub use preview::{PreviewHandle, PreviewStore};
pub use selection::Selection;
pub use state::{Batch, Progress};
