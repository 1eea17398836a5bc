mod archive;
mod filter;

pub use archive::{build_archive, export_archive, unique_entry_names, write_archive, ExportSummary};
pub use filter::{item_meets_threshold, scores_meet_threshold, select_by_threshold, threshold_fraction};
