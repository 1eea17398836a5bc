use crate::analyze::ScoreEntry;
use crate::batch::Item;
use crate::consts::PEOPLE_LABEL;

/// Convert a user threshold in percent to a fraction, clamping to 0..=100.
pub fn threshold_fraction(percent: f32) -> f32 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0) / 100.0
}

/// True when `scores` holds a `label` entry scoring at least `fraction`.
///
/// An empty score list never qualifies.
pub fn scores_meet_threshold(scores: &[ScoreEntry], fraction: f32, label: &str) -> bool {
    if scores.is_empty() {
        return false;
    }
    scores
        .iter()
        .find(|entry| entry.label == label)
        .is_some_and(|entry| entry.score >= fraction)
}

pub fn item_meets_threshold(item: &Item, fraction: f32, label: &str) -> bool {
    item.is_done() && scores_meet_threshold(item.scores(), fraction, label)
}

/// Completed items whose "people" score passes `percent`.
pub fn select_by_threshold<'a, I>(items: I, percent: f32) -> Vec<&'a Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    let fraction = threshold_fraction(percent);
    items
        .into_iter()
        .filter(|item| item_meets_threshold(item, fraction, PEOPLE_LABEL))
        .collect()
}
