use serde::{Deserialize, Serialize};

/// One classifier output: a label and its confidence in [0, 1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub label: String,
    pub score: f32,
}

impl ScoreEntry {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Score formatted as a percentage with one decimal, e.g. `"90.0%"`.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.score * 100.0)
    }
}

/// Parsed JSON body returned by the analyze endpoint.
///
/// The body is kept as-is; [`AnalysisResponse::scores`] extracts the score
/// list and treats anything malformed as "no scores".
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisResponse {
    pub body: serde_json::Value,
}

impl AnalysisResponse {
    pub fn new(body: serde_json::Value) -> Self {
        Self { body }
    }

    pub fn from_scores(scores: Vec<ScoreEntry>) -> Self {
        Self::new(serde_json::json!({ "scores": scores }))
    }

    pub fn scores(&self) -> Vec<ScoreEntry> {
        self.body
            .get("scores")
            .and_then(|v| serde_json::from_value::<Vec<ScoreEntry>>(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// Scores ordered from highest to lowest, for display.
pub fn sorted_by_score(scores: &[ScoreEntry]) -> Vec<ScoreEntry> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted
}
