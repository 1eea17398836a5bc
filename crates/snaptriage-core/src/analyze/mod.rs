mod client;
pub mod health;
mod types;

pub use client::{Analyzer, HttpAnalyzer};
pub use health::{ping, ping_reported, HealthStatus};
pub use types::{sorted_by_score, AnalysisResponse, ScoreEntry};
