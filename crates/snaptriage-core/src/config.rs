use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_API_URL, DEFAULT_MAX_FILES, DEFAULT_RECOMMENDED_THRESHOLD};
use crate::error::Result;
use crate::reduce::ReduceParams;

/// Settings recognized at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Base URL of the classification service.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Maximum number of images per selection.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Suggested "people" threshold in percent (0..=100).
    #[serde(default = "default_recommended_threshold")]
    pub recommended_threshold: u8,
    #[serde(default)]
    pub reduce: ReduceParams,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

fn default_recommended_threshold() -> u8 {
    DEFAULT_RECOMMENDED_THRESHOLD
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            max_files: DEFAULT_MAX_FILES,
            recommended_threshold: DEFAULT_RECOMMENDED_THRESHOLD,
            reduce: ReduceParams::default(),
        }
    }
}

impl TriageConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `API_URL`, `LIMIT` and `RECOMMENDED_THRESHOLD` (or their `VITE_`
    /// prefixed forms) from `lookup`. Unparseable values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(*k));

        if let Some(url) = first(&["VITE_API_URL", "API_URL"]).filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(limit) = first(&["VITE_LIMIT", "LIMIT"]).and_then(|v| parse_limit(&v)) {
            self.max_files = limit;
        }
        if let Some(threshold) = first(&["VITE_RECOMMENDED_THRESHOLD", "RECOMMENDED_THRESHOLD"])
            .and_then(|v| parse_threshold(&v))
        {
            self.recommended_threshold = threshold;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.reduce.validate()
    }
}

/// The leading base-10 integer of `raw`, ignoring whatever follows it.
///
/// `"3.7"` reads as 3 and `"68%"` as 68; no leading digits means `None`.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut seen = false;
    let magnitude = digits.fold(0i64, |acc, d| {
        seen = true;
        acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
    });
    seen.then_some(if negative { -magnitude } else { magnitude })
}

/// A positive integer prefix, or `None`.
pub fn parse_limit(raw: &str) -> Option<usize> {
    leading_integer(raw).filter(|n| *n > 0).map(|n| n as usize)
}

/// An integer prefix clamped to 0..=100, or `None` when there is none.
pub fn parse_threshold(raw: &str) -> Option<u8> {
    leading_integer(raw).map(|n| n.clamp(0, 100) as u8)
}
