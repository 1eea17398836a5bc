pub mod config;
pub mod health;
pub mod reduce;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use snaptriage_core::config::TriageConfig;

/// Defaults, then the TOML file if given, then the environment.
pub fn load_config(path: Option<&Path>) -> Result<TriageConfig> {
    let config = match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&contents).context("Invalid triage config")?
        }
        None => TriageConfig::default(),
    };
    Ok(config.with_overrides(|key| std::env::var(key).ok()))
}
