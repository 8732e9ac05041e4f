use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::data::insights::InsightSettings;

/// Env var naming a JSON config file.
pub const CONFIG_ENV: &str = "CARINSIGHT_CONFIG";
/// Env var overriding the data path.
pub const DATA_ENV: &str = "CARINSIGHT_DATA";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "carinsight.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Everything the dashboard needs before the first frame.
/// Every field has a default, so a config file may set any subset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// CSV loaded at startup.
    pub data_path: PathBuf,
    /// Bounds of the year slider, `[min, max]`.
    pub year_bounds: (i64, i64),
    /// Length of the top-rated model ranking.
    pub top_models: usize,
    /// Years covered by the rating trend chart, `[min, max]`.
    pub trend_years: (i64, i64),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/my_cars.csv"),
            year_bounds: (1970, 2025),
            top_models: 10,
            trend_years: (2000, 2025),
        }
    }
}

impl AppConfig {
    /// Resolve the configuration: defaults, then the JSON file, then
    /// `CARINSIGHT_DATA`, then the first positional CLI argument.
    pub fn load() -> Result<Self> {
        let file = env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()));

        let base = match &file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let config = base
            .with_data_override(env::var(DATA_ENV).ok())
            .with_data_override(env::args().nth(1));
        config.validate()?;

        log::info!(
            "Configuration resolved (file: {}): data_path={}",
            file.as_deref().map_or("none".into(), |p| p.display().to_string()),
            config.data_path.display()
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in config file {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the data path when `path` is a non-empty value.
    pub fn with_data_override(mut self, path: Option<String>) -> Self {
        if let Some(p) = path.filter(|p| !p.trim().is_empty()) {
            self.data_path = PathBuf::from(p);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = self.year_bounds;
        if lo > hi {
            bail!("year_bounds is inverted: [{lo}, {hi}]");
        }
        let (lo, hi) = self.trend_years;
        if lo > hi {
            bail!("trend_years is inverted: [{lo}, {hi}]");
        }
        if self.top_models == 0 {
            bail!("top_models must be at least 1");
        }
        Ok(())
    }

    pub fn insight_settings(&self) -> InsightSettings {
        InsightSettings {
            top_models: self.top_models,
            trend_years: self.trend_years.0..=self.trend_years.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = AppConfig::from_json_str(r#"{ "top_models": 5 }"#).unwrap();
        assert_eq!(cfg.top_models, 5);
        assert_eq!(cfg.data_path, PathBuf::from("data/my_cars.csv"));
        assert_eq!(cfg.year_bounds, (1970, 2025));
    }

    #[test]
    fn ranges_are_arrays() {
        let cfg = AppConfig::from_json_str(r#"{ "trend_years": [2010, 2020] }"#).unwrap();
        assert_eq!(cfg.insight_settings().trend_years, 2010..=2020);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(AppConfig::from_json_str(r#"{ "year_bounds": [2025, 1970] }"#).is_err());
        assert!(AppConfig::from_json_str(r#"{ "top_models": 0 }"#).is_err());
        assert!(AppConfig::from_json_str(r#"{ "colour": "blue" }"#).is_err());
        assert!(AppConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn data_override_ignores_blank_values() {
        let cfg = AppConfig::default()
            .with_data_override(Some("other.csv".into()))
            .with_data_override(Some("  ".into()))
            .with_data_override(None);
        assert_eq!(cfg.data_path, PathBuf::from("other.csv"));
    }
}
