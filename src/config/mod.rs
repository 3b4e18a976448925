use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::core::utils::{config_file, data_dir, ensure_dir};
use crate::errors::{ExpenseError, ExpenseResult};
use crate::ledger::{ProjectionSettings, MAX_LOOKAHEAD_MONTHS, MIN_LOOKAHEAD_MONTHS};

const TMP_SUFFIX: &str = "tmp";

/// Tunables for projection and the location of persisted records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Floor of the recurring lookahead; also the number of months always shown
    /// from the current month once any recurring template exists.
    pub min_lookahead_months: u32,
    pub max_lookahead_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_lookahead_months: MIN_LOOKAHEAD_MONTHS,
            max_lookahead_months: MAX_LOOKAHEAD_MONTHS,
            data_dir: None,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> ExpenseResult<()> {
        if self.min_lookahead_months == 0 {
            return Err(ExpenseError::Config(
                "min_lookahead_months must be at least 1".into(),
            ));
        }
        if self.max_lookahead_months < self.min_lookahead_months {
            return Err(ExpenseError::Config(format!(
                "max_lookahead_months ({}) is below min_lookahead_months ({})",
                self.max_lookahead_months, self.min_lookahead_months
            )));
        }
        Ok(())
    }

    pub fn projection(&self) -> ProjectionSettings {
        ProjectionSettings {
            min_lookahead_months: self.min_lookahead_months,
            max_lookahead_months: self.max_lookahead_months,
        }
    }

    /// Directory for the file store: the configured override or the default.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(data_dir)
    }
}

/// Loads and saves [`TrackerConfig`] as a JSON file.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_path(config_file())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the stored configuration, or defaults when no file exists yet.
    pub fn load(&self) -> ExpenseResult<TrackerConfig> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(TrackerConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: TrackerConfig = serde_json::from_str(&data)?;
        config.validate()?;
        info!(path = %self.path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn save(&self, config: &TrackerConfig) -> ExpenseResult<()> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> ExpenseResult<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.json"));
        let config = manager.load().unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.projection(), ProjectionSettings::default());
    }

    #[test]
    fn saved_config_round_trips() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.json"));
        let config = TrackerConfig {
            min_lookahead_months: 6,
            max_lookahead_months: 24,
            data_dir: Some(dir.path().join("records")),
        };
        manager.save(&config).unwrap();
        assert!(manager.path().exists());
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "min_lookahead_months": 4 }"#).unwrap();
        let config = ConfigManager::with_path(path).load().unwrap();
        assert_eq!(config.min_lookahead_months, 4);
        assert_eq!(config.max_lookahead_months, MAX_LOOKAHEAD_MONTHS);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let config = TrackerConfig {
            min_lookahead_months: 10,
            max_lookahead_months: 3,
            data_dir: None,
        };
        assert!(matches!(config.validate(), Err(ExpenseError::Config(_))));
        let zero = TrackerConfig {
            min_lookahead_months: 0,
            ..TrackerConfig::default()
        };
        assert!(zero.validate().is_err());
    }
}
