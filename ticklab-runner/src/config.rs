//! TOML sweep configuration.
//!
//! A sweep can be described in one file instead of a pile of CLI flags:
//!
//! ```toml
//! data = "ticks.csv"
//! workers = 0          # 0 = auto-detect
//!
//! [base]
//! short_window = 80
//! waiting_period = 80
//! hs_exit_change_threshold = 0.2
//! ma_turn_threshold = 0.9
//!
//! [grid]
//! pct_range = 10
//! pct_step = 1
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ticklab_core::domain::ParameterSet;

use crate::grid::GridConfig;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything a sweep needs, loadable from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// CSV tick file to load.
    pub data: PathBuf,

    /// Worker threads; 0 auto-detects hardware parallelism.
    #[serde(default)]
    pub workers: usize,

    /// The parameter set at the center of the grid.
    pub base: ParameterSet,

    /// Fuzz range around the base.
    #[serde(default)]
    pub grid: GridConfig,
}

impl SweepConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
data = "ticks.csv"
workers = 4

[base]
short_window = 80
waiting_period = 80
hs_exit_change_threshold = 0.2
ma_turn_threshold = 0.9

[grid]
pct_range = 5
pct_step = 1
"#;

    #[test]
    fn parses_full_config() {
        let config = SweepConfig::from_toml(FULL).unwrap();
        assert_eq!(config.data, PathBuf::from("ticks.csv"));
        assert_eq!(config.workers, 4);
        assert_eq!(config.base.short_window, 80);
        assert_eq!(config.grid.pct_range, 5);
    }

    #[test]
    fn grid_and_workers_default_when_omitted() {
        let config = SweepConfig::from_toml(
            r#"
data = "ticks.csv"

[base]
short_window = 80
waiting_period = 80
hs_exit_change_threshold = 0.2
ma_turn_threshold = 0.9
"#,
        )
        .unwrap();
        assert_eq!(config.workers, 0);
        assert_eq!(config.grid, GridConfig::default());
    }

    #[test]
    fn missing_base_is_an_error() {
        let result = SweepConfig::from_toml("data = \"ticks.csv\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn from_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();
        let config = SweepConfig::from_file(file.path()).unwrap();
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = SweepConfig::from_file(Path::new("/nonexistent/sweep.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
