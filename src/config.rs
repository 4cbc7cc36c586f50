use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Optional override file, looked up in the working directory.
pub const CONFIG_FILE: &str = "attrition-dash.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Start-up settings. Every field has a default, so an override file may
/// list only the fields it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub dataset_path: PathBuf,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    /// Height of each chart in points.
    pub graph_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("./datasets/WA_Fn-UseC_-HR-Employee-Attrition.csv"),
            window_size: [1280.0, 900.0],
            min_window_size: [640.0, 480.0],
            graph_height: 360.0,
        }
    }
}

impl DashboardConfig {
    /// Defaults, overridden by `path` when that file exists.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("no {} found, using built-in settings", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("settings read from {}", path.display());
        Ok(config)
    }
}
