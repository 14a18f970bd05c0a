//! Host configuration.

use floorplan_core::storage::FileStorage;
use floorplan_core::{Asset, Call, StorageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop the host.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("Invalid script {path}: {message}")]
    Script { path: PathBuf, message: String },
    #[error("Invalid dashboard data {path}: {message}")]
    Dashboard { path: PathBuf, message: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Usage: {0}")]
    Usage(String),
}

/// Application configuration, read from JSON. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Tenant whose floor plans are edited.
    pub tenant: String,
    /// Directory holding one JSON document per tenant.
    pub storage_dir: Option<PathBuf>,
    /// Floor opened first.
    pub initial_floor: String,
    /// Map container size in pixels.
    pub container_width: f64,
    pub container_height: f64,
    /// Start in edit mode instead of view mode.
    pub edit_on_start: bool,
    /// Whether the host grants fullscreen requests.
    pub allow_fullscreen: bool,
    /// Optional JSON file with `assets` and `calls` from the dashboard.
    pub dashboard: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tenant: "default".to_string(),
            storage_dir: None,
            initial_floor: floorplan_core::plan::DEFAULT_FLOOR_ID.to_string(),
            container_width: 1280.0,
            container_height: 800.0,
            edit_on_start: true,
            allow_fullscreen: false,
            dashboard: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let config_error = |message: String| AppError::Config {
            path: path.to_path_buf(),
            message,
        };
        let json = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config: Self = serde_json::from_str(&json).map_err(|e| config_error(e.to_string()))?;
        if config.tenant.trim().is_empty() {
            return Err(config_error("tenant must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Configured storage directory, or the platform default.
    pub fn storage_dir(&self) -> Result<PathBuf, AppError> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(FileStorage::default_dir()?),
        }
    }

    pub fn container_size(&self) -> kurbo::Size {
        kurbo::Size::new(self.container_width, self.container_height)
    }
}

/// Read-only data supplied by the maintenance dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub calls: Vec<Call>,
}

impl Dashboard {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let dashboard_error = |message: String| AppError::Dashboard {
            path: path.to_path_buf(),
            message,
        };
        let json = fs::read_to_string(path).map_err(|e| dashboard_error(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| dashboard_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"tenant": "acme", "containerWidth": 640}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.tenant, "acme");
        assert_eq!(config.container_width, 640.0);
        assert_eq!(config.container_height, 800.0);
        assert_eq!(config.initial_floor, "ground");
        assert!(config.edit_on_start);
    }

    #[test]
    fn test_empty_tenant_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"tenant": "  "}"#).unwrap();

        assert!(matches!(AppConfig::load(&path), Err(AppError::Config { .. })));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempdir().unwrap();
        let result = AppConfig::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(AppError::Config { .. })));
    }

    #[test]
    fn test_explicit_storage_dir() {
        let config = AppConfig {
            storage_dir: Some(PathBuf::from("/tmp/plans")),
            ..AppConfig::default()
        };
        assert_eq!(config.storage_dir().unwrap(), PathBuf::from("/tmp/plans"));
    }

    #[test]
    fn test_dashboard_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(
            &path,
            r#"{"assets": [{"id": "a1", "name": "Boiler", "type": "HVAC"}],
                "calls": [{"id": "c1", "assetId": "a1", "status": "OPEN"}]}"#,
        )
        .unwrap();

        let dashboard = Dashboard::load(&path).unwrap();
        assert_eq!(dashboard.assets.len(), 1);
        assert!(dashboard.calls[0].is_active());
    }
}
