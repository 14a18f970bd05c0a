//! File-based storage: one JSON document per tenant.

use super::{BoxFuture, PersistenceGateway, StorageError, StorageResult};
use crate::plan::FloorPlans;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each tenant's floor plans as `<tenant>.json` in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory
    /// if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Directory used when none is configured.
    ///
    /// On Linux: `~/.local/share/floorplan/plans/`
    /// On Windows: `%LOCALAPPDATA%\floorplan\plans\`
    pub fn default_dir() -> StorageResult<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Ok(base.join("floorplan").join("plans"))
    }

    /// Create file storage in the default location.
    pub fn default_location() -> StorageResult<Self> {
        Self::new(Self::default_dir()?)
    }

    fn tenant_path(&self, tenant: &str) -> PathBuf {
        let safe: String = tenant
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl PersistenceGateway for FileStorage {
    fn load_floor_plans(&self, tenant: &str) -> BoxFuture<'_, StorageResult<Option<FloorPlans>>> {
        let path = self.tenant_path(tenant);
        Box::pin(async move {
            if !path.exists() {
                return Ok(None);
            }
            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let plans = serde_json::from_str(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            log::info!("Loaded floor plans from {}", path.display());
            Ok(Some(plans))
        })
    }

    fn save_floor_plans(&self, tenant: &str, plans: &FloorPlans) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.tenant_path(tenant);
        let json = match serde_json::to_string_pretty(plans) {
            Ok(json) => json,
            Err(e) => {
                return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) });
            }
        };

        Box::pin(async move {
            // Write then rename so a crash never leaves a half-written document.
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", tmp.display(), e))
            })?;
            fs::rename(&tmp, &path).map_err(|e| {
                StorageError::Io(format!("Failed to replace {}: {}", path.display(), e))
            })?;
            log::info!("Saved floor plans to {}", path.display());
            Ok(())
        })
    }
}
