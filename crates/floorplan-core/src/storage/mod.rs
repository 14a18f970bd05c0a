//! Persistence of floor plans, keyed by tenant.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::plan::FloorPlans;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Floor plans not found for tenant: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Backend that durably stores every floor of a tenant as one document.
///
/// Saves are full replacements, so writing the same plans twice is
/// harmless.
pub trait PersistenceGateway: Send + Sync {
    /// Load all floors for a tenant. `Ok(None)` means nothing was ever saved.
    fn load_floor_plans(&self, tenant: &str) -> BoxFuture<'_, StorageResult<Option<FloorPlans>>>;

    /// Replace all floors for a tenant.
    fn save_floor_plans(&self, tenant: &str, plans: &FloorPlans) -> BoxFuture<'_, StorageResult<()>>;
}

/// Create the file backend in its default location.
pub fn create_default_storage() -> StorageResult<std::sync::Arc<FileStorage>> {
    Ok(std::sync::Arc::new(FileStorage::default_location()?))
}
