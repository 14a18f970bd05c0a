//! In-memory storage implementation.

use super::{BoxFuture, PersistenceGateway, StorageError, StorageResult};
use crate::plan::FloorPlans;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    tenants: RwLock<HashMap<String, FloorPlans>>,
    offline: AtomicBool,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable backend: while set, every call fails.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> StorageResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StorageError::Io("Storage backend is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl PersistenceGateway for MemoryStorage {
    fn load_floor_plans(&self, tenant: &str) -> BoxFuture<'_, StorageResult<Option<FloorPlans>>> {
        let tenant = tenant.to_string();
        Box::pin(async move {
            self.check_online()?;
            let tenants = self
                .tenants
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(tenants.get(&tenant).cloned())
        })
    }

    fn save_floor_plans(&self, tenant: &str, plans: &FloorPlans) -> BoxFuture<'_, StorageResult<()>> {
        let tenant = tenant.to_string();
        let plans = plans.clone();
        Box::pin(async move {
            self.check_online()?;
            let mut tenants = self
                .tenants
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            tenants.insert(tenant, plans);
            Ok(())
        })
    }
}
