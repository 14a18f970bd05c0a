//! All floors of one tenant, with one floor open for editing.

use crate::containment;
use crate::plan::{DEFAULT_FLOOR_ID, FloorId, FloorPlan, FloorPlans};
use crate::storage::{BoxFuture, PersistenceGateway, StorageResult};
use crate::store::FloorPlanStore;
use std::sync::Arc;

/// Editing session over a tenant's floor plans.
///
/// The selected floor lives in a [`FloorPlanStore`] (with its own history);
/// the other floors are kept as plain documents. Nothing is written back to
/// storage until [`FloorSession::flush`] is driven.
pub struct FloorSession<S: PersistenceGateway> {
    storage: Arc<S>,
    tenant: String,
    floors: FloorPlans,
    persisted: FloorPlans,
    selected: FloorId,
    store: FloorPlanStore,
}

impl<S: PersistenceGateway + 'static> FloorSession<S> {
    /// Load the tenant's floors. A tenant with nothing saved starts with the
    /// default ground floor.
    pub async fn open(storage: Arc<S>, tenant: &str) -> StorageResult<Self> {
        let mut floors = match storage.load_floor_plans(tenant).await? {
            Some(floors) if !floors.is_empty() => floors,
            _ => {
                log::info!("No floor plans stored for {}, starting empty", tenant);
                FloorPlans::from([(DEFAULT_FLOOR_ID.to_string(), FloorPlan::new())])
            }
        };
        for (id, plan) in &mut floors {
            if containment::normalize(plan) {
                log::warn!("Floor {} had out-of-range geometry and was normalized", id);
            }
        }

        let selected = if floors.contains_key(DEFAULT_FLOOR_ID) {
            DEFAULT_FLOOR_ID.to_string()
        } else {
            floors.keys().next().cloned().unwrap_or_else(|| DEFAULT_FLOOR_ID.to_string())
        };
        let store = FloorPlanStore::new(floors.get(&selected).cloned().unwrap_or_default());
        log::info!("Opened {} floor(s) for tenant {}", floors.len(), tenant);

        Ok(Self {
            storage,
            tenant: tenant.to_string(),
            persisted: floors.clone(),
            floors,
            selected,
            store,
        })
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn selected_floor(&self) -> &str {
        &self.selected
    }

    /// Known floor ids, in order.
    pub fn floor_ids(&self) -> impl Iterator<Item = &FloorId> {
        self.floors.keys()
    }

    pub fn store(&self) -> &FloorPlanStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FloorPlanStore {
        &mut self.store
    }

    /// Switch editing to another floor. The current floor's document is kept
    /// in the session; an unknown floor starts as the default document and is
    /// only kept once it has been edited. History restarts on every switch.
    /// Returns false if already selected.
    pub fn select_floor(&mut self, floor: &str) -> bool {
        if floor == self.selected {
            return false;
        }
        let current = self.store.plan().clone();
        if self.is_kept(&self.selected, &current) {
            self.floors.insert(self.selected.clone(), current);
        } else {
            self.floors.remove(&self.selected);
        }
        let plan = self.floors.get(floor).cloned().unwrap_or_default();
        self.selected = floor.to_string();
        self.store.replace(plan);
        log::debug!("Selected floor {}", floor);
        true
    }

    /// Every floor, with the selected one as currently edited. A floor that
    /// was never stored and still holds the default document is left out.
    pub fn plans(&self) -> FloorPlans {
        let mut plans = self.floors.clone();
        let current = self.store.plan();
        if self.is_kept(&self.selected, current) {
            plans.insert(self.selected.clone(), current.clone());
        }
        plans
    }

    fn is_kept(&self, floor: &str, plan: &FloorPlan) -> bool {
        self.persisted.contains_key(floor) || *plan != FloorPlan::new()
    }

    /// Whether anything differs from the last load or successful save.
    pub fn is_dirty(&self) -> bool {
        self.plans() != self.persisted
    }

    /// Drop every unsaved change on every floor. If the selected floor was
    /// never saved, selection falls back to a stored one.
    pub fn discard(&mut self) {
        self.floors = self.persisted.clone();
        if !self.floors.contains_key(&self.selected) {
            if let Some(id) = self.floors.keys().next() {
                self.selected = id.clone();
            }
        }
        let plan = self.floors.get(&self.selected).cloned().unwrap_or_default();
        self.store.replace(plan);
        log::debug!("Discarded unsaved changes for tenant {}", self.tenant);
    }

    /// Write a snapshot of all floors. The returned future owns everything it
    /// needs, so editing may continue while it runs; on success it yields the
    /// plans that were written, to be passed to [`FloorSession::mark_persisted`].
    pub fn flush(&self) -> BoxFuture<'static, StorageResult<FloorPlans>> {
        let storage = Arc::clone(&self.storage);
        let tenant = self.tenant.clone();
        let plans = self.plans();
        Box::pin(async move {
            storage.save_floor_plans(&tenant, &plans).await?;
            Ok(plans)
        })
    }

    /// Record what storage now holds.
    pub fn mark_persisted(&mut self, plans: FloorPlans) {
        self.persisted = plans;
    }
}
