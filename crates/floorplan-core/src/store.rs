//! Floor-plan document store.
//!
//! The store owns the working copy of one floor's plan together with its
//! undo history. Every operation that changes the document commits exactly
//! one snapshot; operations that change nothing commit nothing.
//!
//! Drags write through the `*_live` methods, which update the working copy
//! without touching history, and finish with [`FloorPlanStore::commit_if_changed`].

use crate::containment;
use crate::geometry::{ZoneRect, clamp_position, clamp_rect};
use crate::history::History;
use crate::plan::{AssetPosition, FloorPlan, ZONE_PALETTE, Zone, ZoneId, ZoneType};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Rectangle given to newly created zones.
pub const DEFAULT_ZONE_RECT: ZoneRect = ZoneRect::new(10.0, 10.0, 20.0, 15.0);

/// Rejected edits. The document is left untouched when one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Please enter a zone name")]
    EmptyZoneName,
    #[error("Zone not found: {0}")]
    ZoneNotFound(ZoneId),
}

/// Callback invoked with the document after it changes.
pub type Observer = Box<dyn FnMut(&FloorPlan)>;

/// Owns one floor's document and its history.
pub struct FloorPlanStore {
    /// Working copy. Equal to `history.current()` except during a drag.
    plan: FloorPlan,
    history: History,
    /// Index into [`ZONE_PALETTE`] for the next zone.
    next_color: usize,
    observers: Vec<Observer>,
}

impl fmt::Debug for FloorPlanStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloorPlanStore")
            .field("plan", &self.plan)
            .field("history_len", &self.history.len())
            .field("next_color", &self.next_color)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for FloorPlanStore {
    fn default() -> Self {
        Self::new(FloorPlan::default())
    }
}

impl FloorPlanStore {
    /// Create a store whose history starts at `plan`.
    pub fn new(plan: FloorPlan) -> Self {
        Self {
            next_color: plan.zones.len() % ZONE_PALETTE.len(),
            history: History::new(plan.clone()),
            plan,
            observers: Vec::new(),
        }
    }

    /// Current document.
    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Replace the document and restart history from it.
    pub fn replace(&mut self, plan: FloorPlan) {
        self.next_color = plan.zones.len() % ZONE_PALETTE.len();
        self.history.reset(plan.clone());
        self.plan = plan;
        self.notify();
    }

    /// Register a callback fired after each commit, undo, redo or revert.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&FloorPlan) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer(&self.plan);
        }
    }

    /// Whether the working copy differs from the last committed snapshot.
    pub fn has_uncommitted(&self) -> bool {
        self.plan != *self.history.current()
    }

    /// Commit the working copy if it differs from the current snapshot.
    pub fn commit_if_changed(&mut self) -> bool {
        if !self.has_uncommitted() {
            return false;
        }
        self.history.commit(self.plan.clone());
        self.notify();
        true
    }

    /// Throw away live changes made since the last commit.
    pub fn revert_uncommitted(&mut self) -> bool {
        if !self.has_uncommitted() {
            return false;
        }
        self.plan = self.history.current().clone();
        self.notify();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restore the previous snapshot.
    pub fn undo(&mut self) -> Option<&FloorPlan> {
        let snapshot = self.history.undo()?.clone();
        self.plan = snapshot;
        self.notify();
        Some(&self.plan)
    }

    /// Restore the next snapshot.
    pub fn redo(&mut self) -> Option<&FloorPlan> {
        let snapshot = self.history.redo()?.clone();
        self.plan = snapshot;
        self.notify();
        Some(&self.plan)
    }

    fn unique_zone_id(&self) -> ZoneId {
        loop {
            let id = format!("zone-{}", Uuid::new_v4().simple());
            if !self.plan.has_zone(&id) {
                return id;
            }
        }
    }

    /// Append a new zone with the default rectangle and the next palette colour.
    pub fn create_zone(
        &mut self,
        name: &str,
        zone_type: ZoneType,
        opacity_percent: f64,
    ) -> Result<Zone, EditError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::EmptyZoneName);
        }

        let color = ZONE_PALETTE[self.next_color % ZONE_PALETTE.len()];
        self.next_color = (self.next_color + 1) % ZONE_PALETTE.len();

        let mut zone = Zone {
            id: self.unique_zone_id(),
            name: name.to_string(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            color: color.to_string(),
            zone_type,
            opacity: opacity_from_percent(opacity_percent),
        };
        zone.set_rect(DEFAULT_ZONE_RECT);

        log::debug!("Creating zone {} ({})", zone.id, zone.name);
        self.plan.zones.push(zone.clone());
        self.commit_if_changed();
        Ok(zone)
    }

    /// Remove a zone and clear every asset reference to it.
    pub fn delete_zone(&mut self, id: &str) -> &FloorPlan {
        let before = self.plan.zones.len();
        self.plan.zones.retain(|zone| zone.id != id);
        if self.plan.zones.len() != before {
            for pos in self.plan.asset_positions.values_mut() {
                if pos.zone_id.as_deref() == Some(id) {
                    pos.zone_id = None;
                }
            }
            self.commit_if_changed();
        }
        &self.plan
    }

    /// Replace a zone's geometry (normalized). Unknown ids are ignored.
    pub fn update_zone_geometry(&mut self, id: &str, rect: ZoneRect) -> &FloorPlan {
        if self.set_zone_rect_live(id, rect) {
            self.commit_if_changed();
        }
        &self.plan
    }

    pub fn update_zone_type(&mut self, id: &str, zone_type: ZoneType) -> &FloorPlan {
        if let Some(zone) = self.plan.zone_mut(id) {
            zone.zone_type = zone_type;
            self.commit_if_changed();
        }
        &self.plan
    }

    pub fn rename_zone(&mut self, id: &str, name: &str) -> Result<&FloorPlan, EditError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::EmptyZoneName);
        }
        let zone = self
            .plan
            .zone_mut(id)
            .ok_or_else(|| EditError::ZoneNotFound(id.to_string()))?;
        zone.name = name.to_string();
        self.commit_if_changed();
        Ok(&self.plan)
    }

    pub fn set_zone_opacity(&mut self, id: &str, opacity_percent: f64) -> &FloorPlan {
        if let Some(zone) = self.plan.zone_mut(id) {
            zone.opacity = opacity_from_percent(opacity_percent);
            self.commit_if_changed();
        }
        &self.plan
    }

    /// Place an asset and resolve the zone it now sits in.
    pub fn move_asset(&mut self, asset_id: &str, x: f64, y: f64) -> &FloorPlan {
        if self.place_asset_live(asset_id, x, y) {
            self.commit_if_changed();
        }
        &self.plan
    }

    /// Set a zone rectangle without committing. Returns whether anything changed.
    pub fn set_zone_rect_live(&mut self, id: &str, rect: ZoneRect) -> bool {
        let rect = clamp_rect(rect.x, rect.y, rect.width, rect.height);
        match self.plan.zone_mut(id) {
            Some(zone) if zone.rect() != rect => {
                zone.set_rect(rect);
                true
            }
            _ => false,
        }
    }

    /// Place an asset without committing. Returns whether anything changed.
    pub fn place_asset_live(&mut self, asset_id: &str, x: f64, y: f64) -> bool {
        let (x, y) = clamp_position(x, y);
        let zone_id = containment::resolve(&self.plan, x, y);
        let position = AssetPosition::new(x, y, zone_id);
        if self.plan.asset_positions.get(asset_id) == Some(&position) {
            return false;
        }
        self.plan
            .asset_positions
            .insert(asset_id.to_string(), position);
        true
    }
}

fn opacity_from_percent(percent: f64) -> f64 {
    let percent = if percent.is_finite() { percent } else { 100.0 };
    percent.clamp(0.0, 100.0) / 100.0
}
