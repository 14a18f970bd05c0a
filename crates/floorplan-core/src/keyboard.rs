//! Keyboard-driven fine movement and resizing of the selection.

use crate::geometry::{MIN_ZONE_SIZE, PERCENT_MAX, ZoneRect};
use crate::input::Direction;
use crate::plan::{AssetId, ZoneId};
use crate::store::FloorPlanStore;
use serde::{Deserialize, Serialize};

/// Distance moved or resized per key press, in percent.
pub const NUDGE_STEP: f64 = 0.5;

/// What the operator currently has selected. UI state, not document state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Zone(ZoneId),
    Asset(AssetId),
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn zone_id(&self) -> Option<&str> {
        match self {
            Selection::Zone(id) => Some(id),
            _ => None,
        }
    }

    pub fn asset_id(&self) -> Option<&str> {
        match self {
            Selection::Asset(id) => Some(id),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }
}

/// Applies arrow-key nudges and Shift+arrow resizes.
///
/// Each press that changes the document commits one snapshot; a press at a
/// boundary changes nothing and commits nothing.
#[derive(Debug, Clone, Copy)]
pub struct KeyboardNudger {
    pub step: f64,
}

impl Default for KeyboardNudger {
    fn default() -> Self {
        Self { step: NUDGE_STEP }
    }
}

impl KeyboardNudger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the selected zone or asset one step. Returns whether a snapshot was committed.
    pub fn nudge(&self, store: &mut FloorPlanStore, selection: &Selection, direction: Direction) -> bool {
        let offset = direction.unit() * self.step;
        let changed = match selection {
            Selection::None => false,
            Selection::Zone(id) => match store.plan().zone(id).map(|zone| zone.rect()) {
                Some(rect) => {
                    let x = (rect.x + offset.x).min(PERCENT_MAX - rect.width).max(0.0);
                    let y = (rect.y + offset.y).min(PERCENT_MAX - rect.height).max(0.0);
                    store.set_zone_rect_live(id, ZoneRect::new(x, y, rect.width, rect.height))
                }
                None => false,
            },
            Selection::Asset(id) => {
                let pos = store.plan().position_or_default(id);
                store.place_asset_live(id, pos.x + offset.x, pos.y + offset.y)
            }
        };
        changed && store.commit_if_changed()
    }

    /// Grow or shrink the selected zone one step. Left/Up shrink, Right/Down
    /// grow. Assets have no size, so for them this is a plain nudge.
    pub fn resize(&self, store: &mut FloorPlanStore, selection: &Selection, direction: Direction) -> bool {
        let id = match selection {
            Selection::Zone(id) => id,
            Selection::Asset(_) => return self.nudge(store, selection, direction),
            Selection::None => return false,
        };
        let Some(mut rect) = store.plan().zone(id).map(|zone| zone.rect()) else {
            return false;
        };

        match direction {
            Direction::Left => rect.width = (rect.width - self.step).max(MIN_ZONE_SIZE),
            Direction::Right => rect.width = (rect.width + self.step).min(PERCENT_MAX - rect.x),
            Direction::Up => rect.height = (rect.height - self.step).max(MIN_ZONE_SIZE),
            Direction::Down => rect.height = (rect.height + self.step).min(PERCENT_MAX - rect.y),
        }

        store.set_zone_rect_live(id, rect) && store.commit_if_changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::is_normalized;
    use crate::plan::ZoneType;

    const EPS: f64 = 1e-9;

    fn setup() -> (FloorPlanStore, Selection) {
        let mut store = FloorPlanStore::default();
        let zone = store.create_zone("A", ZoneType::Office, 70.0).unwrap();
        (store, Selection::Zone(zone.id))
    }

    #[test]
    fn test_nudge_zone_moves_without_resizing() {
        let (mut store, selection) = setup();
        let nudger = KeyboardNudger::new();
        let depth = store.history().len();

        assert!(nudger.nudge(&mut store, &selection, Direction::Right));
        assert!(nudger.nudge(&mut store, &selection, Direction::Up));

        let rect = store.plan().zone(selection.zone_id().unwrap()).unwrap().rect();
        assert!((rect.x - 10.5).abs() < EPS);
        assert!((rect.y - 9.5).abs() < EPS);
        assert_eq!((rect.width, rect.height), (20.0, 15.0));
        assert_eq!(store.history().len(), depth + 2);
    }

    #[test]
    fn test_nudge_at_boundary_commits_nothing() {
        let (mut store, selection) = setup();
        let id = selection.zone_id().unwrap().to_string();
        store.update_zone_geometry(&id, ZoneRect::new(0.0, 0.0, 20.0, 15.0));
        let depth = store.history().len();

        let nudger = KeyboardNudger::new();
        assert!(!nudger.nudge(&mut store, &selection, Direction::Left));
        assert!(!nudger.nudge(&mut store, &selection, Direction::Up));
        assert_eq!(store.history().len(), depth);
    }

    #[test]
    fn test_resize_zone() {
        let (mut store, selection) = setup();
        let nudger = KeyboardNudger::new();

        assert!(nudger.resize(&mut store, &selection, Direction::Right));
        assert!(nudger.resize(&mut store, &selection, Direction::Up));

        let rect = store.plan().zone(selection.zone_id().unwrap()).unwrap().rect();
        assert_eq!((rect.x, rect.y), (10.0, 10.0));
        assert!((rect.width - 20.5).abs() < EPS);
        assert!((rect.height - 14.5).abs() < EPS);
    }

    #[test]
    fn test_resize_respects_minimum_and_border() {
        let (mut store, selection) = setup();
        let id = selection.zone_id().unwrap().to_string();
        store.update_zone_geometry(&id, ZoneRect::new(80.0, 90.0, 5.0, 10.0));
        let nudger = KeyboardNudger::new();
        let depth = store.history().len();

        assert!(!nudger.resize(&mut store, &selection, Direction::Left));
        assert!(!nudger.resize(&mut store, &selection, Direction::Down));
        assert_eq!(store.history().len(), depth);

        for _ in 0..100 {
            nudger.resize(&mut store, &selection, Direction::Right);
        }
        let rect = store.plan().zone(&id).unwrap().rect();
        assert!(is_normalized(&rect));
        assert!((rect.x1() - 100.0).abs() < EPS);
    }

    #[test]
    fn test_nudge_asset_resolves_zone() {
        let (mut store, selection) = setup();
        let zone_id = selection.zone_id().unwrap().to_string();
        store.move_asset("pump", 9.5, 12.0);
        let asset = Selection::Asset("pump".to_string());
        let nudger = KeyboardNudger::new();

        assert!(nudger.nudge(&mut store, &asset, Direction::Right));
        let pos = &store.plan().asset_positions["pump"];
        assert_eq!(pos.x, 10.0);
        assert_eq!(pos.zone_id.as_deref(), Some(zone_id.as_str()));
    }

    #[test]
    fn test_nudge_asset_at_edge() {
        let mut store = FloorPlanStore::default();
        store.move_asset("pump", 100.0, 50.0);
        let depth = store.history().len();
        let asset = Selection::Asset("pump".to_string());

        assert!(!KeyboardNudger::new().nudge(&mut store, &asset, Direction::Right));
        assert_eq!(store.history().len(), depth);
    }

    #[test]
    fn test_nudge_unplaced_asset_starts_from_default() {
        let mut store = FloorPlanStore::default();
        let asset = Selection::Asset("new".to_string());
        assert!(KeyboardNudger::new().nudge(&mut store, &asset, Direction::Down));
        let pos = &store.plan().asset_positions["new"];
        assert_eq!((pos.x, pos.y), (10.0, 10.5));
    }

    #[test]
    fn test_nothing_selected() {
        let mut store = FloorPlanStore::default();
        let nudger = KeyboardNudger::new();
        assert!(!nudger.nudge(&mut store, &Selection::None, Direction::Left));
        assert!(!nudger.resize(&mut store, &Selection::None, Direction::Left));
    }
}
