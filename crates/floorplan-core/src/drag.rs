//! Pointer drag state machine.
//!
//! A drag starts on pointer-down over a zone, a resize handle, an asset
//! marker or the empty background, follows pointer moves, and ends on
//! pointer-up wherever that happens. The drag context lives here, outside
//! the document history; only the document produced on release is
//! committed.

use crate::geometry::{MIN_ZONE_SIZE, PERCENT_MAX, ZoneRect, clamp_position};
use crate::plan::{AssetId, ZoneId};
use crate::store::FloorPlanStore;
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Resize handle on a zone's border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Anchor {
    pub const ALL: [Anchor; 8] = [
        Anchor::NW,
        Anchor::N,
        Anchor::NE,
        Anchor::E,
        Anchor::SE,
        Anchor::S,
        Anchor::SW,
        Anchor::W,
    ];

    pub fn north(self) -> bool {
        matches!(self, Anchor::N | Anchor::NE | Anchor::NW)
    }

    pub fn south(self) -> bool {
        matches!(self, Anchor::S | Anchor::SE | Anchor::SW)
    }

    pub fn east(self) -> bool {
        matches!(self, Anchor::E | Anchor::NE | Anchor::SE)
    }

    pub fn west(self) -> bool {
        matches!(self, Anchor::W | Anchor::NW | Anchor::SW)
    }

    /// Handle position on a rectangle (same units as the rectangle).
    pub fn position_on(self, rect: &ZoneRect) -> Point {
        let x = if self.west() {
            rect.x
        } else if self.east() {
            rect.x1()
        } else {
            rect.x + rect.width / 2.0
        };
        let y = if self.north() {
            rect.y
        } else if self.south() {
            rect.y1()
        } else {
            rect.y + rect.height / 2.0
        };
        Point::new(x, y)
    }
}

/// What the pointer went down on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragTarget {
    /// Body of a zone.
    Zone { id: ZoneId },
    /// A resize handle of a zone.
    Handle { id: ZoneId, anchor: Anchor },
    /// An asset marker.
    Asset { id: AssetId },
    /// Empty map area.
    Background,
}

/// Current drag, with everything captured at pointer-down.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingZone {
        id: ZoneId,
        start: Point,
        initial: ZoneRect,
    },
    ResizingZone {
        id: ZoneId,
        anchor: Anchor,
        start: Point,
        initial: ZoneRect,
    },
    DraggingAsset {
        id: AssetId,
        start: Point,
        initial: Point,
    },
    Panning {
        start: Point,
        initial: Vec2,
    },
}

/// Move a rectangle by a percent delta without leaving the plan.
pub fn move_rect(initial: &ZoneRect, delta: Vec2) -> ZoneRect {
    let x = (initial.x + delta.x).min(PERCENT_MAX - initial.width).max(0.0);
    let y = (initial.y + delta.y).min(PERCENT_MAX - initial.height).max(0.0);
    ZoneRect::new(x, y, initial.width, initial.height)
}

/// Resize a rectangle from one of its handles.
///
/// The edges named by the anchor move; the opposite edges stay where they
/// were. Sizes never drop below the minimum and moving edges stop at the
/// plan border.
pub fn resize_rect(initial: &ZoneRect, anchor: Anchor, delta: Vec2) -> ZoneRect {
    let mut rect = *initial;

    if anchor.north() {
        let bottom = initial.y1();
        let height = (initial.height - delta.y).max(MIN_ZONE_SIZE).min(bottom);
        rect.y = initial.y + (initial.height - height);
        rect.height = height;
    }
    if anchor.south() {
        rect.height = (initial.height + delta.y)
            .max(MIN_ZONE_SIZE)
            .min(PERCENT_MAX - initial.y);
    }
    if anchor.west() {
        let right = initial.x1();
        let width = (initial.width - delta.x).max(MIN_ZONE_SIZE).min(right);
        rect.x = initial.x + (initial.width - width);
        rect.width = width;
    }
    if anchor.east() {
        rect.width = (initial.width + delta.x)
            .max(MIN_ZONE_SIZE)
            .min(PERCENT_MAX - initial.x);
    }

    rect
}

/// Interprets pointer events into document and viewport updates.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, DragState::Panning { .. })
    }

    /// Start a drag on pointer-down. Returns false if the target is unknown.
    pub fn begin(
        &mut self,
        target: &DragTarget,
        position: Point,
        store: &FloorPlanStore,
        viewport: &Viewport,
    ) -> bool {
        let plan = store.plan();
        self.state = match target {
            DragTarget::Zone { id } => match plan.zone(id) {
                Some(zone) => DragState::DraggingZone {
                    id: id.clone(),
                    start: position,
                    initial: zone.rect(),
                },
                None => DragState::Idle,
            },
            DragTarget::Handle { id, anchor } => match plan.zone(id) {
                Some(zone) => DragState::ResizingZone {
                    id: id.clone(),
                    anchor: *anchor,
                    start: position,
                    initial: zone.rect(),
                },
                None => DragState::Idle,
            },
            DragTarget::Asset { id } => {
                let pos = plan.position_or_default(id);
                DragState::DraggingAsset {
                    id: id.clone(),
                    start: position,
                    initial: Point::new(pos.x, pos.y),
                }
            }
            DragTarget::Background => DragState::Panning {
                start: position,
                initial: viewport.pan,
            },
        };
        if !self.is_idle() {
            log::trace!("Drag started: {:?}", self.state);
        }
        !self.is_idle()
    }

    /// Apply a pointer move. `container` is the on-screen size of the map in
    /// pixels. Returns whether the document or viewport changed.
    pub fn update(
        &mut self,
        position: Point,
        container: Size,
        store: &mut FloorPlanStore,
        viewport: &mut Viewport,
    ) -> bool {
        if let DragState::Panning { start, initial } = &self.state {
            let pan = *initial + (position - *start);
            let changed = viewport.pan != pan;
            viewport.set_pan(pan);
            return changed;
        }

        if container.width <= 0.0 || container.height <= 0.0 {
            return false;
        }

        let percent_delta = |start: Point| {
            Vec2::new(
                (position.x - start.x) / container.width * 100.0,
                (position.y - start.y) / container.height * 100.0,
            )
        };

        match &self.state {
            DragState::Idle | DragState::Panning { .. } => false,
            DragState::DraggingZone { id, start, initial } => {
                let rect = move_rect(initial, percent_delta(*start));
                store.set_zone_rect_live(id, rect)
            }
            DragState::ResizingZone {
                id,
                anchor,
                start,
                initial,
            } => {
                let rect = resize_rect(initial, *anchor, percent_delta(*start));
                store.set_zone_rect_live(id, rect)
            }
            DragState::DraggingAsset { id, start, initial } => {
                let delta = percent_delta(*start);
                let (x, y) = clamp_position(initial.x + delta.x, initial.y + delta.y);
                store.place_asset_live(id, x, y)
            }
        }
    }

    /// Finish the drag on pointer-up. Commits one snapshot if the document
    /// changed; returns whether a snapshot was committed.
    pub fn end(&mut self, store: &mut FloorPlanStore) -> bool {
        let state = std::mem::take(&mut self.state);
        match state {
            DragState::Idle | DragState::Panning { .. } => false,
            _ => store.commit_if_changed(),
        }
    }

    /// Abandon the drag (focus lost, Escape). Live changes are rolled back.
    pub fn abort(&mut self, store: &mut FloorPlanStore, viewport: &mut Viewport) {
        let state = std::mem::take(&mut self.state);
        match state {
            DragState::Idle => {}
            DragState::Panning { initial, .. } => viewport.set_pan(initial),
            _ => {
                store.revert_uncommitted();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::is_normalized;
    use crate::plan::ZoneType;

    const EPS: f64 = 1e-9;
    const CONTAINER: Size = Size::new(1000.0, 500.0);

    fn setup() -> (FloorPlanStore, Viewport, ZoneId) {
        let mut store = FloorPlanStore::default();
        let zone = store.create_zone("A", ZoneType::Office, 70.0).unwrap();
        (store, Viewport::new(), zone.id)
    }

    fn approx_rect(a: ZoneRect, b: ZoneRect) -> bool {
        (a.x - b.x).abs() < EPS
            && (a.y - b.y).abs() < EPS
            && (a.width - b.width).abs() < EPS
            && (a.height - b.height).abs() < EPS
    }

    #[test]
    fn test_drag_zone_moves_and_commits_once() {
        let (mut store, mut viewport, id) = setup();
        let depth = store.history().len();
        let mut drag = DragController::new();

        assert!(drag.begin(&DragTarget::Zone { id: id.clone() }, Point::new(100.0, 100.0), &store, &viewport));
        // +10% x, +20% y
        drag.update(Point::new(150.0, 150.0), CONTAINER, &mut store, &mut viewport);
        drag.update(Point::new(200.0, 200.0), CONTAINER, &mut store, &mut viewport);
        assert_eq!(store.history().len(), depth);

        assert!(drag.end(&mut store));
        assert!(drag.is_idle());
        assert_eq!(store.history().len(), depth + 1);
        let rect = store.plan().zone(&id).unwrap().rect();
        assert!(approx_rect(rect, ZoneRect::new(20.0, 30.0, 20.0, 15.0)));
    }

    #[test]
    fn test_drag_zone_stops_at_edges() {
        let (mut store, mut viewport, id) = setup();
        let mut drag = DragController::new();
        drag.begin(&DragTarget::Zone { id: id.clone() }, Point::ZERO, &store, &viewport);
        drag.update(Point::new(5000.0, -5000.0), CONTAINER, &mut store, &mut viewport);
        drag.end(&mut store);

        let rect = store.plan().zone(&id).unwrap().rect();
        assert_eq!(rect, ZoneRect::new(80.0, 0.0, 20.0, 15.0));
    }

    #[test]
    fn test_pointer_up_without_change_commits_nothing() {
        let (mut store, mut viewport, id) = setup();
        let depth = store.history().len();
        let mut drag = DragController::new();
        drag.begin(&DragTarget::Zone { id }, Point::new(10.0, 10.0), &store, &viewport);
        drag.update(Point::new(10.0, 10.0), CONTAINER, &mut store, &mut viewport);
        assert!(!drag.end(&mut store));
        assert_eq!(store.history().len(), depth);
    }

    #[test]
    fn test_resize_north_keeps_bottom_edge() {
        let initial = ZoneRect::new(10.0, 10.0, 20.0, 15.0);
        let rect = resize_rect(&initial, Anchor::N, Vec2::new(0.0, 5.0));
        assert!(approx_rect(rect, ZoneRect::new(10.0, 15.0, 20.0, 10.0)));

        let rect = resize_rect(&initial, Anchor::N, Vec2::new(0.0, 50.0));
        assert!(approx_rect(rect, ZoneRect::new(10.0, 20.0, 20.0, 5.0)));
        assert!((rect.y1() - initial.y1()).abs() < EPS);
    }

    #[test]
    fn test_resize_north_stops_at_top() {
        let initial = ZoneRect::new(10.0, 10.0, 20.0, 15.0);
        let rect = resize_rect(&initial, Anchor::N, Vec2::new(0.0, -40.0));
        assert!(approx_rect(rect, ZoneRect::new(10.0, 0.0, 20.0, 25.0)));
    }

    #[test]
    fn test_resize_south_and_east() {
        let initial = ZoneRect::new(10.0, 10.0, 20.0, 15.0);
        let rect = resize_rect(&initial, Anchor::SE, Vec2::new(5.0, -12.0));
        assert!(approx_rect(rect, ZoneRect::new(10.0, 10.0, 25.0, 5.0)));

        let rect = resize_rect(&initial, Anchor::SE, Vec2::new(500.0, 500.0));
        assert!(approx_rect(rect, ZoneRect::new(10.0, 10.0, 90.0, 90.0)));
    }

    #[test]
    fn test_resize_west_mirrors_north() {
        let initial = ZoneRect::new(10.0, 10.0, 20.0, 15.0);
        let rect = resize_rect(&initial, Anchor::W, Vec2::new(-4.0, 99.0));
        assert!(approx_rect(rect, ZoneRect::new(6.0, 10.0, 24.0, 15.0)));
    }

    #[test]
    fn test_resize_corner_applies_both_axes() {
        let initial = ZoneRect::new(40.0, 40.0, 20.0, 20.0);
        let rect = resize_rect(&initial, Anchor::NE, Vec2::new(10.0, -10.0));
        assert!(approx_rect(rect, ZoneRect::new(40.0, 30.0, 30.0, 30.0)));
    }

    #[test]
    fn test_resize_through_controller() {
        let (mut store, mut viewport, id) = setup();
        let mut drag = DragController::new();
        let target = DragTarget::Handle { id: id.clone(), anchor: Anchor::S };
        drag.begin(&target, Point::new(0.0, 0.0), &store, &viewport);
        // +10% y
        drag.update(Point::new(0.0, 50.0), CONTAINER, &mut store, &mut viewport);
        drag.end(&mut store);
        let rect = store.plan().zone(&id).unwrap().rect();
        assert!(approx_rect(rect, ZoneRect::new(10.0, 10.0, 20.0, 25.0)));
    }

    #[test]
    fn test_random_drags_keep_zone_bounds() {
        let (mut store, mut viewport, id) = setup();
        let mut drag = DragController::new();
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % 4001) as f64 - 2000.0
        };

        for i in 0..200 {
            let target = if i % 3 == 0 {
                DragTarget::Zone { id: id.clone() }
            } else {
                DragTarget::Handle { id: id.clone(), anchor: Anchor::ALL[i % 8] }
            };
            drag.begin(&target, Point::new(500.0, 250.0), &store, &viewport);
            for _ in 0..3 {
                let p = Point::new(500.0 + next(), 250.0 + next());
                drag.update(p, CONTAINER, &mut store, &mut viewport);
                assert!(is_normalized(&store.plan().zone(&id).unwrap().rect()));
            }
            drag.end(&mut store);
        }
    }

    #[test]
    fn test_drag_asset_resolves_zone_live() {
        let (mut store, mut viewport, id) = setup();
        let mut drag = DragController::new();
        drag.begin(&DragTarget::Asset { id: "pump".to_string() }, Point::ZERO, &store, &viewport);

        // Default placement is (10, 10); +5% x, +5% y lands inside the zone.
        drag.update(Point::new(50.0, 25.0), CONTAINER, &mut store, &mut viewport);
        assert_eq!(store.plan().asset_positions["pump"].zone_id.as_deref(), Some(id.as_str()));

        // Far outside.
        drag.update(Point::new(600.0, 300.0), CONTAINER, &mut store, &mut viewport);
        assert_eq!(store.plan().asset_positions["pump"].zone_id, None);

        drag.update(Point::new(-5000.0, 5000.0), CONTAINER, &mut store, &mut viewport);
        let pos = &store.plan().asset_positions["pump"];
        assert_eq!((pos.x, pos.y), (0.0, 100.0));
        assert!(drag.end(&mut store));
    }

    #[test]
    fn test_panning_touches_only_viewport() {
        let (mut store, mut viewport, _) = setup();
        let before = store.plan().clone();
        let depth = store.history().len();
        let mut drag = DragController::new();

        drag.begin(&DragTarget::Background, Point::new(10.0, 10.0), &store, &viewport);
        assert!(drag.is_panning());
        drag.update(Point::new(40.0, -10.0), CONTAINER, &mut store, &mut viewport);
        assert_eq!(viewport.pan, Vec2::new(30.0, -20.0));
        assert!(!drag.end(&mut store));

        assert_eq!(*store.plan(), before);
        assert_eq!(store.history().len(), depth);
    }

    #[test]
    fn test_abort_reverts_live_changes() {
        let (mut store, mut viewport, id) = setup();
        let before = store.plan().clone();
        let mut drag = DragController::new();
        drag.begin(&DragTarget::Zone { id }, Point::ZERO, &store, &viewport);
        drag.update(Point::new(100.0, 100.0), CONTAINER, &mut store, &mut viewport);
        drag.abort(&mut store, &mut viewport);

        assert!(drag.is_idle());
        assert_eq!(*store.plan(), before);
    }

    #[test]
    fn test_begin_on_unknown_zone_stays_idle() {
        let (store, viewport, _) = setup();
        let mut drag = DragController::new();
        assert!(!drag.begin(&DragTarget::Zone { id: "nope".to_string() }, Point::ZERO, &store, &viewport));
        assert!(drag.is_idle());
    }

    #[test]
    fn test_anchor_positions() {
        let rect = ZoneRect::new(10.0, 20.0, 40.0, 20.0);
        assert_eq!(Anchor::NW.position_on(&rect), Point::new(10.0, 20.0));
        assert_eq!(Anchor::S.position_on(&rect), Point::new(30.0, 40.0));
        assert_eq!(Anchor::E.position_on(&rect), Point::new(50.0, 30.0));
    }
}
