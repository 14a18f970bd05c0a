//! The editor: routes pointer and keyboard input to the session, the
//! viewport and the selection.

use crate::assets::{self, Asset, AssetMarker, Call};
use crate::drag::{Anchor, DragController, DragTarget};
use crate::input::{KeyPress, PointerTracker};
use crate::keyboard::{KeyboardNudger, Selection};
use crate::plan::{FloorPlan, FloorPlans, Zone, ZoneType};
use crate::session::FloorSession;
use crate::shortcuts::{self, Action, GuardContext};
use crate::storage::{BoxFuture, PersistenceGateway, StorageError, StorageResult};
use crate::store::{EditError, FloorPlanStore};
use crate::viewport::{DisplayHost, HostError, Viewport};
use kurbo::{Point, Size};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pointer distance (screen pixels) within which a resize handle is hit.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// On-screen marker diameter at the given zoom.
pub fn marker_size(zoom: f64) -> f64 {
    (32.0 * zoom).max(24.0)
}

/// Held by a pending save future; releases the editor's in-flight flag when
/// the future completes or is dropped unfinished.
struct SaveInFlight(Arc<AtomicBool>);

impl Drop for SaveInFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Interactive floor-plan editor for one tenant.
///
/// Owns the session, the view and all transient interaction state. Pointer
/// positions are screen pixels relative to the map container's top-left.
pub struct Editor<S: PersistenceGateway> {
    session: FloorSession<S>,
    viewport: Viewport,
    drag: DragController,
    nudger: KeyboardNudger,
    selection: Selection,
    pointer: PointerTracker,
    /// Unscaled container size in pixels.
    container: Size,
    editing: bool,
    saving: Arc<AtomicBool>,
    assets: Vec<Asset>,
    calls: Vec<Call>,
}

impl<S: PersistenceGateway + 'static> Editor<S> {
    pub fn new(session: FloorSession<S>, container: Size) -> Self {
        Self {
            session,
            viewport: Viewport::new(),
            drag: DragController::new(),
            nudger: KeyboardNudger::new(),
            selection: Selection::None,
            pointer: PointerTracker::new(),
            container,
            editing: false,
            saving: Arc::new(AtomicBool::new(false)),
            assets: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn session(&self) -> &FloorSession<S> {
        &self.session
    }

    pub fn store(&self) -> &FloorPlanStore {
        self.session.store()
    }

    /// Document of the selected floor.
    pub fn plan(&self) -> &FloorPlan {
        self.session.store().plan()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn set_container(&mut self, container: Size) {
        self.container = container;
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Register a callback fired whenever the selected floor's document
    /// changes through a commit, undo, redo, revert or floor switch.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&FloorPlan) + 'static,
    {
        self.session.store_mut().subscribe(observer);
    }

    /// Replace the dashboard data used for markers and hit testing.
    pub fn set_dashboard(&mut self, assets: Vec<Asset>, calls: Vec<Call>) {
        self.assets = assets;
        self.calls = calls;
    }

    pub fn markers(&self) -> Vec<AssetMarker> {
        assets::markers(self.plan(), &self.assets, &self.calls)
    }

    // --- Modes ---

    pub fn start_editing(&mut self) {
        if !self.editing {
            self.settle();
            self.editing = true;
            log::debug!("Entered edit mode");
        }
    }

    /// Leave edit mode and drop every unsaved change.
    pub fn cancel(&mut self) {
        self.settle();
        self.session.discard();
        self.selection.clear();
        self.editing = false;
        log::debug!("Edit cancelled");
    }

    /// Abort any in-flight drag so discrete operations start from a
    /// committed document.
    fn settle(&mut self) {
        if !self.drag.is_idle() {
            self.drag
                .abort(self.session.store_mut(), &mut self.viewport);
        }
    }

    // --- Selection ---

    pub fn select_zone(&mut self, id: &str) -> bool {
        if !self.plan().has_zone(id) {
            return false;
        }
        self.selection = Selection::Zone(id.to_string());
        true
    }

    pub fn select_asset(&mut self, id: &str) {
        self.selection = Selection::Asset(id.to_string());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Drop the selection if it names a zone that no longer exists.
    fn prune_selection(&mut self) {
        if let Some(id) = self.selection.zone_id() {
            if !self.plan().has_zone(id) {
                self.selection.clear();
            }
        }
    }

    // --- Hit testing ---

    fn percent_to_screen(&self, point: Point) -> Point {
        let content = Point::new(
            point.x / 100.0 * self.container.width,
            point.y / 100.0 * self.container.height,
        );
        self.viewport.content_to_screen(content)
    }

    /// What lies under a screen point: a handle of the selected zone (edit
    /// mode only), then an asset marker, then the topmost zone.
    pub fn hit_test(&self, screen: Point) -> DragTarget {
        if self.editing {
            if let Some(zone) = self.selection.zone_id().and_then(|id| self.plan().zone(id)) {
                let rect = zone.rect();
                let handle = Anchor::ALL.iter().copied().find(|anchor| {
                    self.percent_to_screen(anchor.position_on(&rect)).distance(screen)
                        <= HANDLE_HIT_TOLERANCE
                });
                if let Some(anchor) = handle {
                    return DragTarget::Handle {
                        id: zone.id.clone(),
                        anchor,
                    };
                }
            }
        }

        let radius = marker_size(self.viewport.zoom()) / 2.0;
        let asset = self.assets.iter().rev().find(|asset| {
            let pos = self.plan().position_or_default(&asset.id);
            self.percent_to_screen(Point::new(pos.x, pos.y)).distance(screen) <= radius
        });
        if let Some(asset) = asset {
            return DragTarget::Asset {
                id: asset.id.clone(),
            };
        }

        if self.container.width > 0.0 && self.container.height > 0.0 {
            let percent = self.viewport.screen_to_percent(screen, self.container);
            // Later zones are drawn on top.
            if let Some(zone) = self
                .plan()
                .zones
                .iter()
                .rev()
                .find(|zone| zone.contains(percent.x, percent.y))
            {
                return DragTarget::Zone {
                    id: zone.id.clone(),
                };
            }
        }
        DragTarget::Background
    }

    // --- Pointer ---

    /// Pointer pressed at a screen point; the target is found by hit testing.
    pub fn pointer_down_at(&mut self, screen: Point) -> bool {
        let target = self.hit_test(screen);
        self.pointer_down(&target, screen)
    }

    /// Pointer pressed on a known target. Returns whether a drag started.
    ///
    /// In edit mode zones, handles and assets are dragged and the background
    /// clears the selection. Outside edit mode any press pans the map and a
    /// press on an asset selects it. A double-click on an asset centres it.
    pub fn pointer_down(&mut self, target: &DragTarget, screen: Point) -> bool {
        self.settle();
        let double = self.pointer.pressed(screen);

        if let DragTarget::Asset { id } = target {
            self.select_asset(id);
            if double {
                let pos = self.plan().position_or_default(id);
                self.viewport
                    .center_on(Point::new(pos.x, pos.y), self.container);
                log::debug!("Centered on asset {}", id);
                return false;
            }
        }

        if !self.editing {
            return self.drag.begin(
                &DragTarget::Background,
                screen,
                self.session.store(),
                &self.viewport,
            );
        }

        match target {
            DragTarget::Zone { id } | DragTarget::Handle { id, .. } => {
                self.select_zone(id);
            }
            DragTarget::Background => {
                self.selection.clear();
                return false;
            }
            DragTarget::Asset { .. } => {}
        }
        self.drag
            .begin(target, screen, self.session.store(), &self.viewport)
    }

    /// Pointer moved. Returns whether the document or view changed.
    pub fn pointer_move(&mut self, screen: Point) -> bool {
        self.pointer.moved(screen);
        if self.drag.is_idle() {
            return false;
        }
        let zoom = self.viewport.zoom();
        let on_screen = Size::new(self.container.width * zoom, self.container.height * zoom);
        self.drag.update(
            screen,
            on_screen,
            self.session.store_mut(),
            &mut self.viewport,
        )
    }

    /// Pointer released anywhere. Returns whether a snapshot was committed.
    pub fn pointer_up(&mut self) -> bool {
        self.drag.end(self.session.store_mut())
    }

    /// The window lost focus mid-gesture: the drag is abandoned.
    pub fn focus_lost(&mut self) {
        self.settle();
    }

    // --- Keyboard ---

    /// Route a key press through the shortcut table and perform the action.
    ///
    /// Returns the action taken. [`Action::Save`] is only reported; the
    /// caller owns the executor and should follow up with [`Editor::save`].
    pub fn handle_key(&mut self, press: &KeyPress) -> Option<Action> {
        let cx = GuardContext {
            editing: self.editing,
            has_selection: !self.selection.is_none(),
        };
        let action = shortcuts::route(press, cx)?;
        match action {
            Action::Save => {}
            Action::Undo => {
                self.undo();
            }
            Action::Redo => {
                self.redo();
            }
            Action::ZoomIn => self.viewport.zoom_in(),
            Action::ZoomOut => self.viewport.zoom_out(),
            Action::ZoomReset => self.viewport.zoom_reset(),
            Action::Nudge(direction) => {
                self.settle();
                self.nudger
                    .nudge(self.session.store_mut(), &self.selection, direction);
            }
            Action::Resize(direction) => {
                self.settle();
                self.nudger
                    .resize(self.session.store_mut(), &self.selection, direction);
            }
            Action::Deselect => {
                self.settle();
                self.selection.clear();
            }
        }
        Some(action)
    }

    // --- Document operations ---

    /// Create a zone and select it.
    pub fn create_zone(&mut self, name: &str, zone_type: ZoneType, opacity_percent: f64) -> Result<Zone, EditError> {
        self.settle();
        let zone = self
            .session
            .store_mut()
            .create_zone(name, zone_type, opacity_percent)?;
        self.selection = Selection::Zone(zone.id.clone());
        Ok(zone)
    }

    pub fn delete_zone(&mut self, id: &str) {
        self.settle();
        self.session.store_mut().delete_zone(id);
        self.prune_selection();
    }

    pub fn update_zone_type(&mut self, id: &str, zone_type: ZoneType) {
        self.settle();
        self.session.store_mut().update_zone_type(id, zone_type);
    }

    pub fn rename_zone(&mut self, id: &str, name: &str) -> Result<(), EditError> {
        self.settle();
        self.session.store_mut().rename_zone(id, name)?;
        Ok(())
    }

    pub fn set_zone_opacity(&mut self, id: &str, opacity_percent: f64) {
        self.settle();
        self.session.store_mut().set_zone_opacity(id, opacity_percent);
    }

    pub fn move_asset(&mut self, asset_id: &str, x: f64, y: f64) {
        self.settle();
        self.session.store_mut().move_asset(asset_id, x, y);
    }

    pub fn undo(&mut self) -> bool {
        self.settle();
        let undone = self.session.store_mut().undo().is_some();
        self.prune_selection();
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.settle();
        let redone = self.session.store_mut().redo().is_some();
        self.prune_selection();
        redone
    }

    /// Switch to another floor. Selection is cleared and the view reset.
    pub fn select_floor(&mut self, floor: &str) -> bool {
        self.settle();
        if !self.session.select_floor(floor) {
            return false;
        }
        self.selection.clear();
        self.viewport.zoom_reset();
        true
    }

    // --- View ---

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn zoom_reset(&mut self) {
        self.viewport.zoom_reset();
    }

    pub fn zoom_to_fit(&mut self) {
        let content = self.plan().content_size();
        self.viewport.zoom_to_fit(self.container, content);
    }

    pub fn toggle_fullscreen(&mut self, host: &mut dyn DisplayHost) -> Result<bool, HostError> {
        self.viewport.toggle_fullscreen(host)
    }

    // --- Persistence ---

    /// Start saving every floor. Returns `None` if a save is already in
    /// flight. Editing may continue while the returned future runs; report
    /// its output through [`Editor::finish_save`]. Dropping the future
    /// unfinished abandons the save and allows a new one.
    pub fn save(&mut self) -> Option<BoxFuture<'static, StorageResult<FloorPlans>>> {
        if self.saving.swap(true, Ordering::AcqRel) {
            log::warn!("Save already in progress");
            return None;
        }
        self.settle();
        let in_flight = SaveInFlight(Arc::clone(&self.saving));
        let flush = self.session.flush();
        Some(Box::pin(async move {
            let _in_flight = in_flight;
            flush.await
        }))
    }

    /// Apply the outcome of a save. Success leaves edit mode; failure keeps
    /// every local change and is handed back for the caller to surface.
    pub fn finish_save(&mut self, result: StorageResult<FloorPlans>) -> Result<(), StorageError> {
        self.saving.store(false, Ordering::Release);
        match result {
            Ok(plans) => {
                log::info!("Saved {} floor(s) for tenant {}", plans.len(), self.session.tenant());
                self.session.mark_persisted(plans);
                self.editing = false;
                self.selection.clear();
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to save floor plans: {}", err);
                Err(err)
            }
        }
    }
}
