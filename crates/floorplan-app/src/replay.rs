//! Scripted input replay.
//!
//! A script is a JSON array of steps, each tagged with `"step"`. Zone ids in
//! steps may be a real id, a zone name, or `"$last"` for the zone created
//! most recently.

use crate::config::AppError;
use floorplan_core::shortcuts::Action;
use floorplan_core::{
    DisplayHost, DragTarget, Editor, HostError, Key, KeyPress, Modifiers, PersistenceGateway,
    ZoneId, ZoneType,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Placeholder for the most recently created zone.
pub const LAST_ZONE: &str = "$last";

fn default_opacity() -> f64 {
    70.0
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Press at a screen point. Without a target the editor hit-tests.
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        target: Option<DragTarget>,
    },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    FocusLost,
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    SelectZone { id: String },
    SelectAsset { id: String },
    ClearSelection,
    CreateZone {
        name: String,
        #[serde(default, rename = "type")]
        zone_type: ZoneType,
        #[serde(default = "default_opacity")]
        opacity: f64,
    },
    DeleteZone { id: String },
    SetZoneType {
        id: String,
        #[serde(rename = "type")]
        zone_type: ZoneType,
    },
    RenameZone { id: String, name: String },
    SetZoneOpacity { id: String, opacity: f64 },
    MoveAsset { id: String, x: f64, y: f64 },
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    ZoomToFit,
    ToggleFullscreen,
    SelectFloor { floor: String },
    StartEditing,
    Save,
    Cancel,
}

pub fn load_script(path: &Path) -> Result<Vec<Step>, AppError> {
    let script_error = |message: String| AppError::Script {
        path: path.to_path_buf(),
        message,
    };
    let json = fs::read_to_string(path).map_err(|e| script_error(e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| script_error(e.to_string()))
}

/// Display host without a real screen.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    pub allow: bool,
}

impl DisplayHost for HeadlessDisplay {
    fn acquire(&mut self) -> Result<(), HostError> {
        if self.allow {
            Ok(())
        } else {
            Err(HostError::Unsupported)
        }
    }

    fn release(&mut self) -> Result<(), HostError> {
        Ok(())
    }
}

/// Counters collected while replaying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: usize,
    /// Steps the editor refused (bad names, unknown ids or keys).
    pub rejected: usize,
    pub commits: usize,
    pub saves: usize,
    pub failed_saves: usize,
    pub host_errors: usize,
}

/// Drives an [`Editor`] from scripted steps.
pub struct Replayer<S: PersistenceGateway> {
    editor: Editor<S>,
    display: HeadlessDisplay,
    last_zone: Option<ZoneId>,
    report: ReplayReport,
}

impl<S: PersistenceGateway + 'static> Replayer<S> {
    pub fn new(editor: Editor<S>, display: HeadlessDisplay) -> Self {
        Self {
            editor,
            display,
            last_zone: None,
            report: ReplayReport::default(),
        }
    }

    pub fn editor(&self) -> &Editor<S> {
        &self.editor
    }

    pub fn report(&self) -> &ReplayReport {
        &self.report
    }

    pub fn into_parts(self) -> (Editor<S>, ReplayReport) {
        (self.editor, self.report)
    }

    pub fn run(&mut self, steps: &[Step]) {
        for step in steps {
            self.apply(step);
        }
    }

    fn zone_id(&self, reference: &str) -> Option<ZoneId> {
        if reference == LAST_ZONE {
            return self.last_zone.clone();
        }
        let plan = self.editor.plan();
        plan.zone(reference)
            .or_else(|| plan.zones.iter().find(|zone| zone.name == reference))
            .map(|zone| zone.id.clone())
    }

    fn resolve_target(&self, target: &DragTarget) -> DragTarget {
        let resolve = |id: &ZoneId| self.zone_id(id).unwrap_or_else(|| id.clone());
        match target {
            DragTarget::Zone { id } => DragTarget::Zone { id: resolve(id) },
            DragTarget::Handle { id, anchor } => DragTarget::Handle {
                id: resolve(id),
                anchor: *anchor,
            },
            other => other.clone(),
        }
    }

    fn with_zone(&mut self, reference: &str, f: impl FnOnce(&mut Editor<S>, &str)) {
        match self.zone_id(reference) {
            Some(id) => f(&mut self.editor, &id),
            None => self.reject(&format!("unknown zone {}", reference)),
        }
    }

    fn reject(&mut self, reason: &str) {
        log::warn!("Step {} rejected: {}", self.report.steps, reason);
        self.report.rejected += 1;
    }

    fn save(&mut self) {
        let Some(pending) = self.editor.save() else {
            return;
        };
        let result = pollster::block_on(pending);
        self.report.saves += 1;
        if self.editor.finish_save(result).is_err() {
            self.report.failed_saves += 1;
        }
    }

    pub fn apply(&mut self, step: &Step) {
        self.report.steps += 1;
        let depth = self.editor.store().history().cursor();
        log::debug!("Step {}: {:?}", self.report.steps, step);

        match step {
            Step::PointerDown { x, y, target } => {
                let screen = Point::new(*x, *y);
                match target {
                    Some(target) => {
                        let target = self.resolve_target(target);
                        self.editor.pointer_down(&target, screen)
                    }
                    None => self.editor.pointer_down_at(screen),
                };
            }
            Step::PointerMove { x, y } => {
                self.editor.pointer_move(Point::new(*x, *y));
            }
            Step::PointerUp => {
                self.editor.pointer_up();
            }
            Step::FocusLost => self.editor.focus_lost(),
            Step::Key { key, modifiers } => match Key::from_name(key) {
                Some(key) => {
                    let press = KeyPress::new(key, *modifiers);
                    if self.editor.handle_key(&press) == Some(Action::Save) {
                        self.save();
                    }
                }
                None => self.reject(&format!("unknown key {}", key)),
            },
            Step::SelectZone { id } => {
                self.with_zone(id, |editor, id| {
                    editor.select_zone(id);
                });
            }
            Step::SelectAsset { id } => self.editor.select_asset(id),
            Step::ClearSelection => self.editor.clear_selection(),
            Step::CreateZone {
                name,
                zone_type,
                opacity,
            } => match self.editor.create_zone(name, *zone_type, *opacity) {
                Ok(zone) => self.last_zone = Some(zone.id),
                Err(err) => self.reject(&err.to_string()),
            },
            Step::DeleteZone { id } => self.with_zone(id, |editor, id| editor.delete_zone(id)),
            Step::SetZoneType { id, zone_type } => {
                self.with_zone(id, |editor, id| editor.update_zone_type(id, *zone_type))
            }
            Step::RenameZone { id, name } => match self.zone_id(id) {
                Some(id) => {
                    if let Err(err) = self.editor.rename_zone(&id, name) {
                        self.reject(&err.to_string());
                    }
                }
                None => self.reject(&format!("unknown zone {}", id)),
            },
            Step::SetZoneOpacity { id, opacity } => {
                self.with_zone(id, |editor, id| editor.set_zone_opacity(id, *opacity))
            }
            Step::MoveAsset { id, x, y } => self.editor.move_asset(id, *x, *y),
            Step::Undo => {
                self.editor.undo();
            }
            Step::Redo => {
                self.editor.redo();
            }
            Step::ZoomIn => self.editor.zoom_in(),
            Step::ZoomOut => self.editor.zoom_out(),
            Step::ZoomReset => self.editor.zoom_reset(),
            Step::ZoomToFit => self.editor.zoom_to_fit(),
            Step::ToggleFullscreen => {
                if self.editor.toggle_fullscreen(&mut self.display).is_err() {
                    self.report.host_errors += 1;
                }
            }
            Step::SelectFloor { floor } => {
                self.editor.select_floor(floor);
            }
            Step::StartEditing => self.editor.start_editing(),
            Step::Save => self.save(),
            Step::Cancel => self.editor.cancel(),
        }

        if self.editor.store().history().cursor() > depth {
            self.report.commits += 1;
        }
    }
}
