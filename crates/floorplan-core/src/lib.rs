//! Floor Plan Core Library
//!
//! Platform-agnostic document model and interaction logic for the
//! floor-plan / asset-location editor.

pub mod assets;
pub mod containment;
pub mod drag;
pub mod editor;
pub mod geometry;
pub mod history;
pub mod input;
pub mod keyboard;
pub mod plan;
pub mod session;
pub mod shortcuts;
pub mod storage;
pub mod store;
pub mod viewport;

pub use assets::{Asset, AssetMarker, AssetStatus, Call, CallStatus, MarkerEmphasis};
pub use drag::{Anchor, DragController, DragState, DragTarget};
pub use editor::Editor;
pub use geometry::{MIN_ZONE_SIZE, ZoneRect, clamp_position, clamp_rect};
pub use history::History;
pub use input::{Direction, Key, KeyPress, Modifiers};
pub use keyboard::{KeyboardNudger, Selection};
pub use plan::{AssetPosition, FloorId, FloorPlan, FloorPlans, Zone, ZoneId, ZoneType};
pub use session::FloorSession;
pub use shortcuts::{Action, Shortcut};
pub use storage::{FileStorage, MemoryStorage, PersistenceGateway, StorageError, StorageResult};
pub use store::{EditError, FloorPlanStore};
pub use viewport::{DisplayHost, HostError, Viewport};
