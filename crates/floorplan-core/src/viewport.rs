//! Zoom/pan presentation state for the floor-plan view.
//!
//! Nothing here touches the document; the viewport only decides how the
//! plan is drawn and how screen positions map back onto it.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest allowed zoom level.
pub const MIN_ZOOM: f64 = 0.5;
/// Largest allowed zoom level.
pub const MAX_ZOOM: f64 = 3.0;
/// Zoom level that corresponds to "100%".
pub const DEFAULT_ZOOM: f64 = 1.0;
/// Zoom change per zoom-in/zoom-out step.
pub const ZOOM_STEP: f64 = 0.1;

/// Failure reported by the host platform.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Fullscreen request denied: {0}")]
    Denied(String),
    #[error("Fullscreen not supported")]
    Unsupported,
}

/// Platform capability for taking over the whole display.
///
/// Browsers, native windows and headless hosts implement this differently.
pub trait DisplayHost {
    /// Enter fullscreen.
    fn acquire(&mut self) -> Result<(), HostError>;
    /// Leave fullscreen.
    fn release(&mut self) -> Result<(), HostError>;
}

/// Viewport manages the view transform for the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current zoom level, always within `[MIN_ZOOM, MAX_ZOOM]`.
    zoom: f64,
    /// Current translation offset in pixels.
    pub pan: Vec2,
    /// Whether the view currently occupies the whole display.
    fullscreen: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            pan: Vec2::ZERO,
            fullscreen: false,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom level, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            DEFAULT_ZOOM
        };
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Reset zoom and pan to defaults.
    pub fn zoom_reset(&mut self) {
        self.zoom = DEFAULT_ZOOM;
        self.pan = Vec2::ZERO;
    }

    /// Scale the content so it fits inside the container, and reset pan.
    pub fn zoom_to_fit(&mut self, container: Size, content: Size) {
        if content.width <= 0.0 || content.height <= 0.0 {
            self.zoom_reset();
            return;
        }
        let scale = (container.width / content.width)
            .min(container.height / content.height)
            .min(MAX_ZOOM);
        self.set_zoom(scale);
        self.pan = Vec2::ZERO;
    }

    /// Translate the view by a pixel delta. Unclamped.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    /// Render transform: `scale(zoom) · translate(pan)`, origin top-left.
    ///
    /// Maps unscaled container pixels to screen pixels.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.zoom) * Affine::translate(self.pan)
    }

    /// Maps screen pixels back to unscaled container pixels.
    pub fn inverse_transform(&self) -> Affine {
        Affine::translate(-self.pan) * Affine::scale(1.0 / self.zoom)
    }

    pub fn screen_to_content(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn content_to_screen(&self, content_point: Point) -> Point {
        self.transform() * content_point
    }

    /// Convert a screen point to plan percent coordinates for a container of
    /// the given (unscaled) size.
    pub fn screen_to_percent(&self, screen_point: Point, container: Size) -> Point {
        let content = self.screen_to_content(screen_point);
        Point::new(
            content.x / container.width * 100.0,
            content.y / container.height * 100.0,
        )
    }

    /// Pan so that a plan point (percent) lands in the middle of the container
    /// at the current zoom.
    pub fn center_on(&mut self, point_percent: Point, container: Size) {
        let content = Point::new(
            point_percent.x / 100.0 * container.width,
            point_percent.y / 100.0 * container.height,
        );
        self.pan = Vec2::new(
            container.width / (2.0 * self.zoom) - content.x,
            container.height / (2.0 * self.zoom) - content.y,
        );
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Enter or leave fullscreen through the host.
    ///
    /// On failure the flag keeps its previous value and the error is returned.
    pub fn toggle_fullscreen(&mut self, host: &mut dyn DisplayHost) -> Result<bool, HostError> {
        let result = if self.fullscreen {
            host.release()
        } else {
            host.acquire()
        };
        match result {
            Ok(()) => {
                self.fullscreen = !self.fullscreen;
                Ok(self.fullscreen)
            }
            Err(err) => {
                log::warn!("Fullscreen toggle failed: {}", err);
                Err(err)
            }
        }
    }

    /// Sync the fullscreen flag with a change the host made on its own
    /// (e.g. the user pressed the platform's exit key).
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    struct FakeHost {
        allow: bool,
        acquired: bool,
    }

    impl DisplayHost for FakeHost {
        fn acquire(&mut self) -> Result<(), HostError> {
            if self.allow {
                self.acquired = true;
                Ok(())
            } else {
                Err(HostError::Denied("permission".to_string()))
            }
        }

        fn release(&mut self) -> Result<(), HostError> {
            self.acquired = false;
            Ok(())
        }
    }

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::new();
        assert_eq!(viewport.pan, Vec2::ZERO);
        assert!((viewport.zoom() - DEFAULT_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_five_zoom_in_steps() {
        let mut viewport = Viewport::new();
        for _ in 0..5 {
            viewport.zoom_in();
        }
        assert!((viewport.zoom() - 1.5).abs() < EPS);
    }

    #[test]
    fn test_zoom_in_clamps_at_max() {
        let mut viewport = Viewport::new();
        for _ in 0..20 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.zoom(), MAX_ZOOM);
    }

    #[test]
    fn test_zoom_out_clamps_at_min() {
        let mut viewport = Viewport::new();
        for _ in 0..50 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_zoom_reset() {
        let mut viewport = Viewport::new();
        viewport.zoom_in();
        viewport.pan_by(Vec2::new(30.0, -12.0));
        viewport.zoom_reset();
        assert_eq!(viewport.zoom(), DEFAULT_ZOOM);
        assert_eq!(viewport.pan, Vec2::ZERO);
    }

    #[test]
    fn test_zoom_to_fit() {
        let mut viewport = Viewport::new();
        viewport.pan_by(Vec2::new(5.0, 5.0));
        viewport.zoom_to_fit(Size::new(1200.0, 1200.0), Size::new(800.0, 600.0));
        assert!((viewport.zoom() - 1.5).abs() < EPS);
        assert_eq!(viewport.pan, Vec2::ZERO);
    }

    #[test]
    fn test_zoom_to_fit_stays_in_range() {
        let mut viewport = Viewport::new();
        viewport.zoom_to_fit(Size::new(10_000.0, 10_000.0), Size::new(800.0, 600.0));
        assert_eq!(viewport.zoom(), MAX_ZOOM);

        viewport.zoom_to_fit(Size::new(100.0, 100.0), Size::new(800.0, 600.0));
        assert_eq!(viewport.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_transform_scales_then_translates() {
        let mut viewport = Viewport::new();
        viewport.set_zoom(2.0);
        viewport.set_pan(Vec2::new(10.0, 20.0));
        let screen = viewport.content_to_screen(Point::new(5.0, 5.0));
        assert!((screen.x - 30.0).abs() < EPS);
        assert!((screen.y - 50.0).abs() < EPS);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = Viewport::new();
        viewport.set_pan(Vec2::new(30.0, -20.0));
        viewport.set_zoom(1.5);

        let original = Point::new(123.0, 456.0);
        let back = viewport.content_to_screen(viewport.screen_to_content(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_center_on_places_point_in_middle() {
        let mut viewport = Viewport::new();
        viewport.set_zoom(2.0);
        let container = Size::new(800.0, 600.0);
        let target = Point::new(25.0, 75.0);
        viewport.center_on(target, container);

        let content = Point::new(0.25 * 800.0, 0.75 * 600.0);
        let screen = viewport.content_to_screen(content);
        assert!((screen.x - 400.0).abs() < EPS);
        assert!((screen.y - 300.0).abs() < EPS);
    }

    #[test]
    fn test_screen_to_percent() {
        let viewport = Viewport::new();
        let point = viewport.screen_to_percent(Point::new(400.0, 150.0), Size::new(800.0, 600.0));
        assert!((point.x - 50.0).abs() < EPS);
        assert!((point.y - 25.0).abs() < EPS);
    }

    #[test]
    fn test_fullscreen_denied_keeps_state() {
        let mut viewport = Viewport::new();
        let mut host = FakeHost {
            allow: false,
            acquired: false,
        };
        assert!(viewport.toggle_fullscreen(&mut host).is_err());
        assert!(!viewport.is_fullscreen());
    }

    #[test]
    fn test_fullscreen_toggle() {
        let mut viewport = Viewport::new();
        let mut host = FakeHost {
            allow: true,
            acquired: false,
        };
        assert_eq!(viewport.toggle_fullscreen(&mut host), Ok(true));
        assert!(host.acquired);
        assert_eq!(viewport.toggle_fullscreen(&mut host), Ok(false));
        assert!(!host.acquired);
    }
}
