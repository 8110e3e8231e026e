//! Capabilities the engine needs from whatever renders the map and list.
//!
//! The engine never touches tiles, DOM nodes or widgets directly; a
//! rendering layer implements these traits over its own objects.

use swimmap_core::LatLng;

use crate::geometry::{ScreenPoint, ScreenRect, ScreenSize};

/// The map widget.
///
/// `pan_by(delta)` moves the view center by `delta` pixels, so on-screen
/// content moves by `-delta`.
pub trait MapSurface {
    /// World pixel coordinate of `point` at `zoom`.
    fn project(&self, point: LatLng, zoom: f64) -> ScreenPoint;
    fn unproject(&self, pixel: ScreenPoint, zoom: f64) -> LatLng;
    fn set_center(&mut self, center: LatLng, zoom: f64, animate: bool);
    fn pan_by(&mut self, delta: ScreenPoint, animate: bool);
    fn viewport_size(&self) -> ScreenSize;
    fn zoom(&self) -> f64;

    /// Bounding rectangle of the map container, in the same space as popup
    /// bounds.
    fn container_rect(&self) -> ScreenRect {
        let size = self.viewport_size();
        ScreenRect::new(0.0, 0.0, size.width, size.height)
    }
}

/// One facility marker and its detail popup.
pub trait MarkerHandle {
    fn position(&self) -> LatLng;
    fn set_highlighted(&mut self, highlighted: bool);
    fn set_selected(&mut self, selected: bool);
    fn open_popup(&mut self);
    fn close_popup(&mut self);
    /// Bounding rectangle of the open popup, `None` when it is closed or
    /// not laid out yet.
    fn popup_bounds(&self) -> Option<ScreenRect>;
}

/// Position of a row inside its scroll container's content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowLayout {
    pub top: f64,
    pub height: f64,
}

/// One facility row in the result list.
pub trait RowHandle {
    fn layout(&self) -> RowLayout;
    fn set_highlighted(&mut self, highlighted: bool);
    fn set_selected(&mut self, selected: bool);
}

/// The scrollable element that holds the rows.
pub trait ScrollContainer {
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&mut self, offset: f64);
    /// Visible height.
    fn client_height(&self) -> f64;
    /// Total content height.
    fn scroll_height(&self) -> f64;
}
