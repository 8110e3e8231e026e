//! Recentering the map so a target lands on an arbitrary screen anchor.

use swimmap_core::{FocusAnchor, LatLng};

use crate::error::ViewportError;
use crate::geometry::ScreenPoint;
use crate::surface::MapSurface;

/// What a focus call handed to the map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusRequest {
    pub center: LatLng,
    pub zoom: f64,
}

/// An explicit zoom wins; otherwise never zoom out below `min_zoom`.
#[must_use]
pub fn resolve_focus_zoom(requested: Option<f64>, current: f64, min_zoom: f64) -> f64 {
    requested
        .filter(|z| z.is_finite())
        .unwrap_or_else(|| current.max(min_zoom))
}

/// Map center that puts `target` at `anchor` (fractions of the viewport)
/// once the map is shown at `zoom`.
///
/// Projection happens at the target zoom, not the current one, so the
/// result is correct even when the recenter also changes zoom.
///
/// # Errors
///
/// Returns [`ViewportError::DegenerateViewport`] when the map has no area.
pub fn compute_focus_center<S: MapSurface + ?Sized>(
    map: &S,
    target: LatLng,
    anchor: FocusAnchor,
    zoom: f64,
) -> Result<LatLng, ViewportError> {
    let size = map.viewport_size();
    if size.is_degenerate() {
        return Err(ViewportError::DegenerateViewport {
            width: size.width,
            height: size.height,
        });
    }
    let offset = ScreenPoint::new(
        (anchor.x - 0.5) * size.width,
        (anchor.y - 0.5) * size.height,
    );
    let target_px = map.project(target, zoom);
    Ok(map.unproject(target_px - offset, zoom))
}

/// Resolve the zoom, compute the anchored center and request an animated
/// recenter.
///
/// # Errors
///
/// Returns [`ViewportError::DegenerateViewport`] without touching the map
/// when the viewport has no area.
pub fn focus_on<S: MapSurface + ?Sized>(
    map: &mut S,
    target: LatLng,
    anchor: FocusAnchor,
    zoom: Option<f64>,
    min_zoom: f64,
) -> Result<FocusRequest, ViewportError> {
    let zoom = resolve_focus_zoom(zoom, map.zoom(), min_zoom);
    let center = compute_focus_center(map, target, anchor, zoom)?;
    tracing::debug!(
        %target,
        %center,
        zoom,
        anchor_x = anchor.x,
        anchor_y = anchor.y,
        "focusing map"
    );
    map.set_center(center, zoom, true);
    Ok(FocusRequest { center, zoom })
}
