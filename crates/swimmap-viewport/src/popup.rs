//! Popup/viewport collision: how far to pan so an open popup sits inside
//! the map with a margin.

use crate::geometry::{ScreenPoint, ScreenRect, ScreenSize};

const MAX_SHIFT_FRACTION: f64 = 0.4;
const MAX_SHIFT_X: f64 = 250.0;
const MAX_SHIFT_Y: f64 = 220.0;

/// Computes the view pan that brings `popup` inside `viewport` inset by
/// `margin`, clamped component-wise to `±max_shift`.
///
/// Overflow past the left/top edge yields a negative component, past the
/// right/bottom edge a positive one. Panning the view by the result (see
/// [`crate::MapSurface::pan_by`]) moves the popup by its negation.
///
/// The axes are independent. A popup wider than the inset viewport
/// overflows on both sides and gets the sum of both corrections; that case
/// is left as-is rather than guessing which edge should win.
///
/// Degenerate (empty or non-finite) rectangles yield a zero shift.
#[must_use]
pub fn compute_shift(
    viewport: &ScreenRect,
    popup: &ScreenRect,
    margin: f64,
    max_shift: ScreenPoint,
) -> ScreenPoint {
    if viewport.is_degenerate() || popup.is_degenerate() {
        return ScreenPoint::ZERO;
    }
    let margin = if margin.is_finite() { margin } else { 0.0 };
    let mut shift = ScreenPoint::ZERO;

    let left_overlap = (viewport.left + margin) - popup.left;
    if left_overlap > 0.0 {
        shift.x -= left_overlap;
    }
    let right_overlap = popup.right() - (viewport.right() - margin);
    if right_overlap > 0.0 {
        shift.x += right_overlap;
    }

    let top_overlap = (viewport.top + margin) - popup.top;
    if top_overlap > 0.0 {
        shift.y -= top_overlap;
    }
    let bottom_overlap = popup.bottom() - (viewport.bottom() - margin);
    if bottom_overlap > 0.0 {
        shift.y += bottom_overlap;
    }

    ScreenPoint::new(
        clamp_symmetric(shift.x, max_shift.x),
        clamp_symmetric(shift.y, max_shift.y),
    )
}

fn clamp_symmetric(value: f64, limit: f64) -> f64 {
    let limit = if limit.is_finite() { limit.abs() } else { 0.0 };
    value.clamp(-limit, limit)
}

/// Largest correction allowed for a viewport: 40% of each dimension,
/// capped at 250 × 220 px.
#[must_use]
pub fn max_shift_for_viewport(size: ScreenSize) -> ScreenPoint {
    ScreenPoint::new(
        (size.width * MAX_SHIFT_FRACTION).min(MAX_SHIFT_X),
        (size.height * MAX_SHIFT_FRACTION).min(MAX_SHIFT_Y),
    )
}

/// Shifts under one pixel on both axes are not worth a pan.
#[must_use]
pub fn is_negligible_shift(shift: ScreenPoint) -> bool {
    shift.x.abs() < 1.0 && shift.y.abs() < 1.0
}
