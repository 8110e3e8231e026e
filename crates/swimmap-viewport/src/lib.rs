//! Selection and viewport synchronization for the facility map.
//!
//! A selected facility is shown twice: as a map marker and as a list row.
//! [`SelectionCoordinator`] keeps both in step, recenters the map so the
//! marker lands on the configured anchor ([`focus`]), scrolls the row to the
//! configured list position ([`scroll`]) and, when enabled, nudges the map so
//! the detail popup stays inside the viewport ([`popup`]).
//!
//! Everything runs on one event loop. Time is passed in explicitly as a
//! monotonic [`std::time::Duration`]; [`SelectionCoordinator::tick`] is the
//! animation-frame / timer hook.

pub mod error;
pub mod focus;
pub mod geometry;
pub mod mercator;
pub mod popup;
pub mod scroll;
pub mod selection;
pub mod surface;

pub use error::ViewportError;
pub use focus::{compute_focus_center, focus_on, resolve_focus_zoom, FocusRequest};
pub use geometry::{ScreenPoint, ScreenRect, ScreenSize};
pub use mercator::{MapRequest, MercatorMap};
pub use popup::{compute_shift, is_negligible_shift, max_shift_for_viewport};
pub use scroll::{ease_out_cubic, scroll_target, ScrollAnchorEngine, ScrollAnimation};
pub use selection::{Registry, SelectOptions, SelectionCoordinator, SelectionState};
pub use surface::{MapSurface, MarkerHandle, RowHandle, RowLayout, ScrollContainer};
