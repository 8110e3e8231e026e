//! The single source of truth for which facility is selected.
//!
//! Markers and rows are index-aligned (1-based, matching the numbers shown
//! on the map and in the list). Selecting clears the previous pair's
//! flags before setting the new pair's, so at most one marker and one row
//! are ever selected and they always share an index.

use std::time::Duration;

use swimmap_core::{ViewConfig, ViewKnob};

use crate::error::ViewportError;
use crate::focus::focus_on;
use crate::geometry::ScreenPoint;
use crate::popup::{compute_shift, is_negligible_shift, max_shift_for_viewport};
use crate::scroll::ScrollAnchorEngine;
use crate::surface::{MapSurface, MarkerHandle, RowHandle, ScrollContainer};

/// Markers and rows for one result set.
#[derive(Debug)]
pub struct Registry<M, R> {
    markers: Vec<M>,
    rows: Vec<R>,
}

impl<M, R> Default for Registry<M, R> {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            rows: Vec::new(),
        }
    }
}

impl<M, R> Registry<M, R> {
    /// Element `i` of each vector belongs to facility `i + 1`.
    #[must_use]
    pub fn new(markers: Vec<M>, rows: Vec<R>) -> Self {
        if markers.len() != rows.len() {
            tracing::debug!(
                markers = markers.len(),
                rows = rows.len(),
                "registry sides differ in length"
            );
        }
        Self { markers, rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len().max(self.rows.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn marker(&self, index: usize) -> Option<&M> {
        index.checked_sub(1).and_then(|i| self.markers.get(i))
    }

    pub fn marker_mut(&mut self, index: usize) -> Option<&mut M> {
        index.checked_sub(1).and_then(|i| self.markers.get_mut(i))
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&R> {
        index.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut R> {
        index.checked_sub(1).and_then(|i| self.rows.get_mut(i))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    NoneSelected,
    Selected(usize),
}

impl SelectionState {
    #[must_use]
    pub fn selected_index(self) -> Option<usize> {
        match self {
            Self::NoneSelected => None,
            Self::Selected(index) => Some(index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectOptions {
    pub focus_map: bool,
    pub open_popup: bool,
    /// Explicit zoom for the recenter; `None` keeps the current zoom but
    /// never goes below the minimum selection zoom.
    pub zoom: Option<f64>,
}

impl SelectOptions {
    #[must_use]
    pub const fn marker_click() -> Self {
        Self {
            focus_map: true,
            open_popup: true,
            zoom: None,
        }
    }

    /// Rows are clicked from the list, usually far from the current view,
    /// so they zoom in closer.
    #[must_use]
    pub const fn row_click() -> Self {
        Self {
            focus_map: true,
            open_popup: true,
            zoom: Some(16.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    OpenPopup(usize),
    AdjustPopup(usize),
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    due: Duration,
    action: Deferred,
}

/// Keeps the selected marker, row, map center and list scroll in step.
pub struct SelectionCoordinator<S, C, M, R> {
    map: S,
    list: C,
    registry: Registry<M, R>,
    config: ViewConfig,
    state: SelectionState,
    scroll: ScrollAnchorEngine,
    timers: Vec<Timer>,
}

impl<S, C, M, R> SelectionCoordinator<S, C, M, R>
where
    S: MapSurface,
    C: ScrollContainer,
    M: MarkerHandle,
    R: RowHandle,
{
    pub fn new(map: S, list: C, config: ViewConfig) -> Self {
        let scroll = ScrollAnchorEngine::new(config.scroll_duration());
        Self {
            map,
            list,
            registry: Registry::default(),
            config,
            state: SelectionState::NoneSelected,
            scroll,
            timers: Vec::new(),
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected_index()
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn map(&self) -> &S {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut S {
        &mut self.map
    }

    pub fn list(&self) -> &C {
        &self.list
    }

    pub fn registry(&self) -> &Registry<M, R> {
        &self.registry
    }

    /// Whether timers or a scroll animation still need [`Self::tick`].
    pub fn has_pending_work(&self) -> bool {
        !self.timers.is_empty() || self.scroll.is_animating()
    }

    /// Swap in a new result set. Selection is cleared and pending popup
    /// work for the old set is dropped. With `auto_select`, facility 1 is
    /// selected right away.
    pub fn replace_results(
        &mut self,
        registry: Registry<M, R>,
        auto_select: Option<SelectOptions>,
        now: Duration,
    ) {
        self.registry = registry;
        self.state = SelectionState::NoneSelected;
        self.timers.clear();
        self.scroll = ScrollAnchorEngine::new(self.config.scroll_duration());
        tracing::debug!(count = self.registry.len(), "result set replaced");

        if let Some(options) = auto_select {
            if !self.registry.is_empty() {
                self.select(1, options, now);
            }
        }
    }

    pub fn select(&mut self, index: usize, options: SelectOptions, now: Duration) {
        if index == 0 {
            tracing::debug!("ignoring selection of index 0");
            return;
        }

        // Popup work belongs to the selection that scheduled it.
        if !self.timers.is_empty() {
            tracing::debug!(pending = self.timers.len(), "dropping superseded popup timers");
            self.timers.clear();
        }

        if let Some(previous) = self.state.selected_index() {
            if let Some(row) = self.registry.row_mut(previous) {
                row.set_selected(false);
            }
            if let Some(marker) = self.registry.marker_mut(previous) {
                marker.set_selected(false);
                if previous != index {
                    marker.close_popup();
                }
            }
        }

        self.state = SelectionState::Selected(index);
        tracing::debug!(
            index,
            focus_map = options.focus_map,
            open_popup = options.open_popup,
            "facility selected"
        );

        match self.registry.row_mut(index) {
            Some(row) => {
                row.set_highlighted(false);
                row.set_selected(true);
                let layout = row.layout();
                self.scroll
                    .scroll_to_row(&mut self.list, layout, self.config.scroll_bias(), now);
            }
            None => report_missing(index, "row"),
        }

        let Some(marker) = self.registry.marker_mut(index) else {
            report_missing(index, "marker");
            return;
        };
        marker.set_highlighted(false);
        marker.set_selected(true);

        if options.focus_map {
            self.focus_marker(index, options.open_popup, options.zoom, now);
        } else if options.open_popup {
            self.open_popup_now(index, now);
        }
    }

    /// Re-run the focus for the current selection, e.g. after the anchor
    /// changed. Reopens the popup after the settle delay.
    pub fn recenter_selected(&mut self, now: Duration) {
        if let Some(index) = self.state.selected_index() {
            self.focus_marker(index, true, None, now);
        }
    }

    /// Scroll the selected row back to the configured list position.
    pub fn rescroll_selected(&mut self, now: Duration) {
        let Some(index) = self.state.selected_index() else {
            return;
        };
        if let Some(row) = self.registry.row(index) {
            let layout = row.layout();
            self.scroll
                .scroll_to_row(&mut self.list, layout, self.config.scroll_bias(), now);
        }
    }

    pub fn hover_enter(&mut self, index: usize) {
        self.set_hover(index, true);
    }

    pub fn hover_leave(&mut self, index: usize) {
        self.set_hover(index, false);
    }

    fn set_hover(&mut self, index: usize, highlighted: bool) {
        if self.state.selected_index() == Some(index) {
            return;
        }
        if let Some(marker) = self.registry.marker_mut(index) {
            marker.set_highlighted(highlighted);
        }
        if let Some(row) = self.registry.row_mut(index) {
            row.set_highlighted(highlighted);
        }
    }

    /// Animation-frame and timer hook. Runs every deferred action due at
    /// `now` (in due order), then advances the list scroll.
    pub fn tick(&mut self, now: Duration) {
        let (mut due, pending): (Vec<Timer>, Vec<Timer>) =
            self.timers.drain(..).partition(|t| t.due <= now);
        self.timers = pending;
        due.sort_by_key(|t| t.due);

        for timer in due {
            match timer.action {
                Deferred::OpenPopup(index) => {
                    if self.state.selected_index() == Some(index) {
                        self.open_popup_now(index, now);
                    } else {
                        tracing::debug!(index, "skipping popup for a stale selection");
                    }
                }
                Deferred::AdjustPopup(index) => {
                    if self.state.selected_index() == Some(index)
                        && self.config.popup_auto_adjust()
                    {
                        self.ensure_popup_visible(index);
                    }
                }
            }
        }

        self.scroll.on_frame(&mut self.list, now);
    }

    /// Pan the map so the popup of `index` sits inside the viewport margin.
    /// Returns the shift applied, `None` when nothing moved.
    pub fn ensure_popup_visible(&mut self, index: usize) -> Option<ScreenPoint> {
        let popup = self.registry.marker(index)?.popup_bounds()?;
        let viewport = self.map.container_rect();
        let max_shift = max_shift_for_viewport(self.map.viewport_size());
        let shift = compute_shift(&viewport, &popup, self.config.popup_margin(), max_shift);
        if is_negligible_shift(shift) {
            return None;
        }
        tracing::debug!(index, dx = shift.x, dy = shift.y, "panning to fit popup");
        self.map.pan_by(shift, true);
        Some(shift)
    }

    /// Recenters only when the stored anchor actually changed.
    pub fn set_anchor_x(&mut self, value: f64, now: Duration) -> f64 {
        let before = self.config.anchor();
        let effective = self.config.set_anchor_x(value);
        if self.config.anchor() != before {
            self.recenter_selected(now);
        }
        effective
    }

    pub fn set_anchor_y(&mut self, value: f64, now: Duration) -> f64 {
        let before = self.config.anchor();
        let effective = self.config.set_anchor_y(value);
        if self.config.anchor() != before {
            self.recenter_selected(now);
        }
        effective
    }

    pub fn set_scroll_bias(&mut self, value: f64, now: Duration) -> f64 {
        let effective = self.config.set_scroll_bias(value);
        self.rescroll_selected(now);
        effective
    }

    pub fn set_popup_auto_adjust(&mut self, enabled: bool, now: Duration) -> bool {
        let effective = self.config.set_popup_auto_adjust(enabled);
        if effective {
            if let Some(index) = self.state.selected_index() {
                self.schedule(now, Deferred::AdjustPopup(index));
            }
        }
        effective
    }

    /// Console entry point: parse `raw` for `knob` and apply it, with the
    /// same follow-up as the typed setters. Returns `false` when the input
    /// was rejected.
    pub fn apply_knob(&mut self, knob: ViewKnob, raw: &str, now: Duration) -> bool {
        let anchor_before = self.config.anchor();
        if !self.config.apply_knob(knob, raw) {
            return false;
        }
        match knob {
            ViewKnob::AnchorX | ViewKnob::AnchorY => {
                if self.config.anchor() != anchor_before {
                    self.recenter_selected(now);
                }
            }
            ViewKnob::ScrollBias => self.rescroll_selected(now),
            ViewKnob::PopupAutoAdjust => {
                if let (true, Some(index)) =
                    (self.config.popup_auto_adjust(), self.state.selected_index())
                {
                    self.schedule(now, Deferred::AdjustPopup(index));
                }
            }
        }
        true
    }

    pub fn log_focus_settings(&self) {
        let anchor = self.config.anchor();
        tracing::info!(
            anchor_x = anchor.x,
            anchor_y = anchor.y,
            scroll_bias = self.config.scroll_bias(),
            "current focus settings: {}",
            self.config.summary()
        );
    }

    fn focus_marker(
        &mut self,
        index: usize,
        open_popup: bool,
        zoom: Option<f64>,
        now: Duration,
    ) {
        let Some(marker) = self.registry.marker(index) else {
            report_missing(index, "marker");
            return;
        };
        let target = marker.position();
        let focused = focus_on(
            &mut self.map,
            target,
            self.config.anchor(),
            zoom,
            self.config.min_selection_zoom(),
        );

        match focused {
            Ok(_) if open_popup => {
                let due = now + self.config.popup_settle();
                self.schedule(due, Deferred::OpenPopup(index));
            }
            Ok(_) => self.schedule_popup_adjustments(index, now),
            Err(e) => {
                tracing::debug!(index, error = %e, "focus skipped");
                if open_popup {
                    self.open_popup_now(index, now);
                }
            }
        }
    }

    fn open_popup_now(&mut self, index: usize, now: Duration) {
        if let Some(marker) = self.registry.marker_mut(index) {
            marker.open_popup();
        }
        self.schedule_popup_adjustments(index, now);
    }

    /// One check on the next frame, one after late layout has settled.
    fn schedule_popup_adjustments(&mut self, index: usize, now: Duration) {
        if !self.config.popup_auto_adjust() {
            return;
        }
        self.schedule(now, Deferred::AdjustPopup(index));
        self.schedule(
            now + self.config.popup_recheck(),
            Deferred::AdjustPopup(index),
        );
    }

    fn schedule(&mut self, due: Duration, action: Deferred) {
        self.timers.push(Timer { due, action });
    }
}

fn report_missing(index: usize, side: &'static str) {
    let e = ViewportError::MissingRegistryEntry { index, side };
    tracing::debug!(error = %e, "selection continues without it");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_one_based() {
        let registry: Registry<&str, &str> = Registry::new(vec!["m1", "m2"], vec!["r1", "r2"]);
        assert_eq!(registry.marker(1), Some(&"m1"));
        assert_eq!(registry.row(2), Some(&"r2"));
        assert_eq!(registry.marker(0), None);
        assert_eq!(registry.row(3), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registry_length_counts_longer_side() {
        let registry: Registry<u8, u8> = Registry::new(vec![1, 2, 3], vec![1]);
        assert_eq!(registry.len(), 3);
        assert!(registry.row(2).is_none());
    }

    #[test]
    fn click_options() {
        assert_eq!(SelectOptions::marker_click().zoom, None);
        assert_eq!(SelectOptions::row_click().zoom, Some(16.0));
        assert!(SelectOptions::row_click().focus_map);
        assert_eq!(SelectionState::Selected(3).selected_index(), Some(3));
        assert_eq!(SelectionState::default().selected_index(), None);
    }
}
