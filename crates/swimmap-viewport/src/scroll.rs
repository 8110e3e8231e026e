//! Scrolling the result list so the selected row sits at a biased
//! position, with a short eased animation.

use std::time::Duration;

use crate::surface::{RowLayout, ScrollContainer};

/// Never park a row closer than this to the container's top edge.
pub const MIN_TOP_MARGIN: f64 = 20.0;
/// Smaller moves are skipped entirely.
pub const MIN_SCROLL_DELTA: f64 = 4.0;

const ANCHOR_MIN: f64 = 0.1;
const ANCHOR_MAX: f64 = 0.9;

/// Snapshot of a scroll container's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    pub fn of<C: ScrollContainer + ?Sized>(container: &C) -> Self {
        Self {
            scroll_top: container.scroll_top(),
            client_height: container.client_height(),
            scroll_height: container.scroll_height(),
        }
    }

    fn max_offset(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

/// Fraction of the container height where the row's middle should land.
#[must_use]
pub fn anchor_fraction(bias: f64) -> f64 {
    let bias = if bias.is_finite() { bias } else { 0.0 };
    (0.5 + bias).clamp(ANCHOR_MIN, ANCHOR_MAX)
}

/// Scroll offset that places `row` at the biased position.
#[must_use]
pub fn scroll_target(row: RowLayout, metrics: ScrollMetrics, bias: f64) -> f64 {
    let anchor = anchor_fraction(bias);
    let mut target = row.top - metrics.client_height * anchor + row.height / 2.0;
    if target > row.top - MIN_TOP_MARGIN {
        target = (row.top - MIN_TOP_MARGIN).max(0.0);
    }
    target.clamp(0.0, metrics.max_offset())
}

/// `1 − (1 − p)³`, with `p` clamped to `[0, 1]`.
#[must_use]
pub fn ease_out_cubic(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub from: f64,
    pub to: f64,
    pub started_at: Duration,
    pub duration: Duration,
}

impl ScrollAnimation {
    #[must_use]
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    #[must_use]
    pub fn offset_at(&self, now: Duration) -> f64 {
        self.from + (self.to - self.from) * ease_out_cubic(self.progress(now))
    }

    #[must_use]
    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Drives at most one scroll animation; a new request replaces the running
/// one and starts from the live offset.
#[derive(Debug, Clone)]
pub struct ScrollAnchorEngine {
    active: Option<ScrollAnimation>,
    duration: Duration,
}

impl ScrollAnchorEngine {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            active: None,
            duration,
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn active(&self) -> Option<&ScrollAnimation> {
        self.active.as_ref()
    }

    /// Start scrolling towards `row`. Returns `false` when the row is
    /// already close enough and nothing moves.
    pub fn scroll_to_row<C: ScrollContainer + ?Sized>(
        &mut self,
        container: &mut C,
        row: RowLayout,
        bias: f64,
        now: Duration,
    ) -> bool {
        let metrics = ScrollMetrics::of(container);
        let target = scroll_target(row, metrics, bias);
        if (target - metrics.scroll_top).abs() < MIN_SCROLL_DELTA {
            return false;
        }
        if self.duration.is_zero() {
            self.active = None;
            container.set_scroll_top(target);
            return true;
        }
        self.active = Some(ScrollAnimation {
            from: metrics.scroll_top,
            to: target,
            started_at: now,
            duration: self.duration,
        });
        tracing::trace!(from = metrics.scroll_top, to = target, "list scroll started");
        true
    }

    /// Advance one animation frame. Returns `true` while more frames are
    /// needed.
    pub fn on_frame<C: ScrollContainer + ?Sized>(
        &mut self,
        container: &mut C,
        now: Duration,
    ) -> bool {
        let Some(anim) = self.active else {
            return false;
        };
        container.set_scroll_top(anim.offset_at(now));
        if anim.is_finished(now) {
            self.active = None;
            return false;
        }
        true
    }
}
