//! Live-tunable view knobs: where a selected facility lands on the map and
//! where its row lands in the list.
//!
//! Every setter clamps to the documented range and returns the value that
//! was actually stored. Non-finite or non-numeric input is logged and
//! ignored.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app_config::AppConfig;
use crate::{ConfigError, LatLng};

pub const ANCHOR_MIN: f64 = 0.05;
pub const ANCHOR_MAX: f64 = 0.95;
pub const SCROLL_BIAS_LIMIT: f64 = 0.45;

const DEFAULT_POPUP_MARGIN: f64 = 80.0;
const DEFAULT_MIN_SELECTION_ZOOM: f64 = 14.0;
const DEFAULT_POPUP_SETTLE: Duration = Duration::from_millis(240);
const DEFAULT_POPUP_RECHECK: Duration = Duration::from_millis(260);
const DEFAULT_SCROLL_DURATION: Duration = Duration::from_millis(120);
/// Seoul City Hall.
const DEFAULT_CENTER: LatLng = LatLng::new(37.5665, 126.9780);
const DEFAULT_ZOOM: f64 = 12.0;

/// Fractional screen position (left-to-right, top-to-bottom) where a
/// selected facility should appear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusAnchor {
    pub x: f64,
    pub y: f64,
}

impl Default for FocusAnchor {
    fn default() -> Self {
        Self { x: 0.3, y: 0.5 }
    }
}

/// The runtime knobs exposed to the debug console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKnob {
    AnchorX,
    AnchorY,
    ScrollBias,
    PopupAutoAdjust,
}

impl FromStr for ViewKnob {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anchor-x" | "anchor_x" | "horizontal" => Ok(Self::AnchorX),
            "anchor-y" | "anchor_y" | "vertical" => Ok(Self::AnchorY),
            "scroll-bias" | "scroll_bias" | "list-position" => Ok(Self::ScrollBias),
            "popup-auto-adjust" | "popup_auto_adjust" => Ok(Self::PopupAutoAdjust),
            other => Err(format!("unknown view knob '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    anchor: FocusAnchor,
    scroll_bias: f64,
    popup_margin: f64,
    popup_auto_adjust: bool,
    min_selection_zoom: f64,
    popup_settle: Duration,
    popup_recheck: Duration,
    scroll_duration: Duration,
    default_center: LatLng,
    default_zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            anchor: FocusAnchor::default(),
            scroll_bias: 0.0,
            popup_margin: DEFAULT_POPUP_MARGIN,
            popup_auto_adjust: false,
            min_selection_zoom: DEFAULT_MIN_SELECTION_ZOOM,
            popup_settle: DEFAULT_POPUP_SETTLE,
            popup_recheck: DEFAULT_POPUP_RECHECK,
            scroll_duration: DEFAULT_SCROLL_DURATION,
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
        }
    }
}

impl ViewConfig {
    /// Build a config from a parsed settings file, clamping every value
    /// through the same setters used at runtime.
    #[must_use]
    pub fn from_settings(settings: &ViewSettingsFile) -> Self {
        let mut config = Self::default();
        if let Some(anchor) = &settings.focus_anchor {
            if let Some(x) = anchor.x {
                config.set_anchor_x(x);
            }
            if let Some(y) = anchor.y {
                config.set_anchor_y(y);
            }
        }
        if let Some(bias) = settings.card_scroll_bias {
            config.set_scroll_bias(bias);
        }
        if let Some(margin) = settings.popup_margin {
            config.set_popup_margin(margin);
        }
        if let Some(enabled) = settings.popup_auto_adjust {
            config.set_popup_auto_adjust(enabled);
        }
        if let Some(center) = settings.default_center {
            config.default_center = center;
        }
        if let Some(zoom) = settings.default_zoom.filter(|z| z.is_finite()) {
            config.default_zoom = zoom;
        }
        config
    }

    /// Apply the timing values that come from the process environment.
    #[must_use]
    pub fn with_app_config(mut self, app: &AppConfig) -> Self {
        self.min_selection_zoom = app.min_selection_zoom;
        self.popup_settle = app.popup_settle;
        self.scroll_duration = app.scroll_duration;
        self
    }

    #[must_use]
    pub fn anchor(&self) -> FocusAnchor {
        self.anchor
    }

    #[must_use]
    pub fn scroll_bias(&self) -> f64 {
        self.scroll_bias
    }

    #[must_use]
    pub fn popup_margin(&self) -> f64 {
        self.popup_margin
    }

    #[must_use]
    pub fn popup_auto_adjust(&self) -> bool {
        self.popup_auto_adjust
    }

    #[must_use]
    pub fn min_selection_zoom(&self) -> f64 {
        self.min_selection_zoom
    }

    #[must_use]
    pub fn popup_settle(&self) -> Duration {
        self.popup_settle
    }

    /// Second collision check after the popup opens, covering late layout.
    #[must_use]
    pub fn popup_recheck(&self) -> Duration {
        self.popup_recheck
    }

    #[must_use]
    pub fn scroll_duration(&self) -> Duration {
        self.scroll_duration
    }

    #[must_use]
    pub fn default_center(&self) -> LatLng {
        self.default_center
    }

    #[must_use]
    pub fn default_zoom(&self) -> f64 {
        self.default_zoom
    }

    /// Returns the effective horizontal anchor after clamping.
    pub fn set_anchor_x(&mut self, value: f64) -> f64 {
        if let Some(v) = clamp_finite("anchor_x", value, ANCHOR_MIN, ANCHOR_MAX) {
            self.anchor.x = v;
            tracing::info!(anchor_x = v, "focus anchor updated");
        }
        self.anchor.x
    }

    /// Returns the effective vertical anchor after clamping.
    pub fn set_anchor_y(&mut self, value: f64) -> f64 {
        if let Some(v) = clamp_finite("anchor_y", value, ANCHOR_MIN, ANCHOR_MAX) {
            self.anchor.y = v;
            tracing::info!(anchor_y = v, "focus anchor updated");
        }
        self.anchor.y
    }

    /// Returns the effective list bias after clamping.
    pub fn set_scroll_bias(&mut self, value: f64) -> f64 {
        let limit = SCROLL_BIAS_LIMIT;
        if let Some(v) = clamp_finite("scroll_bias", value, -limit, limit) {
            self.scroll_bias = v;
            tracing::info!(scroll_bias = v, "list position updated");
        }
        self.scroll_bias
    }

    pub fn set_popup_margin(&mut self, value: f64) -> f64 {
        if let Some(v) = clamp_finite("popup_margin", value, 0.0, f64::MAX) {
            self.popup_margin = v;
        }
        self.popup_margin
    }

    pub fn set_popup_auto_adjust(&mut self, enabled: bool) -> bool {
        self.popup_auto_adjust = enabled;
        tracing::info!(enabled, "popup auto adjust toggled");
        self.popup_auto_adjust
    }

    /// Apply a knob from raw console text.
    ///
    /// Returns `true` when the input was accepted. Unparseable text is
    /// logged and leaves the config untouched.
    pub fn apply_knob(&mut self, knob: ViewKnob, raw: &str) -> bool {
        match knob {
            ViewKnob::PopupAutoAdjust => {
                let Some(enabled) = parse_flag(raw) else {
                    tracing::warn!(?knob, raw, "ignoring non-boolean knob input");
                    return false;
                };
                self.set_popup_auto_adjust(enabled);
            }
            ViewKnob::AnchorX => {
                let Some(value) = parse_knob_number(knob, raw) else {
                    return false;
                };
                self.set_anchor_x(value);
            }
            ViewKnob::AnchorY => {
                let Some(value) = parse_knob_number(knob, raw) else {
                    return false;
                };
                self.set_anchor_y(value);
            }
            ViewKnob::ScrollBias => {
                let Some(value) = parse_knob_number(knob, raw) else {
                    return false;
                };
                self.set_scroll_bias(value);
            }
        }
        true
    }

    /// One-line summary used by the "current values" console command.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Viewport=({:.2}, {:.2}), ListPos={:.2}",
            self.anchor.x, self.anchor.y, self.scroll_bias
        )
    }
}

fn clamp_finite(knob: &str, value: f64, min: f64, max: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value.clamp(min, max))
    } else {
        tracing::warn!(knob, value, "ignoring non-finite view setting");
        None
    }
}

fn parse_knob_number(knob: ViewKnob, raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        Ok(_) => {
            tracing::warn!(?knob, raw, "ignoring non-finite knob input");
            None
        }
        Err(_) => {
            tracing::warn!(?knob, raw, "ignoring non-numeric knob input");
            None
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialAnchor {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// On-disk view settings. Every field is optional; absent values keep
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettingsFile {
    pub focus_anchor: Option<PartialAnchor>,
    pub popup_margin: Option<f64>,
    pub card_scroll_bias: Option<f64>,
    pub popup_auto_adjust: Option<bool>,
    pub default_center: Option<LatLng>,
    pub default_zoom: Option<f64>,
}

/// Load view settings from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_view_settings(path: &Path) -> Result<ViewSettingsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ViewFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_view_settings(&content)
}

fn parse_view_settings(content: &str) -> Result<ViewSettingsFile, ConfigError> {
    if content.trim().is_empty() {
        return Ok(ViewSettingsFile::default());
    }
    serde_yaml::from_str(content).map_err(ConfigError::ViewFileParse)
}
