pub mod app_config;
pub mod config;
pub mod facility;
pub mod view_config;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use facility::{
    amenity_badge, is_public_source, load_facilities, navigation_url, order_facilities,
    zoom_for_radius, AmenityBadge, Facility, FacilityFilter, NavigationPlatform,
};
pub use view_config::{
    load_view_settings, FocusAnchor, PartialAnchor, ViewConfig, ViewKnob, ViewSettingsFile,
};

/// A geographic coordinate in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read view settings from {path}: {source}")]
    ViewFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse view settings: {0}")]
    ViewFileParse(#[source] serde_yaml::Error),

    #[error("failed to read facilities from {path}: {source}")]
    FacilitiesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse facilities from {path}: {source}")]
    FacilitiesFileParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
