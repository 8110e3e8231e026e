//! Facility records as served by the pools API, plus the small pieces of
//! list glue that operate on them: ordering, source filtering, search-radius
//! zoom, amenity badges and outbound navigation links.

use std::path::Path;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, LatLng};

/// A swimming facility record.
///
/// Schedule and pricing fields are kept as raw JSON because several
/// historical shapes coexist; `swimmap-schedule` normalizes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub phone: Option<String>,
    /// Day → `"HH:MM-HH:MM"` / closed sentinel, in any supported shape.
    #[serde(default)]
    pub operating_hours: Option<serde_json::Value>,
    /// Day → list of session ranges.
    #[serde(default, alias = "free_swim_schedule")]
    pub free_swim_times: Option<serde_json::Value>,
    /// Category → audience → flat price or weekday/weekend pair.
    #[serde(default)]
    pub pricing: Option<serde_json::Value>,
    /// Legacy free-form price fields, either numeric strings or prose.
    #[serde(default)]
    pub free_swim_price: Option<serde_json::Value>,
    #[serde(default)]
    pub monthly_lesson_price: Option<serde_json::Value>,
    /// Amenity names (parking, sauna, ...).
    #[serde(default, rename = "facilities")]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Kilometres from the search origin, set by nearby queries only.
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Facility {
    #[must_use]
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Order facilities for display.
///
/// Sorts by ascending distance only when every record carries one;
/// otherwise provider order is kept.
pub fn order_facilities(facilities: &mut [Facility]) {
    if facilities.iter().all(|f| f.distance.is_some()) {
        facilities.sort_by(|a, b| {
            let da = a.distance.unwrap_or(f64::INFINITY);
            let db = b.distance.unwrap_or(f64::INFINITY);
            da.total_cmp(&db)
        });
    }
}

/// Whether a source label names a public operator.
#[must_use]
pub fn is_public_source(source: Option<&str>) -> bool {
    source.is_some_and(|s| ["공공", "서울시", "행정"].iter().any(|kw| s.contains(kw)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityFilter {
    #[default]
    All,
    Public,
    Private,
}

impl FacilityFilter {
    #[must_use]
    pub fn matches(self, facility: &Facility) -> bool {
        let source = facility.source.as_deref();
        match self {
            FacilityFilter::All => true,
            FacilityFilter::Public => is_public_source(source),
            FacilityFilter::Private => {
                source.is_some_and(|s| !s.trim().is_empty()) && !is_public_source(source)
            }
        }
    }
}

impl std::str::FromStr for FacilityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            other => Err(format!("unknown filter '{other}'")),
        }
    }
}

/// Map zoom that frames a nearby-search circle of `radius_km`.
#[must_use]
pub fn zoom_for_radius(radius_km: f64) -> f64 {
    match radius_km {
        r if r <= 2.0 => 15.0,
        r if r <= 3.0 => 14.0,
        r if r <= 5.0 => 13.0,
        r if r <= 10.0 => 12.0,
        r if r <= 15.0 => 11.0,
        r if r <= 25.0 => 10.0,
        _ => 9.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationPlatform {
    Naver,
    Kakao,
    Google,
}

/// Directions link for a facility on an external map service.
#[must_use]
pub fn navigation_url(facility: &Facility, platform: NavigationPlatform) -> String {
    let name = utf8_percent_encode(&facility.name, NON_ALPHANUMERIC).to_string();
    let (lat, lng) = (facility.lat, facility.lng);
    match platform {
        NavigationPlatform::Naver => {
            format!("https://map.naver.com/v5/search/{name}/place?c={lng},{lat},15,0,0,0,dh")
        }
        NavigationPlatform::Kakao => format!("https://map.kakao.com/link/to/{name},{lat},{lng}"),
        NavigationPlatform::Google => {
            format!("https://www.google.com/maps/dir/?api=1&destination={lat},{lng}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmenityBadge {
    pub icon: &'static str,
    pub label: String,
}

/// Icon and short label for an amenity name. Unknown amenities get a
/// check mark and their own name.
#[must_use]
pub fn amenity_badge(name: &str) -> AmenityBadge {
    let name = name.trim();
    let known = match name {
        "주차장" => Some(("🅿️", "주차")),
        "사우나" => Some(("♨️", "사우나")),
        "샤워실" => Some(("🚿", "샤워")),
        "카페" => Some(("☕", "카페")),
        "매점" => Some(("🍱", "매점")),
        "운동장" => Some(("🏃", "운동장")),
        "헬스장" => Some(("🏋️", "헬스")),
        "유아풀" => Some(("👶", "유아풀")),
        _ => None,
    };
    match known {
        Some((icon, label)) => AmenityBadge {
            icon,
            label: label.to_string(),
        },
        None => AmenityBadge {
            icon: "✅",
            label: name.to_string(),
        },
    }
}

/// Load a facility list from a JSON array file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or is not a JSON array
/// of facility records.
pub fn load_facilities(path: &Path) -> Result<Vec<Facility>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FacilitiesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let facilities: Vec<Facility> =
        serde_json::from_str(&content).map_err(|e| ConfigError::FacilitiesFileParse {
            path: path.display().to_string(),
            source: e,
        })?;
    tracing::debug!(path = %path.display(), count = facilities.len(), "loaded facilities");
    Ok(facilities)
}
