//! Headless Web-Mercator map surface.
//!
//! Uses the same projection as slippy-map widgets (256 px tiles, world
//! width `256 · 2^zoom`). Requests are applied immediately and recorded so
//! callers can inspect what the engine asked for.

use std::f64::consts::PI;

use swimmap_core::LatLng;

use crate::geometry::{ScreenPoint, ScreenRect, ScreenSize};
use crate::surface::MapSurface;

pub const TILE_SIZE: f64 = 256.0;
/// Latitude where the square Web-Mercator world ends.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

#[derive(Debug, Clone, PartialEq)]
pub enum MapRequest {
    SetCenter {
        center: LatLng,
        zoom: f64,
        animate: bool,
    },
    PanBy {
        delta: ScreenPoint,
        animate: bool,
    },
}

#[derive(Debug, Clone)]
pub struct MercatorMap {
    center: LatLng,
    zoom: f64,
    size: ScreenSize,
    origin: ScreenPoint,
    requests: Vec<MapRequest>,
}

impl MercatorMap {
    #[must_use]
    pub fn new(center: LatLng, zoom: f64, size: ScreenSize) -> Self {
        Self {
            center,
            zoom,
            size,
            origin: ScreenPoint::ZERO,
            requests: Vec::new(),
        }
    }

    /// Place the map container at `origin` in page coordinates.
    #[must_use]
    pub fn with_origin(mut self, origin: ScreenPoint) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn resize(&mut self, size: ScreenSize) {
        self.size = size;
    }

    #[must_use]
    pub fn requests(&self) -> &[MapRequest] {
        &self.requests
    }

    /// Page position of `point` given the current center and zoom.
    #[must_use]
    pub fn screen_position(&self, point: LatLng) -> ScreenPoint {
        let center_px = self.project(self.center, self.zoom);
        let px = self.project(point, self.zoom);
        let half = ScreenPoint::new(self.size.width / 2.0, self.size.height / 2.0);
        px - center_px + half + self.origin
    }
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

impl MapSurface for MercatorMap {
    fn project(&self, point: LatLng, zoom: f64) -> ScreenPoint {
        let scale = world_size(zoom);
        let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (point.lng + 180.0) / 360.0 * scale;
        let sin = lat.sin();
        let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * scale;
        ScreenPoint::new(x, y)
    }

    fn unproject(&self, pixel: ScreenPoint, zoom: f64) -> LatLng {
        let scale = world_size(zoom);
        let lng = pixel.x / scale * 360.0 - 180.0;
        let n = PI - 2.0 * PI * pixel.y / scale;
        let lat = n.sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }

    fn set_center(&mut self, center: LatLng, zoom: f64, animate: bool) {
        self.center = center;
        self.zoom = zoom;
        self.requests.push(MapRequest::SetCenter {
            center,
            zoom,
            animate,
        });
    }

    fn pan_by(&mut self, delta: ScreenPoint, animate: bool) {
        let center_px = self.project(self.center, self.zoom);
        self.center = self.unproject(center_px + delta, self.zoom);
        self.requests.push(MapRequest::PanBy { delta, animate });
    }

    fn viewport_size(&self) -> ScreenSize {
        self.size
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn container_rect(&self) -> ScreenRect {
        ScreenRect::new(
            self.origin.x,
            self.origin.y,
            self.size.width,
            self.size.height,
        )
    }
}
