//! Web-Mercator projection between geographic coordinates and world pixels.

use std::f64::consts::PI;

pub(crate) const TILE_SIZE: f64 = 256.0;

/// Mercator clamps latitude; beyond this the projection diverges.
const MAX_LAT: f64 = 85.05112878;

pub(crate) fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Geographic coordinate to world pixel at the given (fractional) zoom.
pub(crate) fn project(lat: f64, lng: f64, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = lat.clamp(-MAX_LAT, MAX_LAT);
    let x = (lng + 180.0) / 360.0 * size;
    let sin_lat = (lat * PI / 180.0).sin();
    let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * size;
    (x, y)
}

/// World pixel back to geographic coordinate.
pub(crate) fn unproject(x: f64, y: f64, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * y / size);
    let lat = n.sinh().atan() * 180.0 / PI;
    (lat, lng)
}

/// Ground resolution at a latitude, for sizing radius circles in meters.
pub(crate) fn meters_per_pixel(lat: f64, zoom: f64) -> f64 {
    const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;
    EARTH_CIRCUMFERENCE_M * (lat * PI / 180.0).cos() / world_size(zoom)
}

#[cfg(test)]
mod tests {
    use super::{meters_per_pixel, project, unproject, world_size};

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn origin_projects_to_world_center() {
        let (x, y) = project(0.0, 0.0, 2.0);
        assert!(close(x, world_size(2.0) / 2.0, 1e-9));
        assert!(close(y, world_size(2.0) / 2.0, 1e-9));
    }

    #[test]
    fn project_unproject_round_trips() {
        for &(lat, lng) in &[(46.05, 14.5), (-33.86, 151.2), (0.0, 0.0), (60.0, -120.0)] {
            let (x, y) = project(lat, lng, 12.0);
            let (lat2, lng2) = unproject(x, y, 12.0);
            assert!(close(lat, lat2, 1e-9), "{lat} vs {lat2}");
            assert!(close(lng, lng2, 1e-9), "{lng} vs {lng2}");
        }
    }

    #[test]
    fn latitude_is_clamped() {
        let (_, y) = project(89.9, 0.0, 4.0);
        let (_, y_cap) = project(85.05112878, 0.0, 4.0);
        assert!(close(y, y_cap, 1e-9));
    }

    #[test]
    fn resolution_halves_per_zoom_level() {
        let a = meters_per_pixel(46.0, 10.0);
        let b = meters_per_pixel(46.0, 11.0);
        assert!(close(a / b, 2.0, 1e-9));
    }
}
