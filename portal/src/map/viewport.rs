use rog_shared::boundary::LatLngBounds;

use super::mercator;

pub(crate) const MIN_ZOOM: f64 = 3.0;
pub(crate) const MAX_ZOOM: f64 = 18.0;
const ZOOM_SENSITIVITY: f64 = 0.003;

/// Pan/zoom state of the map: a geographic center plus a fractional zoom.
/// Screen conversion is relative to the canvas size supplied per call, so
/// the viewport itself never stores pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MapViewport {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: f64,
}

impl Default for MapViewport {
    fn default() -> Self {
        // Slovenia-ish default until a boundary fit arrives.
        Self {
            center_lat: 46.05,
            center_lng: 14.5,
            zoom: 8.0,
        }
    }
}

impl MapViewport {
    pub(crate) fn centered(lat: f64, lng: f64, zoom: f64) -> Self {
        Self {
            center_lat: lat,
            center_lng: lng,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Geographic coordinate to canvas position.
    pub(crate) fn to_screen(&self, lat: f64, lng: f64, w: f64, h: f64) -> (f64, f64) {
        let (cx, cy) = mercator::project(self.center_lat, self.center_lng, self.zoom);
        let (x, y) = mercator::project(lat, lng, self.zoom);
        (x - cx + w / 2.0, y - cy + h / 2.0)
    }

    /// Canvas position back to a geographic coordinate.
    pub(crate) fn to_geo(&self, sx: f64, sy: f64, w: f64, h: f64) -> (f64, f64) {
        let (cx, cy) = mercator::project(self.center_lat, self.center_lng, self.zoom);
        mercator::unproject(cx + sx - w / 2.0, cy + sy - h / 2.0, self.zoom)
    }

    /// Pan by a screen-space delta (drag direction, content follows pointer).
    pub(crate) fn pan(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = mercator::project(self.center_lat, self.center_lng, self.zoom);
        let (lat, lng) = mercator::unproject(cx - dx, cy - dy, self.zoom);
        self.center_lat = lat;
        self.center_lng = lng;
    }

    /// Zoom toward a focus point so the geography under the cursor stays put.
    pub(crate) fn zoom_at(&mut self, delta: f64, sx: f64, sy: f64, w: f64, h: f64) {
        let (focus_lat, focus_lng) = self.to_geo(sx, sy, w, h);
        let new_zoom = (self.zoom - delta * ZOOM_SENSITIVITY).clamp(MIN_ZOOM, MAX_ZOOM);
        if new_zoom == self.zoom {
            return;
        }
        self.zoom = new_zoom;
        // Re-anchor the center so the focus point maps back to (sx, sy).
        let (fx, fy) = mercator::project(focus_lat, focus_lng, self.zoom);
        let (lat, lng) = mercator::unproject(fx - (sx - w / 2.0), fy - (sy - h / 2.0), self.zoom);
        self.center_lat = lat;
        self.center_lng = lng;
    }

    /// Fit the viewport to geographic bounds with a small padding margin.
    pub(crate) fn fit_bounds(&mut self, bounds: &LatLngBounds, w: f64, h: f64) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let (center_lat, center_lng) = bounds.center();
        self.center_lat = center_lat;
        self.center_lng = center_lng;

        // Measure the bounds extent in pixels at a reference zoom, then solve
        // for the zoom where it fits.
        const REF_ZOOM: f64 = 10.0;
        let (x1, y1) = mercator::project(bounds.max_lat, bounds.min_lng, REF_ZOOM);
        let (x2, y2) = mercator::project(bounds.min_lat, bounds.max_lng, REF_ZOOM);
        let extent_w = (x2 - x1).abs();
        let extent_h = (y2 - y1).abs();
        if extent_w <= 0.0 && extent_h <= 0.0 {
            self.zoom = 14.0;
            return;
        }

        let padding = 0.9;
        let fit_w = if extent_w > 0.0 { (w * padding / extent_w).log2() } else { f64::INFINITY };
        let fit_h = if extent_h > 0.0 { (h * padding / extent_h).log2() } else { f64::INFINITY };
        self.zoom = (REF_ZOOM + fit_w.min(fit_h)).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

#[cfg(test)]
mod tests {
    use super::MapViewport;
    use rog_shared::boundary::LatLngBounds;

    #[test]
    fn center_maps_to_canvas_center() {
        let vp = MapViewport::centered(46.05, 14.5, 12.0);
        let (x, y) = vp.to_screen(46.05, 14.5, 800.0, 600.0);
        assert!((x - 400.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn pan_moves_content_with_the_pointer() {
        let mut vp = MapViewport::centered(46.05, 14.5, 12.0);
        let before = vp.to_screen(46.05, 14.5, 800.0, 600.0);
        vp.pan(50.0, -20.0);
        let after = vp.to_screen(46.05, 14.5, 800.0, 600.0);
        assert!((after.0 - before.0 - 50.0).abs() < 1e-6);
        assert!((after.1 - before.1 + 20.0).abs() < 1e-6);
    }

    #[test]
    fn zoom_keeps_focus_point_fixed() {
        let mut vp = MapViewport::centered(46.05, 14.5, 10.0);
        let (focus_lat, focus_lng) = vp.to_geo(600.0, 150.0, 800.0, 600.0);
        vp.zoom_at(-400.0, 600.0, 150.0, 800.0, 600.0);
        let (sx, sy) = vp.to_screen(focus_lat, focus_lng, 800.0, 600.0);
        assert!((sx - 600.0).abs() < 1e-6);
        assert!((sy - 150.0).abs() < 1e-6);
    }

    #[test]
    fn fit_bounds_contains_the_bounds() {
        let bounds = LatLngBounds {
            min_lat: 45.9,
            min_lng: 14.3,
            max_lat: 46.2,
            max_lng: 14.8,
        };
        let mut vp = MapViewport::default();
        vp.fit_bounds(&bounds, 800.0, 600.0);
        for &(lat, lng) in &[
            (bounds.min_lat, bounds.min_lng),
            (bounds.max_lat, bounds.max_lng),
        ] {
            let (x, y) = vp.to_screen(lat, lng, 800.0, 600.0);
            assert!((0.0..=800.0).contains(&x), "x out of canvas: {x}");
            assert!((0.0..=600.0).contains(&y), "y out of canvas: {y}");
        }
    }
}
