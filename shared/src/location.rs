use serde::{Deserialize, Serialize};

use crate::num::FlexNum;

pub const DEFAULT_APPROX_RADIUS_M: f64 = 1000.0;

/// How a hunter chose to share their location for a hunt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    PrivateText,
    Poi,
    Approx,
}

/// Raw location fields as they arrive on hunt records. Lat/lng values may be
/// numbers or strings; `resolve` is the only way these should reach the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationFields {
    pub location_mode: Option<LocationMode>,
    pub lat: FlexNum,
    pub lng: FlexNum,
    pub approx_lat: FlexNum,
    pub approx_lng: FlexNum,
    pub approx_radius_m: FlexNum,
    pub location_name: Option<String>,
    pub poi_type: Option<String>,
    pub poi_name: Option<String>,
}

/// Closed resolution of a location record. Every view that shows a location
/// consumes this, never the raw fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedLocation {
    /// Private or unresolvable: nothing may be shown, even if stray
    /// coordinates are present on the record.
    Hidden,
    Poi {
        lat: f64,
        lng: f64,
    },
    Approx {
        lat: f64,
        lng: f64,
        radius_m: f64,
    },
}

impl ResolvedLocation {
    pub fn coords(&self) -> Option<(f64, f64)> {
        match *self {
            ResolvedLocation::Hidden => None,
            ResolvedLocation::Poi { lat, lng } => Some((lat, lng)),
            ResolvedLocation::Approx { lat, lng, .. } => Some((lat, lng)),
        }
    }

    pub fn can_map(&self) -> bool {
        !matches!(self, ResolvedLocation::Hidden)
    }
}

impl LocationFields {
    /// The mode used for resolution. Records without a mode tag but with
    /// plain coordinates are treated as approximate; without coordinates
    /// they are private.
    pub fn effective_mode(&self) -> LocationMode {
        match self.location_mode {
            Some(mode) => mode,
            None => {
                if self.lat.get().is_some() && self.lng.get().is_some() {
                    LocationMode::Approx
                } else {
                    LocationMode::PrivateText
                }
            }
        }
    }

    /// Resolve to a display coordinate. `approx` records prefer the
    /// approx-specific fields and fall back to plain lat/lng when those are
    /// missing; both coordinate kinds render as an area circle. The radius
    /// defaults to 1000 m when absent or non-numeric.
    pub fn resolve(&self) -> ResolvedLocation {
        match self.effective_mode() {
            LocationMode::PrivateText => ResolvedLocation::Hidden,
            LocationMode::Poi => match (self.lat.get(), self.lng.get()) {
                (Some(lat), Some(lng)) => ResolvedLocation::Poi { lat, lng },
                _ => ResolvedLocation::Hidden,
            },
            LocationMode::Approx => {
                let radius_m = self.approx_radius_m.or(DEFAULT_APPROX_RADIUS_M);
                match (self.approx_lat.get(), self.approx_lng.get()) {
                    (Some(lat), Some(lng)) => ResolvedLocation::Approx { lat, lng, radius_m },
                    _ => match (self.lat.get(), self.lng.get()) {
                        (Some(lat), Some(lng)) => ResolvedLocation::Approx { lat, lng, radius_m },
                        _ => ResolvedLocation::Hidden,
                    },
                }
            }
        }
    }

    pub fn mode_label(&self) -> &'static str {
        match self.effective_mode() {
            LocationMode::PrivateText => "Text (hidden)",
            LocationMode::Poi => "POI (exact)",
            LocationMode::Approx => "Area (~)",
        }
    }

    /// Coordinates column text: exact values for POI, a `~` prefix and the
    /// radius for approximate areas, an em dash when hidden.
    pub fn coords_label(&self) -> String {
        match self.resolve() {
            ResolvedLocation::Hidden => "\u{2014}".to_string(),
            ResolvedLocation::Poi { lat, lng } => format!("{lat:.5}, {lng:.5}"),
            ResolvedLocation::Approx { lat, lng, radius_m } => {
                format!("~ {lat:.5}, {lng:.5} ({:.0}m)", radius_m.round())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LocationFields, LocationMode, ResolvedLocation};

    fn fields(json: &str) -> LocationFields {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn private_text_hides_stray_coordinates() {
        let loc = fields(r#"{"locationMode":"private_text","lat":46.1,"lng":14.9}"#);
        assert_eq!(loc.resolve(), ResolvedLocation::Hidden);
        assert!(!loc.resolve().can_map());
        assert_eq!(loc.resolve().coords(), None);
    }

    #[test]
    fn poi_returns_exact_input_coordinates() {
        let loc = fields(r#"{"locationMode":"poi","lat":46.05,"lng":14.51}"#);
        assert_eq!(
            loc.resolve(),
            ResolvedLocation::Poi {
                lat: 46.05,
                lng: 14.51
            }
        );
    }

    #[test]
    fn poi_with_string_coordinates_is_coerced() {
        let loc = fields(r#"{"locationMode":"poi","lat":"46,05","lng":"14.51"}"#);
        assert_eq!(
            loc.resolve(),
            ResolvedLocation::Poi {
                lat: 46.05,
                lng: 14.51
            }
        );
    }

    #[test]
    fn poi_without_coordinates_is_hidden() {
        let loc = fields(r#"{"locationMode":"poi","lat":null}"#);
        assert_eq!(loc.resolve(), ResolvedLocation::Hidden);
    }

    #[test]
    fn approx_prefers_approx_fields_over_plain() {
        let loc = fields(
            r#"{"locationMode":"approx","lat":1.0,"lng":2.0,
                "approxLat":46.1,"approxLng":14.9,"approxRadiusM":500}"#,
        );
        assert_eq!(
            loc.resolve(),
            ResolvedLocation::Approx {
                lat: 46.1,
                lng: 14.9,
                radius_m: 500.0
            }
        );
    }

    #[test]
    fn approx_falls_back_to_plain_coordinates() {
        let loc = fields(r#"{"locationMode":"approx","lat":46.2,"lng":15.0}"#);
        assert_eq!(
            loc.resolve(),
            ResolvedLocation::Approx {
                lat: 46.2,
                lng: 15.0,
                radius_m: 1000.0
            }
        );
    }

    #[test]
    fn approx_radius_defaults_when_absent_or_non_numeric() {
        let loc = fields(r#"{"locationMode":"approx","approxLat":46.1,"approxLng":14.9}"#);
        assert_eq!(
            loc.resolve(),
            ResolvedLocation::Approx {
                lat: 46.1,
                lng: 14.9,
                radius_m: 1000.0
            }
        );
        let loc = fields(
            r#"{"locationMode":"approx","approxLat":46.1,"approxLng":14.9,"approxRadiusM":"x"}"#,
        );
        assert_eq!(
            loc.resolve(),
            ResolvedLocation::Approx {
                lat: 46.1,
                lng: 14.9,
                radius_m: 1000.0
            }
        );
    }

    #[test]
    fn missing_mode_with_plain_coords_acts_approximate() {
        let loc = fields(r#"{"lat":46.1,"lng":14.9}"#);
        assert_eq!(loc.effective_mode(), LocationMode::Approx);
        assert!(loc.resolve().can_map());
    }

    #[test]
    fn missing_mode_without_coords_is_private() {
        let loc = fields(r#"{"locationName":"stara preza"}"#);
        assert_eq!(loc.effective_mode(), LocationMode::PrivateText);
        assert_eq!(loc.resolve(), ResolvedLocation::Hidden);
    }

    #[test]
    fn mode_labels() {
        assert_eq!(
            fields(r#"{"locationMode":"private_text"}"#).mode_label(),
            "Text (hidden)"
        );
        assert_eq!(fields(r#"{"locationMode":"poi"}"#).mode_label(), "POI (exact)");
        assert_eq!(fields(r#"{"locationMode":"approx"}"#).mode_label(), "Area (~)");
    }

    #[test]
    fn coords_label_formats_per_mode() {
        let poi = fields(r#"{"locationMode":"poi","lat":46.05123,"lng":14.50987}"#);
        assert_eq!(poi.coords_label(), "46.05123, 14.50987");

        let approx = fields(
            r#"{"locationMode":"approx","approxLat":46.1,"approxLng":14.9,"approxRadiusM":500}"#,
        );
        assert_eq!(approx.coords_label(), "~ 46.10000, 14.90000 (500m)");

        let hidden = fields(r#"{"locationMode":"private_text"}"#);
        assert_eq!(hidden.coords_label(), "\u{2014}");
    }

    /// The resolver contract is identical wherever a location-bearing record
    /// is displayed: the same fields resolve the same way whether they came
    /// from the active roster, a hunt log, or the map modal.
    #[test]
    fn resolution_is_uniform_across_record_shapes() {
        let json = r#"{
            "locationMode": "approx",
            "approxLat": 46.1, "approxLng": 14.9, "approxRadiusM": 500,
            "lat": 0.0, "lng": 0.0
        }"#;

        let record = r#"{
            "hunterName": "x", "startedAt": "2026-08-01T05:00:00Z",
            "locationMode": "approx",
            "approxLat": 46.1, "approxLng": 14.9, "approxRadiusM": 500,
            "lat": 0.0, "lng": 0.0
        }"#;
        let roster: crate::hunt::ActiveHunt = serde_json::from_str(record).unwrap();
        let log: crate::hunt::HuntLog = serde_json::from_str(record).unwrap();
        let modal: LocationFields = serde_json::from_str(json).unwrap();

        let expected = ResolvedLocation::Approx {
            lat: 46.1,
            lng: 14.9,
            radius_m: 500.0,
        };
        assert_eq!(roster.location.resolve(), expected);
        assert_eq!(log.location.resolve(), expected);
        assert_eq!(modal.resolve(), expected);
    }
}
