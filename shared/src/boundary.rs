use geojson::{GeoJson, Geometry, Value};
use serde::{Deserialize, Serialize};

/// One entry of the boundary manifest produced by the KML converter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundaryManifestEntry {
    pub region: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kml_source: Option<String>,
    pub geojson_url: String,
}

/// Boundary file slug for a hunting-club identifier: lowercased, diacritics
/// folded, non-alphanumerics collapsed to underscores, prefixed `ld_` unless
/// already so prefixed.
pub fn ld_slug(name: &str) -> String {
    let folded = name
        .trim()
        .to_lowercase()
        .replace('č', "c")
        .replace('š', "s")
        .replace('ž', "z");
    let mut body = String::with_capacity(folded.len());
    let mut last_sep = true;
    for ch in folded.chars() {
        if ch.is_ascii_alphanumeric() {
            body.push(ch);
            last_sep = false;
        } else if !last_sep {
            body.push('_');
            last_sep = true;
        }
    }
    if body.ends_with('_') {
        body.pop();
    }
    if body.starts_with("ld_") {
        body
    } else {
        format!("ld_{body}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl LatLngBounds {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    fn extend(&mut self, lat: f64, lng: f64) {
        self.min_lat = self.min_lat.min(lat);
        self.min_lng = self.min_lng.min(lng);
        self.max_lat = self.max_lat.max(lat);
        self.max_lng = self.max_lng.max(lng);
    }
}

/// Bounding box over every position in the document. GeoJSON positions are
/// `[lng, lat]`.
pub fn geojson_bounds(doc: &GeoJson) -> Option<LatLngBounds> {
    let mut bounds: Option<LatLngBounds> = None;
    let mut visit = |pos: &[f64]| {
        if pos.len() < 2 {
            return;
        }
        let (lng, lat) = (pos[0], pos[1]);
        match bounds.as_mut() {
            Some(b) => b.extend(lat, lng),
            None => {
                bounds = Some(LatLngBounds {
                    min_lat: lat,
                    min_lng: lng,
                    max_lat: lat,
                    max_lng: lng,
                })
            }
        }
    };
    for geometry in geometries(doc) {
        walk_positions(&geometry.value, &mut visit);
    }
    bounds
}

/// Every linear ring / line of the document as `(lat, lng)` paths, for
/// stroking the boundary outline.
pub fn polygon_rings(doc: &GeoJson) -> Vec<Vec<(f64, f64)>> {
    let mut rings = Vec::new();
    for geometry in geometries(doc) {
        collect_rings(&geometry.value, &mut rings);
    }
    rings
}

fn geometries(doc: &GeoJson) -> Vec<&Geometry> {
    match doc {
        GeoJson::Geometry(g) => vec![g],
        GeoJson::Feature(f) => f.geometry.iter().collect(),
        GeoJson::FeatureCollection(fc) => {
            fc.features.iter().filter_map(|f| f.geometry.as_ref()).collect()
        }
    }
}

fn walk_positions(value: &Value, visit: &mut impl FnMut(&[f64])) {
    match value {
        Value::Point(p) => visit(p),
        Value::MultiPoint(ps) | Value::LineString(ps) => ps.iter().for_each(|p| visit(p)),
        Value::MultiLineString(ls) | Value::Polygon(ls) => {
            ls.iter().flatten().for_each(|p| visit(p))
        }
        Value::MultiPolygon(polys) => {
            polys.iter().flatten().flatten().for_each(|p| visit(p))
        }
        Value::GeometryCollection(gs) => {
            gs.iter().for_each(|g| walk_positions(&g.value, visit))
        }
    }
}

fn to_ring(positions: &[Vec<f64>]) -> Vec<(f64, f64)> {
    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| (p[1], p[0]))
        .collect()
}

fn collect_rings(value: &Value, rings: &mut Vec<Vec<(f64, f64)>>) {
    match value {
        Value::LineString(ps) => rings.push(to_ring(ps)),
        Value::MultiLineString(ls) | Value::Polygon(ls) => {
            rings.extend(ls.iter().map(|ps| to_ring(ps)))
        }
        Value::MultiPolygon(polys) => {
            rings.extend(polys.iter().flatten().map(|ps| to_ring(ps)))
        }
        Value::GeometryCollection(gs) => {
            gs.iter().for_each(|g| collect_rings(&g.value, rings))
        }
        Value::Point(_) | Value::MultiPoint(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::{geojson_bounds, ld_slug, polygon_rings};
    use geojson::GeoJson;

    #[test]
    fn slug_folds_diacritics_and_separators() {
        assert_eq!(ld_slug("LD Šmarje - Sap"), "ld_smarje_sap");
        assert_eq!(ld_slug("Črni Vrh"), "ld_crni_vrh");
        assert_eq!(ld_slug("  Trnovo  "), "ld_trnovo");
        assert_eq!(ld_slug("ld_trnovo"), "ld_trnovo");
        assert_eq!(ld_slug("LD Trnovo"), "ld_trnovo");
    }

    #[test]
    fn bounds_walk_feature_collections() {
        let doc: GeoJson = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[14.4,46.0],[14.6,46.0],[14.6,46.2],[14.4,46.0]]]
                }
            }]
        }"#
        .parse()
        .unwrap();
        let bounds = geojson_bounds(&doc).unwrap();
        assert_eq!(bounds.min_lng, 14.4);
        assert_eq!(bounds.max_lng, 14.6);
        assert_eq!(bounds.min_lat, 46.0);
        assert_eq!(bounds.max_lat, 46.2);
        assert_eq!(bounds.center(), (46.1, 14.5));
    }

    #[test]
    fn rings_flip_to_lat_lng_order() {
        let doc: GeoJson = r#"{
            "type": "Polygon",
            "coordinates": [[[14.4,46.0],[14.6,46.1],[14.4,46.0]]]
        }"#
        .parse()
        .unwrap();
        let rings = polygon_rings(&doc);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0][0], (46.0, 14.4));
        assert_eq!(rings[0][1], (46.1, 14.6));
    }

    #[test]
    fn empty_document_has_no_bounds() {
        let doc: GeoJson = r#"{"type":"FeatureCollection","features":[]}"#.parse().unwrap();
        assert!(geojson_bounds(&doc).is_none());
    }
}
