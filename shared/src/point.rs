use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::num::FlexNum;

/// A mapped point of interest (feeder, hide, cabin, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Point {
    pub id: Option<String>,
    pub point_id: Option<String>,
    #[serde(rename = "type")]
    pub raw_type: Option<String>,
    pub lat: FlexNum,
    pub lng: FlexNum,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub source: Option<String>,
}

impl Point {
    pub fn kind(&self) -> PointKind {
        PointKind::from_raw(self.raw_type.as_deref().unwrap_or(""))
    }

    pub fn coords(&self) -> Option<(f64, f64)> {
        Some((self.lat.get()?, self.lng.get()?))
    }

    /// Stable identity for list keys and de-duplication.
    pub fn key(&self) -> String {
        if let Some(id) = self.id.as_deref().or(self.point_id.as_deref()) {
            return id.to_string();
        }
        format!(
            "{}:{:?}:{:?}",
            self.raw_type.as_deref().unwrap_or(""),
            self.lat.get(),
            self.lng.get()
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PointsResponse {
    #[serde(default)]
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointsImportResult {
    pub processed: u32,
    pub skipped: u32,
}

/// Normalized point category. Raw type strings come from several upstream
/// sources with inconsistent spelling, so [`PointKind::from_raw`] folds
/// diacritics and common plural forms before matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PointKind {
    Feeder,
    Hide,
    Cabin,
    Field,
    Other,
}

pub const ALL_KINDS: [PointKind; 5] = [
    PointKind::Feeder,
    PointKind::Hide,
    PointKind::Cabin,
    PointKind::Field,
    PointKind::Other,
];

impl PointKind {
    pub fn from_raw(raw: &str) -> PointKind {
        let folded: String = raw
            .trim()
            .to_lowercase()
            .replace('č', "c")
            .replace('š', "s")
            .replace('ž', "z")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        match folded.as_str() {
            "krmisce" | "krmisca" | "feeder" => PointKind::Feeder,
            "opazovalnica" | "opazovalnice" | "preza" | "preze" | "hide" => PointKind::Hide,
            "lovska_koca" | "lovske_koce" | "koca" | "cabin" => PointKind::Cabin,
            "njiva" | "njive" | "field" => PointKind::Field,
            _ => PointKind::Other,
        }
    }

    /// Asset slug used for the marker icon file name.
    pub fn slug(self) -> &'static str {
        match self {
            PointKind::Feeder => "krmisce",
            PointKind::Hide => "opazovalnica",
            PointKind::Cabin => "lovska_koca",
            PointKind::Field => "njiva",
            PointKind::Other => "drugo",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PointKind::Feeder => "Krmišče",
            PointKind::Hide => "Opazovalnica",
            PointKind::Cabin => "Lovska koča",
            PointKind::Field => "Njiva",
            PointKind::Other => "Drugo",
        }
    }
}

/// Per-dataset counts shown in the map diagnostics panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointDiagnostics {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub by_kind: BTreeMap<PointKind, usize>,
}

impl PointDiagnostics {
    pub fn collect(points: &[Point]) -> PointDiagnostics {
        let mut diag = PointDiagnostics {
            total: points.len(),
            ..PointDiagnostics::default()
        };
        for point in points {
            if point.coords().is_some() {
                diag.valid += 1;
                *diag.by_kind.entry(point.kind()).or_default() += 1;
            } else {
                diag.invalid += 1;
            }
        }
        diag
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, PointDiagnostics, PointKind};
    use crate::num::FlexNum;

    #[test]
    fn raw_type_normalization() {
        assert_eq!(PointKind::from_raw("Krmišče"), PointKind::Feeder);
        assert_eq!(PointKind::from_raw("krmisca"), PointKind::Feeder);
        assert_eq!(PointKind::from_raw("  Lovska   koča"), PointKind::Cabin);
        assert_eq!(PointKind::from_raw("lovske_koce"), PointKind::Cabin);
        assert_eq!(PointKind::from_raw("OPAZOVALNICE"), PointKind::Hide);
        assert_eq!(PointKind::from_raw("njive"), PointKind::Field);
        assert_eq!(PointKind::from_raw("solnica"), PointKind::Other);
        assert_eq!(PointKind::from_raw(""), PointKind::Other);
    }

    #[test]
    fn point_deserializes_string_coords() {
        let point: Point = serde_json::from_str(
            r#"{"pointId":"p1","type":"krmišče","lat":"46,05","lng":"14.5","name":"K1"}"#,
        )
        .unwrap();
        assert_eq!(point.kind(), PointKind::Feeder);
        assert_eq!(point.coords(), Some((46.05, 14.5)));
        assert_eq!(point.key(), "p1");
    }

    #[test]
    fn diagnostics_count_invalid_coords() {
        let points = vec![
            Point {
                raw_type: Some("krmišče".into()),
                lat: FlexNum(Some(46.0)),
                lng: FlexNum(Some(14.0)),
                ..Point::default()
            },
            Point {
                raw_type: Some("njiva".into()),
                ..Point::default()
            },
        ];
        let diag = PointDiagnostics::collect(&points);
        assert_eq!(diag.total, 2);
        assert_eq!(diag.valid, 1);
        assert_eq!(diag.invalid, 1);
        assert_eq!(diag.by_kind.get(&PointKind::Feeder), Some(&1));
        assert_eq!(diag.by_kind.get(&PointKind::Field), None);
    }
}
