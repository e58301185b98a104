use serde::{Deserialize, Serialize};

use crate::location::LocationFields;

/// A finished hunt session. Immutable from the portal's point of view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HuntLog {
    pub id: Option<String>,
    pub hunter_name: Option<String>,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub harvest: bool,
    pub species: Option<String>,
    pub ended_reason: Option<String>,
    pub notes: Option<String>,
    pub ld_id: Option<String>,
    #[serde(flatten)]
    pub location: LocationFields,
}

/// A hunt currently in progress; only exists on the live roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveHunt {
    pub uid: Option<String>,
    pub hunter_id: Option<String>,
    pub hunter_name: Option<String>,
    pub started_at: Option<String>,
    pub ld_id: Option<String>,
    #[serde(flatten)]
    pub location: LocationFields,
}

impl ActiveHunt {
    pub fn row_key(&self) -> String {
        self.uid
            .clone()
            .or_else(|| self.hunter_id.clone())
            .or_else(|| self.hunter_name.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HuntLogsResponse {
    #[serde(default)]
    pub logs: Vec<HuntLog>,
}

/// The roster endpoint has shipped both `active` and `hunts` as the list key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActiveHuntsResponse {
    #[serde(default)]
    pub active: Vec<ActiveHunt>,
    #[serde(default)]
    pub hunts: Vec<ActiveHunt>,
}

impl ActiveHuntsResponse {
    pub fn into_list(self) -> Vec<ActiveHunt> {
        if self.active.is_empty() {
            self.hunts
        } else {
            self.active
        }
    }
}

/// Format an RFC3339 timestamp for table display; unparseable input is shown
/// as-is, missing input as an em dash.
pub fn format_timestamp(iso: Option<&str>) -> String {
    let Some(iso) = iso else {
        return "\u{2014}".to_string();
    };
    match chrono::DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => iso.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ActiveHuntsResponse, HuntLog, format_timestamp};
    use crate::location::ResolvedLocation;

    #[test]
    fn hunt_log_deserializes_with_flattened_location() {
        let log: HuntLog = serde_json::from_str(
            r#"{
                "id": "h1", "hunterName": "Janez Novak",
                "startedAt": "2026-08-20T04:30:00Z",
                "finishedAt": "2026-08-20T08:10:00Z",
                "harvest": true, "species": "srnjad",
                "locationMode": "poi", "lat": "46,05", "lng": 14.51
            }"#,
        )
        .unwrap();
        assert!(log.harvest);
        assert_eq!(
            log.location.resolve(),
            ResolvedLocation::Poi {
                lat: 46.05,
                lng: 14.51
            }
        );
    }

    #[test]
    fn roster_accepts_either_list_key() {
        let a: ActiveHuntsResponse =
            serde_json::from_str(r#"{"active":[{"hunterName":"a"}]}"#).unwrap();
        assert_eq!(a.into_list().len(), 1);

        let b: ActiveHuntsResponse =
            serde_json::from_str(r#"{"hunts":[{"hunterName":"b"},{"hunterName":"c"}]}"#).unwrap();
        assert_eq!(b.into_list().len(), 2);

        let empty: ActiveHuntsResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(empty.into_list().is_empty());
    }

    #[test]
    fn timestamps_format_or_pass_through() {
        assert_eq!(
            format_timestamp(Some("2026-08-20T04:30:00Z")),
            "2026-08-20 04:30"
        );
        assert_eq!(format_timestamp(Some("not a date")), "not a date");
        assert_eq!(format_timestamp(None), "\u{2014}");
    }
}
