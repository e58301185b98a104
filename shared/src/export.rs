use csv::{QuoteStyle, WriterBuilder};

use crate::hunt::HuntLog;
use crate::location::ResolvedLocation;
use crate::quota::{DisplayRow, GrandTotals};

/// Serialize a table as CSV with every field quoted.
pub fn csv_bytes(headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>, String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    writer
        .write_record(headers)
        .map_err(|e| format!("csv error: {e}"))?;
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| format!("csv error: {e}"))?;
    }
    writer
        .into_inner()
        .map_err(|e| format!("csv error: {e}"))
}

pub fn hunt_log_headers() -> [&'static str; 10] {
    [
        "hunterName",
        "startedAt",
        "finishedAt",
        "harvest",
        "species",
        "endedReason",
        "notes",
        "locationName",
        "lat",
        "lng",
    ]
}

/// One export row per log. Coordinates follow the resolved location, so
/// hidden locations stay blank.
pub fn hunt_log_row(log: &HuntLog) -> Vec<String> {
    let resolved = log.location.resolve();
    let (lat, lng) = match resolved.coords() {
        Some((lat, lng)) => (format!("{lat}"), format!("{lng}")),
        None => (String::new(), String::new()),
    };
    let location_name = match &resolved {
        ResolvedLocation::Hidden => log.location.location_name.clone().unwrap_or_default(),
        _ => log
            .location
            .poi_name
            .clone()
            .or_else(|| log.location.location_name.clone())
            .unwrap_or_default(),
    };
    vec![
        log.hunter_name.clone().unwrap_or_default(),
        log.started_at.clone().unwrap_or_default(),
        log.finished_at.clone().unwrap_or_default(),
        if log.harvest { "yes" } else { "no" }.to_string(),
        log.species.clone().unwrap_or_default(),
        log.ended_reason.clone().unwrap_or_default(),
        log.notes.clone().unwrap_or_default(),
        location_name,
        lat,
        lng,
    ]
}

pub fn quota_headers() -> [&'static str; 6] {
    ["species", "class", "plan", "executed", "pending", "percent"]
}

fn num_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}"),
        None => String::new(),
    }
}

fn pct_cell(executed: f64, plan: Option<f64>) -> String {
    match crate::quota::percent_of_plan(executed, plan) {
        Some(pct) => format!("{pct}"),
        None => String::new(),
    }
}

/// Flatten the displayed quota table into export rows, one per detail and
/// total line, plus a final grand-total line. Figures are taken from the
/// displayed rows, never recomputed from source data.
pub fn quota_rows(display: &[DisplayRow], totals: &GrandTotals) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    for row in display {
        match row {
            DisplayRow::Header { .. } => {}
            DisplayRow::Detail(line) | DisplayRow::Total(line) => out.push(vec![
                line.species.clone(),
                line.class_label.clone(),
                num_cell(line.plan),
                format!("{}", line.executed),
                format!("{}", line.pending),
                pct_cell(line.executed, line.plan),
            ]),
        }
    }
    out.push(vec![
        String::new(),
        "Skupaj vse".to_string(),
        num_cell(totals.plan),
        format!("{}", totals.executed),
        format!("{}", totals.pending),
        pct_cell(totals.executed, totals.plan),
    ]);
    out
}

#[cfg(test)]
mod tests {
    use super::{csv_bytes, hunt_log_headers, hunt_log_row, quota_rows};
    use crate::hunt::HuntLog;
    use crate::quota::{QuotaRow, build_display_rows, grand_totals};

    #[test]
    fn every_field_is_quoted() {
        let bytes = csv_bytes(&["a", "b"], &[vec!["1".into(), "x,\"y\"".into()]]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "\"a\",\"b\"\n\"1\",\"x,\"\"y\"\"\"\n");
    }

    #[test]
    fn reading_the_export_back_reproduces_every_field() {
        let headers = ["name", "note", "value"];
        let rows: Vec<Vec<String>> = vec![
            vec!["Ana".into(), "line one\nline two".into(), "1,5".into()],
            vec!["Bor \"st.\"".into(), String::new(), "–".into()],
        ];
        let bytes = csv_bytes(&headers, &rows).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            headers
        );
        let parsed: Vec<Vec<String>> = reader
            .records()
            .map(|record| {
                record
                    .unwrap()
                    .iter()
                    .map(|field| field.to_string())
                    .collect()
            })
            .collect();
        assert_eq!(parsed, rows);
    }

    #[test]
    fn hidden_location_exports_blank_coords() {
        let log: HuntLog = serde_json::from_str(
            r#"{"hunterName":"Ana","harvest":true,"species":"Srnjad",
                "locationMode":"private_text","locationName":"za hišo",
                "lat":46.0,"lng":14.5}"#,
        )
        .unwrap();
        let row = hunt_log_row(&log);
        assert_eq!(row.len(), hunt_log_headers().len());
        assert_eq!(row[3], "yes");
        assert_eq!(row[7], "za hišo");
        assert_eq!(row[8], "");
        assert_eq!(row[9], "");
    }

    #[test]
    fn poi_location_exports_coords_and_poi_name() {
        let log: HuntLog = serde_json::from_str(
            r#"{"hunterName":"Ana","locationMode":"poi","poiName":"Krmišče 3",
                "lat":"46,05","lng":14.5}"#,
        )
        .unwrap();
        let row = hunt_log_row(&log);
        assert_eq!(row[7], "Krmišče 3");
        assert_eq!(row[8], "46.05");
        assert_eq!(row[9], "14.5");
    }

    #[test]
    fn quota_export_ends_with_grand_total() {
        let rows = vec![QuotaRow {
            species: "Deer".into(),
            class_label: "skupaj".into(),
            plan: crate::num::FlexNum(Some(10.0)),
            executed: crate::num::FlexNum(Some(9.0)),
            pending: crate::num::FlexNum(Some(0.0)),
        }];
        let display = build_display_rows(&rows);
        let totals = grand_totals(&display);
        let export = quota_rows(&display, &totals);
        let last = export.last().unwrap();
        assert_eq!(last[1], "Skupaj vse");
        assert_eq!(last[2], "10");
    }
}
