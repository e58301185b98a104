use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::num::FlexNum;

/// One row of the harvest-quota ("odvzem") plan as reported by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotaRow {
    pub species: String,
    pub class_label: String,
    pub plan: FlexNum,
    pub executed: FlexNum,
    pub pending: FlexNum,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotaView {
    pub ld_id: Option<String>,
    pub year: Option<String>,
    pub updated_at: Option<String>,
    pub rows: Vec<QuotaRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotaViewResponse {
    pub view: Option<QuotaView>,
}

/// A synthesized line of the quota table.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaLine {
    pub species: String,
    pub class_label: String,
    pub plan: Option<f64>,
    pub executed: f64,
    pub pending: f64,
}

/// Rows as displayed: a header per species, its filtered detail rows, and a
/// single synthesized total row.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayRow {
    Header { species: String },
    Detail(QuotaLine),
    Total(QuotaLine),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GrandTotals {
    pub plan: Option<f64>,
    pub executed: f64,
    pub pending: f64,
}

/// Execution status relative to plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaStatus {
    /// Within ±10% of plan.
    OnTrack,
    /// Between 70% and 90% of plan.
    Behind,
    /// Everything else.
    OffTrack,
}

impl QuotaStatus {
    /// Bucket an executed/plan ratio. Undefined when the plan is absent or
    /// zero.
    pub fn bucket(plan: Option<f64>, executed: f64) -> Option<QuotaStatus> {
        let plan = plan?;
        if plan == 0.0 {
            return None;
        }
        let ratio = executed / plan;
        if (0.9..=1.1).contains(&ratio) {
            Some(QuotaStatus::OnTrack)
        } else if (0.7..0.9).contains(&ratio) {
            Some(QuotaStatus::Behind)
        } else {
            Some(QuotaStatus::OffTrack)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuotaStatus::OnTrack => "on track",
            QuotaStatus::Behind => "behind",
            QuotaStatus::OffTrack => "off track",
        }
    }
}

/// Rounded percentage of plan executed; undefined when the plan is absent or
/// zero.
pub fn percent_of_plan(executed: f64, plan: Option<f64>) -> Option<i64> {
    let plan = plan?;
    if plan == 0.0 {
        return None;
    }
    Some((executed / plan * 100.0).round() as i64)
}

/// Fold Slovenian diacritics and whitespace for label matching.
fn fold_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .replace('č', "c")
        .replace('š', "s")
        .replace('ž', "z")
}

/// A species' true total row: `skupaj` or `<species> skupaj`, never the
/// sex/age-qualified variants.
pub fn is_true_total_label(label: &str) -> bool {
    let s = fold_label(label);
    if s.is_empty() || s.contains("moski") || s.contains("zenski") || s.contains("mladi") {
        return false;
    }
    s == "skupaj" || s.ends_with(" skupaj")
}

/// Intermediate subtotals (`skupaj moski spol` and friends) that are present
/// in the source data but suppressed from display.
pub fn is_hidden_subtotal(label: &str) -> bool {
    let s = fold_label(label);
    let qualified = s.contains("moski") || s.contains("zenski") || s.contains("mladi");
    s.contains("skupaj") && qualified && !is_true_total_label(label)
}

/// Synthesize the displayed rows: group by species (sorted), one header per
/// species, filtered detail rows sorted by class label, and one total row.
/// The backend-reported total is used when present; otherwise executed and
/// pending are summed from the detail rows (plan stays absent).
pub fn build_display_rows(rows: &[QuotaRow]) -> Vec<DisplayRow> {
    let mut by_species: BTreeMap<String, Vec<&QuotaRow>> = BTreeMap::new();
    for row in rows {
        let species = row.species.trim();
        if species.is_empty() {
            continue;
        }
        by_species.entry(species.to_string()).or_default().push(row);
    }

    let mut out = Vec::new();
    for (species, list) in by_species {
        let total_src = list
            .iter()
            .find(|r| is_true_total_label(&r.class_label))
            .copied();

        let mut details: Vec<QuotaLine> = list
            .iter()
            .filter(|r| {
                !is_hidden_subtotal(&r.class_label) && !is_true_total_label(&r.class_label)
            })
            .map(|r| {
                let label = r.class_label.trim();
                QuotaLine {
                    species: species.clone(),
                    class_label: if label.is_empty() {
                        "\u{2014}".to_string()
                    } else {
                        label.to_string()
                    },
                    plan: r.plan.get(),
                    executed: r.executed.or(0.0),
                    pending: r.pending.or(0.0),
                }
            })
            .collect();
        details.sort_by(|a, b| a.class_label.cmp(&b.class_label));

        let computed_executed: f64 = details.iter().map(|d| d.executed).sum();
        let computed_pending: f64 = details.iter().map(|d| d.pending).sum();

        let total = match total_src {
            Some(src) => QuotaLine {
                species: species.clone(),
                class_label: "Skupaj".to_string(),
                plan: src.plan.get(),
                executed: src.executed.get().unwrap_or(computed_executed),
                pending: src.pending.get().unwrap_or(computed_pending),
            },
            None => QuotaLine {
                species: species.clone(),
                class_label: "Skupaj".to_string(),
                plan: None,
                executed: computed_executed,
                pending: computed_pending,
            },
        };

        out.push(DisplayRow::Header {
            species: species.clone(),
        });
        out.extend(details.into_iter().map(DisplayRow::Detail));
        out.push(DisplayRow::Total(total));
    }
    out
}

/// Grand totals across the table. Plan aggregates only the synthesized total
/// rows; executed/pending aggregate only detail rows. Summing both would
/// double-count.
pub fn grand_totals(rows: &[DisplayRow]) -> GrandTotals {
    let mut totals = GrandTotals::default();
    let mut plan_sum = 0.0;
    let mut plan_seen = false;

    for row in rows {
        match row {
            DisplayRow::Header { .. } => {}
            DisplayRow::Detail(line) => {
                totals.executed += line.executed;
                totals.pending += line.pending;
            }
            DisplayRow::Total(line) => {
                if let Some(plan) = line.plan {
                    plan_sum += plan;
                    plan_seen = true;
                }
            }
        }
    }

    totals.plan = plan_seen.then_some(plan_sum);
    totals
}

#[cfg(test)]
mod tests {
    use super::{
        DisplayRow, GrandTotals, QuotaRow, QuotaStatus, build_display_rows, grand_totals,
        is_hidden_subtotal, is_true_total_label, percent_of_plan,
    };
    use crate::num::FlexNum;

    fn row(species: &str, label: &str, plan: Option<f64>, executed: f64, pending: f64) -> QuotaRow {
        QuotaRow {
            species: species.to_string(),
            class_label: label.to_string(),
            plan: FlexNum(plan),
            executed: FlexNum(Some(executed)),
            pending: FlexNum(Some(pending)),
        }
    }

    #[test]
    fn total_label_classification() {
        assert!(is_true_total_label("skupaj"));
        assert!(is_true_total_label("Srnjad skupaj"));
        assert!(is_true_total_label("  SKUPAJ  "));
        assert!(!is_true_total_label("skupaj moški spol"));
        assert!(!is_true_total_label("skupaj zenski spol"));
        assert!(!is_true_total_label("skupaj mladiči"));
        assert!(!is_true_total_label(""));
    }

    #[test]
    fn hidden_subtotal_classification() {
        assert!(is_hidden_subtotal("skupaj moški spol"));
        assert!(is_hidden_subtotal("skupaj ženski spol"));
        assert!(is_hidden_subtotal("mladiči skupaj"));
        assert!(!is_hidden_subtotal("skupaj"));
        assert!(!is_hidden_subtotal("Srnjad skupaj"));
        assert!(!is_hidden_subtotal("moški 2+"));
    }

    #[test]
    fn backend_total_wins_over_recomputed_sum() {
        let rows = vec![
            row("Deer", "Males", Some(10.0), 5.0, 0.0),
            row("Deer", "skupaj", Some(10.0), 9.0, 0.0),
        ];
        let display = build_display_rows(&rows);
        assert_eq!(display.len(), 3);
        assert!(matches!(&display[0], DisplayRow::Header { species } if species == "Deer"));
        let DisplayRow::Detail(detail) = &display[1] else {
            panic!("expected detail row");
        };
        assert_eq!(detail.executed, 5.0);
        let DisplayRow::Total(total) = &display[2] else {
            panic!("expected total row");
        };
        assert_eq!(total.executed, 9.0);
        assert_eq!(total.plan, Some(10.0));
    }

    #[test]
    fn missing_total_row_sums_details() {
        let rows = vec![
            row("Boar", "Males", Some(4.0), 1.0, 1.0),
            row("Boar", "Females", Some(3.0), 2.0, 0.0),
        ];
        let display = build_display_rows(&rows);
        let DisplayRow::Total(total) = display.last().unwrap() else {
            panic!("expected total row");
        };
        assert_eq!(total.executed, 3.0);
        assert_eq!(total.pending, 1.0);
        assert_eq!(total.plan, None);
    }

    #[test]
    fn sex_subtotals_are_suppressed_from_detail() {
        let rows = vec![
            row("Srnjad", "moški 2+", Some(5.0), 2.0, 0.0),
            row("Srnjad", "skupaj moški spol", Some(5.0), 2.0, 0.0),
            row("Srnjad", "ženske 1+", Some(4.0), 1.0, 0.0),
            row("Srnjad", "Srnjad skupaj", Some(9.0), 3.0, 0.0),
        ];
        let display = build_display_rows(&rows);
        let details: Vec<_> = display
            .iter()
            .filter(|r| matches!(r, DisplayRow::Detail(_)))
            .collect();
        assert_eq!(details.len(), 2);
    }

    #[test]
    fn species_grouping_is_sorted_and_skips_blank_species() {
        let rows = vec![
            row("Wild boar", "skupaj", Some(2.0), 1.0, 0.0),
            row("", "orphan", Some(1.0), 1.0, 0.0),
            row("Deer", "skupaj", Some(3.0), 2.0, 0.0),
        ];
        let display = build_display_rows(&rows);
        let headers: Vec<_> = display
            .iter()
            .filter_map(|r| match r {
                DisplayRow::Header { species } => Some(species.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(headers, vec!["Deer", "Wild boar"]);
    }

    #[test]
    fn grand_plan_sums_total_rows_not_details() {
        let rows = vec![
            row("Deer", "Males", Some(100.0), 5.0, 1.0),
            row("Deer", "skupaj", Some(10.0), 9.0, 2.0),
            row("Boar", "Females", Some(100.0), 2.0, 0.0),
            row("Boar", "skupaj", Some(4.0), 2.0, 0.0),
        ];
        let totals = grand_totals(&build_display_rows(&rows));
        // detail plans (100 each) must not leak into the grand plan
        assert_eq!(totals.plan, Some(14.0));
        assert_eq!(totals.executed, 7.0);
        assert_eq!(totals.pending, 1.0);
    }

    #[test]
    fn grand_plan_ignores_species_without_plan() {
        let rows = vec![
            row("Deer", "skupaj", Some(10.0), 9.0, 0.0),
            row("Fox", "Males", None, 1.0, 0.0),
        ];
        let totals = grand_totals(&build_display_rows(&rows));
        assert_eq!(totals.plan, Some(10.0));

        let no_plan = grand_totals(&build_display_rows(&[row("Fox", "Males", None, 1.0, 0.0)]));
        assert_eq!(no_plan, GrandTotals {
            plan: None,
            executed: 1.0,
            pending: 0.0
        });
    }

    #[test]
    fn percent_is_undefined_without_plan() {
        assert_eq!(percent_of_plan(5.0, None), None);
        assert_eq!(percent_of_plan(5.0, Some(0.0)), None);
        assert_eq!(percent_of_plan(9.0, Some(10.0)), Some(90));
        assert_eq!(percent_of_plan(1.0, Some(3.0)), Some(33));
    }

    #[test]
    fn status_tiers() {
        assert_eq!(QuotaStatus::bucket(Some(10.0), 9.0), Some(QuotaStatus::OnTrack));
        assert_eq!(QuotaStatus::bucket(Some(10.0), 11.0), Some(QuotaStatus::OnTrack));
        assert_eq!(QuotaStatus::bucket(Some(10.0), 8.0), Some(QuotaStatus::Behind));
        assert_eq!(QuotaStatus::bucket(Some(10.0), 7.0), Some(QuotaStatus::Behind));
        assert_eq!(QuotaStatus::bucket(Some(10.0), 5.0), Some(QuotaStatus::OffTrack));
        assert_eq!(QuotaStatus::bucket(Some(10.0), 12.0), Some(QuotaStatus::OffTrack));
        assert_eq!(QuotaStatus::bucket(Some(0.0), 5.0), None);
        assert_eq!(QuotaStatus::bucket(None, 5.0), None);
    }
}
