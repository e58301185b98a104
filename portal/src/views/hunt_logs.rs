use leptos::prelude::*;

use rog_shared::export::{csv_bytes, hunt_log_headers, hunt_log_row};
use rog_shared::hunt::{HuntLog, format_timestamp};

use crate::api;
use crate::export::pdf;
use crate::files::download_bytes;
use crate::map::modal::{MapModalState, MapTarget};
use crate::session::SessionStore;

const FETCH_LIMIT: u32 = 500;

/// Hunt-log review: date-filtered table with CSV and PDF export of exactly
/// the rows on screen.
#[component]
pub(crate) fn HuntLogsView() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let logs = RwSignal::new(Vec::<HuntLog>::new());
    let error = RwSignal::new(Option::<String>::None);
    let (default_from, default_to) = default_range(chrono::Local::now().date_naive());
    let from = RwSignal::new(default_from);
    let to = RwSignal::new(default_to);
    let modal = MapModalState::new();

    let reload = move || {
        let Some(token) = session.token_untracked() else {
            return;
        };
        let from_value = day_start(&from.get_untracked());
        let to_value = day_end(&to.get_untracked());
        wasm_bindgen_futures::spawn_local(async move {
            let result = api::hunt_logs(
                &token,
                from_value.as_deref(),
                to_value.as_deref(),
                FETCH_LIMIT,
            )
            .await;
            match result {
                Ok(resp) => {
                    logs.set(resp.logs);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };
    Effect::new(move || reload());

    let export_csv = move |_| {
        let rows: Vec<Vec<String>> = logs.with_untracked(|logs| {
            logs.iter().map(hunt_log_row).collect()
        });
        let result = csv_bytes(&hunt_log_headers(), &rows)
            .and_then(|bytes| download_bytes("dnevnik_lovov.csv", "text/csv", &bytes));
        if let Err(e) = result {
            error.set(Some(e));
        }
    };

    let export_pdf = move |_| {
        let rows: Vec<Vec<String>> = logs.with_untracked(|logs| {
            logs.iter().map(pdf_row).collect()
        });
        let result = pdf::table_pdf("Dnevnik lovov", PDF_HEADERS, &rows)
            .and_then(|bytes| download_bytes("dnevnik_lovov.pdf", "application/pdf", &bytes));
        if let Err(e) = result {
            error.set(Some(e));
        }
    };

    view! {
        <section class="hunt-logs">
            <h1>"Dnevnik lovov"</h1>
            <div class="filters">
                <label>
                    "Od"
                    <input
                        type="date"
                        prop:value=move || from.get()
                        on:input=move |ev| from.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Do"
                    <input
                        type="date"
                        prop:value=move || to.get()
                        on:input=move |ev| to.set(event_target_value(&ev))
                    />
                </label>
                <button on:click=move |_| reload()>"Filtriraj"</button>
                <span class="counts">
                    {move || {
                        logs.with(|logs| {
                            let harvested = logs.iter().filter(|log| log.harvest).count();
                            format!("Skupaj: {} | Uplen: {}", logs.len(), harvested)
                        })
                    }}
                </span>
                <span class="spacer"></span>
                <button on:click=export_csv>"Izvoz CSV"</button>
                <button on:click=export_pdf>"Izvoz PDF"</button>
            </div>
            {move || error.get().map(|msg| view! { <p class="error">{msg}</p> })}
            <table>
                <thead>
                    <tr>
                        <th>"Lovec"</th>
                        <th>"Začetek"</th>
                        <th>"Konec"</th>
                        <th>"Uplen"</th>
                        <th>"Vrsta"</th>
                        <th>"Razlog"</th>
                        <th>"Lokacija"</th>
                        <th>"Koordinate"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || logs.get()
                        key=|log| log.id.clone().unwrap_or_default()
                        children=move |log| view! { <LogRow log=log modal=modal /> }
                    />
                </tbody>
            </table>
            {modal.render()}
        </section>
    }
}

#[component]
fn LogRow(log: HuntLog, modal: MapModalState) -> impl IntoView {
    let resolved = log.location.resolve();
    let can_map = resolved.can_map();
    let target = MapTarget {
        title: log.hunter_name.clone().unwrap_or_else(|| "Lov".into()),
        location: resolved,
    };

    view! {
        <tr>
            <td>{log.hunter_name.clone().unwrap_or_default()}</td>
            <td>{format_timestamp(log.started_at.as_deref())}</td>
            <td>{format_timestamp(log.finished_at.as_deref())}</td>
            <td>{if log.harvest { "da" } else { "ne" }}</td>
            <td>{log.species.clone().unwrap_or_default()}</td>
            <td>{log.ended_reason.clone().unwrap_or_default()}</td>
            <td>{log.location.mode_label()}</td>
            <td>{log.location.coords_label()}</td>
            <td>
                <button
                    disabled=!can_map
                    on:click=move |_| modal.open(target.clone())
                >
                    "Karta"
                </button>
            </td>
        </tr>
    }
}

const PDF_HEADERS: &[&str] = &[
    "Lovec", "Začetek", "Konec", "Uplen", "Vrsta", "Lokacija", "Koordinate",
];

/// Filters start at the last seven days so the table opens with recent hunts.
fn default_range(today: chrono::NaiveDate) -> (String, String) {
    let from = today - chrono::Duration::days(7);
    (
        from.format("%Y-%m-%d").to_string(),
        today.format("%Y-%m-%d").to_string(),
    )
}

/// The API filters on full timestamps; a bare `to` date would cut off that
/// whole day, so both bounds get explicit day edges.
fn day_start(date: &str) -> Option<String> {
    (!date.is_empty()).then(|| format!("{date}T00:00:00"))
}

fn day_end(date: &str) -> Option<String> {
    (!date.is_empty()).then(|| format!("{date}T23:59:59"))
}

/// PDF rows mirror the on-screen columns (minus notes/reason for width).
fn pdf_row(log: &HuntLog) -> Vec<String> {
    vec![
        log.hunter_name.clone().unwrap_or_default(),
        format_timestamp(log.started_at.as_deref()),
        format_timestamp(log.finished_at.as_deref()),
        if log.harvest { "da" } else { "ne" }.to_string(),
        log.species.clone().unwrap_or_default(),
        log.location.mode_label().to_string(),
        log.location.coords_label(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_covers_last_seven_days() {
        let today = chrono::NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let (from, to) = default_range(today);
        assert_eq!(from, "2026-03-03");
        assert_eq!(to, "2026-03-10");
    }

    #[test]
    fn date_bounds_span_the_whole_day() {
        assert_eq!(
            day_start("2026-03-03").as_deref(),
            Some("2026-03-03T00:00:00")
        );
        assert_eq!(day_end("2026-03-10").as_deref(), Some("2026-03-10T23:59:59"));
        assert_eq!(day_start(""), None);
        assert_eq!(day_end(""), None);
    }
}
