use leptos::prelude::*;

use rog_shared::export::{csv_bytes, quota_headers, quota_rows};
use rog_shared::quota::{
    DisplayRow, GrandTotals, QuotaStatus, build_display_rows, grand_totals, percent_of_plan,
};

use crate::api;
use crate::export::{pdf, xlsx};
use crate::files::{check_extension, download_bytes, file_from_input, read_upload};
use crate::poll::start_polling;
use crate::session::SessionStore;

const POLL_MS: u32 = 20_000;

fn current_year() -> String {
    chrono::Utc::now().format("%Y").to_string()
}

/// Harvest-quota ("odvzem") view: per-species plan vs. execution, refreshed
/// every 20 seconds, with Excel plan import and CSV/Excel/PDF export.
#[component]
pub(crate) fn QuotaView() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let year = RwSignal::new(current_year());
    let rows = RwSignal::new(Vec::<DisplayRow>::new());
    let totals = RwSignal::new(GrandTotals::default());
    let updated_at = RwSignal::new(Option::<String>::None);
    let error = RwSignal::new(Option::<String>::None);
    let import_msg = RwSignal::new(Option::<String>::None);

    let fetch = move |alive: Option<crate::poll::AliveFlag>| {
        let Some(token) = session.token_untracked() else {
            return;
        };
        let year_value = year.get_untracked();
        wasm_bindgen_futures::spawn_local(async move {
            let result = api::quota_view(&token, &year_value).await;
            if alive.as_ref().is_some_and(|a| !a.is_alive()) {
                return;
            }
            match result {
                Ok(resp) => {
                    let view = resp.view.unwrap_or_default();
                    let display = build_display_rows(&view.rows);
                    totals.set(grand_totals(&display));
                    rows.set(display);
                    updated_at.set(view.updated_at);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    start_polling(POLL_MS, move |alive| fetch(Some(alive)));

    let import = move |ev: web_sys::Event| {
        import_msg.set(None);
        let Some(file) = file_from_input(&ev) else {
            return;
        };
        if let Err(e) = check_extension(&file.name(), &[".xlsx", ".xls"]) {
            import_msg.set(Some(e));
            return;
        }
        let Some(token) = session.token_untracked() else {
            return;
        };
        let year_value = year.get_untracked();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match read_upload(file).await {
                Ok(upload) => api::import_quota_plan(&token, &year_value, &upload).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    import_msg.set(Some("Načrt uvožen.".to_string()));
                    fetch(None);
                }
                Err(e) => import_msg.set(Some(e)),
            }
        });
    };

    let export_rows =
        move || quota_rows(&rows.get_untracked(), &totals.get_untracked());

    let export_csv = move |_| {
        let result = csv_bytes(&quota_headers(), &export_rows())
            .and_then(|bytes| download_bytes("odvzem.csv", "text/csv", &bytes));
        if let Err(e) = result {
            error.set(Some(e));
        }
    };
    let export_xlsx = move |_| {
        let result = xlsx::table_xlsx("Odvzem", &quota_headers(), &export_rows()).and_then(
            |bytes| {
                download_bytes(
                    "odvzem.xlsx",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                    &bytes,
                )
            },
        );
        if let Err(e) = result {
            error.set(Some(e));
        }
    };
    let export_pdf = move |_| {
        let result = pdf::table_pdf("Načrt odvzema", &quota_headers(), &export_rows())
            .and_then(|bytes| download_bytes("odvzem.pdf", "application/pdf", &bytes));
        if let Err(e) = result {
            error.set(Some(e));
        }
    };

    view! {
        <section class="quota">
            <h1>"Odvzem"</h1>
            <div class="filters">
                <label>
                    "Leto"
                    <input
                        type="text"
                        inputmode="numeric"
                        prop:value=move || year.get()
                        on:change=move |ev| {
                            year.set(event_target_value(&ev));
                            fetch(None);
                        }
                    />
                </label>
                <label class="upload">
                    "Uvoz načrta (.xlsx)"
                    <input type="file" accept=".xlsx,.xls" on:change=import />
                </label>
                <span class="spacer"></span>
                <button on:click=export_csv>"CSV"</button>
                <button on:click=export_xlsx>"Excel"</button>
                <button on:click=export_pdf>"PDF"</button>
            </div>
            {move || error.get().map(|msg| view! { <p class="error">{msg}</p> })}
            {move || import_msg.get().map(|msg| view! { <p class="notice">{msg}</p> })}
            {move || {
                updated_at
                    .get()
                    .map(|ts| view! { <p class="caption">{format!("Posodobljeno: {ts}")}</p> })
            }}
            <table>
                <thead>
                    <tr>
                        <th>"Kategorija"</th>
                        <th>"Načrt"</th>
                        <th>"Odvzeto"</th>
                        <th>"V obdelavi"</th>
                        <th>"%"</th>
                        <th>"Status"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || rows.get().into_iter().map(render_row).collect_view()}
                    {move || render_grand_total(totals.get())}
                </tbody>
            </table>
        </section>
    }
}

fn status_cell(plan: Option<f64>, executed: f64) -> impl IntoView {
    match QuotaStatus::bucket(plan, executed) {
        Some(status) => {
            let class = match status {
                QuotaStatus::OnTrack => "status on-track",
                QuotaStatus::Behind => "status behind",
                QuotaStatus::OffTrack => "status off-track",
            };
            view! { <span class=class>{status.label()}</span> }.into_any()
        }
        None => view! { <span class="status none">"\u{2014}"</span> }.into_any(),
    }
}

fn pct_cell(plan: Option<f64>, executed: f64) -> String {
    match percent_of_plan(executed, plan) {
        Some(pct) => format!("{pct} %"),
        None => "\u{2014}".to_string(),
    }
}

fn num_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}"),
        None => "\u{2014}".to_string(),
    }
}

fn render_row(row: DisplayRow) -> impl IntoView {
    match row {
        DisplayRow::Header { species } => view! {
            <tr class="species-header">
                <td colspan="6">{species}</td>
            </tr>
        }
        .into_any(),
        DisplayRow::Detail(line) => view! {
            <tr>
                <td class="indent">{line.class_label.clone()}</td>
                <td>{num_cell(line.plan)}</td>
                <td>{format!("{}", line.executed)}</td>
                <td>{format!("{}", line.pending)}</td>
                <td>{pct_cell(line.plan, line.executed)}</td>
                <td>{status_cell(line.plan, line.executed)}</td>
            </tr>
        }
        .into_any(),
        DisplayRow::Total(line) => view! {
            <tr class="species-total">
                <td>{line.class_label.clone()}</td>
                <td>{num_cell(line.plan)}</td>
                <td>{format!("{}", line.executed)}</td>
                <td>{format!("{}", line.pending)}</td>
                <td>{pct_cell(line.plan, line.executed)}</td>
                <td>{status_cell(line.plan, line.executed)}</td>
            </tr>
        }
        .into_any(),
    }
}

fn render_grand_total(totals: GrandTotals) -> impl IntoView {
    view! {
        <tr class="grand-total">
            <td>"Skupaj vse"</td>
            <td>{num_cell(totals.plan)}</td>
            <td>{format!("{}", totals.executed)}</td>
            <td>{format!("{}", totals.pending)}</td>
            <td>{pct_cell(totals.plan, totals.executed)}</td>
            <td>{status_cell(totals.plan, totals.executed)}</td>
        </tr>
    }
}
