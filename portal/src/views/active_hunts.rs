use leptos::prelude::*;

use rog_shared::hunt::{ActiveHunt, format_timestamp};

use crate::api;
use crate::map::modal::{MapModalState, MapTarget};
use crate::poll::start_polling;
use crate::session::SessionStore;

const POLL_MS: u32 = 8_000;

/// Live roster of hunts currently in progress, refreshed every 8 seconds.
#[component]
pub(crate) fn ActiveHuntsView() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let hunts = RwSignal::new(Vec::<ActiveHunt>::new());
    let error = RwSignal::new(Option::<String>::None);
    let loaded = RwSignal::new(false);
    let modal = MapModalState::new();

    start_polling(POLL_MS, move |alive| {
        let Some(token) = session.token_untracked() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            let result = api::active_hunts(&token).await;
            if !alive.is_alive() {
                return;
            }
            match result {
                Ok(resp) => {
                    hunts.set(resp.into_list());
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loaded.set(true);
        });
    });

    view! {
        <section class="active-hunts">
            <h1>"Aktivni lovi"</h1>
            {move || error.get().map(|msg| view! { <p class="error">{msg}</p> })}
            {move || {
                (loaded.get() && hunts.with(Vec::is_empty))
                    .then(|| view! { <p class="empty">"Trenutno ni aktivnih lovov."</p> })
            }}
            <table>
                <thead>
                    <tr>
                        <th>"Lovec"</th>
                        <th>"Začetek"</th>
                        <th>"Lokacija"</th>
                        <th>"Koordinate"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || hunts.get()
                        key=|hunt| hunt.row_key()
                        children=move |hunt| {
                            view! { <HuntRow hunt=hunt modal=modal /> }
                        }
                    />
                </tbody>
            </table>
            {modal.render()}
        </section>
    }
}

#[component]
fn HuntRow(hunt: ActiveHunt, modal: MapModalState) -> impl IntoView {
    let resolved = hunt.location.resolve();
    let can_map = resolved.can_map();
    let target = MapTarget {
        title: hunt.hunter_name.clone().unwrap_or_else(|| "Lov".into()),
        location: resolved,
    };

    view! {
        <tr>
            <td>{hunt.hunter_name.clone().unwrap_or_default()}</td>
            <td>{format_timestamp(hunt.started_at.as_deref())}</td>
            <td>{hunt.location.mode_label()}</td>
            <td>{hunt.location.coords_label()}</td>
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
