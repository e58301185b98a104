use leptos::prelude::*;
use web_sys::SubmitEvent;

use crate::api;
use crate::app::{AuthPhase, Phase};
use crate::session::SessionStore;

#[component]
pub(crate) fn LoginView() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let phase = expect_context::<Phase>().0;

    let code = RwSignal::new(String::new());
    let pin = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);
    let busy = RwSignal::new(false);

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let code_value = code.get_untracked().trim().to_string();
        let pin_value = pin.get_untracked().trim().to_string();
        if code_value.is_empty() || pin_value.is_empty() {
            error.set(Some("Vnesite številko in PIN.".to_string()));
            return;
        }
        busy.set(true);
        error.set(None);
        wasm_bindgen_futures::spawn_local(async move {
            match api::login(&code_value, &pin_value).await {
                Ok(resp) if resp.user.role.can_access_portal() => {
                    session.sign_in(resp.token, resp.user);
                    phase.set(AuthPhase::Authenticated);
                }
                Ok(_) => {
                    error.set(Some("Dostop je dovoljen moderatorjem in upravitelju.".to_string()))
                }
                Err(e) => error.set(Some(e)),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login">
            <form class="login-card" on:submit=submit>
                <h1>"ROG portal"</h1>
                <label>
                    "Lovska številka"
                    <input
                        type="text"
                        inputmode="numeric"
                        autocomplete="username"
                        prop:value=move || code.get()
                        on:input=move |ev| code.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "PIN"
                    <input
                        type="password"
                        inputmode="numeric"
                        autocomplete="current-password"
                        prop:value=move || pin.get()
                        on:input=move |ev| pin.set(event_target_value(&ev))
                    />
                </label>
                {move || {
                    error.get().map(|msg| view! { <p class="error">{msg}</p> })
                }}
                <button type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Prijava ..." } else { "Prijava" }}
                </button>
            </form>
        </div>
    }
}
