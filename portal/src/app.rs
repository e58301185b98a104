use leptos::prelude::*;

use crate::api;
use crate::login::LoginView;
use crate::portal::PortalShell;
use crate::session::SessionStore;

/// Session state machine. A stored token moves us through `CheckingToken`;
/// validation failure drops straight back to `Unauthenticated`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthPhase {
    Unauthenticated,
    CheckingToken,
    Authenticated,
}

#[derive(Clone, Copy)]
pub(crate) struct Phase(pub RwSignal<AuthPhase>);

#[component]
pub fn App() -> impl IntoView {
    let session = SessionStore::new();
    let phase = RwSignal::new(match session.token_untracked() {
        Some(_) => AuthPhase::CheckingToken,
        None => AuthPhase::Unauthenticated,
    });
    provide_context(session);
    provide_context(Phase(phase));

    // Validate the stored token once on startup.
    Effect::new(move || {
        if phase.get_untracked() != AuthPhase::CheckingToken {
            return;
        }
        let Some(token) = session.token_untracked() else {
            phase.set(AuthPhase::Unauthenticated);
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match api::me(&token).await {
                Ok(resp) if resp.user.role.can_access_portal() => {
                    session.set_user(resp.user);
                    phase.set(AuthPhase::Authenticated);
                }
                _ => {
                    session.sign_out();
                    phase.set(AuthPhase::Unauthenticated);
                }
            }
        });
    });

    view! {
        <div class="app-root">
            {move || match phase.get() {
                AuthPhase::Unauthenticated => view! { <LoginView /> }.into_any(),
                AuthPhase::CheckingToken => {
                    view! { <div class="loading">"Preverjanje seje ..."</div> }.into_any()
                }
                AuthPhase::Authenticated => view! { <PortalShell /> }.into_any(),
            }}
        </div>
    }
}
