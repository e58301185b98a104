use leptos::prelude::*;

use rog_shared::user::{Dashboard, Ld, Role};

use crate::api;
use crate::app::{AuthPhase, Phase};
use crate::session::SessionStore;
use crate::views::active_hunts::ActiveHuntsView;
use crate::views::boundary::BoundaryMapView;
use crate::views::hunt_logs::HuntLogsView;
use crate::views::quota::QuotaView;
use crate::views::users::UsersView;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tab {
    Home,
    ActiveHunts,
    Users,
    HuntLogs,
    Quota,
    Map,
    Documents,
}

impl Tab {
    fn label(self) -> &'static str {
        match self {
            Tab::Home => "Pregled",
            Tab::ActiveHunts => "Aktivni lovi",
            Tab::Users => "Člani",
            Tab::HuntLogs => "Dnevnik lovov",
            Tab::Quota => "Odvzem",
            Tab::Map => "Karta",
            Tab::Documents => "Dokumenti",
        }
    }
}

const TABS: [Tab; 7] = [
    Tab::Home,
    Tab::ActiveHunts,
    Tab::Users,
    Tab::HuntLogs,
    Tab::Quota,
    Tab::Map,
    Tab::Documents,
];

#[component]
pub(crate) fn PortalShell() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let phase = expect_context::<Phase>().0;
    let tab = RwSignal::new(Tab::Home);
    let dashboard = RwSignal::new(Option::<Dashboard>::None);

    Effect::new(move || {
        let Some(token) = session.token_untracked() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            // A failed dashboard fetch leaves the top-bar caption empty.
            if let Ok(d) = api::dashboard(&token).await {
                dashboard.set(Some(d));
            }
        });
    });

    let is_super = move || {
        session
            .user()
            .map(|u| u.role == Role::Super)
            .unwrap_or(false)
    };

    let ld_caption = move || {
        dashboard.with(|dash| match dash {
            Some(d) => match (&d.ld_name, &d.ld_id) {
                (Some(name), Some(id)) => format!("LD: {name} ({id})"),
                (Some(name), None) => format!("LD: {name}"),
                _ => d.ld_id.clone().map(|id| format!("LD: {id}")).unwrap_or_default(),
            },
            None => "Nalagam ...".to_string(),
        })
    };

    let sign_out = move |_| {
        session.sign_out();
        phase.set(AuthPhase::Unauthenticated);
    };

    view! {
        <div class="portal">
            <header class="portal-header">
                <div class="brand-box">
                    <span class="brand">
                        "ROG portal"
                        {move || is_super().then(|| view! { <span class="badge">"ADMIN"</span> })}
                    </span>
                    <span class="brand-sub">{ld_caption}</span>
                </div>
                <nav>
                    {TABS
                        .into_iter()
                        .map(|t| {
                            view! {
                                <button
                                    class:active=move || tab.get() == t
                                    on:click=move |_| tab.set(t)
                                >
                                    {t.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                </nav>
                <div class="session-box">
                    {move || is_super().then(|| view! { <LdSwitcher /> })}
                    <span class="who">
                        {move || session.user().map(|u| u.name).unwrap_or_default()}
                    </span>
                    <button on:click=sign_out>"Odjava"</button>
                </div>
            </header>
            <main>
                {move || match tab.get() {
                    Tab::Home => {
                        view! { <DashboardView dashboard=dashboard tab=tab /> }.into_any()
                    }
                    Tab::ActiveHunts => view! { <ActiveHuntsView /> }.into_any(),
                    Tab::Users => view! { <UsersView /> }.into_any(),
                    Tab::HuntLogs => view! { <HuntLogsView /> }.into_any(),
                    Tab::Quota => view! { <QuotaView /> }.into_any(),
                    Tab::Map => view! { <BoundaryMapView /> }.into_any(),
                    Tab::Documents => {
                        view! {
                            <section class="documents">
                                <h1>"Dokumenti"</h1>
                                <p>"Ta modul je v pripravi."</p>
                            </section>
                        }
                            .into_any()
                    }
                }}
            </main>
        </div>
    }
}

/// Super-only: re-issue the token for another club and reload so every view
/// restarts against the new scope.
#[component]
fn LdSwitcher() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let lds = RwSignal::new(Vec::<Ld>::new());
    let error = RwSignal::new(Option::<String>::None);

    Effect::new(move || {
        let Some(token) = session.token_untracked() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match api::lds(&token).await {
                Ok(resp) => lds.set(resp.lds),
                Err(e) => error.set(Some(e)),
            }
        });
    });

    let switch = move |ev: web_sys::Event| {
        let ld_id = event_target_value(&ev);
        if ld_id.is_empty() {
            return;
        }
        let Some(token) = session.token_untracked() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match api::switch_ld(&token, &ld_id).await {
                Ok(resp) => {
                    session.replace_token(resp.token);
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().reload();
                    }
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let current_ld = move || session.user().and_then(|u| u.ld_id).unwrap_or_default();

    view! {
        <select class="ld-switcher" on:change=switch>
            {move || {
                let current = current_ld();
                lds.get()
                    .into_iter()
                    .map(|ld| {
                        let selected = ld.id == current;
                        view! {
                            <option value=ld.id selected=selected>{ld.name}</option>
                        }
                    })
                    .collect_view()
            }}
        </select>
        {move || error.get().map(|msg| view! { <span class="error">{msg}</span> })}
    }
}

/// Cards fed by the shell's dashboard fetch, plus quick actions that jump
/// straight to the matching tab.
#[component]
fn DashboardView(dashboard: RwSignal<Option<Dashboard>>, tab: RwSignal<Tab>) -> impl IntoView {
    const QUICK_ACTIONS: [(Tab, &str); 5] = [
        (Tab::ActiveHunts, "Aktivni lovi"),
        (Tab::Users, "Člani"),
        (Tab::HuntLogs, "Dnevnik lovov"),
        (Tab::Quota, "Plan odvzema"),
        (Tab::Map, "Karta revirja"),
    ];

    view! {
        <section class="dashboard">
            {move || {
                dashboard
                    .get()
                    .map(|d| {
                        view! {
                            <div class="dashboard-cards">
                                <div class="card">
                                    <h2>{d.ld_name.clone().unwrap_or_else(|| "LD".into())}</h2>
                                </div>
                                <div class="card">
                                    <span class="metric">
                                        {d.users_count.map(|n| n.to_string()).unwrap_or_default()}
                                    </span>
                                    <span class="caption">"članov"</span>
                                </div>
                                <div class="card">
                                    <span class="metric">
                                        {d.hunts_this_month
                                            .map(|n| n.to_string())
                                            .unwrap_or_default()}
                                    </span>
                                    <span class="caption">"lovov ta mesec"</span>
                                </div>
                            </div>
                        }
                    })
            }}
            <div class="quick-actions">
                <h2>"Hitre akcije"</h2>
                {QUICK_ACTIONS
                    .into_iter()
                    .map(|(target, label)| {
                        view! { <button on:click=move |_| tab.set(target)>{label}</button> }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}
