use leptos::prelude::*;
use web_sys::SubmitEvent;

use rog_shared::user::{Role, User};

use crate::api::{self, NewUser, UserPatch};
use crate::session::SessionStore;

/// Member management: list, create, enable/disable, PIN reset. Deletion is a
/// soft-disable on the backend.
#[component]
pub(crate) fn UsersView() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let users = RwSignal::new(Vec::<User>::new());
    let error = RwSignal::new(Option::<String>::None);
    // PIN returned by create/reset, shown exactly once.
    let issued_pin = RwSignal::new(Option::<(String, String)>::None);

    let reload = move || {
        let Some(token) = session.token_untracked() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match api::users(&token).await {
                Ok(resp) => {
                    users.set(resp.users);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };
    Effect::new(move || reload());

    let new_code = RwSignal::new(String::new());
    let new_name = RwSignal::new(String::new());
    let new_role = RwSignal::new("member".to_string());

    let create = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(token) = session.token_untracked() else {
            return;
        };
        let user = NewUser {
            code: new_code.get_untracked().trim().to_string(),
            name: new_name.get_untracked().trim().to_string(),
            role: new_role.get_untracked(),
        };
        if user.code.is_empty() || user.name.is_empty() {
            error.set(Some("Vnesite številko in ime.".to_string()));
            return;
        }
        wasm_bindgen_futures::spawn_local(async move {
            match api::create_user(&token, &user).await {
                Ok(resp) => {
                    issued_pin.set(Some((user.code.clone(), resp.pin)));
                    new_code.set(String::new());
                    new_name.set(String::new());
                    reload();
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let toggle_enabled = move |code: String, enabled: bool| {
        let Some(token) = session.token_untracked() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            let patch = UserPatch {
                enabled: Some(enabled),
                ..UserPatch::default()
            };
            match api::update_user(&token, &code, &patch).await {
                Ok(_) => reload(),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let reset_pin = move |code: String| {
        let Some(token) = session.token_untracked() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match api::reset_pin(&token, &code).await {
                Ok(resp) => issued_pin.set(Some((code, resp.pin))),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let remove = move |code: String| {
        let Some(token) = session.token_untracked() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match api::delete_user(&token, &code).await {
                Ok(()) => reload(),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    view! {
        <section class="users">
            <h1>"Člani"</h1>
            {move || error.get().map(|msg| view! { <p class="error">{msg}</p> })}
            {move || {
                issued_pin
                    .get()
                    .map(|(code, pin)| {
                        view! {
                            <div class="pin-banner">
                                <span>{format!("PIN za {code}: {pin}")}</span>
                                <span class="caption">
                                    " (zapišite si ga, prikazan je samo enkrat)"
                                </span>
                                <button on:click=move |_| issued_pin.set(None)>"Zapri"</button>
                            </div>
                        }
                    })
            }}
            <form class="user-create" on:submit=create>
                <input
                    type="text"
                    placeholder="Številka"
                    prop:value=move || new_code.get()
                    on:input=move |ev| new_code.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="Ime in priimek"
                    prop:value=move || new_name.get()
                    on:input=move |ev| new_name.set(event_target_value(&ev))
                />
                <select on:change=move |ev| new_role.set(event_target_value(&ev))>
                    <option value="member" selected=true>"Član"</option>
                    <option value="moderator">"Moderator"</option>
                </select>
                <button type="submit">"Dodaj člana"</button>
            </form>
            <table>
                <thead>
                    <tr>
                        <th>"Številka"</th>
                        <th>"Ime"</th>
                        <th>"Vloga"</th>
                        <th>"Status"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || users.get()
                        key=|user| user.code.clone()
                        children=move |user| {
                            let code = user.code.clone();
                            let enabled = user.enabled;
                            let toggle_code = code.clone();
                            let reset_code = code.clone();
                            let remove_code = code.clone();
                            view! {
                                <tr class:disabled=!enabled>
                                    <td>{user.code.clone()}</td>
                                    <td>{user.name.clone()}</td>
                                    <td>{role_label(user.role)}</td>
                                    <td>{if enabled { "aktiven" } else { "onemogočen" }}</td>
                                    <td class="row-actions">
                                        <button on:click=move |_| {
                                            toggle_enabled(toggle_code.clone(), !enabled)
                                        }>
                                            {if enabled { "Onemogoči" } else { "Omogoči" }}
                                        </button>
                                        <button on:click=move |_| reset_pin(reset_code.clone())>
                                            "Ponastavi PIN"
                                        </button>
                                        <button
                                            class="danger"
                                            on:click=move |_| remove(remove_code.clone())
                                        >
                                            "Odstrani"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </section>
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Member => "Član",
        Role::Moderator => "Moderator",
        Role::Super => "Super",
    }
}
