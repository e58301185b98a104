use gloo_storage::Storage;
use leptos::prelude::*;

use rog_shared::User;

const TOKEN_KEY: &str = "rog_token";

/// Single owner of the bearer token and the signed-in user. Everything that
/// talks to the API reads the token through this store; nothing else touches
/// localStorage.
#[derive(Clone, Copy)]
pub(crate) struct SessionStore {
    token: RwSignal<Option<String>>,
    user: RwSignal<Option<User>>,
}

impl SessionStore {
    pub(crate) fn new() -> SessionStore {
        let token: Option<String> = gloo_storage::LocalStorage::get(TOKEN_KEY).ok();
        SessionStore {
            token: RwSignal::new(token),
            user: RwSignal::new(None),
        }
    }

    pub(crate) fn token_untracked(&self) -> Option<String> {
        self.token.get_untracked()
    }

    pub(crate) fn user(&self) -> Option<User> {
        self.user.get()
    }

    pub(crate) fn set_user(&self, user: User) {
        self.user.set(Some(user));
    }

    pub(crate) fn sign_in(&self, token: String, user: User) {
        let _ = gloo_storage::LocalStorage::set(TOKEN_KEY, &token);
        self.token.set(Some(token));
        self.user.set(Some(user));
    }

    /// Swap the token in place (LD switch) without dropping the session.
    pub(crate) fn replace_token(&self, token: String) {
        let _ = gloo_storage::LocalStorage::set(TOKEN_KEY, &token);
        self.token.set(Some(token));
    }

    pub(crate) fn sign_out(&self) {
        gloo_storage::LocalStorage::delete(TOKEN_KEY);
        self.token.set(None);
        self.user.set(None);
    }
}
