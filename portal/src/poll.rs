use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Liveness flag handed to each poll tick. Responses that land after the
/// owning view unmounted must check it before writing to any signal.
#[derive(Clone)]
pub(crate) struct AliveFlag(Rc<Cell<bool>>);

impl AliveFlag {
    pub(crate) fn is_alive(&self) -> bool {
        self.0.get()
    }

    fn retire(&self) {
        self.0.set(false);
    }
}

struct PollBinding {
    window: web_sys::Window,
    interval_id: i32,
    alive: AliveFlag,
    _callback: Closure<dyn Fn()>,
}

thread_local! {
    static POLL_BINDINGS: RefCell<HashMap<u64, PollBinding>> = RefCell::new(HashMap::new());
    static NEXT_POLL_ID: Cell<u64> = const { Cell::new(0) };
}

fn stop_polling(id: u64) {
    POLL_BINDINGS.with(|slot| {
        if let Some(binding) = slot.borrow_mut().remove(&id) {
            binding.alive.retire();
            binding
                .window
                .clear_interval_with_handle(binding.interval_id);
        }
    });
}

/// Run `task` once immediately, then every `period_ms`, for the lifetime of
/// the current reactive owner. The interval lives in a thread-local slot so
/// the cleanup closure captures nothing but an id; in-flight responses are
/// fenced by the flag.
pub(crate) fn start_polling(period_ms: u32, task: impl Fn(AliveFlag) + 'static) {
    let alive = AliveFlag(Rc::new(Cell::new(true)));
    let task = Rc::new(task);

    task(alive.clone());

    let Some(window) = web_sys::window() else {
        return;
    };

    let cb = {
        let alive = alive.clone();
        let task = Rc::clone(&task);
        Closure::<dyn Fn()>::new(move || {
            if alive.is_alive() {
                task(alive.clone());
            }
        })
    };
    let Ok(interval_id) = window.set_interval_with_callback_and_timeout_and_arguments_0(
        cb.as_ref().unchecked_ref(),
        period_ms as i32,
    ) else {
        return;
    };

    let id = NEXT_POLL_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });
    POLL_BINDINGS.with(|slot| {
        slot.borrow_mut().insert(
            id,
            PollBinding {
                window: window.clone(),
                interval_id,
                alive,
                _callback: cb,
            },
        );
    });

    on_cleanup(move || stop_polling(id));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retired_flag_reports_dead() {
        let flag = AliveFlag(Rc::new(Cell::new(true)));
        let seen_by_task = flag.clone();
        assert!(seen_by_task.is_alive());
        flag.retire();
        assert!(!seen_by_task.is_alive());
    }

    #[test]
    fn poll_ids_are_unique() {
        let first = NEXT_POLL_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        let second = NEXT_POLL_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        assert_ne!(first, second);
    }
}
