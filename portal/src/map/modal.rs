use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use rog_shared::location::ResolvedLocation;

use super::canvas::{MapCanvas, MapMarker};
use super::tiles::{ALL_LAYERS, TileLayer};
use super::viewport::MapViewport;
use crate::session::SessionStore;
use crate::views::boundary::load_boundary;

const MODAL_W: f64 = 640.0;
const MODAL_H: f64 = 420.0;

struct KeydownBinding {
    window: web_sys::Window,
    _handler: Closure<dyn Fn(web_sys::KeyboardEvent)>,
}

thread_local! {
    static MODAL_KEYDOWN_BINDING: RefCell<Option<KeydownBinding>> = const { RefCell::new(None) };
}

fn clear_keydown_binding() {
    MODAL_KEYDOWN_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            let _ = old.window.remove_event_listener_with_callback(
                "keydown",
                old._handler.as_ref().unchecked_ref(),
            );
        }
    });
}

#[derive(Clone, PartialEq)]
pub(crate) struct MapTarget {
    pub title: String,
    pub location: ResolvedLocation,
}

/// Per-row map popup shared by the active-hunt roster and the hunt-log
/// table. One state handle per view; opening replaces the previous target.
#[derive(Clone, Copy)]
pub(crate) struct MapModalState {
    target: RwSignal<Option<MapTarget>>,
}

impl MapModalState {
    pub(crate) fn new() -> MapModalState {
        MapModalState {
            target: RwSignal::new(None),
        }
    }

    pub(crate) fn open(&self, target: MapTarget) {
        // Hidden locations never reach the map; the button is disabled, this
        // is the backstop.
        if target.location.can_map() {
            self.target.set(Some(target));
        }
    }

    pub(crate) fn close(&self) {
        self.target.set(None);
    }

    pub(crate) fn render(self) -> impl IntoView {
        move || {
            self.target
                .get()
                .map(|target| view! { <LocationModal state=self target=target /> })
        }
    }
}

#[component]
fn LocationModal(state: MapModalState, target: MapTarget) -> impl IntoView {
    let (lat, lng) = target.location.coords().unwrap_or((46.05, 14.5));
    let zoom = match target.location {
        ResolvedLocation::Approx { radius_m, .. } if radius_m > 2_000.0 => 12.0,
        _ => 14.0,
    };
    let viewport = RwSignal::new(MapViewport::centered(lat, lng, zoom));
    let layer = RwSignal::new(TileLayer::Standard);
    let rings = RwSignal::new(Vec::<Vec<(f64, f64)>>::new());

    // Club boundary as context; a failed fetch just leaves the outline off.
    let session = expect_context::<SessionStore>();
    Effect::new(move || {
        let Some(ld_id) = session.user().and_then(|u| u.ld_id) else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            if let Ok((loaded_rings, _)) = load_boundary(&ld_id).await {
                rings.set(loaded_rings);
            }
        });
    });

    // Escape closes, same window-level binding the backdrop click shares.
    Effect::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        clear_keydown_binding();
        let handler = Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(
            move |e: web_sys::KeyboardEvent| {
                if e.key() == "Escape" {
                    state.close();
                }
            },
        );
        if window
            .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            MODAL_KEYDOWN_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(KeydownBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
        on_cleanup(clear_keydown_binding);
    });

    let circle = match target.location {
        ResolvedLocation::Approx { lat, lng, radius_m } => Some((lat, lng, radius_m)),
        _ => None,
    };
    let pin = match target.location {
        ResolvedLocation::Poi { lat, lng } => Some((lat, lng)),
        _ => None,
    };

    view! {
        <div class="modal-backdrop" on:click=move |_| state.close()>
            <div class="modal map-modal" on:click=|e| e.stop_propagation()>
                <header>
                    <h2>{target.title.clone()}</h2>
                    <select on:change=move |ev| {
                        layer
                            .set(
                                match event_target_value(&ev).as_str() {
                                    "topo" => TileLayer::Topo,
                                    "sat" => TileLayer::Satellite,
                                    _ => TileLayer::Standard,
                                },
                            )
                    }>
                        {ALL_LAYERS
                            .into_iter()
                            .map(|l| {
                                let value = match l {
                                    TileLayer::Standard => "std",
                                    TileLayer::Topo => "topo",
                                    TileLayer::Satellite => "sat",
                                };
                                view! { <option value=value>{l.label()}</option> }
                            })
                            .collect_view()}
                    </select>
                    <button on:click=move |_| state.close()>"Zapri"</button>
                </header>
                <MapCanvas
                    viewport=viewport
                    layer=layer
                    rings=rings
                    markers=Signal::derive(Vec::<MapMarker>::new)
                    circle=Signal::derive(move || circle)
                    pin=Signal::derive(move || pin)
                    width=MODAL_W
                    height=MODAL_H
                />
            </div>
        </div>
    }
}
