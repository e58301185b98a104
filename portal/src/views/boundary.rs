use std::collections::HashSet;

use leptos::prelude::*;

use rog_shared::boundary::{BoundaryManifestEntry, geojson_bounds, ld_slug, polygon_rings};
use rog_shared::point::{ALL_KINDS, Point, PointDiagnostics, PointKind};
use rog_shared::user::Role;

use crate::api;
use crate::files::{check_extension, file_from_input, read_upload};
use crate::map::canvas::{MapCanvas, MapMarker};
use crate::map::tiles::{ALL_LAYERS, TileLayer};
use crate::map::viewport::MapViewport;
use crate::session::SessionStore;

const MAP_W: f64 = 920.0;
const MAP_H: f64 = 560.0;

/// Club boundary and points map. Boundary and point fetches are independent:
/// either failing leaves the other rendered, each with its own inline error.
#[component]
pub(crate) fn BoundaryMapView() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let viewport = RwSignal::new(MapViewport::default());
    let layer = RwSignal::new(TileLayer::Standard);
    let rings = RwSignal::new(Vec::<Vec<(f64, f64)>>::new());
    let points = RwSignal::new(Vec::<Point>::new());
    let enabled_kinds = RwSignal::new(ALL_KINDS.into_iter().collect::<HashSet<PointKind>>());
    let boundary_error = RwSignal::new(Option::<String>::None);
    let points_error = RwSignal::new(Option::<String>::None);
    let import_msg = RwSignal::new(Option::<String>::None);

    // Boundary: manifest lookup by club slug, then the GeoJSON itself.
    Effect::new(move || {
        let Some(ld_id) = session.user().and_then(|u| u.ld_id) else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            let result = load_boundary(&ld_id).await;
            match result {
                Ok((loaded_rings, bounds)) => {
                    rings.set(loaded_rings);
                    if let Some(bounds) = bounds {
                        viewport.update(|vp| vp.fit_bounds(&bounds, MAP_W, MAP_H));
                    }
                    boundary_error.set(None);
                }
                Err(e) => boundary_error.set(Some(e)),
            }
        });
    });

    let reload_points = move || {
        let Some(token) = session.token_untracked() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match api::points(&token).await {
                Ok(resp) => {
                    points.set(resp.points);
                    points_error.set(None);
                }
                Err(e) => points_error.set(Some(e)),
            }
        });
    };
    Effect::new(move || reload_points());

    let markers = Signal::derive(move || {
        let kinds = enabled_kinds.get();
        points.with(|points| {
            points
                .iter()
                .filter_map(|point| {
                    let kind = point.kind();
                    if !kinds.contains(&kind) {
                        return None;
                    }
                    let (lat, lng) = point.coords()?;
                    Some(MapMarker { lat, lng, kind })
                })
                .collect::<Vec<_>>()
        })
    });

    let diagnostics = Signal::derive(move || points.with(|p| PointDiagnostics::collect(p)));
    let show_diagnostics = Signal::derive(move || {
        diagnostics.get().invalid > 0
            || boundary_error.get().is_some()
            || points_error.get().is_some()
    });

    let is_super = move || {
        session
            .user()
            .map(|u| u.role == Role::Super)
            .unwrap_or(false)
    };

    let import_points = move |ev: web_sys::Event| {
        import_msg.set(None);
        let Some(file) = file_from_input(&ev) else {
            return;
        };
        if let Err(e) = check_extension(&file.name(), &[".csv", ".xlsx", ".xls"]) {
            import_msg.set(Some(e));
            return;
        }
        let Some(token) = session.token_untracked() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            let result = match read_upload(file).await {
                Ok(upload) => api::import_points(&token, &upload).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(outcome) => {
                    import_msg.set(Some(format!(
                        "Uvoženih {} točk, preskočenih {}.",
                        outcome.processed, outcome.skipped
                    )));
                    reload_points();
                }
                Err(e) => import_msg.set(Some(e)),
            }
        });
    };

    let toggle_kind = move |kind: PointKind| {
        enabled_kinds.update(|kinds| {
            if !kinds.remove(&kind) {
                kinds.insert(kind);
            }
        });
    };

    view! {
        <section class="boundary-map">
            <h1>"Karta revirja"</h1>
            <div class="map-toolbar">
                <div class="layer-picker">
                    {ALL_LAYERS
                        .into_iter()
                        .map(|l| {
                            view! {
                                <button
                                    class:active=move || layer.get() == l
                                    on:click=move |_| layer.set(l)
                                >
                                    {l.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
                <div class="kind-filter">
                    {ALL_KINDS
                        .into_iter()
                        .map(|kind| {
                            view! {
                                <label>
                                    <input
                                        type="checkbox"
                                        prop:checked=move || {
                                            enabled_kinds.with(|kinds| kinds.contains(&kind))
                                        }
                                        on:change=move |_| toggle_kind(kind)
                                    />
                                    {kind.label()}
                                </label>
                            }
                        })
                        .collect_view()}
                </div>
                {move || {
                    is_super()
                        .then(|| {
                            view! {
                                <label class="upload">
                                    "Uvoz točk"
                                    <input
                                        type="file"
                                        accept=".csv,.xlsx,.xls"
                                        on:change=import_points
                                    />
                                </label>
                            }
                        })
                }}
            </div>
            {move || boundary_error.get().map(|msg| {
                view! { <p class="error">{format!("Meja revirja: {msg}")}</p> }
            })}
            {move || points_error.get().map(|msg| {
                view! { <p class="error">{format!("Točke: {msg}")}</p> }
            })}
            {move || import_msg.get().map(|msg| view! { <p class="notice">{msg}</p> })}
            <MapCanvas
                viewport=viewport
                layer=layer
                rings=rings
                markers=markers
                circle=Signal::derive(|| None)
                pin=Signal::derive(|| None)
                width=MAP_W
                height=MAP_H
            />
            {move || {
                show_diagnostics
                    .get()
                    .then(|| {
                        let diag = diagnostics.get();
                        view! {
                            <div class="map-diagnostics">
                                <span>{format!("Točk skupaj: {}", diag.total)}</span>
                                <span>{format!("veljavnih: {}", diag.valid)}</span>
                                <span>{format!("brez koordinat: {}", diag.invalid)}</span>
                            </div>
                        }
                    })
            }}
        </section>
    }
}

/// Manifest lookup plus boundary fetch. The slug is derived from the club
/// identifier, `ld_`-prefixed when not already.
pub(crate) async fn load_boundary(
    ld_id: &str,
) -> Result<(Vec<Vec<(f64, f64)>>, Option<rog_shared::boundary::LatLngBounds>), String> {
    let manifest: Vec<BoundaryManifestEntry> =
        api::static_json("/boundaries/manifest.json").await?;
    let slug = ld_slug(ld_id);
    let entry = manifest
        .iter()
        .find(|entry| entry.slug == slug)
        .ok_or_else(|| format!("meja za {slug} ni na voljo"))?;
    let doc: geojson::GeoJson = api::static_json(&entry.geojson_url).await?;
    let bounds = geojson_bounds(&doc);
    Ok((polygon_rings(&doc), bounds))
}
