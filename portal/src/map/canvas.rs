use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{PointerEvent, WheelEvent};

use rog_shared::point::PointKind;

use super::icons;
use super::mercator::{self, TILE_SIZE};
use super::tiles::{TileLayer, TileStore};
use super::viewport::MapViewport;

#[derive(Clone, PartialEq)]
pub(crate) struct MapMarker {
    pub lat: f64,
    pub lng: f64,
    pub kind: PointKind,
}

/// Canvas-2D slippy map: tile basemap plus boundary rings, type-classified
/// markers and an optional approximate-area circle. Pointer drag pans, wheel
/// zooms toward the cursor.
#[component]
pub(crate) fn MapCanvas(
    viewport: RwSignal<MapViewport>,
    layer: RwSignal<TileLayer>,
    #[prop(into)] rings: Signal<Vec<Vec<(f64, f64)>>>,
    #[prop(into)] markers: Signal<Vec<MapMarker>>,
    #[prop(into)] circle: Signal<Option<(f64, f64, f64)>>,
    #[prop(into)] pin: Signal<Option<(f64, f64)>>,
    width: f64,
    height: f64,
) -> impl IntoView {
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let store = TileStore::new();

    let draw_store = store.clone();
    Effect::new(move || {
        let vp = viewport.get();
        let active_layer = layer.get();
        draw_store.version.track();
        let rings = rings.get();
        let markers = markers.get();
        let circle = circle.get();
        let pin = pin.get();

        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        draw(
            &canvas, &draw_store, &vp, active_layer, &rings, &markers, circle, pin, width, height,
        );
    });

    let dragging = Rc::new(Cell::new(false));
    let last_x = Rc::new(Cell::new(0.0f64));
    let last_y = Rc::new(Cell::new(0.0f64));

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let delta = e.delta_y();
        let x = e.offset_x() as f64;
        let y = e.offset_y() as f64;
        viewport.update(|vp| vp.zoom_at(delta, x, y, width, height));
    };

    let on_pointer_down = {
        let dragging = dragging.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            dragging.set(true);
            last_x.set(e.client_x() as f64);
            last_y.set(e.client_y() as f64);
            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
                el.style().set_property("cursor", "grabbing").ok();
            }
        }
    };

    let on_pointer_move = {
        let dragging = dragging.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            if !dragging.get() {
                return;
            }
            let dx = e.client_x() as f64 - last_x.get();
            let dy = e.client_y() as f64 - last_y.get();
            last_x.set(e.client_x() as f64);
            last_y.set(e.client_y() as f64);
            viewport.update(|vp| vp.pan(dx, dy));
        }
    };

    let on_pointer_up = {
        let dragging = dragging.clone();
        move |e: PointerEvent| {
            dragging.set(false);
            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.style().set_property("cursor", "grab").ok();
            }
        }
    };

    view! {
        <div class="map-canvas" style=format!("position: relative; width: {width}px; height: {height}px;")>
            <canvas
                node_ref=canvas_ref
                style="cursor: grab; touch-action: none; width: 100%; height: 100%;"
                on:wheel=on_wheel
                on:pointerdown=on_pointer_down
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_up
            ></canvas>
            <div class="map-attribution">{move || layer.get().attribution()}</div>
        </div>
    }
}

#[allow(clippy::too_many_arguments)]
fn draw(
    canvas: &web_sys::HtmlCanvasElement,
    store: &TileStore,
    vp: &MapViewport,
    layer: TileLayer,
    rings: &[Vec<(f64, f64)>],
    markers: &[MapMarker],
    circle: Option<(f64, f64, f64)>,
    pin: Option<(f64, f64)>,
    w: f64,
    h: f64,
) {
    let dpr = web_sys::window()
        .map(|win| win.device_pixel_ratio())
        .unwrap_or(1.0)
        .max(1.0);
    canvas.set_width((w * dpr) as u32);
    canvas.set_height((h * dpr) as u32);

    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<web_sys::CanvasRenderingContext2d>().ok())
    else {
        return;
    };
    let _ = ctx.scale(dpr, dpr);

    ctx.set_fill_style_str("#dfe8da");
    ctx.fill_rect(0.0, 0.0, w, h);

    // Basemap tiles at the integer zoom below the viewport's, scaled up.
    let z = vp.zoom.floor() as u8;
    let scale = (vp.zoom - z as f64).exp2();
    let draw_size = TILE_SIZE * scale;
    let (cx, cy) = mercator::project(vp.center_lat, vp.center_lng, vp.zoom);
    for key in store.request_visible(vp, layer, w, h) {
        let Some(image) = store.get(&key) else {
            continue;
        };
        let sx = key.x as f64 * draw_size - cx + w / 2.0;
        let sy = key.y as f64 * draw_size - cy + h / 2.0;
        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &image, sx, sy, draw_size, draw_size,
        );
    }

    // Boundary: lightly filled polygon with a heavy outline.
    ctx.set_stroke_style_str("#1b5e20");
    ctx.set_fill_style_str("rgba(27, 94, 32, 0.08)");
    ctx.set_line_width(4.0);
    for ring in rings {
        let mut points = ring.iter();
        let Some(&(lat, lng)) = points.next() else {
            continue;
        };
        ctx.begin_path();
        let (x, y) = vp.to_screen(lat, lng, w, h);
        ctx.move_to(x, y);
        for &(lat, lng) in points {
            let (x, y) = vp.to_screen(lat, lng, w, h);
            ctx.line_to(x, y);
        }
        ctx.close_path();
        ctx.fill();
        ctx.stroke();
    }

    if let Some((lat, lng, radius_m)) = circle {
        let (x, y) = vp.to_screen(lat, lng, w, h);
        let radius_px = radius_m / mercator::meters_per_pixel(lat, vp.zoom);
        ctx.begin_path();
        let _ = ctx.arc(x, y, radius_px, 0.0, 2.0 * std::f64::consts::PI);
        ctx.set_fill_style_str("rgba(211, 47, 47, 0.15)");
        ctx.fill();
        ctx.set_stroke_style_str("#d32f2f");
        ctx.set_line_width(1.5);
        ctx.stroke();
        icons::draw_pin(&ctx, x, y);
    }

    if let Some((lat, lng)) = pin {
        let (x, y) = vp.to_screen(lat, lng, w, h);
        icons::draw_pin(&ctx, x, y);
    }

    for marker in markers {
        let (x, y) = vp.to_screen(marker.lat, marker.lng, w, h);
        if x < -20.0 || y < -20.0 || x > w + 20.0 || y > h + 20.0 {
            continue;
        }
        icons::draw_marker(&ctx, x, y, marker.kind);
    }
}
