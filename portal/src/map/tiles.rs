use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use js_sys::Reflect;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

use super::mercator::TILE_SIZE;
use super::viewport::MapViewport;

const MAX_CONCURRENCY: usize = 6;
const MAX_CACHED_TILES: usize = 384;
const ONLOAD_HANDLE_KEY: &str = "__rogTileOnload";
const ONERROR_HANDLE_KEY: &str = "__rogTileOnerror";

/// Selectable basemap sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) enum TileLayer {
    #[default]
    Standard,
    Topo,
    Satellite,
}

pub(crate) const ALL_LAYERS: [TileLayer; 3] =
    [TileLayer::Standard, TileLayer::Topo, TileLayer::Satellite];

impl TileLayer {
    pub(crate) fn label(self) -> &'static str {
        match self {
            TileLayer::Standard => "Karta",
            TileLayer::Topo => "Topografska",
            TileLayer::Satellite => "Satelit",
        }
    }

    pub(crate) fn attribution(self) -> &'static str {
        match self {
            TileLayer::Standard => "© OpenStreetMap contributors",
            TileLayer::Topo => "© OpenStreetMap contributors, SRTM | © OpenTopoMap",
            TileLayer::Satellite => "© Esri, Maxar, Earthstar Geographics",
        }
    }

    fn url(self, z: u8, x: u32, y: u32) -> String {
        match self {
            TileLayer::Standard => {
                format!("https://tile.openstreetmap.org/{z}/{x}/{y}.png")
            }
            TileLayer::Topo => {
                format!("https://a.tile.opentopomap.org/{z}/{x}/{y}.png")
            }
            TileLayer::Satellite => format!(
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TileKey {
    pub layer: TileLayer,
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// Tile image cache with a bounded download queue. Loads bump `version` so
/// the canvas redraw effect re-runs as images arrive.
#[derive(Clone)]
pub(crate) struct TileStore {
    loaded: Rc<RefCell<HashMap<TileKey, HtmlImageElement>>>,
    pending: Rc<RefCell<HashSet<TileKey>>>,
    queue: Rc<RefCell<VecDeque<TileKey>>>,
    in_flight: Rc<Cell<usize>>,
    pub version: RwSignal<u64>,
}

impl TileStore {
    pub(crate) fn new() -> TileStore {
        TileStore {
            loaded: Rc::new(RefCell::new(HashMap::new())),
            pending: Rc::new(RefCell::new(HashSet::new())),
            queue: Rc::new(RefCell::new(VecDeque::new())),
            in_flight: Rc::new(Cell::new(0)),
            version: RwSignal::new(0),
        }
    }

    pub(crate) fn get(&self, key: &TileKey) -> Option<HtmlImageElement> {
        self.loaded.borrow().get(key).cloned()
    }

    /// Queue downloads for every tile visible in the viewport, nearest to the
    /// canvas center first.
    pub(crate) fn request_visible(
        &self,
        vp: &MapViewport,
        layer: TileLayer,
        w: f64,
        h: f64,
    ) -> Vec<TileKey> {
        let visible = visible_tiles(vp, layer, w, h);

        let mut missing: Vec<(TileKey, f64)> = {
            let loaded = self.loaded.borrow();
            let pending = self.pending.borrow();
            visible
                .iter()
                .filter(|(key, _)| !loaded.contains_key(key) && !pending.contains(key))
                .copied()
                .collect()
        };
        // Download center-out.
        missing.sort_by(|a, b| a.1.total_cmp(&b.1));

        if !missing.is_empty() {
            {
                let mut pending = self.pending.borrow_mut();
                let mut queue = self.queue.borrow_mut();
                for (key, _) in missing {
                    pending.insert(key);
                    queue.push_back(key);
                }
            }
            self.pump();
        }

        self.evict(layer, vp.zoom.floor() as u8);
        visible.into_iter().map(|(key, _)| key).collect()
    }

    fn pump(&self) {
        while self.in_flight.get() < MAX_CONCURRENCY {
            let Some(key) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            self.in_flight.set(self.in_flight.get() + 1);
            self.load(key);
        }
    }

    fn load(&self, key: TileKey) {
        let store = self.clone();
        let img = match HtmlImageElement::new() {
            Ok(img) => img,
            Err(_) => {
                self.finish(key, None);
                return;
            }
        };
        let _ = img.set_attribute("crossOrigin", "anonymous");

        let img_for_load = img.clone();
        let store_load = store.clone();
        let onload = Closure::<dyn FnMut()>::new(move || {
            clear_image_handlers(&img_for_load);
            store_load.finish(key, Some(img_for_load.clone()));
        });

        let img_for_error = img.clone();
        let store_error = store.clone();
        let onerror = Closure::<dyn FnMut()>::new(move || {
            clear_image_handlers(&img_for_error);
            store_error.finish(key, None);
        });

        let onload_js = onload.into_js_value();
        let onerror_js = onerror.into_js_value();
        img.set_onload(Some(onload_js.unchecked_ref()));
        img.set_onerror(Some(onerror_js.unchecked_ref()));
        let _ = Reflect::set(img.as_ref(), &JsValue::from_str(ONLOAD_HANDLE_KEY), &onload_js);
        let _ = Reflect::set(img.as_ref(), &JsValue::from_str(ONERROR_HANDLE_KEY), &onerror_js);
        img.set_src(&key.layer.url(key.z, key.x, key.y));
    }

    fn finish(&self, key: TileKey, image: Option<HtmlImageElement>) {
        self.pending.borrow_mut().remove(&key);
        self.in_flight.set(self.in_flight.get().saturating_sub(1));
        if let Some(image) = image {
            self.loaded.borrow_mut().insert(key, image);
            self.version.update(|v| *v += 1);
        }
        self.pump();
    }

    /// Drop tiles from other layers/zooms once the cache grows past its cap.
    fn evict(&self, layer: TileLayer, z: u8) {
        let mut loaded = self.loaded.borrow_mut();
        if loaded.len() <= MAX_CACHED_TILES {
            return;
        }
        loaded.retain(|key, _| key.layer == layer && key.z == z);
    }
}

/// Tiles covering the canvas at the viewport's integer zoom, with squared
/// pixel distance to the canvas center.
fn visible_tiles(vp: &MapViewport, layer: TileLayer, w: f64, h: f64) -> Vec<(TileKey, f64)> {
    let z = vp.zoom.floor().clamp(0.0, 22.0) as u8;
    let tile_count = 1u32 << z;
    let scale = (vp.zoom - z as f64).exp2();
    let draw_size = TILE_SIZE * scale;

    let (cx, cy) = super::mercator::project(vp.center_lat, vp.center_lng, z as f64);
    let left = cx - w / 2.0 / scale;
    let top = cy - h / 2.0 / scale;
    let right = cx + w / 2.0 / scale;
    let bottom = cy + h / 2.0 / scale;

    let x_min = (left / TILE_SIZE).floor().max(0.0) as i64;
    let x_max = (right / TILE_SIZE).floor().min(tile_count as f64 - 1.0) as i64;
    let y_min = (top / TILE_SIZE).floor().max(0.0) as i64;
    let y_max = (bottom / TILE_SIZE).floor().min(tile_count as f64 - 1.0) as i64;

    let mut out = Vec::new();
    for x in x_min..=x_max {
        for y in y_min..=y_max {
            if x < 0 || y < 0 {
                continue;
            }
            let key = TileKey {
                layer,
                z,
                x: x as u32,
                y: y as u32,
            };
            let center_x = (x as f64 + 0.5) * draw_size;
            let center_y = (y as f64 + 0.5) * draw_size;
            let dx = center_x - cx * scale;
            let dy = center_y - cy * scale;
            out.push((key, dx * dx + dy * dy));
        }
    }
    out
}

fn clear_image_handlers(img: &HtmlImageElement) {
    img.set_onload(None);
    img.set_onerror(None);
    let _ = Reflect::delete_property(img.as_ref(), &JsValue::from_str(ONLOAD_HANDLE_KEY));
    let _ = Reflect::delete_property(img.as_ref(), &JsValue::from_str(ONERROR_HANDLE_KEY));
}
