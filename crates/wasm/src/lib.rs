mod compare;
mod frame;
mod logger;
mod presets;
mod preview;

pub use compare::CompareHandle;
pub use presets::PresetHandle;
pub use preview::PreviewHandle;

use screen_review_core::overlay::CLOSE_KEY;
use screen_review_core::preview::{ScaleInput, compute_scale};
use screen_review_protocol::LayoutMode;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logger::init();
}

/// Zoom-to-fit scale for one surface.
#[wasm_bindgen(js_name = compute_scale)]
pub fn scale_for(
    viewport_width: f64,
    layout: &str,
    container_width: f64,
    container_height: f64,
    active_count: usize,
    zoom_to_fit: bool,
) -> Result<f64, JsError> {
    let mode: LayoutMode = parse_variant(layout)?;
    Ok(compute_scale(&ScaleInput {
        viewport_width,
        mode,
        container_width,
        container_height,
        active_count,
        zoom_to_fit,
    }))
}

/// Whether a `keydown` key should close the open overlay.
#[wasm_bindgen]
pub fn is_close_key(key: &str) -> bool {
    key == CLOSE_KEY
}

/// Parse a kebab-case enum variant such as `"parallel-row"`.
fn parse_variant<T: DeserializeOwned>(name: &str) -> Result<T, JsError> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| JsError::new(&format!("unknown mode: {name}")))
}

fn parse_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&format!("invalid {what}: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

#[allow(clippy::needless_pass_by_value)]
fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}
