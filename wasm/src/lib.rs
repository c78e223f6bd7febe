//! WebAssembly module for the Crop Advisor platform
//!
//! Provides client-side helpers for the prediction form:
//! - Crop guidance lookup
//! - Field validation before submit
//! - Rainfall estimation from hourly readings

use rust_decimal::prelude::ToPrimitive;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("crop advisor form helpers loaded"));
}

/// Guidance for a crop name as JSON
#[wasm_bindgen]
pub fn crop_details_json(crop_name: &str) -> Result<String, JsValue> {
    serde_json::to_string(&shared::lookup(crop_name))
        .map_err(|e| JsValue::from_str(&format!("Failed to encode crop details: {}", e)))
}

/// Check one numeric form value; returns the error message, if any
#[wasm_bindgen]
pub fn numeric_field_error(value: &str) -> Option<String> {
    parse_numeric_field(Some(value)).err().map(str::to_string)
}

/// Names of the fields that fail validation in a JSON-encoded observation
#[wasm_bindgen]
pub fn invalid_fields(observation_json: &str) -> Result<js_sys::Array, JsValue> {
    let raw: RawObservation = serde_json::from_str(observation_json).map_err(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&format!("Bad observation JSON: {}", e)));
        JsValue::from_str(&format!("Invalid observation JSON: {}", e))
    })?;

    Ok(field_names(&raw)
        .into_iter()
        .map(JsValue::from)
        .collect())
}

/// Estimated daily rainfall in mm from 1h and 3h readings (0 when absent)
#[wasm_bindgen]
pub fn estimate_daily_rainfall(rain_1h: Option<f64>, rain_3h: Option<f64>) -> f64 {
    extrapolate_daily_rainfall(rain_1h, rain_3h)
        .to_f64()
        .unwrap_or(0.0)
}

fn field_names(raw: &RawObservation) -> Vec<String> {
    match raw.validate() {
        Ok(_) => Vec::new(),
        Err(e) => e.field_names().into_iter().map(str::to_string).collect(),
    }
}
