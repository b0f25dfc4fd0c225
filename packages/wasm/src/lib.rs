use quickedit_editor::{
    classify_background_values, compose_stable_id, merge_queues, parse_queue, ElementType, PendingQueue,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Compose the stable id for the `index`-th element of `element_type`
#[wasm_bindgen(js_name = stableId)]
pub fn stable_id_js(element_type: &str, index: usize, page_identifier: &str) -> String {
    compose_stable_id(ElementType::from_attribute(element_type), index, page_identifier)
}

/// Classify a background from its computed values and inline style
///
/// Returns `{"kind": ..., "value": ...}` as JSON.
#[wasm_bindgen(js_name = classifyBackground)]
pub fn classify_background_js(background_image: &str, background_color: &str, inline_style: &str) -> Result<String, JsValue> {
    let classification = classify_background_values(background_image, background_color, inline_style);
    to_json(&classification).map_err(|e| JsValue::from_str(&e))
}

/// Merge the in-memory pending queue over the cached one
///
/// Both arguments are JSON objects keyed by stable id. Malformed cached
/// entries are dropped; the in-memory side wins on conflicts.
#[wasm_bindgen(js_name = mergePendingQueues)]
pub fn merge_pending_queues_js(memory_json: &str, cached_json: &str) -> Result<String, JsValue> {
    merge_pending_queues(memory_json, cached_json).map_err(|e| JsValue::from_str(&e))
}

fn merge_pending_queues(memory_json: &str, cached_json: &str) -> Result<String, String> {
    let memory: PendingQueue =
        serde_json::from_str(memory_json).map_err(|e| format!("Invalid in-memory queue: {}", e))?;
    let cached = parse_queue(cached_json);
    to_json(&merge_queues(memory, cached))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}
