use js_sys::{Object, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Plain JS object with the given own properties, in order.
pub fn js_object(entries: &[(&str, JsValue)]) -> Object {
    let out = Object::new();
    for (key, value) in entries {
        // Defining a property on a fresh plain object cannot throw.
        let _ = Reflect::set(&out, &JsValue::from_str(key), value);
    }
    out
}

/// `null`/`undefined` address the root; anything else must deserialize
/// as a handle.
pub fn parent_handle(v: &JsValue) -> Result<Option<splinetree::Handle>, serde_wasm_bindgen::Error> {
    if v.is_null() || v.is_undefined() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(v.clone()).map(Some)
}

/// Serialize for JS with maps as plain objects, so `serde_json::Value`
/// snapshots read like JSON.
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).unwrap_or(JsValue::NULL)
}
