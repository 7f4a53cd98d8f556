//! Browser plumbing: HTTP fetches, console output and listener messages.

use foundation::LatLng;
use gloo_net::http::Request;
use streaming::FetchError;
use wasm_bindgen::prelude::*;

pub fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

pub fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

/// GETs `url` as text. Non-2xx responses are errors.
pub async fn fetch_text(url: &str) -> Result<String, FetchError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;
    if !resp.ok() {
        return Err(FetchError::Status(resp.status()));
    }
    resp.text()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))
}

pub fn render_message() -> JsValue {
    let o = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&o, &JsValue::from_str("type"), &JsValue::from_str("render"));
    o.into()
}

pub fn recenter_message(center: LatLng, zoom: f64) -> JsValue {
    let o = js_sys::Object::new();
    let _ = js_sys::Reflect::set(
        &o,
        &JsValue::from_str("type"),
        &JsValue::from_str("recenter"),
    );
    let _ = js_sys::Reflect::set(&o, &JsValue::from_str("lat"), &JsValue::from_f64(center.lat));
    let _ = js_sys::Reflect::set(&o, &JsValue::from_str("lng"), &JsValue::from_f64(center.lng));
    let _ = js_sys::Reflect::set(&o, &JsValue::from_str("zoom"), &JsValue::from_f64(zoom));
    o.into()
}

/// Calls the host listener, if one is set. Listener exceptions are logged.
pub fn notify(listener: Option<&js_sys::Function>, message: &JsValue) {
    let Some(f) = listener else {
        return;
    };
    if let Err(err) = f.call1(&JsValue::NULL, message) {
        web_sys::console::error_1(&JsValue::from_str(&format!("listener error: {:?}", err)));
    }
}
