use console_error_panic_hook::set_once;
use serde::Serialize;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use foundation::LatLng;
use formats::GroupRef;
use panel::{DragOrigin, Gesture};
use prefs::{HomeButton, PrefStore};
use store::{AppConfig, Command, ContentTicket, Effect, EventMap, SelectSource};

mod host;
use host::{fetch_text, log, notify, recenter_message, render_message, warn};

// Guard to prevent double-initialization of global state (relevant during hot reload).
static INITIALIZED: AtomicBool = AtomicBool::new(false);

struct WebState {
    map: EventMap,
    home: HomeButton<Box<dyn PrefStore>>,
    /// Host callback receiving `{type: "render"}` and `{type: "recenter", ...}`.
    listener: Option<js_sys::Function>,
}

thread_local! {
    static STATE: RefCell<WebState> = RefCell::new(WebState {
        map: EventMap::new(AppConfig::default()),
        home: HomeButton::load(prefs::default_store()),
        listener: None,
    });
}

/// Safe TLS access helper that returns a default on teardown instead of panicking.
fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&RefCell<WebState>) -> R,
    R: Default,
{
    STATE.try_with(f).unwrap_or_default()
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Applies `command` and carries out the effects it produced.
fn dispatch(command: Command) {
    with_state(|state| state.borrow_mut().map.dispatch(command));
    flush_effects();
}

/// Runs pending effects outside the state borrow; the listener may call back in.
fn flush_effects() {
    let (effects, listener, content_urls) = with_state(|state| {
        let mut s = state.borrow_mut();
        let effects = s.map.drain_effects();
        let urls: Vec<String> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::FetchContent(ticket) => Some(s.map.config().content_url(&ticket.filename)),
                _ => None,
            })
            .collect();
        (effects, s.listener.clone(), urls)
    });

    let mut urls = content_urls.into_iter();
    let mut render = false;
    for effect in effects {
        match effect {
            Effect::FetchContent(ticket) => {
                if let Some(url) = urls.next() {
                    spawn_content_fetch(url, ticket);
                }
            }
            Effect::Recenter { center, zoom } => {
                notify(listener.as_ref(), &recenter_message(center, zoom));
            }
            // Coalesced: one redraw covers every change in this batch.
            Effect::Render => render = true,
        }
    }
    if render {
        notify(listener.as_ref(), &render_message());
    }
}

fn spawn_content_fetch(url: String, ticket: ContentTicket) {
    spawn_local(async move {
        let result = fetch_text(&url).await;
        let outcome = with_state(|state| {
            Some(state.borrow_mut().map.content_loaded(&ticket, result))
        });
        match outcome {
            Some(Ok(true)) => {}
            Some(Ok(false)) => log(&format!(
                "cached {} for {} after the panel moved on",
                ticket.filename, ticket.item_id
            )),
            Some(Err(err)) => web_sys::console::error_1(&JsValue::from_str(&format!(
                "content for {}: {err}",
                ticket.item_id
            ))),
            None => return,
        }
        flush_effects();
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Avoid double-initialization (can happen during hot-reload edge cases).
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    set_once();
    Ok(())
}

/// Replaces the configuration with `config_json` (any subset of `AppConfig`).
///
/// Resets all map state; call before `load_event_data`.
#[wasm_bindgen]
pub fn configure(config_json: &str) -> Result<(), JsValue> {
    let config = AppConfig::from_json_str(config_json)
        .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?;
    with_state(|state| state.borrow_mut().map = EventMap::new(config));
    Ok(())
}

#[wasm_bindgen]
pub fn set_listener(listener: js_sys::Function) {
    with_state(|state| state.borrow_mut().listener = Some(listener));
}

/// Fetches the event data document once. Failures leave an empty map and are logged.
#[wasm_bindgen]
pub fn load_event_data() {
    let url = with_state(|state| state.borrow().map.config().data_url.clone());
    spawn_local(async move {
        match fetch_text(&url).await {
            Ok(text) => {
                let loaded = with_state(|state| {
                    let mut s = state.borrow_mut();
                    let messages = s.map.load(&text).map(|report| report.messages());
                    Some(messages.map(|messages| (messages, s.map.data().len())))
                });
                match loaded {
                    Some(Ok((messages, count))) => {
                        for msg in messages {
                            warn(&format!("event data: {msg}"));
                        }
                        log(&format!("loaded {count} items from {url}"));
                    }
                    Some(Err(err)) => web_sys::console::error_1(&JsValue::from_str(&format!(
                        "failed to load {url}: {err}"
                    ))),
                    None => return,
                }
            }
            Err(err) => {
                web_sys::console::error_1(&JsValue::from_str(&format!(
                    "failed to fetch {url}: {err}"
                )));
                with_state(|state| state.borrow_mut().map.load_failed(err.to_string()));
            }
        }
        flush_effects();
    });
}

#[wasm_bindgen]
pub fn marker_click(id: &str) {
    dispatch(Command::SelectItem {
        id: id.to_string(),
        source: SelectSource::Marker,
    });
}

fn group_or_none(id: &str, make: fn(String) -> GroupRef) -> Option<GroupRef> {
    let id = id.trim();
    (!id.is_empty()).then(|| make(id.to_string()))
}

/// An empty id clears the active story.
#[wasm_bindgen]
pub fn choose_story(id: &str) {
    dispatch(Command::ChooseGroup(group_or_none(id, GroupRef::Story)));
}

/// An empty id clears the active row.
#[wasm_bindgen]
pub fn choose_row(id: &str) {
    dispatch(Command::ChooseGroup(group_or_none(id, GroupRef::Row)));
}

#[wasm_bindgen]
pub fn map_click() {
    dispatch(Command::MapBackgroundClick);
}

/// Reports the host map's current center and zoom.
#[wasm_bindgen]
pub fn set_view(lat: f64, lng: f64, zoom: f64) {
    dispatch(Command::SetView {
        center: LatLng::new(lat, lng),
        zoom,
    });
}

#[wasm_bindgen]
pub fn set_viewport_size(width_px: f64, height_px: f64) {
    dispatch(Command::Resize {
        width_px,
        height_px,
    });
}

/// `origin` is `"handle"` or `"content"`.
#[wasm_bindgen]
pub fn panel_drag_begin(origin: &str, y_px: f64) {
    let origin = match origin.trim().to_ascii_lowercase().as_str() {
        "handle" => DragOrigin::Handle,
        _ => DragOrigin::Content,
    };
    with_state(|state| state.borrow_mut().map.drag_begin(origin, y_px));
}

/// Returns the recognized gesture: `none`, `swipe_up`, `swipe_down` or `handle_tap`.
#[wasm_bindgen]
pub fn panel_drag_end(y_px: f64) -> String {
    let gesture = with_state(|state| Some(state.borrow_mut().map.drag_end(y_px)));
    flush_effects();
    let name = match gesture.unwrap_or(Gesture::None) {
        Gesture::None => "none",
        Gesture::SwipeUp => "swipe_up",
        Gesture::SwipeDown => "swipe_down",
        Gesture::HandleTap => "handle_tap",
    };
    name.to_string()
}

#[wasm_bindgen]
pub fn panel_handle_tap() {
    dispatch(Command::Gesture(Gesture::HandleTap));
}

#[wasm_bindgen]
pub fn panel_close() {
    dispatch(Command::ClosePanel);
}

#[wasm_bindgen]
pub fn panel_back() {
    dispatch(Command::Back);
}

#[wasm_bindgen]
pub fn panel_open_member(id: &str) {
    dispatch(Command::OpenGroupMember { id: id.to_string() });
}

#[wasm_bindgen]
pub fn panel_follow_link() {
    dispatch(Command::FollowLink);
}

#[wasm_bindgen]
pub fn info_open() {
    dispatch(Command::InfoOpen);
}

#[wasm_bindgen]
pub fn info_close() {
    dispatch(Command::InfoClose);
}

#[wasm_bindgen]
pub fn info_select_tab(index: u32) {
    dispatch(Command::InfoSelectTab(index as usize));
}

/// Records the first-visit click and opens the info dialog.
#[wasm_bindgen]
pub fn home_button_click() {
    let persisted = with_state(|state| Some(state.borrow_mut().home.click()));
    if let Some(Err(err)) = persisted {
        warn(&format!("could not persist visited flag: {err}"));
    }
    dispatch(Command::InfoOpen);
}

/// `{class_name, tooltip_visible}` as JSON.
#[wasm_bindgen]
pub fn home_button_state() -> String {
    with_state(|state| {
        let s = state.borrow();
        to_json(&s.home.state(s.map.info().open))
    })
}

/// Every marker with its icon, as a JSON array.
#[wasm_bindgen]
pub fn markers() -> String {
    with_state(|state| to_json(&state.borrow().map.markers()))
}

#[wasm_bindgen]
pub fn panel() -> String {
    with_state(|state| to_json(&state.borrow().map.panel()))
}

#[wasm_bindgen]
pub fn stories() -> String {
    with_state(|state| to_json(&state.borrow().map.stories()))
}

#[wasm_bindgen]
pub fn rows() -> String {
    with_state(|state| to_json(&state.borrow().map.rows()))
}

#[wasm_bindgen]
pub fn info_state() -> String {
    with_state(|state| to_json(&state.borrow().map.info()))
}
