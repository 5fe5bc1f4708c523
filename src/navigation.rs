//! History Navigation
//!
//! Thin wrapper over `history.pushState` / `popstate` so the shell can keep
//! the browser path in a signal.

use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen::JsValue;

/// `pathname + search` of the current location
pub fn current_location() -> String {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return "/".to_string();
    };
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    format!("{}{}", path, search)
}

/// Write `path` to the address bar; `replace` does not add a history entry
pub fn set_location(path: &str, replace: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = if replace {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    };
    if let Err(e) = result {
        tracing::warn!(path, error = ?e, "history update failed");
    }
}

/// Keep `set_path` in sync with back/forward buttons
pub fn listen_popstate(set_path: WriteSignal<String>) {
    let handle = window_event_listener(ev::popstate, move |_| {
        set_path.set(current_location());
    });
    on_cleanup(move || handle.remove());
}
