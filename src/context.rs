//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;
use wastewise_client::{ApiClient, ApiError};

use crate::navigation;
use crate::toast::ToastContext;

/// App-wide handles provided via context
///
/// The API client is `Rc`-based, so it lives in local arena storage and is
/// cloned out only inside async tasks.
#[derive(Clone, Copy)]
pub struct AppContext {
    client: StoredValue<ApiClient, LocalStorage>,
    /// Current browser path (with query) - read
    pub path: ReadSignal<String>,
    /// Current browser path (with query) - write
    set_path: WriteSignal<String>,
    /// Trigger to re-fetch lists after a mutation - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to re-fetch lists after a mutation - write
    set_reload_trigger: WriteSignal<u32>,
    pub toasts: ToastContext,
}

impl AppContext {
    pub fn new(
        client: ApiClient,
        path: (ReadSignal<String>, WriteSignal<String>),
        reload_trigger: (ReadSignal<u32>, WriteSignal<u32>),
        toasts: ToastContext,
    ) -> Self {
        Self {
            client: StoredValue::new_local(client),
            path: path.0,
            set_path: path.1,
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
            toasts,
        }
    }

    pub fn client(&self) -> ApiClient {
        self.client.get_value()
    }

    /// Trigger a reload of every list on screen
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    pub fn navigate(&self, path: &str) {
        navigation::set_location(path, false);
        self.set_path.set(path.to_string());
    }

    /// Navigate without leaving a history entry (redirects, forced logout)
    pub fn redirect(&self, path: &str) {
        navigation::set_location(path, true);
        self.set_path.set(path.to_string());
    }

    /// Error toast for a failed call; 401/403 are already handled by the
    /// session teardown and only get a log line
    pub fn report(&self, action: &str, err: &ApiError) {
        tracing::warn!(action, error = %err, "request failed");
        if !matches!(err, ApiError::Unauthorized { .. } | ApiError::Forbidden { .. } | ApiError::NotAuthenticated) {
            self.toasts.error(err.user_message());
        }
    }
}

pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}
