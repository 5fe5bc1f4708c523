//! WasteWise Console App
//!
//! Root component: builds the API client, mirrors the session into the
//! store, guards the current path and renders the signed-in shell.

use std::rc::Rc;

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use wastewise_client::models::Role;
use wastewise_client::sdk::auth;
use wastewise_client::{ApiClient, ClientConfig, KeyValueStorage, LogoutReason, SessionEvent};

use crate::components::{SearchPalette, Sidebar};
use crate::context::AppContext;
use crate::navigation::{current_location, listen_popstate};
use crate::pages::{
    render_page, LoginPage, NotFoundPage, PaymentFailedPage, PaymentPendingPage, PaymentSuccessPage, RegisterPage,
};
use crate::routes::{self, guard, home_page, GuardOutcome, LOGIN_PATH};
use crate::store::{store_role, store_set_palette, store_set_user, store_user, ConsoleState};
use crate::toast::{ToastContext, ToastHost};

#[cfg(target_arch = "wasm32")]
fn session_storage() -> Rc<dyn KeyValueStorage> {
    Rc::new(wastewise_client::BrowserStorage)
}

#[cfg(not(target_arch = "wasm32"))]
fn session_storage() -> Rc<dyn KeyValueStorage> {
    Rc::new(wastewise_client::MemoryStorage::new())
}

fn build_client() -> Result<ApiClient, String> {
    let config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    tracing::info!(base_url = %config.base_url, "api client configured");
    ApiClient::from_config(config, session_storage()).map_err(|e| e.to_string())
}

const SIGNED_OUT_MESSAGE: &str = "You have been signed out.";

fn forced_logout_message(reason: LogoutReason) -> &'static str {
    match reason {
        LogoutReason::Forbidden => "You don't have access to that. Please sign in again.",
        LogoutReason::RefreshFailed => "Your session has expired. Please sign in again.",
        LogoutReason::UserRequested => SIGNED_OUT_MESSAGE,
    }
}

fn render_view(view: routes::View, role: Option<Role>) -> AnyView {
    match view {
        routes::View::Login => view! { <LoginPage /> }.into_any(),
        routes::View::Register => view! { <RegisterPage /> }.into_any(),
        routes::View::Home => match role.and_then(home_page) {
            Some(page) => render_page(page),
            None => view! { <NotFoundPage /> }.into_any(),
        },
        routes::View::Page(page) => render_page(page),
        routes::View::PaymentSuccess => view! { <PaymentSuccessPage /> }.into_any(),
        routes::View::PaymentPending => view! { <PaymentPendingPage /> }.into_any(),
        routes::View::PaymentFailed => view! { <PaymentFailedPage /> }.into_any(),
        routes::View::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(ConsoleState::default());
    provide_context(store);
    let toasts = ToastContext::new();
    provide_context(toasts);

    let client = match build_client() {
        Ok(client) => client,
        Err(message) => {
            tracing::error!(error = %message, "console failed to start");
            return view! {
                <main class="fatal-error">
                    <h1>"WasteWise is unavailable"</h1>
                    <p>{message}</p>
                </main>
            }
            .into_any();
        }
    };

    let (path, set_path) = signal(current_location());
    listen_popstate(set_path);
    let ctx = AppContext::new(client, (path, set_path), signal(0u32), toasts);
    provide_context(ctx);

    // Mirror the session into the store
    let session = Rc::clone(ctx.client().session());
    store_set_user(&store, session.user());
    session.subscribe(move |event| match event {
        SessionEvent::LoggedIn(user) | SessionEvent::UserUpdated(user) => {
            store_set_user(&store, Some(user.clone()));
        }
        SessionEvent::Refreshed => {}
        SessionEvent::LoggedOut => {
            store_set_user(&store, None);
            toasts.info(SIGNED_OUT_MESSAGE);
            ctx.redirect(LOGIN_PATH);
        }
        SessionEvent::ForcedLogout(reason) => {
            store_set_user(&store, None);
            store_set_palette(&store, false);
            toasts.error(forced_logout_message(*reason));
            ctx.redirect(LOGIN_PATH);
        }
    });

    // Restored sessions re-check the user (role changes, deactivation)
    if session.is_authenticated() {
        spawn_local(async move {
            let client = ctx.client();
            if let Err(e) = auth::me(&client).await {
                tracing::warn!(error = %e, "could not refresh the signed-in user");
            }
        });
    }

    // Ctrl/Cmd+K opens the search palette
    let handle = window_event_listener(ev::keydown, move |ev| {
        if (ev.ctrl_key() || ev.meta_key()) && ev.key().eq_ignore_ascii_case("k") && store_user(&store).is_some() {
            ev.prevent_default();
            store_set_palette(&store, true);
        }
    });
    on_cleanup(move || handle.remove());

    let outcome = Memo::new(move |_| guard(store_role(&store), &path.get()));
    Effect::new(move |_| {
        if let GuardOutcome::Redirect(to) = outcome.get() {
            tracing::debug!(from = %path.get_untracked(), to, "route guard redirect");
            ctx.redirect(to);
        }
    });

    let in_shell = Memo::new(move |_| match outcome.get() {
        GuardOutcome::Render(view) => view.in_shell() && store_role(&store).is_some(),
        GuardOutcome::Redirect(_) => false,
    });

    let content = move || match outcome.get() {
        GuardOutcome::Render(view) => render_view(view, untrack(|| store_role(&store))),
        GuardOutcome::Redirect(_) => ().into_any(),
    };

    view! {
        <Show
            when=move || in_shell.get()
            fallback=move || view! { <div class="public-layout">{content}</div> }
        >
            <div class="app-layout">
                <Sidebar />
                <main class="main-content">{content}</main>
                <SearchPalette />
            </div>
        </Show>
        <ToastHost />
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_renders_role_dashboard() {
        assert_eq!(guard(Some(Role::Citizen), "/app"), GuardOutcome::Render(routes::View::Home));
        assert!(home_page(Role::Citizen).is_some());
        assert!(home_page(Role::Admin).is_some());
    }

    #[test]
    fn test_forced_logout_messages() {
        assert!(forced_logout_message(LogoutReason::RefreshFailed).contains("expired"));
        assert!(forced_logout_message(LogoutReason::Forbidden).contains("access"));
        assert_eq!(forced_logout_message(LogoutReason::UserRequested), SIGNED_OUT_MESSAGE);
    }
}
