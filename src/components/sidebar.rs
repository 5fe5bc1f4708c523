//! Sidebar Component
//!
//! Role navigation from the route table, plus the signed-in user and the
//! sign-out button.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wastewise_client::sdk::auth;

use crate::context::use_app;
use crate::routes::{nav_for, normalize};
use crate::store::{store_set_palette, store_sidebar_collapsed, store_toggle_sidebar, store_user, use_console_store};

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_app();
    let store = use_console_store();

    let sign_out = move |_: web_sys::MouseEvent| {
        let client = ctx.client();
        spawn_local(async move {
            auth::logout(&client).await;
        });
    };

    view! {
        <aside class=move || if store_sidebar_collapsed(&store) { "sidebar collapsed" } else { "sidebar" }>
            <div class="sidebar-header">
                <span class="brand">"WasteWise"</span>
                <button class="icon-btn" title="Collapse" on:click=move |_| store_toggle_sidebar(&store)>"☰"</button>
            </div>
            <button class="palette-trigger" on:click=move |_| store_set_palette(&store, true)>
                "Search… " <kbd>"Ctrl K"</kbd>
            </button>
            {move || {
                let Some(user) = store_user(&store) else {
                    return ().into_any();
                };
                view! {
                    <nav class="sidebar-nav">
                        <h3 class="nav-section">{user.role.label()}</h3>
                        {nav_for(user.role).iter().map(|entry| {
                            let path = entry.path;
                            let active = move || normalize(&ctx.path.get()) == path;
                            view! {
                                <a
                                    href=path
                                    class=move || if active() { "nav-link active" } else { "nav-link" }
                                    on:click=move |ev| {
                                        ev.prevent_default();
                                        ctx.navigate(path);
                                    }
                                >
                                    {entry.label}
                                </a>
                            }
                        }).collect_view()}
                    </nav>
                    <div class="sidebar-footer">
                        <div class="user-name">{user.display_name().to_string()}</div>
                        <div class="user-email">{user.email.clone()}</div>
                        <button class="secondary-btn" on:click=sign_out>"Sign out"</button>
                    </div>
                }.into_any()
            }}
        </aside>
    }
}
