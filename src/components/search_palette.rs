//! Search Palette Component
//!
//! Ctrl/Cmd+K jump box over the signed-in role's navigation.

use leptos::html;
use leptos::prelude::*;

use crate::context::use_app;
use crate::search::search;
use crate::store::{store_palette_open, store_role, store_set_palette, use_console_store};

#[component]
pub fn SearchPalette() -> impl IntoView {
    let ctx = use_app();
    let store = use_console_store();
    let (query, set_query) = signal(String::new());
    let (selected_idx, set_selected_idx) = signal(0usize);
    let input_ref = NodeRef::<html::Input>::new();

    let results = Memo::new(move |_| match store_role(&store) {
        Some(role) => query.with(|q| search(role, q)),
        None => Vec::new(),
    });

    let close = move || {
        store_set_palette(&store, false);
        set_query.set(String::new());
        set_selected_idx.set(0);
    };

    let go = move |path: &'static str| {
        close();
        ctx.navigate(path);
    };

    // focus the input each time the palette opens
    Effect::new(move |_| {
        if store_palette_open(&store) {
            if let Some(input) = input_ref.get() {
                let _ = input.focus();
            }
        }
    });

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        let hits = results.get_untracked();
        match ev.key().as_str() {
            "ArrowDown" => {
                ev.prevent_default();
                let sel = selected_idx.get_untracked();
                if sel + 1 < hits.len() {
                    set_selected_idx.set(sel + 1);
                }
            }
            "ArrowUp" => {
                ev.prevent_default();
                let sel = selected_idx.get_untracked();
                if sel > 0 {
                    set_selected_idx.set(sel - 1);
                }
            }
            "Enter" => {
                ev.prevent_default();
                if let Some(hit) = hits.get(selected_idx.get_untracked()) {
                    go(hit.path);
                }
            }
            "Escape" => {
                ev.prevent_default();
                close();
            }
            _ => {}
        }
    };

    view! {
        <Show when=move || store_palette_open(&store)>
            <div class="palette-backdrop" on:click=move |_| close()>
                <div class="palette" on:click=|ev| ev.stop_propagation()>
                    <input
                        type="text"
                        class="palette-input"
                        placeholder="Jump to…"
                        autocomplete="off"
                        node_ref=input_ref
                        prop:value=move || query.get()
                        on:input=move |ev| {
                            set_query.set(event_target_value(&ev));
                            set_selected_idx.set(0);
                        }
                        on:keydown=on_keydown
                    />
                    {move || {
                        let hits = results.get();
                        if hits.is_empty() {
                            let hint = if query.with(|q| q.trim().is_empty()) { "Type to search pages" } else { "No matches" };
                            view! { <p class="palette-empty">{hint}</p> }.into_any()
                        } else {
                            let selected = selected_idx.get();
                            view! {
                                <ul class="palette-results">
                                    {hits.into_iter().enumerate().map(|(i, hit)| {
                                        let path = hit.path;
                                        view! {
                                            <li>
                                                <button
                                                    type="button"
                                                    class=if i == selected { "palette-item selected" } else { "palette-item" }
                                                    on:click=move |_| go(path)
                                                >
                                                    <span class="palette-label">{hit.label}</span>
                                                    <span class="palette-path">{path}</span>
                                                </button>
                                            </li>
                                        }
                                    }).collect_view()}
                                </ul>
                            }.into_any()
                        }
                    }}
                </div>
            </div>
        </Show>
    }
}
