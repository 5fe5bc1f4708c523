//! Global Console State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;
use wastewise_client::models::{Role, User};

/// Global console state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct ConsoleState {
    /// Signed-in user, mirrored from the session store
    pub user: Option<User>,
    /// Search palette visibility
    pub palette_open: bool,
    /// Collapsed sidebar (narrow screens)
    pub sidebar_collapsed: bool,
}

/// Type alias for the store
pub type ConsoleStore = Store<ConsoleState>;

/// Get the console store from context
pub fn use_console_store() -> ConsoleStore {
    expect_context::<ConsoleStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_set_user(store: &ConsoleStore, user: Option<User>) {
    store.user().set(user);
}

pub fn store_user(store: &ConsoleStore) -> Option<User> {
    store.user().get()
}

/// Role of the signed-in user, tracked
pub fn store_role(store: &ConsoleStore) -> Option<Role> {
    store.user().with(|u| u.as_ref().map(|u| u.role))
}

pub fn store_palette_open(store: &ConsoleStore) -> bool {
    store.palette_open().get()
}

pub fn store_set_palette(store: &ConsoleStore, open: bool) {
    store.palette_open().set(open);
}

pub fn store_toggle_sidebar(store: &ConsoleStore) {
    store.sidebar_collapsed().update(|c| *c = !*c);
}

pub fn store_sidebar_collapsed(store: &ConsoleStore) -> bool {
    store.sidebar_collapsed().get()
}
