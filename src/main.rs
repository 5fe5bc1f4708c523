//! WasteWise Console Entry Point

mod app;
mod components;
mod context;
mod heatmap;
mod logging;
mod navigation;
mod pages;
mod payments;
mod routes;
mod search;
mod store;
mod toast;
mod validation;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "wastewise console starting");
    mount_to_body(App);
}
