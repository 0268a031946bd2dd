//! Browser front-end for creating crowdfunding campaigns with a Phantom wallet.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

mod app;
mod components;
mod services;

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Initialize logger; `tracing` events from the libraries arrive through `log`
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Campaign web app starting...");

    leptos::mount::mount_to_body(|| view! { <App/> });
}
