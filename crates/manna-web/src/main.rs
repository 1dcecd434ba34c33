//! Manna web application
//!
//! The public reading feed with infinite scroll, the login screen, and the
//! admin dashboard, all over the shared content store in manna-core.

mod app;
mod bootstrap_config;
mod components;
mod services;
mod state;
mod views;

use app::App;

fn main() {
    dioxus::logger::initialize_default();
    tracing::info!("Starting manna-web");
    dioxus::launch(App);
}
