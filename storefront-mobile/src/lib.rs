//! Storefront Mobile UI
//!
//! Touch-optimized storefront pages built with Yew. The pull-to-refresh
//! gesture layer comes from `storefront-common`; this crate binds it to
//! browser touch events and renders the indicator.

mod api;
mod pages;

pub mod components;
pub mod hooks;
pub mod logging;

use yew::prelude::*;

pub use components::{PullToRefresh, RefreshIndicator};
pub use hooks::{use_pull_to_refresh, PullToRefreshHandle};

/// Main mobile application component
#[function_component(App)]
pub fn app() -> Html {
    html! {
        <div class="mobile-app">
            <pages::catalog::Catalog />
        </div>
    }
}

/// Entry point for WASM
#[cfg(target_arch = "wasm32")]
pub fn run_app() {
    if let Err(e) = logging::LoggingConfig::init_default() {
        web_sys::console::error_1(&format!("Failed to initialize logging: {}", e).into());
    }

    yew::Renderer::<App>::new().render();
}
