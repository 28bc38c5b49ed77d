//! Pull-to-refresh container for mobile
//!
//! The container is its own scroll element; give it a bounded height
//! (the `height` prop, or a flex parent with `min-height: 0`) so its
//! scroll offset reflects what the user sees.

use yew::prelude::*;

use storefront_common::config::{DEFAULT_RESISTANCE, DEFAULT_SETTLE_DELAY_MS, DEFAULT_THRESHOLD};
use storefront_common::{RefreshConfig, RefreshFuture};

use crate::components::RefreshIndicator;
use crate::hooks::use_pull_to_refresh;

#[derive(Properties, PartialEq)]
pub struct PullToRefreshProps {
    #[prop_or_default]
    pub children: Children,
    pub on_refresh: Callback<(), RefreshFuture>,
    #[prop_or(DEFAULT_THRESHOLD)]
    pub threshold: f64,
    #[prop_or(DEFAULT_RESISTANCE)]
    pub resistance: f64,
    #[prop_or_default]
    pub disabled: bool,
    #[prop_or(DEFAULT_SETTLE_DELAY_MS)]
    pub settle_delay_ms: u64,
    /// CSS height of the scroll container
    #[prop_or(AttrValue::Static("100%"))]
    pub height: AttrValue,
}

#[function_component(PullToRefresh)]
pub fn pull_to_refresh(props: &PullToRefreshProps) -> Html {
    let container = use_node_ref();

    let config = RefreshConfig {
        threshold: props.threshold,
        resistance: props.resistance,
        disabled: props.disabled,
        settle_delay_ms: props.settle_delay_ms,
    };

    let pull = use_pull_to_refresh(container.clone(), props.on_refresh.clone(), config);

    // Content follows the finger while dragging and eases back otherwise
    let content_style = if pull.is_pulling {
        format!("transform: translateY({:.1}px); transition: none;", pull.pull_distance)
    } else {
        "transform: translateY(0px); transition: transform 0.2s;".to_string()
    };

    let container_style = format!(
        "overflow-y: auto; overscroll-behavior-y: contain; height: {};",
        props.height
    );

    html! {
        <div class="pull-to-refresh-container" style={container_style} ref={container}>
            <RefreshIndicator
                is_pulling={pull.is_pulling}
                pull_distance={pull.pull_distance}
                is_refreshing={pull.is_refreshing}
                threshold={pull.threshold}
            />

            <div class="pull-to-refresh-content" style={content_style}>
                {props.children.clone()}
            </div>
        </div>
    }
}
