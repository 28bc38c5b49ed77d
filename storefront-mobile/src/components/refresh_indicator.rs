//! Refresh indicator shown above pull-to-refresh content

use yew::prelude::*;

use storefront_common::{map_indicator, PullState};

#[derive(Properties, PartialEq)]
pub struct RefreshIndicatorProps {
    pub is_pulling: bool,
    pub pull_distance: f64,
    pub is_refreshing: bool,
    pub threshold: f64,
}

#[function_component(RefreshIndicator)]
pub fn refresh_indicator(props: &RefreshIndicatorProps) -> Html {
    let state = PullState {
        is_pulling: props.is_pulling,
        pull_distance: props.pull_distance,
        is_refreshing: props.is_refreshing,
    };
    let style = map_indicator(&state, props.threshold);

    if !style.visible {
        return html! {};
    }

    let icon_class = classes!("refresh-icon", style.spinning.then_some("spinning"));

    html! {
        <div class="pull-indicator" style={style.container_css()}>
            <span class={icon_class} style={style.icon_css()}>{"↻"}</span>
            {if style.show_hint {
                html! {
                    <span class="pull-hint" style={style.hint_css()}>
                        {style.hint_text}
                    </span>
                }
            } else {
                html! {}
            }}
        </div>
    }
}
