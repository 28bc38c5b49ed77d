//! Pull-to-refresh hook
//!
//! Wires a container's touch events to a `RefreshController`. The
//! container should be the scroll element (`overflow-y: auto` with a
//! bounded height, as `PullToRefresh` renders it); when it cannot scroll
//! the page offset (`window.scrollY`) decides whether a pull may start.
//!
//! Listeners are attached through `gloo-events` guards so dropping them
//! detaches the handlers. The effect cleanup is the only place they are
//! dropped, which covers unmount, a container swap and the `disabled`
//! flag turning on; any gesture still live at that point is abandoned.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, EventTarget, Touch, TouchEvent, TouchList};
use yew::prelude::*;

use storefront_common::{
    refresh_cycle, scroll_offset, timer_millis, PullState, RefreshConfig, RefreshController,
    RefreshCycle, RefreshFuture, Release, TouchResponse,
};

type SharedController = Rc<RefCell<RefreshController>>;
type SharedCycle = Rc<RefCell<Option<RefreshCycle>>>;
type SharedCallback = Rc<RefCell<Callback<(), RefreshFuture>>>;

/// Observable pull-to-refresh state for the rendering layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullToRefreshHandle {
    pub is_pulling: bool,
    pub pull_distance: f64,
    pub is_refreshing: bool,
    pub threshold: f64,
}

impl PullToRefreshHandle {
    pub fn state(&self) -> PullState {
        PullState {
            is_pulling: self.is_pulling,
            pull_distance: self.pull_distance,
            is_refreshing: self.is_refreshing,
        }
    }
}

/// Track pull gestures on `container` and run `on_refresh` when a pull
/// is released past the threshold.
#[hook]
pub fn use_pull_to_refresh(
    container: NodeRef,
    on_refresh: Callback<(), RefreshFuture>,
    config: RefreshConfig,
) -> PullToRefreshHandle {
    let controller = use_mut_ref(RefreshController::default);
    let cycle = use_mut_ref(|| None::<RefreshCycle>);
    let callback = use_mut_ref(|| on_refresh.clone());
    let state = use_state_eq(PullState::default);

    // Parents usually rebuild the callback every render; keep the latest
    // without re-attaching listeners.
    *callback.borrow_mut() = on_refresh;

    {
        let controller = controller.clone();
        use_effect_with(config.clone(), move |config| {
            controller.borrow_mut().set_config(config.clone().or_default());
            || ()
        });
    }

    {
        let controller = controller.clone();
        let cycle = cycle.clone();
        let callback = callback.clone();
        let state = state.clone();

        use_effect_with((container, config.disabled), move |(container, disabled)| {
            let listeners = match container.cast::<Element>() {
                Some(element) if !*disabled => attach_listeners(
                    &element,
                    controller.clone(),
                    cycle,
                    callback,
                    state.clone(),
                ),
                _ => Vec::new(),
            };

            move || {
                drop(listeners);

                // No touchend will arrive for a drag in progress
                let abandoned = controller.borrow_mut().abandon_gesture();
                if abandoned {
                    publish(&controller, &state);
                }
            }
        });
    }

    // Unmount: abort any cycle in flight (including a pending settle
    // timer) and forget the gesture.
    {
        let controller = controller.clone();
        let cycle = cycle.clone();

        use_effect_with((), move |_| {
            move || {
                cycle.borrow_mut().take();
                controller.borrow_mut().teardown();
            }
        });
    }

    // The config effect has not run yet for new props
    let threshold = controller.borrow().threshold_for(&config);

    PullToRefreshHandle {
        is_pulling: state.is_pulling,
        pull_distance: state.pull_distance,
        is_refreshing: state.is_refreshing,
        threshold,
    }
}

fn find_touch(touches: &TouchList, id: i32) -> Option<Touch> {
    (0..touches.length())
        .filter_map(|i| touches.get(i))
        .find(|touch| touch.identifier() == id)
}

/// The tracked touch among those still on the surface
fn tracked_touch(event: &Event, controller: &SharedController) -> Option<Touch> {
    let id = controller.borrow().touch_id()?;
    find_touch(&event.dyn_ref::<TouchEvent>()?.touches(), id)
}

/// Whether the tracked touch is among those that just ended
fn tracked_touch_ended(event: &Event, controller: &SharedController) -> bool {
    let Some(id) = controller.borrow().touch_id() else {
        return false;
    };

    event
        .dyn_ref::<TouchEvent>()
        .map(|e| find_touch(&e.changed_touches(), id).is_some())
        .unwrap_or(false)
}

fn scroll_top(element: &Element) -> f64 {
    let page_scroll_y = web_sys::window()
        .and_then(|window| window.scroll_y().ok())
        .unwrap_or(0.0);

    scroll_offset(
        element.scroll_top() as f64,
        element.scroll_height() as f64,
        element.client_height() as f64,
        page_scroll_y,
    )
}

fn publish(controller: &SharedController, state: &UseStateHandle<PullState>) {
    let snapshot = controller.borrow().state();
    state.set(snapshot);
}

fn attach_listeners(
    element: &Element,
    controller: SharedController,
    cycle: SharedCycle,
    callback: SharedCallback,
    state: UseStateHandle<PullState>,
) -> Vec<EventListener> {
    let target: &EventTarget = element.as_ref();

    let on_start = {
        let controller = controller.clone();
        let scroller = element.clone();

        EventListener::new(target, "touchstart", move |event| {
            let Some(touch) = event
                .dyn_ref::<TouchEvent>()
                .and_then(|e| e.changed_touches().get(0))
            else {
                return;
            };

            let y = touch.client_y() as f64;
            let offset = scroll_top(&scroller);
            controller.borrow_mut().touch_start(touch.identifier(), y, offset);
        })
    };

    // Non-passive so the browser honours `preventDefault`
    let on_move = {
        let controller = controller.clone();
        let state = state.clone();
        let scroller = element.clone();

        EventListener::new_with_options(
            target,
            "touchmove",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(touch) = tracked_touch(event, &controller) else {
                    return;
                };

                let y = touch.client_y() as f64;
                let offset = scroll_top(&scroller);
                let response = controller.borrow_mut().touch_move(y, offset);

                if response == TouchResponse::Suppress && event.cancelable() {
                    event.prevent_default();
                }

                publish(&controller, &state);
            },
        )
    };

    let on_end = {
        let controller = controller.clone();
        let cycle = cycle.clone();
        let callback = callback.clone();
        let state = state.clone();

        EventListener::new(target, "touchend", move |event| {
            if tracked_touch_ended(event, &controller) {
                release(&controller, &cycle, &callback, &state);
            }
        })
    };

    let on_cancel = EventListener::new(target, "touchcancel", move |event| {
        if tracked_touch_ended(event, &controller) {
            release(&controller, &cycle, &callback, &state);
        }
    });

    vec![on_start, on_move, on_end, on_cancel]
}

fn release(
    controller: &SharedController,
    cycle: &SharedCycle,
    callback: &SharedCallback,
    state: &UseStateHandle<PullState>,
) {
    let decision = controller.borrow_mut().touch_end();
    publish(controller, state);

    let Release::Refresh(ticket) = decision else {
        return;
    };

    let on_refresh = callback.borrow().clone();
    let refresh = on_refresh.emit(());

    let notify = {
        let state = state.clone();
        move |next: PullState| state.set(next)
    };

    let (task, guard) = refresh_cycle(
        controller.clone(),
        ticket,
        refresh,
        |delay| TimeoutFuture::new(timer_millis(delay)),
        notify,
    );

    *cycle.borrow_mut() = Some(guard);
    spawn_local(task);
}
