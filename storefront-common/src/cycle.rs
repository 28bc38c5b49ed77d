//! Async refresh cycle
//!
//! Runs the refresh operation for a ticket handed out by
//! `RefreshController::touch_end`, reports the outcome, waits the settle
//! delay and resets the controller. The returned future is executor
//! agnostic; the sleep function is supplied by the caller (gloo timers
//! in the browser, tokio in tests).
//!
//! The cycle is cancelled when its `RefreshCycle` guard is dropped, so a
//! host that owns the guard cannot have state mutated after teardown.

use futures::future::{abortable, AbortHandle, FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use crate::controller::{PullState, RefreshController, RefreshTicket};

/// The external refresh operation
pub type RefreshFuture = LocalBoxFuture<'static, crate::Result<()>>;

/// Refresh operation for callers whose reload is synchronous
pub fn ready_refresh() -> RefreshFuture {
    futures::future::ready(Ok(())).boxed_local()
}

/// Milliseconds for a browser timer, saturating at `u32::MAX`
pub fn timer_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}

/// Cancels its refresh cycle when dropped
#[derive(Debug)]
pub struct RefreshCycle {
    handle: AbortHandle,
}

impl Drop for RefreshCycle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Build the future driving one refresh cycle.
///
/// `notify` receives the new state after every transition the cycle
/// makes (settling, then idle).
pub fn refresh_cycle<S, SF, N>(
    controller: Rc<RefCell<RefreshController>>,
    ticket: RefreshTicket,
    refresh: RefreshFuture,
    sleep: S,
    notify: N,
) -> (impl Future<Output = ()>, RefreshCycle)
where
    S: FnOnce(Duration) -> SF + 'static,
    SF: Future<Output = ()> + 'static,
    N: Fn(PullState) + 'static,
{
    let task = async move {
        let outcome = refresh.await;

        let delay = controller.borrow_mut().finish_refresh(ticket, outcome);
        let Some(delay) = delay else {
            return;
        };
        // Release the borrow before notifying; the host may re-render synchronously
        let state = controller.borrow().state();
        notify(state);

        sleep(delay).await;

        let settled = controller.borrow_mut().settle(ticket);
        if settled {
            let state = controller.borrow().state();
            notify(state);
        }
    };

    let (task, handle) = abortable(task);
    (task.map(|_| ()), RefreshCycle { handle })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RefreshConfig;
    use crate::controller::{RefreshPhase, Release};
    use crate::Error;
    use std::cell::Cell;

    fn drag(controller: &Rc<RefCell<RefreshController>>, distance: f64) -> Release {
        let mut controller = controller.borrow_mut();
        controller.touch_start(0, 0.0, 0.0);
        controller.touch_move(distance / 2.0, 0.0);
        controller.touch_move(distance, 0.0);
        controller.touch_end()
    }

    #[test]
    fn test_timer_millis_saturates() {
        assert_eq!(timer_millis(Duration::from_millis(300)), 300);
        assert_eq!(timer_millis(Duration::from_millis(u32::MAX as u64)), u32::MAX);
        assert_eq!(timer_millis(Duration::from_millis(u32::MAX as u64 + 1)), u32::MAX);
        assert_eq!(timer_millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }

    fn recorder() -> (Rc<RefCell<Vec<PullState>>>, impl Fn(PullState) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |state| sink.borrow_mut().push(state))
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_cycle_returns_to_idle() {
        let controller = Rc::new(RefCell::new(RefreshController::default()));
        let calls = Rc::new(Cell::new(0));

        controller.borrow_mut().touch_start(0, 0.0, 0.0);
        controller.borrow_mut().touch_move(200.0, 0.0);
        assert_eq!(controller.borrow().state().pull_distance, 100.0);

        let Release::Refresh(ticket) = controller.borrow_mut().touch_end() else {
            panic!("expected refresh");
        };

        let counter = calls.clone();
        let refresh: RefreshFuture = async move {
            counter.set(counter.get() + 1);
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(())
        }
        .boxed_local();

        let (seen, notify) = recorder();
        let started = tokio::time::Instant::now();
        let (task, _cycle) = refresh_cycle(controller.clone(), ticket, refresh, tokio::time::sleep, notify);
        task.await;

        assert_eq!(calls.get(), 1);
        assert_eq!(controller.borrow().state(), PullState::default());
        assert_eq!(controller.borrow().phase(), RefreshPhase::Idle);

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(800));
        assert!(elapsed < Duration::from_millis(850));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].is_refreshing);
        assert_eq!(seen[1], PullState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_resets_state() {
        let controller = Rc::new(RefCell::new(RefreshController::default()));
        let Release::Refresh(ticket) = drag(&controller, 300.0) else {
            panic!("expected refresh");
        };

        let refresh: RefreshFuture = async { Err(Error::RefreshFailed("HTTP 502".to_string())) }.boxed_local();
        let (seen, notify) = recorder();
        let (task, _cycle) = refresh_cycle(controller.clone(), ticket, refresh, tokio::time::sleep, notify);
        task.await;

        assert_eq!(controller.borrow().state(), PullState::default());
        assert_eq!(seen.borrow().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_pull_never_refreshes() {
        let controller = Rc::new(RefCell::new(RefreshController::default()));
        assert_eq!(drag(&controller, 100.0), Release::Cancelled);
        assert_eq!(controller.borrow().state(), PullState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_settle_delay() {
        let config = RefreshConfig::default().with_settle_delay(Duration::from_millis(50));
        let controller = Rc::new(RefCell::new(RefreshController::new(config)));
        let Release::Refresh(ticket) = drag(&controller, 200.0) else {
            panic!("expected refresh");
        };

        let started = tokio::time::Instant::now();
        let (_, notify) = recorder();
        let (task, _cycle) = refresh_cycle(controller.clone(), ticket, ready_refresh(), tokio::time::sleep, notify);
        task.await;

        assert!(started.elapsed() < Duration::from_millis(100));
        assert_eq!(controller.borrow().phase(), RefreshPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_guard_cancels_pending_settle() {
        let controller = Rc::new(RefCell::new(RefreshController::default()));
        let Release::Refresh(ticket) = drag(&controller, 200.0) else {
            panic!("expected refresh");
        };

        let (seen, notify) = recorder();
        let (task, cycle) = refresh_cycle(controller.clone(), ticket, ready_refresh(), tokio::time::sleep, notify);

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let handle = tokio::task::spawn_local(task);

                tokio::time::sleep(Duration::from_millis(100)).await;
                assert_eq!(controller.borrow().phase(), RefreshPhase::Settling);

                drop(cycle);
                controller.borrow_mut().teardown();
                handle.await.unwrap();

                tokio::time::sleep(Duration::from_millis(500)).await;
            })
            .await;

        // Only the settling notification made it out
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(controller.borrow().state(), PullState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_guard_before_start_skips_refresh() {
        let controller = Rc::new(RefCell::new(RefreshController::default()));
        let Release::Refresh(ticket) = drag(&controller, 200.0) else {
            panic!("expected refresh");
        };

        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let refresh: RefreshFuture = async move {
            counter.set(counter.get() + 1);
            Ok(())
        }
        .boxed_local();

        let (_, notify) = recorder();
        let (task, cycle) = refresh_cycle(controller.clone(), ticket, refresh, tokio::time::sleep, notify);
        drop(cycle);
        task.await;

        assert_eq!(calls.get(), 0);
        assert!(controller.borrow().state().is_refreshing);
    }
}
