//! Refresh state machine
//!
//! `RefreshController` turns tracker samples into the observable
//! `PullState` and owns the cycle
//! `Idle -> Pulling -> Refreshing -> Settling -> Idle`.
//!
//! The controller never awaits anything itself. A release that crosses
//! the threshold hands out a `RefreshTicket`; the host runs the refresh
//! and reports back with `finish_refresh` and, after the settle delay,
//! `settle`. Tickets from a torn-down or superseded cycle are ignored.

use serde::Serialize;
use std::fmt::Display;
use std::time::Duration;

use crate::config::RefreshConfig;
use crate::gesture::{GestureTracker, MoveOutcome};

/// Observable pull state consumed by the indicator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PullState {
    pub is_pulling: bool,
    /// Damped distance, never negative
    pub pull_distance: f64,
    pub is_refreshing: bool,
}

/// Refresh cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPhase {
    #[default]
    Idle,
    Pulling,
    Refreshing,
    Settling,
}

impl std::fmt::Display for RefreshPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pulling => write!(f, "pulling"),
            Self::Refreshing => write!(f, "refreshing"),
            Self::Settling => write!(f, "settling"),
        }
    }
}

/// Identifies one refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// What the host should do with the native event after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchResponse {
    Passthrough,
    /// Call `preventDefault` so the page does not scroll mid-gesture
    Suppress,
}

/// Release decision taken on touch-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// There was no live gesture
    Ignored,
    /// Pull stayed at or below the threshold; state is back to idle
    Cancelled,
    /// Run the refresh operation once for this ticket
    Refresh(RefreshTicket),
}

/// Pull-to-refresh state machine
#[derive(Debug)]
pub struct RefreshController {
    config: RefreshConfig,
    pending_config: Option<RefreshConfig>,
    tracker: GestureTracker,
    state: PullState,
    phase: RefreshPhase,
    generation: u64,
}

impl RefreshController {
    pub fn new(config: RefreshConfig) -> Self {
        Self {
            config,
            pending_config: None,
            tracker: GestureTracker::new(),
            state: PullState::default(),
            phase: RefreshPhase::Idle,
            generation: 0,
        }
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    pub fn state(&self) -> PullState {
        self.state
    }

    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// A refresh is running or settling; new gestures are refused
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, RefreshPhase::Refreshing | RefreshPhase::Settling)
    }

    /// Idle with no live touch; a config change applies immediately
    pub fn is_quiescent(&self) -> bool {
        self.phase == RefreshPhase::Idle && !self.tracker.is_tracking()
    }

    /// Threshold the indicator should use for `incoming` props.
    ///
    /// An idle controller takes new settings immediately, so they are
    /// reported before `set_config` has run; otherwise the in-flight
    /// gesture keeps the threshold it started with.
    pub fn threshold_for(&self, incoming: &RefreshConfig) -> f64 {
        if !self.is_quiescent() {
            return self.config.threshold;
        }

        match incoming.validate() {
            Ok(()) => incoming.threshold,
            Err(_) => crate::config::DEFAULT_THRESHOLD,
        }
    }

    /// Identifier of the touch driving the live gesture
    pub fn touch_id(&self) -> Option<i32> {
        self.tracker.touch_id()
    }

    /// Replace the configuration.
    ///
    /// Takes effect immediately when nothing is in flight, otherwise on
    /// the next return to idle.
    pub fn set_config(&mut self, config: RefreshConfig) {
        if config == self.config {
            self.pending_config = None;
            return;
        }

        if self.is_quiescent() {
            self.config = config;
            self.pending_config = None;
        } else {
            self.pending_config = Some(config);
        }
    }

    /// Touch-start; returns whether a gesture session began
    pub fn touch_start(&mut self, touch_id: i32, y: f64, scroll_top: f64) -> bool {
        if self.config.disabled || self.is_busy() {
            return false;
        }

        self.tracker.begin(touch_id, y, scroll_top)
    }

    pub fn touch_move(&mut self, y: f64, scroll_top: f64) -> TouchResponse {
        if self.config.disabled || self.is_busy() {
            return TouchResponse::Passthrough;
        }

        match self.tracker.track(y, scroll_top, &self.config) {
            MoveOutcome::Ignored => TouchResponse::Passthrough,
            MoveOutcome::Retracted => {
                self.state.is_pulling = false;
                self.state.pull_distance = 0.0;
                self.transition(RefreshPhase::Idle);
                TouchResponse::Passthrough
            }
            MoveOutcome::Pulled { distance, suppress_native } => {
                self.state.is_pulling = true;
                self.state.pull_distance = distance;
                self.transition(RefreshPhase::Pulling);

                if suppress_native {
                    TouchResponse::Suppress
                } else {
                    TouchResponse::Passthrough
                }
            }
        }
    }

    /// Touch-end (or touch-cancel): decide whether to refresh
    pub fn touch_end(&mut self) -> Release {
        if self.tracker.end().is_none() {
            return Release::Ignored;
        }

        if self.phase == RefreshPhase::Pulling && self.state.pull_distance > self.config.threshold {
            self.generation += 1;
            self.state.is_pulling = false;
            self.state.is_refreshing = true;
            self.transition(RefreshPhase::Refreshing);
            return Release::Refresh(RefreshTicket(self.generation));
        }

        self.reset();
        Release::Cancelled
    }

    /// Report the refresh outcome.
    ///
    /// Failures are logged and otherwise treated like success. Returns
    /// the settle delay to wait before calling `settle`, or `None` when
    /// the ticket is stale.
    pub fn finish_refresh<E: Display>(
        &mut self,
        ticket: RefreshTicket,
        outcome: std::result::Result<(), E>,
    ) -> Option<Duration> {
        if !self.owns(ticket, RefreshPhase::Refreshing) {
            tracing::debug!("Ignoring completion of stale refresh cycle {}", ticket.0);
            return None;
        }

        if let Err(e) = outcome {
            tracing::warn!("Refresh failed: {}", e);
        }

        self.transition(RefreshPhase::Settling);
        Some(self.config.settle_delay())
    }

    /// End of the settle delay; returns whether the state changed
    pub fn settle(&mut self, ticket: RefreshTicket) -> bool {
        if !self.owns(ticket, RefreshPhase::Settling) {
            return false;
        }

        self.reset();
        true
    }

    /// Drop a live gesture without a release decision.
    ///
    /// Used when the touch listeners are detached mid-drag. A running
    /// refresh is left alone; returns whether the state changed.
    pub fn abandon_gesture(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }

        let had_gesture = self.tracker.is_tracking() || self.phase != RefreshPhase::Idle;
        self.tracker.cancel();
        self.reset();
        had_gesture
    }

    /// Abandon any gesture or cycle in flight and go back to idle
    pub fn teardown(&mut self) {
        self.tracker.cancel();
        self.generation += 1;
        self.reset();
    }

    fn owns(&self, ticket: RefreshTicket, phase: RefreshPhase) -> bool {
        ticket.0 == self.generation && self.phase == phase
    }

    fn reset(&mut self) {
        self.state = PullState::default();
        self.transition(RefreshPhase::Idle);

        if let Some(config) = self.pending_config.take() {
            self.config = config;
        }
    }

    fn transition(&mut self, phase: RefreshPhase) {
        if self.phase != phase {
            tracing::debug!("Pull-to-refresh: {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }
}

impl Default for RefreshController {
    fn default() -> Self {
        Self::new(RefreshConfig::default())
    }
}
