//! Touch tracking for the pull gesture
//!
//! The tracker owns at most one `GestureSession`. A session is created
//! on an eligible touch-start, updated on every move and handed back on
//! touch-end. Only the touch that opened the session is followed (by its
//! identifier); any later touch that starts while a session is live is
//! ignored.

use crate::config::RefreshConfig;

/// Finger positions for one touch sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    /// Identifier of the touch point driving the session
    pub touch_id: i32,
    pub start_y: f64,
    pub last_y: f64,
    pub active: bool,
}

impl GestureSession {
    fn new(touch_id: i32, y: f64) -> Self {
        Self {
            touch_id,
            start_y: y,
            last_y: y,
            active: true,
        }
    }

    /// Raw finger travel since touch-start, positive when dragging down
    pub fn delta(&self) -> f64 {
        self.last_y - self.start_y
    }
}

/// Result of feeding one move sample to the tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// No live session, or the content is scrolled away from the top
    Ignored,
    /// Finger is at or above its start point; pull is zero
    Retracted,
    /// Finger is below its start point
    Pulled {
        /// Damped pull distance
        distance: f64,
        /// The native scroll for this event must be prevented
        suppress_native: bool,
    },
}

/// Tracks the single active touch of a pull gesture
#[derive(Debug, Default)]
pub struct GestureTracker {
    session: Option<GestureSession>,
}

/// Content counts as scrolled to the top at or above zero (iOS bounce
/// reports small negative offsets)
fn at_scroll_top(scroll_top: f64) -> bool {
    scroll_top <= 0.0
}

/// Scroll offset that decides eligibility for a pull.
///
/// The container's own offset when it can scroll, otherwise the page's.
pub fn scroll_offset(scroll_top: f64, scroll_height: f64, client_height: f64, page_scroll_y: f64) -> f64 {
    if scroll_height > client_height {
        scroll_top
    } else {
        page_scroll_y
    }
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.session.map(|s| s.active).unwrap_or(false)
    }

    /// Identifier of the touch driving the live session
    pub fn touch_id(&self) -> Option<i32> {
        self.session.filter(|s| s.active).map(|s| s.touch_id)
    }

    /// Start a session if the content is at scroll-top.
    ///
    /// Returns `false` when the touch is not eligible or another touch
    /// already owns the session.
    pub fn begin(&mut self, touch_id: i32, y: f64, scroll_top: f64) -> bool {
        if self.is_tracking() {
            return false;
        }

        if !at_scroll_top(scroll_top) {
            self.session = None;
            return false;
        }

        self.session = Some(GestureSession::new(touch_id, y));
        true
    }

    /// Record a move sample and compute the damped pull distance
    pub fn track(&mut self, y: f64, scroll_top: f64, config: &RefreshConfig) -> MoveOutcome {
        let session = match self.session.as_mut() {
            Some(session) if session.active => session,
            _ => return MoveOutcome::Ignored,
        };

        session.last_y = y;
        let delta = session.delta();

        if delta <= 0.0 {
            return MoveOutcome::Retracted;
        }

        if !at_scroll_top(scroll_top) {
            return MoveOutcome::Ignored;
        }

        let distance = delta * config.resistance;
        tracing::trace!(delta, distance, "pull sample");

        MoveOutcome::Pulled {
            distance,
            suppress_native: distance > config.threshold,
        }
    }

    /// Close the session, handing back its final positions
    pub fn end(&mut self) -> Option<GestureSession> {
        self.session.take().filter(|s| s.active).map(|mut s| {
            s.active = false;
            s
        })
    }

    /// Drop any live session without a release decision
    pub fn cancel(&mut self) {
        self.session = None;
    }
}
