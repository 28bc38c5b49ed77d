//! Pull-to-refresh core shared by the storefront front ends
//!
//! Headless pieces of the gesture layer: touch tracking, the refresh
//! state machine, the async refresh cycle and the indicator mapping.
//! Nothing in here touches the DOM; `storefront-mobile` wires it to
//! browser touch events.

pub mod config;
pub mod controller;
pub mod cycle;
pub mod gesture;
pub mod indicator;

pub use config::RefreshConfig;
pub use controller::{PullState, RefreshController, RefreshPhase, RefreshTicket, Release, TouchResponse};
pub use cycle::{ready_refresh, refresh_cycle, timer_millis, RefreshCycle, RefreshFuture};
pub use gesture::{scroll_offset, GestureSession, GestureTracker, MoveOutcome};
pub use indicator::{map_indicator, IndicatorStyle};

/// Pull-to-refresh error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Refresh failed: {0}")]
    RefreshFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidConfig("threshold must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: threshold must be positive");

        let err = Error::RefreshFailed("HTTP 503".to_string());
        assert_eq!(err.to_string(), "Refresh failed: HTTP 503");
    }
}
