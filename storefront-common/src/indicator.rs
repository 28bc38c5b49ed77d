//! Pure state -> style mapping for the refresh indicator

use serde::Serialize;

use crate::controller::PullState;

/// Offset the indicator rests at while a refresh runs
pub const RESTING_OFFSET: f64 = 50.0;

/// How far past the threshold the indicator may follow the finger
pub const OVERPULL_ALLOWANCE: f64 = 20.0;

/// Fraction of the threshold at which the hint starts fading in
pub const HINT_START_RATIO: f64 = 0.6;

pub const HINT_RELEASE: &str = "Release to refresh";
pub const HINT_KEEP_PULLING: &str = "Keep pulling";

/// Visual parameters for one render of the indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorStyle {
    /// Render anything at all
    pub visible: bool,
    pub vertical_offset: f64,
    pub opacity: f64,
    pub rotation_deg: f64,
    /// Continuous spin is left to the renderer (CSS animation)
    pub spinning: bool,
    /// Ease position changes; off while the finger is dragging
    pub animate: bool,
    pub show_hint: bool,
    pub hint_text: &'static str,
    pub hint_opacity: f64,
}

impl IndicatorStyle {
    fn hidden() -> Self {
        Self {
            visible: false,
            vertical_offset: 0.0,
            opacity: 0.0,
            rotation_deg: 0.0,
            spinning: false,
            animate: true,
            show_hint: false,
            hint_text: HINT_KEEP_PULLING,
            hint_opacity: 0.0,
        }
    }

    /// Inline style for the indicator wrapper
    pub fn container_css(&self) -> String {
        let transition = if self.animate {
            "transition: transform 0.2s ease-out, opacity 0.2s ease-out;"
        } else {
            "transition: none;"
        };

        format!(
            "transform: translateY({:.1}px); opacity: {:.3}; {}",
            self.vertical_offset, self.opacity, transition
        )
    }

    /// Inline style for the rotating icon
    pub fn icon_css(&self) -> String {
        format!("transform: rotate({:.1}deg);", self.rotation_deg)
    }

    pub fn hint_css(&self) -> String {
        format!("opacity: {:.3};", self.hint_opacity)
    }
}

/// Map the pull state to indicator visuals.
///
/// A running refresh takes precedence over any pull values still held
/// in the state.
pub fn map_indicator(state: &PullState, threshold: f64) -> IndicatorStyle {
    if state.is_refreshing {
        return IndicatorStyle {
            visible: true,
            vertical_offset: RESTING_OFFSET,
            opacity: 1.0,
            rotation_deg: 360.0,
            spinning: true,
            animate: true,
            ..IndicatorStyle::hidden()
        };
    }

    if !state.is_pulling {
        return IndicatorStyle::hidden();
    }

    let threshold = threshold.max(f64::EPSILON);
    let distance = state.pull_distance.max(0.0);
    let progress = distance / threshold;

    let hint_start = threshold * HINT_START_RATIO;
    let hint_opacity = ((distance - hint_start) / (threshold - hint_start)).clamp(0.0, 1.0);

    IndicatorStyle {
        visible: true,
        vertical_offset: distance.min(threshold + OVERPULL_ALLOWANCE),
        opacity: progress.clamp(0.0, 1.0),
        rotation_deg: (progress * 180.0).clamp(0.0, 180.0),
        spinning: false,
        animate: false,
        show_hint: distance > hint_start,
        hint_text: if distance >= threshold {
            HINT_RELEASE
        } else {
            HINT_KEEP_PULLING
        },
        hint_opacity,
    }
}
