//! Core configuration for vizij-scroll-core.
//!
//! Every tunable the choreography and snapping rules depend on lives here as a
//! named constant, and `Config::default()` is built from those constants.

use serde::{Deserialize, Serialize};

use crate::ease::Ease;
use crate::error::ScrollError;

/// Buffer (in normalized scroll units) added to both ends of a pinned range
/// when deciding whether a scroll position is "near" it.
pub const SNAP_BUFFER: f32 = 0.02;

/// Delay before the snap coordinator snapshots pinned ranges, giving late
/// sections time to mount and register.
pub const SETTLE_DELAY_MS: u32 = 500;

/// Shortest snap animation, in seconds.
pub const SNAP_DURATION_MIN: f32 = 0.15;

/// Longest snap animation, in seconds.
pub const SNAP_DURATION_MAX: f32 = 0.35;

/// Snap distance (normalized scroll units) at which the snap uses the full
/// `SNAP_DURATION_MAX`. Shorter distances scale down towards the minimum.
pub const SNAP_FULL_DURATION_DISTANCE: f32 = 0.1;

/// Default extra scroll length a pinned section consumes (130% of the viewport).
pub const DEFAULT_SCROLL_DISTANCE: f32 = 1.3;

/// Default viewport threshold for non-pinned sections: a section triggers when
/// its top edge reaches 80% down the viewport.
pub const DEFAULT_TRIGGER_START: f32 = 0.8;

/// Default real-time duration (seconds) of an intersection-triggered tween.
pub const DEFAULT_TWEEN_DURATION: f32 = 0.6;

/// Snap animation duration bounds in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: f32,
    pub max: f32,
}

impl DurationRange {
    /// Clamp a duration into `[min, max]`.
    #[inline]
    pub fn clamp(&self, d: f32) -> f32 {
        d.clamp(self.min, self.max)
    }
}

impl Default for DurationRange {
    fn default() -> Self {
        Self {
            min: SNAP_DURATION_MIN,
            max: SNAP_DURATION_MAX,
        }
    }
}

/// Configuration shared by the choreographer and the snap coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Buffer around each pinned range for the snap rule.
    pub snap_buffer: f32,
    /// Settle delay before the snap rule is installed.
    pub settle_delay_ms: u32,
    /// Snap animation duration bounds.
    pub snap_duration: DurationRange,
    /// Distance at which a snap takes `snap_duration.max`.
    pub snap_full_distance: f32,
    /// Easing of the snap animation (decelerating).
    pub snap_ease: Ease,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snap_buffer: SNAP_BUFFER,
            settle_delay_ms: SETTLE_DELAY_MS,
            snap_duration: DurationRange::default(),
            snap_full_distance: SNAP_FULL_DURATION_DISTANCE,
            snap_ease: Ease::power_out(2),
        }
    }
}

impl Config {
    /// Reject values that would make the snap rule ill-defined.
    pub fn validate(&self) -> Result<(), ScrollError> {
        if !self.snap_buffer.is_finite() || self.snap_buffer < 0.0 {
            return Err(ScrollError::InvalidConfig(format!(
                "snap_buffer must be finite and >= 0, got {}",
                self.snap_buffer
            )));
        }
        let DurationRange { min, max } = self.snap_duration;
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < min {
            return Err(ScrollError::InvalidConfig(format!(
                "snap_duration must satisfy 0 <= min <= max, got [{min}, {max}]"
            )));
        }
        if !self.snap_full_distance.is_finite() || self.snap_full_distance <= 0.0 {
            return Err(ScrollError::InvalidConfig(format!(
                "snap_full_distance must be > 0, got {}",
                self.snap_full_distance
            )));
        }
        Ok(())
    }
}
