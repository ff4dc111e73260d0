//! Real-time tweens.
//!
//! Used where progress follows the clock instead of the scroll offset:
//! intersection-triggered playback of flowing sections and snap animations.
//! Time only moves when the host calls `advance` with its frame delta.

use serde::{Deserialize, Serialize};

use crate::ease::{lerp_f32, Ease};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollTween {
    pub from: f32,
    pub to: f32,
    /// Seconds.
    pub duration: f32,
    pub ease: Ease,
    #[serde(default)]
    pub elapsed: f32,
}

impl ScrollTween {
    pub fn new(from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            ease,
            elapsed: 0.0,
        }
    }

    /// Linear 0..1 playback progress.
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Eased value at the current time.
    #[inline]
    pub fn value(&self) -> f32 {
        lerp_f32(self.from, self.to, self.ease.apply(self.progress()))
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Move time forward by `dt` seconds and return the new value.
    /// Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
        self.value()
    }
}
