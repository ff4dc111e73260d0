//! Phase bands and scroll-progress math.
//!
//! A pinned section's progress runs 0..1 across its scroll distance and is
//! split into three bands: entrance, settle (hold) and exit. Transition offsets
//! are positions in that overall progress, not within a band.

use serde::{Deserialize, Serialize};

/// End of the entrance band (exclusive).
pub const ENTRANCE_END: f32 = 0.3;

/// Start of the exit band (inclusive).
pub const EXIT_START: f32 = 0.7;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Entrance,
    Settle,
    Exit,
}

impl Phase {
    /// Band containing `progress`. Values outside [0,1] are clamped.
    pub fn at(progress: f32) -> Phase {
        let p = progress.clamp(0.0, 1.0);
        if p < ENTRANCE_END {
            Phase::Entrance
        } else if p < EXIT_START {
            Phase::Settle
        } else {
            Phase::Exit
        }
    }

    /// Progress at which this band ends.
    pub fn band_end(self) -> f32 {
        match self {
            Phase::Entrance => ENTRANCE_END,
            Phase::Settle => EXIT_START,
            Phase::Exit => 1.0,
        }
    }
}

/// Scrubbed progress: where `offset` lies between `start` and `end`, clamped
/// to [0,1]. A degenerate window (`end <= start`) is a step at `start`.
#[inline]
pub fn scroll_progress(offset: f32, start: f32, end: f32) -> f32 {
    if !offset.is_finite() {
        return 0.0;
    }
    let len = end - start;
    if len <= 0.0 || !len.is_finite() {
        return if offset >= start { 1.0 } else { 0.0 };
    }
    ((offset - start) / len).clamp(0.0, 1.0)
}
