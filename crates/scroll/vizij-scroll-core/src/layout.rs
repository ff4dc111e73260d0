//! Host layout contracts.
//!
//! The core never touches a DOM. Hosts describe the page through a
//! `LayoutProbe` (measured at registration and on refresh) and a per-tick
//! `ScrollFrame`. All lengths are document pixels.

use serde::{Deserialize, Serialize};

/// Measured box of a section element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionGeometry {
    /// Distance from the document top to the element's top edge.
    pub top: f32,
    pub height: f32,
}

impl SectionGeometry {
    /// Zero-height or non-finite boxes are not laid out yet.
    #[inline]
    pub fn is_measurable(&self) -> bool {
        self.top.is_finite() && self.height.is_finite() && self.height > 0.0
    }
}

/// Scroll state for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollFrame {
    pub scroll_offset: f32,
    pub viewport_height: f32,
    /// Largest reachable scroll offset (document height minus viewport).
    pub max_scroll: f32,
}

/// Resolves section elements to their current geometry.
/// Adapters (wasm/tests) implement this and pass it to register/refresh.
pub trait LayoutProbe {
    fn measure(&mut self, target: &str) -> Option<SectionGeometry>;
}

impl<F> LayoutProbe for F
where
    F: FnMut(&str) -> Option<SectionGeometry>,
{
    fn measure(&mut self, target: &str) -> Option<SectionGeometry> {
        self(target)
    }
}
