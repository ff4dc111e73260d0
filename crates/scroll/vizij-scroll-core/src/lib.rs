//! Vizij Scroll Core (engine-agnostic)
//!
//! Scroll-driven choreography for long-form pages: sections register a
//! timeline of property transitions, the `Choreographer` maps each scroll
//! frame onto section progress and emits property changes plus pin/phase
//! events, and the `SnapCoordinator` snaps free scrolling to the centers of
//! pinned ranges. Hosts supply layout through `LayoutProbe` and apply the
//! outputs themselves; nothing here touches a DOM.

pub mod choreographer;
pub mod config;
pub mod data;
pub mod ease;
pub mod error;
pub mod ids;
pub mod layout;
pub mod outputs;
pub mod phase;
pub mod props;
pub mod snap;
pub mod stored_section;
pub mod timeline;
pub mod tween;

// Re-exports for consumers (adapters)
pub use choreographer::Choreographer;
pub use config::{Config, DurationRange};
pub use data::{PhaseTransition, SectionConfig, Trigger};
pub use ease::{Ease, EaseDir};
pub use error::ScrollError;
pub use ids::{SectionId, TargetHandle};
pub use layout::{LayoutProbe, ScrollFrame, SectionGeometry};
pub use outputs::{Change, Outputs, ScrollEvent};
pub use phase::{scroll_progress, Phase};
pub use props::{ElementState, PropertySet, VisualProperty};
pub use snap::{
    PinnedRange, PinnedRangeSource, PinnedSpan, SnapCoordinator, SnapRule, SnapState,
};
pub use stored_section::{parse_page_json, parse_section_json};
pub use timeline::{SpanPolicy, Timeline};
pub use tween::ScrollTween;
