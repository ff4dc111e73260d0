//! Section descriptors: what a page section hands the choreographer at mount.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_SCROLL_DISTANCE, DEFAULT_TRIGGER_START, DEFAULT_TWEEN_DURATION};
use crate::ease::Ease;
use crate::error::ScrollError;
use crate::ids::TargetHandle;
use crate::props::{ElementState, PropertySet};

fn default_scroll_distance() -> f32 {
    DEFAULT_SCROLL_DISTANCE
}

/// How a non-pinned ("flowing") section starts its transitions.
///
/// Thresholds are fractions of the viewport height measured from its top: a
/// section fires `start_at = 0.8` when its top edge is 80% of the way down.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Play once over `duration` seconds of real time after crossing `start_at`.
    Timed { start_at: f32, duration: f32 },
    /// Scrub progress by scroll while the top edge travels from `start_at` to `end_at`.
    Scrubbed { start_at: f32, end_at: f32 },
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::Timed {
            start_at: DEFAULT_TRIGGER_START,
            duration: DEFAULT_TWEEN_DURATION,
        }
    }
}

/// One keyed property transition inside a section's timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub targets: Vec<TargetHandle>,
    /// Start values. Properties missing here start from whatever the timeline
    /// holds at `offset`.
    #[serde(default)]
    pub from: Option<PropertySet>,
    pub to: PropertySet,
    #[serde(default)]
    pub ease: Ease,
    /// Position in the section's overall 0..1 progress.
    #[serde(default)]
    pub offset: f32,
    /// Length in progress units; defaults depend on the section kind.
    #[serde(default)]
    pub span: Option<f32>,
    /// Delay between consecutive targets, in progress units.
    #[serde(default)]
    pub stagger: f32,
}

impl PhaseTransition {
    /// Single-target transition with explicit start values.
    pub fn from_to(
        target: impl Into<TargetHandle>,
        from: PropertySet,
        to: PropertySet,
        offset: f32,
    ) -> Self {
        Self {
            targets: vec![target.into()],
            from: Some(from),
            to,
            ease: Ease::Linear,
            offset,
            span: None,
            stagger: 0.0,
        }
    }

    /// Single-target transition that starts from the current timeline value.
    pub fn to(target: impl Into<TargetHandle>, to: PropertySet, offset: f32) -> Self {
        Self {
            targets: vec![target.into()],
            from: None,
            to,
            ease: Ease::Linear,
            offset,
            span: None,
            stagger: 0.0,
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn with_span(mut self, span: f32) -> Self {
        self.span = Some(span);
        self
    }
}

/// Section descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub name: String,
    /// The section element itself (what gets pinned).
    pub target: TargetHandle,
    #[serde(default)]
    pub pinned: bool,
    /// Extra scroll consumed while pinned, as a fraction of viewport height.
    #[serde(default = "default_scroll_distance")]
    pub scroll_distance: f32,
    /// Ignored for pinned sections.
    #[serde(default)]
    pub trigger: Trigger,
    /// Seconds for displayed progress to catch up with scroll. 0 = lockstep.
    #[serde(default)]
    pub scrub_lag: f32,
    #[serde(default)]
    pub phases: Vec<PhaseTransition>,
    /// Re-applied when the user scrolls back above the section's start.
    #[serde(default)]
    pub leave_back: Vec<ElementState>,
}

impl SectionConfig {
    pub fn pinned(name: impl Into<String>, target: impl Into<TargetHandle>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            pinned: true,
            scroll_distance: DEFAULT_SCROLL_DISTANCE,
            trigger: Trigger::default(),
            scrub_lag: 0.0,
            phases: Vec::new(),
            leave_back: Vec::new(),
        }
    }

    pub fn flowing(
        name: impl Into<String>,
        target: impl Into<TargetHandle>,
        trigger: Trigger,
    ) -> Self {
        Self {
            pinned: false,
            trigger,
            ..Self::pinned(name, target)
        }
    }

    pub fn with_phase(mut self, t: PhaseTransition) -> Self {
        self.phases.push(t);
        self
    }

    /// Check the invariants the timeline compiler relies on.
    pub fn validate(&self) -> Result<(), ScrollError> {
        let section = || self.name.clone();
        if self.pinned {
            if !self.scroll_distance.is_finite() || self.scroll_distance <= 0.0 {
                return Err(ScrollError::InvalidScrollDistance {
                    section: section(),
                    distance: self.scroll_distance,
                });
            }
        } else {
            match self.trigger {
                Trigger::Timed { start_at, duration } => {
                    if !start_at.is_finite() {
                        return Err(ScrollError::InvalidTrigger {
                            section: section(),
                            reason: format!("start_at {start_at} is not finite"),
                        });
                    }
                    if !duration.is_finite() || duration <= 0.0 {
                        return Err(ScrollError::InvalidTrigger {
                            section: section(),
                            reason: format!("duration {duration} must be > 0"),
                        });
                    }
                }
                Trigger::Scrubbed { start_at, end_at } => {
                    if !start_at.is_finite() || !end_at.is_finite() || end_at > start_at {
                        return Err(ScrollError::InvalidTrigger {
                            section: section(),
                            reason: format!(
                                "scrub window must run down the viewport, got start_at {start_at} end_at {end_at}"
                            ),
                        });
                    }
                }
            }
        }
        if !self.scrub_lag.is_finite() || self.scrub_lag < 0.0 {
            return Err(ScrollError::InvalidTrigger {
                section: section(),
                reason: format!("scrub_lag {} must be >= 0", self.scrub_lag),
            });
        }

        for (index, t) in self.phases.iter().enumerate() {
            if !t.offset.is_finite() || !(0.0..=1.0).contains(&t.offset) {
                return Err(ScrollError::InvalidOffset {
                    section: section(),
                    index,
                    offset: t.offset,
                });
            }
            if let Some(span) = t.span {
                if !span.is_finite() || span <= 0.0 {
                    return Err(ScrollError::InvalidSpan {
                        section: section(),
                        index,
                        span,
                    });
                }
            }
            if !t.stagger.is_finite() || t.stagger < 0.0 {
                return Err(ScrollError::InvalidStagger {
                    section: section(),
                    index,
                    stagger: t.stagger,
                });
            }
            if t.targets.is_empty() {
                return Err(ScrollError::EmptyTargets {
                    section: section(),
                    index,
                });
            }
            if t.to.is_empty() {
                return Err(ScrollError::EmptyTransition {
                    section: section(),
                    index,
                });
            }
            let sets = std::iter::once(&t.to).chain(t.from.as_ref());
            for set in sets {
                if let Some(p) = set.first_non_finite() {
                    return Err(ScrollError::NonFiniteProperty {
                        section: section(),
                        property: p.name().to_string(),
                    });
                }
            }
        }
        for reset in &self.leave_back {
            if let Some(p) = reset.props.first_non_finite() {
                return Err(ScrollError::NonFiniteProperty {
                    section: section(),
                    property: p.name().to_string(),
                });
            }
        }
        Ok(())
    }
}
