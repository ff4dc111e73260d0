//! Output contracts from the choreographer.
//!
//! Outputs carry only the property changes for this tick, keyed by target
//! handle, and a separate list of lifecycle events. Adapters apply changes to
//! the host and act on events (e.g. toggling fixed positioning).

use serde::{Deserialize, Serialize};

use crate::ids::{SectionId, TargetHandle};
use crate::phase::Phase;
use crate::props::PropertySet;

/// New property values for one element this tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub section: SectionId,
    pub target: TargetHandle,
    pub props: PropertySet,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ScrollEvent {
    /// Registered without usable geometry; animation is skipped until refresh.
    SectionDeferred {
        section: SectionId,
    },
    /// A deferred section was measured and now animates.
    SectionActivated {
        section: SectionId,
    },
    /// The section element must be fixed to the viewport.
    Pinned {
        section: SectionId,
        target: TargetHandle,
    },
    /// The section element returns to normal flow.
    Unpinned {
        section: SectionId,
        target: TargetHandle,
    },
    PhaseChanged {
        section: SectionId,
        from: Option<Phase>,
        to: Phase,
    },
    /// A flowing section crossed its viewport threshold.
    TriggerEntered {
        section: SectionId,
    },
    /// A timed tween reached its end.
    TweenCompleted {
        section: SectionId,
    },
    /// Scrolled back above the section's start.
    LeftBack {
        section: SectionId,
    },
    /// The section was unregistered; the host should drop inline styles and,
    /// if `was_pinned`, fixed positioning.
    SectionReleased {
        section: SectionId,
        target: TargetHandle,
        was_pinned: bool,
    },
}

impl ScrollEvent {
    /// Section the event refers to.
    pub fn section(&self) -> SectionId {
        match self {
            ScrollEvent::SectionDeferred { section }
            | ScrollEvent::SectionActivated { section }
            | ScrollEvent::Pinned { section, .. }
            | ScrollEvent::Unpinned { section, .. }
            | ScrollEvent::PhaseChanged { section, .. }
            | ScrollEvent::TriggerEntered { section }
            | ScrollEvent::TweenCompleted { section }
            | ScrollEvent::LeftBack { section }
            | ScrollEvent::SectionReleased { section, .. } => *section,
        }
    }
}

/// Outputs returned by Choreographer::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<ScrollEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: ScrollEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Changes that belong to one section.
    pub fn changes_for(&self, section: SectionId) -> impl Iterator<Item = &Change> + '_ {
        self.changes.iter().filter(move |c| c.section == section)
    }
}
