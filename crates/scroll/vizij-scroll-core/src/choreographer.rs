//! Choreographer: owns registered sections and turns scroll frames into
//! property changes.
//!
//! Methods:
//! - register / unregister / unregister_all (section lifecycle, mount order kept)
//! - refresh (re-measure; activates deferred sections)
//! - update (per tick: progress -> scrub lag -> sample -> changes + events)

use log::{debug, warn};

use crate::config::Config;
use crate::data::{SectionConfig, Trigger};
use crate::ease::Ease;
use crate::error::ScrollError;
use crate::ids::{IdAllocator, SectionId};
use crate::layout::{LayoutProbe, ScrollFrame, SectionGeometry};
use crate::outputs::{Change, Outputs, ScrollEvent};
use crate::phase::{scroll_progress, Phase};
use crate::snap::{PinnedRangeSource, PinnedSpan};
use crate::timeline::{SpanPolicy, Timeline};
use crate::tween::ScrollTween;

/// Progress differences below this are treated as converged.
const PROGRESS_EPSILON: f32 = 1e-4;

#[derive(Debug)]
enum Playback {
    /// Progress follows the scroll offset.
    Scrubbed,
    /// Progress follows the clock once the trigger is crossed; plays once.
    Timed {
        duration: f32,
        tween: Option<ScrollTween>,
        completed: bool,
    },
}

#[derive(Debug)]
struct Section {
    id: SectionId,
    config: SectionConfig,
    timeline: Timeline,
    /// None while deferred.
    geometry: Option<SectionGeometry>,
    playback: Playback,
    /// Displayed progress (after scrub lag).
    progress: f32,
    /// Progress last written to outputs; None forces a render.
    rendered: Option<f32>,
    phase: Option<Phase>,
    pinned_now: bool,
    /// Strictly past the window start (offset > start).
    active: bool,
}

impl Section {
    fn new(id: SectionId, config: SectionConfig, geometry: Option<SectionGeometry>) -> Self {
        let policy = if config.pinned {
            SpanPolicy::Banded
        } else {
            SpanPolicy::ToEnd
        };
        let timeline = Timeline::compile(&config.phases, policy);
        let playback = match config.trigger {
            Trigger::Timed { duration, .. } if !config.pinned => Playback::Timed {
                duration,
                tween: None,
                completed: false,
            },
            _ => Playback::Scrubbed,
        };
        Self {
            id,
            config,
            timeline,
            geometry,
            playback,
            progress: 0.0,
            rendered: None,
            phase: None,
            pinned_now: false,
            active: false,
        }
    }

    /// Scroll offsets where this section's progress starts and ends.
    fn window(&self, g: SectionGeometry, viewport_height: f32) -> (f32, f32) {
        if self.config.pinned {
            return (
                g.top,
                g.top + self.config.scroll_distance * viewport_height,
            );
        }
        match self.config.trigger {
            Trigger::Timed { start_at, .. } => {
                let at = g.top - start_at * viewport_height;
                (at, at)
            }
            Trigger::Scrubbed { start_at, end_at } => (
                g.top - start_at * viewport_height,
                g.top - end_at * viewport_height,
            ),
        }
    }

    fn pinned_span(&self, viewport_height: f32) -> Option<PinnedSpan> {
        if !self.config.pinned {
            return None;
        }
        let g = self.geometry?;
        let (start, end) = self.window(g, viewport_height);
        Some(PinnedSpan { start, end })
    }

    fn step(&mut self, dt: f32, frame: &ScrollFrame, out: &mut Outputs) {
        let Some(g) = self.geometry else {
            return;
        };
        let offset = frame.scroll_offset;
        let (start, end) = self.window(g, frame.viewport_height);

        if self.config.pinned {
            let pin = offset >= start && offset < end;
            if pin != self.pinned_now {
                self.pinned_now = pin;
                let target = self.config.target.clone();
                out.push_event(if pin {
                    ScrollEvent::Pinned {
                        section: self.id,
                        target,
                    }
                } else {
                    ScrollEvent::Unpinned {
                        section: self.id,
                        target,
                    }
                });
            }
        }

        let target_progress = match &mut self.playback {
            Playback::Scrubbed => scroll_progress(offset, start, end),
            Playback::Timed {
                duration,
                tween,
                completed,
            } => {
                if let Some(tw) = tween.as_mut() {
                    let p = tw.advance(dt);
                    if tw.is_complete() && !*completed {
                        *completed = true;
                        out.push_event(ScrollEvent::TweenCompleted { section: self.id });
                    }
                    p
                } else if offset >= start {
                    // Starts from 0 on the crossing tick; time accrues from the next one.
                    *tween = Some(ScrollTween::new(0.0, 1.0, *duration, Ease::Linear));
                    out.push_event(ScrollEvent::TriggerEntered { section: self.id });
                    0.0
                } else {
                    0.0
                }
            }
        };

        let lag = self.config.scrub_lag;
        self.progress = match (&self.playback, self.rendered) {
            (Playback::Scrubbed, Some(_)) if lag > 0.0 => {
                let alpha = if dt > 0.0 { (dt / lag).min(1.0) } else { 0.0 };
                let next = self.progress + (target_progress - self.progress) * alpha;
                if (target_progress - next).abs() < PROGRESS_EPSILON {
                    target_progress
                } else {
                    next
                }
            }
            _ => target_progress,
        };

        if self.config.pinned {
            let phase = Phase::at(self.progress);
            if self.phase != Some(phase) {
                out.push_event(ScrollEvent::PhaseChanged {
                    section: self.id,
                    from: self.phase,
                    to: phase,
                });
                self.phase = Some(phase);
            }
        }

        if self.rendered != Some(self.progress) {
            for state in self.timeline.sample(self.progress) {
                if state.props.is_empty() {
                    continue;
                }
                out.push_change(Change {
                    section: self.id,
                    target: state.target,
                    props: state.props,
                });
            }
            self.rendered = Some(self.progress);
        }

        let active = offset > start;
        if self.active && !active {
            out.push_event(ScrollEvent::LeftBack { section: self.id });
            for reset in &self.config.leave_back {
                out.push_change(Change {
                    section: self.id,
                    target: reset.target.clone(),
                    props: reset.props.clone(),
                });
            }
        }
        self.active = active;
    }
}

/// Section Choreographer.
#[derive(Debug)]
pub struct Choreographer {
    cfg: Config,
    ids: IdAllocator,
    /// Registration (mount) order.
    sections: Vec<Section>,
    frame: ScrollFrame,
    /// Events raised outside update(); flushed into the next outputs.
    pending: Vec<ScrollEvent>,
    outputs: Outputs,
}

impl Default for Choreographer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Choreographer {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            ids: IdAllocator::new(),
            sections: Vec::new(),
            frame: ScrollFrame::default(),
            pending: Vec::new(),
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Validate, compile and register a section. Sections whose geometry can't
    /// be measured are kept but deferred until `refresh` finds a real box.
    pub fn register(
        &mut self,
        config: SectionConfig,
        probe: &mut dyn LayoutProbe,
    ) -> Result<SectionId, ScrollError> {
        if let Err(e) = config.validate() {
            warn!("rejecting section '{}': {e}", config.name);
            return Err(e);
        }
        let id = self.ids.alloc_section();
        let geometry = probe
            .measure(&config.target)
            .filter(SectionGeometry::is_measurable);
        match geometry {
            Some(g) => debug!(
                "registered section '{}' as {:?} (top {}, height {}, pinned {})",
                config.name, id, g.top, g.height, config.pinned
            ),
            None => {
                debug!("section '{}' has no layout yet; deferring", config.name);
                self.pending.push(ScrollEvent::SectionDeferred { section: id });
            }
        }
        self.sections.push(Section::new(id, config, geometry));
        Ok(id)
    }

    /// Drop a section and everything in flight for it. Returns false when the
    /// id is unknown (already unregistered), which is not an error.
    pub fn unregister(&mut self, id: SectionId) -> bool {
        let Some(idx) = self.sections.iter().position(|s| s.id == id) else {
            return false;
        };
        let section = self.sections.remove(idx);
        self.pending.retain(|e| e.section() != id);
        self.pending.push(ScrollEvent::SectionReleased {
            section: id,
            target: section.config.target.clone(),
            was_pinned: section.pinned_now,
        });
        debug!("unregistered section '{}'", section.config.name);
        true
    }

    /// Route teardown: release every section. Returns how many were removed.
    pub fn unregister_all(&mut self) -> usize {
        let ids: Vec<SectionId> = self.sections.iter().map(|s| s.id).collect();
        ids.into_iter().filter(|id| self.unregister(*id)).count()
    }

    /// Re-measure every section (resize, late layout). Forces a re-render.
    pub fn refresh(&mut self, probe: &mut dyn LayoutProbe) {
        for s in &mut self.sections {
            let measured = probe
                .measure(&s.config.target)
                .filter(SectionGeometry::is_measurable);
            match (s.geometry.is_some(), measured.is_some()) {
                (false, true) => {
                    debug!("section '{}' measured; activating", s.config.name);
                    self.pending
                        .push(ScrollEvent::SectionActivated { section: s.id });
                }
                (true, false) => {
                    debug!("section '{}' lost its layout; deferring", s.config.name);
                    if s.pinned_now {
                        s.pinned_now = false;
                        self.pending.push(ScrollEvent::Unpinned {
                            section: s.id,
                            target: s.config.target.clone(),
                        });
                    }
                    self.pending
                        .push(ScrollEvent::SectionDeferred { section: s.id });
                }
                _ => {}
            }
            s.geometry = measured;
            s.rendered = None;
        }
    }

    /// Step by `dt` seconds with the host's current scroll state.
    pub fn update(&mut self, dt: f32, frame: ScrollFrame) -> &Outputs {
        self.outputs.clear();
        self.frame = frame;
        for e in self.pending.drain(..) {
            self.outputs.push_event(e);
        }
        if !(frame.viewport_height > 0.0) || !frame.scroll_offset.is_finite() {
            return &self.outputs;
        }
        for s in &mut self.sections {
            s.step(dt, &frame, &mut self.outputs);
        }
        &self.outputs
    }

    /// Outputs of the last update().
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Last frame passed to update().
    pub fn frame(&self) -> ScrollFrame {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn contains(&self, id: SectionId) -> bool {
        self.section(id).is_some()
    }

    /// Displayed progress of a section.
    pub fn progress(&self, id: SectionId) -> Option<f32> {
        self.section(id).map(|s| s.progress)
    }

    /// Current phase of a pinned section that has rendered at least once.
    pub fn phase(&self, id: SectionId) -> Option<Phase> {
        self.section(id).and_then(|s| s.phase)
    }

    pub fn is_deferred(&self, id: SectionId) -> bool {
        self.section(id).is_some_and(|s| s.geometry.is_none())
    }

    pub fn is_pinned(&self, id: SectionId) -> bool {
        self.section(id).is_some_and(|s| s.pinned_now)
    }

    fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}

impl PinnedRangeSource for Choreographer {
    fn pinned_spans(&self) -> Vec<PinnedSpan> {
        let vh = self.frame.viewport_height;
        if !(vh > 0.0) {
            return Vec::new();
        }
        self.sections
            .iter()
            .filter_map(|s| s.pinned_span(vh))
            .collect()
    }

    fn max_scroll(&self) -> f32 {
        self.frame.max_scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PhaseTransition;
    use crate::props::{ElementState, PropertySet, VisualProperty};

    fn probe_at(top: f32, height: f32) -> impl FnMut(&str) -> Option<SectionGeometry> {
        move |_: &str| Some(SectionGeometry { top, height })
    }

    fn frame(offset: f32) -> ScrollFrame {
        ScrollFrame {
            scroll_offset: offset,
            viewport_height: 1000.0,
            max_scroll: 10_000.0,
        }
    }

    fn hero() -> SectionConfig {
        SectionConfig::pinned("hero", "hero").with_phase(PhaseTransition::from_to(
            "content",
            PropertySet::new().with(VisualProperty::Opacity, 1.0),
            PropertySet::new().with(VisualProperty::Opacity, 0.0),
            0.7,
        ))
    }

    #[test]
    fn pinned_window_spans_scroll_distance() {
        let mut ch = Choreographer::default();
        let id = ch.register(hero(), &mut probe_at(0.0, 1000.0)).unwrap();
        ch.update(0.016, frame(650.0));
        assert!((ch.progress(id).unwrap() - 0.5).abs() < 1e-6);
        assert!(ch.is_pinned(id));
        assert_eq!(ch.phase(id), Some(Phase::Settle));
        ch.update(0.016, frame(1300.0));
        assert!(!ch.is_pinned(id));
    }

    #[test]
    fn unchanged_progress_emits_no_changes() {
        let mut ch = Choreographer::default();
        ch.register(hero(), &mut probe_at(0.0, 1000.0)).unwrap();
        assert!(!ch.update(0.016, frame(100.0)).changes.is_empty());
        assert!(ch.update(0.016, frame(100.0)).changes.is_empty());
    }

    #[test]
    fn pending_events_for_removed_sections_are_dropped() {
        let mut ch = Choreographer::default();
        let id = ch
            .register(hero(), &mut |_: &str| None::<SectionGeometry>)
            .unwrap();
        assert!(ch.unregister(id));
        let out = ch.update(0.016, frame(0.0));
        assert_eq!(out.events.len(), 1);
        assert!(matches!(
            out.events[0],
            ScrollEvent::SectionReleased { was_pinned: false, .. }
        ));
    }

    #[test]
    fn section_at_page_top_leaves_back_on_return_to_zero() {
        let mut ch = Choreographer::default();
        let mut cfg = hero();
        cfg.leave_back.push(ElementState {
            target: "content".into(),
            props: PropertySet::new().with(VisualProperty::Opacity, 1.0),
        });
        let id = ch.register(cfg, &mut probe_at(0.0, 1000.0)).unwrap();
        let left_back = |out: &Outputs| {
            out.events
                .iter()
                .any(|e| matches!(e, ScrollEvent::LeftBack { section } if *section == id))
        };
        assert!(!left_back(ch.update(0.016, frame(0.0))));
        assert!(!left_back(ch.update(0.016, frame(800.0))));
        assert!(!left_back(ch.update(0.016, frame(100.0))));
        let out = ch.update(0.016, frame(0.0));
        assert!(left_back(out));
        let reset = out.changes.last().unwrap();
        assert_eq!(reset.target, "content");
        assert_eq!(reset.props.get(VisualProperty::Opacity), Some(1.0));
        assert!(!left_back(ch.update(0.016, frame(0.0))));
    }
}
