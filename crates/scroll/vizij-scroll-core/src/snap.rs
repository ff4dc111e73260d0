//! Snap coordination for pinned sections.
//!
//! Once the page's sections have registered, the coordinator snapshots their
//! pinned scroll spans, normalizes them by the maximum scroll offset and
//! installs a snap rule:
//! - positions outside every pinned range (widened by a buffer) scroll freely;
//! - positions inside one snap to the nearest pinned center.
//!
//! State machine: `Uninitialized -> Active -> Uninitialized`. The settle delay
//! before activation is a countdown field, not a separate state.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::tween::ScrollTween;

/// Snap moves shorter than this (normalized units) are skipped.
const SNAP_EPSILON: f32 = 1e-4;

/// Pinned scroll span in document pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinnedSpan {
    pub start: f32,
    pub end: f32,
}

/// Provider of the current pinned spans and scroll extent, in registration order.
pub trait PinnedRangeSource {
    fn pinned_spans(&self) -> Vec<PinnedSpan>;
    fn max_scroll(&self) -> f32;
}

/// Pinned span normalized to [0,1] of the document's scroll extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinnedRange {
    pub start: f32,
    pub end: f32,
    pub center: f32,
}

impl PinnedRange {
    /// Normalize a span; `max_scroll` must be > 0.
    pub fn from_span(span: PinnedSpan, max_scroll: f32) -> Self {
        let start = span.start / max_scroll;
        let end = span.end / max_scroll;
        Self {
            start,
            end,
            center: start + (end - start) * 0.5,
        }
    }

    #[inline]
    pub fn contains_buffered(&self, v: f32, buffer: f32) -> bool {
        v >= self.start - buffer && v <= self.end + buffer
    }
}

/// The installed snapping rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapRule {
    ranges: Vec<PinnedRange>,
    buffer: f32,
}

impl SnapRule {
    /// Build from spans in registration order. Returns None when there is
    /// nothing to snap to (no spans, or no scrollable overflow).
    pub fn build(spans: &[PinnedSpan], max_scroll: f32, buffer: f32) -> Option<Self> {
        if spans.is_empty() || !max_scroll.is_finite() || max_scroll <= 0.0 {
            return None;
        }
        let mut ordered: Vec<PinnedSpan> = spans
            .iter()
            .copied()
            .filter(|s| s.start.is_finite() && s.end.is_finite())
            .collect();
        if ordered.is_empty() {
            return None;
        }
        // Stable: equal starts keep registration order for tie-breaking.
        ordered.sort_by(|a, b| a.start.total_cmp(&b.start));
        Some(Self::from_ranges(
            ordered
                .into_iter()
                .map(|s| PinnedRange::from_span(s, max_scroll))
                .collect(),
            buffer,
        ))
    }

    /// Wrap already-normalized ranges, kept in the given order.
    pub fn from_ranges(ranges: Vec<PinnedRange>, buffer: f32) -> Self {
        Self { ranges, buffer }
    }

    pub fn ranges(&self) -> &[PinnedRange] {
        &self.ranges
    }

    pub fn buffer(&self) -> f32 {
        self.buffer
    }

    /// Snap target for normalized scroll position `v`.
    pub fn resolve(&self, v: f32) -> f32 {
        let Some(first) = self.ranges.first() else {
            return v;
        };
        let in_pinned = self
            .ranges
            .iter()
            .any(|r| r.contains_buffered(v, self.buffer));
        if !in_pinned {
            return v;
        }
        // Strict `<` keeps the earliest range on ties.
        self.ranges.iter().fold(first.center, |closest, r| {
            if (r.center - v).abs() < (closest - v).abs() {
                r.center
            } else {
                closest
            }
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapState {
    Uninitialized,
    Active,
}

/// Host-owned snap coordinator. Create once per page, tear down on navigation.
#[derive(Debug)]
pub struct SnapCoordinator {
    cfg: Config,
    rule: Option<SnapRule>,
    /// Remaining settle delay while armed.
    settle_ms: Option<f32>,
    in_flight: Option<ScrollTween>,
}

impl Default for SnapCoordinator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl SnapCoordinator {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            rule: None,
            settle_ms: None,
            in_flight: None,
        }
    }

    pub fn state(&self) -> SnapState {
        if self.rule.is_some() {
            SnapState::Active
        } else {
            SnapState::Uninitialized
        }
    }

    pub fn rule(&self) -> Option<&SnapRule> {
        self.rule.as_ref()
    }

    /// Ranges of the active rule (empty when uninitialized).
    pub fn ranges(&self) -> &[PinnedRange] {
        self.rule.as_ref().map(SnapRule::ranges).unwrap_or_default()
    }

    /// True while the settle countdown is running.
    pub fn is_settling(&self) -> bool {
        self.settle_ms.is_some()
    }

    /// Arm the settle countdown. Any active rule or pending countdown is torn
    /// down first, so repeated calls never stack rules.
    pub fn initialize(&mut self, delay_ms: u32) {
        self.teardown();
        self.settle_ms = Some(delay_ms as f32);
    }

    /// `initialize` with the configured settle delay.
    pub fn initialize_default(&mut self) {
        self.initialize(self.cfg.settle_delay_ms);
    }

    /// Count the settle delay down by `dt_ms`; on expiry snapshot `source` and
    /// activate. Returns true only on the tick that installed a rule.
    pub fn advance(&mut self, dt_ms: f32, source: &dyn PinnedRangeSource) -> bool {
        let Some(remaining) = self.settle_ms else {
            return false;
        };
        let remaining = remaining - dt_ms.max(0.0);
        if remaining > 0.0 {
            self.settle_ms = Some(remaining);
            return false;
        }
        self.settle_ms = None;
        self.activate(source)
    }

    /// Snapshot `source` now. No pinned spans or no scroll extent leaves the
    /// coordinator uninitialized; that is a no-op, not an error.
    pub fn activate(&mut self, source: &dyn PinnedRangeSource) -> bool {
        self.teardown();
        let spans = source.pinned_spans();
        let max_scroll = source.max_scroll();
        match SnapRule::build(&spans, max_scroll, self.cfg.snap_buffer) {
            Some(rule) => {
                debug!(
                    "snap rule installed over {} pinned ranges (max scroll {max_scroll})",
                    rule.ranges().len()
                );
                self.rule = Some(rule);
                true
            }
            None => {
                debug!(
                    "snap rule skipped: {} pinned spans, max scroll {max_scroll}",
                    spans.len()
                );
                false
            }
        }
    }

    /// Recompute ranges after a resize or content change. Only acts when Active.
    pub fn refresh(&mut self, source: &dyn PinnedRangeSource) -> bool {
        if self.rule.is_none() {
            return false;
        }
        self.activate(source)
    }

    /// Snap target for normalized position `v`; identity when no rule is active.
    pub fn resolve(&self, v: f32) -> f32 {
        match &self.rule {
            Some(rule) => rule.resolve(v),
            None => v,
        }
    }

    /// Start a snap from `v` if the rule moves it. The returned tween runs in
    /// normalized units over a duration scaled by distance within the
    /// configured bounds; it replaces any snap already in flight.
    pub fn begin_snap(&mut self, v: f32) -> Option<ScrollTween> {
        let target = self.resolve(v);
        let distance = (target - v).abs();
        if !distance.is_finite() || distance < SNAP_EPSILON {
            self.in_flight = None;
            return None;
        }
        let range = self.cfg.snap_duration;
        let t = (distance / self.cfg.snap_full_distance).min(1.0);
        let duration = range.clamp(range.min + (range.max - range.min) * t);
        let tween = ScrollTween::new(v, target, duration, self.cfg.snap_ease);
        self.in_flight = Some(tween);
        Some(tween)
    }

    /// Advance the in-flight snap; yields the next normalized position, or
    /// None when nothing is in flight. The snap is dropped once it lands.
    pub fn step(&mut self, dt: f32) -> Option<f32> {
        let tween = self.in_flight.as_mut()?;
        let v = tween.advance(dt);
        if tween.is_complete() {
            self.in_flight = None;
        }
        Some(v)
    }

    pub fn in_flight(&self) -> Option<&ScrollTween> {
        self.in_flight.as_ref()
    }

    /// Cancel only the in-flight snap (e.g. the user grabbed the scrollbar).
    pub fn cancel_snap(&mut self) {
        self.in_flight = None;
    }

    /// Remove the rule, the settle countdown and any in-flight snap. Idempotent.
    pub fn teardown(&mut self) {
        if self.rule.is_some() {
            debug!("snap rule torn down");
        }
        self.rule = None;
        self.settle_ms = None;
        self.in_flight = None;
    }
}
