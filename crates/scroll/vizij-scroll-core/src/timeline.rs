//! Compiled section timelines.
//!
//! Model:
//! - Each `PhaseTransition` is flattened into one tween per (target, property),
//!   with staggered targets starting `stagger` apart.
//! - Tweens are ordered by start; equal starts keep declaration order.
//! - At progress p a property takes the value of the latest tween with
//!   `start <= p`, evaluated at its eased local progress. Before any tween has
//!   started the first tween's `from` is shown.
//! - Missing `from` values are read off the timeline at the tween's start, so a
//!   "to" tween continues from wherever earlier tweens left the property.

use hashbrown::HashMap;

use crate::data::PhaseTransition;
use crate::ease::{lerp_f32, Ease};
use crate::ids::TargetHandle;
use crate::phase::Phase;
use crate::props::{ElementState, PropertySet, VisualProperty};

/// How a transition without an explicit span is sized.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpanPolicy {
    /// Run to the end of the phase band containing the offset (pinned sections).
    Banded,
    /// Run to the end of the timeline (flowing sections).
    ToEnd,
}

impl SpanPolicy {
    fn default_span(self, offset: f32) -> f32 {
        match self {
            SpanPolicy::Banded => Phase::at(offset).band_end() - offset,
            SpanPolicy::ToEnd => 1.0 - offset,
        }
    }
}

#[derive(Clone, Debug)]
struct Tween {
    target_idx: usize,
    prop: VisualProperty,
    from: f32,
    to: f32,
    start: f32,
    end: f32,
    ease: Ease,
}

impl Tween {
    /// Value at progress `p`; callers guarantee `p >= start`.
    fn value_at(&self, p: f32) -> f32 {
        if p >= self.end || self.end <= self.start {
            return self.to;
        }
        let local = (p - self.start) / (self.end - self.start);
        lerp_f32(self.from, self.to, self.ease.apply(local))
    }
}

fn value_in(tweens: &[Tween], target_idx: usize, prop: VisualProperty, p: f32) -> Option<f32> {
    let mut value = None;
    for tw in tweens
        .iter()
        .filter(|t| t.target_idx == target_idx && t.prop == prop)
    {
        if p >= tw.start {
            value = Some(tw.value_at(p));
        } else {
            if value.is_none() {
                value = Some(tw.from);
            }
            break;
        }
    }
    value
}

#[derive(Clone, Debug, Default)]
pub struct Timeline {
    targets: Vec<TargetHandle>,
    tweens: Vec<Tween>,
}

impl Timeline {
    /// Flatten transitions into per-property tweens. Offsets are assumed valid
    /// (see `SectionConfig::validate`); starts pushed past 1 by stagger clamp to 1.
    pub fn compile(phases: &[PhaseTransition], policy: SpanPolicy) -> Self {
        struct Pending<'a> {
            target_idx: usize,
            start: f32,
            end: f32,
            from: Option<&'a PropertySet>,
            to: &'a PropertySet,
            ease: Ease,
        }

        let mut targets: Vec<TargetHandle> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut pending: Vec<Pending<'_>> = Vec::new();

        for t in phases {
            let span = t.span.unwrap_or_else(|| policy.default_span(t.offset));
            for (i, target) in t.targets.iter().enumerate() {
                let target_idx = *index.entry(target.as_str()).or_insert_with(|| {
                    targets.push(target.clone());
                    targets.len() - 1
                });
                let start = (t.offset + t.stagger * i as f32).min(1.0);
                pending.push(Pending {
                    target_idx,
                    start,
                    end: (start + span).min(1.0),
                    from: t.from.as_ref(),
                    to: &t.to,
                    ease: t.ease,
                });
            }
        }
        pending.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut tweens: Vec<Tween> = Vec::new();
        for p in pending {
            for (prop, to) in p.to.iter() {
                let from = p
                    .from
                    .and_then(|f| f.get(prop))
                    .or_else(|| value_in(&tweens, p.target_idx, prop, p.start))
                    .unwrap_or_else(|| prop.neutral());
                tweens.push(Tween {
                    target_idx: p.target_idx,
                    prop,
                    from,
                    to,
                    start: p.start,
                    end: p.end,
                    ease: p.ease,
                });
            }
        }

        Self { targets, tweens }
    }

    /// Elements this timeline drives, in first-appearance order.
    pub fn targets(&self) -> &[TargetHandle] {
        &self.targets
    }

    /// Number of flattened (target, property) tweens.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Value of one property of one target at progress `p`, if anything drives it.
    pub fn value_at(&self, target: &str, prop: VisualProperty, p: f32) -> Option<f32> {
        let idx = self.targets.iter().position(|t| t == target)?;
        value_in(&self.tweens, idx, prop, p.clamp(0.0, 1.0))
    }

    /// Full state of every driven target at progress `p`.
    pub fn sample(&self, p: f32) -> Vec<ElementState> {
        let p = p.clamp(0.0, 1.0);
        let mut out: Vec<ElementState> = self
            .targets
            .iter()
            .map(|t| ElementState {
                target: t.clone(),
                props: PropertySet::new(),
            })
            .collect();
        for tw in &self.tweens {
            let props = &mut out[tw.target_idx].props;
            if p >= tw.start {
                props.set(tw.prop, tw.value_at(p));
            } else if props.get(tw.prop).is_none() {
                props.set(tw.prop, tw.from);
            }
        }
        out
    }
}
