use serde::Deserialize;

use crate::config::{DEFAULT_SCROLL_DISTANCE, DEFAULT_TRIGGER_START, DEFAULT_TWEEN_DURATION};
use crate::data::{PhaseTransition, SectionConfig, Trigger};
use crate::ease::Ease;
use crate::error::ScrollError;
use crate::props::{ElementState, PropertySet, VisualProperty};

/// Public API: parse a stored section (the JSON shape page code writes, see
/// fixtures/sections/*.json) into a validated `SectionConfig`.
///
/// Notes:
/// - `start` is `"top <viewport>"` where viewport is `top`, `center`, `bottom`
///   or a percentage; pinned sections must start at `"top top"`.
/// - `end` is `"+=130%"` (pinned scroll distance) or `"top 55%"` (flowing
///   scrub window). A flowing section without `end` plays as a timed tween.
/// - `scrub` is the catch-up lag in seconds; `true` means lockstep.
/// - Property values are numbers or unit strings (`"-18vw"`, `"6vh"`,
///   `"100%"`), normalized to viewport fractions. `clipPath: "inset(...)"`
///   expands to the four clip properties.
pub fn parse_section_json(s: &str) -> Result<SectionConfig, ScrollError> {
    let raw: StoredSection =
        serde_json::from_str(s).map_err(|e| ScrollError::Parse(format!("section: {e}")))?;
    to_section_config(raw)
}

/// Parse `{ "sections": [...] }` into configs, keeping document order.
pub fn parse_page_json(s: &str) -> Result<Vec<SectionConfig>, ScrollError> {
    let raw: StoredPage =
        serde_json::from_str(s).map_err(|e| ScrollError::Parse(format!("page: {e}")))?;
    raw.sections.into_iter().map(to_section_config).collect()
}

#[derive(Deserialize)]
struct StoredPage {
    sections: Vec<StoredSection>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSection {
    name: String,
    target: String,
    #[serde(default)]
    pin: bool,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    scrub: Option<RawScrub>,
    #[serde(default)]
    duration: Option<f32>,
    #[serde(default)]
    timeline: Vec<StoredTransition>,
    #[serde(default)]
    leave_back: Vec<StoredReset>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScrub {
    Flag(bool),
    Lag(f32),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTargets {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

type RawProps = serde_json::Map<String, serde_json::Value>;

#[derive(Deserialize)]
struct StoredTransition {
    targets: RawTargets,
    #[serde(default)]
    from: Option<RawProps>,
    to: RawProps,
    #[serde(default)]
    ease: Option<String>,
    #[serde(default)]
    at: f32,
    #[serde(default)]
    span: Option<f32>,
    #[serde(default)]
    stagger: f32,
}

#[derive(Deserialize)]
struct StoredReset {
    target: String,
    props: RawProps,
}

fn to_section_config(raw: StoredSection) -> Result<SectionConfig, ScrollError> {
    let section = raw.name.clone();
    let bad_trigger = |reason: String| ScrollError::InvalidTrigger {
        section: section.clone(),
        reason,
    };

    let scrub_lag = match raw.scrub {
        None | Some(RawScrub::Flag(_)) => 0.0,
        Some(RawScrub::Lag(lag)) => lag,
    };

    let (scroll_distance, trigger) = if raw.pin {
        let start = match raw.start.as_deref() {
            None => 0.0,
            Some(s) => parse_position(s).map_err(&bad_trigger)?,
        };
        if start != 0.0 {
            return Err(bad_trigger(format!(
                "pinned sections start at \"top top\", got {:?}",
                raw.start
            )));
        }
        let distance = match raw.end.as_deref() {
            None => DEFAULT_SCROLL_DISTANCE,
            Some(e) => parse_relative_end(e).map_err(&bad_trigger)?,
        };
        (distance, Trigger::default())
    } else {
        let start_at = match raw.start.as_deref() {
            None => DEFAULT_TRIGGER_START,
            Some(s) => parse_position(s).map_err(&bad_trigger)?,
        };
        let trigger = match raw.end.as_deref() {
            Some(e) => Trigger::Scrubbed {
                start_at,
                end_at: parse_position(e).map_err(&bad_trigger)?,
            },
            None => Trigger::Timed {
                start_at,
                duration: raw.duration.unwrap_or(DEFAULT_TWEEN_DURATION),
            },
        };
        (DEFAULT_SCROLL_DISTANCE, trigger)
    };

    let mut phases = Vec::with_capacity(raw.timeline.len());
    for t in raw.timeline {
        let targets = match t.targets {
            RawTargets::One(s) => vec![s],
            RawTargets::Many(v) => v,
        };
        let ease = match t.ease.as_deref() {
            None => Ease::Linear,
            Some(e) => e.parse()?,
        };
        phases.push(PhaseTransition {
            targets,
            from: t.from.as_ref().map(to_property_set).transpose()?,
            to: to_property_set(&t.to)?,
            ease,
            offset: t.at,
            span: t.span,
            stagger: t.stagger,
        });
    }

    let leave_back = raw
        .leave_back
        .iter()
        .map(|r| {
            Ok(ElementState {
                target: r.target.clone(),
                props: to_property_set(&r.props)?,
            })
        })
        .collect::<Result<Vec<_>, ScrollError>>()?;

    let cfg = SectionConfig {
        name: raw.name,
        target: raw.target,
        pinned: raw.pin,
        scroll_distance,
        trigger,
        scrub_lag,
        phases,
        leave_back,
    };
    cfg.validate()?;
    Ok(cfg)
}

/// `"top 80%"` -> 0.8. Only the section's top edge is supported.
fn parse_position(s: &str) -> Result<f32, String> {
    let mut parts = s.split_whitespace();
    let (Some(edge), Some(viewport), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected \"top <viewport>\", got {s:?}"));
    };
    if edge != "top" {
        return Err(format!("only the top edge can trigger, got {s:?}"));
    }
    match viewport {
        "top" => Ok(0.0),
        "center" => Ok(0.5),
        "bottom" => Ok(1.0),
        v => parse_percent(v).ok_or_else(|| format!("bad viewport position in {s:?}")),
    }
}

/// `"+=130%"` -> 1.3.
fn parse_relative_end(s: &str) -> Result<f32, String> {
    s.trim()
        .strip_prefix("+=")
        .and_then(parse_percent)
        .ok_or_else(|| format!("expected \"+=<n>%\", got {s:?}"))
}

fn parse_percent(s: &str) -> Option<f32> {
    s.strip_suffix('%')?.trim().parse::<f32>().ok().map(|v| v / 100.0)
}

/// Number or unit string -> viewport fraction.
fn parse_length(s: &str) -> Option<f32> {
    let s = s.trim();
    for unit in ["vw", "vh", "%"] {
        if let Some(n) = s.strip_suffix(unit) {
            return n.trim().parse::<f32>().ok().map(|v| v / 100.0);
        }
    }
    s.parse::<f32>().ok()
}

/// CSS `inset(t r b l)` with the usual 1-4 value shorthand.
fn parse_inset(s: &str) -> Option<[f32; 4]> {
    let body = s.trim().strip_prefix("inset(")?.strip_suffix(')')?;
    let v: Vec<f32> = body
        .split_whitespace()
        .map(parse_length)
        .collect::<Option<_>>()?;
    match v.as_slice() {
        [a] => Some([*a, *a, *a, *a]),
        [a, b] => Some([*a, *b, *a, *b]),
        [a, b, c] => Some([*a, *b, *c, *b]),
        [a, b, c, d] => Some([*a, *b, *c, *d]),
        _ => None,
    }
}

fn to_property_set(raw: &RawProps) -> Result<PropertySet, ScrollError> {
    let mut set = PropertySet::new();
    for (key, value) in raw {
        let bad = || ScrollError::Parse(format!("property '{key}': unsupported value {value}"));
        let value: RawValue = serde_json::from_value(value.clone()).map_err(|_| bad())?;
        if key == "clipPath" {
            let RawValue::Text(text) = &value else {
                return Err(bad());
            };
            let [t, r, b, l] = parse_inset(text).ok_or_else(bad)?;
            set.set(VisualProperty::ClipTop, t);
            set.set(VisualProperty::ClipRight, r);
            set.set(VisualProperty::ClipBottom, b);
            set.set(VisualProperty::ClipLeft, l);
            continue;
        }
        let prop = VisualProperty::from_name(key)
            .ok_or_else(|| ScrollError::Parse(format!("unknown property '{key}'")))?;
        let v = match value {
            RawValue::Number(n) => n as f32,
            RawValue::Text(text) => parse_length(&text).ok_or_else(bad)?,
        };
        set.set(prop, v);
    }
    Ok(set)
}
