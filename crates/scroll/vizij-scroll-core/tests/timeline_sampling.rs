use approx::assert_relative_eq;
use vizij_scroll_core::{
    Ease, PhaseTransition, PropertySet, SpanPolicy, Timeline,
    VisualProperty::{self, Opacity, Scale, X, Y},
};

fn set(pairs: &[(VisualProperty, f32)]) -> PropertySet {
    pairs.iter().copied().collect()
}

fn feature_timeline() -> Timeline {
    let phases = vec![
        PhaseTransition::from_to(
            "image",
            set(&[(X, 0.55), (Scale, 0.92), (Opacity, 0.0)]),
            set(&[(X, 0.0), (Scale, 1.0), (Opacity, 1.0)]),
            0.0,
        ),
        PhaseTransition::from_to(
            "image",
            set(&[(X, 0.0), (Y, 0.0), (Scale, 1.0), (Opacity, 1.0)]),
            set(&[(X, -0.18), (Y, 0.06), (Scale, 0.96), (Opacity, 0.2)]),
            0.7,
        )
        .with_ease(Ease::power_in(2))
        .with_span(0.25),
        PhaseTransition::to("image", set(&[(Opacity, 0.0)]), 0.95).with_ease(Ease::power_in(2)),
    ];
    Timeline::compile(&phases, SpanPolicy::Banded)
}

#[test]
fn settle_band_holds_entrance_end_values() {
    let tl = feature_timeline();
    for p in [0.3, 0.45, 0.6, 0.69] {
        assert_relative_eq!(tl.value_at("image", X, p).unwrap(), 0.0);
        assert_relative_eq!(tl.value_at("image", Scale, p).unwrap(), 1.0);
        assert_relative_eq!(tl.value_at("image", Opacity, p).unwrap(), 1.0);
    }
}

#[test]
fn entrance_interpolates_linearly_within_its_band() {
    let tl = feature_timeline();
    assert_relative_eq!(tl.value_at("image", X, 0.0).unwrap(), 0.55);
    assert_relative_eq!(tl.value_at("image", X, 0.15).unwrap(), 0.275, epsilon = 1e-6);
    assert_relative_eq!(tl.value_at("image", Opacity, 0.15).unwrap(), 0.5, epsilon = 1e-6);
}

#[test]
fn exit_reaches_its_targets() {
    let tl = feature_timeline();
    assert_relative_eq!(tl.value_at("image", X, 0.95).unwrap(), -0.18, epsilon = 1e-6);
    assert_relative_eq!(tl.value_at("image", Y, 1.0).unwrap(), 0.06, epsilon = 1e-6);
    // power2.in starts slow.
    let early = tl.value_at("image", Scale, 0.75).unwrap();
    assert!(early > 0.99 && early < 1.0);
}

#[test]
fn to_tween_starts_from_the_value_the_timeline_holds() {
    let tl = feature_timeline();
    assert_relative_eq!(tl.value_at("image", Opacity, 0.95).unwrap(), 0.2, epsilon = 1e-6);
    assert_relative_eq!(tl.value_at("image", Opacity, 1.0).unwrap(), 0.0, epsilon = 1e-6);
}

#[test]
fn to_tween_without_history_starts_from_neutral() {
    let tl = Timeline::compile(
        &[PhaseTransition::to("cta", set(&[(Opacity, 0.0)]), 0.7)],
        SpanPolicy::Banded,
    );
    assert_eq!(tl.value_at("cta", Opacity, 0.0), Some(1.0));
    assert_relative_eq!(tl.value_at("cta", Opacity, 0.85).unwrap(), 0.5, epsilon = 1e-6);
}

#[test]
fn stagger_expands_per_target() {
    let mut t = PhaseTransition::from_to(
        "bottle-left",
        set(&[(Opacity, 1.0)]),
        set(&[(Opacity, 0.0)]),
        0.7,
    );
    t.targets = vec!["bottle-left".into(), "bottle-center".into(), "bottle-right".into()];
    t.stagger = 0.02;
    let tl = Timeline::compile(&[t], SpanPolicy::Banded);
    assert_eq!(tl.targets().len(), 3);
    assert_eq!(tl.len(), 3);

    let p = 0.71;
    assert!(tl.value_at("bottle-left", Opacity, p).unwrap() < 1.0);
    assert_eq!(tl.value_at("bottle-center", Opacity, p), Some(1.0));
    assert_eq!(tl.value_at("bottle-right", Opacity, p), Some(1.0));
    for target in ["bottle-left", "bottle-center", "bottle-right"] {
        assert_relative_eq!(tl.value_at(target, Opacity, 1.0).unwrap(), 0.0);
    }
}

#[test]
fn flowing_sections_span_to_the_end_by_default() {
    let t = PhaseTransition::from_to("form", set(&[(Y, 0.03)]), set(&[(Y, 0.0)]), 0.2);
    let tl = Timeline::compile(&[t], SpanPolicy::ToEnd);
    assert_relative_eq!(tl.value_at("form", Y, 0.6).unwrap(), 0.015, epsilon = 1e-6);
}

#[test]
fn sample_reports_every_driven_target() {
    let tl = feature_timeline();
    let states = tl.sample(0.5);
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].target, "image");
    assert_eq!(states[0].props.len(), 4);
    assert_eq!(states[0].props.get(Y), Some(0.0));
    assert!(tl.value_at("missing", X, 0.5).is_none());
}
