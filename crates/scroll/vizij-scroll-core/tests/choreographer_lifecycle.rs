use approx::assert_relative_eq;
use vizij_scroll_core::{
    Choreographer, ElementState, Phase, PhaseTransition, PropertySet, ScrollError, ScrollEvent,
    ScrollFrame, SectionConfig, SectionGeometry, Trigger, VisualProperty,
};

const VH: f32 = 1000.0;

fn frame(offset: f32) -> ScrollFrame {
    ScrollFrame {
        scroll_offset: offset,
        viewport_height: VH,
        max_scroll: 9000.0,
    }
}

fn at(top: f32) -> impl FnMut(&str) -> Option<SectionGeometry> {
    move |_: &str| Some(SectionGeometry { top, height: VH })
}

fn opacity(v: f32) -> PropertySet {
    PropertySet::new().with(VisualProperty::Opacity, v)
}

fn fading_hero() -> SectionConfig {
    SectionConfig::pinned("hero", "hero")
        .with_phase(PhaseTransition::from_to("headline", opacity(0.0), opacity(1.0), 0.0))
        .with_phase(PhaseTransition::from_to("headline", opacity(1.0), opacity(0.0), 0.7))
}

#[test]
fn invalid_sections_are_rejected_and_not_registered() {
    let mut ch = Choreographer::default();
    let bad = SectionConfig::pinned("hero", "hero")
        .with_phase(PhaseTransition::from_to("h", opacity(0.0), opacity(1.0), 1.5));
    let err = ch.register(bad, &mut at(0.0)).unwrap_err();
    assert!(matches!(err, ScrollError::InvalidOffset { .. }));
    assert!(ch.is_empty());
}

#[test]
fn pin_and_phase_events_follow_the_scroll() {
    let mut ch = Choreographer::default();
    let id = ch.register(fading_hero(), &mut at(1000.0)).unwrap();

    let out = ch.update(0.016, frame(0.0));
    assert!(out.events.contains(&ScrollEvent::PhaseChanged {
        section: id,
        from: None,
        to: Phase::Entrance,
    }));
    assert!(!ch.is_pinned(id));

    let out = ch.update(0.016, frame(1650.0));
    assert!(out.events.contains(&ScrollEvent::Pinned {
        section: id,
        target: "hero".into(),
    }));
    assert!(out.events.contains(&ScrollEvent::PhaseChanged {
        section: id,
        from: Some(Phase::Entrance),
        to: Phase::Settle,
    }));

    let out = ch.update(0.016, frame(2300.0));
    assert!(out.events.contains(&ScrollEvent::Unpinned {
        section: id,
        target: "hero".into(),
    }));
    assert_eq!(ch.phase(id), Some(Phase::Exit));
}

#[test]
fn unregister_mid_animation_stops_all_changes() {
    let mut ch = Choreographer::default();
    let id = ch.register(fading_hero(), &mut at(0.0)).unwrap();
    assert!(ch.update(0.016, frame(200.0)).changes_for(id).count() > 0);
    assert!(ch.is_pinned(id));

    assert!(ch.unregister(id));
    let out = ch.update(0.016, frame(400.0));
    assert_eq!(out.changes_for(id).count(), 0);
    assert_eq!(
        out.events,
        vec![ScrollEvent::SectionReleased {
            section: id,
            target: "hero".into(),
            was_pinned: true,
        }]
    );

    assert!(!ch.unregister(id));
    assert!(ch.update(0.016, frame(600.0)).is_empty());
    assert_eq!(ch.progress(id), None);
}

#[test]
fn unregister_all_releases_in_mount_order() {
    let mut ch = Choreographer::default();
    let a = ch.register(fading_hero(), &mut at(0.0)).unwrap();
    let b = ch
        .register(SectionConfig::pinned("feature", "feature"), &mut at(2300.0))
        .unwrap();
    assert_eq!(ch.unregister_all(), 2);
    assert_eq!(ch.unregister_all(), 0);
    let released: Vec<_> = ch
        .update(0.016, frame(0.0))
        .events
        .iter()
        .map(ScrollEvent::section)
        .collect();
    assert_eq!(released, vec![a, b]);
}

#[test]
fn deferred_sections_wait_for_refresh() {
    let mut ch = Choreographer::default();
    let mut unmeasured = |_: &str| {
        Some(SectionGeometry {
            top: 0.0,
            height: 0.0,
        })
    };
    let id = ch.register(fading_hero(), &mut unmeasured).unwrap();
    assert!(ch.is_deferred(id));

    let out = ch.update(0.016, frame(300.0));
    assert_eq!(out.events, vec![ScrollEvent::SectionDeferred { section: id }]);
    assert!(out.changes.is_empty());

    ch.refresh(&mut at(0.0));
    assert!(!ch.is_deferred(id));
    let out = ch.update(0.016, frame(300.0));
    assert!(out
        .events
        .contains(&ScrollEvent::SectionActivated { section: id }));
    assert!(out.changes_for(id).count() > 0);
}

#[test]
fn zero_viewport_does_no_work() {
    let mut ch = Choreographer::default();
    let id = ch.register(fading_hero(), &mut at(0.0)).unwrap();
    let out = ch.update(
        0.016,
        ScrollFrame {
            scroll_offset: 100.0,
            viewport_height: 0.0,
            max_scroll: 0.0,
        },
    );
    assert!(out.is_empty());
    assert_eq!(ch.progress(id), Some(0.0));
}

#[test]
fn leave_back_reapplies_reset_values() {
    let mut ch = Choreographer::default();
    let mut hero = fading_hero();
    hero.leave_back = vec![ElementState {
        target: "headline".into(),
        props: opacity(1.0),
    }];
    let id = ch.register(hero, &mut at(1000.0)).unwrap();

    ch.update(0.016, frame(2200.0));
    let out = ch.update(0.016, frame(900.0));
    assert!(out.events.contains(&ScrollEvent::LeftBack { section: id }));
    let last = out.changes_for(id).last().expect("reset change");
    assert_eq!(last.target, "headline");
    assert_eq!(last.props.get(VisualProperty::Opacity), Some(1.0));

    // Already above the start: no second reset.
    let out = ch.update(0.016, frame(800.0));
    assert!(!out.events.contains(&ScrollEvent::LeftBack { section: id }));
}

#[test]
fn timed_sections_play_once_on_the_clock() {
    let mut ch = Choreographer::default();
    let cfg = SectionConfig::flowing(
        "contact",
        "contact",
        Trigger::Timed {
            start_at: 0.8,
            duration: 0.6,
        },
    )
    .with_phase(PhaseTransition::from_to("form", opacity(0.0), opacity(1.0), 0.0));
    // Trigger offset: 2000 - 0.8 * 1000 = 1200.
    let id = ch.register(cfg, &mut at(2000.0)).unwrap();

    ch.update(0.016, frame(1000.0));
    assert_eq!(ch.progress(id), Some(0.0));

    let out = ch.update(0.016, frame(1300.0));
    assert!(out
        .events
        .contains(&ScrollEvent::TriggerEntered { section: id }));
    assert_eq!(ch.progress(id), Some(0.0));

    ch.update(0.3, frame(1300.0));
    assert_relative_eq!(ch.progress(id).unwrap(), 0.5, epsilon = 1e-5);

    let out = ch.update(0.3, frame(1300.0));
    assert!(out
        .events
        .contains(&ScrollEvent::TweenCompleted { section: id }));
    assert_relative_eq!(ch.progress(id).unwrap(), 1.0, epsilon = 1e-6);

    // Scrolling back up does not replay.
    ch.update(0.016, frame(0.0));
    let out = ch.update(0.016, frame(1300.0));
    assert!(!out
        .events
        .contains(&ScrollEvent::TriggerEntered { section: id }));
    assert_relative_eq!(ch.progress(id).unwrap(), 1.0, epsilon = 1e-6);
}

#[test]
fn scrub_lag_converges_on_scroll_progress() {
    let mut ch = Choreographer::default();
    let mut cfg = fading_hero();
    cfg.scrub_lag = 0.5;
    let id = ch.register(cfg, &mut at(0.0)).unwrap();

    // First render lands directly on the scroll position.
    ch.update(0.016, frame(650.0));
    assert_relative_eq!(ch.progress(id).unwrap(), 0.5, epsilon = 1e-6);

    ch.update(0.1, frame(0.0));
    assert_relative_eq!(ch.progress(id).unwrap(), 0.4, epsilon = 1e-6);

    let mut last = ch.progress(id).unwrap();
    for _ in 0..200 {
        ch.update(0.1, frame(0.0));
        let p = ch.progress(id).unwrap();
        assert!(p <= last);
        last = p;
    }
    assert_eq!(last, 0.0);
}

#[test]
fn lockstep_progress_is_a_function_of_offset() {
    let mut ch = Choreographer::default();
    let id = ch.register(fading_hero(), &mut at(0.0)).unwrap();
    for offset in [0.0, 325.0, 975.0, 1300.0, 5000.0, 650.0] {
        ch.update(0.016, frame(offset));
        let expected = (offset / 1300.0).clamp(0.0, 1.0);
        assert_relative_eq!(ch.progress(id).unwrap(), expected, epsilon = 1e-6);
    }
}
