// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end properties of the counter board and case selector, driven
//! through [`SimulatedPage`].

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;
use pagefx_core::counter::{CounterId, CounterState};
use pagefx_core::selector::SelectError;
use pagefx_core::visibility::VisibilityEntry;

use crate::log::LoggedEvent;
use crate::{FakeButton, FakeVideo, Lcg, SimulatedPage};

const ON_SCREEN: Rect = Rect::new(0.0, 100.0, 200.0, 160.0);

const FULLY_VISIBLE: VisibilityEntry = VisibilityEntry {
    is_intersecting: true,
    ratio: 1.0,
};

/// Adds a visible counter, triggers it and runs it to completion.
fn animate(attr: Option<&str>) -> (SimulatedPage, CounterId) {
    let mut page = SimulatedPage::dashboard();
    let id = page.add_counter(attr, ON_SCREEN);
    page.observe();
    page.run_frames(1000);
    (page, id)
}

#[test]
fn bounded_animation_for_many_targets() {
    let mut targets: Vec<i64> = (0..=300).collect();
    targets.extend([997, 1_000, 12_345, 1_000_000, i64::from(u32::MAX)]);

    for target in targets {
        let attr = format!("{target}");
        let (page, id) = animate(Some(&attr));
        let history = page.counter(id).unwrap().history();

        assert_eq!(
            history.last(),
            Some(&target),
            "target {target} ended elsewhere"
        );
        assert!(
            history.windows(2).all(|w| w[0] <= w[1]),
            "target {target} decreased: {history:?}"
        );
        assert!(
            history.iter().all(|&v| (0..=target).contains(&v)),
            "target {target} left [0, target]"
        );
        let expected_ticks = if target == 0 { 1 } else { 60 };
        assert_eq!(history.len(), expected_ticks, "target {target}");
        assert_eq!(page.state(id), Some(CounterState::Finished));
    }
}

#[test]
fn scenario_target_120() {
    let (page, id) = animate(Some("120"));
    let history = page.counter(id).unwrap().history();
    let expected: Vec<i64> = (1..=60).map(|tick| tick * 2).collect();
    assert_eq!(history, expected.as_slice());
    assert_eq!(page.counter(id).unwrap().text(), "120");
    // First tick runs on entry, the other 59 on frames.
    assert_eq!(page.frames_run(), 59);
}

#[test]
fn scenario_target_zero_is_immediate() {
    let mut page = SimulatedPage::dashboard();
    let id = page.add_counter(Some("0"), ON_SCREEN);
    page.observe();
    assert_eq!(page.state(id), Some(CounterState::Finished));
    assert!(page.pending().is_empty());
    assert_eq!(page.counter(id).unwrap().history(), &[0]);
}

#[test]
fn non_numeric_target_freezes_at_zero() {
    for attr in [Some("lots"), Some(""), None] {
        let (page, id) = animate(attr);
        let counter = page.counter(id).unwrap();
        assert_eq!(counter.text(), "0", "attr {attr:?}");
        assert!(counter.history().iter().all(|&v| v == 0), "attr {attr:?}");
        assert_eq!(page.state(id), Some(CounterState::Finished));
    }
}

#[test]
fn later_crossings_change_nothing() {
    let (mut page, id) = animate(Some("45"));
    let settled = page.counter(id).unwrap().clone();

    for _ in 0..5 {
        page.deliver(id, VisibilityEntry::HIDDEN);
        page.deliver(id, FULLY_VISIBLE);
        page.scroll_by(2000.0);
        page.scroll_by(-2000.0);
        page.run_frames(100);
    }

    assert_eq!(page.counter(id).unwrap(), &settled);
    assert!(!page.is_observed(id));
}

#[test]
fn crossing_mid_animation_does_not_restart() {
    let mut page = SimulatedPage::dashboard();
    let id = page.add_counter(Some("600"), ON_SCREEN);
    page.observe();
    page.run_frames(10);
    page.deliver(id, FULLY_VISIBLE);
    page.run_frames(1000);

    let history = page.counter(id).unwrap().history();
    assert_eq!(history.len(), 60);
    assert!(history.windows(2).all(|w| w[0] < w[1]), "{history:?}");
}

#[test]
fn counter_taller_than_two_viewports_never_starts() {
    let mut page = SimulatedPage::dashboard();
    // 1300px tall against a 600px viewport: at most 600/1300 visible.
    let id = page.add_counter(Some("50"), Rect::new(0.0, 0.0, 200.0, 1300.0));
    page.observe();
    for _ in 0..20 {
        page.scroll_by(50.0);
    }
    assert_eq!(page.state(id), Some(CounterState::Watching));
    assert!(page.is_observed(id));
    assert!(page.counter(id).unwrap().history().is_empty());
}

#[test]
fn counters_run_independently() {
    let mut page = SimulatedPage::dashboard();
    let early = page.add_counter(Some("60"), ON_SCREEN);
    let late = page.add_counter(Some("60"), Rect::new(0.0, 900.0, 200.0, 960.0));
    page.observe();
    page.run_frames(20);
    assert_eq!(page.counter(early).unwrap().text(), "21");
    assert_eq!(page.state(late), Some(CounterState::Watching));

    page.scroll_by(400.0);
    page.run_frames(10);
    assert_eq!(page.counter(early).unwrap().text(), "31");
    assert_eq!(page.counter(late).unwrap().text(), "11");

    page.run_frames(1000);
    assert_eq!(page.counter(early).unwrap().history().len(), 60);
    assert_eq!(page.counter(late).unwrap().history().len(), 60);
}

#[test]
fn teardown_cancels_running_and_watching() {
    let mut page = SimulatedPage::dashboard();
    let running = page.add_counter(Some("60"), ON_SCREEN);
    let waiting = page.add_counter(Some("60"), Rect::new(0.0, 900.0, 200.0, 960.0));
    page.observe();
    page.run_frames(4);
    page.teardown();

    assert_eq!(page.state(running), Some(CounterState::Cancelled));
    assert_eq!(page.state(waiting), Some(CounterState::Cancelled));
    assert_eq!(page.counter(running).unwrap().text(), "5");
    assert_eq!(page.run_frames(100), 0);
    assert!(page.log().events().contains(&LoggedEvent::Cancelled(running, 5)));
}

#[test]
fn exclusive_activation_over_random_clicks() {
    let buttons: Vec<FakeButton> = (0..5)
        .map(|i| FakeButton::new(&format!("case-{i}.mp4")))
        .collect();
    let mut page = SimulatedPage::dashboard();
    page.install_cases(buttons, FakeVideo::new("intro.mp4"));

    let mut rng = Lcg::new(0x5eed);
    for click in 1..=200_u32 {
        let index = usize::try_from(rng.below(5)).unwrap();
        let selection = page.click(index).unwrap();

        let cases = page.cases().unwrap();
        let active: Vec<usize> = cases
            .buttons()
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_active())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(active, vec![index], "after click {click}");
        assert_eq!(cases.active(), Some(index));

        let expected = format!("case-{index}.mp4");
        assert_eq!(selection.source, expected);
        assert_eq!(cases.video().src(), expected);
        assert_eq!(cases.video().reloads(), click);
        assert_eq!(cases.video().loaded().last(), Some(&expected));
    }
}

#[test]
fn scenario_three_buttons() {
    let mut page = SimulatedPage::dashboard();
    page.install_cases(
        vec![
            FakeButton::new("a.mp4"),
            FakeButton::new("b.mp4"),
            FakeButton::new("c.mp4"),
        ],
        FakeVideo::new("intro.mp4"),
    );

    page.click(1).unwrap();
    page.click(2).unwrap();

    let cases = page.cases().unwrap();
    let flags: Vec<bool> = cases.buttons().iter().map(FakeButton::is_active).collect();
    assert_eq!(flags, vec![false, false, true]);
    assert_eq!(cases.video().src(), "c.mp4");
    assert_eq!(cases.video().reloads(), 2);
}

#[test]
fn markup_default_survives_until_first_click() {
    let mut page = SimulatedPage::dashboard();
    page.install_cases(
        vec![
            FakeButton::new("a.mp4").preset_active(),
            FakeButton::new("b.mp4"),
        ],
        FakeVideo::new("a.mp4"),
    );

    let cases = page.cases().unwrap();
    assert!(cases.buttons()[0].is_active());
    assert_eq!(cases.video().reloads(), 0);
    assert_eq!(cases.active(), None);

    page.click(1).unwrap();
    let cases = page.cases().unwrap();
    assert!(!cases.buttons()[0].is_active());
    assert!(cases.buttons()[1].is_active());
}

#[test]
fn redundant_click_still_reloads() {
    let mut page = SimulatedPage::dashboard();
    page.install_cases(vec![FakeButton::new("a.mp4")], FakeVideo::new(""));
    page.click(0).unwrap();
    page.click(0).unwrap();
    page.click(0).unwrap();

    let video = page.cases().unwrap().video();
    assert_eq!(video.src(), "a.mp4");
    assert_eq!(video.reloads(), 3);
}

#[test]
fn broken_button_is_logged_and_ignored() {
    let mut page = SimulatedPage::dashboard();
    page.install_cases(
        vec![FakeButton::new("a.mp4"), FakeButton::without_video()],
        FakeVideo::new("intro.mp4"),
    );
    assert_eq!(page.click(1), Err(SelectError::MissingVideoRef(1)));

    let cases = page.cases().unwrap();
    assert_eq!(cases.video().src(), "intro.mp4");
    assert_eq!(cases.video().reloads(), 0);
    assert!(cases.buttons().iter().all(|b| b.toggles() == 0));
    assert_eq!(
        page.log().events().last(),
        Some(&LoggedEvent::Rejected(SelectError::MissingVideoRef(1)))
    );
}

#[test]
fn trace_log_matches_display() {
    let (page, id) = animate(Some("30"));
    let ticks = page.log().ticks_of(id);
    let shown: Vec<i64> = ticks.iter().map(|&(_, v)| v).collect();
    assert_eq!(shown.as_slice(), page.counter(id).unwrap().history());
    assert_eq!(ticks.first(), Some(&(1, 0)));
    assert_eq!(ticks.last(), Some(&(60, 30)));
    assert!(matches!(
        page.log().events().last(),
        Some(LoggedEvent::Finished(_, 60, 30))
    ));
}
