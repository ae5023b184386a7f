// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Counter targets, the fixed-tick animation and the counter board.
//!
//! A counter goes through three stages:
//!
//! 1. **Watching**: registered with [`CounterBoard::push`]; the backend
//!    observes its visibility and forwards every entry to
//!    [`CounterBoard::on_visibility`].
//! 2. **Animating**: the first entry that satisfies the threshold starts a
//!    [`CounterAnimation`]. Its first tick runs inside `on_visibility`; the
//!    backend then calls [`CounterBoard::on_frame`] once per animation frame
//!    until it returns [`FrameRequest::Done`].
//! 3. **Finished**: the display shows the exact target and the counter
//!    ignores everything from then on.
//!
//! [`CounterBoard::cancel`] moves a watching or animating counter to a
//! terminal cancelled state for teardown.
//!
//! # Accumulator
//!
//! Each tick conceptually adds `target / ticks_per_run` to an accumulator
//! and shows its floor while it is below the target. The accumulator is kept
//! as the exact rational `target * tick / ticks_per_run`, so a positive
//! target finishes on exactly tick `ticks_per_run` regardless of
//! floating-point drift.

use alloc::vec::Vec;
use core::fmt;

use crate::config::PageConfig;
use crate::element::CounterDisplay;
use crate::trace::{
    CounterArmedEvent, CounterCancelledEvent, CounterFinishedEvent, CounterStartedEvent,
    CounterTickEvent, Tracer,
};
use crate::visibility::{VisibilityEntry, VisibilityThreshold};

// ---------------------------------------------------------------------------
// CounterTarget
// ---------------------------------------------------------------------------

/// A counter's parsed target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CounterTarget {
    /// A base-10 integer.
    Value(i64),
    /// The attribute was missing or had no leading digits.
    Invalid,
}

impl CounterTarget {
    /// Parses a target with `parseInt`-style prefix rules.
    ///
    /// Leading whitespace is skipped and an optional sign accepted; the
    /// longest run of ASCII digits that follows is the value, so `"12px"`
    /// is 12 and `"3.7"` is 3. Out-of-range values saturate.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let rest = raw.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        let (negative, digits) = match rest.as_bytes().first() {
            Some(b'-') => (true, &rest[1..]),
            Some(b'+') => (false, &rest[1..]),
            _ => (false, rest),
        };

        let mut any = false;
        let mut magnitude: i64 = 0;
        for b in digits.bytes().take_while(u8::is_ascii_digit) {
            any = true;
            let digit = i64::from(b - b'0');
            magnitude = magnitude.saturating_mul(10).saturating_add(digit);
        }

        if !any {
            return Self::Invalid;
        }
        Self::Value(if negative { -magnitude } else { magnitude })
    }

    /// Parses an optional attribute value; a missing attribute is invalid.
    #[must_use]
    pub fn from_attr(raw: Option<&str>) -> Self {
        raw.map_or(Self::Invalid, Self::parse)
    }

    /// Returns the integer target, if valid.
    #[must_use]
    pub const fn value(self) -> Option<i64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Invalid => None,
        }
    }
}

impl fmt::Display for CounterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Invalid => f.write_str("NaN"),
        }
    }
}

// ---------------------------------------------------------------------------
// CounterAnimation
// ---------------------------------------------------------------------------

/// The result of one animation tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterFrame {
    /// Value to display.
    pub shown: i64,
    /// Whether this tick completed the run.
    pub finished: bool,
}

/// Per-counter animation state, advanced once per tick.
///
/// An invalid target finishes on the first tick showing 0. A negative
/// target already satisfies `accumulator >= target` on the first tick, so
/// it jumps straight to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterAnimation {
    target: CounterTarget,
    ticks_per_run: u32,
    ticks: u32,
    finished: bool,
}

impl CounterAnimation {
    /// Creates an animation that has not ticked yet.
    ///
    /// `ticks_per_run` of zero is treated as one.
    #[must_use]
    pub const fn new(target: CounterTarget, ticks_per_run: u32) -> Self {
        Self {
            target,
            ticks_per_run: if ticks_per_run == 0 { 1 } else { ticks_per_run },
            ticks: 0,
            finished: false,
        }
    }

    /// Returns the target.
    #[must_use]
    pub const fn target(&self) -> CounterTarget {
        self.target
    }

    /// Returns the number of ticks run so far.
    #[must_use]
    pub const fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Returns `true` once the display has reached its final value.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances one tick.
    ///
    /// Calling `tick` after the run finished returns the final frame again
    /// without counting another tick.
    pub fn tick(&mut self) -> CounterFrame {
        let Some(target) = self.target.value() else {
            if !self.finished {
                self.ticks += 1;
                self.finished = true;
            }
            return CounterFrame {
                shown: 0,
                finished: true,
            };
        };

        if self.finished {
            return CounterFrame {
                shown: target,
                finished: true,
            };
        }

        self.ticks = self.ticks.saturating_add(1);
        let run = i128::from(self.ticks_per_run);
        let scaled = i128::from(target) * i128::from(self.ticks);
        let goal = i128::from(target) * run;

        // accumulator < target  <=>  target * tick < target * ticks_per_run
        if scaled < goal {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "floor(target * tick / run) lies between 0 and target"
            )]
            let shown = scaled.div_euclid(run) as i64;
            CounterFrame {
                shown,
                finished: false,
            }
        } else {
            self.finished = true;
            CounterFrame {
                shown: target,
                finished: true,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CounterBoard
// ---------------------------------------------------------------------------

/// Handle to a counter registered with a [`CounterBoard`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CounterId(u32);

impl CounterId {
    /// Creates a handle from a raw slot index.
    #[inline]
    #[must_use]
    pub const fn from_index(idx: u32) -> Self {
        Self(idx)
    }

    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for CounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CounterId({})", self.0)
    }
}

/// Lifecycle stage of one counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CounterState {
    /// Waiting for a qualifying visibility entry.
    Watching,
    /// Ticking toward its target.
    Animating,
    /// Showing its final value.
    Finished,
    /// Stopped by [`CounterBoard::cancel`].
    Cancelled,
}

/// Whether the backend should schedule another animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameRequest {
    /// Call [`CounterBoard::on_frame`] again on the next frame.
    Again,
    /// The counter needs no more frames.
    Done,
}

/// Outcome of forwarding a visibility entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Nothing happened; keep observing (or the counter is past watching).
    Ignored,
    /// The animation started and its first tick ran. The backend should stop
    /// observing the element and honor `next`.
    Started {
        /// Whether a frame is needed for the second tick.
        next: FrameRequest,
    },
}

impl Trigger {
    /// Returns `true` if the backend should stop observing the element.
    #[must_use]
    pub const fn unobserve(self) -> bool {
        matches!(self, Self::Started { .. })
    }
}

#[derive(Debug)]
enum Phase {
    Watching,
    Animating(CounterAnimation),
    Finished,
    Cancelled,
}

struct Slot<C> {
    display: C,
    target: CounterTarget,
    phase: Phase,
}

/// Owns every counter on a page and their lifecycle.
pub struct CounterBoard<C> {
    slots: Vec<Slot<C>>,
    threshold: VisibilityThreshold,
    ticks_per_run: u32,
}

impl<C> fmt::Debug for CounterBoard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterBoard")
            .field("counters", &self.slots.len())
            .field("threshold", &self.threshold)
            .field("ticks_per_run", &self.ticks_per_run)
            .finish()
    }
}

impl<C: CounterDisplay> CounterBoard<C> {
    /// Creates an empty board using the threshold and tick count from
    /// `config`.
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self::with_settings(config.threshold, config.ticks_per_run)
    }

    /// Creates an empty board with explicit settings.
    #[must_use]
    pub fn with_settings(threshold: VisibilityThreshold, ticks_per_run: u32) -> Self {
        Self {
            slots: Vec::new(),
            threshold,
            ticks_per_run,
        }
    }

    /// Registers a counter, parsing its target attribute once.
    pub fn push(&mut self, display: C, tracer: &mut Tracer<'_>) -> CounterId {
        let target = CounterTarget::from_attr(display.target_attr().as_deref());
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a page never holds 2^32 counters"
        )]
        let id = CounterId(self.slots.len() as u32);
        self.slots.push(Slot {
            display,
            target,
            phase: Phase::Watching,
        });
        tracer.counter_armed(&CounterArmedEvent {
            counter: id,
            target,
        });
        id
    }

    /// Forwards a visibility entry for `id`.
    ///
    /// Only the first entry that satisfies the threshold while the counter
    /// is watching has an effect; it starts the animation and runs the first
    /// tick immediately.
    ///
    /// Being intersecting is not enough: the visible ratio must reach the
    /// threshold. With the default of one half, an element taller than twice
    /// the viewport can never qualify and stays at its initial text.
    pub fn on_visibility(
        &mut self,
        id: CounterId,
        entry: VisibilityEntry,
        tracer: &mut Tracer<'_>,
    ) -> Trigger {
        let threshold = self.threshold;
        let ticks_per_run = self.ticks_per_run;
        let Some(slot) = self.slot_mut(id) else {
            return Trigger::Ignored;
        };
        if !matches!(slot.phase, Phase::Watching) || !entry.satisfies(threshold) {
            return Trigger::Ignored;
        }

        slot.phase = Phase::Animating(CounterAnimation::new(slot.target, ticks_per_run));
        tracer.counter_started(&CounterStartedEvent {
            counter: id,
            ratio: entry.ratio,
        });
        let next = self.on_frame(id, tracer);
        Trigger::Started { next }
    }

    /// Runs one tick for `id`.
    pub fn on_frame(&mut self, id: CounterId, tracer: &mut Tracer<'_>) -> FrameRequest {
        let Some(slot) = self.slot_mut(id) else {
            return FrameRequest::Done;
        };
        let Phase::Animating(anim) = &mut slot.phase else {
            return FrameRequest::Done;
        };

        let frame = anim.tick();
        let ticks = anim.ticks();
        slot.display.show(frame.shown);
        tracer.counter_tick(&CounterTickEvent {
            counter: id,
            tick: ticks,
            shown: frame.shown,
        });

        if frame.finished {
            slot.phase = Phase::Finished;
            tracer.counter_finished(&CounterFinishedEvent {
                counter: id,
                ticks,
                shown: frame.shown,
            });
            FrameRequest::Done
        } else {
            FrameRequest::Again
        }
    }

    /// Cancels a watching or animating counter.
    ///
    /// Returns `false` if the counter was unknown or already terminal. The
    /// display keeps whatever it last showed.
    pub fn cancel(&mut self, id: CounterId, tracer: &mut Tracer<'_>) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        let ticks = match &slot.phase {
            Phase::Watching => 0,
            Phase::Animating(anim) => anim.ticks(),
            Phase::Finished | Phase::Cancelled => return false,
        };
        slot.phase = Phase::Cancelled;
        tracer.counter_cancelled(&CounterCancelledEvent { counter: id, ticks });
        true
    }

    /// Cancels every counter that has not finished.
    pub fn cancel_all(&mut self, tracer: &mut Tracer<'_>) {
        for id in self.ids() {
            self.cancel(id, tracer);
        }
    }
}

impl<C> CounterBoard<C> {
    /// Returns the lifecycle stage of `id`.
    #[must_use]
    pub fn state(&self, id: CounterId) -> Option<CounterState> {
        self.slots.get(id.0 as usize).map(|slot| match slot.phase {
            Phase::Watching => CounterState::Watching,
            Phase::Animating(_) => CounterState::Animating,
            Phase::Finished => CounterState::Finished,
            Phase::Cancelled => CounterState::Cancelled,
        })
    }

    /// Returns the parsed target of `id`.
    #[must_use]
    pub fn target(&self, id: CounterId) -> Option<CounterTarget> {
        self.slots.get(id.0 as usize).map(|slot| slot.target)
    }

    /// Returns the display handle of `id`.
    #[must_use]
    pub fn display(&self, id: CounterId) -> Option<&C> {
        self.slots.get(id.0 as usize).map(|slot| &slot.display)
    }

    /// Returns all registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = CounterId> + use<C> {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a page never holds 2^32 counters"
        )]
        let len = self.slots.len() as u32;
        (0..len).map(CounterId)
    }

    /// Returns the number of registered counters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no counters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot_mut(&mut self, id: CounterId) -> Option<&mut Slot<C>> {
        self.slots.get_mut(id.0 as usize)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString as _};
    use alloc::vec;

    struct Stat {
        attr: Option<String>,
        shown: Vec<i64>,
    }

    impl Stat {
        fn new(attr: &str) -> Self {
            Self {
                attr: Some(attr.to_string()),
                shown: Vec::new(),
            }
        }
    }

    impl CounterDisplay for Stat {
        fn target_attr(&self) -> Option<String> {
            self.attr.clone()
        }

        fn show(&mut self, value: i64) {
            self.shown.push(value);
        }
    }

    const VISIBLE: VisibilityEntry = VisibilityEntry {
        is_intersecting: true,
        ratio: 1.0,
    };

    fn run(target: CounterTarget) -> Vec<CounterFrame> {
        let mut anim = CounterAnimation::new(target, 60);
        let mut frames = Vec::new();
        loop {
            let frame = anim.tick();
            frames.push(frame);
            if frame.finished {
                return frames;
            }
            assert!(frames.len() <= 1000, "animation never finished");
        }
    }

    #[test]
    fn parse_follows_parse_int_prefix_rules() {
        assert_eq!(CounterTarget::parse("120"), CounterTarget::Value(120));
        assert_eq!(CounterTarget::parse("  42"), CounterTarget::Value(42));
        assert_eq!(CounterTarget::parse("12px"), CounterTarget::Value(12));
        assert_eq!(CounterTarget::parse("3.7"), CounterTarget::Value(3));
        assert_eq!(CounterTarget::parse("+8"), CounterTarget::Value(8));
        assert_eq!(CounterTarget::parse("-15"), CounterTarget::Value(-15));
        assert_eq!(CounterTarget::parse("abc"), CounterTarget::Invalid);
        assert_eq!(CounterTarget::parse(""), CounterTarget::Invalid);
        assert_eq!(CounterTarget::parse("-"), CounterTarget::Invalid);
        assert_eq!(CounterTarget::from_attr(None), CounterTarget::Invalid);
    }

    #[test]
    fn parse_saturates_huge_values() {
        assert_eq!(
            CounterTarget::parse("99999999999999999999999"),
            CounterTarget::Value(i64::MAX)
        );
    }

    #[test]
    fn target_120_takes_sixty_ticks() {
        let frames = run(CounterTarget::Value(120));
        assert_eq!(frames.len(), 60);
        assert_eq!(frames[0].shown, 2);
        assert_eq!(frames[58].shown, 118);
        assert_eq!(
            frames[59],
            CounterFrame {
                shown: 120,
                finished: true
            }
        );
    }

    #[test]
    fn non_multiple_target_still_takes_sixty_ticks() {
        let frames = run(CounterTarget::Value(100));
        assert_eq!(frames.len(), 60);
        // floor(100 / 60) and floor(100 * 59 / 60)
        assert_eq!(frames[0].shown, 1);
        assert_eq!(frames[58].shown, 98);
        assert_eq!(frames[59].shown, 100);
    }

    #[test]
    fn small_target_repeats_values() {
        let frames = run(CounterTarget::Value(3));
        assert_eq!(frames.len(), 60);
        assert_eq!(frames[0].shown, 0);
        assert_eq!(frames[19].shown, 1);
        assert_eq!(frames[59].shown, 3);
    }

    #[test]
    fn zero_target_finishes_immediately() {
        let frames = run(CounterTarget::Value(0));
        assert_eq!(
            frames,
            vec![CounterFrame {
                shown: 0,
                finished: true
            }]
        );
    }

    #[test]
    fn negative_target_jumps_on_first_tick() {
        let frames = run(CounterTarget::Value(-30));
        assert_eq!(
            frames,
            vec![CounterFrame {
                shown: -30,
                finished: true
            }]
        );
    }

    #[test]
    fn invalid_target_stays_at_zero() {
        let frames = run(CounterTarget::Invalid);
        assert_eq!(
            frames,
            vec![CounterFrame {
                shown: 0,
                finished: true
            }]
        );
    }

    #[test]
    fn tick_after_finish_is_stable() {
        let mut anim = CounterAnimation::new(CounterTarget::Value(5), 1);
        assert!(anim.tick().finished);
        assert_eq!(anim.tick().shown, 5);
        assert_eq!(anim.ticks(), 1);
    }

    #[test]
    fn zero_ticks_per_run_is_one() {
        let mut anim = CounterAnimation::new(CounterTarget::Value(7), 0);
        assert_eq!(
            anim.tick(),
            CounterFrame {
                shown: 7,
                finished: true
            }
        );
    }

    #[test]
    fn board_ignores_below_threshold() {
        let mut board = CounterBoard::new(&PageConfig::dashboard());
        let id = board.push(Stat::new("10"), &mut Tracer::none());
        let entry = VisibilityEntry {
            is_intersecting: true,
            ratio: 0.2,
        };
        assert_eq!(
            board.on_visibility(id, entry, &mut Tracer::none()),
            Trigger::Ignored
        );
        assert_eq!(board.state(id), Some(CounterState::Watching));
        assert!(board.display(id).unwrap().shown.is_empty());
    }

    #[test]
    fn board_runs_first_tick_on_trigger() {
        let mut board = CounterBoard::new(&PageConfig::dashboard());
        let id = board.push(Stat::new("120"), &mut Tracer::none());
        let trigger = board.on_visibility(id, VISIBLE, &mut Tracer::none());
        assert!(trigger.unobserve());
        assert_eq!(
            trigger,
            Trigger::Started {
                next: FrameRequest::Again
            }
        );
        assert_eq!(board.display(id).unwrap().shown, &[2]);
        assert_eq!(board.state(id), Some(CounterState::Animating));
    }

    #[test]
    fn board_triggers_only_once() {
        let mut board = CounterBoard::new(&PageConfig::dashboard());
        let id = board.push(Stat::new("0"), &mut Tracer::none());
        assert_eq!(
            board.on_visibility(id, VISIBLE, &mut Tracer::none()),
            Trigger::Started {
                next: FrameRequest::Done
            }
        );
        assert_eq!(board.state(id), Some(CounterState::Finished));
        assert_eq!(
            board.on_visibility(id, VISIBLE, &mut Tracer::none()),
            Trigger::Ignored
        );
        assert_eq!(board.on_frame(id, &mut Tracer::none()), FrameRequest::Done);
        assert_eq!(board.display(id).unwrap().shown, &[0]);
    }

    #[test]
    fn cancel_stops_an_animating_counter() {
        let mut board = CounterBoard::new(&PageConfig::dashboard());
        let id = board.push(Stat::new("60"), &mut Tracer::none());
        board.on_visibility(id, VISIBLE, &mut Tracer::none());
        assert_eq!(board.on_frame(id, &mut Tracer::none()), FrameRequest::Again);
        assert!(board.cancel(id, &mut Tracer::none()));
        assert_eq!(board.state(id), Some(CounterState::Cancelled));
        assert_eq!(board.on_frame(id, &mut Tracer::none()), FrameRequest::Done);
        assert_eq!(board.display(id).unwrap().shown, &[1, 2]);
        assert!(!board.cancel(id, &mut Tracer::none()));
    }

    #[test]
    fn cancel_all_skips_finished() {
        let mut board = CounterBoard::new(&PageConfig::dashboard());
        let done = board.push(Stat::new("0"), &mut Tracer::none());
        let waiting = board.push(Stat::new("5"), &mut Tracer::none());
        board.on_visibility(done, VISIBLE, &mut Tracer::none());
        board.cancel_all(&mut Tracer::none());
        assert_eq!(board.state(done), Some(CounterState::Finished));
        assert_eq!(board.state(waiting), Some(CounterState::Cancelled));
    }

    #[test]
    fn unknown_id_is_harmless() {
        let mut board: CounterBoard<Stat> = CounterBoard::new(&PageConfig::dashboard());
        let ghost = CounterId::from_index(4);
        assert_eq!(
            board.on_visibility(ghost, VISIBLE, &mut Tracer::none()),
            Trigger::Ignored
        );
        assert_eq!(board.on_frame(ghost, &mut Tracer::none()), FrameRequest::Done);
        assert!(!board.cancel(ghost, &mut Tracer::none()));
        assert_eq!(board.state(ghost), None);
    }

    #[test]
    fn target_display_formats_invalid_as_nan() {
        assert_eq!(CounterTarget::Value(12).to_string(), "12");
        assert_eq!(CounterTarget::Invalid.to_string(), "NaN");
    }
}
