// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simulated page: viewport, intersection observer and frame queue.
//!
//! [`SimulatedPage`] drives a [`CounterBoard`] the way the web backend
//! does, replacing browser scheduling with explicit calls:
//!
//! - [`scroll_to`](SimulatedPage::scroll_to) moves the viewport and runs one
//!   observer pass. An element is notified on its first pass and afterwards
//!   only when its threshold side or intersecting state changes, matching
//!   `IntersectionObserver`.
//! - [`step_frame`](SimulatedPage::step_frame) runs one animation frame:
//!   every counter that asked for a frame ticks once, and any that ask again
//!   wait for the next step.
//!
//! Case buttons go through [`click`](SimulatedPage::click), which mirrors
//! the click listener installed by the web backend.

use alloc::vec::Vec;
use core::mem;

use kurbo::Rect;
use pagefx_core::config::PageConfig;
use pagefx_core::counter::{CounterBoard, CounterId, CounterState, FrameRequest, Trigger};
use pagefx_core::selector::{CaseSelector, SelectError, Selection};
use pagefx_core::trace::Tracer;
use pagefx_core::visibility::{VisibilityEntry, VisibilityThreshold};

use crate::fakes::{FakeButton, FakeCounter, FakeVideo};
use crate::log::EventLog;

/// What the observer last reported for one element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Reported {
    is_intersecting: bool,
    above_threshold: bool,
}

#[derive(Clone, Copy, Debug)]
struct Watched {
    rect: Rect,
    /// `None` while observed but never reported; the first pass always
    /// notifies.
    last: Option<Reported>,
    observed: bool,
}

/// A page with a viewport, counters and an optional case group.
#[derive(Debug)]
pub struct SimulatedPage {
    config: PageConfig,
    viewport: Rect,
    board: CounterBoard<FakeCounter>,
    watched: Vec<Watched>,
    pending: Vec<CounterId>,
    frames_run: u64,
    cases: Option<CaseSelector<FakeButton, FakeVideo>>,
    log: EventLog,
}

impl SimulatedPage {
    /// Creates an empty page with the given viewport.
    #[must_use]
    pub fn new(config: PageConfig, viewport: Rect) -> Self {
        Self {
            config,
            viewport,
            board: CounterBoard::new(&config),
            watched: Vec::new(),
            pending: Vec::new(),
            frames_run: 0,
            cases: None,
            log: EventLog::new(),
        }
    }

    /// A dashboard page with an 800x600 viewport at the top of the document.
    #[must_use]
    pub fn dashboard() -> Self {
        Self::new(PageConfig::dashboard(), Rect::new(0.0, 0.0, 800.0, 600.0))
    }

    // -- counters ----------------------------------------------------------

    /// Adds a counter laid out at `rect` and starts observing it.
    ///
    /// Nothing is delivered until the next observer pass.
    pub fn add_counter(&mut self, attr: Option<&str>, rect: Rect) -> CounterId {
        let mut tracer = Tracer::new(&mut self.log);
        let id = self.board.push(FakeCounter::new(attr), &mut tracer);
        self.watched.push(Watched {
            rect,
            last: None,
            observed: true,
        });
        id
    }

    /// Moves a counter's layout box. Takes effect on the next observer pass.
    pub fn move_counter(&mut self, id: CounterId, rect: Rect) {
        if let Some(w) = self.watched.get_mut(id.index() as usize) {
            w.rect = rect;
        }
    }

    /// Moves the viewport and runs an observer pass.
    ///
    /// Returns the number of entries delivered.
    pub fn scroll_to(&mut self, viewport: Rect) -> usize {
        self.viewport = viewport;
        self.observe()
    }

    /// Scrolls vertically by `dy` and runs an observer pass.
    pub fn scroll_by(&mut self, dy: f64) -> usize {
        let viewport = self.viewport + kurbo::Vec2::new(0.0, dy);
        self.scroll_to(viewport)
    }

    /// Runs one observer pass at the current viewport.
    ///
    /// Returns the number of entries delivered.
    pub fn observe(&mut self) -> usize {
        let threshold = self.config.threshold;
        let mut delivered = 0;
        for idx in 0..self.watched.len() {
            let w = self.watched[idx];
            if !w.observed {
                continue;
            }
            let entry = VisibilityEntry::measure(w.rect, self.viewport);
            let now = reported(entry, threshold);
            if w.last == Some(now) {
                continue;
            }
            self.watched[idx].last = Some(now);
            delivered += 1;

            #[expect(
                clippy::cast_possible_truncation,
                reason = "watched and board slots share indices below u32::MAX"
            )]
            let id = CounterId::from_index(idx as u32);
            self.deliver(id, entry);
        }
        delivered
    }

    /// Delivers `entry` for `id` directly, as if the observer had fired.
    ///
    /// Unlike [`observe`](Self::observe) this ignores whether the element is
    /// still observed, so tests can replay crossings after the first.
    pub fn deliver(&mut self, id: CounterId, entry: VisibilityEntry) {
        let mut tracer = Tracer::new(&mut self.log);
        let trigger = self.board.on_visibility(id, entry, &mut tracer);
        if trigger.unobserve()
            && let Some(w) = self.watched.get_mut(id.index() as usize)
        {
            w.observed = false;
        }
        if trigger
            == (Trigger::Started {
                next: FrameRequest::Again,
            })
        {
            self.pending.push(id);
        }
    }

    /// Runs one animation frame.
    ///
    /// Returns the number of counters that ticked.
    pub fn step_frame(&mut self) -> usize {
        let due = mem::take(&mut self.pending);
        if due.is_empty() {
            return 0;
        }
        self.frames_run += 1;
        let mut tracer = Tracer::new(&mut self.log);
        for &id in &due {
            if self.board.on_frame(id, &mut tracer) == FrameRequest::Again {
                self.pending.push(id);
            }
        }
        due.len()
    }

    /// Steps frames until no counter needs one, or `max_frames` is reached.
    ///
    /// Returns the number of frames stepped.
    pub fn run_frames(&mut self, max_frames: u32) -> u32 {
        let mut stepped = 0;
        while stepped < max_frames && self.step_frame() > 0 {
            stepped += 1;
        }
        stepped
    }

    /// Cancels one counter: it stops ticking and stops being observed.
    pub fn cancel(&mut self, id: CounterId) -> bool {
        let mut tracer = Tracer::new(&mut self.log);
        let cancelled = self.board.cancel(id, &mut tracer);
        self.pending.retain(|&p| p != id);
        if let Some(w) = self.watched.get_mut(id.index() as usize) {
            w.observed = false;
        }
        cancelled
    }

    /// Tears the page down, cancelling every unfinished counter.
    pub fn teardown(&mut self) {
        let mut tracer = Tracer::new(&mut self.log);
        self.board.cancel_all(&mut tracer);
        self.pending.clear();
        for w in &mut self.watched {
            w.observed = false;
        }
    }

    /// Returns the counter element for `id`.
    #[must_use]
    pub fn counter(&self, id: CounterId) -> Option<&FakeCounter> {
        self.board.display(id)
    }

    /// Returns the lifecycle stage of `id`.
    #[must_use]
    pub fn state(&self, id: CounterId) -> Option<CounterState> {
        self.board.state(id)
    }

    /// Returns `true` while the element is still observed.
    #[must_use]
    pub fn is_observed(&self, id: CounterId) -> bool {
        self.watched
            .get(id.index() as usize)
            .is_some_and(|w| w.observed)
    }

    /// Returns the counters waiting for the next frame.
    #[must_use]
    pub fn pending(&self) -> &[CounterId] {
        &self.pending
    }

    /// Returns the number of frames that ticked at least one counter.
    #[must_use]
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    // -- cases -------------------------------------------------------------

    /// Installs a case button group and its video.
    pub fn install_cases(&mut self, buttons: Vec<FakeButton>, video: FakeVideo) {
        self.cases = Some(CaseSelector::new(buttons, video));
    }

    /// Clicks the case button at `index`.
    pub fn click(&mut self, index: usize) -> Result<Selection, SelectError> {
        let mut tracer = Tracer::new(&mut self.log);
        match &mut self.cases {
            Some(cases) => cases.select(index, &mut tracer),
            None => Err(SelectError::UnknownButton(index)),
        }
    }

    /// Returns the installed case group.
    #[must_use]
    pub fn cases(&self) -> Option<&CaseSelector<FakeButton, FakeVideo>> {
        self.cases.as_ref()
    }

    // -- diagnostics -------------------------------------------------------

    /// Returns the trace events recorded so far.
    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }
}

fn reported(entry: VisibilityEntry, threshold: VisibilityThreshold) -> Reported {
    Reported {
        is_intersecting: entry.is_intersecting,
        above_threshold: entry.is_intersecting && entry.ratio >= threshold.fraction(),
    }
}
