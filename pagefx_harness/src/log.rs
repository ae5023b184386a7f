// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A trace sink that keeps every event for later assertions.

use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use pagefx_core::counter::{CounterId, CounterTarget};
use pagefx_core::selector::SelectError;
use pagefx_core::trace::{
    CaseRejectedEvent, CaseSelectedEvent, CounterArmedEvent, CounterCancelledEvent,
    CounterFinishedEvent, CounterStartedEvent, CounterTickEvent, TraceSink,
};

/// Owned copy of one trace event.
#[derive(Clone, Debug, PartialEq)]
pub enum LoggedEvent {
    /// See [`CounterArmedEvent`].
    Armed(CounterId, CounterTarget),
    /// See [`CounterStartedEvent`].
    Started(CounterId, f64),
    /// See [`CounterTickEvent`].
    Tick(CounterId, u32, i64),
    /// See [`CounterFinishedEvent`].
    Finished(CounterId, u32, i64),
    /// See [`CounterCancelledEvent`].
    Cancelled(CounterId, u32),
    /// See [`CaseSelectedEvent`].
    Selected(usize, String),
    /// See [`CaseRejectedEvent`].
    Rejected(SelectError),
}

/// Collects events in arrival order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<LoggedEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Returns the ticks logged for `counter`, as `(tick, shown)` pairs.
    #[must_use]
    pub fn ticks_of(&self, counter: CounterId) -> Vec<(u32, i64)> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                LoggedEvent::Tick(id, tick, shown) if id == counter => Some((tick, shown)),
                _ => None,
            })
            .collect()
    }

    /// Drops every recorded event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for EventLog {
    fn on_counter_armed(&mut self, e: &CounterArmedEvent) {
        self.events.push(LoggedEvent::Armed(e.counter, e.target));
    }

    fn on_counter_started(&mut self, e: &CounterStartedEvent) {
        self.events.push(LoggedEvent::Started(e.counter, e.ratio));
    }

    fn on_counter_tick(&mut self, e: &CounterTickEvent) {
        self.events.push(LoggedEvent::Tick(e.counter, e.tick, e.shown));
    }

    fn on_counter_finished(&mut self, e: &CounterFinishedEvent) {
        self.events.push(LoggedEvent::Finished(e.counter, e.ticks, e.shown));
    }

    fn on_counter_cancelled(&mut self, e: &CounterCancelledEvent) {
        self.events.push(LoggedEvent::Cancelled(e.counter, e.ticks));
    }

    fn on_case_selected(&mut self, e: &CaseSelectedEvent<'_>) {
        self.events.push(LoggedEvent::Selected(e.button, e.source.to_string()));
    }

    fn on_case_rejected(&mut self, e: &CaseRejectedEvent) {
        self.events.push(LoggedEvent::Rejected(e.error));
    }
}
