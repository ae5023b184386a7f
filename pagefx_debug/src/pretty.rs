// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use pagefx_core::trace::{
    CaseRejectedEvent, CaseSelectedEvent, CounterArmedEvent, CounterCancelledEvent,
    CounterFinishedEvent, CounterStartedEvent, CounterTickEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    ticks: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            ticks: true,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            ticks: true,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            ticks: true,
        }
    }

    /// Suppresses per-tick lines; lifecycle events are still written.
    #[must_use]
    pub fn without_ticks(mut self) -> Self {
        self.ticks = false;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_counter_armed(&mut self, e: &CounterArmedEvent) {
        let _ = writeln!(
            self.writer,
            "[armed] counter={} target={}",
            e.counter.index(),
            e.target,
        );
    }

    fn on_counter_started(&mut self, e: &CounterStartedEvent) {
        let _ = writeln!(
            self.writer,
            "[start] counter={} visible={:.0}%",
            e.counter.index(),
            e.ratio * 100.0,
        );
    }

    fn on_counter_tick(&mut self, e: &CounterTickEvent) {
        if !self.ticks {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[tick] counter={} tick={} shown={}",
            e.counter.index(),
            e.tick,
            e.shown,
        );
    }

    fn on_counter_finished(&mut self, e: &CounterFinishedEvent) {
        let _ = writeln!(
            self.writer,
            "[done] counter={} ticks={} shown={}",
            e.counter.index(),
            e.ticks,
            e.shown,
        );
    }

    fn on_counter_cancelled(&mut self, e: &CounterCancelledEvent) {
        let _ = writeln!(
            self.writer,
            "[cancel] counter={} after {} ticks",
            e.counter.index(),
            e.ticks,
        );
    }

    fn on_case_selected(&mut self, e: &CaseSelectedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[case] button={} src={} reloads={}",
            e.button, e.source, e.reloads,
        );
    }

    fn on_case_rejected(&mut self, e: &CaseRejectedEvent) {
        let _ = writeln!(self.writer, "[case:rejected] {}", e.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagefx_core::counter::{CounterId, CounterTarget};
    use pagefx_core::selector::SelectError;

    #[test]
    fn pretty_print_lifecycle() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let counter = CounterId::from_index(2);
        sink.on_counter_armed(&CounterArmedEvent {
            counter,
            target: CounterTarget::Invalid,
        });
        sink.on_counter_started(&CounterStartedEvent {
            counter,
            ratio: 0.5,
        });
        sink.on_counter_finished(&CounterFinishedEvent {
            counter,
            ticks: 1,
            shown: 0,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[armed] counter=2 target=NaN"), "got: {output}");
        assert!(output.contains("visible=50%"), "got: {output}");
        assert!(output.contains("[done] counter=2 ticks=1"), "got: {output}");
    }

    #[test]
    fn ticks_can_be_suppressed() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).without_ticks();
        sink.on_counter_tick(&CounterTickEvent {
            counter: CounterId::from_index(0),
            tick: 1,
            shown: 1,
        });
        sink.on_case_rejected(&CaseRejectedEvent {
            error: SelectError::UnknownButton(4),
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(!output.contains("[tick]"), "got: {output}");
        assert!(
            output.contains("[case:rejected] no case button at index 4"),
            "got: {output}"
        );
    }
}
