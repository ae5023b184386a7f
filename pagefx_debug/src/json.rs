// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines trace output.
//!
//! [`JsonLinesSink`] writes each event as a single-line JSON object with an
//! `"event"` tag, e.g.
//!
//! ```text
//! {"event":"counter_tick","counter":0,"tick":3,"shown":6}
//! ```

use std::io::Write;

use serde_json::{Value, json};

use pagefx_core::counter::CounterTarget;
use pagefx_core::selector::SelectError;
use pagefx_core::trace::{
    CaseRejectedEvent, CaseSelectedEvent, CounterArmedEvent, CounterCancelledEvent,
    CounterFinishedEvent, CounterStartedEvent, CounterTickEvent, TraceSink,
};

/// Writes one JSON object per event to a [`Write`](std::io::Write)
/// destination.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Returns the number of lines written successfully.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, value: &Value) {
        if serde_json::to_writer(&mut self.writer, value).is_ok()
            && self.writer.write_all(b"\n").is_ok()
        {
            self.written += 1;
        }
    }
}

fn target_json(target: CounterTarget) -> Value {
    match target {
        CounterTarget::Value(v) => json!(v),
        CounterTarget::Invalid => Value::Null,
    }
}

fn error_kind(error: SelectError) -> (&'static str, usize) {
    match error {
        SelectError::UnknownButton(idx) => ("unknown_button", idx),
        SelectError::MissingVideoRef(idx) => ("missing_video_ref", idx),
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_counter_armed(&mut self, e: &CounterArmedEvent) {
        self.emit(&json!({
            "event": "counter_armed",
            "counter": e.counter.index(),
            "target": target_json(e.target),
        }));
    }

    fn on_counter_started(&mut self, e: &CounterStartedEvent) {
        self.emit(&json!({
            "event": "counter_started",
            "counter": e.counter.index(),
            "ratio": e.ratio,
        }));
    }

    fn on_counter_tick(&mut self, e: &CounterTickEvent) {
        self.emit(&json!({
            "event": "counter_tick",
            "counter": e.counter.index(),
            "tick": e.tick,
            "shown": e.shown,
        }));
    }

    fn on_counter_finished(&mut self, e: &CounterFinishedEvent) {
        self.emit(&json!({
            "event": "counter_finished",
            "counter": e.counter.index(),
            "ticks": e.ticks,
            "shown": e.shown,
        }));
    }

    fn on_counter_cancelled(&mut self, e: &CounterCancelledEvent) {
        self.emit(&json!({
            "event": "counter_cancelled",
            "counter": e.counter.index(),
            "ticks": e.ticks,
        }));
    }

    fn on_case_selected(&mut self, e: &CaseSelectedEvent<'_>) {
        self.emit(&json!({
            "event": "case_selected",
            "button": e.button,
            "source": e.source,
            "reloads": e.reloads,
        }));
    }

    fn on_case_rejected(&mut self, e: &CaseRejectedEvent) {
        let (kind, button) = error_kind(e.error);
        self.emit(&json!({
            "event": "case_rejected",
            "kind": kind,
            "button": button,
            "message": e.error.to_string(),
        }));
    }
}
