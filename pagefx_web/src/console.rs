// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace output.

use alloc::format;

use pagefx_core::trace::{
    CaseRejectedEvent, CaseSelectedEvent, CounterArmedEvent, CounterCancelledEvent,
    CounterFinishedEvent, CounterStartedEvent, CounterTickEvent, TraceSink,
};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Writes trace events to the browser console.
///
/// Lifecycle events go to `console.debug`, rejected clicks to
/// `console.warn`. Per-tick lines are off unless enabled with
/// [`with_ticks`](Self::with_ticks).
///
/// Events only reach the sink when `pagefx_core` is built with its `trace`
/// feature (the `console-trace` feature of this crate).
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    ticks: bool,
}

impl ConsoleSink {
    /// Creates a sink that skips per-tick lines.
    #[must_use]
    pub const fn new() -> Self {
        Self { ticks: false }
    }

    /// Also logs every tick.
    #[must_use]
    pub const fn with_ticks(mut self) -> Self {
        self.ticks = true;
        self
    }
}

fn debug(line: &str) {
    console::debug_1(&JsValue::from_str(line));
}

impl TraceSink for ConsoleSink {
    fn on_counter_armed(&mut self, e: &CounterArmedEvent) {
        debug(&format!(
            "pagefx: counter {} armed, target {}",
            e.counter.index(),
            e.target
        ));
    }

    fn on_counter_started(&mut self, e: &CounterStartedEvent) {
        debug(&format!(
            "pagefx: counter {} started at {:.0}% visible",
            e.counter.index(),
            e.ratio * 100.0
        ));
    }

    fn on_counter_tick(&mut self, e: &CounterTickEvent) {
        if self.ticks {
            debug(&format!(
                "pagefx: counter {} tick {} shows {}",
                e.counter.index(),
                e.tick,
                e.shown
            ));
        }
    }

    fn on_counter_finished(&mut self, e: &CounterFinishedEvent) {
        debug(&format!(
            "pagefx: counter {} finished at {} after {} ticks",
            e.counter.index(),
            e.shown,
            e.ticks
        ));
    }

    fn on_counter_cancelled(&mut self, e: &CounterCancelledEvent) {
        debug(&format!(
            "pagefx: counter {} cancelled after {} ticks",
            e.counter.index(),
            e.ticks
        ));
    }

    fn on_case_selected(&mut self, e: &CaseSelectedEvent<'_>) {
        debug(&format!(
            "pagefx: case {} selected, loading {}",
            e.button, e.source
        ));
    }

    fn on_case_rejected(&mut self, e: &CaseRejectedEvent) {
        console::warn_1(&JsValue::from_str(&format!("pagefx: {}", e.error)));
    }
}
