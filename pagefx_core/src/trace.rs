// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for page behaviors.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! counter board and case selector call as they change the page. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::counter::{CounterId, CounterTarget};
use crate::selector::SelectError;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a counter is registered and starts being watched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterArmedEvent {
    /// Which counter.
    pub counter: CounterId,
    /// Parsed target.
    pub target: CounterTarget,
}

/// Emitted when a visibility entry starts a counter's animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterStartedEvent {
    /// Which counter.
    pub counter: CounterId,
    /// Visible fraction that triggered the start.
    pub ratio: f64,
}

/// Emitted after every animation tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterTickEvent {
    /// Which counter.
    pub counter: CounterId,
    /// One-based tick number.
    pub tick: u32,
    /// Value written to the display.
    pub shown: i64,
}

/// Emitted when a counter's animation reaches its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterFinishedEvent {
    /// Which counter.
    pub counter: CounterId,
    /// Total ticks the run took.
    pub ticks: u32,
    /// Final displayed value.
    pub shown: i64,
}

/// Emitted when a counter is cancelled before finishing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterCancelledEvent {
    /// Which counter.
    pub counter: CounterId,
    /// Ticks completed before cancellation.
    pub ticks: u32,
}

/// Emitted when a case button becomes active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaseSelectedEvent<'a> {
    /// Index of the button in its group.
    pub button: usize,
    /// Source now set on the video surface.
    pub source: &'a str,
    /// Total reloads issued so far, including this one.
    pub reloads: u64,
}

/// Emitted when a click could not be honored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaseRejectedEvent {
    /// Why the selection was rejected.
    pub error: SelectError,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from page behaviors.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a counter is registered.
    fn on_counter_armed(&mut self, e: &CounterArmedEvent) {
        _ = e;
    }

    /// Called when a counter starts animating.
    fn on_counter_started(&mut self, e: &CounterStartedEvent) {
        _ = e;
    }

    /// Called after each animation tick.
    fn on_counter_tick(&mut self, e: &CounterTickEvent) {
        _ = e;
    }

    /// Called when a counter reaches its target.
    fn on_counter_finished(&mut self, e: &CounterFinishedEvent) {
        _ = e;
    }

    /// Called when a running or watching counter is cancelled.
    fn on_counter_cancelled(&mut self, e: &CounterCancelledEvent) {
        _ = e;
    }

    /// Called when a case button is selected.
    fn on_case_selected(&mut self, e: &CaseSelectedEvent<'_>) {
        _ = e;
    }

    /// Called when a case selection is rejected.
    fn on_case_rejected(&mut self, e: &CaseRejectedEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Expands to one `Tracer` method that forwards to a `TraceSink` method.
macro_rules! forward {
    ($(#[$meta:meta])* $name:ident => $sink_method:ident($ty:ty)) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(&mut self, e: &$ty) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$sink_method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`CounterArmedEvent`].
        counter_armed => on_counter_armed(CounterArmedEvent)
    );
    forward!(
        /// Emits a [`CounterStartedEvent`].
        counter_started => on_counter_started(CounterStartedEvent)
    );
    forward!(
        /// Emits a [`CounterTickEvent`].
        counter_tick => on_counter_tick(CounterTickEvent)
    );
    forward!(
        /// Emits a [`CounterFinishedEvent`].
        counter_finished => on_counter_finished(CounterFinishedEvent)
    );
    forward!(
        /// Emits a [`CounterCancelledEvent`].
        counter_cancelled => on_counter_cancelled(CounterCancelledEvent)
    );
    forward!(
        /// Emits a [`CaseSelectedEvent`].
        case_selected => on_case_selected(CaseSelectedEvent<'_>)
    );
    forward!(
        /// Emits a [`CaseRejectedEvent`].
        case_rejected => on_case_rejected(CaseRejectedEvent)
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
