// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fake elements and a simulated page for exercising `pagefx_core` without
//! a browser.
//!
//! - [`fakes`]: in-memory counters, case buttons and a video that record
//!   every mutation.
//! - [`page`]: [`SimulatedPage`], a viewport plus an observer that follows
//!   `IntersectionObserver` notification rules and a manual frame queue
//!   standing in for `requestAnimationFrame`.
//! - [`log`]: [`EventLog`], a trace sink that keeps events for assertions.

#![no_std]

extern crate alloc;

pub mod fakes;
pub mod log;
pub mod page;

#[cfg(test)]
mod properties;

pub use fakes::{FakeButton, FakeCounter, FakeVideo};
pub use log::{EventLog, LoggedEvent};
pub use page::SimulatedPage;

/// Small deterministic generator for randomized scenarios.
#[derive(Clone, Copy, Debug)]
pub struct Lcg(u64);

impl Lcg {
    /// Creates a generator from a seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the next value in `0..bound` (`bound` of zero yields zero).
    pub fn below(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        if bound == 0 { 0 } else { (self.0 >> 33) % bound }
    }
}
