// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Counter animation and case selection for dashboard pages.
//!
//! `pagefx_core` holds the platform-independent half of two small page
//! behaviors. It is `no_std` compatible (with `alloc`) and never touches a
//! document directly: backends hand it element handles through the traits
//! in [`element`] and drive it from their own event sources.
//!
//! # Architecture
//!
//! ```text
//!   Backend (IntersectionObserver)          Backend (click listener)
//!       │                                        │
//!       ▼                                        ▼
//!   VisibilityEntry ──► CounterBoard        CaseSelector::select()
//!                          │    ▲                │
//!                          ▼    │                ▼
//!   CounterDisplay::show()   FrameRequest   CaseButton / VideoSurface
//!                               │
//!   Backend (requestAnimationFrame) ◄──┘
//! ```
//!
//! **[`counter`]**: Target parsing, the fixed-tick [`CounterAnimation`]
//! and the [`CounterBoard`] that tracks each counter from watching through
//! animation to completion.
//!
//! **[`visibility`]**: Visibility entries, the 50% threshold and the
//! intersection-ratio geometry used by simulated observers.
//!
//! **[`selector`]**: [`CaseSelector`]: exclusive button activation that
//! drives a single video surface.
//!
//! **[`element`]**: Traits implemented by DOM wrappers and test fakes.
//!
//! **[`config`]**: [`PageConfig`]: selectors, attribute names and
//! numeric knobs.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with the zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).
//!
//! [`CounterAnimation`]: counter::CounterAnimation
//! [`CounterBoard`]: counter::CounterBoard
//! [`CaseSelector`]: selector::CaseSelector
//! [`PageConfig`]: config::PageConfig

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod counter;
pub mod element;
pub mod selector;
pub mod trace;
pub mod visibility;
