// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON-lines trace sinks for pagefx diagnostics.
//!
//! This crate provides [`TraceSink`](pagefx_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`json::JsonLinesSink`]: one JSON object per line, for piping into
//!   `jq` or log collectors.

pub mod json;
pub mod pretty;
