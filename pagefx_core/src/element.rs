// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element contract for backend integrations.
//!
//! The core never queries a document. Backends find the elements, wrap
//! them in types implementing these traits and pass them in at
//! initialization:
//!
//! - **[`CounterDisplay`]**: a numeric stat whose text is animated.
//! - **[`CaseButton`]**: one button of the exclusive case group.
//! - **[`VideoSurface`]**: the single video element the group drives.
//!
//! DOM wrappers live in `pagefx_web`; in-memory fakes live in
//! `pagefx_harness`.

use alloc::string::String;

/// A node that shows an animated integer.
pub trait CounterDisplay {
    /// Returns the raw target attribute, or `None` if the element has none.
    fn target_attr(&self) -> Option<String>;

    /// Replaces the visible text with `value`.
    fn show(&mut self, value: i64);
}

/// A selectable button carrying a video reference.
pub trait CaseButton {
    /// Returns the video URL this button selects, if the attribute exists.
    fn video_ref(&self) -> Option<String>;

    /// Adds or removes the active marking.
    fn set_active(&mut self, active: bool);
}

/// The video element swapped by the case selector.
pub trait VideoSurface {
    /// Sets the source URL.
    fn set_source(&mut self, src: &str);

    /// Asks the element to reload its current source.
    fn reload(&mut self);
}
