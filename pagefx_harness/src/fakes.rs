// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory element doubles.

use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use pagefx_core::element::{CaseButton, CounterDisplay, VideoSurface};

/// A stat element that records every value it is asked to show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FakeCounter {
    attr: Option<String>,
    text: String,
    history: Vec<i64>,
}

impl FakeCounter {
    /// Creates a counter with the given target attribute and initial text
    /// `"0"`.
    #[must_use]
    pub fn new(attr: Option<&str>) -> Self {
        Self {
            attr: attr.map(str::to_string),
            text: "0".to_string(),
            history: Vec::new(),
        }
    }

    /// Returns the current text content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns every value shown, oldest first.
    #[must_use]
    pub fn history(&self) -> &[i64] {
        &self.history
    }
}

impl CounterDisplay for FakeCounter {
    fn target_attr(&self) -> Option<String> {
        self.attr.clone()
    }

    fn show(&mut self, value: i64) {
        self.text = value.to_string();
        self.history.push(value);
    }
}

/// A case button with an `active` flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FakeButton {
    video: Option<String>,
    active: bool,
    toggles: u32,
}

impl FakeButton {
    /// Creates an inactive button referencing `video`.
    #[must_use]
    pub fn new(video: &str) -> Self {
        Self {
            video: Some(video.to_string()),
            ..Self::default()
        }
    }

    /// Creates a button without a video reference.
    #[must_use]
    pub fn without_video() -> Self {
        Self::default()
    }

    /// Marks the button active as markup would, without counting a toggle.
    #[must_use]
    pub fn preset_active(mut self) -> Self {
        self.active = true;
        self
    }

    /// Returns `true` if the button is marked active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns how many times the marking was written.
    #[must_use]
    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}

impl CaseButton for FakeButton {
    fn video_ref(&self) -> Option<String> {
        self.video.clone()
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
        self.toggles += 1;
    }
}

/// A video element that records source changes and reloads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FakeVideo {
    src: String,
    reloads: u32,
    loaded: Vec<String>,
}

impl FakeVideo {
    /// Creates a video with a markup-provided source.
    #[must_use]
    pub fn new(src: &str) -> Self {
        Self {
            src: src.to_string(),
            ..Self::default()
        }
    }

    /// Returns the current source.
    #[must_use]
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Returns the number of reloads issued.
    #[must_use]
    pub fn reloads(&self) -> u32 {
        self.reloads
    }

    /// Returns the source that was current at each reload.
    #[must_use]
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }
}

impl VideoSurface for FakeVideo {
    fn set_source(&mut self, src: &str) {
        self.src = src.to_string();
    }

    fn reload(&mut self) {
        self.reloads += 1;
        self.loaded.push(self.src.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_tracks_text_and_history() {
        let mut c = FakeCounter::new(Some("9"));
        assert_eq!(c.text(), "0");
        c.show(3);
        c.show(9);
        assert_eq!(c.text(), "9");
        assert_eq!(c.history(), &[3, 9]);
        assert_eq!(c.target_attr().as_deref(), Some("9"));
    }

    #[test]
    fn video_records_loaded_sources() {
        let mut v = FakeVideo::new("intro.mp4");
        v.reload();
        v.set_source("b.mp4");
        v.reload();
        assert_eq!(v.loaded(), &["intro.mp4", "b.mp4"]);
        assert_eq!(v.reloads(), 2);
    }

    #[test]
    fn preset_active_does_not_count_as_toggle() {
        let b = FakeButton::new("a.mp4").preset_active();
        assert!(b.is_active());
        assert_eq!(b.toggles(), 0);
    }
}
