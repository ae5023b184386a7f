// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page configuration.

use crate::visibility::VisibilityThreshold;

/// Selectors, attribute names and numeric knobs for one page.
///
/// Backends read every DOM name from here instead of hard-coding them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageConfig {
    /// Selector matching the animated counters.
    pub counter_selector: &'static str,
    /// Attribute holding a counter's base-10 target.
    pub target_attribute: &'static str,
    /// Visible fraction that starts a counter.
    pub threshold: VisibilityThreshold,
    /// Number of ticks a positive target takes to complete.
    pub ticks_per_run: u32,
    /// Selector matching the case buttons.
    pub case_button_selector: &'static str,
    /// Attribute holding a case button's video URL.
    pub video_attribute: &'static str,
    /// Class toggled on the active case button.
    pub active_class: &'static str,
    /// Element id of the demo video.
    pub video_element_id: &'static str,
}

impl PageConfig {
    /// Configuration for the dashboard landing page.
    #[must_use]
    pub const fn dashboard() -> Self {
        Self {
            counter_selector: ".stat-value[data-target]",
            target_attribute: "data-target",
            threshold: VisibilityThreshold::HALF,
            ticks_per_run: 60,
            case_button_selector: ".case-btn",
            video_attribute: "data-video",
            active_class: "active",
            video_element_id: "demoVideo",
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::dashboard()
    }
}
