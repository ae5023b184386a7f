// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility entries and the trigger threshold.
//!
//! Browsers report visibility through `IntersectionObserver`; the web
//! backend converts each observer entry into a [`VisibilityEntry`].
//! Simulated observers compute the same entries from element and viewport
//! rectangles with [`intersection_ratio`].

use kurbo::Rect;

/// Fraction of an element's area that must be inside the viewport.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct VisibilityThreshold(f64);

impl VisibilityThreshold {
    /// Half of the element visible.
    pub const HALF: Self = Self(0.5);

    /// Any overlap at all.
    pub const ANY: Self = Self(0.0);

    /// Creates a threshold, or `None` if `fraction` is outside `[0, 1]` or
    /// NaN.
    #[must_use]
    pub fn new(fraction: f64) -> Option<Self> {
        (0.0..=1.0).contains(&fraction).then_some(Self(fraction))
    }

    /// Returns the fraction.
    #[inline]
    #[must_use]
    pub const fn fraction(self) -> f64 {
        self.0
    }
}

impl Default for VisibilityThreshold {
    fn default() -> Self {
        Self::HALF
    }
}

/// One visibility observation for one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityEntry {
    /// Whether the element overlaps the viewport at all.
    pub is_intersecting: bool,
    /// Visible fraction of the element's area, `0.0..=1.0`.
    pub ratio: f64,
}

impl VisibilityEntry {
    /// An entry for an element entirely outside the viewport.
    pub const HIDDEN: Self = Self {
        is_intersecting: false,
        ratio: 0.0,
    };

    /// Computes the entry for `element` against `viewport`.
    #[must_use]
    pub fn measure(element: Rect, viewport: Rect) -> Self {
        let is_intersecting = overlaps(element, viewport);
        let ratio = if is_intersecting {
            intersection_ratio(element, viewport)
        } else {
            0.0
        };
        Self {
            is_intersecting,
            ratio,
        }
    }

    /// Returns `true` if this entry should start a counter.
    #[must_use]
    pub fn satisfies(&self, threshold: VisibilityThreshold) -> bool {
        self.is_intersecting && self.ratio >= threshold.0
    }
}

/// Returns the visible fraction of `element` inside `viewport`.
///
/// A zero-area element counts as fully visible when it touches the
/// viewport, as `IntersectionObserver` reports it.
#[must_use]
pub fn intersection_ratio(element: Rect, viewport: Rect) -> f64 {
    let element = element.abs();
    let viewport = viewport.abs();
    let area = element.area();
    if area <= 0.0 {
        return if overlaps(element, viewport) { 1.0 } else { 0.0 };
    }
    let visible = element.intersect(viewport).area();
    (visible / area).clamp(0.0, 1.0)
}

/// Edge-inclusive overlap test.
fn overlaps(a: Rect, b: Rect) -> bool {
    let a = a.abs();
    let b = b.abs();
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}
