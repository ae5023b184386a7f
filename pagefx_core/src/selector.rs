// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exclusive case selection driving one video surface.
//!
//! Selecting a button clears the active marking from the whole group, marks
//! the chosen button, points the video at the button's reference and
//! reloads it. Re-selecting the active button repeats every step, reload
//! included.
//!
//! Markup defaults are never read: a button that arrives with an `active`
//! class keeps it until the first selection, and [`CaseSelector::active`]
//! reports `None` until then.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::element::{CaseButton, VideoSurface};
use crate::trace::{CaseRejectedEvent, CaseSelectedEvent, Tracer};

/// Errors from [`CaseSelector::select`].
///
/// A rejected selection leaves every button and the video untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectError {
    /// No button at this index.
    UnknownButton(usize),
    /// The button has no video reference.
    MissingVideoRef(usize),
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownButton(idx) => write!(f, "no case button at index {idx}"),
            Self::MissingVideoRef(idx) => {
                write!(f, "case button {idx} has no video reference")
            }
        }
    }
}

impl core::error::Error for SelectError {}

/// A successful selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Index of the now-active button.
    pub button: usize,
    /// Source set on the video.
    pub source: String,
    /// Total reloads issued so far, including this one.
    pub reloads: u64,
}

/// A group of mutually exclusive buttons and the video they drive.
pub struct CaseSelector<B, V> {
    buttons: Vec<B>,
    video: V,
    active: Option<usize>,
    reloads: u64,
}

impl<B, V> fmt::Debug for CaseSelector<B, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseSelector")
            .field("buttons", &self.buttons.len())
            .field("active", &self.active)
            .field("reloads", &self.reloads)
            .finish_non_exhaustive()
    }
}

impl<B: CaseButton, V: VideoSurface> CaseSelector<B, V> {
    /// Wraps a button group and its video. Nothing is modified.
    #[must_use]
    pub fn new(buttons: Vec<B>, video: V) -> Self {
        Self {
            buttons,
            video,
            active: None,
            reloads: 0,
        }
    }

    /// Makes `index` the sole active button and loads its video.
    pub fn select(
        &mut self,
        index: usize,
        tracer: &mut Tracer<'_>,
    ) -> Result<Selection, SelectError> {
        let source = match self.buttons.get(index) {
            None => Err(SelectError::UnknownButton(index)),
            Some(button) => button
                .video_ref()
                .ok_or(SelectError::MissingVideoRef(index)),
        };
        let source = match source {
            Ok(source) => source,
            Err(error) => {
                tracer.case_rejected(&CaseRejectedEvent { error });
                return Err(error);
            }
        };

        for button in &mut self.buttons {
            button.set_active(false);
        }
        self.buttons[index].set_active(true);
        self.active = Some(index);

        self.video.set_source(&source);
        self.video.reload();
        self.reloads += 1;

        tracer.case_selected(&CaseSelectedEvent {
            button: index,
            source: &source,
            reloads: self.reloads,
        });
        Ok(Selection {
            button: index,
            source,
            reloads: self.reloads,
        })
    }
}

impl<B, V> CaseSelector<B, V> {
    /// Returns the button activated by the last successful selection.
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Returns the number of reloads issued.
    #[must_use]
    pub fn reloads(&self) -> u64 {
        self.reloads
    }

    /// Returns the button group.
    #[must_use]
    pub fn buttons(&self) -> &[B] {
        &self.buttons
    }

    /// Returns the video surface.
    #[must_use]
    pub fn video(&self) -> &V {
        &self.video
    }

    /// Returns the number of buttons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Returns `true` if the group has no buttons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}
