// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for pagefx.
//!
//! This crate binds the `pagefx_core` state machines to browser APIs:
//!
//! - [`CounterAnimator`]: `IntersectionObserver` triggers, one
//!   [`FrameTask`] per running counter
//! - [`CaseSwitcher`]: click listeners on the case buttons
//! - [`ConsoleSink`]: trace events on the browser console
//! - [`Page`]: both behaviors installed on one document
//!
//! With the `autostart` feature the wasm start function installs
//! [`PageConfig::dashboard`] once the DOM is ready.

#![no_std]

extern crate alloc;

mod cases;
mod console;
mod counters;
mod raf;

pub use cases::{CaseSwitcher, DomCaseButton, DomVideo};
pub use console::ConsoleSink;
pub use counters::{CounterAnimator, DomCounter};
pub use pagefx_core::config::PageConfig;
pub use raf::FrameTask;

use alloc::boxed::Box;

use pagefx_core::trace::TraceSink;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, EventTarget};

/// Both page behaviors, installed on one document.
///
/// Dropping the page disconnects the observer, cancels running counters
/// and removes the click listeners.
#[derive(Debug)]
pub struct Page {
    counters: CounterAnimator,
    cases: Option<CaseSwitcher>,
}

impl Page {
    /// Installs both behaviors, tracing to the browser console.
    ///
    /// A missing video element disables the case buttons with a console
    /// warning; the counters are installed regardless.
    ///
    /// # Errors
    ///
    /// Returns the DOM exception raised while querying or wiring elements.
    pub fn install(document: &Document, config: &PageConfig) -> Result<Self, JsValue> {
        Self::install_with_sinks(
            document,
            config,
            Box::new(ConsoleSink::new()),
            Box::new(ConsoleSink::new()),
        )
    }

    /// Installs both behaviors with a trace sink for each.
    ///
    /// # Errors
    ///
    /// Returns the DOM exception raised while querying or wiring elements.
    pub fn install_with_sinks(
        document: &Document,
        config: &PageConfig,
        counter_sink: Box<dyn TraceSink>,
        case_sink: Box<dyn TraceSink>,
    ) -> Result<Self, JsValue> {
        let counters = CounterAnimator::install(document, config, counter_sink)?;
        let cases = CaseSwitcher::install(document, config, case_sink)?;
        if cases.is_none() {
            web_sys::console::warn_1(&JsValue::from_str(&alloc::format!(
                "pagefx: no <video id=\"{}\">, case buttons disabled",
                config.video_element_id
            )));
        }
        Ok(Self { counters, cases })
    }

    /// Returns the counter animator.
    #[must_use]
    pub fn counters(&self) -> &CounterAnimator {
        &self.counters
    }

    /// Returns the case switcher, if the page has its video.
    #[must_use]
    pub fn cases(&self) -> Option<&CaseSwitcher> {
        self.cases.as_ref()
    }

    /// Removes both behaviors from the document.
    pub fn teardown(self) {
        drop(self);
    }
}

/// Runs `f` once the document has been parsed.
///
/// If parsing already finished, `f` runs before this returns; otherwise it
/// runs on `DOMContentLoaded`.
///
/// # Errors
///
/// Returns the DOM exception if the listener cannot be attached.
pub fn when_dom_ready(document: &Document, f: impl FnOnce() + 'static) -> Result<(), JsValue> {
    on_ready(document, &document.ready_state(), f)
}

fn on_ready(
    target: &EventTarget,
    ready_state: &str,
    f: impl FnOnce() + 'static,
) -> Result<(), JsValue> {
    if ready_state != "loading" {
        f();
        return Ok(());
    }
    // Freed by wasm-bindgen after its single call; `once` unregisters it.
    let callback = Closure::once_into_js(f);
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        "DOMContentLoaded",
        callback.unchecked_ref(),
        &options,
    )
}

/// Wasm entry point: installs the dashboard behaviors on the current page.
///
/// # Errors
///
/// Returns an error if there is no document to install into.
#[cfg(feature = "autostart")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("pagefx: no document"))?;
    let target = document.clone();
    when_dom_ready(&document, move || {
        match Page::install(&target, &PageConfig::dashboard()) {
            // The behaviors live as long as the page.
            Ok(page) => core::mem::forget(page),
            Err(err) => {
                web_sys::console::error_2(&JsValue::from_str("pagefx: install failed"), &err);
            }
        }
    })
}
