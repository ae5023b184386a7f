// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` task.
//!
//! [`FrameTask`] calls a callback once per animation frame for as long as the
//! callback returns [`FrameRequest::Again`]. Each callback receives the
//! [`DOMHighResTimeStamp`][mdn] of the frame in milliseconds.
//!
//! A task is cancellable: [`cancel`](FrameTask::cancel) revokes the pending
//! frame, and dropping the task does the same and releases its JS closure.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use pagefx_core::counter::FrameRequest;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Global bindings, so a frame never has to fetch the Window object.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// A self-rescheduling `requestAnimationFrame` callback.
///
/// Create with [`FrameTask::new`], then call [`start`](Self::start) to
/// request the first frame.
pub struct FrameTask {
    inner: Rc<TaskInner>,
}

type RafClosure = Closure<dyn FnMut(f64)>;

struct TaskInner {
    /// The JS closure registered with `requestAnimationFrame`.
    ///
    /// Stored in its own `RefCell` so we can set it once in `start()` and
    /// reference it from inside itself without conflicting with `callback`.
    closure: RefCell<Option<RafClosure>>,

    /// The user-supplied per-frame callback.
    callback: RefCell<Box<dyn FnMut(f64) -> FrameRequest>>,

    /// Frames delivered so far.
    frames: Cell<u64>,

    /// Whether a frame is pending.
    running: Cell<bool>,

    /// The ID returned by the most recent `requestAnimationFrame` call.
    raf_id: Cell<i32>,
}

impl FrameTask {
    /// Creates a task that is **not yet running**.
    pub fn new(callback: impl FnMut(f64) -> FrameRequest + 'static) -> Self {
        Self {
            inner: Rc::new(TaskInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                frames: Cell::new(0),
                running: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    /// Requests the first frame.
    ///
    /// If already running, this is a no-op. A task that finished or was
    /// cancelled can be started again.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);

        if self.inner.closure.borrow().is_none() {
            let inner = Rc::downgrade(&self.inner);
            let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
                let Some(inner) = inner.upgrade() else {
                    return;
                };
                if !inner.running.get() {
                    return;
                }
                inner.frames.set(inner.frames.get() + 1);

                // The borrow is scoped so it doesn't overlap with the
                // `closure` RefCell.
                let request = inner.callback.borrow_mut()(timestamp_ms);

                if request == FrameRequest::Done {
                    inner.running.set(false);
                    return;
                }
                if inner.running.get()
                    && let Some(ref closure) = *inner.closure.borrow()
                {
                    let id = request_animation_frame(closure.as_ref().unchecked_ref());
                    inner.raf_id.set(id);
                }
            }) as Box<dyn FnMut(f64)>);
            *self.inner.closure.borrow_mut() = Some(closure);
        }

        if let Some(ref closure) = *self.inner.closure.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.inner.raf_id.set(id);
        }
    }

    /// Cancels the pending frame, if any.
    pub fn cancel(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_animation_frame(self.inner.raf_id.get());
    }

    /// Returns `true` while a frame is pending.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Returns the number of frames delivered.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.inner.frames.get()
    }
}

impl Drop for FrameTask {
    fn drop(&mut self) {
        self.cancel();
        // Drop the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for FrameTask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameTask")
            .field("running", &self.inner.running.get())
            .field("frames", &self.inner.frames.get())
            .finish()
    }
}
