// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Counter wiring.
//!
//! One `IntersectionObserver` watches every counter element. Entries are
//! mapped back to their [`CounterId`] and forwarded to the
//! [`CounterBoard`]; a counter that starts is unobserved and gets its own
//! [`FrameTask`] for the remaining ticks.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;
use core::cell::RefCell;

use js_sys::Array;
use pagefx_core::config::PageConfig;
use pagefx_core::counter::{
    CounterBoard, CounterId, CounterState, CounterTarget, FrameRequest, Trigger,
};
use pagefx_core::element::CounterDisplay;
use pagefx_core::trace::{TraceSink, Tracer};
use pagefx_core::visibility::VisibilityEntry;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::raf::FrameTask;

/// A counter element: reads its target attribute and shows values as text.
pub struct DomCounter {
    element: Element,
    target_attribute: &'static str,
}

impl core::fmt::Debug for DomCounter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomCounter")
            .field("element", &"Element")
            .field("target_attribute", &self.target_attribute)
            .finish()
    }
}

impl DomCounter {
    /// Wraps `element`, reading its target from `target_attribute`.
    #[must_use]
    pub fn new(element: Element, target_attribute: &'static str) -> Self {
        Self {
            element,
            target_attribute,
        }
    }

    /// Returns the wrapped element.
    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl CounterDisplay for DomCounter {
    fn target_attr(&self) -> Option<String> {
        self.element.get_attribute(self.target_attribute)
    }

    fn show(&mut self, value: i64) {
        self.element.set_text_content(Some(&value.to_string()));
    }
}

type IntersectClosure = Closure<dyn FnMut(Array, IntersectionObserver)>;

struct Shared {
    board: CounterBoard<DomCounter>,
    elements: Vec<(CounterId, Element)>,
    tasks: Vec<(CounterId, FrameTask)>,
    sink: Box<dyn TraceSink>,
}

/// Animates every counter on a page the first time it is half visible.
///
/// Dropping the animator disconnects the observer and cancels any running
/// animation; counters keep the value they last showed.
pub struct CounterAnimator {
    shared: Rc<RefCell<Shared>>,
    observer: IntersectionObserver,
    _on_intersect: IntersectClosure,
}

impl core::fmt::Debug for CounterAnimator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut s = f.debug_struct("CounterAnimator");
        match self.shared.try_borrow() {
            Ok(shared) => s
                .field("counters", &shared.board.len())
                .field("tasks", &shared.tasks.len()),
            Err(_) => s.field("counters", &"<borrowed>"),
        };
        s.finish_non_exhaustive()
    }
}

impl CounterAnimator {
    /// Finds the counters matching `config.counter_selector` and starts
    /// observing them.
    ///
    /// A page without counters yields an animator with nothing to do.
    ///
    /// # Errors
    ///
    /// Returns the DOM exception if the selector is invalid or the observer
    /// cannot be created.
    pub fn install(
        document: &Document,
        config: &PageConfig,
        mut sink: Box<dyn TraceSink>,
    ) -> Result<Self, JsValue> {
        let nodes = document.query_selector_all(config.counter_selector)?;
        let mut board = CounterBoard::new(config);
        let mut elements = Vec::new();
        {
            let mut tracer = Tracer::new(sink.as_mut());
            for i in 0..nodes.length() {
                let Some(element) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok())
                else {
                    continue;
                };
                let display = DomCounter::new(element.clone(), config.target_attribute);
                let id = board.push(display, &mut tracer);
                elements.push((id, element));
            }
        }

        let shared = Rc::new(RefCell::new(Shared {
            board,
            elements,
            tasks: Vec::new(),
            sink,
        }));

        let weak = Rc::downgrade(&shared);
        let on_intersect = Closure::wrap(Box::new(
            move |entries: Array, observer: IntersectionObserver| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                for entry in entries.iter() {
                    deliver(&shared, &observer, &entry.unchecked_into());
                }
            },
        ) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(config.threshold.fraction()));
        let observer =
            IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)?;
        for (_, element) in &shared.borrow().elements {
            observer.observe(element);
        }

        Ok(Self {
            shared,
            observer,
            _on_intersect: on_intersect,
        })
    }

    /// Returns the number of counters found at install time.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.borrow().board.len()
    }

    /// Returns `true` if the page had no counters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the counter ids in document order.
    #[must_use]
    pub fn ids(&self) -> Vec<CounterId> {
        self.shared.borrow().board.ids().collect()
    }

    /// Returns the lifecycle stage of `id`.
    #[must_use]
    pub fn state(&self, id: CounterId) -> Option<CounterState> {
        self.shared.borrow().board.state(id)
    }

    /// Returns the parsed target of `id`.
    #[must_use]
    pub fn target(&self, id: CounterId) -> Option<CounterTarget> {
        self.shared.borrow().board.target(id)
    }

    /// Returns the number of counters still waiting on animation frames.
    #[must_use]
    pub fn running(&self) -> usize {
        self.shared
            .borrow()
            .tasks
            .iter()
            .filter(|(_, task)| task.is_running())
            .count()
    }

    /// Returns the number of frame tasks held, finished ones included.
    ///
    /// Finished tasks are released when the next counter starts.
    #[must_use]
    pub fn tasks(&self) -> usize {
        self.shared.borrow().tasks.len()
    }

    /// Stops one counter: it is unobserved and its pending frame revoked.
    ///
    /// Returns `false` if the counter had already finished or was unknown.
    pub fn cancel(&self, id: CounterId) -> bool {
        let mut guard = self.shared.borrow_mut();
        let state = &mut *guard;
        if let Some((_, element)) = state.elements.iter().find(|(e, _)| *e == id) {
            self.observer.unobserve(element);
        }
        if let Some((_, task)) = state.tasks.iter().find(|(t, _)| *t == id) {
            task.cancel();
        }
        let mut tracer = Tracer::new(state.sink.as_mut());
        state.board.cancel(id, &mut tracer)
    }

    /// Disconnects the observer and cancels every unfinished counter.
    pub fn disconnect(&self) {
        self.observer.disconnect();
        let Ok(mut guard) = self.shared.try_borrow_mut() else {
            return;
        };
        let state = &mut *guard;
        let mut tracer = Tracer::new(state.sink.as_mut());
        state.board.cancel_all(&mut tracer);
        // Dropping a task revokes its frame and frees its closure.
        state.tasks.clear();
    }
}

impl Drop for CounterAnimator {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Forwards one observer entry to the board.
fn deliver(
    shared: &Rc<RefCell<Shared>>,
    observer: &IntersectionObserver,
    entry: &IntersectionObserverEntry,
) {
    let Ok(mut guard) = shared.try_borrow_mut() else {
        return;
    };
    let state = &mut *guard;
    let target = entry.target();
    let Some(&(id, _)) = state
        .elements
        .iter()
        .find(|(_, element)| element.is_same_node(Some(&target)))
    else {
        return;
    };

    let visibility = VisibilityEntry {
        is_intersecting: entry.is_intersecting(),
        ratio: entry.intersection_ratio(),
    };
    let mut tracer = Tracer::new(state.sink.as_mut());
    let trigger = state.board.on_visibility(id, visibility, &mut tracer);
    if trigger.unobserve() {
        observer.unobserve(&target);
    }
    if trigger
        == (Trigger::Started {
            next: FrameRequest::Again,
        })
    {
        // A task cannot free its own closure from inside a frame, so
        // finished ones are released here.
        state.tasks.retain(|(_, task)| task.is_running());
        let task = frame_task(Rc::downgrade(shared), id);
        task.start();
        state.tasks.push((id, task));
    }
}

/// A frame task that ticks `id` until the board reports it done.
fn frame_task(shared: Weak<RefCell<Shared>>, id: CounterId) -> FrameTask {
    FrameTask::new(move |_timestamp_ms| {
        let Some(shared) = shared.upgrade() else {
            return FrameRequest::Done;
        };
        // Busy only if an observer callback is mid-flight; retry next frame.
        let Ok(mut guard) = shared.try_borrow_mut() else {
            return FrameRequest::Again;
        };
        let state = &mut *guard;
        let mut tracer = Tracer::new(state.sink.as_mut());
        state.board.on_frame(id, &mut tracer)
    })
}
