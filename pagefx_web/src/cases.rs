// Copyright 2026 the pagefx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Case button wiring.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use pagefx_core::config::PageConfig;
use pagefx_core::element::{CaseButton, VideoSurface};
use pagefx_core::selector::{CaseSelector, SelectError, Selection};
use pagefx_core::trace::{TraceSink, Tracer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, Element, Event, HtmlVideoElement};

/// A case button: carries a video URL and toggles the active class.
pub struct DomCaseButton {
    element: Element,
    video_attribute: &'static str,
    active_class: &'static str,
}

impl core::fmt::Debug for DomCaseButton {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomCaseButton")
            .field("element", &"Element")
            .field("video_attribute", &self.video_attribute)
            .field("active_class", &self.active_class)
            .finish()
    }
}

impl DomCaseButton {
    /// Wraps `element` using the attribute and class names in `config`.
    #[must_use]
    pub fn new(element: Element, config: &PageConfig) -> Self {
        Self {
            element,
            video_attribute: config.video_attribute,
            active_class: config.active_class,
        }
    }
}

impl CaseButton for DomCaseButton {
    fn video_ref(&self) -> Option<String> {
        self.element.get_attribute(self.video_attribute)
    }

    fn set_active(&mut self, active: bool) {
        let _ = self
            .element
            .class_list()
            .toggle_with_force(self.active_class, active);
    }
}

/// The `<video>` element driven by the case buttons.
#[derive(Debug)]
pub struct DomVideo {
    element: HtmlVideoElement,
}

impl DomVideo {
    /// Wraps `element`.
    #[must_use]
    pub fn new(element: HtmlVideoElement) -> Self {
        Self { element }
    }

    /// Returns the wrapped element.
    #[must_use]
    pub fn element(&self) -> &HtmlVideoElement {
        &self.element
    }
}

impl VideoSurface for DomVideo {
    fn set_source(&mut self, src: &str) {
        self.element.set_src(src);
    }

    fn reload(&mut self) {
        self.element.load();
    }
}

type ClickClosure = Closure<dyn FnMut(Event)>;

struct Shared {
    selector: CaseSelector<DomCaseButton, DomVideo>,
    sink: Box<dyn TraceSink>,
}

impl Shared {
    fn select(&mut self, index: usize) -> Result<Selection, SelectError> {
        let mut tracer = Tracer::new(self.sink.as_mut());
        self.selector.select(index, &mut tracer)
    }
}

/// Click listeners for a case button group and its video.
///
/// Dropping the switcher removes the listeners. Buttons and video keep
/// whatever state the last click left them in.
pub struct CaseSwitcher {
    shared: Rc<RefCell<Shared>>,
    listeners: Vec<(Element, ClickClosure)>,
}

impl core::fmt::Debug for CaseSwitcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CaseSwitcher")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl CaseSwitcher {
    /// Wires every button matching `config.case_button_selector` to the
    /// video with id `config.video_element_id`.
    ///
    /// Returns `Ok(None)` when the page has no such video, or the element
    /// with that id is not a `<video>`; nothing is wired in that case.
    ///
    /// # Errors
    ///
    /// Returns the DOM exception if the selector is invalid or a listener
    /// cannot be attached.
    pub fn install(
        document: &Document,
        config: &PageConfig,
        sink: Box<dyn TraceSink>,
    ) -> Result<Option<Self>, JsValue> {
        let Some(video) = document
            .get_element_by_id(config.video_element_id)
            .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok())
        else {
            return Ok(None);
        };

        let nodes = document.query_selector_all(config.case_button_selector)?;
        let elements: Vec<Element> = (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .collect();
        let buttons = elements
            .iter()
            .map(|el| DomCaseButton::new(el.clone(), config))
            .collect();

        let shared = Rc::new(RefCell::new(Shared {
            selector: CaseSelector::new(buttons, DomVideo::new(video)),
            sink,
        }));

        let mut switcher = Self {
            shared,
            listeners: Vec::with_capacity(elements.len()),
        };
        for (index, element) in elements.into_iter().enumerate() {
            let weak = Rc::downgrade(&switcher.shared);
            let on_click = Closure::wrap(Box::new(move |_event: Event| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let Ok(mut shared) = shared.try_borrow_mut() else {
                    return;
                };
                // Rejections are traced by the selector.
                let _ = shared.select(index);
            }) as Box<dyn FnMut(Event)>);
            element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
            switcher.listeners.push((element, on_click));
        }
        Ok(Some(switcher))
    }

    /// Selects the button at `index` as if it had been clicked.
    ///
    /// # Errors
    ///
    /// Returns the [`SelectError`] if the index is out of range or the
    /// button has no video reference; nothing is changed in that case.
    pub fn select(&self, index: usize) -> Result<Selection, SelectError> {
        self.shared.borrow_mut().select(index)
    }

    /// Returns the button activated by the last successful selection.
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.shared.borrow().selector.active()
    }

    /// Returns the number of reloads issued so far.
    #[must_use]
    pub fn reloads(&self) -> u64 {
        self.shared.borrow().selector.reloads()
    }

    /// Returns the number of buttons in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.borrow().selector.len()
    }

    /// Returns `true` if the page had no case buttons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for CaseSwitcher {
    fn drop(&mut self) {
        for (element, on_click) in &self.listeners {
            let _ = element
                .remove_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
        }
    }
}
