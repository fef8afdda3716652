//! `IntersectionObserver` wrapper driving infinite scroll.
//!
//! The cursor state machine already absorbs duplicate triggers, but the
//! observer is still edge-triggered so a sentinel that stays on screen
//! does not spam the handler on every viewport callback.

use std::cell::Cell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry};
use yew::Callback;

/// Observer watching the last card of a listing.
pub(crate) struct NearEndObserver {
    observer: IntersectionObserver,
    _on_intersect: Closure<dyn FnMut(js_sys::Array)>,
    watched: Option<Element>,
}

impl NearEndObserver {
    /// Create an observer that fires when the sentinel scrolls into view.
    pub(crate) fn new(on_near_end: Callback<()>) -> Option<Self> {
        let visible = Cell::new(false);
        let on_intersect =
            Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
                let now_visible = entries.iter().any(|entry| {
                    entry
                        .dyn_into::<IntersectionObserverEntry>()
                        .map(|entry| entry.is_intersecting())
                        .unwrap_or(false)
                });
                if now_visible && !visible.get() {
                    on_near_end.emit(());
                }
                visible.set(now_visible);
            });
        let observer = IntersectionObserver::new(on_intersect.as_ref().unchecked_ref()).ok()?;
        Some(Self {
            observer,
            _on_intersect: on_intersect,
            watched: None,
        })
    }

    /// Watch a new sentinel element, releasing the previous one.
    pub(crate) fn watch(&mut self, element: Element) {
        if let Some(previous) = self.watched.take() {
            self.observer.unobserve(&previous);
        }
        self.observer.observe(&element);
        self.watched = Some(element);
    }
}

impl Drop for NearEndObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
