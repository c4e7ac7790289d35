//! Fade page sections in as they scroll into view.
//!
//! Matching elements get the `reveal` class immediately and `visible` the first
//! time at least `threshold` of them intersects the viewport. Each element is
//! unobserved after it has been revealed, so the effect only plays once. The
//! transitions themselves live in the page stylesheet.

use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::SetupError;

/// Class added to every observed element.
pub const REVEAL_CLASS: &str = "reveal";
/// Class added once an element has scrolled into view.
pub const VISIBLE_CLASS: &str = "visible";

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Keeps the observer alive. Dropping it stops observing.
pub struct RevealHandle {
	observer: IntersectionObserver,
	_callback: ObserverCallback,
}

impl RevealHandle {
	pub fn disconnect(self) {
		drop(self);
	}
}

impl Drop for RevealHandle {
	fn drop(&mut self) {
		self.observer.disconnect();
	}
}

/// Observes every element matching `selector`.
pub fn observe_sections(selector: &str, threshold: f64) -> Result<RevealHandle, SetupError> {
	let window = web_sys::window().ok_or(SetupError::NoWindow)?;
	let document = window.document().ok_or(SetupError::NoDocument)?;

	let callback: ObserverCallback =
		Closure::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
			for entry in entries.iter() {
				let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
					continue;
				};
				if !entry.is_intersecting() {
					continue;
				}
				let target = entry.target();
				let _ = target.class_list().add_1(VISIBLE_CLASS);
				observer.unobserve(&target);
			}
		});

	let options = IntersectionObserverInit::new();
	options.set_root_margin("0px");
	options.set_threshold(&JsValue::from_f64(threshold));
	let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

	let sections = document.query_selector_all(selector)?;
	let mut observed = 0;
	for i in 0..sections.length() {
		let Some(element) = sections.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
			continue;
		};
		element.class_list().add_1(REVEAL_CLASS)?;
		observer.observe(&element);
		observed += 1;
	}
	debug!("ambient-particles: observing {} `{}` elements", observed, selector);

	Ok(RevealHandle {
		observer,
		_callback: callback,
	})
}
