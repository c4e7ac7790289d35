//! Browser wiring for the particle engine.
//!
//! [`attach`] binds to an existing canvas by id, sizes it to the viewport,
//! registers the resize and pointer listeners and starts a
//! `requestAnimationFrame` loop. The returned [`EngineHandle`] owns all of
//! it; stopping or dropping the handle cancels the loop and removes the
//! listeners.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, Window};

use super::config::EngineConfig;
use super::particles::Point;
use super::state::AnimationState;
use crate::error::SetupError;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A running engine. Dropping it stops the animation.
pub struct EngineHandle {
	window: Window,
	root: Element,
	state: Rc<RefCell<AnimationState>>,
	frame_id: Rc<Cell<Option<i32>>>,
	animate: FrameCallback,
	on_resize: Closure<dyn FnMut()>,
	on_mousemove: Closure<dyn FnMut(MouseEvent)>,
	on_mouseleave: Closure<dyn FnMut(MouseEvent)>,
}

/// Starts the engine on the canvas with id `canvas_id`.
///
/// Returns `Ok(None)` without doing anything when no such element exists.
pub fn attach(canvas_id: &str, config: EngineConfig) -> Result<Option<EngineHandle>, SetupError> {
	let window = web_sys::window().ok_or(SetupError::NoWindow)?;
	let document = window.document().ok_or(SetupError::NoDocument)?;
	let Some(element) = document.get_element_by_id(canvas_id) else {
		debug!("ambient-particles: no element #{}, not starting", canvas_id);
		return Ok(None);
	};
	let canvas: HtmlCanvasElement = element
		.dyn_into()
		.map_err(|_| SetupError::NotACanvas(canvas_id.to_string()))?;
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or(SetupError::ContextUnavailable)?
		.dyn_into()
		.map_err(|_| SetupError::ContextUnavailable)?;
	let root = document.document_element().ok_or(SetupError::NoDocument)?;

	let (w, h) = viewport_size(&window)?;
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);

	let state = Rc::new(RefCell::new(AnimationState::new(
		config,
		w,
		h,
		Pcg64Mcg::from_entropy(),
	)));

	let state_resize = state.clone();
	let on_resize: Closure<dyn FnMut()> = Closure::new(move || {
		let Some(win) = web_sys::window() else {
			return;
		};
		if let Ok((nw, nh)) = viewport_size(&win) {
			state_resize
				.borrow_mut()
				.request_resize(nw, nh, js_sys::Date::now());
		}
	});

	let (state_mm, canvas_mm) = (state.clone(), canvas.clone());
	let on_mousemove: Closure<dyn FnMut(MouseEvent)> = Closure::new(move |ev: MouseEvent| {
		let rect = canvas_mm.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		state_mm.borrow_mut().pointer_moved(Point::new(x, y));
	});

	let state_ml = state.clone();
	let on_mouseleave: Closure<dyn FnMut(MouseEvent)> = Closure::new(move |_: MouseEvent| {
		state_ml.borrow_mut().pointer_left();
	});

	let frame_id = Rc::new(Cell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let (state_anim, animate_inner, frame_inner) = (state.clone(), animate.clone(), frame_id.clone());
	*animate.borrow_mut() = Some(Closure::new(move || {
		{
			let mut s = state_anim.borrow_mut();
			if let Some((nw, nh)) = s.poll_resize(js_sys::Date::now()) {
				canvas.set_width(nw as u32);
				canvas.set_height(nh as u32);
			}
			s.tick();
			s.render(&ctx);
		}
		if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
			frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	}));

	let handle = EngineHandle {
		window,
		root,
		state,
		frame_id,
		animate,
		on_resize,
		on_mousemove,
		on_mouseleave,
	};
	handle.listen()?;
	handle.request_frame()?;

	info!(
		"ambient-particles: started on #{} with {} particles",
		canvas_id,
		handle.state.borrow().population().len()
	);
	Ok(Some(handle))
}

impl EngineHandle {
	/// Stops the animation and removes every listener.
	pub fn stop(self) {
		drop(self);
	}

	/// Lets the engine run for the rest of the page's lifetime.
	pub fn forget(self) {
		std::mem::forget(self);
	}

	/// Number of particles currently alive.
	pub fn particle_count(&self) -> usize {
		self.state.borrow().population().len()
	}

	fn listen(&self) -> Result<(), SetupError> {
		self.window
			.add_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())?;
		self.window.add_event_listener_with_callback(
			"mousemove",
			self.on_mousemove.as_ref().unchecked_ref(),
		)?;
		self.root.add_event_listener_with_callback(
			"mouseleave",
			self.on_mouseleave.as_ref().unchecked_ref(),
		)?;
		Ok(())
	}

	fn unlisten(&self) {
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
		let _ = self.window.remove_event_listener_with_callback(
			"mousemove",
			self.on_mousemove.as_ref().unchecked_ref(),
		);
		let _ = self.root.remove_event_listener_with_callback(
			"mouseleave",
			self.on_mouseleave.as_ref().unchecked_ref(),
		);
	}

	fn request_frame(&self) -> Result<(), SetupError> {
		if let Some(ref cb) = *self.animate.borrow() {
			let id = self
				.window
				.request_animation_frame(cb.as_ref().unchecked_ref())?;
			self.frame_id.set(Some(id));
		}
		Ok(())
	}
}

impl Drop for EngineHandle {
	fn drop(&mut self) {
		if let Some(id) = self.frame_id.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		// Breaks the closure's reference to itself.
		self.animate.borrow_mut().take();
		let frames = {
			let mut state = self.state.borrow_mut();
			state.cancel_resize();
			state.frames
		};
		self.unlisten();
		info!("ambient-particles: stopped ({} frames since last rebuild)", frames);
	}
}

fn viewport_size(window: &Window) -> Result<(f64, f64), SetupError> {
	let width = window.inner_width()?.as_f64().unwrap_or(0.0);
	let height = window.inner_height()?.as_f64().unwrap_or(0.0);
	Ok((width.floor().max(0.0), height.floor().max(0.0)))
}
