//! Leptos component wrapping the particle canvas.
//!
//! The component renders a full-viewport canvas that sits behind page content
//! and ignores pointer events, then starts the engine on it once mounted. The
//! engine is stopped when the component is cleaned up.

use leptos::prelude::*;
use log::warn;

use super::config::EngineConfig;
use super::engine::{self, EngineHandle};

/// Renders an ambient particle background.
///
/// `canvas_id` names the canvas element the engine binds to; pick a distinct
/// id if the page already uses the default. `config` selects the preset.
#[component]
pub fn AmbientParticles(
	#[prop(into, default = "particles-canvas".to_string())] canvas_id: String,
	#[prop(default = EngineConfig::circuit())] config: EngineConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let handle = StoredValue::new_local(None::<EngineHandle>);
	let id = canvas_id.clone();

	Effect::new(move |_| {
		if canvas_ref.get().is_none() || handle.with_value(Option::is_some) {
			return;
		}
		match engine::attach(&id, config.clone()) {
			Ok(started) => handle.set_value(started),
			Err(e) => warn!("ambient-particles: failed to start: {}", e),
		}
	});

	on_cleanup(move || {
		handle.update_value(|h| {
			if let Some(h) = h.take() {
				h.stop();
			}
		});
	});

	view! {
		<canvas
			id=canvas_id
			node_ref=canvas_ref
			class="ambient-particles-canvas"
			style="position: fixed; top: 0; left: 0; width: 100%; height: 100%; z-index: 0; pointer-events: none; display: block;"
		/>
	}
}
