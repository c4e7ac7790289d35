//! ambient-particles: decorative canvas particle backgrounds for static pages.
//!
//! This crate provides a WASM particle engine that draws an ambient animation
//! behind page content, reacts to the pointer, and reveals page sections as
//! they scroll into view.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Only needed to enable the browser entropy source for `rand`.
use getrandom as _;

pub mod components;
pub mod error;

pub use components::ambient_particles::{
	AmbientParticles, Color, EngineConfig, EngineHandle, Palette, Preset, attach,
};
pub use components::scroll_reveal::{RevealHandle, observe_sections};
pub use error::{ConfigError, SetupError};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("ambient-particles: logging initialized");
}

/// Load engine configuration from a script element with id="particle-config".
/// Expected format: JSON with an optional `preset` plus overrides.
/// Falls back to the circuit preset when the element is missing or invalid.
pub fn load_config() -> EngineConfig {
	let Some(json_text) = config_script_text() else {
		return EngineConfig::default();
	};

	match EngineConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"ambient-particles: loaded config ({} style, density {})",
				config.style.name(),
				config.density
			);
			config
		}
		Err(e) => {
			warn!("ambient-particles: ignoring particle config: {}", e);
			EngineConfig::default()
		}
	}
}

fn config_script_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("particle-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Main application component.
/// Mounts the particle background and reveals `<section>` elements on scroll.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let reveal = StoredValue::new_local(None::<RevealHandle>);

	Effect::new(move |_| {
		if reveal.with_value(Option::is_some) {
			return;
		}
		match observe_sections("section", 0.1) {
			Ok(handle) => reveal.set_value(Some(handle)),
			Err(e) => warn!("ambient-particles: scroll reveal unavailable: {}", e),
		}
	});

	on_cleanup(move || {
		reveal.update_value(|h| {
			if let Some(h) = h.take() {
				h.disconnect();
			}
		});
	});

	view! {
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<div id="tsparticles" class="particles-background">
			<AmbientParticles config=config />
		</div>
	}
}
