//! Error types for engine setup and configuration loading.
//!
//! Nothing in the per-frame path can fail; these only surface while wiring
//! the engine or the scroll observer into the page, and callers are expected
//! to log them rather than propagate further.

use std::fmt;

use wasm_bindgen::JsValue;

/// Errors raised while attaching to the page.
#[derive(Debug)]
pub enum SetupError {
	/// No global `window` (not running in a browser).
	NoWindow,
	/// The window has no document.
	NoDocument,
	/// The element with this id exists but is not a `<canvas>`.
	NotACanvas(String),
	/// The canvas refused to hand out a 2D rendering context.
	ContextUnavailable,
	/// A browser API call threw.
	Js(String),
}

impl fmt::Display for SetupError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SetupError::NoWindow => write!(f, "no global window available"),
			SetupError::NoDocument => write!(f, "window has no document"),
			SetupError::NotACanvas(id) => write!(f, "element #{} is not a canvas", id),
			SetupError::ContextUnavailable => write!(f, "2d canvas context unavailable"),
			SetupError::Js(msg) => write!(f, "browser call failed: {}", msg),
		}
	}
}

impl std::error::Error for SetupError {}

impl From<JsValue> for SetupError {
	fn from(value: JsValue) -> Self {
		SetupError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
	}
}

/// Errors raised while reading a configuration override.
#[derive(Debug)]
pub enum ConfigError {
	/// The JSON did not match the expected shape.
	Parse(serde_json::Error),
	/// A color string could not be parsed.
	Color(String),
	/// A value was outside its permitted range.
	Invalid {
		field: &'static str,
		reason: &'static str,
	},
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::Parse(e) => write!(f, "invalid particle config: {}", e),
			ConfigError::Color(s) => write!(f, "unrecognized color {:?}", s),
			ConfigError::Invalid { field, reason } => write!(f, "{} {}", field, reason),
		}
	}
}

impl std::error::Error for ConfigError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			ConfigError::Parse(e) => Some(e),
			_ => None,
		}
	}
}

impl From<serde_json::Error> for ConfigError {
	fn from(e: serde_json::Error) -> Self {
		ConfigError::Parse(e)
	}
}
