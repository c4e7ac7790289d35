//! Engine configuration and the built-in presets.
//!
//! Both presets run through the same engine; they differ only in data. A page
//! can pick a preset and override individual values with a JSON document (see
//! [`EngineConfig::from_json`]).

use serde::Deserialize;

use super::particles::ShapeKind;
use super::theme::{Color, Palette};
use crate::error::ConfigError;

/// Smallest accepted canvas area per particle, in square pixels.
pub const MIN_DENSITY: f64 = 100.0;

/// What happens when a particle crosses the canvas edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
	/// Teleport to the opposite edge.
	Wrap,
	/// Reflect the velocity component, leaving position unclamped.
	Bounce,
}

/// Axis-aligned streaks that leave a short trail behind them.
#[derive(Clone, Debug, PartialEq)]
pub struct StreakStyle {
	/// Maximum number of trail points kept per particle.
	pub trail_length: usize,
	/// Opacity of the trail stroke.
	pub trail_alpha: f64,
}

/// Freely moving, spinning outline shapes.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeStyle {
	/// Shapes to draw from at creation time.
	pub shapes: Vec<ShapeKind>,
	/// Width of the rotation speed range, in degrees per frame, centered on 0.
	pub rotation_speed_variance: f64,
	/// Global opacity applied to every shape.
	pub opacity: f64,
}

/// Per-preset particle behavior.
#[derive(Clone, Debug, PartialEq)]
pub enum ParticleStyle {
	Streak(StreakStyle),
	Shape(ShapeStyle),
}

impl ParticleStyle {
	pub fn boundary(&self) -> Boundary {
		match self {
			ParticleStyle::Streak(_) => Boundary::Wrap,
			ParticleStyle::Shape(_) => Boundary::Bounce,
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			ParticleStyle::Streak(_) => "streak",
			ParticleStyle::Shape(_) => "shape",
		}
	}
}

/// Named presets selectable from page configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
	#[default]
	Circuit,
	HyperGeometry,
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
	/// Canvas pixels per particle. Population = floor(area / density).
	pub density: f64,
	pub palette: Palette,
	/// Base speed in pixels per frame.
	pub base_speed: f64,
	pub size_min: f64,
	pub size_max: f64,
	pub style: ParticleStyle,
	/// Forget the pointer when it leaves the page.
	pub clear_pointer_on_leave: bool,
	/// Quiet period after the last resize before the population is rebuilt.
	pub resize_debounce_ms: f64,
}

impl EngineConfig {
	/// "Digital circuit": sparse streaks turning at right angles.
	pub fn circuit() -> Self {
		Self {
			density: 25_000.0,
			palette: Palette::circuit(),
			base_speed: 2.0,
			size_min: 2.0,
			size_max: 4.0,
			style: ParticleStyle::Streak(StreakStyle {
				trail_length: 20,
				trail_alpha: 0.5,
			}),
			clear_pointer_on_leave: true,
			resize_debounce_ms: 100.0,
		}
	}

	/// "Hyper geometry": drifting, spinning shapes bouncing off the walls.
	pub fn hyper_geometry() -> Self {
		Self {
			density: 20_000.0,
			palette: Palette::hyper_geometry(),
			base_speed: 0.8,
			size_min: 6.0,
			size_max: 14.0,
			style: ParticleStyle::Shape(ShapeStyle {
				shapes: vec![
					ShapeKind::Circle,
					ShapeKind::Square,
					ShapeKind::Cross,
					ShapeKind::Triangle,
					ShapeKind::Diamond,
				],
				rotation_speed_variance: 2.0,
				opacity: 0.6,
			}),
			clear_pointer_on_leave: false,
			resize_debounce_ms: 100.0,
		}
	}

	pub fn preset(preset: Preset) -> Self {
		match preset {
			Preset::Circuit => Self::circuit(),
			Preset::HyperGeometry => Self::hyper_geometry(),
		}
	}

	/// Builds a configuration from a JSON override document.
	///
	/// The document selects a `preset` (default `circuit`) and may override
	/// individual values. Options that do not apply to the chosen preset's
	/// style are ignored.
	///
	/// ```ignore
	/// let config = EngineConfig::from_json(r#"{ "preset": "hyper_geometry", "density": 30000 }"#)?;
	/// ```
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let overrides: ConfigOverrides = serde_json::from_str(json)?;
		let config = overrides.apply();
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });

		if !(self.density >= MIN_DENSITY) {
			return invalid("density", "must be at least 100 pixels per particle");
		}
		if !(self.base_speed > 0.0) {
			return invalid("base_speed", "must be positive");
		}
		if !(self.size_min >= 0.0 && self.size_min <= self.size_max) {
			return invalid("size_min", "must be non-negative and at most size_max");
		}
		if self.palette.colors.is_empty() {
			return invalid("palette", "must not be empty");
		}
		if !(self.resize_debounce_ms >= 0.0) {
			return invalid("resize_debounce_ms", "must not be negative");
		}
		match &self.style {
			ParticleStyle::Streak(s) if s.trail_length == 0 => {
				invalid("trail_length", "must be at least 1")
			}
			ParticleStyle::Shape(s) if s.shapes.is_empty() => invalid("shapes", "must not be empty"),
			ParticleStyle::Shape(s) if !(s.rotation_speed_variance >= 0.0) => {
				invalid("rotation_speed_variance", "must not be negative")
			}
			_ => Ok(()),
		}
	}
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self::circuit()
	}
}

/// Page-supplied overrides on top of a preset.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigOverrides {
	preset: Preset,
	density: Option<f64>,
	palette: Option<Vec<Color>>,
	base_speed: Option<f64>,
	size_min: Option<f64>,
	size_max: Option<f64>,
	trail_length: Option<usize>,
	shapes: Option<Vec<ShapeKind>>,
	rotation_speed_variance: Option<f64>,
	clear_pointer_on_leave: Option<bool>,
	resize_debounce_ms: Option<f64>,
}

impl ConfigOverrides {
	fn apply(self) -> EngineConfig {
		let mut config = EngineConfig::preset(self.preset);

		if let Some(v) = self.density {
			config.density = v;
		}
		if let Some(colors) = self.palette {
			config.palette = Palette { colors };
		}
		if let Some(v) = self.base_speed {
			config.base_speed = v;
		}
		if let Some(v) = self.size_min {
			config.size_min = v;
		}
		if let Some(v) = self.size_max {
			config.size_max = v;
		}
		if let Some(v) = self.clear_pointer_on_leave {
			config.clear_pointer_on_leave = v;
		}
		if let Some(v) = self.resize_debounce_ms {
			config.resize_debounce_ms = v;
		}

		match &mut config.style {
			ParticleStyle::Streak(style) => {
				if let Some(v) = self.trail_length {
					style.trail_length = v;
				}
			}
			ParticleStyle::Shape(style) => {
				if let Some(v) = self.shapes {
					style.shapes = v;
				}
				if let Some(v) = self.rotation_speed_variance {
					style.rotation_speed_variance = v;
				}
			}
		}

		config
	}
}
