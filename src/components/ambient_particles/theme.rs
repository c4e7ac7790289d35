//! Colors and palettes for the particle presets.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::ConfigError;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RRGGBB`) and `rgb()`/`rgba()` functional notation.
	pub fn parse(color_str: &str) -> Option<Color> {
		let color_str = color_str.trim();
		if color_str.starts_with('#') && color_str.len() == 7 {
			let r = u8::from_str_radix(color_str.get(1..3)?, 16).ok()?;
			let g = u8::from_str_radix(color_str.get(3..5)?, 16).ok()?;
			let b = u8::from_str_radix(color_str.get(5..7)?, 16).ok()?;
			Some(Color::rgb(r, g, b))
		} else if color_str.starts_with("rgb") {
			let nums: Vec<&str> = color_str
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			let r = nums.first()?.parse().ok()?;
			let g = nums.get(1)?.parse().ok()?;
			let b = nums.get(2)?.parse().ok()?;
			let a = match nums.get(3) {
				Some(a) => a.parse::<f64>().ok()?.clamp(0.0, 1.0),
				None => 1.0,
			};
			Some(Color::rgba(r, g, b, a))
		} else {
			None
		}
	}
}

impl TryFrom<String> for Color {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Color::parse(&value).ok_or(ConfigError::Color(value))
	}
}

/// The set of colors particles draw from at creation time.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	pub colors: Vec<Color>,
}

impl Palette {
	/// Brand blue, cyan and white.
	pub fn circuit() -> Self {
		Self {
			colors: vec![
				Color::rgb(50, 75, 255), // Brand blue
				Color::rgb(0, 209, 178), // Cyan
				Color::WHITE,
			],
		}
	}

	/// Circuit colors plus a violet accent, slightly translucent.
	pub fn hyper_geometry() -> Self {
		Self {
			colors: vec![
				Color::rgba(50, 75, 255, 0.7),
				Color::rgba(0, 209, 178, 0.7),
				Color::rgba(138, 92, 255, 0.7), // Violet
				Color::rgba(255, 255, 255, 0.5),
			],
		}
	}

	/// Picks a uniformly random color. An empty palette yields white.
	pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
		self.colors.choose(rng).copied().unwrap_or(Color::WHITE)
	}
}
