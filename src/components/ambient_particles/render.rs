//! Canvas rendering for the particle population.
//!
//! Drawing goes through [`Surface`], a thin slice of the 2D canvas API, so the
//! paint commands can be inspected without a browser.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::config::{EngineConfig, ParticleStyle};
use super::particles::{Glyph, Motion, Particle, Population, ShapeKind, Streak};

/// The subset of `CanvasRenderingContext2d` the renderer needs.
pub trait Surface {
	fn clear(&self, width: f64, height: f64);
	fn save(&self);
	fn restore(&self);
	fn translate(&self, x: f64, y: f64);
	fn rotate(&self, radians: f64);
	fn set_alpha(&self, alpha: f64);
	fn set_fill(&self, css: &str);
	fn set_stroke(&self, css: &str);
	fn set_line_width(&self, width: f64);
	fn begin_path(&self);
	fn move_to(&self, x: f64, y: f64);
	fn line_to(&self, x: f64, y: f64);
	fn close_path(&self);
	fn circle(&self, x: f64, y: f64, radius: f64);
	fn fill(&self);
	fn stroke(&self);
	fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn translate(&self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::translate(self, x, y);
	}

	fn rotate(&self, radians: f64) {
		let _ = CanvasRenderingContext2d::rotate(self, radians);
	}

	fn set_alpha(&self, alpha: f64) {
		self.set_global_alpha(alpha);
	}

	fn set_fill(&self, css: &str) {
		self.set_fill_style_str(css);
	}

	fn set_stroke(&self, css: &str) {
		self.set_stroke_style_str(css);
	}

	fn set_line_width(&self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn begin_path(&self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn move_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::move_to(self, x, y);
	}

	fn line_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::line_to(self, x, y);
	}

	fn close_path(&self) {
		CanvasRenderingContext2d::close_path(self);
	}

	fn circle(&self, x: f64, y: f64, radius: f64) {
		let _ = self.arc(x, y, radius, 0.0, PI * 2.0);
	}

	fn fill(&self) {
		CanvasRenderingContext2d::fill(self);
	}

	fn stroke(&self) {
		CanvasRenderingContext2d::stroke(self);
	}

	fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64) {
		CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
	}
}

/// Clears the surface and draws every particle, in population order.
pub fn render<S: Surface + ?Sized>(surface: &S, config: &EngineConfig, population: &Population) {
	surface.clear(population.width(), population.height());

	for particle in &population.particles {
		draw_particle(surface, config, particle);
	}
}

pub fn draw_particle<S: Surface + ?Sized>(surface: &S, config: &EngineConfig, particle: &Particle) {
	match (&particle.motion, &config.style) {
		(Motion::Streak(streak), ParticleStyle::Streak(style)) => {
			draw_streak(surface, particle, streak, style.trail_alpha)
		}
		(Motion::Streak(streak), ParticleStyle::Shape(_)) => draw_streak(surface, particle, streak, 1.0),
		(Motion::Glyph(glyph), ParticleStyle::Shape(style)) => {
			draw_glyph(surface, particle, glyph, style.opacity)
		}
		(Motion::Glyph(glyph), ParticleStyle::Streak(_)) => draw_glyph(surface, particle, glyph, 1.0),
	}
}

/// Trail polyline plus a square "packet" head.
fn draw_streak<S: Surface + ?Sized>(surface: &S, particle: &Particle, streak: &Streak, trail_alpha: f64) {
	let color = particle.color().to_css();

	let mut points = streak.trail.iter();
	if let Some(first) = points.next() {
		surface.begin_path();
		surface.move_to(first.x, first.y);
		for point in points {
			surface.line_to(point.x, point.y);
		}
		surface.line_to(particle.x, particle.y);
		surface.set_stroke(&color);
		surface.set_alpha(trail_alpha);
		surface.set_line_width(1.0);
		surface.stroke();
		surface.set_alpha(1.0);
	}

	let half = particle.size / 2.0;
	surface.set_fill(&color);
	surface.fill_rect(particle.x - half, particle.y - half, particle.size, particle.size);
}

/// One rotated primitive centered on the particle.
fn draw_glyph<S: Surface + ?Sized>(surface: &S, particle: &Particle, glyph: &Glyph, opacity: f64) {
	let color = particle.color().to_css();
	let half = particle.size / 2.0;

	surface.save();
	surface.translate(particle.x, particle.y);
	surface.rotate(glyph.rotation.to_radians());
	surface.set_alpha(opacity);
	surface.set_fill(&color);
	surface.set_stroke(&color);
	surface.set_line_width(1.0);

	match glyph.kind {
		ShapeKind::Circle => {
			surface.begin_path();
			surface.circle(0.0, 0.0, half);
		}
		ShapeKind::Square => {
			surface.fill_rect(-half, -half, particle.size, particle.size);
		}
		ShapeKind::Cross => {
			surface.begin_path();
			surface.move_to(-half, 0.0);
			surface.line_to(half, 0.0);
			surface.move_to(0.0, -half);
			surface.line_to(0.0, half);
		}
		ShapeKind::Triangle => {
			surface.begin_path();
			surface.move_to(0.0, -half);
			surface.line_to(half, half);
			surface.line_to(-half, half);
			surface.close_path();
		}
		ShapeKind::Diamond => {
			surface.begin_path();
			surface.move_to(0.0, -half);
			surface.line_to(half, 0.0);
			surface.line_to(0.0, half);
			surface.line_to(-half, 0.0);
			surface.close_path();
		}
	}

	match glyph.kind {
		// Drawn directly by fill_rect.
		ShapeKind::Square => {}
		kind if kind.is_filled() => surface.fill(),
		_ => surface.stroke(),
	}

	surface.restore();
}
