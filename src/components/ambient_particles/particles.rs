//! Particle state and population construction.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use super::config::{EngineConfig, ParticleStyle, ShapeStyle, StreakStyle};
use super::theme::Color;

/// A point in canvas pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// The axis a streak is currently travelling along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
	Horizontal,
	Vertical,
}

impl Axis {
	pub fn other(self) -> Self {
		match self {
			Axis::Horizontal => Axis::Vertical,
			Axis::Vertical => Axis::Horizontal,
		}
	}
}

/// Signed speed along a single axis.
///
/// A streak only ever moves horizontally or vertically, so its velocity is an
/// axis plus a signed magnitude rather than a free `(vx, vy)` pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heading {
	pub axis: Axis,
	/// Pixels per frame; the sign gives the direction along `axis`.
	pub speed: f64,
}

impl Heading {
	pub const fn new(axis: Axis, speed: f64) -> Self {
		Self { axis, speed }
	}

	/// The equivalent `(vx, vy)` pair.
	pub fn velocity(&self) -> (f64, f64) {
		match self.axis {
			Axis::Horizontal => (self.speed, 0.0),
			Axis::Vertical => (0.0, self.speed),
		}
	}
}

/// Recent positions of a streak, oldest first.
///
/// Bounded: pushing past capacity evicts the oldest point.
#[derive(Clone, Debug, PartialEq)]
pub struct Trail {
	points: VecDeque<Point>,
	capacity: usize,
}

impl Trail {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			points: VecDeque::with_capacity(capacity + 1),
			capacity,
		}
	}

	pub fn push(&mut self, point: Point) {
		self.points.push_back(point);
		while self.points.len() > self.capacity {
			self.points.pop_front();
		}
	}

	pub fn last(&self) -> Option<&Point> {
		self.points.back()
	}

	pub fn clear(&mut self) {
		self.points.clear();
	}

	pub fn len(&self) -> usize {
		self.points.len()
	}

	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn iter(&self) -> impl Iterator<Item = &Point> {
		self.points.iter()
	}
}

/// Motion state of an axis-aligned streak.
#[derive(Clone, Debug, PartialEq)]
pub struct Streak {
	pub heading: Heading,
	pub trail: Trail,
	/// Frames until the next 90° turn.
	pub turn_timer: f64,
}

/// Drawable primitives for shape particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
	Circle,
	Square,
	Cross,
	Triangle,
	Diamond,
}

impl ShapeKind {
	/// Whether the shape is filled; otherwise it is stroked.
	pub fn is_filled(self) -> bool {
		matches!(self, ShapeKind::Circle | ShapeKind::Square | ShapeKind::Diamond)
	}
}

/// Motion state of a free-floating, spinning shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
	pub kind: ShapeKind,
	pub vx: f64,
	pub vy: f64,
	/// Degrees.
	pub rotation: f64,
	/// Degrees per frame.
	pub rotation_speed: f64,
}

impl Glyph {
	pub fn speed(&self) -> f64 {
		self.vx.hypot(self.vy)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Motion {
	Streak(Streak),
	Glyph(Glyph),
}

/// A single particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub size: f64,
	pub motion: Motion,
	color: Color,
}

impl Particle {
	pub fn new(x: f64, y: f64, size: f64, color: Color, motion: Motion) -> Self {
		Self {
			x,
			y,
			size,
			motion,
			color,
		}
	}

	/// Color picked at creation. Fixed for the particle's lifetime.
	pub fn color(&self) -> Color {
		self.color
	}

	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	pub fn velocity(&self) -> (f64, f64) {
		match &self.motion {
			Motion::Streak(s) => s.heading.velocity(),
			Motion::Glyph(g) => (g.vx, g.vy),
		}
	}
}

/// Uniform sample from `[lo, hi)`, degenerating to `lo` for an empty range.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
	lo + (hi - lo) * rng.r#gen::<f64>()
}

pub(crate) fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f64 {
	if rng.gen_bool(0.5) { 1.0 } else { -1.0 }
}

/// Upper bound on a population, whatever the density.
pub const MAX_PARTICLES: usize = 10_000;

/// The live set of particles for one canvas size.
///
/// Never resized in place: a new canvas size means a new population.
#[derive(Clone, Debug)]
pub struct Population {
	pub particles: Vec<Particle>,
	width: f64,
	height: f64,
}

impl Population {
	/// Particle count for a canvas: `floor(width * height / density)`, capped
	/// at [`MAX_PARTICLES`].
	pub fn target_count(width: f64, height: f64, density: f64) -> usize {
		let area = width * height;
		if !(area > 0.0 && density > 0.0) {
			return 0;
		}
		((area / density).floor() as usize).min(MAX_PARTICLES)
	}

	pub fn new<R: Rng + ?Sized>(config: &EngineConfig, width: f64, height: f64, rng: &mut R) -> Self {
		let count = Self::target_count(width, height, config.density);
		let mut particles = Vec::with_capacity(count);

		for _ in 0..count {
			let motion = match &config.style {
				ParticleStyle::Streak(style) => Motion::Streak(spawn_streak(config, style, rng)),
				ParticleStyle::Shape(style) => Motion::Glyph(spawn_glyph(config, style, rng)),
			};
			particles.push(Particle::new(
				uniform(rng, 0.0, width),
				uniform(rng, 0.0, height),
				uniform(rng, config.size_min, config.size_max),
				config.palette.pick(rng),
				motion,
			));
		}

		Self {
			particles,
			width,
			height,
		}
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}
}

fn spawn_streak<R: Rng + ?Sized>(config: &EngineConfig, style: &StreakStyle, rng: &mut R) -> Streak {
	let axis = if rng.gen_bool(0.5) {
		Axis::Horizontal
	} else {
		Axis::Vertical
	};
	let speed = config.base_speed * uniform(rng, 0.8, 1.3);

	Streak {
		heading: Heading::new(axis, random_sign(rng) * speed),
		trail: Trail::with_capacity(style.trail_length),
		turn_timer: uniform(rng, 0.0, 100.0),
	}
}

fn spawn_glyph<R: Rng + ?Sized>(config: &EngineConfig, style: &ShapeStyle, rng: &mut R) -> Glyph {
	let half_speed = config.base_speed / 2.0;
	let half_spin = style.rotation_speed_variance / 2.0;

	Glyph {
		kind: style.shapes.choose(rng).copied().unwrap_or(ShapeKind::Circle),
		vx: uniform(rng, -half_speed, half_speed),
		vy: uniform(rng, -half_speed, half_speed),
		rotation: uniform(rng, 0.0, 360.0),
		rotation_speed: uniform(rng, -half_spin, half_spin),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand_pcg::Pcg64Mcg;

	#[test]
	fn count_follows_canvas_area() {
		let cases = [
			(0.0, 0.0),
			(0.0, 900.0),
			(1.0, 1.0),
			(500.0, 500.0),
			(499.0, 500.0),
			(1920.0, 1080.0),
			(375.0, 812.0),
		];
		let mut rng = Pcg64Mcg::seed_from_u64(1);
		for config in [EngineConfig::circuit(), EngineConfig::hyper_geometry()] {
			for (w, h) in cases {
				let expected = (w * h / config.density).floor() as usize;
				assert_eq!(Population::target_count(w, h, config.density), expected);
				assert_eq!(Population::new(&config, w, h, &mut rng).len(), expected);
			}
		}
	}

	#[test]
	fn five_hundred_square_canvas_holds_ten() {
		let mut rng = Pcg64Mcg::seed_from_u64(2);
		let population = Population::new(&EngineConfig::circuit(), 500.0, 500.0, &mut rng);
		assert_eq!(population.len(), 10);
	}

	#[test]
	fn negative_area_is_empty() {
		assert_eq!(Population::target_count(-10.0, 500.0, 25_000.0), 0);
		assert_eq!(Population::target_count(f64::NAN, 500.0, 25_000.0), 0);
	}

	#[test]
	fn tiny_density_is_capped() {
		assert_eq!(Population::target_count(1920.0, 1080.0, 1e-300), MAX_PARTICLES);

		let mut config = EngineConfig::hyper_geometry();
		config.density = 1e-300;
		let mut rng = Pcg64Mcg::seed_from_u64(9);
		assert_eq!(Population::new(&config, 1920.0, 1080.0, &mut rng).len(), MAX_PARTICLES);
	}

	#[test]
	fn streaks_spawn_within_bounds() {
		let config = EngineConfig::circuit();
		let mut rng = Pcg64Mcg::seed_from_u64(3);
		let population = Population::new(&config, 1200.0, 900.0, &mut rng);

		for p in &population.particles {
			assert!((0.0..1200.0).contains(&p.x));
			assert!((0.0..900.0).contains(&p.y));
			assert!((config.size_min..config.size_max).contains(&p.size));
			assert!(config.palette.colors.contains(&p.color()));

			let Motion::Streak(s) = &p.motion else {
				panic!("circuit preset must spawn streaks");
			};
			let speed = s.heading.speed.abs();
			assert!(speed >= config.base_speed * 0.8 && speed < config.base_speed * 1.3);
			assert!((0.0..100.0).contains(&s.turn_timer));
			assert!(s.trail.is_empty());
			assert_eq!(s.trail.capacity(), 20);
		}
	}

	#[test]
	fn glyphs_spawn_within_ranges() {
		let config = EngineConfig::hyper_geometry();
		let mut rng = Pcg64Mcg::seed_from_u64(4);
		let population = Population::new(&config, 1200.0, 900.0, &mut rng);
		let half = config.base_speed / 2.0;

		for p in &population.particles {
			let Motion::Glyph(g) = &p.motion else {
				panic!("hyper geometry preset must spawn glyphs");
			};
			assert!(g.vx >= -half && g.vx < half);
			assert!(g.vy >= -half && g.vy < half);
			assert!((0.0..360.0).contains(&g.rotation));
			assert!(g.rotation_speed >= -1.0 && g.rotation_speed < 1.0);
		}
	}

	#[test]
	fn trail_evicts_oldest() {
		let mut trail = Trail::with_capacity(3);
		for i in 0..5 {
			trail.push(Point::new(i as f64, 0.0));
		}
		assert_eq!(trail.len(), 3);
		let xs: Vec<f64> = trail.iter().map(|p| p.x).collect();
		assert_eq!(xs, vec![2.0, 3.0, 4.0]);
		assert_eq!(trail.last(), Some(&Point::new(4.0, 0.0)));
	}

	#[test]
	fn heading_moves_on_one_axis() {
		assert_eq!(Heading::new(Axis::Horizontal, -2.0).velocity(), (-2.0, 0.0));
		assert_eq!(Heading::new(Axis::Vertical, 3.0).velocity(), (0.0, 3.0));
		assert_eq!(Axis::Horizontal.other(), Axis::Vertical);
	}
}
