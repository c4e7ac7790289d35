//! Per-frame particle update.
//!
//! Each call advances one particle by exactly one frame. Speeds are in pixels
//! per frame, so animation speed follows the display refresh rate.

use rand::Rng;

use super::config::EngineConfig;
use super::particles::{
	Axis, Glyph, Heading, Motion, Particle, Point, Population, Streak, random_sign, uniform,
};

/// Streaks closer than this to the pointer are pushed away.
const STREAK_POINTER_RADIUS: f64 = 100.0;
/// Speed multiplier applied to a streak fleeing the pointer.
const STREAK_FLEE_FACTOR: f64 = 2.0;
/// Trail points further apart than this mean the particle jumped (wrapped).
const TRAIL_BREAK_DISTANCE: f64 = 10.0;
/// Turn timer reset range, in frames.
const TURN_TIMER_MIN: f64 = 20.0;
const TURN_TIMER_MAX: f64 = 70.0;

/// Shapes closer than this to the pointer feel a repulsive force.
const GLYPH_POINTER_RADIUS: f64 = 200.0;
const GLYPH_POINTER_STRENGTH: f64 = 0.5;
/// Speed band, as multiples of the base speed, outside of which shapes are
/// damped or boosted.
const GLYPH_MAX_SPEED_FACTOR: f64 = 2.0;
const GLYPH_MIN_SPEED_FACTOR: f64 = 0.5;
const GLYPH_DAMPING: f64 = 0.95;
const GLYPH_BOOST: f64 = 1.05;

/// Canvas extent particles live in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// Advances one particle by one frame.
pub fn step<R: Rng + ?Sized>(
	particle: &mut Particle,
	config: &EngineConfig,
	bounds: Bounds,
	pointer: Option<Point>,
	rng: &mut R,
) {
	let Particle { x, y, motion, .. } = particle;
	match motion {
		Motion::Streak(streak) => {
			step_streak(x, y, streak, config.base_speed, bounds, pointer, rng)
		}
		Motion::Glyph(glyph) => {
			step_glyph(x, y, glyph, config.base_speed, bounds, pointer)
		}
	}
}

impl Population {
	/// Advances every particle by one frame, in order.
	pub fn step<R: Rng + ?Sized>(&mut self, config: &EngineConfig, pointer: Option<Point>, rng: &mut R) {
		let bounds = Bounds::new(self.width(), self.height());
		for particle in &mut self.particles {
			step(particle, config, bounds, pointer, rng);
		}
	}
}

fn step_streak<R: Rng + ?Sized>(
	x: &mut f64,
	y: &mut f64,
	streak: &mut Streak,
	base_speed: f64,
	bounds: Bounds,
	pointer: Option<Point>,
	rng: &mut R,
) {
	streak.trail.push(Point::new(*x, *y));

	let (vx, vy) = streak.heading.velocity();
	*x += vx;
	*y += vy;

	streak.turn_timer -= 1.0;
	if streak.turn_timer <= 0.0 {
		streak.turn_timer = uniform(rng, TURN_TIMER_MIN, TURN_TIMER_MAX);
		streak.heading = Heading::new(streak.heading.axis.other(), random_sign(rng) * base_speed);
	}

	// Wrap
	if *x < 0.0 {
		*x = bounds.width;
	}
	if *x > bounds.width {
		*x = 0.0;
	}
	if *y < 0.0 {
		*y = bounds.height;
	}
	if *y > bounds.height {
		*y = 0.0;
	}

	if let Some(last) = streak.trail.last() {
		if (*x - last.x).abs() > TRAIL_BREAK_DISTANCE || (*y - last.y).abs() > TRAIL_BREAK_DISTANCE {
			streak.trail.clear();
		}
	}

	if let Some(p) = pointer {
		let (dx, dy) = (*x - p.x, *y - p.y);
		if dx.hypot(dy) < STREAK_POINTER_RADIUS {
			let flee = base_speed * STREAK_FLEE_FACTOR;
			let away = |offset: f64| if offset > 0.0 { flee } else { -flee };
			streak.heading = if dx.abs() > dy.abs() {
				Heading::new(Axis::Horizontal, away(dx))
			} else {
				Heading::new(Axis::Vertical, away(dy))
			};
		}
	}
}

fn step_glyph(
	x: &mut f64,
	y: &mut f64,
	glyph: &mut Glyph,
	base_speed: f64,
	bounds: Bounds,
	pointer: Option<Point>,
) {
	*x += glyph.vx;
	*y += glyph.vy;
	glyph.rotation = (glyph.rotation + glyph.rotation_speed).rem_euclid(360.0);

	// Bounce, without clamping. Only a component still heading outward flips.
	let bounce_x = (*x < 0.0 && glyph.vx < 0.0) || (*x > bounds.width && glyph.vx > 0.0);
	let bounce_y = (*y < 0.0 && glyph.vy < 0.0) || (*y > bounds.height && glyph.vy > 0.0);
	if bounce_x {
		glyph.vx = -glyph.vx;
	}
	if bounce_y {
		glyph.vy = -glyph.vy;
	}
	// Corners reverse the spin once.
	if bounce_x || bounce_y {
		glyph.rotation_speed = -glyph.rotation_speed;
	}

	if let Some(p) = pointer {
		let (dx, dy) = (*x - p.x, *y - p.y);
		let dist = dx.hypot(dy);
		// A particle sitting exactly on the pointer has no direction to flee in.
		if dist > 0.0 && dist < GLYPH_POINTER_RADIUS {
			let force = (GLYPH_POINTER_RADIUS - dist) / GLYPH_POINTER_RADIUS;
			glyph.vx += dx / dist * force * GLYPH_POINTER_STRENGTH;
			glyph.vy += dy / dist * force * GLYPH_POINTER_STRENGTH;
		}
	}

	let speed = glyph.speed();
	if speed > base_speed * GLYPH_MAX_SPEED_FACTOR {
		glyph.vx *= GLYPH_DAMPING;
		glyph.vy *= GLYPH_DAMPING;
	} else if speed < base_speed * GLYPH_MIN_SPEED_FACTOR {
		glyph.vx *= GLYPH_BOOST;
		glyph.vy *= GLYPH_BOOST;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::ambient_particles::particles::{ShapeKind, Trail};
	use crate::components::ambient_particles::theme::Color;
	use rand::SeedableRng;
	use rand_pcg::Pcg64Mcg;

	fn streak_at(x: f64, y: f64, heading: Heading, turn_timer: f64) -> Particle {
		Particle::new(
			x,
			y,
			3.0,
			Color::WHITE,
			Motion::Streak(Streak {
				heading,
				trail: Trail::with_capacity(20),
				turn_timer,
			}),
		)
	}

	fn glyph_at(x: f64, y: f64, vx: f64, vy: f64, rotation_speed: f64) -> Particle {
		Particle::new(
			x,
			y,
			8.0,
			Color::WHITE,
			Motion::Glyph(Glyph {
				kind: ShapeKind::Diamond,
				vx,
				vy,
				rotation: 0.0,
				rotation_speed,
			}),
		)
	}

	fn streak(p: &Particle) -> &Streak {
		match &p.motion {
			Motion::Streak(s) => s,
			Motion::Glyph(_) => panic!("expected streak"),
		}
	}

	fn glyph(p: &Particle) -> &Glyph {
		match &p.motion {
			Motion::Glyph(g) => g,
			Motion::Streak(_) => panic!("expected glyph"),
		}
	}

	#[test]
	fn streak_wraps_to_opposite_edge_and_drops_trail() {
		let config = EngineConfig::circuit();
		let bounds = Bounds::new(500.0, 500.0);
		let mut rng = Pcg64Mcg::seed_from_u64(10);
		let mut p = streak_at(0.0, 250.0, Heading::new(Axis::Horizontal, -2.0), 50.0);

		step(&mut p, &config, bounds, None, &mut rng);

		assert_eq!((p.x, p.y), (500.0, 250.0));
		assert!(streak(&p).trail.is_empty());
		assert_eq!(streak(&p).heading, Heading::new(Axis::Horizontal, -2.0));
	}

	#[test]
	fn streak_wraps_vertically_past_far_edge() {
		let config = EngineConfig::circuit();
		let bounds = Bounds::new(400.0, 300.0);
		let mut rng = Pcg64Mcg::seed_from_u64(11);
		let mut p = streak_at(120.0, 299.0, Heading::new(Axis::Vertical, 2.0), 50.0);

		step(&mut p, &config, bounds, None, &mut rng);

		assert_eq!((p.x, p.y), (120.0, 0.0));
		assert!(streak(&p).trail.is_empty());
	}

	#[test]
	fn streak_wraps_back_across_remaining_edges() {
		let config = EngineConfig::circuit();
		let bounds = Bounds::new(500.0, 300.0);
		let mut rng = Pcg64Mcg::seed_from_u64(22);

		let mut right = streak_at(499.0, 150.0, Heading::new(Axis::Horizontal, 2.0), 50.0);
		step(&mut right, &config, bounds, None, &mut rng);
		assert_eq!((right.x, right.y), (0.0, 150.0));
		assert!(streak(&right).trail.is_empty());

		let mut top = streak_at(250.0, 1.0, Heading::new(Axis::Vertical, -2.0), 50.0);
		step(&mut top, &config, bounds, None, &mut rng);
		assert_eq!((top.x, top.y), (250.0, 300.0));
		assert!(streak(&top).trail.is_empty());
	}

	#[test]
	fn streak_records_trail_while_moving() {
		let config = EngineConfig::circuit();
		let bounds = Bounds::new(1000.0, 1000.0);
		let mut rng = Pcg64Mcg::seed_from_u64(12);
		let mut p = streak_at(500.0, 500.0, Heading::new(Axis::Horizontal, 2.0), 500.0);

		for _ in 0..5 {
			step(&mut p, &config, bounds, None, &mut rng);
		}

		assert_eq!((p.x, p.y), (510.0, 500.0));
		let xs: Vec<f64> = streak(&p).trail.iter().map(|pt| pt.x).collect();
		assert_eq!(xs, vec![500.0, 502.0, 504.0, 506.0, 508.0]);
	}

	#[test]
	fn streak_turns_ninety_degrees_when_timer_expires() {
		let config = EngineConfig::circuit();
		let bounds = Bounds::new(1000.0, 1000.0);
		let mut rng = Pcg64Mcg::seed_from_u64(13);
		let mut p = streak_at(500.0, 500.0, Heading::new(Axis::Horizontal, 2.4), 1.0);

		step(&mut p, &config, bounds, None, &mut rng);

		let s = streak(&p);
		assert_eq!(s.heading.axis, Axis::Vertical);
		assert_eq!(s.heading.speed.abs(), config.base_speed);
		assert!((TURN_TIMER_MIN..TURN_TIMER_MAX).contains(&s.turn_timer));
	}

	#[test]
	fn streak_flees_pointer_along_dominant_axis() {
		let config = EngineConfig::circuit();
		let bounds = Bounds::new(1000.0, 1000.0);
		let mut rng = Pcg64Mcg::seed_from_u64(14);

		// Pointer to the left and slightly above: flee right.
		let mut p = streak_at(500.0, 500.0, Heading::new(Axis::Vertical, -2.0), 50.0);
		step(&mut p, &config, bounds, Some(Point::new(450.0, 510.0)), &mut rng);
		assert_eq!(streak(&p).heading, Heading::new(Axis::Horizontal, 4.0));

		// Pointer straight below: flee up.
		let mut p = streak_at(500.0, 500.0, Heading::new(Axis::Horizontal, 2.0), 50.0);
		step(&mut p, &config, bounds, Some(Point::new(502.0, 560.0)), &mut rng);
		assert_eq!(streak(&p).heading, Heading::new(Axis::Vertical, -4.0));

		// Out of range: untouched.
		let mut p = streak_at(500.0, 500.0, Heading::new(Axis::Horizontal, 2.0), 50.0);
		step(&mut p, &config, bounds, Some(Point::new(100.0, 100.0)), &mut rng);
		assert_eq!(streak(&p).heading, Heading::new(Axis::Horizontal, 2.0));
	}

	#[test]
	fn streak_invariants_hold_over_many_frames() {
		let config = EngineConfig::circuit();
		let mut rng = Pcg64Mcg::seed_from_u64(15);
		let mut population = Population::new(&config, 800.0, 600.0, &mut rng);
		assert!(!population.is_empty());

		for frame in 0..2000 {
			let pointer = (frame % 3 == 0).then(|| Point::new(400.0 + (frame % 50) as f64, 300.0));
			population.step(&config, pointer, &mut rng);

			for p in &population.particles {
				let s = streak(p);
				let (vx, vy) = p.velocity();
				assert!((vx != 0.0) ^ (vy != 0.0), "exactly one axis must move");
				assert!(s.trail.len() <= 20);
				assert!((0.0..=800.0).contains(&p.x));
				assert!((0.0..=600.0).contains(&p.y));
			}
		}
	}

	#[test]
	fn glyph_bounces_without_clamping() {
		let config = EngineConfig::hyper_geometry();
		let bounds = Bounds::new(500.0, 500.0);
		let mut rng = Pcg64Mcg::seed_from_u64(16);
		let mut p = glyph_at(0.0, 100.0, -1.0, 0.0, 1.5);

		step(&mut p, &config, bounds, None, &mut rng);

		assert_eq!((p.x, p.y), (-1.0, 100.0));
		assert_eq!(glyph(&p).vx, 1.0);
		assert_eq!(glyph(&p).rotation_speed, -1.5);

		// The next frame carries it back inside without flipping again.
		step(&mut p, &config, bounds, None, &mut rng);
		assert_eq!(p.x, 0.0);
		assert_eq!(glyph(&p).vx, 1.0);
		assert_eq!(glyph(&p).rotation_speed, -1.5);
	}

	#[test]
	fn glyph_bounces_off_bottom_wall() {
		let config = EngineConfig::hyper_geometry();
		let bounds = Bounds::new(500.0, 500.0);
		let mut rng = Pcg64Mcg::seed_from_u64(17);
		let mut p = glyph_at(250.0, 499.5, 0.0, 1.0, -0.5);

		step(&mut p, &config, bounds, None, &mut rng);

		assert_eq!(glyph(&p).vy, -1.0);
		assert_eq!(glyph(&p).vx, 0.0);
		assert_eq!(glyph(&p).rotation_speed, 0.5);
	}

	#[test]
	fn glyph_corner_hit_reverses_spin_once() {
		let config = EngineConfig::hyper_geometry();
		let bounds = Bounds::new(500.0, 500.0);
		let mut rng = Pcg64Mcg::seed_from_u64(20);
		let mut p = glyph_at(0.5, 0.5, -1.0, -1.0, 1.5);

		step(&mut p, &config, bounds, None, &mut rng);

		assert_eq!((glyph(&p).vx, glyph(&p).vy), (1.0, 1.0));
		assert_eq!(glyph(&p).rotation_speed, -1.5);
	}

	#[test]
	fn fast_glyph_at_edge_returns_inside() {
		let config = EngineConfig::hyper_geometry();
		let bounds = Bounds::new(1000.0, 500.0);
		let mut rng = Pcg64Mcg::seed_from_u64(21);
		let mut p = glyph_at(0.001, 250.0, -3.0, 0.0, 0.0);

		let mut outside = 0;
		let mut flips = 0;
		let mut last_vx = glyph(&p).vx;
		for _ in 0..500 {
			step(&mut p, &config, bounds, None, &mut rng);
			if p.x < 0.0 {
				outside += 1;
			}
			if glyph(&p).vx.signum() != last_vx.signum() {
				flips += 1;
			}
			last_vx = glyph(&p).vx;
		}

		// Damping after the flip costs one extra frame outside, never more.
		assert_eq!(outside, 2);
		assert_eq!(flips, 1);
		assert!(p.x >= 0.0 && p.x <= 1000.0);
		assert!(glyph(&p).vx > 0.0);
	}

	#[test]
	fn glyph_is_pushed_away_from_pointer() {
		let config = EngineConfig::hyper_geometry();
		let bounds = Bounds::new(1000.0, 1000.0);
		let mut rng = Pcg64Mcg::seed_from_u64(18);
		let mut p = glyph_at(500.0, 500.0, 0.0, 0.8, 0.0);

		step(&mut p, &config, bounds, Some(Point::new(400.0, 500.8)), &mut rng);

		// dx = 100, force = 0.5, so vx gains ~0.25 pointing away.
		assert!(glyph(&p).vx > 0.2 && glyph(&p).vx < 0.3);
	}

	#[test]
	fn glyph_on_pointer_feels_no_force() {
		let config = EngineConfig::hyper_geometry();
		let bounds = Bounds::new(1000.0, 1000.0);
		let mut rng = Pcg64Mcg::seed_from_u64(19);
		let mut p = glyph_at(500.0, 500.0, 0.0, 0.0, 0.0);

		step(&mut p, &config, bounds, Some(Point::new(500.0, 500.0)), &mut rng);

		assert_eq!(glyph(&p).vx, 0.0);
		assert_eq!(glyph(&p).vy, 0.0);
		assert!(p.x.is_finite() && p.y.is_finite());
	}

	#[test]
	fn glyph_speed_settles_into_band() {
		let config = EngineConfig::hyper_geometry();
		let base = config.base_speed;
		let bounds = Bounds::new(100_000.0, 100_000.0);
		let mut rng = Pcg64Mcg::seed_from_u64(20);

		for (vx, vy) in [(base * 10.0, 0.0), (0.0, base * 0.05), (base * 3.0, -base * 4.0)] {
			let mut p = glyph_at(50_000.0, 50_000.0, vx, vy, 0.0);
			for _ in 0..200 {
				step(&mut p, &config, bounds, None, &mut rng);
			}
			let speed = glyph(&p).speed();
			assert!(
				speed >= base * 0.5 && speed <= base * 2.0,
				"speed {speed} escaped the band"
			);
		}
	}

	#[test]
	fn glyph_speed_stays_bounded_under_pointer_force() {
		let config = EngineConfig::hyper_geometry();
		let base = config.base_speed;
		let bounds = Bounds::new(10_000.0, 10_000.0);
		let pointer = Some(Point::new(5_000.0, 5_000.0));
		let mut rng = Pcg64Mcg::seed_from_u64(21);
		let mut p = glyph_at(5_001.0, 5_000.0, 0.0, 0.0, 0.0);

		for _ in 0..1000 {
			step(&mut p, &config, bounds, pointer, &mut rng);
			// Each frame adds at most 0.5 and damping takes 5% above the band.
			assert!(glyph(&p).speed() < 10.0 + base * 2.0);
		}
		let speed = glyph(&p).speed();
		assert!(speed >= base * 0.5 && speed <= base * 2.0);
	}
}
