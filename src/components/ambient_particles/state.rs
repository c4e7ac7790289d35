//! Animation state shared between the frame loop and the event handlers.
//!
//! Owns the population, the latest pointer position and the pending resize.
//! Browser callbacks only ever touch the engine through this type, which keeps
//! the frame logic testable without a DOM.

use log::debug;
use rand::Rng;
use rand_pcg::Pcg64Mcg;

use super::config::EngineConfig;
use super::particles::{Point, Population};
use super::render::{self, Surface};
use super::resize::ResizeDebounce;

pub struct AnimationState<R = Pcg64Mcg> {
	pub config: EngineConfig,
	population: Population,
	pointer: Option<Point>,
	debounce: ResizeDebounce,
	rng: R,
	/// Number of frames advanced since the last rebuild.
	pub frames: u64,
}

impl<R: Rng> AnimationState<R> {
	pub fn new(config: EngineConfig, width: f64, height: f64, mut rng: R) -> Self {
		let population = Population::new(&config, width, height, &mut rng);
		let debounce = ResizeDebounce::new(config.resize_debounce_ms);
		Self {
			config,
			population,
			pointer: None,
			debounce,
			rng,
			frames: 0,
		}
	}

	pub fn population(&self) -> &Population {
		&self.population
	}

	pub fn pointer_moved(&mut self, point: Point) {
		self.pointer = Some(point);
	}

	pub fn pointer_left(&mut self) {
		if self.config.clear_pointer_on_leave {
			self.pointer = None;
		}
	}

	/// Queues a rebuild for the new viewport size.
	pub fn request_resize(&mut self, width: f64, height: f64, now_ms: f64) {
		self.debounce.trigger(width, height, now_ms);
	}

	pub fn cancel_resize(&mut self) {
		self.debounce.cancel();
	}

	/// Rebuilds the population if a resize has settled. Returns the new size so
	/// the caller can resize the canvas to match.
	pub fn poll_resize(&mut self, now_ms: f64) -> Option<(f64, f64)> {
		let (width, height) = self.debounce.poll(now_ms)?;
		self.rebuild(width, height);
		Some((width, height))
	}

	/// Discards the population and creates a fresh one for the given size.
	pub fn rebuild(&mut self, width: f64, height: f64) {
		self.population = Population::new(&self.config, width, height, &mut self.rng);
		self.frames = 0;
		debug!(
			"ambient-particles: rebuilt {} particles for {}x{}",
			self.population.len(),
			width,
			height
		);
	}

	/// Advances every particle by one frame.
	pub fn tick(&mut self) {
		self.population.step(&self.config, self.pointer, &mut self.rng);
		self.frames += 1;
	}

	pub fn render<S: Surface + ?Sized>(&self, surface: &S) {
		render::render(surface, &self.config, &self.population);
	}
}
