//! Resize debouncing.
//!
//! Every resize event pushes the deadline back; the population is rebuilt only
//! once the window has been quiet for the configured delay, using the size
//! from the last event.

/// A canvas size waiting to be applied.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Pending {
	width: f64,
	height: f64,
	deadline: f64,
}

/// Cancel-and-restart debounce over millisecond timestamps.
#[derive(Clone, Debug, Default)]
pub struct ResizeDebounce {
	delay_ms: f64,
	pending: Option<Pending>,
}

impl ResizeDebounce {
	pub fn new(delay_ms: f64) -> Self {
		Self {
			delay_ms,
			pending: None,
		}
	}

	/// Records a resize at `now_ms`, replacing any pending one.
	pub fn trigger(&mut self, width: f64, height: f64, now_ms: f64) {
		self.pending = Some(Pending {
			width,
			height,
			deadline: now_ms + self.delay_ms,
		});
	}

	/// Returns the pending size once its quiet period has elapsed.
	pub fn poll(&mut self, now_ms: f64) -> Option<(f64, f64)> {
		match self.pending {
			Some(p) if now_ms >= p.deadline => {
				self.pending = None;
				Some((p.width, p.height))
			}
			_ => None,
		}
	}

	pub fn cancel(&mut self) {
		self.pending = None;
	}
}
