//! Timing configuration for the animated components.
//!
//! Defaults are the timings the site's diagrams and metric cards ship with.

/// Cumulative sweep: one stage per tick, looping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepTiming {
	/// Time each stage stays current before the next joins it.
	pub interval_ms: u32,
	/// How long a marker takes to travel a newly active link.
	pub particle_ms: f64,
	/// Upward bulge of each link's curve, in view-box units.
	pub lift: f64,
}

impl Default for SweepTiming {
	fn default() -> Self {
		Self {
			interval_ms: 2000,
			particle_ms: 2000.0,
			lift: 50.0,
		}
	}
}

/// Staggered reveal: links light up one after another, then the cycle restarts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealTiming {
	/// Gap between one link lighting up and the next.
	pub step_delay_ms: u32,
	/// Time from one restart to the next; must exceed the full stagger.
	pub cycle_period_ms: u32,
	/// Travel time of the marker sent along each newly revealed link.
	pub particle_ms: f64,
}

impl Default for RevealTiming {
	fn default() -> Self {
		Self {
			step_delay_ms: 800,
			cycle_period_ms: 7000,
			particle_ms: 800.0,
		}
	}
}

/// Hover-or-pulse: an idle highlight walks the nodes until the pointer takes over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseTiming {
	/// Time the idle highlight rests on each node.
	pub interval_ms: u32,
}

impl Default for PulseTiming {
	fn default() -> Self {
		Self { interval_ms: 1500 }
	}
}

/// Default count-up length of a metric card.
pub const COUNTER_DURATION_MS: f64 = 2000.0;

/// Fraction of a metric card that must be on screen before it counts up.
pub const COUNTER_VISIBILITY_THRESHOLD: f64 = 0.5;
