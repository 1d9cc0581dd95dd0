use crate::error::ConfigError;

/// Fast start, gentle landing. Maps 0 to 0 and 1 to 1.
pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Static description of a count-up display.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterSpec {
	end: f64,
	duration_ms: f64,
	prefix: String,
	suffix: String,
}

impl CounterSpec {
	/// Count from 0 to `end` over `duration_ms`, which must be positive.
	pub fn new(end: f64, duration_ms: f64) -> Result<Self, ConfigError> {
		if !duration_ms.is_finite() || duration_ms <= 0.0 {
			return Err(ConfigError::InvalidDuration(duration_ms));
		}
		Ok(Self {
			end,
			duration_ms,
			prefix: String::new(),
			suffix: String::new(),
		})
	}

	/// Text shown before the number.
	pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	/// Text shown after the number.
	pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
		self.suffix = suffix.into();
		self
	}

	/// Final value.
	pub fn end(&self) -> f64 {
		self.end
	}

	/// Length of the count.
	pub fn duration_ms(&self) -> f64 {
		self.duration_ms
	}

	/// Eased value after `elapsed_ms`, clamped between 0 and `end`.
	pub fn value_at(&self, elapsed_ms: f64) -> f64 {
		let t = (elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
		let value = self.end * ease_out_cubic(t);
		value.clamp(self.end.min(0.0), self.end.max(0.0))
	}

	/// `value` rounded to an integer and wrapped in the prefix and suffix.
	pub fn format(&self, value: f64) -> String {
		format!("{}{}{}", self.prefix, value.round() as i64, self.suffix)
	}
}

/// Where a [`Counter`] is in its single run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CounterPhase {
	/// Not yet visible.
	Idle,
	/// Counting up.
	Running {
		/// Clock reading at the trigger.
		started_at: f64,
	},
	/// Holding the final value.
	Completed,
}

/// One-shot count-up state machine: `Idle -> Running -> Completed`.
#[derive(Clone, Debug)]
pub struct Counter {
	spec: CounterSpec,
	phase: CounterPhase,
	elapsed_ms: f64,
}

impl Counter {
	/// An idle counter showing zero.
	pub fn new(spec: CounterSpec) -> Self {
		Self {
			spec,
			phase: CounterPhase::Idle,
			elapsed_ms: 0.0,
		}
	}

	/// Latch the start time. Only the first call while idle has any effect.
	pub fn trigger(&mut self, now: f64) -> bool {
		if self.phase != CounterPhase::Idle {
			return false;
		}
		self.phase = CounterPhase::Running { started_at: now };
		true
	}

	/// Advance to `now`; returns the phase after sampling.
	pub fn sample(&mut self, now: f64) -> CounterPhase {
		if let CounterPhase::Running { started_at } = self.phase {
			self.elapsed_ms = (now - started_at).clamp(0.0, self.spec.duration_ms);
			if self.elapsed_ms >= self.spec.duration_ms {
				self.phase = CounterPhase::Completed;
			}
		}
		self.phase
	}

	/// Phase as of the last sample.
	pub fn phase(&self) -> CounterPhase {
		self.phase
	}

	/// Whether the counter has left [`CounterPhase::Idle`].
	pub fn is_triggered(&self) -> bool {
		self.phase != CounterPhase::Idle
	}

	/// Time counted at the last sample, capped at the duration.
	pub fn elapsed_ms(&self) -> f64 {
		self.elapsed_ms
	}

	/// Eased value at the last sample.
	pub fn current_value(&self) -> f64 {
		self.spec.value_at(self.elapsed_ms)
	}

	/// [`Counter::current_value`] formatted for display.
	pub fn display(&self) -> String {
		self.spec.format(self.current_value())
	}

	/// What is being counted.
	pub fn spec(&self) -> &CounterSpec {
		&self.spec
	}
}
