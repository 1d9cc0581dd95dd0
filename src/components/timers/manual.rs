use std::cell::RefCell;
use std::collections::HashMap;

use super::{TimerId, TimerKind, Timers};

/// Simulated frame spacing (~60fps).
pub const FRAME_MS: u32 = 16;

enum Callback {
	Once(Box<dyn FnOnce()>),
	Repeat(Box<dyn FnMut()>),
}

struct Pending {
	due: f64,
	seq: u64,
	period: Option<f64>,
	// Taken out while the callback runs so the clock is not borrowed.
	callback: Option<Callback>,
}

#[derive(Default)]
struct ClockState {
	now: f64,
	next_seq: u64,
	next_key: u32,
	pending: HashMap<u32, Pending>,
}

impl ClockState {
	fn register(
		&mut self,
		kind: TimerKind,
		delay: f64,
		period: Option<f64>,
		callback: Callback,
	) -> TimerId {
		let key = self.next_key;
		self.next_key += 1;
		let seq = self.next_seq;
		self.next_seq += 1;
		self.pending.insert(
			key,
			Pending {
				due: self.now + delay,
				seq,
				period,
				callback: Some(callback),
			},
		);
		TimerId::new(kind, key as i32, key)
	}

	fn next_due(&self, until: f64) -> Option<u32> {
		self.pending
			.iter()
			.filter(|(_, p)| p.callback.is_some() && p.due <= until)
			.min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
			.map(|(&key, _)| key)
	}
}

/// Deterministic timer host driven by [`ManualClock::advance`].
///
/// Due callbacks fire in (due time, registration order) order, one at a time,
/// with [`Timers::now_ms`] reporting the callback's own due time. Frames are
/// plain timeouts spaced [`FRAME_MS`] apart.
#[derive(Default)]
pub struct ManualClock {
	state: RefCell<ClockState>,
}

impl ManualClock {
	/// A clock at t=0 with nothing scheduled.
	pub fn new() -> Self {
		Self::default()
	}

	/// Move time forward by `ms`, firing everything that comes due.
	pub fn advance(&self, ms: f64) {
		let target = self.state.borrow().now + ms;
		self.advance_to(target);
	}

	/// Move time forward to the absolute instant `target`.
	pub fn advance_to(&self, target: f64) {
		loop {
			let fired = {
				let mut state = self.state.borrow_mut();
				let Some(key) = state.next_due(target) else {
					break;
				};
				let due = state.pending[&key].due;
				state.now = state.now.max(due);
				let callback = if state.pending[&key].period.is_some() {
					state.pending.get_mut(&key).and_then(|p| p.callback.take())
				} else {
					state.pending.remove(&key).and_then(|p| p.callback)
				};
				callback.map(|callback| (key, callback))
			};

			match fired {
				Some((_, Callback::Once(callback))) => callback(),
				Some((key, Callback::Repeat(mut callback))) => {
					callback();
					let mut state = self.state.borrow_mut();
					let seq = state.next_seq;
					state.next_seq += 1;
					// Cleared from inside its own callback: drop it here.
					if let Some(pending) = state.pending.get_mut(&key) {
						pending.due += pending.period.unwrap_or(1.0);
						pending.seq = seq;
						pending.callback = Some(Callback::Repeat(callback));
					}
				}
				None => break,
			}
		}
		let mut state = self.state.borrow_mut();
		state.now = state.now.max(target);
	}

	/// Number of registrations that have not fired (one-shots) or been cancelled.
	pub fn pending(&self) -> usize {
		self.state.borrow().pending.len()
	}
}

impl Timers for ManualClock {
	fn now_ms(&self) -> f64 {
		self.state.borrow().now
	}

	fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
		self.state
			.borrow_mut()
			.register(TimerKind::Timeout, delay_ms as f64, None, Callback::Once(callback))
	}

	fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerId {
		let period = period_ms.max(1) as f64;
		self.state.borrow_mut().register(
			TimerKind::Interval,
			period,
			Some(period),
			Callback::Repeat(callback),
		)
	}

	fn request_frame(&self, callback: Box<dyn FnOnce()>) -> TimerId {
		self.state
			.borrow_mut()
			.register(TimerKind::Frame, FRAME_MS as f64, None, Callback::Once(callback))
	}

	fn cancel(&self, id: TimerId) {
		self.state.borrow_mut().pending.remove(&id.key());
	}
}
