use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, info};

use super::interpolator::{Counter, CounterPhase, CounterSpec};
use crate::components::timers::{SharedTimers, TimerId, Timers};

struct Shared {
	counter: RefCell<Counter>,
	frame: Cell<Option<TimerId>>,
	shown: RefCell<String>,
	sink: Box<dyn Fn(&str)>,
}

impl Shared {
	fn publish(&self) {
		let display = self.counter.borrow().display();
		if *self.shown.borrow() != display {
			(self.sink)(&display);
			*self.shown.borrow_mut() = display;
		}
	}
}

/// Frame-sampled driver around [`Counter`].
///
/// Every display change is pushed to the sink. Dropping or stopping the
/// animation cancels the pending frame in any phase.
pub struct CounterAnimation {
	timers: SharedTimers,
	shared: Rc<Shared>,
}

impl CounterAnimation {
	/// An idle animation; `sink` receives each new display string.
	pub fn new(timers: SharedTimers, spec: CounterSpec, sink: impl Fn(&str) + 'static) -> Self {
		let counter = Counter::new(spec);
		let shown = counter.display();
		Self {
			timers,
			shared: Rc::new(Shared {
				counter: RefCell::new(counter),
				frame: Cell::new(None),
				shown: RefCell::new(shown),
				sink: Box::new(sink),
			}),
		}
	}

	/// Feed a visibility report. Only the first `true` starts the count.
	pub fn on_visibility(&self, visible: bool) -> bool {
		if !visible {
			return false;
		}
		let now = self.timers.now_ms();
		if !self.shared.counter.borrow_mut().trigger(now) {
			return false;
		}
		info!("Counter started towards {}", self.shared.counter.borrow().spec().end());
		request_sample(&self.timers, &self.shared);
		true
	}

	/// Cancel the pending frame, freezing the display.
	pub fn stop(&self) {
		if let Some(id) = self.shared.frame.take() {
			self.timers.cancel(id);
			debug!("Counter frame cancelled");
		}
	}

	/// Phase of the underlying counter.
	pub fn phase(&self) -> CounterPhase {
		self.shared.counter.borrow().phase()
	}

	/// Last string pushed to the sink.
	pub fn display(&self) -> String {
		self.shared.shown.borrow().clone()
	}

	/// Eased value at the last sampled frame.
	pub fn current_value(&self) -> f64 {
		self.shared.counter.borrow().current_value()
	}
}

impl Drop for CounterAnimation {
	fn drop(&mut self) {
		self.stop();
	}
}

fn request_sample(timers: &SharedTimers, shared: &Rc<Shared>) {
	let weak_timers: Weak<dyn Timers> = Rc::downgrade(timers);
	let weak_shared = Rc::downgrade(shared);
	let id = timers.request_frame(Box::new(move || {
		let (Some(timers), Some(shared)) = (weak_timers.upgrade(), weak_shared.upgrade()) else {
			return;
		};
		shared.frame.set(None);
		let phase = shared.counter.borrow_mut().sample(timers.now_ms());
		shared.publish();
		match phase {
			CounterPhase::Running { .. } => request_sample(&timers, &shared),
			CounterPhase::Completed => info!("Counter completed at {}", shared.shown.borrow()),
			CounterPhase::Idle => {}
		}
	}));
	shared.frame.set(Some(id));
}
