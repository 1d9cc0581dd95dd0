//! Timer host seam shared by every scheduler.
//!
//! Schedulers never touch `window` directly. They register callbacks through
//! [`Timers`] and keep the returned [`TimerId`] so teardown can cancel them.
//! [`BrowserTimers`] backs the running app, [`ManualClock`] simulates time.

mod browser;
mod manual;

use std::rc::Rc;

pub use browser::BrowserTimers;
pub use manual::{FRAME_MS, ManualClock};

/// Shared handle to the timer host owned by a mounted component.
pub type SharedTimers = Rc<dyn Timers>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum TimerKind {
	Timeout,
	Interval,
	Frame,
}

/// Handle for a registered callback, used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId {
	kind: TimerKind,
	raw: i32,
	key: u32,
}

impl TimerId {
	pub(crate) fn new(kind: TimerKind, raw: i32, key: u32) -> Self {
		Self { kind, raw, key }
	}

	pub(crate) fn kind(&self) -> TimerKind {
		self.kind
	}

	pub(crate) fn raw(&self) -> i32 {
		self.raw
	}

	pub(crate) fn key(&self) -> u32 {
		self.key
	}
}

/// Cooperative, single-threaded callback registration.
///
/// Callbacks run one at a time on the owning event loop. A cancelled callback
/// never runs, and cancelling an id that already fired is a no-op.
pub trait Timers {
	/// Current time in milliseconds, monotonic for the lifetime of the host.
	fn now_ms(&self) -> f64;

	/// Run `callback` once after `delay_ms`.
	fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId;

	/// Run `callback` every `period_ms` until cancelled.
	fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerId;

	/// Run `callback` before the next repaint.
	fn request_frame(&self, callback: Box<dyn FnOnce()>) -> TimerId;

	/// Cancel a pending callback.
	fn cancel(&self, id: TimerId);
}
