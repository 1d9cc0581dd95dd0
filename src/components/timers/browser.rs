use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::{TimerId, TimerKind, Timers};

struct LiveTimer {
	id: TimerId,
	_closure: Closure<dyn FnMut()>,
}

type LiveTimers = RefCell<HashMap<u32, LiveTimer>>;

/// [`Timers`] backed by `window.setTimeout`, `setInterval` and
/// `requestAnimationFrame`.
///
/// The host owns every `Closure` it hands to JS until the callback fires
/// (one-shots) or is cancelled, so nothing is leaked with `forget`.
pub struct BrowserTimers {
	window: Window,
	live: Rc<LiveTimers>,
	next_key: Cell<u32>,
}

impl BrowserTimers {
	/// Wrap the current window, if there is one.
	pub fn new() -> Option<Self> {
		Some(Self {
			window: web_sys::window()?,
			live: Rc::new(RefCell::new(HashMap::new())),
			next_key: Cell::new(0),
		})
	}

	fn next_key(&self) -> u32 {
		let key = self.next_key.get();
		self.next_key.set(key.wrapping_add(1));
		key
	}

	fn once_closure(
		live: Weak<LiveTimers>,
		key: u32,
		callback: Box<dyn FnOnce()>,
	) -> Closure<dyn FnMut()> {
		let mut callback = Some(callback);
		Closure::new(move || {
			let Some(callback) = callback.take() else {
				return;
			};
			// Dropping a closure while JS is inside it is deferred by wasm-bindgen.
			if let Some(live) = live.upgrade() {
				let _ = live.borrow_mut().remove(&key);
			}
			callback();
		})
	}

	fn register(
		&self,
		kind: TimerKind,
		key: u32,
		closure: Closure<dyn FnMut()>,
		raw: Result<i32, JsValue>,
	) -> TimerId {
		match raw {
			Ok(raw) => {
				let id = TimerId::new(kind, raw, key);
				self.live.borrow_mut().insert(
					key,
					LiveTimer {
						id,
						_closure: closure,
					},
				);
				id
			}
			Err(err) => {
				error!("Failed to register {:?} timer: {:?}", kind, err);
				TimerId::new(kind, -1, key)
			}
		}
	}
}

impl Timers for BrowserTimers {
	fn now_ms(&self) -> f64 {
		self.window
			.performance()
			.map(|p| p.now())
			.unwrap_or_else(js_sys::Date::now)
	}

	fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
		let key = self.next_key();
		let closure = Self::once_closure(Rc::downgrade(&self.live), key, callback);
		let raw = self
			.window
			.set_timeout_with_callback_and_timeout_and_arguments_0(
				closure.as_ref().unchecked_ref(),
				delay_ms.min(i32::MAX as u32) as i32,
			);
		self.register(TimerKind::Timeout, key, closure, raw)
	}

	fn set_interval(&self, period_ms: u32, mut callback: Box<dyn FnMut()>) -> TimerId {
		let key = self.next_key();
		let closure: Closure<dyn FnMut()> = Closure::new(move || callback());
		let raw = self
			.window
			.set_interval_with_callback_and_timeout_and_arguments_0(
				closure.as_ref().unchecked_ref(),
				period_ms.clamp(1, i32::MAX as u32) as i32,
			);
		self.register(TimerKind::Interval, key, closure, raw)
	}

	fn request_frame(&self, callback: Box<dyn FnOnce()>) -> TimerId {
		let key = self.next_key();
		let closure = Self::once_closure(Rc::downgrade(&self.live), key, callback);
		let raw = self
			.window
			.request_animation_frame(closure.as_ref().unchecked_ref());
		self.register(TimerKind::Frame, key, closure, raw)
	}

	fn cancel(&self, id: TimerId) {
		let removed = self.live.borrow_mut().remove(&id.key());
		if let Some(live) = removed {
			self.clear(live.id);
		}
	}
}

impl BrowserTimers {
	fn clear(&self, id: TimerId) {
		match id.kind() {
			TimerKind::Timeout => self.window.clear_timeout_with_handle(id.raw()),
			TimerKind::Interval => self.window.clear_interval_with_handle(id.raw()),
			TimerKind::Frame => {
				let _ = self.window.cancel_animation_frame(id.raw());
			}
		}
	}
}

impl Drop for BrowserTimers {
	fn drop(&mut self) {
		let live: Vec<LiveTimer> = self.live.borrow_mut().drain().map(|(_, t)| t).collect();
		if !live.is_empty() {
			debug!("Cancelling {} callbacks left on a dropped timer host", live.len());
		}
		for timer in live {
			self.clear(timer.id);
		}
	}
}
