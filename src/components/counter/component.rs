use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::animation::CounterAnimation;
use super::interpolator::CounterSpec;
use crate::components::timers::BrowserTimers;
use crate::config::{COUNTER_DURATION_MS, COUNTER_VISIBILITY_THRESHOLD};
use crate::error::ConfigError;

type VisibilityCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

struct Watch {
	observer: IntersectionObserver,
	_callback: VisibilityCallback,
}

/// A headline number that counts up from zero once half of it is on screen.
///
/// A non-positive `duration_ms` renders as an error for the nearest
/// `ErrorBoundary`.
#[component]
pub fn MetricCard(
	/// Number the card counts up to.
	value: f64,
	/// Caption under the number.
	#[prop(into)]
	label: String,
	/// Text before the number, such as a currency sign.
	#[prop(into, optional)]
	prefix: String,
	/// Text after the number, such as a unit.
	#[prop(into, optional)]
	suffix: String,
	/// Length of the count-up.
	#[prop(default = COUNTER_DURATION_MS)]
	duration_ms: f64,
) -> impl IntoView {
	let spec: Result<CounterSpec, ConfigError> =
		CounterSpec::new(value, duration_ms).map(|spec| spec.prefix(prefix).suffix(suffix));
	spec.map(|spec| counting_card(spec, label))
}

fn counting_card(spec: CounterSpec, label: String) -> impl IntoView {
	let display = RwSignal::new(spec.format(0.0));
	let card_ref = NodeRef::<leptos::html::Div>::new();
	let animation: Rc<RefCell<Option<CounterAnimation>>> = Rc::new(RefCell::new(None));
	let watch: Rc<RefCell<Option<Watch>>> = Rc::new(RefCell::new(None));
	let (animation_init, watch_init) = (animation.clone(), watch.clone());

	Effect::new(move |_| {
		let Some(card) = card_ref.get() else {
			return;
		};
		if animation_init.borrow().is_some() {
			return;
		}
		let Some(timers) = BrowserTimers::new() else {
			return;
		};
		*animation_init.borrow_mut() = Some(CounterAnimation::new(
			Rc::new(timers),
			spec.clone(),
			move |shown| display.set(shown.to_string()),
		));

		let animation_cb = animation_init.clone();
		let callback: VisibilityCallback =
			Closure::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
				let visible = entries
					.iter()
					.filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
					.any(|entry| entry.is_intersecting());
				let started = animation_cb
					.borrow()
					.as_ref()
					.is_some_and(|animation| animation.on_visibility(visible));
				if started {
					observer.disconnect();
				}
			});
		let options = IntersectionObserverInit::new();
		options.set_threshold(&JsValue::from_f64(COUNTER_VISIBILITY_THRESHOLD));
		match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
			Ok(observer) => {
				observer.observe(&card);
				*watch_init.borrow_mut() = Some(Watch {
					observer,
					_callback: callback,
				});
			}
			Err(err) => error!("IntersectionObserver unavailable: {:?}", err),
		}
	});

	let cleanup = SendWrapper::new((animation, watch));
	on_cleanup(move || {
		let (animation, watch) = &*cleanup;
		if let Some(watch) = watch.borrow_mut().take() {
			watch.observer.disconnect();
		}
		if let Some(animation) = animation.borrow_mut().take() {
			animation.stop();
		}
	});

	view! {
		<div node_ref=card_ref class="metric-card">
			<span class="metric-value">{move || display.get()}</span>
			<span class="metric-label">{label}</span>
		</div>
	}
}
