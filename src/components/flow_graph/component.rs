use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{error, info};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::state::{Diagram, DiagramState};
use crate::components::timers::{BrowserTimers, SharedTimers, TimerId};

type StateSlot = Rc<RefCell<Option<DiagramState>>>;

/// Teardown handles for one mounted canvas.
#[derive(Default)]
struct Mounted {
	timers: Option<SharedTimers>,
	frame: Rc<Cell<Option<TimerId>>>,
	resize_cb: Option<Closure<dyn FnMut()>>,
}

/// Canvas that draws `diagram` and runs its animation while mounted.
///
/// Unset dimensions follow the parent element and track window resizes.
#[component]
pub fn FlowDiagramCanvas(
	/// Validated content and the policy that animates it.
	diagram: Diagram,
	/// Fixed canvas width in pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed canvas height in pixels.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: StateSlot = Rc::new(RefCell::new(None));
	let mounted: Rc<RefCell<Mounted>> = Rc::new(RefCell::new(Mounted::default()));
	let (state_init, mounted_init) = (state.clone(), mounted.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(timers) = BrowserTimers::new() else {
			error!("No window; diagram left static");
			return;
		};
		let timers: SharedTimers = Rc::new(timers);

		let (w, h) = canvas_size(&canvas, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				error!("Canvas 2d context unavailable");
				return;
			}
		};

		let diagram_state = match DiagramState::new(diagram.clone(), timers.clone(), w, h) {
			Ok(s) => s,
			Err(err) => {
				error!("Diagram failed to mount: {}", err);
				return;
			}
		};
		diagram_state.start();
		info!(
			"Diagram mounted with {} nodes, {} links",
			diagram_state.graph.node_count(),
			diagram_state.graph.link_count()
		);
		*state_init.borrow_mut() = Some(diagram_state);

		let mut m = mounted_init.borrow_mut();
		if width.is_none() || height.is_none() {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			let cb: Closure<dyn FnMut()> = Closure::new(move || {
				let (nw, nh) = canvas_size(&canvas_resize, width, height);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			});
			if let Some(window) = web_sys::window() {
				let _ = window
					.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			m.resize_cb = Some(cb);
		}
		schedule_frame(&timers, Rc::downgrade(&state_init), ctx, m.frame.clone());
		m.timers = Some(timers);
	});

	let cleanup = SendWrapper::new((state.clone(), mounted.clone()));
	on_cleanup(move || {
		let (state, mounted) = &*cleanup;
		let mut m = mounted.borrow_mut();
		if let (Some(timers), Some(id)) = (m.timers.as_ref(), m.frame.take()) {
			timers.cancel(id);
		}
		if let (Some(cb), Some(window)) = (m.resize_cb.take(), web_sys::window()) {
			let _ = window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		// Dropping the state stops its scheduler; dropping the host clears the rest.
		if let Some(s) = state.borrow_mut().take() {
			s.stop();
		}
		m.timers = None;
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let hovered = s.node_at_position(x, y);
			s.set_hover(hovered);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.set_hover(None);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="flow-diagram-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block; width: 100%; height: 100%; cursor: pointer;"
		/>
	}
}

fn canvas_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.filter(|w| *w > 0.0)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.filter(|h| *h > 0.0)
				.unwrap_or(400.0)
		}),
	)
}

fn schedule_frame(
	timers: &SharedTimers,
	state: Weak<RefCell<Option<DiagramState>>>,
	ctx: CanvasRenderingContext2d,
	slot: Rc<Cell<Option<TimerId>>>,
) {
	let host = Rc::downgrade(timers);
	let next_slot = slot.clone();
	let id = timers.request_frame(Box::new(move || {
		next_slot.set(None);
		let (Some(timers), Some(state)) = (host.upgrade(), state.upgrade()) else {
			return;
		};
		{
			let guard = state.borrow();
			let Some(s) = guard.as_ref() else {
				return;
			};
			let frame = s.frame(timers.now_ms());
			render::render(s, &frame, &ctx);
		}
		schedule_frame(&timers, Rc::downgrade(&state), ctx, next_slot);
	}));
	slot.set(Some(id));
}
