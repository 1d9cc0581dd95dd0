use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::highlight::{Emphasis, NodeView};
use super::particle::CurveStyle;
use super::state::{DiagramFrame, DiagramState, FLOW_DASH, NODE_RADIUS};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

const ACCENT: &str = "rgba(59, 130, 246, 1)";
const PARTICLE_RADIUS: f64 = 4.0;

/// Draw one frame, with nodes above their links and particles.
pub fn render(state: &DiagramState, frame: &DiagramFrame, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_links(state, frame, ctx);
	draw_particles(state, frame, ctx);
	draw_nodes(state, frame, ctx);
	if state.is_sweep() {
		draw_progress(state, frame, ctx);
	}
}

fn trace_link(state: &DiagramState, order: usize, ctx: &CanvasRenderingContext2d) {
	let (from, to) = state.graph.link_points(order);
	let (x1, y1) = state.to_screen(from);
	let (x2, y2) = state.to_screen(to);
	ctx.begin_path();
	ctx.move_to(x1, y1);
	match state.curve() {
		Some(style) => {
			let (cx, cy) = state.to_screen(style.control_point(from, to));
			ctx.quadratic_curve_to(cx, cy, x2, y2);
		}
		None => ctx.line_to(x2, y2),
	}
}

fn draw_links(state: &DiagramState, frame: &DiagramFrame, ctx: &CanvasRenderingContext2d) {
	let dashed = matches!(state.curve(), Some(CurveStyle::Bend { .. }));
	for (order, view) in frame.highlight.links.iter().enumerate() {
		// Background track
		trace_link(state, order, ctx);
		ctx.set_stroke_style_str("rgba(255, 255, 255, 0.1)");
		ctx.set_line_width(1.5);
		if dashed {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(5.0),
				&JsValue::from_f64(5.0),
			));
		}
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		if !(view.active || view.emphasized) {
			continue;
		}
		let (alpha, width) = if view.emphasized { (1.0, 3.0) } else { (0.6, 2.0) };
		trace_link(state, order, ctx);
		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", alpha));
		ctx.set_line_width(width);
		if view.active {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(FLOW_DASH.0),
				&JsValue::from_f64(FLOW_DASH.1),
			));
			ctx.set_line_dash_offset(frame.flow_offset);
		}
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_line_dash_offset(0.0);
	}
}

fn draw_particles(state: &DiagramState, frame: &DiagramFrame, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(ACCENT);
	for particle in &frame.particles {
		let (x, y) = state.to_screen(particle.position);
		ctx.begin_path();
		let _ = ctx.arc(x, y, PARTICLE_RADIUS, 0.0, 2.0 * PI);
		ctx.fill();
	}
}

fn node_style(view: &NodeView) -> (f64, f64) {
	// (alpha, scale)
	match (view.revealed, view.emphasis) {
		(_, Emphasis::Hovered) => (1.0, 1.2),
		(_, Emphasis::Current) => (1.0, 1.1),
		(true, Emphasis::Idle) => (1.0, 1.0),
		(false, Emphasis::Idle) => (0.3, 0.8),
	}
}

fn draw_glow(ctx: &CanvasRenderingContext2d, at: (f64, f64), radius: f64, alpha: f64) {
	let (x, y) = at;
	let glow_radius = radius * 1.8;
	let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.5, x, y, glow_radius) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, &format!("rgba(120, 160, 255, {})", alpha));
	let _ = gradient.add_color_stop(1.0, "rgba(120, 160, 255, 0)");
	ctx.begin_path();
	let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

fn draw_nodes(state: &DiagramState, frame: &DiagramFrame, ctx: &CanvasRenderingContext2d) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for (node, view) in state.graph.nodes().iter().zip(&frame.highlight.nodes) {
		let (x, y) = state.to_screen(node.position);
		let (alpha, scale) = node_style(view);
		let radius = NODE_RADIUS * scale;
		if view.is_emphasized() {
			let glow = if view.emphasis == Emphasis::Hovered { 0.5 } else { 0.3 };
			draw_glow(ctx, (x, y), radius, glow);
		}

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str("#24243e");
		ctx.fill();
		let color = node
			.group
			.map(|g| COLORS[g as usize % COLORS.len()])
			.unwrap_or(COLORS[0]);
		let ring = if view.revealed && view.is_emphasized() { ACCENT } else { color };
		ctx.set_stroke_style_str(ring);
		ctx.set_line_width(2.0);
		ctx.stroke();

		ctx.set_font(&format!("{}px sans-serif", (radius * 0.8).round()));
		ctx.set_fill_style_str("white");
		let _ = ctx.fill_text(&node.icon, x, y);

		ctx.set_font("11px sans-serif");
		let label = if view.is_emphasized() { "white" } else { "rgba(255, 255, 255, 0.7)" };
		ctx.set_fill_style_str(label);
		let _ = ctx.fill_text(&node.label, x, y + radius + 12.0);
		ctx.set_global_alpha(1.0);
	}
}

/// One pill per stage along the bottom, wide once revealed.
fn draw_progress(state: &DiagramState, frame: &DiagramFrame, ctx: &CanvasRenderingContext2d) {
	let (gap, height) = (6.0, 4.0);
	let widths: Vec<f64> = frame
		.highlight
		.nodes
		.iter()
		.map(|n| if n.revealed { 28.0 } else { 14.0 })
		.collect();
	let total = widths.iter().sum::<f64>() + gap * widths.len().saturating_sub(1) as f64;
	let mut x = (state.width - total) / 2.0;
	let y = state.height - 16.0;
	for (width, node) in widths.iter().zip(&frame.highlight.nodes) {
		ctx.set_fill_style_str(if node.revealed { ACCENT } else { "rgba(255, 255, 255, 0.3)" });
		ctx.fill_rect(x, y, *width, height);
		x += width + gap;
	}
}
