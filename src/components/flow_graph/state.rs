use super::cycle::{CycleScheduler, check_stage_counts};
use super::highlight::{Activation, HighlightFrame};
use super::particle::{CurveStyle, Particle, ParticleMotion};
use super::reveal::{StaggeredReveal, check_timing};
use super::types::{FlowGraph, GraphData, Point};
use crate::components::timers::SharedTimers;
use crate::config::{PulseTiming, RevealTiming, SweepTiming};
use crate::error::ConfigError;

/// Radius of a node circle, in pixels.
pub const NODE_RADIUS: f64 = 26.0;
/// Pointer distance from a node center that still counts as hovering it.
pub const HIT_RADIUS: f64 = 32.0;

/// Bend used by staggered-reveal links.
pub const REVEAL_CURVE: CurveStyle = CurveStyle::Bend {
	offset: 8.0,
	steep_threshold: 10.0,
};

/// Which activation policy drives a diagram, with its timing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiagramKind {
	/// Stages light up one per tick and stay lit until the loop wraps.
	Sweep(SweepTiming),
	/// Links appear one after another, then the set clears and restarts.
	Reveal(RevealTiming),
	/// An idle pulse walks the nodes; hovering a node shows its neighbours.
	HoverPulse(PulseTiming),
}

impl DiagramKind {
	fn validate(&self, graph: &FlowGraph) -> Result<(), ConfigError> {
		match self {
			DiagramKind::Sweep(_) => check_stage_counts(&[graph.node_count(), graph.link_count()]),
			DiagramKind::Reveal(timing) => check_timing(graph.link_count(), *timing),
			DiagramKind::HoverPulse(_) => check_stage_counts(&[graph.node_count()]),
		}
	}
}

/// Validated content plus the policy that animates it.
#[derive(Clone, Debug)]
pub struct Diagram {
	graph: FlowGraph,
	kind: DiagramKind,
}

impl Diagram {
	/// Everything a mounted diagram could reject is checked here, before any
	/// timer exists.
	pub fn new(data: GraphData, kind: DiagramKind) -> Result<Self, ConfigError> {
		let graph = FlowGraph::new(data)?;
		kind.validate(&graph)?;
		Ok(Self { graph, kind })
	}

	/// The validated content.
	pub fn graph(&self) -> &FlowGraph {
		&self.graph
	}

	/// The policy and timing that animate it.
	pub fn kind(&self) -> DiagramKind {
		self.kind
	}
}

/// Maps the view box onto the canvas, centred and aspect-preserving.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	/// Horizontal offset in pixels.
	pub x: f64,
	/// Vertical offset in pixels.
	pub y: f64,
	/// Pixels per view-box unit.
	pub k: f64,
}

impl ViewTransform {
	/// Largest scale that shows the whole view box inside `width` x `height`.
	pub fn fit(view_box: (f64, f64), width: f64, height: f64) -> Self {
		let (vw, vh) = view_box;
		let k = (width / vw).min(height / vh).max(f64::EPSILON);
		Self {
			x: (width - vw * k) / 2.0,
			y: (height - vh * k) / 2.0,
			k,
		}
	}
}

/// What the pointer is over.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	/// Id of the hovered node.
	pub node: Option<String>,
}

enum Driver {
	Sweep {
		cycle: CycleScheduler,
		interval_ms: u32,
	},
	Reveal(StaggeredReveal),
	HoverPulse {
		pulse: CycleScheduler,
		interval_ms: u32,
	},
}

/// Dash and gap of the flowing stroke on active links, in pixels.
pub const FLOW_DASH: (f64, f64) = (8.0, 4.0);

const FLOW_SPEED: f64 = 30.0;

/// Dash offset that makes active links appear to flow from source to target.
/// Always in `(-period, 0]` where `period` is dash plus gap.
pub fn flow_offset(now_ms: f64) -> f64 {
	let period = FLOW_DASH.0 + FLOW_DASH.1;
	-((now_ms / 1000.0 * FLOW_SPEED) % period)
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, Default)]
pub struct DiagramFrame {
	/// Per-node and per-link flags.
	pub highlight: HighlightFrame,
	/// Markers still travelling along their links.
	pub particles: Vec<Particle>,
	/// Line-dash offset for active links, see [`flow_offset`].
	pub flow_offset: f64,
}

/// Per-instance state of a mounted diagram: scheduler, hover, particles and
/// the screen mapping. Dropping it stops every timer it registered.
pub struct DiagramState {
	/// The content being drawn.
	pub graph: FlowGraph,
	/// Node under the pointer, if any.
	pub hover: HoverState,
	/// Current view-box to canvas mapping.
	pub transform: ViewTransform,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	driver: Driver,
	particles: Option<ParticleMotion>,
}

impl DiagramState {
	/// Build the driver for `diagram` on `timers`, fitted to the canvas.
	/// Nothing ticks until [`DiagramState::start`].
	pub fn new(
		diagram: Diagram,
		timers: SharedTimers,
		width: f64,
		height: f64,
	) -> Result<Self, ConfigError> {
		let Diagram { graph, kind } = diagram;
		let links = graph.link_count();
		let (driver, particles) = match kind {
			DiagramKind::Sweep(timing) => (
				Driver::Sweep {
					cycle: CycleScheduler::with_lanes(timers, &[graph.node_count(), links])?,
					interval_ms: timing.interval_ms,
				},
				Some(ParticleMotion::new(
					timing.particle_ms,
					CurveStyle::Lift {
						height: timing.lift,
					},
				)),
			),
			DiagramKind::Reveal(timing) => (
				Driver::Reveal(StaggeredReveal::new(timers, &graph, timing)?),
				Some(ParticleMotion::new(timing.particle_ms, REVEAL_CURVE)),
			),
			DiagramKind::HoverPulse(timing) => (
				Driver::HoverPulse {
					pulse: CycleScheduler::new(timers, graph.node_count())?,
					interval_ms: timing.interval_ms,
				},
				None,
			),
		};

		Ok(Self {
			transform: ViewTransform::fit(graph.view_box(), width, height),
			graph,
			hover: HoverState::default(),
			width,
			height,
			driver,
			particles,
		})
	}

	/// Register the driver's timers.
	pub fn start(&self) {
		match &self.driver {
			Driver::Sweep { cycle, interval_ms } => cycle.start(*interval_ms),
			Driver::Reveal(reveal) => reveal.start(),
			Driver::HoverPulse { pulse, interval_ms } => pulse.start(*interval_ms),
		}
	}

	/// Cancel the driver's timers. Idempotent.
	pub fn stop(&self) {
		match &self.driver {
			Driver::Sweep { cycle, .. } => cycle.stop(),
			Driver::Reveal(reveal) => reveal.stop(),
			Driver::HoverPulse { pulse, .. } => pulse.stop(),
		}
	}

	/// Flags for the current scheduler state and hover, derived fresh.
	pub fn highlight(&self) -> HighlightFrame {
		match &self.driver {
			Driver::Sweep { cycle, .. } => HighlightFrame::derive(
				&self.graph,
				&Activation::Sweep {
					active_index: cycle.lane_index(0),
					active_path_index: cycle.lane_index(1),
				},
			),
			Driver::Reveal(reveal) => {
				let is_revealed = |id: &str| reveal.is_revealed(id);
				HighlightFrame::derive(
					&self.graph,
					&Activation::Reveal {
						is_revealed: &is_revealed,
					},
				)
			}
			Driver::HoverPulse { pulse, .. } => HighlightFrame::derive(
				&self.graph,
				&Activation::HoverOrPulse {
					hovered: self.hover.node.as_deref(),
					pulse_index: pulse.active_index(),
				},
			),
		}
	}

	/// When each link went active, by link order, as recorded by the driver.
	fn activations(&self) -> Vec<Option<f64>> {
		match &self.driver {
			Driver::Sweep { cycle, .. } => (0..self.graph.link_count())
				.map(|order| cycle.entered_at(1, order))
				.collect(),
			Driver::Reveal(reveal) => self
				.graph
				.links()
				.iter()
				.map(|link| reveal.revealed_at(&link.id))
				.collect(),
			Driver::HoverPulse { .. } => Vec::new(),
		}
	}

	/// Everything drawn at `now`. Depends only on scheduler state, hover and
	/// `now`, never on when earlier frames were drawn.
	pub fn frame(&self, now: f64) -> DiagramFrame {
		let particles = match &self.particles {
			Some(motion) => motion.particles(&self.graph, &self.activations(), now),
			None => Vec::new(),
		};
		DiagramFrame {
			highlight: self.highlight(),
			particles,
			flow_offset: flow_offset(now),
		}
	}

	/// Curve shape for links, if this diagram draws them curved.
	pub fn curve(&self) -> Option<CurveStyle> {
		self.particles.as_ref().map(|p| p.style())
	}

	/// Whether nodes are drawn as sweep stages.
	pub fn is_sweep(&self) -> bool {
		matches!(self.driver, Driver::Sweep { .. })
	}

	/// Hovering a sweep node jumps the sweep to it; on hover-pulse diagrams it
	/// overrides the pulse.
	pub fn set_hover(&mut self, node: Option<usize>) {
		let id = node.and_then(|i| self.graph.nodes().get(i)).map(|n| n.id.clone());
		if self.hover.node == id {
			return;
		}
		if let (Driver::Sweep { cycle, .. }, Some(i)) = (&self.driver, node) {
			cycle.seek(i);
		}
		self.hover.node = id;
	}

	/// Canvas pixel position of a view-box point.
	pub fn to_screen(&self, p: Point) -> (f64, f64) {
		(
			self.transform.x + p.x * self.transform.k,
			self.transform.y + p.y * self.transform.k,
		)
	}

	/// Inverse of [`DiagramState::to_screen`].
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Nodes are drawn at a fixed pixel size, so hits are tested on screen.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		self.graph
			.nodes()
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let (x, y) = self.to_screen(node.position);
				(i, (x - sx).hypot(y - sy))
			})
			.filter(|&(_, d)| d < HIT_RADIUS)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i)
	}

	/// Refit the view box after the canvas changed size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.transform = ViewTransform::fit(self.graph.view_box(), width, height);
	}
}

impl Drop for DiagramState {
	fn drop(&mut self) {
		self.stop();
	}
}
