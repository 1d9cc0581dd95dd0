//! Scheduler-driven flow diagrams drawn on a canvas.

mod component;
mod cycle;
mod highlight;
mod particle;
mod render;
mod reveal;
mod state;
mod types;

pub use component::FlowDiagramCanvas;
pub use cycle::CycleScheduler;
pub use highlight::{Activation, Emphasis, HighlightFrame, LinkView, NodeView};
pub use particle::{CurveStyle, Particle, ParticleMotion, quadratic_bezier};
pub use reveal::StaggeredReveal;
pub use state::{
	Diagram, DiagramFrame, DiagramKind, DiagramState, FLOW_DASH, HIT_RADIUS, NODE_RADIUS,
	REVEAL_CURVE, ViewTransform, flow_offset,
};
pub use types::{FlowGraph, GraphData, GraphLink, GraphNode, Point};
