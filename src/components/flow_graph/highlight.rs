//! Activation state to per-node / per-link view flags.

use super::types::FlowGraph;

/// How strongly a node is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Emphasis {
	/// Plain.
	#[default]
	Idle,
	/// Selected by the scheduler (sweep head or pulse).
	Current,
	/// Under the pointer.
	Hovered,
}

/// How one node is drawn this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeView {
	/// Drawn at full opacity rather than dimmed.
	pub revealed: bool,
	/// Highlight level.
	pub emphasis: Emphasis,
}

impl NodeView {
	/// Anything other than [`Emphasis::Idle`].
	pub fn is_emphasized(&self) -> bool {
		self.emphasis != Emphasis::Idle
	}
}

/// How one link is drawn this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkView {
	/// Part of the active path; carries a particle.
	pub active: bool,
	/// Drawn in the highlight color.
	pub emphasized: bool,
}

/// Snapshot of whatever drives a diagram, one variant per policy.
#[derive(Clone, Copy)]
pub enum Activation<'a> {
	/// Cumulative sweep over nodes and links.
	Sweep {
		/// Last node reached; every node up to it is revealed.
		active_index: usize,
		/// Last link reached; every link up to it is active.
		active_path_index: usize,
	},
	/// Idle pulse that a hovered node overrides.
	HoverOrPulse {
		/// Id of the node under the pointer.
		hovered: Option<&'a str>,
		/// Node the pulse currently rests on.
		pulse_index: usize,
	},
	/// Staggered reveal, looked up per link id.
	Reveal {
		/// Whether the link with this id is currently shown.
		is_revealed: &'a dyn Fn(&str) -> bool,
	},
}

/// Render-ready flags for one frame. Rebuilt from scratch on every call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightFrame {
	/// One entry per node, in node order.
	pub nodes: Vec<NodeView>,
	/// One entry per link, in activation order.
	pub links: Vec<LinkView>,
}

impl HighlightFrame {
	/// Flags for every node and link of `graph` under `activation`.
	pub fn derive(graph: &FlowGraph, activation: &Activation) -> Self {
		let nodes = graph
			.nodes()
			.iter()
			.enumerate()
			.map(|(i, node)| match *activation {
				Activation::Sweep { active_index, .. } => NodeView {
					revealed: i <= active_index,
					emphasis: if i == active_index {
						Emphasis::Current
					} else {
						Emphasis::Idle
					},
				},
				Activation::HoverOrPulse {
					hovered,
					pulse_index,
				} => NodeView {
					revealed: true,
					emphasis: match hovered {
						Some(id) if id == node.id => Emphasis::Hovered,
						None if i == pulse_index => Emphasis::Current,
						_ => Emphasis::Idle,
					},
				},
				Activation::Reveal { .. } => NodeView {
					revealed: true,
					emphasis: Emphasis::Idle,
				},
			})
			.collect();

		let links = graph
			.links()
			.iter()
			.map(|link| match *activation {
				Activation::Sweep {
					active_path_index, ..
				} => LinkView {
					active: link.order <= active_path_index,
					emphasized: link.order == active_path_index,
				},
				Activation::HoverOrPulse { hovered, .. } => LinkView {
					active: false,
					emphasized: hovered.is_some_and(|h| h == link.source || h == link.target),
				},
				Activation::Reveal { is_revealed } => {
					let on = is_revealed(&link.id);
					LinkView {
						active: on,
						emphasized: on,
					}
				}
			})
			.collect();

		Self { nodes, links }
	}

	/// Number of nodes drawn at full opacity.
	pub fn revealed_count(&self) -> usize {
		self.nodes.iter().filter(|n| n.revealed).count()
	}

	/// Indices of nodes drawn with any emphasis.
	pub fn emphasized_nodes(&self) -> Vec<usize> {
		self.nodes
			.iter()
			.enumerate()
			.filter(|(_, n)| n.is_emphasized())
			.map(|(i, _)| i)
			.collect()
	}

	/// Whether the link at `order` is on the active path.
	pub fn is_link_active(&self, order: usize) -> bool {
		self.links.get(order).is_some_and(|l| l.active)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_graph::types::{GraphData, GraphNode};

	fn tech_web() -> FlowGraph {
		let ids = ["react", "node", "python", "openai", "postgres", "aws", "tailwind", "docker"];
		let nodes = ids
			.iter()
			.enumerate()
			.map(|(i, id)| GraphNode::new(id, i as f64 * 10.0, 50.0, "", id))
			.collect();
		let data = GraphData::new(nodes, (100.0, 100.0))
			.link_unique("react", "node")
			.link_unique("node", "postgres")
			.link_unique("python", "openai")
			.link_unique("aws", "node");
		FlowGraph::new(data).unwrap()
	}

	fn sweep_chain(n: usize) -> FlowGraph {
		let nodes = (0..n)
			.map(|i| GraphNode::new(&format!("n{i}"), i as f64 * 100.0, 200.0, "", ""))
			.collect();
		let mut data = GraphData::new(nodes, (1200.0, 400.0));
		for i in 1..n {
			data = data.link(&format!("e{i}"), &format!("n{}", i - 1), &format!("n{i}"));
		}
		FlowGraph::new(data).unwrap()
	}

	#[test]
	fn sweep_reveals_cumulatively() {
		let graph = sweep_chain(6);
		for active_index in 0..6 {
			let frame = HighlightFrame::derive(
				&graph,
				&Activation::Sweep {
					active_index,
					active_path_index: active_index.min(4),
				},
			);
			assert_eq!(frame.revealed_count(), active_index + 1);
			assert_eq!(frame.emphasized_nodes(), vec![active_index]);
		}
	}

	#[test]
	fn sweep_path_index_drives_links() {
		let graph = sweep_chain(6);
		let frame = HighlightFrame::derive(
			&graph,
			&Activation::Sweep {
				active_index: 0,
				active_path_index: 2,
			},
		);
		let active: Vec<bool> = frame.links.iter().map(|l| l.active).collect();
		assert_eq!(active, vec![true, true, true, false, false]);
		let just_activated: Vec<usize> = frame
			.links
			.iter()
			.enumerate()
			.filter(|(_, l)| l.emphasized)
			.map(|(i, _)| i)
			.collect();
		assert_eq!(just_activated, vec![2]);
	}

	#[test]
	fn hover_overrides_pulse() {
		let graph = tech_web();
		let hovered = HighlightFrame::derive(
			&graph,
			&Activation::HoverOrPulse {
				hovered: Some("aws"),
				pulse_index: 2,
			},
		);
		assert_eq!(hovered.nodes[5].emphasis, Emphasis::Hovered);
		assert!(!hovered.nodes[2].is_emphasized());
		assert_eq!(hovered.emphasized_nodes(), vec![5]);

		let cleared = HighlightFrame::derive(
			&graph,
			&Activation::HoverOrPulse {
				hovered: None,
				pulse_index: 2,
			},
		);
		assert_eq!(cleared.nodes[2].emphasis, Emphasis::Current);
		assert_eq!(cleared.emphasized_nodes(), vec![2]);
	}

	#[test]
	fn hover_emphasizes_touching_links_only() {
		let graph = tech_web();
		let frame = HighlightFrame::derive(
			&graph,
			&Activation::HoverOrPulse {
				hovered: Some("node"),
				pulse_index: 2,
			},
		);
		let emphasized: Vec<&str> = graph
			.links()
			.iter()
			.zip(&frame.links)
			.filter(|(_, v)| v.emphasized)
			.map(|(l, _)| l.id.as_str())
			.collect();
		assert_eq!(emphasized, vec!["node-react", "node-postgres", "aws-node"]);
		assert!(frame.links.iter().all(|l| !l.active));
	}

	#[test]
	fn pulse_alone_never_touches_links() {
		let graph = tech_web();
		let frame = HighlightFrame::derive(
			&graph,
			&Activation::HoverOrPulse {
				hovered: None,
				pulse_index: 1,
			},
		);
		assert!(frame.links.iter().all(|l| !l.emphasized));
	}

	#[test]
	fn reveal_set_marks_links() {
		let graph = sweep_chain(4);
		let revealed = |id: &str| id == "e1" || id == "e3";
		let frame = HighlightFrame::derive(
			&graph,
			&Activation::Reveal {
				is_revealed: &revealed,
			},
		);
		assert!(frame.is_link_active(0));
		assert!(!frame.is_link_active(1));
		assert!(frame.is_link_active(2));
		assert!(!frame.is_link_active(7));
		assert_eq!(frame.revealed_count(), 4);
	}
}
