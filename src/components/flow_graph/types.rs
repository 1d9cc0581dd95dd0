use std::collections::{HashMap, HashSet};

use crate::error::ConfigError;

/// A position in the diagram's own coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal, growing rightward.
	pub x: f64,
	/// Vertical, growing downward.
	pub y: f64,
}

impl Point {
	/// A point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Point halfway between `self` and `other`.
	pub fn midpoint(self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		(other.x - self.x).hypot(other.y - self.y)
	}
}

/// A labelled stage drawn as a circle with an icon.
#[derive(Clone, Debug)]
pub struct GraphNode {
	/// Unique within its diagram; links refer to nodes by this id.
	pub id: String,
	/// Center, in view-box units.
	pub position: Point,
	/// Caption drawn under the node.
	pub label: String,
	/// Glyph drawn inside the circle, usually an emoji.
	pub icon: String,
	/// Palette slot; ungrouped nodes use the first color.
	pub group: Option<u32>,
}

impl GraphNode {
	/// An ungrouped node at `(x, y)`.
	pub fn new(id: &str, x: f64, y: f64, icon: &str, label: &str) -> Self {
		Self {
			id: id.into(),
			position: Point::new(x, y),
			label: label.into(),
			icon: icon.into(),
			group: None,
		}
	}

	/// Assign the node to palette slot `group`.
	pub fn with_group(mut self, group: u32) -> Self {
		self.group = Some(group);
		self
	}
}

/// A directed connection between two nodes.
#[derive(Clone, Debug)]
pub struct GraphLink {
	/// Unique within its diagram.
	pub id: String,
	/// Id of the node the link leaves.
	pub source: String,
	/// Id of the node the link enters.
	pub target: String,
	/// Position in the activation sequence, counted from 0.
	pub order: usize,
}

/// Unvalidated diagram content, as written by the page.
#[derive(Clone, Debug)]
pub struct GraphData {
	/// Nodes in declaration order.
	pub nodes: Vec<GraphNode>,
	/// Links in any order; [`FlowGraph::new`] sorts them.
	pub links: Vec<GraphLink>,
	/// Width and height of the coordinate space the positions are written in.
	pub view_box: (f64, f64),
}

impl Default for GraphData {
	fn default() -> Self {
		Self {
			nodes: Vec::new(),
			links: Vec::new(),
			view_box: (100.0, 100.0),
		}
	}
}

impl GraphData {
	/// Content with `nodes` and no links yet.
	pub fn new(nodes: Vec<GraphNode>, view_box: (f64, f64)) -> Self {
		Self {
			nodes,
			links: Vec::new(),
			view_box,
		}
	}

	/// Append a link whose order is the next in sequence.
	pub fn link(mut self, id: &str, source: &str, target: &str) -> Self {
		let order = self.links.len();
		self.links.push(GraphLink {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			order,
		});
		self
	}

	/// Append an undirected link unless the pair is already connected.
	///
	/// The link id is `"{a}-{b}"` with the endpoints sorted.
	pub fn link_unique(self, source: &str, target: &str) -> Self {
		let key = undirected_key(source, target);
		if self
			.links
			.iter()
			.any(|l| undirected_key(&l.source, &l.target) == key)
		{
			return self;
		}
		self.link(&key, source, target)
	}
}

fn undirected_key(a: &str, b: &str) -> String {
	if a <= b {
		format!("{a}-{b}")
	} else {
		format!("{b}-{a}")
	}
}

/// A validated, immutable diagram.
///
/// Links are sorted by `order` and their endpoints resolved to node indices.
#[derive(Clone, Debug)]
pub struct FlowGraph {
	nodes: Vec<GraphNode>,
	links: Vec<GraphLink>,
	endpoints: Vec<(usize, usize)>,
	index: HashMap<String, usize>,
	view_box: (f64, f64),
}

impl FlowGraph {
	/// Validate `data`.
	///
	/// Fails on an empty node list, duplicate node or edge ids, dangling
	/// endpoints, or link orders that are not exactly `0..links`.
	pub fn new(data: GraphData) -> Result<Self, ConfigError> {
		let GraphData {
			nodes,
			mut links,
			view_box,
		} = data;
		if nodes.is_empty() {
			return Err(ConfigError::EmptyGraph);
		}

		let mut index = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			if index.insert(node.id.clone(), i).is_some() {
				return Err(ConfigError::DuplicateNode(node.id.clone()));
			}
		}

		links.sort_by_key(|l| l.order);
		let mut seen = HashSet::with_capacity(links.len());
		let mut endpoints = Vec::with_capacity(links.len());
		for (expected, link) in links.iter().enumerate() {
			if !seen.insert(link.id.as_str()) {
				return Err(ConfigError::DuplicateEdge(link.id.clone()));
			}
			if link.order != expected {
				return Err(ConfigError::NonContiguousOrder {
					edge_id: link.id.clone(),
					expected,
					found: link.order,
				});
			}
			let resolve = |id: &str| {
				index.get(id).copied().ok_or_else(|| ConfigError::UnknownNode {
					edge_id: link.id.clone(),
					missing_node_id: id.to_string(),
				})
			};
			endpoints.push((resolve(&link.source)?, resolve(&link.target)?));
		}

		Ok(Self {
			nodes,
			links,
			endpoints,
			index,
			view_box,
		})
	}

	/// Nodes in declaration order.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// Links in activation order.
	pub fn links(&self) -> &[GraphLink] {
		&self.links
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of links.
	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	/// Index into [`FlowGraph::nodes`] of the node with `id`.
	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Resolved `(source, target)` node indices of the link at `order`.
	pub fn endpoints(&self, order: usize) -> (usize, usize) {
		self.endpoints[order]
	}

	/// Source and target positions of the link at `order`.
	pub fn link_points(&self, order: usize) -> (Point, Point) {
		let (s, t) = self.endpoints[order];
		(self.nodes[s].position, self.nodes[t].position)
	}

	/// Width and height of the diagram's coordinate space.
	pub fn view_box(&self) -> (f64, f64) {
		self.view_box
	}
}
