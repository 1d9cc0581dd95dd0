//! Configuration errors raised while building diagrams and counters.

use thiserror::Error;

/// A static-content invariant that was violated at construction time.
///
/// Every variant describes a programmer or content error; none of them can
/// occur once a diagram or counter has been built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
	/// The graph declares no nodes.
	#[error("graph has no nodes")]
	EmptyGraph,

	/// Two nodes share an id.
	#[error("node id '{0}' is declared more than once")]
	DuplicateNode(String),

	/// Two edges share an id.
	#[error("edge id '{0}' is declared more than once")]
	DuplicateEdge(String),

	/// An edge endpoint names a node that does not exist.
	#[error("edge '{edge_id}' references node '{missing_node_id}', which is not in the graph")]
	UnknownNode {
		/// Edge holding the dangling reference.
		edge_id: String,
		/// The id that could not be resolved.
		missing_node_id: String,
	},

	/// Edge orders are not exactly `0..edges`.
	#[error("edge '{edge_id}' has order {found}, expected {expected} (orders start at 0, no gaps)")]
	NonContiguousOrder {
		/// First edge out of sequence.
		edge_id: String,
		/// Order that edge should carry.
		expected: usize,
		/// Order it actually carries.
		found: usize,
	},

	/// A cycle lane was created with zero stages.
	#[error("a cycle needs at least one stage")]
	EmptyStageCount,

	/// A reveal cycle restarts before its last link has been shown.
	#[error("cycle period of {period_ms}ms must exceed the {required_ms}ms reveal span")]
	OverlappingCycles {
		/// Configured restart period.
		period_ms: u32,
		/// Time the staggered reveal needs to reach the last link.
		required_ms: u32,
	},

	/// Counter duration is zero, negative or not a number.
	#[error("counter duration must be a positive number of milliseconds, got {0}")]
	InvalidDuration(f64),
}
