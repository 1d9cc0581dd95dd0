//! Shared builders for the lifecycle tests.
use std::rc::Rc;

use diagram_motion::components::flow_graph::{GraphData, GraphNode};
use diagram_motion::components::timers::ManualClock;

/// A fresh clock at t=0.
pub fn clock() -> Rc<ManualClock> {
	Rc::new(ManualClock::new())
}

/// `n` nodes in a row, chained `n0-n1`, `n1-n2`, ...
#[allow(dead_code)]
pub fn chain(n: usize) -> GraphData {
	let nodes = (0..n)
		.map(|i| {
			let id = format!("n{i}");
			GraphNode::new(&id, 10.0 + i as f64 * 20.0, 50.0, "", &id)
		})
		.collect();
	(1..n).fold(GraphData::new(nodes, (200.0, 100.0)), |data, i| {
		let (from, to) = (format!("n{}", i - 1), format!("n{i}"));
		data.link(&format!("{from}-{to}"), &from, &to)
	})
}

/// The six-link product flow: two inputs converging, then a straight run.
#[allow(dead_code)]
pub fn product_flow() -> GraphData {
	let nodes = vec![
		GraphNode::new("users", 12.0, 35.0, "", "User Research"),
		GraphNode::new("data", 12.0, 65.0, "", "Data Analysis"),
		GraphNode::new("problem", 30.0, 50.0, "", "Problem Definition"),
		GraphNode::new("solution", 48.0, 35.0, "", "Solution Design"),
		GraphNode::new("prototype", 48.0, 65.0, "", "Prototype"),
		GraphNode::new("ship", 68.0, 50.0, "", "Ship & Learn"),
		GraphNode::new("metrics", 88.0, 50.0, "", "Measure Impact"),
	];
	GraphData::new(nodes, (100.0, 100.0))
		.link("research", "users", "problem")
		.link("define", "data", "problem")
		.link("design", "problem", "solution")
		.link("build", "solution", "prototype")
		.link("measure", "prototype", "ship")
		.link("iterate", "ship", "metrics")
}
