use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use log::{debug, warn};

use super::types::FlowGraph;
use crate::components::timers::{SharedTimers, TimerId, Timers};
use crate::config::RevealTiming;
use crate::error::ConfigError;

#[derive(Debug, Default)]
struct RevealState {
	// edge id -> time it was revealed in the current cycle
	revealed: BTreeMap<String, f64>,
	generation: u64,
	cycles: u64,
	pending: Vec<TimerId>,
}

impl RevealState {
	fn reveal(&mut self, generation: u64, edge: String, at: f64) {
		if generation == self.generation {
			self.revealed.entry(edge).or_insert(at);
		}
	}
}

/// Cycles of staggered per-edge activation.
///
/// Each cycle clears the reveal set and schedules one single-shot insertion per
/// link at `order * step_delay_ms`. Every insertion is tagged with the cycle's
/// generation, so starting a new cycle or stopping invalidates all of them at
/// once even if a cancel races with a firing callback.
pub struct StaggeredReveal {
	timers: SharedTimers,
	edges: Rc<[String]>,
	timing: RevealTiming,
	state: Rc<RefCell<RevealState>>,
	cycle_timer: Cell<Option<TimerId>>,
}

impl StaggeredReveal {
	/// Rejects a `cycle_period_ms` that does not exceed the time needed to
	/// reveal every link, since the next cycle would clear the last link
	/// before it was ever shown.
	pub fn new(
		timers: SharedTimers,
		graph: &FlowGraph,
		timing: RevealTiming,
	) -> Result<Self, ConfigError> {
		check_timing(graph.link_count(), timing)?;
		Ok(Self {
			timers,
			edges: graph.links().iter().map(|l| l.id.clone()).collect(),
			timing,
			state: Rc::new(RefCell::new(RevealState::default())),
			cycle_timer: Cell::new(None),
		})
	}

	/// Run a cycle now, then one every `cycle_period_ms`.
	pub fn start(&self) {
		if self.is_running() {
			warn!("Staggered reveal started twice; keeping the existing cycle");
			return;
		}
		begin_cycle(
			self.timers.as_ref(),
			&self.edges,
			self.timing.step_delay_ms,
			&self.state,
		);

		let timers = Rc::downgrade(&self.timers);
		let state = Rc::downgrade(&self.state);
		let (edges, step) = (self.edges.clone(), self.timing.step_delay_ms);
		let id = self.timers.set_interval(
			self.timing.cycle_period_ms,
			Box::new(move || {
				if let (Some(timers), Some(state)) = (timers.upgrade(), state.upgrade()) {
					begin_cycle(timers.as_ref(), &edges, step, &state);
				}
			}),
		);
		self.cycle_timer.set(Some(id));
	}

	/// Cancel the cycle timer and every pending insertion.
	pub fn stop(&self) {
		if let Some(id) = self.cycle_timer.take() {
			self.timers.cancel(id);
		}
		let pending = {
			let mut state = self.state.borrow_mut();
			state.generation += 1;
			std::mem::take(&mut state.pending)
		};
		if !pending.is_empty() {
			debug!("Staggered reveal stopped, cancelling {} pending reveals", pending.len());
		}
		for id in pending {
			self.timers.cancel(id);
		}
	}

	/// Whether the restart interval is registered.
	pub fn is_running(&self) -> bool {
		self.cycle_timer.get().is_some()
	}

	/// Whether `edge_id` is shown in the current cycle.
	pub fn is_revealed(&self, edge_id: &str) -> bool {
		self.state.borrow().revealed.contains_key(edge_id)
	}

	/// When `edge_id` was revealed in the current cycle.
	pub fn revealed_at(&self, edge_id: &str) -> Option<f64> {
		self.state.borrow().revealed.get(edge_id).copied()
	}

	/// Ids revealed so far in the current cycle.
	pub fn revealed(&self) -> Vec<String> {
		self.state.borrow().revealed.keys().cloned().collect()
	}

	/// Number of links shown so far in the current cycle.
	pub fn revealed_count(&self) -> usize {
		self.state.borrow().revealed.len()
	}

	/// Number of cycles started so far.
	pub fn cycles(&self) -> u64 {
		self.state.borrow().cycles
	}

	/// Timing the reveal was built with.
	pub fn timing(&self) -> RevealTiming {
		self.timing
	}
}

pub(crate) fn check_timing(link_count: usize, timing: RevealTiming) -> Result<(), ConfigError> {
	if link_count == 0 {
		return Err(ConfigError::EmptyStageCount);
	}
	let required_ms = timing.step_delay_ms.saturating_mul(link_count as u32 - 1);
	// the last link must stay revealed for some time before the set is cleared
	if timing.cycle_period_ms <= required_ms {
		return Err(ConfigError::OverlappingCycles {
			period_ms: timing.cycle_period_ms,
			required_ms,
		});
	}
	Ok(())
}

impl Drop for StaggeredReveal {
	fn drop(&mut self) {
		self.stop();
	}
}

fn begin_cycle(
	timers: &dyn Timers,
	edges: &[String],
	step_delay_ms: u32,
	state: &Rc<RefCell<RevealState>>,
) {
	let (stale, generation) = {
		let mut s = state.borrow_mut();
		s.revealed.clear();
		s.generation += 1;
		s.cycles += 1;
		(std::mem::take(&mut s.pending), s.generation)
	};
	for id in stale {
		timers.cancel(id);
	}
	debug!("Reveal cycle {} over {} links", generation, edges.len());

	let pending: Vec<TimerId> = edges
		.iter()
		.enumerate()
		.map(|(order, edge)| {
			let weak: Weak<RefCell<RevealState>> = Rc::downgrade(state);
			let edge = edge.clone();
			let delay = step_delay_ms.saturating_mul(order as u32);
			let at = timers.now_ms() + delay as f64;
			timers.set_timeout(
				delay,
				Box::new(move || {
					if let Some(state) = weak.upgrade() {
						state.borrow_mut().reveal(generation, edge, at);
					}
				}),
			)
		})
		.collect();
	state.borrow_mut().pending = pending;
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_graph::types::{GraphData, GraphNode};
	use crate::components::timers::ManualClock;

	fn product_flow() -> FlowGraph {
		let data = GraphData::new(
			vec![
				GraphNode::new("users", 12.0, 35.0, "", "User Research"),
				GraphNode::new("data", 12.0, 65.0, "", "Data Analysis"),
				GraphNode::new("problem", 30.0, 50.0, "", "Problem Definition"),
				GraphNode::new("solution", 48.0, 35.0, "", "Solution Design"),
				GraphNode::new("prototype", 48.0, 65.0, "", "Prototype"),
				GraphNode::new("ship", 68.0, 50.0, "", "Ship & Learn"),
				GraphNode::new("metrics", 88.0, 50.0, "", "Measure Impact"),
			],
			(100.0, 100.0),
		)
		.link("research", "users", "problem")
		.link("define", "data", "problem")
		.link("design", "problem", "solution")
		.link("build", "solution", "prototype")
		.link("measure", "prototype", "ship")
		.link("iterate", "ship", "metrics");
		FlowGraph::new(data).unwrap()
	}

	fn timing() -> RevealTiming {
		RevealTiming {
			step_delay_ms: 800,
			cycle_period_ms: 7000,
			particle_ms: 800.0,
		}
	}

	#[test]
	fn reveals_one_edge_per_step() {
		let clock = Rc::new(ManualClock::new());
		let reveal = StaggeredReveal::new(clock.clone(), &product_flow(), timing()).unwrap();
		reveal.start();
		clock.advance(0.0);
		assert_eq!(reveal.revealed(), vec!["research".to_string()]);
		clock.advance(800.0);
		assert!(reveal.is_revealed("define"));
		assert_eq!(reveal.revealed_count(), 2);
		clock.advance(3200.0);
		assert_eq!(reveal.revealed_count(), 6);
		assert_eq!(reveal.revealed_at("iterate"), Some(4000.0));
	}

	#[test]
	fn new_cycle_clears_and_restarts() {
		let clock = Rc::new(ManualClock::new());
		let reveal = StaggeredReveal::new(clock.clone(), &product_flow(), timing()).unwrap();
		reveal.start();
		clock.advance(6999.0);
		assert_eq!(reveal.revealed_count(), 6);
		clock.advance(1.0);
		assert_eq!(reveal.cycles(), 2);
		assert_eq!(reveal.revealed(), vec!["research".to_string()]);
		assert_eq!(reveal.revealed_at("research"), Some(7000.0));
	}

	#[test]
	fn stop_cancels_every_pending_reveal() {
		let clock = Rc::new(ManualClock::new());
		let reveal = StaggeredReveal::new(clock.clone(), &product_flow(), timing()).unwrap();
		reveal.start();
		clock.advance(1500.0);
		assert_eq!(reveal.revealed_count(), 2);
		reveal.stop();
		assert_eq!(clock.pending(), 0);
		clock.advance(1500.0);
		assert_eq!(reveal.revealed_count(), 2);
		clock.advance(20_000.0);
		assert_eq!(reveal.revealed_count(), 2);
		assert_eq!(reveal.cycles(), 1);
	}

	#[test]
	fn overlapping_cycles_rejected() {
		let clock = Rc::new(ManualClock::new());
		let short = RevealTiming {
			cycle_period_ms: 3999,
			..timing()
		};
		assert_eq!(
			StaggeredReveal::new(clock.clone(), &product_flow(), short).err(),
			Some(ConfigError::OverlappingCycles {
				period_ms: 3999,
				required_ms: 4000,
			})
		);
		let exact = RevealTiming {
			cycle_period_ms: 4000,
			..timing()
		};
		assert_eq!(
			StaggeredReveal::new(clock.clone(), &product_flow(), exact).err(),
			Some(ConfigError::OverlappingCycles {
				period_ms: 4000,
				required_ms: 4000,
			})
		);

		let tight = RevealTiming {
			cycle_period_ms: 4001,
			..timing()
		};
		let reveal = StaggeredReveal::new(clock.clone(), &product_flow(), tight).unwrap();
		reveal.start();
		clock.advance(4000.0);
		assert_eq!(reveal.revealed_count(), 6);
		assert!(reveal.is_revealed("iterate"));
		clock.advance(1.0);
		assert_eq!(reveal.cycles(), 2);
		assert_eq!(reveal.revealed(), vec!["research".to_string()]);
	}

	#[test]
	fn dropping_cancels_outstanding_callbacks() {
		let clock = Rc::new(ManualClock::new());
		let reveal = StaggeredReveal::new(clock.clone(), &product_flow(), timing()).unwrap();
		reveal.start();
		clock.advance(100.0);
		drop(reveal);
		assert_eq!(clock.pending(), 0);
	}
}
