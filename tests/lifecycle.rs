//! Scheduler and counter lifecycles driven end to end on a simulated clock.
mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use diagram_motion::components::counter::{CounterAnimation, CounterPhase, CounterSpec};
use diagram_motion::components::flow_graph::{
	Activation, CycleScheduler, Diagram, DiagramKind, DiagramState, FlowGraph, GraphData,
	GraphNode, HighlightFrame, StaggeredReveal,
};
use diagram_motion::config::{PulseTiming, RevealTiming, SweepTiming};
use diagram_motion::error::ConfigError;

#[test]
fn sweep_reveals_one_more_node_per_tick() {
	let clock = clock();
	let diagram = Diagram::new(chain(6), DiagramKind::Sweep(SweepTiming::default())).unwrap();
	let state = DiagramState::new(diagram, clock.clone(), 400.0, 200.0).unwrap();
	state.start();
	for k in 0..15usize {
		let frame = state.highlight();
		assert_eq!(frame.emphasized_nodes(), vec![k % 6]);
		assert_eq!(frame.revealed_count(), k % 6 + 1);
		clock.advance(2000.0);
	}
}

#[test]
fn stopped_scheduler_ignores_time() {
	let clock = clock();
	let cycle = CycleScheduler::new(clock.clone(), 6).unwrap();
	cycle.start(2000);
	clock.advance(4100.0);
	cycle.stop();
	let (index, ticks) = (cycle.active_index(), cycle.ticks());
	clock.advance(60_000.0);
	assert_eq!(cycle.active_index(), index);
	assert_eq!(cycle.ticks(), ticks);
	assert_eq!(clock.pending(), 0);
}

#[test]
fn counter_rises_to_target() {
	let clock = clock();
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = seen.clone();
	let spec = CounterSpec::new(100.0, 2000.0).unwrap();
	let counter = CounterAnimation::new(clock.clone(), spec, move |s| {
		sink.borrow_mut().push(s.to_string())
	});
	assert_eq!(counter.display(), "0");
	assert!(counter.on_visibility(true));
	clock.advance(2100.0);

	assert_eq!(counter.phase(), CounterPhase::Completed);
	assert_eq!(counter.display(), "100");
	let values: Vec<i64> = seen.borrow().iter().map(|s| s.parse().unwrap()).collect();
	assert!(values.windows(2).all(|w| w[0] <= w[1]));
	assert!(values.iter().all(|v| (0..=100).contains(v)));
}

#[test]
fn counter_runs_once_per_mount() {
	let clock = clock();
	let runs = Rc::new(RefCell::new(0));
	let sink = runs.clone();
	let spec = CounterSpec::new(15.0, 2000.0).unwrap().suffix("+");
	let counter = CounterAnimation::new(clock.clone(), spec, move |s| {
		if s == "15+" {
			*sink.borrow_mut() += 1;
		}
	});
	assert!(counter.on_visibility(true));
	clock.advance(300.0);
	assert!(!counter.on_visibility(true));
	clock.advance(5000.0);
	assert!(!counter.on_visibility(true));
	clock.advance(5000.0);
	assert_eq!(*runs.borrow(), 1);
}

#[test]
fn hover_takes_precedence_over_pulse() {
	let graph = FlowGraph::new(chain(8)).unwrap();
	let pulsed = HighlightFrame::derive(
		&graph,
		&Activation::HoverOrPulse {
			hovered: Some("n5"),
			pulse_index: 2,
		},
	);
	assert_eq!(pulsed.emphasized_nodes(), vec![5]);

	let cleared = HighlightFrame::derive(
		&graph,
		&Activation::HoverOrPulse {
			hovered: None,
			pulse_index: 2,
		},
	);
	assert_eq!(cleared.emphasized_nodes(), vec![2]);
}

#[test]
fn hover_on_mounted_web_overrides_pulse() {
	let clock = clock();
	let diagram = Diagram::new(chain(8), DiagramKind::HoverPulse(PulseTiming::default())).unwrap();
	let mut state = DiagramState::new(diagram, clock.clone(), 400.0, 200.0).unwrap();
	state.start();
	clock.advance(3000.0);
	assert_eq!(state.highlight().emphasized_nodes(), vec![2]);
	state.set_hover(Some(5));
	clock.advance(1500.0);
	assert_eq!(state.highlight().emphasized_nodes(), vec![5]);
	state.set_hover(None);
	assert_eq!(state.highlight().emphasized_nodes(), vec![3]);
}

#[test]
fn stopped_reveal_inserts_nothing_more() {
	let clock = clock();
	let graph = FlowGraph::new(product_flow()).unwrap();
	let reveal = StaggeredReveal::new(clock.clone(), &graph, RevealTiming::default()).unwrap();
	reveal.start();
	clock.advance(1500.0);
	assert_eq!(reveal.revealed(), vec!["define".to_string(), "research".to_string()]);
	reveal.stop();
	clock.advance(1500.0);
	assert_eq!(reveal.revealed_count(), 2);
	clock.advance(20_000.0);
	assert_eq!(reveal.revealed_count(), 2);
	assert_eq!(clock.pending(), 0);
}

#[test]
fn unknown_endpoint_fails_construction() {
	let data = GraphData::new(
		vec![GraphNode::new("a", 0.0, 0.0, "", "A"), GraphNode::new("b", 1.0, 0.0, "", "B")],
		(10.0, 10.0),
	)
	.link("a-b", "a", "b")
	.link("b-c", "b", "c");
	let err = Diagram::new(data, DiagramKind::Sweep(SweepTiming::default())).unwrap_err();
	assert_eq!(
		err,
		ConfigError::UnknownNode {
			edge_id: "b-c".into(),
			missing_node_id: "c".into(),
		}
	);
}

#[test]
fn unmount_cancels_every_timer() {
	let clock = clock();
	let kinds = [
		DiagramKind::Sweep(SweepTiming::default()),
		DiagramKind::Reveal(RevealTiming::default()),
		DiagramKind::HoverPulse(PulseTiming::default()),
	];
	for kind in kinds {
		let diagram = Diagram::new(product_flow(), kind).unwrap();
		let state = DiagramState::new(diagram, clock.clone(), 400.0, 400.0).unwrap();
		state.start();
		clock.advance(1000.0);
		drop(state);
		assert_eq!(clock.pending(), 0);
	}
}
