use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, warn};

use crate::components::timers::{SharedTimers, TimerId};
use crate::error::ConfigError;

/// A counter that wraps at `count`.
#[derive(Clone, Debug, PartialEq)]
struct StageCounter {
	index: usize,
	count: usize,
	laps: u64,
	// when each stage was entered during the current lap
	entered: Vec<Option<f64>>,
}

impl StageCounter {
	fn new(count: usize, now: f64) -> Self {
		let mut entered = vec![None; count];
		entered[0] = Some(now);
		Self {
			index: 0,
			count,
			laps: 0,
			entered,
		}
	}

	fn advance(&mut self, now: f64) {
		self.index += 1;
		if self.index == self.count {
			self.index = 0;
			self.laps += 1;
			self.entered.iter_mut().for_each(|e| *e = None);
		}
		self.entered[self.index] = Some(now);
	}
}

#[derive(Debug)]
struct CycleState {
	lanes: Vec<StageCounter>,
	ticks: u64,
}

impl CycleState {
	fn tick(&mut self, now: f64) {
		self.ticks += 1;
		for lane in &mut self.lanes {
			lane.advance(now);
		}
	}
}

pub(crate) fn check_stage_counts(stage_counts: &[usize]) -> Result<(), ConfigError> {
	if stage_counts.is_empty() || stage_counts.contains(&0) {
		return Err(ConfigError::EmptyStageCount);
	}
	Ok(())
}

/// Repeating timer that advances one or more stage indices per tick.
///
/// Lanes are decoupled counters with their own stage counts, all advanced on
/// the same tick. Lane 0 is the primary `active_index`.
pub struct CycleScheduler {
	timers: SharedTimers,
	state: Rc<RefCell<CycleState>>,
	timer: Cell<Option<TimerId>>,
}

impl CycleScheduler {
	/// A single lane of `stage_count` stages.
	pub fn new(timers: SharedTimers, stage_count: usize) -> Result<Self, ConfigError> {
		Self::with_lanes(timers, &[stage_count])
	}

	/// One lane per entry of `stage_counts`; each must be non-zero.
	pub fn with_lanes(timers: SharedTimers, stage_counts: &[usize]) -> Result<Self, ConfigError> {
		check_stage_counts(stage_counts)?;
		let now = timers.now_ms();
		let lanes = stage_counts
			.iter()
			.map(|&count| StageCounter::new(count, now))
			.collect();
		Ok(Self {
			timers,
			state: Rc::new(RefCell::new(CycleState { lanes, ticks: 0 })),
			timer: Cell::new(None),
		})
	}

	/// Begin ticking every `interval_ms`. Ignored while already running.
	pub fn start(&self, interval_ms: u32) {
		if self.is_running() {
			warn!("Cycle scheduler started twice; keeping the existing timer");
			return;
		}
		let timers = Rc::downgrade(&self.timers);
		let state = Rc::downgrade(&self.state);
		let id = self.timers.set_interval(
			interval_ms,
			Box::new(move || {
				if let (Some(timers), Some(state)) = (timers.upgrade(), state.upgrade()) {
					state.borrow_mut().tick(timers.now_ms());
				}
			}),
		);
		self.timer.set(Some(id));
		debug!("Cycle scheduler started ({}ms)", interval_ms);
	}

	/// Cancel the timer. Safe to call any number of times.
	pub fn stop(&self) {
		if let Some(id) = self.timer.take() {
			self.timers.cancel(id);
			debug!("Cycle scheduler stopped after {} ticks", self.ticks());
		}
	}

	/// Whether the interval is registered.
	pub fn is_running(&self) -> bool {
		self.timer.get().is_some()
	}

	/// Advance every lane once, exactly as a timer tick would.
	pub fn tick(&self) {
		let now = self.timers.now_ms();
		self.state.borrow_mut().tick(now);
	}

	/// Move the primary lane to `index` (wrapped). Other lanes are untouched.
	pub fn seek(&self, index: usize) {
		let mut state = self.state.borrow_mut();
		let lane = &mut state.lanes[0];
		lane.index = index % lane.count;
	}

	/// Current stage of the primary lane.
	pub fn active_index(&self) -> usize {
		self.lane_index(0)
	}

	/// Current stage of `lane`.
	pub fn lane_index(&self, lane: usize) -> usize {
		self.state.borrow().lanes[lane].index
	}

	/// How many times `lane` has wrapped back to 0.
	pub fn laps(&self, lane: usize) -> u64 {
		self.state.borrow().lanes[lane].laps
	}

	/// When `lane` entered `stage` during its current lap. `None` for stages
	/// the lap has not reached yet.
	pub fn entered_at(&self, lane: usize, stage: usize) -> Option<f64> {
		self.state.borrow().lanes[lane].entered.get(stage).copied().flatten()
	}

	/// Number of stages in `lane`.
	pub fn stage_count(&self, lane: usize) -> usize {
		self.state.borrow().lanes[lane].count
	}

	/// Ticks since construction, including manual ones.
	pub fn ticks(&self) -> u64 {
		self.state.borrow().ticks
	}
}

impl Drop for CycleScheduler {
	fn drop(&mut self) {
		self.stop();
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::*;
	use crate::components::timers::ManualClock;

	fn scheduler(counts: &[usize]) -> (Rc<ManualClock>, CycleScheduler) {
		let clock = Rc::new(ManualClock::new());
		let cycle = CycleScheduler::with_lanes(clock.clone(), counts).unwrap();
		(clock, cycle)
	}

	#[test]
	fn index_is_ticks_mod_stage_count() {
		for n in 1..=7 {
			let (clock, cycle) = scheduler(&[n]);
			cycle.start(100);
			for k in 0..20u64 {
				assert_eq!(cycle.ticks(), k);
				assert_eq!(cycle.active_index(), (k as usize) % n);
				clock.advance(100.0);
			}
		}
	}

	#[test]
	fn lanes_wrap_independently() {
		let (clock, cycle) = scheduler(&[6, 5]);
		cycle.start(2000);
		clock.advance(2000.0 * 7.0);
		assert_eq!(cycle.lane_index(0), 1);
		assert_eq!(cycle.lane_index(1), 2);
		assert_eq!(cycle.laps(0), 1);
		assert_eq!(cycle.laps(1), 1);
	}

	#[test]
	fn stop_freezes_state() {
		let (clock, cycle) = scheduler(&[4]);
		cycle.start(100);
		clock.advance(250.0);
		cycle.stop();
		cycle.stop();
		let frozen = cycle.active_index();
		clock.advance(10_000.0);
		assert_eq!(cycle.active_index(), frozen);
		assert_eq!(cycle.ticks(), 2);
		assert_eq!(clock.pending(), 0);
	}

	#[test]
	fn second_start_keeps_single_timer() {
		let (clock, cycle) = scheduler(&[3]);
		cycle.start(100);
		cycle.start(100);
		assert_eq!(clock.pending(), 1);
		clock.advance(100.0);
		assert_eq!(cycle.ticks(), 1);
	}

	#[test]
	fn drop_cancels_timer() {
		let (clock, cycle) = scheduler(&[3]);
		cycle.start(100);
		drop(cycle);
		assert_eq!(clock.pending(), 0);
	}

	#[test]
	fn zero_stages_rejected() {
		let clock = Rc::new(ManualClock::new());
		assert_eq!(
			CycleScheduler::new(clock.clone(), 0).err(),
			Some(ConfigError::EmptyStageCount)
		);
		assert_eq!(
			CycleScheduler::with_lanes(clock, &[]).err(),
			Some(ConfigError::EmptyStageCount)
		);
	}

	#[test]
	fn records_when_each_stage_was_entered() {
		let (clock, cycle) = scheduler(&[3, 2]);
		clock.advance(500.0);
		cycle.start(1000);
		assert_eq!(cycle.entered_at(1, 0), Some(0.0));
		assert_eq!(cycle.entered_at(1, 1), None);

		clock.advance(1000.0);
		assert_eq!(cycle.entered_at(1, 1), Some(1500.0));
		// lane 1 wraps: the new lap forgets the old stamps
		clock.advance(1000.0);
		assert_eq!(cycle.entered_at(1, 0), Some(2500.0));
		assert_eq!(cycle.entered_at(1, 1), None);
		assert_eq!(cycle.entered_at(0, 2), Some(2500.0));
		assert_eq!(cycle.entered_at(0, 1), Some(1500.0));
	}

	#[test]
	fn seek_moves_primary_lane_only() {
		let (_clock, cycle) = scheduler(&[6, 5]);
		cycle.seek(8);
		assert_eq!(cycle.active_index(), 2);
		assert_eq!(cycle.lane_index(1), 0);
		cycle.tick();
		assert_eq!(cycle.active_index(), 3);
	}
}
