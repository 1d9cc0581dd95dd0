//! Count-up numbers that start the first time they scroll into view.

mod animation;
mod component;
mod interpolator;

pub use animation::CounterAnimation;
pub use component::MetricCard;
pub use interpolator::{Counter, CounterPhase, CounterSpec, ease_out_cubic};
