//! Canvas diagrams, metric counters and the timer host they share.

pub mod counter;
pub mod flow_graph;
pub mod timers;
