//! Detection module - the edge-matching strategy family.

mod scan;
mod strategy;

pub use scan::{WorkingSignals, is_match, point_scan, ramp_scan};
pub use strategy::{Direction, Matching, Polarity, StrategyKind};
