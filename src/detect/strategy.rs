//! Detection strategy identities and their parameter domains.
//!
//! Strategies form a closed set; each declares a finite domain per
//! parameter dimension through the `ALL` tables below, which is what the
//! genetic layer samples and mutates over.

use serde::{Deserialize, Serialize};

/// Scan order over seed edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Walk seed edges chronologically.
    Forward,
    /// Walk seed edges from the end of the signal backwards.
    Backward,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Backward];
}

/// Which edge polarity seeds the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// Seed on turn-on edges, match turn-off edges forward in time.
    Rising,
    /// Seed on turn-off edges, match turn-on edges backward in time.
    Falling,
}

impl Polarity {
    pub const ALL: [Polarity; 2] = [Polarity::Rising, Polarity::Falling];
}

/// How the opposite edge is assembled during matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Matching {
    /// Match against one opposite-signed sample.
    SinglePoint,
    /// Grow a run of consecutive opposite-signed samples until it
    /// cancels the seed.
    MultiPoint,
}

impl Matching {
    pub const ALL: [Matching; 2] = [Matching::SinglePoint, Matching::MultiPoint];
}

/// The closed family of detection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Single-sample seed edges; the opposite edge is matched per
    /// [`Matching`].
    PointScan,
    /// Composite seed edges: consecutive same-signed samples grouped
    /// into one event, matched against a single opposite sample. Captures
    /// appliances that ramp over several samples instead of jumping.
    RampScan,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::PointScan, StrategyKind::RampScan];
}
