//! Genes: one concrete detection-strategy configuration.

use serde::{Deserialize, Serialize};

use crate::detect::{
    Direction, Matching, Polarity, StrategyKind, WorkingSignals, point_scan, ramp_scan,
};
use crate::signal::Block;

use super::rng::SearchRng;

/// One parameterized configuration of a single detection strategy.
///
/// A gene is a strategy identity plus one value per parameter dimension
/// that strategy declares, drawn from the finite domains in
/// [`crate::detect`]. Genes are owned by one individual at a time and
/// copied, not shared, when passed to offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy")]
pub enum Gene {
    PointScan {
        direction: Direction,
        polarity: Polarity,
        matching: Matching,
    },
    RampScan {
        direction: Direction,
        polarity: Polarity,
    },
}

impl Gene {
    /// Draw a random gene: a uniform strategy with uniform parameters.
    pub fn sample(rng: &mut SearchRng) -> Self {
        match rng.pick(&StrategyKind::ALL) {
            StrategyKind::PointScan => Gene::PointScan {
                direction: *rng.pick(&Direction::ALL),
                polarity: *rng.pick(&Polarity::ALL),
                matching: *rng.pick(&Matching::ALL),
            },
            StrategyKind::RampScan => Gene::RampScan {
                direction: *rng.pick(&Direction::ALL),
                polarity: *rng.pick(&Polarity::ALL),
            },
        }
    }

    /// Resample each parameter dimension independently with probability
    /// `rate`. A resample may land on the same value; the strategy
    /// identity itself never mutates.
    pub fn mutate(&mut self, rate: f64, rng: &mut SearchRng) {
        match self {
            Gene::PointScan {
                direction,
                polarity,
                matching,
            } => {
                if rng.chance(rate) {
                    *direction = *rng.pick(&Direction::ALL);
                }
                if rng.chance(rate) {
                    *polarity = *rng.pick(&Polarity::ALL);
                }
                if rng.chance(rate) {
                    *matching = *rng.pick(&Matching::ALL);
                }
            }
            Gene::RampScan {
                direction,
                polarity,
            } => {
                if rng.chance(rate) {
                    *direction = *rng.pick(&Direction::ALL);
                }
                if rng.chance(rate) {
                    *polarity = *rng.pick(&Polarity::ALL);
                }
            }
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Gene::PointScan { .. } => StrategyKind::PointScan,
            Gene::RampScan { .. } => StrategyKind::RampScan,
        }
    }

    /// Run the strategy with this gene's parameters against the working
    /// signals. `None` is the expected no-match outcome.
    pub fn execute(&self, signals: &mut WorkingSignals, tolerance: f64) -> Option<Block> {
        match *self {
            Gene::PointScan {
                direction,
                polarity,
                matching,
            } => point_scan(direction, polarity, matching, signals, tolerance),
            Gene::RampScan {
                direction,
                polarity,
            } => ramp_scan(direction, polarity, signals, tolerance),
        }
    }
}
