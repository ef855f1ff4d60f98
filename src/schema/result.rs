//! Result types produced by a disaggregation search.

use serde::{Deserialize, Serialize};

use crate::evolution::Gene;
use crate::signal::Block;

/// One detected consumption episode, summarized for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    /// Timestamp of the first on-edge sample.
    pub on_ts: i64,
    /// Timestamp of the last off-edge sample.
    pub off_ts: i64,
    /// Seconds between the first and last sample.
    pub duration_s: i64,
    /// Average power over the block, in watts.
    pub avg_power_w: f64,
    /// Energy explained by the block, in watt-hours.
    pub energy_wh: f64,
}

impl From<&Block> for BlockSummary {
    fn from(block: &Block) -> Self {
        Self {
            on_ts: block.first_ts(),
            off_ts: block.last_ts(),
            duration_s: block.duration_secs(),
            avg_power_w: block.avg_power_w(),
            energy_wh: block.energy_wh(),
        }
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Generation budget exhausted.
    MaxGenerations,
    /// The best individual explains the full ceiling.
    CeilingReached,
    /// Stagnation limit hit.
    Stagnation,
    /// User cancelled.
    Cancelled,
}

/// Per-generation fitness trace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    /// Best fitness per generation.
    pub best_fitness: Vec<f64>,
    /// Mean fitness per generation.
    pub avg_fitness: Vec<f64>,
    /// Fitness standard deviation per generation.
    pub fitness_std: Vec<f64>,
}

/// Search bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Generations evaluated (the initial population counts as 0).
    pub generations: usize,
    /// Individuals evaluated across the run.
    pub total_evaluations: u64,
    /// Wall-clock time.
    pub elapsed_seconds: f64,
    pub stop_reason: StopReason,
}

/// The disaggregation produced by the best individual found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisaggResult {
    /// Accepted blocks, ordered by on-edge time.
    pub blocks: Vec<BlockSummary>,
    /// Fraction of the ceiling explained.
    pub fitness: f64,
    /// Sum of the blocks' energy scores, in watt-hours.
    pub raw_score_wh: f64,
    /// Maximum energy any disaggregation of this signal could claim.
    pub ceiling_wh: f64,
    /// The gene sequence of the winning individual.
    pub pipeline: Vec<Gene>,
    pub stats: RunStats,
    pub history: History,
}
