//! Individuals: one candidate disaggregation solution.

use crate::signal::Block;

use super::gene::Gene;
use super::problem::DisaggProblem;
use super::rng::SearchRng;

/// An ordered gene sequence together with the blocks it detected.
///
/// Growing an individual replays an inherited gene sequence against
/// private copies of the problem's working signals, then greedily extends
/// it with fresh random genes. A gene earns its place only by producing a
/// valid block, so `genes` and `parts` always pair up one-to-one, and the
/// first failing inherited gene truncates the rest of the inheritance.
#[derive(Debug, Clone)]
pub struct Individual {
    genes: Vec<Gene>,
    parts: Vec<Block>,
    raw_score_wh: f64,
    fitness: f64,
}

impl Individual {
    /// Build and score an individual from an inherited gene sequence.
    ///
    /// Every individual is re-validated from scratch: inherited genes are
    /// mutated (or replaced outright, with probability equal to the
    /// mutation rate) and re-executed in order against the then-current
    /// working signals.
    pub fn grow(problem: &DisaggProblem, inherited: Vec<Gene>, seed: u64) -> Self {
        let mut rng = SearchRng::new(seed);
        let mut signals = problem.working_signals();
        let mut genes = Vec::new();
        let mut parts = Vec::new();

        for mut gene in inherited {
            if rng.chance(problem.mutation_rate()) {
                gene = Gene::sample(&mut rng);
            } else {
                gene.mutate(problem.mutation_rate(), &mut rng);
            }
            match gene.execute(&mut signals, problem.tolerance()) {
                Some(block) => {
                    genes.push(gene);
                    parts.push(block);
                }
                // A single failure invalidates the remainder of the
                // inherited sequence.
                None => break,
            }
        }

        loop {
            let gene = Gene::sample(&mut rng);
            match gene.execute(&mut signals, problem.tolerance()) {
                Some(block) => {
                    genes.push(gene);
                    parts.push(block);
                }
                None => break,
            }
        }

        let raw_score_wh: f64 = parts.iter().map(Block::energy_wh).sum();
        let fitness = raw_score_wh / problem.ceiling_wh();

        Self {
            genes,
            parts,
            raw_score_wh,
            fitness,
        }
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// The accepted blocks, in detection order.
    pub fn parts(&self) -> &[Block] {
        &self.parts
    }

    /// Sum of the parts' energy scores, in Wh.
    pub fn raw_score_wh(&self) -> f64 {
        self.raw_score_wh
    }

    /// Fraction of the problem ceiling explained.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}
