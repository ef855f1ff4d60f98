//! The top-level search loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, info};

use crate::schema::{BlockSummary, DisaggConfig, DisaggResult, History, RunStats, StopReason};
use crate::signal::Series;

use super::population::Population;
use super::problem::{DisaggProblem, ProblemError};
use super::rng::SearchRng;

/// Snapshot of the search state handed to progress callbacks.
#[derive(Debug, Clone)]
pub struct Progress {
    pub generation: usize,
    pub total_generations: usize,
    /// Fitness of the best individual so far.
    pub best_fitness: f64,
    /// Mean fitness of the current generation.
    pub avg_fitness: f64,
    /// Blocks found by the current best individual.
    pub best_blocks: usize,
}

/// Runs the genetic search over a disaggregation problem.
pub struct SearchEngine {
    problem: DisaggProblem,
    config: DisaggConfig,
    rng: SearchRng,
    cancelled: Arc<AtomicBool>,
}

impl SearchEngine {
    /// Set up the problem and seed the search.
    pub fn new(signal: Series, config: DisaggConfig) -> Result<Self, ProblemError> {
        let problem = DisaggProblem::new(signal, &config)?;
        let seed = config.random_seed.unwrap_or_else(rand::random);
        Ok(Self {
            problem,
            config,
            rng: SearchRng::new(seed),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn problem(&self) -> &DisaggProblem {
        &self.problem
    }

    /// Handle for cooperative cancellation between generations.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    fn should_stop(&self, population: &Population, stagnation: usize) -> Option<StopReason> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Some(StopReason::Cancelled);
        }
        if population.best().raw_score_wh() >= self.problem.ceiling_wh() {
            return Some(StopReason::CeilingReached);
        }
        if population.generation() >= self.config.generations {
            return Some(StopReason::MaxGenerations);
        }
        if let Some(limit) = self.config.stagnation_limit
            && stagnation >= limit
        {
            return Some(StopReason::Stagnation);
        }
        None
    }

    fn progress(&self, population: &Population, best_fitness: f64) -> Progress {
        Progress {
            generation: population.generation(),
            total_generations: self.config.generations,
            best_fitness,
            avg_fitness: population.avg_fitness(),
            best_blocks: population.best().parts().len(),
        }
    }

    /// Run the search (blocking).
    pub fn run(&mut self) -> DisaggResult {
        self.run_with_callback(|_| {})
    }

    /// Run the search, reporting progress after every generation.
    pub fn run_with_callback<F>(&mut self, callback: F) -> DisaggResult
    where
        F: Fn(&Progress),
    {
        let start = Instant::now();
        info!(
            "disaggregating: ceiling {:.2} Wh, population {}, up to {} generations",
            self.problem.ceiling_wh(),
            self.config.population_size,
            self.config.generations
        );

        let mut history = History::default();
        let mut population =
            Population::new(&self.problem, self.config.population_size, &mut self.rng);
        let mut total_evaluations = self.config.population_size as u64;
        let mut best_fitness = population.best().fitness();
        let mut stagnation = 0usize;

        record(&mut history, &population);
        callback(&self.progress(&population, best_fitness));

        let stop_reason = loop {
            if let Some(reason) = self.should_stop(&population, stagnation) {
                break reason;
            }

            population.evolve(&self.problem, &self.config, &mut self.rng);
            total_evaluations += (self.config.population_size - self.config.elitism) as u64;

            let gen_best = population.best().fitness();
            if gen_best > best_fitness {
                best_fitness = gen_best;
                stagnation = 0;
            } else {
                stagnation += 1;
            }

            record(&mut history, &population);
            debug!(
                "generation {}: best {:.4}, avg {:.4}, blocks {}",
                population.generation(),
                gen_best,
                population.avg_fitness(),
                population.best().parts().len()
            );
            callback(&self.progress(&population, best_fitness));
        };

        info!(
            "search stopped after generation {}: {:?}, best fitness {:.4}",
            population.generation(),
            stop_reason,
            best_fitness
        );

        let best = population.best();
        let mut blocks: Vec<BlockSummary> = best.parts().iter().map(BlockSummary::from).collect();
        blocks.sort_by_key(|b| b.on_ts);

        DisaggResult {
            blocks,
            fitness: best.fitness(),
            raw_score_wh: best.raw_score_wh(),
            ceiling_wh: self.problem.ceiling_wh(),
            pipeline: best.genes().to_vec(),
            stats: RunStats {
                generations: population.generation(),
                total_evaluations,
                elapsed_seconds: start.elapsed().as_secs_f64(),
                stop_reason,
            },
            history,
        }
    }
}

fn record(history: &mut History, population: &Population) {
    history.best_fitness.push(population.best().fitness());
    history.avg_fitness.push(population.avg_fitness());
    history.fitness_std.push(population.fitness_std());
}
