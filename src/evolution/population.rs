//! Populations: a generation of individuals and how it breeds the next.

use rayon::prelude::*;

use super::gene::Gene;
use super::individual::Individual;
use super::problem::DisaggProblem;
use super::rng::SearchRng;
use crate::schema::DisaggConfig;

/// Combine two parents' gene sequences into an offspring sequence.
///
/// Walks both sequences position by position, picking one parent's gene
/// uniformly at each position, and stops at the first position where the
/// chosen parent has run out. The child is therefore a position-wise mix
/// no longer than the longer parent.
pub fn crossover(a: &[Gene], b: &[Gene], rng: &mut SearchRng) -> Vec<Gene> {
    let mut child = Vec::new();
    for position in 0..a.len().max(b.len()) {
        let source = if rng.chance(0.5) { a } else { b };
        match source.get(position) {
            Some(gene) => child.push(*gene),
            None => break,
        }
    }
    child
}

/// A fixed-size collection of individuals, ranked best-first.
///
/// The size is invariant across generations. Ranking sorts by descending
/// fitness with a stable sort, so insertion order breaks ties and a
/// seeded run is fully reproducible.
pub struct Population {
    individuals: Vec<Individual>,
    generation: usize,
}

impl Population {
    /// Build and evaluate the initial population.
    ///
    /// Every individual starts from an empty gene sequence and
    /// immediately self-extends. Per-individual seeds are drawn
    /// sequentially before the parallel evaluation, keeping the result
    /// independent of scheduling.
    pub fn new(problem: &DisaggProblem, size: usize, rng: &mut SearchRng) -> Self {
        let seeds: Vec<u64> = (0..size).map(|_| rng.next_seed()).collect();
        let mut individuals: Vec<Individual> = seeds
            .into_par_iter()
            .map(|seed| Individual::grow(problem, Vec::new(), seed))
            .collect();
        rank(&mut individuals);
        Self {
            individuals,
            generation: 0,
        }
    }

    /// Breed the next generation.
    ///
    /// The top performers form the breeding pool; the first `elitism`
    /// slots carry untouched copies of the previous best, and every other
    /// slot is filled by crossing two distinct pool parents and regrowing
    /// the offspring from scratch.
    pub fn evolve(&mut self, problem: &DisaggProblem, config: &DisaggConfig, rng: &mut SearchRng) {
        let pool_size = config.breeding_pool_size().min(self.individuals.len());
        let elitism = config.elitism.min(self.individuals.len());

        let mut next: Vec<Individual> = self.individuals[..elitism].to_vec();

        let offspring_specs: Vec<(Vec<Gene>, u64)> = (elitism..self.individuals.len())
            .map(|_| {
                let (first, second) = rng.pick_pair(pool_size);
                let genes = crossover(
                    self.individuals[first].genes(),
                    self.individuals[second].genes(),
                    rng,
                );
                (genes, rng.next_seed())
            })
            .collect();

        let offspring: Vec<Individual> = offspring_specs
            .into_par_iter()
            .map(|(genes, seed)| Individual::grow(problem, genes, seed))
            .collect();

        next.extend(offspring);
        rank(&mut next);
        self.individuals = next;
        self.generation += 1;
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// The best individual of the current generation.
    pub fn best(&self) -> &Individual {
        &self.individuals[0]
    }

    /// Mean fitness of the current generation.
    pub fn avg_fitness(&self) -> f64 {
        let sum: f64 = self.individuals.iter().map(Individual::fitness).sum();
        sum / self.individuals.len() as f64
    }

    /// Fitness standard deviation of the current generation.
    pub fn fitness_std(&self) -> f64 {
        let avg = self.avg_fitness();
        let variance: f64 = self
            .individuals
            .iter()
            .map(|ind| (ind.fitness() - avg).powi(2))
            .sum::<f64>()
            / self.individuals.len() as f64;
        variance.sqrt()
    }
}

fn rank(individuals: &mut [Individual]) {
    individuals.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
}
