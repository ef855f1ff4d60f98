//! Search configuration.

use serde::{Deserialize, Serialize};

/// Configuration for one disaggregation search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisaggConfig {
    /// Relative slack when matching an on-edge against an off-edge.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Per-parameter mutation probability (0.0-1.0).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Number of individuals in the population.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Generation budget.
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Number of best individuals copied unchanged each generation.
    #[serde(default = "default_elitism")]
    pub elitism: usize,
    /// Fraction of the population parents are drawn from, e.g. 0.1 means
    /// the top 10%.
    #[serde(default = "default_breeding_fraction")]
    pub breeding_fraction: f64,
    /// Stop after this many generations without best-fitness improvement.
    #[serde(default)]
    pub stagnation_limit: Option<usize>,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for DisaggConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            mutation_rate: default_mutation_rate(),
            population_size: default_population_size(),
            generations: default_generations(),
            elitism: default_elitism(),
            breeding_fraction: default_breeding_fraction(),
            stagnation_limit: None,
            random_seed: None,
        }
    }
}

fn default_tolerance() -> f64 {
    0.1
}
fn default_mutation_rate() -> f64 {
    0.05
}
fn default_population_size() -> usize {
    100
}
fn default_generations() -> usize {
    100
}
fn default_elitism() -> usize {
    1
}
fn default_breeding_fraction() -> f64 {
    0.1
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
    #[error("mutation rate must be within [0, 1], got {0}")]
    InvalidMutationRate(f64),
    #[error("population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("elitism ({elitism}) must be smaller than the population size ({population})")]
    ExcessiveElitism { elitism: usize, population: usize },
    #[error("breeding fraction must be within (0, 1], got {0}")]
    InvalidBreedingFraction(f64),
    #[error("breeding pool holds {parents} parent(s); at least 2 are needed to breed")]
    BreedingPoolTooSmall { parents: usize },
}

impl DisaggConfig {
    /// Number of individuals in the breeding pool.
    pub fn breeding_pool_size(&self) -> usize {
        (self.population_size as f64 * self.breeding_fraction) as usize
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(self.mutation_rate));
        }
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.elitism >= self.population_size {
            return Err(ConfigError::ExcessiveElitism {
                elitism: self.elitism,
                population: self.population_size,
            });
        }
        if !(self.breeding_fraction > 0.0 && self.breeding_fraction <= 1.0) {
            return Err(ConfigError::InvalidBreedingFraction(self.breeding_fraction));
        }
        let parents = self.breeding_pool_size();
        if parents < 2 {
            return Err(ConfigError::BreedingPoolTooSmall { parents });
        }
        Ok(())
    }
}
