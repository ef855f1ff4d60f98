//! Evolution module - the genetic search over edge-matching pipelines.
//!
//! No single edge-matching heuristic explains a household signal
//! reliably, so the search breeds ordered sequences of detection
//! strategies instead:
//!
//! - **Gene** (`gene`): one parameterized strategy configuration
//! - **Individual** (`individual`): an ordered gene sequence, replayed
//!   and greedily extended against private working signals
//! - **Population** (`population`): elitism, breeding-pool selection and
//!   position-wise crossover
//! - **Problem** (`problem`): signal preparation and the score ceiling
//! - **Search** (`search`): the generations loop with early stopping and
//!   cooperative cancellation
//!
//! # Example
//!
//! ```rust,no_run
//! use nialm::schema::DisaggConfig;
//! use nialm::evolution::SearchEngine;
//! use nialm::signal::Series;
//!
//! let signal = Series::from_uniform(0, 1, vec![0.0, 500.0, 500.0, 0.0]).unwrap();
//! let mut engine = SearchEngine::new(signal, DisaggConfig::default())?;
//! let result = engine.run();
//! println!("explained {:.1}% of the ceiling", result.fitness * 100.0);
//! # Ok::<(), nialm::evolution::ProblemError>(())
//! ```

mod gene;
mod individual;
mod population;
mod problem;
mod rng;
mod search;

pub use gene::Gene;
pub use individual::Individual;
pub use population::{Population, crossover};
pub use problem::{DisaggProblem, ProblemError};
pub use rng::SearchRng;
pub use search::{Progress, SearchEngine};
