//! nialm - Non-intrusive appliance load monitoring.
//!
//! Decomposes a single aggregate household power signal into discrete
//! on/off appliance-usage episodes ("blocks") by matching rising and
//! falling edges in the signal's derivative, and searches for the best
//! ordered sequence of edge-matching strategies with a genetic
//! algorithm.
//!
//! # Architecture
//!
//! The crate is split into four modules:
//!
//! - `signal`: the time-series data model (series, events, blocks)
//! - `detect`: the family of edge-detection strategies
//! - `evolution`: the genetic search (genes, individuals, populations)
//! - `schema`: configuration and result types
//!
//! # Example
//!
//! ```rust,no_run
//! use nialm::{DisaggConfig, SearchEngine, Series};
//!
//! // One clean 500 W pulse on a flat baseline.
//! let mut values = vec![0.0; 700];
//! for v in values.iter_mut().take(650).skip(50) {
//!     *v = 500.0;
//! }
//! let signal = Series::from_uniform(0, 1, values)?;
//!
//! let mut engine = SearchEngine::new(signal, DisaggConfig::default())?;
//! let result = engine.run();
//!
//! for block in &result.blocks {
//!     println!(
//!         "on {} off {}: {:.0} W for {} s ({:.2} Wh)",
//!         block.on_ts, block.off_ts, block.avg_power_w, block.duration_s, block.energy_wh
//!     );
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod detect;
pub mod evolution;
pub mod schema;
pub mod signal;

// Re-export commonly used types
pub use evolution::{DisaggProblem, Gene, ProblemError, SearchEngine};
pub use schema::{BlockSummary, ConfigError, DisaggConfig, DisaggResult, StopReason};
pub use signal::{Block, Event, Series, SeriesError};
