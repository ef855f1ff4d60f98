//! The disaggregation problem: signal preparation and the score ceiling.

use crate::detect::WorkingSignals;
use crate::schema::{ConfigError, DisaggConfig};
use crate::signal::Series;

/// Fatal errors when setting up a disaggregation problem.
#[derive(Debug, thiserror::Error)]
pub enum ProblemError {
    #[error("signal has {got} defined sample(s); at least {needed} are needed for a derivative")]
    SignalTooShort { got: usize, needed: usize },
    #[error("score ceiling is {0} Wh; a positive ceiling is required to score individuals")]
    DegenerateCeiling(f64),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A single-sensor disaggregation problem.
///
/// Owns the original signal and the two derived signals every individual
/// starts from, plus the search knobs and the score ceiling. The ceiling
/// is the maximum energy any disaggregation of this signal could claim
/// and serves as the fitness denominator; it is computed once and never
/// changes.
#[derive(Debug)]
pub struct DisaggProblem {
    original: Series,
    normalized: Series,
    derivative: Series,
    tolerance: f64,
    mutation_rate: f64,
    ceiling_wh: f64,
}

impl DisaggProblem {
    pub fn new(signal: Series, config: &DisaggConfig) -> Result<Self, ProblemError> {
        config.validate()?;
        let defined = signal.defined_len();
        if defined < 2 {
            return Err(ProblemError::SignalTooShort {
                got: defined,
                needed: 2,
            });
        }

        let normalized = signal.remove_bias();
        let derivative = normalized.derivative();
        let ceiling_wh = normalized.sum_defined() * normalized.step_s() as f64 / 3600.0;
        if !(ceiling_wh > 0.0) {
            return Err(ProblemError::DegenerateCeiling(ceiling_wh));
        }

        Ok(Self {
            original: signal,
            normalized,
            derivative,
            tolerance: config.tolerance,
            mutation_rate: config.mutation_rate,
            ceiling_wh,
        })
    }

    pub fn original(&self) -> &Series {
        &self.original
    }

    pub fn normalized(&self) -> &Series {
        &self.normalized
    }

    pub fn derivative(&self) -> &Series {
        &self.derivative
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Maximum energy score any disaggregation could claim, in Wh.
    pub fn ceiling_wh(&self) -> f64 {
        self.ceiling_wh
    }

    /// Fresh private working copies for one individual.
    pub fn working_signals(&self) -> WorkingSignals {
        WorkingSignals {
            normalized: self.normalized.clone(),
            derivative: self.derivative.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse_signal() -> Series {
        let mut values = vec![0.0; 700];
        for v in values.iter_mut().take(650).skip(50) {
            *v = 500.0;
        }
        Series::from_uniform(0, 1, values).unwrap()
    }

    #[test]
    fn test_rejects_short_signal() {
        let signal = Series::from_uniform(0, 1, vec![5.0]).unwrap();
        let result = DisaggProblem::new(signal, &DisaggConfig::default());
        assert!(matches!(
            result,
            Err(ProblemError::SignalTooShort { got: 1, needed: 2 })
        ));
    }

    #[test]
    fn test_rejects_all_gap_signal() {
        let signal = Series::from_uniform(0, 1, vec![f64::NAN; 100]).unwrap();
        let result = DisaggProblem::new(signal, &DisaggConfig::default());
        assert!(matches!(result, Err(ProblemError::SignalTooShort { .. })));
    }

    #[test]
    fn test_flat_signal_has_degenerate_ceiling() {
        let signal = Series::from_uniform(0, 1, vec![0.0; 100]).unwrap();
        let result = DisaggProblem::new(signal, &DisaggConfig::default());
        assert!(matches!(result, Err(ProblemError::DegenerateCeiling(c)) if c == 0.0));
    }

    #[test]
    fn test_ceiling_of_single_pulse() {
        let problem = DisaggProblem::new(pulse_signal(), &DisaggConfig::default()).unwrap();
        assert!((problem.ceiling_wh() - 500.0 * 600.0 / 3600.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_does_not_inflate_ceiling() {
        // A constant 100 W background load is bias, not claimable energy.
        let mut values = vec![100.0; 700];
        for v in values.iter_mut().take(650).skip(50) {
            *v = 600.0;
        }
        let signal = Series::from_uniform(0, 1, values).unwrap();
        let problem = DisaggProblem::new(signal, &DisaggConfig::default()).unwrap();
        assert!((problem.ceiling_wh() - 500.0 * 600.0 / 3600.0).abs() < 1e-9);
    }
}
