//! Time-indexed power signal storage and preprocessing.

/// Errors raised when constructing a [`Series`] from raw samples.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    #[error("timestamp and value lengths differ ({timestamps} vs {values})")]
    LengthMismatch { timestamps: usize, values: usize },
    #[error("timestamps must be strictly increasing (violation at position {position})")]
    UnorderedTimestamps { position: usize },
    #[error("sampling step must be positive, got {0}")]
    InvalidStep(i64),
}

/// A time-indexed numeric signal with explicit gaps.
///
/// Timestamps are unix seconds and strictly increasing. A missing sample
/// is stored as `f64::NAN` and means "no data here" — it is never treated
/// as zero, and never produces an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    timestamps: Vec<i64>,
    values: Vec<f64>,
    step_s: i64,
}

impl Series {
    /// Build a series from parallel timestamp/value vectors.
    pub fn new(timestamps: Vec<i64>, values: Vec<f64>, step_s: i64) -> Result<Self, SeriesError> {
        if timestamps.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                timestamps: timestamps.len(),
                values: values.len(),
            });
        }
        if step_s <= 0 {
            return Err(SeriesError::InvalidStep(step_s));
        }
        if let Some(position) = timestamps.windows(2).position(|w| w[0] >= w[1]) {
            return Err(SeriesError::UnorderedTimestamps {
                position: position + 1,
            });
        }
        Ok(Self {
            timestamps,
            values,
            step_s,
        })
    }

    /// Build an evenly sampled series starting at `start_ts`.
    pub fn from_uniform(start_ts: i64, step_s: i64, values: Vec<f64>) -> Result<Self, SeriesError> {
        let timestamps = (0..values.len() as i64)
            .map(|i| start_ts + i * step_s)
            .collect();
        Self::new(timestamps, values, step_s)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of samples that actually carry data.
    pub fn defined_len(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    pub fn step_s(&self) -> i64 {
        self.step_s
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate the defined samples in time order.
    pub fn iter_defined(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.timestamps
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| !v.is_nan())
            .map(|(ts, v)| (*ts, *v))
    }

    /// Value at an exact timestamp; `None` for absent or gap samples.
    pub fn value_at(&self, ts: i64) -> Option<f64> {
        let idx = self.timestamps.binary_search(&ts).ok()?;
        let v = self.values[idx];
        (!v.is_nan()).then_some(v)
    }

    /// Index range covering the half-open timestamp window `[from, to)`.
    fn index_range(&self, from: i64, to: i64) -> (usize, usize) {
        let lo = self.timestamps.partition_point(|&ts| ts < from);
        let hi = self.timestamps.partition_point(|&ts| ts < to);
        (lo, hi)
    }

    /// Mean of the defined samples in `[from, to)`, `None` if all absent.
    pub fn mean_between(&self, from: i64, to: i64) -> Option<f64> {
        let (lo, hi) = self.index_range(from, to);
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in &self.values[lo..hi] {
            if !v.is_nan() {
                sum += v;
                count += 1;
            }
        }
        (count > 0).then(|| sum / count as f64)
    }

    /// Minimum of the defined samples in `[from, to)`, `None` if all absent.
    pub fn min_between(&self, from: i64, to: i64) -> Option<f64> {
        let (lo, hi) = self.index_range(from, to);
        self.values[lo..hi]
            .iter()
            .filter(|v| !v.is_nan())
            .copied()
            .reduce(f64::min)
    }

    /// Sum of all defined samples.
    pub fn sum_defined(&self) -> f64 {
        self.values.iter().filter(|v| !v.is_nan()).sum()
    }

    /// First difference of the signal.
    ///
    /// Position 0 has no predecessor and becomes a gap, as does any
    /// position where either operand is a gap.
    pub fn derivative(&self) -> Series {
        let mut values = vec![f64::NAN; self.values.len()];
        for i in 1..self.values.len() {
            values[i] = self.values[i] - self.values[i - 1];
        }
        Series {
            timestamps: self.timestamps.clone(),
            values,
            step_s: self.step_s,
        }
    }

    /// Remove the slowly-varying baseline from the signal.
    ///
    /// The baseline envelope at each timestamp is the larger of the running
    /// minimum scanned forward from the start and the running minimum
    /// scanned backward from the end. Subtracting it removes an always-on
    /// background load or a stepped baseline without distorting short
    /// transient blocks. Gaps stay gaps.
    pub fn remove_bias(&self) -> Series {
        let n = self.values.len();
        let mut forward_min = vec![f64::NAN; n];
        let mut running = f64::NAN;
        for i in 0..n {
            let v = self.values[i];
            if !v.is_nan() {
                running = if running.is_nan() { v } else { running.min(v) };
            }
            forward_min[i] = running;
        }
        let mut backward_min = vec![f64::NAN; n];
        running = f64::NAN;
        for i in (0..n).rev() {
            let v = self.values[i];
            if !v.is_nan() {
                running = if running.is_nan() { v } else { running.min(v) };
            }
            backward_min[i] = running;
        }
        let values = (0..n)
            .map(|i| {
                let envelope = forward_min[i].max(backward_min[i]);
                self.values[i] - envelope
            })
            .collect();
        Series {
            timestamps: self.timestamps.clone(),
            values,
            step_s: self.step_s,
        }
    }

    /// Mark the sample at `ts` as consumed. Returns whether a defined
    /// sample was cleared.
    pub fn clear_value(&mut self, ts: i64) -> bool {
        match self.timestamps.binary_search(&ts) {
            Ok(idx) => {
                let was_defined = !self.values[idx].is_nan();
                self.values[idx] = f64::NAN;
                was_defined
            }
            Err(_) => false,
        }
    }

    /// Subtract `amount` from the sample at `ts`, if present.
    pub fn subtract_at(&mut self, ts: i64, amount: f64) -> bool {
        match self.timestamps.binary_search(&ts) {
            Ok(idx) => {
                self.values[idx] -= amount;
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(values: &[f64]) -> Series {
        Series::from_uniform(1000, 1, values.to_vec()).unwrap()
    }

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        let result = Series::new(vec![0, 1], vec![1.0], 1);
        assert!(matches!(result, Err(SeriesError::LengthMismatch { .. })));
    }

    #[test]
    fn test_new_rejects_unordered_timestamps() {
        let result = Series::new(vec![0, 2, 1], vec![1.0, 2.0, 3.0], 1);
        assert!(matches!(
            result,
            Err(SeriesError::UnorderedTimestamps { position: 2 })
        ));
    }

    #[test]
    fn test_derivative_marks_gaps() {
        let series = uniform(&[1.0, 3.0, f64::NAN, 7.0, 8.0]);
        let diff = series.derivative();
        assert!(diff.values()[0].is_nan());
        assert_eq!(diff.values()[1], 2.0);
        assert!(diff.values()[2].is_nan());
        assert!(diff.values()[3].is_nan());
        assert_eq!(diff.values()[4], 1.0);
    }

    #[test]
    fn test_remove_bias_flat_baseline() {
        let series = uniform(&[100.0, 100.0, 600.0, 600.0, 100.0, 100.0]);
        let normalized = series.remove_bias();
        assert_eq!(
            normalized.values(),
            &[0.0, 0.0, 500.0, 500.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_remove_bias_stepped_baseline() {
        // Baseline steps from 100 up to 200 halfway through; the envelope
        // is the larger of the two running minima, so each half keeps its
        // own floor.
        let series = uniform(&[100.0, 100.0, 100.0, 200.0, 200.0, 200.0]);
        let normalized = series.remove_bias();
        assert_eq!(normalized.values(), &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

        let series = uniform(&[100.0, 600.0, 100.0, 200.0, 700.0, 200.0]);
        let normalized = series.remove_bias();
        assert_eq!(
            normalized.values(),
            &[0.0, 500.0, 0.0, 0.0, 500.0, 0.0]
        );
    }

    #[test]
    fn test_remove_bias_preserves_gaps() {
        let series = uniform(&[100.0, f64::NAN, 100.0]);
        let normalized = series.remove_bias();
        assert_eq!(normalized.values()[0], 0.0);
        assert!(normalized.values()[1].is_nan());
        assert_eq!(normalized.values()[2], 0.0);
    }

    #[test]
    fn test_range_aggregates_are_half_open() {
        let series = uniform(&[1.0, 2.0, 3.0, 4.0]);
        // [1001, 1003) covers the samples 2.0 and 3.0 only.
        assert_eq!(series.mean_between(1001, 1003), Some(2.5));
        assert_eq!(series.min_between(1001, 1003), Some(2.0));
    }

    #[test]
    fn test_range_aggregates_skip_gaps() {
        let series = uniform(&[1.0, f64::NAN, 3.0]);
        assert_eq!(series.mean_between(1000, 1003), Some(2.0));
        assert_eq!(series.min_between(1001, 1002), None);
    }

    #[test]
    fn test_clear_and_subtract() {
        let mut series = uniform(&[5.0, 6.0]);
        assert!(series.clear_value(1000));
        assert!(!series.clear_value(1000));
        assert!(!series.clear_value(999));
        assert!(series.value_at(1000).is_none());

        assert!(series.subtract_at(1001, 2.5));
        assert_eq!(series.value_at(1001), Some(3.5));
    }

    #[test]
    fn test_sum_and_defined_len() {
        let series = uniform(&[1.0, f64::NAN, 2.0]);
        assert_eq!(series.sum_defined(), 3.0);
        assert_eq!(series.defined_len(), 2);
    }
}
