//! Scan loops shared by the detection strategies.
//!
//! All working state lives in the signals passed in; a scan snapshots the
//! candidate samples it will walk before touching anything, so removal of
//! matched points never happens mid-iteration.

use crate::signal::{Block, Event, Series};

use super::strategy::{Direction, Matching, Polarity};

/// The pair of working signals a strategy consumes matched points from.
#[derive(Debug, Clone)]
pub struct WorkingSignals {
    /// Baseline-removed signal; blocks validate against it and are
    /// subtracted from it.
    pub normalized: Series,
    /// First derivative of the normalized signal; matched edge samples
    /// are consumed from it.
    pub derivative: Series,
}

/// Relative matching rule for two opposite-signed edges.
///
/// A candidate edge `candidate` matches a reference edge `reference` when
/// it approximately cancels it: `|reference + candidate| <= |reference| *
/// tolerance`, independent of absolute magnitude.
pub fn is_match(reference: f64, candidate: f64, tolerance: f64) -> bool {
    (reference + candidate).abs() <= reference.abs() * tolerance
}

/// Defined samples of one sign, in time order.
fn signed_samples(series: &Series, positive: bool) -> Vec<(i64, f64)> {
    series
        .iter_defined()
        .filter(|&(_, v)| if positive { v > 0.0 } else { v < 0.0 })
        .collect()
}

fn in_direction<T>(mut items: Vec<T>, direction: Direction) -> Vec<T> {
    if direction == Direction::Backward {
        items.reverse();
    }
    items
}

/// Opposite-signed samples in the seed's search window, in scan order:
/// forward of a rising seed, backward of a falling seed.
fn candidate_window(candidates: &[(i64, f64)], polarity: Polarity, seed: &Event) -> Vec<(i64, f64)> {
    match polarity {
        Polarity::Rising => {
            let from = candidates.partition_point(|&(ts, _)| ts < seed.last_ts());
            candidates[from..].to_vec()
        }
        Polarity::Falling => {
            let to = candidates.partition_point(|&(ts, _)| ts <= seed.first_ts());
            candidates[..to].iter().rev().copied().collect()
        }
    }
}

/// First single sample in the window that cancels the seed.
fn match_single(window: &[(i64, f64)], seed_total: f64, tolerance: f64) -> Option<Event> {
    window
        .iter()
        .find(|&&(_, v)| is_match(seed_total, v, tolerance))
        .map(|&(ts, v)| Event::new(ts, v))
}

/// Grow runs of consecutive samples (gap of exactly one step) until one
/// cancels the seed. Runs of a single sample are the single-point
/// matcher's job and are skipped here.
fn match_multiple(
    window: &[(i64, f64)],
    seed_total: f64,
    tolerance: f64,
    step: i64,
) -> Option<Event> {
    for i in 0..window.len().saturating_sub(1) {
        if (window[i].0 - window[i + 1].0).abs() != step {
            continue;
        }
        let mut event = Event::new(window[i].0, window[i].1);
        event.push(window[i + 1].0, window[i + 1].1);
        if is_match(seed_total, event.total_value(), tolerance) {
            return Some(event);
        }
        let mut n = i + 1;
        while n + 1 < window.len() && (window[n].0 - window[n + 1].0).abs() == step {
            event.push(window[n + 1].0, window[n + 1].1);
            n += 1;
            if is_match(seed_total, event.total_value(), tolerance) {
                return Some(event);
            }
        }
    }
    None
}

/// Group same-signed samples into maximal consecutive runs.
fn composite_runs(samples: &[(i64, f64)], step: i64) -> Vec<Event> {
    let mut runs: Vec<Event> = Vec::new();
    for &(ts, v) in samples {
        let extends_last = runs.last().is_some_and(|run| ts - run.last_ts() == step);
        if extends_last {
            if let Some(run) = runs.last_mut() {
                run.push(ts, v);
            }
        } else {
            runs.push(Event::new(ts, v));
        }
    }
    runs
}

/// Pair a matched seed/candidate into a block and, if it survives the
/// validity check, consume it from the working signals.
fn accept(
    seed: Event,
    matched: Event,
    polarity: Polarity,
    signals: &mut WorkingSignals,
) -> Option<Block> {
    let (on, off) = match polarity {
        Polarity::Rising => (seed, matched),
        Polarity::Falling => (matched, seed),
    };
    let block = Block::new(on, off).ok()?;
    if block.is_valid(&signals.normalized) {
        block.remove_from(&mut signals.normalized, &mut signals.derivative);
        Some(block)
    } else {
        None
    }
}

/// Single-sample seed scan.
///
/// Walks single-sample edges of the chosen polarity in the chosen
/// direction and matches each against the opposite-polarity samples in
/// its window. Returns the first block that validates, consuming it from
/// the working signals; `None` is the expected no-match outcome.
pub fn point_scan(
    direction: Direction,
    polarity: Polarity,
    matching: Matching,
    signals: &mut WorkingSignals,
    tolerance: f64,
) -> Option<Block> {
    let seed_positive = polarity == Polarity::Rising;
    let seeds = in_direction(signed_samples(&signals.derivative, seed_positive), direction);
    let candidates = signed_samples(&signals.derivative, !seed_positive);
    let step = signals.derivative.step_s();

    for (seed_ts, seed_value) in seeds {
        let seed = Event::new(seed_ts, seed_value);
        let window = candidate_window(&candidates, polarity, &seed);
        let matched = match matching {
            Matching::SinglePoint => match_single(&window, seed.total_value(), tolerance),
            Matching::MultiPoint => match_multiple(&window, seed.total_value(), tolerance, step),
        };
        let Some(matched) = matched else { continue };
        if let Some(block) = accept(seed, matched, polarity, signals) {
            return Some(block);
        }
    }
    None
}

/// Composite seed scan.
///
/// Groups consecutive same-signed derivative samples into one composite
/// edge before matching, to capture edges that ramp over several samples,
/// and matches the composite total against a single opposite sample.
pub fn ramp_scan(
    direction: Direction,
    polarity: Polarity,
    signals: &mut WorkingSignals,
    tolerance: f64,
) -> Option<Block> {
    let seed_positive = polarity == Polarity::Rising;
    let step = signals.derivative.step_s();
    let runs = in_direction(
        composite_runs(&signed_samples(&signals.derivative, seed_positive), step),
        direction,
    );
    let candidates = signed_samples(&signals.derivative, !seed_positive);

    for seed in runs {
        let window = candidate_window(&candidates, polarity, &seed);
        let Some(matched) = match_single(&window, seed.total_value(), tolerance) else {
            continue;
        };
        if let Some(block) = accept(seed, matched, polarity, signals) {
            return Some(block);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn signals_from(values: &[f64]) -> WorkingSignals {
        let normalized = Series::from_uniform(0, 1, values.to_vec()).unwrap();
        let derivative = normalized.derivative();
        WorkingSignals {
            normalized,
            derivative,
        }
    }

    fn pulse(len: usize, start: usize, duration: usize, power: f64) -> Vec<f64> {
        let mut values = vec![0.0; len];
        for v in values.iter_mut().take(start + duration).skip(start) {
            *v = power;
        }
        values
    }

    #[test]
    fn test_is_match_exact_cancel() {
        assert!(is_match(500.0, -500.0, 0.0));
        assert!(is_match(-500.0, 500.0, 0.0));
    }

    #[test]
    fn test_is_match_relative_slack() {
        assert!(is_match(500.0, -460.0, 0.1));
        assert!(!is_match(500.0, -440.0, 0.1));
    }

    #[test]
    fn test_point_scan_finds_clean_pulse() {
        let mut signals = signals_from(&pulse(30, 5, 10, 500.0));
        let block = point_scan(
            Direction::Forward,
            Polarity::Rising,
            Matching::SinglePoint,
            &mut signals,
            0.1,
        )
        .expect("pulse should match");
        assert_eq!(block.first_ts(), 5);
        assert_eq!(block.last_ts(), 15);
        assert!((block.avg_power_w() - 500.0).abs() < 1e-9);

        // The matched points are consumed: a second scan finds nothing.
        assert!(
            point_scan(
                Direction::Forward,
                Polarity::Rising,
                Matching::SinglePoint,
                &mut signals,
                0.1,
            )
            .is_none()
        );
    }

    #[test]
    fn test_point_scan_falling_backward_finds_same_pulse() {
        let mut signals = signals_from(&pulse(30, 5, 10, 500.0));
        let block = point_scan(
            Direction::Backward,
            Polarity::Falling,
            Matching::SinglePoint,
            &mut signals,
            0.1,
        )
        .expect("pulse should match");
        assert_eq!(block.first_ts(), 5);
        assert_eq!(block.last_ts(), 15);
    }

    #[test]
    fn test_point_scan_multipoint_matches_ramped_off_edge() {
        // Turns off in two half steps: the off edge is spread over two
        // samples and only cancels the on edge as a composite.
        let values = [0.0, 0.0, 500.0, 500.0, 250.0, 0.0, 0.0, 0.0];
        let mut signals = signals_from(&values);

        assert!(
            point_scan(
                Direction::Forward,
                Polarity::Rising,
                Matching::SinglePoint,
                &mut signals.clone(),
                0.1,
            )
            .is_none()
        );

        let block = point_scan(
            Direction::Forward,
            Polarity::Rising,
            Matching::MultiPoint,
            &mut signals,
            0.1,
        )
        .expect("composite off edge should match");
        assert_eq!(block.off().len(), 2);
        assert!((block.off().total_value() + 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_ramp_scan_matches_ramped_on_edge() {
        let values = [0.0, 250.0, 500.0, 500.0, 500.0, 0.0, 0.0];
        let mut signals = signals_from(&values);

        let block = ramp_scan(Direction::Forward, Polarity::Rising, &mut signals, 0.1)
            .expect("composite on edge should match");
        assert_eq!(block.on().len(), 2);
        assert!((block.on().total_value() - 500.0).abs() < 1e-9);
        assert_eq!(block.off().len(), 1);
    }

    #[test]
    fn test_unmatched_edge_returns_none() {
        // Power turns on and never off.
        let values = [0.0, 0.0, 500.0, 500.0, 500.0];
        let mut signals = signals_from(&values);
        assert!(
            point_scan(
                Direction::Forward,
                Polarity::Rising,
                Matching::SinglePoint,
                &mut signals,
                0.1,
            )
            .is_none()
        );
    }

    #[test]
    fn test_gap_breaks_composite_run() {
        let samples = [(0, 10.0), (1, 10.0), (5, 10.0)];
        let runs = composite_runs(&samples, 1);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
        assert_eq!(runs[1].len(), 1);
    }

    proptest! {
        // An exact mirror edge matches at any non-negative tolerance.
        #[test]
        fn prop_mirror_edge_always_matches(
            v in 1.0f64..1e6,
            tol in 0.0f64..1.0,
        ) {
            prop_assert!(is_match(v, -v, tol));
            prop_assert!(is_match(-v, v, tol));
        }

        // Matching only degrades as the tolerance shrinks.
        #[test]
        fn prop_match_monotone_in_tolerance(
            reference in 1.0f64..1e6,
            candidate in -1e6f64..-1.0,
            tol_low in 0.0f64..1.0,
            tol_high in 0.0f64..1.0,
        ) {
            let (lo, hi) = if tol_low <= tol_high {
                (tol_low, tol_high)
            } else {
                (tol_high, tol_low)
            };
            if is_match(reference, candidate, lo) {
                prop_assert!(is_match(reference, candidate, hi));
            }
        }
    }
}
