//! Consumption blocks: a matched on/off edge pair.

use super::event::Event;
use super::series::Series;

/// Errors raised when pairing two events into a block.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("a block needs a non-empty on-event and off-event")]
    EmptyEvent,
    #[error("on-event and off-event share a timestamp")]
    OverlappingEvents,
    #[error("the off-event must follow the on-event in time")]
    MisorderedEvents,
}

/// One appliance usage episode: an on-event paired with an off-event.
///
/// The two events must be disjoint in time. The block's waveform is
/// reconstructed by a zero-order hold of the running sum of both events'
/// steps, sampled at 1 second over the half-open span
/// `[first_ts, last_ts)`. Average power is the mean of that
/// reconstruction and the energy score its sum in watt-hours, so
/// `energy == duration * avg_power / 3600` holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    on: Event,
    off: Event,
    /// Both events' points merged, sorted by time.
    steps: Vec<(i64, f64)>,
    avg_power_w: f64,
    energy_wh: f64,
}

impl Block {
    pub fn new(on: Event, off: Event) -> Result<Self, BlockError> {
        if on.is_empty() || off.is_empty() {
            return Err(BlockError::EmptyEvent);
        }
        if on.overlaps(&off) {
            return Err(BlockError::OverlappingEvents);
        }
        if off.first_ts() < on.last_ts() {
            return Err(BlockError::MisorderedEvents);
        }

        let mut steps: Vec<(i64, f64)> = on
            .timestamps()
            .iter()
            .zip(on.values())
            .chain(off.timestamps().iter().zip(off.values()))
            .map(|(ts, v)| (*ts, *v))
            .collect();
        steps.sort_by_key(|(ts, _)| *ts);

        let mut block = Self {
            on,
            off,
            steps,
            avg_power_w: 0.0,
            energy_wh: 0.0,
        };
        let reconstruction = block.reconstruct();
        let total: f64 = reconstruction.iter().sum();
        block.avg_power_w = total / reconstruction.len() as f64;
        block.energy_wh = total / 3600.0;
        Ok(block)
    }

    pub fn on(&self) -> &Event {
        &self.on
    }

    pub fn off(&self) -> &Event {
        &self.off
    }

    pub fn first_ts(&self) -> i64 {
        self.steps[0].0
    }

    pub fn last_ts(&self) -> i64 {
        self.steps[self.steps.len() - 1].0
    }

    /// Seconds between the first and last sample (half-open span).
    pub fn duration_secs(&self) -> i64 {
        self.last_ts() - self.first_ts()
    }

    pub fn avg_power_w(&self) -> f64 {
        self.avg_power_w
    }

    /// Energy explained by the block, in watt-hours.
    pub fn energy_wh(&self) -> f64 {
        self.energy_wh
    }

    /// Zero-order-hold reconstruction of the block waveform at 1 s
    /// resolution over `[first_ts, last_ts)`.
    pub fn reconstruct(&self) -> Vec<f64> {
        let first = self.first_ts();
        let duration = self.duration_secs() as usize;
        let mut reconstruction = Vec::with_capacity(duration);
        let mut cumulative = 0.0;
        let mut next_step = 0;
        for offset in 0..duration as i64 {
            let t = first + offset;
            while next_step < self.steps.len() && self.steps[next_step].0 <= t {
                cumulative += self.steps[next_step].1;
                next_step += 1;
            }
            reconstruction.push(cumulative);
        }
        reconstruction
    }

    /// Check the block against a reference signal.
    ///
    /// A detected block must be a genuine excursion: its average power
    /// must not exceed the reference mean over its span, nor the
    /// reference minimum over the interior between the edges. A region
    /// with no defined data invalidates the block.
    pub fn is_valid(&self, reference: &Series) -> bool {
        let span_mean = reference.mean_between(self.first_ts(), self.last_ts());
        let interior_min = reference.min_between(self.on.last_ts(), self.off.first_ts());
        match (span_mean, interior_min) {
            (Some(mean), Some(minimum)) => {
                self.avg_power_w <= mean && self.avg_power_w <= minimum
            }
            _ => false,
        }
    }

    /// Erase the block from working copies of the signal.
    ///
    /// Subtracts the reconstruction magnitude from the normalized signal
    /// at every covered timestamp and consumes the events' exact
    /// timestamps in the derivative signal. Call once per accepted block.
    pub fn remove_from(&self, normalized: &mut Series, derivative: &mut Series) {
        let first = self.first_ts();
        for (offset, magnitude) in self.reconstruct().into_iter().enumerate() {
            normalized.subtract_at(first + offset as i64, magnitude.abs());
        }
        for ts in self.on.timestamps().iter().chain(self.off.timestamps()) {
            derivative.clear_value(*ts);
        }
    }
}
