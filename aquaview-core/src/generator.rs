//! Synthetic sample generation.
//!
//! Each tick perturbs the previous reading by a bounded uniform step, rounds
//! to the parameter's display precision and clamps to its physical range.
//! Temperature, pH, turbidity and dissolved oxygen wander symmetrically;
//! lead and copper use a slightly positive interval so contamination creeps
//! upward over a session. The random source is injected so tests can drive
//! the generator with a seeded sequence.

use aquaview_schemas::sample::Sample;
use chrono::Utc;
use rand::Rng;

use crate::history::History;

/// Hand-chosen nominal reading used to seed an empty history. Every value
/// sits comfortably inside the default alert thresholds.
pub const BASELINE: Sample = Sample {
    time: 0,
    temp: 25.0,
    ph: 7.5,
    turbidity: 10.0,
    dissolved_oxygen: 8.0,
    lead: 0.001,
    copper: 0.1,
};

/// Physical clamp ranges, shared with the generator tests.
pub const TEMP_RANGE: (f64, f64) = (5.0, 45.0);
pub const PH_RANGE: (f64, f64) = (4.0, 10.0);
pub const TURBIDITY_RANGE: (f64, f64) = (0.0, 200.0);
pub const DISSOLVED_OXYGEN_RANGE: (f64, f64) = (0.0, 15.0);
pub const LEAD_RANGE: (f64, f64) = (0.0, 0.1);
pub const COPPER_RANGE: (f64, f64) = (0.0, 2.5);

pub struct SampleGenerator<R: Rng> {
    rng: R,
}

impl<R: Rng> SampleGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Next reading, stamped with the wall clock.
    pub fn next(&mut self, previous: &Sample) -> Sample {
        self.next_at(previous, Utc::now().timestamp_millis())
    }

    /// Next reading with an explicit timestamp, used for backfill and tests.
    pub fn next_at(&mut self, previous: &Sample, time: i64) -> Sample {
        Sample {
            time,
            temp: step(previous.temp + self.symmetric(0.5), 1, TEMP_RANGE),
            ph: step(previous.ph + self.symmetric(0.1), 1, PH_RANGE),
            turbidity: step(previous.turbidity + self.symmetric(5.0), 0, TURBIDITY_RANGE),
            dissolved_oxygen: step(
                previous.dissolved_oxygen + self.symmetric(0.2),
                1,
                DISSOLVED_OXYGEN_RANGE,
            ),
            lead: step(previous.lead + self.creeping(0.002), 4, LEAD_RANGE),
            copper: step(previous.copper + self.creeping(0.05), 3, COPPER_RANGE),
        }
    }

    /// A full history window ending at `now_ms`, spaced `interval_ms` apart,
    /// grown from [`BASELINE`] by repeated application of the generator.
    pub fn backfill(&mut self, interval_ms: u64, now_ms: i64) -> Vec<Sample> {
        let n = History::CAPACITY;
        let spacing = interval_ms as i64;
        let time_of = |index: usize| now_ms - (n as i64 - 1 - index as i64) * spacing;

        let mut samples = Vec::with_capacity(n);
        samples.push(Sample {
            time: time_of(0),
            ..BASELINE
        });
        for i in 1..n {
            let previous = samples[i - 1];
            samples.push(self.next_at(&previous, time_of(i)));
        }
        samples
    }

    /// Uniform step in (-span/2, +span/2).
    fn symmetric(&mut self, span: f64) -> f64 {
        (self.rng.gen::<f64>() - 0.5) * span
    }

    /// Uniform step in (-0.49·span, +0.51·span): biased toward accumulation.
    fn creeping(&mut self, span: f64) -> f64 {
        (self.rng.gen::<f64>() - 0.49) * span
    }
}

/// Round to `decimals` places, then clamp to the physical range.
fn step(value: f64, decimals: i32, range: (f64, f64)) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    rounded.clamp(range.0, range.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn step_rounds_then_clamps() {
        assert_eq!(step(25.16, 1, TEMP_RANGE), 25.2);
        assert_eq!(step(4.94, 1, TEMP_RANGE), 5.0);
        assert_eq!(step(45.31, 1, TEMP_RANGE), 45.0);
        assert_eq!(step(-1.0, 0, TURBIDITY_RANGE), 0.0);
    }

    #[test]
    fn timestamps_are_caller_controlled_for_backfill() {
        let mut gen = SampleGenerator::new(StdRng::seed_from_u64(7));
        let sample = gen.next_at(&BASELINE, 42);
        assert_eq!(sample.time, 42);
    }
}
