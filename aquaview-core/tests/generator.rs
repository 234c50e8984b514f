use aquaview_core::generator::{
    SampleGenerator, BASELINE, COPPER_RANGE, DISSOLVED_OXYGEN_RANGE, LEAD_RANGE, PH_RANGE,
    TEMP_RANGE, TURBIDITY_RANGE,
};
use aquaview_core::history::History;
use aquaview_schemas::sample::Sample;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn assert_in_ranges(sample: &Sample) {
    assert!(sample.temp >= TEMP_RANGE.0 && sample.temp <= TEMP_RANGE.1);
    assert!(sample.ph >= PH_RANGE.0 && sample.ph <= PH_RANGE.1);
    assert!(sample.turbidity >= TURBIDITY_RANGE.0 && sample.turbidity <= TURBIDITY_RANGE.1);
    assert!(
        sample.dissolved_oxygen >= DISSOLVED_OXYGEN_RANGE.0
            && sample.dissolved_oxygen <= DISSOLVED_OXYGEN_RANGE.1
    );
    assert!(sample.lead >= LEAD_RANGE.0 && sample.lead <= LEAD_RANGE.1);
    assert!(sample.copper >= COPPER_RANGE.0 && sample.copper <= COPPER_RANGE.1);
}

#[test]
fn generated_fields_stay_in_physical_ranges() {
    let mut generator = SampleGenerator::new(StdRng::seed_from_u64(11));
    let mut previous = BASELINE;
    for t in 1..5000 {
        let sample = generator.next_at(&previous, t);
        assert_in_ranges(&sample);
        previous = sample;
    }
}

#[test]
fn boundary_previous_samples_stay_clamped() {
    let mut generator = SampleGenerator::new(StdRng::seed_from_u64(12));
    let extremes = [
        Sample {
            time: 0,
            temp: TEMP_RANGE.0,
            ph: PH_RANGE.0,
            turbidity: TURBIDITY_RANGE.0,
            dissolved_oxygen: DISSOLVED_OXYGEN_RANGE.0,
            lead: LEAD_RANGE.0,
            copper: COPPER_RANGE.0,
        },
        Sample {
            time: 0,
            temp: TEMP_RANGE.1,
            ph: PH_RANGE.1,
            turbidity: TURBIDITY_RANGE.1,
            dissolved_oxygen: DISSOLVED_OXYGEN_RANGE.1,
            lead: LEAD_RANGE.1,
            copper: COPPER_RANGE.1,
        },
    ];
    for previous in extremes {
        for t in 1..200 {
            assert_in_ranges(&generator.next_at(&previous, t));
        }
    }
}

#[test]
fn values_round_to_display_precision() {
    let mut generator = SampleGenerator::new(StdRng::seed_from_u64(13));
    let mut previous = BASELINE;
    let integral = |value: f64| (value - value.round()).abs() < 1e-6;
    for t in 1..500 {
        let sample = generator.next_at(&previous, t);
        assert!(integral(sample.temp * 10.0));
        assert!(integral(sample.ph * 10.0));
        assert!(integral(sample.turbidity));
        assert!(integral(sample.dissolved_oxygen * 10.0));
        assert!(integral(sample.lead * 10_000.0));
        assert!(integral(sample.copper * 1_000.0));
        previous = sample;
    }
}

#[test]
fn heavy_metals_creep_upward_over_a_long_run() {
    let mut generator = SampleGenerator::new(StdRng::seed_from_u64(14));
    let mut previous = BASELINE;
    for t in 1..2000 {
        previous = generator.next_at(&previous, t);
    }
    assert!(previous.copper > BASELINE.copper);
    assert!(previous.lead > BASELINE.lead);
}

#[test]
fn backfill_fills_the_window_chronologically() {
    let mut generator = SampleGenerator::new(StdRng::seed_from_u64(15));
    let now = 1_700_000_000_000;
    let samples = generator.backfill(3000, now);

    assert_eq!(samples.len(), History::CAPACITY);
    assert_eq!(samples.last().map(|s| s.time), Some(now));
    for pair in samples.windows(2) {
        assert_eq!(pair[1].time - pair[0].time, 3000);
    }
    for sample in &samples {
        assert_in_ranges(sample);
    }

    // The window grows from the nominal baseline reading.
    assert_eq!(samples[0].temp, BASELINE.temp);
    assert_eq!(samples[0].ph, BASELINE.ph);
}
