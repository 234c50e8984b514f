use aquaview_core::error::AquaViewError;
use aquaview_core::history::History;
use aquaview_core::notify::NotificationSink;
use aquaview_core::session::Session;
use aquaview_schemas::alert::AlertNotification;
use aquaview_schemas::sample::Sample;
use aquaview_schemas::settings::{AlertThresholdsPatch, BandPatch, SettingsPatch};
use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::Duration;

#[derive(Default)]
struct MemorySink(Mutex<Vec<AlertNotification>>);

impl NotificationSink for MemorySink {
    fn notify(&self, alert: &AlertNotification) {
        self.0.lock().unwrap().push(alert.clone());
    }
}

fn step(prev: &Sample, next: &Sample) -> [f64; 6] {
    [
        next.temp - prev.temp,
        next.ph - prev.ph,
        next.turbidity - prev.turbidity,
        next.dissolved_oxygen - prev.dissolved_oxygen,
        next.lead - prev.lead,
        next.copper - prev.copper,
    ]
}

#[test]
fn builds_running_with_a_backfilled_window() {
    let mut session = Session::builder().with_rng_seed(1).build().unwrap();
    assert!(session.is_running());

    let history = session.history();
    assert_eq!(history.len(), History::CAPACITY);
    assert!(history.windows(2).all(|w| w[0].time <= w[1].time));

    session.stop();
    assert!(!session.is_running());
}

#[test]
fn stop_is_idempotent_and_restart_works() {
    let mut session = Session::builder().with_rng_seed(2).build().unwrap();
    session.stop();
    session.stop();
    assert!(!session.is_running());

    session.start().unwrap();
    assert!(session.is_running());
    session.start().unwrap(); // no duplicate timer
    session.stop();
}

#[test]
fn ticks_append_while_running() {
    let mut session = Session::builder().paused().with_rng_seed(3).build().unwrap();
    session.set_refresh_interval(500).unwrap();
    let last_backfilled = session.current_sample().unwrap().time;

    session.start().unwrap();
    sleep(Duration::from_millis(1300));
    session.stop();

    let fresh = session
        .history()
        .iter()
        .filter(|s| s.time > last_backfilled)
        .count();
    assert!(fresh >= 1, "expected at least one tick, got {}", fresh);
    // The window never outgrows its capacity.
    assert_eq!(session.history().len(), History::CAPACITY);
}

#[test]
fn interval_change_reschedules_the_live_timer() {
    let mut session = Session::builder().paused().with_rng_seed(4).build().unwrap();
    session.set_refresh_interval(3000).unwrap();
    session.start().unwrap();

    sleep(Duration::from_millis(200));
    let before_change = session.current_sample().unwrap().time;
    session.set_refresh_interval(500).unwrap();

    // Under the old period the next tick would still be ~2.8 s away.
    sleep(Duration::from_millis(900));
    session.stop();

    let fresh = session
        .history()
        .iter()
        .filter(|s| s.time > before_change)
        .count();
    assert!(fresh >= 1, "interval change did not take effect immediately");
}

#[test]
fn short_interval_is_rejected_and_state_kept() {
    let mut session = Session::builder().paused().with_rng_seed(5).build().unwrap();
    let err = session.set_refresh_interval(200).unwrap_err();
    assert!(matches!(err, AquaViewError::IntervalTooShort(200)));
    assert_eq!(session.settings().refresh_interval_ms, 3000);
}

#[test]
fn restart_continues_the_random_sequence() {
    let mut session = Session::builder().paused().with_rng_seed(42).build().unwrap();
    session.set_refresh_interval(500).unwrap();
    let tail = session.current_sample().unwrap();

    session.start().unwrap();
    sleep(Duration::from_millis(800));
    session.stop();
    let first_run: Vec<_> = session
        .history()
        .into_iter()
        .filter(|s| s.time > tail.time)
        .collect();
    assert!(!first_run.is_empty());
    let resumed_from = *first_run.last().unwrap();

    session.start().unwrap();
    sleep(Duration::from_millis(800));
    session.stop();
    let second_run: Vec<_> = session
        .history()
        .into_iter()
        .filter(|s| s.time > resumed_from.time)
        .collect();
    assert!(!second_run.is_empty());

    // A resumed session keeps drawing from the same random stream. If the
    // generator were re-seeded on start, the first post-resume step would
    // repeat the first post-backfill perturbation exactly.
    assert_ne!(
        step(&tail, &first_run[0]),
        step(&resumed_from, &second_run[0]),
        "restart replayed the perturbation sequence"
    );
}

#[test]
fn threshold_breaches_reach_the_sink() {
    let sink = Arc::new(MemorySink::default());
    let mut session = Session::builder()
        .paused()
        .with_rng_seed(6)
        .with_sink(sink.clone())
        .build()
        .unwrap();

    // An impossible temperature band makes every tick alert.
    session.update_settings(SettingsPatch {
        alerts: Some(AlertThresholdsPatch {
            temp: Some(BandPatch {
                min: Some(100.0),
                max: Some(200.0),
            }),
            ..Default::default()
        }),
        ..Default::default()
    });
    session.set_refresh_interval(500).unwrap();
    session.start().unwrap();
    sleep(Duration::from_millis(1300));
    session.stop();

    let alerts = sink.0.lock().unwrap();
    assert!(!alerts.is_empty());
    assert!(alerts.iter().all(|a| a.title == "Temperature Alert"));
}
