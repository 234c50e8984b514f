//! The simulation session: an explicitly owned monitoring loop.
//!
//! A [`Session`] owns the settings store, the history window and a worker
//! thread that plays the periodic timer. The state machine has two states,
//! Stopped and Running; a session starts Running as soon as it is built
//! (unless built paused) and keeps ticking until stopped or dropped. The
//! worker is the single writer of the history; every other consumer gets
//! cloned snapshots.
//!
//! The timer is a `recv_timeout` on the control channel: a tick fires when
//! the wait times out, and control messages (stop, reschedule) interrupt the
//! wait immediately. Rescheduling therefore never leaves a stale timer armed,
//! and an interval change takes effect within the new period rather than
//! waiting out the old one.
//!
//! The session owns one generator for its whole lifetime: backfill, ticks
//! and restarts all draw from the same random stream, so a seeded session
//! does not replay its pre-stop perturbation sequence after a resume.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use aquaview_schemas::sample::Sample;
use aquaview_schemas::settings::{Settings, SettingsPatch, MIN_REFRESH_INTERVAL_MS};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::AquaViewError;
use crate::evaluator;
use crate::generator::{SampleGenerator, BASELINE};
use crate::history::History;
use crate::notify::{LogSink, NotificationSink};
use crate::store::SettingsStore;

enum Control {
    Reschedule(u64),
    Stop,
}

struct Worker {
    control: Sender<Control>,
    handle: JoinHandle<()>,
}

/// A fluent builder for constructing a [`Session`].
pub struct SessionBuilder {
    store: Option<SettingsStore>,
    sink: Arc<dyn NotificationSink>,
    rng_seed: Option<u64>,
    paused: bool,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            store: None,
            sink: Arc::new(LogSink),
            rng_seed: None,
            paused: false,
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific settings store; defaults to an ephemeral in-memory one.
    pub fn with_store(mut self, store: SettingsStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Route alert notifications to `sink` instead of the log facade.
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Seed the random source for deterministic generation.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Build in the Stopped state instead of starting immediately.
    pub fn paused(mut self) -> Self {
        self.paused = true;
        self
    }

    /// Consumes the builder, backfills the history window and, unless built
    /// paused, arms the timer.
    pub fn build(self) -> Result<Session, AquaViewError> {
        let store = self.store.unwrap_or_else(SettingsStore::ephemeral);
        let interval_ms = store.settings().refresh_interval_ms;

        let mut generator = SampleGenerator::new(rng_from(self.rng_seed));
        let backfilled = generator.backfill(interval_ms, Utc::now().timestamp_millis());
        let history = History::from_samples(backfilled);

        let mut session = Session {
            store: Arc::new(Mutex::new(store)),
            history: Arc::new(Mutex::new(history)),
            generator: Arc::new(Mutex::new(generator)),
            sink: self.sink,
            worker: None,
        };
        if !self.paused {
            session.start()?;
        }
        Ok(session)
    }
}

pub struct Session {
    store: Arc<Mutex<SettingsStore>>,
    history: Arc<Mutex<History>>,
    generator: Arc<Mutex<SampleGenerator<StdRng>>>,
    sink: Arc<dyn NotificationSink>,
    worker: Option<Worker>,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Arm the timer at the current refresh interval. Idempotent: calling
    /// while Running keeps the existing timer.
    pub fn start(&mut self) -> Result<(), AquaViewError> {
        if self.worker.is_some() {
            return Ok(());
        }
        let period_ms = lock(&self.store).settings().refresh_interval_ms;
        let (tx, rx) = mpsc::channel();
        let store = Arc::clone(&self.store);
        let history = Arc::clone(&self.history);
        let generator = Arc::clone(&self.generator);
        let sink = Arc::clone(&self.sink);

        let handle = thread::Builder::new()
            .name("aquaview-session".to_string())
            .spawn(move || run_loop(rx, period_ms, store, history, generator, sink))
            .map_err(AquaViewError::WorkerSpawn)?;

        self.worker = Some(Worker { control: tx, handle });
        log::info!("monitoring started at {} ms interval", period_ms);
        Ok(())
    }

    /// Cancel the timer and join the worker. Idempotent: stopping a stopped
    /// session is a no-op.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.control.send(Control::Stop);
            let _ = worker.handle.join();
            log::info!("monitoring stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Change the tick period. Values below the minimum are rejected and the
    /// prior interval stays in force. A live timer is rescheduled
    /// immediately; the next tick lands within the new period.
    pub fn set_refresh_interval(&mut self, interval_ms: u64) -> Result<Settings, AquaViewError> {
        if interval_ms < MIN_REFRESH_INTERVAL_MS {
            return Err(AquaViewError::IntervalTooShort(interval_ms));
        }
        let settings = lock(&self.store).update(SettingsPatch {
            refresh_interval_ms: Some(interval_ms),
            ..Default::default()
        });
        self.reschedule(settings.refresh_interval_ms);
        Ok(settings)
    }

    /// Merge a partial settings update, rescheduling if the interval moved.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Settings {
        let before = lock(&self.store).settings().refresh_interval_ms;
        let settings = lock(&self.store).update(patch);
        if settings.refresh_interval_ms != before {
            self.reschedule(settings.refresh_interval_ms);
        }
        settings
    }

    pub fn settings(&self) -> Settings {
        lock(&self.store).settings().clone()
    }

    /// Snapshot of the full history window, oldest first.
    pub fn history(&self) -> Vec<Sample> {
        lock(&self.history).to_vec()
    }

    /// Snapshot of the newest `n` samples, oldest first.
    pub fn recent(&self, n: usize) -> Vec<Sample> {
        lock(&self.history).recent(n)
    }

    pub fn current_sample(&self) -> Option<Sample> {
        lock(&self.history).current().copied()
    }

    fn reschedule(&self, interval_ms: u64) {
        if let Some(worker) = &self.worker {
            let _ = worker.control.send(Control::Reschedule(interval_ms));
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    rx: Receiver<Control>,
    mut period_ms: u64,
    store: Arc<Mutex<SettingsStore>>,
    history: Arc<Mutex<History>>,
    generator: Arc<Mutex<SampleGenerator<StdRng>>>,
    sink: Arc<dyn NotificationSink>,
) {
    loop {
        match rx.recv_timeout(Duration::from_millis(period_ms)) {
            Ok(Control::Reschedule(interval_ms)) => {
                log::debug!("timer rescheduled: {} ms -> {} ms", period_ms, interval_ms);
                period_ms = interval_ms;
            }
            Ok(Control::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                tick(&generator, &store, &history, sink.as_ref());
            }
        }
    }
}

fn tick(
    generator: &Mutex<SampleGenerator<StdRng>>,
    store: &Mutex<SettingsStore>,
    history: &Mutex<History>,
    sink: &dyn NotificationSink,
) {
    let thresholds = lock(store).settings().alerts;
    let previous = lock(history).current().copied().unwrap_or(BASELINE);
    let sample = lock(generator).next(&previous);
    lock(history).append(sample);
    log::debug!("tick: sample at {} appended", sample.time);

    for alert in evaluator::evaluate(&sample, &thresholds) {
        sink.notify(&alert);
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

// Lock recovery: the worker only holds a guard across plain field access, so
// a poisoned mutex still contains a coherent value.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
