//! Bounded chronological window of recent samples.

use aquaview_schemas::sample::Sample;
use std::collections::VecDeque;

/// Fixed-capacity sample window, oldest first. Appending past capacity drops
/// from the front. The session worker is the only writer; everyone else sees
/// cloned snapshots.
#[derive(Debug, Clone, Default)]
pub struct History {
    samples: VecDeque<Sample>,
}

impl History {
    /// Window size. Thirty points at the default 3 s interval is ninety
    /// seconds of context, enough for the chart and the report prompt.
    pub const CAPACITY: usize = 30;

    pub fn new() -> Self {
        Self::default()
    }

    /// Build a window from backfilled samples, keeping the newest if given
    /// more than [`Self::CAPACITY`].
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        let mut history = Self::new();
        for sample in samples {
            history.append(sample);
        }
        history
    }

    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > Self::CAPACITY {
            self.samples.pop_front();
        }
    }

    /// Most recent sample, if any.
    pub fn current(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// The newest `n` samples in chronological order.
    pub fn recent(&self, n: usize) -> Vec<Sample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip).copied().collect()
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
