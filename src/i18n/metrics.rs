//! Counters for a single translation run.
//!
//! One `RunMetrics` is created per run and passed by reference to whatever
//! records into it. Counters are atomic because translation calls may run
//! concurrently.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct RunMetrics {
    /// Text runs produced by the walker
    fragments: AtomicUsize,

    /// Fragments too short to be worth a remote call
    trivial: AtomicUsize,

    /// Repeats of an already planned (slide, text) pair
    duplicates: AtomicUsize,

    /// Calls made to the completion service
    api_calls: AtomicUsize,

    /// Completions that stopped for any reason other than a natural stop
    incomplete: AtomicUsize,

    /// Fragments whose translation came back identical
    unchanged: AtomicUsize,

    /// Replacement operations planned
    replacements: AtomicUsize,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fragment(&self) {
        self.fragments.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_trivial(&self) {
        self.trivial.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_incomplete(&self) {
        self.incomplete.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unchanged(&self) {
        self.unchanged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_replacement(&self) {
        self.replacements.fetch_add(1, Ordering::Relaxed);
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn incomplete(&self) -> usize {
        self.incomplete.load(Ordering::Relaxed)
    }

    /// Snapshot the counters.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            fragments: self.fragments.load(Ordering::Relaxed),
            trivial: self.trivial.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            api_calls: self.api_calls(),
            incomplete: self.incomplete(),
            unchanged: self.unchanged.load(Ordering::Relaxed),
            replacements: self.replacements.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`RunMetrics`], logged as JSON at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsReport {
    pub fragments: usize,
    pub trivial: usize,
    pub duplicates: usize,
    pub api_calls: usize,
    pub incomplete: usize,
    pub unchanged: usize,
    pub replacements: usize,
}
