//! Monotonic counters for inlining telemetry

use std::sync::atomic::{AtomicU64, Ordering};

use crate::reporter::{DecisionEvent, InliningReporter};

/// Lock-free counters, safe to share across compiler threads
#[derive(Debug, Default)]
pub struct InliningCounters {
    budget_cutoffs: AtomicU64,
    traced_decisions: AtomicU64,
    inlined: AtomicU64,
    skipped: AtomicU64,
}

/// Point-in-time copy of [`InliningCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountersSnapshot {
    pub budget_cutoffs: u64,
    pub traced_decisions: u64,
    pub inlined: u64,
    pub skipped: u64,
}

impl InliningCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times inlining was stopped by the size budget
    pub fn budget_cutoffs(&self) -> u64 {
        self.budget_cutoffs.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            budget_cutoffs: self.budget_cutoffs.load(Ordering::Relaxed),
            traced_decisions: self.traced_decisions.load(Ordering::Relaxed),
            inlined: self.inlined.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

impl InliningReporter for InliningCounters {
    fn record_decision(&self, event: &DecisionEvent<'_>) {
        self.traced_decisions.fetch_add(1, Ordering::Relaxed);
        if event.inlined {
            self.inlined.fetch_add(1, Ordering::Relaxed);
        } else {
            self.skipped.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_budget_cutoff(&self, _current_size: usize, _max_size: usize) {
        self.budget_cutoffs.fetch_add(1, Ordering::Relaxed);
    }
}
