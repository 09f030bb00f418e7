//! Size budget for a compilation unit.

use std::sync::Arc;

use otterc_metrics::{InliningReporter, NullReporter};

/// Stops inlining once a unit has grown to its configured ceiling.
///
/// The host recomputes the unit's size and asks once per inlining round.
#[derive(Clone)]
pub struct BudgetGate {
    reporter: Arc<dyn InliningReporter>,
}

impl BudgetGate {
    pub fn new(reporter: Arc<dyn InliningReporter>) -> Self {
        Self { reporter }
    }

    /// `false` once `current_size >= max_size`, reporting the cutoff
    pub fn continue_inlining(&self, current_size: usize, max_size: usize) -> bool {
        if current_size >= max_size {
            self.reporter.record_budget_cutoff(current_size, max_size);
            return false;
        }
        true
    }
}

impl Default for BudgetGate {
    fn default() -> Self {
        Self::new(Arc::new(NullReporter))
    }
}
