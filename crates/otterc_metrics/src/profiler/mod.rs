// Decision history and per-rule tallies
pub mod decision_profiler;

pub use decision_profiler::{DecisionProfiler, DecisionRecord, RuleStats};
