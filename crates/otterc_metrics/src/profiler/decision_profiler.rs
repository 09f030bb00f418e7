//! Decision profiling for inspecting how the inlining policy behaves

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::reporter::{DecisionEvent, InliningReporter};

/// Owned copy of a traced decision
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    /// Callee name
    pub callee: String,

    /// Inlining depth of the call site
    pub depth: u32,

    /// Whether the callee had already been fully optimized
    pub fully_processed: bool,

    /// Whether the call site was inlined
    pub inlined: bool,

    /// Rule that fired
    pub rule: &'static str,

    /// Reason attached to the decision
    pub reason: &'static str,

    /// Network output, if the network was consulted
    pub network_output: Option<f64>,

    /// Timestamp (milliseconds since epoch)
    pub timestamp_ms: u64,
}

impl DecisionRecord {
    fn from_event(event: &DecisionEvent<'_>) -> Self {
        Self {
            callee: event.callee.to_string(),
            depth: event.depth,
            fully_processed: event.fully_processed,
            inlined: event.inlined,
            rule: event.rule,
            reason: event.reason,
            network_output: event.network_output,
            timestamp_ms: current_time_ms(),
        }
    }
}

/// Statistics for a single rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleStats {
    /// Number of times the rule fired
    pub hits: u64,

    /// Deepest call site the rule fired on
    pub max_depth: u32,

    /// Sum of network outputs seen for this rule
    pub total_network_output: f64,
}

impl RuleStats {
    fn record(&mut self, record: &DecisionRecord) {
        self.hits += 1;
        self.max_depth = self.max_depth.max(record.depth);
        if let Some(output) = record.network_output {
            self.total_network_output += output;
        }
    }

    /// Mean network output for the rule, 0 if the network never ran
    pub fn avg_network_output(&self) -> f64 {
        if self.hits == 0 {
            0.0
        } else {
            self.total_network_output / self.hits as f64
        }
    }
}

/// Decision profiler
pub struct DecisionProfiler {
    /// Statistics per rule
    rule_stats: Arc<RwLock<HashMap<&'static str, RuleStats>>>,

    /// Decision history
    history: Arc<RwLock<Vec<DecisionRecord>>>,

    /// Maximum history size
    max_history_size: usize,
}

impl DecisionProfiler {
    pub fn new() -> Self {
        Self::with_history_size(1000)
    }

    pub fn with_history_size(max_history_size: usize) -> Self {
        Self {
            rule_stats: Arc::new(RwLock::new(HashMap::new())),
            history: Arc::new(RwLock::new(Vec::new())),
            max_history_size,
        }
    }

    /// Get statistics for a rule
    pub fn get_rule_stats(&self, rule: &str) -> Option<RuleStats> {
        self.rule_stats.read().get(rule).cloned()
    }

    /// Get all rule statistics
    pub fn get_all_rule_stats(&self) -> HashMap<&'static str, RuleStats> {
        self.rule_stats.read().clone()
    }

    /// Get decision history, oldest first
    pub fn get_history(&self) -> Vec<DecisionRecord> {
        self.history.read().clone()
    }

    /// Decisions recorded for a callee
    pub fn decisions_for(&self, callee: &str) -> Vec<DecisionRecord> {
        self.history
            .read()
            .iter()
            .filter(|record| record.callee == callee)
            .cloned()
            .collect()
    }

    /// Fraction of the retained history that inlined
    pub fn inline_ratio(&self) -> f64 {
        let history = self.history.read();
        if history.is_empty() {
            return 0.0;
        }
        let inlined = history.iter().filter(|r| r.inlined).count();
        inlined as f64 / history.len() as f64
    }

    /// Clear all statistics
    pub fn clear(&self) {
        self.rule_stats.write().clear();
        self.history.write().clear();
    }
}

impl Default for DecisionProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl InliningReporter for DecisionProfiler {
    fn record_decision(&self, event: &DecisionEvent<'_>) {
        let record = DecisionRecord::from_event(event);

        let mut rule_stats = self.rule_stats.write();
        rule_stats.entry(record.rule).or_default().record(&record);
        drop(rule_stats);

        let mut history = self.history.write();
        if self.max_history_size == 0 {
            return;
        }
        if history.len() >= self.max_history_size {
            history.remove(0);
        }
        history.push(record);
    }

    fn record_budget_cutoff(&self, _current_size: usize, _max_size: usize) {}
}

/// Get current time in milliseconds
fn current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
