use std::sync::Arc;

use tracing::debug;

/// A single traced inlining decision
#[derive(Debug, Clone, Copy)]
pub struct DecisionEvent<'a> {
    /// Name of the callee under consideration
    pub callee: &'a str,

    /// Inlining depth of the call site
    pub depth: u32,

    /// Whether the callee had already been fully optimized
    pub fully_processed: bool,

    /// Whether the call site is inlined
    pub inlined: bool,

    /// Identifier of the rule that fired
    pub rule: &'static str,

    /// Human readable reason for the decision
    pub reason: &'static str,

    /// Network output, when the network was consulted
    pub network_output: Option<f64>,
}

/// Sink for inlining telemetry.
///
/// Implementations are shared between concurrently running compilations and
/// must only use interior synchronization.
pub trait InliningReporter: Send + Sync {
    /// Called once per decision while tracing is enabled
    fn record_decision(&self, event: &DecisionEvent<'_>);

    /// Called every time the budget gate stops inlining for a unit
    fn record_budget_cutoff(&self, current_size: usize, max_size: usize);
}

impl<R: InliningReporter + ?Sized> InliningReporter for Arc<R> {
    fn record_decision(&self, event: &DecisionEvent<'_>) {
        (**self).record_decision(event);
    }

    fn record_budget_cutoff(&self, current_size: usize, max_size: usize) {
        (**self).record_budget_cutoff(current_size, max_size);
    }
}

/// Reporter that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl InliningReporter for NullReporter {
    fn record_decision(&self, _event: &DecisionEvent<'_>) {}

    fn record_budget_cutoff(&self, _current_size: usize, _max_size: usize) {}
}

/// Writes trace lines through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl InliningReporter for TracingReporter {
    fn record_decision(&self, event: &DecisionEvent<'_>) {
        let verdict = if event.inlined { "inlining" } else { "not inlining" };
        debug!(
            target: "otterc_inline::trace",
            callee = event.callee,
            depth = event.depth,
            fully_processed = event.fully_processed,
            rule = event.rule,
            network_output = event.network_output,
            "{verdict} {}: {}",
            event.callee,
            event.reason
        );
    }

    fn record_budget_cutoff(&self, current_size: usize, max_size: usize) {
        debug!(
            target: "otterc_inline::trace",
            current_size,
            max_size,
            "inlining is cut off by maximum desired size"
        );
    }
}

/// Fans every record out to a list of reporters
#[derive(Default, Clone)]
pub struct Reporters {
    sinks: Vec<Arc<dyn InliningReporter>>,
}

impl Reporters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn InliningReporter>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn push(&mut self, sink: Arc<dyn InliningReporter>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl InliningReporter for Reporters {
    fn record_decision(&self, event: &DecisionEvent<'_>) {
        for sink in &self.sinks {
            sink.record_decision(event);
        }
    }

    fn record_budget_cutoff(&self, current_size: usize, max_size: usize) {
        for sink in &self.sinks {
            sink.record_budget_cutoff(current_size, max_size);
        }
    }
}
