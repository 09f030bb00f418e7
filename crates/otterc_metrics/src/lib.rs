//! Telemetry sinks for the inlining policy.
//!
//! The policy never writes to a global registry. Every trace record and
//! counter increment goes through an [`InliningReporter`] handed to it by
//! the host.

pub mod counters;
pub mod profiler;
pub mod reporter;

pub use counters::{CountersSnapshot, InliningCounters};
pub use profiler::{DecisionProfiler, DecisionRecord, RuleStats};
pub use reporter::{DecisionEvent, InliningReporter, NullReporter, Reporters, TracingReporter};
