//! Learned inlining policy for the otter compiler.
//!
//! This crate bundles the workspace crates behind one import:
//!
//! - [`config`]: [`InliningOptions`] and the model location
//! - [`inline`]: candidates, features, the network and the policy
//! - [`metrics`]: reporters for decision traces and budget cutoffs
//! - [`utils`]: logging setup and timing helpers
//!
//! ```no_run
//! use std::sync::Arc;
//! use otter_inline::{CallSiteCandidate, InliningOptions, InliningPolicy, TracingReporter};
//!
//! # fn main() -> Result<(), otter_inline::ModelError> {
//! let options = InliningOptions::from_env();
//! let policy = InliningPolicy::load(&options, Arc::new(TracingReporter))?;
//!
//! let candidate = CallSiteCandidate::new("Vec.push", 20).with_relevance(3.0);
//! if policy.continue_inlining(1_200, &options) && policy.decide(&candidate, &options).should_inline() {
//!     // splice the callee into the caller
//! }
//! # Ok(())
//! # }
//! ```

pub mod testing;

pub use otterc_config as config;
pub use otterc_inline as inline;
pub use otterc_metrics as metrics;
pub use otterc_utils as utils;

pub use otterc_config::{InliningOptions, ModelLocation};
pub use otterc_inline::{
    BudgetGate, CallSiteCandidate, CalleeTarget, Decision, DecisionRule, Evaluator,
    FeatureVector, InliningPolicy, ModelArtifact, ModelError, ModelResult, NetworkModel, Verdict,
};
pub use otterc_metrics::{
    DecisionProfiler, InliningCounters, InliningReporter, NullReporter, Reporters,
    TracingReporter,
};
pub use otterc_utils::init_logging;
