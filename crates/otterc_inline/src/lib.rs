//! Learned inlining policy for the otter compiler.
//!
//! The host walks its call graph, builds a [`CallSiteCandidate`] for each
//! call site and asks an [`InliningPolicy`] for a [`Decision`]. Between
//! inlining rounds it checks [`InliningPolicy::continue_inlining`] so a unit
//! never grows past its size budget.

pub mod budget;
pub mod candidate;
pub mod decision;
pub mod error;
pub mod features;
pub mod network;
pub mod policy;

pub use budget::BudgetGate;
pub use candidate::{CallSiteCandidate, CalleeTarget};
pub use decision::{Decision, DecisionRule, Verdict};
pub use error::{ModelError, ModelResult};
pub use features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
pub use network::{Evaluator, ModelArtifact, NetworkModel};
pub use policy::{InliningPolicy, SKIP_THRESHOLD};
