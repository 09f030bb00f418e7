//! Learned inlining policy.
//!
//! Rules are tried in order and the first match wins:
//!
//! 1. the unit asks to inline everything
//! 2. the callee is an intrinsic
//! 3. the callee is force-inlined upstream
//! 4. the network decides: output above [`SKIP_THRESHOLD`] skips, anything
//!    else (including exactly the threshold) inlines
//!
//! Only rule 4 extracts features or touches the network.

use std::sync::Arc;

use otterc_config::InliningOptions;
use otterc_metrics::{DecisionEvent, InliningReporter, NullReporter};

use crate::budget::BudgetGate;
use crate::candidate::CallSiteCandidate;
use crate::decision::{Decision, DecisionRule};
use crate::error::ModelResult;
use crate::features::FeatureVector;
use crate::network::{self, Evaluator, NetworkModel};

/// Network outputs strictly above this value reject the call site
pub const SKIP_THRESHOLD: f64 = 0.5;

pub struct InliningPolicy<E = Arc<NetworkModel>> {
    evaluator: E,
    reporter: Arc<dyn InliningReporter>,
    budget: BudgetGate,
}

impl InliningPolicy<Arc<NetworkModel>> {
    /// Build the policy around the shared network at `options.model`.
    ///
    /// Fails if the artifact cannot be loaded; there is no fallback verdict.
    pub fn load(options: &InliningOptions, reporter: Arc<dyn InliningReporter>) -> ModelResult<Self> {
        let model = network::load_shared(&options.model_path())?;
        Ok(Self::with_evaluator(model, reporter))
    }
}

impl<E: Evaluator> InliningPolicy<E> {
    pub fn with_evaluator(evaluator: E, reporter: Arc<dyn InliningReporter>) -> Self {
        Self {
            evaluator,
            budget: BudgetGate::new(reporter.clone()),
            reporter,
        }
    }

    /// Policy that reports nowhere
    pub fn silent(evaluator: E) -> Self {
        Self::with_evaluator(evaluator, Arc::new(NullReporter))
    }

    /// Whether the walker may start another inlining round for a unit of
    /// `current_size` nodes
    pub fn continue_inlining(&self, current_size: usize, options: &InliningOptions) -> bool {
        self.budget
            .continue_inlining(current_size, options.max_desired_size)
    }

    /// Decide whether `candidate` is worth inlining
    pub fn decide(&self, candidate: &CallSiteCandidate, options: &InliningOptions) -> Decision {
        let tracing = options.trace_inlining;

        let decision = match override_rule(candidate, options) {
            Some(rule) => Decision::new(rule, tracing, None),
            None => {
                let features = FeatureVector::extract(candidate);
                let output = self.evaluator.evaluate(&features);
                // NaN compares false and therefore inlines
                let rule = if output > SKIP_THRESHOLD {
                    DecisionRule::NetworkUnprofitable
                } else {
                    DecisionRule::NetworkProfitable
                };
                Decision::new(rule, tracing, Some(output))
            }
        };

        if tracing {
            self.reporter.record_decision(&DecisionEvent {
                callee: &candidate.callee,
                depth: candidate.depth,
                fully_processed: candidate.fully_processed,
                inlined: decision.should_inline(),
                rule: decision.rule.name(),
                reason: decision.rule.reason(),
                network_output: decision.network_output,
            });
        }

        decision
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}

fn override_rule(candidate: &CallSiteCandidate, options: &InliningOptions) -> Option<DecisionRule> {
    if options.inline_everything {
        Some(DecisionRule::InlineEverything)
    } else if candidate.intrinsic {
        Some(DecisionRule::Intrinsic)
    } else if candidate.force_inline {
        Some(DecisionRule::ForcedInlining)
    } else {
        None
    }
}
