use std::fmt;

/// Outcome for a single call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Inline,
    Skip,
}

impl Verdict {
    pub fn is_inline(self) -> bool {
        matches!(self, Verdict::Inline)
    }
}

/// Rule of the precedence chain that produced a decision, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionRule {
    InlineEverything,
    Intrinsic,
    ForcedInlining,
    NetworkProfitable,
    NetworkUnprofitable,
}

impl DecisionRule {
    pub fn name(self) -> &'static str {
        match self {
            DecisionRule::InlineEverything => "inline_everything",
            DecisionRule::Intrinsic => "intrinsic",
            DecisionRule::ForcedInlining => "forced_inlining",
            DecisionRule::NetworkProfitable => "network_profitable",
            DecisionRule::NetworkUnprofitable => "network_unprofitable",
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            DecisionRule::InlineEverything => "inline everything",
            DecisionRule::Intrinsic => "intrinsic",
            DecisionRule::ForcedInlining => "forced inlining",
            DecisionRule::NetworkProfitable => "network predicts profitable",
            DecisionRule::NetworkUnprofitable => "network predicts unprofitable",
        }
    }

    pub fn verdict(self) -> Verdict {
        match self {
            DecisionRule::NetworkUnprofitable => Verdict::Skip,
            _ => Verdict::Inline,
        }
    }

    /// Whether the rule required a network evaluation
    pub fn consults_network(self) -> bool {
        matches!(
            self,
            DecisionRule::NetworkProfitable | DecisionRule::NetworkUnprofitable
        )
    }
}

impl fmt::Display for DecisionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of asking the policy whether a call site is worth inlining
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub verdict: Verdict,

    pub rule: DecisionRule,

    /// Only populated while tracing is enabled
    pub reason: Option<&'static str>,

    /// Scalar produced by the network, when it was consulted
    pub network_output: Option<f64>,
}

impl Decision {
    pub(crate) fn new(rule: DecisionRule, tracing: bool, network_output: Option<f64>) -> Self {
        Self {
            verdict: rule.verdict(),
            rule,
            reason: tracing.then(|| rule.reason()),
            network_output,
        }
    }

    pub fn should_inline(&self) -> bool {
        self.verdict.is_inline()
    }
}
