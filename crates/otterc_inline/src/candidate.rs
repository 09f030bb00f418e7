//! Call-site metadata supplied by the inlining walker.

/// One concrete target of a (possibly polymorphic) call site
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalleeTarget {
    /// IR node count of the target's body
    pub node_count: i64,

    /// Size of the target's most recent low-level compilation, if any
    pub previous_compiled_size: Option<i64>,
}

impl CalleeTarget {
    pub fn new(node_count: i64) -> Self {
        Self {
            node_count,
            previous_compiled_size: None,
        }
    }

    pub fn with_previous_compiled_size(mut self, size: i64) -> Self {
        self.previous_compiled_size = Some(size);
        self
    }
}

/// A call site under consideration.
///
/// Built by the host for a single decision and dropped afterwards; the policy
/// keeps no reference to it. Counts are signed because hosts hand over raw
/// counters; negative values are floored during feature extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSiteCandidate {
    /// Callee name, used only for trace records
    pub callee: String,

    /// Caller-computed importance of the call site
    pub relevance: f64,

    /// IR node count of the callee body
    pub node_count: i64,

    /// Low-level size of the callee's previous compilation, if any
    pub previous_compiled_size: Option<i64>,

    /// Profiled execution probability of the call site relative to its
    /// enclosing method, if profiling data exists
    pub invoke_probability: Option<f64>,

    /// Whether the callee already finished its own optimization pass
    pub fully_processed: bool,

    /// Inlining depth of the call site
    pub depth: u32,

    /// Upstream policy demands inlining
    pub force_inline: bool,

    /// Callee has a hand-written runtime substitution
    pub intrinsic: bool,
}

impl CallSiteCandidate {
    pub fn new(callee: impl Into<String>, node_count: i64) -> Self {
        Self {
            callee: callee.into(),
            relevance: 1.0,
            node_count,
            previous_compiled_size: None,
            invoke_probability: None,
            fully_processed: false,
            depth: 0,
            force_inline: false,
            intrinsic: false,
        }
    }

    /// Candidate for a call site dispatching to several targets.
    ///
    /// Node counts are summed. Only strictly positive prior compiled sizes
    /// contribute to the previous size; it stays unknown when no target has
    /// been compiled before.
    pub fn polymorphic(callee: impl Into<String>, targets: &[CalleeTarget]) -> Self {
        let node_count = targets
            .iter()
            .map(|t| t.node_count.max(0))
            .fold(0i64, i64::saturating_add);

        let previous_compiled_size = targets
            .iter()
            .filter_map(|t| t.previous_compiled_size)
            .filter(|size| *size > 0)
            .reduce(i64::saturating_add);

        Self {
            previous_compiled_size,
            ..Self::new(callee, node_count)
        }
    }

    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.relevance = relevance;
        self
    }

    pub fn with_previous_compiled_size(mut self, size: i64) -> Self {
        self.previous_compiled_size = Some(size);
        self
    }

    pub fn with_invoke_probability(mut self, probability: f64) -> Self {
        self.invoke_probability = Some(probability);
        self
    }

    pub fn fully_processed(mut self, fully_processed: bool) -> Self {
        self.fully_processed = fully_processed;
        self
    }

    pub fn at_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn forced(mut self) -> Self {
        self.force_inline = true;
        self
    }

    pub fn intrinsic(mut self) -> Self {
        self.intrinsic = true;
        self
    }
}
