//! Feature extraction for the inlining network.
//!
//! The order of [`FEATURE_NAMES`] is part of the model contract: a trained
//! artifact lists the same names in the same order and is rejected otherwise.

use std::fmt;

use tracing::trace;

use crate::candidate::CallSiteCandidate;

pub const FEATURE_COUNT: usize = 5;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "previous_low_level_graph_size",
    "node_count",
    "fully_processed",
    "invoke_probability",
    "relevance",
];

/// Prior compiled size assumed for callees that were never compiled
pub const DEFAULT_PREVIOUS_SIZE: f64 = 0.0;

/// Invoke probability assumed when the call site has no profile
pub const DEFAULT_INVOKE_PROBABILITY: f64 = 1.0;

/// Fixed-order numeric summary of a call site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(
        previous_low_level_graph_size: f64,
        node_count: f64,
        fully_processed: f64,
        invoke_probability: f64,
        relevance: f64,
    ) -> Self {
        Self([
            previous_low_level_graph_size,
            node_count,
            fully_processed,
            invoke_probability,
            relevance,
        ])
    }

    /// Derive the features of a candidate.
    ///
    /// Negative counts floor to 0, a missing prior compilation counts as
    /// size 0, and the invoke probability is clamped to `[0, 1]` with 1.0
    /// standing in for missing or NaN profiles. Relevance is passed through
    /// untouched, including NaN and infinities; the network must tolerate it.
    pub fn extract(candidate: &CallSiteCandidate) -> Self {
        let previous = candidate
            .previous_compiled_size
            .map_or(DEFAULT_PREVIOUS_SIZE, floor_count);
        let nodes = floor_count(candidate.node_count);
        let fully_processed = if candidate.fully_processed { 1.0 } else { 0.0 };
        let invoke_probability = sanitize_probability(candidate.invoke_probability);

        let features = Self::new(
            previous,
            nodes,
            fully_processed,
            invoke_probability,
            candidate.relevance,
        );
        trace!(callee = %candidate.callee, %features, "extracted inlining features");
        features
    }

    pub fn previous_low_level_graph_size(&self) -> f64 {
        self.0[0]
    }

    pub fn node_count(&self) -> f64 {
        self.0[1]
    }

    pub fn fully_processed(&self) -> f64 {
        self.0[2]
    }

    pub fn invoke_probability(&self) -> f64 {
        self.0[3]
    }

    pub fn relevance(&self) -> f64 {
        self.0[4]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_array(self) -> [f64; FEATURE_COUNT] {
        self.0
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, value) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}

fn floor_count(count: i64) -> f64 {
    count.max(0) as f64
}

fn sanitize_probability(probability: Option<f64>) -> f64 {
    match probability {
        Some(p) if !p.is_nan() => p.clamp(0.0, 1.0),
        _ => DEFAULT_INVOKE_PROBABILITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_in_contract_order() {
        let candidate = CallSiteCandidate::new("Vec.push", 20)
            .with_previous_compiled_size(50)
            .fully_processed(true)
            .with_invoke_probability(0.8)
            .with_relevance(3.0);

        let features = FeatureVector::extract(&candidate);
        assert_eq!(features.to_array(), [50.0, 20.0, 1.0, 0.8, 3.0]);
        assert_eq!(features.fully_processed(), 1.0);
        assert_eq!(features.invoke_probability(), 0.8);
        assert_eq!(features.relevance(), 3.0);

        let fresh = FeatureVector::extract(&candidate.fully_processed(false));
        assert_eq!(fresh.fully_processed(), 0.0);
    }

    #[test]
    fn test_missing_prior_compilation_defaults_to_zero() {
        let candidate = CallSiteCandidate::new("f", 7).with_invoke_probability(0.5);
        let features = FeatureVector::extract(&candidate);
        assert_eq!(features.previous_low_level_graph_size(), 0.0);
        assert_eq!(features.to_array(), [0.0, 7.0, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_negative_counts_floor_to_zero() {
        let candidate = CallSiteCandidate::new("f", -12).with_previous_compiled_size(-1);
        let features = FeatureVector::extract(&candidate);
        assert_eq!(features.node_count(), 0.0);
        assert_eq!(features.previous_low_level_graph_size(), 0.0);
    }

    #[test]
    fn test_invoke_probability_sanitized() {
        let cases = [
            (None, 1.0),
            (Some(f64::NAN), 1.0),
            (Some(-0.25), 0.0),
            (Some(4.0), 1.0),
            (Some(f64::INFINITY), 1.0),
            (Some(f64::NEG_INFINITY), 0.0),
            (Some(0.3), 0.3),
        ];
        for (input, expected) in cases {
            let mut candidate = CallSiteCandidate::new("f", 1);
            candidate.invoke_probability = input;
            let features = FeatureVector::extract(&candidate);
            assert_eq!(features.invoke_probability(), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_relevance_passes_through() {
        let candidate = CallSiteCandidate::new("f", 1).with_relevance(-17.5);
        assert_eq!(FeatureVector::extract(&candidate).relevance(), -17.5);

        let candidate = CallSiteCandidate::new("f", 1).with_relevance(f64::INFINITY);
        assert_eq!(FeatureVector::extract(&candidate).relevance(), f64::INFINITY);

        let candidate = CallSiteCandidate::new("f", 1).with_relevance(f64::NAN);
        assert!(FeatureVector::extract(&candidate).relevance().is_nan());
    }

    #[test]
    fn test_display() {
        let features = FeatureVector::new(1.0, 2.0, 0.0, 0.5, 3.0);
        assert_eq!(features.to_string(), "[1, 2, 0, 0.5, 3]");
    }
}
