//! Learned inlining predictor.
//!
//! A small feed-forward network trained offline by neuroevolution. Loading
//! is the only fallible step and happens once per artifact; evaluation is a
//! pure function of the frozen weights and the feature vector.

pub mod artifact;
pub mod model;
pub mod registry;

pub use artifact::{
    ARTIFACT_FORMAT, ARTIFACT_VERSION, Activation, ConnectionSpec, ModelArtifact, NeuronKind,
    NeuronSpec,
};
pub use model::NetworkModel;
pub use registry::{is_loaded, load_shared};

use std::sync::Arc;

use crate::features::FeatureVector;

/// Anything that maps a feature vector to the network's scalar output.
///
/// Implementations are shared by concurrently running compilations, so they
/// must not keep per-call state between evaluations.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, features: &FeatureVector) -> f64;
}

impl<E: Evaluator + ?Sized> Evaluator for Arc<E> {
    fn evaluate(&self, features: &FeatureVector) -> f64 {
        (**self).evaluate(features)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, features: &FeatureVector) -> f64 {
        (**self).evaluate(features)
    }
}
