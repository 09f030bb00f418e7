//! Immutable feed-forward network compiled from an artifact.
//!
//! Weights and topology are frozen at load time. Every evaluation allocates
//! its own activation buffer, so one model can serve any number of
//! concurrent compilations without locking.

use std::path::Path;

use ahash::AHashMap;
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::info;

use otterc_utils::Stopwatch;

use super::Evaluator;
use super::artifact::{ARTIFACT_FORMAT, ARTIFACT_VERSION, Activation, ModelArtifact, NeuronKind};
use crate::error::{ModelError, ModelResult};
use crate::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};

/// A neuron that computes a value, with its incoming weighted edges
#[derive(Debug, Clone)]
struct ComputeStep {
    slot: usize,
    activation: Activation,
    incoming: Vec<(usize, f64)>,
}

#[derive(Debug, Clone)]
pub struct NetworkModel {
    neuron_count: usize,
    connection_count: usize,
    input_slots: [usize; FEATURE_COUNT],
    bias_slots: Vec<usize>,
    output_slot: usize,
    /// Non-source neurons in topological order
    steps: Vec<ComputeStep>,
}

impl NetworkModel {
    /// Read, validate and compile the artifact at `path`
    pub fn load(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        let watch = Stopwatch::start_new();
        let artifact = ModelArtifact::read(path)?;
        let model = Self::from_artifact(&artifact)?;
        info!(
            path = %path.display(),
            neurons = model.neuron_count,
            connections = model.connection_count,
            load_us = watch.elapsed_us(),
            "loaded inlining network"
        );
        Ok(model)
    }

    pub fn from_artifact(artifact: &ModelArtifact) -> ModelResult<Self> {
        validate_header(artifact)?;

        let mut index_of: AHashMap<u32, usize> = AHashMap::with_capacity(artifact.neurons.len());
        let mut graph: DiGraph<u32, f64> =
            DiGraph::with_capacity(artifact.neurons.len(), artifact.connections.len());
        let mut input_slots = Vec::with_capacity(FEATURE_COUNT);
        let mut bias_slots = Vec::new();
        let mut output_slots = Vec::with_capacity(1);

        for (slot, neuron) in artifact.neurons.iter().enumerate() {
            if index_of.insert(neuron.id, slot).is_some() {
                return Err(ModelError::DuplicateNeuron { id: neuron.id });
            }
            graph.add_node(neuron.id);
            match neuron.kind {
                NeuronKind::Input => input_slots.push(slot),
                NeuronKind::Bias => bias_slots.push(slot),
                NeuronKind::Output => output_slots.push(slot),
                NeuronKind::Hidden => {}
            }
        }

        let input_slots: [usize; FEATURE_COUNT] =
            input_slots
                .try_into()
                .map_err(|slots: Vec<usize>| ModelError::InputArity {
                    found: slots.len(),
                    expected: FEATURE_COUNT,
                })?;
        let output_slot = match output_slots.as_slice() {
            [slot] => *slot,
            other => {
                return Err(ModelError::OutputArity {
                    found: other.len(),
                    expected: 1,
                });
            }
        };

        for connection in &artifact.connections {
            let (from, to) = (connection.from, connection.to);
            let (Some(&source), Some(&target)) = (index_of.get(&from), index_of.get(&to)) else {
                return Err(ModelError::UnknownNeuron { from, to });
            };
            if artifact.neurons[target].kind.is_source() {
                return Err(ModelError::IntoSource { from, to });
            }
            if !connection.weight.is_finite() {
                return Err(ModelError::NonFiniteWeight { from, to });
            }
            graph.add_edge(NodeIndex::new(source), NodeIndex::new(target), connection.weight);
        }

        let order = toposort(&graph, None).map_err(|cycle| ModelError::Cycle {
            id: graph[cycle.node_id()],
        })?;

        let steps = order
            .into_iter()
            .filter(|node| !artifact.neurons[node.index()].kind.is_source())
            .map(|node| ComputeStep {
                slot: node.index(),
                activation: artifact.neurons[node.index()].activation,
                incoming: graph
                    .edges_directed(node, Direction::Incoming)
                    .map(|edge| (edge.source().index(), *edge.weight()))
                    .collect(),
            })
            .collect();

        Ok(Self {
            neuron_count: artifact.neurons.len(),
            connection_count: artifact.connections.len(),
            input_slots,
            bias_slots,
            output_slot,
            steps,
        })
    }

    /// Propagate `features` through the network and return the single output.
    ///
    /// Pure in `(self, features)`: the activation buffer lives on this call's
    /// stack frame only.
    pub fn evaluate(&self, features: &FeatureVector) -> f64 {
        let mut activations = vec![0.0f64; self.neuron_count];

        for (slot, value) in self.input_slots.iter().zip(features.as_slice()) {
            activations[*slot] = *value;
        }
        for slot in &self.bias_slots {
            activations[*slot] = 1.0;
        }

        for step in &self.steps {
            let net: f64 = step
                .incoming
                .iter()
                .map(|(source, weight)| activations[*source] * weight)
                .sum();
            activations[step.slot] = step.activation.apply(net);
        }

        activations[self.output_slot]
    }

    pub fn neuron_count(&self) -> usize {
        self.neuron_count
    }

    pub fn connection_count(&self) -> usize {
        self.connection_count
    }
}

impl Evaluator for NetworkModel {
    fn evaluate(&self, features: &FeatureVector) -> f64 {
        NetworkModel::evaluate(self, features)
    }
}

fn validate_header(artifact: &ModelArtifact) -> ModelResult<()> {
    if artifact.format != ARTIFACT_FORMAT {
        return Err(ModelError::UnsupportedFormat {
            found: artifact.format.clone(),
            expected: ARTIFACT_FORMAT,
        });
    }
    if artifact.version != ARTIFACT_VERSION {
        return Err(ModelError::UnsupportedVersion {
            found: artifact.version,
            supported: ARTIFACT_VERSION,
        });
    }
    if artifact.inputs.len() != FEATURE_COUNT {
        return Err(ModelError::InputArity {
            found: artifact.inputs.len(),
            expected: FEATURE_COUNT,
        });
    }
    for (index, (found, expected)) in artifact.inputs.iter().zip(FEATURE_NAMES).enumerate() {
        if found != expected {
            return Err(ModelError::FeatureOrder {
                index,
                found: found.clone(),
                expected,
            });
        }
    }
    if artifact.outputs != 1 {
        return Err(ModelError::OutputArity {
            found: artifact.outputs,
            expected: 1,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::artifact::NeuronSpec;
    use rayon::prelude::*;

    const BIAS: u32 = 5;
    const HIDDEN: u32 = 6;
    const OUTPUT: u32 = 7;

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    fn inputs_and_bias() -> ModelArtifact {
        (0..5)
            .fold(ModelArtifact::new(), |artifact, id| {
                artifact.neuron(NeuronSpec::new(id, NeuronKind::Input))
            })
            .neuron(NeuronSpec::new(BIAS, NeuronKind::Bias))
    }

    /// output = sigmoid(sum_i w_i * x_i + b)
    fn single_layer(weights: [f64; 5], bias: f64) -> ModelArtifact {
        weights
            .iter()
            .enumerate()
            .fold(
                inputs_and_bias().neuron(NeuronSpec::new(OUTPUT, NeuronKind::Output)),
                |artifact, (id, w)| artifact.connect(id as u32, OUTPUT, *w),
            )
            .connect(BIAS, OUTPUT, bias)
    }

    /// Evolved shape: one tanh hidden node plus a direct skip connection
    fn with_hidden() -> ModelArtifact {
        inputs_and_bias()
            .neuron(NeuronSpec::new(OUTPUT, NeuronKind::Output))
            .neuron(NeuronSpec::new(HIDDEN, NeuronKind::Hidden).with_activation(Activation::Tanh))
            .connect(1, HIDDEN, 0.0625)
            .connect(BIAS, HIDDEN, -0.5)
            .connect(HIDDEN, OUTPUT, 2.0)
            .connect(3, OUTPUT, -1.5)
    }

    #[test]
    fn test_single_layer_output() {
        let model = NetworkModel::from_artifact(&single_layer([0.01, -0.02, 0.5, 1.0, -0.3], 0.2))
            .unwrap();
        let features = FeatureVector::new(50.0, 20.0, 1.0, 0.8, 3.0);

        let expected = sigmoid(0.01 * 50.0 - 0.02 * 20.0 + 0.5 + 0.8 - 0.3 * 3.0 + 0.2);
        assert!((model.evaluate(&features) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_hidden_layer_and_skip_connection() {
        let model = NetworkModel::from_artifact(&with_hidden()).unwrap();
        let features = FeatureVector::new(0.0, 30.0, 0.0, 0.4, 1.0);

        let hidden = (0.0625f64 * 30.0 - 0.5).tanh();
        let expected = sigmoid(2.0 * hidden - 1.5 * 0.4);
        assert!((model.evaluate(&features) - expected).abs() < 1e-12);
        assert_eq!(model.neuron_count(), 8);
        assert_eq!(model.connection_count(), 4);
    }

    #[test]
    fn test_output_declared_before_hidden_still_orders_correctly() {
        // with_hidden() lists the output before the hidden neuron
        let model = NetworkModel::from_artifact(&with_hidden()).unwrap();
        let low = model.evaluate(&FeatureVector::new(0.0, 0.0, 0.0, 0.0, 0.0));
        let high = model.evaluate(&FeatureVector::new(0.0, 100.0, 0.0, 0.0, 0.0));
        assert!(high > low);
    }

    #[test]
    fn test_non_finite_relevance_does_not_panic() {
        let model = NetworkModel::from_artifact(&single_layer([0.0, 0.0, 0.0, 0.0, 1.0], 0.0))
            .unwrap();
        assert_eq!(model.evaluate(&FeatureVector::new(0.0, 0.0, 0.0, 1.0, f64::INFINITY)), 1.0);
        assert_eq!(model.evaluate(&FeatureVector::new(0.0, 0.0, 0.0, 1.0, f64::NEG_INFINITY)), 0.0);
        assert!(model.evaluate(&FeatureVector::new(0.0, 0.0, 0.0, 1.0, f64::NAN)).is_nan());
    }

    #[test]
    fn test_repeated_evaluation_is_deterministic() {
        let model = NetworkModel::from_artifact(&with_hidden()).unwrap();
        let features = FeatureVector::new(12.0, 40.0, 1.0, 0.7, 2.5);
        let first = model.evaluate(&features);
        for _ in 0..1000 {
            assert_eq!(model.evaluate(&features).to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_concurrent_evaluation_matches_sequential() {
        let model = NetworkModel::from_artifact(&with_hidden()).unwrap();
        let inputs: Vec<FeatureVector> = (0..500)
            .map(|i| FeatureVector::new(i as f64, (i % 97) as f64, (i % 2) as f64, 0.5, 1.0))
            .collect();

        let sequential: Vec<u64> = inputs.iter().map(|f| model.evaluate(f).to_bits()).collect();
        let parallel: Vec<u64> = inputs
            .par_iter()
            .map(|f| model.evaluate(f).to_bits())
            .collect();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_rejects_wrong_format_and_version() {
        let mut artifact = single_layer([0.0; 5], 0.0);
        artifact.format = "neuroph".into();
        assert!(matches!(
            NetworkModel::from_artifact(&artifact),
            Err(ModelError::UnsupportedFormat { .. })
        ));

        let mut artifact = single_layer([0.0; 5], 0.0);
        artifact.version = 2;
        assert!(matches!(
            NetworkModel::from_artifact(&artifact),
            Err(ModelError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_reordered_features() {
        let mut artifact = single_layer([0.0; 5], 0.0);
        artifact.inputs.swap(0, 1);
        assert!(matches!(
            NetworkModel::from_artifact(&artifact),
            Err(ModelError::FeatureOrder { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_wrong_arity() {
        let mut artifact = single_layer([0.0; 5], 0.0);
        artifact.inputs.pop();
        assert!(matches!(
            NetworkModel::from_artifact(&artifact),
            Err(ModelError::InputArity { found: 4, .. })
        ));

        let mut artifact = single_layer([0.0; 5], 0.0);
        artifact.neurons.retain(|n| n.id != 4);
        artifact.connections.retain(|c| c.from != 4);
        assert!(matches!(
            NetworkModel::from_artifact(&artifact),
            Err(ModelError::InputArity { found: 4, .. })
        ));

        let artifact = single_layer([0.0; 5], 0.0).neuron(NeuronSpec::new(9, NeuronKind::Output));
        assert!(matches!(
            NetworkModel::from_artifact(&artifact),
            Err(ModelError::OutputArity { found: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_connections() {
        let artifact = single_layer([0.0; 5], 0.0).connect(42, OUTPUT, 1.0);
        assert!(matches!(
            NetworkModel::from_artifact(&artifact),
            Err(ModelError::UnknownNeuron { from: 42, .. })
        ));

        let artifact = single_layer([0.0; 5], 0.0).connect(OUTPUT, 0, 1.0);
        assert!(matches!(
            NetworkModel::from_artifact(&artifact),
            Err(ModelError::IntoSource { to: 0, .. })
        ));

        let artifact = single_layer([0.0; 5], 0.0).connect(0, OUTPUT, f64::NAN);
        assert!(matches!(
            NetworkModel::from_artifact(&artifact),
            Err(ModelError::NonFiniteWeight { from: 0, .. })
        ));

        let artifact = single_layer([0.0; 5], 0.0).neuron(NeuronSpec::new(3, NeuronKind::Hidden));
        assert!(matches!(
            NetworkModel::from_artifact(&artifact),
            Err(ModelError::DuplicateNeuron { id: 3 })
        ));
    }

    #[test]
    fn test_rejects_cycles() {
        let artifact = with_hidden().connect(OUTPUT, HIDDEN, 0.5);
        assert!(matches!(
            NetworkModel::from_artifact(&artifact),
            Err(ModelError::Cycle { .. })
        ));

        let artifact = with_hidden().connect(HIDDEN, HIDDEN, 0.5);
        assert!(matches!(
            NetworkModel::from_artifact(&artifact),
            Err(ModelError::Cycle { id: HIDDEN })
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.json");
        let artifact = with_hidden();
        std::fs::write(&path, serde_json::to_string_pretty(&artifact).unwrap()).unwrap();

        let loaded = NetworkModel::load(&path).unwrap();
        let direct = NetworkModel::from_artifact(&artifact).unwrap();
        let features = FeatureVector::new(3.0, 9.0, 1.0, 0.2, 0.1);
        assert!((loaded.evaluate(&features) - direct.evaluate(&features)).abs() < 1e-12);
    }
}
