//! On-disk schema of a trained inlining network.
//!
//! Artifacts are JSON documents produced by offline training. Version 1:
//!
//! ```json
//! {
//!   "format": "otter-inline-network",
//!   "version": 1,
//!   "inputs": ["previous_low_level_graph_size", "node_count",
//!              "fully_processed", "invoke_probability", "relevance"],
//!   "outputs": 1,
//!   "neurons": [
//!     { "id": 0, "kind": "input" },
//!     { "id": 5, "kind": "bias" },
//!     { "id": 6, "kind": "hidden", "activation": "tanh" },
//!     { "id": 7, "kind": "output", "activation": "sigmoid" }
//!   ],
//!   "connections": [ { "from": 0, "to": 6, "weight": -0.25 } ]
//! }
//! ```
//!
//! Input neurons bind to the feature vector in order of appearance. Bias
//! neurons always emit 1.0. Any feed-forward topology is accepted, so
//! evolved networks with skip connections load as-is.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::features::FEATURE_NAMES;

pub const ARTIFACT_FORMAT: &str = "otter-inline-network";
pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronKind {
    Input,
    Bias,
    Hidden,
    Output,
}

impl NeuronKind {
    /// Input and bias neurons never receive connections
    pub fn is_source(self) -> bool {
        matches!(self, NeuronKind::Input | NeuronKind::Bias)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    #[default]
    Sigmoid,
    Tanh,
    Relu,
}

impl Activation {
    pub fn apply(self, net: f64) -> f64 {
        match self {
            Activation::Linear => net,
            Activation::Sigmoid => 1.0 / (1.0 + (-net).exp()),
            Activation::Tanh => net.tanh(),
            Activation::Relu => net.max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronSpec {
    pub id: u32,
    pub kind: NeuronKind,
    /// Ignored for input and bias neurons
    #[serde(default)]
    pub activation: Activation,
}

impl NeuronSpec {
    pub fn new(id: u32, kind: NeuronKind) -> Self {
        Self {
            id,
            kind,
            activation: Activation::default(),
        }
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSpec {
    pub from: u32,
    pub to: u32,
    pub weight: f64,
}

/// Deserialized artifact, not yet validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format: String,
    pub version: u32,
    pub inputs: Vec<String>,
    pub outputs: usize,
    pub neurons: Vec<NeuronSpec>,
    pub connections: Vec<ConnectionSpec>,
}

impl ModelArtifact {
    /// Empty version-1 artifact with the contract feature order
    pub fn new() -> Self {
        Self {
            format: ARTIFACT_FORMAT.to_string(),
            version: ARTIFACT_VERSION,
            inputs: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            outputs: 1,
            neurons: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn read(path: &Path) -> ModelResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn neuron(mut self, neuron: NeuronSpec) -> Self {
        self.neurons.push(neuron);
        self
    }

    pub fn connect(mut self, from: u32, to: u32, weight: f64) -> Self {
        self.connections.push(ConnectionSpec { from, to, weight });
        self
    }
}

impl Default for ModelArtifact {
    fn default() -> Self {
        Self::new()
    }
}
