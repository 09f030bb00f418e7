use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate a network artifact.
///
/// Loading is a one-time initialization step; every variant is fatal for the
/// learned policy and is surfaced to the host unchanged.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read network artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed network artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported artifact format `{found}` (expected `{expected}`)")]
    UnsupportedFormat { found: String, expected: &'static str },

    #[error("unsupported artifact version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("network declares {found} inputs, the feature vector has {expected}")]
    InputArity { found: usize, expected: usize },

    #[error("input {index} is `{found}`, expected `{expected}`")]
    FeatureOrder {
        index: usize,
        found: String,
        expected: &'static str,
    },

    #[error("network declares {found} outputs, exactly {expected} is required")]
    OutputArity { found: usize, expected: usize },

    #[error("neuron {id} is declared more than once")]
    DuplicateNeuron { id: u32 },

    #[error("connection {from} -> {to} references an unknown neuron")]
    UnknownNeuron { from: u32, to: u32 },

    #[error("connection {from} -> {to} feeds an input or bias neuron")]
    IntoSource { from: u32, to: u32 },

    #[error("network topology has a cycle through neuron {id}")]
    Cycle { id: u32 },

    #[error("connection {from} -> {to} has a non-finite weight")]
    NonFiniteWeight { from: u32, to: u32 },
}

pub type ModelResult<T> = Result<T, ModelError>;
