use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use otterc_config::{InliningOptions, ModelLocation};
use otterc_inline::FEATURE_COUNT;
use otterc_inline::network::{ModelArtifact, NeuronKind, NeuronSpec};

/// Temporary model root that tests write artifacts into
pub struct ModelFixture {
    dir: TempDir,
}

impl ModelFixture {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create model root")?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Options pointing at this fixture's default artifact location
    pub fn options(&self) -> InliningOptions {
        InliningOptions {
            model: ModelLocation::new(self.root()),
            ..InliningOptions::default()
        }
    }

    /// Write `artifact` to the default location and return its path
    pub fn write(&self, artifact: &ModelArtifact) -> Result<PathBuf> {
        let content =
            serde_json::to_string_pretty(artifact).context("failed to serialize artifact")?;
        self.write_raw(&content)
    }

    /// Write arbitrary contents to the default location
    pub fn write_raw(&self, content: &str) -> Result<PathBuf> {
        let path = self.options().model_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, content)
            .with_context(|| format!("failed to write artifact {}", path.display()))?;
        Ok(path)
    }
}

/// Single sigmoid output fed by every input and a bias neuron.
///
/// Input `i` connects with `weights[i]`, the bias with `bias`.
pub fn logistic_artifact(weights: [f64; FEATURE_COUNT], bias: f64) -> ModelArtifact {
    let bias_id = FEATURE_COUNT as u32;
    let output_id = bias_id + 1;

    let artifact = (0..bias_id).fold(ModelArtifact::new(), |artifact, id| {
        artifact.neuron(NeuronSpec::new(id, NeuronKind::Input))
    });
    let artifact = artifact
        .neuron(NeuronSpec::new(bias_id, NeuronKind::Bias))
        .neuron(NeuronSpec::new(output_id, NeuronKind::Output))
        .connect(bias_id, output_id, bias);

    weights
        .iter()
        .zip(0..)
        .fold(artifact, |artifact, (&weight, id)| {
            artifact.connect(id, output_id, weight)
        })
}
