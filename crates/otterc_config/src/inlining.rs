//! Inlining configuration shared between the host compiler and the inlining policy
//!
//! The policy never reads the environment itself. Hosts build an
//! [`InliningOptions`] (by hand, from the environment or from a TOML file)
//! and hand it to the policy at construction and on every decision.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Relative location of the trained network below the model root
pub const DEFAULT_MODEL_SUFFIX: &str = "compiler/inlining-network.json";

/// Default ceiling for the compilation unit's node count
pub const DEFAULT_MAX_DESIRED_SIZE: usize = 20_000;

pub const ENV_MODEL_ROOT: &str = "OTTER_INLINE_ROOT";
pub const ENV_INLINE_EVERYTHING: &str = "OTTER_INLINE_EVERYTHING";
pub const ENV_TRACE_INLINING: &str = "OTTER_TRACE_INLINING";
pub const ENV_MAX_DESIRED_SIZE: &str = "OTTER_INLINE_MAX_DESIRED_SIZE";

/// Where the trained network artifact lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelLocation {
    /// Root directory supplied by the host
    pub root: PathBuf,

    /// Fixed path of the artifact relative to `root`
    pub suffix: PathBuf,
}

impl ModelLocation {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: PathBuf::from(DEFAULT_MODEL_SUFFIX),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<PathBuf>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Full path of the artifact
    pub fn path(&self) -> PathBuf {
        self.root.join(&self.suffix)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for ModelLocation {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Options consulted by the inlining policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InliningOptions {
    /// Inline every candidate of the compilation unit
    pub inline_everything: bool,

    /// Emit a trace record for every decision
    pub trace_inlining: bool,

    /// Stop inlining once the unit's node count reaches this size
    pub max_desired_size: usize,

    /// Network artifact location
    pub model: ModelLocation,
}

impl Default for InliningOptions {
    fn default() -> Self {
        Self {
            inline_everything: false,
            trace_inlining: false,
            max_desired_size: DEFAULT_MAX_DESIRED_SIZE,
            model: ModelLocation::default(),
        }
    }
}

impl InliningOptions {
    /// Load options from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build options from an arbitrary key lookup, falling back to defaults
    /// for absent or unparsable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        options.apply_lookup(&lookup);
        options
    }

    /// Merge with environment variables (env vars take precedence)
    pub fn merge_with_env(self) -> Self {
        self.merge_with_lookup(|key| std::env::var(key).ok())
    }

    pub fn merge_with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.apply_lookup(&lookup);
        self
    }

    fn apply_lookup<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_MODEL_ROOT) {
            self.model.root = PathBuf::from(val);
        }

        if let Some(val) = lookup(ENV_INLINE_EVERYTHING) {
            self.inline_everything = val.parse().unwrap_or(false);
        }

        if let Some(val) = lookup(ENV_TRACE_INLINING) {
            self.trace_inlining = val.parse().unwrap_or(false);
        }

        if let Some(val) = lookup(ENV_MAX_DESIRED_SIZE) {
            self.max_desired_size = val.parse().unwrap_or(DEFAULT_MAX_DESIRED_SIZE);
        }
    }

    /// Load options from a TOML file
    #[cfg(feature = "toml-config")]
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read inlining config {}", path.display()))?;
        let options: InliningOptions = toml::from_str(&contents)
            .with_context(|| format!("failed to parse inlining config {}", path.display()))?;
        Ok(options)
    }

    /// Load options from a TOML file (stub when toml feature is disabled)
    #[cfg(not(feature = "toml-config"))]
    pub fn from_file(_path: &Path) -> anyhow::Result<Self> {
        anyhow::bail!("TOML support not enabled. Enable the 'toml-config' feature.")
    }

    /// Save options to a TOML file
    #[cfg(feature = "toml-config")]
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Save options to a TOML file (stub when toml feature is disabled)
    #[cfg(not(feature = "toml-config"))]
    pub fn save_to_file(&self, _path: &Path) -> anyhow::Result<()> {
        anyhow::bail!("TOML support not enabled. Enable the 'toml-config' feature.")
    }

    pub fn model_path(&self) -> PathBuf {
        self.model.path()
    }
}
