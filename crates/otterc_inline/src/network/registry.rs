//! Process-wide cache of loaded networks, keyed by artifact path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use tracing::debug;

use super::model::NetworkModel;
use crate::error::ModelResult;

type Slot = Arc<OnceCell<Arc<NetworkModel>>>;

/// Requested and canonical paths both map to the same slot
static MODELS: Lazy<RwLock<AHashMap<PathBuf, Slot>>> =
    Lazy::new(|| RwLock::new(AHashMap::new()));

/// Load the artifact at `path` once per process and share it.
///
/// Paths naming the same file share one model. Failures are returned to the
/// caller and not cached, so a host that fixes the artifact can retry.
pub fn load_shared(path: &Path) -> ModelResult<Arc<NetworkModel>> {
    let slot = slot_for(path);

    // The map lock is released here; only loads of the same file wait.
    let model = slot.get_or_try_init(|| -> ModelResult<_> {
        let model = Arc::new(NetworkModel::load(path)?);
        debug!(path = %path.display(), "registered shared inlining network");
        Ok(model)
    })?;
    Ok(model.clone())
}

/// Whether `path` has already been loaded in this process
pub fn is_loaded(path: &Path) -> bool {
    if is_initialized(path) {
        return true;
    }
    std::fs::canonicalize(path).is_ok_and(|canonical| is_initialized(&canonical))
}

fn is_initialized(key: &Path) -> bool {
    MODELS
        .read()
        .get(key)
        .is_some_and(|slot| slot.get().is_some())
}

fn slot_for(path: &Path) -> Slot {
    if let Some(slot) = MODELS.read().get(path).filter(|slot| slot.get().is_some()) {
        return slot.clone();
    }

    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut models = MODELS.write();
    let slot = models.entry(canonical).or_default().clone();
    models.insert(path.to_path_buf(), slot.clone());
    slot
}
