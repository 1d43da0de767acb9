//! JSON document store with an in-process read cache.
//!
//! One document per file. Missing files read as absent; malformed
//! content and I/O failures surface as persistence errors rather than
//! silently reading as absent, so the run aborts instead of operating
//! on state it cannot trust. Every successful write invalidates the
//! cache entry for that path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use cadence_core::types::CadenceError;

#[derive(Debug, Default)]
pub struct FileStore {
    cache: HashMap<PathBuf, serde_json::Value>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document, or `None` if the file does not exist.
    ///
    /// With `use_cache`, a previously-read document is served from the
    /// in-process cache and uncached reads populate it. Callers that
    /// must observe writes made earlier in the same run pass `false`.
    pub fn load<T: DeserializeOwned>(
        &mut self,
        path: &Path,
        use_cache: bool,
    ) -> Result<Option<T>, CadenceError> {
        if use_cache {
            if let Some(value) = self.cache.get(path) {
                let doc = serde_json::from_value(value.clone())
                    .map_err(|err| persistence(path, &err))?;
                return Ok(Some(doc));
            }
        }

        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|err| persistence(path, &err))?;
        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|err| persistence(path, &err))?;
        let doc = serde_json::from_value(value.clone()).map_err(|err| persistence(path, &err))?;

        if use_cache {
            self.cache.insert(path.to_path_buf(), value);
        }
        Ok(Some(doc))
    }

    /// Save a document, creating parent directories as needed.
    ///
    /// Invalidates the cache entry for `path` so a subsequent read in
    /// the same run observes the fresh content.
    pub fn save<T: Serialize>(&mut self, path: &Path, doc: &T) -> Result<(), CadenceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| persistence(path, &err))?;
        }

        let output = serde_json::to_string_pretty(doc).map_err(|err| persistence(path, &err))?;
        std::fs::write(path, format!("{output}\n")).map_err(|err| persistence(path, &err))?;

        self.cache.remove(path);
        Ok(())
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

fn persistence(path: &Path, err: &dyn std::fmt::Display) -> CadenceError {
    tracing::warn!(path = %path.display(), error = %err, "document store failure");
    CadenceError::Persistence {
        path: path.to_path_buf(),
        detail: err.to_string(),
    }
}

// ─── Tests ────────────────────────────────────────────────────────
