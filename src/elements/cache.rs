use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use log::debug;

use super::error::ElementsError;
use super::fetch::TleSet;

/// Last-known-good store for fetched element sets. Replacement is a whole
/// file swap: serialize to a sibling temp file, then rename over the old
/// copy, so readers never observe a half-written cache.
pub struct ElementsCache {
    path: PathBuf,
}

impl ElementsCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<HashMap<String, TleSet>, ElementsError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn store(&self, sets: &HashMap<String, TleSet>) -> Result<(), ElementsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(sets)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!("cached {} element sets to {}", sets.len(), self.path.display());
        Ok(())
    }
}
