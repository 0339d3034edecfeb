//! Effect definition loader.

use std::path::Path;

use battle_core::EffectDef;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Effect catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectCatalog {
    pub effects: Vec<EffectDef>,
}

/// Loader for effect definitions from RON files.
pub struct EffectLoader;

impl EffectLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EffectDef>> {
        let content = read_file(path)?;
        let catalog: EffectCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect catalog RON: {}", e))?;

        Ok(catalog.effects)
    }
}
