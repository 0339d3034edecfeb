//! Ability definition loader.

use std::path::Path;

use battle_core::AbilitySpec;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Ability catalog structure for RON files. Effect and aura references are
/// names, resolved by [`battle_core::Catalog::build`]; the catalog must
/// contain the universal `attack` ability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<AbilitySpec>,
}

/// Loader for ability definitions from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<AbilitySpec>> {
        let content = read_file(path)?;
        let catalog: AbilityCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        Ok(catalog.abilities)
    }
}
