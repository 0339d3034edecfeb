//! Encounter loader.

use std::path::Path;

use battle_core::EncounterSpec;

use crate::loaders::{LoadResult, read_file};

/// Loader for encounter rosters from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    pub fn load(path: &Path) -> LoadResult<EncounterSpec> {
        let content = read_file(path)?;
        let encounter: EncounterSpec = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))?;

        Ok(encounter)
    }
}
