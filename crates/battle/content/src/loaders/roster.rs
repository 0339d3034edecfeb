//! Hero and enemy roster loader.

use std::path::Path;

use battle_core::{EnemySpec, HeroSpec};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Roster structure for RON files: every hero and enemy template that can
/// appear in an encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterCatalog {
    pub heroes: Vec<HeroSpec>,
    pub enemies: Vec<EnemySpec>,
}

/// Loader for roster templates from RON files.
pub struct RosterLoader;

impl RosterLoader {
    pub fn load(path: &Path) -> LoadResult<RosterCatalog> {
        let content = read_file(path)?;
        let catalog: RosterCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        Ok(catalog)
    }
}
