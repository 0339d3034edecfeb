//! Content factory for assembling battles from a data directory.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, BattleState, Catalog, EncounterSpec};

use crate::loaders::{
    AbilityLoader, AuraLoader, ConfigLoader, EffectLoader, EncounterLoader, LoadResult,
    RosterLoader,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── effects.ron
/// ├── auras.ron
/// ├── abilities.ron
/// ├── roster.ron
/// └── encounters/
///     └── debug.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load and resolve the full definition catalog.
    ///
    /// Reads effects, auras, abilities and the roster, then resolves every
    /// name reference; any dangling name fails here, before a battle exists.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let effects = EffectLoader::load(&self.data_dir.join("effects.ron"))?;
        let auras = AuraLoader::load(&self.data_dir.join("auras.ron"))?;
        let abilities = AbilityLoader::load(&self.data_dir.join("abilities.ron"))?;
        let roster = RosterLoader::load(&self.data_dir.join("roster.ron"))?;
        Catalog::build(effects, auras, abilities, roster.heroes, roster.enemies)
            .map_err(|e| anyhow::anyhow!("Failed to resolve catalog: {}", e))
    }

    /// Load an encounter from `encounters/{name}.ron`.
    pub fn load_encounter(&self, name: &str) -> LoadResult<EncounterSpec> {
        let path = self.data_dir.join("encounters").join(format!("{name}.ron"));
        EncounterLoader::load(&path)
    }

    /// Load everything needed for one battle and assemble its state.
    pub fn build_battle(&self, encounter_name: &str, seed: u64) -> LoadResult<BattleState> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;
        let encounter = self.load_encounter(encounter_name)?;
        BattleState::new(&catalog, &encounter, &config, seed)
            .map_err(|e| anyhow::anyhow!("Failed to set up battle: {}", e))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
