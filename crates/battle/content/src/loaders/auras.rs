//! Aura definition loader.

use std::path::Path;

use battle_core::AuraSpec;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Aura catalog structure for RON files. Effects are referenced by name and
/// resolved by [`battle_core::Catalog::build`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuraCatalog {
    pub auras: Vec<AuraSpec>,
}

/// Loader for aura definitions from RON files.
pub struct AuraLoader;

impl AuraLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<AuraSpec>> {
        let content = read_file(path)?;
        let catalog: AuraCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse aura catalog RON: {}", e))?;

        Ok(catalog.auras)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aura_records() {
        let catalog: AuraCatalog = ron::from_str(
            r#"(
                auras: [
                    (name: "venom", effects: ["sting", "sting", "sting"]),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(catalog.auras[0].effects.len(), 3);
    }
}
