//! Ability definitions: the actions combatants can take.

use std::sync::Arc;

use super::aura::AuraDef;
use super::effect::EffectDef;

/// How an ability selects its targets.
///
/// The concrete target list is resolved by the caller (menu or enemy policy)
/// before the ability reaches the resolution engine.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetingMode {
    /// Exactly one live target, any allegiance.
    Single,
    /// All live combatants of the actor's own allegiance.
    Party,
    /// All live combatants of the opposing allegiance.
    Opposition,
}

/// Which of the two hero resource pools an ability belongs to.
///
/// Drives which of the combatant's two ability lists it lands in.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AbilitySchool {
    Calm,
    Strife,
}

/// Raw ability record as it appears in content files, with effects and auras
/// referenced by name. Resolved into an [`AbilityDef`] by the catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySpec {
    pub name: String,
    pub school: AbilitySchool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub calm_cost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub strife_cost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub calm_gen: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub strife_gen: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub auras: Vec<String>,
    pub targeting: TargetingMode,
}

/// A fully resolved, immutable ability definition, shared by reference.
///
/// `calm_cost`/`strife_cost` are minimum pool requirements checked before a
/// hero may use the ability; `calm_gen`/`strife_gen` feed the resource
/// generation rule after it resolves.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilityDef {
    pub name: String,
    pub school: AbilitySchool,
    pub calm_cost: u32,
    pub strife_cost: u32,
    pub calm_gen: u32,
    pub strife_gen: u32,
    pub effects: Vec<Arc<EffectDef>>,
    pub auras: Vec<Arc<AuraDef>>,
    pub targeting: TargetingMode,
}

impl AbilityDef {
    /// True if this ability generates both resource pools at once.
    ///
    /// Only the protagonist may use such an ability; for anyone else this is
    /// a content error surfaced at resolution.
    pub fn generates_both(&self) -> bool {
        self.calm_gen > 0 && self.strife_gen > 0
    }
}
