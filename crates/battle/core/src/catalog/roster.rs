//! Roster templates: the static hero and enemy definitions a battle is
//! built from.

use std::sync::Arc;

use super::ability::AbilityDef;
use crate::policy::BehaviourIndex;

/// Raw hero record from content files, with abilities referenced by name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroSpec {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub strength: i32,
    pub agility: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub calm: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub strife: u32,
    /// The protagonist has unique resource-generation rules.
    #[cfg_attr(feature = "serde", serde(default))]
    pub protagonist: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<String>,
}

/// Raw enemy record from content files.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySpec {
    pub name: String,
    pub max_hp: u32,
    pub strength: i32,
    pub agility: i32,
    pub behaviour: BehaviourIndex,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<String>,
}

/// A resolved hero template. Ability references have been looked up and
/// split into the two school lists.
#[derive(Clone, Debug, PartialEq)]
pub struct HeroTemplate {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub strength: i32,
    pub agility: i32,
    pub calm: u32,
    pub strife: u32,
    pub protagonist: bool,
    pub calm_abilities: Vec<Arc<AbilityDef>>,
    pub strife_abilities: Vec<Arc<AbilityDef>>,
}

/// A resolved enemy template.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyTemplate {
    pub name: String,
    pub max_hp: u32,
    pub strength: i32,
    pub agility: i32,
    pub behaviour: BehaviourIndex,
    pub calm_abilities: Vec<Arc<AbilityDef>>,
    pub strife_abilities: Vec<Arc<AbilityDef>>,
}
