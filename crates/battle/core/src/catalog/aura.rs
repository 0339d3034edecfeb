//! Aura definitions: multi-turn effect sequences.

use std::sync::Arc;

use super::effect::EffectDef;

/// Raw aura record as it appears in content files, with effects referenced
/// by name. Resolved into an [`AuraDef`] by the catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuraSpec {
    pub name: String,
    pub effects: Vec<String>,
}

/// An aura: an ordered sequence of effects, one applied per turn of the
/// bearer until exhausted.
///
/// The definition is immutable and shared; the per-combatant cursor lives on
/// the active instance, so the same aura can be independently in progress on
/// several bearers.
#[derive(Clone, Debug, PartialEq)]
pub struct AuraDef {
    pub name: String,
    pub effects: Vec<Arc<EffectDef>>,
}

impl AuraDef {
    /// Number of turns this aura lasts on a bearer.
    pub fn duration(&self) -> usize {
        self.effects.len()
    }
}
