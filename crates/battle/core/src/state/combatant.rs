//! Per-battle mutable combatant records.

use std::fmt;
use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::catalog::{AbilityDef, AuraDef, EnemyTemplate, HeroTemplate};
use crate::config::BattleConfig;
use crate::policy::BehaviourIndex;

/// Unique identifier for a combatant within one battle.
///
/// Ids are dense: heroes are assigned first in roster order, then enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side membership. Ordering matters: heroes win scheduling ties, so `Hero`
/// must sort before `Enemy`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Allegiance {
    Hero,
    Enemy,
}

impl Allegiance {
    pub fn opposing(self) -> Self {
        match self {
            Allegiance::Hero => Allegiance::Enemy,
            Allegiance::Enemy => Allegiance::Hero,
        }
    }
}

/// Allegiance-specific behaviour, as a tagged variant rather than
/// inheritance: heroes carry the protagonist flag, enemies carry the index
/// into the behaviour dispatch table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatantKind {
    Hero { protagonist: bool },
    Enemy { behaviour: BehaviourIndex },
}

/// One active application of an aura on a combatant.
///
/// The definition is shared; the cursor is per-instance, so the same aura
/// definition can be independently in progress on several bearers.
#[derive(Clone, Debug, PartialEq)]
pub struct AuraInstance {
    /// Combatant that applied the aura; its strength feeds the per-turn
    /// effect magnitudes even if it has since died.
    pub caster: CombatantId,
    pub def: Arc<AuraDef>,
    /// Index of the next effect to apply; the instance expires once this
    /// reaches the definition's effect count.
    pub cursor: usize,
}

impl AuraInstance {
    pub fn new(caster: CombatantId, def: Arc<AuraDef>) -> Self {
        Self {
            caster,
            def,
            cursor: 0,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.cursor >= self.def.effects.len()
    }
}

/// Mutable per-battle state for one combatant.
///
/// Created once during battle setup and mutated by the resolution engine;
/// never removed from the table mid-battle, only marked dead by `hp == 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatantState {
    pub id: CombatantId,
    pub name: String,
    pub allegiance: Allegiance,
    pub kind: CombatantKind,
    /// Clamped to `[0, max_hp]`; zero means dead.
    pub hp: u32,
    pub max_hp: u32,
    pub strength: i32,
    /// Clamped to a minimum of 1.
    pub agility: i32,
    pub calm: u32,
    pub strife: u32,
    pub calm_abilities: Vec<Arc<AbilityDef>>,
    pub strife_abilities: Vec<Arc<AbilityDef>>,
    pub active_auras: ArrayVec<AuraInstance, { BattleConfig::MAX_ACTIVE_AURAS }>,
}

impl CombatantState {
    pub fn from_hero(id: CombatantId, template: &HeroTemplate) -> Self {
        Self {
            id,
            name: template.name.clone(),
            allegiance: Allegiance::Hero,
            kind: CombatantKind::Hero {
                protagonist: template.protagonist,
            },
            hp: template.hp.min(template.max_hp),
            max_hp: template.max_hp,
            strength: template.strength,
            agility: template.agility.max(1),
            calm: template.calm,
            strife: template.strife,
            calm_abilities: template.calm_abilities.clone(),
            strife_abilities: template.strife_abilities.clone(),
            active_auras: ArrayVec::new(),
        }
    }

    pub fn from_enemy(id: CombatantId, template: &EnemyTemplate) -> Self {
        Self {
            id,
            name: template.name.clone(),
            allegiance: Allegiance::Enemy,
            kind: CombatantKind::Enemy {
                behaviour: template.behaviour,
            },
            hp: template.max_hp,
            max_hp: template.max_hp,
            strength: template.strength,
            agility: template.agility.max(1),
            calm: 0,
            strife: 0,
            calm_abilities: template.calm_abilities.clone(),
            strife_abilities: template.strife_abilities.clone(),
            active_auras: ArrayVec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_protagonist(&self) -> bool {
        matches!(self.kind, CombatantKind::Hero { protagonist: true })
    }

    /// Look up an ability this combatant knows, by case-insensitive name,
    /// searching both school lists.
    pub fn ability(&self, name: &str) -> Option<&Arc<AbilityDef>> {
        self.calm_abilities
            .iter()
            .chain(self.strife_abilities.iter())
            .find(|ability| ability.name.eq_ignore_ascii_case(name))
    }

    /// Apply a signed HP change, clamped to `[0, max_hp]`. Returns the new
    /// HP value.
    pub fn apply_hp_delta(&mut self, magnitude: i32) -> u32 {
        let next = (self.hp as i64 + magnitude as i64).clamp(0, self.max_hp as i64);
        self.hp = next as u32;
        self.hp
    }

    /// Apply a signed agility change, clamped to a minimum of 1. Returns the
    /// new agility value.
    pub fn apply_agility_delta(&mut self, magnitude: i32) -> i32 {
        self.agility = (self.agility + magnitude).max(1);
        self.agility
    }
}
