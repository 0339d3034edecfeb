//! Immutable definition data and name resolution.
//!
//! Content files refer to effects, auras and abilities by name. The
//! [`Catalog`] resolves every reference exactly once at load time; after
//! that, definitions are shared `Arc`s and a dangling name can no longer
//! occur anywhere in the core. Any unresolved reference fails the build with
//! a [`CatalogError`] (a data-integrity error, never silently ignored).

mod ability;
mod aura;
mod effect;
mod roster;

pub use ability::{AbilityDef, AbilitySchool, AbilitySpec, TargetingMode};
pub use aura::{AuraDef, AuraSpec};
pub use effect::{EffectDef, StatKind};
pub use roster::{EnemySpec, EnemyTemplate, HeroSpec, HeroTemplate};

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CoreError, ErrorSeverity};

/// Name of the universal attack ability every combatant shares.
pub const ATTACK_ABILITY: &str = "attack";

/// Errors raised while resolving definition data.
///
/// All of these are data errors: the content is malformed or incomplete and
/// the battle cannot be set up from it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("aura '{aura}' references unknown effect '{effect}'")]
    UnknownEffect { aura: String, effect: String },

    #[error("ability '{ability}' references unknown effect '{effect}'")]
    UnknownAbilityEffect { ability: String, effect: String },

    #[error("ability '{ability}' references unknown aura '{aura}'")]
    UnknownAura { ability: String, aura: String },

    #[error("combatant '{combatant}' references unknown ability '{ability}'")]
    UnknownAbility { combatant: String, ability: String },

    #[error("duplicate definition name '{name}'")]
    DuplicateName { name: String },

    #[error("no hero definition named '{name}'")]
    UnknownHero { name: String },

    #[error("no enemy definition named '{name}'")]
    UnknownEnemy { name: String },

    #[error("catalog has no '{ATTACK_ABILITY}' ability definition")]
    MissingAttackAbility,
}

impl CoreError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Data
    }
}

/// Resolved definition data for a battle: effects, auras, abilities and
/// roster templates, all keyed by case-insensitive name.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    effects: HashMap<String, Arc<EffectDef>>,
    auras: HashMap<String, Arc<AuraDef>>,
    abilities: HashMap<String, Arc<AbilityDef>>,
    heroes: HashMap<String, Arc<HeroTemplate>>,
    enemies: HashMap<String, Arc<EnemyTemplate>>,
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

impl Catalog {
    /// Resolve raw content records into a catalog.
    ///
    /// Resolution order follows the data dependencies: effects, then auras,
    /// then abilities, then roster templates. The first dangling reference
    /// or duplicate name aborts the build.
    pub fn build(
        effects: Vec<EffectDef>,
        auras: Vec<AuraSpec>,
        abilities: Vec<AbilitySpec>,
        heroes: Vec<HeroSpec>,
        enemies: Vec<EnemySpec>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for effect in effects {
            let name = effect.name.clone();
            if catalog
                .effects
                .insert(key(&name), Arc::new(effect))
                .is_some()
            {
                return Err(CatalogError::DuplicateName { name });
            }
        }

        for spec in auras {
            let resolved = AuraDef {
                effects: spec
                    .effects
                    .iter()
                    .map(|name| {
                        catalog.effects.get(&key(name)).cloned().ok_or_else(|| {
                            CatalogError::UnknownEffect {
                                aura: spec.name.clone(),
                                effect: name.clone(),
                            }
                        })
                    })
                    .collect::<Result<_, _>>()?,
                name: spec.name,
            };
            let name = resolved.name.clone();
            if catalog
                .auras
                .insert(key(&name), Arc::new(resolved))
                .is_some()
            {
                return Err(CatalogError::DuplicateName { name });
            }
        }

        for spec in abilities {
            let resolved = catalog.resolve_ability(spec)?;
            let name = resolved.name.clone();
            if catalog
                .abilities
                .insert(key(&name), Arc::new(resolved))
                .is_some()
            {
                return Err(CatalogError::DuplicateName { name });
            }
        }

        if !catalog.abilities.contains_key(ATTACK_ABILITY) {
            return Err(CatalogError::MissingAttackAbility);
        }

        for spec in heroes {
            let (calm_abilities, strife_abilities) =
                catalog.resolve_ability_lists(&spec.name, &spec.abilities)?;
            let template = HeroTemplate {
                name: spec.name,
                hp: spec.hp.min(spec.max_hp),
                max_hp: spec.max_hp,
                strength: spec.strength,
                agility: spec.agility.max(1),
                calm: spec.calm,
                strife: spec.strife,
                protagonist: spec.protagonist,
                calm_abilities,
                strife_abilities,
            };
            catalog
                .heroes
                .insert(key(&template.name), Arc::new(template));
        }

        for spec in enemies {
            let (calm_abilities, strife_abilities) =
                catalog.resolve_ability_lists(&spec.name, &spec.abilities)?;
            let template = EnemyTemplate {
                name: spec.name,
                max_hp: spec.max_hp,
                strength: spec.strength,
                agility: spec.agility.max(1),
                behaviour: spec.behaviour,
                calm_abilities,
                strife_abilities,
            };
            catalog
                .enemies
                .insert(key(&template.name), Arc::new(template));
        }

        Ok(catalog)
    }

    fn resolve_ability(&self, spec: AbilitySpec) -> Result<AbilityDef, CatalogError> {
        let effects = spec
            .effects
            .iter()
            .map(|name| {
                self.effects.get(&key(name)).cloned().ok_or_else(|| {
                    CatalogError::UnknownAbilityEffect {
                        ability: spec.name.clone(),
                        effect: name.clone(),
                    }
                })
            })
            .collect::<Result<_, _>>()?;

        let auras = spec
            .auras
            .iter()
            .map(|name| {
                self.auras
                    .get(&key(name))
                    .cloned()
                    .ok_or_else(|| CatalogError::UnknownAura {
                        ability: spec.name.clone(),
                        aura: name.clone(),
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(AbilityDef {
            name: spec.name,
            school: spec.school,
            calm_cost: spec.calm_cost,
            strife_cost: spec.strife_cost,
            calm_gen: spec.calm_gen,
            strife_gen: spec.strife_gen,
            effects,
            auras,
            targeting: spec.targeting,
        })
    }

    /// Look up a list of ability names and split them by school, the way
    /// combatants carry them.
    fn resolve_ability_lists(
        &self,
        combatant: &str,
        names: &[String],
    ) -> Result<(Vec<Arc<AbilityDef>>, Vec<Arc<AbilityDef>>), CatalogError> {
        let mut calm = Vec::new();
        let mut strife = Vec::new();
        for name in names {
            let ability = self.abilities.get(&key(name)).cloned().ok_or_else(|| {
                CatalogError::UnknownAbility {
                    combatant: combatant.to_string(),
                    ability: name.clone(),
                }
            })?;
            match ability.school {
                AbilitySchool::Calm => calm.push(ability),
                AbilitySchool::Strife => strife.push(ability),
            }
        }
        Ok((calm, strife))
    }

    pub fn effect(&self, name: &str) -> Option<&Arc<EffectDef>> {
        self.effects.get(&key(name))
    }

    pub fn aura(&self, name: &str) -> Option<&Arc<AuraDef>> {
        self.auras.get(&key(name))
    }

    pub fn ability(&self, name: &str) -> Option<&Arc<AbilityDef>> {
        self.abilities.get(&key(name))
    }

    pub fn hero(&self, name: &str) -> Result<&Arc<HeroTemplate>, CatalogError> {
        self.heroes
            .get(&key(name))
            .ok_or_else(|| CatalogError::UnknownHero {
                name: name.to_string(),
            })
    }

    pub fn enemy(&self, name: &str) -> Result<&Arc<EnemyTemplate>, CatalogError> {
        self.enemies
            .get(&key(name))
            .ok_or_else(|| CatalogError::UnknownEnemy {
                name: name.to_string(),
            })
    }

    /// The single shared attack ability, applied whenever any combatant uses
    /// a plain attack. Guaranteed present by [`Catalog::build`].
    pub fn attack(&self) -> &Arc<AbilityDef> {
        self.abilities
            .get(ATTACK_ABILITY)
            .expect("catalog built without attack ability")
    }
}
