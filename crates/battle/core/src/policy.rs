//! Enemy decision policies.
//!
//! Enemy content refers to a behaviour by index; the index selects a pure
//! decision function from a fixed dispatch table. Policies only read state
//! and draw from the RNG oracle; the engine executes whatever they decide.

use crate::rng::{RngOracle, compute_seed};
use crate::state::{BattleState, CombatantId, CombatantState};

/// Roll contexts used by policies, kept distinct from the resolution
/// engine's crit contexts by a high base offset.
const CTX_PICK_ABILITY: u32 = 1000;
const CTX_PICK_TARGET: u32 = 1001;

/// Index into the behaviour dispatch table, as referenced by enemy content.
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
pub enum BehaviourIndex {
    /// Skip the turn entirely.
    DoNothing,
    /// Plain attack against a uniformly chosen live hero.
    AttackRandom,
    /// Uniformly chosen strife ability against a uniformly chosen live hero;
    /// falls back to a plain attack when the enemy knows none.
    RandomAbility,
}

/// What an enemy chose to do with its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnemyDecision {
    Pass,
    Attack { target: CombatantId },
    Ability { ability: String, target: CombatantId },
}

/// Run the actor's behaviour policy against the current state.
pub(crate) fn decide(
    state: &BattleState,
    actor: &CombatantState,
    behaviour: BehaviourIndex,
    rng: &dyn RngOracle,
) -> EnemyDecision {
    match behaviour {
        BehaviourIndex::DoNothing => EnemyDecision::Pass,
        BehaviourIndex::AttackRandom => attack_random(state, actor, rng),
        BehaviourIndex::RandomAbility => random_ability(state, actor, rng),
    }
}

/// Uniform draw over the live opposing side. `None` when the side is wiped,
/// which the engine treats as an ended battle before policies ever run.
fn pick_live_hero(
    state: &BattleState,
    actor: &CombatantState,
    rng: &dyn RngOracle,
) -> Option<CombatantId> {
    let heroes: Vec<CombatantId> = state
        .combatants
        .live_heroes()
        .map(|combatant| combatant.id)
        .collect();
    if heroes.is_empty() {
        return None;
    }
    let seed = compute_seed(state.seed, state.nonce, actor.id.0, CTX_PICK_TARGET);
    let index = rng.range(seed, 0, heroes.len() as u32 - 1) as usize;
    Some(heroes[index])
}

fn attack_random(
    state: &BattleState,
    actor: &CombatantState,
    rng: &dyn RngOracle,
) -> EnemyDecision {
    match pick_live_hero(state, actor, rng) {
        Some(target) => EnemyDecision::Attack { target },
        None => EnemyDecision::Pass,
    }
}

fn random_ability(
    state: &BattleState,
    actor: &CombatantState,
    rng: &dyn RngOracle,
) -> EnemyDecision {
    if actor.strife_abilities.is_empty() {
        return attack_random(state, actor, rng);
    }
    let seed = compute_seed(state.seed, state.nonce, actor.id.0, CTX_PICK_ABILITY);
    let index = rng.range(seed, 0, actor.strife_abilities.len() as u32 - 1) as usize;
    let ability = actor.strife_abilities[index].name.clone();
    match pick_live_hero(state, actor, rng) {
        Some(target) => EnemyDecision::Ability { ability, target },
        None => EnemyDecision::Pass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        AbilitySchool, AbilitySpec, Catalog, EffectDef, EnemySpec, HeroSpec, StatKind,
        TargetingMode,
    };
    use crate::config::BattleConfig;
    use crate::rng::PcgRng;
    use crate::state::EncounterSpec;

    fn state(enemy_abilities: Vec<String>) -> BattleState {
        let strike = EffectDef {
            name: "strike".to_string(),
            stat: StatKind::Hp,
            amount: -3,
            strength_scaling: 0.5,
            can_crit: true,
        };
        let named = |name: &str, school: AbilitySchool| AbilitySpec {
            name: name.to_string(),
            school,
            calm_cost: 0,
            strife_cost: 0,
            calm_gen: 0,
            strife_gen: 0,
            effects: vec!["strike".to_string()],
            auras: vec![],
            targeting: TargetingMode::Single,
        };
        let heroes = ["marl", "jack"]
            .into_iter()
            .map(|name| HeroSpec {
                name: name.to_string(),
                hp: 20,
                max_hp: 20,
                strength: 4,
                agility: 6,
                calm: 0,
                strife: 0,
                protagonist: false,
                abilities: vec![],
            })
            .collect();
        let enemy = EnemySpec {
            name: "frog".to_string(),
            max_hp: 10,
            strength: 2,
            agility: 4,
            behaviour: BehaviourIndex::RandomAbility,
            abilities: enemy_abilities,
        };
        let catalog = Catalog::build(
            vec![strike],
            vec![],
            vec![
                named("attack", AbilitySchool::Strife),
                named("bite", AbilitySchool::Strife),
                named("croak", AbilitySchool::Calm),
            ],
            heroes,
            vec![enemy],
        )
        .unwrap();
        let encounter = EncounterSpec {
            heroes: vec!["marl".to_string(), "jack".to_string()],
            enemies: vec!["frog".to_string()],
        };
        BattleState::new(&catalog, &encounter, &BattleConfig::new(), 17).unwrap()
    }

    fn frog(state: &BattleState) -> CombatantState {
        state.combatants.get(CombatantId(2)).unwrap().clone()
    }

    #[test]
    fn do_nothing_always_passes() {
        let state = state(vec![]);
        let actor = frog(&state);
        let decision = decide(&state, &actor, BehaviourIndex::DoNothing, &PcgRng);
        assert_eq!(decision, EnemyDecision::Pass);
    }

    #[test]
    fn attack_random_targets_a_live_hero() {
        let mut state = state(vec![]);
        state.combatants.get_mut(CombatantId(0)).unwrap().hp = 0;
        let actor = frog(&state);
        let decision = decide(&state, &actor, BehaviourIndex::AttackRandom, &PcgRng);
        // marl is dead, so only jack can be picked.
        assert_eq!(
            decision,
            EnemyDecision::Attack {
                target: CombatantId(1)
            }
        );
    }

    #[test]
    fn attack_random_passes_when_no_hero_lives() {
        let mut state = state(vec![]);
        for id in [CombatantId(0), CombatantId(1)] {
            state.combatants.get_mut(id).unwrap().hp = 0;
        }
        let actor = frog(&state);
        let decision = decide(&state, &actor, BehaviourIndex::AttackRandom, &PcgRng);
        assert_eq!(decision, EnemyDecision::Pass);
    }

    #[test]
    fn random_ability_draws_from_the_strife_list_only() {
        let state = state(vec!["bite".to_string(), "croak".to_string()]);
        let actor = frog(&state);
        let decision = decide(&state, &actor, BehaviourIndex::RandomAbility, &PcgRng);
        // croak is a calm ability; the only strife candidate is bite.
        match decision {
            EnemyDecision::Ability { ability, .. } => assert_eq!(ability, "bite"),
            other => panic!("unexpected decision {other:?}"),
        }
    }

    #[test]
    fn random_ability_falls_back_to_a_plain_attack() {
        let state = state(vec!["croak".to_string()]);
        let actor = frog(&state);
        let decision = decide(&state, &actor, BehaviourIndex::RandomAbility, &PcgRng);
        assert!(matches!(decision, EnemyDecision::Attack { .. }));
    }
}
