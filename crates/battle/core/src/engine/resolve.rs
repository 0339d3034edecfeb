//! Action and aura resolution.
//!
//! Resolution mutates combatant state atomically per call: validations that
//! can fail run before the first mutation, so a caller never observes a
//! half-applied action.

use std::sync::Arc;

use tracing::{debug, trace};

use super::errors::BattleError;
use crate::catalog::{AbilityDef, EffectDef, StatKind};
use crate::config::BattleConfig;
use crate::rng::{RngOracle, compute_seed};
use crate::state::{Allegiance, AuraInstance, BattleState, CombatantId};

/// State changes a resolution call produced that the scheduler cares about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolutionFlags {
    pub any_death: bool,
    pub agility_changed: bool,
}

impl ResolutionFlags {
    pub fn invalidates_schedule(self) -> bool {
        self.any_death || self.agility_changed
    }

    fn merge(&mut self, other: ResolutionFlags) {
        self.any_death |= other.any_death;
        self.agility_changed |= other.agility_changed;
    }
}

/// Per-call roll counter: each crit draw within one action gets a distinct
/// context so identical effects in sequence roll independently.
struct RollCounter {
    nonce: u64,
    actor: u32,
    next: u32,
}

impl RollCounter {
    fn new(state: &BattleState, actor: CombatantId, base: u32) -> Self {
        Self {
            nonce: state.nonce,
            actor: actor.0,
            next: base,
        }
    }

    fn draw(&mut self, state: &BattleState, rng: &dyn RngOracle) -> f32 {
        let seed = compute_seed(state.seed, self.nonce, self.actor, self.next);
        self.next += 1;
        rng.unit_f32(seed)
    }
}

/// Critical-hit check: chance grows linearly with the source's agility, and
/// the top slice of the unit interval crits.
fn is_crit(config: &BattleConfig, source_agility: i32, draw: f32) -> bool {
    let chance = (config.base_crit_chance + config.crit_agility_scaling * source_agility as f32)
        / 100.0;
    draw >= 1.0 - chance
}

/// Magnitude of one effect application. HP effects push further in their own
/// direction as the source's strength grows; agility effects are unscaled.
/// A crit doubles the final magnitude.
fn effect_magnitude(effect: &EffectDef, source_strength: i32, crit: bool) -> i32 {
    let mut magnitude = effect.amount;
    if effect.stat == StatKind::Hp {
        let bonus = (source_strength as f32 * effect.strength_scaling) as i32;
        magnitude += bonus * magnitude.signum();
    }
    if crit { magnitude * 2 } else { magnitude }
}

/// Apply one effect from a source to a target, rolling the crit if allowed.
fn apply_effect(
    state: &mut BattleState,
    config: &BattleConfig,
    rng: &dyn RngOracle,
    rolls: &mut RollCounter,
    effect: &EffectDef,
    source: CombatantId,
    target: CombatantId,
) -> ResolutionFlags {
    let (strength, agility) = match state.combatants.get(source) {
        Some(src) => (src.strength, src.agility),
        None => (0, 1),
    };
    let crit = effect.can_crit && {
        let draw = rolls.draw(state, rng);
        is_crit(config, agility, draw)
    };
    let magnitude = effect_magnitude(effect, strength, crit);

    let Some(victim) = state.combatants.get_mut(target) else {
        return ResolutionFlags::default();
    };
    let mut flags = ResolutionFlags::default();
    match effect.stat {
        StatKind::Hp => {
            let was_alive = victim.is_alive();
            let hp = victim.apply_hp_delta(magnitude);
            flags.any_death = was_alive && hp == 0;
        }
        StatKind::Agility => {
            let before = victim.agility;
            let after = victim.apply_agility_delta(magnitude);
            flags.agility_changed = before != after;
        }
    }
    trace!(
        effect = %effect.name,
        %source,
        %target,
        magnitude,
        crit,
        "applied effect"
    );
    flags
}

/// Apply an ability from `source` to each target in list order.
///
/// Per target: effects in sequence, stopping early if the target dies, then
/// aura attachment (dead targets receive none). Afterwards the source's
/// resource pools mutate under the hero generation rule, unless `generate`
/// is false (plain attacks never generate).
pub(crate) fn resolve_ability(
    state: &mut BattleState,
    config: &BattleConfig,
    rng: &dyn RngOracle,
    source: CombatantId,
    ability: &Arc<AbilityDef>,
    targets: &[CombatantId],
    generate: bool,
) -> Result<ResolutionFlags, BattleError> {
    // Fail-fast validations, before any mutation.
    if generate && ability.generates_both() {
        let src = state.combatants.get(source);
        let protagonist = src.is_some_and(|c| c.is_protagonist());
        let is_hero = src.is_some_and(|c| c.allegiance == Allegiance::Hero);
        if is_hero && !protagonist {
            return Err(BattleError::ForbiddenDualGeneration {
                actor: src.map(|c| c.name.clone()).unwrap_or_default(),
                ability: ability.name.clone(),
            });
        }
    }
    if !ability.auras.is_empty() {
        for &target in targets {
            if let Some(victim) = state.combatants.get(target)
                && victim.is_alive()
                && victim.active_auras.len() + ability.auras.len()
                    > BattleConfig::MAX_ACTIVE_AURAS
            {
                return Err(BattleError::AuraOverflow {
                    bearer: victim.name.clone(),
                });
            }
        }
    }

    debug!(ability = %ability.name, %source, targets = targets.len(), "resolving action");

    let mut flags = ResolutionFlags::default();
    let mut rolls = RollCounter::new(state, source, 0);
    for &target in targets {
        for effect in &ability.effects {
            let alive = state.combatants.get(target).is_some_and(|c| c.is_alive());
            if !alive {
                break;
            }
            flags.merge(apply_effect(
                state, config, rng, &mut rolls, effect, source, target,
            ));
        }
        let alive = state.combatants.get(target).is_some_and(|c| c.is_alive());
        if alive {
            for aura in &ability.auras {
                if let Some(victim) = state.combatants.get_mut(target) {
                    victim
                        .active_auras
                        .push(AuraInstance::new(source, aura.clone()));
                }
            }
        }
    }

    if generate {
        apply_generation(state, source, ability);
    }
    Ok(flags)
}

/// Hero resource generation after an ability resolves.
///
/// The protagonist accrues both pools freely. Any other hero trades: a pool
/// only accrues while the opposing pool is empty, otherwise the generated
/// amount burns the opposing pool down instead. Enemies have no pools.
fn apply_generation(state: &mut BattleState, source: CombatantId, ability: &Arc<AbilityDef>) {
    let Some(actor) = state.combatants.get_mut(source) else {
        return;
    };
    if actor.allegiance != Allegiance::Hero {
        return;
    }
    if actor.is_protagonist() {
        actor.calm += ability.calm_gen;
        actor.strife += ability.strife_gen;
        return;
    }
    if ability.calm_gen > 0 {
        if actor.strife > 0 {
            actor.strife = actor.strife.saturating_sub(ability.calm_gen);
        } else {
            actor.calm += ability.calm_gen;
        }
    }
    if ability.strife_gen > 0 {
        if actor.calm > 0 {
            actor.calm = actor.calm.saturating_sub(ability.strife_gen);
        } else {
            actor.strife += ability.strife_gen;
        }
    }
}

/// Tick the bearer's active auras once, at the start of its turn.
///
/// Each instance applies its next effect (magnitudes scale with the caster's
/// strength, even posthumously) and advances its cursor; exhausted instances
/// are removed before this returns. A bearer that dies to a tick takes no
/// further ticks.
pub(crate) fn resolve_auras(
    state: &mut BattleState,
    config: &BattleConfig,
    rng: &dyn RngOracle,
    bearer: CombatantId,
) -> ResolutionFlags {
    let mut flags = ResolutionFlags::default();
    let mut rolls = RollCounter::new(state, bearer, 0);

    let count = state
        .combatants
        .get(bearer)
        .map(|c| c.active_auras.len())
        .unwrap_or(0);
    for index in 0..count {
        let alive = state.combatants.get(bearer).is_some_and(|c| c.is_alive());
        if !alive {
            break;
        }
        let Some((caster, effect)) = state.combatants.get(bearer).and_then(|c| {
            let instance = c.active_auras.get(index)?;
            let effect = instance.def.effects.get(instance.cursor)?.clone();
            Some((instance.caster, effect))
        }) else {
            continue;
        };
        flags.merge(apply_effect(
            state, config, rng, &mut rolls, &effect, caster, bearer,
        ));
        if let Some(c) = state.combatants.get_mut(bearer)
            && let Some(instance) = c.active_auras.get_mut(index)
        {
            instance.cursor += 1;
        }
    }

    if let Some(c) = state.combatants.get_mut(bearer) {
        c.active_auras.retain(|instance| !instance.is_expired());
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        AbilitySchool, AbilitySpec, AuraSpec, Catalog, EnemySpec, HeroSpec, TargetingMode,
    };
    use crate::policy::BehaviourIndex;
    use crate::state::{Allegiance, EncounterSpec};

    /// Oracle with a fixed unit draw; crit outcome is chosen by the test.
    struct FixedDraw(f32);

    impl RngOracle for FixedDraw {
        fn next_u32(&self, _seed: u64) -> u32 {
            (self.0 as f64 * 4_294_967_296.0) as u32
        }
    }

    const NEVER_CRIT: FixedDraw = FixedDraw(0.0);
    const ALWAYS_CRIT: FixedDraw = FixedDraw(0.999);

    fn effect(name: &str, stat: StatKind, amount: i32, scaling: f32, can_crit: bool) -> EffectDef {
        EffectDef {
            name: name.to_string(),
            stat,
            amount,
            strength_scaling: scaling,
            can_crit,
        }
    }

    fn ability(name: &str, effects: &[&str], auras: &[&str]) -> AbilitySpec {
        AbilitySpec {
            name: name.to_string(),
            school: AbilitySchool::Strife,
            calm_cost: 0,
            strife_cost: 0,
            calm_gen: 0,
            strife_gen: 0,
            effects: effects.iter().map(|s| s.to_string()).collect(),
            auras: auras.iter().map(|s| s.to_string()).collect(),
            targeting: TargetingMode::Single,
        }
    }

    fn setup(effects: Vec<EffectDef>, auras: Vec<AuraSpec>, abilities: Vec<AbilitySpec>) -> (Catalog, BattleState) {
        let mut all = abilities;
        all.push(ability("attack", &[], &[]));
        let hero = HeroSpec {
            name: "jack".to_string(),
            hp: 30,
            max_hp: 30,
            strength: 10,
            agility: 6,
            calm: 0,
            strife: 0,
            protagonist: true,
            abilities: vec![],
        };
        let sidekick = HeroSpec {
            name: "marl".to_string(),
            protagonist: false,
            ..hero.clone()
        };
        let enemy = EnemySpec {
            name: "frog".to_string(),
            max_hp: 20,
            strength: 4,
            agility: 4,
            behaviour: BehaviourIndex::DoNothing,
            abilities: vec![],
        };
        let catalog = Catalog::build(effects, auras, all, vec![hero, sidekick], vec![enemy]).unwrap();
        let encounter = EncounterSpec {
            heroes: vec!["jack".to_string(), "marl".to_string()],
            enemies: vec!["frog".to_string()],
        };
        let state = BattleState::new(&catalog, &encounter, &BattleConfig::new(), 9).unwrap();
        (catalog, state)
    }

    const JACK: CombatantId = CombatantId(0);
    const MARL: CombatantId = CombatantId(1);
    const FROG: CombatantId = CombatantId(2);

    #[test]
    fn hp_damage_scales_with_strength_in_its_own_direction() {
        let (catalog, mut state) = setup(
            vec![
                effect("claw", StatKind::Hp, -4, 0.5, false),
                effect("mend", StatKind::Hp, 4, 0.5, false),
            ],
            vec![],
            vec![ability("maul", &["claw"], &[]), ability("salve", &["mend"], &[])],
        );
        let config = BattleConfig::new();

        // strength 10 * 0.5 = 5 extra, pushing -4 to -9.
        let maul = catalog.ability("maul").unwrap().clone();
        resolve_ability(&mut state, &config, &NEVER_CRIT, JACK, &maul, &[FROG], false).unwrap();
        assert_eq!(state.combatants.get(FROG).unwrap().hp, 11);

        // Healing scales upward the same way: +4 becomes +9, clamped at max.
        let salve = catalog.ability("salve").unwrap().clone();
        state.combatants.get_mut(MARL).unwrap().hp = 15;
        resolve_ability(&mut state, &config, &NEVER_CRIT, JACK, &salve, &[MARL], false).unwrap();
        assert_eq!(state.combatants.get(MARL).unwrap().hp, 24);
    }

    #[test]
    fn crit_doubles_magnitude_only_when_allowed() {
        let (catalog, mut state) = setup(
            vec![
                effect("claw", StatKind::Hp, -4, 0.0, true),
                effect("fang", StatKind::Hp, -4, 0.0, false),
            ],
            vec![],
            vec![ability("maul", &["claw"], &[]), ability("bite", &["fang"], &[])],
        );
        let config = BattleConfig::new();

        let maul = catalog.ability("maul").unwrap().clone();
        resolve_ability(&mut state, &config, &ALWAYS_CRIT, JACK, &maul, &[FROG], false).unwrap();
        assert_eq!(state.combatants.get(FROG).unwrap().hp, 12);

        // can_crit = false: the same top-of-range draw changes nothing.
        let bite = catalog.ability("bite").unwrap().clone();
        resolve_ability(&mut state, &config, &ALWAYS_CRIT, JACK, &bite, &[FROG], false).unwrap();
        assert_eq!(state.combatants.get(FROG).unwrap().hp, 8);
    }

    #[test]
    fn dying_target_receives_no_more_effects_or_auras() {
        let (catalog, mut state) = setup(
            vec![
                effect("claw", StatKind::Hp, -30, 0.0, false),
                effect("slow", StatKind::Agility, -1, 0.0, false),
            ],
            vec![AuraSpec {
                name: "venom".to_string(),
                effects: vec!["slow".to_string()],
            }],
            vec![ability("ruin", &["claw", "slow"], &["venom"])],
        );
        let config = BattleConfig::new();

        let ruin = catalog.ability("ruin").unwrap().clone();
        let flags =
            resolve_ability(&mut state, &config, &NEVER_CRIT, JACK, &ruin, &[FROG], false).unwrap();
        assert!(flags.any_death);

        let frog = state.combatants.get(FROG).unwrap();
        assert_eq!(frog.hp, 0);
        // The follow-up agility effect and the aura were both skipped.
        assert_eq!(frog.agility, 4);
        assert!(frog.active_auras.is_empty());
        assert!(!flags.agility_changed);
    }

    #[test]
    fn aura_ticks_once_per_call_and_expires_after_last_effect() {
        let (catalog, mut state) = setup(
            vec![effect("sting", StatKind::Hp, -2, 0.0, false)],
            vec![AuraSpec {
                name: "venom".to_string(),
                effects: vec!["sting".to_string(), "sting".to_string()],
            }],
            vec![ability("envenom", &[], &["venom"])],
        );
        let config = BattleConfig::new();

        let envenom = catalog.ability("envenom").unwrap().clone();
        resolve_ability(&mut state, &config, &NEVER_CRIT, JACK, &envenom, &[FROG], false).unwrap();
        assert_eq!(state.combatants.get(FROG).unwrap().active_auras.len(), 1);

        resolve_auras(&mut state, &config, &NEVER_CRIT, FROG);
        let frog = state.combatants.get(FROG).unwrap();
        assert_eq!(frog.hp, 18);
        assert_eq!(frog.active_auras[0].cursor, 1);

        // Second tick exhausts the aura and removes it in the same call.
        resolve_auras(&mut state, &config, &NEVER_CRIT, FROG);
        let frog = state.combatants.get(FROG).unwrap();
        assert_eq!(frog.hp, 16);
        assert!(frog.active_auras.is_empty());

        // Further calls are no-ops.
        resolve_auras(&mut state, &config, &NEVER_CRIT, FROG);
        assert_eq!(state.combatants.get(FROG).unwrap().hp, 16);
    }

    #[test]
    fn aura_magnitude_uses_casters_strength_even_after_death() {
        let (catalog, mut state) = setup(
            vec![effect("sear", StatKind::Hp, -2, 1.0, false)],
            vec![AuraSpec {
                name: "burn".to_string(),
                effects: vec!["sear".to_string()],
            }],
            vec![ability("ignite", &[], &["burn"])],
        );
        let config = BattleConfig::new();

        let ignite = catalog.ability("ignite").unwrap().clone();
        resolve_ability(&mut state, &config, &NEVER_CRIT, JACK, &ignite, &[FROG], false).unwrap();
        state.combatants.get_mut(JACK).unwrap().hp = 0;

        // Jack's strength 10 still feeds the tick: -2 - 10 = -12.
        resolve_auras(&mut state, &config, &NEVER_CRIT, FROG);
        assert_eq!(state.combatants.get(FROG).unwrap().hp, 8);
    }

    #[test]
    fn generation_trades_for_non_protagonists() {
        let (catalog, mut state) = setup(vec![], vec![], vec![AbilitySpec {
            calm_gen: 3,
            ..ability("meditate", &[], &[])
        }]);
        let config = BattleConfig::new();
        let meditate = catalog.ability("meditate").unwrap().clone();

        // Non-protagonist with strife burns it down instead of gaining calm.
        state.combatants.get_mut(MARL).unwrap().strife = 5;
        resolve_ability(&mut state, &config, &NEVER_CRIT, MARL, &meditate, &[], true).unwrap();
        let marl = state.combatants.get(MARL).unwrap();
        assert_eq!((marl.calm, marl.strife), (0, 2));

        // The protagonist accrues freely, strife untouched.
        state.combatants.get_mut(JACK).unwrap().strife = 5;
        resolve_ability(&mut state, &config, &NEVER_CRIT, JACK, &meditate, &[], true).unwrap();
        let jack = state.combatants.get(JACK).unwrap();
        assert_eq!((jack.calm, jack.strife), (3, 5));
    }

    #[test]
    fn dual_generation_is_protagonist_only() {
        let (catalog, mut state) = setup(vec![], vec![], vec![AbilitySpec {
            calm_gen: 2,
            strife_gen: 2,
            ..ability("surge", &[], &[])
        }]);
        let config = BattleConfig::new();
        let surge = catalog.ability("surge").unwrap().clone();

        let err = resolve_ability(&mut state, &config, &NEVER_CRIT, MARL, &surge, &[], true)
            .unwrap_err();
        assert!(matches!(err, BattleError::ForbiddenDualGeneration { .. }));
        // Nothing mutated.
        let marl = state.combatants.get(MARL).unwrap();
        assert_eq!((marl.calm, marl.strife), (0, 0));

        resolve_ability(&mut state, &config, &NEVER_CRIT, JACK, &surge, &[], true).unwrap();
        let jack = state.combatants.get(JACK).unwrap();
        assert_eq!((jack.calm, jack.strife), (2, 2));
    }

    #[test]
    fn enemies_never_generate() {
        let (catalog, mut state) = setup(vec![], vec![], vec![AbilitySpec {
            strife_gen: 4,
            ..ability("rage", &[], &[])
        }]);
        let config = BattleConfig::new();
        let rage = catalog.ability("rage").unwrap().clone();

        resolve_ability(&mut state, &config, &NEVER_CRIT, FROG, &rage, &[], true).unwrap();
        let frog = state.combatants.get(FROG).unwrap();
        assert_eq!(frog.allegiance, Allegiance::Enemy);
        assert_eq!((frog.calm, frog.strife), (0, 0));
    }
}
