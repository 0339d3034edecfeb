//! Speed-clock turn scheduler.
//!
//! Each live combatant carries an integer clock. Generating a queue entry
//! repeatedly subtracts every live combatant's agility from its own clock;
//! once one or more clocks reach zero or below, the most overspent clock
//! wins (heroes before enemies, then ascending id) and is refilled with its
//! overspill carried forward. Faster combatants therefore surface at a
//! frequency proportional to their agility, without bucketed rounds.
//!
//! A snapshot of the clock vector is kept for every generated entry, keyed
//! by the monotone turn counter. When a death or agility change invalidates
//! the look-ahead, the scheduler rolls back to the snapshot of the turn in
//! progress and regenerates everything behind it from live state.

use tracing::{debug, trace};

use super::errors::TurnError;
use crate::config::BattleConfig;
use crate::state::{Allegiance, BattleState, CombatantId};

/// Generate one queue entry and snapshot the clocks behind it.
fn generate_entry(state: &mut BattleState, config: &BattleConfig) -> Result<CombatantId, TurnError> {
    // (allegiance, id, agility) per live combatant; dead combatants take no
    // part in subtraction or selection.
    let live: Vec<(Allegiance, CombatantId, i32)> = state
        .combatants
        .live()
        .map(|c| (c.allegiance, c.id, c.agility))
        .collect();
    if live.is_empty() {
        return Err(TurnError::NoLiveCombatants);
    }

    loop {
        let mut winner: Option<(i32, Allegiance, CombatantId)> = None;
        for &(allegiance, id, _) in &live {
            let clock = state.turns.clocks[id.0 as usize];
            if clock > 0 {
                continue;
            }
            let candidate = (clock, allegiance, id);
            match winner {
                None => winner = Some(candidate),
                Some(best) => {
                    if candidate < best {
                        winner = Some(candidate);
                    } else if candidate == best {
                        // Ids are unique, so a full-key tie means the table
                        // is corrupt.
                        return Err(TurnError::UnresolvedTie { a: best.2, b: id });
                    }
                }
            }
        }

        if let Some((clock, _, id)) = winner {
            let agility = state
                .combatants
                .get(id)
                .map(|c| c.agility)
                .unwrap_or_default();
            // Overspill carries forward: a clock that went far negative gets
            // a head start on its next refill.
            state.turns.clocks[id.0 as usize] = config.clock_start + clock + agility;
            let turn = state.turns.next_turn;
            state.turns.queue.push_back(id);
            state
                .turns
                .snapshots
                .insert(turn, state.turns.clocks.clone());
            state.turns.next_turn += 1;
            trace!(%id, turn, clock, "scheduled turn");
            return Ok(id);
        }

        for &(_, id, agility) in &live {
            state.turns.clocks[id.0 as usize] -= agility;
        }
    }
}

/// Top the look-ahead queue back up to its configured size.
pub(crate) fn refill_queue(state: &mut BattleState, config: &BattleConfig) -> Result<(), TurnError> {
    while state.turns.queue.len() < config.turn_queue_size {
        generate_entry(state, config)?;
    }
    Ok(())
}

/// Pop the finished turn and prepare the next one.
pub(crate) fn advance_queue(
    state: &mut BattleState,
    config: &BattleConfig,
) -> Result<(), TurnError> {
    state.turns.queue.pop_front();
    state.turns.current_turn += 1;
    let current = state.turns.current_turn;
    state.turns.snapshots.retain(|&turn, _| turn >= current);
    state.turns.auras_resolved = false;
    refill_queue(state, config)
}

/// Throw away the look-ahead beyond the turn in progress and regenerate it
/// from that turn's clock snapshot with current agility and liveness.
///
/// The head entry is kept even if its combatant has since died: that turn is
/// already executing. The generation loop never schedules dead combatants,
/// so nothing dead can appear behind the head.
pub(crate) fn rebuild_queue(
    state: &mut BattleState,
    config: &BattleConfig,
) -> Result<(), TurnError> {
    let current = state.turns.current_turn;
    let base = state
        .turns
        .snapshots
        .get(&current)
        .ok_or(TurnError::MissingSnapshot { turn: current })?
        .clone();
    state.turns.clocks = base;
    state.turns.queue.truncate(1);
    state.turns.next_turn = current + 1;
    state.turns.snapshots.retain(|&turn, _| turn <= current);
    debug!(turn = current, "rebuilding turn queue");
    refill_queue(state, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AbilitySchool, AbilitySpec, Catalog, EffectDef, EnemySpec, HeroSpec, StatKind, TargetingMode};
    use crate::policy::BehaviourIndex;
    use crate::state::EncounterSpec;

    fn catalog(hero_agility: &[i32], enemy_agility: &[i32]) -> (Catalog, EncounterSpec) {
        let strike = EffectDef {
            name: "strike".to_string(),
            stat: StatKind::Hp,
            amount: -3,
            strength_scaling: 0.5,
            can_crit: true,
        };
        let attack = AbilitySpec {
            name: "attack".to_string(),
            school: AbilitySchool::Strife,
            calm_cost: 0,
            strife_cost: 0,
            calm_gen: 0,
            strife_gen: 0,
            effects: vec!["strike".to_string()],
            auras: vec![],
            targeting: TargetingMode::Single,
        };
        let heroes: Vec<HeroSpec> = hero_agility
            .iter()
            .enumerate()
            .map(|(i, &agility)| HeroSpec {
                name: format!("hero{i}"),
                hp: 20,
                max_hp: 20,
                strength: 4,
                agility,
                calm: 0,
                strife: 0,
                protagonist: false,
                abilities: vec![],
            })
            .collect();
        let enemies: Vec<EnemySpec> = enemy_agility
            .iter()
            .enumerate()
            .map(|(i, &agility)| EnemySpec {
                name: format!("enemy{i}"),
                max_hp: 10,
                strength: 2,
                agility,
                behaviour: BehaviourIndex::DoNothing,
                abilities: vec![],
            })
            .collect();
        let encounter = EncounterSpec {
            heroes: heroes.iter().map(|h| h.name.clone()).collect(),
            enemies: enemies.iter().map(|e| e.name.clone()).collect(),
        };
        let catalog = Catalog::build(vec![strike], vec![], vec![attack], heroes, enemies).unwrap();
        (catalog, encounter)
    }

    fn state(hero_agility: &[i32], enemy_agility: &[i32], config: &BattleConfig) -> BattleState {
        let (catalog, encounter) = catalog(hero_agility, enemy_agility);
        BattleState::new(&catalog, &encounter, config, 1).unwrap()
    }

    #[test]
    fn turn_frequency_tracks_agility() {
        let config = BattleConfig::new();
        let mut state = state(&[10], &[5], &config);
        let mut counts = [0usize; 2];
        for _ in 0..30 {
            let id = generate_entry(&mut state, &config).unwrap();
            counts[id.0 as usize] += 1;
        }
        assert_eq!(counts, [20, 10]);
    }

    #[test]
    fn fast_hero_acts_twice_per_slow_enemy() {
        let config = BattleConfig::new();
        let mut state = state(&[10], &[5], &config);
        let first: Vec<u32> = (0..3)
            .map(|_| generate_entry(&mut state, &config).unwrap().0)
            .collect();
        assert_eq!(first.iter().filter(|&&id| id == 0).count(), 2);
        assert_eq!(first.iter().filter(|&&id| id == 1).count(), 1);
    }

    #[test]
    fn equal_clocks_schedule_hero_first_then_lower_id() {
        let config = BattleConfig::new();
        // Identical agility everywhere: every clock arrives together.
        let mut state = state(&[7, 7], &[7], &config);
        let order: Vec<u32> = (0..3)
            .map(|_| generate_entry(&mut state, &config).unwrap().0)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn dead_combatants_are_never_scheduled() {
        let config = BattleConfig::new();
        let mut state = state(&[10], &[5], &config);
        state.combatants.get_mut(CombatantId(1)).unwrap().hp = 0;
        for _ in 0..10 {
            assert_eq!(generate_entry(&mut state, &config).unwrap(), CombatantId(0));
        }
    }

    #[test]
    fn all_dead_is_a_fatal_error() {
        let config = BattleConfig::new();
        let mut state = state(&[10], &[5], &config);
        for combatant in state.combatants.iter_mut() {
            combatant.hp = 0;
        }
        assert_eq!(
            generate_entry(&mut state, &config).unwrap_err(),
            TurnError::NoLiveCombatants
        );
    }

    #[test]
    fn rebuild_regenerates_lookahead_from_current_snapshot() {
        let config = BattleConfig::new();
        let mut state = state(&[10], &[5], &config);
        refill_queue(&mut state, &config).unwrap();
        assert_eq!(state.turns.queue.len(), config.turn_queue_size);
        let before: Vec<CombatantId> = state.turns.preview().collect();

        // Rebuild without any state change reproduces the same schedule.
        rebuild_queue(&mut state, &config).unwrap();
        let after: Vec<CombatantId> = state.turns.preview().collect();
        assert_eq!(before, after);

        // Kill the enemy mid-turn: the head survives, everything behind it
        // is hero-only.
        state.combatants.get_mut(CombatantId(1)).unwrap().hp = 0;
        rebuild_queue(&mut state, &config).unwrap();
        assert_eq!(state.turns.queue.len(), config.turn_queue_size);
        assert!(state.turns.preview().skip(1).all(|id| id == CombatantId(0)));
    }

    #[test]
    fn advance_pops_head_and_keeps_queue_full() {
        let config = BattleConfig::new();
        let mut state = state(&[10], &[5], &config);
        refill_queue(&mut state, &config).unwrap();
        let second = state.turns.queue[1];
        advance_queue(&mut state, &config).unwrap();
        assert_eq!(state.turns.head(), Some(second));
        assert_eq!(state.turns.queue.len(), config.turn_queue_size);
        assert_eq!(state.turns.current_turn, 1);
        assert!(!state.turns.auras_resolved);
        assert!(state.turns.snapshots.keys().all(|&t| t >= 1));
    }

    #[test]
    fn agility_change_shifts_future_turns() {
        let config = BattleConfig::new();
        let mut state = state(&[10], &[10], &config);
        refill_queue(&mut state, &config).unwrap();
        // Equal agility alternates strictly.
        let before: Vec<u32> = state.turns.preview().map(|id| id.0).collect();
        assert_eq!(before, vec![0, 1, 0, 1, 0, 1, 0, 1]);

        // Slow the enemy: behind the head, the hero now acts more often.
        state.combatants.get_mut(CombatantId(1)).unwrap().agility = 5;
        rebuild_queue(&mut state, &config).unwrap();
        let hero_turns = state.turns.preview().filter(|id| id.0 == 0).count();
        assert!(hero_turns > 4, "hero got {hero_turns} of 8 turns");
    }
}
