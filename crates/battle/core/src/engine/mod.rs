//! Battle lifecycle engine.
//!
//! [`BattleEngine`] borrows the battle state and drives it through the
//! phase machine: `Init` → alternating choice phases → a terminal victory
//! state. The caller decides when to invoke it; nothing here polls.
//!
//! The driving contract is a two-call surface. [`BattleEngine::advance`]
//! runs everything that needs no external input (aura ticks, enemy turns,
//! end-of-battle detection) and stops when a hero choice is awaited or the
//! battle is over. [`BattleEngine::submit_action`] resolves one hero action
//! and hands the turn back; the caller then advances again.

mod errors;
mod resolve;
mod turns;

pub use errors::{BattleError, TurnError};
pub use resolve::ResolutionFlags;

use tracing::{debug, info};

use crate::catalog::TargetingMode;
use crate::config::BattleConfig;
use crate::policy::{self, EnemyDecision};
use crate::rng::RngOracle;
use crate::state::{Allegiance, BattlePhase, BattleState, CombatantId, CombatantKind};
use crate::targeting::resolve_targets;

/// One hero action submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRequest {
    pub source: CombatantId,
    pub choice: ActionChoice,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionChoice {
    /// The universal plain attack. Never touches resource pools.
    Attack { target: CombatantId },
    /// A named ability the actor knows, with explicit targets for
    /// single-target modes (group modes take none).
    Ability {
        name: String,
        targets: Vec<CombatantId>,
    },
}

/// Drives one battle. Borrows the state for the duration of each call
/// sequence; the state itself stays plain data.
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    config: &'a BattleConfig,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState, config: &'a BattleConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    /// Prime the turn queue and leave `Init`.
    ///
    /// Returns the first choice phase; call [`BattleEngine::advance`] next
    /// to run any leading enemy turns.
    pub fn start(&mut self) -> Result<BattlePhase, BattleError> {
        if self.state.phase != BattlePhase::Init {
            return Err(BattleError::WrongPhase {
                phase: self.state.phase,
            });
        }
        turns::refill_queue(self.state, self.config)?;
        self.state.phase = self.phase_for_head()?;
        info!(phase = %self.state.phase, combatants = self.state.combatants.len(), "battle started");
        Ok(self.state.phase)
    }

    /// Run the battle forward until a hero choice is awaited or the battle
    /// ends. Enemy turns resolve themselves through their behaviour policy.
    pub fn advance(&mut self, rng: &dyn RngOracle) -> Result<BattlePhase, BattleError> {
        loop {
            match self.state.phase {
                BattlePhase::Init => {
                    return Err(BattleError::WrongPhase {
                        phase: BattlePhase::Init,
                    });
                }
                BattlePhase::HeroWon | BattlePhase::EnemyWon => return Ok(self.state.phase),
                BattlePhase::HeroChoice => {
                    self.resolve_turn_auras(rng)?;
                    if self.state.phase.is_terminal() {
                        return Ok(self.state.phase);
                    }
                    if !self.current_alive() {
                        // Died to its own auras; the turn passes.
                        self.finish_turn()?;
                        continue;
                    }
                    return Ok(BattlePhase::HeroChoice);
                }
                BattlePhase::EnemyChoice => {
                    self.resolve_turn_auras(rng)?;
                    if self.state.phase.is_terminal() {
                        return Ok(self.state.phase);
                    }
                    if self.current_alive() {
                        self.take_enemy_turn(rng)?;
                        if self.state.phase.is_terminal() {
                            return Ok(self.state.phase);
                        }
                    }
                    self.finish_turn()?;
                }
            }
        }
    }

    /// Resolve one hero action for the current turn.
    ///
    /// Validates phase, actor identity, ability knowledge, resource
    /// requirements and targets before anything mutates. On success the
    /// turn is finished and the next choice phase (or a terminal phase)
    /// is returned.
    pub fn submit_action(
        &mut self,
        request: &ActionRequest,
        rng: &dyn RngOracle,
    ) -> Result<BattlePhase, BattleError> {
        if self.state.phase != BattlePhase::HeroChoice {
            return Err(BattleError::WrongPhase {
                phase: self.state.phase,
            });
        }
        // Normally a no-op: advance() already ticked them.
        self.resolve_turn_auras(rng)?;
        if self.state.phase.is_terminal() {
            return Ok(self.state.phase);
        }
        if !self.current_alive() {
            // The actor died to its own auras before acting; its turn is
            // gone, and the stale submission fails the checks below.
            self.finish_turn()?;
        }
        if self.state.phase != BattlePhase::HeroChoice {
            return Err(BattleError::WrongPhase {
                phase: self.state.phase,
            });
        }
        let current = self.current_id()?;
        if request.source != current {
            return Err(BattleError::NotCurrentActor {
                submitted: request.source,
                current,
            });
        }

        let flags = match &request.choice {
            ActionChoice::Attack { target } => {
                let actor = self.state.combatants.get(current).expect("current actor");
                let targets = resolve_targets(
                    self.state,
                    actor,
                    self.state.attack.targeting,
                    std::slice::from_ref(target),
                )?;
                let attack = self.state.attack.clone();
                resolve::resolve_ability(
                    self.state, self.config, rng, current, &attack, &targets, false,
                )?
            }
            ActionChoice::Ability { name, targets } => {
                let actor = self.state.combatants.get(current).expect("current actor");
                let ability = actor
                    .ability(name)
                    .ok_or_else(|| BattleError::UnknownAbility {
                        actor: actor.name.clone(),
                        ability: name.clone(),
                    })?
                    .clone();
                // Costs are requirements, not spent.
                if actor.calm < ability.calm_cost || actor.strife < ability.strife_cost {
                    return Err(BattleError::InsufficientResources {
                        ability: ability.name.clone(),
                        calm_cost: ability.calm_cost,
                        strife_cost: ability.strife_cost,
                        calm: actor.calm,
                        strife: actor.strife,
                    });
                }
                let targets = resolve_targets(self.state, actor, ability.targeting, targets)?;
                resolve::resolve_ability(
                    self.state, self.config, rng, current, &ability, &targets, true,
                )?
            }
        };
        self.state.nonce += 1;
        self.after_resolution(flags)?;
        if self.state.phase.is_terminal() {
            return Ok(self.state.phase);
        }
        self.finish_turn()?;
        Ok(self.state.phase)
    }

    /// Tick the current actor's auras, once per turn.
    fn resolve_turn_auras(&mut self, rng: &dyn RngOracle) -> Result<(), BattleError> {
        if self.state.turns.auras_resolved {
            return Ok(());
        }
        let bearer = self.current_id()?;
        let flags = resolve::resolve_auras(self.state, self.config, rng, bearer);
        self.state.turns.auras_resolved = true;
        self.state.nonce += 1;
        self.after_resolution(flags)
    }

    fn take_enemy_turn(&mut self, rng: &dyn RngOracle) -> Result<(), BattleError> {
        let current = self.current_id()?;
        let actor = self.state.combatants.get(current).expect("current actor");
        let CombatantKind::Enemy { behaviour } = actor.kind else {
            return Err(BattleError::WrongPhase {
                phase: self.state.phase,
            });
        };
        let decision = policy::decide(self.state, actor, behaviour, rng);
        debug!(actor = %current, ?decision, "enemy decision");

        let flags = match decision {
            EnemyDecision::Pass => return Ok(()),
            EnemyDecision::Attack { target } => {
                let actor = self.state.combatants.get(current).expect("current actor");
                let targets =
                    resolve_targets(self.state, actor, self.state.attack.targeting, &[target])?;
                let attack = self.state.attack.clone();
                resolve::resolve_ability(
                    self.state, self.config, rng, current, &attack, &targets, false,
                )?
            }
            EnemyDecision::Ability { ability, target } => {
                let actor = self.state.combatants.get(current).expect("current actor");
                let Some(ability) = actor.ability(&ability).cloned() else {
                    // Policies only pick from the actor's own lists.
                    return Err(BattleError::UnknownAbility {
                        actor: actor.name.clone(),
                        ability,
                    });
                };
                let explicit: &[CombatantId] = match ability.targeting {
                    TargetingMode::Single => &[target],
                    TargetingMode::Party | TargetingMode::Opposition => &[],
                };
                let targets = resolve_targets(self.state, actor, ability.targeting, explicit)?;
                resolve::resolve_ability(
                    self.state, self.config, rng, current, &ability, &targets, true,
                )?
            }
        };
        self.state.nonce += 1;
        self.after_resolution(flags)
    }

    /// End-of-battle check and schedule invalidation after any resolution.
    fn after_resolution(&mut self, flags: ResolutionFlags) -> Result<(), BattleError> {
        if !flags.invalidates_schedule() {
            return Ok(());
        }
        if let Some(outcome) = self.check_end() {
            info!(phase = %outcome, "battle over");
            self.state.phase = outcome;
            return Ok(());
        }
        turns::rebuild_queue(self.state, self.config)?;
        Ok(())
    }

    /// Pop the finished turn and enter the next head's choice phase.
    fn finish_turn(&mut self) -> Result<(), BattleError> {
        turns::advance_queue(self.state, self.config)?;
        self.state.phase = self.phase_for_head()?;
        Ok(())
    }

    /// Hero loss is checked before hero victory: a mutual wipe is a defeat.
    fn check_end(&self) -> Option<BattlePhase> {
        if self.state.combatants.live_heroes().next().is_none() {
            return Some(BattlePhase::EnemyWon);
        }
        if self.state.combatants.live_enemies().next().is_none() {
            return Some(BattlePhase::HeroWon);
        }
        None
    }

    fn current_id(&self) -> Result<CombatantId, BattleError> {
        self.state
            .turns
            .head()
            .ok_or(BattleError::Turn(TurnError::NoLiveCombatants))
    }

    fn current_alive(&self) -> bool {
        self.state
            .current_actor()
            .is_some_and(|actor| actor.is_alive())
    }

    fn phase_for_head(&self) -> Result<BattlePhase, BattleError> {
        let id = self.current_id()?;
        let actor = self
            .state
            .combatants
            .get(id)
            .ok_or(BattleError::Turn(TurnError::NoLiveCombatants))?;
        Ok(match actor.allegiance {
            Allegiance::Hero => BattlePhase::HeroChoice,
            Allegiance::Enemy => BattlePhase::EnemyChoice,
        })
    }
}
