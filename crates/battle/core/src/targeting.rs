//! Target list resolution.

use crate::catalog::TargetingMode;
use crate::error::{CoreError, ErrorSeverity};
use crate::state::{BattleState, CombatantId, CombatantState};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TargetingError {
    #[error("no such combatant {target}")]
    UnknownTarget { target: CombatantId },

    #[error("combatant {target} is dead")]
    DeadTarget { target: CombatantId },

    #[error("expected exactly one target, got {got}")]
    ExpectedSingleTarget { got: usize },

    #[error("group targeting takes no explicit targets, got {got}")]
    UnexpectedTargets { got: usize },
}

impl CoreError for TargetingError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}

/// Resolve the concrete target list for an action.
///
/// Single-target actions require exactly one explicit, live target. Group
/// modes derive the list from the battle state relative to the actor and
/// reject explicit targets; the derived list contains live combatants only.
pub fn resolve_targets(
    state: &BattleState,
    actor: &CombatantState,
    mode: TargetingMode,
    explicit: &[CombatantId],
) -> Result<Vec<CombatantId>, TargetingError> {
    match mode {
        TargetingMode::Single => {
            let [target] = explicit else {
                return Err(TargetingError::ExpectedSingleTarget {
                    got: explicit.len(),
                });
            };
            let combatant = state
                .combatants
                .get(*target)
                .ok_or(TargetingError::UnknownTarget { target: *target })?;
            if !combatant.is_alive() {
                return Err(TargetingError::DeadTarget { target: *target });
            }
            Ok(vec![*target])
        }
        TargetingMode::Party | TargetingMode::Opposition => {
            if !explicit.is_empty() {
                return Err(TargetingError::UnexpectedTargets {
                    got: explicit.len(),
                });
            }
            let side = match mode {
                TargetingMode::Party => actor.allegiance,
                _ => actor.allegiance.opposing(),
            };
            Ok(state.combatants.live_side(side).map(|c| c.id).collect())
        }
    }
}
