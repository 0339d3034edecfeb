//! Engine error types.

use crate::error::{CoreError, ErrorSeverity};
use crate::state::{BattlePhase, CombatantId};
use crate::targeting::TargetingError;

/// Scheduler invariant violations. None of these are recoverable: the
/// algorithm guarantees they cannot occur for a well-formed battle, so
/// hitting one means corrupted state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("no live combatants to schedule")]
    NoLiveCombatants,

    #[error("scheduler tie between {a} and {b} could not be resolved")]
    UnresolvedTie { a: CombatantId, b: CombatantId },

    #[error("no clock snapshot for turn {turn}")]
    MissingSnapshot { turn: u64 },
}

impl CoreError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}

/// Errors surfaced by battle operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("operation not valid in phase {phase}")]
    WrongPhase { phase: BattlePhase },

    #[error("it is {current}'s turn, not {submitted}'s")]
    NotCurrentActor {
        submitted: CombatantId,
        current: CombatantId,
    },

    #[error("combatant '{actor}' does not know ability '{ability}'")]
    UnknownAbility { actor: String, ability: String },

    #[error("'{ability}' requires calm {calm_cost} and strife {strife_cost}, actor has {calm}/{strife}")]
    InsufficientResources {
        ability: String,
        calm_cost: u32,
        strife_cost: u32,
        calm: u32,
        strife: u32,
    },

    #[error("ability '{ability}' generates both pools but '{actor}' is not the protagonist")]
    ForbiddenDualGeneration { actor: String, ability: String },

    #[error("combatant '{bearer}' cannot hold more auras")]
    AuraOverflow { bearer: String },

    #[error(transparent)]
    Targeting(#[from] TargetingError),

    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl CoreError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            BattleError::WrongPhase { .. }
            | BattleError::NotCurrentActor { .. }
            | BattleError::UnknownAbility { .. }
            | BattleError::InsufficientResources { .. } => ErrorSeverity::Validation,
            BattleError::ForbiddenDualGeneration { .. } | BattleError::AuraOverflow { .. } => {
                ErrorSeverity::Data
            }
            BattleError::Targeting(err) => err.severity(),
            BattleError::Turn(err) => err.severity(),
        }
    }
}
