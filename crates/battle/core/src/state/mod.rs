//! Battle state: the complete mutable record of one encounter.

mod combatant;
mod table;
mod turn;

pub use combatant::{Allegiance, AuraInstance, CombatantId, CombatantKind, CombatantState};
pub use table::CombatantTable;
pub use turn::TurnQueueState;

use std::sync::Arc;

use crate::catalog::{AbilityDef, Catalog, CatalogError};
use crate::config::BattleConfig;
use crate::error::{CoreError, ErrorSeverity};

/// Lifecycle phase of a battle.
///
/// `Init` lasts until the first call to start the battle; from then on the
/// phase names whose choice is awaited, until one side is wiped out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BattlePhase {
    Init,
    HeroChoice,
    EnemyChoice,
    HeroWon,
    EnemyWon,
}

impl BattlePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, BattlePhase::HeroWon | BattlePhase::EnemyWon)
    }
}

/// Which combatants take part in a battle, referenced by template name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSpec {
    pub heroes: Vec<String>,
    pub enemies: Vec<String>,
}

/// Errors raised while assembling a battle from catalog data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("encounter has no {side}s")]
    EmptyRoster { side: Allegiance },

    #[error("encounter has {count} combatants, limit is {max}")]
    TooManyCombatants { count: usize, max: usize },
}

impl CoreError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SetupError::Catalog(err) => err.severity(),
            SetupError::EmptyRoster { .. } | SetupError::TooManyCombatants { .. } => {
                ErrorSeverity::Data
            }
        }
    }
}

/// The complete mutable state of one battle.
///
/// Owns no behaviour beyond construction and simple queries; all mutation
/// goes through the engine.
#[derive(Clone, Debug)]
pub struct BattleState {
    pub phase: BattlePhase,
    pub combatants: CombatantTable,
    pub turns: TurnQueueState,
    /// The shared plain-attack ability, resolved once at setup.
    pub attack: Arc<AbilityDef>,
    /// Base seed fixed at setup; all combat rolls derive from it.
    pub seed: u64,
    /// Action sequence number, incremented after each resolved action.
    pub nonce: u64,
}

impl BattleState {
    /// Assemble a battle from catalog templates.
    ///
    /// Heroes are assigned ids first in roster order, then enemies, so that
    /// the id ordering also encodes the hero-first tie-break.
    pub fn new(
        catalog: &Catalog,
        encounter: &EncounterSpec,
        config: &BattleConfig,
        seed: u64,
    ) -> Result<Self, SetupError> {
        if encounter.heroes.is_empty() {
            return Err(SetupError::EmptyRoster {
                side: Allegiance::Hero,
            });
        }
        if encounter.enemies.is_empty() {
            return Err(SetupError::EmptyRoster {
                side: Allegiance::Enemy,
            });
        }
        let count = encounter.heroes.len() + encounter.enemies.len();
        if count > BattleConfig::MAX_COMBATANTS {
            return Err(SetupError::TooManyCombatants {
                count,
                max: BattleConfig::MAX_COMBATANTS,
            });
        }

        let mut combatants = CombatantTable::default();
        for name in &encounter.heroes {
            let template = catalog.hero(name)?;
            let id = CombatantId(combatants.len() as u32);
            combatants.push(CombatantState::from_hero(id, template));
        }
        for name in &encounter.enemies {
            let template = catalog.enemy(name)?;
            let id = CombatantId(combatants.len() as u32);
            combatants.push(CombatantState::from_enemy(id, template));
        }

        let turns = TurnQueueState::new(combatants.len(), config.clock_start);

        Ok(Self {
            phase: BattlePhase::Init,
            combatants,
            turns,
            attack: catalog.attack().clone(),
            seed,
            nonce: 0,
        })
    }

    /// The combatant whose turn is in progress, if the queue is primed.
    pub fn current_actor(&self) -> Option<&CombatantState> {
        self.turns.head().and_then(|id| self.combatants.get(id))
    }
}
