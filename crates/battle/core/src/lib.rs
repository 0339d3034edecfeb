//! Deterministic turn-based combat logic.
//!
//! `battle-core` defines the canonical battle rules: the definition catalog,
//! combatant state, the speed-clock turn scheduler, the resolution engine
//! and the battle phase machine. All state mutation flows through
//! [`engine::BattleEngine`]; everything else is plain data that callers
//! (content loaders, UIs, tools) read directly after each call.
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod rng;
pub mod state;
pub mod targeting;

pub use catalog::{
    ATTACK_ABILITY, AbilityDef, AbilitySchool, AbilitySpec, AuraDef, AuraSpec, Catalog,
    CatalogError, EffectDef, EnemySpec, EnemyTemplate, HeroSpec, HeroTemplate, StatKind,
    TargetingMode,
};
pub use config::BattleConfig;
pub use engine::{ActionChoice, ActionRequest, BattleEngine, BattleError, ResolutionFlags, TurnError};
pub use error::{CoreError, ErrorSeverity};
pub use policy::{BehaviourIndex, EnemyDecision};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use state::{
    Allegiance, AuraInstance, BattlePhase, BattleState, CombatantId, CombatantKind,
    CombatantState, CombatantTable, EncounterSpec, SetupError, TurnQueueState,
};
pub use targeting::{TargetingError, resolve_targets};
