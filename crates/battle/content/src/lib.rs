//! Data-driven battle content and loaders.
//!
//! This crate reads the RON/TOML data files that define battles:
//! - effect, aura and ability definitions (RON)
//! - hero and enemy rosters (RON)
//! - encounters (RON)
//! - battle configuration (TOML)
//!
//! Loaders deserialize straight into battle-core spec types and hand them to
//! [`battle_core::Catalog::build`], so every name reference is resolved
//! before a battle can be constructed.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, AuraLoader, ConfigLoader, ContentFactory, EffectLoader, EncounterLoader,
    RosterLoader,
};
