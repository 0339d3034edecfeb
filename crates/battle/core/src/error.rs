//! Common error infrastructure for battle-core.
//!
//! This module provides the shared severity classification used across all
//! error types in the crate. Domain-specific errors (e.g. `CatalogError`,
//! `BattleError`) are defined in their respective modules alongside the
//! operations they validate.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each operation has its own error type with specific variants
//! - **No Retries**: Every operation succeeds deterministically given valid
//!   inputs, so a failure always indicates a caller or data bug and is
//!   reported, never masked
//! - **Severity Classification**: Errors are categorized for handling strategies

/// Severity level of an error, used for categorization and handling strategies.
///
/// The three failure families of the core map onto these levels:
/// - protocol errors (wrong turn, bad target list) are `Validation`
/// - malformed or missing definition data is `Data`
/// - broken internal invariants are `Internal` or `Fatal`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Validation error - invalid caller input, rejected before any mutation.
    ///
    /// Examples: acting out of turn, unknown ability name, no live targets
    Validation,

    /// Data error - malformed or missing definition data.
    ///
    /// Examples: unresolved effect reference, illegal resource generation
    Data,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: missing clock snapshot, queue desync.
    /// These indicate bugs and should be investigated.
    Internal,

    /// Fatal error - battle state corrupted, cannot continue.
    ///
    /// Examples: unresolvable scheduling tie, no live combatants to schedule
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Data => "data",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates an internal bug rather than a
    /// caller or content mistake.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on who is at fault (caller, content, core),
///   not impact
pub trait CoreError: std::fmt::Display + std::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// This is useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
