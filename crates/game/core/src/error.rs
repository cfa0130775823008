//! Common error infrastructure for raid-core.
//!
//! This module provides shared types and traits used across all error types in raid-core.
//! Domain-specific errors (e.g., `ResourceError`, `BattleError`) are defined in their
//! respective modules alongside the operations they validate.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each subsystem has its own error type with specific variants
//! - **Validate, then mutate**: Any error returned by the engine means no state changed
//! - **Severity Classification**: Errors are categorized for recovery strategies

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller may retry with a different action (cooldown, mana)
/// - **Validation**: invalid input that should be rejected without retry
/// - **Closed**: the session is terminal; no action will ever succeed again
/// - **Internal**: unexpected state inconsistencies that require investigation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Closed,
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Closed => "closed",
            Self::Internal => "internal",
        }
    }
}

/// Common trait for all raid-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Stable across releases; used by callers for metrics and client messages.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
