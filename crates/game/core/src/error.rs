//! Error infrastructure for effect-core.
//!
//! All engine operations report failures through [`EffectError`]. Errors are
//! local and descriptive; none of them is fatal to the process and the engine
//! never retries on its own. Re-applying the same effect is resolved by the
//! stacking/replacement policy, not by an error.

use crate::effect::EffectType;
use crate::ids::EffectId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - a rule of the game rejected the request.
    ///
    /// Examples: target immune, effect reflected
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: effect not found, active set full
    Validation,

    /// Internal error - a programming or content error.
    ///
    /// Examples: unknown immunity kind in content data
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for engine errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors returned by [`crate::EffectManager`] and the types it owns.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EffectError {
    /// No active effect carries the given identifier.
    #[error("effect {id} not found")]
    NotFound { id: EffectId },

    /// Complete immunity blocked the application.
    #[error("target is immune to {effect_type}")]
    Immune { effect_type: EffectType },

    /// Reflect immunity blocked the application.
    ///
    /// Bouncing the effect back to its source is the caller's job.
    #[error("{effect_type} was reflected")]
    Reflected { effect_type: EffectType },

    /// An immunity kind outside the known enumeration was encountered.
    #[error("unknown immunity kind: {0}")]
    UnknownImmunity(String),

    /// The active set already holds the configured maximum.
    #[error("active effect limit reached (max: {max})")]
    CapacityExceeded { max: usize },

    /// Source and target of a transfer are the same manager.
    #[error("cannot transfer an effect to the manager that owns it")]
    SameManager,
}

impl EngineError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        use EffectError::*;
        match self {
            Immune { .. } | Reflected { .. } => ErrorSeverity::Recoverable,
            NotFound { .. } | CapacityExceeded { .. } | SameManager => ErrorSeverity::Validation,
            UnknownImmunity(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use EffectError::*;
        match self {
            NotFound { .. } => "EFFECT_NOT_FOUND",
            Immune { .. } => "EFFECT_IMMUNE",
            Reflected { .. } => "EFFECT_REFLECTED",
            UnknownImmunity(_) => "EFFECT_UNKNOWN_IMMUNITY",
            CapacityExceeded { .. } => "EFFECT_CAPACITY_EXCEEDED",
            SameManager => "EFFECT_SAME_MANAGER",
        }
    }
}
