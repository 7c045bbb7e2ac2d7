//! Error types surfaced by the runtime API.
//!
//! Wraps engine rejections and worker coordination failures so clients can
//! bubble them up with consistent context.

use effect_core::{EffectError, EntityId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("entity {0} is not registered")]
    UnknownEntity(EntityId),

    #[error("entity {0} is already registered")]
    DuplicateEntity(EntityId),

    #[error("no effect template named '{0}'")]
    UnknownTemplate(String),

    #[error(transparent)]
    Effect(#[from] EffectError),

    #[error("effect driver join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// True when the engine refused the request by game rules.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Effect(EffectError::Immune { .. } | EffectError::Reflected { .. })
        )
    }
}
