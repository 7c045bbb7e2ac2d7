//! Runtime orchestration for the status-effect engine.
//!
//! This crate wires characters, content and a background driver task into a
//! runtime API. Consumers register characters in an [`EntityRegistry`],
//! start an [`EffectRuntime`] and subscribe to its [`RuntimeEvent`]s.
//!
//! Modules are organized by responsibility:
//! - [`registry`] holds live characters and cross-entity operations
//! - [`driver`] converts irregular wall-clock samples into fixed steps
//! - [`runtime`] hosts the tokio task and its event channel
pub mod driver;
pub mod error;
pub mod registry;
pub mod runtime;

pub use driver::{FixedStepDriver, StepReport};
pub use error::{Result, RuntimeError};
pub use registry::EntityRegistry;
pub use runtime::{EffectRuntime, RuntimeConfig, RuntimeEvent};
