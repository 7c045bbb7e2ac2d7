//! Simulation client for the status-effect engine.
//!
//! The `effect-sim` binary is the composition root: it loads content through
//! `effect-content`, registers a party in an `effect-runtime` registry and
//! plays a scripted encounter. This library half keeps the pieces testable.
pub mod cli;
pub mod encounter;
pub mod logging;

pub use cli::Cli;
pub use encounter::{Encounter, EncounterSettings, EncounterSummary, ScriptStep};
