//! Status-effect engine shared by the content loaders, runtime and clients.
//!
//! `effect-core` owns the rules: how effects are applied, stacked, replaced,
//! resisted, dispelled, ticked and expired, and how their modifiers fold into
//! an entity's stats. All per-entity mutation flows through
//! [`manager::EffectManager`]; time comes from a [`clock::Clock`] so the same
//! logic runs against wall time or a scripted clock.
pub mod character;
pub mod clock;
pub mod config;
pub mod effect;
pub mod error;
pub mod ids;
pub mod immunity;
pub mod manager;
pub mod stats;

pub use character::{Attributes, Character};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EffectConfig;
pub use effect::{
    DamageType, DispelInfo, DispelType, Effect, EffectDuration, EffectSource, EffectType,
    SourceKind,
};
pub use error::{EffectError, EngineError, ErrorSeverity};
pub use ids::{EffectId, EntityId};
pub use immunity::{ImmunityData, ImmunityKind, ImmunityTable};
pub use manager::{ApplyOutcome, EffectManager, UpdateReport};
pub use stats::{Modifier, ModifierOp, StatKind, Stats, fold_modifiers};
