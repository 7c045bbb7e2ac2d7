//! Data-driven content definitions and loaders.
//!
//! This crate houses effect content and provides loaders for RON/TOML data files:
//! - Effect templates (data-driven via RON)
//! - Immunity profiles (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//!
//! Content is turned into engine values on demand and never appears in manager state.

pub mod templates;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use templates::{
    DurationSpec, EffectCatalog, EffectTemplate, ImmunityProfile, ImmunitySpec,
};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EffectTemplateLoader, ImmunityProfileLoader, LoadResult,
};
