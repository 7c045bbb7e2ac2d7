//! Content loaders for reading effect data from files.
//!
//! This module provides loaders that convert RON/TOML files into the types
//! defined in [`crate::templates`] and the engine configuration.

pub mod config;
pub mod effects;
pub mod factory;
pub mod immunities;

pub use config::ConfigLoader;
pub use effects::EffectTemplateLoader;
pub use factory::ContentFactory;
pub use immunities::ImmunityProfileLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
