//! Content factory for building catalogs from data files.

use std::path::{Path, PathBuf};

use effect_core::EffectConfig;

use crate::loaders::{ConfigLoader, EffectTemplateLoader, ImmunityProfileLoader, LoadResult};
use crate::templates::{EffectCatalog, EffectTemplate, ImmunityProfile};

/// Content factory that loads all effect content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── effects.ron
/// └── immunities.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EffectConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load effect templates from `effects.ron`.
    pub fn load_effects(&self) -> LoadResult<Vec<EffectTemplate>> {
        let path = self.data_dir.join("effects.ron");
        EffectTemplateLoader::load(&path)
    }

    /// Load immunity profiles from `immunities.ron`.
    pub fn load_immunities(&self) -> LoadResult<Vec<ImmunityProfile>> {
        let path = self.data_dir.join("immunities.ron");
        ImmunityProfileLoader::load(&path)
    }

    /// Load the configuration and effect templates as a ready catalog.
    pub fn load_catalog(&self) -> LoadResult<EffectCatalog> {
        let config = self.load_config()?;
        let templates = self.load_effects()?;
        tracing::info!(
            "loaded {} effect templates from {}",
            templates.len(),
            self.data_dir.display()
        );
        Ok(EffectCatalog::new(templates, config))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use effect_core::EffectType;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn test_load_catalog_from_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("config.toml"), "damage_tick_rate_ms = 2000\n")
            .expect("write config");
        std::fs::write(
            dir.path().join("effects.ron"),
            r#"[(name: "ignite", effect_type: "burning", duration: (real_time_ms: 4000), magnitude: 5.0, damage_type: Some(fire))]"#,
        )
        .expect("write effects");

        let factory = ContentFactory::new(dir.path());
        let catalog = factory.load_catalog().expect("catalog loads");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.config().damage_tick_rate_ms, 2_000);

        let effect = catalog.spawn("ignite", Utc::now()).expect("template exists");
        assert_eq!(effect.effect_type, EffectType::Burning);
        assert_eq!(
            effect.tick_rate.real_time(),
            Some(std::time::Duration::from_secs(2))
        );
    }

    #[test]
    fn test_missing_files_are_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        let factory = ContentFactory::new(dir.path());
        assert!(factory.load_config().is_err());
        assert!(factory.load_immunities().is_err());
    }
}
