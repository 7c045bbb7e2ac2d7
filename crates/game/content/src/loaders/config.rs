//! Engine configuration loader.

use std::path::Path;

use effect_core::EffectConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to the [`EffectConfig`] defaults.
    pub fn load(path: &Path) -> LoadResult<EffectConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EffectConfig> {
        let config: EffectConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_active_effects == 0 {
            anyhow::bail!("max_active_effects must be at least 1");
        }
        if config.max_stacks == 0 {
            anyhow::bail!("max_stacks must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("max_stacks = 3\nhealing_modifier = 1.5\n")
            .expect("valid config");
        assert_eq!(config.max_stacks, 3);
        assert_eq!(config.healing_modifier, 1.5);
        assert_eq!(
            config.max_active_effects,
            EffectConfig::DEFAULT_MAX_ACTIVE_EFFECTS
        );
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(ConfigLoader::parse("max_stacks = 0").is_err());
        assert!(ConfigLoader::parse("max_active_effects = 0").is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "damage_tick_rate_ms = 250\n").expect("write config");

        let config = ConfigLoader::load(&path).expect("config loads");
        assert_eq!(config.damage_tick_rate_ms, 250);
        assert!(ConfigLoader::load(&dir.path().join("missing.toml")).is_err());
    }
}
