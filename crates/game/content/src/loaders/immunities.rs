//! Immunity profile loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::templates::ImmunityProfile;

/// Loader for immunity profiles from RON files.
pub struct ImmunityProfileLoader;

impl ImmunityProfileLoader {
    /// Load immunity profiles from a RON file.
    ///
    /// RON format: `Vec<ImmunityProfile>`. Every entry's kind is validated
    /// here so content errors surface at load time.
    pub fn load(path: &Path) -> LoadResult<Vec<ImmunityProfile>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ImmunityProfile>> {
        let profiles: Vec<ImmunityProfile> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse immunity profiles RON: {}", e))?;

        for profile in &profiles {
            for spec in &profile.entries {
                spec.to_data().map_err(|e| {
                    anyhow::anyhow!("Invalid immunity in profile '{}': {}", profile.name, e)
                })?;
            }
        }
        Ok(profiles)
    }
}
