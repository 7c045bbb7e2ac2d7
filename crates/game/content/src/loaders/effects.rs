//! Effect template loader.

use std::collections::HashSet;
use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::templates::EffectTemplate;

/// Loader for effect templates from RON files.
pub struct EffectTemplateLoader;

impl EffectTemplateLoader {
    /// Load effect templates from a RON file.
    ///
    /// RON format: `Vec<EffectTemplate>`. Template names must be unique.
    pub fn load(path: &Path) -> LoadResult<Vec<EffectTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EffectTemplate>> {
        let templates: Vec<EffectTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect templates RON: {}", e))?;

        let mut seen = HashSet::new();
        for template in &templates {
            if !seen.insert(template.name.as_str()) {
                anyhow::bail!("Duplicate effect template '{}'", template.name);
            }
            if !template.magnitude.is_finite() {
                anyhow::bail!(
                    "Effect template '{}' has a non-finite magnitude",
                    template.name
                );
            }
        }
        Ok(templates)
    }
}
