//! Effect templates and immunity profiles.
//!
//! Templates are content, not state: an [`EffectCatalog`] turns a named
//! template into a fresh [`Effect`] every time it is spawned, and an
//! [`ImmunityProfile`] installs its rules on a manager.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use effect_core::{
    DamageType, DispelInfo, Effect, EffectConfig, EffectDuration, EffectError, EffectManager,
    EffectType, ImmunityData, ImmunityKind, Modifier,
};

/// Three-field duration as written in content files.
///
/// Sign conventions follow [`EffectDuration::from_components`]: a negative
/// component means permanent, all zero means instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DurationSpec {
    pub rounds: i64,
    pub turns: i64,
    pub real_time_ms: i64,
}

impl DurationSpec {
    pub fn to_duration(self) -> EffectDuration {
        EffectDuration::from_components(self.rounds, self.turns, self.real_time_ms)
    }
}

/// Named blueprint for an effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTemplate {
    pub name: String,
    pub effect_type: EffectType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: DurationSpec,
    /// Explicit tick interval. Damaging templates without one use the
    /// configured damage tick rate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_rate_ms: Option<u64>,
    pub magnitude: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: Option<DamageType>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<Modifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dispel: Option<DispelInfo>,
}

impl EffectTemplate {
    /// Builds a new effect instance starting at `now`.
    pub fn instantiate(&self, config: &EffectConfig, now: DateTime<Utc>) -> Effect {
        let mut effect =
            Effect::new(self.effect_type.clone(), self.duration.to_duration(), self.magnitude)
                .started_at(now);
        effect.damage_type = self.damage_type;
        effect.modifiers = self.modifiers.clone();
        effect.tags = self.tags.clone();

        if let Some(dispel) = &self.dispel {
            effect.dispel = dispel.clone();
        }

        match self.tick_rate_ms {
            Some(ms) => effect = effect.with_tick_rate(Duration::from_millis(ms)),
            None if self.damage_type.is_some() || self.effect_type.is_damaging() => {
                effect = effect.with_tick_rate(config.damage_tick_rate());
            }
            None => {}
        }
        effect
    }
}

/// Templates indexed by name, bound to the engine configuration.
#[derive(Clone, Debug, Default)]
pub struct EffectCatalog {
    templates: HashMap<String, EffectTemplate>,
    config: EffectConfig,
}

impl EffectCatalog {
    /// Later templates win on duplicate names.
    pub fn new(templates: impl IntoIterator<Item = EffectTemplate>, config: EffectConfig) -> Self {
        let templates = templates
            .into_iter()
            .map(|template| (template.name.clone(), template))
            .collect();
        Self { templates, config }
    }

    pub fn get(&self, name: &str) -> Option<&EffectTemplate> {
        self.templates.get(name)
    }

    /// Spawns a fresh effect from the named template.
    pub fn spawn(&self, name: &str, now: DateTime<Utc>) -> Option<Effect> {
        let effect = self.get(name)?.instantiate(&self.config, now);
        tracing::trace!("spawned {} from template '{}'", effect.id, name);
        Some(effect)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// One immunity rule as written in content files.
///
/// `kind` stays a string here so an unknown kind is reported through
/// [`ImmunityKind::parse`] rather than as an opaque parse failure.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImmunitySpec {
    pub effect_type: EffectType,
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistance: f64,
    /// Zero means permanent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration_ms: u64,
}

impl ImmunitySpec {
    pub fn to_data(&self) -> Result<ImmunityData, EffectError> {
        let data = match ImmunityKind::parse(&self.kind)? {
            ImmunityKind::None => ImmunityData::none(),
            ImmunityKind::Partial => ImmunityData::partial(self.resistance),
            ImmunityKind::Complete => ImmunityData::complete(),
            ImmunityKind::Reflect => ImmunityData::reflect(),
        };
        Ok(data.lasting(Duration::from_millis(self.duration_ms)))
    }
}

/// Named set of immunity rules, e.g. for an undead or construct archetype.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImmunityProfile {
    pub name: String,
    pub entries: Vec<ImmunitySpec>,
}

impl ImmunityProfile {
    /// Installs every rule on `manager`. Returns the number of rules added.
    ///
    /// All entries are validated first, so an unknown kind leaves the
    /// manager untouched.
    pub fn apply_to(&self, manager: &EffectManager) -> Result<usize, EffectError> {
        let rules = self
            .entries
            .iter()
            .map(|spec| Ok((spec.effect_type.clone(), spec.to_data()?)))
            .collect::<Result<Vec<_>, EffectError>>()?;

        let count = rules.len();
        for (effect_type, data) in rules {
            manager.add_immunity(effect_type, data);
        }
        tracing::debug!("applied immunity profile '{}' ({} rules)", self.name, count);
        Ok(count)
    }
}
