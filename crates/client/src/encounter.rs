//! Scripted encounter driven by the `effect-sim` binary.
//!
//! A fixed party is loaded with content from a data directory, an opening
//! script of casts, hand-overs and dispels is played, and the effects are then
//! driven forward either in simulated time or by the background runtime.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use effect_content::{ContentFactory, EffectCatalog};
use effect_core::{
    Attributes, Character, Clock, DispelType, EffectSource, EffectType, EntityId, ManualClock,
    SourceKind, Stats,
};
use effect_runtime::{
    EffectRuntime, EntityRegistry, FixedStepDriver, RuntimeConfig, RuntimeError, RuntimeEvent,
    StepReport,
};
use tokio::sync::broadcast;
use tracing::{info, warn};

pub const HERO: EntityId = EntityId::PLAYER;
pub const CLERIC: EntityId = EntityId(1);
pub const SKELETON: EntityId = EntityId(10);
pub const GOLEM: EntityId = EntityId(11);

#[derive(Clone, Debug)]
pub struct EncounterSettings {
    /// Time to drive after the opening script.
    pub duration: Duration,
    pub step: Duration,
    /// Length of one combat round.
    pub round: Duration,
}

impl Default for EncounterSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(8),
            step: Duration::from_millis(250),
            round: Duration::from_secs(2),
        }
    }
}

/// One line of the opening script and what the engine made of it.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptStep {
    pub action: String,
    pub outcome: String,
    pub applied: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntitySummary {
    pub id: EntityId,
    pub name: String,
    pub stats: Stats,
    pub effects: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EncounterSummary {
    pub steps: u64,
    pub entities: Vec<EntitySummary>,
    pub defeated: Vec<EntityId>,
}

impl EncounterSummary {
    pub fn entity(&self, id: EntityId) -> Option<&EntitySummary> {
        self.entities.iter().find(|e| e.id == id)
    }
}

pub struct Encounter {
    registry: Arc<EntityRegistry>,
    catalog: EffectCatalog,
    clock: Arc<ManualClock>,
}

impl Encounter {
    /// Loads content from `data_dir` and registers the party.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let factory = ContentFactory::new(data_dir);
        let catalog = factory
            .load_catalog()
            .context("Failed to load effect catalog")?;
        let profiles = factory
            .load_immunities()
            .context("Failed to load immunity profiles")?;

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let registry = Arc::new(EntityRegistry::new());

        let party = [
            (
                HERO,
                "Hero",
                Attributes {
                    armor: 5.0,
                    ..Attributes::default()
                },
                None,
            ),
            (
                CLERIC,
                "Cleric",
                Attributes {
                    wisdom: 16.0,
                    ..Attributes::default()
                },
                None,
            ),
            (
                SKELETON,
                "Skeleton",
                Attributes {
                    health: 40.0,
                    max_health: 40.0,
                    ..Attributes::default()
                },
                Some("undead"),
            ),
            (
                GOLEM,
                "Golem",
                Attributes {
                    health: 120.0,
                    max_health: 120.0,
                    armor: 10.0,
                    ..Attributes::default()
                },
                Some("construct"),
            ),
        ];

        for (id, name, attributes, profile) in party {
            let character = registry.insert(Character::with_clock(
                id,
                name,
                attributes,
                catalog.config().clone(),
                clock.clone(),
            ))?;

            if let Some(profile_name) = profile {
                let profile = profiles
                    .iter()
                    .find(|p| p.name == profile_name)
                    .with_context(|| format!("Immunity profile '{}' not found", profile_name))?;
                profile.apply_to(character.effect_manager())?;
            }
        }

        Ok(Self {
            registry,
            catalog,
            clock,
        })
    }

    pub fn registry(&self) -> &Arc<EntityRegistry> {
        &self.registry
    }

    /// Plays the opening script.
    pub fn opening(&self) -> Vec<ScriptStep> {
        vec![
            self.cast(SKELETON, HERO, "hex"),
            self.cast(HERO, HERO, "war_cry"),
            self.cast(HERO, HERO, "war_cry"),
            self.cast(HERO, SKELETON, "venom"),
            self.cast(HERO, SKELETON, "ignite"),
            self.cast(CLERIC, GOLEM, "stun_bolt"),
            self.cast(CLERIC, HERO, "regeneration"),
            self.cast(CLERIC, CLERIC, "stone_skin"),
            self.hand_over(CLERIC, HERO, "stone_skin"),
            self.cleanse(CLERIC, HERO, DispelType::Curse),
        ]
    }

    fn cast(&self, caster: EntityId, target: EntityId, template: &str) -> ScriptStep {
        let action = format!("{} casts {} on {}", caster, template, target);
        let result = match self.catalog.spawn(template, self.clock.now()) {
            Some(effect) => self
                .registry
                .apply_effect(
                    target,
                    effect.with_source(EffectSource::new(caster, SourceKind::Character)),
                )
                .map(|outcome| format!("{:?}", outcome)),
            None => Err(RuntimeError::UnknownTemplate(template.to_owned())),
        };
        Self::record(action, result)
    }

    fn hand_over(&self, from: EntityId, to: EntityId, effect_type: &str) -> ScriptStep {
        let action = format!("{} hands {} to {}", from, effect_type, to);
        let wanted = EffectType::from(effect_type);
        let result = self.registry.get(from).and_then(|giver| {
            match giver.get_effects().into_iter().find(|e| e.effect_type == wanted) {
                Some(effect) => self
                    .registry
                    .transfer_effect(from, to, effect.id)
                    .map(|outcome| format!("{:?}", outcome)),
                None => Ok("nothing to hand over".to_owned()),
            }
        });
        Self::record(action, result)
    }

    fn cleanse(&self, caster: EntityId, target: EntityId, dispel_type: DispelType) -> ScriptStep {
        let action = format!("{} dispels {} on {}", caster, dispel_type, target);
        let result = self.registry.get(target).map(|character| {
            let removed = character.effect_manager().dispel_effects(dispel_type, 1);
            format!("removed {} effect(s)", removed.len())
        });
        Self::record(action, result)
    }

    fn record(action: String, result: effect_runtime::Result<String>) -> ScriptStep {
        match result {
            Ok(outcome) => {
                info!("{}: {}", action, outcome);
                ScriptStep {
                    action,
                    outcome,
                    applied: true,
                }
            }
            Err(err) => {
                warn!("{}: {}", action, err);
                ScriptStep {
                    action,
                    outcome: err.to_string(),
                    applied: false,
                }
            }
        }
    }

    /// Drives the encounter in simulated time without waiting.
    pub fn run_simulated(&self, settings: &EncounterSettings) -> EncounterSummary {
        let mut driver = FixedStepDriver::new(settings.step, Arc::clone(&self.clock));
        let step = driver.step();
        let total_steps = steps_in(settings.duration, step);
        let steps_per_round = steps_in(settings.round, step).max(1);

        let mut defeated = Vec::new();
        let initial = driver.prime(&self.registry);
        self.note_defeats(&initial, &mut defeated);

        for _ in 0..total_steps {
            for report in driver.pump(&self.registry, step) {
                self.note_defeats(&report, &mut defeated);
                if report.step % steps_per_round == 0 {
                    self.registry.advance_round();
                }
            }
        }

        self.summary(driver.steps_taken(), defeated)
    }

    /// Drives the encounter with the background runtime in wall-clock time.
    pub async fn run_realtime(&self, settings: &EncounterSettings) -> Result<EncounterSummary> {
        let config = RuntimeConfig {
            step: settings.step,
            ..RuntimeConfig::default()
        };
        let runtime =
            EffectRuntime::start(config, Arc::clone(&self.registry), Arc::clone(&self.clock));
        let mut events = runtime.subscribe();

        let mut rounds = tokio::time::interval(settings.round);
        // The first tick completes immediately.
        rounds.tick().await;
        let deadline = tokio::time::sleep(settings.duration);
        tokio::pin!(deadline);

        let mut defeated = Vec::new();
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                _ = rounds.tick() => self.registry.advance_round(),
                event = events.recv() => match event {
                    Ok(RuntimeEvent::Defeated { entity, .. }) => defeated.push(entity),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Dropped {} runtime events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }

        let steps = runtime.shutdown().await?;
        Ok(self.summary(steps, defeated))
    }

    fn note_defeats(&self, report: &StepReport, defeated: &mut Vec<EntityId>) {
        for (entity, _) in &report.updates {
            let down = self
                .registry
                .get(*entity)
                .is_ok_and(|character| !character.is_alive());
            if down && !defeated.contains(entity) {
                info!("{} was defeated", entity);
                defeated.push(*entity);
            }
        }
    }

    fn summary(&self, steps: u64, defeated: Vec<EntityId>) -> EncounterSummary {
        let entities = self
            .registry
            .characters()
            .iter()
            .map(|character| EntitySummary {
                id: character.id,
                name: character.name.clone(),
                stats: character.get_stats(),
                effects: character
                    .get_effects()
                    .iter()
                    .map(|e| match e.stacks {
                        1 => e.effect_type.to_string(),
                        n => format!("{} x{}", e.effect_type, n),
                    })
                    .collect(),
            })
            .collect();

        EncounterSummary {
            steps,
            entities,
            defeated,
        }
    }
}

fn steps_in(span: Duration, step: Duration) -> u64 {
    u64::try_from(span.as_nanos() / step.as_nanos().max(1)).unwrap_or(u64::MAX)
}
