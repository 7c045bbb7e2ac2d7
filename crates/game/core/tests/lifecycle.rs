use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use effect_core::{
    Attributes, Character, Clock, DamageType, DispelInfo, DispelType, Effect, EffectConfig,
    EffectDuration, EffectError, EffectType, EntityId, ImmunityData, ManualClock, Modifier,
    StatKind,
};

fn start() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(1)
}

/// Full encounter against one character:
/// 1. A poison and a fire damage-over-time are applied and tick down health
/// 2. A curse lowers armor and is later cleansed by a dispel
/// 3. A temporary stun immunity blocks a stun, then lapses
/// 4. Everything real-time expires and stats return to base (minus damage taken)
#[test]
fn test_encounter_lifecycle() {
    let clock = Arc::new(ManualClock::new(start()));
    let hero = Character::with_clock(
        EntityId::PLAYER,
        "Hero",
        Attributes {
            armor: 8.0,
            ..Attributes::default()
        },
        EffectConfig::default(),
        clock.clone(),
    );
    hero.effect_manager().set_resistance(DamageType::Fire, 0.5);

    // ================================================================
    // PHASE 1: damage over time
    // ================================================================
    hero.add_effect(
        Effect::damage(EffectType::Poison, DamageType::Poison, 3.0, EffectDuration::seconds(3))
            .started_at(start()),
    )
    .expect("poison applies");
    hero.add_effect(
        Effect::damage(EffectType::Burning, DamageType::Fire, 4.0, EffectDuration::seconds(2))
            .started_at(start()),
    )
    .expect("burning applies");

    // ================================================================
    // PHASE 2: curse
    // ================================================================
    let curse = Effect::with_dispel(
        EffectType::StatPenalty,
        EffectDuration::Permanent,
        1.0,
        DispelInfo::new(60, [DispelType::Curse]),
    )
    .with_modifier(Modifier::add(StatKind::Armor, -5.0))
    .started_at(start());
    hero.add_effect(curse).expect("curse applies");
    assert_eq!(hero.get_stats().armor, 3.0);

    // ================================================================
    // PHASE 3: temporary stun immunity
    // ================================================================
    hero.effect_manager().add_immunity(
        EffectType::Stun,
        ImmunityData::complete().lasting(Duration::from_secs(2)),
    );
    let stun = Effect::new(EffectType::Stun, EffectDuration::seconds(1), 1.0);
    assert!(matches!(
        hero.add_effect(stun.clone()),
        Err(EffectError::Immune { .. })
    ));

    // Step the world one second at a time.
    let manager = hero.effect_manager();
    for second in 0..=4 {
        let now = start() + TimeDelta::seconds(second);
        clock.set(now);
        manager.update_effects(now);
    }

    // An effect still ticks on the step it expires: poison at 0..=4 (5 × 3),
    // burning at 0..=3 (4 × 4 × 0.5).
    assert_eq!(hero.get_stats().health, 100.0 - 15.0 - 8.0);
    assert!(!hero.has_effect(&EffectType::Poison));
    assert!(!hero.has_effect(&EffectType::Burning));

    // Immunity lapsed after two seconds.
    hero.add_effect(stun.started_at(clock.now()))
        .expect("stun lands once immunity is gone");

    // ================================================================
    // PHASE 4: cleanse
    // ================================================================
    assert!(manager.dispel_effects(DispelType::Magic, 5).is_empty());
    assert_eq!(manager.dispel_effects(DispelType::Curse, 5).len(), 1);
    assert_eq!(hero.get_stats().armor, 8.0);
    assert!(hero.is_alive());
}

#[test]
fn test_transfer_between_characters() {
    let caster = Character::new(EntityId(1), "Caster", Attributes::default());
    let ally = Character::new(EntityId(2), "Ally", Attributes::default());

    let id = caster
        .add_effect(
            Effect::new(EffectType::StatBoost, EffectDuration::Permanent, 1.0)
                .with_modifier(Modifier::multiply(StatKind::Speed, 2.0)),
        )
        .expect("haste applies")
        .active_id();

    caster
        .effect_manager()
        .transfer_effect(ally.effect_manager(), id)
        .expect("transfer succeeds");

    assert_eq!(caster.get_stats().speed, 1.0);
    assert_eq!(ally.get_stats().speed, 2.0);
    assert!(ally.has_effect(&EffectType::StatBoost));
}
