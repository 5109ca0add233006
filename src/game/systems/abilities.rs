//! Signature abilities, one per boss
//!
//! Abilities run on their own timers, independent of the primary attack
//! clock. Every tick returns an [`AbilityOutcome`] describing what the
//! encounter must add (bullets, particles, screen effects, events); the only
//! state mutated directly is the boss, its ability record, the warning
//! markers and, for temporal freeze, the velocities of player bullets.

use hashbrown::HashMap;
use rand::Rng;
use tracing::debug;

use crate::game::constants::ability::*;
use crate::game::constants::particles::{FREEZE_BURST, HEAL_BURST, RAGE_BURST, SHIELD_BREAK_BURST, SHIELD_RING};
use crate::game::events::EncounterEvent;
use crate::game::state::{
    Boss, BossAbility, Bullet, BulletId, Particle, ParticleKind, ScreenEffectKind, WarningMarker,
};
use crate::game::systems::attacks::{self, AttackOrigin, AttackPattern};
use crate::game::systems::particles::{self, BurstStyle};
use crate::util::color::Color;
use crate::util::geometry::Vec2;

/// Screen effect requested by an ability; the encounter assigns the id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectRequest {
    pub kind: ScreenEffectKind,
    pub color: Color,
    pub duration_ms: f64,
}

/// Side effects of an ability tick
#[derive(Debug, Default)]
pub struct AbilityOutcome {
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    pub effects: Vec<EffectRequest>,
    pub events: Vec<EncounterEvent>,
}

impl AbilityOutcome {
    fn event(&mut self, event: EncounterEvent) {
        self.events.push(event);
    }
}

fn roll<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Start ability timers once the boss begins fighting
pub fn arm_timers<R: Rng + ?Sized>(boss: &mut Boss, now: f64, rng: &mut R) {
    match &mut boss.ability {
        BossAbility::Regeneration { next_heal_at } => {
            *next_heal_at = now + roll(rng, REGEN_COOLDOWN_MIN_MS, REGEN_COOLDOWN_MAX_MS);
        }
        BossAbility::WaterShield { .. } => {}
        BossAbility::MeteorShower { next_shower_at } => {
            *next_shower_at = now + roll(rng, METEOR_SHOWER_COOLDOWN_MIN_MS, METEOR_SHOWER_COOLDOWN_MAX_MS);
        }
        BossAbility::RageMode { next_rage_at, .. } => {
            *next_rage_at = now + RAGE_FIRST_TRIGGER_MS;
        }
        BossAbility::TemporalFreeze { next_freeze_at, .. } => {
            *next_freeze_at = now + roll(rng, FREEZE_COOLDOWN_MIN_MS, FREEZE_COOLDOWN_MAX_MS);
        }
    }
}

/// Advance the boss's ability timers
pub fn update<R: Rng + ?Sized>(
    boss: &mut Boss,
    origin: &AttackOrigin,
    player_bullets: &mut [Bullet],
    warnings: &mut Vec<WarningMarker>,
    rng: &mut R,
) -> AbilityOutcome {
    let mut out = AbilityOutcome::default();
    let now = origin.now;

    match &boss.ability {
        BossAbility::Regeneration { .. } => regenerate(boss, now, rng, &mut out),
        BossAbility::WaterShield { .. } => recharge_shield(boss, now, rng, &mut out),
        BossAbility::MeteorShower { .. } => meteor_shower(boss, origin, warnings, rng, &mut out),
        BossAbility::RageMode { .. } => rage(boss, now, rng, &mut out),
        BossAbility::TemporalFreeze { .. } => temporal_freeze(boss, now, player_bullets, rng, &mut out),
    }

    out
}

fn regenerate<R: Rng + ?Sized>(boss: &mut Boss, now: f64, rng: &mut R, out: &mut AbilityOutcome) {
    let BossAbility::Regeneration { next_heal_at } = &mut boss.ability else {
        return;
    };
    if now < *next_heal_at {
        return;
    }
    *next_heal_at = now + roll(rng, REGEN_COOLDOWN_MIN_MS, REGEN_COOLDOWN_MAX_MS);

    let amount = (boss.max_hp as f32 * REGEN_FRACTION).ceil() as u32;
    let healed = boss.max_hp.min(boss.current_hp + amount) - boss.current_hp;
    if healed == 0 {
        return;
    }
    boss.current_hp += healed;
    debug!(boss = boss.boss_number, healed, hp = boss.current_hp, "Boss regenerated");

    let center = boss.rect().center();
    let style = BurstStyle::new(ParticleKind::Heal, Color::GREEN)
        .speed(0.5, 2.0)
        .life(30.0, 50.0);
    out.particles.extend(particles::burst(rng, center, HEAL_BURST, style));
    out.event(EncounterEvent::AbilityTriggered { ability: "regeneration" });
}

fn recharge_shield<R: Rng + ?Sized>(boss: &mut Boss, now: f64, rng: &mut R, out: &mut AbilityOutcome) {
    let BossAbility::WaterShield { shield_hp, max_shield_hp, broken_at } = &mut boss.ability else {
        return;
    };
    let Some(broken) = *broken_at else {
        return;
    };
    if now - broken < SHIELD_RECHARGE_MS {
        return;
    }
    *shield_hp = *max_shield_hp;
    *broken_at = None;
    debug!(boss = boss.boss_number, "Water shield recharged");

    let center = boss.rect().center();
    let radius = boss.width.max(boss.height) * 0.6;
    let style = BurstStyle::new(ParticleKind::Shield, Color::CYAN).speed(0.3, 1.0);
    out.particles.extend(particles::ring(rng, center, SHIELD_RING, radius, style));
    out.event(EncounterEvent::AbilityTriggered { ability: "water_shield" });
}

/// Result of routing a hit through the water shield
#[derive(Debug)]
pub enum ShieldHit {
    /// No shield or shield down; damage goes to HP
    Unshielded,
    /// Shield took the hit
    Absorbed { remaining: u32 },
    /// Shield took the hit and broke, retaliating
    Broken(AbilityOutcome),
}

/// Let the water shield absorb one hit, if it is up
pub fn absorb_hit<R: Rng + ?Sized>(boss: &mut Boss, origin: &AttackOrigin, rng: &mut R) -> ShieldHit {
    let BossAbility::WaterShield { shield_hp, broken_at, .. } = &mut boss.ability else {
        return ShieldHit::Unshielded;
    };
    if *shield_hp == 0 {
        return ShieldHit::Unshielded;
    }
    *shield_hp -= 1;
    if *shield_hp > 0 {
        return ShieldHit::Absorbed { remaining: *shield_hp };
    }

    *broken_at = Some(origin.now);
    debug!(boss = boss.boss_number, "Water shield broken");

    let mut out = AbilityOutcome::default();
    let style = BurstStyle::new(ParticleKind::Shield, Color::CYAN)
        .speed(2.0, 6.0)
        .life(20.0, 40.0);
    out.particles
        .extend(particles::burst(rng, boss.rect().center(), SHIELD_BREAK_BURST, style));
    let volley = attacks::fire(AttackPattern::ShieldBreak, origin, rng);
    out.bullets.extend(volley.bullets);
    out.event(EncounterEvent::ShieldBroken);
    ShieldHit::Broken(out)
}

fn meteor_shower<R: Rng + ?Sized>(
    boss: &mut Boss,
    origin: &AttackOrigin,
    warnings: &mut Vec<WarningMarker>,
    rng: &mut R,
    out: &mut AbilityOutcome,
) {
    let BossAbility::MeteorShower { next_shower_at } = &mut boss.ability else {
        return;
    };
    let now = origin.now;
    if now < *next_shower_at {
        return;
    }
    *next_shower_at = now + roll(rng, METEOR_SHOWER_COOLDOWN_MIN_MS, METEOR_SHOWER_COOLDOWN_MAX_MS);

    let count = rng.gen_range(METEOR_SHOWER_MIN_COUNT..=METEOR_SHOWER_MAX_COUNT);
    let screen = origin.screen;
    let y = screen.bottom() - METEOR_WARNING_OFFSET;
    warnings.extend((0..count).map(|_| WarningMarker {
        x: rng.gen_range(screen.x..screen.right()),
        y,
        created_at: now,
        countdown_ms: METEOR_WARNING_MS,
    }));
    debug!(boss = boss.boss_number, count, "Meteor shower incoming");
    out.event(EncounterEvent::AbilityTriggered { ability: "meteor_shower" });
}

/// Drop a meteor for every warning marker whose countdown has elapsed
pub fn drop_due_meteors(warnings: &mut Vec<WarningMarker>, origin: &AttackOrigin) -> Vec<Bullet> {
    let now = origin.now;
    let mut meteors = Vec::new();
    warnings.retain(|marker| {
        if marker.is_due(now) {
            meteors.push(attacks::shower_meteor(origin, marker.x, METEOR_SHOWER_SPEED_FACTOR));
            false
        } else {
            true
        }
    });
    meteors
}

fn rage<R: Rng + ?Sized>(boss: &mut Boss, now: f64, rng: &mut R, out: &mut AbilityOutcome) {
    let BossAbility::RageMode { active, ends_at, next_rage_at } = &mut boss.ability else {
        return;
    };

    if *active {
        if now < *ends_at {
            return;
        }
        *active = false;
        *next_rage_at = now + roll(rng, RAGE_COOLDOWN_MIN_MS, RAGE_COOLDOWN_MAX_MS);
        boss.speed = boss.base_speed;
        debug!(boss = boss.boss_number, "Rage ended");
        out.event(EncounterEvent::AbilityEnded { ability: "rage_mode" });
        return;
    }

    if now < *next_rage_at {
        return;
    }
    let duration = roll(rng, RAGE_DURATION_MIN_MS, RAGE_DURATION_MAX_MS);
    *active = true;
    *ends_at = now + duration;
    boss.speed = boss.base_speed * RAGE_MULTIPLIER;
    // Rage shrugs off any slowdown in effect
    boss.slow_until = 0.0;
    boss.slow_factor = 1.0;
    debug!(boss = boss.boss_number, duration_ms = duration, "Rage started");

    let style = BurstStyle::new(ParticleKind::Rage, Color::RED)
        .speed(2.0, 5.0)
        .size(3.0, 6.0);
    out.particles
        .extend(particles::burst(rng, boss.rect().center(), RAGE_BURST, style));
    out.effects.push(EffectRequest {
        kind: ScreenEffectKind::Rage,
        color: Color::RED,
        duration_ms: duration,
    });
    out.event(EncounterEvent::AbilityTriggered { ability: "rage_mode" });
}

fn temporal_freeze<R: Rng + ?Sized>(
    boss: &mut Boss,
    now: f64,
    player_bullets: &mut [Bullet],
    rng: &mut R,
    out: &mut AbilityOutcome,
) {
    let center = boss.rect().center();
    let BossAbility::TemporalFreeze { active, ends_at, next_freeze_at, frozen } = &mut boss.ability else {
        return;
    };

    if *active {
        if now < *ends_at {
            // Host may have touched velocities; keep captured bullets pinned
            for bullet in player_bullets.iter_mut().filter(|b| frozen.contains_key(&b.id)) {
                bullet.set_velocity(Vec2::ZERO);
            }
            return;
        }
        thaw(frozen, player_bullets);
        *active = false;
        *next_freeze_at = now + roll(rng, FREEZE_COOLDOWN_MIN_MS, FREEZE_COOLDOWN_MAX_MS);
        debug!("Temporal freeze ended");
        out.event(EncounterEvent::AbilityEnded { ability: "temporal_freeze" });
        return;
    }

    if now < *next_freeze_at {
        return;
    }
    if player_bullets.is_empty() {
        *next_freeze_at = now + FREEZE_RETRY_MS;
        return;
    }

    for bullet in player_bullets.iter_mut() {
        frozen.entry(bullet.id).or_insert_with(|| bullet.velocity());
        bullet.set_velocity(Vec2::ZERO);
    }
    *active = true;
    *ends_at = now + FREEZE_DURATION_MS;
    debug!(captured = frozen.len(), "Temporal freeze started");

    let style = BurstStyle::new(ParticleKind::Freeze, Color::PURPLE)
        .speed(1.0, 3.0)
        .life(30.0, 50.0);
    out.particles.extend(particles::burst(rng, center, FREEZE_BURST, style));
    out.effects.push(EffectRequest {
        kind: ScreenEffectKind::TemporalFreeze,
        color: Color::PURPLE,
        duration_ms: FREEZE_DURATION_MS,
    });
    out.event(EncounterEvent::AbilityTriggered { ability: "temporal_freeze" });
}

/// Restore captured velocities and forget every capture
pub fn thaw(frozen: &mut HashMap<BulletId, Vec2>, player_bullets: &mut [Bullet]) {
    for bullet in player_bullets.iter_mut() {
        if let Some(velocity) = frozen.get(&bullet.id) {
            bullet.set_velocity(*velocity);
        }
    }
    frozen.clear();
}

/// Pull any outstanding freeze captures out of the boss, ending the freeze.
/// Used when the boss dies or the encounter resets mid-freeze.
pub fn take_frozen(boss: &mut Boss) -> HashMap<BulletId, Vec2> {
    match &mut boss.ability {
        BossAbility::TemporalFreeze { active, frozen, .. } => {
            *active = false;
            std::mem::take(frozen)
        }
        _ => HashMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::tests::test_boss;
    use crate::game::state::BulletKind;
    use crate::util::geometry::Rect;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn origin_at(boss: &Boss, now: f64) -> AttackOrigin {
        AttackOrigin {
            center_x: boss.center_x(),
            feet_y: boss.feet_y(),
            boss_width: boss.width,
            color: boss.color,
            phase: boss.current_phase,
            bullet_speed: 4.0,
            bullet_size: (8.0, 16.0),
            speed_multiplier: boss.ability.rage_multiplier(),
            multi_shot_count: 3,
            multi_shot_spread_deg: 30.0,
            now,
            screen: Rect::new(0.0, 0.0, 800.0, 600.0),
        }
    }

    fn tick(boss: &mut Boss, now: f64, bullets: &mut [Bullet], warnings: &mut Vec<WarningMarker>, rng: &mut StdRng) -> AbilityOutcome {
        let origin = origin_at(boss, now);
        update(boss, &origin, bullets, warnings, rng)
    }

    #[test]
    fn test_unarmed_abilities_do_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        for n in 1..=5 {
            let mut boss = test_boss(n, 100, 2);
            boss.current_hp = 10;
            let out = tick(&mut boss, 1e9, &mut [], &mut Vec::new(), &mut rng);
            assert!(out.events.is_empty(), "boss {n}");
            assert_eq!(boss.current_hp, 10);
        }
    }

    #[test]
    fn test_regeneration_heals_ten_percent_capped() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut boss = test_boss(1, 50, 2);
        boss.current_hp = 20;
        arm_timers(&mut boss, 0.0, &mut rng);
        let BossAbility::Regeneration { next_heal_at } = boss.ability else { panic!() };
        assert!((REGEN_COOLDOWN_MIN_MS..REGEN_COOLDOWN_MAX_MS).contains(&next_heal_at));

        let out = tick(&mut boss, next_heal_at - 1.0, &mut [], &mut Vec::new(), &mut rng);
        assert!(out.events.is_empty());
        let out = tick(&mut boss, next_heal_at, &mut [], &mut Vec::new(), &mut rng);
        assert_eq!(boss.current_hp, 25);
        assert_eq!(out.particles.len(), HEAL_BURST);

        boss.current_hp = 48;
        let BossAbility::Regeneration { next_heal_at } = boss.ability else { panic!() };
        tick(&mut boss, next_heal_at, &mut [], &mut Vec::new(), &mut rng);
        assert_eq!(boss.current_hp, 50);
    }

    #[test]
    fn test_regeneration_never_lowers_phase() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut boss = test_boss(1, 50, 2);
        boss.current_hp = 20;
        boss.current_phase = 2;
        arm_timers(&mut boss, 0.0, &mut rng);
        tick(&mut boss, 1e6, &mut [], &mut Vec::new(), &mut rng);
        assert_eq!(boss.current_hp, 25);
        assert_eq!(boss.current_phase, 2);
    }

    #[test]
    fn test_shield_absorbs_then_breaks_and_recharges() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut boss = test_boss(2, 75, 2);
        let origin = origin_at(&boss, 1000.0);
        for expected in (1..5).rev() {
            match absorb_hit(&mut boss, &origin, &mut rng) {
                ShieldHit::Absorbed { remaining } => assert_eq!(remaining, expected),
                other => panic!("expected absorb, got {:?}", other),
            }
        }
        match absorb_hit(&mut boss, &origin, &mut rng) {
            ShieldHit::Broken(out) => {
                assert_eq!(out.events, vec![EncounterEvent::ShieldBroken]);
                assert!(!out.bullets.is_empty());
                assert!(out.bullets.iter().all(|b| b.kind == BulletKind::ShieldBreak));
            }
            other => panic!("expected break, got {:?}", other),
        }
        assert!(matches!(absorb_hit(&mut boss, &origin, &mut rng), ShieldHit::Unshielded));

        tick(&mut boss, 1000.0 + SHIELD_RECHARGE_MS - 1.0, &mut [], &mut Vec::new(), &mut rng);
        assert_eq!(boss.ability.shield_hp(), Some(0));
        let out = tick(&mut boss, 1000.0 + SHIELD_RECHARGE_MS, &mut [], &mut Vec::new(), &mut rng);
        assert_eq!(boss.ability.shield_hp(), Some(5));
        assert_eq!(out.particles.len(), SHIELD_RING);
    }

    #[test]
    fn test_non_shield_boss_is_unshielded() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut boss = test_boss(1, 50, 2);
        let origin = origin_at(&boss, 0.0);
        assert!(matches!(absorb_hit(&mut boss, &origin, &mut rng), ShieldHit::Unshielded));
    }

    #[test]
    fn test_meteor_shower_markers_then_meteors() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut boss = test_boss(3, 100, 3);
        arm_timers(&mut boss, 0.0, &mut rng);
        let BossAbility::MeteorShower { next_shower_at } = boss.ability else { panic!() };

        let mut warnings = Vec::new();
        tick(&mut boss, next_shower_at, &mut [], &mut warnings, &mut rng);
        assert!((METEOR_SHOWER_MIN_COUNT..=METEOR_SHOWER_MAX_COUNT).contains(&warnings.len()));
        let count = warnings.len();
        for w in &warnings {
            assert_eq!(w.y, 600.0 - METEOR_WARNING_OFFSET);
            assert!(w.x >= 0.0 && w.x < 800.0);
        }

        let early = origin_at(&boss, next_shower_at + METEOR_WARNING_MS - 1.0);
        assert!(drop_due_meteors(&mut warnings, &early).is_empty());
        let due = origin_at(&boss, next_shower_at + METEOR_WARNING_MS);
        let meteors = drop_due_meteors(&mut warnings, &due);
        assert_eq!(meteors.len(), count);
        assert!(warnings.is_empty());
        for m in &meteors {
            assert_eq!(m.kind, BulletKind::Meteor);
            assert!(m.y < 0.0);
            assert!((m.vy - 4.0 * METEOR_SHOWER_SPEED_FACTOR).abs() < 1e-5);
        }
    }

    #[test]
    fn test_rage_speed_reverts_exactly() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut boss = test_boss(4, 100, 3);
        boss.base_speed = 2.3;
        boss.speed = 2.3;
        arm_timers(&mut boss, 0.0, &mut rng);

        tick(&mut boss, RAGE_FIRST_TRIGGER_MS - 1.0, &mut [], &mut Vec::new(), &mut rng);
        assert!(!boss.ability.is_raging());

        let out = tick(&mut boss, RAGE_FIRST_TRIGGER_MS, &mut [], &mut Vec::new(), &mut rng);
        assert!(boss.ability.is_raging());
        assert_eq!(boss.speed, 2.3 * RAGE_MULTIPLIER);
        assert_eq!(out.effects[0].kind, ScreenEffectKind::Rage);

        let BossAbility::RageMode { ends_at, .. } = boss.ability else { panic!() };
        let duration = ends_at - RAGE_FIRST_TRIGGER_MS;
        assert!((RAGE_DURATION_MIN_MS..RAGE_DURATION_MAX_MS).contains(&duration));

        let out = tick(&mut boss, ends_at, &mut [], &mut Vec::new(), &mut rng);
        assert!(!boss.ability.is_raging());
        assert_eq!(boss.speed, 2.3);
        assert_eq!(out.events, vec![EncounterEvent::AbilityEnded { ability: "rage_mode" }]);

        let BossAbility::RageMode { next_rage_at, .. } = boss.ability else { panic!() };
        let cooldown = next_rage_at - ends_at;
        assert!((RAGE_COOLDOWN_MIN_MS..RAGE_COOLDOWN_MAX_MS).contains(&cooldown));
    }

    #[test]
    fn test_rage_clears_slowdown() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut boss = test_boss(4, 100, 3);
        boss.slow_factor = 0.5;
        boss.slow_until = 1e9;
        arm_timers(&mut boss, 0.0, &mut rng);
        tick(&mut boss, RAGE_FIRST_TRIGGER_MS, &mut [], &mut Vec::new(), &mut rng);
        assert_eq!(boss.slow_multiplier(RAGE_FIRST_TRIGGER_MS + 1.0), 1.0);
    }

    #[test]
    fn test_freeze_retries_without_bullets() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut boss = test_boss(5, 100, 3);
        arm_timers(&mut boss, 0.0, &mut rng);
        let BossAbility::TemporalFreeze { next_freeze_at, .. } = boss.ability else { panic!() };
        tick(&mut boss, next_freeze_at, &mut [], &mut Vec::new(), &mut rng);
        let BossAbility::TemporalFreeze { active, next_freeze_at: retry, .. } = &boss.ability else { panic!() };
        assert!(!active);
        assert_eq!(*retry, next_freeze_at + FREEZE_RETRY_MS);
    }

    #[test]
    fn test_freeze_captures_and_restores_without_drift() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut boss = test_boss(5, 100, 3);
        arm_timers(&mut boss, 0.0, &mut rng);
        let BossAbility::TemporalFreeze { next_freeze_at, .. } = boss.ability else { panic!() };

        let mut bullets = vec![
            Bullet::player(1, 100.0, 500.0, 0.0, -7.0),
            Bullet::player(2, 200.0, 500.0, 0.5, -6.0),
        ];
        let out = tick(&mut boss, next_freeze_at, &mut bullets, &mut Vec::new(), &mut rng);
        assert_eq!(out.effects[0].kind, ScreenEffectKind::TemporalFreeze);
        assert_eq!(out.effects[0].color, Color::PURPLE);
        assert!(bullets.iter().all(|b| b.velocity().is_zero()));

        // A bullet fired during the freeze is untouched
        bullets.push(Bullet::player(3, 300.0, 500.0, 0.0, -7.0));
        for step in 1..10 {
            tick(&mut boss, next_freeze_at + step as f64 * 100.0, &mut bullets, &mut Vec::new(), &mut rng);
        }
        assert_eq!(bullets[2].vy, -7.0);
        assert!(bullets[0].velocity().is_zero());

        tick(&mut boss, next_freeze_at + FREEZE_DURATION_MS, &mut bullets, &mut Vec::new(), &mut rng);
        assert_eq!(bullets[0].velocity(), Vec2::new(0.0, -7.0));
        assert_eq!(bullets[1].velocity(), Vec2::new(0.5, -6.0));
        assert_eq!(bullets[2].velocity(), Vec2::new(0.0, -7.0));
        let BossAbility::TemporalFreeze { active, frozen, .. } = &boss.ability else { panic!() };
        assert!(!active);
        assert!(frozen.is_empty());
    }

    #[test]
    fn test_repeated_freeze_cycles_restore_original_velocity() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut boss = test_boss(5, 100, 3);
        arm_timers(&mut boss, 0.0, &mut rng);
        let mut bullets = vec![Bullet::player(1, 100.0, 500.0, 0.0, 8.0)];

        for cycle in 0..4 {
            let BossAbility::TemporalFreeze { next_freeze_at, .. } = boss.ability else { panic!() };
            tick(&mut boss, next_freeze_at, &mut bullets, &mut Vec::new(), &mut rng);
            assert!(bullets[0].velocity().is_zero(), "cycle {cycle} did not freeze");

            tick(&mut boss, next_freeze_at + FREEZE_DURATION_MS, &mut bullets, &mut Vec::new(), &mut rng);
            assert_eq!(bullets[0].velocity(), Vec2::new(0.0, 8.0), "cycle {cycle} drifted");
            let BossAbility::TemporalFreeze { active, frozen, .. } = &boss.ability else { panic!() };
            assert!(!active);
            assert!(frozen.is_empty());
        }
    }

    #[test]
    fn test_take_frozen_ends_freeze() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut boss = test_boss(5, 100, 3);
        arm_timers(&mut boss, 0.0, &mut rng);
        let BossAbility::TemporalFreeze { next_freeze_at, .. } = boss.ability else { panic!() };
        let mut bullets = vec![Bullet::player(9, 100.0, 500.0, 0.0, -7.0)];
        tick(&mut boss, next_freeze_at, &mut bullets, &mut Vec::new(), &mut rng);

        let mut frozen = take_frozen(&mut boss);
        assert_eq!(frozen.len(), 1);
        thaw(&mut frozen, &mut bullets);
        assert_eq!(bullets[0].vy, -7.0);
        assert!(!matches!(boss.ability, BossAbility::TemporalFreeze { active: true, .. }));
    }
}
