//! Boss encounter engine
//!
//! [`BossEncounter`] owns the live boss, every boss bullet, particle,
//! warning marker and screen effect, plus the deferred action queue. Hosts
//! drive it with [`BossEncounter::update`] once per frame, then resolve
//! collisions, then render from [`BossEncounter::snapshot`].
//!
//! Time is an encounter clock in milliseconds advanced by
//! `delta_time * FRAME_MS`, so fights are deterministic for a given seed.

use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::BossConfig;
use crate::game::constants::boss::*;
use crate::game::constants::effects::FLASH_MS;
use crate::game::constants::particles::{DEATH_BURST, FINAL_EXPLOSION, HIT_BURST, LANDING_BURST, PHASE_RING};
use crate::game::constants::timing::{FRAME_MS, MAX_DELTA};
use crate::game::events::EncounterEvent;
use crate::game::state::{
    Boss, BossAbility, BossState, BossStatus, Bullet, BulletId, Particle, ParticleKind, ScreenEffect,
    ScreenEffectKind, WarningMarker,
};
use crate::game::systems::abilities::{self, AbilityOutcome, ShieldHit};
use crate::game::systems::attacks::{self, AttackOrigin, AttackPattern};
use crate::game::systems::collision::{self, BossCollisionReport};
use crate::game::systems::particles::{self, BurstStyle};
use crate::game::systems::projectiles;
use crate::game::systems::scheduler::{DeferredKind, DeferredQueue};
use crate::util::color::Color;
use crate::util::geometry::{Rect, Vec2};

/// Read-only view of everything the renderer draws
#[derive(Debug, Clone, Copy)]
pub struct RenderSnapshot<'a> {
    pub boss: Option<&'a Boss>,
    pub boss_bullets: &'a [Bullet],
    pub particles: &'a [Particle],
    pub warnings: &'a [WarningMarker],
    pub screen_effects: &'a [ScreenEffect],
    pub now: f64,
    pub screen: Rect,
}

/// Everything in the encounter except the boss itself, so systems can
/// borrow the boss and the field independently.
#[derive(Debug)]
struct Battlefield {
    now: f64,
    screen: Rect,
    rng: StdRng,
    /// Generation of the current (or most recent) boss
    generation: u64,
    boss_bullets: Vec<Bullet>,
    particles: Vec<Particle>,
    warnings: Vec<WarningMarker>,
    screen_effects: Vec<ScreenEffect>,
    deferred: DeferredQueue,
    events: Vec<EncounterEvent>,
    next_bullet_id: BulletId,
    next_effect_id: u64,
    /// Freeze captures left behind by a boss that died or was reset
    thaw_pending: HashMap<BulletId, Vec2>,
}

impl Battlefield {
    fn add_boss_bullet(&mut self, mut bullet: Bullet) {
        self.next_bullet_id += 1;
        bullet.id = self.next_bullet_id;
        self.boss_bullets.push(bullet);
    }

    /// Queue an event for the host, dropping the oldest once the buffer is full
    fn emit(&mut self, event: EncounterEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    fn add_particles(&mut self, new: Vec<Particle>) {
        particles::push_capped(&mut self.particles, new);
    }

    fn add_effect(&mut self, kind: ScreenEffectKind, color: Color, duration_ms: f64) {
        self.next_effect_id += 1;
        self.screen_effects.push(ScreenEffect {
            id: self.next_effect_id,
            kind,
            color,
            started_at: self.now,
            duration_ms,
        });
    }

    fn apply(&mut self, outcome: AbilityOutcome) {
        for bullet in outcome.bullets {
            self.add_boss_bullet(bullet);
        }
        self.add_particles(outcome.particles);
        for effect in outcome.effects {
            self.add_effect(effect.kind, effect.color, effect.duration_ms);
        }
        for event in outcome.events {
            self.emit(event);
        }
    }

    fn burst(&mut self, center: Vec2, count: usize, style: BurstStyle) {
        let new = particles::burst(&mut self.rng, center, count, style);
        self.add_particles(new);
    }

    fn roll_shot_delay(&mut self, config: &BossConfig, boss_number: u8) -> f64 {
        let (min, max) = config.shot_delay_range(boss_number);
        if max > min {
            self.rng.gen_range(min..=max)
        } else {
            min
        }
    }

    /// Fire a pattern from the boss's current position
    fn launch(&mut self, boss: &mut Boss, pattern: AttackPattern, config: &BossConfig) {
        let origin = AttackOrigin::from_boss(boss, config, self.screen, self.now);
        let volley = attacks::fire(pattern, &origin, &mut self.rng);
        let fired = volley.bullet_count();

        if let Some(new_left) = volley.teleport_to {
            boss.x = new_left;
        }
        for bullet in volley.bullets {
            self.add_boss_bullet(bullet);
        }
        for (delay, bullet) in volley.delayed_bullets {
            self.deferred
                .schedule(self.now + delay, boss.generation, DeferredKind::SpawnBullet(bullet));
        }
        for (delay, follow_up) in volley.follow_ups {
            self.deferred
                .schedule(self.now + delay, boss.generation, DeferredKind::Attack(follow_up));
        }
        self.add_particles(volley.particles);

        debug!(boss = boss.boss_number, pattern = pattern.name(), bullets = fired, "Boss attack");
        self.emit(EncounterEvent::AttackFired {
            pattern: pattern.name(),
            bullets: fired,
        });
    }

    fn engage(&mut self, boss: &mut Boss, config: &BossConfig) {
        boss.y = boss.base_y;
        boss.scale = 1.0;
        boss.alpha = 1.0;
        boss.state = BossState::Fighting;
        boss.engaged_at = self.now;
        boss.last_shot_time = self.now;
        boss.last_secondary_time = self.now;
        abilities::arm_timers(boss, self.now, &mut self.rng);
        boss.next_shot_delay = self.roll_shot_delay(config, boss.boss_number);

        let style = BurstStyle::new(ParticleKind::Landing, boss.color).speed(1.0, 3.0);
        self.burst(Vec2::new(boss.center_x(), boss.feet_y()), LANDING_BURST, style);
        info!(boss = boss.boss_number, name = boss.name, "Boss engaged");
        self.emit(EncounterEvent::BossEngaged { boss_number: boss.boss_number });
    }

    fn enter_phase(&mut self, boss: &mut Boss, phase: u8) {
        boss.current_phase = phase;
        boss.state = BossState::PhaseTransition;
        boss.phase_transition_start = self.now;

        let center = boss.rect().center();
        let radius = boss.width.max(boss.height) * 0.5;
        let style = BurstStyle::new(ParticleKind::Phase, boss.color)
            .speed(2.0, 4.0)
            .life(30.0, 45.0);
        let ring = particles::ring(&mut self.rng, center, PHASE_RING, radius, style);
        self.add_particles(ring);
        self.add_effect(ScreenEffectKind::PhaseShift, boss.color, PHASE_TRANSITION_MS);

        info!(boss = boss.boss_number, phase, hp = boss.current_hp, "Boss phase changed");
        self.emit(EncounterEvent::PhaseChanged {
            boss_number: boss.boss_number,
            phase,
        });
    }

    fn begin_dying(&mut self, boss: &mut Boss, score: u32) {
        boss.state = BossState::Dying;
        boss.death_start_time = self.now;
        boss.last_death_explosion = self.now;

        // No boss damage during the death animation
        self.boss_bullets.clear();
        self.warnings.clear();
        self.deferred.clear();
        self.thaw_pending.extend(abilities::take_frozen(boss));

        self.add_effect(ScreenEffectKind::Flash, Color::WHITE, FLASH_MS);
        info!(boss = boss.boss_number, score, "Boss defeated");
        self.emit(EncounterEvent::BossKilled {
            boss_number: boss.boss_number,
            score,
        });
    }

    /// Horizontal patrol with edge bounce plus a vertical bob
    fn patrol(&mut self, boss: &mut Boss, dt: f32) {
        let mut factor = boss.slow_multiplier(self.now);
        if boss.state == BossState::Damaged {
            factor *= DAMAGED_SPEED_FACTOR;
        }
        boss.x += boss.direction * boss.speed * factor * dt;

        let min_x = self.screen.x + EDGE_PADDING;
        let max_x = (self.screen.right() - boss.width - EDGE_PADDING).max(min_x);
        if boss.x <= min_x {
            boss.x = min_x;
            boss.direction = 1.0;
        } else if boss.x >= max_x {
            boss.x = max_x;
            boss.direction = -1.0;
        }

        let t = self.now - boss.engaged_at;
        boss.y = boss.base_y + ((t * BOB_FREQUENCY).sin() as f32) * BOB_AMPLITUDE;
    }

    fn attack(&mut self, boss: &mut Boss, config: &BossConfig) {
        if boss.state == BossState::PhaseTransition {
            return;
        }
        let rate = boss.ability.rage_multiplier() as f64;

        if self.now - boss.last_shot_time >= boss.next_shot_delay / rate {
            let pattern = attacks::primary_pattern(boss.boss_number, boss.current_phase);
            self.launch(boss, pattern, config);
            boss.last_shot_time = self.now;
            boss.next_shot_delay = self.roll_shot_delay(config, boss.boss_number);
        }

        if let Some(secondary) = attacks::secondary_attack(boss.boss_number, boss.current_phase) {
            if self.now - boss.last_secondary_time >= secondary.interval_ms / rate {
                self.launch(boss, secondary.pattern, config);
                boss.last_secondary_time = self.now;
            }
        }
    }

    fn run_abilities(&mut self, boss: &mut Boss, config: &BossConfig, player_bullets: &mut [Bullet]) {
        let origin = AttackOrigin::from_boss(boss, config, self.screen, self.now);
        let outcome = abilities::update(boss, &origin, player_bullets, &mut self.warnings, &mut self.rng);
        self.apply(outcome);

        for meteor in abilities::drop_due_meteors(&mut self.warnings, &origin) {
            self.add_boss_bullet(meteor);
        }
    }

    /// Advance the state machine. Returns `false` once the boss is gone.
    fn update_boss(
        &mut self,
        boss: &mut Boss,
        config: &BossConfig,
        dt: f32,
        player_bullets: &mut [Bullet],
    ) -> bool {
        match boss.state {
            BossState::Appearing => {
                boss.y += APPEAR_SPEED * dt;
                let start_y = self.screen.y - boss.height;
                let progress = ((boss.y - start_y) / (boss.base_y - start_y)).clamp(0.0, 1.0);
                boss.scale = progress;
                boss.alpha = progress;
                if boss.y >= boss.base_y {
                    self.engage(boss, config);
                }
                return true;
            }
            BossState::Damaged => {
                if self.now - boss.damage_flash_time >= DAMAGE_FLASH_MS {
                    boss.state = BossState::Fighting;
                }
            }
            BossState::PhaseTransition => {
                if self.now - boss.phase_transition_start >= PHASE_TRANSITION_MS {
                    debug!(boss = boss.boss_number, phase = boss.current_phase, "Phase transition complete");
                    boss.state = BossState::Fighting;
                }
            }
            BossState::Dying => return self.update_dying(boss),
            BossState::Dead => return false,
            BossState::Fighting => {}
        }

        self.patrol(boss, dt);
        self.attack(boss, config);
        self.run_abilities(boss, config, player_bullets);
        true
    }

    fn update_dying(&mut self, boss: &mut Boss) -> bool {
        let progress = ((self.now - boss.death_start_time) / DEATH_DURATION_MS).clamp(0.0, 1.0) as f32;
        boss.scale = 1.0 - progress;
        boss.alpha = 1.0 - progress;

        let rect = boss.rect();
        let style = BurstStyle::new(ParticleKind::Explosion, Color::ORANGE.mix(boss.color, 0.4))
            .speed(1.0, 4.0)
            .size(2.0, 5.0);
        while self.now - boss.last_death_explosion >= DEATH_EXPLOSION_INTERVAL_MS {
            boss.last_death_explosion += DEATH_EXPLOSION_INTERVAL_MS;
            let at = Vec2::new(
                self.rng.gen_range(rect.x..=rect.right()),
                self.rng.gen_range(rect.y..=rect.bottom()),
            );
            self.burst(at, DEATH_BURST, style);
        }

        if progress < 1.0 {
            return true;
        }

        boss.state = BossState::Dead;
        let style = BurstStyle::new(ParticleKind::Explosion, boss.color)
            .speed(2.0, 8.0)
            .life(40.0, 70.0)
            .size(3.0, 7.0);
        self.burst(rect.center(), FINAL_EXPLOSION, style);
        self.generation += 1;
        info!(boss = boss.boss_number, "Boss destroyed");
        self.emit(EncounterEvent::BossDestroyed { boss_number: boss.boss_number });
        false
    }

    fn run_deferred(&mut self, boss: Option<&mut Boss>, config: &BossConfig) {
        let due = self.deferred.drain_due(self.now, self.generation);
        if due.is_empty() {
            return;
        }
        let Some(boss) = boss else {
            return;
        };
        for action in due {
            match action {
                // Held until the phase transition pause is over
                DeferredKind::Attack(pattern) if boss.state == BossState::PhaseTransition => {
                    let resume_at = boss.phase_transition_start + PHASE_TRANSITION_MS;
                    self.deferred
                        .schedule(resume_at, boss.generation, DeferredKind::Attack(pattern));
                }
                DeferredKind::Attack(pattern) if boss.state.is_engaged() => {
                    self.launch(boss, pattern, config);
                }
                DeferredKind::Attack(_) => {}
                DeferredKind::SpawnBullet(bullet) => self.add_boss_bullet(bullet),
            }
        }
    }

    fn update_bullets(&mut self, dt: f32, player_bullets: &mut Vec<Bullet>) {
        let detonations = projectiles::update_boss_bullets(&mut self.boss_bullets, dt, &mut self.rng);
        for fragment in detonations.fragments {
            self.add_boss_bullet(fragment);
        }
        self.add_particles(detonations.particles);
        for at in detonations.positions {
            self.emit(EncounterEvent::BulletDetonated { x: at.x, y: at.y });
        }

        projectiles::update_player_bullets(player_bullets, dt);
        particles::update(&mut self.particles, dt);

        let now = self.now;
        self.screen_effects.retain(|effect| effect.is_active(now));
    }

    fn clear(&mut self) {
        self.boss_bullets.clear();
        self.particles.clear();
        self.warnings.clear();
        self.screen_effects.clear();
        self.deferred.clear();
    }
}

/// The boss fight for one level
#[derive(Debug)]
pub struct BossEncounter {
    config: BossConfig,
    boss: Option<Boss>,
    field: Battlefield,
    last_kill_score: u32,
}

impl BossEncounter {
    pub fn new(config: BossConfig, screen: Rect, seed: u64) -> Self {
        Self {
            config,
            boss: None,
            field: Battlefield {
                now: 0.0,
                screen,
                rng: StdRng::seed_from_u64(seed),
                generation: 0,
                boss_bullets: Vec::new(),
                particles: Vec::new(),
                warnings: Vec::new(),
                screen_effects: Vec::new(),
                deferred: DeferredQueue::new(),
                events: Vec::new(),
                next_bullet_id: 0,
                next_effect_id: 0,
                thaw_pending: HashMap::new(),
            },
            last_kill_score: 0,
        }
    }

    /// Spawn the boss for `level` if it is a boss level. Any boss already
    /// present is torn down first.
    pub fn create_boss(&mut self, level: u32) -> Option<&Boss> {
        let boss_number = self.config.boss_number_for_level(level)?;
        let profile = self.config.profile(boss_number)?.clone();

        if self.boss.is_some() {
            self.reset();
        }

        let field = &mut self.field;
        field.generation += 1;
        let (width, height) = self.config.dimensions(boss_number);
        let speed = self.config.speed(boss_number);
        let max_hp = self.config.max_hp(boss_number);
        let next_shot_delay = field.roll_shot_delay(&self.config, boss_number);

        let boss = Boss {
            generation: field.generation,
            boss_number,
            name: profile.name,
            color: profile.color,
            image: profile.image,
            x: field.screen.center().x - width * 0.5,
            y: field.screen.y - height,
            width,
            height,
            base_y: field.screen.y + BASE_Y,
            direction: 1.0,
            speed,
            base_speed: speed,
            slow_factor: 1.0,
            slow_until: 0.0,
            current_hp: max_hp,
            max_hp,
            state: BossState::Appearing,
            current_phase: 1,
            phase_count: profile.phases.max(1),
            ability: BossAbility::for_boss(boss_number, self.config.shield_hits),
            spawned_at: field.now,
            engaged_at: field.now,
            last_shot_time: field.now,
            next_shot_delay,
            last_secondary_time: field.now,
            damage_flash_time: f64::NEG_INFINITY,
            phase_transition_start: 0.0,
            death_start_time: 0.0,
            last_death_explosion: 0.0,
            scale: 0.0,
            alpha: 0.0,
        };

        info!(level, boss = boss_number, name = profile.name, max_hp, "Boss spawned");
        field.emit(EncounterEvent::BossSpawned {
            boss_number,
            name: profile.name.to_string(),
            max_hp,
        });
        self.boss = Some(boss);
        self.boss.as_ref()
    }

    /// Advance the encounter by `delta_time` frames (1.0 = one 60 Hz frame).
    /// `player_bullets` are moved, culled and, for temporal freeze, frozen.
    pub fn update(&mut self, delta_time: f32, player_bullets: &mut Vec<Bullet>) {
        let dt = if delta_time.is_finite() {
            delta_time.clamp(0.0, MAX_DELTA)
        } else {
            0.0
        };
        self.field.now += dt as f64 * FRAME_MS;

        if !self.field.thaw_pending.is_empty() {
            abilities::thaw(&mut self.field.thaw_pending, player_bullets);
        }

        if let Some(boss) = self.boss.as_mut() {
            if !self.field.update_boss(boss, &self.config, dt, player_bullets) {
                self.boss = None;
            }
        }

        self.field.run_deferred(self.boss.as_mut(), &self.config);
        self.field.update_bullets(dt, player_bullets);

        let screen = self.field.screen;
        projectiles::cull_offscreen(&mut self.field.boss_bullets, screen);
        projectiles::cull_offscreen(player_bullets, screen);
    }

    /// Apply `amount` damage. Returns whether this call killed the boss.
    pub fn damage_boss(&mut self, amount: u32) -> bool {
        let Some(boss) = self.boss.as_mut() else {
            return false;
        };
        if amount == 0 || !boss.state.is_vulnerable() {
            return false;
        }
        let field = &mut self.field;

        let origin = AttackOrigin::from_boss(boss, &self.config, field.screen, field.now);
        match abilities::absorb_hit(boss, &origin, &mut field.rng) {
            ShieldHit::Unshielded => {}
            ShieldHit::Absorbed { remaining } => {
                let style = BurstStyle::new(ParticleKind::Shield, Color::CYAN).speed(1.0, 3.0);
                field.burst(Vec2::new(boss.center_x(), boss.feet_y()), HIT_BURST, style);
                field.emit(EncounterEvent::ShieldAbsorbed { remaining });
                return false;
            }
            ShieldHit::Broken(outcome) => {
                field.apply(outcome);
                field.add_effect(ScreenEffectKind::Flash, Color::CYAN, FLASH_MS);
                return false;
            }
        }

        boss.current_hp = boss.current_hp.saturating_sub(amount);
        boss.damage_flash_time = field.now;
        if matches!(boss.state, BossState::Fighting | BossState::Damaged) {
            boss.state = BossState::Damaged;
        }
        let style = BurstStyle::new(ParticleKind::Spark, Color::WHITE.mix(boss.color, 0.5))
            .life(10.0, 20.0);
        field.burst(Vec2::new(boss.center_x(), boss.feet_y()), HIT_BURST, style);

        if boss.current_hp == 0 {
            let score = self.config.score(boss.boss_number);
            self.last_kill_score = score;
            field.begin_dying(boss, score);
            return true;
        }

        // Phases only move forward, whatever regeneration does later
        let phase = boss.phase_for_hp();
        if phase > boss.current_phase && boss.state != BossState::Appearing {
            field.enter_phase(boss, phase);
        }
        false
    }

    /// Test player bullets against the boss. At most one bullet hits per
    /// pass; the caller removes the reported bullets and adds the score.
    pub fn check_boss_collisions(&mut self, player_bullets: &[Bullet]) -> BossCollisionReport {
        let Some(boss) = self.boss.as_ref() else {
            return BossCollisionReport::default();
        };
        if !boss.state.is_vulnerable() {
            return BossCollisionReport::default();
        }
        let Some(hit) = collision::first_hit(&boss.rect(), player_bullets) else {
            return BossCollisionReport::default();
        };

        let boss_killed = self.damage_boss(1);
        BossCollisionReport {
            bullets_to_remove: vec![hit],
            boss_killed,
            score_gained: if boss_killed { self.last_kill_score } else { 0 },
        }
    }

    /// Test boss bullets against the player; every overlapping bullet is
    /// removed. A dying or absent boss never hits.
    pub fn check_boss_bullets_collision(&mut self, player: &Rect) -> bool {
        let Some(boss) = self.boss.as_ref() else {
            return false;
        };
        if !boss.state.is_alive() {
            return false;
        }
        let hits = collision::strike_player(&mut self.field.boss_bullets, player);
        if hits == 0 {
            return false;
        }
        debug!(bullets = hits, "Player hit by boss bullets");
        self.field.emit(EncounterEvent::PlayerHit { bullets: hits });
        true
    }

    pub fn get_boss_status(&self) -> Option<BossStatus> {
        self.boss.as_ref().map(BossStatus::from)
    }

    /// Slow the boss's movement by `factor` for `duration_ms`. Ignored while
    /// the boss is raging or not fighting.
    pub fn slow_boss(&mut self, factor: f32, duration_ms: f64) {
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        if !boss.state.is_engaged() || boss.ability.is_raging() {
            return;
        }
        boss.slow_factor = factor.clamp(0.0, 1.0);
        boss.slow_until = self.field.now + duration_ms.max(0.0);
        debug!(factor = boss.slow_factor, duration_ms, "Boss slowed");
    }

    /// Remove the boss and everything it spawned
    pub fn reset(&mut self) {
        if let Some(mut boss) = self.boss.take() {
            self.field.thaw_pending.extend(abilities::take_frozen(&mut boss));
            debug!(boss = boss.boss_number, "Encounter reset");
        }
        self.field.generation += 1;
        self.field.clear();
    }

    /// Take all events emitted since the last call. Only the newest
    /// `MAX_PENDING_EVENTS` are kept between drains.
    pub fn drain_events(&mut self) -> Vec<EncounterEvent> {
        std::mem::take(&mut self.field.events)
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            boss: self.boss.as_ref(),
            boss_bullets: &self.field.boss_bullets,
            particles: &self.field.particles,
            warnings: &self.field.warnings,
            screen_effects: &self.field.screen_effects,
            now: self.field.now,
            screen: self.field.screen,
        }
    }

    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    pub fn has_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn boss_bullets(&self) -> &[Bullet] {
        &self.field.boss_bullets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.field.particles
    }

    pub fn warnings(&self) -> &[WarningMarker] {
        &self.field.warnings
    }

    pub fn screen_effects(&self) -> &[ScreenEffect] {
        &self.field.screen_effects
    }

    /// Encounter clock (ms)
    pub fn now(&self) -> f64 {
        self.field.now
    }

    pub fn screen(&self) -> Rect {
        self.field.screen
    }

    pub fn config(&self) -> &BossConfig {
        &self.config
    }

    /// Score awarded by the most recent kill
    pub fn last_kill_score(&self) -> u32 {
        self.last_kill_score
    }

    pub fn pending_actions(&self) -> usize {
        self.field.deferred.len()
    }
}
