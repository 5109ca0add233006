//! Boss attack library
//!
//! Pure bullet-pattern generators. Each takes an [`AttackOrigin`] (where the
//! boss is, its colour, config-derived bullet speed/size and the rage
//! multiplier) plus an RNG and returns a [`Volley`]; the encounter assigns
//! bullet ids, applies teleports and queues follow-ups and staggered bullets.
//!
//! Which pattern fires is decided by the lookup tables [`primary_pattern`]
//! and [`secondary_attack`].

use rand::Rng;
use std::f32::consts::{FRAC_PI_4, PI, TAU};

use crate::config::BossConfig;
use crate::game::constants::attack::*;
use crate::game::constants::boss::EDGE_PADDING;
use crate::game::constants::particles::{FRAGMENT_BURST, TELEPORT_BURST};
use crate::game::state::{Boss, Bullet, BulletBehavior, BulletKind, Particle, ParticleKind};
use crate::game::systems::particles::{self, BurstStyle};
use crate::util::color::Color;
use crate::util::geometry::{Rect, Vec2};

/// Bullet patterns a boss can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPattern {
    Straight,
    MultiShot,
    Zigzag,
    TidalWave,
    Circular,
    Explosive,
    Meteor,
    Berserk,
    Spiral,
    Teleport,
    CloneStrike,
    GravityWave,
    Chaos,
    /// Water shield retaliation ring
    ShieldBreak,
}

impl AttackPattern {
    pub fn name(&self) -> &'static str {
        match self {
            AttackPattern::Straight => "straight",
            AttackPattern::MultiShot => "multi_shot",
            AttackPattern::Zigzag => "zigzag",
            AttackPattern::TidalWave => "tidal_wave",
            AttackPattern::Circular => "circular",
            AttackPattern::Explosive => "explosive",
            AttackPattern::Meteor => "meteor",
            AttackPattern::Berserk => "berserk",
            AttackPattern::Spiral => "spiral",
            AttackPattern::Teleport => "teleport",
            AttackPattern::CloneStrike => "clone_strike",
            AttackPattern::GravityWave => "gravity_wave",
            AttackPattern::Chaos => "chaos",
            AttackPattern::ShieldBreak => "shield_break",
        }
    }
}

use AttackPattern as P;

/// Primary attack per boss (row) and phase (column)
const PRIMARY_TABLE: [[AttackPattern; 3]; 5] = [
    [P::Straight, P::Zigzag, P::Zigzag],
    [P::TidalWave, P::Circular, P::Circular],
    [P::MultiShot, P::Explosive, P::Meteor],
    [P::Circular, P::Berserk, P::Spiral],
    [P::Teleport, P::Teleport, P::Teleport],
];

/// Independently scheduled extra attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondaryAttack {
    pub pattern: AttackPattern,
    pub interval_ms: f64,
    /// First phase in which it is active
    pub min_phase: u8,
}

const SECONDARY_TABLE: [Option<SecondaryAttack>; 5] = [
    None,
    None,
    Some(SecondaryAttack { pattern: P::Explosive, interval_ms: 4000.0, min_phase: 3 }),
    Some(SecondaryAttack { pattern: P::Straight, interval_ms: 1500.0, min_phase: 2 }),
    Some(SecondaryAttack { pattern: P::Chaos, interval_ms: 9000.0, min_phase: 3 }),
];

/// Primary attack for a boss/phase. Unknown bosses fall back to `Straight`.
pub fn primary_pattern(boss_number: u8, phase: u8) -> AttackPattern {
    let row = (boss_number as usize).wrapping_sub(1);
    let col = (phase.max(1) as usize - 1).min(2);
    PRIMARY_TABLE
        .get(row)
        .map(|r| r[col])
        .unwrap_or(AttackPattern::Straight)
}

/// Secondary attack active for a boss in the given phase
pub fn secondary_attack(boss_number: u8, phase: u8) -> Option<SecondaryAttack> {
    let row = (boss_number as usize).wrapping_sub(1);
    SECONDARY_TABLE
        .get(row)
        .copied()
        .flatten()
        .filter(|s| phase >= s.min_phase)
}

/// Attack chained after a teleport, per phase
pub fn teleport_follow_up(phase: u8) -> AttackPattern {
    match phase {
        0 | 1 => AttackPattern::Spiral,
        2 => AttackPattern::CloneStrike,
        _ => AttackPattern::GravityWave,
    }
}

/// Everything a generator needs to know about the attacking boss
#[derive(Debug, Clone)]
pub struct AttackOrigin {
    /// Horizontal centre of the boss
    pub center_x: f32,
    /// Bottom edge of the boss (bullets leave from here)
    pub feet_y: f32,
    pub boss_width: f32,
    pub color: Color,
    pub phase: u8,
    pub bullet_speed: f32,
    pub bullet_size: (f32, f32),
    /// Rage multiplier applied to bullet speed
    pub speed_multiplier: f32,
    pub multi_shot_count: u32,
    pub multi_shot_spread_deg: f32,
    /// Encounter clock (ms)
    pub now: f64,
    pub screen: Rect,
}

impl AttackOrigin {
    pub fn from_boss(boss: &Boss, config: &BossConfig, screen: Rect, now: f64) -> Self {
        Self {
            center_x: boss.center_x(),
            feet_y: boss.feet_y(),
            boss_width: boss.width,
            color: boss.color,
            phase: boss.current_phase,
            bullet_speed: config.bullet_speed_for(boss.boss_number),
            bullet_size: (config.bullet_width, config.bullet_height),
            speed_multiplier: boss.ability.rage_multiplier(),
            multi_shot_count: config.multi_shot_count,
            multi_shot_spread_deg: config.multi_shot_spread_deg,
            now,
            screen,
        }
    }

    #[inline]
    fn muzzle(&self) -> Vec2 {
        Vec2::new(self.center_x, self.feet_y)
    }

    #[inline]
    fn speed(&self) -> f32 {
        self.bullet_speed * self.speed_multiplier
    }

    fn scaled_size(&self, factor: f32) -> (f32, f32) {
        (self.bullet_size.0 * factor, self.bullet_size.1 * factor)
    }

    fn bullet(&self, kind: BulletKind, center: Vec2, size: (f32, f32), velocity: Vec2) -> Bullet {
        Bullet::boss(kind, center, size, velocity, self.color)
    }
}

/// Output of a generator
#[derive(Debug, Clone, Default)]
pub struct Volley {
    /// Bullets to add immediately
    pub bullets: Vec<Bullet>,
    /// Bullets to add after a delay (ms)
    pub delayed_bullets: Vec<(f64, Bullet)>,
    pub particles: Vec<Particle>,
    /// New left edge for the boss, if it teleported
    pub teleport_to: Option<f32>,
    /// Patterns to fire later from the boss's position at that time
    pub follow_ups: Vec<(f64, AttackPattern)>,
}

impl Volley {
    /// Bullets fired now plus those queued for later
    pub fn bullet_count(&self) -> usize {
        self.bullets.len() + self.delayed_bullets.len()
    }

    fn merge(&mut self, other: Volley) {
        self.bullets.extend(other.bullets);
        self.delayed_bullets.extend(other.delayed_bullets);
        self.particles.extend(other.particles);
        self.follow_ups.extend(other.follow_ups);
        if other.teleport_to.is_some() {
            self.teleport_to = other.teleport_to;
        }
    }
}

/// Run one pattern
pub fn fire<R: Rng + ?Sized>(pattern: AttackPattern, origin: &AttackOrigin, rng: &mut R) -> Volley {
    match pattern {
        AttackPattern::Straight => straight(origin),
        AttackPattern::MultiShot => multi_shot(origin),
        AttackPattern::Zigzag => zigzag(origin),
        AttackPattern::TidalWave => tidal_wave(origin),
        AttackPattern::Circular => circular(origin, BulletKind::Circular, CIRCULAR_SPEED_MULTIPLIER),
        AttackPattern::Explosive => explosive(origin, rng),
        AttackPattern::Meteor => meteor(origin),
        AttackPattern::Berserk => berserk(origin, rng),
        AttackPattern::Spiral => spiral(origin),
        AttackPattern::Teleport => teleport(origin, rng),
        AttackPattern::CloneStrike => clone_strike(origin, rng),
        AttackPattern::GravityWave => gravity_wave(origin),
        AttackPattern::Chaos => chaos(origin),
        AttackPattern::ShieldBreak => circular(origin, BulletKind::ShieldBreak, 1.0),
    }
}

fn straight(origin: &AttackOrigin) -> Volley {
    let velocity = Vec2::new(0.0, origin.speed());
    Volley {
        bullets: vec![origin.bullet(BulletKind::Straight, origin.muzzle(), origin.bullet_size, velocity)],
        ..Default::default()
    }
}

fn multi_shot(origin: &AttackOrigin) -> Volley {
    let count = origin.multi_shot_count.max(1) as usize;
    let spread = origin.multi_shot_spread_deg.to_radians();
    let size = origin.scaled_size(1.25);
    let bullets = fan_angles(count, spread)
        .map(|angle| {
            origin.bullet(
                BulletKind::Large,
                origin.muzzle(),
                size,
                Vec2::from_fan_angle(angle, origin.speed()),
            )
        })
        .collect();
    Volley { bullets, ..Default::default() }
}

/// `count` angles evenly spanning `spread` radians, centred on straight down
fn fan_angles(count: usize, spread: f32) -> impl Iterator<Item = f32> {
    let step = if count > 1 { spread / (count - 1) as f32 } else { 0.0 };
    let start = if count > 1 { -spread * 0.5 } else { 0.0 };
    (0..count).map(move |i| start + step * i as f32)
}

fn zigzag(origin: &AttackOrigin) -> Volley {
    let bullets = [(0u8, -1.0f32), (1u8, 1.0f32)]
        .iter()
        .map(|&(pattern, side)| {
            let center = origin.muzzle() + Vec2::new(side * origin.bullet_size.0, 0.0);
            origin
                .bullet(
                    BulletKind::Zigzag,
                    center,
                    origin.bullet_size,
                    Vec2::new(side * ZIGZAG_SEED_VX, origin.speed()),
                )
                .with_behavior(BulletBehavior::Zigzag { pattern, counter: 0.0 })
        })
        .collect();
    Volley { bullets, ..Default::default() }
}

fn tidal_wave(origin: &AttackOrigin) -> Volley {
    let mut volley = Volley::default();
    let size = origin.scaled_size(WAVE_SIZE_FACTOR);
    for (i, angle) in fan_angles(FAN_BULLETS, FAN_SPREAD_DEG.to_radians()).enumerate() {
        let wave_time_ms = i as f64 * WAVE_STAGGER_MS;
        let bullet = origin
            .bullet(BulletKind::Wave, origin.muzzle(), size, Vec2::from_fan_angle(angle, origin.speed()))
            .with_behavior(BulletBehavior::Wave { wave_time_ms });
        if wave_time_ms > 0.0 {
            volley.delayed_bullets.push((wave_time_ms, bullet));
        } else {
            volley.bullets.push(bullet);
        }
    }
    volley
}

fn circular(origin: &AttackOrigin, kind: BulletKind, speed_multiplier: f32) -> Volley {
    let speed = origin.speed() * speed_multiplier;
    let bullets = (0..CIRCULAR_BULLETS)
        .map(|i| {
            let angle = i as f32 / CIRCULAR_BULLETS as f32 * TAU;
            origin.bullet(kind, origin.muzzle(), origin.bullet_size, Vec2::from_angle(angle) * speed)
        })
        .collect();
    Volley { bullets, ..Default::default() }
}

fn explosive<R: Rng + ?Sized>(origin: &AttackOrigin, rng: &mut R) -> Volley {
    let base = origin.speed();
    let bullets = (0..EXPLOSIVE_BULLETS)
        .map(|_| {
            // Screen space: angles in [0, PI] point into the lower half
            let angle = rng.gen_range(0.0..PI);
            let speed = base * rng.gen_range(0.5..1.0);
            let timer_ms = rng.gen_range(EXPLOSIVE_FUSE_MIN_MS..EXPLOSIVE_FUSE_MAX_MS);
            origin
                .bullet(
                    BulletKind::Explosive,
                    origin.muzzle(),
                    origin.scaled_size(1.2),
                    Vec2::from_angle(angle) * speed,
                )
                .with_behavior(BulletBehavior::Fuse { timer_ms })
        })
        .collect();
    Volley { bullets, ..Default::default() }
}

fn meteor(origin: &AttackOrigin) -> Volley {
    let side = origin.bullet_size.0 * METEOR_SIZE_FACTOR;
    let velocity = Vec2::new(0.0, origin.speed() * METEOR_SPEED_MULTIPLIER);
    Volley {
        bullets: vec![origin.bullet(BulletKind::Meteor, origin.muzzle(), (side, side), velocity)],
        ..Default::default()
    }
}

/// Meteor dropped by the meteor shower ability from the top of the screen
pub fn shower_meteor(origin: &AttackOrigin, x: f32, speed_factor: f32) -> Bullet {
    let side = origin.bullet_size.0 * METEOR_SIZE_FACTOR;
    let center = Vec2::new(x, origin.screen.y - side * 0.5);
    let velocity = Vec2::new(0.0, origin.speed() * speed_factor);
    origin.bullet(BulletKind::Meteor, center, (side, side), velocity)
}

fn berserk<R: Rng + ?Sized>(origin: &AttackOrigin, rng: &mut R) -> Volley {
    let base = origin.speed();
    let bullets = (0..BERSERK_BULLETS)
        .map(|i| {
            let angle = i as f32 / BERSERK_BULLETS as f32 * TAU;
            let speed = base * rng.gen_range(1.0..1.5);
            origin.bullet(BulletKind::Berserk, origin.muzzle(), origin.bullet_size, Vec2::from_angle(angle) * speed)
        })
        .collect();
    Volley { bullets, ..Default::default() }
}

fn spiral(origin: &AttackOrigin) -> Volley {
    let offset = ((origin.now * SPIRAL_ROTATION_RATE) % std::f64::consts::TAU) as f32;
    let speed = origin.speed() * 0.9;
    let bullets = (0..SPIRAL_BULLETS)
        .map(|i| {
            let angle = offset + i as f32 / SPIRAL_BULLETS as f32 * TAU;
            origin.bullet(BulletKind::Spiral, origin.muzzle(), origin.bullet_size, Vec2::from_angle(angle) * speed)
        })
        .collect();
    Volley { bullets, ..Default::default() }
}

fn teleport<R: Rng + ?Sized>(origin: &AttackOrigin, rng: &mut R) -> Volley {
    let min_x = origin.screen.x + EDGE_PADDING;
    let max_x = (origin.screen.right() - origin.boss_width - EDGE_PADDING).max(min_x);
    let new_left = if max_x > min_x { rng.gen_range(min_x..max_x) } else { min_x };
    let new_center_x = new_left + origin.boss_width * 0.5;

    let style = BurstStyle::new(ParticleKind::Teleport, origin.color)
        .speed(1.0, 3.5)
        .life(15.0, 30.0);
    let mut volley = Volley {
        teleport_to: Some(new_left),
        ..Default::default()
    };
    volley.particles.extend(particles::burst(rng, origin.muzzle(), TELEPORT_BURST, style));
    volley.particles.extend(particles::burst(
        rng,
        Vec2::new(new_center_x, origin.feet_y),
        TELEPORT_BURST,
        style,
    ));

    let relocated = AttackOrigin {
        center_x: new_center_x,
        ..origin.clone()
    };
    volley.merge(straight(&relocated));
    volley
        .follow_ups
        .push((TELEPORT_FOLLOW_UP_MS, teleport_follow_up(origin.phase)));
    volley
}

fn clone_strike<R: Rng + ?Sized>(origin: &AttackOrigin, rng: &mut R) -> Volley {
    let mirror_x = origin.screen.x + origin.screen.right() - origin.center_x;
    let mut volley = straight(origin);
    let mirrored = AttackOrigin {
        center_x: mirror_x,
        ..origin.clone()
    };
    volley.merge(straight(&mirrored));
    let style = BurstStyle::new(ParticleKind::Clone, origin.color)
        .speed(0.5, 2.0)
        .life(20.0, 35.0)
        .size(3.0, 6.0);
    volley
        .particles
        .extend(particles::burst(rng, mirrored.muzzle(), TELEPORT_BURST, style));
    volley
}

fn gravity_wave(origin: &AttackOrigin) -> Volley {
    let speed = origin.speed() * 0.5;
    let bullets = (0..GRAVITY_BULLETS)
        .map(|i| {
            let dir = Vec2::from_angle(i as f32 / GRAVITY_BULLETS as f32 * TAU);
            let radius = GRAVITY_RING_BASE + GRAVITY_RING_STEP * i as f32;
            origin.bullet(
                BulletKind::Gravity,
                origin.muzzle() + dir * radius,
                origin.bullet_size,
                dir * speed,
            )
        })
        .collect();
    Volley { bullets, ..Default::default() }
}

fn chaos(origin: &AttackOrigin) -> Volley {
    let mut volley = spiral(origin);
    volley.follow_ups.push((CHAOS_STAGGER_MS, AttackPattern::Berserk));
    volley.follow_ups.push((CHAOS_STAGGER_MS * 2.0, AttackPattern::Explosive));
    volley
}

/// Split a detonated explosive into fragments on the diagonals
pub fn fragment<R: Rng + ?Sized>(parent: &Bullet, rng: &mut R) -> (Vec<Bullet>, Vec<Particle>) {
    let center = parent.center();
    // Half width and height: a quarter of the parent's area
    let size = ((parent.width * 0.5).max(2.0), (parent.height * 0.5).max(2.0));
    let speed = parent.velocity().length().max(2.0);
    let bullets = (0..FRAGMENT_COUNT)
        .map(|i| {
            let angle = FRAC_PI_4 + i as f32 * (TAU / FRAGMENT_COUNT as f32);
            Bullet::boss(BulletKind::Fragment, center, size, Vec2::from_angle(angle) * speed, parent.color)
        })
        .collect();
    let style = BurstStyle::new(ParticleKind::Explosion, Color::ORANGE.mix(parent.color, 0.3))
        .speed(1.5, 5.0)
        .life(15.0, 30.0);
    (bullets, particles::burst(rng, center, FRAGMENT_BURST, style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ALL_PATTERNS: [AttackPattern; 14] = [
        P::Straight,
        P::MultiShot,
        P::Zigzag,
        P::TidalWave,
        P::Circular,
        P::Explosive,
        P::Meteor,
        P::Berserk,
        P::Spiral,
        P::Teleport,
        P::CloneStrike,
        P::GravityWave,
        P::Chaos,
        P::ShieldBreak,
    ];

    fn origin() -> AttackOrigin {
        AttackOrigin {
            center_x: 400.0,
            feet_y: 160.0,
            boss_width: 120.0,
            color: Color::PURPLE,
            phase: 1,
            bullet_speed: 4.0,
            bullet_size: (8.0, 16.0),
            speed_multiplier: 1.0,
            multi_shot_count: 3,
            multi_shot_spread_deg: 30.0,
            now: 1234.0,
            screen: Rect::new(0.0, 0.0, 800.0, 600.0),
        }
    }

    fn all_bullets(volley: &Volley) -> impl Iterator<Item = &Bullet> {
        volley
            .bullets
            .iter()
            .chain(volley.delayed_bullets.iter().map(|(_, b)| b))
    }

    #[test]
    fn test_every_pattern_bullets_have_size_and_boss_color() {
        let mut rng = StdRng::seed_from_u64(7);
        let o = origin();
        for pattern in ALL_PATTERNS {
            let volley = fire(pattern, &o, &mut rng);
            assert!(volley.bullet_count() > 0, "{} produced no bullets", pattern.name());
            for b in all_bullets(&volley) {
                assert!(b.width > 0.0 && b.height > 0.0, "{}", pattern.name());
                assert_eq!(b.color, o.color, "{}", pattern.name());
            }
        }
    }

    #[test]
    fn test_straight() {
        let mut rng = StdRng::seed_from_u64(1);
        let volley = fire(P::Straight, &origin(), &mut rng);
        assert_eq!(volley.bullets.len(), 1);
        let b = &volley.bullets[0];
        assert_eq!(b.vx, 0.0);
        assert_eq!(b.vy, 4.0);
        assert_eq!(b.kind, BulletKind::Straight);
    }

    #[test]
    fn test_straight_uses_rage_multiplier() {
        let mut rng = StdRng::seed_from_u64(1);
        let o = AttackOrigin { speed_multiplier: 1.55, ..origin() };
        let volley = fire(P::Straight, &o, &mut rng);
        assert!((volley.bullets[0].vy - 4.0 * 1.55).abs() < 1e-5);
    }

    #[test]
    fn test_zigzag_pair_is_mirrored() {
        let mut rng = StdRng::seed_from_u64(1);
        let volley = fire(P::Zigzag, &origin(), &mut rng);
        assert_eq!(volley.bullets.len(), 2);
        assert_eq!(volley.bullets[0].vx, -volley.bullets[1].vx);
        assert!(matches!(volley.bullets[0].behavior, BulletBehavior::Zigzag { pattern: 0, .. }));
        assert!(matches!(volley.bullets[1].behavior, BulletBehavior::Zigzag { pattern: 1, .. }));
    }

    #[test]
    fn test_tidal_wave_fan_is_staggered() {
        let mut rng = StdRng::seed_from_u64(1);
        let volley = fire(P::TidalWave, &origin(), &mut rng);
        assert_eq!(volley.bullets.len(), 1);
        assert_eq!(volley.delayed_bullets.len(), FAN_BULLETS - 1);
        for (i, (delay, b)) in volley.delayed_bullets.iter().enumerate() {
            assert_eq!(*delay, (i + 1) as f64 * WAVE_STAGGER_MS);
            assert!(matches!(b.behavior, BulletBehavior::Wave { wave_time_ms } if wave_time_ms == *delay));
        }
        // Outermost bullets lean in opposite directions, middle goes straight down
        let first = &volley.bullets[0];
        let last = &volley.delayed_bullets.last().unwrap().1;
        assert!(first.vx < 0.0 && last.vx > 0.0);
        let middle = &volley.delayed_bullets[2].1;
        assert!(middle.vx.abs() < 1e-4);
    }

    #[test]
    fn test_circular_is_evenly_spaced() {
        let mut rng = StdRng::seed_from_u64(1);
        let volley = fire(P::Circular, &origin(), &mut rng);
        assert_eq!(volley.bullets.len(), CIRCULAR_BULLETS);
        let sum_vx: f32 = volley.bullets.iter().map(|b| b.vx).sum();
        let sum_vy: f32 = volley.bullets.iter().map(|b| b.vy).sum();
        assert!(sum_vx.abs() < 1e-3 && sum_vy.abs() < 1e-3);
    }

    #[test]
    fn test_explosive_downward_with_fuse() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let volley = fire(P::Explosive, &origin(), &mut rng);
            assert_eq!(volley.bullets.len(), EXPLOSIVE_BULLETS);
            for b in &volley.bullets {
                assert!(b.vy >= 0.0);
                let speed = b.velocity().length();
                assert!(speed >= 2.0 - 1e-4 && speed <= 4.0 + 1e-4);
                match b.behavior {
                    BulletBehavior::Fuse { timer_ms } => {
                        assert!((EXPLOSIVE_FUSE_MIN_MS..EXPLOSIVE_FUSE_MAX_MS).contains(&timer_ms))
                    }
                    other => panic!("unexpected behavior {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_berserk_speed_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let volley = fire(P::Berserk, &origin(), &mut rng);
        assert_eq!(volley.bullets.len(), BERSERK_BULLETS);
        for b in &volley.bullets {
            let speed = b.velocity().length();
            assert!(speed >= 4.0 - 1e-4 && speed <= 6.0 + 1e-4);
        }
    }

    #[test]
    fn test_spiral_rotates_with_clock() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = fire(P::Spiral, &origin(), &mut rng);
        let later = AttackOrigin { now: 1534.0, ..origin() };
        let b = fire(P::Spiral, &later, &mut rng);
        assert_eq!(a.bullets.len(), SPIRAL_BULLETS);
        assert!((a.bullets[0].vx - b.bullets[0].vx).abs() > 1e-3);
    }

    #[test]
    fn test_teleport_relocates_and_chains() {
        let mut rng = StdRng::seed_from_u64(5);
        for phase in 1..=3u8 {
            let o = AttackOrigin { phase, ..origin() };
            let volley = fire(P::Teleport, &o, &mut rng);
            let new_left = volley.teleport_to.expect("teleport destination");
            assert!(new_left >= EDGE_PADDING);
            assert!(new_left + o.boss_width <= 800.0 - EDGE_PADDING + 1e-3);
            assert_eq!(volley.bullets.len(), 1);
            assert!((volley.bullets[0].center().x - (new_left + o.boss_width * 0.5)).abs() < 1e-3);
            assert_eq!(volley.particles.len(), TELEPORT_BURST * 2);
            assert_eq!(volley.follow_ups, vec![(TELEPORT_FOLLOW_UP_MS, teleport_follow_up(phase))]);
        }
    }

    #[test]
    fn test_clone_strike_mirrors() {
        let mut rng = StdRng::seed_from_u64(5);
        let o = AttackOrigin { center_x: 200.0, ..origin() };
        let volley = fire(P::CloneStrike, &o, &mut rng);
        assert_eq!(volley.bullets.len(), 2);
        assert!((volley.bullets[1].center().x - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_gravity_wave_ring_expands_outward() {
        let mut rng = StdRng::seed_from_u64(5);
        let o = origin();
        let volley = fire(P::GravityWave, &o, &mut rng);
        assert_eq!(volley.bullets.len(), GRAVITY_BULLETS);
        let muzzle = Vec2::new(o.center_x, o.feet_y);
        let mut last_radius = 0.0;
        for b in &volley.bullets {
            let offset = b.center() - muzzle;
            let radius = offset.length();
            assert!(radius > last_radius);
            last_radius = radius;
            // Moving away from the muzzle at half speed
            assert!(offset.x * b.vx + offset.y * b.vy > 0.0);
            assert!((b.velocity().length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_chaos_staggers_stages() {
        let mut rng = StdRng::seed_from_u64(5);
        let volley = fire(P::Chaos, &origin(), &mut rng);
        assert_eq!(volley.bullets.len(), SPIRAL_BULLETS);
        assert_eq!(
            volley.follow_ups,
            vec![(500.0, AttackPattern::Berserk), (1000.0, AttackPattern::Explosive)]
        );
    }

    #[test]
    fn test_fragment_cross_pattern() {
        let mut rng = StdRng::seed_from_u64(5);
        let parent = Bullet::boss(
            BulletKind::Explosive,
            Vec2::new(100.0, 100.0),
            (10.0, 20.0),
            Vec2::new(0.0, 3.0),
            Color::PURPLE,
        );
        let (bullets, particles) = fragment(&parent, &mut rng);
        assert_eq!(bullets.len(), FRAGMENT_COUNT);
        assert_eq!(particles.len(), FRAGMENT_BURST);
        for b in &bullets {
            assert_eq!(b.kind, BulletKind::Fragment);
            assert_eq!((b.width, b.height), (5.0, 10.0));
            assert_eq!(b.color, Color::PURPLE);
            // Diagonal: both components non-zero with equal magnitude
            assert!((b.vx.abs() - b.vy.abs()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_dispatch_tables() {
        assert_eq!(primary_pattern(1, 1), P::Straight);
        assert_eq!(primary_pattern(1, 2), P::Zigzag);
        assert_eq!(primary_pattern(2, 1), P::TidalWave);
        assert_eq!(primary_pattern(3, 3), P::Meteor);
        assert_eq!(primary_pattern(4, 2), P::Berserk);
        assert_eq!(primary_pattern(5, 2), P::Teleport);
        assert_eq!(primary_pattern(9, 1), P::Straight);
        assert_eq!(primary_pattern(0, 1), P::Straight);

        assert!(secondary_attack(1, 3).is_none());
        assert!(secondary_attack(3, 2).is_none());
        assert_eq!(secondary_attack(3, 3).unwrap().pattern, P::Explosive);
        assert_eq!(secondary_attack(5, 3).unwrap().pattern, P::Chaos);
        assert!(secondary_attack(6, 3).is_none());
    }

    #[test]
    fn test_multi_shot_uses_config_count() {
        let mut rng = StdRng::seed_from_u64(5);
        let o = AttackOrigin { multi_shot_count: 5, ..origin() };
        let volley = fire(P::MultiShot, &o, &mut rng);
        assert_eq!(volley.bullets.len(), 5);
        let single = AttackOrigin { multi_shot_count: 1, ..origin() };
        let volley = fire(P::MultiShot, &single, &mut rng);
        assert_eq!(volley.bullets.len(), 1);
        assert!(volley.bullets[0].vx.abs() < 1e-6);
    }
}
