//! Encounter data model
//!
//! Plain records for the boss, bullets, particles, warning markers and
//! screen effects. Behavior lives in `game::systems` and `game::encounter`.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::game::constants::{ability, attack, boss as boss_consts};
use crate::util::color::Color;
use crate::util::geometry::{Rect, Vec2};

/// Bullet identifier, unique per owner
pub type BulletId = u64;

/// Which side a bullet hurts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Boss,
    Player,
}

/// Bullet classification used for motion rules and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletKind {
    Straight,
    Zigzag,
    Wave,
    Large,
    Circular,
    Explosive,
    Meteor,
    Berserk,
    Spiral,
    Gravity,
    Fragment,
    ShieldBreak,
    Player,
}

impl BulletKind {
    /// Kinds that record a trail for motion streaks
    pub fn has_trail(&self) -> bool {
        matches!(
            self,
            BulletKind::Meteor
                | BulletKind::Explosive
                | BulletKind::Spiral
                | BulletKind::Berserk
                | BulletKind::Gravity
                | BulletKind::Large
        )
    }
}

/// Pattern-specific bullet state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BulletBehavior {
    Plain,
    /// Horizontal direction flips every `ZIGZAG_FLIP_FRAMES` of `counter`
    Zigzag { pattern: u8, counter: f32 },
    /// Explodes into fragments when the fuse runs out
    Fuse { timer_ms: f32 },
    /// Staggered fan bullet; `wave_time_ms` is its spawn delay
    Wave { wave_time_ms: f64 },
}

/// Bounded history of recent positions, newest last. Render-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    points: SmallVec<[Vec2; attack::TRAIL_LENGTH]>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position, dropping the oldest once full
    pub fn push(&mut self, point: Vec2) {
        if self.points.len() == attack::TRAIL_LENGTH {
            self.points.remove(0);
        }
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

/// A projectile, owned by exactly one side
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub id: BulletId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Color,
    pub kind: BulletKind,
    pub owner: Owner,
    pub trail: Option<Trail>,
    pub behavior: BulletBehavior,
}

impl Bullet {
    /// Boss bullet centred on `center`. The id is assigned when the
    /// encounter takes ownership.
    pub fn boss(kind: BulletKind, center: Vec2, size: (f32, f32), velocity: Vec2, color: Color) -> Self {
        let (width, height) = size;
        Self {
            id: 0,
            x: center.x - width * 0.5,
            y: center.y - height * 0.5,
            width,
            height,
            vx: velocity.x,
            vy: velocity.y,
            color,
            kind,
            owner: Owner::Boss,
            trail: kind.has_trail().then(Trail::new),
            behavior: BulletBehavior::Plain,
        }
    }

    /// Player bullet as produced by the host game
    pub fn player(id: BulletId, x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Self {
            id,
            x,
            y,
            width: 4.0,
            height: 12.0,
            vx,
            vy,
            color: Color::WHITE,
            kind: BulletKind::Player,
            owner: Owner::Player,
            trail: None,
            behavior: BulletBehavior::Plain,
        }
    }

    pub fn with_behavior(mut self, behavior: BulletBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.vx, self.vy)
    }

    #[inline]
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.vx = velocity.x;
        self.vy = velocity.y;
    }
}

/// Cosmetic particle categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Spark,
    Explosion,
    Heal,
    Shield,
    Teleport,
    Landing,
    Phase,
    Rage,
    Freeze,
    Clone,
}

/// Purely visual; never collides or scores
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Color,
    pub size: f32,
    /// Remaining life in frames
    pub life: f32,
    pub max_life: f32,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, color: Color, size: f32, life: f32, kind: ParticleKind) -> Self {
        Self {
            x: position.x,
            y: position.y,
            vx: velocity.x,
            vy: velocity.y,
            color,
            size,
            life,
            max_life: life,
            kind,
        }
    }

    /// Fade factor in `[0, 1]`
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}

/// Full-screen timed visuals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenEffectKind {
    Flash,
    TemporalFreeze,
    Rage,
    PhaseShift,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenEffect {
    /// Monotonic id so renderers can detect new effects
    pub id: u64,
    pub kind: ScreenEffectKind,
    pub color: Color,
    pub started_at: f64,
    pub duration_ms: f64,
}

impl ScreenEffect {
    /// Elapsed fraction in `[0, 1]`
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (((now - self.started_at) / self.duration_ms) as f32).clamp(0.0, 1.0)
    }

    pub fn is_active(&self, now: f64) -> bool {
        now - self.started_at < self.duration_ms
    }
}

/// Meteor shower target marker shown before impact
#[derive(Debug, Clone, PartialEq)]
pub struct WarningMarker {
    pub x: f32,
    pub y: f32,
    pub created_at: f64,
    pub countdown_ms: f64,
}

impl WarningMarker {
    pub fn remaining_ms(&self, now: f64) -> f64 {
        (self.created_at + self.countdown_ms - now).max(0.0)
    }

    pub fn is_due(&self, now: f64) -> bool {
        now - self.created_at >= self.countdown_ms
    }
}

/// Boss lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossState {
    Appearing,
    Fighting,
    /// Hit flash; reverts to `Fighting` after `DAMAGE_FLASH_MS`
    Damaged,
    /// Invulnerable attack pause while a new phase begins
    PhaseTransition,
    Dying,
    Dead,
}

impl BossState {
    /// States in which the boss moves, shoots and runs abilities
    pub fn is_engaged(&self) -> bool {
        matches!(
            self,
            BossState::Fighting | BossState::Damaged | BossState::PhaseTransition
        )
    }

    /// Boss is still on the field and its bullets can hurt the player
    pub fn is_alive(&self) -> bool {
        !matches!(self, BossState::Dying | BossState::Dead)
    }

    /// Whether player damage lands. The phase transition window is
    /// invulnerable.
    pub fn is_vulnerable(&self) -> bool {
        !matches!(self, BossState::PhaseTransition | BossState::Dying | BossState::Dead)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BossState::Appearing => "appearing",
            BossState::Fighting => "fighting",
            BossState::Damaged => "damaged",
            BossState::PhaseTransition => "phase_transition",
            BossState::Dying => "dying",
            BossState::Dead => "dead",
        }
    }
}

/// Per-boss signature ability state
#[derive(Debug, Clone, PartialEq)]
pub enum BossAbility {
    Regeneration {
        next_heal_at: f64,
    },
    WaterShield {
        shield_hp: u32,
        max_shield_hp: u32,
        broken_at: Option<f64>,
    },
    MeteorShower {
        next_shower_at: f64,
    },
    RageMode {
        active: bool,
        ends_at: f64,
        next_rage_at: f64,
    },
    TemporalFreeze {
        active: bool,
        ends_at: f64,
        next_freeze_at: f64,
        /// Original velocity of every captured player bullet
        frozen: HashMap<BulletId, Vec2>,
    },
}

impl BossAbility {
    /// Fresh, unarmed ability for a boss number. Timers are armed when the
    /// boss finishes appearing.
    pub fn for_boss(boss_number: u8, shield_hits: u32) -> Self {
        match boss_number {
            2 => BossAbility::WaterShield {
                shield_hp: shield_hits,
                max_shield_hp: shield_hits,
                broken_at: None,
            },
            3 => BossAbility::MeteorShower { next_shower_at: f64::INFINITY },
            4 => BossAbility::RageMode {
                active: false,
                ends_at: 0.0,
                next_rage_at: f64::INFINITY,
            },
            5 => BossAbility::TemporalFreeze {
                active: false,
                ends_at: 0.0,
                next_freeze_at: f64::INFINITY,
                frozen: HashMap::new(),
            },
            _ => BossAbility::Regeneration { next_heal_at: f64::INFINITY },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BossAbility::Regeneration { .. } => "regeneration",
            BossAbility::WaterShield { .. } => "water_shield",
            BossAbility::MeteorShower { .. } => "meteor_shower",
            BossAbility::RageMode { .. } => "rage_mode",
            BossAbility::TemporalFreeze { .. } => "temporal_freeze",
        }
    }

    pub fn is_raging(&self) -> bool {
        matches!(self, BossAbility::RageMode { active: true, .. })
    }

    /// Speed, bullet speed and fire-rate multiplier from rage
    pub fn rage_multiplier(&self) -> f32 {
        if self.is_raging() {
            ability::RAGE_MULTIPLIER
        } else {
            1.0
        }
    }

    /// Remaining shield hits, if this boss has a shield
    pub fn shield_hp(&self) -> Option<u32> {
        match self {
            BossAbility::WaterShield { shield_hp, .. } => Some(*shield_hp),
            _ => None,
        }
    }
}

/// The single live boss
#[derive(Debug, Clone)]
pub struct Boss {
    /// Encounter generation this boss belongs to
    pub generation: u64,
    pub boss_number: u8,
    pub name: &'static str,
    pub color: Color,
    pub image: &'static str,

    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub base_y: f32,
    /// Horizontal patrol direction (+1 right, -1 left)
    pub direction: f32,
    /// Current patrol speed (base speed times rage multiplier)
    pub speed: f32,
    pub base_speed: f32,
    /// External slowdown factor and when it wears off
    pub slow_factor: f32,
    pub slow_until: f64,

    pub current_hp: u32,
    pub max_hp: u32,
    pub state: BossState,
    pub current_phase: u8,
    pub phase_count: u8,
    pub ability: BossAbility,

    pub spawned_at: f64,
    /// When the boss landed and started fighting
    pub engaged_at: f64,
    pub last_shot_time: f64,
    pub next_shot_delay: f64,
    pub last_secondary_time: f64,
    pub damage_flash_time: f64,
    pub phase_transition_start: f64,
    pub death_start_time: f64,
    pub last_death_explosion: f64,

    /// Render scale/alpha (appearing ramps up, dying ramps down)
    pub scale: f32,
    pub alpha: f32,
}

impl Boss {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    /// Bottom edge, where bullets are emitted
    #[inline]
    pub fn feet_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn hp_percentage(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.current_hp as f32 / self.max_hp as f32 * 100.0
    }

    /// Hit-flash intensity, 1 right after a hit and 0 after `DAMAGE_FLASH_MS`
    pub fn damage_flash_alpha(&self, now: f64) -> f32 {
        let elapsed = now - self.damage_flash_time;
        if !(0.0..boss_consts::DAMAGE_FLASH_MS).contains(&elapsed) {
            return 0.0;
        }
        (1.0 - elapsed / boss_consts::DAMAGE_FLASH_MS) as f32
    }

    /// Phase implied by the current HP fraction: with `N` phases, phase `k`
    /// begins once `hp / max_hp <= 1 - (k - 1) / N`.
    pub fn phase_for_hp(&self) -> u8 {
        if self.max_hp == 0 || self.phase_count <= 1 {
            return 1;
        }
        // Integer form of hp / max <= (n - (k - 1)) / n
        let hp = self.current_hp as u64;
        let max = self.max_hp as u64;
        let n = self.phase_count as u64;
        let mut phase = 1;
        for k in 2..=self.phase_count {
            if hp * n <= max * (n - (k as u64 - 1)) {
                phase = k;
            }
        }
        phase
    }

    /// Slow-down multiplier currently applied to movement
    pub fn slow_multiplier(&self, now: f64) -> f32 {
        if now < self.slow_until {
            self.slow_factor
        } else {
            1.0
        }
    }
}

/// UI-facing boss summary (health bar, name banner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossStatus {
    pub name: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub hp_percentage: f32,
    pub state: BossState,
    pub boss_number: u8,
    pub phase: u8,
    pub shield_hp: Option<u32>,
    pub raging: bool,
}

impl From<&Boss> for BossStatus {
    fn from(boss: &Boss) -> Self {
        Self {
            name: boss.name.to_string(),
            current_hp: boss.current_hp,
            max_hp: boss.max_hp,
            hp_percentage: boss.hp_percentage(),
            state: boss.state,
            boss_number: boss.boss_number,
            phase: boss.current_phase,
            shield_hp: boss.ability.shield_hp(),
            raging: boss.ability.is_raging(),
        }
    }
}
