/// Frame timing. `update(delta_time)` takes frame-relative units where
/// 1.0 is one frame at the target rate.
pub mod timing {
    /// Target frame rate the game is tuned for
    pub const TARGET_FPS: f64 = 60.0;
    /// Milliseconds per frame-relative unit
    pub const FRAME_MS: f64 = 1000.0 / TARGET_FPS;
    /// Largest delta accepted per update (frames); longer stalls are clamped
    pub const MAX_DELTA: f32 = 4.0;
}

/// Play-field constants
pub mod screen {
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;
    /// Bullets beyond the screen expanded by this margin are culled
    pub const CULL_MARGIN: f32 = 50.0;
}

/// Boss movement and lifecycle constants
pub mod boss {
    /// Vertical descent speed while appearing (pixels/frame)
    pub const APPEAR_SPEED: f32 = 2.0;
    /// Resting height of the boss's top edge
    pub const BASE_Y: f32 = 80.0;
    /// Amplitude of the vertical bob (pixels)
    pub const BOB_AMPLITUDE: f32 = 10.0;
    /// Bob angular frequency (radians per ms)
    pub const BOB_FREQUENCY: f64 = 0.002;
    /// Distance kept from the screen edges while patrolling
    pub const EDGE_PADDING: f32 = 10.0;
    /// Duration of the hit flash / `Damaged` sub-state (ms)
    pub const DAMAGE_FLASH_MS: f64 = 80.0;
    /// Movement speed factor while flashing
    pub const DAMAGED_SPEED_FACTOR: f32 = 0.6;
    /// Attack pause when a new phase begins (ms)
    pub const PHASE_TRANSITION_MS: f64 = 1200.0;
    /// Shrink/fade duration of the death animation (ms)
    pub const DEATH_DURATION_MS: f64 = 2000.0;
    /// Interval between explosion bursts while dying (ms)
    pub const DEATH_EXPLOSION_INTERVAL_MS: f64 = 150.0;
    /// Undrained encounter events kept for the host
    pub const MAX_PENDING_EVENTS: usize = 256;
}

/// Attack pattern constants
pub mod attack {
    /// Tidal wave fan size
    pub const FAN_BULLETS: usize = 7;
    /// Total fan spread in degrees
    pub const FAN_SPREAD_DEG: f32 = 172.0;
    /// Delay between consecutive fan bullets (ms)
    pub const WAVE_STAGGER_MS: f64 = 200.0;
    pub const CIRCULAR_BULLETS: usize = 8;
    pub const CIRCULAR_SPEED_MULTIPLIER: f32 = 0.8;
    pub const EXPLOSIVE_BULLETS: usize = 5;
    pub const EXPLOSIVE_FUSE_MIN_MS: f32 = 2000.0;
    pub const EXPLOSIVE_FUSE_MAX_MS: f32 = 3000.0;
    pub const BERSERK_BULLETS: usize = 12;
    pub const SPIRAL_BULLETS: usize = 6;
    /// Spiral arm rotation (radians per ms of encounter clock)
    pub const SPIRAL_ROTATION_RATE: f64 = 0.003;
    pub const GRAVITY_BULLETS: usize = 16;
    /// Ring radius of the first gravity bullet (pixels)
    pub const GRAVITY_RING_BASE: f32 = 20.0;
    /// Ring radius added per gravity bullet index
    pub const GRAVITY_RING_STEP: f32 = 4.0;
    /// Delay between a teleport and its chained attack (ms)
    pub const TELEPORT_FOLLOW_UP_MS: f64 = 400.0;
    /// Stagger between chaos combo stages (ms)
    pub const CHAOS_STAGGER_MS: f64 = 500.0;
    /// Initial horizontal speed of zigzag bullets (pixels/frame)
    pub const ZIGZAG_SEED_VX: f32 = 2.0;
    /// Frames between zigzag direction flips
    pub const ZIGZAG_FLIP_FRAMES: f32 = 20.0;
    /// Meteor size relative to a normal bullet
    pub const METEOR_SIZE_FACTOR: f32 = 3.0;
    pub const METEOR_SPEED_MULTIPLIER: f32 = 1.2;
    /// Tidal wave bullets are larger than normal ones
    pub const WAVE_SIZE_FACTOR: f32 = 1.5;
    pub const FRAGMENT_COUNT: usize = 4;
    /// Maximum positions kept in a bullet trail
    pub const TRAIL_LENGTH: usize = 8;
}

/// Signature ability constants
pub mod ability {
    pub const REGEN_COOLDOWN_MIN_MS: f64 = 5000.0;
    pub const REGEN_COOLDOWN_MAX_MS: f64 = 10000.0;
    /// Fraction of max HP restored per regeneration
    pub const REGEN_FRACTION: f32 = 0.1;

    /// Time before a broken water shield recharges (ms)
    pub const SHIELD_RECHARGE_MS: f64 = 8000.0;

    pub const METEOR_SHOWER_COOLDOWN_MIN_MS: f64 = 10000.0;
    pub const METEOR_SHOWER_COOLDOWN_MAX_MS: f64 = 14000.0;
    pub const METEOR_SHOWER_MIN_COUNT: usize = 8;
    pub const METEOR_SHOWER_MAX_COUNT: usize = 12;
    /// Warning countdown before a shower meteor drops (ms)
    pub const METEOR_WARNING_MS: f64 = 1500.0;
    /// Shower meteors fall slower than attack meteors
    pub const METEOR_SHOWER_SPEED_FACTOR: f32 = 0.6;
    /// Distance of warning markers above the bottom edge
    pub const METEOR_WARNING_OFFSET: f32 = 30.0;

    /// Delay from the start of the fight to the first rage (ms)
    pub const RAGE_FIRST_TRIGGER_MS: f64 = 8000.0;
    pub const RAGE_COOLDOWN_MIN_MS: f64 = 10000.0;
    pub const RAGE_COOLDOWN_MAX_MS: f64 = 15000.0;
    pub const RAGE_DURATION_MIN_MS: f64 = 6000.0;
    pub const RAGE_DURATION_MAX_MS: f64 = 9000.0;
    /// Speed, bullet speed and fire-rate multiplier while raging
    pub const RAGE_MULTIPLIER: f32 = 1.55;

    pub const FREEZE_COOLDOWN_MIN_MS: f64 = 12000.0;
    pub const FREEZE_COOLDOWN_MAX_MS: f64 = 18000.0;
    /// Retry delay when there is nothing to freeze (ms)
    pub const FREEZE_RETRY_MS: f64 = 1000.0;
    pub const FREEZE_DURATION_MS: f64 = 3000.0;
}

/// Cosmetic particle constants
pub mod particles {
    /// Hard cap on live particles; oldest are dropped first
    pub const MAX_PARTICLES: usize = 600;
    /// Velocity damping per frame
    pub const DRAG: f32 = 0.96;
    pub const HIT_BURST: usize = 6;
    pub const LANDING_BURST: usize = 20;
    pub const HEAL_BURST: usize = 16;
    pub const SHIELD_RING: usize = 24;
    pub const SHIELD_BREAK_BURST: usize = 30;
    pub const TELEPORT_BURST: usize = 14;
    pub const PHASE_RING: usize = 32;
    pub const FRAGMENT_BURST: usize = 10;
    pub const DEATH_BURST: usize = 8;
    pub const FINAL_EXPLOSION: usize = 60;
    pub const RAGE_BURST: usize = 20;
    pub const FREEZE_BURST: usize = 24;
}

/// Presentation-only constants
pub mod effects {
    /// Frames a full-screen flash stays visible
    pub const SCREEN_FLASH_FRAMES: u32 = 8;
    /// Screen flash duration recorded in the simulation (ms)
    pub const FLASH_MS: f64 = 150.0;
    /// Warning marker blink period (ms)
    pub const WARNING_BLINK_MS: f64 = 200.0;
    pub const HEALTH_BAR_WIDTH: f32 = 400.0;
    pub const HEALTH_BAR_HEIGHT: f32 = 14.0;
    /// Temporal freeze clock motifs, distance from each screen corner
    pub const FREEZE_CORNER_INSET: f32 = 40.0;
    pub const FREEZE_CORNER_RADIUS: f32 = 18.0;
}
