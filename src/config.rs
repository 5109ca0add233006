use std::sync::OnceLock;

use crate::util::color::Color;

/// Configuration errors surfaced by `validate()`
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("boss level list is empty")]
    NoBossLevels,
    #[error("{levels} boss levels configured but only {profiles} boss profiles exist")]
    TooManyBossLevels { levels: usize, profiles: usize },
    #[error("boss levels must be strictly increasing")]
    UnorderedBossLevels,
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),
    #[error("min shot delay ({min} ms) exceeds max shot delay ({max} ms)")]
    ShotDelayRange { min: f64, max: f64 },
    #[error("screen size {width}x{height} is too small for a boss fight")]
    ScreenTooSmall { width: f32, height: f32 },
}

/// Per-boss identity and phase layout
#[derive(Debug, Clone, PartialEq)]
pub struct BossProfile {
    pub name: &'static str,
    pub color: Color,
    /// Sprite key the presentation layer resolves to an image
    pub image: &'static str,
    /// Number of HP-driven phases
    pub phases: u8,
}

/// Static boss tuning, loaded once.
///
/// Per-boss values scale with the boss number `n` (1-based), e.g.
/// `max_hp(n) = hp_base + (n - 1) * hp_increment`.
#[derive(Debug, Clone)]
pub struct BossConfig {
    /// HP of the first boss
    pub hp_base: u32,
    /// HP added per later boss
    pub hp_increment: u32,
    /// Sprite width of the first boss (pixels)
    pub width: f32,
    /// Sprite height of the first boss (pixels)
    pub height: f32,
    /// Fractional size growth per later boss
    pub size_growth: f32,
    /// Patrol speed of the first boss (pixels/frame)
    pub base_speed: f32,
    /// Patrol speed added per later boss
    pub speed_increment: f32,
    /// Shortest randomized delay between primary attacks (ms)
    pub min_shot_delay_ms: f64,
    /// Longest randomized delay between primary attacks (ms)
    pub max_shot_delay_ms: f64,
    /// Delay reduction per later boss (ms), floors at 40% of the range
    pub shot_delay_step_ms: f64,
    /// Boss bullet speed of the first boss (pixels/frame)
    pub bullet_speed: f32,
    /// Bullet speed added per later boss
    pub bullet_speed_increment: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
    /// Bullets in a multi-shot volley
    pub multi_shot_count: u32,
    /// Total multi-shot spread in degrees
    pub multi_shot_spread_deg: f32,
    /// Score awarded = base_score * boss_number * score_multiplier
    pub base_score: u32,
    pub score_multiplier: u32,
    /// Hits absorbed by the water shield before the boss takes damage
    pub shield_hits: u32,
    /// Levels that spawn a boss instead of an invader wave (index + 1 = boss number)
    pub boss_levels: Vec<u32>,
    pub profiles: Vec<BossProfile>,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            hp_base: 50,
            hp_increment: 25,
            width: 120.0,
            height: 80.0,
            size_growth: 0.08,
            base_speed: 1.5,
            speed_increment: 0.25,
            min_shot_delay_ms: 900.0,
            max_shot_delay_ms: 2200.0,
            shot_delay_step_ms: 100.0,
            bullet_speed: 4.0,
            bullet_speed_increment: 0.3,
            bullet_width: 8.0,
            bullet_height: 16.0,
            multi_shot_count: 3,
            multi_shot_spread_deg: 30.0,
            base_score: 1000,
            score_multiplier: 2,
            shield_hits: 5,
            boss_levels: vec![3, 6, 9, 12, 15],
            profiles: default_profiles(),
        }
    }
}

fn default_profiles() -> Vec<BossProfile> {
    vec![
        BossProfile { name: "Hydra Sentinel", color: Color::from_hex(0x33FF66), image: "boss1.png", phases: 2 },
        BossProfile { name: "Abyssal Leviathan", color: Color::from_hex(0x3399FF), image: "boss2.png", phases: 2 },
        BossProfile { name: "Inferno Titan", color: Color::from_hex(0xFF6622), image: "boss3.png", phases: 3 },
        BossProfile { name: "Crimson Berserker", color: Color::from_hex(0xFF2244), image: "boss4.png", phases: 3 },
        BossProfile { name: "Chrono Overlord", color: Color::from_hex(0xAA44FF), image: "boss5.png", phases: 3 },
    ]
}

static GLOBAL_BOSS_CONFIG: OnceLock<BossConfig> = OnceLock::new();

impl BossConfig {
    /// Process-wide config, read from the environment on first use
    pub fn global() -> &'static BossConfig {
        GLOBAL_BOSS_CONFIG.get_or_init(BossConfig::from_env)
    }

    /// Load config from `BOSS_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_parse::<u32>("BOSS_HP_BASE", |v| *v > 0) {
            config.hp_base = v;
        }
        if let Some(v) = env_parse::<u32>("BOSS_HP_INCREMENT", |_| true) {
            config.hp_increment = v;
        }
        if let Some(v) = env_parse::<u32>("BOSS_BASE_SCORE", |_| true) {
            config.base_score = v;
        }
        if let Some(v) = env_parse::<u32>("BOSS_SCORE_MULTIPLIER", |v| *v > 0) {
            config.score_multiplier = v;
        }
        if let Some(v) = env_parse::<f64>("BOSS_MIN_SHOT_DELAY_MS", |v| *v >= 100.0) {
            config.min_shot_delay_ms = v;
        }
        if let Some(v) = env_parse::<f64>("BOSS_MAX_SHOT_DELAY_MS", |v| *v >= 100.0) {
            config.max_shot_delay_ms = v;
        }
        if let Some(v) = env_parse::<f32>("BOSS_BULLET_SPEED", |v| *v > 0.0 && *v <= 30.0) {
            config.bullet_speed = v;
        }
        if let Some(v) = env_parse::<f32>("BOSS_SPEED", |v| *v > 0.0 && *v <= 30.0) {
            config.base_speed = v;
        }
        if let Some(v) = env_parse::<u32>("BOSS_SHIELD_HITS", |v| *v > 0 && *v <= 100) {
            config.shield_hits = v;
        }

        if let Ok(levels) = std::env::var("BOSS_LEVELS") {
            match parse_levels(&levels) {
                Some(parsed) => config.boss_levels = parsed,
                None => tracing::warn!("Invalid BOSS_LEVELS '{}', using default", levels),
            }
        }

        if let Err(e) = config.validate() {
            tracing::warn!("Boss config from environment is invalid ({}), using defaults", e);
            return Self::default();
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.boss_levels.is_empty() {
            return Err(ConfigError::NoBossLevels);
        }
        if self.boss_levels.len() > self.profiles.len() {
            return Err(ConfigError::TooManyBossLevels {
                levels: self.boss_levels.len(),
                profiles: self.profiles.len(),
            });
        }
        if self.boss_levels.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::UnorderedBossLevels);
        }
        if self.hp_base == 0 {
            return Err(ConfigError::NonPositive("hp_base"));
        }
        if self.bullet_speed <= 0.0 {
            return Err(ConfigError::NonPositive("bullet_speed"));
        }
        if self.bullet_width <= 0.0 || self.bullet_height <= 0.0 {
            return Err(ConfigError::NonPositive("bullet size"));
        }
        if self.multi_shot_count == 0 {
            return Err(ConfigError::NonPositive("multi_shot_count"));
        }
        if self.min_shot_delay_ms > self.max_shot_delay_ms {
            return Err(ConfigError::ShotDelayRange {
                min: self.min_shot_delay_ms,
                max: self.max_shot_delay_ms,
            });
        }
        Ok(())
    }

    /// Boss number (1-based) spawned on `level`, if any
    pub fn boss_number_for_level(&self, level: u32) -> Option<u8> {
        self.boss_levels
            .iter()
            .position(|&l| l == level)
            .map(|i| (i + 1) as u8)
    }

    pub fn profile(&self, boss_number: u8) -> Option<&BossProfile> {
        (boss_number as usize)
            .checked_sub(1)
            .and_then(|i| self.profiles.get(i))
    }

    #[inline]
    fn steps(boss_number: u8) -> u32 {
        boss_number.saturating_sub(1) as u32
    }

    pub fn max_hp(&self, boss_number: u8) -> u32 {
        self.hp_base + Self::steps(boss_number) * self.hp_increment
    }

    pub fn score(&self, boss_number: u8) -> u32 {
        self.base_score * boss_number as u32 * self.score_multiplier
    }

    /// Sprite (width, height) for a boss
    pub fn dimensions(&self, boss_number: u8) -> (f32, f32) {
        let scale = 1.0 + Self::steps(boss_number) as f32 * self.size_growth;
        (self.width * scale, self.height * scale)
    }

    pub fn speed(&self, boss_number: u8) -> f32 {
        self.base_speed + Self::steps(boss_number) as f32 * self.speed_increment
    }

    pub fn bullet_speed_for(&self, boss_number: u8) -> f32 {
        self.bullet_speed + Self::steps(boss_number) as f32 * self.bullet_speed_increment
    }

    /// Shot delay range `[min, max]` in ms for a boss; later bosses fire faster
    pub fn shot_delay_range(&self, boss_number: u8) -> (f64, f64) {
        let reduction = Self::steps(boss_number) as f64 * self.shot_delay_step_ms;
        let min = (self.min_shot_delay_ms - reduction).max(self.min_shot_delay_ms * 0.4);
        let max = (self.max_shot_delay_ms - reduction).max(self.max_shot_delay_ms * 0.4).max(min);
        (min, max)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, valid: impl Fn(&T) -> bool) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<T>() {
        Ok(parsed) if valid(&parsed) => Some(parsed),
        Ok(_) => {
            tracing::warn!("{} '{}' out of range, using default", key, raw);
            None
        }
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            None
        }
    }
}

fn parse_levels(raw: &str) -> Option<Vec<u32>> {
    let levels: Option<Vec<u32>> = raw
        .split(',')
        .map(|s| s.trim().parse::<u32>().ok())
        .collect();
    levels.filter(|l| !l.is_empty())
}

/// Headless simulator configuration (`boss-sim` binary)
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of independent fights per boss level (run in parallel)
    pub runs: usize,
    /// Base RNG seed; run `i` uses `seed + i`
    pub seed: u64,
    /// Frame cap per fight
    pub max_frames: u32,
    /// Frames between scripted player shots
    pub fire_interval: u32,
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            runs: 4,
            seed: 0xB055,
            max_frames: 60 * 60 * 5,
            fire_interval: 12,
            screen_width: 800.0,
            screen_height: 600.0,
        }
    }
}

impl SimConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_parse::<usize>("SIM_RUNS", |v| *v > 0 && *v <= 10_000) {
            config.runs = v;
        }
        if let Some(v) = env_parse::<u64>("SIM_SEED", |_| true) {
            config.seed = v;
        }
        if let Some(v) = env_parse::<u32>("SIM_MAX_FRAMES", |v| *v > 0) {
            config.max_frames = v;
        }
        if let Some(v) = env_parse::<u32>("SIM_FIRE_INTERVAL", |v| *v > 0) {
            config.fire_interval = v;
        }
        if let Some(v) = env_parse::<f32>("SCREEN_WIDTH", |v| *v > 0.0) {
            config.screen_width = v;
        }
        if let Some(v) = env_parse::<f32>("SCREEN_HEIGHT", |v| *v > 0.0) {
            config.screen_height = v;
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runs == 0 {
            return Err(ConfigError::NonPositive("runs"));
        }
        if self.screen_width < 320.0 || self.screen_height < 240.0 {
            return Err(ConfigError::ScreenTooSmall {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        Ok(())
    }
}
