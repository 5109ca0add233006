//! Invaders Boss Engine
//!
//! Boss encounters for a Space-Invaders style arcade game: a per-level boss
//! with HP-driven phases, a signature ability, table-driven bullet patterns
//! and timed visual effects, updated frame by frame by the host game.
//!
//! # Features
//!
//! - `render` - `DrawContext` trait, boss renderer and a recording context (enabled by default)

pub mod config;
pub mod game;
pub mod util;

#[cfg(feature = "render")]
pub mod render;

pub use config::{BossConfig, ConfigError, SimConfig};
pub use game::encounter::{BossEncounter, RenderSnapshot};
pub use game::events::EncounterEvent;
pub use game::state::{Boss, BossState, BossStatus, Bullet};
pub use game::systems::collision::BossCollisionReport;
