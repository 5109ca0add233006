//! Encounter events for the host game (audio cues, logging, score popups)

use serde::Serialize;

/// Something the host may want to react to. Drained with
/// `BossEncounter::drain_events`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EncounterEvent {
    /// Boss entered the screen
    BossSpawned { boss_number: u8, name: String, max_hp: u32 },
    /// Boss finished descending and started fighting
    BossEngaged { boss_number: u8 },
    /// HP crossed a phase threshold
    PhaseChanged { boss_number: u8, phase: u8 },
    /// A primary or secondary attack fired
    AttackFired { pattern: &'static str, bullets: usize },
    /// A signature ability triggered
    AbilityTriggered { ability: &'static str },
    /// A timed ability ended (rage, freeze)
    AbilityEnded { ability: &'static str },
    /// Water shield absorbed a hit
    ShieldAbsorbed { remaining: u32 },
    /// Water shield broke and retaliated
    ShieldBroken,
    /// Boss HP reached zero; the death animation starts
    BossKilled { boss_number: u8, score: u32 },
    /// Death animation finished and the boss is gone
    BossDestroyed { boss_number: u8 },
    /// Boss bullets hit the player
    PlayerHit { bullets: usize },
    /// An explosive bullet detonated
    BulletDetonated { x: f32, y: f32 },
}
