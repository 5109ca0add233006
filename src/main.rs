//! Headless boss fight simulator
//!
//! Runs scripted fights against every configured boss level, in parallel
//! across seeds, and prints a JSON summary.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use invaders_boss_engine::render::{BossRenderer, RecordingContext};
use invaders_boss_engine::util::geometry::Rect;
use invaders_boss_engine::{BossConfig, BossEncounter, Bullet, SimConfig};

/// Scripted player geometry and behaviour
const PLAYER_WIDTH: f32 = 40.0;
const PLAYER_HEIGHT: f32 = 24.0;
const PLAYER_SPEED: f32 = 5.0;
const PLAYER_BULLET_SPEED: f32 = 8.0;

#[derive(Debug, Serialize)]
struct FightSummary {
    level: u32,
    boss_number: u8,
    boss_name: String,
    seed: u64,
    defeated: bool,
    frames: u32,
    shots_fired: u32,
    boss_hits: u32,
    hits_taken: u32,
    score: u32,
    peak_boss_bullets: usize,
    draw_commands: usize,
}

#[derive(Debug, Serialize)]
struct LevelSummary {
    level: u32,
    boss_number: u8,
    runs: usize,
    defeated: usize,
    mean_frames_to_kill: Option<f64>,
    mean_hits_taken: f64,
}

#[derive(Debug, Serialize)]
struct SimReport {
    levels: Vec<LevelSummary>,
    fights: Vec<FightSummary>,
}

/// Fight one boss with a player that tracks the boss and fires on a fixed cadence
fn run_fight(config: &BossConfig, sim: &SimConfig, level: u32, seed: u64) -> Option<FightSummary> {
    let screen = Rect::new(0.0, 0.0, sim.screen_width, sim.screen_height);
    let mut encounter = BossEncounter::new(config.clone(), screen, seed);
    let boss = encounter.create_boss(level)?;
    let boss_number = boss.boss_number;
    let boss_name = boss.name.to_string();

    let images = config.profiles.iter().map(|p| p.image);
    let mut ctx = RecordingContext::with_images(images);
    let mut renderer = BossRenderer::new();

    let mut player = Rect::new(
        screen.center().x - PLAYER_WIDTH * 0.5,
        screen.bottom() - PLAYER_HEIGHT - 20.0,
        PLAYER_WIDTH,
        PLAYER_HEIGHT,
    );
    let mut bullets: Vec<Bullet> = Vec::new();
    let mut next_bullet_id = 0;

    let mut summary = FightSummary {
        level,
        boss_number,
        boss_name,
        seed,
        defeated: false,
        frames: 0,
        shots_fired: 0,
        boss_hits: 0,
        hits_taken: 0,
        score: 0,
        peak_boss_bullets: 0,
        draw_commands: 0,
    };

    while summary.frames < sim.max_frames {
        summary.frames += 1;

        if let Some(boss) = encounter.boss() {
            let dx = boss.center_x() - player.center().x;
            player.x += dx.clamp(-PLAYER_SPEED, PLAYER_SPEED);
            player.x = player.x.clamp(screen.x, screen.right() - player.width);
        }
        if summary.frames % sim.fire_interval == 0 {
            next_bullet_id += 1;
            let x = player.center().x - 2.0;
            bullets.push(Bullet::player(next_bullet_id, x, player.y - 12.0, 0.0, -PLAYER_BULLET_SPEED));
            summary.shots_fired += 1;
        }

        encounter.update(1.0, &mut bullets);

        let report = encounter.check_boss_collisions(&bullets);
        if !report.bullets_to_remove.is_empty() {
            bullets.retain(|b| !report.bullets_to_remove.contains(&b.id));
            summary.boss_hits += 1;
        }
        summary.score += report.score_gained;
        if encounter.check_boss_bullets_collision(&player) {
            summary.hits_taken += 1;
        }
        summary.peak_boss_bullets = summary.peak_boss_bullets.max(encounter.boss_bullets().len());

        renderer.render(&encounter.snapshot(), &mut ctx);
        summary.draw_commands += ctx.commands().len();
        ctx.clear();

        for event in encounter.drain_events() {
            debug!(seed, ?event, "Encounter event");
        }

        if !encounter.has_boss() {
            summary.defeated = true;
            break;
        }
    }

    if !summary.defeated {
        warn!(level, seed, frames = summary.frames, "Fight hit the frame cap");
    }
    Some(summary)
}

fn summarize(level: u32, fights: &[&FightSummary]) -> Option<LevelSummary> {
    let first = fights.first()?;
    let kills: Vec<_> = fights.iter().filter(|f| f.defeated).collect();
    let mean_frames_to_kill = if kills.is_empty() {
        None
    } else {
        Some(kills.iter().map(|f| f.frames as f64).sum::<f64>() / kills.len() as f64)
    };
    Some(LevelSummary {
        level,
        boss_number: first.boss_number,
        runs: fights.len(),
        defeated: kills.len(),
        mean_frames_to_kill,
        mean_hits_taken: fights.iter().map(|f| f.hits_taken as f64).sum::<f64>() / fights.len() as f64,
    })
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    info!("Boss simulator v{}", env!("CARGO_PKG_VERSION"));

    let sim = SimConfig::load_or_default();
    sim.validate()?;
    let config = BossConfig::global();
    config.validate()?;
    info!(
        runs = sim.runs,
        seed = sim.seed,
        levels = ?config.boss_levels,
        "Simulation configured"
    );

    let jobs: Vec<(u32, u64)> = config
        .boss_levels
        .iter()
        .flat_map(|&level| (0..sim.runs as u64).map(move |i| (level, sim.seed.wrapping_add(i))))
        .collect();

    let fights: Vec<FightSummary> = jobs
        .par_iter()
        .filter_map(|&(level, seed)| run_fight(config, &sim, level, seed))
        .collect();

    let levels = config
        .boss_levels
        .iter()
        .filter_map(|&level| {
            let runs: Vec<_> = fights.iter().filter(|f| f.level == level).collect();
            summarize(level, &runs)
        })
        .collect();

    let report = SimReport { levels, fights };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
