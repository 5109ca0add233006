//! Presentation layer
//!
//! Draws a [`RenderSnapshot`] through a canvas-like [`DrawContext`]. The
//! renderer never touches simulation state; the only state it keeps is its
//! own screen-flash countdown.

pub mod recording;

use crate::game::constants::effects::{
    FREEZE_CORNER_INSET, FREEZE_CORNER_RADIUS, HEALTH_BAR_HEIGHT, HEALTH_BAR_WIDTH, SCREEN_FLASH_FRAMES,
    WARNING_BLINK_MS,
};
use crate::game::encounter::RenderSnapshot;
use crate::game::state::{Boss, BossAbility, BossState, Bullet, BulletKind, ScreenEffect, ScreenEffectKind};
use crate::util::color::Color;
use crate::util::geometry::{Rect, Vec2};

pub use recording::{DrawCommand, RecordingContext};

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Minimal immediate-mode drawing surface
pub trait DrawContext {
    fn save(&mut self);
    fn restore(&mut self);
    /// Global alpha for subsequent calls until the next `restore`
    fn set_alpha(&mut self, alpha: f32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
    fn text(&mut self, text: &str, at: Vec2, size: f32, color: Color, align: TextAlign);
    /// Draw a sprite. Returns `false` if the image is not available.
    fn draw_image(&mut self, key: &str, rect: Rect) -> bool;
}

/// Drawn in place of a missing boss sprite
const PLACEHOLDER_GLYPH: &str = "\u{1F47E}";
const BANNER_TEXT_SIZE: f32 = 18.0;
const WARNING_RADIUS: f32 = 14.0;

/// Draws the boss fight
#[derive(Debug, Default)]
pub struct BossRenderer {
    /// Frames left on the full-screen flash
    flash_frames: u32,
    /// Newest screen effect already reacted to
    last_seen_effect_id: u64,
}

impl BossRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flash_frames(&self) -> u32 {
        self.flash_frames
    }

    /// Draw one frame
    pub fn render<C: DrawContext + ?Sized>(&mut self, snapshot: &RenderSnapshot<'_>, ctx: &mut C) {
        self.observe_effects(snapshot.screen_effects);

        if let Some(boss) = snapshot.boss {
            draw_boss(boss, snapshot.now, ctx);
            if boss.state != BossState::Dead {
                draw_health_bar(boss, snapshot.screen, ctx);
            }
        }
        for bullet in snapshot.boss_bullets {
            draw_bullet(bullet, ctx);
        }
        draw_particles(snapshot, ctx);
        draw_warnings(snapshot, ctx);
        draw_overlays(snapshot, ctx);
        self.draw_flash(snapshot.screen, ctx);
    }

    fn observe_effects(&mut self, effects: &[ScreenEffect]) {
        let seen = self.last_seen_effect_id;
        for effect in effects.iter().filter(|e| e.id > seen) {
            if effect.kind == ScreenEffectKind::Flash {
                self.flash_frames = SCREEN_FLASH_FRAMES;
            }
            self.last_seen_effect_id = effect.id;
        }
    }

    fn draw_flash<C: DrawContext + ?Sized>(&mut self, screen: Rect, ctx: &mut C) {
        if self.flash_frames == 0 {
            return;
        }
        ctx.save();
        ctx.set_alpha(self.flash_frames as f32 / SCREEN_FLASH_FRAMES as f32 * 0.6);
        ctx.fill_rect(screen, Color::WHITE);
        ctx.restore();
        self.flash_frames -= 1;
    }
}

fn draw_boss<C: DrawContext + ?Sized>(boss: &Boss, now: f64, ctx: &mut C) {
    if boss.alpha <= 0.0 || boss.scale <= 0.0 {
        return;
    }
    let rect = boss.rect();
    let center = rect.center();
    let (w, h) = (rect.width * boss.scale, rect.height * boss.scale);
    let drawn = Rect::new(center.x - w * 0.5, center.y - h * 0.5, w, h);

    ctx.save();
    ctx.set_alpha(boss.alpha);

    if !ctx.draw_image(boss.image, drawn) {
        ctx.fill_rect(drawn, boss.color);
        ctx.stroke_rect(drawn, Color::WHITE, 2.0);
        ctx.text(PLACEHOLDER_GLYPH, center, h * 0.5, Color::WHITE, TextAlign::Center);
    }

    let flash = boss.damage_flash_alpha(now);
    if flash > 0.0 {
        ctx.set_alpha(boss.alpha * flash * 0.8);
        ctx.fill_rect(drawn, Color::WHITE);
        ctx.set_alpha(boss.alpha);
    }

    match &boss.ability {
        BossAbility::WaterShield { shield_hp, max_shield_hp, .. } if *shield_hp > 0 => {
            let strength = *shield_hp as f32 / (*max_shield_hp).max(1) as f32;
            ctx.set_alpha(boss.alpha * (0.3 + 0.5 * strength));
            ctx.stroke_circle(center, w.max(h) * 0.65, Color::CYAN, 3.0);
        }
        BossAbility::RageMode { active: true, .. } => {
            let pulse = 0.5 + 0.5 * ((now * 0.01).sin() as f32);
            ctx.set_alpha(boss.alpha * (0.4 + 0.4 * pulse));
            ctx.stroke_rect(drawn.expanded(4.0), Color::RED, 3.0);
        }
        _ => {}
    }

    ctx.restore();
}

fn health_color(fraction: f32) -> Color {
    if fraction > 0.5 {
        Color::GREEN
    } else if fraction > 0.25 {
        Color::YELLOW
    } else {
        Color::RED
    }
}

fn draw_health_bar<C: DrawContext + ?Sized>(boss: &Boss, screen: Rect, ctx: &mut C) {
    let fraction = if boss.max_hp == 0 {
        0.0
    } else {
        boss.current_hp as f32 / boss.max_hp as f32
    };
    let width = HEALTH_BAR_WIDTH.min(screen.width - 20.0);
    let frame = Rect::new(
        screen.center().x - width * 0.5,
        screen.y + 30.0,
        width,
        HEALTH_BAR_HEIGHT,
    );

    ctx.save();
    ctx.fill_rect(frame, Color::BLACK);
    ctx.fill_rect(
        Rect::new(frame.x, frame.y, frame.width * fraction, frame.height),
        health_color(fraction),
    );
    ctx.stroke_rect(frame, Color::WHITE, 1.0);

    let banner_at = Vec2::new(frame.center().x, frame.y - 8.0);
    ctx.text(boss.name, banner_at, BANNER_TEXT_SIZE, boss.color, TextAlign::Center);

    if boss.phase_count > 1 {
        let label = format!("PHASE {}/{}", boss.current_phase, boss.phase_count);
        ctx.text(&label, Vec2::new(frame.right(), frame.bottom() + 14.0), 12.0, Color::WHITE, TextAlign::Right);
    }
    if let Some(shield) = boss.ability.shield_hp().filter(|hp| *hp > 0) {
        let label = format!("SHIELD {}", shield);
        ctx.text(&label, Vec2::new(frame.x, frame.bottom() + 14.0), 12.0, Color::CYAN, TextAlign::Left);
    }
    ctx.restore();
}

fn draw_bullet<C: DrawContext + ?Sized>(bullet: &Bullet, ctx: &mut C) {
    let radius = bullet.width.min(bullet.height) * 0.5;

    if let Some(trail) = bullet.trail.as_ref().filter(|t| !t.is_empty()) {
        let len = trail.len() as f32;
        ctx.save();
        for (i, point) in trail.iter().enumerate() {
            let t = (i + 1) as f32 / len;
            ctx.set_alpha(t * 0.5);
            ctx.fill_circle(*point, radius * t, bullet.color);
        }
        ctx.restore();
    }

    match bullet.kind {
        BulletKind::Meteor | BulletKind::Explosive | BulletKind::Gravity | BulletKind::Large => {
            ctx.fill_circle(bullet.center(), radius.max(bullet.width * 0.5), bullet.color);
        }
        BulletKind::Circular | BulletKind::Berserk | BulletKind::Spiral | BulletKind::Fragment => {
            ctx.fill_circle(bullet.center(), radius, bullet.color);
        }
        BulletKind::ShieldBreak => {
            ctx.fill_circle(bullet.center(), radius, bullet.color);
            ctx.stroke_circle(bullet.center(), radius + 2.0, Color::CYAN, 1.5);
        }
        BulletKind::Straight | BulletKind::Zigzag | BulletKind::Wave | BulletKind::Player => {
            ctx.fill_rect(bullet.rect(), bullet.color);
        }
    }
}

fn draw_particles<C: DrawContext + ?Sized>(snapshot: &RenderSnapshot<'_>, ctx: &mut C) {
    if snapshot.particles.is_empty() {
        return;
    }
    ctx.save();
    for p in snapshot.particles {
        ctx.set_alpha(p.alpha());
        ctx.fill_circle(Vec2::new(p.x, p.y), p.size, p.color);
    }
    ctx.restore();
}

/// Warnings blink on and off every `WARNING_BLINK_MS`
fn warning_visible(elapsed_ms: f64) -> bool {
    (elapsed_ms / WARNING_BLINK_MS) as u64 % 2 == 0
}

fn draw_warnings<C: DrawContext + ?Sized>(snapshot: &RenderSnapshot<'_>, ctx: &mut C) {
    for marker in snapshot.warnings {
        if !warning_visible(snapshot.now - marker.created_at) {
            continue;
        }
        let at = Vec2::new(marker.x, marker.y);
        // Faint drop path from the top of the screen
        ctx.save();
        ctx.set_alpha(0.3);
        ctx.line(Vec2::new(at.x, snapshot.screen.y), Vec2::new(at.x, at.y - WARNING_RADIUS), Color::RED, 1.0);
        ctx.restore();
        ctx.stroke_circle(at, WARNING_RADIUS, Color::RED, 2.0);
        ctx.text("!", at, 16.0, Color::RED, TextAlign::Center);
        let seconds = marker.remaining_ms(snapshot.now) / 1000.0;
        ctx.text(
            &format!("{:.1}", seconds),
            Vec2::new(at.x, at.y + WARNING_RADIUS + 12.0),
            10.0,
            Color::WHITE,
            TextAlign::Center,
        );
    }
}

/// Stopped clock in each corner of the screen
fn draw_freeze_corners<C: DrawContext + ?Sized>(screen: Rect, color: Color, ctx: &mut C) {
    let inset = FREEZE_CORNER_INSET;
    let corners = [
        Vec2::new(screen.x + inset, screen.y + inset),
        Vec2::new(screen.right() - inset, screen.y + inset),
        Vec2::new(screen.x + inset, screen.bottom() - inset),
        Vec2::new(screen.right() - inset, screen.bottom() - inset),
    ];
    for center in corners {
        ctx.stroke_circle(center, FREEZE_CORNER_RADIUS, color, 2.0);
        ctx.line(center, Vec2::new(center.x, center.y - FREEZE_CORNER_RADIUS * 0.7), color, 2.0);
        ctx.line(center, Vec2::new(center.x + FREEZE_CORNER_RADIUS * 0.5, center.y), color, 2.0);
    }
}

fn draw_overlays<C: DrawContext + ?Sized>(snapshot: &RenderSnapshot<'_>, ctx: &mut C) {
    let screen = snapshot.screen;
    for effect in snapshot.screen_effects.iter().filter(|e| e.is_active(snapshot.now)) {
        let fade = 1.0 - effect.progress(snapshot.now);
        ctx.save();
        match effect.kind {
            ScreenEffectKind::TemporalFreeze => {
                ctx.set_alpha(0.15 + 0.1 * fade);
                ctx.fill_rect(screen, effect.color);
                ctx.set_alpha(1.0);
                draw_freeze_corners(screen, effect.color, ctx);
                ctx.text(
                    "TIME FROZEN",
                    Vec2::new(screen.center().x, screen.center().y),
                    28.0,
                    effect.color,
                    TextAlign::Center,
                );
            }
            ScreenEffectKind::PhaseShift => {
                ctx.set_alpha(fade);
                ctx.stroke_rect(screen, effect.color, 8.0);
                ctx.text(
                    "PHASE SHIFT",
                    Vec2::new(screen.center().x, screen.y + 90.0),
                    24.0,
                    effect.color,
                    TextAlign::Center,
                );
            }
            ScreenEffectKind::Rage => {
                ctx.set_alpha(0.25);
                ctx.stroke_rect(screen, effect.color, 12.0);
            }
            // Handled by the renderer's own countdown
            ScreenEffectKind::Flash => {}
        }
        ctx.restore();
    }
}
