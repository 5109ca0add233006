//! Bullet motion and off-screen culling
//!
//! Boss bullets run their pattern behaviour (zigzag flips, explosive fuses)
//! before moving; player bullets only move. Both are culled once they leave
//! the screen expanded by `CULL_MARGIN`.

use rand::Rng;

use crate::game::constants::attack::ZIGZAG_FLIP_FRAMES;
use crate::game::constants::screen::CULL_MARGIN;
use crate::game::constants::timing::FRAME_MS;
use crate::game::state::{Bullet, BulletBehavior, Particle};
use crate::game::systems::attacks;
use crate::util::geometry::{Rect, Vec2};

/// Explosives that went off this tick
#[derive(Debug, Default)]
pub struct Detonations {
    /// Fragment bullets to add (ids not yet assigned)
    pub fragments: Vec<Bullet>,
    pub particles: Vec<Particle>,
    /// Where each explosive burst
    pub positions: Vec<Vec2>,
}

/// Advance boss bullets by `dt` frames. Explosives whose fuse ran out are
/// removed and replaced by fragments.
pub fn update_boss_bullets<R: Rng + ?Sized>(bullets: &mut Vec<Bullet>, dt: f32, rng: &mut R) -> Detonations {
    let mut out = Detonations::default();
    let fuse_step = (dt as f64 * FRAME_MS) as f32;

    bullets.retain_mut(|bullet| {
        match &mut bullet.behavior {
            BulletBehavior::Zigzag { counter, .. } => {
                *counter += dt;
                while *counter >= ZIGZAG_FLIP_FRAMES {
                    *counter -= ZIGZAG_FLIP_FRAMES;
                    bullet.vx = -bullet.vx;
                }
            }
            BulletBehavior::Fuse { timer_ms } => {
                *timer_ms -= fuse_step;
                if *timer_ms <= 0.0 {
                    let (fragments, particles) = attacks::fragment(bullet, rng);
                    out.positions.push(bullet.center());
                    out.fragments.extend(fragments);
                    out.particles.extend(particles);
                    return false;
                }
            }
            BulletBehavior::Plain | BulletBehavior::Wave { .. } => {}
        }

        let center = bullet.center();
        if let Some(trail) = bullet.trail.as_mut() {
            trail.push(center);
        }
        bullet.x += bullet.vx * dt;
        bullet.y += bullet.vy * dt;
        true
    });

    out
}

/// Advance player bullets by `dt` frames
pub fn update_player_bullets(bullets: &mut [Bullet], dt: f32) {
    for bullet in bullets.iter_mut() {
        bullet.x += bullet.vx * dt;
        bullet.y += bullet.vy * dt;
    }
}

/// Drop bullets fully outside the screen plus margin. Returns how many
/// were removed.
pub fn cull_offscreen(bullets: &mut Vec<Bullet>, screen: Rect) -> usize {
    let bounds = screen.expanded(CULL_MARGIN);
    let before = bullets.len();
    bullets.retain(|b| b.rect().intersects(&bounds));
    before - bullets.len()
}
