//! Cosmetic particle bursts and their per-frame motion
//!
//! Particles never take part in collision or scoring. Bursts are plain
//! functions returning new particles so attack and ability generators can
//! hand them back to the encounter alongside their bullets.

use rand::Rng;
use std::f32::consts::TAU;

use crate::game::constants::particles::{DRAG, MAX_PARTICLES};
use crate::game::state::{Particle, ParticleKind};
use crate::util::color::Color;
use crate::util::geometry::Vec2;

/// Shape parameters for a burst
#[derive(Debug, Clone, Copy)]
pub struct BurstStyle {
    pub kind: ParticleKind,
    pub color: Color,
    /// Speed range in pixels/frame
    pub speed: (f32, f32),
    /// Lifetime range in frames
    pub life: (f32, f32),
    /// Size range in pixels
    pub size: (f32, f32),
}

impl BurstStyle {
    pub fn new(kind: ParticleKind, color: Color) -> Self {
        Self {
            kind,
            color,
            speed: (1.0, 4.0),
            life: (20.0, 40.0),
            size: (2.0, 4.0),
        }
    }

    pub fn speed(mut self, min: f32, max: f32) -> Self {
        self.speed = (min, max);
        self
    }

    pub fn life(mut self, min: f32, max: f32) -> Self {
        self.life = (min, max);
        self
    }

    pub fn size(mut self, min: f32, max: f32) -> Self {
        self.size = (min, max);
        self
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, (min, max): (f32, f32)) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Particles flying out in random directions from `center`
pub fn burst<R: Rng + ?Sized>(rng: &mut R, center: Vec2, count: usize, style: BurstStyle) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let speed = sample(rng, style.speed);
            Particle::new(
                center,
                Vec2::from_angle(angle) * speed,
                style.color,
                sample(rng, style.size),
                sample(rng, style.life),
                style.kind,
            )
        })
        .collect()
}

/// Evenly spaced ring of particles moving outward from `center`
pub fn ring<R: Rng + ?Sized>(rng: &mut R, center: Vec2, count: usize, radius: f32, style: BurstStyle) -> Vec<Particle> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count.max(1) as f32 * TAU;
            let dir = Vec2::from_angle(angle);
            Particle::new(
                center + dir * radius,
                dir * sample(rng, style.speed),
                style.color,
                sample(rng, style.size),
                sample(rng, style.life),
                style.kind,
            )
        })
        .collect()
}

/// Advance particles by `dt` frames and drop expired ones
pub fn update(particles: &mut Vec<Particle>, dt: f32) {
    let drag = DRAG.powf(dt);
    for p in particles.iter_mut() {
        p.x += p.vx * dt;
        p.y += p.vy * dt;
        p.vx *= drag;
        p.vy *= drag;
        p.life -= dt;
    }
    particles.retain(|p| !p.is_expired());
}

/// Append new particles, evicting the oldest past `MAX_PARTICLES`
pub fn push_capped(particles: &mut Vec<Particle>, new: Vec<Particle>) {
    particles.extend(new);
    if particles.len() > MAX_PARTICLES {
        let excess = particles.len() - MAX_PARTICLES;
        particles.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_burst_count_and_style() {
        let mut rng = StdRng::seed_from_u64(1);
        let style = BurstStyle::new(ParticleKind::Spark, Color::RED).life(10.0, 20.0);
        let particles = burst(&mut rng, Vec2::new(5.0, 5.0), 12, style);
        assert_eq!(particles.len(), 12);
        for p in &particles {
            assert_eq!(p.color, Color::RED);
            assert!(p.life >= 10.0 && p.life < 20.0);
            assert_eq!(p.life, p.max_life);
        }
    }

    #[test]
    fn test_ring_starts_on_radius() {
        let mut rng = StdRng::seed_from_u64(2);
        let style = BurstStyle::new(ParticleKind::Shield, Color::CYAN);
        let particles = ring(&mut rng, Vec2::ZERO, 8, 30.0, style);
        for p in &particles {
            let r = Vec2::new(p.x, p.y).length();
            assert!((r - 30.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_update_expires_particles() {
        let mut particles = vec![
            Particle::new(Vec2::ZERO, Vec2::new(1.0, 0.0), Color::WHITE, 2.0, 1.5, ParticleKind::Spark),
            Particle::new(Vec2::ZERO, Vec2::new(1.0, 0.0), Color::WHITE, 2.0, 10.0, ParticleKind::Spark),
        ];
        update(&mut particles, 1.0);
        assert_eq!(particles.len(), 2);
        assert_eq!(particles[0].x, 1.0);
        update(&mut particles, 1.0);
        assert_eq!(particles.len(), 1);
    }

    #[test]
    fn test_push_capped_drops_oldest() {
        let mut rng = StdRng::seed_from_u64(3);
        let style = BurstStyle::new(ParticleKind::Spark, Color::WHITE);
        let mut particles = burst(&mut rng, Vec2::ZERO, MAX_PARTICLES, style);
        let marker = Particle::new(Vec2::new(999.0, 999.0), Vec2::ZERO, Color::RED, 1.0, 5.0, ParticleKind::Heal);
        push_capped(&mut particles, vec![marker.clone()]);
        assert_eq!(particles.len(), MAX_PARTICLES);
        assert_eq!(particles.last(), Some(&marker));
    }
}
