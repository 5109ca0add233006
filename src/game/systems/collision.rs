//! AABB collision between the boss, its bullets and the player's side

use serde::Serialize;

use crate::game::state::{Bullet, BulletId};
use crate::util::geometry::Rect;

/// Result of one boss-vs-player-bullets pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BossCollisionReport {
    /// Player bullets the host must remove
    pub bullets_to_remove: Vec<BulletId>,
    /// The hit reduced the boss to zero HP
    pub boss_killed: bool,
    /// Score awarded by this pass
    pub score_gained: u32,
}

/// First player bullet overlapping the boss. Only one hit registers per pass.
pub fn first_hit(boss_rect: &Rect, player_bullets: &[Bullet]) -> Option<BulletId> {
    player_bullets
        .iter()
        .find(|b| b.rect().intersects(boss_rect))
        .map(|b| b.id)
}

/// Remove every boss bullet overlapping the player; returns how many hit
pub fn strike_player(boss_bullets: &mut Vec<Bullet>, player: &Rect) -> usize {
    let before = boss_bullets.len();
    boss_bullets.retain(|b| !b.rect().intersects(player));
    before - boss_bullets.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::BulletKind;
    use crate::util::color::Color;
    use crate::util::geometry::Vec2;

    #[test]
    fn test_first_hit_only() {
        let boss = Rect::new(100.0, 100.0, 120.0, 80.0);
        let bullets = vec![
            Bullet::player(1, 0.0, 0.0, 0.0, -7.0),
            Bullet::player(2, 150.0, 150.0, 0.0, -7.0),
            Bullet::player(3, 160.0, 150.0, 0.0, -7.0),
        ];
        assert_eq!(first_hit(&boss, &bullets), Some(2));
        assert_eq!(first_hit(&boss, &bullets[..1]), None);
    }

    #[test]
    fn test_touching_edge_is_not_a_hit() {
        let boss = Rect::new(100.0, 100.0, 120.0, 80.0);
        let bullets = vec![Bullet::player(1, 96.0, 120.0, 0.0, -7.0)];
        assert_eq!(first_hit(&boss, &bullets), None);
    }

    #[test]
    fn test_strike_player_removes_all_overlapping() {
        let player = Rect::new(380.0, 540.0, 40.0, 30.0);
        let mut bullets = vec![
            Bullet::boss(BulletKind::Straight, Vec2::new(390.0, 550.0), (8.0, 16.0), Vec2::ZERO, Color::RED),
            Bullet::boss(BulletKind::Straight, Vec2::new(410.0, 560.0), (8.0, 16.0), Vec2::ZERO, Color::RED),
            Bullet::boss(BulletKind::Straight, Vec2::new(100.0, 100.0), (8.0, 16.0), Vec2::ZERO, Color::RED),
        ];
        assert_eq!(strike_player(&mut bullets, &player), 2);
        assert_eq!(bullets.len(), 1);
        assert_eq!(strike_player(&mut bullets, &player), 0);
    }
}
