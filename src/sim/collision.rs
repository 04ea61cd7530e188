//! Axis-aligned collision testing
//!
//! Gameplay collisions use rectangles inset from the visual sprite bounds,
//! so a graze that looks clean on screen does not end the run.

use super::state::Obstacle;
use crate::consts::*;

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict AABB overlap test. Touching edges do not count as overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Shrink by the gameplay hitbox insets
    pub fn hitbox(&self) -> Rect {
        Rect::new(
            self.x + HITBOX_INSET_X,
            self.y + HITBOX_INSET_TOP,
            self.w - 2.0 * HITBOX_INSET_X,
            self.h - (HITBOX_INSET_TOP + HITBOX_INSET_BOTTOM),
        )
    }
}

/// Test the player hitbox against every active obstacle, in spawn order.
///
/// Returns the id of the first obstacle hit, if any.
pub fn first_collision(player_hitbox: Rect, obstacles: &[Obstacle]) -> Option<u32> {
    obstacles
        .iter()
        .find(|obs| player_hitbox.overlaps(&obs.hitbox()))
        .map(|obs| obs.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn obstacle(id: u32, x: f32, y: f32) -> Obstacle {
        Obstacle {
            id,
            lane: 0,
            pos: Vec2::new(x, y),
            width: 70.0,
            height: 120.0,
            hue: 0.0,
        }
    }

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 20.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_hitbox_is_inset() {
        let sprite = Rect::new(100.0, 200.0, 70.0, 120.0);
        let hb = sprite.hitbox();
        assert!((hb.x - 108.0).abs() < 0.001);
        assert!((hb.y - 210.0).abs() < 0.001);
        assert!((hb.w - 54.0).abs() < 0.001);
        assert!((hb.h - 105.0).abs() < 0.001);
    }

    #[test]
    fn test_first_collision_respects_insets() {
        // Sprites graze by a few pixels but the inset hitboxes stay apart
        let player = Rect::new(100.0, 400.0, 70.0, 120.0).hitbox();
        let near_miss = obstacle(1, 100.0 - 70.0 + 10.0, 400.0);
        assert_eq!(first_collision(player, &[near_miss]), None);

        let hit = obstacle(2, 100.0, 350.0);
        assert_eq!(first_collision(player, &[hit]), Some(2));
    }

    #[test]
    fn test_first_collision_reports_earliest_spawn() {
        let player = Rect::new(100.0, 400.0, 70.0, 120.0).hitbox();
        let obstacles = vec![obstacle(7, 100.0, 390.0), obstacle(3, 100.0, 400.0)];
        assert_eq!(first_collision(player, &obstacles), Some(7));
    }
}
