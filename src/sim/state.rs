//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run started yet
    Idle,
    /// Active gameplay
    Running,
    /// Run frozen mid-flight, render keeps showing the last frame
    Paused,
    /// Run ended on a collision
    Over,
}

/// The player's car
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Player {
    /// Visual sprite bounds
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Inset rectangle used for collision testing
    pub fn hitbox(&self) -> Rect {
        self.rect().hitbox()
    }
}

/// A single oncoming obstacle
///
/// `x` is fixed at spawn time; only `y` advances. The hue is decorative and
/// never feeds back into gameplay.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub lane: u32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub hue: f32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn hitbox(&self) -> Rect {
        self.rect().hitbox()
    }
}

/// Live run statistics, exposed read-only to the HUD after every tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunStats {
    /// Elapsed run time (seconds)
    pub time: f32,
    /// Accumulated distance
    pub distance: f32,
    /// Current speed, within `[base_speed, max_speed]`
    pub speed: f32,
    /// `floor(distance * score_multiplier)`, non-decreasing within a run
    pub score: u64,
}

/// Playfield bounds in CSS pixels, updated on window resize
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub player: Player,
    /// Active obstacles in spawn order (stable for deterministic replay)
    pub obstacles: Vec<Obstacle>,
    pub stats: RunStats,
    pub bounds: Playfield,
    /// Cosmetic scroll offset for the lane-divider dashes
    pub road_offset: f32,
    /// Cosmetic background hue (degrees)
    pub hue_cycle: f32,
    next_id: u32,
}

impl GameState {
    /// Create state for a fresh engine. No run is active until `reset_run`.
    pub fn new(tuning: &Tuning, bounds: Playfield) -> Self {
        let mut state = Self {
            phase: GamePhase::Idle,
            player: Player {
                pos: Vec2::ZERO,
                width: tuning.car_width,
                height: tuning.car_height,
            },
            obstacles: Vec::new(),
            stats: RunStats::default(),
            bounds,
            road_offset: 0.0,
            hue_cycle: 0.0,
            next_id: 1,
        };
        state.place_player(tuning);
        state
    }

    /// Left edge of the road, centered in the playfield
    #[inline]
    pub fn road_left(&self, tuning: &Tuning) -> f32 {
        (self.bounds.width - tuning.road_width) / 2.0
    }

    /// Reset everything a new run needs: clear obstacles, zero the stats,
    /// park the car at the horizontal center.
    pub fn reset_run(&mut self, tuning: &Tuning) {
        self.obstacles.clear();
        self.stats = RunStats {
            time: 0.0,
            distance: 0.0,
            speed: tuning.base_speed,
            score: 0,
        };
        self.road_offset = 0.0;
        self.hue_cycle = 0.0;
        self.place_player(tuning);
    }

    /// Resize the playfield. The horizontal clamp picks up the new bounds on
    /// the next tick; the car's bottom anchor moves immediately.
    pub fn set_bounds(&mut self, bounds: Playfield) {
        self.bounds = bounds;
        self.player.pos.y = bounds.height - self.player.height - CAR_BOTTOM_OFFSET;
    }

    /// Allocate a new obstacle id
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn place_player(&mut self, tuning: &Tuning) {
        self.player.pos = Vec2::new(
            self.bounds.width / 2.0 - tuning.car_width / 2.0,
            self.bounds.height - tuning.car_height - CAR_BOTTOM_OFFSET,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_and_centered() {
        let tuning = Tuning::default();
        let state = GameState::new(&tuning, Playfield::new(800.0, 600.0));
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.obstacles.is_empty());
        assert!((state.player.pos.x - (400.0 - 35.0)).abs() < 0.001);
        assert!((state.player.pos.y - (600.0 - 120.0 - 50.0)).abs() < 0.001);
    }

    #[test]
    fn test_reset_run_clears_previous_run() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning, Playfield::new(800.0, 600.0));
        state.stats.score = 42;
        state.stats.time = 9.0;
        let id = state.next_obstacle_id();
        state.obstacles.push(Obstacle {
            id,
            lane: 0,
            pos: Vec2::new(0.0, 0.0),
            width: tuning.obstacle_width,
            height: tuning.obstacle_height,
            hue: 0.0,
        });

        state.reset_run(&tuning);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.stats.speed, tuning.base_speed);
    }

    #[test]
    fn test_set_bounds_moves_bottom_anchor() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning, Playfield::new(800.0, 600.0));
        state.set_bounds(Playfield::new(1024.0, 768.0));
        assert!((state.player.pos.y - (768.0 - 120.0 - 50.0)).abs() < 0.001);
    }
}
