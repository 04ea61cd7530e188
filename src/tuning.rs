//! Data-driven game balance
//!
//! Every gameplay-affecting constant lives here so tests can pin or zero
//! individual knobs (e.g. spawn probability) without touching the sim code.
//! Values are fixed for the duration of a run; nothing reads them back
//! mutably once the engine is ticking.

use serde::{Deserialize, Serialize};

/// Recognized balance options for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Width of the drivable road (pixels)
    pub road_width: f32,
    /// Number of equal-width lanes across the road
    pub lane_count: u32,
    /// Player car sprite size
    pub car_width: f32,
    pub car_height: f32,
    /// Obstacle sprite size
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    /// Speed at the start of a run
    pub base_speed: f32,
    /// Speed saturates here, however long the run goes
    pub max_speed: f32,
    /// Speed gained per second of elapsed run time (before scaling)
    pub speed_increment: f32,
    /// Multiplier applied to the time-driven speed ramp
    pub speed_scale: f32,
    /// Converts speed into distance accumulated per second
    pub distance_scale: f32,
    /// Score per unit of distance
    pub score_multiplier: f32,
    /// Per-tick Bernoulli probability of an obstacle spawn attempt
    pub spawn_rate: f32,
    /// Horizontal steering speed (pixels per second, independent of game speed)
    pub steer_speed: f32,
    /// Converts game speed into on-screen scroll (pixels per second)
    pub scroll_factor: f32,
    /// Gap kept between the car and the road edges when clamping
    pub side_margin: f32,
    /// A lane is blocked for spawning while an obstacle in it is still
    /// within this many pixels of the top of the playfield
    pub spawn_window: f32,
    /// Obstacles are dropped once this far below the bottom edge
    pub despawn_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            road_width: 500.0,
            lane_count: 3,
            car_width: 70.0,
            car_height: 120.0,
            obstacle_width: 70.0,
            obstacle_height: 120.0,
            base_speed: 5.0,
            max_speed: 18.0,
            speed_increment: 0.002,
            speed_scale: 10.0,
            distance_scale: 10.0,
            score_multiplier: 10.0,
            spawn_rate: 0.02,
            steer_speed: 400.0,
            scroll_factor: 60.0,
            side_margin: 10.0,
            spawn_window: 200.0,
            despawn_margin: 100.0,
        }
    }
}

impl Tuning {
    /// Width of a single lane
    #[inline]
    pub fn lane_width(&self) -> f32 {
        self.road_width / self.lane_count as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_width() {
        let tuning = Tuning::default();
        assert!((tuning.lane_width() - 500.0 / 3.0).abs() < 0.001);
    }

    #[test]
    fn test_speed_range_sane() {
        let tuning = Tuning::default();
        assert!(tuning.base_speed <= tuning.max_speed);
        assert!(tuning.spawn_rate >= 0.0 && tuning.spawn_rate <= 1.0);
    }
}
