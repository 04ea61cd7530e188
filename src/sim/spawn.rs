//! Obstacle spawning policy
//!
//! Each tick rolls one Bernoulli trial against the configured spawn rate.
//! A successful roll picks a uniformly random lane; the attempt is rejected
//! silently when another obstacle in that lane is still too close to the top
//! of the playfield. Rejection is an expected policy outcome, not an error,
//! and there is no same-tick retry.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Obstacle};
use crate::tuning::Tuning;

/// Horizontal origin of an obstacle centered in the given lane
#[inline]
pub fn lane_origin_x(road_left: f32, tuning: &Tuning, lane: u32) -> f32 {
    let lane_width = tuning.lane_width();
    road_left + lane as f32 * lane_width + (lane_width - tuning.obstacle_width) / 2.0
}

/// Roll the per-tick spawn trial and push a new obstacle if it lands.
///
/// Returns the id of the spawned obstacle, or `None` when the trial failed
/// or the lane was blocked.
pub fn maybe_spawn(
    state: &mut GameState,
    rng: &mut impl Rng,
    tuning: &Tuning,
) -> Option<u32> {
    if rng.random::<f32>() >= tuning.spawn_rate {
        return None;
    }

    let lane = rng.random_range(0..tuning.lane_count);

    // Lane-exclusion invariant: never stack a second obstacle on one that
    // has not yet cleared the spawn window.
    let blocked = state
        .obstacles
        .iter()
        .any(|obs| obs.lane == lane && obs.pos.y < tuning.spawn_window);
    if blocked {
        return None;
    }

    let id = state.next_obstacle_id();
    let x = lane_origin_x(state.road_left(tuning), tuning, lane);
    state.obstacles.push(Obstacle {
        id,
        lane,
        pos: Vec2::new(x, -tuning.obstacle_height),
        width: tuning.obstacle_width,
        height: tuning.obstacle_height,
        hue: crate::hue_from_id(id),
    });
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Playfield;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn always_spawn_tuning() -> Tuning {
        Tuning {
            spawn_rate: 1.0,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_spawn_starts_above_playfield() {
        let tuning = always_spawn_tuning();
        let mut state = GameState::new(&tuning, Playfield::new(800.0, 600.0));
        let mut rng = Pcg32::seed_from_u64(7);

        let id = maybe_spawn(&mut state, &mut rng, &tuning).expect("forced spawn");
        let obs = &state.obstacles[0];
        assert_eq!(obs.id, id);
        assert!((obs.pos.y + tuning.obstacle_height).abs() < 0.001);
        assert!(obs.lane < tuning.lane_count);
    }

    #[test]
    fn test_spawn_centers_obstacle_in_lane() {
        let tuning = always_spawn_tuning();
        let road_left = (800.0 - tuning.road_width) / 2.0;
        let lane_width = tuning.lane_width();
        for lane in 0..tuning.lane_count {
            let x = lane_origin_x(road_left, &tuning, lane);
            let lane_left = road_left + lane as f32 * lane_width;
            assert!(x >= lane_left);
            assert!(x + tuning.obstacle_width <= lane_left + lane_width + 0.001);
        }
    }

    #[test]
    fn test_blocked_lane_rejects_silently() {
        let tuning = always_spawn_tuning();
        let mut state = GameState::new(&tuning, Playfield::new(800.0, 600.0));
        let mut rng = Pcg32::seed_from_u64(7);

        // Fill every lane with an obstacle still inside the spawn window
        for lane in 0..tuning.lane_count {
            let id = state.next_obstacle_id();
            let x = lane_origin_x(state.road_left(&tuning), &tuning, lane);
            state.obstacles.push(Obstacle {
                id,
                lane,
                pos: Vec2::new(x, 50.0),
                width: tuning.obstacle_width,
                height: tuning.obstacle_height,
                hue: 0.0,
            });
        }

        let before = state.obstacles.len();
        assert_eq!(maybe_spawn(&mut state, &mut rng, &tuning), None);
        assert_eq!(state.obstacles.len(), before);
    }

    #[test]
    fn test_lane_exclusion_holds_after_many_spawns() {
        let tuning = always_spawn_tuning();
        let mut state = GameState::new(&tuning, Playfield::new(800.0, 600.0));
        let mut rng = Pcg32::seed_from_u64(1234);

        for _ in 0..500 {
            maybe_spawn(&mut state, &mut rng, &tuning);
            for a in &state.obstacles {
                for b in &state.obstacles {
                    if a.id != b.id && a.lane == b.lane {
                        assert!(
                            (a.pos.y - b.pos.y).abs() >= tuning.spawn_window,
                            "two obstacles stacked in lane {}",
                            a.lane
                        );
                    }
                }
            }
            // Scroll a little so lanes free up over time
            for obs in &mut state.obstacles {
                obs.pos.y += 30.0;
            }
            state.obstacles.retain(|o| o.pos.y < 700.0);
        }
    }

    #[test]
    fn test_zero_rate_never_spawns() {
        let tuning = Tuning {
            spawn_rate: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(&tuning, Playfield::new(800.0, 600.0));
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..1000 {
            assert_eq!(maybe_spawn(&mut state, &mut rng, &tuning), None);
        }
    }
}
