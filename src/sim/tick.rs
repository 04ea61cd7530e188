//! Per-frame simulation update
//!
//! One call advances the run by a single variable-length timestep. The
//! caller (the engine) owns timestamp bookkeeping and delta clamping; this
//! function only ever sees a sanitized `dt >= 0`.

use rand::Rng;

use super::collision::first_collision;
use super::spawn::maybe_spawn;
use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::tuning::Tuning;

/// Movement intents sampled at the start of a tick (last-write-wins)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// Outcome of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Not in the `Running` phase; nothing was mutated
    Skipped,
    /// State advanced normally
    Advanced,
    /// The player hit an obstacle this tick; phase is now `Over`
    Collided,
}

/// Advance the run by `dt` seconds.
///
/// Update order: steering, obstacle scroll and despawn, spawn trial, stats,
/// collision test. Holding both intents cancels out to no net movement.
pub fn tick(
    state: &mut GameState,
    rng: &mut impl Rng,
    input: &TickInput,
    dt: f32,
    tuning: &Tuning,
) -> TickStatus {
    if state.phase != GamePhase::Running {
        return TickStatus::Skipped;
    }

    // Cosmetic cycles. These never feed back into gameplay.
    state.hue_cycle = (state.hue_cycle + dt * HUE_CYCLE_RATE) % 360.0;
    state.road_offset += state.stats.speed * tuning.scroll_factor * dt;
    if state.road_offset > ROAD_DASH_PERIOD {
        state.road_offset = 0.0;
    }

    // Steering at a fixed linear speed, independent of the game speed ramp
    let steer = tuning.steer_speed * dt;
    if input.left {
        state.player.pos.x -= steer;
    }
    if input.right {
        state.player.pos.x += steer;
    }
    let road_left = state.road_left(tuning);
    let min_x = road_left + tuning.side_margin;
    let max_x = road_left + tuning.road_width - tuning.car_width - tuning.side_margin;
    state.player.pos.x = state.player.pos.x.max(min_x).min(max_x);

    // Scroll obstacles at the speed in effect when the tick started, then
    // drop everything past the bottom margin
    let fall = state.stats.speed * tuning.scroll_factor * dt;
    for obs in &mut state.obstacles {
        obs.pos.y += fall;
    }
    let cutoff = state.bounds.height + tuning.despawn_margin;
    state.obstacles.retain(|obs| obs.pos.y < cutoff);

    let _ = maybe_spawn(state, rng, tuning);

    // Difficulty ramp and derived stats
    state.stats.time += dt;
    state.stats.speed = (tuning.base_speed
        + state.stats.time * tuning.speed_increment * tuning.speed_scale)
        .min(tuning.max_speed);
    state.stats.distance += state.stats.speed * dt * tuning.distance_scale;
    state.stats.score = (state.stats.distance * tuning.score_multiplier).floor() as u64;

    if let Some(id) = first_collision(state.player.hitbox(), &state.obstacles) {
        log::debug!(
            "collision with obstacle {id} at t={:.2}s, score {}",
            state.stats.time,
            state.stats.score
        );
        state.phase = GamePhase::Over;
        return TickStatus::Collided;
    }

    TickStatus::Advanced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, Playfield};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn quiet_tuning() -> Tuning {
        Tuning {
            spawn_rate: 0.0,
            ..Tuning::default()
        }
    }

    fn running_state(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(tuning, Playfield::new(800.0, 600.0));
        state.reset_run(tuning);
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_tick_noop_outside_running() {
        let tuning = quiet_tuning();
        let mut rng = Pcg32::seed_from_u64(1);
        for phase in [GamePhase::Idle, GamePhase::Paused, GamePhase::Over] {
            let mut state = running_state(&tuning);
            state.phase = phase;
            let before = state.stats;
            let status = tick(&mut state, &mut rng, &TickInput::default(), 0.1, &tuning);
            assert_eq!(status, TickStatus::Skipped);
            assert_eq!(state.stats, before);
            assert_eq!(state.phase, phase);
        }
    }

    #[test]
    fn test_reference_accumulation_run() {
        // dt=0.1s for 100 ticks: time ~= 10s, speed = min(18, 5 + 10*0.002*10)
        let tuning = quiet_tuning();
        let mut state = running_state(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);

        let mut expected_time = 0.0f32;
        let mut expected_distance = 0.0f32;
        for _ in 0..100 {
            let status = tick(&mut state, &mut rng, &TickInput::default(), 0.1, &tuning);
            assert_eq!(status, TickStatus::Advanced);
            expected_time += 0.1;
            let expected_speed =
                (5.0 + expected_time * 0.002 * 10.0).min(tuning.max_speed);
            expected_distance += expected_speed * 0.1 * 10.0;
            assert!((state.stats.speed - expected_speed).abs() < 1e-4);
        }

        assert!((state.stats.time - 10.0).abs() < 1e-3);
        assert!((state.stats.speed - 5.2).abs() < 1e-4);
        assert!((state.stats.distance - expected_distance).abs() < 1e-2);
        assert_eq!(
            state.stats.score,
            (expected_distance * 10.0).floor() as u64
        );
    }

    #[test]
    fn test_speed_monotonic_and_capped() {
        let tuning = quiet_tuning();
        let mut state = running_state(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);

        let mut last_speed = state.stats.speed;
        // Long enough to saturate: ramp hits 18 after 650 simulated seconds
        for _ in 0..7000 {
            tick(&mut state, &mut rng, &TickInput::default(), 0.1, &tuning);
            assert!(state.stats.speed >= last_speed);
            assert!(state.stats.speed <= tuning.max_speed);
            last_speed = state.stats.speed;
        }
        assert!((state.stats.speed - tuning.max_speed).abs() < 1e-4);
    }

    #[test]
    fn test_right_clamp_holds() {
        let tuning = quiet_tuning();
        let mut state = running_state(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);

        let input = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..100 {
            tick(&mut state, &mut rng, &input, 0.1, &tuning);
        }
        let road_left = state.road_left(&tuning);
        let max_x = road_left + tuning.road_width - tuning.car_width - tuning.side_margin;
        assert!((state.player.pos.x - max_x).abs() < 1e-3);

        // Already clamped: ten more ticks change nothing
        for _ in 0..10 {
            tick(&mut state, &mut rng, &input, 0.1, &tuning);
            assert!((state.player.pos.x - max_x).abs() < 1e-3);
        }
    }

    #[test]
    fn test_opposed_intents_cancel() {
        let tuning = quiet_tuning();
        let mut state = running_state(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);

        let x0 = state.player.pos.x;
        let input = TickInput {
            left: true,
            right: true,
        };
        for _ in 0..20 {
            tick(&mut state, &mut rng, &input, 0.1, &tuning);
        }
        assert!((state.player.pos.x - x0).abs() < 1e-4);
    }

    #[test]
    fn test_obstacle_despawns_past_bottom_margin() {
        let tuning = quiet_tuning();
        let mut state = running_state(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);

        // Spawned in a lane the centered car does not occupy
        let id = state.next_obstacle_id();
        state.obstacles.push(Obstacle {
            id,
            lane: 0,
            pos: Vec2::new(160.0, -tuning.obstacle_height),
            width: tuning.obstacle_width,
            height: tuning.obstacle_height,
            hue: 0.0,
        });

        // Scroll until well past bounds.height + despawn margin
        for _ in 0..1000 {
            tick(&mut state, &mut rng, &TickInput::default(), 0.1, &tuning);
            if state.obstacles.is_empty() {
                break;
            }
            assert!(state.obstacles[0].pos.y < state.bounds.height + tuning.despawn_margin);
        }
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_collision_freezes_run() {
        let tuning = quiet_tuning();
        let mut state = running_state(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);

        // Drop an obstacle straight onto the car
        let id = state.next_obstacle_id();
        state.obstacles.push(Obstacle {
            id,
            lane: 1,
            pos: state.player.pos,
            width: tuning.obstacle_width,
            height: tuning.obstacle_height,
            hue: 0.0,
        });

        let status = tick(&mut state, &mut rng, &TickInput::default(), 0.016, &tuning);
        assert_eq!(status, TickStatus::Collided);
        assert_eq!(state.phase, GamePhase::Over);

        // Frozen: further ticks are no-ops
        let frozen = state.stats;
        for _ in 0..10 {
            let status = tick(&mut state, &mut rng, &TickInput::default(), 0.1, &tuning);
            assert_eq!(status, TickStatus::Skipped);
            assert_eq!(state.stats, frozen);
        }
    }

    #[test]
    fn test_zero_dt_is_noop_advance() {
        let tuning = quiet_tuning();
        let mut state = running_state(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);

        let before = state.stats;
        let status = tick(&mut state, &mut rng, &TickInput::default(), 0.0, &tuning);
        assert_eq!(status, TickStatus::Advanced);
        assert_eq!(state.stats.time, before.time);
        assert_eq!(state.stats.distance, before.distance);
    }
}
