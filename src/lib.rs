//! Neon Rush - an endless neon lane-racer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (steering, scrolling, collisions, spawning)
//! - `engine`: Run state machine driven by an external frame scheduler
//! - `renderer`: Canvas drawing behind the `RenderSink` seam
//! - `report`: Score reporting seam for the leaderboard backend
//! - `tuning`: Data-driven game balance

pub mod engine;
pub mod highscores;
pub mod renderer;
pub mod report;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use engine::Engine;
pub use highscores::HighScores;
pub use report::{RunResult, ScoreSink};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Upper bound on a single tick's delta time (seconds). Longer gaps
    /// (tab suspension, frame stalls) are clamped instead of integrated.
    pub const MAX_DELTA: f32 = 0.1;

    /// Hitbox insets: gameplay rectangles are smaller than the sprites
    /// so near misses that look clean on screen stay clean.
    pub const HITBOX_INSET_X: f32 = 8.0;
    pub const HITBOX_INSET_TOP: f32 = 10.0;
    pub const HITBOX_INSET_BOTTOM: f32 = 5.0;

    /// Vertical gap between the player car and the bottom of the playfield
    pub const CAR_BOTTOM_OFFSET: f32 = 50.0;

    /// Cosmetic hue cycle rate (degrees per second)
    pub const HUE_CYCLE_RATE: f32 = 30.0;
    /// Lane-divider dash pattern wraps after this many pixels of scroll
    pub const ROAD_DASH_PERIOD: f32 = 70.0;

    /// Final score needed for a run to count as reward-eligible
    pub const REWARD_SCORE_THRESHOLD: u64 = 10_000;
}

/// Decorative hue for an entity id, in degrees.
///
/// Knuth multiplicative hash so hues never consume the gameplay RNG stream.
#[inline]
pub fn hue_from_id(id: u32) -> f32 {
    (id.wrapping_mul(2654435761) % 360) as f32
}
