//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Delta time supplied by the caller, clamped at the engine boundary
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_collision};
pub use spawn::maybe_spawn;
pub use state::{GamePhase, GameState, Obstacle, Player, Playfield, RunStats};
pub use tick::{TickInput, TickStatus, tick};
