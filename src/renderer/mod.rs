//! Rendering seam
//!
//! Drawing is a pure function of simulation state: the sink reads the
//! current [`GameState`] each frame and has no feedback into the engine.

use crate::sim::GameState;
use crate::tuning::Tuning;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

/// Per-frame draw target
pub trait RenderSink {
    fn draw(&mut self, state: &GameState, tuning: &Tuning);
}

/// CSS color string for a hue on the neon palette
pub fn hsl(hue: f32, saturation: u32, lightness: u32) -> String {
    format!(
        "hsl({:.0}, {}%, {}%)",
        hue.rem_euclid(360.0),
        saturation,
        lightness
    )
}
