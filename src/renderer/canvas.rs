//! Canvas 2D renderer
//!
//! Draws the road, lane dividers, obstacles, and the player car. All hue
//! math here is decorative; the simulation already finished its tick by the
//! time this runs.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{RenderSink, hsl};
use crate::consts::ROAD_DASH_PERIOD;
use crate::sim::GameState;
use crate::tuning::Tuning;

const DASH_LENGTH: f64 = 40.0;
const BORDER_WIDTH: f64 = 6.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    /// Hue cycling toggle, from user settings
    rgb_effects: bool,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, rgb_effects: bool) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
            rgb_effects,
        })
    }

    /// Track a resize. `width`/`height` are CSS pixels; the backing store
    /// scale is folded into the context transform.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.width = width;
        self.height = height;
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }

    /// Base hue for this frame, frozen when effects are off
    fn base_hue(&self, state: &GameState) -> f32 {
        if self.rgb_effects { state.hue_cycle } else { 200.0 }
    }

    fn fill_rect(&self, color: &str, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn draw_road(&self, state: &GameState, tuning: &Tuning) {
        let hue = self.base_hue(state);
        let road_left = state.road_left(tuning) as f64;
        let road_width = tuning.road_width as f64;

        self.fill_rect(&hsl(hue, 60, 6), 0.0, 0.0, self.width, self.height);
        self.fill_rect(&hsl(hue + 240.0, 35, 13), road_left, 0.0, road_width, self.height);

        // Borders
        let border = hsl(hue + 90.0, 100, 60);
        self.fill_rect(&border, road_left - BORDER_WIDTH, 0.0, BORDER_WIDTH, self.height);
        self.fill_rect(&border, road_left + road_width, 0.0, BORDER_WIDTH, self.height);

        // Lane dividers: dash pattern scrolled by the cosmetic road offset
        let lane_width = tuning.lane_width() as f64;
        for i in 1..tuning.lane_count {
            let line = hsl(hue + i as f32 * 60.0, 100, 50);
            let x = road_left + i as f64 * lane_width - 2.0;
            let mut y = state.road_offset as f64 - ROAD_DASH_PERIOD as f64;
            while y < self.height {
                self.fill_rect(&line, x, y, 4.0, DASH_LENGTH);
                y += ROAD_DASH_PERIOD as f64;
            }
        }
    }

    fn draw_car(&self, x: f64, y: f64, w: f64, h: f64, hue: f32) {
        // Body
        self.fill_rect(&hsl(hue, 100, 55), x + 5.0, y + 15.0, w - 10.0, h - 20.0);
        // Hood
        self.fill_rect(&hsl(hue + 15.0, 100, 65), x + 10.0, y + 5.0, w - 20.0, 25.0);
        // Windshield
        self.fill_rect(&hsl(hue + 45.0, 80, 30), x + 12.0, y + 25.0, w - 24.0, 20.0);
        // Headlights
        let lights = hsl(hue, 100, 80);
        self.fill_rect(&lights, x + 8.0, y + 3.0, 8.0, 5.0);
        self.fill_rect(&lights, x + w - 16.0, y + 3.0, 8.0, 5.0);
        // Tail lights
        let tail = hsl(0.0, 100, 60);
        self.fill_rect(&tail, x + 8.0, y + h - 8.0, 10.0, 5.0);
        self.fill_rect(&tail, x + w - 18.0, y + h - 8.0, 10.0, 5.0);
    }
}

impl RenderSink for CanvasRenderer {
    fn draw(&mut self, state: &GameState, tuning: &Tuning) {
        self.draw_road(state, tuning);

        let cycle = if self.rgb_effects { state.hue_cycle } else { 0.0 };
        for obs in &state.obstacles {
            self.draw_car(
                obs.pos.x as f64,
                obs.pos.y as f64,
                obs.width as f64,
                obs.height as f64,
                obs.hue + cycle,
            );
        }

        let player = &state.player;
        self.draw_car(
            player.pos.x as f64,
            player.pos.y as f64,
            player.width as f64,
            player.height as f64,
            self.base_hue(state) + 180.0,
        );
    }
}
