//! Run state machine and frame-tick entry point
//!
//! An [`Engine`] owns one run's worth of simulation state plus the seams the
//! surrounding page talks to: control commands, movement intents, playfield
//! resizes, and the game-over observer. An external scheduler (rAF in the
//! browser, a plain loop in tests) calls [`Engine::tick`] with monotonically
//! increasing timestamps; everything else happens between ticks.
//!
//! There are no fatal errors here. Malformed timestamps degrade to
//! zero-length deltas and misuse (ticking outside `Running`) is a no-op.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::MAX_DELTA;
use crate::report::RunResult;
use crate::sim::{GamePhase, GameState, Playfield, RunStats, TickInput, TickStatus, tick};
use crate::tuning::Tuning;

/// Observer invoked exactly once per run, at the `Running -> Over` transition
pub type GameOverHandler = Box<dyn FnMut(&RunResult)>;

pub struct Engine {
    tuning: Tuning,
    state: GameState,
    rng: Pcg32,
    seed: u64,
    intents: TickInput,
    last_timestamp: Option<f64>,
    on_game_over: Option<GameOverHandler>,
}

impl Engine {
    pub fn new(tuning: Tuning, bounds: Playfield, seed: u64) -> Self {
        let state = GameState::new(&tuning, bounds);
        Self {
            tuning,
            state,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            intents: TickInput::default(),
            last_timestamp: None,
            on_game_over: None,
        }
    }

    /// Register the game-over observer (score reporting lives behind it)
    pub fn on_game_over(&mut self, handler: impl FnMut(&RunResult) + 'static) {
        self.on_game_over = Some(Box::new(handler));
    }

    /// Set the seed used by the next `start`/`restart`
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Begin a run. No-op while a run is already active (idempotent loop
    /// start); from `Over` it behaves exactly like a restart.
    pub fn start(&mut self) {
        match self.state.phase {
            GamePhase::Running | GamePhase::Paused => {}
            GamePhase::Idle | GamePhase::Over => self.begin_run(),
        }
    }

    /// Freeze the run. Render keeps showing the last frame.
    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.state.phase = GamePhase::Paused;
            log::debug!("paused at t={:.2}s", self.state.stats.time);
        }
    }

    /// Resume a paused run. The pause gap is not integrated: the next tick
    /// re-anchors its timestamp and advances by a zero-length delta.
    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Running;
            self.last_timestamp = None;
            log::debug!("resumed at t={:.2}s", self.state.stats.time);
        }
    }

    /// Abandon any state and begin a fresh run, whatever the current phase
    pub fn restart(&mut self) {
        self.begin_run();
    }

    /// Return to `Idle` without firing the game-over observer
    pub fn stop(&mut self) {
        self.state.phase = GamePhase::Idle;
        self.last_timestamp = None;
        log::debug!("stopped");
    }

    pub fn set_left_intent(&mut self, held: bool) {
        self.intents.left = held;
    }

    pub fn set_right_intent(&mut self, held: bool) {
        self.intents.right = held;
    }

    /// Playfield resize; picked up by the next tick's clamp step
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.state.set_bounds(Playfield::new(width, height));
    }

    /// Advance one frame if `Running`, sampling the current intents.
    ///
    /// `timestamp_ms` is wall-clock milliseconds from the scheduler. The
    /// delta is clamped to [`MAX_DELTA`]; a missing, non-finite, or
    /// backwards timestamp yields a zero-length (no-op) advance.
    pub fn tick(&mut self, timestamp_ms: f64) -> TickStatus {
        if self.state.phase != GamePhase::Running {
            return TickStatus::Skipped;
        }

        let dt = match self.last_timestamp {
            Some(prev) => {
                let raw = ((timestamp_ms - prev) / 1000.0) as f32;
                if raw.is_finite() && raw > 0.0 {
                    raw.min(MAX_DELTA)
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        if timestamp_ms.is_finite() {
            self.last_timestamp = Some(timestamp_ms);
        }

        let status = tick(&mut self.state, &mut self.rng, &self.intents, dt, &self.tuning);

        if status == TickStatus::Collided {
            let result = RunResult {
                score: self.state.stats.score,
                distance: self.state.stats.distance,
                time: self.state.stats.time,
                speed: self.state.stats.speed,
            };
            log::info!("game over: score {} after {:.1}s", result.score, result.time);
            if let Some(handler) = self.on_game_over.as_mut() {
                handler(&result);
            }
        }

        status
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// HUD snapshot of the live run statistics
    pub fn stats(&self) -> RunStats {
        self.state.stats
    }

    /// Render-ready view of the whole simulation state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn begin_run(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.state.reset_run(&self.tuning);
        self.state.phase = GamePhase::Running;
        self.intents = TickInput::default();
        self.last_timestamp = None;
        log::info!("run started (seed {})", self.seed);
    }
}
