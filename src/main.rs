//! Neon Rush entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use neon_rush::renderer::{CanvasRenderer, RenderSink};
    use neon_rush::report::{LogSink, ScoreSink};
    use neon_rush::sim::{GamePhase, Playfield};
    use neon_rush::{Engine, HighScores, Settings};

    /// How long a HUD button press holds a movement intent (ms)
    const BUTTON_PULSE_MS: f64 = 150.0;

    /// Game instance holding all state
    struct Game {
        engine: Engine,
        renderer: CanvasRenderer,
        settings: Settings,
        highscores: Rc<RefCell<HighScores>>,
        // Discrete button presses hold an intent until these deadlines
        left_pulse_until: f64,
        right_pulse_until: f64,
        // Horizontal anchor of the active touch drag
        touch_anchor: Option<f32>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase for overlay transitions
        last_phase: GamePhase,
    }

    impl Game {
        fn new(
            engine: Engine,
            renderer: CanvasRenderer,
            settings: Settings,
            highscores: Rc<RefCell<HighScores>>,
        ) -> Self {
            Self {
                engine,
                renderer,
                settings,
                highscores,
                left_pulse_until: 0.0,
                right_pulse_until: 0.0,
                touch_anchor: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Idle,
            }
        }

        /// One animation frame: expire button pulses, tick, render, HUD
        fn frame(&mut self, time: f64) {
            if self.left_pulse_until > 0.0 && time >= self.left_pulse_until {
                self.engine.set_left_intent(false);
                self.left_pulse_until = 0.0;
            }
            if self.right_pulse_until > 0.0 && time >= self.right_pulse_until {
                self.engine.set_right_intent(false);
                self.right_pulse_until = 0.0;
            }

            self.engine.tick(time);

            // Paused and Over keep drawing the frozen state as a static frame
            self.renderer.draw(self.engine.state(), self.engine.tuning());

            self.track_fps(time);
            self.update_hud();
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            let stats = self.engine.stats();
            let set = |id: &str, value: String| {
                if let Some(el) = document
                    .query_selector(&format!("#{id} .hud-value"))
                    .ok()
                    .flatten()
                {
                    el.set_text_content(Some(&value));
                }
            };

            set("hud-score", stats.score.to_string());
            set("hud-distance", format!("{:.0} m", stats.distance));
            set("hud-time", format!("{:.1} s", stats.time));
            set("hud-speed", format!("{:.1}", stats.speed));
            if let Some(best) = self.highscores.borrow().top_score() {
                set("hud-best", best.to_string());
            }
            if self.settings.show_fps {
                set("hud-fps", self.fps.to_string());
            }

            // Overlay transitions
            let phase = self.engine.phase();
            if phase != self.last_phase {
                let toggle = |id: &str, visible: bool| {
                    if let Some(el) = document.get_element_by_id(id) {
                        let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                    }
                };
                toggle("start-prompt", phase == GamePhase::Idle);
                toggle("pause-menu", phase == GamePhase::Paused);
                toggle("game-over", phase == GamePhase::Over);

                if phase == GamePhase::Over {
                    if let Some(el) = document.get_element_by_id("final-score") {
                        el.set_text_content(Some(&stats.score.to_string()));
                    }
                    if let Some(el) = document.get_element_by_id("final-distance") {
                        el.set_text_content(Some(&format!("{:.0} m", stats.distance)));
                    }
                    if let Some(el) = document.get_element_by_id("final-time") {
                        el.set_text_content(Some(&format!("{:.1} s", stats.time)));
                    }
                }
                self.last_phase = phase;
            }
        }

        /// Toggle pause from the keyboard or the pause menu
        fn toggle_pause(&mut self) {
            match self.engine.phase() {
                GamePhase::Running => self.engine.pause(),
                GamePhase::Paused => self.engine.resume(),
                _ => {}
            }
        }

        /// Start or restart a run with a fresh wall-clock seed
        fn begin_run(&mut self) {
            self.engine.set_seed(js_sys::Date::now() as u64);
            self.engine.restart();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Rush starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Size the backing store for the device pixel ratio
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width() as f64;
        let client_h = canvas.client_height() as f64;
        canvas.set_width((client_w * dpr) as u32);
        canvas.set_height((client_h * dpr) as u32);

        let settings = Settings::load();
        let highscores = Rc::new(RefCell::new(HighScores::load()));

        let seed = js_sys::Date::now() as u64;
        let mut engine = Engine::new(
            Default::default(),
            Playfield::new(client_w as f32, client_h as f32),
            seed,
        );

        // Score reporting: local leaderboard plus the fire-and-forget sink.
        // Failures stay on this side of the seam.
        {
            let highscores = highscores.clone();
            let mut sink = LogSink;
            engine.on_game_over(move |result| {
                sink.submit(result);
                let mut scores = highscores.borrow_mut();
                if let Some(rank) = scores.add_result(result, js_sys::Date::now()) {
                    log::info!("New high score, rank {rank}");
                }
                scores.save();
            });
        }

        let mut renderer = CanvasRenderer::new(&canvas, settings.effective_rgb())
            .expect("2d canvas context");
        renderer.resize(client_w, client_h, dpr);

        let game = Rc::new(RefCell::new(Game::new(
            engine, renderer, settings, highscores,
        )));

        log::info!("Game initialized with seed: {seed}");

        setup_keyboard(game.clone());
        setup_touch(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(&canvas, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Neon Rush running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => {
                        g.engine.set_left_intent(true);
                        event.prevent_default();
                    }
                    "ArrowRight" | "d" | "D" => {
                        g.engine.set_right_intent(true);
                        event.prevent_default();
                    }
                    "Escape" => g.toggle_pause(),
                    " " | "Enter" => {
                        if matches!(g.engine.phase(), GamePhase::Idle | GamePhase::Over) {
                            g.begin_run();
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.engine.set_left_intent(false),
                    "ArrowRight" | "d" | "D" => g.engine.set_right_intent(false),
                    _ => {}
                }
            });
            let _ = web_sys::window()
                .unwrap()
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start: anchor the drag; also starts a run from Idle/Over
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if matches!(g.engine.phase(), GamePhase::Idle | GamePhase::Over) {
                    g.begin_run();
                    return;
                }
                if let Some(touch) = event.touches().get(0) {
                    g.touch_anchor = Some(touch.client_x() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move: drag past the dead zone steers
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let Some(anchor) = g.touch_anchor else {
                    return;
                };
                if let Some(touch) = event.touches().get(0) {
                    let diff = touch.client_x() as f32 - anchor;
                    let deadzone = g.settings.touch_deadzone_px;
                    g.engine.set_left_intent(diff < -deadzone);
                    g.engine.set_right_intent(diff > deadzone);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: release both intents
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                let mut g = game.borrow_mut();
                g.touch_anchor = None;
                g.engine.set_left_intent(false);
                g.engine.set_right_intent(false);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Same time base as the rAF timestamps the frame loop sees
    fn performance_now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    /// HUD buttons: discrete steering pulses plus pause/restart
    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("btn-left") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.engine.phase() == GamePhase::Running {
                    g.engine.set_left_intent(true);
                    g.left_pulse_until = performance_now() + BUTTON_PULSE_MS;
                }
            });
            let _ = btn.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("btn-right") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.engine.phase() == GamePhase::Running {
                    g.engine.set_right_intent(true);
                    g.right_pulse_until = performance_now() + BUTTON_PULSE_MS;
                }
            });
            let _ = btn.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().engine.resume();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().begin_run();
                log::info!("Game restarted");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Window resize: new bounds reach the engine before the next tick
    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().unwrap();
            let dpr = window.device_pixel_ratio();
            let client_w = canvas.client_width() as f64;
            let client_h = canvas.client_height() as f64;
            canvas.set_width((client_w * dpr) as u32);
            canvas.set_height((client_h * dpr) as u32);

            let mut g = game.borrow_mut();
            g.engine.set_bounds(client_w as f32, client_h as f32);
            g.renderer.resize(client_w, client_h, dpr);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.engine.phase() == GamePhase::Running {
                        g.engine.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.engine.phase() == GamePhase::Running {
                    g.engine.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_rush::report::{LogSink, ScoreSink};
    use neon_rush::sim::{GamePhase, Playfield, TickStatus};
    use neon_rush::{Engine, Tuning};

    env_logger::init();
    log::info!("Neon Rush (native) starting...");

    // Headless demo run: no steering input, fixed 60 Hz pacing. The centered
    // car eventually meets a middle-lane obstacle.
    let mut engine = Engine::new(Tuning::default(), Playfield::new(800.0, 600.0), 0xC0FFEE);
    engine.on_game_over(|result| {
        LogSink.submit(result);
    });

    engine.start();
    let mut timestamp = 0.0;
    while engine.phase() != GamePhase::Over && timestamp < 300_000.0 {
        timestamp += 1000.0 / 60.0;
        if engine.tick(timestamp) == TickStatus::Collided {
            break;
        }
    }

    let stats = engine.stats();
    println!(
        "demo run: score {} distance {:.0} time {:.1}s speed {:.1}",
        stats.score, stats.distance, stats.time, stats.speed
    );
}
