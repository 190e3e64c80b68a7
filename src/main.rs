//! Ski Rush entry point
//!
//! Browser: wires keyboard, DOM and the animation frame loop to the simulation.
//! Native: runs a headless autopilot run and logs how it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    use rand_pcg::Pcg32;
    use ski_rush::GameConfig;
    use ski_rush::sim::{GameState, LateralIntent, seeded, tick};

    // Hand each frame to whatever renderer the page installed, and let the
    // page override tuning through `window.skiRushConfig`
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            if (typeof window.onSkiFrame === 'function') {
                window.onSkiFrame(JSON.parse(json));
            }
        }

        export function config_override() {
            const cfg = window.skiRushConfig;
            return cfg ? JSON.stringify(cfg) : undefined;
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
        fn config_override() -> Option<String>;
    }

    /// Game instance holding the run and the held keys
    struct Game {
        state: GameState<Pcg32>,
        left_held: bool,
        right_held: bool,
        shown: super::HudShown,
    }

    impl Game {
        fn new(state: GameState<Pcg32>) -> Self {
            Self {
                state,
                left_held: false,
                right_held: false,
                shown: super::HudShown::default(),
            }
        }

        fn key(&mut self, code: &str, pressed: bool) {
            match code {
                "ArrowLeft" | "KeyA" => self.left_held = pressed,
                "ArrowRight" | "KeyD" => self.right_held = pressed,
                "ArrowUp" | "KeyW" => {
                    self.state.set_boost(pressed);
                    return;
                }
                _ => return,
            }
            self.state
                .set_lateral_intent(LateralIntent::from_keys(self.left_held, self.right_held));
        }

        fn frame(&mut self, now: f64) {
            let events = tick(&mut self.state, now);
            if let Some(cause) = events.game_over {
                log::info!("Game over: {:?}", cause);
            }

            match serde_json::to_string(&self.state.snapshot()) {
                Ok(json) => present_frame(&json),
                Err(e) => log::warn!("Snapshot serialization failed: {}", e),
            }

            self.update_hud();
        }

        fn restart(&mut self, now: f64) {
            self.left_held = false;
            self.right_held = false;
            self.state.reset(now);
            self.update_hud();
        }

        /// Update score and game-over elements in the DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let changes = self.shown.refresh(&self.state);
            if let Some(score) = changes.score {
                if let Some(el) = document.get_element_by_id("score-display") {
                    el.set_text_content(Some(&format!("Score: {}", score)));
                }
            }
            if let Some(best) = changes.best {
                if let Some(el) = document.get_element_by_id("best-display") {
                    el.set_text_content(Some(&format!("Best: {}", best)));
                }
            }
            if let Some(over) = changes.game_over {
                if let Some(el) = document.get_element_by_id("game-over") {
                    let display = if over { "display: block" } else { "display: none" };
                    let _ = el.set_attribute("style", display);
                }
            }
        }
    }

    fn load_config() -> GameConfig {
        match config_override() {
            Some(json) => match GameConfig::from_json(&json) {
                Ok(config) => {
                    log::info!("Using page config override");
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring config override: {}", e);
                    GameConfig::default()
                }
            },
            None => GameConfig::default(),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger unavailable: {}", e).into());
        }

        log::info!("Ski Rush starting...");

        let now = js_sys::Date::now();
        let seed = now as u64;
        let state = match GameState::new(load_config(), seeded(seed), now) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Cannot start run: {}", e);
                return;
            }
        };
        log::info!("Run initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game::new(state)));
        game.borrow_mut().update_hud();

        setup_keyboard(game.clone());
        setup_restart_button(game.clone());

        request_animation_frame(game);

        log::info!("Ski Rush running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().key(&event.code(), pressed);
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart(js_sys::Date::now());
                log::info!("Run restarted");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame(js_sys::Date::now());
        request_animation_frame(game);
    }
}

/// HUD values last pushed to the page
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[derive(Debug, Default)]
struct HudShown {
    score: Option<u64>,
    best: Option<u64>,
    game_over: Option<bool>,
}

/// HUD fields that need repainting
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[derive(Debug, Default, PartialEq)]
struct HudChanges {
    score: Option<u64>,
    best: Option<u64>,
    game_over: Option<bool>,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl HudShown {
    /// Compare against the run and record what is about to be shown.
    ///
    /// Each field is tracked on its own: the best moves on the frame a run
    /// ends, while the score stands still.
    fn refresh<R>(&mut self, state: &ski_rush::sim::GameState<R>) -> HudChanges {
        fn changed<T: Copy + PartialEq>(shown: &mut Option<T>, now: T) -> Option<T> {
            if *shown == Some(now) {
                None
            } else {
                *shown = Some(now);
                Some(now)
            }
        }

        HudChanges {
            score: changed(&mut self.score, state.score()),
            best: changed(&mut self.best, state.best_score()),
            game_over: changed(&mut self.game_over, state.is_game_over()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ski Rush (native) starting...");
    log::info!("Native mode runs a headless autopilot - serve the wasm build for the playable version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let (frames, score) = native::autopilot_run(seed);
    println!("Seed {}: survived {} frames, score {}", seed, frames, score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use ski_rush::GameConfig;
    use ski_rush::sim::{GameState, LateralIntent, ObstacleKind, seeded, tick};

    /// 60 Hz display frames
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u64 = 60 * 60 * 10;
    /// How far ahead the autopilot looks for hazards
    const LOOKAHEAD: f32 = 25.0;

    /// Play one run with a simple dodge-the-nearest-hazard autopilot.
    ///
    /// Returns frames survived and final score.
    pub fn autopilot_run(seed: u64) -> (u64, u64) {
        let mut state = match GameState::new(GameConfig::default(), seeded(seed), 0.0) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Cannot start run: {}", e);
                return (0, 0);
            }
        };

        let mut now = 0.0;
        while !state.is_game_over() && state.frame() < MAX_FRAMES {
            state.set_lateral_intent(steer(&state));
            now += FRAME_MS;
            let events = tick(&mut state, now);
            if events.jumped {
                log::debug!("Ramp jump at frame {}", state.frame());
            }
        }

        if let Some(cause) = state.game_over_cause() {
            log::info!("Autopilot crashed: {:?}", cause);
        }
        (state.frame(), state.score())
    }

    /// Steer away from the nearest hazard in our path, otherwise drift back
    /// toward the middle of the lane
    fn steer(state: &GameState) -> LateralIntent {
        let player = state.player().position;
        let lane = state.config().lane_limit;

        let threat = state
            .spawner()
            .iter()
            .filter(|o| matches!(o.kind, ObstacleKind::Hazard(_)))
            .filter(|o| o.position.z < player.z && player.z - o.position.z < LOOKAHEAD)
            .filter(|o| (o.position.x - player.x).abs() < 2.5)
            .max_by(|a, b| a.position.z.total_cmp(&b.position.z));

        match threat {
            Some(o) => {
                let dodge_left = if o.position.x >= player.x {
                    player.x - 3.0 > -lane
                } else {
                    player.x + 3.0 >= lane
                };
                if dodge_left {
                    LateralIntent::Left
                } else {
                    LateralIntent::Right
                }
            }
            None if player.x > 1.0 => LateralIntent::Left,
            None if player.x < -1.0 => LateralIntent::Right,
            None => LateralIntent::None,
        }
    }
}
