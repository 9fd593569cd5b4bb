//! XGP Archery entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent};

    use xgp_archery::audio::AudioManager;
    use xgp_archery::best::LocalStorageStore;
    use xgp_archery::sim::{Difficulty, GameOverCause, LogSink, RoundPhase};
    use xgp_archery::{Session, Settings, Tuning};

    // Rendering lives in JS; hand it the snapshot if a renderer is installed
    #[wasm_bindgen(inline_js = "
        export function draw_snapshot(json) {
            if (typeof window.drawArchery === 'function') {
                window.drawArchery(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn draw_snapshot(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStorageStore>,
        audio: AudioManager,
        settings: Settings,
        canvas: HtmlCanvasElement,
        /// Autoplay toggle (I key)
        idle: bool,
        /// Whether an animation frame is pending
        looping: bool,
    }

    impl Game {
        /// Convert client coordinates to arena coordinates
        fn canvas_to_local(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            let sx = (client_x as f64 - rect.left()) / rect.width().max(1.0);
            let sy = (client_y as f64 - rect.top()) / rect.height().max(1.0);
            let tuning = &self.session.state.tuning;
            Vec2::new(sx as f32 * tuning.arena_width, sy as f32 * tuning.arena_height)
        }

        fn set_difficulty(&mut self, difficulty: Difficulty) {
            self.session.set_difficulty(difficulty);
            self.settings.difficulty = difficulty;
            self.settings.save();
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = &self.session.state;

            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };
            set_text("timeText", &format!("{:.1}", state.remaining));
            set_text("scoreText", &state.score.to_string());
            set_text("bestText", &state.best.to_string());
            set_text("diffText", state.difficulty.as_str());
            set_text("diffHint", state.difficulty.hint());

            if let Some(el) = document.get_element_by_id("overlay") {
                let class = if state.phase == RoundPhase::Running { "hidden" } else { "" };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("overlayMsg") {
                let msg = match state.phase {
                    RoundPhase::GameOver(GameOverCause::Time) => format!("TIME UP! score {}", state.score),
                    RoundPhase::GameOver(GameOverCause::Hazard) => format!("BOOM! score {}", state.score),
                    _ => String::new(),
                };
                el.set_text_content(Some(&msg));
            }
        }

        fn render(&self) {
            match serde_json::to_string(&self.session.snapshot()) {
                Ok(json) => draw_snapshot(&json),
                Err(e) => log::warn!("Snapshot error: {}", e),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("XGP Archery starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("game")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #game canvas");
            return;
        };

        // Canvas backing store matches the arena; CSS may scale it
        canvas.set_width(Tuning::default().arena_width as u32);
        canvas.set_height(Tuning::default().arena_height as u32);
        let tuning = Tuning::default();

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let mut session = Session::new(seed, tuning, LocalStorageStore);
        session.set_difficulty(settings.difficulty);

        let mut audio = AudioManager::new();
        audio.set_volume(settings.effective_volume());

        let game = Rc::new(RefCell::new(Game {
            session,
            audio,
            settings,
            canvas: canvas.clone(),
            idle: false,
            looping: false,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());

        {
            let g = game.borrow();
            g.update_hud();
            g.render();
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer down - unlock audio, aim, capture
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let pos = g.canvas_to_local(event.client_x(), event.client_y());
                g.session.pointer_moved(pos);
                let _ = canvas_clone.set_pointer_capture(event.pointer_id());
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move - aim
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let pos = g.canvas_to_local(event.client_x(), event.client_y());
                g.session.pointer_moved(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up - fire
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().session.fire();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(window) = web_sys::window() else { return };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if matches!(key.as_str(), "ArrowLeft" | "ArrowRight" | " ") {
                    event.prevent_default();
                }
                let restart = {
                    let mut g = game.borrow_mut();
                    match key.as_str() {
                        "ArrowLeft" | "a" | "A" => g.session.set_left(true),
                        "ArrowRight" | "d" | "D" => g.session.set_right(true),
                        " " => {
                            g.audio.resume();
                            g.session.fire();
                        }
                        "i" | "I" => {
                            g.idle = !g.idle;
                            log::info!("Idle mode: {}", g.idle);
                            let idle = g.idle;
                            g.session.set_idle_mode(idle);
                        }
                        _ => {}
                    }
                    matches!(key.as_str(), "r" | "R")
                };
                if restart {
                    restart_round(game.clone());
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.session.set_left(false),
                    "ArrowRight" | "d" | "D" => g.session.set_right(false),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("startBtn", move |_| restart_round(game.clone()));
        }
        {
            let game = game.clone();
            on_click("resetBtn", move |_| {
                let mut g = game.borrow_mut();
                g.session.reset();
                g.session.frame(js_sys::Date::now(), &mut LogSink);
                g.render();
                g.update_hud();
            });
        }
        {
            let game = game.clone();
            on_click("resetBestBtn", move |_| {
                let mut g = game.borrow_mut();
                g.session.clear_best();
                g.update_hud();
            });
        }
        for (id, difficulty) in [
            ("diff-easy", Difficulty::Easy),
            ("diff-normal", Difficulty::Normal),
            ("diff-hard", Difficulty::Hard),
        ] {
            let game = game.clone();
            on_click(id, move |_| {
                let mut g = game.borrow_mut();
                g.set_difficulty(difficulty);
                g.update_hud();
            });
        }
    }

    /// Back to Idle, then straight into a fresh round
    fn restart_round(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.audio.resume();
            g.session.reset();
            g.session.start();
        }
        ensure_looping(game);
    }

    /// Start the frame loop if it isn't already running
    fn ensure_looping(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.looping {
                return;
            }
            g.looping = true;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let Game { session, audio, .. } = &mut *g;
            session.frame(time, audio);
            g.render();
            g.update_hud();

            // Stop scheduling once the round is over; a restart re-arms the loop
            g.looping = g.session.state.phase == RoundPhase::Running;
            g.looping
        };

        if keep_going {
            request_animation_frame(game);
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
    use xgp_archery::sim::{Difficulty, EffectsSink, GameEvent, LogSink, RoundPhase};
    use xgp_archery::{MemoryStore, Session, Tuning};

    /// Counts shots and hits while forwarding to the log
    #[derive(Default)]
    struct Tally {
        shots: u32,
        hits: u32,
        criticals: u32,
    }

    impl EffectsSink for Tally {
        fn emit(&mut self, event: GameEvent) {
            match event {
                GameEvent::Shoot { .. } => self.shots += 1,
                GameEvent::Hit { critical, .. } => {
                    self.hits += 1;
                    if critical {
                        self.criticals += 1;
                    }
                }
                _ => {}
            }
            LogSink.emit(event);
        }
    }

    env_logger::init();
    log::info!("XGP Archery (native) starting...");
    log::info!("Native mode runs headless demo rounds - serve the wasm build to play");

    // Usage: xgp-archery [tuning.json] [easy|normal|hard]
    let mut tuning = Tuning::default();
    let mut difficulties = Difficulty::ALL.to_vec();
    for arg in std::env::args().skip(1) {
        if arg.ends_with(".json") {
            tuning = match std::fs::read_to_string(&arg) {
                Ok(json) => Tuning::from_json_or_default(&json),
                Err(e) => {
                    log::warn!("Can't read {}: {}", arg, e);
                    Tuning::default()
                }
            };
        } else {
            difficulties = vec![Difficulty::from_key(Some(&arg))];
        }
    }

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let frame_ms = 1000.0 / 60.0;

    let mut session = Session::new(seed, tuning, MemoryStore::new());
    session.set_idle_mode(true);

    for difficulty in difficulties {
        session.set_difficulty(difficulty);
        session.start();

        let mut tally = Tally::default();
        let mut now = 0.0;
        // Generous cap in case a tuning file makes rounds very long
        for _ in 0..200_000 {
            session.frame(now, &mut tally);
            now += frame_ms;
            if matches!(session.state.phase, RoundPhase::GameOver(_)) {
                break;
            }
        }

        println!(
            "{:<6} {:?}: score {:>5}  shots {:>4}  hits {:>4}  criticals {:>4}  time {:.1}s",
            difficulty.as_str(),
            session.state.phase,
            session.state.score,
            tally.shots,
            tally.hits,
            tally.criticals,
            session.state.elapsed
        );

        session.reset();
        session.frame(now, &mut LogSink);
    }

    println!("Best: {}", session.best());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
