//! Snake Survival entry point
//!
//! On the web this wires the canvas, input and `requestAnimationFrame` to a
//! session and hands each frame's snapshot to the page. Natively it runs one
//! autopilot game headless and reports the survival time.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use glam::Vec2;
    use snake_survival::platform::{AnimationLoop, LoopCommand, on_visibility_change};
    use snake_survival::scoreboard::{RunResult, ScoreSink, SurvivalBoard};
    use snake_survival::sim::{GamePhase, SteeringTarget};
    use snake_survival::{Session, Settings};

    // Page hooks: the page draws snapshots and shows the game-over screen
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            if (window.snakeSurvival && window.snakeSurvival.draw) {
                window.snakeSurvival.draw(JSON.parse(json));
            }
        }

        export function announce_game_over(json) {
            if (window.snakeSurvival && window.snakeSurvival.gameOver) {
                window.snakeSurvival.gameOver(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
        fn announce_game_over(json: &str);
    }

    /// Keeps a local leaderboard and tells the page about each finished run
    #[derive(Default)]
    struct PageSink {
        board: SurvivalBoard,
    }

    impl ScoreSink for PageSink {
        fn submit_survival(&mut self, result: &RunResult) {
            self.board.submit_survival(result);
            match serde_json::to_string(result) {
                Ok(json) => announce_game_over(&json),
                Err(e) => log::error!("Failed to encode run result: {}", e),
            }
        }
    }

    type Game = Rc<RefCell<Session<PageSink>>>;

    thread_local! {
        static FRAME_LOOP: RefCell<Option<AnimationLoop>> = const { RefCell::new(None) };
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Snake Survival starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };

        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("No #canvas element");
                return;
            }
        };

        let settings = Settings::load();
        canvas.set_width(settings.viewport_width as u32);
        canvas.set_height(settings.viewport_height as u32);

        let seed = settings
            .seed
            .unwrap_or_else(|| js_sys::Date::now() as u64);
        let session = match Session::new(settings, seed, PageSink::default()) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Invalid settings: {}", e);
                return;
            }
        };
        let game: Game = Rc::new(RefCell::new(session));

        setup_input_handlers(&canvas, game.clone());
        setup_start_button(game.clone());
        setup_visibility(game.clone());

        start_frame_loop(&game);
    }

    fn start_frame_loop(game: &Game) {
        let frame_game = game.clone();
        match AnimationLoop::start(move |time| game_frame(&frame_game, time)) {
            Ok(frame_loop) => FRAME_LOOP.with(|slot| *slot.borrow_mut() = Some(frame_loop)),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }

    /// Begin (or restart) a run and remember the settings it was played with
    fn begin_run(session: &mut Session<PageSink>) {
        let now = now_ms();
        if session.phase() == GamePhase::Running {
            session.restart(now);
        } else {
            session.start(now);
        }
        session.sim().settings.save();
    }

    /// Stop ticking while the tab is hidden, resume when it comes back
    fn setup_visibility(game: Game) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let running = FRAME_LOOP.with(|slot| {
                slot.borrow().as_ref().is_some_and(|l| l.is_running())
            });
            match on_visibility_change(doc.hidden(), running) {
                LoopCommand::Stop => {
                    FRAME_LOOP.with(|slot| {
                        if let Some(frame_loop) = slot.borrow().as_ref() {
                            frame_loop.stop();
                        }
                    });
                    log::info!("Frame loop stopped (page hidden)");
                }
                LoopCommand::Resume => {
                    start_frame_loop(&game);
                    log::info!("Frame loop resumed");
                }
                LoopCommand::Keep => {}
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_frame(game: &Game, time: f64) {
        let snapshot = game.borrow_mut().advance(time);
        match snapshot.to_json() {
            Ok(json) => present_frame(&json),
            Err(e) => log::warn!("Snapshot encode failed: {}", e),
        }
    }

    /// Same clock origin as the requestAnimationFrame timestamp
    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    /// Pointer position in viewport pixels, corrected for CSS scaling
    fn viewport_point(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let sx = if rect.width() > 0.0 {
            canvas.width() as f64 / rect.width()
        } else {
            1.0
        };
        let sy = if rect.height() > 0.0 {
            canvas.height() as f64 / rect.height()
        } else {
            1.0
        };
        Vec2::new(
            ((client_x - rect.left()) * sx) as f32,
            ((client_y - rect.top()) * sy) as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Game) {
        // Mouse steering
        {
            let game = game.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = viewport_point(&target, event.client_x() as f64, event.client_y() as f64);
                game.borrow_mut()
                    .set_steering_target(SteeringTarget::Viewport(point));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch steering
        {
            let game = game.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let point =
                        viewport_point(&target, touch.client_x() as f64, touch.client_y() as f64);
                    game.borrow_mut()
                        .set_steering_target(SteeringTarget::Viewport(point));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: Space/Enter starts or restarts, A toggles autopilot
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => {
                        if g.phase() != GamePhase::Running {
                            begin_run(&mut g);
                        }
                    }
                    "a" | "A" => {
                        let enabled = !g.autopilot();
                        g.set_autopilot(enabled);
                        log::info!("Autopilot: {}", enabled);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(game: Game) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    begin_run(&mut game.borrow_mut());
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result};
    use snake_survival::platform::HeadlessDriver;
    use snake_survival::{Session, Settings, SurvivalBoard};

    /// Environment variable naming a JSON settings file
    const CONFIG_ENV: &str = "SNAKE_SURVIVAL_CONFIG";
    /// Ten minutes at 60 Hz
    const MAX_FRAMES: u64 = 36_000;

    fn config_path() -> Option<PathBuf> {
        std::env::args()
            .nth(1)
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .map(PathBuf::from)
    }

    fn load_settings() -> Result<Settings> {
        let Some(path) = config_path() else {
            log::info!("No config given, using default settings");
            return Ok(Settings::default());
        };
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = Settings::from_json(&json)
            .with_context(|| format!("parsing settings from {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn run() -> Result<()> {
        let settings = load_settings()?;
        let seed = match settings.seed {
            Some(seed) => seed,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
        };
        let player = settings.player_name.clone();

        let mut session = Session::new(settings, seed, SurvivalBoard::new())?;
        session.set_autopilot(true);
        log::info!("Headless autopilot run, seed {}", seed);

        let mut driver = HeadlessDriver::default();
        match driver.run_until_over(&mut session, MAX_FRAMES) {
            Some(secs) => {
                let length = session.sim().player.chain.len();
                println!("{} survived {}s (length {})", player, secs, length);
            }
            None => println!(
                "{} still alive after {}s",
                player,
                session.sim().elapsed_secs()
            ),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Snake Survival (native) starting...");
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
