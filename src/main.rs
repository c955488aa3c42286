//! Star Raid entry point
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
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, TouchEvent};

    use star_raid::audio::{AudioManager, SoundEffect};
    use star_raid::consts::*;
    use star_raid::highscores::{self, HighScores};
    use star_raid::persistence::LocalStorage;
    use star_raid::platform::{FrameClock, InputState};
    use star_raid::renderer::{RenderState, build_scene};
    use star_raid::settings::Settings;
    use star_raid::sim::{GameEvent, GamePhase, GameState, SimConfig, tick};

    const MOBILE_AGENTS: [&str; 7] = [
        "Android",
        "webOS",
        "iPhone",
        "iPad",
        "iPod",
        "BlackBerry",
        "IEMobile",
    ];

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        storage: Option<LocalStorage>,
        audio: AudioManager,
        input: InputState,
        render_state: Option<RenderState>,
        clock: FrameClock,
        last_time: f64,
        /// High score screen open on top of the menu
        showing_scores: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let storage = match LocalStorage::open() {
                Ok(storage) => Some(storage),
                Err(e) => {
                    log::warn!("Scores will not be saved: {e}");
                    None
                }
            };
            let (settings, best) = match &storage {
                Some(s) => (Settings::load(s), highscores::best_score(s)),
                None => (Settings::default(), 0),
            };
            let audio = AudioManager::new(&settings);

            Self {
                state: GameState::new(seed, SimConfig::default()).with_high_score(best),
                settings,
                storage,
                audio,
                input: InputState::new(),
                render_state: None,
                clock: FrameClock::new(),
                last_time: 0.0,
                showing_scores: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            for _ in 0..self.clock.advance(dt) {
                let input = self.input.take_tick_input();
                tick(&mut self.state, &input);
            }

            for event in self.state.drain_events() {
                self.handle_event(&event);
            }
        }

        fn handle_event(&mut self, event: &GameEvent) {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
            match event {
                GameEvent::GameOver { score, wave } => self.save_run(*score, *wave),
                GameEvent::WaveStarted { wave, boss } => {
                    log::debug!("Wave {} started (boss: {})", wave, boss);
                }
                _ => {}
            }
        }

        fn save_run(&self, score: u64, wave: u32) {
            let Some(storage) = &self.storage else { return };
            match highscores::record_run(storage, score, wave, js_sys::Date::now()) {
                Ok(Some(rank)) => log::info!("Run saved at rank #{}", rank),
                Ok(None) => log::info!("Run saved"),
                Err(e) => log::warn!("Could not save score: {e}"),
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(&self.state, &self.settings);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn start(&mut self) {
            self.state.start_game();
            self.input.clear();
            self.clock.reset();
            self.showing_scores = false;
            self.audio.resume();
        }

        fn show_menu(&mut self) {
            self.state.show_menu();
            self.showing_scores = false;
        }

        fn toggle_sound(&mut self) {
            let enabled = self.settings.toggle_sound();
            self.audio.apply_settings(&self.settings);
            if let Some(storage) = &self.storage {
                if let Err(e) = self.settings.save(storage) {
                    log::warn!("Could not save settings: {e}");
                }
            }
            log::info!("Sound {}", if enabled { "on" } else { "off" });
        }

        /// Update HUD and menu visibility in the DOM
        fn update_ui(&self, document: &Document) {
            let hud = self.state.hud();
            let phase = self.state.phase;

            set_text(document, "healthText", &format!("{}/{}", hud.health, hud.max_health));
            set_text(document, "scoreText", &hud.score.to_string());
            set_text(document, "waveText", &hud.wave.to_string());
            set_text(document, "comboText", &format!("x{}", hud.combo));
            set_text(document, "highScore", &hud.high_score.to_string());
            set_text(document, "finalScore", &hud.score.to_string());
            set_text(
                document,
                "soundToggle",
                if self.settings.sound_enabled { "Sound: On" } else { "Sound: Off" },
            );

            if let Some(bar) = element::<HtmlElement>(document, "healthBar") {
                let width = format!("{}%", hud.health_fraction * 100.0);
                let _ = bar.style().set_property("width", &width);
            }

            match hud.boss {
                Some((boss_phase, _)) => {
                    set_text(document, "bossLabel", &format!("BOSS - phase {}", boss_phase));
                    set_hidden(document, "bossLabel", false);
                }
                None => set_hidden(document, "bossLabel", true),
            }

            let in_game = matches!(phase, GamePhase::Playing | GamePhase::Paused);
            set_hidden(document, "gameHUD", !in_game);
            set_hidden(document, "mainMenu", phase != GamePhase::Menu || self.showing_scores);
            set_hidden(document, "highScoresMenu", !self.showing_scores);
            set_hidden(document, "pauseMenu", phase != GamePhase::Paused);
            set_hidden(document, "gameOverMenu", phase != GamePhase::GameOver);
        }

        fn show_high_scores(&mut self, document: &Document) {
            self.showing_scores = true;
            let scores = match &self.storage {
                Some(storage) => HighScores::load(storage),
                None => HighScores::new(),
            };

            let html = if scores.is_empty() {
                "<p class=\"no-scores\">No scores yet!</p>".to_string()
            } else {
                scores
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| {
                        format!(
                            "<div class=\"score-item\"><span class=\"score-rank\">#{}</span>\
                             <span class=\"score-value\">{}</span>\
                             <span class=\"score-wave\">wave {}</span>\
                             <span class=\"score-date\">{}</span></div>",
                            i + 1,
                            entry.score,
                            entry.wave,
                            highscores::format_date(entry.timestamp)
                        )
                    })
                    .collect()
            };
            if let Some(list) = document.get_element_by_id("scoresList") {
                list.set_inner_html(&html);
            }
        }
    }

    fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
        document.get_element_by_id(id)?.dyn_into::<T>().ok()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Star Raid starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            RenderState::new(surface, &adapter, width, height, (FIELD_WIDTH, FIELD_HEIGHT))
                .await
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        if let Some(loading) = document.get_element_by_id("loadingScreen") {
            let _ = loading.class_list().add_1("hidden");
        }

        setup_keyboard(&window, game.clone())?;
        setup_touch_controls(&window, &document, game.clone())?;
        setup_menu_buttons(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone())?;

        request_animation_frame(game);

        log::info!("Star Raid running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let playing = matches!(g.state.phase, GamePhase::Playing | GamePhase::Paused);
                if g.input.key_down(&event.key()) && playing {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            game.borrow_mut().input.key_up(&event.key());
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Touch position relative to an element
    fn touch_pos(event: &TouchEvent, area: &Element) -> Option<Vec2> {
        let touch = event.touches().get(0)?;
        let rect = area.get_bounding_client_rect();
        Some(Vec2::new(
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn setup_touch_controls(
        window: &web_sys::Window,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let user_agent = window.navigator().user_agent().unwrap_or_default();
        let mobile = MOBILE_AGENTS.iter().any(|a| user_agent.contains(a));
        if let Some(controls) = element::<HtmlElement>(document, "mobileControls") {
            let display = if mobile { "block" } else { "none" };
            controls.style().set_property("display", display)?;
        }
        if !mobile {
            return Ok(());
        }

        let (Some(area), Some(fire_btn)) = (
            document.get_element_by_id("joystickArea"),
            document.get_element_by_id("mobileFireBtn"),
        ) else {
            return Ok(());
        };

        {
            let game = game.clone();
            let area_ref = area.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_pos(&event, &area_ref) {
                    game.borrow_mut().input.touch_start(pos);
                }
            });
            area.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let area_ref = area.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_pos(&event, &area_ref) {
                    game.borrow_mut().input.touch_move(pos);
                }
            });
            area.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.touch_end();
            });
            area.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
            let mut g = game.borrow_mut();
            if g.state.phase == GamePhase::Playing {
                g.input.tap_fire();
            }
        });
        fire_btn.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn on_click(document: &Document, id: &str, game: &Rc<RefCell<Game>>, action: fn(&mut Game, &Document)) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{}", id);
            return;
        };
        let game = game.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            action(&mut game.borrow_mut(), &doc);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_menu_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["startBtn", "restartBtn", "playAgainBtn"] {
            on_click(document, id, &game, |g, _| g.start());
        }
        on_click(document, "resumeBtn", &game, |g, _| {
            if g.state.phase == GamePhase::Paused {
                g.state.toggle_pause();
            }
        });
        for id in ["mainMenuBtn", "backToMenuBtn", "backFromScoresBtn"] {
            on_click(document, id, &game, |g, _| g.show_menu());
        }
        on_click(document, "highScoresBtn", &game, |g, doc| g.show_high_scores(doc));
        on_click(document, "soundToggle", &game, |g, _| g.toggle_sound());
    }

    fn setup_auto_pause(
        window: &web_sys::Window,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        fn pause(game: &Rc<RefCell<Game>>, reason: &str) {
            let mut g = game.borrow_mut();
            g.input.clear();
            if g.state.phase == GamePhase::Playing {
                g.state.toggle_pause();
                log::info!("Auto-paused ({})", reason);
            }
        }

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    pause(&game, "tab hidden");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            pause(&game, "window blur");
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
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
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_ui(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session driven by a simple autopilot
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use star_raid::consts::TICKS_PER_SECOND;
    use star_raid::highscores::{self, HighScores};
    use star_raid::persistence::{MemoryStorage, StorageError};
    use star_raid::sim::{GameEvent, GamePhase, GameState, SimConfig, TickInput, tick};

    /// Dead zone before the autopilot steers
    const STEER_DEAD_ZONE: f32 = 4.0;

    /// Outcome of a headless run
    #[derive(Debug, Clone, PartialEq)]
    pub struct RunSummary {
        pub score: u64,
        pub wave: u32,
        pub ticks: u64,
        pub game_over: bool,
    }

    /// Hold fire and line up under the lowest enemy
    pub fn autopilot(state: &GameState) -> TickInput {
        let player_x = state.player.center().x;
        let target = state
            .enemies
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.center().x);

        let dx = target.map_or(0.0, |x| x - player_x);
        let steer = if dx.abs() > STEER_DEAD_ZONE { dx.signum() } else { 0.0 };
        TickInput {
            axis: Vec2::new(steer, 0.0),
            fire: true,
            ..Default::default()
        }
    }

    pub fn run_session(seed: u64, max_seconds: u64) -> RunSummary {
        let mut state = GameState::new(seed, SimConfig::default());
        state.start_game();
        let max_ticks = max_seconds * TICKS_PER_SECOND as u64;

        while state.phase == GamePhase::Playing && state.time_ticks < max_ticks {
            let input = autopilot(&state);
            tick(&mut state, &input);
            for event in state.drain_events() {
                if let GameEvent::WaveStarted { wave, boss: true } = event {
                    log::debug!("Boss wave {} at tick {}", wave, state.time_ticks);
                }
            }
        }

        RunSummary {
            score: state.score,
            wave: state.wave,
            ticks: state.time_ticks,
            game_over: state.phase == GamePhase::GameOver,
        }
    }

    pub fn record(storage: &MemoryStorage, summary: &RunSummary) -> Result<Option<usize>, StorageError> {
        highscores::record_run(storage, summary.score, summary.wave, 0.0)
    }

    pub fn main() {
        env_logger::init();
        log::info!("Star Raid (native) starting...");
        log::info!("Native mode runs a headless autopilot session - use the web build to play");

        let mut args = std::env::args().skip(1);
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
        let seconds = args.next().and_then(|s| s.parse().ok()).unwrap_or(120);

        let summary = run_session(seed, seconds);
        let storage = MemoryStorage::new();
        if let Err(e) = record(&storage, &summary) {
            log::warn!("Could not record run: {e}");
        }

        println!(
            "seed {}: score {} on wave {} after {} ticks ({})",
            seed,
            summary.score,
            summary.wave,
            summary.ticks,
            if summary.game_over { "destroyed" } else { "survived" }
        );
        if let Some(best) = HighScores::load(&storage).top_score() {
            println!("leaderboard best: {}", best);
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_autopilot_steers_toward_lowest_enemy() {
            let mut state = GameState::new(1, SimConfig::default());
            state.start_game();
            assert_eq!(autopilot(&state).axis, Vec2::ZERO);
            assert!(autopilot(&state).fire);

            let id = state.next_entity_id();
            let enemy = star_raid::sim::Enemy::new(
                id,
                star_raid::sim::EnemyKind::Basic,
                Vec2::new(100.0, 50.0),
                &mut state.rng,
            );
            state.enemies.push(enemy);
            assert_eq!(autopilot(&state).axis.x, -1.0);
        }

        #[test]
        fn test_headless_session_is_reproducible() {
            let a = run_session(7, 20);
            let b = run_session(7, 20);
            assert_eq!(a, b);
            assert!(a.ticks > 0);
        }

        #[test]
        fn test_record_summary() {
            let storage = MemoryStorage::new();
            let summary = RunSummary {
                score: 300,
                wave: 2,
                ticks: 100,
                game_over: true,
            };
            assert_eq!(record(&storage, &summary).unwrap(), Some(1));
            assert_eq!(highscores::best_score(&storage), 300);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::main();
}
