//! Coffee Tapper entry point
//!
//! In the browser this wires the page (canvas, menus, HUD, keyboard) to the
//! game. Natively it plays a headless session with a scripted bartender.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use coffee_tapper::attract::AttractScreen;
    use coffee_tapper::audio::AudioManager;
    use coffee_tapper::input::{InputState, Key};
    use coffee_tapper::render::{CanvasRenderer, NullRenderer};
    use coffee_tapper::screens::{HostEffect, MenuItem, Screen, ScreenHost};
    use coffee_tapper::{FrameOutcome, Game, Playfield, Settings, Tuning};

    const SCREEN_IDS: [(Screen, &str); 3] = [
        (Screen::Start, "startScreen"),
        (Screen::Game, "gameScreen"),
        (Screen::Story, "storyScreen"),
    ];
    const MENU_ITEMS: [MenuItem; 6] = [
        MenuItem::StartGame,
        MenuItem::StoryMode,
        MenuItem::Exit,
        MenuItem::Back,
        MenuItem::PlayAgain,
        MenuItem::MainMenu,
    ];

    /// Everything the page needs between frames
    struct App {
        document: Document,
        game: Game,
        host: ScreenHost,
        attract: AttractScreen,
        audio: AudioManager,
        /// Visual preferences; audio keeps its own copy for volumes and mute
        settings: Settings,
        renderer: Option<CanvasRenderer>,
        input: InputState,
        last_time: f64,
    }

    impl App {
        fn apply(&mut self, effects: Vec<HostEffect>) {
            for effect in effects {
                match effect {
                    HostEffect::ShowScreen(screen) => self.show_screen(screen),
                    HostEffect::StartGame => {
                        self.input.clear();
                        self.game.start();
                    }
                    HostEffect::RestartGame => {
                        self.input.clear();
                        self.game.restart(js_sys::Date::now() as u64);
                    }
                    HostEffect::StopAttract => self.attract.stop(),
                    HostEffect::ResumeAttract => self.attract.resume(),
                    HostEffect::PlayMusic { fade_ms } => {
                        self.audio.resume();
                        self.audio.play_music(fade_ms);
                    }
                    HostEffect::StopMusic { fade_ms } => self.audio.stop_music(fade_ms),
                    HostEffect::SetMusicVolume(volume) => self.audio.set_music_volume(volume),
                    HostEffect::ShowKeyboardHint => self.set_class("keyboardHint", "hide", false),
                    HostEffect::HideKeyboardHint => self.set_class("keyboardHint", "hide", true),
                    HostEffect::ShowGameOver { score, level } => {
                        if let Some(el) = self.document.get_element_by_id("finalScore") {
                            el.set_text_content(Some(&score.to_string()));
                        }
                        if let Some(el) = self.document.get_element_by_id("finalLevel") {
                            el.set_text_content(Some(&level.to_string()));
                        }
                        self.set_class("gameOver", "hidden", false);
                    }
                    HostEffect::HideGameOver => self.set_class("gameOver", "hidden", true),
                }
            }
            self.update_focus();
        }

        fn show_screen(&self, screen: Screen) {
            for (id_screen, id) in SCREEN_IDS {
                self.set_class(id, "active", id_screen == screen);
            }
            // The story is plain text; the canvas serves the other two
            self.set_class("gameCanvas", "hidden", screen == Screen::Story);
        }

        fn set_class(&self, id: &str, class: &str, on: bool) {
            let Some(el) = self.document.get_element_by_id(id) else {
                log::warn!("Missing element #{}", id);
                return;
            };
            let list = el.class_list();
            let _ = if on { list.add_1(class) } else { list.remove_1(class) };
        }

        /// Mirror keyboard focus onto the menu buttons
        fn update_focus(&self) {
            let selected = self.host.selected();
            for item in MENU_ITEMS {
                if let Some(el) = self.document.get_element_by_id(item.element_id()) {
                    let list = el.class_list();
                    let _ = if Some(item) == selected {
                        list.add_1("focused")
                    } else {
                        list.remove_1("focused")
                    };
                }
            }
        }

        fn update_hud(&self) {
            let state = self.game.state();
            let fields = [
                ("score", state.score.to_string()),
                ("lives", state.lives.to_string()),
                ("level", state.level.to_string()),
            ];
            for (id, text) in fields {
                if let Some(el) = self.document.get_element_by_id(id) {
                    el.set_text_content(Some(&text));
                }
            }
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(0.1)
            } else {
                0.0
            };
            self.last_time = time;

            match self.host.screen() {
                Screen::Game => {
                    let input = self.input.snapshot();
                    let outcome = match self.renderer.as_mut() {
                        Some(renderer) => self.game.frame(&input, renderer, &mut self.audio),
                        None => {
                            self.game
                                .frame(&input, &mut NullRenderer::default(), &mut self.audio)
                        }
                    };
                    self.input.end_frame();
                    self.update_hud();

                    if let FrameOutcome::GameOver { score, level } = outcome {
                        let effects = self.host.game_over(score, level);
                        self.apply(effects);
                    }
                }
                Screen::Start => {
                    self.attract.update(dt);
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.draw_attract(&self.attract);
                    }
                }
                Screen::Story => {}
            }
        }

        fn key_down(&mut self, event: &KeyboardEvent) {
            let code = event.code();
            if code == "KeyM" {
                let muted = self.audio.toggle_mute();
                log::info!("Muted: {}", muted);
                return;
            }
            if code == "KeyR" {
                self.settings.reduced_motion = !self.settings.reduced_motion;
                log::info!("Reduced motion: {}", self.settings.reduced_motion);
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.set_settings(self.settings.clone());
                }
                return;
            }

            if self.host.is_playing() {
                if let Some(key) = Key::from_code(&code) {
                    event.prevent_default();
                    self.input.key_down(key);
                }
                return;
            }

            if matches!(
                code.as_str(),
                "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "Space" | "Enter"
            ) {
                event.prevent_default();
            }
            let effects = self.host.handle_key(&code);
            self.apply(effects);
        }

        fn key_up(&mut self, event: &KeyboardEvent) {
            if let Some(key) = Key::from_code(&event.code()) {
                self.input.key_up(key);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Coffee Tapper starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let settings = load_settings(&document);
        let canvas = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());

        // Everything is laid out on the drawing surface, not the window
        let playfield = canvas
            .as_ref()
            .map(|c| Playfield {
                width: c.width() as f32,
                height: c.height() as f32,
            })
            .unwrap_or_default();
        let renderer = canvas.and_then(|canvas| CanvasRenderer::new(canvas, settings.clone()));
        if renderer.is_none() {
            log::warn!("No usable #gameCanvas - drawing disabled");
        }

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            document: document.clone(),
            game: Game::with_config(seed, Tuning::default(), playfield),
            host: ScreenHost::new(),
            attract: AttractScreen::new(seed, playfield.width, playfield.height),
            audio: AudioManager::new(settings.clone()),
            settings,
            renderer,
            input: InputState::new(),
            last_time: 0.0,
        }));

        {
            let mut a = app.borrow_mut();
            let effects = a.host.show(Screen::Start);
            a.apply(effects);
        }

        setup_keyboard(&document, app.clone());
        setup_buttons(&document, app.clone());
        setup_focus_loss(&document, app.clone());

        request_animation_frame(app);
        log::info!("Coffee Tapper running (seed {})", seed);
    }

    /// Preferences from the page's `#settings` JSON block, if any
    fn load_settings(document: &Document) -> Settings {
        let Some(text) = document
            .get_element_by_id("settings")
            .and_then(|el| el.text_content())
        else {
            return Settings::default();
        };
        match Settings::from_json(&text) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid #settings JSON: {} - using defaults", e);
                Settings::default()
            }
        }
    }

    fn setup_keyboard(document: &Document, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().key_down(&event);
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().key_up(&event);
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        for item in MENU_ITEMS {
            let Some(btn) = document.get_element_by_id(item.element_id()) else {
                log::warn!("Missing menu button #{}", item.element_id());
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                let effects = a.host.click(item);
                a.apply(effects);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Drop held keys when the page loses focus so nothing sticks
    fn setup_focus_loss(document: &Document, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().input.clear();
                    log::debug!("Input cleared (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().input.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            app.borrow_mut().frame(time);
            request_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use coffee_tapper::audio::NullAudio;
    use coffee_tapper::render::NullRenderer;
    use coffee_tapper::sim::{CustomerState, GameState, TickInput};
    use coffee_tapper::{FrameOutcome, Game, Playfield, Tuning};

    /// Ten minutes of play at 60 ticks per second
    const TICK_CAP: u64 = 36_000;
    /// Ticks to hold the tap before letting go
    const CHARGE_TICKS: u32 = 10;

    /// A bartender that walks to the closest thirsty customer and serves
    #[derive(Default)]
    struct ScriptedBartender {
        charging: u32,
    }

    impl ScriptedBartender {
        fn decide(&mut self, state: &GameState) -> TickInput {
            let mut input = TickInput::default();

            let bartender = &state.bartender;
            let target = state
                .customers
                .iter()
                .filter(|c| c.has_order && c.state == CustomerState::Advancing)
                .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

            if self.charging > 0 {
                self.charging += 1;
                let on_target = target.is_some_and(|t| t.lane == bartender.lane);
                if self.charging > CHARGE_TICKS || !on_target {
                    input.serve_released = true;
                    self.charging = 0;
                }
                return input;
            }

            let Some(target) = target else {
                return input;
            };

            if target.lane < bartender.lane {
                input.lane_up = true;
            } else if target.lane > bartender.lane {
                input.lane_down = true;
            } else if !state.coffees.iter().any(|c| c.lane == target.lane) {
                input.serve_pressed = true;
                self.charging = 1;
            }
            input
        }
    }

    fn load_tuning(path: &str) -> Tuning {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Could not read tuning file {}: {} - using defaults", path, e);
                return Tuning::default();
            }
        };
        match Tuning::from_json(&text) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning file {}: {} - using defaults", path, e);
                Tuning::default()
            }
        }
    }

    /// `coffee-tapper [seed] [tuning.json]`
    pub fn run() {
        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(42);
        let tuning = args
            .next()
            .map(|path| load_tuning(&path))
            .unwrap_or_default();

        let mut game = Game::with_config(seed, tuning, Playfield::default());
        let mut bot = ScriptedBartender::default();
        let mut renderer = NullRenderer::default();
        let mut audio = NullAudio;

        game.start();
        let mut result = None;
        while game.state().time_ticks < TICK_CAP {
            let input = bot.decide(game.state());
            if let FrameOutcome::GameOver { score, level } =
                game.frame(&input, &mut renderer, &mut audio)
            {
                result = Some((score, level));
                break;
            }
        }

        let state = game.state();
        match result {
            Some((score, level)) => log::info!(
                "Game over after {} ticks: score {}, level {}",
                state.time_ticks,
                score,
                level
            ),
            None => log::info!(
                "Tick cap reached: score {}, level {}, lives {}",
                state.score,
                state.level,
                state.lives
            ),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Coffee Tapper (native, headless) starting...");
    headless::run();
}
