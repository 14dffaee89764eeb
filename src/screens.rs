//! Screen host: menus and navigation around the game
//!
//! Pure state machine. Key presses and button clicks go in, a list of
//! `HostEffect`s comes out for the page glue to carry out (swap DOM screens,
//! drive the loop driver, fade music, toggle the attract animation).

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Game,
    Story,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    StartGame,
    StoryMode,
    Exit,
    Back,
    PlayAgain,
    MainMenu,
}

impl MenuItem {
    /// DOM id of the matching button
    pub fn element_id(&self) -> &'static str {
        match self {
            MenuItem::StartGame => "startGame",
            MenuItem::StoryMode => "storyMode",
            MenuItem::Exit => "exitGame",
            MenuItem::Back => "backToMenu",
            MenuItem::PlayAgain => "playAgain",
            MenuItem::MainMenu => "mainMenu",
        }
    }
}

const START_MENU: [MenuItem; 3] = [MenuItem::StartGame, MenuItem::StoryMode, MenuItem::Exit];
const STORY_MENU: [MenuItem; 1] = [MenuItem::Back];
const GAME_OVER_MENU: [MenuItem; 2] = [MenuItem::PlayAgain, MenuItem::MainMenu];

pub const MUSIC_FADE_IN_MS: u32 = 1500;
pub const MUSIC_FADE_OUT_MS: u32 = 1000;
pub const MENU_MUSIC_VOLUME: f32 = 0.7;
pub const STORY_MUSIC_VOLUME: f32 = 0.3;

/// Side effects requested by a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEffect {
    ShowScreen(Screen),
    /// First time into the game
    StartGame,
    /// Every later entry, and Play Again
    RestartGame,
    StopAttract,
    ResumeAttract,
    PlayMusic { fade_ms: u32 },
    StopMusic { fade_ms: u32 },
    SetMusicVolume(f32),
    ShowKeyboardHint,
    HideKeyboardHint,
    ShowGameOver { score: u64, level: u32 },
    HideGameOver,
}

#[derive(Debug)]
pub struct ScreenHost {
    screen: Screen,
    selected: usize,
    game_over: bool,
    game_initialized: bool,
    music_started: bool,
    music_playing: bool,
}

impl Default for ScreenHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenHost {
    pub fn new() -> Self {
        Self {
            screen: Screen::Start,
            selected: 0,
            game_over: false,
            game_initialized: false,
            music_started: false,
            music_playing: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_game_over_visible(&self) -> bool {
        self.screen == Screen::Game && self.game_over
    }

    /// Keys belong to the game loop rather than a menu
    pub fn is_playing(&self) -> bool {
        self.screen == Screen::Game && !self.game_over
    }

    /// Items of the menu currently taking input
    pub fn menu(&self) -> &'static [MenuItem] {
        match self.screen {
            Screen::Start => &START_MENU,
            Screen::Story => &STORY_MENU,
            Screen::Game if self.game_over => &GAME_OVER_MENU,
            Screen::Game => &[],
        }
    }

    /// Focused item, if the current screen has a menu
    pub fn selected(&self) -> Option<MenuItem> {
        self.menu().get(self.selected).copied()
    }

    /// Handle a DOM `KeyboardEvent.code`
    pub fn handle_key(&mut self, code: &str) -> Vec<HostEffect> {
        let mut effects = Vec::new();
        if self.screen == Screen::Start {
            self.start_music_if_needed(&mut effects);
        }

        match (self.screen, code) {
            (Screen::Game, _) if !self.game_over => {}
            (_, "ArrowUp") => self.navigate(-1),
            (_, "ArrowDown") => self.navigate(1),
            (_, "Space" | "Enter") | (Screen::Story, "Escape") => {
                if let Some(item) = self.selected() {
                    effects.extend(self.activate(item));
                }
            }
            _ => {}
        }
        effects
    }

    /// Mouse click on a menu button
    pub fn click(&mut self, item: MenuItem) -> Vec<HostEffect> {
        let mut effects = Vec::new();
        if self.screen == Screen::Start {
            self.start_music_if_needed(&mut effects);
        }
        if !self.menu().contains(&item) {
            log::debug!("Ignoring click on {:?} (not on this screen)", item);
            return effects;
        }
        effects.extend(self.activate(item));
        effects
    }

    /// Move focus, wrapping at both ends
    fn navigate(&mut self, direction: i32) {
        let len = self.menu().len() as i32;
        if len == 0 {
            return;
        }
        self.selected = (self.selected as i32 + direction).rem_euclid(len) as usize;
    }

    fn activate(&mut self, item: MenuItem) -> Vec<HostEffect> {
        log::debug!("Menu item activated: {:?}", item);
        match item {
            MenuItem::StartGame => self.show(Screen::Game),
            MenuItem::StoryMode => self.show(Screen::Story),
            // No window to close in a browser; back to the title
            MenuItem::Exit | MenuItem::Back => self.show(Screen::Start),
            MenuItem::PlayAgain => {
                self.game_over = false;
                self.selected = 0;
                vec![HostEffect::HideGameOver, HostEffect::RestartGame]
            }
            MenuItem::MainMenu => {
                self.game_over = false;
                let mut effects = vec![HostEffect::HideGameOver];
                effects.extend(self.show(Screen::Start));
                effects
            }
        }
    }

    /// Switch screens and run the entry transition
    pub fn show(&mut self, screen: Screen) -> Vec<HostEffect> {
        log::info!("Screen: {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
        self.selected = 0;

        let mut effects = vec![HostEffect::ShowScreen(screen)];
        match screen {
            Screen::Start => {
                effects.push(HostEffect::ResumeAttract);
                if self.music_playing {
                    effects.push(HostEffect::SetMusicVolume(MENU_MUSIC_VOLUME));
                }
                effects.push(HostEffect::ShowKeyboardHint);
            }
            Screen::Game => {
                self.game_over = false;
                effects.push(HostEffect::StopAttract);
                effects.push(HostEffect::StopMusic {
                    fade_ms: MUSIC_FADE_OUT_MS,
                });
                self.music_playing = false;
                effects.push(HostEffect::HideKeyboardHint);
                if self.game_initialized {
                    effects.push(HostEffect::RestartGame);
                } else {
                    self.game_initialized = true;
                    effects.push(HostEffect::StartGame);
                }
            }
            Screen::Story => {
                effects.push(HostEffect::StopAttract);
                effects.push(HostEffect::SetMusicVolume(STORY_MUSIC_VOLUME));
                effects.push(HostEffect::ShowKeyboardHint);
            }
        }
        effects
    }

    /// The loop driver reported the end of the session
    pub fn game_over(&mut self, score: u64, level: u32) -> Vec<HostEffect> {
        if self.screen != Screen::Game {
            return Vec::new();
        }
        self.game_over = true;
        self.selected = 0;
        vec![
            HostEffect::ShowGameOver { score, level },
            HostEffect::ShowKeyboardHint,
        ]
    }

    fn start_music_if_needed(&mut self, effects: &mut Vec<HostEffect>) {
        if self.music_started {
            return;
        }
        log::info!("Starting menu music after user interaction");
        self.music_started = true;
        self.music_playing = true;
        effects.push(HostEffect::PlayMusic {
            fade_ms: MUSIC_FADE_IN_MS,
        });
    }
}
