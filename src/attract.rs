//! Start-screen attract animation
//!
//! Purely decorative: drinks drift around the menu and now and then let off
//! steam. Runs on real time (seconds), not simulation ticks.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub const BEVERAGE_GLYPHS: [&str; 6] = ["☕", "🥤", "🫖", "🧋", "🥛", "🍵"];
pub const STEAM_GLYPH: &str = "💨";

/// Delay between the initial staggered spawns
const SPAWN_STAGGER: f32 = 0.5;
/// Respawn delay upper bound after a drink expires
const RESPAWN_MAX_DELAY: f32 = 2.0;
const STEAM_INTERVAL: f32 = 2.0;
const STEAM_LIFETIME: f32 = 3.0;
const STEAM_RISE: f32 = 60.0;
/// Screens at least this wide get the fuller set of drinks
const WIDE_SCREEN: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatStyle {
    Float,
    FloatSlow,
}

#[derive(Debug, Clone)]
pub struct FloatingBeverage {
    pub glyph: &'static str,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub style: FloatStyle,
    pub age: f32,
    pub lifetime: f32,
}

impl FloatingBeverage {
    /// Vertical drift at the current age
    pub fn offset_y(&self) -> f32 {
        let amplitude = match self.style {
            FloatStyle::Float => 20.0,
            FloatStyle::FloatSlow => 10.0,
        };
        let phase = self.age / self.lifetime * std::f32::consts::TAU;
        -amplitude * phase.sin()
    }
}

#[derive(Debug, Clone)]
pub struct SteamPuff {
    pub x: f32,
    pub y: f32,
    pub age: f32,
}

impl SteamPuff {
    /// Current rise above the source, in pixels
    pub fn rise(&self) -> f32 {
        STEAM_RISE * (self.age / STEAM_LIFETIME)
    }

    /// Remaining opacity (1 to 0)
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / STEAM_LIFETIME).clamp(0.0, 1.0)
    }
}

pub struct AttractScreen {
    rng: Pcg32,
    width: f32,
    height: f32,
    running: bool,
    pub beverages: Vec<FloatingBeverage>,
    pub steam: Vec<SteamPuff>,
    /// Seconds until each queued drink appears
    pending: Vec<f32>,
    steam_timer: f32,
}

impl AttractScreen {
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let mut screen = Self {
            rng: Pcg32::seed_from_u64(seed),
            width,
            height,
            running: false,
            beverages: Vec::new(),
            steam: Vec::new(),
            pending: Vec::new(),
            steam_timer: 0.0,
        };
        screen.init();
        screen
    }

    fn init(&mut self) {
        let count = if self.width > WIDE_SCREEN { 15 } else { 10 };
        self.pending = (0..count).map(|i| i as f32 * SPAWN_STAGGER).collect();
        self.steam_timer = 0.0;
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if !self.running {
            return;
        }

        let mut expired = 0;
        self.beverages.retain_mut(|b| {
            b.age += dt;
            if b.age >= b.lifetime {
                expired += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..expired {
            let delay = self.rng.random::<f32>() * RESPAWN_MAX_DELAY;
            self.pending.push(delay);
        }

        let mut due = 0;
        self.pending.retain_mut(|delay| {
            *delay -= dt;
            if *delay <= 0.0 {
                due += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..due {
            self.spawn_beverage();
        }

        self.steam.retain_mut(|puff| {
            puff.age += dt;
            puff.age < STEAM_LIFETIME
        });

        self.steam_timer += dt;
        if self.steam_timer >= STEAM_INTERVAL {
            self.steam_timer -= STEAM_INTERVAL;
            self.let_off_steam();
        }
    }

    fn spawn_beverage(&mut self) {
        let glyph = BEVERAGE_GLYPHS[self.rng.random_range(0..BEVERAGE_GLYPHS.len())];
        let x = self.rng.random::<f32>() * (self.width - 100.0).max(0.0);
        let y = 50.0 + self.rng.random::<f32>() * (self.height - 200.0).max(0.0);
        let lifetime = 3.0 + self.rng.random::<f32>() * 4.0;
        let style = if self.rng.random::<f32>() > 0.5 {
            FloatStyle::Float
        } else {
            FloatStyle::FloatSlow
        };
        let scale = 0.8 + self.rng.random::<f32>() * 0.4;

        self.beverages.push(FloatingBeverage {
            glyph,
            x,
            y,
            scale,
            style,
            age: 0.0,
            lifetime,
        });
    }

    fn let_off_steam(&mut self) {
        if self.beverages.is_empty() {
            return;
        }
        let index = self.rng.random_range(0..self.beverages.len());
        let source = &self.beverages[index];
        self.steam.push(SteamPuff {
            x: source.x,
            y: source.y + source.offset_y(),
            age: 0.0,
        });
    }

    /// Halt and clear the screen
    pub fn stop(&mut self) {
        self.running = false;
        self.beverages.clear();
        self.steam.clear();
        self.pending.clear();
    }

    /// Start over from an empty screen
    pub fn resume(&mut self) {
        self.stop();
        self.init();
    }
}
