//! Coffee Tapper - slide coffees down the counters before the customers reach you
//!
//! Core modules:
//! - `sim`: Per-frame simulation (customers, coffees, tips, mugs, scoring)
//! - `game`: Loop driver exposing start/stop/restart to the screen host
//! - `input`: Keyboard state and per-tick input snapshots
//! - `audio`: Named sound cues and the sinks that play them
//! - `render`: Renderer seam (canvas 2D on the web)
//! - `screens`: Menu/screen navigation around the game
//! - `attract`: Decorative start-screen animation
//! - `tuning`: Data-driven game balance

pub mod attract;
pub mod audio;
pub mod game;
pub mod input;
pub mod render;
pub mod screens;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{FrameOutcome, Game};
pub use settings::Settings;
pub use tuning::{Playfield, Tuning};

/// Game configuration constants
pub mod consts {
    /// Number of counters (lanes)
    pub const LANE_COUNT: usize = 4;
    /// Y coordinate of each counter
    pub const LANE_Y: [f32; LANE_COUNT] = [100.0, 200.0, 300.0, 400.0];
    /// Counter drawing extents
    pub const COUNTER_START_X: f32 = 50.0;
    pub const COUNTER_LENGTH: f32 = 700.0;

    /// Bartender horizontal bounds and step per tick while held
    pub const BARTENDER_MIN_X: f32 = 30.0;
    pub const BARTENDER_MAX_X: f32 = 100.0;
    pub const BARTENDER_START_X: f32 = 50.0;
    pub const BARTENDER_STEP: f32 = 3.0;

    /// Tap power charge rate and cap
    pub const TAP_POWER_STEP: f32 = 0.1;
    pub const TAP_POWER_MAX: f32 = 5.0;
    /// Coffee speed with zero charge
    pub const COFFEE_BASE_SPEED: f32 = 2.0;
    /// Coffees leave the tap this far in front of the bartender
    pub const COFFEE_SPAWN_OFFSET: f32 = 30.0;

    /// Customers spawn this far in from the far edge
    pub const CUSTOMER_SPAWN_INSET: f32 = 50.0;
    /// A customer inside this distance of the far edge blocks spawning in its lane
    pub const SPAWN_GUARD_DISTANCE: f32 = 100.0;
    /// Advancing customers at or below this X have reached the bartender
    pub const CUSTOMER_REACH_X: f32 = 80.0;
    /// Retreating customers at or beyond (width - this) leave the bar
    pub const CUSTOMER_EXIT_INSET: f32 = 20.0;
    /// Retreat speed multiplier
    pub const RETREAT_FACTOR: f32 = 1.5;
    /// Push-back distance per unit of coffee speed, and its cap
    pub const PUSH_BACK_PER_SPEED: f32 = 30.0;
    pub const PUSH_BACK_MAX: f32 = 150.0;

    /// Starting lives
    pub const START_LIVES: i32 = 3;
    /// Points per level threshold
    pub const POINTS_PER_LEVEL: u64 = 100;
}

/// Y coordinate of a lane, clamped to the last counter
#[inline]
pub fn lane_y(lane: usize) -> f32 {
    consts::LANE_Y[lane.min(consts::LANE_COUNT - 1)]
}
