//! Game state and core simulation types
//!
//! One `GameState` holds everything a session owns. Restarting a session means
//! building a new one, never patching an old one back to zero.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::customer::Customer;
use crate::consts::*;
use crate::lane_y;
use crate::tuning::{Playfield, Tuning};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Lives ran out; the state is frozen
    GameOver,
}

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeLostCause {
    /// A coffee slid off the far end of the counter
    CoffeeSpilled,
    /// A thirsty customer reached the bartender
    CustomerReached,
    /// An empty mug fell off the near end
    MugDropped,
}

/// Things that happened during a tick, drained by the loop driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CoffeePoured { lane: usize, speed: f32 },
    CoffeeCaught { lane: usize },
    CustomerServed { lane: usize },
    LifeLost { cause: LifeLostCause },
    TipCollected { points: u32 },
    MugCollected,
    DistractionStarted { distracted: usize },
    LevelUp { level: u32 },
    GameOver { score: u64, level: u32 },
}

/// The bartender and the charge-to-serve tap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bartender {
    /// Counter index (0..LANE_COUNT)
    pub lane: usize,
    /// Horizontal position, bounded to [BARTENDER_MIN_X, BARTENDER_MAX_X]
    pub x: f32,
    /// Accumulated tap power (0..=TAP_POWER_MAX)
    pub tap_power: f32,
    /// Serve button is held
    pub tap_charging: bool,
}

impl Default for Bartender {
    fn default() -> Self {
        Self {
            lane: 0,
            x: BARTENDER_START_X,
            tap_power: 0.0,
            tap_charging: false,
        }
    }
}

impl Bartender {
    /// True when something at (`lane`, `x`) is within `radius` of the bartender
    pub fn can_reach(&self, lane: usize, x: f32, radius: f32) -> bool {
        self.lane == lane && (x - self.x).abs() < radius
    }
}

/// A coffee sliding toward the customers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coffee {
    pub id: u32,
    pub lane: usize,
    pub pos: Vec2,
    pub speed: f32,
    /// Set once when a customer takes it
    pub caught: bool,
}

impl Coffee {
    pub fn new(id: u32, lane: usize, x: f32, speed: f32) -> Self {
        Self {
            id,
            lane,
            pos: Vec2::new(x, lane_y(lane)),
            speed,
            caught: false,
        }
    }

    /// Apply friction, then advance
    pub fn slide(&mut self, friction: f32, min_speed: f32) {
        self.speed = (self.speed - friction).max(min_speed);
        self.pos.x += self.speed;
    }
}

/// Money left behind by a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tip {
    pub id: u32,
    pub lane: usize,
    pub pos: Vec2,
    pub points: u32,
    /// Decorative bob phase
    pub bob: f32,
}

/// An empty mug sliding back toward the bartender
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyMug {
    pub id: u32,
    pub lane: usize,
    pub pos: Vec2,
    pub speed: f32,
    /// Decorative spin angle (radians)
    pub spin: f32,
}

/// A mug waiting to be thrown back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingMug {
    pub lane: usize,
    pub x: f32,
    /// Ticks until this mug may be thrown (may go negative while waiting)
    pub delay: f32,
}

/// Dancing show triggered by collecting a tip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistractionEvent {
    pub active: bool,
    pub remaining_ticks: u32,
    pub duration: u32,
}

impl DistractionEvent {
    pub fn new(duration: u32) -> Self {
        Self {
            active: false,
            remaining_ticks: 0,
            duration,
        }
    }

    /// (Re)start the show at full duration
    pub fn activate(&mut self) {
        self.active = true;
        self.remaining_ticks = self.duration;
    }

    /// Count down one tick
    pub fn advance(&mut self) {
        if self.active {
            self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
            if self.remaining_ticks == 0 {
                self.active = false;
            }
        }
    }
}

/// Complete session state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Session seed
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub playfield: Playfield,
    pub score: u64,
    /// Remaining lives; the session ends at zero
    pub lives: i32,
    /// Current level (starts at 1, never decreases)
    pub level: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub bartender: Bartender,
    /// Global cooldown between thrown mugs (ticks)
    pub min_mug_delay: f32,
    /// Ticks since the last mug was thrown
    pub last_mug_thrown: u32,
    pub distraction: DistractionEvent,
    /// Entity collections, each in creation order
    pub customers: Vec<Customer>,
    pub coffees: Vec<Coffee>,
    pub empty_mugs: Vec<EmptyMug>,
    pub tips: Vec<Tip>,
    pub pending_mugs: Vec<PendingMug>,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh session with default tuning and playfield
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Playfield::default())
    }

    /// Create a fresh session
    pub fn with_config(seed: u64, tuning: Tuning, playfield: Playfield) -> Self {
        let tuning = tuning.sanitized();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            min_mug_delay: tuning.mug_delay_base,
            distraction: DistractionEvent::new(tuning.distraction_ticks),
            tuning,
            playfield,
            score: 0,
            lives: START_LIVES,
            level: 1,
            phase: GamePhase::Playing,
            time_ticks: 0,
            bartender: Bartender::default(),
            last_mug_thrown: 0,
            customers: Vec::new(),
            coffees: Vec::new(),
            empty_mugs: Vec::new(),
            tips: Vec::new(),
            pending_mugs: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take every event raised since the previous call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Deduct one life
    pub fn lose_life(&mut self, cause: LifeLostCause) {
        self.lives -= 1;
        log::debug!("Life lost ({:?}), {} left", cause, self.lives);
        self.events.push(GameEvent::LifeLost { cause });
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
