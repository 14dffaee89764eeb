//! Customers and their advance / retreat / drink cycle

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::lane_y;
use crate::tuning::{Playfield, Tuning};

/// Cosmetic customer category, gated by level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerKind {
    Cowboy,
    Athlete,
    Punk,
    Alien,
}

impl CustomerKind {
    /// Category for customers created at `level`
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=2 => CustomerKind::Cowboy,
            3..=4 => CustomerKind::Athlete,
            5..=6 => CustomerKind::Punk,
            _ => CustomerKind::Alien,
        }
    }

    /// Glyphs a customer of this category may be drawn with
    pub fn variants(&self) -> &'static [&'static str] {
        match self {
            CustomerKind::Cowboy => &["🤠", "🧑‍🌾", "👨‍🌾", "👩‍🌾"],
            CustomerKind::Athlete => &["⚽", "🏀", "🏈", "🎾", "🏐"],
            CustomerKind::Punk => &["🎸", "🎤", "🥁", "🎹"],
            CustomerKind::Alien => &["👽", "🛸", "🤖", "👾"],
        }
    }
}

/// Movement state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CustomerState {
    /// Walking toward the bartender while thirsty
    Advancing,
    /// Pushed back by a caught coffee; `push_back` is the distance left
    Retreating { push_back: f32 },
    /// Drinking in place; `timer` ticks remain
    Drinking { timer: u32 },
}

/// What a customer's update asks the simulation to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerStep {
    /// Nothing to report
    Stay,
    /// Reached the bartender still thirsty: remove, lose a life
    Reached,
    /// Pushed out the far door: remove silently
    Left,
    /// Finished a drink: maybe tip, always return a mug
    FinishedDrink,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: u32,
    pub lane: usize,
    pub pos: Vec2,
    /// Walking speed, fixed at spawn
    pub speed: f32,
    pub has_order: bool,
    pub state: CustomerState,
    /// Tip probability, fixed at spawn
    pub tip_chance: f32,
    pub distracted: bool,
    pub distraction_ticks: u32,
    pub kind: CustomerKind,
    /// Index into `kind.variants()`
    pub variant: usize,
}

impl Customer {
    /// Spawn a customer at the far end of `lane`
    pub fn new<R: Rng>(
        id: u32,
        lane: usize,
        level: u32,
        tuning: &Tuning,
        playfield: &Playfield,
        rng: &mut R,
    ) -> Self {
        let kind = CustomerKind::for_level(level);
        let variant = rng.random_range(0..kind.variants().len());
        Self {
            id,
            lane,
            pos: Vec2::new(playfield.width - CUSTOMER_SPAWN_INSET, lane_y(lane)),
            speed: tuning.customer_speed(level),
            has_order: true,
            state: CustomerState::Advancing,
            tip_chance: tuning.tip_chance(level),
            distracted: false,
            distraction_ticks: 0,
            kind,
            variant,
        }
    }

    pub fn glyph(&self) -> &'static str {
        let variants = self.kind.variants();
        variants[self.variant % variants.len()]
    }

    /// Advance one tick. Side effects are reported, not applied.
    pub fn update(&mut self, playfield_width: f32, drink_ticks: u32) -> CustomerStep {
        // A distracted customer stands still; only the distraction wears off
        if self.distracted {
            self.distraction_ticks = self.distraction_ticks.saturating_sub(1);
            if self.distraction_ticks == 0 {
                self.distracted = false;
            }
            return CustomerStep::Stay;
        }

        match self.state {
            CustomerState::Advancing => {
                if self.has_order {
                    self.pos.x -= self.speed;
                    if self.pos.x <= CUSTOMER_REACH_X {
                        return CustomerStep::Reached;
                    }
                }
                CustomerStep::Stay
            }
            CustomerState::Retreating { push_back } => {
                let step = self.speed * RETREAT_FACTOR;
                self.pos.x += step;
                let push_back = push_back - step;

                if self.pos.x >= playfield_width - CUSTOMER_EXIT_INSET {
                    return CustomerStep::Left;
                }

                self.state = if push_back <= 0.0 {
                    CustomerState::Drinking { timer: drink_ticks }
                } else {
                    CustomerState::Retreating { push_back }
                };
                CustomerStep::Stay
            }
            CustomerState::Drinking { timer } => {
                let timer = timer.saturating_sub(1);
                if timer == 0 {
                    self.state = CustomerState::Advancing;
                    self.has_order = true;
                    CustomerStep::FinishedDrink
                } else {
                    self.state = CustomerState::Drinking { timer };
                    CustomerStep::Stay
                }
            }
        }
    }

    /// Take a coffee arriving at `coffee_speed`; faster coffees push further
    pub fn serve(&mut self, coffee_speed: f32) {
        self.has_order = false;
        self.state = CustomerState::Retreating {
            push_back: (coffee_speed * PUSH_BACK_PER_SPEED).min(PUSH_BACK_MAX),
        };
    }

    /// Freeze for `duration` ticks (restarts any running distraction)
    pub fn distract(&mut self, duration: u32) {
        self.distracted = true;
        self.distraction_ticks = duration;
    }
}
