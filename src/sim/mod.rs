//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform dependencies:
//! - One tick per display frame
//! - Seeded RNG only
//! - Stable iteration order (creation order)

pub mod customer;
pub mod state;
pub mod tick;

pub use customer::{Customer, CustomerKind, CustomerState, CustomerStep};
pub use state::{
    Bartender, Coffee, DistractionEvent, EmptyMug, GameEvent, GamePhase, GameState,
    LifeLostCause, PendingMug, Tip,
};
pub use tick::{TickInput, start_distraction, tick};
