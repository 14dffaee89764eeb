//! Data-driven game balance
//!
//! Every difficulty formula the simulation uses reads its coefficients from
//! here. Defaults reproduce the stock game; a JSON document may override any
//! subset of fields.

use serde::{Deserialize, Serialize};

/// Logical playfield size reported by the display surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Balance coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawning ===
    /// Per-tick spawn probability at level 0
    pub spawn_chance_base: f32,
    /// Added spawn probability per level
    pub spawn_chance_per_level: f32,

    // === Customers ===
    pub customer_speed_base: f32,
    pub customer_speed_per_level: f32,
    pub tip_chance_base: f32,
    pub tip_chance_per_level: f32,
    /// Ticks a served customer spends drinking
    pub drink_ticks: u32,

    // === Coffee ===
    /// Speed lost per tick while sliding
    pub coffee_friction: f32,
    /// Speed floor
    pub coffee_min_speed: f32,
    /// Coffee/customer proximity that counts as a catch
    pub catch_distance: f32,

    // === Mugs and tips ===
    pub mug_delay_base: f32,
    pub mug_delay_per_level: f32,
    pub mug_delay_floor: f32,
    /// Per-entry return delay range [min, max)
    pub mug_return_min: f32,
    pub mug_return_max: f32,
    /// Empty mug speed range [min, max)
    pub mug_speed_min: f32,
    pub mug_speed_max: f32,
    /// Tip value range [min, max)
    pub tip_value_min: u32,
    pub tip_value_max: u32,
    /// Bartender pickup radius for tips and mugs
    pub pickup_radius: f32,

    // === Scoring ===
    pub serve_points: u64,
    pub mug_points: u64,

    // === Distraction show ===
    pub distraction_ticks: u32,
    pub distraction_chance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_chance_base: 0.02,
            spawn_chance_per_level: 0.005,

            customer_speed_base: 0.5,
            customer_speed_per_level: 0.1,
            tip_chance_base: 0.1,
            tip_chance_per_level: 0.02,
            drink_ticks: 60,

            coffee_friction: 0.02,
            coffee_min_speed: 1.0,
            catch_distance: 30.0,

            mug_delay_base: 60.0,
            mug_delay_per_level: 3.0,
            mug_delay_floor: 30.0,
            mug_return_min: 30.0,
            mug_return_max: 60.0,
            mug_speed_min: 2.0,
            mug_speed_max: 3.0,
            tip_value_min: 50,
            tip_value_max: 200,
            pickup_radius: 40.0,

            serve_points: 10,
            mug_points: 5,

            distraction_ticks: 180,
            distraction_chance: 0.6,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Clamp values that would break the simulation's invariants
    pub fn sanitized(mut self) -> Self {
        self.spawn_chance_base = self.spawn_chance_base.clamp(0.0, 1.0);
        self.tip_chance_base = self.tip_chance_base.clamp(0.0, 1.0);
        self.distraction_chance = self.distraction_chance.clamp(0.0, 1.0);
        self.coffee_friction = self.coffee_friction.max(0.0);
        self.coffee_min_speed = self.coffee_min_speed.max(0.0);
        self.mug_delay_floor = self.mug_delay_floor.max(0.0);
        if self.mug_return_max < self.mug_return_min {
            self.mug_return_max = self.mug_return_min;
        }
        if self.mug_speed_max < self.mug_speed_min {
            self.mug_speed_max = self.mug_speed_min;
        }
        if self.tip_value_max <= self.tip_value_min {
            self.tip_value_min = self.tip_value_min.min(u32::MAX - 1);
            self.tip_value_max = self.tip_value_min + 1;
        }
        self
    }

    /// Per-tick customer spawn probability at `level`
    pub fn spawn_chance(&self, level: u32) -> f32 {
        (self.spawn_chance_base + level as f32 * self.spawn_chance_per_level).clamp(0.0, 1.0)
    }

    /// Customer walking speed fixed at spawn
    pub fn customer_speed(&self, level: u32) -> f32 {
        self.customer_speed_base + level as f32 * self.customer_speed_per_level
    }

    /// Tip probability fixed at spawn
    pub fn tip_chance(&self, level: u32) -> f32 {
        (self.tip_chance_base + level as f32 * self.tip_chance_per_level).clamp(0.0, 1.0)
    }

    /// Global mug-return cooldown for `level`
    pub fn min_mug_delay(&self, level: u32) -> f32 {
        (self.mug_delay_base - level as f32 * self.mug_delay_per_level).max(self.mug_delay_floor)
    }
}
