//! Renderer seam
//!
//! The loop driver hands the renderer a read-only view of the session once per
//! frame. Rendering never mutates simulation state.

use crate::sim::GameState;

pub trait Renderer {
    fn draw(&mut self, state: &GameState);
}

/// Renderer that only counts frames (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: u64,
}

impl Renderer for NullRenderer {
    fn draw(&mut self, _state: &GameState) {
        self.frames += 1;
    }
}

/// Glyph spacing for the coffee trail
pub const TRAIL_SPACING: f32 = 10.0;
/// Glyphs drawn behind a sliding coffee
pub const TRAIL_LENGTH: usize = 3;

/// Power bar fill fraction for the current charge
pub fn power_fraction(state: &GameState) -> f32 {
    (state.bartender.tap_power / crate::consts::TAP_POWER_MAX).clamp(0.0, 1.0)
}

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

#[cfg(target_arch = "wasm32")]
mod canvas {
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use super::{Renderer, TRAIL_LENGTH, TRAIL_SPACING, power_fraction};
    use crate::attract::{AttractScreen, STEAM_GLYPH};
    use crate::consts::*;
    use crate::lane_y;
    use crate::settings::Settings;
    use crate::sim::{CustomerState, GameState};

    const BACKGROUND: &str = "#2b1d14";
    const COUNTER: &str = "#8b5a2b";
    const COUNTER_ACTIVE: &str = "#c8843f";
    const GOLD: &str = "#ffd700";
    const TEXT: &str = "#fff8e7";

    /// 2D canvas renderer drawing everything with emoji glyphs
    pub struct CanvasRenderer {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        settings: Settings,
        /// Frames drawn, drives purely visual motion
        frame: u64,
    }

    impl CanvasRenderer {
        /// Returns None if the canvas has no 2D context
        pub fn new(canvas: HtmlCanvasElement, settings: Settings) -> Option<Self> {
            let ctx = canvas
                .get_context("2d")
                .ok()
                .flatten()?
                .dyn_into::<CanvasRenderingContext2d>()
                .ok()?;
            Some(Self {
                canvas,
                ctx,
                settings,
                frame: 0,
            })
        }

        pub fn set_settings(&mut self, settings: Settings) {
            self.settings = settings;
        }

        fn size(&self) -> (f64, f64) {
            (self.canvas.width() as f64, self.canvas.height() as f64)
        }

        fn clear(&self) {
            let (w, h) = self.size();
            self.ctx.set_fill_style_str(BACKGROUND);
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }

        fn glyph(&self, glyph: &str, x: f32, y: f32, size: u32) {
            self.ctx.set_font(&format!("{size}px sans-serif"));
            self.ctx.fill_text(glyph, x as f64, y as f64).ok();
        }

        fn draw_counters(&self, state: &GameState) {
            for lane in 0..LANE_COUNT {
                let color = if lane == state.bartender.lane {
                    COUNTER_ACTIVE
                } else {
                    COUNTER
                };
                self.ctx.set_fill_style_str(color);
                self.ctx.fill_rect(
                    COUNTER_START_X as f64,
                    lane_y(lane) as f64 + 20.0,
                    COUNTER_LENGTH as f64,
                    10.0,
                );
            }
        }

        fn draw_bartender(&self, state: &GameState) {
            let b = &state.bartender;
            let y = lane_y(b.lane);
            self.glyph("☕", b.x + 20.0, y - 10.0, 20);
            self.glyph("👨", b.x, y, 32);

            if b.tap_charging {
                let fraction = power_fraction(state) as f64;
                self.ctx.set_fill_style_str("#444");
                self.ctx.fill_rect(b.x as f64 - 16.0, y as f64 - 44.0, 40.0, 6.0);
                self.ctx.set_fill_style_str(GOLD);
                self.ctx
                    .fill_rect(b.x as f64 - 16.0, y as f64 - 44.0, 40.0 * fraction, 6.0);
            }
        }

        fn draw_customers(&self, state: &GameState) {
            for customer in &state.customers {
                if customer.distracted {
                    self.ctx.set_fill_style_str(GOLD);
                    self.ctx.begin_path();
                    self.ctx
                        .arc(
                            customer.pos.x as f64 + 14.0,
                            customer.pos.y as f64 - 10.0,
                            20.0,
                            0.0,
                            std::f64::consts::TAU,
                        )
                        .ok();
                    self.ctx.fill();
                }
                self.glyph(customer.glyph(), customer.pos.x, customer.pos.y, 28);
                if matches!(customer.state, CustomerState::Drinking { .. }) {
                    self.glyph("💭", customer.pos.x + 20.0, customer.pos.y - 28.0, 16);
                }
            }
        }

        fn draw_coffees(&self, state: &GameState) {
            for coffee in &state.coffees {
                if self.settings.coffee_trails {
                    for i in 1..=TRAIL_LENGTH {
                        self.ctx.set_global_alpha(0.5 / i as f64);
                        self.glyph(
                            "☕",
                            coffee.pos.x - TRAIL_SPACING * i as f32,
                            coffee.pos.y,
                            18,
                        );
                    }
                    self.ctx.set_global_alpha(1.0);
                }
                self.glyph("☕", coffee.pos.x, coffee.pos.y, 22);
            }
        }

        fn draw_mugs(&self, state: &GameState) {
            for mug in &state.empty_mugs {
                self.ctx.save();
                self.ctx.translate(mug.pos.x as f64, mug.pos.y as f64).ok();
                self.ctx.rotate(mug.spin as f64).ok();
                self.glyph("🥤", -10.0, 8.0, 20);
                self.ctx.restore();
            }
        }

        fn draw_tips(&self, state: &GameState) {
            for tip in &state.tips {
                let bob = if self.settings.effective_bobbing() {
                    tip.bob.sin() * 4.0
                } else {
                    0.0
                };
                self.glyph("💰", tip.pos.x, tip.pos.y + bob, 20);
                self.ctx.set_fill_style_str(GOLD);
                self.glyph(&format!("${}", tip.points), tip.pos.x, tip.pos.y + bob - 22.0, 12);
            }
        }

        fn draw_distraction(&self, state: &GameState) {
            if !state.distraction.active {
                return;
            }
            let (w, _) = self.size();
            let center = w as f32 / 2.0;
            let sway = (self.frame as f32 * 0.1).sin() * 20.0;
            self.glyph("💃", center - 40.0 + sway, 60.0, 36);
            self.glyph("💃", center + 20.0 - sway, 60.0, 36);

            if self.settings.effective_sparkles() {
                for i in 0..6 {
                    let angle = self.frame as f32 * 0.05 + i as f32 * std::f32::consts::TAU / 6.0;
                    self.glyph(
                        "✨",
                        center + angle.cos() * 70.0,
                        50.0 + angle.sin() * 25.0,
                        16,
                    );
                }
            }
        }

        /// Start-screen animation
        pub fn draw_attract(&mut self, attract: &AttractScreen) {
            self.clear();
            for b in &attract.beverages {
                let size = (36.0 * b.scale) as u32;
                self.glyph(b.glyph, b.x, b.y + b.offset_y(), size);
            }
            for puff in &attract.steam {
                self.ctx.set_global_alpha(puff.alpha() as f64);
                self.glyph(STEAM_GLYPH, puff.x, puff.y - puff.rise(), 24);
            }
            self.ctx.set_global_alpha(1.0);
        }
    }

    impl Renderer for CanvasRenderer {
        fn draw(&mut self, state: &GameState) {
            self.frame += 1;
            self.clear();
            self.ctx.set_fill_style_str(TEXT);
            self.draw_counters(state);
            self.ctx.set_fill_style_str(TEXT);
            self.draw_distraction(state);
            self.draw_tips(state);
            self.ctx.set_fill_style_str(TEXT);
            self.draw_mugs(state);
            self.draw_coffees(state);
            self.draw_customers(state);
            self.draw_bartender(state);
        }
    }
}
