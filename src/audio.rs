//! Sound cues and the sinks that play them
//!
//! The simulation only names cues. What a cue sounds like (and whether it
//! sounds at all) is the sink's business; a sink must never block a frame.

use crate::sim::GameEvent;

/// Named sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Coffee poured / customer served
    Served,
    /// Coffee caught by a customer
    Captured,
    /// Something went wrong (also used for level-up and game over)
    Missed,
    /// Tip or mug picked up
    MoneyCollected,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Served => "served",
            Cue::Captured => "captured",
            Cue::Missed => "missed",
            Cue::MoneyCollected => "moneyCollected",
        }
    }
}

impl GameEvent {
    /// Cue to play for this event, if any
    pub fn cue(&self) -> Option<Cue> {
        match self {
            GameEvent::CoffeePoured { .. } | GameEvent::CustomerServed { .. } => Some(Cue::Served),
            GameEvent::CoffeeCaught { .. } => Some(Cue::Captured),
            GameEvent::LifeLost { .. } | GameEvent::LevelUp { .. } | GameEvent::GameOver { .. } => {
                Some(Cue::Missed)
            }
            GameEvent::TipCollected { .. } | GameEvent::MugCollected => Some(Cue::MoneyCollected),
            GameEvent::DistractionStarted { .. } => None,
        }
    }
}

/// Fire-and-forget cue output
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

/// Sink that drops every cue (native builds, headless runs)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: Cue) {}
}

/// Sink that remembers what it was asked to play
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<Cue>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        self.played.push(cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    //! Procedurally generated cues via the Web Audio API - no asset files

    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Cue};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        settings: Settings,
        /// Menu music voices and their shared gain
        music: Option<(Vec<OscillatorNode>, GainNode)>,
    }

    impl AudioManager {
        pub fn new(settings: Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                settings,
                music: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Toggle mute; music is silenced, not stopped
        pub fn toggle_mute(&mut self) -> bool {
            self.settings.muted = !self.settings.muted;
            let target = self.music_target();
            self.ramp_music(target, 0.05);
            self.settings.muted
        }

        /// Set music volume (0.0 - 1.0), applied to the playing loop
        pub fn set_music_volume(&mut self, vol: f32) {
            self.settings.set_music_volume(vol);
            let target = self.music_target();
            self.ramp_music(target, 0.2);
        }

        fn music_target(&self) -> f32 {
            self.settings.effective_music_volume() * 0.15
        }

        /// Start the menu loop, fading in over `fade_ms`
        pub fn play_music(&mut self, fade_ms: u32) {
            if self.music.is_some() {
                log::debug!("Music already playing, not restarting");
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Ok(gain) = ctx.create_gain() else { return };
            if gain.connect_with_audio_node(&ctx.destination()).is_err() {
                return;
            }

            // Soft major chord with a slow beating between the voices
            let mut voices = Vec::new();
            for (freq, detune) in [(220.0, 0.0), (277.18, 3.0), (329.63, -3.0)] {
                let Ok(osc) = ctx.create_oscillator() else { continue };
                osc.set_type(OscillatorType::Triangle);
                osc.frequency().set_value(freq);
                osc.detune().set_value(detune);
                if osc.connect_with_audio_node(&gain).is_ok() && osc.start().is_ok() {
                    voices.push(osc);
                }
            }

            let t = ctx.current_time();
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(self.music_target(), t + fade_ms as f64 / 1000.0)
                .ok();

            log::info!("Menu music started ({} voices)", voices.len());
            self.music = Some((voices, gain));
        }

        /// Fade the menu loop out over `fade_ms`, then stop it
        pub fn stop_music(&mut self, fade_ms: u32) {
            let Some((voices, gain)) = self.music.take() else { return };
            let Some(ctx) = &self.ctx else { return };

            let t = ctx.current_time();
            let end = t + fade_ms as f64 / 1000.0;
            gain.gain().set_value_at_time(gain.gain().value(), t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, end).ok();
            for osc in voices {
                osc.stop_with_when(end).ok();
            }
        }

        fn ramp_music(&self, target: f32, seconds: f64) {
            let (Some(ctx), Some((_, gain))) = (&self.ctx, &self.music) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(gain.gain().value(), t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(target, t + seconds)
                .ok();
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Pour / serve - quick rising slide
        fn play_served(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(700.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Mug caught - solid clink
        fn play_captured(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.2).ok();
            }

            // Body thump
            if let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(60.0, t + 0.1)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Missed - sad descending
        fn play_missed(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 300.0, 200.0].iter().enumerate() {
                let delay = i as f64 * 0.12;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.2, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.25).ok();
                }
            }
        }

        /// Money - happy ding
        fn play_money(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [800.0, 1000.0, 1300.0].iter().enumerate() {
                let delay = i as f64 * 0.06;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, cue: Cue) {
            let vol = self.settings.effective_sfx_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                Cue::Served => self.play_served(ctx, vol),
                Cue::Captured => self.play_captured(ctx, vol),
                Cue::Missed => self.play_missed(ctx, vol),
                Cue::MoneyCollected => self.play_money(ctx, vol),
            }
        }
    }
}
