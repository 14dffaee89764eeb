//! Loop driver
//!
//! Owns the session and advances it exactly one tick per display frame while
//! running. The screen host only ever talks to `start`, `stop` and `restart`.

use crate::audio::AudioSink;
use crate::render::Renderer;
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tuning::{Playfield, Tuning};

/// What happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Loop stopped; only drew
    Idle,
    /// One tick ran
    Ticked,
    /// This frame's tick ended the session
    GameOver { score: u64, level: u32 },
}

pub struct Game {
    state: GameState,
    running: bool,
    tuning: Tuning,
    playfield: Playfield,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Playfield::default())
    }

    pub fn with_config(seed: u64, tuning: Tuning, playfield: Playfield) -> Self {
        Self {
            state: GameState::with_config(seed, tuning.clone(), playfield),
            running: false,
            tuning,
            playfield,
        }
    }

    /// Read-only view for renderers and HUDs
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resume ticking the current session
    pub fn start(&mut self) {
        if self.state.is_over() {
            log::warn!("start() on a finished session ignored; use restart()");
            return;
        }
        if !self.running {
            log::info!("Session started (seed {})", self.state.seed);
        }
        self.running = true;
    }

    /// Stop ticking; the in-flight frame has already completed
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Session stopped at tick {}", self.state.time_ticks);
        }
        self.running = false;
    }

    /// Throw the session away and start a fresh one
    pub fn restart(&mut self, seed: u64) {
        self.state = GameState::with_config(seed, self.tuning.clone(), self.playfield);
        self.running = true;
        log::info!("Session restarted (seed {})", seed);
    }

    /// Run one frame: tick if running, forward cues, draw
    pub fn frame(
        &mut self,
        input: &TickInput,
        renderer: &mut dyn Renderer,
        audio: &mut dyn AudioSink,
    ) -> FrameOutcome {
        let mut outcome = FrameOutcome::Idle;

        if self.running {
            tick(&mut self.state, input);
            outcome = FrameOutcome::Ticked;

            for event in self.state.drain_events() {
                if let Some(cue) = event.cue() {
                    audio.play(cue);
                }
                if let GameEvent::GameOver { score, level } = event {
                    outcome = FrameOutcome::GameOver { score, level };
                }
            }

            if self.state.is_over() {
                self.running = false;
            }
        }

        renderer.draw(&self.state);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Cue, RecordingAudio};
    use crate::render::NullRenderer;
    use crate::sim::Coffee;

    #[test]
    fn test_idle_until_started() {
        let mut game = Game::new(1);
        let outcome = game.frame(
            &TickInput::default(),
            &mut NullRenderer::default(),
            &mut RecordingAudio::default(),
        );
        assert_eq!(outcome, FrameOutcome::Idle);
        assert_eq!(game.state().time_ticks, 0);
    }

    #[test]
    fn test_one_tick_per_frame() {
        let mut game = Game::new(1);
        let mut renderer = NullRenderer::default();
        let mut audio = RecordingAudio::default();
        game.start();
        for _ in 0..5 {
            game.frame(&TickInput::default(), &mut renderer, &mut audio);
        }
        assert_eq!(game.state().time_ticks, 5);
        assert_eq!(renderer.frames, 5);

        game.stop();
        game.frame(&TickInput::default(), &mut renderer, &mut audio);
        assert_eq!(game.state().time_ticks, 5);
        assert_eq!(renderer.frames, 6);
    }

    #[test]
    fn test_cues_forwarded() {
        let mut game = Game::new(1);
        let mut audio = RecordingAudio::default();
        game.start();
        let tap = TickInput {
            serve_pressed: true,
            serve_released: true,
            ..Default::default()
        };
        game.frame(&tap, &mut NullRenderer::default(), &mut audio);
        assert!(audio.played.contains(&Cue::Served));
    }

    #[test]
    fn test_game_over_stops_loop() {
        let mut game = Game::new(1);
        game.start();
        game.state.lives = 1;
        game.state.coffees.push(Coffee::new(500, 0, 799.9, 3.0));

        let mut audio = RecordingAudio::default();
        let outcome = game.frame(
            &TickInput::default(),
            &mut NullRenderer::default(),
            &mut audio,
        );
        assert!(matches!(outcome, FrameOutcome::GameOver { .. }));
        assert!(!game.is_running());
        assert!(audio.played.contains(&Cue::Missed));

        game.start();
        assert!(!game.is_running());
    }

    #[test]
    fn test_restart_discards_everything() {
        let mut game = Game::new(1);
        game.start();
        game.state.score = 900;
        game.state.lives = 1;
        game.state.coffees.push(Coffee::new(500, 0, 100.0, 3.0));

        game.restart(2);
        let state = game.state();
        assert!(game.is_running());
        assert_eq!(state.seed, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 1);
        assert!(state.coffees.is_empty());
        assert_eq!(state.time_ticks, 0);
    }
}
