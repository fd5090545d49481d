//! Glue between a presentation callback and the simulation
//!
//! The host calls [`Session::frame`] once per presented frame with a
//! monotonic timestamp; the session drains whole ticks and the host then
//! draws [`Session::snapshot`].

use crate::error::SimError;
use crate::platform::input::{Button, Gamepad};
use crate::platform::time::FixedTimestep;
use crate::sim::{Game, LevelData, LifecycleStep, RenderSnapshot};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct Session {
    game: Game,
    input: Gamepad,
    clock: FixedTimestep,
    running: bool,
}

impl Session {
    pub fn new(playlist: &[LevelData], tuning: Tuning) -> Result<Self, SimError> {
        let clock = FixedTimestep::from_tuning(&tuning);
        let game = Game::new(playlist, tuning)?;
        Ok(Self {
            game,
            input: Gamepad::new(),
            clock,
            running: false,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start (or resume) draining ticks
    pub fn play(&mut self) {
        if self.running {
            return;
        }
        self.clock.restart();
        self.running = true;
        log::info!("Playback started");
    }

    pub fn pause(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::info!("Playback paused");
    }

    pub fn focus_gained(&mut self) {
        self.input.clear_all();
        self.play();
    }

    /// Key-up events will not arrive while unfocused
    pub fn focus_lost(&mut self) {
        self.input.clear_all();
        self.pause();
    }

    pub fn key_down(&mut self, button: Button) {
        self.input.key_down(button);
    }

    pub fn key_up(&mut self, button: Button) {
        self.input.key_up(button);
    }

    /// Run the ticks owed for a frame presented at `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        if !self.running {
            return 0;
        }
        let ticks = self.clock.drain(now_ms);
        for _ in 0..ticks {
            let step = self.game.tick(&self.input.tick_input());
            self.input.advance_edge_state();
            if let LifecycleStep::Entered(phase) = step {
                log::debug!("Tick {}: entered {}", self.game.level().ticks, phase.as_str());
            }
        }
        ticks
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        self.game.snapshot()
    }
}
