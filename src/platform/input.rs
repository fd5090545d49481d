//! Logical buttons and their edge-triggered state
//!
//! Raw key events arrive between ticks; the simulation samples this state
//! once per tick and `advance_edge_state` clears the one-shot flags after.

use glam::IVec2;

use crate::sim::TickInput;

/// The fixed set of logical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    Action,
}

impl Button {
    pub const ALL: [Button; 5] = [
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
        Button::Action,
    ];

    fn index(self) -> usize {
        match self {
            Button::Left => 0,
            Button::Right => 1,
            Button::Up => 2,
            Button::Down => 3,
            Button::Action => 4,
        }
    }

    /// Map a DOM `KeyboardEvent.code` to a button
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Button::Left),
            "ArrowRight" | "KeyD" => Some(Button::Right),
            "ArrowUp" | "KeyW" => Some(Button::Up),
            "ArrowDown" | "KeyS" => Some(Button::Down),
            "Space" | "Enter" | "KeyE" => Some(Button::Action),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub down: bool,
    /// Went down since the last tick
    pub just_pressed: bool,
}

/// State of every logical button
#[derive(Debug, Clone, Default)]
pub struct Gamepad {
    keys: [KeyState; 5],
}

impl Gamepad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key repeat while already down is not a new press
    pub fn key_down(&mut self, button: Button) {
        let key = &mut self.keys[button.index()];
        if !key.down {
            key.just_pressed = true;
        }
        key.down = true;
    }

    pub fn key_up(&mut self, button: Button) {
        self.keys[button.index()].down = false;
    }

    /// End-of-tick: one-shot flags expire
    pub fn advance_edge_state(&mut self) {
        for key in &mut self.keys {
            key.just_pressed = false;
        }
    }

    /// Forget everything (focus lost, no key-up events will arrive)
    pub fn clear_all(&mut self) {
        self.keys = Default::default();
    }

    pub fn state(&self, button: Button) -> KeyState {
        self.keys[button.index()]
    }

    /// Down now, or tapped and released since the last tick
    pub fn held(&self, button: Button) -> bool {
        let key = self.state(button);
        key.down || key.just_pressed
    }

    pub fn just_pressed(&self, button: Button) -> bool {
        self.state(button).just_pressed
    }

    /// -1, 0 or 1 from a pair of opposing buttons
    pub fn axis(&self, negative: Button, positive: Button) -> i32 {
        self.held(positive) as i32 - self.held(negative) as i32
    }

    /// Sample the input for one tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            movement: IVec2::new(
                self.axis(Button::Left, Button::Right),
                self.axis(Button::Up, Button::Down),
            ),
            action: self.just_pressed(Button::Action),
        }
    }
}
