//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (edge-triggered button state)
//! - Time/ticks (fixed-timestep accumulator)
//! - Browser bindings (wasm32 only)

pub mod input;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{Button, Gamepad, KeyState};
pub use time::FixedTimestep;
