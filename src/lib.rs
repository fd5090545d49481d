//! Tile Chase - A tile-based puzzle-chase game core
//!
//! Core modules:
//! - `sim`: Deterministic tick simulation (components, navigation, lifecycle)
//! - `platform`: Input edge-state and fixed-timestep scheduling
//! - `session`: Glue between the presentation callback and the simulation
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use session::Session;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Tile edge length in world pixels
    pub const TILE_SIZE: f32 = 32.0;

    /// Logic ticks per scheduling period
    pub const TICKS_PER_PERIOD: u32 = 60;
    /// Scheduling period in milliseconds
    pub const PERIOD_MS: u32 = 1000;
    /// Maximum ticks drained per presented frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 3;

    /// Player-controlled actor speed (pixels/tick)
    pub const ACTOR_SPEED: f32 = 2.0;
    /// Seeker speed while descending the navigation field (pixels/tick)
    pub const SEEKER_SPEED: f32 = 1.5;
    /// Pursuer speed during the chase beat (pixels/tick)
    pub const PURSUER_SPEED: f32 = 3.0;
    /// Distance from a tile edge inside which corner correction kicks in
    pub const CORNER_MARGIN: f32 = 12.0;

    /// Reach of interactions, spawner checks and other proximity queries
    pub const INTERACT_RADIUS: f32 = 32.0;
    /// How far in front of its carrier a held item floats
    pub const CARRY_OFFSET: f32 = 20.0;

    /// Ticks a spawner must sit empty before spawning
    pub const SPAWN_THRESHOLD_TICKS: u32 = 120;
    /// Live carryable population cap for spawners
    pub const SPAWN_CAP: usize = 10;

    /// Score lost the first time a destructible is destroyed
    pub const DESTROY_PENALTY: i64 = 10;

    /// Lifecycle timers (ticks)
    pub const GOAL_TOUCHED_TICKS: u32 = 30;
    pub const CELEBRATING_TICKS: u32 = 60;
    pub const ESCALATING_TICKS: u32 = 60;
    pub const COMPLETE_TICKS: u32 = 120;
}
