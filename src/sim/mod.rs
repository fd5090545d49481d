//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ecs;
pub mod grid;
pub mod hazards;
pub mod interact;
pub mod level;
pub mod lifecycle;
pub mod nav;
pub mod proximity;
pub mod seeker;
pub mod snapshot;
pub mod tick;

pub use ecs::{
    Carrier, Carryable, ComponentTable, Destructible, Door, Entity, Goal, SeekerAgent, Spawner,
    Sprite, SpriteName, SpriteRule, Switch, World,
};
pub use grid::{TileCoord, TileGrid, TileKind};
pub use interact::Interaction;
pub use level::{Level, LevelData, LevelObject, ObjectKind, playlist_from_json};
pub use lifecycle::{Lifecycle, LifecycleEvent, LifecycleStep, Phase};
pub use nav::{AntTrail, BlockedTiles, NavField};
pub use snapshot::{RenderSnapshot, SpriteView};
pub use tick::{Game, TickInput};
