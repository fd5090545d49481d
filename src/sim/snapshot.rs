//! Read-only view of a level for the renderer
//!
//! Sprite rules are evaluated here, so the renderer only ever sees plain
//! sprite names.

use serde::{Deserialize, Serialize};

use super::ecs::{Entity, SpriteName, SpriteRule, World};
use super::level::Level;
use super::lifecycle::Phase;
use crate::error::SimError;

/// One drawable sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteView {
    pub entity: Entity,
    pub x: f32,
    pub y: f32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub level_index: usize,
    pub level_name: String,
    pub width: u32,
    pub tiles: Vec<u8>,
    /// Entity order; hidden sprites omitted
    pub sprites: Vec<SpriteView>,
    /// Label of the available action
    pub prompt: Option<String>,
    pub phase: Phase,
    pub score: i64,
    pub tick: u64,
}

impl RenderSnapshot {
    pub fn capture(level: &Level) -> Self {
        let phase = level.lifecycle.phase();
        let sprites = level
            .world
            .sprites
            .iter()
            .filter_map(|(entity, sprite)| {
                let pos = level.world.positions.get(entity)?;
                let name = resolve_sprite(&level.world, entity, &sprite.name, phase)?;
                let at = *pos + sprite.offset;
                Some(SpriteView {
                    entity,
                    x: at.x,
                    y: at.y,
                    name,
                })
            })
            .collect();

        Self {
            level_index: level.index,
            level_name: level.name.clone(),
            width: level.grid.width(),
            tiles: level.grid.codes().to_vec(),
            sprites,
            prompt: level.prompt.map(|p| p.label().to_string()),
            phase,
            score: level.score,
            tick: level.ticks,
        }
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Final sprite name for an entity this frame; `None` when nothing is drawn
pub fn resolve_sprite(
    world: &World,
    entity: Entity,
    name: &SpriteName,
    phase: Phase,
) -> Option<String> {
    match name {
        SpriteName::Hidden => None,
        SpriteName::Static(name) => Some(name.clone()),
        SpriteName::Computed(rule) => match rule {
            SpriteRule::Door { open, closed } => {
                let is_open = world.doors.get(entity).is_some_and(|d| d.open);
                Some(if is_open { open } else { closed }.clone())
            }
            SpriteRule::Pursuer { lurking, chasing } => {
                let name = if phase == Phase::Chasing { chasing } else { lurking };
                Some(name.clone())
            }
            SpriteRule::Hazard {
                frames,
                ticks_per_frame,
            } => {
                if frames.is_empty() {
                    return None;
                }
                let clock = world.carryables.get(entity).map_or(0, |c| c.anim_timer);
                let frame = (clock / (*ticks_per_frame).max(1)) as usize % frames.len();
                Some(frames[frame].clone())
            }
            SpriteRule::Destructible { dirty, cleaned } => {
                let is_clean = world.destructibles.get(entity).is_some_and(|d| d.cleaned);
                Some(if is_clean { cleaned } else { dirty }.clone())
            }
        },
    }
}
