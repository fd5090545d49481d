//! Entities, component tables and component types
//!
//! An entity's "kind" is nothing more than the set of tables holding a row
//! for it. Tables are ordered by entity handle, and handles are allocated
//! monotonically, so iteration order is creation order.

use std::collections::BTreeMap;
use std::collections::btree_map;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Opaque entity handle (never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity(pub u32);

/// Monotonic entity handle source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityAllocator {
    next_id: u32,
}

impl EntityAllocator {
    /// Allocate a new entity handle
    pub fn alloc(&mut self) -> Entity {
        let id = self.next_id;
        self.next_id += 1;
        Entity(id)
    }

    /// Number of handles handed out so far
    pub fn allocated(&self) -> u32 {
        self.next_id
    }
}

/// Typed storage from entity to one component value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentTable<T> {
    rows: BTreeMap<Entity, T>,
}

impl<T> Default for ComponentTable<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T> ComponentTable<T> {
    /// Insert or replace a row, returning the previous value
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        self.rows.insert(entity, value)
    }

    /// Insert a row that must not already exist
    pub fn attach(
        &mut self,
        entity: Entity,
        value: T,
        table: &'static str,
    ) -> Result<(), SimError> {
        if self.rows.contains_key(&entity) {
            return Err(SimError::DuplicateComponent { entity, table });
        }
        self.rows.insert(entity, value);
        Ok(())
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.rows.get(&entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.rows.get_mut(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.rows.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in entity order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.rows.iter().map(|(e, v)| (*e, v))
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, Entity, T> {
        self.rows.iter_mut()
    }

    /// Entity handles in table order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.rows.keys().copied()
    }
}

// ============================================================================
// Components
// ============================================================================

/// World position (top-left of a tile-sized body, pixels)
pub type Position = Vec2;

/// One-way latch; never re-closes once opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub open: bool,
}

/// Opens exactly one door when activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    pub controls: Entity,
}

/// A hazard or prop that can be picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carryable {
    /// Holder, if any (position is slaved to it while set)
    pub held_by: Option<Entity>,
    /// Free-roam animation clock
    pub anim_timer: u32,
    /// Live hazards block the seeker when lying on the floor
    pub alive: bool,
}

impl Carryable {
    pub fn new(alive: bool) -> Self {
        Self {
            held_by: None,
            anim_timer: 0,
            alive,
        }
    }

    /// Lying free and dangerous
    pub fn is_live_hazard(&self) -> bool {
        self.alive && self.held_by.is_none()
    }
}

/// Something able to hold one carryable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    pub holding: Option<Entity>,
    /// Last nonzero movement direction (unit length)
    pub dir: Vec2,
}

impl Default for Carrier {
    fn default() -> Self {
        Self {
            holding: None,
            dir: Vec2::new(0.0, 1.0),
        }
    }
}

/// Periodically spawns carryables near itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawner {
    pub timer: u32,
}

/// Marker for entities driven by the navigation field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekerAgent;

/// Tile the seeker is drawn toward
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub spawns_hazard_phase: bool,
}

/// Score-affecting obstacle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destructible {
    pub cleaned: bool,
    /// Guards the one-time score penalty
    pub actor_touched: bool,
}

// ============================================================================
// Sprites
// ============================================================================

/// State-dependent appearance, evaluated against the level each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SpriteRule {
    /// Picks by the entity's own door latch
    Door { open: String, closed: String },
    /// Picks by whether the chase has started
    Pursuer { lurking: String, chasing: String },
    /// Cycles frames on the entity's carryable animation clock
    Hazard {
        frames: Vec<String>,
        ticks_per_frame: u32,
    },
    /// Picks by the entity's own destructible state
    Destructible { dirty: String, cleaned: String },
}

/// Visual identity of an entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum SpriteName {
    #[default]
    Hidden,
    Static(String),
    Computed(SpriteRule),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sprite {
    pub name: SpriteName,
    pub offset: Vec2,
}

impl Sprite {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: SpriteName::Static(name.into()),
            offset: Vec2::ZERO,
        }
    }

    pub fn computed(rule: SpriteRule) -> Self {
        Self {
            name: SpriteName::Computed(rule),
            offset: Vec2::ZERO,
        }
    }
}

/// All component tables of a level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    pub entities: EntityAllocator,
    pub positions: ComponentTable<Position>,
    pub sprites: ComponentTable<Sprite>,
    pub doors: ComponentTable<Door>,
    pub switches: ComponentTable<Switch>,
    pub carryables: ComponentTable<Carryable>,
    pub carriers: ComponentTable<Carrier>,
    pub spawners: ComponentTable<Spawner>,
    pub seekers: ComponentTable<SeekerAgent>,
    pub goals: ComponentTable<Goal>,
    pub destructibles: ComponentTable<Destructible>,
}

impl World {
    pub fn spawn(&mut self) -> Entity {
        self.entities.alloc()
    }

    /// Count of carryables that are still live (held or not)
    pub fn live_carryables(&self) -> usize {
        self.carryables.iter().filter(|(_, c)| c.alive).count()
    }

    /// Door state behind a switch; `None` when the reference is dangling
    pub fn switch_door(&self, switch: &Switch) -> Option<&Door> {
        self.doors.get(switch.controls)
    }
}
