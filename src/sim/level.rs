//! Level input data and level construction
//!
//! Level geometry arrives pre-parsed: a row-major grid of tile codes plus a
//! flat object list. Construction validates everything up front so the
//! per-tick code never has to fail.

use std::collections::{BTreeMap, HashMap, HashSet};

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::ecs::{
    Carrier, Carryable, Destructible, Door, Entity, Goal, SeekerAgent, Spawner, Sprite,
    SpriteName, SpriteRule, Switch, World,
};
use super::grid::{TileCoord, TileGrid};
use super::hazards::hazard_sprite;
use super::interact::Interaction;
use super::lifecycle::Lifecycle;
use super::nav::{AntTrail, NavField};
use crate::consts::TILE_SIZE;
use crate::error::SimError;

/// Kind tag of a level object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Actor,
    Seeker,
    Goal,
    Door,
    Switch,
    Carryable,
    Spawner,
    Destructible,
    /// Decoration only
    Prop,
}

/// One placed object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelObject {
    /// Name other objects may refer to (e.g. a switch's `controls`)
    #[serde(default)]
    pub id: Option<String>,
    pub kind: ObjectKind,
    pub x: f32,
    pub y: f32,
    /// Static sprite override
    #[serde(default)]
    pub sprite: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl LevelObject {
    pub fn new(kind: ObjectKind, x: f32, y: f32) -> Self {
        Self {
            id: None,
            kind,
            x,
            y,
            sprite: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        self.properties
            .get(key)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(default)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Pre-parsed level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    pub width: u32,
    pub tiles: Vec<u8>,
    #[serde(default)]
    pub objects: Vec<LevelObject>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parse a playlist (JSON array of levels)
pub fn playlist_from_json(json: &str) -> Result<Vec<LevelData>, SimError> {
    let playlist: Vec<LevelData> = serde_json::from_str(json)?;
    log::info!("Parsed playlist with {} levels", playlist.len());
    Ok(playlist)
}

/// Complete simulation state of one level
#[derive(Debug, Clone)]
pub struct Level {
    /// Position in the playlist
    pub index: usize,
    pub name: String,
    pub grid: TileGrid,
    pub world: World,
    /// Built once here, never patched
    pub field: NavField,
    pub trail: AntTrail,
    pub lifecycle: Lifecycle,
    /// The player-controlled carrier
    pub actor: Entity,
    pub score: i64,
    /// Action currently on offer to the player
    pub prompt: Option<Interaction>,
    /// Ticks simulated in this level
    pub ticks: u64,
}

impl Level {
    pub fn build(index: usize, data: &LevelData) -> Result<Self, SimError> {
        let grid = TileGrid::new(data.width, data.tiles.clone())?;
        let mut world = World::default();

        // Handles first, so `controls` may point forward in the list
        let mut ids: HashMap<&str, Entity> = HashMap::new();
        let mut handles = Vec::with_capacity(data.objects.len());
        for object in &data.objects {
            let entity = world.spawn();
            if let Some(id) = object.id.as_deref() {
                if ids.insert(id, entity).is_some() {
                    return Err(SimError::DuplicateObjectId {
                        level: data.name.clone(),
                        id: id.to_string(),
                    });
                }
            }
            handles.push(entity);
        }

        let mut actor = None;
        for (object, &entity) in data.objects.iter().zip(&handles) {
            world
                .positions
                .attach(entity, Vec2::new(object.x, object.y), "position")?;

            match object.kind {
                ObjectKind::Actor => {
                    if actor.is_none() {
                        actor = Some(entity);
                    } else {
                        log::warn!(
                            "Level `{}`: extra actor {:?} is not controlled",
                            data.name,
                            entity
                        );
                    }
                    world.carriers.attach(entity, Carrier::default(), "carrier")?;
                }
                ObjectKind::Seeker => world.seekers.attach(entity, SeekerAgent, "seeker")?,
                ObjectKind::Goal => {
                    let goal = Goal {
                        spawns_hazard_phase: object.flag("spawns_hazard_phase", false),
                    };
                    world.goals.attach(entity, goal, "goal")?;
                }
                ObjectKind::Door => {
                    let door = Door {
                        open: object.flag("open", false),
                    };
                    world.doors.attach(entity, door, "door")?;
                }
                ObjectKind::Switch => {
                    let controls = match object.text("controls").and_then(|id| ids.get(id)) {
                        Some(&door) => door,
                        None => {
                            log::warn!(
                                "Level `{}`: switch {:?} controls unknown object {:?}; \
                                 it will be inert",
                                data.name,
                                entity,
                                object.text("controls")
                            );
                            world.spawn()
                        }
                    };
                    world.switches.attach(entity, Switch { controls }, "switch")?;
                }
                ObjectKind::Carryable => {
                    let carryable = Carryable::new(object.flag("alive", true));
                    world.carryables.attach(entity, carryable, "carryable")?;
                }
                ObjectKind::Spawner => {
                    world.spawners.attach(entity, Spawner::default(), "spawner")?
                }
                ObjectKind::Destructible => {
                    world
                        .destructibles
                        .attach(entity, Destructible::default(), "destructible")?;
                }
                ObjectKind::Prop => {}
            }

            world.sprites.attach(entity, default_sprite(object), "sprite")?;
        }

        let actor = actor.ok_or_else(|| SimError::MissingActor {
            level: data.name.clone(),
        })?;

        let goal_tiles: Vec<TileCoord> = world
            .goals
            .entities()
            .filter_map(|goal| world.positions.get(goal))
            .map(|pos| TileCoord::under_body(*pos))
            .collect();
        let field = NavField::build(&grid, goal_tiles);

        log::info!(
            "Level {} `{}` loaded: {}x{} tiles, {} entities, {} reachable tiles",
            index,
            data.name,
            grid.width(),
            grid.height(),
            world.entities.allocated(),
            field.reachable_count()
        );

        Ok(Self {
            index,
            name: data.name.clone(),
            grid,
            world,
            field,
            trail: AntTrail::default(),
            lifecycle: Lifecycle::new(),
            actor,
            score: 0,
            prompt: None,
            ticks: 0,
        })
    }

    /// Move the actor one tick; each axis is tried on its own
    pub fn move_actor(&mut self, movement: IVec2, speed: f32) {
        if movement == IVec2::ZERO {
            return;
        }
        if let Some(carrier) = self.world.carriers.get_mut(self.actor) {
            carrier.dir = movement.as_vec2().normalize_or_zero();
        }

        let Some(mut pos) = self.world.positions.get(self.actor).copied() else {
            return;
        };
        let closed = self.closed_door_tiles();
        let step = movement.as_vec2() * speed;

        let along_x = pos + Vec2::new(step.x, 0.0);
        if step.x != 0.0 && self.actor_fits(along_x, &closed) {
            pos = along_x;
        }
        let along_y = pos + Vec2::new(0.0, step.y);
        if step.y != 0.0 && self.actor_fits(along_y, &closed) {
            pos = along_y;
        }

        self.world.positions.insert(self.actor, pos);
    }

    fn closed_door_tiles(&self) -> HashSet<TileCoord> {
        self.world
            .doors
            .iter()
            .filter(|(_, door)| !door.open)
            .filter_map(|(entity, _)| self.world.positions.get(entity))
            .map(|pos| TileCoord::under_body(*pos))
            .collect()
    }

    /// Every tile the body would overlap is walkable and free of closed doors
    fn actor_fits(&self, pos: Vec2, closed: &HashSet<TileCoord>) -> bool {
        let first = TileCoord::from_world(pos);
        let last = TileCoord::new(
            ((pos.x + TILE_SIZE) / TILE_SIZE).ceil() as i32 - 1,
            ((pos.y + TILE_SIZE) / TILE_SIZE).ceil() as i32 - 1,
        );
        (first.y..=last.y).all(|y| {
            (first.x..=last.x).all(|x| {
                let tile = TileCoord::new(x, y);
                self.grid.actor_walkable(tile) && !closed.contains(&tile)
            })
        })
    }
}

fn default_sprite(object: &LevelObject) -> Sprite {
    if let Some(name) = &object.sprite {
        return Sprite::named(name.clone());
    }
    match object.kind {
        ObjectKind::Actor => Sprite::named("actor"),
        ObjectKind::Seeker => Sprite::named("seeker"),
        ObjectKind::Goal => Sprite::named("goal"),
        ObjectKind::Door => Sprite::computed(SpriteRule::Door {
            open: "door-open".into(),
            closed: "door-closed".into(),
        }),
        ObjectKind::Switch => Sprite::named("switch"),
        ObjectKind::Carryable if object.flag("alive", true) => hazard_sprite(),
        ObjectKind::Carryable => Sprite::named("crate"),
        ObjectKind::Spawner => Sprite {
            name: SpriteName::Hidden,
            offset: Vec2::ZERO,
        },
        ObjectKind::Destructible => Sprite::computed(SpriteRule::Destructible {
            dirty: "mess".into(),
            cleaned: "mess-cleaned".into(),
        }),
        ObjectKind::Prop => Sprite::named("prop"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_level(objects: Vec<LevelObject>) -> LevelData {
        LevelData {
            name: "test".into(),
            width: 5,
            tiles: vec![0; 25],
            objects,
        }
    }

    fn actor_at(x: f32, y: f32) -> LevelObject {
        LevelObject::new(ObjectKind::Actor, x, y)
    }

    #[test]
    fn test_build_minimal_level() {
        let data = open_level(vec![
            actor_at(0.0, 0.0),
            LevelObject::new(ObjectKind::Goal, 128.0, 128.0),
        ]);
        let level = Level::build(2, &data).unwrap();
        assert_eq!(level.index, 2);
        assert_eq!(level.actor, Entity(0));
        assert!(level.world.carriers.contains(level.actor));
        assert_eq!(level.field.distance(TileCoord::new(4, 4)), Some(0));
        assert_eq!(level.field.distance(TileCoord::new(0, 0)), Some(8));
    }

    #[test]
    fn test_missing_actor_is_error() {
        let data = open_level(vec![LevelObject::new(ObjectKind::Goal, 0.0, 0.0)]);
        assert!(matches!(
            Level::build(0, &data),
            Err(SimError::MissingActor { .. })
        ));
    }

    #[test]
    fn test_duplicate_id_is_error() {
        let data = open_level(vec![
            actor_at(0.0, 0.0),
            LevelObject::new(ObjectKind::Door, 32.0, 0.0).with_id("d"),
            LevelObject::new(ObjectKind::Door, 64.0, 0.0).with_id("d"),
        ]);
        let err = Level::build(0, &data).unwrap_err();
        assert!(matches!(err, SimError::DuplicateObjectId { ref id, .. } if id == "d"));
    }

    #[test]
    fn test_ragged_grid_is_error() {
        let mut data = open_level(vec![actor_at(0.0, 0.0)]);
        data.tiles.pop();
        assert!(matches!(Level::build(0, &data), Err(SimError::RaggedGrid { .. })));
    }

    #[test]
    fn test_switch_resolves_forward_reference() {
        let data = open_level(vec![
            actor_at(0.0, 0.0),
            LevelObject::new(ObjectKind::Switch, 32.0, 0.0).with_property("controls", "gate"),
            LevelObject::new(ObjectKind::Door, 64.0, 0.0).with_id("gate"),
        ]);
        let level = Level::build(0, &data).unwrap();
        let switch = level.world.switches.get(Entity(1)).unwrap();
        assert_eq!(switch.controls, Entity(2));
        assert!(level.world.switch_door(switch).is_some());
    }

    #[test]
    fn test_dangling_controls_is_inert() {
        let data = open_level(vec![
            actor_at(0.0, 0.0),
            LevelObject::new(ObjectKind::Switch, 32.0, 0.0).with_property("controls", "nowhere"),
        ]);
        let level = Level::build(0, &data).unwrap();
        let switch = level.world.switches.get(Entity(1)).unwrap();
        assert!(level.world.switch_door(switch).is_none());
    }

    #[test]
    fn test_object_properties_and_sprites() {
        let data = open_level(vec![
            actor_at(0.0, 0.0),
            LevelObject::new(ObjectKind::Goal, 32.0, 0.0)
                .with_property("spawns_hazard_phase", true),
            LevelObject::new(ObjectKind::Door, 64.0, 0.0).with_property("open", true),
            LevelObject::new(ObjectKind::Carryable, 96.0, 0.0).with_property("alive", false),
            LevelObject::new(ObjectKind::Spawner, 128.0, 0.0),
        ]);
        let level = Level::build(0, &data).unwrap();
        let world = &level.world;
        assert!(world.goals.get(Entity(1)).unwrap().spawns_hazard_phase);
        assert!(world.doors.get(Entity(2)).unwrap().open);
        assert!(!world.carryables.get(Entity(3)).unwrap().alive);
        assert_eq!(world.sprites.get(Entity(3)).unwrap().name, SpriteName::Static("crate".into()));
        assert_eq!(world.sprites.get(Entity(4)).unwrap().name, SpriteName::Hidden);
    }

    #[test]
    fn test_level_json_defaults() {
        let json = r#"{
            "name": "tiny",
            "width": 2,
            "tiles": [0, 0],
            "objects": [{ "kind": "actor", "x": 0, "y": 0, "sprite": "hero" }]
        }"#;
        let data = LevelData::from_json(json).unwrap();
        assert_eq!(data.objects[0].id, None);
        let level = Level::build(0, &data).unwrap();
        assert_eq!(
            level.world.sprites.get(level.actor).unwrap().name,
            SpriteName::Static("hero".into())
        );
        assert!(level.field.is_empty());
    }

    #[test]
    fn test_actor_slides_along_wall() {
        // Row 0 open, row 1 wall
        let data = LevelData {
            name: "corridor".into(),
            width: 4,
            tiles: vec![0, 0, 0, 0, 1, 1, 1, 1],
            objects: vec![actor_at(0.0, 0.0)],
        };
        let mut level = Level::build(0, &data).unwrap();
        level.move_actor(IVec2::new(1, 1), 2.0);
        assert_eq!(level.world.positions.get(level.actor), Some(&Vec2::new(2.0, 0.0)));
        let dir = level.world.carriers.get(level.actor).unwrap().dir;
        assert!((dir - Vec2::new(1.0, 1.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_actor_blocked_by_closed_door_and_off_grid() {
        let data = LevelData {
            name: "door".into(),
            width: 3,
            tiles: vec![0, 0, 0],
            objects: vec![actor_at(0.0, 0.0), LevelObject::new(ObjectKind::Door, 32.0, 0.0)],
        };
        let mut level = Level::build(0, &data).unwrap();
        level.move_actor(IVec2::new(1, 0), 2.0);
        assert_eq!(level.world.positions.get(level.actor), Some(&Vec2::ZERO));
        level.move_actor(IVec2::new(-1, 0), 2.0);
        assert_eq!(level.world.positions.get(level.actor), Some(&Vec2::ZERO));

        level.world.doors.get_mut(Entity(1)).unwrap().open = true;
        level.move_actor(IVec2::new(1, 0), 2.0);
        assert_eq!(level.world.positions.get(level.actor), Some(&Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn test_actor_walks_shallows_but_not_burrow() {
        let data = LevelData {
            name: "mixed".into(),
            width: 3,
            tiles: vec![3, 0, 2],
            objects: vec![actor_at(32.0, 0.0)],
        };
        let mut level = Level::build(0, &data).unwrap();
        level.move_actor(IVec2::new(1, 0), 2.0);
        assert_eq!(level.world.positions.get(level.actor), Some(&Vec2::new(32.0, 0.0)));
        level.move_actor(IVec2::new(-1, 0), 2.0);
        assert_eq!(level.world.positions.get(level.actor), Some(&Vec2::new(30.0, 0.0)));
    }
}
