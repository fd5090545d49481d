//! Navigation field, per-tick blocked overlay and the ant trail
//!
//! The field is a multi-source shortest-path distance map seeded from every
//! goal tile. It is built once per level and never patched: transient
//! obstructions (closed doors, live hazards) live in a separate
//! [`BlockedTiles`] set rebuilt every tick.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::ecs::World;
use super::grid::{TileCoord, TileGrid};

/// Shortest grid distance from each reachable tile to the nearest goal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavField {
    width: u32,
    distances: Vec<Option<u32>>,
}

impl NavField {
    /// Flood-fill the grid from all `goals` (uniform edge weight 1)
    ///
    /// The frontier is a stack: neighbors are pushed left, right, up, down
    /// and the most recently pushed tile is explored first. A tile is
    /// re-opened whenever a strictly shorter distance reaches it, so the
    /// final distances are exact regardless of exploration order.
    pub fn build(grid: &TileGrid, goals: impl IntoIterator<Item = TileCoord>) -> Self {
        let mut distances = vec![None; grid.codes().len()];
        let mut frontier = Vec::new();

        for goal in goals {
            let Some(index) = grid.index(goal) else {
                continue;
            };
            if distances[index] == Some(0) {
                continue;
            }
            distances[index] = Some(0);
            frontier.push(goal);
        }

        while let Some(tile) = frontier.pop() {
            let Some(current) = grid.index(tile).and_then(|i| distances[i]) else {
                continue;
            };
            let next = current + 1;

            for neighbor in tile.neighbors() {
                if !grid.seeker_walkable(neighbor) {
                    continue;
                }
                let Some(index) = grid.index(neighbor) else {
                    continue;
                };
                if distances[index].is_some_and(|d| d <= next) {
                    continue;
                }
                distances[index] = Some(next);
                frontier.push(neighbor);
            }
        }

        let reachable = distances.iter().filter(|d| d.is_some()).count();
        log::debug!("Navigation field built: {} reachable tiles", reachable);

        Self {
            width: grid.width(),
            distances,
        }
    }

    /// Distance for a tile; `None` when unreachable or off-grid
    pub fn distance(&self, tile: TileCoord) -> Option<u32> {
        if tile.x < 0 || tile.y < 0 || self.width == 0 {
            return None;
        }
        if tile.x as u32 >= self.width {
            return None;
        }
        let index = tile.y as usize * self.width as usize + tile.x as usize;
        self.distances.get(index).copied().flatten()
    }

    /// Number of tiles with a recorded distance
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.reachable_count() == 0
    }
}

/// Tiles the seeker may not step onto this tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockedTiles {
    tiles: HashSet<TileCoord>,
}

impl BlockedTiles {
    /// Closed door tiles plus tiles under live, unheld hazards
    pub fn collect(world: &World) -> Self {
        let mut tiles = HashSet::new();

        for (entity, door) in world.doors.iter() {
            if door.open {
                continue;
            }
            if let Some(pos) = world.positions.get(entity) {
                tiles.insert(TileCoord::under_body(*pos));
            }
        }

        for (entity, carryable) in world.carryables.iter() {
            if !carryable.is_live_hazard() {
                continue;
            }
            if let Some(pos) = world.positions.get(entity) {
                tiles.insert(TileCoord::under_body(*pos));
            }
        }

        Self { tiles }
    }

    pub fn contains(&self, tile: TileCoord) -> bool {
        self.tiles.contains(&tile)
    }

    pub fn insert(&mut self, tile: TileCoord) {
        self.tiles.insert(tile);
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Predecessor of each tile the seeker advanced onto
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntTrail {
    steps: BTreeMap<TileCoord, TileCoord>,
}

impl AntTrail {
    pub fn record(&mut self, tile: TileCoord, came_from: TileCoord) {
        self.steps.insert(tile, came_from);
    }

    /// Tile to retreat to from `tile`, if any was recorded
    pub fn predecessor(&self, tile: TileCoord) -> Option<TileCoord> {
        self.steps.get(&tile).copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
