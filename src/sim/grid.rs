//! Tile grid, tile kinds and world/tile conversions

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;
use crate::error::SimError;

/// What a tile type code means for movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Open to everyone
    Floor,
    /// Open to no one
    Wall,
    /// Seeker-only passage
    Burrow,
    /// Actor-only ground
    Shallows,
}

impl TileKind {
    /// Decode a tile code; unknown codes are solid
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => TileKind::Floor,
            2 => TileKind::Burrow,
            3 => TileKind::Shallows,
            _ => TileKind::Wall,
        }
    }

    pub fn seeker_walkable(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Burrow)
    }

    pub fn actor_walkable(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Shallows)
    }
}

/// Integer tile coordinates (may lie outside the grid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing a world position
    pub fn from_world(pos: Vec2) -> Self {
        Self {
            x: (pos.x / TILE_SIZE).floor() as i32,
            y: (pos.y / TILE_SIZE).floor() as i32,
        }
    }

    /// Tile under the centre of a tile-sized body whose top-left is `pos`
    pub fn under_body(pos: Vec2) -> Self {
        Self::from_world(pos + Vec2::splat(TILE_SIZE / 2.0))
    }

    /// Top-left world corner of this tile
    pub fn to_world(self) -> Vec2 {
        Vec2::new(self.x as f32 * TILE_SIZE, self.y as f32 * TILE_SIZE)
    }

    /// Cardinal neighbors in the fixed order left, right, up, down
    pub fn neighbors(self) -> [TileCoord; 4] {
        [
            TileCoord::new(self.x - 1, self.y),
            TileCoord::new(self.x + 1, self.y),
            TileCoord::new(self.x, self.y - 1),
            TileCoord::new(self.x, self.y + 1),
        ]
    }
}

/// Rectangular grid of tile type codes, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    codes: Vec<u8>,
}

impl TileGrid {
    pub fn new(width: u32, codes: Vec<u8>) -> Result<Self, SimError> {
        if width == 0 {
            return Err(SimError::ZeroWidth);
        }
        if codes.len() % width as usize != 0 {
            return Err(SimError::RaggedGrid {
                width,
                len: codes.len(),
            });
        }
        let height = (codes.len() / width as usize) as u32;
        Ok(Self {
            width,
            height,
            codes,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// Row-major index of an in-bounds tile
    pub fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 {
            return None;
        }
        let (x, y) = (tile.x as u32, tile.y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Inverse of [`TileGrid::index`]
    pub fn coord(&self, index: usize) -> TileCoord {
        let width = self.width as usize;
        TileCoord::new((index % width) as i32, (index / width) as i32)
    }

    /// Kind of an in-bounds tile
    pub fn kind(&self, tile: TileCoord) -> Option<TileKind> {
        self.index(tile).map(|i| TileKind::from_code(self.codes[i]))
    }

    pub fn seeker_walkable(&self, tile: TileCoord) -> bool {
        self.kind(tile).is_some_and(TileKind::seeker_walkable)
    }

    pub fn actor_walkable(&self, tile: TileCoord) -> bool {
        self.kind(tile).is_some_and(TileKind::actor_walkable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(TileGrid::new(0, vec![]), Err(SimError::ZeroWidth)));
        assert!(matches!(
            TileGrid::new(3, vec![0; 7]),
            Err(SimError::RaggedGrid { width: 3, len: 7 })
        ));
    }

    #[test]
    fn test_walkability_differs_by_kind() {
        let grid = TileGrid::new(4, vec![0, 1, 2, 3]).unwrap();
        let tiles: Vec<_> = (0..4).map(|x| TileCoord::new(x, 0)).collect();
        let seeker: Vec<_> = tiles.iter().map(|t| grid.seeker_walkable(*t)).collect();
        let actor: Vec<_> = tiles.iter().map(|t| grid.actor_walkable(*t)).collect();
        assert_eq!(seeker, vec![true, false, true, false]);
        assert_eq!(actor, vec![true, false, false, true]);
        assert!(!grid.seeker_walkable(TileCoord::new(-1, 0)));
        assert!(!grid.actor_walkable(TileCoord::new(0, 1)));
    }

    #[test]
    fn test_world_tile_conversion() {
        assert_eq!(TileCoord::from_world(Vec2::new(31.9, 32.0)), TileCoord::new(0, 1));
        assert_eq!(TileCoord::from_world(Vec2::new(-0.5, 0.0)), TileCoord::new(-1, 0));
        assert_eq!(TileCoord::new(2, 3).to_world(), Vec2::new(64.0, 96.0));
        assert_eq!(TileCoord::under_body(Vec2::new(64.0, 96.0)), TileCoord::new(2, 3));
        assert_eq!(TileCoord::under_body(Vec2::new(47.0, -15.0)), TileCoord::new(1, 0));
        assert_eq!(TileCoord::under_body(Vec2::new(48.0, -17.0)), TileCoord::new(2, -1));
    }

    #[test]
    fn test_index_round_trip() {
        let grid = TileGrid::new(5, vec![0; 15]).unwrap();
        let tile = TileCoord::new(3, 2);
        let index = grid.index(tile).unwrap();
        assert_eq!(index, 13);
        assert_eq!(grid.coord(index), tile);
        assert_eq!(grid.index(TileCoord::new(5, 0)), None);
    }
}
