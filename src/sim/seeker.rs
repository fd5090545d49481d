//! Seeker movement: field descent, retreat along the ant trail, and the
//! corner correction shared by both
//!
//! Pathing is strictly cardinal. Corner correction nudges the idle axis
//! toward the nearest tile alignment, so turns cut the corner instead of
//! overshooting and snapping.

use glam::{IVec2, Vec2};

use super::grid::TileCoord;
use super::nav::{AntTrail, BlockedTiles, NavField};
use crate::consts::TILE_SIZE;

/// Result of one descent step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descent {
    /// Standing on a goal tile (distance 0); nothing moved
    GoalReached,
    /// Moved toward this neighbor
    Advancing { toward: TileCoord },
    /// No field entry or no open improving neighbor; nothing moved
    Stalled,
}

/// Result of one retreat step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    /// Current tile has no recorded predecessor; nothing moved
    Arrived,
    /// Moved toward the recorded predecessor
    Stepping { toward: TileCoord },
}

/// Per-axis nudge for an axis the path leaves idle
///
/// `offset` is the body's position within its tile cell; 0 is aligned.
#[inline]
pub fn corner_bias(offset: f32, margin: f32) -> f32 {
    if offset > 0.0 && offset < margin {
        -1.0
    } else if offset > TILE_SIZE - margin && offset < TILE_SIZE {
        1.0
    } else {
        0.0
    }
}

/// Distance left to the tile alignment a bias is pulling toward
#[inline]
fn alignment_gap(offset: f32, bias: f32) -> f32 {
    if bias < 0.0 { offset } else { TILE_SIZE - offset }
}

/// Velocity for a cardinal path direction after corner correction
///
/// Only an axis the direction leaves at zero is corrected, and never past
/// the alignment it is pulled toward. A zero direction yields zero velocity.
pub fn steer(pos: Vec2, dir: IVec2, speed: f32, margin: f32) -> Vec2 {
    if dir == IVec2::ZERO {
        return Vec2::ZERO;
    }

    let offset = Vec2::new(pos.x.rem_euclid(TILE_SIZE), pos.y.rem_euclid(TILE_SIZE));
    let mut bias = dir.as_vec2();
    if dir.x == 0 {
        bias.x = corner_bias(offset.x, margin);
    }
    if dir.y == 0 {
        bias.y = corner_bias(offset.y, margin);
    }

    let mut vel = bias.normalize_or_zero() * speed;
    if dir.x == 0 && bias.x != 0.0 {
        vel.x = vel.x.signum() * vel.x.abs().min(alignment_gap(offset.x, bias.x));
    }
    if dir.y == 0 && bias.y != 0.0 {
        vel.y = vel.y.signum() * vel.y.abs().min(alignment_gap(offset.y, bias.y));
    }
    vel
}

/// Pick the first strictly improving, unblocked neighbor (left, right, up,
/// down), recording each adoption in the ant trail
pub fn choose_step(
    tile: TileCoord,
    distance: u32,
    field: &NavField,
    blocked: &BlockedTiles,
    trail: &mut AntTrail,
) -> Option<TileCoord> {
    let mut best = distance;
    let mut chosen = None;

    for neighbor in tile.neighbors() {
        let Some(d) = field.distance(neighbor) else {
            continue;
        };
        if d >= best || blocked.contains(neighbor) {
            continue;
        }
        best = d;
        chosen = Some(neighbor);
        trail.record(neighbor, tile);
    }

    chosen
}

/// Advance a seeker one tick down the navigation field
pub fn descend(
    pos: &mut Vec2,
    field: &NavField,
    blocked: &BlockedTiles,
    trail: &mut AntTrail,
    speed: f32,
    margin: f32,
) -> Descent {
    let tile = TileCoord::under_body(*pos);
    let Some(distance) = field.distance(tile) else {
        return Descent::Stalled;
    };
    if distance == 0 {
        return Descent::GoalReached;
    }

    let Some(next) = choose_step(tile, distance, field, blocked, trail) else {
        return Descent::Stalled;
    };

    let dir = IVec2::new(next.x - tile.x, next.y - tile.y);
    *pos += steer(*pos, dir, speed, margin);
    Descent::Advancing { toward: next }
}

/// Walk one tick back along the ant trail
pub fn retreat(pos: &mut Vec2, trail: &AntTrail, speed: f32, margin: f32) -> Retreat {
    let tile = TileCoord::under_body(*pos);
    let Some(prev) = trail.predecessor(tile) else {
        return Retreat::Arrived;
    };

    let dir = IVec2::new((prev.x - tile.x).signum(), (prev.y - tile.y).signum());
    *pos += steer(*pos, dir, speed, margin);
    Retreat::Stepping { toward: prev }
}
