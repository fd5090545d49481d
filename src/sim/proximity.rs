//! Nearest-entity queries by squared Euclidean distance

use glam::Vec2;

use super::ecs::{ComponentTable, Entity, Position};

/// Nearest entity of `table` strictly within `radius` of `origin`
///
/// Candidates without a position are skipped. Ties go to the first
/// candidate in table order.
pub fn nearest<T>(
    positions: &ComponentTable<Position>,
    origin: Vec2,
    table: &ComponentTable<T>,
    radius: f32,
) -> Option<Entity> {
    nearest_where(positions, origin, table, radius, |_, _| true)
}

/// Like [`nearest`], restricted to rows accepted by `filter`
pub fn nearest_where<T, F>(
    positions: &ComponentTable<Position>,
    origin: Vec2,
    table: &ComponentTable<T>,
    radius: f32,
    mut filter: F,
) -> Option<Entity>
where
    F: FnMut(Entity, &T) -> bool,
{
    let mut best: Option<(Entity, f32)> = None;
    let limit = radius * radius;

    for (entity, row) in table.iter() {
        let Some(pos) = positions.get(entity) else {
            continue;
        };
        if !filter(entity, row) {
            continue;
        }
        let dist_sq = origin.distance_squared(*pos);
        if dist_sq >= limit {
            continue;
        }
        // Strict comparison keeps the earliest of equally distant candidates
        if best.is_none_or(|(_, d)| dist_sq < d) {
            best = Some((entity, dist_sq));
        }
    }

    best.map(|(entity, _)| entity)
}

/// Nearest entity to `actor`, using the actor's own position
pub fn nearest_to<T>(
    positions: &ComponentTable<Position>,
    actor: Entity,
    table: &ComponentTable<T>,
    radius: f32,
) -> Option<Entity> {
    let origin = *positions.get(actor)?;
    nearest(positions, origin, table, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(points: &[(u32, f32, f32)]) -> ComponentTable<Position> {
        let mut table = ComponentTable::default();
        for &(id, x, y) in points {
            table.insert(Entity(id), Vec2::new(x, y));
        }
        table
    }

    fn markers(ids: &[u32]) -> ComponentTable<()> {
        let mut table = ComponentTable::default();
        for &id in ids {
            table.insert(Entity(id), ());
        }
        table
    }

    #[test]
    fn test_picks_minimum_distance() {
        let pos = positions(&[(1, 20.0, 0.0), (2, 5.0, 0.0), (3, 0.0, 10.0)]);
        let found = nearest(&pos, Vec2::ZERO, &markers(&[1, 2, 3]), 32.0);
        assert_eq!(found, Some(Entity(2)));
    }

    #[test]
    fn test_radius_is_exclusive() {
        let pos = positions(&[(1, 32.0, 0.0)]);
        assert_eq!(nearest(&pos, Vec2::ZERO, &markers(&[1]), 32.0), None);
        assert_eq!(nearest(&pos, Vec2::ZERO, &markers(&[1]), 32.5), Some(Entity(1)));
    }

    #[test]
    fn test_ties_go_to_first_in_order() {
        let pos = positions(&[(4, -10.0, 0.0), (7, 10.0, 0.0)]);
        assert_eq!(nearest(&pos, Vec2::ZERO, &markers(&[7, 4]), 32.0), Some(Entity(4)));
    }

    #[test]
    fn test_skips_candidates_without_position() {
        let pos = positions(&[(2, 30.0, 0.0)]);
        assert_eq!(nearest(&pos, Vec2::ZERO, &markers(&[1, 2]), 32.0), Some(Entity(2)));
    }

    #[test]
    fn test_filter_and_actor_lookup() {
        let pos = positions(&[(0, 0.0, 0.0), (1, 1.0, 0.0), (2, 2.0, 0.0)]);
        let table = markers(&[1, 2]);
        let found = nearest_where(&pos, Vec2::ZERO, &table, 32.0, |e, _| e != Entity(1));
        assert_eq!(found, Some(Entity(2)));
        assert_eq!(nearest_to(&pos, Entity(0), &table, 32.0), Some(Entity(1)));
        assert_eq!(nearest_to(&pos, Entity(9), &table, 32.0), None);
    }
}
