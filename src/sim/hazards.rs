//! Spawners and carry mechanics
//!
//! Both run every tick regardless of lifecycle phase.

use super::ecs::{Carryable, Entity, Sprite, SpriteRule, World};
use super::proximity::nearest;
use crate::tuning::Tuning;

/// Free-roam animation frames for spawned hazards
pub const HAZARD_FRAMES: [&str; 2] = ["hazard-0", "hazard-1"];
/// Animation rate of hazards (ticks per frame)
pub const HAZARD_TICKS_PER_FRAME: u32 = 15;

/// Default appearance of a live hazard
pub fn hazard_sprite() -> Sprite {
    Sprite::computed(SpriteRule::Hazard {
        frames: HAZARD_FRAMES.iter().map(|f| f.to_string()).collect(),
        ticks_per_frame: HAZARD_TICKS_PER_FRAME,
    })
}

/// Tick every spawner; returns the entities created this tick
pub fn run_spawners(world: &mut World, tuning: &Tuning) -> Vec<Entity> {
    let mut spawned = Vec::new();
    let spawners: Vec<Entity> = world.spawners.entities().collect();

    for spawner in spawners {
        let Some(origin) = world.positions.get(spawner).copied() else {
            continue;
        };

        let occupied = nearest(
            &world.positions,
            origin,
            &world.carryables,
            tuning.interact_radius,
        )
        .is_some();

        let Some(state) = world.spawners.get_mut(spawner) else {
            continue;
        };
        if occupied {
            state.timer = 0;
            continue;
        }
        state.timer = state.timer.saturating_add(1);
        if state.timer < tuning.spawn_threshold_ticks {
            continue;
        }
        if world.live_carryables() >= tuning.spawn_cap {
            continue;
        }

        let hazard = world.spawn();
        world.positions.insert(hazard, origin);
        world.carryables.insert(hazard, Carryable::new(true));
        world.sprites.insert(hazard, hazard_sprite());
        log::debug!("Spawner {:?} created {:?}", spawner, hazard);
        spawned.push(hazard);
    }

    spawned
}

/// Slave held items to their carriers and run free-roam animation clocks
pub fn update_carried(world: &mut World, tuning: &Tuning) {
    let World {
        positions,
        carryables,
        carriers,
        ..
    } = world;

    for (item, carryable) in carryables.iter_mut() {
        let Some(holder) = carryable.held_by else {
            carryable.anim_timer = carryable.anim_timer.wrapping_add(1);
            continue;
        };
        carryable.anim_timer = 0;

        let Some(holder_pos) = positions.get(holder).copied() else {
            continue;
        };
        let dir = carriers.get(holder).map(|c| c.dir).unwrap_or_default();
        positions.insert(*item, holder_pos + dir * tuning.carry_offset);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::ecs::Carrier;

    fn world_with_spawner(at: Vec2) -> (World, Entity) {
        let mut world = World::default();
        let spawner = world.spawn();
        world.positions.insert(spawner, at);
        world.spawners.insert(spawner, Default::default());
        (world, spawner)
    }

    #[test]
    fn test_spawns_after_threshold() {
        let tuning = Tuning::default();
        let (mut world, spawner) = world_with_spawner(Vec2::new(64.0, 64.0));

        for _ in 1..tuning.spawn_threshold_ticks {
            assert!(run_spawners(&mut world, &tuning).is_empty());
        }
        let spawned = run_spawners(&mut world, &tuning);
        assert_eq!(spawned.len(), 1);
        let hazard = spawned[0];
        assert_eq!(world.positions.get(hazard), Some(&Vec2::new(64.0, 64.0)));
        assert!(world.carryables.get(hazard).unwrap().is_live_hazard());
        assert!(world.sprites.contains(hazard));

        // The fresh hazard sits on the spawner, so the clock resets
        assert!(run_spawners(&mut world, &tuning).is_empty());
        assert_eq!(world.spawners.get(spawner).unwrap().timer, 0);
    }

    #[test]
    fn test_nearby_carryable_holds_timer_at_zero() {
        let tuning = Tuning::default();
        let (mut world, spawner) = world_with_spawner(Vec2::ZERO);
        let prop = world.spawn();
        world.positions.insert(prop, Vec2::new(10.0, 0.0));
        world.carryables.insert(prop, Carryable::new(false));

        for _ in 0..500 {
            assert!(run_spawners(&mut world, &tuning).is_empty());
        }
        assert_eq!(world.spawners.get(spawner).unwrap().timer, 0);
    }

    #[test]
    fn test_population_cap_blocks_spawn_but_timer_keeps_running() {
        let tuning = Tuning {
            spawn_cap: 1,
            spawn_threshold_ticks: 3,
            ..Tuning::default()
        };
        let (mut world, spawner) = world_with_spawner(Vec2::ZERO);
        let far = world.spawn();
        world.positions.insert(far, Vec2::new(500.0, 500.0));
        world.carryables.insert(far, Carryable::new(true));

        for _ in 0..5 {
            assert!(run_spawners(&mut world, &tuning).is_empty());
        }
        assert_eq!(world.spawners.get(spawner).unwrap().timer, 5);

        // Hazard removed from play: the accumulated timer spawns at once
        world.carryables.get_mut(far).unwrap().alive = false;
        assert_eq!(run_spawners(&mut world, &tuning).len(), 1);
    }

    #[test]
    fn test_spawner_without_position_is_skipped() {
        let tuning = Tuning {
            spawn_threshold_ticks: 1,
            ..Tuning::default()
        };
        let mut world = World::default();
        let spawner = world.spawn();
        world.spawners.insert(spawner, Default::default());
        assert!(run_spawners(&mut world, &tuning).is_empty());
        assert_eq!(world.spawners.get(spawner).unwrap().timer, 0);
    }

    #[test]
    fn test_held_item_follows_carrier_direction() {
        let tuning = Tuning::default();
        let mut world = World::default();
        let carrier = world.spawn();
        world.positions.insert(carrier, Vec2::new(100.0, 100.0));
        world.carriers.insert(
            carrier,
            Carrier {
                holding: None,
                dir: Vec2::new(-1.0, 0.0),
            },
        );
        let item = world.spawn();
        world.positions.insert(item, Vec2::ZERO);
        world.carryables.insert(
            item,
            Carryable {
                held_by: Some(carrier),
                anim_timer: 9,
                alive: true,
            },
        );
        let free = world.spawn();
        world.positions.insert(free, Vec2::ZERO);
        world.carryables.insert(free, Carryable::new(true));

        update_carried(&mut world, &tuning);

        assert_eq!(
            world.positions.get(item),
            Some(&Vec2::new(100.0 - tuning.carry_offset, 100.0))
        );
        assert_eq!(world.carryables.get(item).unwrap().anim_timer, 0);
        assert_eq!(world.carryables.get(free).unwrap().anim_timer, 1);
        assert_eq!(world.positions.get(free), Some(&Vec2::ZERO));
    }
}
