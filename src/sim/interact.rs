//! Interaction resolution for the player-controlled actor
//!
//! Candidate actions are checked in a fixed priority order and the first
//! one that applies becomes the available action. Execution is the
//! caller's decision (rising edge of the action button only).

use super::ecs::{Entity, World};
use super::proximity::nearest_where;

/// An environment action the actor can perform right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Destroy a not-yet-cleaned destructible
    Destroy(Entity),
    /// Put down the held carryable
    Drop(Entity),
    /// Flip a switch whose door is still closed
    Toggle { switch: Entity, door: Entity },
    /// Lift a free carryable
    PickUp(Entity),
}

impl Interaction {
    /// Prompt text shown to the player
    pub fn label(&self) -> &'static str {
        match self {
            Interaction::Destroy(_) => "Clean up",
            Interaction::Drop(_) => "Drop",
            Interaction::Toggle { .. } => "Flip switch",
            Interaction::PickUp(_) => "Pick up",
        }
    }
}

/// What executing an interaction changed outside the component tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionEffect {
    pub score_delta: i64,
    pub opened_door: Option<Entity>,
}

type Check = fn(&World, Entity, f32) -> Option<Interaction>;

/// Highest priority first: destroy, drop, toggle, pick up
const CHECKS: [Check; 4] = [check_destroy, check_drop, check_toggle, check_pick_up];

fn check_destroy(world: &World, actor: Entity, radius: f32) -> Option<Interaction> {
    let origin = *world.positions.get(actor)?;
    nearest_where(&world.positions, origin, &world.destructibles, radius, |_, d| {
        !d.cleaned
    })
    .map(Interaction::Destroy)
}

fn check_drop(world: &World, actor: Entity, _radius: f32) -> Option<Interaction> {
    let item = world.carriers.get(actor)?.holding?;
    world.carryables.contains(item).then_some(Interaction::Drop(item))
}

fn check_toggle(world: &World, actor: Entity, radius: f32) -> Option<Interaction> {
    let origin = *world.positions.get(actor)?;
    let switch = nearest_where(&world.positions, origin, &world.switches, radius, |_, s| {
        world.switch_door(s).is_some_and(|door| !door.open)
    })?;
    let door = world.switches.get(switch)?.controls;
    Some(Interaction::Toggle { switch, door })
}

fn check_pick_up(world: &World, actor: Entity, radius: f32) -> Option<Interaction> {
    let carrier = world.carriers.get(actor)?;
    if carrier.holding.is_some() {
        return None;
    }
    let origin = *world.positions.get(actor)?;
    nearest_where(&world.positions, origin, &world.carryables, radius, |_, c| {
        c.held_by.is_none()
    })
    .map(Interaction::PickUp)
}

/// The single highest-priority action available to `actor`
pub fn available(world: &World, actor: Entity, radius: f32) -> Option<Interaction> {
    CHECKS.iter().find_map(|check| check(world, actor, radius))
}

/// Apply an interaction to the component tables
pub fn execute(
    world: &mut World,
    actor: Entity,
    interaction: Interaction,
    destroy_penalty: i64,
) -> InteractionEffect {
    let mut effect = InteractionEffect::default();

    match interaction {
        Interaction::Destroy(target) => {
            if let Some(obstacle) = world.destructibles.get_mut(target) {
                if !obstacle.actor_touched {
                    obstacle.actor_touched = true;
                    effect.score_delta -= destroy_penalty;
                }
                obstacle.cleaned = true;
            }
        }
        Interaction::Drop(item) => {
            let drop_at = world.positions.get(actor).copied();
            if let Some(carryable) = world.carryables.get_mut(item) {
                carryable.held_by = None;
            }
            if let Some(pos) = drop_at {
                world.positions.insert(item, pos);
            }
            if let Some(carrier) = world.carriers.get_mut(actor) {
                carrier.holding = None;
            }
        }
        Interaction::Toggle { door, .. } => {
            if let Some(latch) = world.doors.get_mut(door) {
                if !latch.open {
                    latch.open = true;
                    effect.opened_door = Some(door);
                }
            }
        }
        Interaction::PickUp(item) => {
            if let Some(carryable) = world.carryables.get_mut(item) {
                carryable.held_by = Some(actor);
                carryable.anim_timer = 0;
            }
            if let Some(carrier) = world.carriers.get_mut(actor) {
                carrier.holding = Some(item);
            }
        }
    }

    log::debug!("Executed {:?}", interaction);
    effect
}
