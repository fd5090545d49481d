//! Fixed timestep simulation tick
//!
//! Advances one level deterministically and swaps in the next level of the
//! playlist when the current one finishes.

use glam::IVec2;

use super::ecs::{Entity, SeekerAgent, Sprite, SpriteName, SpriteRule};
use super::hazards::{run_spawners, update_carried};
use super::interact;
use super::level::{Level, LevelData};
use super::lifecycle::{LifecycleEvent, LifecycleStep, Phase};
use super::nav::BlockedTiles;
use super::seeker::{Descent, Retreat, descend, retreat};
use super::snapshot::RenderSnapshot;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Cardinal movement request, each axis in -1..=1
    pub movement: IVec2,
    /// Rising edge of the action button
    pub action: bool,
}

impl Level {
    /// Advance the level by one tick
    pub fn tick(&mut self, input: &TickInput, tuning: &Tuning) -> LifecycleStep {
        self.ticks += 1;
        let mut step = LifecycleStep::Idle;

        self.move_actor(input.movement, tuning.actor_speed);

        self.prompt = interact::available(&self.world, self.actor, tuning.interact_radius);
        if let (true, Some(action)) = (input.action, self.prompt) {
            let effect =
                interact::execute(&mut self.world, self.actor, action, tuning.destroy_penalty);
            self.score += effect.score_delta;
            if effect.opened_door.is_some() {
                step = self.fire(LifecycleEvent::SwitchToggled, tuning);
            }
            self.prompt = interact::available(&self.world, self.actor, tuning.interact_radius);
        }

        run_spawners(&mut self.world, tuning);
        update_carried(&mut self.world, tuning);

        let event = match self.lifecycle.phase() {
            Phase::Active => self.descend_seekers(tuning),
            Phase::Retreating => {
                let walkers = self.primary_seekers();
                self.retrace(&walkers, tuning.seeker_speed, tuning)
                    .then_some(LifecycleEvent::RetreatFinished)
            }
            Phase::Chasing => {
                let pursuers = self.pursuers();
                self.retrace(&pursuers, tuning.pursuer_speed, tuning)
                    .then_some(LifecycleEvent::ChaseFinished)
            }
            _ => None,
        };

        // One transition per tick; agent events re-fire next tick if deferred
        if let (LifecycleStep::Idle, Some(event)) = (step, event) {
            step = self.fire(event, tuning);
        }
        if step == LifecycleStep::Idle {
            step = self.lifecycle.advance(tuning);
            if let LifecycleStep::Entered(phase) = step {
                self.on_enter(phase);
            }
        } else {
            // Clears the entry flag so the new phase's timer starts next tick
            self.lifecycle.advance(tuning);
        }

        step
    }

    fn fire(&mut self, event: LifecycleEvent, tuning: &Tuning) -> LifecycleStep {
        let step = self.lifecycle.on_event(event, tuning);
        if let LifecycleStep::Entered(phase) = step {
            self.on_enter(phase);
        }
        step
    }

    /// Side effects tied to entering a phase
    fn on_enter(&mut self, phase: Phase) {
        match phase {
            Phase::Celebrating => {
                let goals: Vec<Entity> = self.world.goals.entities().collect();
                for goal in goals {
                    if let Some(sprite) = self.world.sprites.get_mut(goal) {
                        sprite.name = SpriteName::Hidden;
                    }
                }
            }
            Phase::Retreating => {
                let hazard = self.world.goals.iter().any(|(_, g)| g.spawns_hazard_phase);
                self.lifecycle.set_hazard_phase(hazard);
            }
            Phase::Escalating => {
                let goals: Vec<Entity> = self.world.goals.entities().collect();
                for goal in goals {
                    self.world.seekers.insert(goal, SeekerAgent);
                    let offset = self.world.sprites.get(goal).map(|s| s.offset).unwrap_or_default();
                    let mut sprite = Sprite::computed(SpriteRule::Pursuer {
                        lurking: "pursuer-lurking".into(),
                        chasing: "pursuer-chasing".into(),
                    });
                    sprite.offset = offset;
                    self.world.sprites.insert(goal, sprite);
                }
                log::debug!("{} goal markers woke up as pursuers", self.world.goals.len());
            }
            _ => {}
        }
    }

    /// Seekers that were placed by the level (not re-tagged goals)
    fn primary_seekers(&self) -> Vec<Entity> {
        self.world
            .seekers
            .entities()
            .filter(|e| !self.world.goals.contains(*e))
            .collect()
    }

    fn pursuers(&self) -> Vec<Entity> {
        self.world
            .seekers
            .entities()
            .filter(|e| self.world.goals.contains(*e))
            .collect()
    }

    fn descend_seekers(&mut self, tuning: &Tuning) -> Option<LifecycleEvent> {
        let blocked = BlockedTiles::collect(&self.world);
        let mut reached = false;

        for seeker in self.primary_seekers() {
            let Some(pos) = self.world.positions.get_mut(seeker) else {
                continue;
            };
            let outcome = descend(
                pos,
                &self.field,
                &blocked,
                &mut self.trail,
                tuning.seeker_speed,
                tuning.corner_margin,
            );
            reached |= outcome == Descent::GoalReached;
        }

        reached.then_some(LifecycleEvent::GoalReached)
    }

    /// Walk each entity back along the ant trail; true once all have arrived
    fn retrace(&mut self, walkers: &[Entity], speed: f32, tuning: &Tuning) -> bool {
        let mut arrived = true;
        for &walker in walkers {
            let Some(pos) = self.world.positions.get_mut(walker) else {
                continue;
            };
            let step = retreat(pos, &self.trail, speed, tuning.corner_margin);
            if let Retreat::Stepping { .. } = step {
                arrived = false;
            }
        }
        arrived
    }
}

/// A playlist of levels and the one currently running
#[derive(Debug, Clone)]
pub struct Game {
    /// Pristine copies, cloned on every load
    levels: Vec<Level>,
    level: Level,
    tuning: Tuning,
}

impl Game {
    /// Build and validate every level up front
    pub fn new(playlist: &[LevelData], tuning: Tuning) -> Result<Self, SimError> {
        let levels = playlist
            .iter()
            .enumerate()
            .map(|(index, data)| Level::build(index, data))
            .collect::<Result<Vec<_>, _>>()?;
        let level = levels.first().cloned().ok_or(SimError::EmptyPlaylist)?;
        Ok(Self {
            levels,
            level,
            tuning,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Advance one tick, loading the next level when this one finishes
    pub fn tick(&mut self, input: &TickInput) -> LifecycleStep {
        let step = self.level.tick(input, &self.tuning);
        if step == LifecycleStep::LevelFinished {
            self.advance();
        }
        step
    }

    /// Replace the running level with a fresh copy of the next one
    /// (the last level repeats)
    pub fn advance(&mut self) {
        let next = (self.level.index + 1).min(self.levels.len().saturating_sub(1));
        if let Some(level) = self.levels.get(next) {
            log::info!(
                "Advancing from level {} to level {} `{}`",
                self.level.index,
                next,
                level.name
            );
            self.level = level.clone();
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.level)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::level::{LevelObject, ObjectKind};

    /// 5x1 corridor: seeker at 0, door at 2, goal at 4; actor beside a switch
    fn corridor() -> LevelData {
        LevelData {
            name: "corridor".into(),
            width: 5,
            tiles: vec![0, 0, 0, 0, 0, 3, 3, 3, 3, 3],
            objects: vec![
                LevelObject::new(ObjectKind::Actor, 0.0, 32.0),
                LevelObject::new(ObjectKind::Switch, 0.0, 32.0).with_property("controls", "gate"),
                LevelObject::new(ObjectKind::Door, 64.0, 0.0).with_id("gate"),
                LevelObject::new(ObjectKind::Seeker, 0.0, 0.0),
                LevelObject::new(ObjectKind::Goal, 128.0, 0.0),
            ],
        }
    }

    const PRESS: TickInput = TickInput {
        movement: IVec2::ZERO,
        action: true,
    };

    fn run_until(level: &mut Level, tuning: &Tuning, phase: Phase, limit: usize) -> usize {
        for n in 1..=limit {
            level.tick(&TickInput::default(), tuning);
            if level.lifecycle.phase() == phase {
                return n;
            }
        }
        panic!("never reached {:?}", phase);
    }

    #[test]
    fn test_tick_waits_for_switch() {
        let tuning = Tuning::default();
        let mut level = Level::build(0, &corridor()).unwrap();
        let seeker_start = *level.world.positions.get(Entity(3)).unwrap();

        for _ in 0..100 {
            level.tick(&TickInput::default(), &tuning);
        }
        assert_eq!(level.lifecycle.phase(), Phase::Waiting);
        assert_eq!(level.world.positions.get(Entity(3)), Some(&seeker_start));
        assert_eq!(level.prompt.map(|p| p.label()), Some("Flip switch"));

        let step = level.tick(&PRESS, &tuning);
        assert_eq!(step, LifecycleStep::Entered(Phase::Active));
        assert!(level.world.doors.get(Entity(2)).unwrap().open);
        assert_eq!(level.prompt, None);
    }

    #[test]
    fn test_seeker_reaches_goal_and_retreats_home() {
        let tuning = Tuning::default();
        let mut level = Level::build(0, &corridor()).unwrap();
        level.tick(&PRESS, &tuning);

        run_until(&mut level, &tuning, Phase::GoalTouched, 1000);
        assert_eq!(level.lifecycle.timer(), Some(tuning.goal_touched_ticks));

        run_until(&mut level, &tuning, Phase::Celebrating, 100);
        let goal = level.world.sprites.get(Entity(4)).unwrap();
        assert_eq!(goal.name, SpriteName::Hidden);

        run_until(&mut level, &tuning, Phase::Retreating, 100);
        assert!(!level.lifecycle.hazard_phase());

        run_until(&mut level, &tuning, Phase::Complete, 1000);
        let home = level.world.positions.get(Entity(3)).unwrap();
        assert_eq!(crate::sim::TileCoord::under_body(*home), crate::sim::TileCoord::new(0, 0));
    }

    #[test]
    fn test_hazard_phase_retags_goals() {
        let tuning = Tuning::default();
        let mut data = corridor();
        data.objects[4] = data.objects[4].clone().with_property("spawns_hazard_phase", true);
        let mut level = Level::build(0, &data).unwrap();
        level.tick(&PRESS, &tuning);

        run_until(&mut level, &tuning, Phase::Retreating, 2000);
        assert!(level.lifecycle.hazard_phase());
        run_until(&mut level, &tuning, Phase::Escalating, 1000);
        assert!(level.world.seekers.contains(Entity(4)));
        assert!(matches!(
            level.world.sprites.get(Entity(4)).unwrap().name,
            SpriteName::Computed(SpriteRule::Pursuer { .. })
        ));

        let ticks = run_until(&mut level, &tuning, Phase::Chasing, 100);
        assert_eq!(ticks as u32, tuning.escalating_ticks);
        run_until(&mut level, &tuning, Phase::Complete, 1000);
        let pursuer = level.world.positions.get(Entity(4)).unwrap();
        assert_eq!(
            crate::sim::TileCoord::under_body(*pursuer),
            crate::sim::TileCoord::new(0, 0)
        );
    }

    #[test]
    fn test_game_advances_and_clamps_playlist() {
        let tuning = Tuning {
            complete_ticks: 1,
            ..Tuning::default()
        };
        let mut second = corridor();
        second.name = "second".into();
        let mut game = Game::new(&[corridor(), second], tuning).unwrap();
        assert_eq!(game.level_count(), 2);

        for index in [1usize, 1] {
            game.tick(&PRESS);
            let mut finished = false;
            for _ in 0..5000 {
                if game.tick(&TickInput::default()) == LifecycleStep::LevelFinished {
                    finished = true;
                    break;
                }
            }
            assert!(finished);
            assert_eq!(game.level().index, index);
            assert_eq!(game.level().lifecycle.phase(), Phase::Waiting);
            assert_eq!(game.level().ticks, 0);
        }
        assert_eq!(game.level().name, "second");
    }

    #[test]
    fn test_empty_playlist_is_error() {
        assert!(matches!(
            Game::new(&[], Tuning::default()),
            Err(SimError::EmptyPlaylist)
        ));
    }

    #[test]
    fn test_movement_input_moves_actor() {
        let tuning = Tuning::default();
        let mut level = Level::build(0, &corridor()).unwrap();
        let input = TickInput {
            movement: IVec2::new(1, 0),
            action: false,
        };
        level.tick(&input, &tuning);
        assert_eq!(
            level.world.positions.get(level.actor),
            Some(&Vec2::new(tuning.actor_speed, 32.0))
        );
    }
}
