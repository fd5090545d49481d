//! Level lifecycle state machine
//!
//! ```text
//! waiting -> active -> goal_touched(30) -> celebrating(60) -> retreating
//!     retreating -> escalating(60) -> chasing -> complete(120)   (hazard phase)
//!     retreating -> complete(120)                                (otherwise)
//! ```
//!
//! Timed phases count down once per tick and transition the tick the timer
//! hits zero. A phase never transitions on the tick it was entered, so at
//! most one transition happens per tick.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Narrative phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Seeker idle until the first switch is flipped
    #[default]
    Waiting,
    /// Seeker descending the navigation field
    Active,
    /// Seeker standing on a goal (brief beat)
    GoalTouched,
    /// Goal markers gone, seeker celebrates
    Celebrating,
    /// Seeker walking its ant trail home
    Retreating,
    /// Goal markers wake up as pursuers (cosmetic beat)
    Escalating,
    /// Pursuers run the ant trail
    Chasing,
    /// Level won; next level loads when the timer runs out
    Complete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Waiting => "waiting",
            Phase::Active => "active",
            Phase::GoalTouched => "goal_touched",
            Phase::Celebrating => "celebrating",
            Phase::Retreating => "retreating",
            Phase::Escalating => "escalating",
            Phase::Chasing => "chasing",
            Phase::Complete => "complete",
        }
    }
}

/// Things that happen in the world and may move the machine along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A switch opened its door
    SwitchToggled,
    /// A seeker stood on a distance-0 tile
    GoalReached,
    /// Every retreating seeker ran out of trail
    RetreatFinished,
    /// Every pursuer ran out of trail
    ChaseFinished,
}

/// Outcome of a lifecycle step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    /// Nothing changed
    Idle,
    /// A new phase began this tick
    Entered(Phase),
    /// The completion timer ran out: load the next level
    LevelFinished,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lifecycle {
    phase: Phase,
    /// Ticks left in a timed phase
    timer: Option<u32>,
    /// Set on event-driven entry, cleared by the next `advance`
    fresh: bool,
    /// Decided on entry to `Retreating`
    hazard_phase: bool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timer(&self) -> Option<u32> {
        self.timer
    }

    pub fn hazard_phase(&self) -> bool {
        self.hazard_phase
    }

    /// Record whether the retreat ends in the pursuer chase
    pub fn set_hazard_phase(&mut self, enabled: bool) {
        self.hazard_phase = enabled;
    }

    /// Apply an event; events that do not fit the current phase are ignored
    pub fn on_event(&mut self, event: LifecycleEvent, tuning: &Tuning) -> LifecycleStep {
        let next = match (self.phase, event) {
            (Phase::Waiting, LifecycleEvent::SwitchToggled) => Phase::Active,
            (Phase::Active, LifecycleEvent::GoalReached) => Phase::GoalTouched,
            (Phase::Retreating, LifecycleEvent::RetreatFinished) if self.hazard_phase => {
                Phase::Escalating
            }
            (Phase::Retreating, LifecycleEvent::RetreatFinished) => Phase::Complete,
            (Phase::Chasing, LifecycleEvent::ChaseFinished) => Phase::Complete,
            _ => return LifecycleStep::Idle,
        };
        self.enter(next, tuning);
        LifecycleStep::Entered(next)
    }

    /// Per-tick timer countdown
    pub fn advance(&mut self, tuning: &Tuning) -> LifecycleStep {
        if self.fresh {
            self.fresh = false;
            return LifecycleStep::Idle;
        }

        let Some(remaining) = self.timer.as_mut() else {
            return LifecycleStep::Idle;
        };
        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            return LifecycleStep::Idle;
        }
        self.timer = None;

        let next = match self.phase {
            Phase::GoalTouched => Phase::Celebrating,
            Phase::Celebrating => Phase::Retreating,
            Phase::Escalating => Phase::Chasing,
            Phase::Complete => return LifecycleStep::LevelFinished,
            _ => return LifecycleStep::Idle,
        };
        self.enter(next, tuning);
        // Entered by this very countdown; the next tick may count
        self.fresh = false;
        LifecycleStep::Entered(next)
    }

    fn enter(&mut self, phase: Phase, tuning: &Tuning) {
        log::info!("Lifecycle {} -> {}", self.phase.as_str(), phase.as_str());
        self.phase = phase;
        self.fresh = true;
        self.timer = match phase {
            Phase::GoalTouched => Some(tuning.goal_touched_ticks),
            Phase::Celebrating => Some(tuning.celebrating_ticks),
            Phase::Escalating => Some(tuning.escalating_ticks),
            Phase::Complete => Some(tuning.complete_ticks),
            Phase::Waiting | Phase::Active | Phase::Retreating | Phase::Chasing => None,
        };
    }
}
