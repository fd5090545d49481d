//! Data-driven game balance
//!
//! Every field falls back to its `consts` default, so a tuning file only
//! needs to name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Balance values consumed by the simulation and scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Actor speed (pixels/tick)
    pub actor_speed: f32,
    /// Seeker speed while descending the field (pixels/tick)
    pub seeker_speed: f32,
    /// Pursuer speed during the chase (pixels/tick)
    pub pursuer_speed: f32,
    /// Corner-correction margin (pixels from a tile edge)
    pub corner_margin: f32,

    // === Interaction ===
    /// Radius for interactions and spawner checks (pixels)
    pub interact_radius: f32,
    /// Held item distance in front of its carrier (pixels)
    pub carry_offset: f32,
    /// Score lost when a destructible is destroyed
    pub destroy_penalty: i64,

    // === Spawning ===
    /// Empty ticks before a spawner fires
    pub spawn_threshold_ticks: u32,
    /// Live carryable population cap
    pub spawn_cap: usize,

    // === Lifecycle timers (ticks) ===
    pub goal_touched_ticks: u32,
    pub celebrating_ticks: u32,
    pub escalating_ticks: u32,
    pub complete_ticks: u32,

    // === Scheduling ===
    /// Logic ticks per period
    pub ticks_per_period: u32,
    /// Period length in milliseconds
    pub period_ms: u32,
    /// Cap on ticks drained per presented frame
    pub max_ticks_per_frame: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            actor_speed: ACTOR_SPEED,
            seeker_speed: SEEKER_SPEED,
            pursuer_speed: PURSUER_SPEED,
            corner_margin: CORNER_MARGIN,

            interact_radius: INTERACT_RADIUS,
            carry_offset: CARRY_OFFSET,
            destroy_penalty: DESTROY_PENALTY,

            spawn_threshold_ticks: SPAWN_THRESHOLD_TICKS,
            spawn_cap: SPAWN_CAP,

            goal_touched_ticks: GOAL_TOUCHED_TICKS,
            celebrating_ticks: CELEBRATING_TICKS,
            escalating_ticks: ESCALATING_TICKS,
            complete_ticks: COMPLETE_TICKS,

            ticks_per_period: TICKS_PER_PERIOD,
            period_ms: PERIOD_MS,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning = serde_json::from_str(json)?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing out a template file)
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "seeker_speed": 4.0 }"#).unwrap();
        assert_eq!(tuning.seeker_speed, 4.0);
        assert_eq!(tuning.spawn_cap, SPAWN_CAP);
        assert_eq!(tuning.max_ticks_per_frame, MAX_TICKS_PER_FRAME);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(SimError::Json(_))
        ));
    }

    #[test]
    fn test_template_round_trip() {
        let json = Tuning::default().to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), Tuning::default());
    }
}
