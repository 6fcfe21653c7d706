//! Data-driven gameplay balance
//!
//! Every gameplay-affecting knob lives here so a scenario can adjust the feel
//! without recompiling. Serialized as plain JSON; missing fields fall back to
//! the crate defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Cat planar speed cap, units per tick
    pub cat_max_speed: f32,
    /// Deck slopes up to this angle (degrees) make a cat slide
    pub cat_slope_limit_deg: f32,
    /// Slide damping, 0 = frictionless, 1 = no slide
    pub cat_slide_friction: f32,
    /// Raft hull integrity at spawn
    pub raft_start_health: f32,
    /// Steering smoothing rate (per second)
    pub raft_steering_speed: f32,
    /// Raft mass, numerator of the obstacle counter-impulse
    pub raft_mass: f32,
    /// Impact damage is impulse magnitude divided by this
    pub impact_damage_divisor: f32,
    /// Obstacle impacts above this impulse shove the obstacle under
    pub shove_impulse_threshold: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            cat_max_speed: CAT_MAX_SPEED,
            cat_slope_limit_deg: CAT_SLOPE_LIMIT_DEG,
            cat_slide_friction: CAT_SLIDE_FRICTION,
            raft_start_health: RAFT_START_HEALTH,
            raft_steering_speed: RAFT_STEERING_SPEED,
            raft_mass: RAFT_MASS,
            impact_damage_divisor: IMPACT_DAMAGE_DIVISOR,
            shove_impulse_threshold: SHOVE_IMPULSE_THRESHOLD,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize tuning as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
