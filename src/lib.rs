//! Raft Rescue - a floating-raft cat rescue simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (cat state machines, raft steering, collision response)
//! - `tuning`: Data-driven gameplay balance
//!
//! This crate is the engine-agnostic core. Rendering, input collection and
//! rigid-body integration live in the host engine: each frame the host feeds
//! steering key state, collision-enter reports and trigger-volume overlaps
//! into [`sim::tick`], answers ground raycasts through [`sim::GroundProbe`],
//! and drains the events the simulation emits.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec3;

/// Gameplay constants
pub mod consts {
    /// Fixed simulation timestep (one tick per host frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Cat planar speed cap, units per tick
    pub const CAT_MAX_SPEED: f32 = 0.01;
    /// Deck slopes up to this angle (degrees) make a cat slide
    pub const CAT_SLOPE_LIMIT_DEG: f32 = 3.0;
    /// Slide damping, 0 = frictionless, 1 = no slide
    pub const CAT_SLIDE_FRICTION: f32 = 0.3;
    /// A waypoint closer than this is reached and destroyed
    pub const WAYPOINT_REACHED_DIST: f32 = 0.2;
    /// Vertical drop per tick while a cat has no ground support
    pub const CAT_FALL_STEP: f32 = 1.0;

    /// Raft hull integrity at spawn
    pub const RAFT_START_HEALTH: f32 = 100.0;
    /// Steering smoothing rate (per second)
    pub const RAFT_STEERING_SPEED: f32 = 1.0;
    /// Raft mass, numerator of the obstacle counter-impulse
    pub const RAFT_MASS: f32 = 40.0;
    /// Impact damage is impulse magnitude divided by this
    pub const IMPACT_DAMAGE_DIVISOR: f32 = 10.0;
    /// Obstacle impacts above this impulse shove the obstacle under
    pub const SHOVE_IMPULSE_THRESHOLD: f32 = 5.0;

    /// Steering rig deflection range, degrees (asymmetric on purpose)
    pub const RIG_MIN_DEG: f32 = -30.0;
    pub const RIG_MAX_DEG: f32 = 50.0;
    /// World-yaw contribution to rig deflection
    pub const RIG_YAW_GAIN: f32 = 100.0;
}

/// Linear interpolation with the parameter clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Planar (XZ) part of a vector, Y zeroed
#[inline]
pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Planar (XZ) distance between two points
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(b - a).length()
}
