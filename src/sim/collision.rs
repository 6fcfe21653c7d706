//! Collision surface between the host physics and the simulation
//!
//! The host resolves the actual rigid-body or simplified floating contacts;
//! what arrives here is a per-contact report (impulse magnitude, first contact
//! point, the other body if any). Classification maps the counterpart onto the
//! fixed response set the raft knows how to handle.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{BodyId, WorldState};

/// Which floating model produced a contact.
///
/// The two pathways respond slightly differently; the tag picks the handler
/// per report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactPath {
    /// Full rigid-body floating model
    Rigid,
    /// Simplified floating model
    Simplified,
}

/// A collision-enter report from the host physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactReport {
    /// The other floating body, or `None` for static world geometry
    pub body: Option<BodyId>,
    /// Impulse magnitude applied by the solver
    pub impulse: f32,
    /// First contact point, world space
    pub point: Vec3,
    pub path: ContactPath,
}

/// The raft's view of what it hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counterpart {
    /// Static world geometry (shoreline, rocks)
    Static,
    Obstacle(BodyId),
    DrowningCat(BodyId),
}

/// Classify a reported body against the entity arenas.
///
/// `None` means static geometry. An id no arena knows is skipped: the body
/// despawned between the physics step and this tick.
pub fn classify(world: &WorldState, body: Option<BodyId>) -> Option<Counterpart> {
    let Some(id) = body else {
        return Some(Counterpart::Static);
    };

    if world.obstacle(id).is_some() {
        return Some(Counterpart::Obstacle(id));
    }
    if world.drowning_body(id).is_some() {
        return Some(Counterpart::DrowningCat(id));
    }

    log::debug!("contact with unknown body {id:?}, skipped");
    None
}

/// Result of a downward ground raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    /// Deck height at the hit point
    pub height: f32,
    /// Surface normal at the hit point
    pub normal: Vec3,
}

/// Ground sampling seam onto the host physics: a raycast straight down from
/// `origin` against the deck layer.
pub trait GroundProbe {
    fn probe(&self, origin: Vec3) -> Option<GroundHit>;
}

/// A level deck at a fixed height; the demo and tests run on this.
#[derive(Debug, Clone, Copy)]
pub struct FlatDeck {
    pub height: f32,
}

impl GroundProbe for FlatDeck {
    fn probe(&self, _origin: Vec3) -> Option<GroundHit> {
        Some(GroundHit {
            height: self.height,
            normal: Vec3::Y,
        })
    }
}
