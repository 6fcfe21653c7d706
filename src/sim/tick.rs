//! Fixed timestep simulation tick
//!
//! One tick per host frame, in a fixed order: contact responses first (the
//! host physics steps before per-frame logic), then trigger-volume dispatch,
//! then cat movement in id order, then the raft's late-update steering pass.
//! The host drains the event queue after the tick.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cat::CatId;
use super::collision::{ContactPath, ContactReport, GroundProbe, classify};
use super::raft::{SteerIntent, on_rigid_contact, on_simple_contact};
use super::state::{VolumeId, VolumeOwner, WorldState};
use crate::Tuning;

/// Trigger-volume overlap phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlap {
    Enter,
    Exit,
}

/// A trigger-volume overlap report from the host physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerReport {
    /// The cat whose trigger volume fired
    pub cat: CatId,
    /// The other volume
    pub volume: VolumeId,
    pub overlap: Overlap,
}

/// Host input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering key state (A/D)
    pub steer: SteerIntent,
    /// Collision-enter reports against the raft
    pub contacts: Vec<ContactReport>,
    /// Trigger-volume overlap reports
    pub triggers: Vec<TriggerReport>,
}

/// Advance the world by one fixed timestep
pub fn tick(state: &mut WorldState, input: &TickInput, probe: &dyn GroundProbe, dt: f32) {
    state.time_ticks += 1;

    for report in &input.contacts {
        let Some(counterpart) = classify(state, report.body) else {
            continue;
        };
        match report.path {
            ContactPath::Rigid => on_rigid_contact(state, counterpart, report.impulse, report.point),
            ContactPath::Simplified => {
                on_simple_contact(state, counterpart, report.impulse, report.point)
            }
        }
    }

    for report in &input.triggers {
        apply_trigger(state, report);
    }

    // Cats are kept sorted by id, so this order is stable
    for cat in &mut state.cats {
        cat.step(probe);
    }

    state.raft.steer_tick(input.steer, dt);
}

/// Route one overlap report through the volume registry to the cat's state
/// machine. Unbound volumes and a cat's own volume are skipped.
fn apply_trigger(state: &mut WorldState, report: &TriggerReport) {
    let Some(owner) = state.volumes.owner_of(report.volume) else {
        log::debug!("overlap with unbound volume {:?}, skipped", report.volume);
        return;
    };
    if owner == VolumeOwner::Cat(report.cat) {
        return;
    }

    let Some(cat) = state.cat_mut(report.cat) else {
        return;
    };
    match report.overlap {
        Overlap::Enter => cat.on_volume_enter(owner),
        Overlap::Exit => cat.on_volume_exit(owner),
    }
}

/// Scatter a wave of drift around the raft: half obstacles, half drowning
/// cats, on a ring of seeded random bearings.
pub fn generate_drift(state: &mut WorldState, count: usize, tuning: &Tuning) {
    use std::f32::consts::TAU;

    let mut rng = state.rng_state.next_rng();
    let center = state.raft.pos;

    for index in 0..count {
        let bearing = rng.random_range(0.0..TAU);
        let distance = rng.random_range(4.0..12.0);
        let pos = center + Vec3::new(bearing.cos() * distance, 0.0, bearing.sin() * distance);

        if index % 2 == 0 {
            let mass = rng.random_range(5.0..20.0);
            state.spawn_obstacle(pos, mass);
        } else {
            state.spawn_drowning_cat(pos, tuning);
        }
    }
    log::info!("scattered {count} drift bodies around the raft");
}
