//! World state and entity arenas
//!
//! Everything that must be persisted for save/determinism lives here. Entities
//! are owned by [`WorldState`] and created/removed through explicit arena
//! operations; ids come from a single monotonic counter and arenas stay sorted
//! by id so iteration order is stable.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cat::{Cat, CatId};
use super::fight::{Fight, FightId};
use super::raft::Raft;
use crate::Tuning;

/// Stable identifier of a floating body (obstacle or drowning cat)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BodyId(pub u32);

/// Stable identifier of a trigger volume
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VolumeId(pub u32);

/// What a trigger volume belongs to.
///
/// The host physics reports overlaps by volume id; this registry entry
/// replaces scene-hierarchy walks with an explicit lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeOwner {
    /// A raft edge a walking cat can slip over
    Edge,
    Cat(CatId),
    Fight(FightId),
}

/// Volume id -> owner bindings.
///
/// Small and scanned linearly; bindings come and go with their owners.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeRegistry {
    bindings: Vec<(VolumeId, VolumeOwner)>,
}

impl VolumeRegistry {
    pub fn bind(&mut self, volume: VolumeId, owner: VolumeOwner) {
        self.unbind(volume);
        self.bindings.push((volume, owner));
    }

    pub fn unbind(&mut self, volume: VolumeId) {
        self.bindings.retain(|(v, _)| *v != volume);
    }

    pub fn owner_of(&self, volume: VolumeId) -> Option<VolumeOwner> {
        self.bindings
            .iter()
            .find(|(v, _)| *v == volume)
            .map(|(_, owner)| *owner)
    }
}

/// Events emitted by the simulation for the host to consume.
///
/// Each originating contact queues at most one event; the host drains the
/// queue after every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// The raft touched a drowning cat; rescue logic takes over
    DrowningCatContact { cat: CatId, point: Vec3 },
    /// The raft rammed an obstacle hard enough to push it under
    ObstacleShoved { body: BodyId, impulse: Vec3 },
    /// Hull integrity reached zero
    RaftWrecked,
}

/// A floating obstacle (driftwood, crate, mine)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: BodyId,
    pub pos: Vec3,
    /// Divisor of the counter-impulse the raft applies on hard hits
    pub mass: f32,
}

/// A cat in the water, waiting to be fished out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrowningCat {
    pub id: BodyId,
    /// The cat this body carries
    pub cat: CatId,
    pub pos: Vec3,
    /// Where rescue tools hook on
    pub interaction_point: Vec3,
    /// Cleared by the simplified collision path on first raft contact
    pub collider_enabled: bool,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// A fresh generator for one draw sequence; bumps the stream so
    /// consecutive draws differ while staying reproducible.
    pub fn next_rng(&mut self) -> Pcg32 {
        self.stream += 1;
        Pcg32::seed_from_u64(self.seed.wrapping_add(self.stream))
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// The player's raft
    pub raft: Raft,
    /// Cats on deck (sorted by id for determinism)
    pub cats: Vec<Cat>,
    /// Floating obstacles (sorted by id)
    pub obstacles: Vec<Obstacle>,
    /// Drowning cats in the water (sorted by id)
    pub drowning: Vec<DrowningCat>,
    /// Active fights (sorted by id)
    pub fights: Vec<Fight>,
    /// Trigger-volume ownership
    pub volumes: VolumeRegistry,
    /// Queued events, drained by the host after each tick
    pub events: Vec<SimEvent>,
    /// Next entity ID
    next_id: u32,
}

impl WorldState {
    /// Create an empty world with the given seed
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            time_ticks: 0,
            raft: Raft::new(tuning),
            cats: Vec::new(),
            obstacles: Vec::new(),
            drowning: Vec::new(),
            fights: Vec::new(),
            volumes: VolumeRegistry::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a walking cat on deck, with its trigger volume bound
    pub fn spawn_cat(&mut self, pos: Vec3, tuning: &Tuning) -> CatId {
        let id = CatId(self.next_entity_id());
        let volume = VolumeId(self.next_entity_id());
        self.volumes.bind(volume, VolumeOwner::Cat(id));
        self.cats.push(Cat::new(id, volume, pos, tuning));
        id
    }

    /// Register a raft-edge trigger volume
    pub fn spawn_edge(&mut self) -> VolumeId {
        let volume = VolumeId(self.next_entity_id());
        self.volumes.bind(volume, VolumeOwner::Edge);
        volume
    }

    /// Spawn a floating obstacle
    pub fn spawn_obstacle(&mut self, pos: Vec3, mass: f32) -> BodyId {
        let id = BodyId(self.next_entity_id());
        self.obstacles.push(Obstacle { id, pos, mass });
        id
    }

    /// Spawn a drowning cat: the carried cat entity plus its floating body
    pub fn spawn_drowning_cat(&mut self, pos: Vec3, tuning: &Tuning) -> BodyId {
        let cat = self.spawn_cat(pos, tuning);
        let id = BodyId(self.next_entity_id());
        self.drowning.push(DrowningCat {
            id,
            cat,
            pos,
            interaction_point: pos + Vec3::Y * 0.5,
            collider_enabled: true,
        });
        id
    }

    /// Remove a collected cat from the world, along with any floating body
    /// carrying it and its volume binding.
    pub fn pick_kitty(&mut self, cat: CatId) {
        if let Some(removed) = self.cats.iter().find(|c| c.id == cat) {
            self.volumes.unbind(removed.volume);
        }
        self.cats.retain(|c| c.id != cat);
        self.drowning.retain(|d| d.cat != cat);
    }

    pub fn cat(&self, id: CatId) -> Option<&Cat> {
        self.cats.iter().find(|c| c.id == id)
    }

    pub fn cat_mut(&mut self, id: CatId) -> Option<&mut Cat> {
        self.cats.iter_mut().find(|c| c.id == id)
    }

    pub fn obstacle(&self, id: BodyId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn drowning_body(&self, id: BodyId) -> Option<&DrowningCat> {
        self.drowning.iter().find(|d| d.id == id)
    }

    pub fn drowning_body_mut(&mut self, id: BodyId) -> Option<&mut DrowningCat> {
        self.drowning.iter_mut().find(|d| d.id == id)
    }

    pub fn fight(&self, id: FightId) -> Option<&Fight> {
        self.fights.iter().find(|f| f.id == id)
    }

    pub fn fight_mut(&mut self, id: FightId) -> Option<&mut Fight> {
        self.fights.iter_mut().find(|f| f.id == id)
    }

    /// Hand the queued events to the host
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure arenas are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.cats.sort_by_key(|c| c.id);
        self.obstacles.sort_by_key(|o| o.id);
        self.drowning.sort_by_key(|d| d.id);
        self.fights.sort_by_key(|f| f.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids_unique() {
        let tuning = Tuning::default();
        let mut world = WorldState::new(7, &tuning);

        let a = world.spawn_cat(Vec3::ZERO, &tuning);
        let b = world.spawn_cat(Vec3::ONE, &tuning);
        let o = world.spawn_obstacle(Vec3::ZERO, 10.0);

        assert_ne!(a, b);
        assert_ne!(a.0, o.0);
        assert_ne!(b.0, o.0);
    }

    #[test]
    fn test_volume_registry_bind_unbind() {
        let mut registry = VolumeRegistry::default();
        let volume = VolumeId(3);

        assert_eq!(registry.owner_of(volume), None);

        registry.bind(volume, VolumeOwner::Edge);
        assert_eq!(registry.owner_of(volume), Some(VolumeOwner::Edge));

        // Rebinding replaces the previous owner
        registry.bind(volume, VolumeOwner::Cat(CatId(9)));
        assert_eq!(registry.owner_of(volume), Some(VolumeOwner::Cat(CatId(9))));

        registry.unbind(volume);
        assert_eq!(registry.owner_of(volume), None);
    }

    #[test]
    fn test_pick_kitty_removes_cat_body_and_binding() {
        let tuning = Tuning::default();
        let mut world = WorldState::new(7, &tuning);

        let body = world.spawn_drowning_cat(Vec3::new(5.0, 0.0, 0.0), &tuning);
        let cat = world.drowning_body(body).unwrap().cat;
        let volume = world.cat(cat).unwrap().volume;

        world.pick_kitty(cat);

        assert!(world.cat(cat).is_none());
        assert!(world.drowning_body(body).is_none());
        assert_eq!(world.volumes.owner_of(volume), None);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let tuning = Tuning::default();
        let mut world = WorldState::new(7, &tuning);
        world.events.push(SimEvent::RaftWrecked);

        let drained = world.drain_events();
        assert_eq!(drained.len(), 1);
        assert!(world.events.is_empty());
    }
}
