//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies
//!
//! The host engine owns physics integration and rendering. It reports
//! collision impulses and trigger-volume overlaps through [`TickInput`],
//! answers downward raycasts through [`GroundProbe`], and drains
//! [`SimEvent`]s after each [`tick`].

pub mod cat;
pub mod collision;
pub mod fight;
pub mod raft;
pub mod state;
pub mod tick;

pub use cat::{Cat, CatId, CatSprite, CatState, CatVisual, DebugMarker, Walking, Waypoint};
pub use collision::{
    ContactPath, ContactReport, Counterpart, FlatDeck, GroundHit, GroundProbe, classify,
};
pub use fight::{Fight, FightId, attack, end_fight, join_fight, stop_fighting};
pub use raft::{Raft, RaftRig, SteerIntent};
pub use state::{
    BodyId, DrowningCat, Obstacle, RngState, SimEvent, VolumeId, VolumeOwner, VolumeRegistry,
    WorldState,
};
pub use tick::{Overlap, TickInput, TriggerReport, generate_drift, tick};
