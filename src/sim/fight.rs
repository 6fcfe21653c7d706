//! Mutual-combat sessions
//!
//! A fight pulls its members out of normal movement and collision for as long
//! as it runs: each member's collider is disabled on entry and restored with a
//! fresh walking state on exit. What ends a fight is up to the caller; the
//! operations here only enforce that a session never runs with fewer than two
//! members.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::cat::{CatId, CatState, Walking};
use super::state::{VolumeId, VolumeOwner, WorldState};

/// Stable fight identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FightId(pub u32);

/// An active combat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fight {
    pub id: FightId,
    /// Trigger volume walking cats overlap to record a possible join
    pub volume: VolumeId,
    pub pos: Vec3,
    /// At least two while the session is alive
    pub members: Vec<CatId>,
}

/// Start a fight between `attacker` and its recorded target.
///
/// Both cats must currently be walking and the attacker must hold a target
/// association; anything else is a no-op. Returns the new session's id.
pub fn attack(world: &mut WorldState, attacker: CatId) -> Option<FightId> {
    let attacker_cat = world.cat(attacker)?;
    let CatState::Walking(walking) = attacker_cat.state() else {
        return None;
    };
    let target = walking.attack_target?;
    let attacker_pos = attacker_cat.pos;

    let target_cat = world.cat(target)?;
    let CatState::Walking(_) = target_cat.state() else {
        return None;
    };
    let target_pos = target_cat.pos;

    let id = FightId(world.next_entity_id());
    let volume = VolumeId(world.next_entity_id());
    world.volumes.bind(volume, VolumeOwner::Fight(id));
    world.fights.push(Fight {
        id,
        volume,
        pos: (attacker_pos + target_pos) / 2.0,
        members: vec![attacker, target],
    });

    enter_fight(world, attacker, id);
    enter_fight(world, target, id);
    log::debug!("fight {id:?} started: {attacker:?} vs {target:?}");
    Some(id)
}

/// Join the fight whose volume the cat is overlapping.
///
/// A stale association (the fight already ended) is cleared and ignored.
pub fn join_fight(world: &mut WorldState, cat: CatId) -> bool {
    let Some(fight) = world
        .cat_mut(cat)
        .and_then(|c| c.walking_mut())
        .and_then(|w| w.nearby_fight)
    else {
        return false;
    };

    if world.fight(fight).is_none() {
        if let Some(walking) = world.cat_mut(cat).and_then(|c| c.walking_mut()) {
            walking.nearby_fight = None;
        }
        return false;
    }

    if let Some(session) = world.fight_mut(fight) {
        session.members.push(cat);
    }
    enter_fight(world, cat, fight);
    log::debug!("{cat:?} joined fight {fight:?}");
    true
}

/// Pull one cat out of its fight, restoring a fresh walking state and its
/// collider. A session left with fewer than two members ends.
pub fn stop_fighting(world: &mut WorldState, cat: CatId) {
    let Some(fighter) = world.cat(cat) else {
        return;
    };
    let CatState::Fighting { fight } = fighter.state() else {
        return;
    };
    let fight = *fight;

    leave_fight(world, cat);
    let remaining = match world.fight_mut(fight) {
        Some(session) => {
            session.members.retain(|m| *m != cat);
            session.members.len()
        }
        None => return,
    };
    if remaining < 2 {
        end_fight(world, fight);
    }
}

/// Tear a session down: every member reverts to walking, the volume is
/// unbound, and stale nearby-fight associations are swept (the destroyed
/// volume can no longer send trigger exits).
pub fn end_fight(world: &mut WorldState, fight: FightId) {
    let Some(index) = world.fights.iter().position(|f| f.id == fight) else {
        return;
    };
    let session = world.fights.remove(index);
    world.volumes.unbind(session.volume);

    for member in session.members {
        let still_in_session = world
            .cat(member)
            .is_some_and(|c| *c.state() == (CatState::Fighting { fight }));
        if still_in_session {
            leave_fight(world, member);
        }
    }

    for cat in &mut world.cats {
        if let Some(walking) = cat.walking_mut() {
            if walking.nearby_fight == Some(fight) {
                walking.nearby_fight = None;
            }
        }
    }
    log::debug!("fight {fight:?} ended");
}

fn enter_fight(world: &mut WorldState, cat: CatId, fight: FightId) {
    if let Some(cat) = world.cat_mut(cat) {
        cat.set_state(CatState::Fighting { fight });
        cat.collider_enabled = false;
    }
}

fn leave_fight(world: &mut WorldState, cat: CatId) {
    if let Some(cat) = world.cat_mut(cat) {
        cat.set_state(CatState::Walking(Walking::default()));
        cat.collider_enabled = true;
    }
}
