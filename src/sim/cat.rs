//! Cat behavior state machine
//!
//! A cat is in exactly one state at a time. Transitions go through
//! [`Cat::set_state`], which re-derives the visual representation, so sprite
//! and state can never drift apart. Walking is the only state with behavior;
//! the rest are representation-only until an external controller (dragging,
//! rescue) takes over.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::GroundProbe;
use super::fight::FightId;
use super::state::{VolumeId, VolumeOwner};
use crate::Tuning;
use crate::consts::{CAT_FALL_STEP, WAYPOINT_REACHED_DIST};

/// Stable cat identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CatId(pub u32);

/// Sprite selection, a pure function of state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatSprite {
    Walking,
    Hanging,
    /// Shared by BeingDragged and Fighting
    Dragged,
}

/// What the host renderer shows for a cat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatVisual {
    pub sprite: CatSprite,
    pub visible: bool,
}

/// Transient walk target in deck space, so it rides along with the raft
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub pos: Vec3,
}

/// Per-state data for a walking cat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Walking {
    /// Destroyed when reached or when the state leaves Walking
    pub waypoint: Option<Waypoint>,
    /// Another cat overlapping our volume; consumed by `attack`
    pub attack_target: Option<CatId>,
    /// A fight volume we overlap; consumed by `join_fight`
    pub nearby_fight: Option<FightId>,
}

/// Behavior mode. Exactly one at a time; every dispatch matches exhaustively
/// so an unhandled variant is a compile error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CatState {
    Walking(Walking),
    /// Caught on a raft edge, waiting to be dragged back
    Hanging,
    /// Carried by an external dragging controller
    BeingDragged,
    Fighting { fight: FightId },
}

/// Debug overlay markers, the walking state's introspection surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugMarker {
    WaypointLine { from: Vec3, to: Vec3 },
    AttackTarget { at: Vec3 },
    NearbyFight { at: Vec3 },
}

/// A cat actor on the raft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cat {
    pub id: CatId,
    /// Trigger volume bound to this cat in the registry
    pub volume: VolumeId,
    pub pos: Vec3,
    /// Planar speed cap, units per tick
    pub max_speed: f32,
    /// Deck slopes up to this angle (degrees) make the cat slide
    pub slope_limit_deg: f32,
    /// Slide damping, 0 = frictionless, 1 = no slide
    pub slide_friction: f32,
    /// Cleared while Fighting
    pub collider_enabled: bool,
    pub visual: CatVisual,
    state: CatState,
}

impl Cat {
    pub fn new(id: CatId, volume: VolumeId, pos: Vec3, tuning: &Tuning) -> Self {
        let state = CatState::Walking(Walking::default());
        Self {
            id,
            volume,
            pos,
            max_speed: tuning.cat_max_speed,
            slope_limit_deg: tuning.cat_slope_limit_deg,
            slide_friction: tuning.cat_slide_friction,
            collider_enabled: true,
            visual: visual_for(&state),
            state,
        }
    }

    pub fn state(&self) -> &CatState {
        &self.state
    }

    /// Transition to a new state and re-derive the visual representation
    pub fn set_state(&mut self, state: CatState) {
        self.state = state;
        self.visual = visual_for(&self.state);
    }

    /// Mutable access to the walking payload, if walking.
    ///
    /// Payload edits never change the variant, so the visual stays valid.
    pub fn walking_mut(&mut self) -> Option<&mut Walking> {
        match &mut self.state {
            CatState::Walking(walking) => Some(walking),
            CatState::Hanging | CatState::BeingDragged | CatState::Fighting { .. } => None,
        }
    }

    /// Lazily create the waypoint, then move it to `pos`
    pub fn set_waypoint(&mut self, pos: Vec3) {
        if let CatState::Walking(walking) = &mut self.state {
            let waypoint = walking.waypoint.get_or_insert(Waypoint { pos });
            waypoint.pos = pos;
        }
    }

    /// One movement tick toward the waypoint.
    ///
    /// The planar step is clamped to `max_speed`. The ground directly below is
    /// sampled through `probe`; on a walkable slope (angle to up within
    /// `slope_limit_deg`) the step gains slide drift, and the cat snaps to the
    /// deck height. With no ground support the cat drops a constant step.
    pub fn step(&mut self, probe: &dyn GroundProbe) {
        let CatState::Walking(walking) = &mut self.state else {
            return;
        };
        let Some(waypoint) = walking.waypoint else {
            return;
        };

        let to_target = waypoint.pos - self.pos;
        let clamped = Vec2::new(to_target.x, to_target.z).clamp_length_max(self.max_speed);
        let mut step = Vec3::new(clamped.x, 0.0, clamped.y);

        match probe.probe(self.pos) {
            Some(hit) => {
                let slope_deg = hit.normal.angle_between(Vec3::Y).to_degrees();
                if slope_deg <= self.slope_limit_deg {
                    step.x += (1.0 - hit.normal.y) * hit.normal.x * (1.0 - self.slide_friction);
                    step.z += (1.0 - hit.normal.y) * hit.normal.z * (1.0 - self.slide_friction);
                }
                self.pos += step;
                self.pos.y = hit.height;
            }
            None => {
                self.pos += step;
                self.pos.y -= CAT_FALL_STEP;
            }
        }

        if self.pos.distance(waypoint.pos) < WAYPOINT_REACHED_DIST {
            walking.waypoint = None;
        }
    }

    /// Trigger-volume overlap began. Only the walking state reacts.
    pub fn on_volume_enter(&mut self, owner: VolumeOwner) {
        let CatState::Walking(_) = &self.state else {
            return;
        };
        match owner {
            VolumeOwner::Edge => self.set_state(CatState::Hanging),
            VolumeOwner::Cat(other) => {
                if let CatState::Walking(walking) = &mut self.state {
                    walking.attack_target = Some(other);
                }
            }
            VolumeOwner::Fight(fight) => {
                if let CatState::Walking(walking) = &mut self.state {
                    walking.nearby_fight = Some(fight);
                }
            }
        }
    }

    /// Trigger-volume overlap ended; clears the matching association
    pub fn on_volume_exit(&mut self, owner: VolumeOwner) {
        if let CatState::Walking(walking) = &mut self.state {
            match owner {
                VolumeOwner::Edge => {}
                VolumeOwner::Cat(_) => walking.attack_target = None,
                VolumeOwner::Fight(_) => walking.nearby_fight = None,
            }
        }
    }

    /// Markers for a host debug overlay
    pub fn debug_markers(&self) -> Vec<DebugMarker> {
        let mut markers = Vec::new();
        if let CatState::Walking(walking) = &self.state {
            if let Some(waypoint) = walking.waypoint {
                markers.push(DebugMarker::WaypointLine {
                    from: self.pos,
                    to: waypoint.pos,
                });
            }
            if walking.attack_target.is_some() {
                markers.push(DebugMarker::AttackTarget {
                    at: self.pos + Vec3::Y,
                });
            }
            if walking.nearby_fight.is_some() {
                markers.push(DebugMarker::NearbyFight {
                    at: self.pos + Vec3::Y * 1.5,
                });
            }
        }
        markers
    }
}

/// Visual representation as a pure function of state
pub fn visual_for(state: &CatState) -> CatVisual {
    let sprite = match state {
        CatState::Walking(_) => CatSprite::Walking,
        CatState::Hanging => CatSprite::Hanging,
        CatState::BeingDragged => CatSprite::Dragged,
        CatState::Fighting { .. } => CatSprite::Dragged,
    };
    CatVisual {
        sprite,
        visible: !matches!(state, CatState::Fighting { .. }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planar;
    use crate::sim::collision::{FlatDeck, GroundHit};
    use proptest::prelude::*;

    /// Deck tilted to a fixed normal, for slide-drift tests
    struct TiltedDeck {
        normal: Vec3,
    }

    impl GroundProbe for TiltedDeck {
        fn probe(&self, _origin: Vec3) -> Option<GroundHit> {
            Some(GroundHit {
                height: 0.0,
                normal: self.normal,
            })
        }
    }

    fn test_cat(pos: Vec3) -> Cat {
        Cat::new(CatId(1), VolumeId(2), pos, &Tuning::default())
    }

    fn tilted_normal(angle_deg: f32) -> Vec3 {
        let rad = angle_deg.to_radians();
        Vec3::new(rad.sin(), rad.cos(), 0.0)
    }

    #[test]
    fn test_step_planar_clamp() {
        let deck = FlatDeck { height: 0.0 };
        let mut cat = test_cat(Vec3::ZERO);
        cat.set_waypoint(Vec3::new(10.0, 0.0, 5.0));

        let before = cat.pos;
        cat.step(&deck);

        let moved = planar(cat.pos - before).length();
        assert!(moved <= cat.max_speed + 1e-6, "moved {moved}");
        assert!(moved > 0.0);
    }

    #[test]
    fn test_waypoint_cleared_exactly_on_arrival() {
        let deck = FlatDeck { height: 0.0 };
        let mut cat = test_cat(Vec3::ZERO);
        // Past the threshold: survives the tick
        cat.set_waypoint(Vec3::new(0.3, 0.0, 0.0));
        cat.step(&deck);
        assert!(cat.walking_mut().unwrap().waypoint.is_some());

        // One step brings it within 0.2: destroyed
        let mut cat = test_cat(Vec3::ZERO);
        cat.set_waypoint(Vec3::new(0.205, 0.0, 0.0));
        cat.step(&deck);
        assert!(cat.walking_mut().unwrap().waypoint.is_none());
    }

    #[test]
    fn test_waypoint_dropped_with_walking_payload() {
        let mut cat = test_cat(Vec3::ZERO);
        cat.set_waypoint(Vec3::new(1.0, 0.0, 1.0));

        cat.set_state(CatState::Hanging);
        assert!(cat.walking_mut().is_none());

        // A fresh walking state starts without a waypoint
        cat.set_state(CatState::Walking(Walking::default()));
        assert_eq!(cat.walking_mut().unwrap().waypoint, None);
    }

    #[test]
    fn test_set_waypoint_lazily_creates_then_updates() {
        let mut cat = test_cat(Vec3::ZERO);
        assert_eq!(cat.walking_mut().unwrap().waypoint, None);

        cat.set_waypoint(Vec3::new(1.0, 0.0, 0.0));
        cat.set_waypoint(Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(
            cat.walking_mut().unwrap().waypoint,
            Some(Waypoint {
                pos: Vec3::new(2.0, 0.0, 0.0)
            })
        );
    }

    #[test]
    fn test_slide_drift_on_walkable_slope_only() {
        // Waypoint straight down +Z; any X displacement comes from drift
        let target = Vec3::new(0.0, 0.0, 5.0);

        // 2 degrees, within the 3 degree limit: drifts
        let mut cat = test_cat(Vec3::ZERO);
        cat.set_waypoint(target);
        cat.step(&TiltedDeck {
            normal: tilted_normal(2.0),
        });
        assert!(cat.pos.x > 0.0, "expected drift, got {}", cat.pos.x);

        // 10 degrees, past the limit: no drift
        let mut cat = test_cat(Vec3::ZERO);
        cat.set_waypoint(target);
        cat.step(&TiltedDeck {
            normal: tilted_normal(10.0),
        });
        assert_eq!(cat.pos.x, 0.0);
    }

    #[test]
    fn test_unsupported_cat_falls() {
        struct NoDeck;
        impl GroundProbe for NoDeck {
            fn probe(&self, _origin: Vec3) -> Option<GroundHit> {
                None
            }
        }

        let mut cat = test_cat(Vec3::new(0.0, 3.0, 0.0));
        cat.set_waypoint(Vec3::new(1.0, 3.0, 0.0));
        cat.step(&NoDeck);
        assert_eq!(cat.pos.y, 3.0 - CAT_FALL_STEP);
    }

    #[test]
    fn test_visuals_follow_state() {
        let mut cat = test_cat(Vec3::ZERO);
        assert_eq!(cat.visual.sprite, CatSprite::Walking);
        assert!(cat.visual.visible);

        cat.set_state(CatState::Hanging);
        assert_eq!(cat.visual.sprite, CatSprite::Hanging);
        assert!(cat.visual.visible);

        cat.set_state(CatState::BeingDragged);
        assert_eq!(cat.visual.sprite, CatSprite::Dragged);
        assert!(cat.visual.visible);

        cat.set_state(CatState::Fighting { fight: FightId(9) });
        assert_eq!(cat.visual.sprite, CatSprite::Dragged);
        assert!(!cat.visual.visible);
    }

    #[test]
    fn test_edge_overlap_only_affects_walking() {
        let mut cat = test_cat(Vec3::ZERO);
        cat.set_state(CatState::BeingDragged);
        cat.on_volume_enter(VolumeOwner::Edge);
        assert_eq!(*cat.state(), CatState::BeingDragged);
    }

    #[test]
    fn test_overlap_associations_set_and_cleared() {
        let mut cat = test_cat(Vec3::ZERO);

        cat.on_volume_enter(VolumeOwner::Cat(CatId(5)));
        cat.on_volume_enter(VolumeOwner::Fight(FightId(6)));
        {
            let walking = cat.walking_mut().unwrap();
            assert_eq!(walking.attack_target, Some(CatId(5)));
            assert_eq!(walking.nearby_fight, Some(FightId(6)));
        }
        assert_eq!(cat.debug_markers().len(), 2);

        cat.on_volume_exit(VolumeOwner::Cat(CatId(5)));
        cat.on_volume_exit(VolumeOwner::Fight(FightId(6)));
        let walking = cat.walking_mut().unwrap();
        assert_eq!(walking.attack_target, None);
        assert_eq!(walking.nearby_fight, None);
    }

    proptest! {
        #[test]
        fn planar_step_never_exceeds_max_speed(
            wx in -50.0f32..50.0,
            wz in -50.0f32..50.0,
            max_speed in 0.001f32..0.5,
        ) {
            let deck = FlatDeck { height: 0.0 };
            let mut cat = test_cat(Vec3::ZERO);
            cat.max_speed = max_speed;
            cat.set_waypoint(Vec3::new(wx, 0.0, wz));

            cat.step(&deck);

            // Flat deck: no drift augmentation, the clamp is all there is
            prop_assert!(planar(cat.pos).length() <= max_speed + 1e-5);
        }
    }
}
