//! Raft steering and hull damage
//!
//! The raft itself floats in the host physics; this controller smooths the
//! player's steering intent, drives the stick/mast rig pose from it, and maps
//! incoming contacts onto differentiated responses. Two response pathways
//! exist, one per floating model, and they are intentionally not unified: the
//! rigid path shoves hard-hit obstacles under, the simplified path disables a
//! rescued cat's collider itself.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::Counterpart;
use super::state::{SimEvent, WorldState};
use crate::Tuning;
use crate::consts::{RIG_MAX_DEG, RIG_MIN_DEG, RIG_YAW_GAIN};
use crate::lerp;

/// Discrete steering key state for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SteerIntent {
    Left,
    #[default]
    Neutral,
    Right,
}

impl SteerIntent {
    pub fn axis(self) -> f32 {
        match self {
            SteerIntent::Left => -1.0,
            SteerIntent::Neutral => 0.0,
            SteerIntent::Right => 1.0,
        }
    }
}

/// Pose of the steering rig, degrees of deflection around the roll axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RaftRig {
    pub stick_deg: f32,
    /// Mirrors the stick, negated
    pub mast_deg: f32,
}

/// The player's raft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Raft {
    /// Hull integrity; impacts chip away at it
    pub health: f32,
    /// Smoothed steer value in [-1, 1]
    pub steer: f32,
    /// Steering smoothing rate (per second)
    pub steering_speed: f32,
    pub mass: f32,
    /// Mirror of the host body's position
    pub pos: Vec3,
    /// Mirror of the host body's yaw, feeds the rig deflection
    pub yaw: f32,
    /// Steering keys are only read while true
    pub player_control: bool,
    pub rig: RaftRig,
    /// 1D steering direction handed to the host floating model
    pub steering_direction: Vec3,
    /// Impact damage is impulse magnitude divided by this
    pub impact_damage_divisor: f32,
    /// Obstacle impacts above this impulse get shoved under
    pub shove_impulse_threshold: f32,
}

impl Raft {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            health: tuning.raft_start_health,
            steer: 0.0,
            steering_speed: tuning.raft_steering_speed,
            mass: tuning.raft_mass,
            pos: Vec3::ZERO,
            yaw: 0.0,
            player_control: false,
            rig: RaftRig::default(),
            steering_direction: Vec3::ZERO,
            impact_damage_divisor: tuning.impact_damage_divisor,
            shove_impulse_threshold: tuning.shove_impulse_threshold,
        }
    }

    /// Hand steering to or take it from the player
    pub fn set_control(&mut self, value: bool) {
        self.player_control = value;
    }

    /// One steering tick (the host's late-update slot).
    ///
    /// Smooths the steer value toward the intent, derives the rig pose from
    /// steer plus world yaw with the asymmetric clamp, and refreshes the
    /// steering direction for the floating model.
    pub fn steer_tick(&mut self, intent: SteerIntent, dt: f32) {
        let target = if self.player_control {
            intent.axis()
        } else {
            0.0
        };
        self.steer = lerp(self.steer, target, dt * self.steering_speed);

        let deflection = (self.steer + self.yaw * RIG_YAW_GAIN).clamp(RIG_MIN_DEG, RIG_MAX_DEG);
        self.rig.stick_deg = deflection;
        self.rig.mast_deg = -deflection;

        self.steering_direction = Vec3::new(self.steer, 0.0, 0.0);
    }
}

/// Contact response on the full rigid-body pathway
pub fn on_rigid_contact(
    world: &mut WorldState,
    counterpart: Counterpart,
    impulse: f32,
    point: Vec3,
) {
    match counterpart {
        Counterpart::Static => {
            apply_hull_damage(world, impulse);
            log::info!("collision with static: {impulse} impulse");
        }
        Counterpart::Obstacle(body) => {
            apply_hull_damage(world, impulse);
            log::info!("collision with obstacle: {impulse} impulse");

            if impulse > world.raft.shove_impulse_threshold {
                if let Some(mass) = world.obstacle(body).map(|o| o.mass) {
                    let shove = Vec3::NEG_Y * (world.raft.mass / mass);
                    world
                        .events
                        .push(SimEvent::ObstacleShoved { body, impulse: shove });
                }
            }
        }
        Counterpart::DrowningCat(body) => {
            if let Some(cat) = world.drowning_body(body).map(|d| d.cat) {
                log::info!("drowning cat contact: {cat:?}");
                world.events.push(SimEvent::DrowningCatContact { cat, point });
            }
        }
    }
}

/// Contact response on the simplified floating pathway.
///
/// Same damage model, but no counter-impulse on obstacles, and the drowning
/// body's collider is disabled here so it cannot report a second contact.
pub fn on_simple_contact(
    world: &mut WorldState,
    counterpart: Counterpart,
    impulse: f32,
    point: Vec3,
) {
    match counterpart {
        Counterpart::Static => {
            apply_hull_damage(world, impulse);
            log::info!("collision with static: {impulse} impulse");
        }
        Counterpart::Obstacle(_) => {
            apply_hull_damage(world, impulse);
            log::info!("collision with obstacle: {impulse} impulse");
        }
        Counterpart::DrowningCat(body) => {
            let Some(drowning) = world.drowning_body_mut(body) else {
                return;
            };
            drowning.collider_enabled = false;
            let cat = drowning.cat;
            log::info!("drowning cat contact: {cat:?}");
            world.events.push(SimEvent::DrowningCatContact { cat, point });
        }
    }
}

fn apply_hull_damage(world: &mut WorldState, impulse: f32) {
    let raft = &mut world.raft;
    let was_afloat = raft.health > 0.0;
    raft.health -= impulse / raft.impact_damage_divisor;

    if was_afloat && raft.health <= 0.0 {
        log::warn!("raft hull gave out");
        world.events.push(SimEvent::RaftWrecked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn test_world() -> WorldState {
        WorldState::new(11, &Tuning::default())
    }

    #[test]
    fn test_impact_damage_scenario() {
        let mut world = test_world();
        let obstacle = world.spawn_obstacle(Vec3::ZERO, 10.0);
        assert_eq!(world.raft.health, 100.0);

        on_rigid_contact(&mut world, Counterpart::Obstacle(obstacle), 20.0, Vec3::ZERO);
        assert_eq!(world.raft.health, 98.0);

        on_rigid_contact(&mut world, Counterpart::Static, 50.0, Vec3::ZERO);
        assert_eq!(world.raft.health, 93.0);
    }

    #[test]
    fn test_drowning_contact_emits_event_without_damage() {
        let mut world = test_world();
        let body = world.spawn_drowning_cat(Vec3::new(4.0, 0.0, 0.0), &Tuning::default());
        let cat = world.drowning_body(body).unwrap().cat;
        let point = Vec3::new(1.0, 0.0, 2.0);

        on_rigid_contact(&mut world, Counterpart::DrowningCat(body), 30.0, point);

        assert_eq!(world.raft.health, 100.0);
        assert_eq!(
            world.drain_events(),
            vec![SimEvent::DrowningCatContact { cat, point }]
        );
        // The rigid path leaves the body's collider alone
        assert!(world.drowning_body(body).unwrap().collider_enabled);
    }

    #[test]
    fn test_shove_only_above_threshold() {
        let mut world = test_world();
        let obstacle = world.spawn_obstacle(Vec3::ZERO, 10.0);

        on_rigid_contact(&mut world, Counterpart::Obstacle(obstacle), 5.0, Vec3::ZERO);
        assert_eq!(world.drain_events(), vec![]);

        on_rigid_contact(&mut world, Counterpart::Obstacle(obstacle), 5.1, Vec3::ZERO);
        // raft mass 40 / obstacle mass 10, straight down
        assert_eq!(
            world.drain_events(),
            vec![SimEvent::ObstacleShoved {
                body: obstacle,
                impulse: Vec3::new(0.0, -4.0, 0.0),
            }]
        );
    }

    #[test]
    fn test_simplified_path_never_shoves() {
        let mut world = test_world();
        let obstacle = world.spawn_obstacle(Vec3::ZERO, 10.0);

        on_simple_contact(&mut world, Counterpart::Obstacle(obstacle), 50.0, Vec3::ZERO);

        assert_eq!(world.raft.health, 95.0);
        assert_eq!(world.drain_events(), vec![]);
    }

    #[test]
    fn test_simplified_path_disables_drowning_collider() {
        let mut world = test_world();
        let body = world.spawn_drowning_cat(Vec3::new(4.0, 0.0, 0.0), &Tuning::default());
        let cat = world.drowning_body(body).unwrap().cat;

        on_simple_contact(&mut world, Counterpart::DrowningCat(body), 30.0, Vec3::ZERO);

        assert!(!world.drowning_body(body).unwrap().collider_enabled);
        assert_eq!(
            world.drain_events(),
            vec![SimEvent::DrowningCatContact {
                cat,
                point: Vec3::ZERO
            }]
        );
    }

    #[test]
    fn test_wrecked_event_fires_once() {
        let mut world = test_world();

        on_rigid_contact(&mut world, Counterpart::Static, 1500.0, Vec3::ZERO);
        on_rigid_contact(&mut world, Counterpart::Static, 100.0, Vec3::ZERO);

        let wrecks = world
            .drain_events()
            .into_iter()
            .filter(|e| *e == SimEvent::RaftWrecked)
            .count();
        assert_eq!(wrecks, 1);
    }

    #[test]
    fn test_steer_smoothing_toward_intent() {
        let mut raft = Raft::new(&Tuning::default());
        raft.set_control(true);

        let mut previous = raft.steer;
        for _ in 0..60 {
            raft.steer_tick(SteerIntent::Right, SIM_DT);
            assert!(raft.steer > previous);
            assert!(raft.steer < 1.0);
            previous = raft.steer;
        }
        assert_eq!(raft.steering_direction, Vec3::new(raft.steer, 0.0, 0.0));

        // Without player control the intent is ignored and steer decays
        raft.set_control(false);
        let peak = raft.steer;
        for _ in 0..60 {
            raft.steer_tick(SteerIntent::Right, SIM_DT);
        }
        assert!(raft.steer < peak);
    }

    #[test]
    fn test_intent_ignored_without_control() {
        let mut raft = Raft::new(&Tuning::default());
        raft.steer_tick(SteerIntent::Right, SIM_DT);
        assert_eq!(raft.steer, 0.0);
    }

    #[test]
    fn test_rig_clamp_is_asymmetric() {
        let mut raft = Raft::new(&Tuning::default());

        raft.yaw = 1.0;
        raft.steer_tick(SteerIntent::Neutral, SIM_DT);
        assert_eq!(raft.rig.stick_deg, RIG_MAX_DEG);
        assert_eq!(raft.rig.mast_deg, -RIG_MAX_DEG);

        raft.yaw = -1.0;
        raft.steer_tick(SteerIntent::Neutral, SIM_DT);
        assert_eq!(raft.rig.stick_deg, RIG_MIN_DEG);
        assert_eq!(raft.rig.mast_deg, -RIG_MIN_DEG);
    }
}
