//! Raft Rescue entry point
//!
//! Headless scripted run: scatter some drift, steer the raft through it, feed
//! a few synthetic contacts in, and log what the simulation reports. A real
//! host would replace the script with its physics and input layers.

use glam::Vec3;

use raft_rescue::Tuning;
use raft_rescue::consts::SIM_DT;
use raft_rescue::sim::{
    ContactPath, ContactReport, FlatDeck, SimEvent, SteerIntent, TickInput, WorldState,
    generate_drift, tick,
};

fn main() {
    env_logger::init();

    let tuning = Tuning::default();
    let mut world = WorldState::new(0xCA75, &tuning);
    let deck = FlatDeck { height: 0.0 };

    generate_drift(&mut world, 6, &tuning);
    let deck_cat = world.spawn_cat(Vec3::ZERO, &tuning);
    world
        .cat_mut(deck_cat)
        .unwrap()
        .set_waypoint(Vec3::new(1.5, 0.0, -0.5));
    world.raft.set_control(true);

    let first_obstacle = world.obstacles.first().map(|o| o.id);
    let first_drowning = world.drowning.first().map(|d| d.id);

    for tick_no in 0u64..600 {
        let mut input = TickInput {
            steer: if tick_no < 300 {
                SteerIntent::Right
            } else {
                SteerIntent::Left
            },
            ..Default::default()
        };

        // Scripted stand-ins for the host physics' collision reports
        if tick_no == 120 {
            input.contacts.push(ContactReport {
                body: None,
                impulse: 12.0,
                point: Vec3::new(0.0, 0.0, 1.0),
                path: ContactPath::Rigid,
            });
        }
        if tick_no == 240 {
            if let Some(body) = first_obstacle {
                input.contacts.push(ContactReport {
                    body: Some(body),
                    impulse: 8.0,
                    point: Vec3::new(0.4, 0.0, 0.9),
                    path: ContactPath::Rigid,
                });
            }
        }
        if tick_no == 360 {
            if let Some(body) = first_drowning {
                input.contacts.push(ContactReport {
                    body: Some(body),
                    impulse: 3.0,
                    point: Vec3::new(-0.2, 0.0, 1.1),
                    path: ContactPath::Simplified,
                });
            }
        }

        tick(&mut world, &input, &deck, SIM_DT);

        for event in world.drain_events() {
            match event {
                SimEvent::DrowningCatContact { cat, point } => {
                    log::info!("tick {tick_no}: rescue hook for {cat:?} at {point}");
                    world.pick_kitty(cat);
                }
                SimEvent::ObstacleShoved { body, impulse } => {
                    log::info!("tick {tick_no}: shoved {body:?} with {impulse}");
                }
                SimEvent::RaftWrecked => {
                    log::error!("tick {tick_no}: the raft went down");
                }
            }
        }
    }

    log::info!(
        "run complete: health {:.1}, steer {:.3}, {} cats aboard",
        world.raft.health,
        world.raft.steer,
        world.cats.len()
    );
}
