//! Headless demo driver.
//!
//! Builds a seeded demo world, runs a few hundred ticks with wandering
//! mobs and a slowly turning observer, and records one perception row
//! per agent per tick to `perception_log.csv`.

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use percept::gridworld::{self, GridWorld};
use percept::recorder::Recorder;
use percept::sampling::params::Params;
use percept::sampling::world::WorldView;

const TICKS: u64 = 200;
const SEED: u64 = 7;

fn main() {
    env_logger::init();

    let params = Params::default();
    let mut world = gridworld::demo_world(SEED);
    let mut recorder = Recorder::new(params, "perception_log.csv");
    let mut rng = StdRng::seed_from_u64(SEED ^ 0x5eed);

    log::info!("starting perception sampling for {} ticks", TICKS);

    for _ in 0..TICKS {
        turn_observer(&mut world);
        gridworld::wander(&mut world, &mut rng);
        world.advance(1);

        let snapshots = recorder.on_tick(&world);
        if world.tick() % 50 == 0 {
            log::info!("tick {}: {} snapshot(s)", world.tick(), snapshots.len());
        }
    }

    recorder.on_shutdown();
    log::info!("done, wrote perception_log.csv");
}

/// Rotates the observer's gaze a few degrees per tick around world-up.
fn turn_observer(world: &mut GridWorld) {
    let step = 2.0_f32.to_radians();
    if let Some(agent) = world.agent_mut(1) {
        let (sin, cos) = step.sin_cos();
        let gaze = agent.gaze;
        agent.gaze = Vec3::new(
            gaze.x * cos - gaze.z * sin,
            gaze.y,
            gaze.x * sin + gaze.z * cos,
        )
        .normalize();
    }
}
