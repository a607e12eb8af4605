#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use glam::{IVec3, Vec3};
use percept::gridworld::{self, Block, GridWorld, WorldEntity};
use percept::recorder::Recorder;
use percept::sampling::agent::{AgentState, Inventory};
use percept::sampling::mobs::SmoothingState;
use percept::sampling::params::Params;
use percept::sampling::snapshot;

fn create_test_params() -> Params {
    Params {
        max_view_distance: 64.0,
        scan_surfaces: false,
        ..Params::default()
    }
}

fn create_test_agent(pos: Vec3, gaze: Vec3) -> AgentState {
    AgentState {
        id: 1,
        name: "observer".to_string(),
        pos,
        gaze,
        health: 20.0,
        food: 18,
        oxygen: Some(300),
        inventory: Inventory::empty(),
    }
}

/// A sealed room around the origin: floor at y=63, walls, double roof so
/// no interior cell receives sky light.
fn sealed_room() -> GridWorld {
    let mut world = GridWorld::new();
    world.fill(
        IVec3::new(-6, 63, -6),
        IVec3::new(6, 70, 6),
        &Block::solid("stone"),
    );
    for x in -5..=5 {
        for y in 64..=68 {
            for z in -5..=5 {
                world.clear_block(IVec3::new(x, y, z));
            }
        }
    }
    world
}

#[test]
fn test_indoor_agent_is_not_outdoors() {
    let params = create_test_params();
    let world = sealed_room();
    let agent = create_test_agent(Vec3::new(0.5, 64.0, 0.5), Vec3::new(1.0, 0.0, 0.0));
    let mut smoothing = SmoothingState::default();

    let snap = snapshot::build(&world, &agent, &mut smoothing, "t0", &params)
        .expect("snapshot should build");

    assert_eq!(snap.health, 20.0);
    assert_eq!(snap.food, 18);
    assert!(!snap.outdoors);
    assert_eq!(snap.night, None);
}

#[test]
fn test_outdoor_agent_night_window() {
    let params = create_test_params();
    let mut world = GridWorld::new();
    world.fill(
        IVec3::new(-20, 60, -20),
        IVec3::new(20, 60, 20),
        &Block::solid("grass_block"),
    );

    world.set_biome("desert");
    let agent = create_test_agent(Vec3::new(0.5, 61.0, 0.5), Vec3::new(0.0, 1.0, 0.0));
    let mut smoothing = SmoothingState::default();

    world.set_day_time(14_000);
    let snap = snapshot::build(&world, &agent, &mut smoothing, "t0", &params)
        .expect("snapshot should build");
    assert!(snap.outdoors);
    assert_eq!(snap.biome, "desert");
    assert_eq!(snap.night, Some(true));

    world.set_day_time(6_000);
    let snap = snapshot::build(&world, &agent, &mut smoothing, "t1", &params)
        .expect("snapshot should build");
    assert_eq!(snap.night, Some(false));

    world.set_day_cycle(false);
    let snap = snapshot::build(&world, &agent, &mut smoothing, "t2", &params)
        .expect("snapshot should build");
    assert_eq!(snap.night, None);
}

#[test]
fn test_gaze_miss_reports_no_highlight() {
    let params = create_test_params();
    let world = GridWorld::new();
    let agent = create_test_agent(Vec3::new(0.5, 64.0, 0.5), Vec3::new(1.0, 0.0, 0.0));
    let mut smoothing = SmoothingState::default();

    let snap = snapshot::build(&world, &agent, &mut smoothing, "t0", &params)
        .expect("snapshot should build");

    assert!(!snap.surface_highlighted);
    assert_eq!(snap.highlighted_material, None);
}

#[test]
fn test_gaze_miss_keeps_full_view_range() {
    let params = create_test_params();
    let mut world = GridWorld::new();

    // With nothing struck, the sight segment runs out to the configured
    // maximum, so a mob at 50 is still classified.
    let agent = create_test_agent(Vec3::new(0.5, 64.0, 0.5), Vec3::new(1.0, 0.0, 0.0));
    let eye = agent.eye(&params);
    world.add_entity(WorldEntity {
        id: 100,
        kind: "zombie".to_string(),
        pos: eye + Vec3::new(50.0, 0.0, 0.0),
        half_extents: Vec3::new(0.3, 0.9, 0.3),
    });
    world.rebuild_index();

    let mut smoothing = SmoothingState::default();
    let snap = snapshot::build(&world, &agent, &mut smoothing, "t0", &params)
        .expect("snapshot should build");

    assert!(snap.mob_visible);
    assert_eq!(snap.closest_mob, "zombie");
    assert_eq!(snap.mob_summary, "zombie : 1");
}

#[test]
fn test_gaze_hit_reports_material_and_bounds_view() {
    let params = create_test_params();
    let mut world = sealed_room();
    let agent = create_test_agent(Vec3::new(0.5, 64.0, 0.5), Vec3::new(1.0, 0.0, 0.0));
    let eye = agent.eye(&params);

    // A zombie on the far side of the east wall must stay invisible.
    world.add_entity(WorldEntity {
        id: 100,
        kind: "zombie".to_string(),
        pos: eye + Vec3::new(12.0, 0.0, 0.0),
        half_extents: Vec3::new(0.3, 0.9, 0.3),
    });
    world.rebuild_index();

    let mut smoothing = SmoothingState::default();
    let snap = snapshot::build(&world, &agent, &mut smoothing, "t0", &params)
        .expect("snapshot should build");

    assert!(snap.surface_highlighted);
    assert_eq!(snap.highlighted_material.as_deref(), Some("stone"));
    assert!(!snap.mob_visible);
    assert_eq!(snap.closest_mob, "none");
}

#[test]
fn test_snapshot_id_scheme() {
    let params = create_test_params();
    let mut world = GridWorld::new();
    world.advance(41);

    let agent = create_test_agent(Vec3::new(0.5, 64.0, 0.5), Vec3::new(1.0, 0.0, 0.0));
    let mut smoothing = SmoothingState::default();
    let snap = snapshot::build(&world, &agent, &mut smoothing, "2026-01-01T00:00:00.000", &params)
        .expect("snapshot should build");

    assert_eq!(snap.id, "observer_41_2026-01-01T00:00:00.000");
}

#[test]
fn test_recorder_end_to_end() {
    let path = "test_recorder_end_to_end.csv";
    let _ = std::fs::remove_file(path);

    let params = Params {
        scan_grid_width: 8,
        scan_grid_height: 4,
        ..Params::default()
    };
    let mut world = gridworld::demo_world(3);
    let mut recorder = Recorder::new(params, path);

    for _ in 0..3 {
        world.advance(1);
        let snapshots = recorder.on_tick(&world);
        assert_eq!(snapshots.len(), 1);
    }
    recorder.on_shutdown();

    let contents = std::fs::read_to_string(path).expect("log file should exist");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("id,pos_x,pos_y,pos_z"));
    assert!(lines[1].starts_with("observer_1_"));

    std::fs::remove_file(path).expect("cleanup should succeed");
}
