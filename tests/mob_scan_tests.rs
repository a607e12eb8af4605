#![allow(missing_docs)]

use std::collections::HashMap;

use glam::{IVec3, Vec3};
use percept::gridworld::{Block, GridWorld, WorldEntity};
use percept::sampling::agent::{AgentState, Inventory};
use percept::sampling::mobs::{self, MobScan, SmoothingState};
use percept::sampling::params::Params;
use percept::sampling::sampler::Sampler;
use percept::sampling::summary;

fn create_test_params() -> Params {
    Params {
        max_view_distance: 64.0,
        scan_surfaces: false,
        ..Params::default()
    }
}

fn create_test_agent() -> AgentState {
    AgentState {
        id: 1,
        name: "observer".to_string(),
        pos: Vec3::new(0.0, 64.0, 0.0),
        gaze: Vec3::new(1.0, 0.0, 0.0),
        health: 20.0,
        food: 18,
        oxygen: None,
        inventory: Inventory::empty(),
    }
}

fn mob(id: u64, kind: &str, pos: Vec3) -> WorldEntity {
    WorldEntity {
        id,
        kind: kind.to_string(),
        pos,
        half_extents: Vec3::new(0.3, 0.9, 0.3),
    }
}

fn scan_of(detected: bool, kind: Option<&str>) -> MobScan {
    let mut counts = HashMap::new();
    if let Some(kind) = kind {
        counts.insert(kind.to_string(), 1);
    }
    MobScan {
        detected,
        closest: kind.map(str::to_string),
        counts,
    }
}

#[test]
fn test_smoothing_one_tick_hysteresis() {
    let mut state = SmoothingState::default();

    let raw = [true, false, false];
    let smoothed: Vec<bool> = raw
        .iter()
        .map(|&detected| {
            state
                .apply(&scan_of(detected, detected.then_some("zombie")))
                .visible
        })
        .collect();

    assert_eq!(smoothed, vec![true, true, false]);
}

#[test]
fn test_smoothing_backfills_cached_summaries() {
    let mut state = SmoothingState::default();

    let first = state.apply(&scan_of(true, Some("zombie")));
    assert_eq!(first.closest, "zombie");
    assert_eq!(first.summary, "zombie : 1");

    // Nothing detected this tick, but the smoothed flag still holds:
    // the summary fields carry over instead of reading empty.
    let second = state.apply(&scan_of(false, None));
    assert!(second.visible);
    assert_eq!(second.closest, "zombie");
    assert_eq!(second.summary, "zombie : 1");

    let third = state.apply(&scan_of(false, None));
    assert!(!third.visible);
    assert_eq!(third.closest, "none");
    assert_eq!(third.summary, "none");
}

#[test]
fn test_summary_ordering_is_deterministic() {
    let mut forward = HashMap::new();
    forward.insert("zombie".to_string(), 2);
    forward.insert("skeleton".to_string(), 1);
    forward.insert("cow".to_string(), 2);

    let mut reversed = HashMap::new();
    reversed.insert("skeleton".to_string(), 1);
    reversed.insert("cow".to_string(), 2);
    reversed.insert("zombie".to_string(), 2);

    // Descending count, ascending name tie-break, insertion order ignored.
    assert_eq!(summary::format_counts(&forward), "cow : 2; zombie : 2; skeleton : 1");
    assert_eq!(summary::format_counts(&forward), summary::format_counts(&reversed));
}

#[test]
fn test_empty_summary_reads_none() {
    assert_eq!(summary::format_counts(&HashMap::new()), "none");
}

#[test]
fn test_scan_counts_and_closest() {
    let params = create_test_params();
    let agent = create_test_agent();
    let eye = agent.eye(&params);

    let mut world = GridWorld::new();
    world.add_entity(mob(100, "skeleton", eye + Vec3::new(3.0, 0.0, 0.0)));
    world.add_entity(mob(101, "zombie", eye + Vec3::new(5.0, 0.0, 0.0)));
    world.add_entity(mob(102, "zombie", eye + Vec3::new(8.0, 0.0, 0.0)));
    world.rebuild_index();

    let ray_end = eye + agent.gaze * params.max_view_distance;
    let scan = mobs::scan(&world, &agent, params.max_view_distance, ray_end, &params)
        .expect("scan should succeed");

    assert!(scan.detected);
    assert_eq!(scan.closest.as_deref(), Some("skeleton"));
    assert_eq!(scan.counts.get("zombie"), Some(&2));
    assert_eq!(scan.counts.get("skeleton"), Some(&1));
    assert_eq!(summary::format_counts(&scan.counts), "zombie : 2; skeleton : 1");
}

#[test]
fn test_scan_skips_targets_past_visible_distance() {
    let params = create_test_params();
    let agent = create_test_agent();
    let eye = agent.eye(&params);

    // A wall ten blocks ahead limits the visible distance; the zombie
    // stands behind it.
    let mut world = GridWorld::new();
    world.fill(
        IVec3::new(10, 60, -5),
        IVec3::new(10, 70, 5),
        &Block::solid("stone"),
    );
    world.add_entity(mob(100, "zombie", eye + Vec3::new(20.0, 0.0, 0.0)));
    world.rebuild_index();

    let visible_distance = 10.0;
    let ray_end = eye + agent.gaze * visible_distance;
    let scan =
        mobs::scan(&world, &agent, visible_distance, ray_end, &params).expect("scan should succeed");

    assert!(!scan.detected);
    assert!(scan.counts.is_empty());
    assert_eq!(scan.closest, None);
}

#[test]
fn test_scan_excludes_observer() {
    let params = create_test_params();
    let agent = create_test_agent();
    let eye = agent.eye(&params);

    let mut world = GridWorld::new();
    // An entity sharing the observer's id must never be reported.
    world.add_entity(mob(1, "player", eye + Vec3::new(2.0, 0.0, 0.0)));
    world.rebuild_index();

    let ray_end = eye + agent.gaze * params.max_view_distance;
    let scan = mobs::scan(&world, &agent, params.max_view_distance, ray_end, &params)
        .expect("scan should succeed");

    assert!(!scan.detected);
}

#[test]
fn test_sampler_evicts_departed_agents() {
    let params = create_test_params();
    let mut world = GridWorld::new();
    world.add_agent(create_test_agent());

    let mut sampler = Sampler::new(params);
    let snapshots = sampler.sample_tick(&world);
    assert_eq!(snapshots.len(), 1);
    assert_eq!(sampler.tracked_agents(), 1);

    world.remove_agent(1);
    let snapshots = sampler.sample_tick(&world);
    assert!(snapshots.is_empty());
    assert_eq!(sampler.tracked_agents(), 0);
}
