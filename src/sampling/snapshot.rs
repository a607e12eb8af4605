//! Perception snapshot record and builder.
//!
//! One snapshot is built per agent per tick by composing the sky probe,
//! the night window, the direct-gaze pick, the entity scan and the
//! optional surface sweep. A snapshot is immutable once built; it is
//! serialized once and discarded. If any world query fails the snapshot
//! for that agent is skipped entirely rather than emitted half-filled.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use super::agent::{AgentState, Inventory};
use super::mobs::{self, SmoothingState};
use super::params::Params;
use super::ray::{self, OcclusionMode, RayHit};
use super::surfaces;
use super::world::{WorldError, WorldView};

/// One immutable perception record for one agent at one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerceptionSnapshot {
    /// Row identifier: `<agent-name>_<tick>_<timestamp>`.
    pub id: String,
    /// Agent feet position.
    pub pos: Vec3,
    /// Agent gaze direction.
    pub gaze: Vec3,
    /// Agent health.
    pub health: f32,
    /// Agent food level.
    pub food: i32,
    /// Agent oxygen level, if tracked.
    pub oxygen: Option<i32>,
    /// Biome label at the agent position.
    pub biome: String,
    /// Whether the agent can observe the outside.
    pub outdoors: bool,
    /// Night flag; `None` when the agent is not outdoors or the world
    /// has no day cycle.
    pub night: Option<bool>,
    /// Whether the direct gaze strikes a surface within range.
    pub surface_highlighted: bool,
    /// Material of the highlighted surface.
    pub highlighted_material: Option<String>,
    /// Formatted unique-cell summary of the surface sweep, when enabled.
    pub surface_summary: Option<String>,
    /// Smoothed entity-visibility flag.
    pub mob_visible: bool,
    /// Kind of the closest visible entity, `none` when nothing is.
    pub closest_mob: String,
    /// Formatted per-kind visible-entity summary.
    pub mob_summary: String,
    /// Inventory contents, when inventory logging is enabled.
    pub inventory: Option<Inventory>,
}

/// Returns the grid cell containing a position.
fn cell_of(position: Vec3) -> IVec3 {
    position.floor().as_ivec3()
}

/// Probes whether the agent can observe the outside.
///
/// Casts the gaze ray plus four near-parallel rays offset along the world
/// axes. The agent counts as outdoors when any ray escapes all geometry
/// or strikes a cell that still receives sky light.
fn probe_outdoors(
    world: &dyn WorldView,
    eye: Vec3,
    gaze: Vec3,
    agent_id: u64,
    params: &Params,
) -> Result<bool, WorldError> {
    let s = params.sky_probe_spread;
    let probes = [
        gaze,
        gaze + Vec3::new(s, 0.0, 0.0),
        gaze + Vec3::new(-s, 0.0, 0.0),
        gaze + Vec3::new(0.0, s, 0.0),
        gaze + Vec3::new(0.0, -s, 0.0),
    ];

    for dir in probes {
        let hit = ray::cast(
            world,
            eye,
            dir,
            params.max_view_distance,
            OcclusionMode::Collider,
            Some(agent_id),
        )?;
        match hit {
            RayHit::Miss => return Ok(true),
            RayHit::Hit { position, .. } => {
                if world.sky_light(cell_of(position)) > 0 {
                    return Ok(true);
                }
            }
        }
    }

    Ok(false)
}

/// Derives the night flag from the world clock.
///
/// Only meaningful outdoors in a world with a day cycle; `None` otherwise.
fn night_flag(world: &dyn WorldView, outdoors: bool, params: &Params) -> Option<bool> {
    if !outdoors || !world.has_day_cycle() {
        return None;
    }
    let day_time = world.time_of_day() % params.day_length;
    Some(day_time >= params.night_start && day_time <= params.night_end)
}

/// Builds the snapshot for one agent.
///
/// # Arguments
///
/// * `world` - World oracle
/// * `agent` - Observed agent
/// * `smoothing` - The agent's smoothing state, mutated once
/// * `timestamp` - Shared timestamp of the tick batch
///
/// # Returns
///
/// The finished snapshot, or the first query error (the caller skips
/// this agent for the tick).
pub fn build(
    world: &dyn WorldView,
    agent: &AgentState,
    smoothing: &mut SmoothingState,
    timestamp: &str,
    params: &Params,
) -> Result<PerceptionSnapshot, WorldError> {
    let eye = agent.eye(params);
    let gaze = agent.gaze;

    let outdoors = probe_outdoors(world, eye, gaze, agent.id, params)?;
    let night = night_flag(world, outdoors, params);
    let biome = world.biome(agent.pos)?;

    // Direct-gaze pick: the struck surface bounds how far the agent can
    // currently see.
    let pick = ray::cast(
        world,
        eye,
        gaze,
        params.max_view_distance,
        OcclusionMode::Collider,
        Some(agent.id),
    )?;
    let (surface_highlighted, highlighted_material, visible_distance) = match pick {
        RayHit::Hit {
            distance, material, ..
        } => (true, material, distance),
        RayHit::Miss => (false, None, params.max_view_distance),
    };

    let ray_end = eye + gaze * visible_distance;
    let scan = mobs::scan(world, agent, visible_distance, ray_end, params)?;
    let report = smoothing.apply(&scan);

    let surface_summary = if params.scan_surfaces {
        let cells = surfaces::sample_visible_surfaces(world, eye, gaze, Some(agent.id), params)?;
        Some(surfaces::format_scan(&cells))
    } else {
        None
    };

    Ok(PerceptionSnapshot {
        id: format!("{}_{}_{}", agent.name, world.tick(), timestamp),
        pos: agent.pos,
        gaze,
        health: agent.health,
        food: agent.food,
        oxygen: agent.oxygen,
        biome,
        outdoors,
        night,
        surface_highlighted,
        highlighted_material,
        surface_summary,
        mob_visible: report.visible,
        closest_mob: report.closest,
        mob_summary: report.summary,
        inventory: params.log_inventory.then(|| agent.inventory.clone()),
    })
}
