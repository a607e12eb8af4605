//! Visible-entity aggregation and temporal smoothing.
//!
//! Each tick the aggregator scans a broad-phase volume around the agent's
//! sight line, classifies every candidate with the field-of-view test,
//! and reduces the survivors to per-kind counts plus the closest visible
//! entity. Raw per-tick detection flickers when a ray grazes an entity
//! edge, so the exposed flag carries one tick of hysteresis and the
//! summary fields are backfilled from the last detecting tick.

use std::collections::HashMap;

use glam::Vec3;

use super::agent::AgentState;
use super::fov;
use super::params::Params;
use super::summary;
use super::world::{WorldError, WorldView};

/// Raw result of one tick's entity scan.
#[derive(Debug, Clone)]
pub struct MobScan {
    /// Whether any entity was classified visible this tick.
    pub detected: bool,
    /// Kind of the closest visible entity.
    pub closest: Option<String>,
    /// Visible entities counted per kind.
    pub counts: HashMap<String, u32>,
}

/// Smoothed per-tick report derived from a scan.
#[derive(Debug, Clone)]
pub struct MobReport {
    /// Detection flag after one-tick hysteresis.
    pub visible: bool,
    /// Kind of the closest visible entity, `none` when nothing is.
    pub closest: String,
    /// Formatted per-kind count summary, `none` when empty.
    pub summary: String,
}

/// Per-agent smoothing state.
///
/// Lives in the sampler for as long as the agent stays on the roster,
/// mutated exactly once per tick.
#[derive(Debug, Clone)]
pub struct SmoothingState {
    was_detected_last_tick: bool,
    last_closest: String,
    last_summary: String,
}

impl Default for SmoothingState {
    fn default() -> Self {
        Self {
            was_detected_last_tick: false,
            last_closest: "none".to_string(),
            last_summary: "none".to_string(),
        }
    }
}

impl SmoothingState {
    /// Folds this tick's raw scan into the smoothing state.
    ///
    /// The exposed flag is `raw || last tick's raw`; the memory is
    /// updated to the raw result unconditionally, so the hysteresis is
    /// exactly one tick long. When only the carried-over flag holds,
    /// closest/summary come from the cache of the last tick that did
    /// detect something instead of reading empty.
    pub fn apply(&mut self, scan: &MobScan) -> MobReport {
        let visible = scan.detected || self.was_detected_last_tick;
        self.was_detected_last_tick = scan.detected;

        let mut closest = scan
            .closest
            .clone()
            .unwrap_or_else(|| "none".to_string());
        let mut summary = summary::format_counts(&scan.counts);

        if scan.detected {
            self.last_closest = closest.clone();
            self.last_summary = summary.clone();
        } else if visible {
            closest = self.last_closest.clone();
            summary = self.last_summary.clone();
        }

        MobReport {
            visible,
            closest,
            summary,
        }
    }
}

/// Scans for entities visible to the agent this tick.
///
/// # Arguments
///
/// * `world` - World oracle
/// * `agent` - Observing agent
/// * `visible_distance` - Distance to the first surface along the gaze
/// * `ray_end` - End of the gaze-limited sight segment
///
/// # Returns
///
/// The raw scan result, or the first query error encountered.
pub fn scan(
    world: &dyn WorldView,
    agent: &AgentState,
    visible_distance: f32,
    ray_end: Vec3,
    params: &Params,
) -> Result<MobScan, WorldError> {
    let eye = agent.eye(params);

    // Broad phase: the agent's own volume swept along the sight line,
    // padded by the peripheral radius.
    let volume = agent
        .bounds(params)
        .expand_towards(agent.gaze * visible_distance)
        .inflate(params.peripheral_radius);
    let candidates = world.entities_in(&volume, agent.id)?;

    let mut detected = false;
    let mut closest: Option<String> = None;
    let mut closest_distance = f32::MAX;
    let mut counts: HashMap<String, u32> = HashMap::new();

    for candidate in &candidates {
        let distance = (candidate.bounds.center() - eye).length();
        if distance > visible_distance {
            continue;
        }

        if fov::classify(
            eye,
            agent.gaze,
            &candidate.bounds,
            ray_end,
            visible_distance,
            params,
        )
        .is_none()
        {
            continue;
        }

        detected = true;
        *counts.entry(candidate.kind.clone()).or_insert(0) += 1;

        if distance < closest_distance {
            closest_distance = distance;
            closest = Some(candidate.kind.clone());
        }
    }

    Ok(MobScan {
        detected,
        closest,
        counts,
    })
}
