//! Per-tick orchestration across the agent roster.

use std::collections::HashMap;

use super::mobs::SmoothingState;
use super::params::Params;
use super::snapshot::{self, PerceptionSnapshot};
use super::world::WorldView;

/// Samples the perception of every roster agent once per tick.
///
/// Owns the per-agent smoothing state: created the first time an agent
/// is seen, evicted when the agent leaves the roster. The host must call
/// [`Sampler::sample_tick`] exactly once per simulation step; ticks are
/// strictly sequential, so no locking is involved.
pub struct Sampler {
    params: Params,
    smoothing: HashMap<u64, SmoothingState>,
}

impl Sampler {
    /// Creates a sampler with the given parameters.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            smoothing: HashMap::new(),
        }
    }

    /// Returns the active sampling parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns how many agents currently hold smoothing state.
    pub fn tracked_agents(&self) -> usize {
        self.smoothing.len()
    }

    /// Samples every agent on the roster for the current tick.
    ///
    /// Produces exactly one snapshot per agent; an agent whose world
    /// queries fail is logged and skipped for this tick, never aborting
    /// the batch or the host.
    pub fn sample_tick(&mut self, world: &dyn WorldView) -> Vec<PerceptionSnapshot> {
        let roster = world.agents();

        // Drop smoothing state for agents that disconnected.
        self.smoothing
            .retain(|id, _| roster.iter().any(|agent| agent.id == *id));

        let timestamp = chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S%.3f")
            .to_string();

        let mut snapshots = Vec::with_capacity(roster.len());
        for agent in &roster {
            let smoothing = self.smoothing.entry(agent.id).or_default();
            match snapshot::build(world, agent, smoothing, &timestamp, &self.params) {
                Ok(snap) => snapshots.push(snap),
                Err(err) => {
                    log::warn!("skipping agent {} this tick: {}", agent.name, err);
                }
            }
        }

        snapshots
    }
}
