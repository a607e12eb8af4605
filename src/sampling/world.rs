//! World oracle trait through which all geometry and entity queries go.
//!
//! The perception core never walks world data structures itself; the host
//! simulation implements [`WorldView`] and answers raycasts, light and
//! biome lookups, entity volume queries and the agent roster. The bundled
//! [`GridWorld`](crate::gridworld::GridWorld) is one such implementation,
//! used by the demo driver and the integration tests.

use glam::IVec3;
use thiserror::Error;

use super::agent::AgentState;
use super::geometry::Aabb;
use super::ray::{Ray, RayHit};

/// Failure of a world query.
///
/// These are soft failures: the sampler logs them and skips the affected
/// agent's snapshot for the tick, relying on the next tick as the retry.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A geometry query (raycast, light, cell lookup) failed.
    #[error("geometry query failed: {0}")]
    Geometry(String),
    /// An entity volume query failed.
    #[error("entity query failed: {0}")]
    Entities(String),
    /// A biome lookup failed.
    #[error("biome lookup failed: {0}")]
    Biome(String),
}

/// A candidate entity returned by a broad-phase volume query.
///
/// Transient: produced per tick during aggregation and discarded.
#[derive(Debug, Clone)]
pub struct EntitySample {
    /// Stable entity identity.
    pub id: u64,
    /// Entity type identifier (e.g. `zombie`).
    pub kind: String,
    /// Current bounding box.
    pub bounds: Aabb,
}

/// Read-only oracle over the simulated world.
///
/// All methods are synchronous; one tick's queries complete before the
/// next tick begins. Implementations must be `Sync` because the surface
/// sweep fans its rows out across threads within a tick.
pub trait WorldView: Sync {
    /// Returns the first surface intersection along a ray, or a miss.
    ///
    /// Out-of-bounds coordinates are treated as a miss, never an error.
    fn raycast(&self, ray: &Ray) -> Result<RayHit, WorldError>;

    /// Returns the sky-light level at a grid cell, 0 when fully covered.
    fn sky_light(&self, cell: IVec3) -> u8;

    /// Returns the biome label at a position.
    fn biome(&self, pos: glam::Vec3) -> Result<String, WorldError>;

    /// Returns true if this world runs a day/night cycle.
    fn has_day_cycle(&self) -> bool;

    /// Returns the current time-of-day counter.
    fn time_of_day(&self) -> u64;

    /// Returns the current tick counter.
    fn tick(&self) -> u64;

    /// Returns all mobile entities whose bounds intersect the volume,
    /// excluding the given agent.
    fn entities_in(&self, volume: &Aabb, exclude: u64) -> Result<Vec<EntitySample>, WorldError>;

    /// Returns the roster of active agents for this tick.
    fn agents(&self) -> Vec<AgentState>;
}
