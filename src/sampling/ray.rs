//! Directional queries against the world geometry.
//!
//! A [`Ray`] is created per query and discarded. The intersection math
//! itself lives behind [`WorldView`](super::world::WorldView); this module
//! defines the query/result types and normalizes directions before
//! delegating.

use glam::Vec3;

use super::world::{WorldError, WorldView};

/// Which surfaces block a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcclusionMode {
    /// Only solid, collision-relevant surfaces block the ray. Used for
    /// sky probes and line-of-sight tests.
    Collider,
    /// Decorative and non-full surfaces block too. Used for the
    /// surface-sample sweep so thin geometry registers.
    Outline,
}

/// A single directional query.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin (usually an eye position).
    pub origin: Vec3,
    /// Direction of travel. Normalized by [`cast`] before use.
    pub dir: Vec3,
    /// Maximum distance to search.
    pub max_distance: f32,
    /// Occlusion mode for this query.
    pub mode: OcclusionMode,
    /// Agent whose own body is ignored by the query.
    pub exclude: Option<u64>,
}

/// Outcome of a ray query.
#[derive(Debug, Clone, PartialEq)]
pub enum RayHit {
    /// Nothing was struck within the maximum distance.
    Miss,
    /// A surface was struck.
    Hit {
        /// World position of the struck surface.
        position: Vec3,
        /// Distance from the ray origin to the surface.
        distance: f32,
        /// Material of the struck surface. `None` when the material
        /// could not be resolved.
        material: Option<String>,
    },
}

impl RayHit {
    /// Returns true for the `Hit` variant.
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }
}

/// Casts a ray against the world.
///
/// The direction is normalized here so call sites may pass raw offsets.
/// A zero-length direction cannot strike anything and reports a miss
/// rather than an error.
pub fn cast(
    world: &dyn WorldView,
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
    mode: OcclusionMode,
    exclude: Option<u64>,
) -> Result<RayHit, WorldError> {
    let Some(dir) = dir.try_normalize() else {
        return Ok(RayHit::Miss);
    };
    world.raycast(&Ray {
        origin,
        dir,
        max_distance,
        mode,
        exclude,
    })
}
