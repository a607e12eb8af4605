//! Field-of-view classification for candidate targets.
//!
//! Visibility is decided in two stages combined with OR: a line-of-sight
//! clip against the target's inflated bounds, then an angular cone test
//! as the fallback. The line-of-sight stage wins regardless of angle, so
//! a target the agent is looking straight at stays visible even at the
//! edge of the peripheral tolerance.

use glam::Vec3;

use super::geometry::Aabb;
use super::params::Params;

/// Which evaluation path classified a target as visible.
///
/// Diagnostic only; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityPath {
    /// The gaze-limited segment intersected the target bounds.
    LineOfSight,
    /// The target fell inside the main vision cone.
    Cone,
    /// The target fell inside the peripheral cone within its distance cap.
    PeripheralCone,
}

/// Classifies one candidate target.
///
/// # Arguments
///
/// * `eye` - Observer eye position
/// * `gaze` - Unit gaze direction
/// * `target` - Candidate bounding box
/// * `ray_end` - End of the gaze-limited sight segment
/// * `visible_distance` - Distance to the first surface along the gaze
///
/// # Returns
///
/// The path that classified the target visible, or `None` when it is
/// not visible. Targets farther than `visible_distance` are rejected
/// before either stage runs.
pub fn classify(
    eye: Vec3,
    gaze: Vec3,
    target: &Aabb,
    ray_end: Vec3,
    visible_distance: f32,
    params: &Params,
) -> Option<VisibilityPath> {
    let to_center = target.center() - eye;
    let distance = to_center.length();

    if distance > visible_distance {
        return None;
    }

    if target
        .inflate(params.los_inflation)
        .clip_segment(eye, ray_end)
        .is_some()
    {
        return Some(VisibilityPath::LineOfSight);
    }

    // Eye inside the target counts as line of sight, caught above by the
    // inflated clip; a degenerate zero offset cannot pass the cone test.
    let Some(dir) = to_center.try_normalize() else {
        return None;
    };
    let dot = gaze.dot(dir);

    if dot > params.cone_cos {
        return Some(VisibilityPath::Cone);
    }

    if let Some(peripheral) = &params.peripheral {
        if dot > peripheral.cone_cos && distance <= peripheral.max_distance {
            return Some(VisibilityPath::PeripheralCone);
        }
    }

    None
}
