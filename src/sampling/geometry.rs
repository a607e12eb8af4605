//! Geometric primitives shared by the perception core.
//!
//! Provides axis-aligned bounding boxes with segment clipping (used for
//! line-of-sight tests against entity volumes) and a gaze-aligned
//! orthonormal basis for the screen-space surface sweep.

use glam::Vec3;

/// Tolerance below which a direction component is treated as zero.
const EPSILON: f32 = 1e-6;

/// An axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from two corners, ordering the coordinates.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a box from a center point and half extents.
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Returns the center point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns true if the point lies inside the box (inclusive).
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Returns true if the two boxes overlap (inclusive).
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Grows the box by `amount` on every side.
    pub fn inflate(&self, amount: f32) -> Self {
        let d = Vec3::splat(amount);
        Self {
            min: self.min - d,
            max: self.max + d,
        }
    }

    /// Extends the box along a displacement vector.
    ///
    /// Each positive component of `delta` pushes the maximum corner out,
    /// each negative component pulls the minimum corner. This is the
    /// sweep volume of the box translated by `delta`.
    pub fn expand_towards(&self, delta: Vec3) -> Self {
        let mut min = self.min;
        let mut max = self.max;
        for i in 0..3 {
            if delta[i] < 0.0 {
                min[i] += delta[i];
            } else {
                max[i] += delta[i];
            }
        }
        Self { min, max }
    }

    /// Clips a line segment against the box.
    ///
    /// # Arguments
    ///
    /// * `start` - Segment start point
    /// * `end` - Segment end point
    ///
    /// # Returns
    ///
    /// The point where the segment enters the box, or `None` if the
    /// segment misses it. A segment starting inside the box returns the
    /// start point itself.
    pub fn clip_segment(&self, start: Vec3, end: Vec3) -> Option<Vec3> {
        if self.contains(start) {
            return Some(start);
        }

        let dir = end - start;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for i in 0..3 {
            if dir[i].abs() < EPSILON {
                if start[i] < self.min[i] || start[i] > self.max[i] {
                    return None;
                }
            } else {
                let inv = 1.0 / dir[i];
                let mut t1 = (self.min[i] - start[i]) * inv;
                let mut t2 = (self.max[i] - start[i]) * inv;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t_min = t_min.max(t1);
                t_max = t_max.min(t2);
                if t_min > t_max {
                    return None;
                }
            }
        }

        Some(start + dir * t_min)
    }
}

/// Orthonormal basis aligned with a viewing direction.
///
/// `forward` is the gaze, `right` and `up` span the view plane. Used to
/// fan sample rays across a rectangular field of view.
#[derive(Debug, Clone, Copy)]
pub struct ViewBasis {
    /// Normalized gaze direction.
    pub forward: Vec3,
    /// Unit vector to the right of the gaze.
    pub right: Vec3,
    /// Unit vector above the gaze.
    pub up: Vec3,
}

impl ViewBasis {
    /// Builds a basis from a gaze direction and world-up `+Y`.
    ///
    /// When the gaze is parallel to world-up the right vector degenerates;
    /// a fixed `+X` axis is substituted so the basis stays orthonormal.
    pub fn from_gaze(gaze: Vec3) -> Self {
        let forward = gaze.try_normalize().unwrap_or(Vec3::NEG_Z);
        let right = forward
            .cross(Vec3::Y)
            .try_normalize()
            .unwrap_or(Vec3::X);
        let up = right.cross(forward);
        Self { forward, right, up }
    }

    /// Returns the ray direction at the given yaw/pitch offsets from the
    /// gaze, in radians.
    ///
    /// Spherical parameterization: well-defined across the full
    /// `[-PI/2, PI/2]` range of both angles.
    pub fn direction(&self, yaw: f32, pitch: f32) -> Vec3 {
        self.forward * (yaw.cos() * pitch.cos())
            + self.right * (yaw.sin() * pitch.cos())
            + self.up * pitch.sin()
    }
}
