//! Screen-space surface sampling.
//!
//! Sweeps a fixed grid of rays across an approximate rectangular viewing
//! frustum and accumulates the set of distinct surface cells seen per
//! material. Adjacent rays often strike the same cell, so hits are
//! deduplicated through the cell set before counting; the result
//! approximates "what surfaces are in view" independently of entity
//! detection.

use std::collections::{HashMap, HashSet};

use glam::{IVec3, Vec3};
use rayon::prelude::*;

use super::geometry::ViewBasis;
use super::params::Params;
use super::ray::{self, OcclusionMode, RayHit};
use super::world::{WorldError, WorldView};

/// Angle of the sample at index `i` of `n` across `[-half, half]`.
fn sample_angle(i: usize, n: usize, half_angle: f32) -> f32 {
    if n <= 1 {
        0.0
    } else {
        -half_angle + 2.0 * half_angle * (i as f32) / ((n - 1) as f32)
    }
}

/// Returns the grid cell containing a hit position.
fn hit_cell(position: Vec3) -> IVec3 {
    position.floor().as_ivec3()
}

/// Sweeps the sample grid and counts unique visible surface cells.
///
/// Rays run in `Outline` mode so thin and decorative surfaces register.
/// Rows of the grid are swept in parallel; the per-row cell sets are
/// merged afterwards so the dedup holds across rows.
///
/// # Arguments
///
/// * `world` - World oracle
/// * `eye` - Observer eye position
/// * `gaze` - Gaze direction the grid is centered on
/// * `exclude` - Agent ignored by the rays
///
/// # Returns
///
/// Unique-cell count per material, or the first query error.
pub fn sample_visible_surfaces(
    world: &dyn WorldView,
    eye: Vec3,
    gaze: Vec3,
    exclude: Option<u64>,
    params: &Params,
) -> Result<HashMap<String, usize>, WorldError> {
    let basis = ViewBasis::from_gaze(gaze);
    let width = params.scan_grid_width;
    let height = params.scan_grid_height;

    let cells = (0..height)
        .into_par_iter()
        .map(|row| -> Result<HashMap<String, HashSet<IVec3>>, WorldError> {
            let pitch = sample_angle(row, height, params.scan_v_half_angle);
            let mut row_cells: HashMap<String, HashSet<IVec3>> = HashMap::new();

            for col in 0..width {
                let yaw = sample_angle(col, width, params.scan_h_half_angle);
                let dir = basis.direction(yaw, pitch);

                let hit = ray::cast(
                    world,
                    eye,
                    dir,
                    params.max_view_distance,
                    OcclusionMode::Outline,
                    exclude,
                )?;

                if let RayHit::Hit {
                    position,
                    material: Some(material),
                    ..
                } = hit
                {
                    row_cells
                        .entry(material)
                        .or_default()
                        .insert(hit_cell(position));
                }
            }

            Ok(row_cells)
        })
        .try_reduce(HashMap::new, |mut acc, row_cells| {
            for (material, cells) in row_cells {
                acc.entry(material).or_default().extend(cells);
            }
            Ok(acc)
        })?;

    Ok(cells
        .into_iter()
        .map(|(material, cells)| (material, cells.len()))
        .collect())
}

/// Formats a surface scan with the canonical count-summary ordering.
pub fn format_scan(cells: &HashMap<String, usize>) -> String {
    let counts: HashMap<String, u32> = cells
        .iter()
        .map(|(material, count)| (material.clone(), *count as u32))
        .collect();
    super::summary::format_counts(&counts)
}
