use serde::{Deserialize, Serialize};

/// Wider secondary vision cone that only applies up to a distance cap.
///
/// Models peripheral awareness: targets slightly outside the main cone
/// are still noticed when they are close.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeripheralCone {
    /// Cosine of the peripheral cone half-angle.
    pub cone_cos: f32,
    /// Maximum distance at which the peripheral cone applies.
    pub max_distance: f32,
}

/// Sampling parameters that control the perception pipeline.
///
/// Every threshold here was tuned repeatedly while the pipeline evolved,
/// so none of them are hardcoded at the use sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Maximum distance the agent can see, in world units.
    pub max_view_distance: f32,
    /// Lateral offset of the four off-axis sky-probe rays.
    pub sky_probe_spread: f32,
    /// Cosine of the main vision-cone half-angle.
    pub cone_cos: f32,
    /// Optional wider cone with a distance cap.
    pub peripheral: Option<PeripheralCone>,
    /// Broad-phase inflation radius around the swept gaze volume.
    pub peripheral_radius: f32,
    /// Margin added to entity bounds before the line-of-sight clip.
    pub los_inflation: f32,
    /// Horizontal resolution of the surface-sample grid.
    pub scan_grid_width: usize,
    /// Vertical resolution of the surface-sample grid.
    pub scan_grid_height: usize,
    /// Horizontal half-angle of the surface sweep, in radians.
    pub scan_h_half_angle: f32,
    /// Vertical half-angle of the surface sweep, in radians.
    pub scan_v_half_angle: f32,
    /// Whether the surface-sample scan runs at all.
    pub scan_surfaces: bool,
    /// Length of one in-world day, in time units.
    pub day_length: u64,
    /// First time-of-day value counted as night (inclusive).
    pub night_start: u64,
    /// Last time-of-day value counted as night (inclusive).
    pub night_end: u64,
    /// Eye height above the agent's feet position.
    pub eye_height: f32,
    /// Agent bounding-box width (x and z extent).
    pub agent_width: f32,
    /// Agent bounding-box height.
    pub agent_height: f32,
    /// Whether inventory slots are included in snapshots.
    pub log_inventory: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_view_distance: 64.0,
            sky_probe_spread: 0.2,
            cone_cos: std::f32::consts::FRAC_1_SQRT_2,
            peripheral: None,
            peripheral_radius: 3.0,
            los_inflation: 0.1,
            scan_grid_width: 128,
            scan_grid_height: 64,
            scan_h_half_angle: std::f32::consts::FRAC_PI_2,
            scan_v_half_angle: std::f32::consts::FRAC_PI_2,
            scan_surfaces: true,
            day_length: 24_000,
            night_start: 13_000,
            night_end: 23_000,
            eye_height: 1.62,
            agent_width: 0.6,
            agent_height: 1.8,
            log_inventory: true,
        }
    }
}

impl Params {
    /// Saves parameters to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads parameters from a JSON file.
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let params = serde_json::from_str(&json)?;
        Ok(params)
    }
}
