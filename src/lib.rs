//! # Percept - Agent Perception Sampling
//!
//! Observes agents inside a tick-driven voxel world and computes, once per
//! simulation step, what each agent can currently perceive: position, gaze,
//! the surface under the crosshair, ambient light and time-of-day context,
//! and which nearby mobile entities fall within the effective field of view.
//! Each per-tick perception snapshot is serialized as one CSV row.
//!
//! ## Features
//!
//! - Occlusion-aware raycasting through a pluggable world oracle
//! - Two-stage visibility classification (line of sight + vision cones)
//! - Per-agent one-tick smoothing of noisy entity detections
//! - Screen-space surface sweep with unique-cell statistics
//! - Sky-exposure probing and night-window derivation
//! - Append-only CSV output with a once-per-file header
//!
//! ## Core Modules
//!
//! - [`sampling::snapshot`] - Snapshot record and builder
//! - [`sampling::fov`] - Field-of-view classification
//! - [`sampling::mobs`] - Visible-entity aggregation and smoothing
//! - [`sampling::surfaces`] - Screen-space surface sampling
//! - [`sampling::world`] - World oracle trait
//! - [`recorder`] - Host lifecycle entry points

/// Core perception-sampling logic and data structures.
pub mod sampling {
    /// Observed agent state and inventory.
    pub mod agent;
    /// Field-of-view classification for candidate targets.
    pub mod fov;
    /// Geometric primitives shared by the perception core.
    pub mod geometry;
    /// Visible-entity aggregation and temporal smoothing.
    pub mod mobs;
    /// Sampling parameters.
    pub mod params;
    /// Ray queries against world geometry.
    pub mod ray;
    /// Per-tick orchestration across the agent roster.
    pub mod sampler;
    /// Perception snapshot record and builder.
    pub mod snapshot;
    /// Deterministic count-summary formatting.
    pub mod summary;
    /// Screen-space surface sampling.
    pub mod surfaces;
    /// World oracle trait and query types.
    pub mod world;
}

/// In-memory voxel world for the demo driver and tests.
pub mod gridworld;
/// Host lifecycle adapter coupling sampler and sink.
pub mod recorder;
/// Append-only CSV sink for perception snapshots.
pub mod sink;
