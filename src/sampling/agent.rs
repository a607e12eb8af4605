//! Observed agent state and inventory.
//!
//! An [`AgentState`] is the per-tick view of one agent handed over by the
//! host roster. It is read-only input to the sampling pipeline; nothing
//! here mutates the agent.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::params::Params;

/// Number of hotbar slots.
pub const HOTBAR_SLOTS: usize = 9;
/// Number of main inventory slots.
pub const MAIN_SLOTS: usize = 27;
/// Number of armor slots.
pub const ARMOR_SLOTS: usize = 4;

/// A stack of items occupying one inventory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type identifier.
    pub item: String,
    /// Number of items in the stack.
    pub count: u32,
}

/// One inventory slot, empty or holding a stack.
pub type Slot = Option<ItemStack>;

/// Fixed-size inventory of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Hotbar slots, left to right.
    pub hotbar: Vec<Slot>,
    /// Main inventory slots, row-major.
    pub main: Vec<Slot>,
    /// Armor slots: feet, legs, chest, head.
    pub armor: Vec<Slot>,
    /// Offhand slot.
    pub offhand: Slot,
}

impl Inventory {
    /// Creates an inventory with every slot empty.
    pub fn empty() -> Self {
        Self {
            hotbar: vec![None; HOTBAR_SLOTS],
            main: vec![None; MAIN_SLOTS],
            armor: vec![None; ARMOR_SLOTS],
            offhand: None,
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::empty()
    }
}

/// Formats a slot for the output row.
///
/// Empty slots read `none`, single items read as the bare item name, and
/// larger stacks read `name : count`.
pub fn format_slot(slot: &Slot) -> String {
    match slot {
        None => "none".to_string(),
        Some(stack) if stack.count <= 1 => stack.item.clone(),
        Some(stack) => format!("{} : {}", stack.item, stack.count),
    }
}

/// Per-tick state of one observed agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    /// Stable identity, unique across the roster.
    pub id: u64,
    /// Display name, used in row identifiers.
    pub name: String,
    /// Feet position in world space.
    pub pos: Vec3,
    /// Unit gaze direction.
    pub gaze: Vec3,
    /// Current health.
    pub health: f32,
    /// Current food level.
    pub food: i32,
    /// Remaining oxygen, if the agent tracks one.
    pub oxygen: Option<i32>,
    /// Current inventory contents.
    pub inventory: Inventory,
}

impl AgentState {
    /// Returns the eye position derived from the feet position.
    pub fn eye(&self, params: &Params) -> Vec3 {
        self.pos + Vec3::Y * params.eye_height
    }

    /// Returns the agent's bounding box.
    pub fn bounds(&self, params: &Params) -> Aabb {
        let half = params.agent_width * 0.5;
        Aabb::new(
            self.pos - Vec3::new(half, 0.0, half),
            self.pos + Vec3::new(half, params.agent_height, half),
        )
    }
}
