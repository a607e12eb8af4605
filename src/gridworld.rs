//! In-memory voxel world implementing [`WorldView`].
//!
//! Backs the demo driver and the integration tests with a real world
//! rather than mocks: a sparse block store, a fixed-step marching
//! raycast, column-scan sky light, and a KD-tree broad phase over the
//! mobile entities.

use std::collections::HashMap;

use glam::{IVec3, Vec3};
use kdtree::KdTree;
use kdtree::distance::squared_euclidean;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::sampling::agent::{AgentState, Inventory, ItemStack};
use crate::sampling::geometry::Aabb;
use crate::sampling::ray::{OcclusionMode, Ray, RayHit};
use crate::sampling::world::{EntitySample, WorldError, WorldView};

/// Distance between successive samples of the marching raycast.
const RAY_STEP: f32 = 0.1;

/// Type alias for the 3D KD-tree indexing entity centers.
pub type Tree3D = KdTree<f32, usize, Vec<f32>>;

/// One block cell.
#[derive(Debug, Clone)]
pub struct Block {
    /// Material identifier; `None` when the material cannot be resolved.
    pub material: Option<String>,
    /// Whether the block blocks collider-mode rays. Decorative blocks
    /// (torches, flowers) only register in outline mode.
    pub solid: bool,
}

impl Block {
    /// Creates a solid block of the given material.
    pub fn solid(material: &str) -> Self {
        Self {
            material: Some(material.to_string()),
            solid: true,
        }
    }

    /// Creates a decorative, non-blocking block of the given material.
    pub fn decorative(material: &str) -> Self {
        Self {
            material: Some(material.to_string()),
            solid: false,
        }
    }
}

/// A mobile entity in the world.
#[derive(Debug, Clone)]
pub struct WorldEntity {
    /// Stable identity.
    pub id: u64,
    /// Entity type identifier.
    pub kind: String,
    /// Center of the bounding box.
    pub pos: Vec3,
    /// Half extents of the bounding box.
    pub half_extents: Vec3,
}

impl WorldEntity {
    /// Returns the entity's bounding box.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.half_extents)
    }
}

/// Sparse voxel world with entities, agents and a day clock.
pub struct GridWorld {
    blocks: HashMap<IVec3, Block>,
    max_block_y: i32,
    entities: Vec<WorldEntity>,
    entity_index: Option<Tree3D>,
    max_entity_radius: f32,
    agents: Vec<AgentState>,
    biome_name: String,
    day_cycle: bool,
    tick: u64,
    day_time: u64,
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl GridWorld {
    /// Creates an empty world with a day cycle and a `plains` biome.
    pub fn new() -> Self {
        Self {
            blocks: HashMap::new(),
            max_block_y: i32::MIN,
            entities: Vec::new(),
            entity_index: None,
            max_entity_radius: 0.0,
            agents: Vec::new(),
            biome_name: "plains".to_string(),
            day_cycle: true,
            tick: 0,
            day_time: 0,
        }
    }

    /// Places a block at a cell.
    pub fn set_block(&mut self, cell: IVec3, block: Block) {
        self.max_block_y = self.max_block_y.max(cell.y);
        self.blocks.insert(cell, block);
    }

    /// Fills the inclusive cell box `[min, max]` with copies of a block.
    pub fn fill(&mut self, min: IVec3, max: IVec3, block: &Block) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.set_block(IVec3::new(x, y, z), block.clone());
                }
            }
        }
    }

    /// Removes the block at a cell.
    pub fn clear_block(&mut self, cell: IVec3) {
        self.blocks.remove(&cell);
    }

    /// Adds a mobile entity.
    pub fn add_entity(&mut self, entity: WorldEntity) {
        self.max_entity_radius = self.max_entity_radius.max(entity.half_extents.length());
        self.entities.push(entity);
        self.entity_index = None;
    }

    /// Moves an entity to a new center position.
    pub fn move_entity(&mut self, id: u64, pos: Vec3) {
        if let Some(entity) = self.entities.iter_mut().find(|e| e.id == id) {
            entity.pos = pos;
            self.entity_index = None;
        }
    }

    /// Returns the mobile entities.
    pub fn entities(&self) -> &[WorldEntity] {
        &self.entities
    }

    /// Adds an agent to the roster.
    pub fn add_agent(&mut self, agent: AgentState) {
        self.agents.push(agent);
    }

    /// Returns a mutable handle to a roster agent.
    pub fn agent_mut(&mut self, id: u64) -> Option<&mut AgentState> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    /// Removes an agent from the roster.
    pub fn remove_agent(&mut self, id: u64) {
        self.agents.retain(|a| a.id != id);
    }

    /// Sets the biome label reported for every position.
    pub fn set_biome(&mut self, name: &str) {
        self.biome_name = name.to_string();
    }

    /// Enables or disables the day cycle.
    pub fn set_day_cycle(&mut self, enabled: bool) {
        self.day_cycle = enabled;
    }

    /// Sets the time-of-day counter directly.
    pub fn set_day_time(&mut self, day_time: u64) {
        self.day_time = day_time;
    }

    /// Advances the world clock by the given number of ticks.
    pub fn advance(&mut self, ticks: u64) {
        self.tick += ticks;
        self.day_time += ticks;
    }

    /// Rebuilds the KD-tree broad-phase index over entity centers.
    ///
    /// Call after a batch of entity mutations; queries fall back to a
    /// temporary tree when the index is stale.
    pub fn rebuild_index(&mut self) {
        self.entity_index = build_tree(&self.entities).ok();
    }

    fn solid_at(&self, cell: IVec3) -> bool {
        self.blocks.get(&cell).is_some_and(|b| b.solid)
    }

    fn blocks_ray(&self, cell: IVec3, mode: OcclusionMode) -> bool {
        match self.blocks.get(&cell) {
            Some(block) => block.solid || mode == OcclusionMode::Outline,
            None => false,
        }
    }

    fn query_candidates(&self, center: Vec3, radius: f32) -> Vec<usize> {
        let point = vec![center.x, center.y, center.z];
        let radius_sq = radius * radius;

        if let Some(tree) = &self.entity_index {
            tree.within(&point, radius_sq, &squared_euclidean)
                .unwrap_or_default()
                .into_iter()
                .map(|(_, idx)| *idx)
                .collect()
        } else {
            // Stale or absent index: build a throwaway tree for this query.
            match build_tree(&self.entities) {
                Ok(tree) => tree
                    .within(&point, radius_sq, &squared_euclidean)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(_, idx)| *idx)
                    .collect(),
                Err(_) => (0..self.entities.len()).collect(),
            }
        }
    }
}

fn build_tree(entities: &[WorldEntity]) -> Result<Tree3D, kdtree::ErrorKind> {
    let mut tree = KdTree::with_capacity(3, entities.len().max(1));
    for (i, entity) in entities.iter().enumerate() {
        tree.add(vec![entity.pos.x, entity.pos.y, entity.pos.z], i)?;
    }
    Ok(tree)
}

impl WorldView for GridWorld {
    fn raycast(&self, ray: &Ray) -> Result<RayHit, WorldError> {
        let mut distance = 0.0_f32;
        while distance <= ray.max_distance {
            let position = ray.origin + ray.dir * distance;
            let cell = position.floor().as_ivec3();
            if self.blocks_ray(cell, ray.mode) {
                let material = self.blocks.get(&cell).and_then(|b| b.material.clone());
                return Ok(RayHit::Hit {
                    position,
                    distance,
                    material,
                });
            }
            distance += RAY_STEP;
        }
        Ok(RayHit::Miss)
    }

    fn sky_light(&self, cell: IVec3) -> u8 {
        for y in (cell.y + 1)..=self.max_block_y {
            if self.solid_at(IVec3::new(cell.x, y, cell.z)) {
                return 0;
            }
        }
        15
    }

    fn biome(&self, _pos: Vec3) -> Result<String, WorldError> {
        Ok(self.biome_name.clone())
    }

    fn has_day_cycle(&self) -> bool {
        self.day_cycle
    }

    fn time_of_day(&self) -> u64 {
        self.day_time
    }

    fn tick(&self) -> u64 {
        self.tick
    }

    fn entities_in(&self, volume: &Aabb, exclude: u64) -> Result<Vec<EntitySample>, WorldError> {
        let center = volume.center();
        let radius =
            (volume.max - center).length() + self.max_entity_radius;

        Ok(self
            .query_candidates(center, radius)
            .into_iter()
            .filter_map(|idx| self.entities.get(idx))
            .filter(|entity| entity.id != exclude && entity.bounds().intersects(volume))
            .map(|entity| EntitySample {
                id: entity.id,
                kind: entity.kind.clone(),
                bounds: entity.bounds(),
            })
            .collect())
    }

    fn agents(&self) -> Vec<AgentState> {
        self.agents.clone()
    }
}

/// Builds a small demo world: layered terrain, an enclosed hut, a few
/// decorations and a handful of wandering mobs plus one observer agent.
pub fn demo_world(seed: u64) -> GridWorld {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = GridWorld::new();

    // Terrain: stone base, dirt fill, grass surface over an 80x80 patch.
    world.fill(
        IVec3::new(-40, 58, -40),
        IVec3::new(40, 60, 40),
        &Block::solid("stone"),
    );
    world.fill(
        IVec3::new(-40, 61, -40),
        IVec3::new(40, 62, 40),
        &Block::solid("dirt"),
    );
    world.fill(
        IVec3::new(-40, 63, -40),
        IVec3::new(40, 63, 40),
        &Block::solid("grass_block"),
    );

    // A closed hut the agent can step into: walls, roof, hollow interior.
    world.fill(
        IVec3::new(8, 64, 8),
        IVec3::new(14, 68, 14),
        &Block::solid("oak_planks"),
    );
    for x in 9..=13 {
        for y in 64..=67 {
            for z in 9..=13 {
                world.clear_block(IVec3::new(x, y, z));
            }
        }
    }
    for cell in [IVec3::new(9, 65, 9), IVec3::new(13, 65, 13)] {
        world.set_block(cell, Block::decorative("torch"));
    }

    // Scattered flowers register only in outline mode.
    for _ in 0..12 {
        let x = rng.random_range(-35..35);
        let z = rng.random_range(-35..35);
        world.set_block(IVec3::new(x, 64, z), Block::decorative("poppy"));
    }

    let kinds = ["zombie", "skeleton", "cow", "pig"];
    for id in 0..10_u64 {
        let kind = kinds[rng.random_range(0..kinds.len())];
        let x = rng.random_range(-30.0..30.0_f32);
        let z = rng.random_range(-30.0..30.0_f32);
        world.add_entity(WorldEntity {
            id: 100 + id,
            kind: kind.to_string(),
            pos: Vec3::new(x, 64.9, z),
            half_extents: Vec3::new(0.3, 0.9, 0.3),
        });
    }
    world.rebuild_index();

    let mut inventory = Inventory::empty();
    inventory.hotbar[0] = Some(ItemStack {
        item: "iron_sword".to_string(),
        count: 1,
    });
    inventory.hotbar[1] = Some(ItemStack {
        item: "bread".to_string(),
        count: 7,
    });
    inventory.armor[2] = Some(ItemStack {
        item: "iron_chestplate".to_string(),
        count: 1,
    });

    world.add_agent(AgentState {
        id: 1,
        name: "observer".to_string(),
        pos: Vec3::new(0.5, 64.0, 0.5),
        gaze: Vec3::new(0.0, 0.0, -1.0),
        health: 20.0,
        food: 18,
        oxygen: Some(300),
        inventory,
    });

    world
}

/// Random-walks every mobile entity by at most one block on the ground
/// plane and rebuilds the broad-phase index.
pub fn wander(world: &mut GridWorld, rng: &mut StdRng) {
    let moves: Vec<(u64, Vec3)> = world
        .entities()
        .iter()
        .map(|entity| {
            let dx = rng.random_range(-0.5..0.5_f32);
            let dz = rng.random_range(-0.5..0.5_f32);
            let pos = entity.pos + Vec3::new(dx, 0.0, dz);
            (
                entity.id,
                Vec3::new(pos.x.clamp(-38.0, 38.0), pos.y, pos.z.clamp(-38.0, 38.0)),
            )
        })
        .collect();
    for (id, pos) in moves {
        world.move_entity(id, pos);
    }
    world.rebuild_index();
}
