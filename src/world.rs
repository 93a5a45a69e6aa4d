/// World store: a fixed cube of chunk slots around the observer.
/// Slots are allocated once and re-targeted on recenter; lookups outside
/// the current window resolve to "not present".
use crate::error::ConfigError;
use crate::meshing::{FaceDir, FaceMask};
use crate::voxel::terrain::seal_vertical_seam;
use crate::voxel::{
    block_to_chunk, block_to_local, world_to_chunk_pos, Block, Chunk, LocalPos, TerrainSource,
};
use glam::{IVec3, Vec3};
use log::{debug, info};

/// World configuration parameters
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Pool radius in chunks; the window is `(2r + 1)^3` slots.
    pub radius: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { radius: 1 }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radius < 1 {
            return Err(ConfigError::WindowTooSmall(self.radius));
        }
        Ok(())
    }

    #[inline]
    pub fn side(&self) -> i32 {
        self.radius.max(0) * 2 + 1
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        let side = self.side() as usize;
        side * side * side
    }
}

pub struct World {
    slots: Vec<Chunk>,
    /// Chunk coordinate the window is centered on; None until first recenter.
    center: Option<IVec3>,
    radius: i32,
    source: TerrainSource,
    /// Bumped on every recenter and every effective edit.
    revision: u64,
}

impl World {
    pub fn new(config: WorldConfig, source: TerrainSource) -> Self {
        let radius = config.radius.max(0);
        let slots = (0..config.slot_count())
            .map(|i| Chunk::empty(slot_delta(i, radius)))
            .collect();
        Self {
            slots,
            center: None,
            radius,
            source,
            revision: 0,
        }
    }

    /// Slot holding `chunk`, if it lies in the current window.
    /// Slots are ordered y, then x, then z.
    #[inline]
    pub fn slot_of(&self, chunk: IVec3) -> Option<usize> {
        let d = chunk - self.center?;
        let r = self.radius;
        if d.x.abs() > r || d.y.abs() > r || d.z.abs() > r {
            return None;
        }
        let side = 2 * r + 1;
        let (x, y, z) = (d.x + r, d.y + r, d.z + r);
        Some(((y * side + x) * side + z) as usize)
    }

    #[inline]
    fn locate(&self, block: IVec3) -> Option<(usize, LocalPos)> {
        let slot = self.slot_of(block_to_chunk(block))?;
        Some((slot, block_to_local(block)))
    }

    /// Block at a world coordinate, or None outside the loaded window.
    #[inline]
    pub fn get_block(&self, block: IVec3) -> Option<Block> {
        let (slot, local) = self.locate(block)?;
        Some(self.slots[slot].get(local))
    }

    #[inline]
    pub fn is_solid(&self, block: IVec3) -> bool {
        self.get_block(block).is_some_and(Block::is_solid)
    }

    #[inline]
    pub fn contains(&self, block: IVec3) -> bool {
        self.locate(block).is_some()
    }

    /// Write a block. Outside the window this does nothing and returns false.
    ///
    /// Occupancy is taken from `block`; the enclosed flags of the cell and of
    /// the cell below it are recomputed from their neighbours, so callers
    /// may pass `Block::SOLID` without caring about the flag.
    pub fn set_block(&mut self, block: IVec3, value: Block) -> bool {
        let Some((slot, local)) = self.locate(block) else {
            return false;
        };

        let enclosed = value.is_solid() && self.is_solid(block + IVec3::Y);
        let value = value.with_enclosed(enclosed);
        let previous = self.slots[slot].get(local);
        if previous == value {
            return true;
        }
        self.slots[slot].set(local, value);

        let below = block - IVec3::Y;
        if let Some((below_slot, below_local)) = self.locate(below) {
            let under = self.slots[below_slot].get(below_local);
            self.slots[below_slot].set(below_local, under.with_enclosed(value.is_solid()));
        }

        self.revision += 1;
        debug!(
            "set_block {:?}: {:?} -> {:?} (revision {})",
            block, previous, value, self.revision
        );
        true
    }

    /// True when the neighbour across `face` is empty or outside the window.
    #[inline]
    pub fn face_exposed(&self, block: IVec3, face: FaceDir) -> bool {
        !self.is_solid(block + face.offset())
    }

    /// All exposed faces of a block. An enclosed block skips the +Y lookup.
    pub fn exposed_faces(&self, block: IVec3) -> FaceMask {
        let enclosed = self.get_block(block).is_some_and(Block::is_enclosed);
        FaceDir::ALL
            .iter()
            .filter(|&&face| !(enclosed && face == FaceDir::PosY))
            .filter(|&&face| self.face_exposed(block, face))
            .fold(FaceMask::empty(), |mask, face| mask | face.mask())
    }

    /// Whether the observer at `position` has left the current center chunk.
    #[inline]
    pub fn needs_recenter(&self, position: Vec3) -> bool {
        self.center != Some(world_to_chunk_pos(position))
    }

    /// Re-target every slot to the cube around `center` and regenerate it.
    pub fn recenter(&mut self, center: IVec3) {
        let radius = self.radius;
        for (i, chunk) in self.slots.iter_mut().enumerate() {
            chunk.offset = center + slot_delta(i, radius);
            self.source.fill(chunk);
        }
        self.center = Some(center);

        // Top layers depend on the chunk above; stitch once all slots exist.
        let side = (2 * radius + 1) as usize;
        let layer = side * side;
        for lower in 0..self.slots.len().saturating_sub(layer) {
            let (low, high) = self.slots.split_at_mut(lower + layer);
            seal_vertical_seam(&high[0], &mut low[lower]);
        }

        self.revision += 1;
        info!(
            "World recentered on chunk {:?}: {} slots, {} solid blocks",
            center,
            self.slots.len(),
            self.solid_count()
        );
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.slots
    }

    pub fn center(&self) -> Option<IVec3> {
        self.center
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn solid_count(&self) -> usize {
        self.slots.iter().map(Chunk::solid_count).sum()
    }

    /// World coordinates of every solid block in the window.
    pub fn solid_blocks(&self) -> impl Iterator<Item = (IVec3, Block)> + '_ {
        self.slots.iter().flat_map(|chunk| {
            chunk
                .solid_blocks()
                .map(move |(pos, block)| (chunk.world_pos(pos), block))
        })
    }
}

/// Chunk offset of slot `index` relative to the window center.
#[inline]
fn slot_delta(index: usize, radius: i32) -> IVec3 {
    let side = (2 * radius + 1) as usize;
    let z = index % side;
    let x = (index / side) % side;
    let y = index / (side * side);
    IVec3::new(x as i32, y as i32, z as i32) - IVec3::splat(radius)
}
