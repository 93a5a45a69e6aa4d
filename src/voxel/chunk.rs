/// Fixed-size chunk storage.
/// Chunks live in the world's slot pool for the whole session; their
/// contents are overwritten on recenter, never freed individually.
use super::Block;
use glam::{IVec3, Vec3};

pub const CHUNK_SIZE: usize = 7;
pub const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// A coordinate inside a chunk, guaranteed to be in `0..CHUNK_SIZE` on
/// every axis. All flat-index arithmetic goes through this type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocalPos {
    x: u8,
    y: u8,
    z: u8,
}

impl LocalPos {
    /// Returns None when any component falls outside the chunk.
    #[inline]
    pub fn new(x: i32, y: i32, z: i32) -> Option<Self> {
        let range = 0..CHUNK_SIZE_I32;
        if range.contains(&x) && range.contains(&y) && range.contains(&z) {
            Some(Self {
                x: x as u8,
                y: y as u8,
                z: z as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn from_ivec3(v: IVec3) -> Option<Self> {
        Self::new(v.x, v.y, v.z)
    }

    /// Linear index, z-major then y then x.
    #[inline]
    pub const fn index(self) -> usize {
        (self.z as usize * CHUNK_SIZE * CHUNK_SIZE) + (self.y as usize * CHUNK_SIZE) + self.x as usize
    }

    #[inline]
    pub const fn from_index(index: usize) -> Self {
        let z = index / (CHUNK_SIZE * CHUNK_SIZE);
        let remainder = index % (CHUNK_SIZE * CHUNK_SIZE);
        Self {
            x: (remainder % CHUNK_SIZE) as u8,
            y: (remainder / CHUNK_SIZE) as u8,
            z: z as u8,
        }
    }

    #[inline]
    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x as i32, self.y as i32, self.z as i32)
    }

    /// Iterate every position in index order.
    pub fn all() -> impl Iterator<Item = LocalPos> {
        (0..CHUNK_VOLUME).map(LocalPos::from_index)
    }
}

pub struct Chunk {
    /// Chunk-space coordinate; world block = offset * CHUNK_SIZE + local.
    pub offset: IVec3,
    blocks: Box<[Block; CHUNK_VOLUME]>,
}

impl Chunk {
    pub fn empty(offset: IVec3) -> Self {
        Self {
            offset,
            blocks: Box::new([Block::Empty; CHUNK_VOLUME]),
        }
    }

    #[inline]
    pub fn get(&self, pos: LocalPos) -> Block {
        self.blocks[pos.index()]
    }

    #[inline]
    pub fn set(&mut self, pos: LocalPos, block: Block) {
        self.blocks[pos.index()] = block;
    }

    /// Reset every cell to empty, keeping the allocation.
    pub fn clear(&mut self) {
        self.blocks.fill(Block::Empty);
    }

    /// World-space coordinate of the chunk's minimum corner.
    #[inline]
    pub fn origin(&self) -> IVec3 {
        self.offset * CHUNK_SIZE_I32
    }

    #[inline]
    pub fn world_pos(&self, pos: LocalPos) -> IVec3 {
        self.origin() + pos.as_ivec3()
    }

    /// Occupied cells with their local positions.
    pub fn solid_blocks(&self) -> impl Iterator<Item = (LocalPos, Block)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_solid())
            .map(|(i, b)| (LocalPos::from_index(i), *b))
    }

    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_solid()).count()
    }

    /// Raw block array, index order matches `LocalPos::index`.
    pub fn blocks(&self) -> &[Block; CHUNK_VOLUME] {
        &self.blocks
    }
}

/// Chunk containing a world block coordinate.
#[inline]
pub fn block_to_chunk(block: IVec3) -> IVec3 {
    IVec3::new(
        block.x.div_euclid(CHUNK_SIZE_I32),
        block.y.div_euclid(CHUNK_SIZE_I32),
        block.z.div_euclid(CHUNK_SIZE_I32),
    )
}

/// Local position of a world block coordinate inside its chunk.
#[inline]
pub fn block_to_local(block: IVec3) -> LocalPos {
    LocalPos {
        x: block.x.rem_euclid(CHUNK_SIZE_I32) as u8,
        y: block.y.rem_euclid(CHUNK_SIZE_I32) as u8,
        z: block.z.rem_euclid(CHUNK_SIZE_I32) as u8,
    }
}

/// Chunk containing a continuous world position (floor division per axis).
#[inline]
pub fn world_to_chunk_pos(world_pos: Vec3) -> IVec3 {
    IVec3::new(
        (world_pos.x / CHUNK_SIZE as f32).floor() as i32,
        (world_pos.y / CHUNK_SIZE as f32).floor() as i32,
        (world_pos.z / CHUNK_SIZE as f32).floor() as i32,
    )
}
