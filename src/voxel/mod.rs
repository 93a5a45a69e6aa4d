/// Core voxel data: block cells, fixed-size chunks and terrain fill.
pub mod block;
pub mod chunk;
pub mod terrain;

pub use block::Block;
pub use chunk::{
    block_to_chunk, block_to_local, world_to_chunk_pos, Chunk, LocalPos, CHUNK_SIZE,
    CHUNK_SIZE_I32, CHUNK_VOLUME,
};
pub use terrain::{TerrainClass, TerrainConfig, TerrainGenerator, TerrainSource};
