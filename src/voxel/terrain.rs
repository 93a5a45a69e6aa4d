/// Procedural terrain fill.
/// Every chunk is generated from its own coordinate and the world seed only,
/// so any generation order yields the same blocks.
use super::{Block, Chunk, LocalPos, CHUNK_SIZE, CHUNK_SIZE_I32};
use crate::error::ConfigError;
use glam::IVec3;
use noise::{NoiseFn, Perlin};

/// Vertical noise stretch per terrain class: flat, hilly, mountainous.
const TERRAIN_MODIFIERS: [f64; 3] = [0.1, 0.2, 0.4];

/// Octaves used to classify a chunk: (frequency, weight).
const CLASS_OCTAVES: [(f64, f64); 3] = [(0.1, 1.0), (0.3, 0.5), (0.6, 0.25)];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TerrainClass {
    Flat = 0,
    Hilly = 1,
    Mountainous = 2,
}

impl TerrainClass {
    #[inline]
    pub const fn vertical_modifier(self) -> f64 {
        TERRAIN_MODIFIERS[self as usize]
    }
}

#[derive(Debug, Clone)]
pub struct TerrainConfig {
    pub seed: i32,
    /// World-space frequency of the 3D height noise.
    pub frequency: f64,
    /// Chunks with |x| or |z| beyond this stay empty.
    pub horizontal_chunks: i32,
    /// Chunks with y outside `0..=vertical_chunks` stay empty.
    pub vertical_chunks: i32,
    pub min_height: i32,
    pub max_height: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        let vertical_chunks = 2;
        Self {
            seed: 0,
            frequency: 0.3,
            horizontal_chunks: 8,
            vertical_chunks,
            min_height: 2,
            max_height: CHUNK_SIZE_I32 * vertical_chunks - 2,
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizontal_chunks < 0 || self.vertical_chunks < 0 {
            return Err(ConfigError::EmptyTerrainBounds {
                horizontal: self.horizontal_chunks,
                vertical: self.vertical_chunks,
            });
        }
        if self.min_height > self.max_height {
            return Err(ConfigError::InvertedHeightRange {
                min: self.min_height,
                max: self.max_height,
            });
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(ConfigError::InvalidFrequency(self.frequency));
        }
        Ok(())
    }

    /// Whether a chunk coordinate lies inside the generated region.
    #[inline]
    pub fn contains_chunk(&self, chunk: IVec3) -> bool {
        let h = self.horizontal_chunks;
        (-h..=h).contains(&chunk.x)
            && (-h..=h).contains(&chunk.z)
            && (0..=self.vertical_chunks).contains(&chunk.y)
    }
}

/// Hash a chunk coordinate into a noise seed.
#[inline]
pub fn chunk_seed(chunk: IVec3, world_seed: i32) -> u32 {
    let hash = chunk.x.wrapping_mul(73_856_093)
        ^ chunk.y.wrapping_mul(19_349_663)
        ^ chunk.z.wrapping_mul(83_492_791);
    (world_seed ^ hash) as u32
}

#[derive(Debug, Clone, Default)]
pub struct TerrainGenerator {
    pub config: TerrainConfig,
}

impl TerrainGenerator {
    pub fn new(config: TerrainConfig) -> Self {
        Self { config }
    }

    /// Low-frequency classification of a chunk, from three 2D octaves around
    /// its horizontal coordinate.
    pub fn classify(perlin: &Perlin, chunk: IVec3) -> TerrainClass {
        let combined: f64 = CLASS_OCTAVES
            .iter()
            .map(|&(freq, weight)| perlin.get([chunk.x as f64 * freq, chunk.z as f64 * freq]) * weight)
            .sum();

        let class = ((combined + 1.75) / 3.5 * 2.0).floor() as i32;
        match class.clamp(0, 2) {
            0 => TerrainClass::Flat,
            1 => TerrainClass::Hilly,
            _ => TerrainClass::Mountainous,
        }
    }

    /// Fill `chunk` for its current offset. Chunks outside the configured
    /// region are left empty.
    ///
    /// A solid block with a solid block directly above is tagged enclosed.
    /// The tag for the chunk's top layer depends on the chunk above, which
    /// the world stitches after all slots are filled (`seal_vertical_seam`).
    pub fn fill(&self, chunk: &mut Chunk) {
        chunk.clear();

        let offset = chunk.offset;
        if !self.config.contains_chunk(offset) {
            return;
        }

        let perlin = Perlin::new(chunk_seed(offset, self.config.seed));
        let class = Self::classify(&perlin, offset);
        let freq = self.config.frequency;
        let vertical_freq = freq * class.vertical_modifier();
        let range = (self.config.max_height - self.config.min_height) as f64;
        let origin = chunk.origin();

        for y in 0..CHUNK_SIZE_I32 {
            for x in 0..CHUNK_SIZE_I32 {
                for z in 0..CHUNK_SIZE_I32 {
                    let world = origin + IVec3::new(x, y, z);

                    let n = perlin.get([
                        world.x as f64 * freq,
                        world.y as f64 * vertical_freq,
                        world.z as f64 * freq,
                    ]);
                    let normalized = ((n + 1.0) * 0.5).clamp(0.0, 1.0);
                    let max_height = self.config.min_height + (normalized * range) as i32;

                    if world.y > max_height {
                        continue;
                    }

                    // In range by construction of the loops above.
                    let Some(pos) = LocalPos::new(x, y, z) else { continue };
                    chunk.set(pos, Block::SOLID);

                    if let Some(below) = LocalPos::new(x, y - 1, z) {
                        let under = chunk.get(below);
                        if under.is_solid() {
                            chunk.set(below, under.with_enclosed(true));
                        }
                    }
                }
            }
        }
    }
}

/// Mark the top layer of `lower` enclosed wherever the bottom layer of
/// `upper` is solid. The two chunks must be vertical neighbours.
pub fn seal_vertical_seam(upper: &Chunk, lower: &mut Chunk) {
    debug_assert_eq!(upper.offset, lower.offset + IVec3::Y);

    let top = CHUNK_SIZE_I32 - 1;
    for x in 0..CHUNK_SIZE_I32 {
        for z in 0..CHUNK_SIZE_I32 {
            let (Some(bottom_of_upper), Some(top_of_lower)) =
                (LocalPos::new(x, 0, z), LocalPos::new(x, top, z))
            else {
                continue;
            };
            let under = lower.get(top_of_lower);
            if under.is_solid() && upper.get(bottom_of_upper).is_solid() {
                lower.set(top_of_lower, under.with_enclosed(true));
            }
        }
    }
}

/// Where chunk contents come from.
#[derive(Debug, Clone)]
pub enum TerrainSource {
    /// Seeded noise terrain.
    Noise(TerrainGenerator),
    /// Solid at and below `surface_y`, empty above. Handy for physics scenes.
    Flat { surface_y: i32 },
    /// All air; edits are the only content.
    Empty,
}

impl Default for TerrainSource {
    fn default() -> Self {
        TerrainSource::Noise(TerrainGenerator::default())
    }
}

impl TerrainSource {
    pub fn fill(&self, chunk: &mut Chunk) {
        match self {
            TerrainSource::Noise(generator) => generator.fill(chunk),
            TerrainSource::Flat { surface_y } => {
                chunk.clear();
                let origin = chunk.origin();
                for pos in LocalPos::all() {
                    let world = origin + pos.as_ivec3();
                    if world.y <= *surface_y {
                        // The top layer is left to `seal_vertical_seam`.
                        let enclosed =
                            world.y < *surface_y && pos.as_ivec3().y < CHUNK_SIZE_I32 - 1;
                        chunk.set(pos, Block::Solid { enclosed });
                    }
                }
            }
            TerrainSource::Empty => chunk.clear(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            TerrainSource::Noise(generator) => generator.config.validate(),
            _ => Ok(()),
        }
    }
}
