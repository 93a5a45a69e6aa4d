pub mod culling;
pub mod framebuffer;
/// Software rasterization pipeline
/// Painter's-order block rendering into any `PixelTarget`
pub mod rasterizer;
pub mod shading;

pub use culling::{BlockMesh, Candidate, CollisionList, RenderBlock, VisibleSet, MAX_COLLIDERS};
pub use framebuffer::{rgb_to_u32, Framebuffer, PixelTarget, TextLine};
pub use rasterizer::{clip_triangle_near, ClipResult, DrawStyle, Placement, Rasterizer, RasterStats};
pub use shading::ShadingConfig;

use crate::error::ConfigError;

/// Per-frame culling limits and overlay toggles.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Blocks whose center is farther than this from the eye are skipped.
    pub radius: f32,
    /// Cap on blocks drawn per frame; the nearest are kept.
    pub max_blocks: usize,
    /// Keep a block when `dot(dir, forward)` exceeds this.
    pub view_cone: f32,
    pub chunk_borders: bool,
    pub aim_markers: bool,
    pub reticle: bool,
    pub position_text: bool,
    /// Paint the background before drawing blocks.
    pub clear: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            radius: 16.0,
            max_blocks: 512,
            view_cone: -0.867,
            chunk_borders: false,
            aim_markers: true,
            reticle: true,
            position_text: true,
            clear: true,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidRenderRadius(self.radius));
        }
        Ok(())
    }
}
