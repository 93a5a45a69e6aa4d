pub mod camera;
pub mod engine;
pub mod error;
pub mod input;
pub mod math;
pub mod meshing;
pub mod movement;
pub mod perf;
pub mod raycast;
pub mod rendering;
/// softvox - first-person voxel sandbox on a software rasterizer
/// Fixed chunk window, painter's-order block rendering, per-axis collision
pub mod voxel;
pub mod world;

pub use camera::{Camera, CameraConfig, CameraView};
pub use engine::{Engine, EngineConfig, ScreenConfig};
pub use error::ConfigError;
pub use input::Buttons;
pub use meshing::{FaceDir, FaceMask, Mesh};
pub use movement::{Movement, MovementConfig, PlayerBox};
pub use perf::FrameStats;
pub use raycast::{cast_ray, BlockEditor, DdaWalk, EditorConfig, RayHit};
pub use rendering::{Framebuffer, PixelTarget, Rasterizer, RenderConfig, ShadingConfig, VisibleSet};
pub use voxel::{Block, Chunk, TerrainConfig, TerrainSource, CHUNK_SIZE, CHUNK_VOLUME};
pub use world::{World, WorldConfig};
