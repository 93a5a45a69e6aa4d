/// Mesh definitions consumed by the rasterizer.
pub mod mesh;

pub use mesh::{FaceDir, FaceMask, Mesh, MeshTriangle};
