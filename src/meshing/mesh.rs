/// Mesh data structures for rendering
/// Meshes are small, read-only triangle lists in unit-cube local space.
use glam::{IVec3, Vec3};

/// Cardinal face direction of a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceDir {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl FaceDir {
    pub const ALL: [FaceDir; 6] = [
        FaceDir::PosX,
        FaceDir::NegX,
        FaceDir::PosY,
        FaceDir::NegY,
        FaceDir::PosZ,
        FaceDir::NegZ,
    ];

    #[inline]
    pub const fn normal(self) -> Vec3 {
        match self {
            FaceDir::PosX => Vec3::X,
            FaceDir::NegX => Vec3::NEG_X,
            FaceDir::PosY => Vec3::Y,
            FaceDir::NegY => Vec3::NEG_Y,
            FaceDir::PosZ => Vec3::Z,
            FaceDir::NegZ => Vec3::NEG_Z,
        }
    }

    /// Integer step to the neighbouring cell across this face.
    #[inline]
    pub const fn offset(self) -> IVec3 {
        match self {
            FaceDir::PosX => IVec3::X,
            FaceDir::NegX => IVec3::NEG_X,
            FaceDir::PosY => IVec3::Y,
            FaceDir::NegY => IVec3::NEG_Y,
            FaceDir::PosZ => IVec3::Z,
            FaceDir::NegZ => IVec3::NEG_Z,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            FaceDir::PosX => FaceDir::NegX,
            FaceDir::NegX => FaceDir::PosX,
            FaceDir::PosY => FaceDir::NegY,
            FaceDir::NegY => FaceDir::PosY,
            FaceDir::PosZ => FaceDir::NegZ,
            FaceDir::NegZ => FaceDir::PosZ,
        }
    }

    #[inline]
    pub const fn mask(self) -> FaceMask {
        FaceMask::from_bits_truncate(1 << self as u8)
    }
}

bitflags::bitflags! {
    /// Set of exposed faces for one block.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct FaceMask: u8 {
        const POS_X = 1 << 0;
        const NEG_X = 1 << 1;
        const POS_Y = 1 << 2;
        const NEG_Y = 1 << 3;
        const POS_Z = 1 << 4;
        const NEG_Z = 1 << 5;
    }
}

impl FaceMask {
    #[inline]
    pub fn has(self, face: FaceDir) -> bool {
        self.contains(face.mask())
    }
}

/// One triangle of a mesh, optionally tied to a cube face so it can be
/// skipped when that face is hidden.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshTriangle {
    pub indices: [usize; 3],
    pub face: Option<FaceDir>,
}

/// Indexed triangle mesh. Vertices live in `[0, 1]^3`; triangles wind so
/// that `(v1 - v0) x (v2 - v0)` points out of the solid.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<MeshTriangle>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<MeshTriangle>) -> Self {
        debug_assert!(triangles
            .iter()
            .all(|t| t.indices.iter().all(|&i| i < vertices.len())));
        Self { vertices, triangles }
    }

    #[inline]
    pub fn triangle_vertices(&self, tri: &MeshTriangle) -> [Vec3; 3] {
        [
            self.vertices[tri.indices[0]],
            self.vertices[tri.indices[1]],
            self.vertices[tri.indices[2]],
        ]
    }

    /// The block mesh: two triangles per face, twelve in total.
    pub fn unit_cube() -> Self {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ];

        let faces: [(FaceDir, [[usize; 3]; 2]); 6] = [
            (FaceDir::PosX, [[1, 2, 6], [1, 6, 5]]),
            (FaceDir::NegX, [[0, 4, 7], [0, 7, 3]]),
            (FaceDir::PosY, [[3, 7, 6], [3, 6, 2]]),
            (FaceDir::NegY, [[0, 1, 5], [0, 5, 4]]),
            (FaceDir::PosZ, [[4, 5, 6], [4, 6, 7]]),
            (FaceDir::NegZ, [[0, 3, 2], [0, 2, 1]]),
        ];

        let triangles = faces
            .iter()
            .flat_map(|&(face, tris)| {
                tris.into_iter().map(move |indices| MeshTriangle {
                    indices,
                    face: Some(face),
                })
            })
            .collect();

        Self::new(vertices, triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_triangles_face_outward() {
        let cube = Mesh::unit_cube();
        assert_eq!(cube.triangles.len(), 12);
        for tri in &cube.triangles {
            let [a, b, c] = cube.triangle_vertices(tri);
            let n = (b - a).cross(c - a).normalize();
            let face = tri.face.expect("cube triangles carry a face");
            assert!(
                (n - face.normal()).length() < 1e-5,
                "{:?} triangle normal {:?}",
                face,
                n
            );
        }
    }

    #[test]
    fn opposite_faces_cancel() {
        for face in FaceDir::ALL {
            assert_eq!(face.offset() + face.opposite().offset(), IVec3::ZERO);
        }
    }

    #[test]
    fn face_mask_bits_are_distinct() {
        let all = FaceDir::ALL
            .iter()
            .fold(FaceMask::empty(), |acc, f| acc | f.mask());
        assert_eq!(all, FaceMask::all());
        assert!(FaceMask::POS_Y.has(FaceDir::PosY));
        assert!(!FaceMask::POS_Y.has(FaceDir::NegY));
    }
}
