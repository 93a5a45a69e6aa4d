use glam::{IVec3, Vec3};
use log::debug;
use std::collections::VecDeque;

use super::RenderConfig;
use crate::camera::Camera;
use crate::meshing::FaceMask;
use crate::world::World;

/// Most blocks the collision list ever holds.
pub const MAX_COLLIDERS: usize = 36;

/// Cells around the observer's floored position that are checked for
/// collision: x and z in [-1, 1], y in [-2, 1].
const COLLIDER_MIN: IVec3 = IVec3::new(-1, -2, -1);
const COLLIDER_MAX: IVec3 = IVec3::new(1, 1, 1);

/// Mesh used to draw a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum BlockMesh {
    #[default]
    Cube,
}

/// Solid block with at least one exposed face.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub position: IVec3,
    pub faces: FaceMask,
}

/// A block that survived the per-frame filter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderBlock {
    pub position: IVec3,
    pub faces: FaceMask,
    pub mesh: BlockMesh,
    pub distance_sq: f32,
}

/// Fixed-capacity list of nearby solid cells; the oldest entry is dropped
/// once full.
#[derive(Debug, Clone, Default)]
pub struct CollisionList {
    cells: VecDeque<IVec3>,
}

impl CollisionList {
    pub fn push(&mut self, cell: IVec3) {
        if self.cells.len() == MAX_COLLIDERS {
            self.cells.pop_front();
        }
        self.cells.push_back(cell);
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.cells.iter().copied()
    }

    pub fn contains(&self, cell: IVec3) -> bool {
        self.cells.contains(&cell)
    }
}

#[inline]
fn in_collision_range(cell: IVec3, origin: IVec3) -> bool {
    let d = cell - origin;
    d.cmpge(COLLIDER_MIN).all() && d.cmple(COLLIDER_MAX).all()
}

/// Candidate list cached per world revision, plus the per-frame render and
/// collision lists derived from it.
#[derive(Default)]
pub struct VisibleSet {
    candidates: Vec<Candidate>,
    render: Vec<RenderBlock>,
    colliders: CollisionList,
    revision: Option<u64>,
}

impl VisibleSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn needs_rebuild(&self, world: &World) -> bool {
        self.revision != Some(world.revision())
    }

    /// Walk every solid block once and keep those with an exposed face.
    pub fn rebuild(&mut self, world: &World) {
        crate::perf_scope!("candidate rebuild");

        self.candidates.clear();
        for (position, _) in world.solid_blocks() {
            let faces = world.exposed_faces(position);
            if !faces.is_empty() {
                self.candidates.push(Candidate { position, faces });
            }
        }
        self.revision = Some(world.revision());

        debug!(
            "Visible set rebuilt at revision {}: {} candidates",
            world.revision(),
            self.candidates.len()
        );
    }

    /// Recompute the collision list around the observer's cell.
    pub fn refresh_colliders(&mut self, camera: &Camera) {
        let origin = camera.cell();
        self.colliders.clear();
        for candidate in &self.candidates {
            if in_collision_range(candidate.position, origin) {
                self.colliders.push(candidate.position);
            }
        }
    }

    /// Per-frame filter: render radius, view cone and block cap, then sort
    /// farthest first. Also refreshes the collision list from the blocks
    /// inside the render radius.
    pub fn collect(&mut self, camera: &Camera, config: &RenderConfig) -> usize {
        let eye = camera.eye();
        let forward = camera.forward();
        let origin = camera.cell();
        let radius_sq = config.radius * config.radius;

        self.render.clear();
        self.colliders.clear();

        for candidate in &self.candidates {
            let center = candidate.position.as_vec3() + Vec3::splat(0.5);
            let offset = center - eye + Vec3::splat(1e-5);
            let distance_sq = offset.length_squared();
            if distance_sq > radius_sq {
                continue;
            }

            if in_collision_range(candidate.position, origin) {
                self.colliders.push(candidate.position);
            }

            if offset.normalize_or_zero().dot(forward) <= config.view_cone {
                continue;
            }

            self.render.push(RenderBlock {
                position: candidate.position,
                faces: candidate.faces,
                mesh: BlockMesh::Cube,
                distance_sq,
            });
        }

        // Over the cap: keep the nearest.
        if self.render.len() > config.max_blocks {
            let cap = config.max_blocks;
            if cap > 0 {
                self.render
                    .select_nth_unstable_by(cap - 1, |a, b| a.distance_sq.total_cmp(&b.distance_sq));
            }
            self.render.truncate(cap);
        }

        self.render
            .sort_by(|a, b| b.distance_sq.total_cmp(&a.distance_sq));
        self.render.len()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Blocks to draw this frame, farthest first.
    pub fn render_list(&self) -> &[RenderBlock] {
        &self.render
    }

    pub fn colliders(&self) -> &CollisionList {
        &self.colliders
    }
}
