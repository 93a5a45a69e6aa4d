/// Software rasterizer using scanline algorithm
/// Painter's order, no depth buffer: callers submit far-to-near.
use super::framebuffer::PixelTarget;
use super::shading::ShadingConfig;
use crate::camera::CameraView;
use crate::math::{rotate_object, signed_area2};
use crate::meshing::{FaceMask, Mesh};
use glam::{IVec2, Vec3};

/// Fractional bits of the scanline edge walker.
const FIXED_SHIFT: u32 = 16;

/// Result of clipping one triangle against the near plane: zero, one or
/// two triangles, stored inline.
#[derive(Copy, Clone, Debug)]
pub struct ClipResult {
    pub count: usize,
    pub tris: [[Vec3; 3]; 2],
}

impl ClipResult {
    pub fn iter(&self) -> impl Iterator<Item = &[Vec3; 3]> {
        self.tris[..self.count].iter()
    }
}

#[inline]
fn intersect_near(a: Vec3, b: Vec3, near: f32) -> Vec3 {
    let t = (near - a.z) / (b.z - a.z);
    a + (b - a) * t
}

/// Clip a camera-space triangle against `z = near`.
///
/// One vertex in front yields (inside, crossing, crossing); two in front
/// yield the clipped quad as two triangles. Orientation is preserved.
pub fn clip_triangle_near(tri: [Vec3; 3], near: f32) -> ClipResult {
    // Sutherland-Hodgman against a single plane: at most 4 output vertices.
    let mut output = [tri[0]; 4];
    let mut out_len = 0usize;

    let mut prev = tri[2];
    let mut prev_inside = prev.z >= near;

    for &curr in tri.iter() {
        let curr_inside = curr.z >= near;

        match (prev_inside, curr_inside) {
            (true, true) => {
                output[out_len] = curr;
                out_len += 1;
            }
            (true, false) => {
                output[out_len] = intersect_near(prev, curr, near);
                out_len += 1;
            }
            (false, true) => {
                output[out_len] = intersect_near(prev, curr, near);
                out_len += 1;
                output[out_len] = curr;
                out_len += 1;
            }
            (false, false) => {}
        }

        prev = curr;
        prev_inside = curr_inside;
    }

    let mut tris = [tri; 2];
    let count = match out_len {
        3 => {
            tris[0] = [output[0], output[1], output[2]];
            1
        }
        4 => {
            tris[0] = [output[0], output[1], output[2]];
            tris[1] = [output[0], output[2], output[3]];
            2
        }
        _ => 0,
    };

    ClipResult { count, tris }
}

/// Projected triangles after clipping, wound so the signed area is >= 0.
#[derive(Copy, Clone, Debug, Default)]
pub struct ScreenTriangles {
    pub count: usize,
    pub tris: [[IVec2; 3]; 2],
}

impl ScreenTriangles {
    pub fn iter(&self) -> impl Iterator<Item = &[IVec2; 3]> {
        self.tris[..self.count].iter()
    }
}

/// Object placement applied to mesh vertices before the camera transform.
#[derive(Copy, Clone, Debug)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Placement {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    pub fn apply(&self, local: Vec3) -> Vec3 {
        self.position + rotate_object(local, self.rotation, self.scale)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DrawStyle {
    /// Dithered fill shaded per face, then outlined.
    Shaded,
    /// Edges only.
    Wire(u32),
}

/// Per-frame rasterizer counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RasterStats {
    pub triangles_submitted: u32,
    pub triangles_culled: u32,
    pub triangles_clipped_away: u32,
    pub triangles_split: u32,
    pub triangles_drawn: u32,
}

pub struct Rasterizer {
    pub backface_culling: bool,
    pub shading: ShadingConfig,
    pub stats: RasterStats,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            backface_culling: true,
            shading: ShadingConfig::default(),
            stats: RasterStats::default(),
        }
    }

    pub fn take_stats(&mut self) -> RasterStats {
        std::mem::take(&mut self.stats)
    }

    /// Camera-space triangle faces the viewer. The eye sits at the origin,
    /// so the test is the sign of the normal against any vertex.
    #[inline]
    pub fn is_front_facing(tri: &[Vec3; 3]) -> bool {
        let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
        normal.dot(tri[0]) < 0.0
    }

    /// Clip and project a camera-space triangle, fixing up the winding.
    pub fn screen_triangles(&mut self, view: &CameraView, tri: [Vec3; 3]) -> ScreenTriangles {
        let clipped = clip_triangle_near(tri, view.near);
        match clipped.count {
            0 => self.stats.triangles_clipped_away += 1,
            2 => self.stats.triangles_split += 1,
            _ => {}
        }

        let mut out = ScreenTriangles::default();
        for cam in clipped.iter() {
            let mut p = [view.project(cam[0]), view.project(cam[1]), view.project(cam[2])];
            if signed_area2(p[0], p[1], p[2]) < 0 {
                p.swap(1, 2);
            }
            out.tris[out.count] = p;
            out.count += 1;
        }
        out
    }

    /// Scanline fill between vertices sorted by y, edges walked in 16.16
    /// fixed point. `color_at` picks the color per pixel.
    pub fn fill_triangle<T: PixelTarget, F: Fn(i32, i32) -> u32>(
        &self,
        target: &mut T,
        tri: [IVec2; 3],
        color_at: F,
    ) {
        let mut v = tri;
        v.sort_by_key(|p| p.y);
        let [v0, v1, v2] = v;

        if v0.y == v2.y {
            return;
        }

        let y_start = v0.y.max(0);
        let y_end = v2.y.min(target.height() - 1);

        let edge_x = |a: IVec2, b: IVec2, y: i32| -> i64 {
            let dy = (b.y - a.y) as i64;
            let dx = ((b.x - a.x) as i64) << FIXED_SHIFT;
            ((a.x as i64) << FIXED_SHIFT) + dx * (y - a.y) as i64 / dy
        };

        for y in y_start..=y_end {
            let long = edge_x(v0, v2, y);
            let short = if y > v1.y || v1.y == v0.y {
                edge_x(v1, v2, y)
            } else {
                edge_x(v0, v1, y)
            };

            let (left, right) = if long < short { (long, short) } else { (short, long) };
            let x0 = (left >> FIXED_SHIFT) as i32;
            let x1 = (right >> FIXED_SHIFT) as i32;
            target.fill_span(y, x0, x1.saturating_add(1), &color_at);
        }
    }

    /// Line between two camera-space points, clipped to the near plane.
    pub fn draw_segment<T: PixelTarget>(
        &self,
        target: &mut T,
        view: &CameraView,
        a: Vec3,
        b: Vec3,
        color: u32,
    ) {
        let near = view.near;
        let (a, b) = match (a.z >= near, b.z >= near) {
            (true, true) => (a, b),
            (true, false) => (a, intersect_near(a, b, near)),
            (false, true) => (intersect_near(a, b, near), b),
            (false, false) => return,
        };
        let pa = view.project(a);
        let pb = view.project(b);
        target.draw_line(pa.x, pa.y, pb.x, pb.y, color);
    }

    /// Line between two world points.
    pub fn draw_world_segment<T: PixelTarget>(
        &self,
        target: &mut T,
        view: &CameraView,
        a: Vec3,
        b: Vec3,
        color: u32,
    ) {
        self.draw_segment(target, view, view.to_camera_space(a), view.to_camera_space(b), color);
    }

    /// Draw a mesh at `placement`. Triangles tied to a face outside `faces`
    /// are skipped; `None` draws every triangle.
    pub fn draw_mesh<T: PixelTarget>(
        &mut self,
        target: &mut T,
        view: &CameraView,
        mesh: &Mesh,
        placement: &Placement,
        faces: Option<FaceMask>,
        style: DrawStyle,
    ) {
        for tri in &mesh.triangles {
            if let (Some(face), Some(mask)) = (tri.face, faces) {
                if !mask.has(face) {
                    continue;
                }
            }
            self.stats.triangles_submitted += 1;

            let local = mesh.triangle_vertices(tri);
            let cam = local.map(|v| view.to_camera_space(placement.apply(v)));

            match style {
                DrawStyle::Shaded => {
                    if self.backface_culling && !Self::is_front_facing(&cam) {
                        self.stats.triangles_culled += 1;
                        continue;
                    }

                    let normal = tri.face.map_or_else(
                        || (local[1] - local[0]).cross(local[2] - local[0]).normalize_or_zero(),
                        |face| face.normal(),
                    );
                    let level = self.shading.face_level(normal);
                    let shading = self.shading;

                    let screen = self.screen_triangles(view, cam);
                    for p in screen.iter() {
                        self.fill_triangle(target, *p, |x, y| shading.dither_color(x, y, level));
                        self.stats.triangles_drawn += 1;
                    }
                    self.outline(target, view, local, cam, self.shading.outline_color);
                }
                DrawStyle::Wire(color) => {
                    self.outline(target, view, local, cam, color);
                    self.stats.triangles_drawn += 1;
                }
            }
        }
    }

    /// Draw the triangle edges that run along a single local axis, which
    /// leaves out the diagonals splitting quads into triangles.
    fn outline<T: PixelTarget>(
        &self,
        target: &mut T,
        view: &CameraView,
        local: [Vec3; 3],
        cam: [Vec3; 3],
        color: u32,
    ) {
        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            let d = (local[j] - local[i]).abs();
            let axes = [d.x, d.y, d.z].iter().filter(|&&c| c > 1e-6).count();
            if axes == 1 {
                self.draw_segment(target, view, cam[i], cam[j], color);
            }
        }
    }
}
