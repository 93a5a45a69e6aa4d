/// Geometry kernel: composable axis rotations and perspective projection.
/// Pure functions over glam vectors; vector add/scale/dot come straight from glam.
use glam::{IVec2, Vec3};

/// Precomputed sines and cosines for a yaw/pitch/roll rotation.
///
/// The camera evaluates these once per frame; every vertex transform
/// afterwards is six multiplies per stage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rotation {
    pub yaw_sin: f32,
    pub yaw_cos: f32,
    pub pitch_sin: f32,
    pub pitch_cos: f32,
    pub roll_sin: f32,
    pub roll_cos: f32,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        yaw_sin: 0.0,
        yaw_cos: 1.0,
        pitch_sin: 0.0,
        pitch_cos: 1.0,
        roll_sin: 0.0,
        roll_cos: 1.0,
    };

    /// Rotation that takes world-relative offsets into view space for a
    /// camera with the given angles (radians). Angles are negated so the
    /// camera's forward vector lands on +Z.
    pub fn inverse_of(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self {
            yaw_sin: -yaw.sin(),
            yaw_cos: yaw.cos(),
            pitch_sin: -pitch.sin(),
            pitch_cos: pitch.cos(),
            roll_sin: -roll.sin(),
            roll_cos: roll.cos(),
        }
    }
}

/// Rotate `v` by yaw (about Y), then pitch (about X), then roll (about Z),
/// each stage a plain 2D rotation of two components.
#[inline]
pub fn rotate(v: Vec3, r: &Rotation) -> Vec3 {
    // yaw: XZ plane
    let x1 = v.z * r.yaw_sin + v.x * r.yaw_cos;
    let z1 = v.z * r.yaw_cos - v.x * r.yaw_sin;

    // pitch: ZY plane
    let y2 = z1 * r.pitch_sin + v.y * r.pitch_cos;
    let z2 = z1 * r.pitch_cos - v.y * r.pitch_sin;

    // roll: XY plane
    let x3 = x1 * r.roll_cos - y2 * r.roll_sin;
    let y3 = x1 * r.roll_sin + y2 * r.roll_cos;

    Vec3::new(x3, y3, z2)
}

/// Object-local transform: scale, then rotate about X, Y and Z in turn.
/// Used to place mesh vertices before the camera transform.
#[inline]
pub fn rotate_object(v: Vec3, angles: Vec3, scale: Vec3) -> Vec3 {
    let v = v * scale;
    if angles == Vec3::ZERO {
        return v;
    }

    let (sx, cx) = angles.x.sin_cos();
    let (sy, cy) = angles.y.sin_cos();
    let (sz, cz) = angles.z.sin_cos();

    let x1 = v.x;
    let y1 = v.y * cx - v.z * sx;
    let z1 = v.y * sx + v.z * cx;

    let x2 = x1 * cy + z1 * sy;
    let y2 = y1;
    let z2 = -x1 * sy + z1 * cy;

    Vec3::new(x2 * cz - y2 * sz, x2 * sz + y2 * cz, z2)
}

/// Project a view-space point to integer pixel coordinates.
///
/// Z is floored to `near` so points at or behind the eye never divide by
/// zero; callers that care clip against the near plane first.
#[inline]
pub fn project(v: Vec3, fov: f32, near: f32, width: i32, height: i32) -> IVec2 {
    let z = v.z.max(near);
    let scale = fov / z;

    let px = v.x * scale + (width / 2) as f32;
    let py = -v.y * scale + (height / 2) as f32;

    IVec2::new(saturate_i32(px), saturate_i32(py))
}

/// Twice the signed area of a 2D triangle in screen space.
/// Positive when the vertices run clockwise on screen (Y down).
#[inline]
pub fn signed_area2(a: IVec2, b: IVec2, c: IVec2) -> i64 {
    let abx = (b.x - a.x) as i64;
    let aby = (b.y - a.y) as i64;
    let acx = (c.x - a.x) as i64;
    let acy = (c.y - a.y) as i64;
    abx * acy - aby * acx
}

// Float-to-int cast that keeps projected coordinates well inside i32 so later
// fixed-point scanline math cannot overflow.
#[inline]
fn saturate_i32(v: f32) -> i32 {
    const LIMIT: f32 = 1_000_000.0;
    v.clamp(-LIMIT, LIMIT) as i32
}
