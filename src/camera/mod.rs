/// First-person camera: body position, yaw/pitch/roll angles and the
/// per-frame view transform used by culling, rasterization and the aim ray.
use crate::error::ConfigError;
use crate::math::{self, Rotation};
use crate::voxel::world_to_chunk_pos;
use glam::{IVec2, IVec3, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Projection scale in pixels at unit depth.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Eye offset above the body position.
    pub eye_height: f32,
    pub spawn: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 90.0,
            near: 0.1,
            far: 100.0,
            eye_height: 0.7,
            spawn: Vec3::new(3.5, 16.0, 3.5),
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.near > 0.0 && self.near < self.far) {
            return Err(ConfigError::InvalidClipRange {
                near: self.near,
                far: self.far,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,   // about Y, radians, kept in [0, TAU)
    pub pitch: f32, // about X, radians, clamped to +-90 degrees
    pub roll: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub eye_height: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: config.spawn,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            fov: config.fov,
            near: config.near,
            far: config.far,
            eye_height: config.eye_height,
        }
    }

    /// Unit view direction from yaw and pitch. Yaw 0 looks down +Z.
    pub fn forward(&self) -> Vec3 {
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cp * sy, sp, cp * cy)
    }

    /// Horizontal walking direction (forward with pitch dropped).
    pub fn heading(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(sy, 0.0, cy)
    }

    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.position + Vec3::Y * self.eye_height
    }

    /// Chunk containing the body position.
    #[inline]
    pub fn chunk_coord(&self) -> IVec3 {
        world_to_chunk_pos(self.position)
    }

    /// Integer cell containing the body position.
    #[inline]
    pub fn cell(&self) -> IVec3 {
        self.position.floor().as_ivec3()
    }

    /// Apply angle deltas; yaw wraps, pitch clamps to straight up/down.
    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw = (self.yaw + d_yaw).rem_euclid(TAU);
        self.pitch = (self.pitch + d_pitch).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Freeze the transform for one frame of drawing.
    pub fn view(&self, width: i32, height: i32) -> CameraView {
        CameraView {
            eye: self.eye(),
            rotation: Rotation::inverse_of(self.yaw, self.pitch, self.roll),
            fov: self.fov,
            near: self.near,
            far: self.far,
            width,
            height,
        }
    }
}

/// Per-frame view transform: sines and cosines evaluated once.
#[derive(Debug, Clone, Copy)]
pub struct CameraView {
    pub eye: Vec3,
    pub rotation: Rotation,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub width: i32,
    pub height: i32,
}

impl CameraView {
    /// World point to camera space; the view direction becomes +Z.
    #[inline]
    pub fn to_camera_space(&self, world: Vec3) -> Vec3 {
        math::rotate(world - self.eye, &self.rotation)
    }

    #[inline]
    pub fn project(&self, camera_space: Vec3) -> IVec2 {
        math::project(camera_space, self.fov, self.near, self.width, self.height)
    }

    /// Screen position of a world point, or None when it is behind the
    /// near plane.
    pub fn project_world(&self, world: Vec3) -> Option<IVec2> {
        let v = self.to_camera_space(world);
        (v.z >= self.near).then(|| self.project(v))
    }

    #[inline]
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.width / 2, self.height / 2)
    }
}
