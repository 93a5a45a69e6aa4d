/// Observer movement: input acceleration, gravity, friction and per-axis
/// collision against the nearby solid blocks.
use crate::camera::Camera;
use crate::error::ConfigError;
use crate::input::Buttons;
use crate::rendering::CollisionList;
use glam::{IVec3, Vec3};

/// Axis-aligned player body relative to the camera position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBox {
    pub half_width: f32,
    pub half_depth: f32,
    /// Extent above the position.
    pub above: f32,
    /// Extent below the position.
    pub below: f32,
}

impl Default for PlayerBox {
    fn default() -> Self {
        Self {
            half_width: 0.3,
            half_depth: 0.3,
            above: 0.5,
            below: 1.0,
        }
    }
}

impl PlayerBox {
    #[inline]
    pub fn bounds(&self, position: Vec3) -> (Vec3, Vec3) {
        (
            position - Vec3::new(self.half_width, self.below, self.half_depth),
            position + Vec3::new(self.half_width, self.above, self.half_depth),
        )
    }

    /// Strict overlap with the unit cube at `cell`; touching is not overlap.
    #[inline]
    pub fn overlaps(&self, position: Vec3, cell: IVec3) -> bool {
        let (min, max) = self.bounds(position);
        let cell_min = cell.as_vec3();
        let cell_max = cell_min + Vec3::ONE;
        min.cmplt(cell_max).all() && max.cmpgt(cell_min).all()
    }
}

#[derive(Debug, Clone)]
pub struct MovementConfig {
    /// Horizontal acceleration per tick while walking.
    pub accel: f32,
    /// Radians per tick for turning and aiming.
    pub turn_speed: f32,
    pub jump_impulse: f32,
    /// Horizontal velocity multiplier applied on jump.
    pub jump_boost: f32,
    /// Horizontal velocity is divided by this every tick.
    pub friction: f32,
    pub gravity: f32,
    pub max_fall: f32,
    pub max_horizontal: f32,
    pub body: PlayerBox,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            accel: 0.03,
            turn_speed: 0.1,
            jump_impulse: 0.3,
            jump_boost: 3.2,
            friction: 1.5,
            gravity: 0.03,
            max_fall: 1.5,
            max_horizontal: 2.0,
            body: PlayerBox::default(),
        }
    }
}

impl MovementConfig {
    /// Every value must be finite. Friction below 1 would grow velocity
    /// instead of damping it; negative gravity or limits invert the clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let body = &self.body;
        let checks = [
            ("accel", self.accel, self.accel.is_finite()),
            ("turn_speed", self.turn_speed, self.turn_speed.is_finite()),
            ("jump_impulse", self.jump_impulse, self.jump_impulse.is_finite()),
            ("jump_boost", self.jump_boost, self.jump_boost.is_finite()),
            ("friction", self.friction, self.friction.is_finite() && self.friction >= 1.0),
            ("gravity", self.gravity, self.gravity.is_finite() && self.gravity >= 0.0),
            ("max_fall", self.max_fall, self.max_fall.is_finite() && self.max_fall >= 0.0),
            (
                "max_horizontal",
                self.max_horizontal,
                self.max_horizontal.is_finite() && self.max_horizontal >= 0.0,
            ),
            (
                "body.half_width",
                body.half_width,
                body.half_width.is_finite() && body.half_width > 0.0,
            ),
            (
                "body.half_depth",
                body.half_depth,
                body.half_depth.is_finite() && body.half_depth > 0.0,
            ),
            ("body.above", body.above, body.above.is_finite() && body.above >= 0.0),
            ("body.below", body.below, body.below.is_finite() && body.below >= 0.0),
        ];
        match checks.into_iter().find(|&(_, _, ok)| !ok) {
            Some((field, value, _)) => Err(ConfigError::InvalidMovement { field, value }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Movement {
    pub config: MovementConfig,
    pub velocity: Vec3,
    pub grounded: bool,
}

impl Movement {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            velocity: Vec3::ZERO,
            grounded: false,
        }
    }

    /// One tick of movement.
    pub fn step(&mut self, camera: &mut Camera, buttons: Buttons, colliders: &CollisionList) {
        let cfg = &self.config;

        if buttons.contains(Buttons::JUMP) && self.grounded {
            self.velocity.y = cfg.jump_impulse;
            self.velocity.x *= cfg.jump_boost;
            self.velocity.z *= cfg.jump_boost;
            self.grounded = false;
        }

        let aiming = buttons.contains(Buttons::AIM);
        if !aiming {
            let heading = camera.heading();
            if buttons.contains(Buttons::UP) {
                self.velocity += heading * cfg.accel;
            }
            if buttons.contains(Buttons::DOWN) {
                self.velocity -= heading * cfg.accel;
            }
        }
        let limit = cfg.max_horizontal;
        self.velocity.x = self.velocity.x.clamp(-limit, limit);
        self.velocity.z = self.velocity.z.clamp(-limit, limit);

        let mut d_yaw = 0.0;
        let mut d_pitch = 0.0;
        if buttons.contains(Buttons::LEFT) {
            d_yaw -= cfg.turn_speed;
        }
        if buttons.contains(Buttons::RIGHT) {
            d_yaw += cfg.turn_speed;
        }
        if aiming {
            if buttons.contains(Buttons::UP) {
                d_pitch += cfg.turn_speed;
            }
            if buttons.contains(Buttons::DOWN) {
                d_pitch -= cfg.turn_speed;
            }
        }
        camera.rotate(d_yaw, d_pitch);

        self.resolve(&mut camera.position, colliders);

        let cfg = &self.config;
        self.velocity.x /= cfg.friction;
        self.velocity.z /= cfg.friction;
        self.velocity.y = (self.velocity.y - cfg.gravity).max(-cfg.max_fall);
    }

    /// Move along Y, then X, then Z. Each axis is undone and zeroed on the
    /// first overlap; a vertical hit while not rising grounds the body.
    pub fn resolve(&mut self, position: &mut Vec3, colliders: &CollisionList) {
        let body = self.config.body;
        self.grounded = false;

        for axis in [1usize, 0, 2] {
            let delta = self.velocity[axis];
            position[axis] += delta;

            if colliders.iter().any(|cell| body.overlaps(*position, cell)) {
                position[axis] -= delta;
                if axis == 1 && delta <= 0.0 {
                    self.grounded = true;
                }
                self.velocity[axis] = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;

    fn camera_at(position: Vec3) -> Camera {
        let mut camera = Camera::new(&CameraConfig::default());
        camera.position = position;
        camera
    }

    #[test]
    fn zero_friction_fails_validation() {
        assert!(MovementConfig::default().validate().is_ok());
        let cfg = MovementConfig {
            friction: 0.0,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidMovement {
                field: "friction",
                value: 0.0
            })
        );
        let cfg = MovementConfig {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn box_overlap_is_strict() {
        let body = PlayerBox::default();
        // Feet exactly on top of the block at y = 0.
        assert!(!body.overlaps(Vec3::new(0.5, 2.0, 0.5), IVec3::ZERO));
        assert!(body.overlaps(Vec3::new(0.5, 1.99, 0.5), IVec3::ZERO));
        assert!(!body.overlaps(Vec3::new(1.3, 1.5, 0.5), IVec3::ZERO));
    }

    #[test]
    fn falls_without_ground() {
        let mut movement = Movement::default();
        let mut camera = camera_at(Vec3::new(0.5, 10.0, 0.5));
        let colliders = CollisionList::default();
        for _ in 0..5 {
            movement.step(&mut camera, Buttons::empty(), &colliders);
            assert!(!movement.grounded);
        }
        assert!(camera.position.y < 10.0);
        assert!(movement.velocity.y < 0.0);
    }

    #[test]
    fn lands_on_block_below() {
        let mut movement = Movement::default();
        let mut camera = camera_at(Vec3::new(0.5, 2.02, 0.5));
        let mut colliders = CollisionList::default();
        colliders.push(IVec3::ZERO);
        movement.velocity.y = -0.1;
        movement.step(&mut camera, Buttons::empty(), &colliders);
        assert!(movement.grounded);
        assert!((camera.position.y - 2.02).abs() < 1e-5);
        assert!(movement.velocity.y <= 0.0 && movement.velocity.y >= -0.03 - 1e-6);
    }

    #[test]
    fn jump_requires_ground() {
        let mut movement = Movement::default();
        let mut camera = camera_at(Vec3::new(0.5, 10.0, 0.5));
        let colliders = CollisionList::default();
        movement.step(&mut camera, Buttons::JUMP, &colliders);
        assert!(movement.velocity.y < 0.0);

        movement.grounded = true;
        movement.velocity = Vec3::ZERO;
        movement.step(&mut camera, Buttons::JUMP, &colliders);
        assert!(movement.velocity.y > 0.0);
    }

    #[test]
    fn walking_follows_heading_and_is_damped() {
        let mut movement = Movement::default();
        let mut camera = camera_at(Vec3::new(0.5, 10.0, 0.5));
        let colliders = CollisionList::default();
        movement.step(&mut camera, Buttons::UP, &colliders);
        assert!(movement.velocity.z > 0.0);
        assert!((movement.velocity.z - 0.03 / 1.5).abs() < 1e-6);
        assert!(movement.velocity.x.abs() < 1e-6);
    }

    #[test]
    fn aim_pitches_instead_of_walking() {
        let mut movement = Movement::default();
        let mut camera = camera_at(Vec3::new(0.5, 10.0, 0.5));
        let colliders = CollisionList::default();
        movement.step(&mut camera, Buttons::UP | Buttons::AIM, &colliders);
        assert!(camera.pitch > 0.0);
        assert_eq!(movement.velocity.z, 0.0);
    }
}
