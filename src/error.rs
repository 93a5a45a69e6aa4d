/// Configuration errors.
/// The per-frame pipeline never fails; these are only reported when a config
/// is checked up front.

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("terrain bounds select no chunks (horizontal {horizontal}, vertical {vertical})")]
    EmptyTerrainBounds { horizontal: i32, vertical: i32 },
    #[error("terrain height range is inverted: min {min} > max {max}")]
    InvertedHeightRange { min: i32, max: i32 },
    #[error("terrain frequency must be positive and finite, got {0}")]
    InvalidFrequency(f64),
    #[error("chunk window radius must be at least 1, got {0}")]
    WindowTooSmall(i32),
    #[error("screen size {width}x{height} is empty")]
    EmptyScreen { width: i32, height: i32 },
    #[error("near plane {near} must be positive and below far plane {far}")]
    InvalidClipRange { near: f32, far: f32 },
    #[error("render radius must be positive, got {0}")]
    InvalidRenderRadius(f32),
    #[error("movement setting `{field}` is out of range: {value}")]
    InvalidMovement { field: &'static str, value: f32 },
}
