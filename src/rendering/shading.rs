/// Ordered-dither shading.
/// Kept separate from the rasterizer so the light model can change without
/// touching the fill loop. Every face resolves to one of four 2x2 patterns.
use super::framebuffer::rgb_to_u32;
use glam::Vec3;

/// Highest pattern index.
pub const MAX_LEVEL: u8 = 3;

/// `DITHER[level][y & 1][x & 1]` selects the lit color.
pub const DITHER: [[[bool; 2]; 2]; 4] = [
    [[false, true], [false, false]],
    [[true, false], [false, true]],
    [[true, true], [true, false]],
    [[true, true], [true, true]],
];

/// Directional light and palette.
#[derive(Copy, Clone, Debug)]
pub struct ShadingConfig {
    /// Direction the light is coming from (world space).
    pub light_dir: Vec3,
    /// Pattern level every solid block starts from before face light.
    pub block_level: u8,
    pub lit_color: u32,
    pub unlit_color: u32,
    pub outline_color: u32,
    pub marker_color: u32,
    pub border_color: u32,
    pub text_color: u32,
    pub background: u32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            // Slightly from +X/+Z and above
            light_dir: Vec3::new(0.4, 1.0, 0.3).normalize(),
            block_level: 1,
            lit_color: rgb_to_u32(0xE8, 0xE8, 0xD0),
            unlit_color: rgb_to_u32(0x30, 0x34, 0x40),
            outline_color: rgb_to_u32(0x10, 0x10, 0x18),
            marker_color: rgb_to_u32(0xFF, 0x40, 0x40),
            border_color: rgb_to_u32(0x40, 0xA0, 0xFF),
            text_color: rgb_to_u32(0xFF, 0xFF, 0xFF),
            background: rgb_to_u32(0x70, 0x90, 0xC0),
        }
    }
}

impl ShadingConfig {
    /// Extra pattern levels a face gets from the light: 0 facing away,
    /// up to 2 facing straight into it.
    #[inline]
    pub fn face_light(&self, normal: Vec3) -> u8 {
        let lambert = normal.dot(self.light_dir.normalize_or_zero()).max(0.0);
        (lambert * 2.0).round() as u8
    }

    /// Final pattern level for a face of a block.
    #[inline]
    pub fn face_level(&self, normal: Vec3) -> u8 {
        (self.block_level + self.face_light(normal)).min(MAX_LEVEL)
    }

    /// Color of pixel (x, y) for a pattern level.
    #[inline]
    pub fn dither_color(&self, x: i32, y: i32, level: u8) -> u32 {
        let level = level.min(MAX_LEVEL) as usize;
        if DITHER[level][(y & 1) as usize][(x & 1) as usize] {
            self.lit_color
        } else {
            self.unlit_color
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_monotonic_in_coverage() {
        let counts: Vec<usize> = DITHER
            .iter()
            .map(|p| p.iter().flatten().filter(|&&on| on).count())
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);
    }

    #[test]
    fn faces_away_from_light_are_darker() {
        let shading = ShadingConfig::default();
        assert!(shading.face_level(Vec3::Y) > shading.face_level(Vec3::NEG_Y));
        assert_eq!(shading.face_level(Vec3::NEG_Y), shading.block_level);
        assert!(shading.face_level(Vec3::Y) <= MAX_LEVEL);
    }

    #[test]
    fn full_level_is_solid_lit() {
        let shading = ShadingConfig::default();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(shading.dither_color(x, y, 3), shading.lit_color);
        }
    }
}
