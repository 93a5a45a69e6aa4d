/// Pixel sinks for the software renderer.
/// The pipeline only ever talks to `PixelTarget`; hosts supply the real
/// surface, tests and benches use the in-memory `Framebuffer`.

/// Host drawing primitives. Coordinates may lie off-screen; implementations
/// drop those pixels.
pub trait PixelTarget {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    /// Plot one pixel. Out-of-bounds coordinates are ignored.
    fn set_pixel(&mut self, x: i32, y: i32, color: u32);

    /// Horizontal run `[x0, x1)` on row `y`, colored per pixel.
    #[inline]
    fn fill_span<F: Fn(i32, i32) -> u32>(&mut self, y: i32, x0: i32, x1: i32, color_at: F)
    where
        Self: Sized,
    {
        if y < 0 || y >= self.height() {
            return;
        }
        let start = x0.max(0);
        let end = x1.min(self.width());
        for x in start..end {
            self.set_pixel(x, y, color_at(x, y));
        }
    }

    /// Bresenham line, endpoints inclusive, clipped to the target first.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let Some((mut x, mut y, x1, y1)) = clip_line(x0, y0, x1, y1, self.width(), self.height())
        else {
            return;
        };

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw a line of text with its top-left corner at (x, y).
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: u32);
}

/// Liang-Barsky clip of a segment to `[0, w) x [0, h)`.
fn clip_line(x0: i32, y0: i32, x1: i32, y1: i32, w: i32, h: i32) -> Option<(i32, i32, i32, i32)> {
    if w <= 0 || h <= 0 {
        return None;
    }
    let (fx, fy) = (x0 as f64, y0 as f64);
    let (dx, dy) = (x1 as f64 - fx, y1 as f64 - fy);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    for (p, q) in [
        (-dx, fx),
        (dx, (w - 1) as f64 - fx),
        (-dy, fy),
        (dy, (h - 1) as f64 - fy),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (fx + t0 * dx).round() as i32,
        (fy + t0 * dy).round() as i32,
        (fx + t1 * dx).round() as i32,
        (fy + t1 * dy).round() as i32,
    ))
}

/// Text submitted to a `Framebuffer`; glyph rendering is up to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub x: i32,
    pub y: i32,
    pub text: String,
    pub color: u32,
}

pub struct Framebuffer {
    pub width: usize,
    pub height: usize,
    pub color_buffer: Vec<u32>, // ARGB format
    pub text: Vec<TextLine>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            color_buffer: vec![0; width * height],
            text: Vec::new(),
        }
    }

    /// Clear color buffer and drop queued text.
    pub fn clear(&mut self, clear_color: u32) {
        self.color_buffer.fill(clear_color);
        self.text.clear();
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.color_buffer[y * self.width + x])
    }

    /// Number of pixels not equal to `background`.
    pub fn count_non(&self, background: u32) -> usize {
        self.color_buffer.iter().filter(|&&c| c != background).count()
    }
}

impl PixelTarget for Framebuffer {
    #[inline]
    fn width(&self) -> i32 {
        self.width as i32
    }

    #[inline]
    fn height(&self) -> i32 {
        self.height as i32
    }

    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.color_buffer[y as usize * self.width + x as usize] = color;
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: u32) {
        self.text.push(TextLine {
            x,
            y,
            text: text.to_owned(),
            color,
        });
    }
}

/// Convert RGB to ARGB u32
#[inline]
pub const fn rgb_to_u32(r: u8, g: u8, b: u8) -> u32 {
    0xFF000000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}
