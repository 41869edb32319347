use glam::Vec3;

/// One framebuffer texel. `a == 0` marks background left by `clear`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub fn from_color(c: Vec3) -> Self {
        Self::with_alpha(c, 255)
    }

    pub(crate) fn with_alpha(c: Vec3, a: u8) -> Self {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        Self {
            r: to_u8(c.x),
            g: to_u8(c.y),
            b: to_u8(c.z),
            a,
        }
    }
}

/// Color + depth storage. Row 0 is the bottom row, as with a GL default framebuffer.
pub struct Framebuffer {
    width: u32,
    height: u32,
    color: Vec<Pixel>,
    depth: Vec<f32>,
    background: Pixel,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let n = (width as usize) * (height as usize);
        Self {
            width,
            height,
            color: vec![Pixel::default(); n],
            depth: vec![1.0; n],
            background: Pixel::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    /// Color of the last `clear`, used by presenters for uncovered cells.
    pub fn background(&self) -> Pixel {
        self.background
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self {
            background: self.background,
            ..Self::new(width, height)
        };
    }

    pub fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub fn clear(&mut self, color: Vec3) {
        self.background = Pixel::with_alpha(color, 0);
        self.color.fill(self.background);
    }

    pub fn clear_depth(&mut self) {
        self.depth.fill(1.0);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.color[self.idx(x, y)])
    }

    pub fn depth(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depth[self.idx(x, y)])
    }

    pub fn put(&mut self, x: u32, y: u32, p: Pixel) {
        if x < self.width && y < self.height {
            let i = self.idx(x, y);
            self.color[i] = p;
        }
    }

    pub(crate) fn depth_at(&self, i: usize) -> f32 {
        self.depth[i]
    }

    pub(crate) fn write(&mut self, i: usize, p: Pixel, depth: Option<f32>) {
        self.color[i] = p;
        if let Some(z) = depth {
            self.depth[i] = z;
        }
    }

    /// Tightly packed RGB bytes, bottom row first (`glReadPixels` order).
    pub fn read_pixels(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.color.len() * 3);
        for p in &self.color {
            out.extend_from_slice(&[p.r, p.g, p.b]);
        }
        out
    }
}
