//! Triangle setup and scan conversion.
//!
//! Conventions follow GL: clip space is divided by `w`, NDC x/y in [-1, 1]
//! map onto the whole framebuffer with the origin at the bottom-left, and
//! NDC z maps to depth in [0, 1]. The depth test, when enabled, is `LESS`.

use crate::error::{Error, Result};
use crate::framebuffer::{Framebuffer, Pixel};
use crate::mesh::VertexArray;
use crate::shader::{Shader, Varying};
use glam::{Vec3, Vec4};

const MIN_W: f32 = 1e-5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
}

impl ClearMask {
    pub const COLOR: Self = Self {
        color: true,
        depth: false,
    };
    pub const ALL: Self = Self {
        color: true,
        depth: true,
    };
}

/// Render state plus the framebuffer it draws into.
pub struct Context {
    framebuffer: Framebuffer,
    clear_color: Vec3,
    depth_test: bool,
}

impl Context {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            framebuffer: Framebuffer::new(width, height),
            clear_color: Vec3::ZERO,
            depth_test: false,
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    /// Viewport follows the framebuffer size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.framebuffer.resize(width, height);
    }

    pub fn set_clear_color(&mut self, c: Vec3) {
        self.clear_color = c;
    }

    pub fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    pub fn clear(&mut self, mask: ClearMask) {
        if mask.color {
            self.framebuffer.clear(self.clear_color);
        }
        if mask.depth {
            self.framebuffer.clear_depth();
        }
    }

    /// Draws `count / 3` triangles from consecutive vertices starting at `first`.
    pub fn draw_arrays<S: Shader>(
        &mut self,
        shader: &S,
        vao: &VertexArray<S::Vertex>,
        first: usize,
        count: usize,
    ) -> Result<()> {
        let vertices = vao.vertices();
        let end = first.saturating_add(count);
        if end > vertices.len() {
            return Err(Error::VertexRange {
                first,
                end,
                len: vertices.len(),
            });
        }
        for tri in vertices[first..end].chunks_exact(3) {
            self.triangle(shader, [&tri[0], &tri[1], &tri[2]]);
        }
        Ok(())
    }

    /// Draws `count / 3` triangles through the element buffer.
    pub fn draw_elements<S: Shader>(
        &mut self,
        shader: &S,
        vao: &VertexArray<S::Vertex>,
        count: usize,
    ) -> Result<()> {
        let indices = vao.indices().ok_or(Error::NoElementBuffer)?;
        if count > indices.len() {
            return Err(Error::ElementRange {
                count,
                len: indices.len(),
            });
        }
        let vertices = vao.vertices();
        let indices = &indices[..count];
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(Error::IndexOutOfRange {
                index,
                len: vertices.len(),
            });
        }
        for tri in indices.chunks_exact(3) {
            self.triangle(
                shader,
                [
                    &vertices[tri[0] as usize],
                    &vertices[tri[1] as usize],
                    &vertices[tri[2] as usize],
                ],
            );
        }
        Ok(())
    }

    fn triangle<S: Shader>(&mut self, shader: &S, tri: [&S::Vertex; 3]) {
        let fb = &mut self.framebuffer;
        let (w, h) = (fb.width(), fb.height());
        if w == 0 || h == 0 {
            return;
        }

        let stage = tri.map(|v| shader.vertex(v));
        let clip: [Vec4; 3] = [stage[0].0, stage[1].0, stage[2].0];
        // No near-plane clipping: anything touching the eye plane is dropped.
        if clip.iter().any(|c| c.w <= MIN_W) {
            return;
        }

        let win = clip.map(|c| {
            let ndc = c.truncate() / c.w;
            Vec3::new(
                (ndc.x + 1.0) * 0.5 * w as f32,
                (ndc.y + 1.0) * 0.5 * h as f32,
                (ndc.z + 1.0) * 0.5,
            )
        });

        let area = edge(win[0], win[1], win[2].x, win[2].y);
        if area.abs() < 1e-9 {
            return;
        }

        let min_x = win.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = win.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = win.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = win.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        if max_x < 0.0 || max_y < 0.0 || min_x >= w as f32 || min_y >= h as f32 {
            return;
        }
        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = (max_x.ceil() as u32).min(w - 1);
        let y1 = (max_y.ceil() as u32).min(h - 1);

        let inv_w = clip.map(|c| 1.0 / c.w);

        for py in y0..=y1 {
            for px in x0..=x1 {
                let sx = px as f32 + 0.5;
                let sy = py as f32 + 0.5;
                let b0 = edge(win[1], win[2], sx, sy) / area;
                let b1 = edge(win[2], win[0], sx, sy) / area;
                let b2 = 1.0 - b0 - b1;
                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    continue;
                }

                let z = b0 * win[0].z + b1 * win[1].z + b2 * win[2].z;
                if !(0.0..=1.0).contains(&z) {
                    continue;
                }

                let i = fb.idx(px, py);
                if self.depth_test && z >= fb.depth_at(i) {
                    continue;
                }

                let pw = [b0 * inv_w[0], b1 * inv_w[1], b2 * inv_w[2]];
                let norm = pw[0] + pw[1] + pw[2];
                let weights = [pw[0] / norm, pw[1] / norm, pw[2] / norm];
                let var = <S::Varying as Varying>::blend(
                    &stage[0].1,
                    &stage[1].1,
                    &stage[2].1,
                    weights,
                );

                let color = shader.fragment(&var);
                fb.write(i, Pixel::from_color(color), self.depth_test.then_some(z));
            }
        }
    }
}

fn edge(a: Vec3, b: Vec3, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}
