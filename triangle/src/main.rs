use anyhow::Result;
use glam::Vec3;
use softgl::{mesh, ClearMask, Context, Demo, FlatShader, Frame, NoExtras, Settings, VertexArray};

const TRIANGLE_COLOR: Vec3 = Vec3::new(1.0, 0.5, 0.2);

struct Triangle {
    shader: FlatShader,
    vao: VertexArray<Vec3>,
}

impl Demo for Triangle {
    type Extra = NoExtras;
    const NAME: &'static str = "triangle";

    fn new(_: &Settings) -> Result<Self> {
        Ok(Self {
            shader: FlatShader::new(TRIANGLE_COLOR),
            vao: mesh::triangle(),
        })
    }

    fn setup(&mut self, gl: &mut Context) -> Result<()> {
        gl.set_clear_color(softgl::BACKGROUND);
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        frame.gl.clear(ClearMask::COLOR);
        frame.gl.draw_arrays(&self.shader, &self.vao, 0, 3)?;
        Ok(())
    }

    fn status(&self) -> String {
        "triangle  [p] capture  [q] quit".to_string()
    }
}

fn main() -> Result<()> {
    softgl::run::<Triangle>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use softgl::Pixel;

    #[test]
    fn draws_orange_triangle_over_background() {
        let mut demo = Triangle::new(&Settings::default()).unwrap();
        let mut gl = Context::new(100, 100);
        demo.setup(&mut gl).unwrap();
        demo.draw(&mut Frame {
            gl: &mut gl,
            elapsed: 0.0,
        })
        .unwrap();

        let fb = gl.framebuffer();
        assert_eq!(fb.pixel(50, 41), Some(Pixel::from_color(TRIANGLE_COLOR)));
        let bg = Pixel {
            a: 0,
            ..Pixel::from_color(softgl::BACKGROUND)
        };
        assert_eq!(fb.background(), bg);
        for (x, y) in [(0, 0), (99, 0), (0, 99), (99, 99), (50, 95)] {
            assert_eq!(fb.pixel(x, y), Some(bg), "{x},{y}");
        }
    }
}
