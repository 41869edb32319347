use anyhow::Result;
use crossterm::event::KeyCode;
use glam::{Mat4, Vec3};
use softgl::{
    mesh, ClearMask, ColorVertex, Context, Demo, Frame, NoExtras, Settings, VertexArray,
    VertexColorShader,
};

const FACE_COLORS: [Vec3; 6] = [
    Vec3::new(0.90, 0.25, 0.20), // front
    Vec3::new(0.25, 0.80, 0.35), // back
    Vec3::new(0.25, 0.45, 0.95), // left
    Vec3::new(0.95, 0.85, 0.25), // right
    Vec3::new(0.30, 0.85, 0.90), // top
    Vec3::new(0.85, 0.35, 0.85), // bottom
];

const DEGREES_PER_SEC: f32 = 50.0;

struct ColorCube {
    vao: VertexArray<ColorVertex>,
    spinning: bool,
    angle: f32,
    last_elapsed: f32,
}

impl ColorCube {
    fn model(&self) -> Mat4 {
        Mat4::from_axis_angle(
            Vec3::new(0.5, 1.0, 0.0).normalize(),
            self.angle.to_radians(),
        )
    }
}

impl Demo for ColorCube {
    type Extra = NoExtras;
    const NAME: &'static str = "colorcube";

    fn new(_: &Settings) -> Result<Self> {
        Ok(Self {
            vao: mesh::colored_cube(FACE_COLORS),
            spinning: true,
            angle: 0.0,
            last_elapsed: 0.0,
        })
    }

    fn setup(&mut self, gl: &mut Context) -> Result<()> {
        gl.set_clear_color(softgl::BACKGROUND);
        gl.set_depth_test(true);
        Ok(())
    }

    fn key(&mut self, code: KeyCode) -> Result<()> {
        if code == KeyCode::Char(' ') {
            self.spinning = !self.spinning;
            log::debug!("spinning: {}", self.spinning);
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        let dt = frame.elapsed - self.last_elapsed;
        self.last_elapsed = frame.elapsed;
        if self.spinning {
            self.angle = (self.angle + dt * DEGREES_PER_SEC) % 360.0;
        }

        frame.gl.clear(ClearMask::ALL);
        let aspect = frame.gl.framebuffer().aspect();
        let shader = VertexColorShader {
            model: self.model(),
            view: Mat4::from_translation(Vec3::new(0.0, 0.0, -6.0)),
            projection: Mat4::perspective_rh_gl(45f32.to_radians(), aspect, 0.1, 100.0),
            tint: Vec3::ONE,
        };
        frame.gl.draw_arrays(&shader, &self.vao, 0, mesh::CUBE_VERTEX_COUNT)?;
        Ok(())
    }

    fn status(&self) -> String {
        format!(
            "colorcube {:5.1}°  [space] {}  [p] capture  [q] quit",
            self.angle,
            if self.spinning { "pause" } else { "spin" }
        )
    }
}

fn main() -> Result<()> {
    softgl::run::<ColorCube>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_at(demo: &mut ColorCube, gl: &mut Context, elapsed: f32) {
        demo.draw(&mut Frame { gl, elapsed }).unwrap();
    }

    #[test]
    fn renders_with_depth_test() {
        let mut demo = ColorCube::new(&Settings::default()).unwrap();
        let mut gl = Context::new(64, 48);
        demo.setup(&mut gl).unwrap();
        assert!(gl.depth_test());

        draw_at(&mut demo, &mut gl, 0.0);
        let fb = gl.framebuffer();
        assert_eq!(fb.pixel(32, 24).map(|p| p.a), Some(255));
        assert!(fb.depth(32, 24).unwrap() < 1.0);
        assert_eq!(fb.depth(0, 0), Some(1.0));
    }

    #[test]
    fn space_pauses_the_spin() {
        let mut demo = ColorCube::new(&Settings::default()).unwrap();
        let mut gl = Context::new(32, 24);
        demo.setup(&mut gl).unwrap();

        draw_at(&mut demo, &mut gl, 0.0);
        assert_eq!(demo.angle, 0.0);
        draw_at(&mut demo, &mut gl, 1.0);
        assert_eq!(demo.angle, DEGREES_PER_SEC);

        demo.key(KeyCode::Char(' ')).unwrap();
        draw_at(&mut demo, &mut gl, 2.0);
        assert_eq!(demo.angle, DEGREES_PER_SEC);

        // time spent paused is not caught up on resume
        demo.key(KeyCode::Char(' ')).unwrap();
        draw_at(&mut demo, &mut gl, 2.5);
        assert_eq!(demo.angle, DEGREES_PER_SEC * 1.5);
    }
}
