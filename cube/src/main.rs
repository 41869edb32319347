use anyhow::Result;
use crossterm::event::KeyCode;
use glam::{Mat4, Vec3};
use softgl::{mesh, ClearMask, Context, Demo, FlatShader, Frame, NoExtras, Settings, VertexArray};

const CUBE_COLOR: Vec3 = Vec3::new(0.9, 0.8, 0.7);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum View {
    /// Corners go straight to clip space; the front face covers the screen.
    Raw,
    Oblique,
}

struct Cube {
    view: View,
    vao: VertexArray<Vec3>,
}

fn oblique(aspect: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(0.45 / aspect.max(1e-3), 0.45, 0.45))
        * Mat4::from_rotation_x(25f32.to_radians())
        * Mat4::from_rotation_y(-35f32.to_radians())
}

impl Demo for Cube {
    type Extra = NoExtras;
    const NAME: &'static str = "cube";

    fn new(_: &Settings) -> Result<Self> {
        Ok(Self {
            view: View::Oblique,
            vao: mesh::indexed_cube(),
        })
    }

    fn setup(&mut self, gl: &mut Context) -> Result<()> {
        gl.set_clear_color(softgl::BACKGROUND);
        Ok(())
    }

    fn key(&mut self, code: KeyCode) -> Result<()> {
        if let KeyCode::Char('v') | KeyCode::Char('V') = code {
            self.view = match self.view {
                View::Raw => View::Oblique,
                View::Oblique => View::Raw,
            };
            log::info!("view {:?}", self.view);
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        frame.gl.clear(ClearMask::COLOR);
        let mvp = match self.view {
            View::Raw => Mat4::IDENTITY,
            View::Oblique => oblique(frame.gl.framebuffer().aspect()),
        };
        let shader = FlatShader {
            mvp,
            color: CUBE_COLOR,
        };
        frame.gl.draw_elements(&shader, &self.vao, mesh::CUBE_VERTEX_COUNT)?;
        Ok(())
    }

    fn status(&self) -> String {
        format!("cube ({:?})  [v] view  [p] capture  [q] quit", self.view)
    }
}

fn main() -> Result<()> {
    softgl::run::<Cube>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(demo: &mut Cube, gl: &mut Context) -> usize {
        demo.draw(&mut Frame {
            gl: &mut *gl,
            elapsed: 0.0,
        })
        .unwrap();
        let fb = gl.framebuffer();
        (0..fb.height())
            .flat_map(|y| (0..fb.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.pixel(x, y).is_some_and(|p| p.a == 255))
            .count()
    }

    #[test]
    fn view_key_toggles_between_oblique_and_raw() {
        let mut demo = Cube::new(&Settings::default()).unwrap();
        let mut gl = Context::new(40, 40);
        demo.setup(&mut gl).unwrap();
        assert_eq!(demo.view, View::Oblique);

        let oblique = render(&mut demo, &mut gl);
        assert!(oblique > 0 && oblique < 40 * 40, "{oblique}");
        assert_eq!(gl.framebuffer().pixel(20, 20).map(|p| p.a), Some(255));
        assert_eq!(gl.framebuffer().pixel(0, 0).map(|p| p.a), Some(0));

        demo.key(KeyCode::Char('v')).unwrap();
        assert_eq!(demo.view, View::Raw);
        assert_eq!(render(&mut demo, &mut gl), 40 * 40);

        demo.key(KeyCode::Char('v')).unwrap();
        assert_eq!(demo.view, View::Oblique);
        assert_eq!(render(&mut demo, &mut gl), oblique);
    }

    #[test]
    fn other_keys_leave_the_view_alone() {
        let mut demo = Cube::new(&Settings::default()).unwrap();
        demo.key(KeyCode::Char('x')).unwrap();
        assert_eq!(demo.view, View::Oblique);
    }
}
