mod clock;
mod orbit;

use anyhow::{Context as _, Result};
use clock::SimClock;
use crossterm::event::KeyCode;
use glam::{Mat4, Vec3};
use orbit::{Body, MoonScale, Pose, SolarSystem};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use softgl::{
    mesh, ClearMask, ColorVertex, Context, Demo, Frame, Pixel, Settings, VertexArray,
    VertexColorShader,
};

const SPACE: Vec3 = Vec3::new(0.02, 0.02, 0.05);
const STAR_COUNT: usize = 160;

const SUN_TINT: Vec3 = Vec3::new(1.0, 0.82, 0.30);
const EARTH_TINT: Vec3 = Vec3::new(0.30, 0.55, 1.0);
const MOON_TINT: Vec3 = Vec3::new(0.78, 0.78, 0.80);

/// Per-face brightness so the spinning cubes read as solids.
const FACE_SHADES: [f32; 6] = [1.0, 0.55, 0.70, 0.85, 0.95, 0.45];

const EYE: Vec3 = Vec3::new(0.0, 38.0, 62.0);

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
struct SolarExtra {
    seed: u64,
    day_warp: f32,
    moon_scale: MoonScale,
}

impl Default for SolarExtra {
    fn default() -> Self {
        Self {
            seed: 0xA11CE_0BEEF,
            day_warp: 1.0,
            moon_scale: MoonScale::Reference,
        }
    }
}

#[derive(Clone, Copy)]
struct Star {
    /// Position in [0, 1) of the framebuffer, so resizes keep the sky.
    u: f32,
    v: f32,
    brightness: f32,
}

fn build_stars(count: usize, seed: u64) -> Vec<Star> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Star {
            u: rng.gen_range(0.0..1.0),
            v: rng.gen_range(0.0..1.0),
            brightness: rng.gen_range(0.35..1.0),
        })
        .collect()
}

struct Solar {
    system: SolarSystem,
    moon_scale: MoonScale,
    clock: SimClock,
    cube: VertexArray<ColorVertex>,
    stars: Vec<Star>,
}

struct Camera {
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    fn looking_at_sun(aspect: f32) -> Self {
        Self {
            view: Mat4::look_at_rh(EYE, Vec3::ZERO, Vec3::Y),
            projection: Mat4::perspective_rh_gl(45f32.to_radians(), aspect, 0.1, 500.0),
        }
    }
}

impl Solar {
    fn draw_stars(&self, gl: &mut Context) {
        let fb = gl.framebuffer_mut();
        let (w, h) = (fb.width() as f32, fb.height() as f32);
        for s in &self.stars {
            let p = Pixel::from_color(Vec3::splat(s.brightness));
            fb.put((s.u * w) as u32, (s.v * h) as u32, p);
        }
    }

    fn draw_body(&self, gl: &mut Context, cam: &Camera, pose: &Pose, tint: Vec3) -> Result<()> {
        let shader = VertexColorShader {
            model: pose.transform,
            view: cam.view,
            projection: cam.projection,
            tint,
        };
        gl.draw_arrays(&shader, &self.cube, 0, mesh::CUBE_VERTEX_COUNT)?;
        Ok(())
    }
}

impl Demo for Solar {
    type Extra = SolarExtra;
    const NAME: &'static str = "solarsystem";

    fn new(settings: &Settings<SolarExtra>) -> Result<Self> {
        let extra = &settings.extra;
        let system =
            SolarSystem::new(extra.moon_scale).context("invalid body constants")?;
        Ok(Self {
            system,
            moon_scale: extra.moon_scale,
            clock: SimClock::new(extra.day_warp),
            cube: mesh::colored_cube(FACE_SHADES.map(Vec3::splat)),
            stars: build_stars(STAR_COUNT, extra.seed),
        })
    }

    fn setup(&mut self, gl: &mut Context) -> Result<()> {
        gl.set_clear_color(SPACE);
        gl.set_depth_test(true);
        Ok(())
    }

    fn key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char(' ') => self.clock.toggle_pause(),
            KeyCode::Char(']') => self.clock.faster(),
            KeyCode::Char('[') => self.clock.slower(),
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.moon_scale = self.moon_scale.toggled();
                self.system.moon = Body::moon(self.moon_scale)?;
                log::info!("moon scale {:?}", self.moon_scale);
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        let gl = &mut *frame.gl;
        gl.clear(ClearMask::ALL);
        self.draw_stars(gl);

        let cam = Camera::looking_at_sun(gl.framebuffer().aspect());

        let poses = self.system.poses(self.clock.day());
        for (pose, tint) in poses.iter().zip([SUN_TINT, EARTH_TINT, MOON_TINT]) {
            self.draw_body(gl, &cam, pose, tint)?;
        }

        self.clock.advance();
        Ok(())
    }

    fn status(&self) -> String {
        format!(
            "day {:8.2}  warp x{}{}  moon {:?}  [space] pause  [ ] warp  [m] moon  [p] capture  [q] quit",
            self.clock.day(),
            self.clock.warp(),
            if self.clock.paused() { " (paused)" } else { "" },
            self.moon_scale,
        )
    }
}

fn main() -> Result<()> {
    softgl::run::<Solar>()
}
