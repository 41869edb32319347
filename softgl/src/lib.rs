//! Just enough of a GL-style pipeline to run the coursework demos in a
//! terminal: a framebuffer with depth, a shaded triangle rasterizer, vertex
//! arrays, a braille "window", and PPM capture.

pub mod app;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod logging;
pub mod mesh;
pub mod raster;
pub mod screenshot;
pub mod shader;
pub mod terminal;

pub use app::{run, Demo, Frame};
pub use config::{NoExtras, Settings};
pub use error::{Error, Result};
pub use framebuffer::{Framebuffer, Pixel};
pub use mesh::VertexArray;
pub use raster::{ClearMask, Context};
pub use shader::{ColorVertex, FlatShader, Shader, VertexColorShader};

/// Clear color shared by the demos.
pub const BACKGROUND: glam::Vec3 = glam::Vec3::new(0.3, 0.4, 0.5);
