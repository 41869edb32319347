//! Vertex/fragment programs run by the rasterizer.
//!
//! A [`Shader`] plays the role of a linked GL program: `vertex` maps one
//! vertex to clip space plus a varying, `fragment` shades one covered pixel
//! from the interpolated varying. Uniforms are plain fields on the shader.

use glam::{Mat4, Vec3, Vec4};

/// Data carried from the vertex stage to the fragment stage.
pub trait Varying: Copy {
    /// Barycentric blend of three varyings; `w` sums to one.
    fn blend(a: &Self, b: &Self, c: &Self, w: [f32; 3]) -> Self;
}

impl Varying for () {
    fn blend(_: &Self, _: &Self, _: &Self, _: [f32; 3]) -> Self {}
}

impl Varying for Vec3 {
    fn blend(a: &Self, b: &Self, c: &Self, w: [f32; 3]) -> Self {
        *a * w[0] + *b * w[1] + *c * w[2]
    }
}

pub trait Shader {
    type Vertex;
    type Varying: Varying;

    fn vertex(&self, v: &Self::Vertex) -> (Vec4, Self::Varying);
    fn fragment(&self, v: &Self::Varying) -> Vec3;
}

/// Positions only, one uniform color.
#[derive(Clone, Copy, Debug)]
pub struct FlatShader {
    pub mvp: Mat4,
    pub color: Vec3,
}

impl FlatShader {
    pub fn new(color: Vec3) -> Self {
        Self {
            mvp: Mat4::IDENTITY,
            color,
        }
    }
}

impl Shader for FlatShader {
    type Vertex = Vec3;
    type Varying = ();

    fn vertex(&self, v: &Vec3) -> (Vec4, ()) {
        (self.mvp * v.extend(1.0), ())
    }

    fn fragment(&self, _: &()) -> Vec3 {
        self.color
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorVertex {
    pub position: Vec3,
    pub color: Vec3,
}

/// Per-vertex color, modulated by `tint`, with separate model/view/projection uniforms.
#[derive(Clone, Copy, Debug)]
pub struct VertexColorShader {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub tint: Vec3,
}

impl Default for VertexColorShader {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            tint: Vec3::ONE,
        }
    }
}

impl Shader for VertexColorShader {
    type Vertex = ColorVertex;
    type Varying = Vec3;

    fn vertex(&self, v: &ColorVertex) -> (Vec4, Vec3) {
        let clip = self.projection * self.view * self.model * v.position.extend(1.0);
        (clip, v.color)
    }

    fn fragment(&self, color: &Vec3) -> Vec3 {
        *color * self.tint
    }
}
