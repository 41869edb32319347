use crate::shader::ColorVertex;
use glam::Vec3;

/// Vertex buffer plus an optional element buffer, bound together like a VAO.
#[derive(Clone, Debug)]
pub struct VertexArray<V> {
    vertices: Vec<V>,
    indices: Option<Vec<u32>>,
}

impl<V> VertexArray<V> {
    pub fn new(vertices: Vec<V>) -> Self {
        Self {
            vertices,
            indices: None,
        }
    }

    pub fn indexed(vertices: Vec<V>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices: Some(indices),
        }
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }
}

pub const TRIANGLE: [Vec3; 3] = [
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
    Vec3::new(0.0, 0.5, 0.0),
];

pub const CUBE_CORNERS: [Vec3; 8] = [
    // front (z = +1): bottom-left, bottom-right, top-right, top-left
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    // back (z = -1), same order
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
];

/// Two counter-clockwise triangles per face, in front/back/left/right/top/bottom order.
pub const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 2, 3, 0, // front
    5, 4, 7, 7, 6, 5, // back
    4, 0, 3, 3, 7, 4, // left
    1, 5, 6, 6, 2, 1, // right
    3, 2, 6, 6, 7, 3, // top
    4, 5, 1, 1, 0, 4, // bottom
];

pub const CUBE_VERTEX_COUNT: usize = CUBE_INDICES.len();

pub fn triangle() -> VertexArray<Vec3> {
    VertexArray::new(TRIANGLE.to_vec())
}

pub fn indexed_cube() -> VertexArray<Vec3> {
    VertexArray::indexed(CUBE_CORNERS.to_vec(), CUBE_INDICES.to_vec())
}

/// Unrolled 36-vertex cube, one color per face (same face order as [`CUBE_INDICES`]).
pub fn colored_cube(face_colors: [Vec3; 6]) -> VertexArray<ColorVertex> {
    let vertices = CUBE_INDICES
        .iter()
        .enumerate()
        .map(|(n, &i)| ColorVertex {
            position: CUBE_CORNERS[i as usize],
            color: face_colors[n / 6],
        })
        .collect();
    VertexArray::new(vertices)
}
