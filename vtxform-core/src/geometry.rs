/// Vertex storage and the in-memory quad geometry
use nalgebra::Point3;

/// Anything that owns a shared vertex list the transform kernel can rewrite.
pub trait VertexStorage {
    fn vertices(&self) -> &[Point3<f32>];
    fn vertices_mut(&mut self) -> &mut [Point3<f32>];
}

impl VertexStorage for Vec<Point3<f32>> {
    fn vertices(&self) -> &[Point3<f32>] {
        self
    }

    fn vertices_mut(&mut self) -> &mut [Point3<f32>] {
        self
    }
}

/// Axis-aligned bounds of a vertex list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    /// Bounds of `points`, or `None` when the slice is empty.
    pub fn from_points(points: &[Point3<f32>]) -> Option<Self> {
        let first = *points.first()?;
        Some(points.iter().skip(1).fold(
            Self {
                min: first,
                max: first,
            },
            |b, p| Self {
                min: b.min.inf(p),
                max: b.max.sup(p),
            },
        ))
    }

    pub fn extent(&self) -> nalgebra::Vector3<f32> {
        self.max - self.min
    }
}

/// A quad mesh: shared vertex list plus four vertex indices per face.
///
/// Connectivity is carried along untouched; only the vertex list is ever
/// rewritten by a transform.
#[derive(Debug, Clone, Default)]
pub struct QuadGeometry {
    pub vertices: Vec<Point3<f32>>,
    pub quads: Vec<[usize; 4]>,
}

impl QuadGeometry {
    pub fn new(vertices: Vec<Point3<f32>>, quads: Vec<[usize; 4]>) -> Self {
        Self { vertices, quads }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.vertices)
    }

    /// Create a flat `nx` x `ny` vertex grid in the z = 0 plane, quads wound
    /// counter-clockwise seen from +z.
    ///
    /// A 12 x 12 grid gives 144 vertices and 121 quads.
    pub fn grid(nx: usize, ny: usize, spacing: f32) -> Self {
        let mut vertices = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                vertices.push(Point3::new(i as f32 * spacing, j as f32 * spacing, 0.0));
            }
        }

        let cells = nx.saturating_sub(1) * ny.saturating_sub(1);
        let mut quads = Vec::with_capacity(cells);
        for j in 0..ny.saturating_sub(1) {
            for i in 0..nx.saturating_sub(1) {
                let v0 = j * nx + i;
                quads.push([v0, v0 + 1, v0 + nx + 1, v0 + nx]);
            }
        }

        Self { vertices, quads }
    }
}

impl VertexStorage for QuadGeometry {
    fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    fn vertices_mut(&mut self) -> &mut [Point3<f32>] {
        &mut self.vertices
    }
}
