//! The polygon contract the CSG engine works against, and a concrete
//! polygon type implementing it.

use nalgebra::{Point2, Point3, Vector3};

use crate::{CsgError, Plane3D, PlaneSide, Rectangle};

/// Everything the CSG engine needs from a caller-owned polygon.
///
/// Implementors are convex, planar polygons with at least 3 vertices whose
/// winding is counter-clockwise when viewed from the side the face normal
/// points to. Vertex attributes other than the position (texture
/// coordinates, colours, ...) are opaque to the engine; it only copies and
/// interpolates them through this trait.
pub trait MeshPolygon: Clone {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Position of vertex `index`.
    fn vertex_position(&self, index: usize) -> Point3<f32>;

    /// Unit normal of the face.
    fn face_normal(&self) -> Vector3<f32>;

    /// Returns a copy of this polygon sized for `count` vertices.
    ///
    /// Every attribute other than the vertices (normal, material, ...) is
    /// preserved. The vertex contents are unspecified until written with
    /// [`copy_vertex`](Self::copy_vertex) or
    /// [`interpolate_vertex`](Self::interpolate_vertex).
    fn with_vertex_count(&self, count: usize) -> Self;

    /// Overwrites vertex `target` with vertex `source_index` of `source`.
    fn copy_vertex(&mut self, target: usize, source: &Self, source_index: usize);

    /// Overwrites vertex `target` with the vertex at parameter `t` on the
    /// segment from vertex `from` to vertex `to` of `source`.
    fn interpolate_vertex(&mut self, target: usize, source: &Self, from: usize, to: usize, t: f32);

    /// Reverses the winding and negates the normal.
    fn flip(&mut self);
}

/// A vertex carrying a position and a texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub uv: Point2<f32>,
}

impl Vertex {
    /// Creates a vertex from a position and texture coordinate.
    pub fn new(position: Point3<f32>, uv: Point2<f32>) -> Self {
        Self { position, uv }
    }

    /// Linearly interpolates towards `other` by `t`.
    pub fn lerp(&self, other: &Vertex, t: f32) -> Vertex {
        Vertex {
            position: self.position + (other.position - self.position) * t,
            uv: self.uv + (other.uv - self.uv) * t,
        }
    }
}

impl From<Point3<f32>> for Vertex {
    fn from(position: Point3<f32>) -> Self {
        Self::new(position, Point2::origin())
    }
}

/// A convex polygon in 3D space, defined by an ordered list of vertices.
///
/// Vertices should be coplanar and in counter-clockwise winding order
/// when viewed from the front (the direction the normal points).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vertex>,
    normal: Vector3<f32>,
}

impl Polygon {
    /// Creates a new polygon from a list of positions, with zeroed texture
    /// coordinates.
    ///
    /// # Panics (debug builds only)
    /// - Panics if fewer than 3 vertices are provided.
    /// - Panics if vertices are collinear or coincident.
    /// - Panics if vertices are not coplanar.
    pub fn new(positions: Vec<Point3<f32>>) -> Self {
        Self::from_vertices(positions.into_iter().map(Vertex::from).collect())
    }

    /// Creates a new polygon from full vertices.
    ///
    /// # Panics (debug builds only)
    /// - Panics if fewer than 3 vertices are provided.
    /// - Panics if vertices are collinear or coincident.
    /// - Panics if vertices are not coplanar.
    pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
        debug_assert!(
            vertices.len() >= 3,
            "Polygon must have at least 3 vertices"
        );
        let normal = newell_normal(&vertices);
        debug_assert!(
            normal != Vector3::zeros(),
            "Polygon vertices must span a plane"
        );
        debug_assert!(
            Self::are_coplanar(&vertices, normal),
            "Polygon vertices must be coplanar"
        );
        Self { vertices, normal }
    }

    /// Fallible version of [`from_vertices`](Self::from_vertices).
    pub fn try_from_vertices(vertices: Vec<Vertex>) -> Result<Self, CsgError> {
        if vertices.len() < 3 {
            return Err(CsgError::TooFewVertices(vertices.len()));
        }
        let normal = newell_normal(&vertices);
        if normal == Vector3::zeros() {
            return Err(CsgError::DegenerateNormal);
        }
        Ok(Self { vertices, normal })
    }

    /// Checks if all vertices lie on the plane through the first vertex.
    fn are_coplanar(vertices: &[Vertex], normal: Vector3<f32>) -> bool {
        if vertices.len() <= 3 || normal == Vector3::zeros() {
            return true;
        }

        let plane = Plane3D::from_point_and_normal(vertices[0].position, normal);
        vertices[1..]
            .iter()
            .all(|v| plane.classify_point(v.position) == PlaneSide::Coplanar)
    }

    /// Returns the vertices of the polygon.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices (always false for valid polygons).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the unit normal vector of the polygon.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the plane that this polygon lies on.
    pub fn plane(&self) -> Plane3D {
        Plane3D::from_point_and_normal(self.vertices[0].position, self.normal)
    }

    /// Computes the centroid (vertex average) of the polygon.
    pub fn centroid(&self) -> Point3<f32> {
        let sum: Vector3<f32> = self.vertices.iter().map(|v| v.position.coords).sum();
        Point3::from(sum / self.vertices.len() as f32)
    }

    /// Computes the area of the polygon.
    pub fn area(&self) -> f32 {
        crate::polygon_area(self)
    }
}

impl MeshPolygon for Polygon {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn vertex_position(&self, index: usize) -> Point3<f32> {
        self.vertices[index].position
    }

    #[inline]
    fn face_normal(&self) -> Vector3<f32> {
        self.normal
    }

    fn with_vertex_count(&self, count: usize) -> Self {
        Self {
            vertices: vec![Vertex::from(Point3::origin()); count],
            normal: self.normal,
        }
    }

    #[inline]
    fn copy_vertex(&mut self, target: usize, source: &Self, source_index: usize) {
        self.vertices[target] = source.vertices[source_index];
    }

    #[inline]
    fn interpolate_vertex(&mut self, target: usize, source: &Self, from: usize, to: usize, t: f32) {
        self.vertices[target] = source.vertices[from].lerp(&source.vertices[to], t);
    }

    fn flip(&mut self) {
        self.vertices.reverse();
        self.normal = -self.normal;
    }
}

/// Newell's method: a robust normal for any planar polygon, including
/// ones whose first three vertices are collinear.
fn newell_normal(vertices: &[Vertex]) -> Vector3<f32> {
    let mut normal = Vector3::zeros();
    for (i, current) in vertices.iter().enumerate() {
        let a = current.position;
        let b = vertices[(i + 1) % vertices.len()].position;
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros)
}

impl From<Rectangle> for Polygon {
    fn from(rectangle: Rectangle) -> Self {
        Self::from_vertices(rectangle.vertices().to_vec())
    }
}

impl From<&Rectangle> for Polygon {
    fn from(rectangle: &Rectangle) -> Self {
        Self::from_vertices(rectangle.vertices().to_vec())
    }
}

impl From<&Polygon> for Plane3D {
    fn from(polygon: &Polygon) -> Self {
        polygon.plane()
    }
}
