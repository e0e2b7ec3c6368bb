//! Rectangle (quad) construction helper.

use nalgebra::{Point2, Point3, Vector3};

use crate::Vertex;

/// A rectangle (quad) in 3D space, defined by a corner and two edge vectors.
///
/// The four vertices are:
/// - `origin`
/// - `origin + u`
/// - `origin + u + v`
/// - `origin + v`
///
/// Texture coordinates run from `(0, 0)` at `origin` to `(1, 1)` at the
/// opposite corner, which is what a block face expects.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    origin: Point3<f32>,
    u: Vector3<f32>,
    v: Vector3<f32>,
}

impl Rectangle {
    /// Creates a new rectangle from an origin corner and two edge vectors.
    ///
    /// The front face is the side `u × v` points to.
    pub fn new(origin: Point3<f32>, u: Vector3<f32>, v: Vector3<f32>) -> Self {
        Self { origin, u, v }
    }

    /// Creates a rectangle from three corners: `a`, its neighbour `b` along
    /// the first edge and its neighbour `d` along the second edge.
    pub fn from_corners(a: Point3<f32>, b: Point3<f32>, d: Point3<f32>) -> Self {
        Self::new(a, b - a, d - a)
    }

    #[inline]
    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    #[inline]
    pub fn u(&self) -> Vector3<f32> {
        self.u
    }

    #[inline]
    pub fn v(&self) -> Vector3<f32> {
        self.v
    }

    /// Returns the four vertices of the rectangle, counter-clockwise.
    pub fn vertices(&self) -> [Vertex; 4] {
        [
            Vertex::new(self.origin, Point2::new(0.0, 0.0)),
            Vertex::new(self.origin + self.u, Point2::new(1.0, 0.0)),
            Vertex::new(self.origin + self.u + self.v, Point2::new(1.0, 1.0)),
            Vertex::new(self.origin + self.v, Point2::new(0.0, 1.0)),
        ]
    }

    /// Computes the area of the rectangle.
    pub fn area(&self) -> f32 {
        self.u.cross(&self.v).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MeshPolygon, Polygon};
    use approx::assert_relative_eq;

    #[test]
    fn from_corners_matches_edges() {
        let rect = Rectangle::from_corners(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        );
        assert_eq!(rect.u(), Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(rect.v(), Vector3::new(0.0, 3.0, 0.0));
        assert_relative_eq!(rect.area(), 6.0);
        assert_eq!(rect.vertices()[2].position, Point3::new(2.0, 3.0, 0.0));
    }

    #[test]
    fn into_polygon_faces_u_cross_v() {
        let rect = Rectangle::new(Point3::origin(), Vector3::y(), Vector3::z());
        let polygon = Polygon::from(&rect);
        assert_eq!(polygon.vertex_count(), 4);
        assert_relative_eq!(polygon.face_normal(), Vector3::x());
        assert_relative_eq!(polygon.area(), rect.area());
    }
}
