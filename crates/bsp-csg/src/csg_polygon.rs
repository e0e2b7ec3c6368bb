//! Polygon wrapper carrying the CSG-only state: origin lineage and the
//! pending inversion flag.

use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::{Point3, Vector3};

use crate::{MeshPolygon, Plane3D};

/// Global counter for origin ids.
static NEXT_ORIGIN_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies the original input polygon a fragment was split from.
///
/// Every fragment produced by splitting carries the id of the polygon it
/// came from; the recombinator groups fragments by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OriginId(u64);

impl OriginId {
    /// Allocates a globally unique id.
    pub fn fresh() -> Self {
        Self(NEXT_ORIGIN_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A caller polygon plus the state the CSG engine tracks for it.
///
/// Inversion is lazy: [`invert`](Self::invert) only toggles a flag, and the
/// winding is physically reversed once, in [`into_polygon`](Self::into_polygon).
/// While the polygon sits in a tree the flag is relative to that tree's own
/// inversion flag.
#[derive(Debug, Clone, PartialEq)]
pub struct CsgPolygon<P> {
    polygon: P,
    origin: OriginId,
    inverted: bool,
}

impl<P: MeshPolygon> CsgPolygon<P> {
    /// Wraps an original input polygon, assigning it a fresh origin id.
    pub fn new(polygon: P) -> Self {
        Self::with_origin(polygon, OriginId::fresh())
    }

    /// Wraps a polygon under an existing origin id.
    pub fn with_origin(polygon: P, origin: OriginId) -> Self {
        Self {
            polygon,
            origin,
            inverted: false,
        }
    }

    #[inline]
    pub fn origin(&self) -> OriginId {
        self.origin
    }

    /// Returns the wrapped polygon, without any pending inversion applied.
    #[inline]
    pub fn polygon(&self) -> &P {
        &self.polygon
    }

    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Toggles the pending inversion.
    #[inline]
    pub fn invert(&mut self) {
        self.inverted = !self.inverted;
    }

    #[inline]
    pub(crate) fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.polygon.vertex_count()
    }

    #[inline]
    pub fn vertex_position(&self, index: usize) -> Point3<f32> {
        self.polygon.vertex_position(index)
    }

    /// Face normal with the pending inversion applied, further negated when
    /// `flip` is set (the inversion flag of the containing tree).
    pub fn normal(&self, flip: bool) -> Vector3<f32> {
        let normal = self.polygon.face_normal();
        if self.inverted ^ flip { -normal } else { normal }
    }

    /// Plane through the first vertex along [`normal`](Self::normal).
    pub fn plane(&self, flip: bool) -> Plane3D {
        Plane3D::from_point_and_normal(self.vertex_position(0), self.normal(flip))
    }

    /// A copy sized for `count` vertices, keeping origin and inversion.
    pub fn with_vertex_capacity(&self, count: usize) -> Self {
        Self {
            polygon: self.polygon.with_vertex_count(count),
            origin: self.origin,
            inverted: self.inverted,
        }
    }

    #[inline]
    pub fn copy_vertex_from(&mut self, target: usize, source: &Self, source_index: usize) {
        self.polygon.copy_vertex(target, &source.polygon, source_index);
    }

    #[inline]
    pub fn copy_interpolated_vertex_from(
        &mut self,
        target: usize,
        source: &Self,
        from: usize,
        to: usize,
        t: f32,
    ) {
        self.polygon
            .interpolate_vertex(target, &source.polygon, from, to, t);
    }

    /// Index of the vertex at exactly `position`, if any.
    pub fn index_of_vertex(&self, position: Point3<f32>) -> Option<usize> {
        (0..self.vertex_count()).find(|&i| self.vertex_position(i) == position)
    }

    /// Unwraps the polygon, applying the pending inversion.
    pub fn into_polygon(self) -> P {
        let mut polygon = self.polygon;
        if self.inverted {
            polygon.flip();
        }
        polygon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Polygon;

    fn make_triangle() -> Polygon {
        Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn fresh_origins_are_unique() {
        let a = CsgPolygon::new(make_triangle());
        let b = CsgPolygon::new(make_triangle());
        assert_ne!(a.origin(), b.origin());
    }

    #[test]
    fn capacity_copy_keeps_lineage() {
        let mut polygon = CsgPolygon::new(make_triangle());
        polygon.invert();
        let copy = polygon.with_vertex_capacity(5);

        assert_eq!(copy.origin(), polygon.origin());
        assert!(copy.is_inverted());
        assert_eq!(copy.vertex_count(), 5);
    }

    #[test]
    fn normal_combines_both_flags() {
        let mut polygon = CsgPolygon::new(make_triangle());
        assert_eq!(polygon.normal(false), Vector3::z());
        assert_eq!(polygon.normal(true), -Vector3::z());
        polygon.invert();
        assert_eq!(polygon.normal(false), -Vector3::z());
        assert_eq!(polygon.normal(true), Vector3::z());
    }

    #[test]
    fn into_polygon_applies_inversion_once() {
        let mut polygon = CsgPolygon::new(make_triangle());
        polygon.invert();
        polygon.invert();
        polygon.invert();

        let flipped = polygon.into_polygon();
        assert_eq!(flipped.face_normal(), -Vector3::z());
        assert_eq!(flipped.vertices()[0].position, Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn index_of_vertex_is_exact() {
        let polygon = CsgPolygon::new(make_triangle());
        assert_eq!(polygon.index_of_vertex(Point3::new(1.0, 0.0, 0.0)), Some(1));
        assert_eq!(polygon.index_of_vertex(Point3::new(1.0, 1e-7, 0.0)), None);
    }
}
