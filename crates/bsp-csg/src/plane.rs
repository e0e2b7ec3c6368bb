//! Plane representation, point classification and polygon splitting.

use nalgebra::{Point3, Vector3};

use crate::bsp::{faces_same_direction, SplitAcceptor};
use crate::{CsgPolygon, MeshPolygon};

/// Epsilon for plane classification.
/// Points within this distance of the plane are considered "on" the plane.
///
/// Tuned for unit-block geometry. Inputs at very different scales should be
/// rescaled rather than changing this value.
pub const PLANE_EPSILON: f32 = 1e-5;

/// Tally increment for a vertex in front of the plane (low half).
const FRONT_UNIT: u64 = 1;
/// Tally increment for a vertex behind the plane (high half).
const BACK_UNIT: u64 = 1 << 32;
const FRONT_MASK: u64 = BACK_UNIT - 1;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    Coplanar,
}

/// A plane in 3D space, represented as `normal · point = offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3D {
    normal: Vector3<f32>,
    offset: f32,
}

impl Plane3D {
    /// Creates a new plane from a normal vector and offset.
    /// The normal will be normalized automatically.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn new(normal: Vector3<f32>, offset: f32) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Plane normal cannot be zero");
        Self {
            normal: normal / norm,
            offset: offset / norm,
        }
    }

    /// Creates a plane from a point on the plane and a normal vector.
    /// The normal will be normalized automatically.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn from_point_and_normal(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Plane normal cannot be zero");
        let unit_normal = normal / norm;
        Self {
            normal: unit_normal,
            offset: unit_normal.dot(&point.coords),
        }
    }

    /// Creates a plane from three non-collinear points.
    /// The normal direction follows the right-hand rule: (b - a) × (c - a).
    ///
    /// # Panics
    /// Panics if the points are collinear (or nearly so).
    pub fn from_three_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self::from_point_and_normal(a, (b - a).cross(&(c - a)))
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind (opposite side from normal)
    #[inline]
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Classifies which side of the plane a point lies on.
    pub fn classify_point(&self, point: Point3<f32>) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > PLANE_EPSILON {
            PlaneSide::Front
        } else if dist < -PLANE_EPSILON {
            PlaneSide::Back
        } else {
            PlaneSide::Coplanar
        }
    }

    /// Returns a new plane with the normal flipped (facing the opposite direction).
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Returns the plane as seen through an inversion flag: `self` when
    /// `inverted` is false, [`flipped`](Self::flipped) otherwise.
    #[inline]
    pub fn oriented(&self, inverted: bool) -> Self {
        if inverted { self.flipped() } else { *self }
    }

    /// Projects a point onto the plane (finds the closest point on the plane).
    #[inline]
    pub fn project_point(&self, point: Point3<f32>) -> Point3<f32> {
        point - self.normal * self.signed_distance(point)
    }

    /// Interpolation parameter of the plane crossing on the segment `start → end`.
    ///
    /// Only meaningful when the endpoints lie on opposite sides; the result
    /// is then in `[0, 1]`.
    #[inline]
    pub fn edge_parameter(&self, start: Point3<f32>, end: Point3<f32>) -> f32 {
        (self.offset - self.normal.dot(&start.coords)) / self.normal.dot(&(end - start))
    }

    /// Classifies `polygon` against this plane and hands it, or the two
    /// fragments it splits into, to `acceptor`.
    ///
    /// `flip` is the inversion flag of the tree that holds the polygon; it is
    /// combined with the polygon's own flag when deciding whether a coplanar
    /// polygon faces along the plane normal.
    pub(crate) fn split<P, A>(&self, polygon: CsgPolygon<P>, flip: bool, acceptor: &mut A)
    where
        P: MeshPolygon,
        A: SplitAcceptor<P>,
    {
        let mut tally = 0u64;
        for i in 0..polygon.vertex_count() {
            tally += match self.classify_point(polygon.vertex_position(i)) {
                PlaneSide::Front => FRONT_UNIT,
                PlaneSide::Back => BACK_UNIT,
                PlaneSide::Coplanar => 0,
            };
        }

        match (tally & FRONT_MASK != 0, tally >= BACK_UNIT) {
            (false, false) => {
                if faces_same_direction(&polygon, self, flip) {
                    acceptor.accept_coplanar_front(polygon);
                } else {
                    acceptor.accept_coplanar_back(polygon);
                }
            }
            (true, false) => acceptor.accept_front(polygon),
            (false, true) => acceptor.accept_back(polygon),
            (true, true) => {
                let (front, back) = self.split_spanning(&polygon);
                acceptor.accept_front(front);
                acceptor.accept_back(back);
            }
        }
    }

    /// Splits a polygon with vertices strictly on both sides into a front
    /// and a back fragment.
    fn split_spanning<P: MeshPolygon>(
        &self,
        polygon: &CsgPolygon<P>,
    ) -> (CsgPolygon<P>, CsgPolygon<P>) {
        let count = polygon.vertex_count();
        let sides: Vec<PlaneSide> = (0..count)
            .map(|i| self.classify_point(polygon.vertex_position(i)))
            .collect();

        let mut front_len = 0;
        let mut back_len = 0;
        for i in 0..count {
            match sides[i] {
                PlaneSide::Front => front_len += 1,
                PlaneSide::Back => back_len += 1,
                PlaneSide::Coplanar => {
                    front_len += 1;
                    back_len += 1;
                }
            }
            if crosses(sides[i], sides[(i + 1) % count]) {
                front_len += 1;
                back_len += 1;
            }
        }

        let mut front = polygon.with_vertex_capacity(front_len);
        let mut back = polygon.with_vertex_capacity(back_len);
        let mut f = 0;
        let mut b = 0;

        for i in 0..count {
            let j = (i + 1) % count;

            if sides[i] != PlaneSide::Back {
                front.copy_vertex_from(f, polygon, i);
                f += 1;
            }
            if sides[i] != PlaneSide::Front {
                back.copy_vertex_from(b, polygon, i);
                b += 1;
            }

            if crosses(sides[i], sides[j]) {
                let t = self.edge_parameter(polygon.vertex_position(i), polygon.vertex_position(j));
                front.copy_interpolated_vertex_from(f, polygon, i, j, t);
                back.copy_interpolated_vertex_from(b, polygon, i, j, t);
                f += 1;
                b += 1;
            }
        }

        debug_assert_eq!((f, b), (front_len, back_len));
        (front, back)
    }
}

/// True when an edge goes strictly from one side of the plane to the other.
#[inline]
fn crosses(a: PlaneSide, b: PlaneSide) -> bool {
    matches!(
        (a, b),
        (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{polygon_area, Polygon};
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Sorted {
        front: Vec<CsgPolygon<Polygon>>,
        back: Vec<CsgPolygon<Polygon>>,
        coplanar_front: Vec<CsgPolygon<Polygon>>,
        coplanar_back: Vec<CsgPolygon<Polygon>>,
    }

    impl SplitAcceptor<Polygon> for Sorted {
        fn accept_front(&mut self, polygon: CsgPolygon<Polygon>) {
            self.front.push(polygon);
        }
        fn accept_back(&mut self, polygon: CsgPolygon<Polygon>) {
            self.back.push(polygon);
        }
        fn accept_coplanar_front(&mut self, polygon: CsgPolygon<Polygon>) {
            self.coplanar_front.push(polygon);
        }
        fn accept_coplanar_back(&mut self, polygon: CsgPolygon<Polygon>) {
            self.coplanar_back.push(polygon);
        }
    }

    fn unit_square() -> CsgPolygon<Polygon> {
        CsgPolygon::new(Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]))
    }

    #[test]
    fn new_normalizes() {
        let plane = Plane3D::new(Vector3::new(0.0, 2.0, 0.0), 4.0);
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(plane.offset(), 2.0);
    }

    #[test]
    fn classify_point_uses_epsilon() {
        let plane = Plane3D::new(Vector3::z(), 0.0);
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, 1.0)), PlaneSide::Front);
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, -1.0)), PlaneSide::Back);
        assert_eq!(plane.classify_point(Point3::new(3.0, 2.0, 5e-6)), PlaneSide::Coplanar);
        assert_eq!(plane.classify_point(Point3::new(3.0, 2.0, -5e-6)), PlaneSide::Coplanar);
    }

    #[test]
    fn oriented_flips_only_when_inverted() {
        let plane = Plane3D::new(Vector3::x(), 0.5);
        assert_eq!(plane.oriented(false), plane);
        assert_eq!(plane.oriented(true), plane.flipped());
        assert_eq!(plane.oriented(true).oriented(true), plane);
        assert_eq!(plane.flipped().offset(), -0.5);
    }

    #[test]
    fn edge_parameter_hits_midpoint() {
        let plane = Plane3D::new(Vector3::x(), 0.5);
        let t = plane.edge_parameter(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 3.0, 0.0));
        assert_relative_eq!(t, 0.5);
    }

    #[test]
    fn split_through_center_halves_area() {
        let square = unit_square();
        let origin = square.origin();
        let plane = Plane3D::new(Vector3::x(), 0.5);

        let mut sorted = Sorted::default();
        plane.split(square, false, &mut sorted);

        assert_eq!(sorted.front.len(), 1);
        assert_eq!(sorted.back.len(), 1);
        for fragment in sorted.front.iter().chain(&sorted.back) {
            assert_eq!(fragment.origin(), origin);
            assert_eq!(fragment.vertex_count(), 4);
            assert_relative_eq!(polygon_area(fragment.polygon()), 0.5, epsilon = 1e-6);
        }
        assert!(
            (0..4).all(|i| sorted.front[0].vertex_position(i).x >= 0.5 - PLANE_EPSILON)
        );
        assert!((0..4).all(|i| sorted.back[0].vertex_position(i).x <= 0.5 + PLANE_EPSILON));
    }

    #[test]
    fn split_shares_exact_crossing_vertices() {
        let plane = Plane3D::new(Vector3::new(1.0, 0.3, 0.0), 0.4);
        let mut sorted = Sorted::default();
        plane.split(unit_square(), false, &mut sorted);

        let front = &sorted.front[0];
        let back = &sorted.back[0];
        let shared = (0..front.vertex_count())
            .filter(|&i| back.index_of_vertex(front.vertex_position(i)).is_some())
            .count();
        assert_eq!(shared, 2);
    }

    #[test]
    fn split_through_vertices_keeps_them_on_both_sides() {
        // Diagonal x = y passes through two corners of the square
        let plane = Plane3D::new(Vector3::new(1.0, -1.0, 0.0), 0.0);
        let mut sorted = Sorted::default();
        plane.split(unit_square(), false, &mut sorted);

        assert_eq!(sorted.front[0].vertex_count(), 3);
        assert_eq!(sorted.back[0].vertex_count(), 3);
    }

    #[test]
    fn split_whole_polygon_sides() {
        let mut sorted = Sorted::default();
        Plane3D::new(Vector3::x(), -1.0).split(unit_square(), false, &mut sorted);
        Plane3D::new(Vector3::x(), 2.0).split(unit_square(), false, &mut sorted);

        assert_eq!(sorted.front.len(), 1);
        assert_eq!(sorted.back.len(), 1);
        assert_eq!(sorted.front[0].vertex_count(), 4);
    }

    #[test]
    fn coplanar_facing_respects_inversion() {
        let plane = Plane3D::new(Vector3::z(), 0.0);
        let mut sorted = Sorted::default();

        plane.split(unit_square(), false, &mut sorted);
        plane.split(unit_square(), true, &mut sorted);
        let mut inverted = unit_square();
        inverted.invert();
        plane.split(inverted.clone(), false, &mut sorted);
        plane.split(inverted, true, &mut sorted);

        assert_eq!(sorted.coplanar_front.len(), 2);
        assert_eq!(sorted.coplanar_back.len(), 2);
    }

    #[test]
    fn tally_halves_do_not_overflow_into_each_other() {
        // More vertices than fit in 16 bits, all in front of x = 0
        let count = 70_000;
        let ring: Vec<Point3<f32>> = (0..count)
            .map(|k| {
                let angle = k as f32 / count as f32 * std::f32::consts::TAU;
                Point3::new(5.0 + angle.cos(), angle.sin(), 0.0)
            })
            .collect();
        let disc = CsgPolygon::new(Polygon::new(ring));

        let mut sorted = Sorted::default();
        Plane3D::new(Vector3::x(), 0.0).split(disc.clone(), false, &mut sorted);
        Plane3D::new(-Vector3::x(), 0.0).split(disc, false, &mut sorted);

        assert_eq!(sorted.front.len(), 1);
        assert_eq!(sorted.back.len(), 1);
        assert_eq!(sorted.front[0].vertex_count(), count);
    }
}
