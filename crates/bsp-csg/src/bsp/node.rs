//! BSP tree node implementation.

use crate::{CsgPolygon, MeshPolygon, Plane3D};

/// A node in the BSP tree.
///
/// Each node partitions space using a splitting plane and stores the
/// polygons that are coplanar with that plane. Polygons in front of or
/// behind the plane live in the respective child subtrees.
///
/// Both facings of coplanar polygons share one list; whether a polygon
/// faces along the plane normal only matters while clipping.
///
/// Planes and child links are stored in the tree's un-inverted frame. Readers
/// that respect an inverted tree go through [`oriented_plane`](Self::oriented_plane)
/// and [`oriented_children`](Self::oriented_children).
#[derive(Debug)]
pub struct BspNode<P> {
    /// The splitting plane for this node.
    pub(crate) plane: Plane3D,

    /// Polygons coplanar with the plane.
    pub(crate) polygons: Vec<CsgPolygon<P>>,

    /// Subtree in FRONT of the splitting plane.
    pub(crate) front: Option<Box<BspNode<P>>>,

    /// Subtree BEHIND the splitting plane.
    pub(crate) back: Option<Box<BspNode<P>>>,
}

impl<P: MeshPolygon> BspNode<P> {
    /// Creates a leaf holding a single polygon, splitting along the
    /// polygon's own plane.
    ///
    /// The polygon's inversion flag must already be relative to the tree,
    /// which makes its own plane the stored (un-inverted) plane.
    pub(crate) fn from_polygon(polygon: CsgPolygon<P>) -> Self {
        Self {
            plane: polygon.plane(false),
            polygons: vec![polygon],
            front: None,
            back: None,
        }
    }
}

impl<P> BspNode<P> {
    /// Returns the stored splitting plane.
    #[inline]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    /// Returns the splitting plane as seen by a tree with the given inversion.
    #[inline]
    pub fn oriented_plane(&self, inverted: bool) -> Plane3D {
        self.plane.oriented(inverted)
    }

    /// Returns the coplanar polygons stored at this node.
    #[inline]
    pub fn polygons(&self) -> &[CsgPolygon<P>] {
        &self.polygons
    }

    /// Returns a reference to the stored front child subtree.
    #[inline]
    pub fn front(&self) -> Option<&BspNode<P>> {
        self.front.as_deref()
    }

    /// Returns a reference to the stored back child subtree.
    #[inline]
    pub fn back(&self) -> Option<&BspNode<P>> {
        self.back.as_deref()
    }

    /// Returns `(front, back)` relative to [`oriented_plane`](Self::oriented_plane).
    /// An inverted tree sees its stored children swapped.
    #[inline]
    pub fn oriented_children(&self, inverted: bool) -> (Option<&BspNode<P>>, Option<&BspNode<P>>) {
        if inverted {
            (self.back(), self.front())
        } else {
            (self.front(), self.back())
        }
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    /// Detaches both children.
    pub(crate) fn take_children(&mut self) -> impl Iterator<Item = BspNode<P>> + use<P> {
        self.front
            .take()
            .into_iter()
            .chain(self.back.take())
            .map(|node| *node)
    }
}

/// Determines if a polygon faces the same direction as a plane.
///
/// `flip` is the inversion flag of the tree holding the polygon.
#[inline]
pub fn faces_same_direction<P: MeshPolygon>(
    polygon: &CsgPolygon<P>,
    plane: &Plane3D,
    flip: bool,
) -> bool {
    polygon.normal(flip).dot(&plane.normal()) > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Polygon;
    use nalgebra::{Point3, Vector3};

    fn make_triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> CsgPolygon<Polygon> {
        CsgPolygon::new(Polygon::new(vec![
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        ]))
    }

    #[test]
    fn from_polygon_is_leaf_on_polygon_plane() {
        let poly = make_triangle([0.0, 0.0, 2.0], [1.0, 0.0, 2.0], [0.0, 1.0, 2.0]);
        let node = BspNode::from_polygon(poly);

        assert!(node.is_leaf());
        assert_eq!(node.polygons().len(), 1);
        assert_eq!(node.plane().normal(), Vector3::z());
        assert_eq!(node.plane().offset(), 2.0);
    }

    #[test]
    fn from_inverted_polygon_uses_flipped_plane() {
        let mut poly = make_triangle([0.0, 0.0, 2.0], [1.0, 0.0, 2.0], [0.0, 1.0, 2.0]);
        poly.invert();
        let node = BspNode::from_polygon(poly);

        assert_eq!(node.plane().normal(), -Vector3::z());
        assert_eq!(node.plane().offset(), -2.0);
    }

    #[test]
    fn oriented_children_swap_when_inverted() {
        let splitter = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let above = make_triangle([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);
        let mut node = BspNode::from_polygon(splitter);
        node.front = Some(Box::new(BspNode::from_polygon(above)));

        let (front, back) = node.oriented_children(false);
        assert!(front.is_some() && back.is_none());
        let (front, back) = node.oriented_children(true);
        assert!(front.is_none() && back.is_some());
        assert_eq!(node.oriented_plane(true), node.plane().flipped());

        assert_eq!(node.take_children().count(), 1);
        assert!(node.is_leaf());
    }

    #[test]
    fn faces_same_direction_respects_flip() {
        // Cross product of (1,0,0) x (0,0,1) = (0,-1,0)
        let poly = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 0.0);

        assert!(!faces_same_direction(&poly, &plane, false));
        assert!(faces_same_direction(&poly, &plane, true));
    }
}
