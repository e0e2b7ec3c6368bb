//! Axis-aligned bounding boxes, used to bypass BSP work for polygons that
//! cannot interact with the other operand.

use nalgebra::{Point3, Vector3};

use crate::{MeshPolygon, PLANE_EPSILON};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub mins: Point3<f32>,
    pub maxs: Point3<f32>,
}

impl Aabb {
    #[inline]
    pub const fn new(mins: Point3<f32>, maxs: Point3<f32>) -> Self {
        Self { mins, maxs }
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |aabb, p| Self {
            mins: aabb.mins.inf(&p),
            maxs: aabb.maxs.sup(&p),
        }))
    }

    /// Bounding box of a single polygon.
    pub fn of_polygon<P: MeshPolygon>(polygon: &P) -> Option<Self> {
        Self::from_points((0..polygon.vertex_count()).map(|i| polygon.vertex_position(i)))
    }

    /// Bounding box of a set of polygons, or `None` when the set is empty.
    pub fn of_polygons<'a, P, I>(polygons: I) -> Option<Self>
    where
        P: MeshPolygon + 'a,
        I: IntoIterator<Item = &'a P>,
    {
        polygons
            .into_iter()
            .filter_map(Self::of_polygon)
            .reduce(|a, b| a.union(&b))
    }

    /// Smallest box containing both boxes.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }

    /// True when the boxes overlap or touch (within [`PLANE_EPSILON`]).
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.maxs.x + PLANE_EPSILON >= other.mins.x
            && self.mins.x <= other.maxs.x + PLANE_EPSILON
            && self.maxs.y + PLANE_EPSILON >= other.mins.y
            && self.mins.y <= other.maxs.y + PLANE_EPSILON
            && self.maxs.z + PLANE_EPSILON >= other.mins.z
            && self.mins.z <= other.maxs.z + PLANE_EPSILON
    }

    /// True if `other` lies within this box, with the same slack as
    /// [`intersects`](Self::intersects).
    pub fn contains_aabb(&self, other: &Self) -> bool {
        (0..3).all(|i| {
            other.mins[i] + PLANE_EPSILON >= self.mins[i]
                && other.maxs[i] <= self.maxs[i] + PLANE_EPSILON
        })
    }

    #[inline]
    pub fn contains(&self, point: Point3<f32>) -> bool {
        (0..3).all(|i| point[i] >= self.mins[i] && point[i] <= self.maxs[i])
    }

    #[inline]
    pub fn size(&self) -> Vector3<f32> {
        self.maxs - self.mins
    }
}
