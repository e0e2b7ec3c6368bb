//! Area and volume of polygon soups.

use nalgebra::Vector3;

use crate::{Aabb, MeshPolygon};

/// Area of a planar polygon.
pub fn polygon_area<P: MeshPolygon>(polygon: &P) -> f32 {
    let count = polygon.vertex_count();
    let mut sum = Vector3::zeros();
    for i in 0..count {
        let a = polygon.vertex_position(i).coords;
        let b = polygon.vertex_position((i + 1) % count).coords;
        sum += a.cross(&b);
    }
    0.5 * sum.dot(&polygon.face_normal()).abs()
}

/// Total area of all polygons.
pub fn surface_area<P: MeshPolygon>(polygons: &[P]) -> f32 {
    polygons.iter().map(polygon_area).sum()
}

/// Volume enclosed by a closed, outward-facing polygon soup.
///
/// Sums the signed tetrahedra formed by the origin and a triangle fan of
/// each polygon. Inward-facing (inverted) solids give a negative volume.
pub fn signed_volume<P: MeshPolygon>(polygons: &[P]) -> f32 {
    let mut volume = 0.0;
    for polygon in polygons {
        let apex = polygon.vertex_position(0).coords;
        for i in 1..polygon.vertex_count().saturating_sub(1) {
            let b = polygon.vertex_position(i).coords;
            let c = polygon.vertex_position(i + 1).coords;
            volume += apex.dot(&b.cross(&c));
        }
    }
    volume / 6.0
}

/// Bounding box of all polygons.
pub fn bounding_box<P: MeshPolygon>(polygons: &[P]) -> Option<Aabb> {
    Aabb::of_polygons(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{cube, cuboid};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn cube_measures() {
        let unit = cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(signed_volume(&unit), 1.0, epsilon = 1e-6);
        assert_relative_eq!(surface_area(&unit), 6.0, epsilon = 1e-6);

        let offset = cube(Point3::new(5.0, -3.0, 2.0), 2.0);
        assert_relative_eq!(signed_volume(&offset), 8.0, epsilon = 1e-4);
    }

    #[test]
    fn flipped_cube_has_negative_volume() {
        let mut unit = cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        unit.iter_mut().for_each(MeshPolygon::flip);
        assert_relative_eq!(signed_volume(&unit), -1.0, epsilon = 1e-6);
    }
}
