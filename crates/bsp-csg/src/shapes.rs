//! Primitive solids built from outward-facing quads.

use nalgebra::{Point3, Vector3};

use crate::{Polygon, Rectangle};

/// Generates the 6 face polygons of the axis-aligned box `[min, max]`,
/// each facing outwards.
pub fn cuboid(min: Point3<f32>, max: Point3<f32>) -> Vec<Polygon> {
    let size = max - min;
    let dx = Vector3::new(size.x, 0.0, 0.0);
    let dy = Vector3::new(0.0, size.y, 0.0);
    let dz = Vector3::new(0.0, 0.0, size.z);

    let faces = [
        Rectangle::new(min, dz, dy), // -X
        Rectangle::new(min + dx, dy, dz), // +X
        Rectangle::new(min, dx, dz), // -Y
        Rectangle::new(min + dy, dz, dx), // +Y
        Rectangle::new(min, dy, dx), // -Z
        Rectangle::new(min + dz, dx, dy), // +Z
    ];

    faces.iter().map(Polygon::from).collect()
}

/// Generates an axis-aligned cube of edge length `size` around `center`.
pub fn cube(center: Point3<f32>, size: f32) -> Vec<Polygon> {
    let half = Vector3::repeat(size / 2.0);
    cuboid(center - half, center + half)
}
