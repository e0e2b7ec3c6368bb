use approx::assert_relative_eq;
use bsp_csg::shapes::cuboid;
use bsp_csg::{
    bounding_box, complement, difference, difference_with, intersect, intersect_with,
    signed_volume, union, union_with, CsgOptions, MeshPolygon, Polygon,
};
use nalgebra::Point3;

fn make_cube(min: f32, max: f32) -> Vec<Polygon> {
    cuboid(Point3::new(min, min, min), Point3::new(max, max, max))
}

fn without_filter() -> CsgOptions {
    CsgOptions::default().with_bounding_box_filter(false)
}

/// Polygons as sorted grid-snapped vertex lists, sorted, so results can be
/// compared regardless of emission order or starting vertex.
fn canonical(polygons: &[Polygon]) -> Vec<Vec<[i64; 3]>> {
    let mut faces: Vec<Vec<[i64; 3]>> = polygons
        .iter()
        .map(|polygon| {
            let mut vertices: Vec<[i64; 3]> = (0..polygon.vertex_count())
                .map(|i| {
                    let p = polygon.vertex_position(i);
                    [p.x, p.y, p.z].map(|c| (c * 1e4).round() as i64)
                })
                .collect();
            vertices.sort_unstable();
            vertices
        })
        .collect();
    faces.sort_unstable();
    faces
}

fn assert_box(polygons: &[Polygon], min: f32, max: f32) {
    let aabb = bounding_box(polygons).expect("result should not be empty");
    for axis in 0..3 {
        assert_relative_eq!(aabb.mins[axis], min, epsilon = 1e-5);
        assert_relative_eq!(aabb.maxs[axis], max, epsilon = 1e-5);
    }
}

#[test]
fn overlapping_cubes_intersect() {
    let result = intersect(make_cube(0.0, 1.0), make_cube(0.5, 1.5));
    assert_relative_eq!(signed_volume(&result), 0.125, epsilon = 1e-4);
    assert_box(&result, 0.5, 1.0);
    // Fragments of each face heal back into one quad per side
    assert_eq!(result.len(), 6);
}

#[test]
fn overlapping_cubes_union() {
    let result = union(make_cube(0.0, 1.0), make_cube(0.5, 1.5));
    assert_relative_eq!(signed_volume(&result), 1.875, epsilon = 1e-4);
    assert_box(&result, 0.0, 1.5);
}

#[test]
fn overlapping_cubes_difference() {
    let result = difference(make_cube(0.0, 1.0), make_cube(0.5, 1.5));
    assert_relative_eq!(signed_volume(&result), 0.875, epsilon = 1e-4);
    assert_box(&result, 0.0, 1.0);
}

#[test]
fn overlapping_cubes_without_filter_or_recombine() {
    let options = CsgOptions::default()
        .with_bounding_box_filter(false)
        .with_recombine(false);
    let result = union_with(make_cube(0.0, 1.0), make_cube(0.5, 1.5), &options);
    assert_relative_eq!(signed_volume(&result), 1.875, epsilon = 1e-4);
    assert!(result.iter().all(|p| p.vertex_count() >= 3));
}

#[test]
fn disjoint_cubes_intersect_to_nothing() {
    let filtered = intersect(make_cube(0.0, 1.0), make_cube(10.0, 11.0));
    let unfiltered = intersect_with(
        make_cube(0.0, 1.0),
        make_cube(10.0, 11.0),
        &without_filter(),
    );

    assert!(filtered.is_empty());
    assert_eq!(filtered, unfiltered);
}

#[test]
fn disjoint_cubes_union_matches_unfiltered() {
    let filtered = union(make_cube(0.0, 1.0), make_cube(10.0, 11.0));
    let unfiltered = union_with(
        make_cube(0.0, 1.0),
        make_cube(10.0, 11.0),
        &without_filter(),
    );

    assert_eq!(filtered.len(), 12);
    assert_relative_eq!(signed_volume(&filtered), 2.0, epsilon = 1e-4);
    assert_eq!(filtered, unfiltered);
}

#[test]
fn disjoint_cubes_difference_matches_unfiltered() {
    let a = make_cube(0.0, 1.0);
    let filtered = difference(a.clone(), make_cube(10.0, 11.0));
    let unfiltered = difference_with(a.clone(), make_cube(10.0, 11.0), &without_filter());

    assert_eq!(filtered, a);
    assert_eq!(filtered, unfiltered);
}

#[test]
fn overlapping_cubes_match_unfiltered() {
    for op in [union_with::<Polygon>, difference_with::<Polygon>] {
        let filtered = op(make_cube(0.0, 1.0), make_cube(0.5, 1.5), &CsgOptions::default());
        let unfiltered = op(make_cube(0.0, 1.0), make_cube(0.5, 1.5), &without_filter());

        // Bypassed polygons come out first, so only the sets agree
        assert_relative_eq!(
            signed_volume(&filtered),
            signed_volume(&unfiltered),
            epsilon = 1e-4
        );
        assert_eq!(canonical(&filtered), canonical(&unfiltered));
    }
}

#[test]
fn nested_cubes_match_unfiltered() {
    let outer = || make_cube(0.0, 3.0);
    let inner = || make_cube(1.0, 2.0);

    let filtered = difference(outer(), inner());
    assert_relative_eq!(signed_volume(&filtered), 26.0, epsilon = 1e-3);
    assert_eq!(filtered, difference_with(outer(), inner(), &without_filter()));

    let filtered = union(outer(), inner());
    assert_relative_eq!(signed_volume(&filtered), 27.0, epsilon = 1e-3);
    assert_eq!(filtered, union_with(outer(), inner(), &without_filter()));

    // Operands swapped: the enclosed solid is now the one partitioned
    let filtered = union(inner(), outer());
    assert_relative_eq!(signed_volume(&filtered), 27.0, epsilon = 1e-3);
    let unfiltered = union_with(inner(), outer(), &without_filter());
    assert_eq!(canonical(&filtered), canonical(&unfiltered));
}

#[test]
fn identities_with_empty_operand() {
    let a = make_cube(0.0, 1.0);

    assert!(intersect(a.clone(), Vec::new()).is_empty());
    assert!(intersect(Vec::new(), a.clone()).is_empty());
    assert_eq!(union(a.clone(), Vec::new()), a);
    assert_eq!(difference(a.clone(), Vec::new()), a);
}

#[test]
fn difference_with_itself_is_empty() {
    let result = difference(make_cube(0.0, 1.0), make_cube(0.0, 1.0));
    assert!(result.is_empty());
}

#[test]
fn union_with_itself_is_idempotent() {
    let result = union(make_cube(0.0, 1.0), make_cube(0.0, 1.0));
    assert_relative_eq!(signed_volume(&result), 1.0, epsilon = 1e-4);
    assert_box(&result, 0.0, 1.0);
}

#[test]
fn double_complement_restores_the_solid() {
    let a = make_cube(0.0, 1.0);
    let restored = complement(complement(a.clone()));

    assert_eq!(restored.len(), a.len());
    assert!(a.iter().all(|p| restored.contains(p)));
}

#[test]
fn nested_cube_difference_leaves_a_shell() {
    let result = difference(make_cube(0.0, 3.0), make_cube(1.0, 2.0));
    assert_relative_eq!(signed_volume(&result), 26.0, epsilon = 1e-3);
    assert_box(&result, 0.0, 3.0);
}
