//! Healing of split fragments back into whole faces.
//!
//! Splitting against many planes can leave one input face as a patchwork of
//! fragments. Fragments that share an [`OriginId`] lie in the same plane, so
//! neighbouring ones can be welded along their common edge. Vertices that
//! end up in the middle of a straight edge (T-junctions) are dropped while
//! welding.

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

use crate::{CsgPolygon, MeshPolygon, OriginId, PLANE_EPSILON};

/// Exact-position key for the vertex adjacency map. `-0.0` and `0.0` map to
/// the same key.
type VertexKey = [u32; 3];

fn vertex_key(position: Point3<f32>) -> VertexKey {
    [
        (position.x + 0.0).to_bits(),
        (position.y + 0.0).to_bits(),
        (position.z + 0.0).to_bits(),
    ]
}

/// Merges fragments of the same original polygon and emits final polygons.
///
/// ```
/// use bsp_csg::{CsgPolygon, Polygon, Recombinator};
/// use nalgebra::Point3;
///
/// let left = CsgPolygon::new(Polygon::new(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.5, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ]));
/// let right = CsgPolygon::with_origin(
///     Polygon::new(vec![
///         Point3::new(0.5, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(1.0, 1.0, 0.0),
///         Point3::new(0.5, 1.0, 0.0),
///     ]),
///     left.origin(),
/// );
///
/// let merged = Recombinator::new().recombine(vec![left, right]);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].len(), 4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Recombinator {
    quads_only: bool,
}

impl Default for Recombinator {
    fn default() -> Self {
        Self { quads_only: true }
    }
}

impl Recombinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set (the default), faces with more than four vertices are
    /// emitted as a fan of quads closed by at most one triangle.
    pub fn with_quads_only(mut self, quads_only: bool) -> Self {
        self.quads_only = quads_only;
        self
    }

    /// Merges what can be merged and applies every pending inversion.
    ///
    /// Output order follows the first appearance of each origin in the
    /// input, so identical inputs give identical outputs.
    pub fn recombine<P: MeshPolygon>(&self, polygons: Vec<CsgPolygon<P>>) -> Vec<P> {
        let fragment_count = polygons.len();
        let buckets = bucket_by_origin(polygons);
        let bucket_count = buckets.len();

        let mut output = Vec::with_capacity(fragment_count);
        for bucket in buckets {
            let merged = match bucket.len() {
                0 | 1 => bucket,
                2 => merge_pair(bucket),
                _ => merge_bucket(bucket),
            };
            for polygon in merged {
                self.emit(polygon, &mut output);
            }
        }

        log::debug!(
            "recombined {fragment_count} fragments from {bucket_count} origins into {} polygons",
            output.len()
        );
        output
    }

    fn emit<P: MeshPolygon>(&self, polygon: CsgPolygon<P>, output: &mut Vec<P>) {
        let count = polygon.vertex_count();
        if !self.quads_only || count <= 4 {
            output.push(polygon.into_polygon());
            return;
        }

        let mut i = 1;
        while i + 2 < count {
            output.push(fan_piece(&polygon, &[0, i, i + 1, i + 2]).into_polygon());
            i += 2;
        }
        if i + 1 < count {
            output.push(fan_piece(&polygon, &[0, i, i + 1]).into_polygon());
        }
    }
}

fn fan_piece<P: MeshPolygon>(polygon: &CsgPolygon<P>, indices: &[usize]) -> CsgPolygon<P> {
    let mut piece = polygon.with_vertex_capacity(indices.len());
    for (target, &source) in indices.iter().enumerate() {
        piece.copy_vertex_from(target, polygon, source);
    }
    piece
}

fn bucket_by_origin<P>(polygons: Vec<CsgPolygon<P>>) -> Vec<Vec<CsgPolygon<P>>>
where
    P: MeshPolygon,
{
    let mut index: HashMap<OriginId, usize> = HashMap::new();
    let mut buckets: Vec<Vec<CsgPolygon<P>>> = Vec::new();
    for polygon in polygons {
        let slot = *index.entry(polygon.origin()).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(polygon);
    }
    buckets
}

fn merge_pair<P: MeshPolygon>(bucket: Vec<CsgPolygon<P>>) -> Vec<CsgPolygon<P>> {
    match join(&bucket[0], &bucket[1]) {
        Some(merged) => vec![merged],
        None => bucket,
    }
}

/// Repeatedly welds fragments meeting at vertices shared by exactly two of
/// them, until a full pass changes nothing.
fn merge_bucket<P: MeshPolygon>(bucket: Vec<CsgPolygon<P>>) -> Vec<CsgPolygon<P>> {
    let mut slab: Vec<Option<CsgPolygon<P>>> = Vec::with_capacity(bucket.len() * 2);
    let mut adjacency: HashMap<VertexKey, Vec<usize>> = HashMap::new();
    for polygon in bucket {
        register(&mut adjacency, slab.len(), &polygon);
        slab.push(Some(polygon));
    }

    let mut changed = true;
    while changed {
        changed = false;

        let mut keys: Vec<VertexKey> = adjacency.keys().copied().collect();
        keys.sort_unstable();
        for key in keys {
            let Some(refs) = adjacency.get(&key) else {
                continue;
            };
            if refs.len() < 2 {
                adjacency.remove(&key);
                continue;
            }
            if refs.len() != 2 {
                continue;
            }

            let (first, second) = (refs[0], refs[1]);
            let merged = match (&slab[first], &slab[second]) {
                (Some(a), Some(b)) => join(a, b),
                _ => None,
            };
            let Some(merged) = merged else {
                continue;
            };

            for id in [first, second] {
                if let Some(polygon) = slab[id].take() {
                    unregister(&mut adjacency, id, &polygon);
                }
            }
            register(&mut adjacency, slab.len(), &merged);
            slab.push(Some(merged));
            changed = true;
        }
    }

    slab.into_iter().flatten().collect()
}

fn register<P: MeshPolygon>(
    adjacency: &mut HashMap<VertexKey, Vec<usize>>,
    id: usize,
    polygon: &CsgPolygon<P>,
) {
    for i in 0..polygon.vertex_count() {
        let refs = adjacency
            .entry(vertex_key(polygon.vertex_position(i)))
            .or_default();
        if !refs.contains(&id) {
            refs.push(id);
        }
    }
}

fn unregister<P: MeshPolygon>(
    adjacency: &mut HashMap<VertexKey, Vec<usize>>,
    id: usize,
    polygon: &CsgPolygon<P>,
) {
    for i in 0..polygon.vertex_count() {
        if let Some(refs) = adjacency.get_mut(&vertex_key(polygon.vertex_position(i))) {
            refs.retain(|&r| r != id);
        }
    }
}

/// Which fragment a vertex of the merged ring is copied from.
#[derive(Debug, Clone, Copy)]
enum Source {
    A(usize),
    B(usize),
}

/// Welds `a` and `b` along a shared edge.
///
/// The edge must run `u -> v` in one fragment and `v -> u` in the other, and
/// both fragments must carry the same inversion flag. The junction vertices
/// `u` and `v` are dropped when they end up collinear with their new
/// neighbours. The join is rejected when a junction would turn the face
/// concave or fewer than three vertices would remain.
pub(crate) fn join<P: MeshPolygon>(a: &CsgPolygon<P>, b: &CsgPolygon<P>) -> Option<CsgPolygon<P>> {
    if a.is_inverted() != b.is_inverted() {
        return None;
    }

    let n = a.vertex_count();
    let m = b.vertex_count();
    let (i, j) = (0..n).find_map(|i| {
        let u = a.vertex_position(i);
        let v = a.vertex_position((i + 1) % n);
        let j = b.index_of_vertex(v)?;
        (b.vertex_position((j + 1) % m) == u).then_some((i, j))
    })?;

    // v, ..., u around a, then around b from just past u to just before v
    let mut ring: Vec<Source> = Vec::with_capacity(n + m - 2);
    ring.extend((1..=n).map(|k| Source::A((i + k) % n)));
    ring.extend((2..m).map(|k| Source::B((j + k) % m)));

    let position = |source: Source| match source {
        Source::A(k) => a.vertex_position(k),
        Source::B(k) => b.vertex_position(k),
    };
    // Both fragments come from the same face, so they share its raw winding.
    let normal = a.polygon().face_normal();

    let len = ring.len();
    let mut keep = vec![true; len];
    for junction in [0, n - 1] {
        let prev = position(ring[(junction + len - 1) % len]);
        let cur = position(ring[junction]);
        let next = position(ring[(junction + 1) % len]);
        match junction_turn(prev, cur, next, &normal)? {
            Turn::Straight => keep[junction] = false,
            Turn::Convex => {}
        }
    }

    let kept: Vec<Source> = ring
        .iter()
        .zip(&keep)
        .filter_map(|(&source, &keep)| keep.then_some(source))
        .collect();
    if kept.len() < 3 {
        log::warn!(
            "rejected degenerate join of origin {} ({} vertices left)",
            a.origin().get(),
            kept.len()
        );
        return None;
    }

    let mut merged = a.with_vertex_capacity(kept.len());
    for (target, source) in kept.into_iter().enumerate() {
        match source {
            Source::A(k) => merged.copy_vertex_from(target, a, k),
            Source::B(k) => merged.copy_vertex_from(target, b, k),
        }
    }
    Some(merged)
}

enum Turn {
    Straight,
    Convex,
}

/// Classifies the corner at `cur`. Returns `None` for a reflex or folded
/// corner, which no convex face may contain.
fn junction_turn(
    prev: Point3<f32>,
    cur: Point3<f32>,
    next: Point3<f32>,
    normal: &Vector3<f32>,
) -> Option<Turn> {
    let base = (next - prev).norm();
    if base <= PLANE_EPSILON {
        return None;
    }
    // Signed distance of `cur` from the line through `prev` and `next`
    let height = (cur - prev).cross(&(next - cur)).dot(normal) / base;
    if height.abs() <= PLANE_EPSILON {
        Some(Turn::Straight)
    } else if height > 0.0 {
        Some(Turn::Convex)
    } else {
        None
    }
}
