//! Boolean operations on solids.
//!
//! Each operation is a fixed sequence of [`CsgTree::invert`],
//! [`CsgTree::clip_to`] and [`CsgTree::add_all`] over the trees of the two
//! inputs. The order of the steps is part of the semantics.
//!
//! The polygon-level entry points wrap the tree sequences with an
//! axis-aligned bounding box pre-filter and a final
//! [`Recombinator`] pass, both controlled by [`CsgOptions`].

use crate::bsp::CsgTree;
use crate::{bounding_box, Aabb, CsgPolygon, MeshPolygon, Recombinator};

/// Tuning for the polygon-level boolean operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsgOptions {
    /// Skip the trees for inputs whose bounding boxes cannot touch, and for
    /// polygons of the first input that miss a second input reaching outside
    /// the first input's box.
    pub bounding_box_filter: bool,
    /// Merge fragments of the same input polygon before returning.
    pub recombine: bool,
    /// Emit merged faces as quads and triangles only.
    pub quads_only: bool,
}

impl Default for CsgOptions {
    fn default() -> Self {
        Self {
            bounding_box_filter: true,
            recombine: true,
            quads_only: true,
        }
    }
}

impl CsgOptions {
    pub fn with_bounding_box_filter(mut self, enabled: bool) -> Self {
        self.bounding_box_filter = enabled;
        self
    }

    pub fn with_recombine(mut self, enabled: bool) -> Self {
        self.recombine = enabled;
        self
    }

    pub fn with_quads_only(mut self, enabled: bool) -> Self {
        self.quads_only = enabled;
        self
    }

    fn finish<P: MeshPolygon>(&self, polygons: Vec<CsgPolygon<P>>) -> Vec<P> {
        if self.recombine {
            Recombinator::new()
                .with_quads_only(self.quads_only)
                .recombine(polygons)
        } else {
            polygons.into_iter().map(CsgPolygon::into_polygon).collect()
        }
    }
}

/// The three boolean operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Everything inside either solid.
    Union,
    /// Everything inside both solids.
    Intersect,
    /// Everything inside the first solid but not the second.
    Difference,
}

impl Operation {
    /// Applies the operation to two trees, consuming both.
    pub fn apply_trees<P: MeshPolygon>(self, a: CsgTree<P>, b: CsgTree<P>) -> CsgTree<P> {
        match self {
            Operation::Union => union_trees(a, b),
            Operation::Intersect => intersect_trees(a, b),
            Operation::Difference => difference_trees(a, b),
        }
    }

    /// Applies the operation to two polygon soups.
    ///
    /// With [`CsgOptions::bounding_box_filter`] set, solids whose boxes do
    /// not touch skip the trees entirely. Otherwise polygons of A whose box
    /// misses B's box skip the trees, but only when B's box reaches outside
    /// A's box; a B enclosed by A's box may sit in A's interior, where every
    /// face of A matters for clipping it.
    pub fn apply<P: MeshPolygon>(self, a: Vec<P>, b: Vec<P>, options: &CsgOptions) -> Vec<P> {
        let (a_len, b_len) = (a.len(), b.len());

        if self == Operation::Intersect && (a.is_empty() || b.is_empty()) {
            log::debug!("{self:?}: empty input, nothing to intersect");
            return Vec::new();
        }

        let filter = options.bounding_box_filter;
        let boxes = match (bounding_box(&a), bounding_box(&b)) {
            (Some(a_box), Some(b_box)) => Some((a_box, b_box)),
            _ => None,
        };

        if filter && !boxes.is_some_and(|(a_box, b_box)| a_box.intersects(&b_box)) {
            let polygons: Vec<CsgPolygon<P>> = match self {
                Operation::Union => a.into_iter().chain(b).map(CsgPolygon::new).collect(),
                Operation::Intersect => Vec::new(),
                Operation::Difference => a.into_iter().map(CsgPolygon::new).collect(),
            };
            log::debug!("{self:?}: {a_len} + {b_len} polygons, operands cannot touch");
            return options.finish(polygons);
        }

        let (outer, inner) = match boxes {
            Some((a_box, b_box))
                if filter && self != Operation::Intersect && !a_box.contains_aabb(&b_box) =>
            {
                partition_outside(a, &b_box)
            }
            _ => (Vec::new(), a),
        };
        let bypassed = outer.len();

        let mut polygons: Vec<CsgPolygon<P>> = outer.into_iter().map(CsgPolygon::new).collect();
        let a = CsgTree::from_polygons(inner);
        let b = CsgTree::from_polygons(b);
        polygons.extend(self.apply_trees(a, b).into_polygons());

        let output = options.finish(polygons);
        log::debug!(
            "{self:?}: {a_len} + {b_len} polygons, {bypassed} bypassed, {} out",
            output.len()
        );
        output
    }
}

/// Union of two trees: `A ∪ B`.
pub fn union_trees<P: MeshPolygon>(mut a: CsgTree<P>, mut b: CsgTree<P>) -> CsgTree<P> {
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.add_all(b.into_polygons());
    a
}

/// Intersection of two trees: `A ∩ B`.
///
/// An empty operand does not empty the result at this level; use
/// [`intersect`] for the set-theoretic behaviour.
pub fn intersect_trees<P: MeshPolygon>(mut a: CsgTree<P>, mut b: CsgTree<P>) -> CsgTree<P> {
    a.invert();
    b.clip_to(&a);
    b.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    a.add_all(b.into_polygons());
    a.invert();
    a
}

/// Difference of two trees: `A - B`.
pub fn difference_trees<P: MeshPolygon>(mut a: CsgTree<P>, mut b: CsgTree<P>) -> CsgTree<P> {
    a.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.add_all(b.into_polygons());
    a.invert();
    a
}

/// `A ∪ B` with default options.
pub fn union<P: MeshPolygon>(a: Vec<P>, b: Vec<P>) -> Vec<P> {
    union_with(a, b, &CsgOptions::default())
}

pub fn union_with<P: MeshPolygon>(a: Vec<P>, b: Vec<P>, options: &CsgOptions) -> Vec<P> {
    Operation::Union.apply(a, b, options)
}

/// `A ∩ B` with default options.
pub fn intersect<P: MeshPolygon>(a: Vec<P>, b: Vec<P>) -> Vec<P> {
    intersect_with(a, b, &CsgOptions::default())
}

pub fn intersect_with<P: MeshPolygon>(a: Vec<P>, b: Vec<P>, options: &CsgOptions) -> Vec<P> {
    Operation::Intersect.apply(a, b, options)
}

/// `A - B` with default options.
pub fn difference<P: MeshPolygon>(a: Vec<P>, b: Vec<P>) -> Vec<P> {
    difference_with(a, b, &CsgOptions::default())
}

pub fn difference_with<P: MeshPolygon>(a: Vec<P>, b: Vec<P>, options: &CsgOptions) -> Vec<P> {
    Operation::Difference.apply(a, b, options)
}

/// Turns a solid inside out.
pub fn complement<P: MeshPolygon>(a: Vec<P>) -> Vec<P> {
    let mut tree = CsgTree::from_polygons(a);
    tree.invert();
    tree.into_polygons()
        .into_iter()
        .map(CsgPolygon::into_polygon)
        .collect()
}

/// Splits `polygons` into those whose box misses `bounds` and the rest.
fn partition_outside<P: MeshPolygon>(polygons: Vec<P>, bounds: &Aabb) -> (Vec<P>, Vec<P>) {
    polygons.into_iter().partition(|polygon| {
        Aabb::of_polygon(polygon).is_none_or(|aabb| !aabb.intersects(bounds))
    })
}
