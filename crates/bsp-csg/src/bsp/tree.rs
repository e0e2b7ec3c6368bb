//! BSP tree container: construction, lazy inversion, clipping and draining.

use crate::{CsgError, CsgPolygon, MeshPolygon, Recombinator};

use super::acceptor::{BuildAcceptor, ClipAcceptor};
use super::node::BspNode;

/// A Binary Space Partitioning tree over CSG polygons.
///
/// The tree is grown by inserting polygons one at a time; the first
/// polygon's plane becomes the root plane and later polygons are split
/// against existing planes on their way down. A boolean operation then
/// mutates two trees in place with [`invert`](Self::invert),
/// [`clip_to`](Self::clip_to) and [`add_all`](Self::add_all) before the
/// result is drained.
///
/// # Lazy inversion
///
/// Inverting flips a single flag. Every reader combines the stored planes,
/// child links and polygon facings with that flag, so inversion costs O(1)
/// instead of touching every node. Polygons stored in the tree carry their
/// inversion flag relative to the tree; [`into_polygons`](Self::into_polygons)
/// turns it back into an absolute one.
///
/// # No recursion
///
/// Building, clipping, iterating and dropping all use explicit stacks, so
/// very deep trees cannot overflow the native stack.
///
/// # Cloning
///
/// Deep clones are not provided; see [`try_clone`](Self::try_clone) and
/// [`TreeTemplate`](super::TreeTemplate).
#[derive(Debug)]
pub struct CsgTree<P> {
    root: Option<BspNode<P>>,
    inverted: bool,
}

impl<P> Default for CsgTree<P> {
    fn default() -> Self {
        Self {
            root: None,
            inverted: false,
        }
    }
}

impl<P: MeshPolygon> CsgTree<P> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from original input polygons, giving each a fresh
    /// origin id.
    pub fn from_polygons<I>(polygons: I) -> Self
    where
        I: IntoIterator<Item = P>,
    {
        Self::from_csg_polygons(polygons.into_iter().map(CsgPolygon::new))
    }

    /// Builds a tree from already tagged polygons.
    pub fn from_csg_polygons<I>(polygons: I) -> Self
    where
        I: IntoIterator<Item = CsgPolygon<P>>,
    {
        let mut tree = Self::new();
        tree.add_all(polygons);
        tree
    }

    /// Returns `true` if the tree contains no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the current inversion flag.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Returns a reference to the root node, if any.
    #[inline]
    pub fn root(&self) -> Option<&BspNode<P>> {
        self.root.as_ref()
    }

    /// Inverts the solid (inside becomes outside). O(1).
    #[inline]
    pub fn invert(&mut self) {
        self.inverted = !self.inverted;
    }

    /// Inserts a polygon, splitting it against the planes on its way down.
    ///
    /// The polygon's inversion flag is taken as absolute.
    pub fn add_polygon(&mut self, mut polygon: CsgPolygon<P>) {
        let inverted = self.inverted;
        polygon.set_inverted(polygon.is_inverted() ^ inverted);

        let Some(root) = self.root.as_mut() else {
            self.root = Some(BspNode::from_polygon(polygon));
            return;
        };

        let mut worklist = vec![(polygon, root)];
        while let Some((polygon, node)) = worklist.pop() {
            let BspNode {
                plane,
                polygons,
                front,
                back,
            } = node;
            let plane = plane.oriented(inverted);
            let (front, back) = if inverted { (back, front) } else { (front, back) };

            let mut acceptor = BuildAcceptor::new(polygons, front, back, &mut worklist);
            plane.split(polygon, inverted, &mut acceptor);
        }
    }

    /// Inserts every polygon in turn.
    pub fn add_all<I>(&mut self, polygons: I)
    where
        I: IntoIterator<Item = CsgPolygon<P>>,
    {
        for polygon in polygons {
            self.add_polygon(polygon);
        }
    }

    /// Removes every part of this tree's polygons that lies inside `other`.
    ///
    /// Each node's polygon list is replaced by what survives clipping
    /// against `other`; nodes themselves are never added or removed.
    pub fn clip_to(&mut self, other: &CsgTree<P>) {
        let flip = self.inverted;
        let Some(root) = self.root.as_mut() else {
            return;
        };

        let mut dropped = 0;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons, flip, &mut dropped);

            if let Some(front) = node.front.as_deref_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref_mut() {
                stack.push(back);
            }
        }
        log::trace!("clip_to dropped {dropped} fragments");
    }

    /// Routes `polygons` through this tree and returns the fragments that
    /// end up outside of it. `flip` is the inversion flag of the tree the
    /// polygons belong to.
    fn clip_polygons(
        &self,
        polygons: Vec<CsgPolygon<P>>,
        flip: bool,
        dropped: &mut usize,
    ) -> Vec<CsgPolygon<P>> {
        let Some(root) = self.root.as_ref() else {
            return polygons;
        };
        let inverted = self.inverted;

        let mut kept = Vec::with_capacity(polygons.len());
        let mut worklist: Vec<_> = polygons.into_iter().map(|p| (p, root)).collect();
        while let Some((polygon, node)) = worklist.pop() {
            let (front, back) = node.oriented_children(inverted);
            let plane = node.oriented_plane(inverted);

            let mut acceptor = ClipAcceptor::new(front, back, &mut worklist, &mut kept, dropped);
            plane.split(polygon, flip, &mut acceptor);
        }
        kept
    }

    /// Iterates over every stored polygon, depth first.
    ///
    /// The order is unspecified. Yielded polygons carry their inversion flag
    /// relative to this tree; combine with [`is_inverted`](Self::is_inverted)
    /// or use [`into_polygons`](Self::into_polygons) for absolute flags.
    pub fn iter(&self) -> Polygons<'_, P> {
        Polygons {
            stack: self.root.iter().collect(),
            current: Default::default(),
        }
    }

    /// Returns the total number of polygons in the tree.
    pub fn polygon_count(&self) -> usize {
        self.iter().count()
    }

    /// Returns the number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&BspNode<P>> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.front());
            stack.extend(node.back());
        }
        count
    }

    /// Returns the maximum depth of the tree (0 for empty tree).
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&BspNode<P>, usize)> = self.root.iter().map(|n| (n, 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.front().map(|n| (n, depth + 1)));
            stack.extend(node.back().map(|n| (n, depth + 1)));
        }
        max_depth
    }

    /// Drains the tree into its polygons, with absolute inversion flags.
    pub fn into_polygons(mut self) -> Vec<CsgPolygon<P>> {
        let inverted = self.inverted;
        let mut result = Vec::new();
        let mut stack: Vec<BspNode<P>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.take_children());
            result.extend(node.polygons.drain(..).map(|mut polygon| {
                polygon.set_inverted(polygon.is_inverted() ^ inverted);
                polygon
            }));
        }
        result
    }

    /// Drains the tree and merges fragments of the same original polygon
    /// back into as few faces as possible.
    ///
    /// This is terminal: call it once the tree is in its final state.
    pub fn recombined_polygons(self) -> Vec<P> {
        Recombinator::new().recombine(self.into_polygons())
    }

    /// Deep cloning a tree is not supported.
    ///
    /// Always returns [`CsgError::Unsupported`]. To reuse a tree, keep its
    /// polygons in a [`TreeTemplate`](super::TreeTemplate) and rebuild.
    pub fn try_clone(&self) -> Result<Self, CsgError> {
        Err(CsgError::Unsupported("deep clone of a BSP tree"))
    }
}

impl<P> Drop for CsgTree<P> {
    fn drop(&mut self) {
        // Boxed children would otherwise be dropped recursively.
        let mut stack: Vec<BspNode<P>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.take_children());
        }
    }
}

impl<'a, P: MeshPolygon> IntoIterator for &'a CsgTree<P> {
    type Item = &'a CsgPolygon<P>;
    type IntoIter = Polygons<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first iterator over the polygons of a [`CsgTree`].
pub struct Polygons<'a, P> {
    stack: Vec<&'a BspNode<P>>,
    current: std::slice::Iter<'a, CsgPolygon<P>>,
}

impl<'a, P> Iterator for Polygons<'a, P> {
    type Item = &'a CsgPolygon<P>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(polygon) = self.current.next() {
                return Some(polygon);
            }
            let node = self.stack.pop()?;
            self.current = node.polygons().iter();
            self.stack.extend(node.front());
            self.stack.extend(node.back());
        }
    }
}
