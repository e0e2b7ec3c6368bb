//! The two ways a split result can be routed through a tree.
//!
//! [`Plane3D::split`](crate::Plane3D) classifies one polygon against one
//! node; the acceptor decides what happens to each outcome. Both acceptors
//! are driven by explicit worklists of `(polygon, node)` pairs, so routing a
//! polygon down a tree never recurses.

use crate::CsgPolygon;

use super::node::BspNode;

/// Receives the classification outcomes of a plane split.
///
/// Implemented by exactly two strategies: [`BuildAcceptor`] grows the tree,
/// [`ClipAcceptor`] routes polygons through a tree without changing it.
pub(crate) trait SplitAcceptor<P> {
    fn accept_front(&mut self, polygon: CsgPolygon<P>);
    fn accept_back(&mut self, polygon: CsgPolygon<P>);
    fn accept_coplanar_front(&mut self, polygon: CsgPolygon<P>);
    fn accept_coplanar_back(&mut self, polygon: CsgPolygon<P>);
}

type ChildSlot<'a, P> = &'a mut Option<Box<BspNode<P>>>;

/// Inserts polygons into the tree being built.
///
/// Front and back fragments descend into the matching child, or become a
/// new leaf when that child is missing. Coplanar fragments of either facing
/// stay at the current node.
pub(crate) struct BuildAcceptor<'w, 'a, P> {
    coplanar: &'a mut Vec<CsgPolygon<P>>,
    front: Option<ChildSlot<'a, P>>,
    back: Option<ChildSlot<'a, P>>,
    worklist: &'w mut Vec<(CsgPolygon<P>, &'a mut BspNode<P>)>,
}

impl<'w, 'a, P: crate::MeshPolygon> BuildAcceptor<'w, 'a, P> {
    /// `front` and `back` are the child slots as oriented for the tree's
    /// current inversion.
    pub(crate) fn new(
        coplanar: &'a mut Vec<CsgPolygon<P>>,
        front: ChildSlot<'a, P>,
        back: ChildSlot<'a, P>,
        worklist: &'w mut Vec<(CsgPolygon<P>, &'a mut BspNode<P>)>,
    ) -> Self {
        Self {
            coplanar,
            front: Some(front),
            back: Some(back),
            worklist,
        }
    }

    fn descend(&mut self, slot: Option<ChildSlot<'a, P>>, polygon: CsgPolygon<P>) {
        let Some(slot) = slot else {
            unreachable!("a split yields at most one fragment per side");
        };
        if slot.is_none() {
            *slot = Some(Box::new(BspNode::from_polygon(polygon)));
        } else if let Some(child) = slot.as_deref_mut() {
            self.worklist.push((polygon, child));
        }
    }
}

impl<P: crate::MeshPolygon> SplitAcceptor<P> for BuildAcceptor<'_, '_, P> {
    fn accept_front(&mut self, polygon: CsgPolygon<P>) {
        let slot = self.front.take();
        self.descend(slot, polygon);
    }

    fn accept_back(&mut self, polygon: CsgPolygon<P>) {
        let slot = self.back.take();
        self.descend(slot, polygon);
    }

    fn accept_coplanar_front(&mut self, polygon: CsgPolygon<P>) {
        self.coplanar.push(polygon);
    }

    fn accept_coplanar_back(&mut self, polygon: CsgPolygon<P>) {
        self.coplanar.push(polygon);
    }
}

/// Routes polygons through another tree, keeping only what ends up outside
/// of it.
///
/// A fragment reaching a missing front child is outside every plane on its
/// path and survives; one reaching a missing back child is inside and is
/// dropped. Coplanar fragments follow the side their facing selects.
pub(crate) struct ClipAcceptor<'w, 'a, P> {
    front: Option<&'a BspNode<P>>,
    back: Option<&'a BspNode<P>>,
    worklist: &'w mut Vec<(CsgPolygon<P>, &'a BspNode<P>)>,
    kept: &'w mut Vec<CsgPolygon<P>>,
    dropped: &'w mut usize,
}

impl<'w, 'a, P> ClipAcceptor<'w, 'a, P> {
    /// `front` and `back` are the children as oriented for the clipping
    /// tree's current inversion.
    pub(crate) fn new(
        front: Option<&'a BspNode<P>>,
        back: Option<&'a BspNode<P>>,
        worklist: &'w mut Vec<(CsgPolygon<P>, &'a BspNode<P>)>,
        kept: &'w mut Vec<CsgPolygon<P>>,
        dropped: &'w mut usize,
    ) -> Self {
        Self {
            front,
            back,
            worklist,
            kept,
            dropped,
        }
    }
}

impl<P> SplitAcceptor<P> for ClipAcceptor<'_, '_, P> {
    fn accept_front(&mut self, polygon: CsgPolygon<P>) {
        match self.front {
            Some(child) => self.worklist.push((polygon, child)),
            None => self.kept.push(polygon),
        }
    }

    fn accept_back(&mut self, polygon: CsgPolygon<P>) {
        match self.back {
            Some(child) => self.worklist.push((polygon, child)),
            None => *self.dropped += 1,
        }
    }

    // Coplanar fragments keep descending on purpose; stopping here would keep
    // both copies of a shared face in a union.
    fn accept_coplanar_front(&mut self, polygon: CsgPolygon<P>) {
        self.accept_front(polygon);
    }

    fn accept_coplanar_back(&mut self, polygon: CsgPolygon<P>) {
        self.accept_back(polygon);
    }
}
