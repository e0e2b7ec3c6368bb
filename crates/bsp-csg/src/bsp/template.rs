//! Reusable tree templates.

use crate::{CsgPolygon, MeshPolygon};

use super::tree::CsgTree;

/// A solid kept as a flat list of polygons, ready to be rebuilt into a
/// fresh [`CsgTree`] whenever one is needed.
///
/// Trees are consumed by boolean operations and cannot be deep cloned, so
/// a shape used repeatedly is stored here and instantiated by incremental
/// insertion. Instances share origin ids with the template.
#[derive(Debug, Clone)]
pub struct TreeTemplate<P> {
    polygons: Vec<CsgPolygon<P>>,
}

impl<P: MeshPolygon> TreeTemplate<P> {
    /// Creates a template from original input polygons, tagging each with a
    /// fresh origin id.
    pub fn from_polygons<I>(polygons: I) -> Self
    where
        I: IntoIterator<Item = P>,
    {
        Self {
            polygons: polygons.into_iter().map(CsgPolygon::new).collect(),
        }
    }

    /// Captures the current contents of a tree, with absolute inversion flags.
    pub fn from_tree(tree: &CsgTree<P>) -> Self {
        let inverted = tree.is_inverted();
        Self {
            polygons: tree
                .iter()
                .map(|polygon| {
                    let mut polygon = polygon.clone();
                    if inverted {
                        polygon.invert();
                    }
                    polygon
                })
                .collect(),
        }
    }

    /// Builds a new tree holding the template's polygons.
    pub fn instantiate(&self) -> CsgTree<P> {
        CsgTree::from_csg_polygons(self.polygons.iter().cloned())
    }

    #[inline]
    pub fn polygons(&self) -> &[CsgPolygon<P>] {
        &self.polygons
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}
