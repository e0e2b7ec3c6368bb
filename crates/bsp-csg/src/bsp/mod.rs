//! Binary Space Partitioning trees for CSG.
//!
//! A [`CsgTree`] holds one solid as a BSP tree whose nodes each own the
//! polygons lying in their splitting plane. Boolean operations are fixed
//! sequences of [`CsgTree::invert`], [`CsgTree::clip_to`] and
//! [`CsgTree::add_all`] over two trees (see [`crate::Operation`]).
//!
//! # Example
//!
//! ```
//! use bsp_csg::bsp::CsgTree;
//! use bsp_csg::shapes::cuboid;
//! use nalgebra::Point3;
//!
//! let a = CsgTree::from_polygons(cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)));
//! let b = CsgTree::from_polygons(cuboid(Point3::new(0.5, 0.5, 0.5), Point3::new(1.5, 1.5, 1.5)));
//!
//! let union = bsp_csg::union_trees(a, b).recombined_polygons();
//! assert!(!union.is_empty());
//! ```
//!
//! # Architecture
//!
//! - [`CsgTree`]: the root handle with the lazy inversion flag
//! - [`BspNode`]: splitting plane, coplanar polygons and two optional children
//! - [`TreeTemplate`]: a flat polygon list rebuilt into fresh trees on demand
//! - `SplitAcceptor`: the build and clip strategies plane splits report to

mod acceptor;
mod node;
mod template;
mod tree;

pub(crate) use acceptor::SplitAcceptor;
pub use node::{faces_same_direction, BspNode};
pub use template::TreeTemplate;
pub use tree::{CsgTree, Polygons};
