//! BSP (Binary Space Partitioning) based constructive solid geometry.
//!
//! Solids are polygon soups. Each input of a boolean operation is built into
//! a [`CsgTree`]; [`union`], [`intersect`] and [`difference`] run fixed
//! sequences of tree operations over the two trees, and the [`Recombinator`]
//! heals the resulting fragments back into whole faces.
//!
//! The engine works against the [`MeshPolygon`] trait, so callers keep their
//! own vertex layout. [`Polygon`] is a ready-made implementation.
//!
//! ```
//! use bsp_csg::shapes::cuboid;
//! use bsp_csg::{intersect, signed_volume};
//! use nalgebra::Point3;
//!
//! let a = cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
//! let b = cuboid(Point3::new(0.5, 0.5, 0.5), Point3::new(1.5, 1.5, 1.5));
//!
//! let overlap = intersect(a, b);
//! assert!((signed_volume(&overlap) - 0.125).abs() < 1e-4);
//! ```

mod aabb;
pub mod bsp;
mod csg_polygon;
mod error;
mod measure;
mod ops;
mod plane;
mod polygon;
mod recombine;
mod rectangle;
pub mod shapes;

pub use aabb::Aabb;
pub use bsp::{BspNode, CsgTree, TreeTemplate};
pub use csg_polygon::{CsgPolygon, OriginId};
pub use error::CsgError;
pub use measure::{bounding_box, polygon_area, signed_volume, surface_area};
pub use ops::{
    complement, difference, difference_trees, difference_with, intersect, intersect_trees,
    intersect_with, union, union_trees, union_with, CsgOptions, Operation,
};
pub use plane::{Plane3D, PlaneSide, PLANE_EPSILON};
pub use polygon::{MeshPolygon, Polygon, Vertex};
pub use recombine::Recombinator;
pub use rectangle::Rectangle;
