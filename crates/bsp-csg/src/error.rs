//! Errors reported by the CSG engine.

/// Errors returned by fallible CSG operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CsgError {
    /// The requested operation is deliberately not provided.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    /// A polygon was given fewer than three vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    /// The vertices do not span a plane (all collinear or coincident).
    #[error("polygon vertices do not span a plane")]
    DegenerateNormal,
}
