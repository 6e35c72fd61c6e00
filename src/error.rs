//! Error types for the collision engine.
//!
//! Validation happens at the boundary: shape construction and `Simulation::step`.
//! Numeric edge cases inside the step loop are handled locally and never surface here.

use thiserror::Error;

use crate::objects::BodyHandle;
use crate::player::PlayerId;

/// Result alias used throughout the crate.
pub type PhysicsResult<T> = Result<T, PhysicsError>;

/// The specific way a piece of geometry is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryDefect {
    /// A polygon needs at least three vertices.
    #[error("polygon has {count} vertices, at least 3 required")]
    TooFewVertices { count: usize },
    /// The edge starting at `index` has (numerically) zero length.
    #[error("edge {index} has zero length")]
    ZeroLengthEdge { index: usize },
    /// The turn at vertex `index` goes the wrong way.
    #[error("polygon is not convex at vertex {index}")]
    NonConvex { index: usize },
    /// The vertices enclose no area.
    #[error("polygon has zero area")]
    ZeroArea,
    /// Circle radius is non-positive or not finite.
    #[error("invalid circle radius {radius}")]
    InvalidRadius { radius: f64 },
    /// Segment length is non-positive or not finite.
    #[error("invalid segment length {length}")]
    InvalidLength { length: f64 },
    /// Vertex `index` has a NaN or infinite coordinate.
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
}

/// Errors surfaced to callers of the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A shape failed validation at construction.
    #[error("degenerate geometry: {defect}")]
    DegenerateGeometry {
        /// What is wrong with the geometry.
        defect: GeometryDefect,
    },

    /// `step` was called with a non-positive or non-finite time delta.
    #[error("invalid timestep: dt = {dt} (must be positive and finite)")]
    InvalidTimestep {
        /// The rejected time delta.
        dt: f64,
    },

    /// A dynamic body was given a negative or non-finite mass.
    #[error("invalid mass: {mass}")]
    InvalidMass {
        /// The rejected mass.
        mass: f64,
    },

    /// A material coefficient was NaN.
    #[error("invalid material: coefficients must not be NaN")]
    InvalidMaterial,

    /// The handle does not name a live body.
    #[error("unknown body: {handle}")]
    UnknownBody {
        /// The stale or foreign handle.
        handle: BodyHandle,
    },

    /// The index does not name a live boundary element.
    #[error("unknown boundary: {index}")]
    UnknownBoundary {
        /// The stale index.
        index: usize,
    },

    /// The id does not name a registered player controller.
    #[error("unknown player: {id}")]
    UnknownPlayer {
        /// The stale id.
        id: PlayerId,
    },
}

impl PhysicsError {
    /// Creates a degenerate geometry error.
    #[must_use]
    pub const fn degenerate(defect: GeometryDefect) -> Self {
        Self::DegenerateGeometry { defect }
    }

    /// True for any geometry validation failure.
    #[must_use]
    pub const fn is_degenerate_geometry(&self) -> bool {
        matches!(self, Self::DegenerateGeometry { .. })
    }
}

impl From<GeometryDefect> for PhysicsError {
    fn from(defect: GeometryDefect) -> Self {
        Self::degenerate(defect)
    }
}
