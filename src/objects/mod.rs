pub mod boundary_element;
pub mod rigid_body;

pub use boundary_element::BoundaryElement;
pub use rigid_body::RigidBody;

use std::fmt;

/// Stable, non-owning reference to a body slot in a [`Simulation`](crate::world::Simulation).
///
/// Handles stay valid (and keep naming the same body) when other bodies are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) usize);

impl BodyHandle {
    /// Handle naming slot `index`. Nothing checks that the slot is occupied:
    /// [`Simulation`](crate::world::Simulation) lookups report
    /// [`UnknownBody`](crate::PhysicsError::UnknownBody) for an empty one.
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Slot index; also the body's position in step iteration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body #{}", self.0)
    }
}
