//! Discrete 2D rigid-body collision engine.
//!
//! Circles and convex polygons move through a [`Simulation`], collide with one
//! another and with static [`BoundaryElement`]s, and are pushed apart by
//! impulses computed from restitution, Coulomb friction and angular response.
//! Narrow-phase detection is a separating-axis test.

pub mod collision;
pub mod common;
pub mod error;
pub mod integration;
pub mod math;
pub mod objects;
pub mod player;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{CollisionDetector, CollisionEvent, ContactGeometry, Participant};
pub use common::{Material, SimulationConfig};
pub use error::{GeometryDefect, PhysicsError, PhysicsResult};
pub use math::vec2::Vec2;
pub use objects::{BodyHandle, BoundaryElement, RigidBody};
pub use player::{ControlInput, PlayerController, PlayerId};
pub use shapes::{Circle, Polygon, Shape};
pub use world::Simulation;
