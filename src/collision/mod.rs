pub mod detector;
pub mod event;
pub mod sat;

// Re-export key types
pub use detector::{Collider, CollisionDetector, ContactImpulse, ContactResponder};
pub use event::{CollisionEvent, ContactGeometry, Participant};
pub use sat::{AxisOverlap, AxisSource, WorldShape};
