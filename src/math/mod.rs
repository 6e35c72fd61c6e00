pub mod rotation;
pub mod transform;
pub mod vec2;

pub use rotation::Rotation;
pub use transform::Transform;
pub use vec2::Vec2;
