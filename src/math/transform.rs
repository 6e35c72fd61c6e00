use super::rotation::Rotation;
use super::vec2::Vec2;

/// Placement of a body frame in the world: translation plus orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: Rotation,
}

impl Transform {
    /// Creates a new transform from a position and an angle in radians.
    pub fn new(position: Vec2, angle: f64) -> Self {
        Self {
            position,
            rotation: Rotation::from_angle(angle),
        }
    }

    /// Creates an identity transform (no translation, no rotation).
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: Rotation::IDENTITY,
        }
    }

    /// Maps a local point to world space (rotation then translation).
    pub fn apply(&self, point: Vec2) -> Vec2 {
        self.rotation.apply(point) + self.position
    }

    /// Maps a world point back to local space.
    pub fn apply_inverse(&self, point: Vec2) -> Vec2 {
        self.rotation.apply_inverse(point - self.position)
    }

    /// Maps a local direction to world space. Translation does not apply.
    pub fn apply_direction(&self, direction: Vec2) -> Vec2 {
        self.rotation.apply(direction)
    }

    /// Maps a world direction back to local space.
    pub fn apply_inverse_direction(&self, direction: Vec2) -> Vec2 {
        self.rotation.apply_inverse(direction)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
