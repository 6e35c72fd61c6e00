use super::vec2::Vec2;

/// A 2x2 rotation matrix stored as its cosine and sine.
///
/// Building one costs a `sin`/`cos` pair; applying it is four multiplies.
/// Geometry queries build one per body per query rather than caching it,
/// since orientation changes every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub cos: f64,
    pub sin: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation { cos: 1.0, sin: 0.0 };

    /// Rotation matrix for `angle` radians counter-clockwise.
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { cos, sin }
    }

    /// The angle this matrix rotates by, in [-PI, PI].
    pub fn angle(self) -> f64 {
        self.sin.atan2(self.cos)
    }

    /// Rotates `v` counter-clockwise.
    pub fn apply(self, v: Vec2) -> Vec2 {
        Vec2::new(v.x * self.cos - v.y * self.sin, v.x * self.sin + v.y * self.cos)
    }

    /// Rotates `v` clockwise (multiplies by the transpose).
    pub fn apply_inverse(self, v: Vec2) -> Vec2 {
        Vec2::new(v.x * self.cos + v.y * self.sin, -v.x * self.sin + v.y * self.cos)
    }

    /// The opposite rotation.
    pub fn inverse(self) -> Self {
        Self {
            cos: self.cos,
            sin: -self.sin,
        }
    }

    /// `self` followed by `other`.
    pub fn then(self, other: Rotation) -> Self {
        Self {
            cos: self.cos * other.cos - self.sin * other.sin,
            sin: self.sin * other.cos + self.cos * other.sin,
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}
