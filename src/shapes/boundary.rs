use crate::error::{GeometryDefect, PhysicsResult};
use crate::math::vec2::Vec2;

/// A straight edge of level geometry, laid along the local x axis and centred
/// on the origin. Its single normal is local +y: the free side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    length: f64,
    vertices: [Vec2; 2],
}

impl Segment {
    /// The free-side normal in local space.
    pub const NORMAL: Vec2 = Vec2::UP;

    pub fn new(length: f64) -> PhysicsResult<Self> {
        if !length.is_finite() || length <= 0.0 {
            return Err(GeometryDefect::InvalidLength { length }.into());
        }
        let half = length * 0.5;
        Ok(Self {
            length,
            vertices: [Vec2::new(-half, 0.0), Vec2::new(half, 0.0)],
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Endpoints in local space, left to right.
    pub fn vertices(&self) -> &[Vec2; 2] {
        &self.vertices
    }

    pub fn normal(&self) -> Vec2 {
        Self::NORMAL
    }
}
