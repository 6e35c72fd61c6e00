//! Static level geometry.

use crate::common::Material;
use crate::error::PhysicsResult;
use crate::math::{Transform, Vec2};
use crate::shapes::{PointSeparation, Segment};

/// An immovable, one-sided wall segment.
///
/// It exposes the same vertex/normal queries as a polygon body, with two
/// vertices and a single normal pointing to the free side. Inverse mass and
/// inverse inertia are always 0, and the element is never integrated. Once
/// built it cannot be changed; reposition it by building a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryElement {
    segment: Segment,
    position: Vec2,
    rotation: f64,
    material: Material,
}

impl BoundaryElement {
    /// Horizontal segment of `length` centred on the origin, free side up.
    pub fn new(length: f64) -> PhysicsResult<Self> {
        Ok(Self {
            segment: Segment::new(length)?,
            position: Vec2::ZERO,
            rotation: 0.0,
            material: Material::default(),
        })
    }

    /// Segment from `start` to `end` in world space. The free side is on the left of `start -> end`.
    pub fn between(start: Vec2, end: Vec2) -> PhysicsResult<Self> {
        let span = end - start;
        Ok(Self::new(span.magnitude())?
            .with_position((start + end) * 0.5)
            .with_rotation(span.angle()))
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn length(&self) -> f64 {
        self.segment.length()
    }

    pub fn inv_mass(&self) -> f64 {
        0.0
    }

    pub fn inv_inertia(&self) -> f64 {
        0.0
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }

    pub fn point_count(&self) -> usize {
        2
    }

    pub fn global_vertex(&self, index: usize) -> Option<Vec2> {
        self.segment
            .vertices()
            .get(index)
            .map(|&v| self.transform().apply(v))
    }

    /// Both endpoints in world space.
    pub fn global_vertices(&self) -> [Vec2; 2] {
        let transform = self.transform();
        let [a, b] = *self.segment.vertices();
        [transform.apply(a), transform.apply(b)]
    }

    /// World normal of the free side.
    pub fn global_normal(&self) -> Vec2 {
        self.transform().apply_direction(self.segment.normal())
    }

    /// Signed height of a world point above the segment's line, measured along the free-side normal.
    pub fn point_separation(&self, point: Vec2) -> PointSeparation {
        let [start, _] = self.global_vertices();
        let normal = self.global_normal();
        PointSeparation {
            separation: normal.dot(point - start),
            index: 0,
            normal,
        }
    }
}
