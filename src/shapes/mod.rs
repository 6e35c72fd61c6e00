pub mod boundary;
pub mod circle;
pub mod polygon;

pub use boundary::Segment;
pub use circle::Circle;
pub use polygon::Polygon;

use crate::math::vec2::Vec2;

/// Geometry of a movable body. The set is closed, so queries dispatch with `match`.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
}

/// Signed distance from a point to the nearest supporting edge of a hull.
///
/// Positive means the point lies outside edge `index`; when every value is
/// negative the point is inside and `separation` is how far it must travel
/// along `normal` to leave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSeparation {
    pub separation: f64,
    pub index: usize,
    pub normal: Vec2,
}

impl Shape {
    pub fn area(&self) -> f64 {
        match self {
            Shape::Circle(circle) => circle.area(),
            Shape::Polygon(polygon) => polygon.area(),
        }
    }

    /// Moment of inertia about the centroid for a body of uniform density and total `mass`.
    pub fn inertia(&self, mass: f64) -> f64 {
        match self {
            Shape::Circle(circle) => circle.inertia(mass),
            Shape::Polygon(polygon) => polygon.inertia(mass),
        }
    }

    /// Distance from the centroid to the farthest point of the shape.
    pub fn bounding_radius(&self) -> f64 {
        match self {
            Shape::Circle(circle) => circle.radius(),
            Shape::Polygon(polygon) => polygon
                .vertices()
                .iter()
                .map(|v| v.magnitude())
                .fold(0.0, f64::max),
        }
    }

    /// Number of stored points: 1 for a circle (its center), the vertex count for a polygon.
    pub fn point_count(&self) -> usize {
        match self {
            Shape::Circle(_) => 1,
            Shape::Polygon(polygon) => polygon.vertex_count(),
        }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon(polygon)
    }
}
