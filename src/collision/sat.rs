//! Separating-axis primitives over world-space shapes.
//!
//! Every candidate axis is oriented from the first shape toward the second,
//! and the overlap on it is `max(first) - min(second)`: how far the second
//! shape has to travel along the axis to clear the first. A non-positive value
//! proves the shapes disjoint.

use crate::math::vec2::{Vec2, LENGTH_EPSILON};
use crate::objects::{BoundaryElement, RigidBody};
use crate::shapes::Shape;

/// Axes this far past perpendicular to a boundary's free side still count as sideways.
const BACKWARD_TOLERANCE: f64 = 1e-9;

/// A shape frozen in world space for one narrow-phase query.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldShape {
    Disc {
        center: Vec2,
        radius: f64,
    },
    /// Convex hull with one outward normal per face; face `i` runs from vertex
    /// `i` to vertex `i + 1`. A one-sided hull is a boundary segment whose single
    /// normal is a fixed push direction.
    Hull {
        vertices: Vec<Vec2>,
        normals: Vec<Vec2>,
        center: Vec2,
        one_sided: bool,
    },
}

impl WorldShape {
    pub fn of_body(body: &RigidBody) -> Self {
        match body.shape() {
            Shape::Circle(circle) => WorldShape::Disc {
                center: body.position,
                radius: circle.radius(),
            },
            Shape::Polygon(_) => WorldShape::Hull {
                vertices: body.global_vertices(),
                normals: body.global_normals(),
                center: body.position,
                one_sided: false,
            },
        }
    }

    pub fn of_boundary(boundary: &BoundaryElement) -> Self {
        WorldShape::Hull {
            vertices: boundary.global_vertices().to_vec(),
            normals: vec![boundary.global_normal()],
            center: boundary.position(),
            one_sided: true,
        }
    }

    pub fn center(&self) -> Vec2 {
        match self {
            WorldShape::Disc { center, .. } | WorldShape::Hull { center, .. } => *center,
        }
    }

    fn normals(&self) -> &[Vec2] {
        match self {
            WorldShape::Disc { .. } => &[],
            WorldShape::Hull { normals, .. } => normals,
        }
    }

    fn is_one_sided(&self) -> bool {
        matches!(self, WorldShape::Hull { one_sided: true, .. })
    }

    /// Projection interval `(min, max)` onto `axis`.
    pub fn project(&self, axis: Vec2) -> (f64, f64) {
        match self {
            WorldShape::Disc { center, radius } => {
                let c = center.dot(axis);
                (c - radius, c + radius)
            }
            WorldShape::Hull { vertices, .. } => vertices.iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(min, max), v| {
                    let p = v.dot(axis);
                    (min.min(p), max.max(p))
                },
            ),
        }
    }
}

/// Where a candidate axis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSource {
    /// Face normal `i` of the first shape.
    FirstFace(usize),
    /// Face normal `i` of the second shape.
    SecondFace(usize),
    /// Center-to-center axis of two discs, or closest-vertex-to-center axis of a disc and a hull.
    Radial,
}

/// Overlap of both projections on one oriented candidate axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisOverlap {
    /// Unit axis, oriented from the first shape toward the second.
    pub axis: Vec2,
    pub overlap: f64,
    pub source: AxisSource,
}

/// Candidate axes in test order: faces of the first shape, faces of the
/// second, then the radial axis when a disc is involved.
pub fn candidate_axes(first: &WorldShape, second: &WorldShape) -> Vec<(Vec2, AxisSource)> {
    let center_delta = second.center() - first.center();
    // Two-sided axes point from first to second; a boundary normal is fixed.
    let orient = |axis: Vec2| {
        if center_delta.dot(axis) < 0.0 {
            -axis
        } else {
            axis
        }
    };

    let mut axes = Vec::with_capacity(first.normals().len() + second.normals().len() + 1);
    for (i, &n) in first.normals().iter().enumerate() {
        let axis = if first.is_one_sided() { n } else { orient(n) };
        axes.push((axis, AxisSource::FirstFace(i)));
    }
    for (i, &n) in second.normals().iter().enumerate() {
        let axis = if second.is_one_sided() { -n } else { orient(n) };
        axes.push((axis, AxisSource::SecondFace(i)));
    }

    let radial = match (first, second) {
        (WorldShape::Disc { center: a, .. }, WorldShape::Disc { center: b, .. }) => {
            let delta = *b - *a;
            Some(if delta.magnitude() > LENGTH_EPSILON {
                delta.normalize()
            } else {
                // Concentric discs: any axis separates them equally badly
                Vec2::UP
            })
        }
        (WorldShape::Disc { center, .. }, WorldShape::Hull { vertices, .. })
        | (WorldShape::Hull { vertices, .. }, WorldShape::Disc { center, .. }) => {
            closest_vertex(vertices, *center)
                .map(|v| (*center - v).normalize())
                .filter(|axis| *axis != Vec2::ZERO)
                .map(orient)
        }
        _ => None,
    };
    if let Some(axis) = radial {
        axes.push((axis, AxisSource::Radial));
    }
    axes
}

/// Overlap of the two shapes on `axis` (already oriented first -> second).
pub fn overlap_on_axis(first: &WorldShape, second: &WorldShape, axis: Vec2) -> f64 {
    let (_, max_first) = first.project(axis);
    let (min_second, _) = second.project(axis);
    max_first - min_second
}

/// Every candidate axis with its overlap, without early exit.
pub fn axis_overlaps(first: &WorldShape, second: &WorldShape) -> Vec<AxisOverlap> {
    candidate_axes(first, second)
        .into_iter()
        .map(|(axis, source)| AxisOverlap {
            axis,
            overlap: overlap_on_axis(first, second, axis),
            source,
        })
        .collect()
}

/// The minimum-overlap axis, or `None` as soon as any axis separates the shapes.
/// Exact ties keep the axis tested first.
///
/// Against a one-sided boundary every axis still takes part in the separation
/// test, but only axes that do not point back through the boundary may win.
/// A body whose center has sunk behind the line is still pushed to the free side.
pub fn minimum_overlap(first: &WorldShape, second: &WorldShape) -> Option<AxisOverlap> {
    let free_side = free_direction(first, second);
    let mut best: Option<AxisOverlap> = None;
    for (axis, source) in candidate_axes(first, second) {
        let overlap = overlap_on_axis(first, second, axis);
        if overlap <= 0.0 {
            return None;
        }
        if free_side.is_some_and(|free| axis.dot(free) < -BACKWARD_TOLERANCE) {
            continue;
        }
        if best.map_or(true, |b| overlap < b.overlap) {
            best = Some(AxisOverlap {
                axis,
                overlap,
                source,
            });
        }
    }
    best
}

/// Direction a winning axis may not point against when one side is a boundary.
fn free_direction(first: &WorldShape, second: &WorldShape) -> Option<Vec2> {
    if first.is_one_sided() {
        first.normals().first().copied()
    } else if second.is_one_sided() {
        second.normals().first().map(|n| -*n)
    } else {
        None
    }
}

fn closest_vertex(vertices: &[Vec2], point: Vec2) -> Option<Vec2> {
    vertices.iter().copied().min_by(|a, b| {
        a.distance_squared(point)
            .total_cmp(&b.distance_squared(point))
    })
}
