use crate::error::{GeometryDefect, PhysicsResult};
use crate::math::vec2::Vec2;

use super::PointSeparation;

/// Edges shorter than this, and turns flatter than this, are rejected.
const GEOMETRY_EPSILON: f64 = 1e-9;

/// A convex polygon in local space.
///
/// Construction validates the hull, rewinds it counter-clockwise and shifts it so
/// the centroid sits at the local origin. The owning body's position is therefore
/// always its center of mass. One outward unit normal is stored per edge, where
/// edge `i` runs from vertex `i` to vertex `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    normals: Vec<Vec2>,
    area: f64,
}

impl Polygon {
    /// Builds a polygon from its vertices in either winding order.
    ///
    /// Fails with [`GeometryDefect`] if there are fewer than three vertices, a
    /// coordinate is not finite, two consecutive vertices coincide, the hull
    /// encloses no area or the hull is not convex.
    pub fn new(vertices: Vec<Vec2>) -> PhysicsResult<Self> {
        let n = vertices.len();
        if n < 3 {
            return Err(GeometryDefect::TooFewVertices { count: n }.into());
        }
        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(GeometryDefect::NonFiniteCoordinate { index }.into());
        }
        for i in 0..n {
            if vertices[i].distance_squared(vertices[(i + 1) % n])
                <= GEOMETRY_EPSILON * GEOMETRY_EPSILON
            {
                return Err(GeometryDefect::ZeroLengthEdge { index: i }.into());
            }
        }

        let signed_area = signed_area(&vertices);
        if signed_area.abs() <= GEOMETRY_EPSILON {
            return Err(GeometryDefect::ZeroArea.into());
        }

        let mut vertices = vertices;
        if signed_area < 0.0 {
            vertices.reverse();
        }
        check_convex(&vertices)?;

        let centroid = centroid(&vertices, signed_area.abs());
        for v in vertices.iter_mut() {
            *v -= centroid;
        }

        let normals = (0..n)
            .map(|i| outward_normal(vertices[i], vertices[(i + 1) % n]))
            .collect();

        Ok(Self {
            vertices,
            normals,
            area: signed_area.abs(),
        })
    }

    /// Axis-aligned `width` x `height` box centred on the origin.
    pub fn rectangle(width: f64, height: f64) -> PhysicsResult<Self> {
        let (hw, hh) = (width * 0.5, height * 0.5);
        Self::new(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
    }

    /// Regular polygon with `sides` corners on a circle of `radius`, first corner on +x.
    pub fn regular(sides: usize, radius: f64) -> PhysicsResult<Self> {
        let step = std::f64::consts::TAU / sides as f64;
        Self::new(
            (0..sides)
                .map(|i| Vec2::from_angle(step * i as f64) * radius)
                .collect(),
        )
    }

    /// Vertices in local space, counter-clockwise, centroid at the origin.
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Outward unit normal of each edge in local space.
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Moment of inertia about the centroid for a uniform polygon of total `mass`.
    ///
    /// Triangle-fan formula about the origin (which is the centroid after
    /// construction), normalised by area so density drops out.
    pub fn inertia(&self, mass: f64) -> f64 {
        let n = self.vertices.len();
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let cross = a.cross(b);
            numerator += cross * (a.magnitude_squared() + a.dot(b) + b.magnitude_squared());
            denominator += cross;
        }
        if denominator.abs() <= GEOMETRY_EPSILON {
            return 0.0;
        }
        mass * numerator / (6.0 * denominator)
    }

    /// Largest signed edge distance of a local-space point.
    pub fn point_separation(&self, point: Vec2) -> PointSeparation {
        max_point_separation(&self.vertices, &self.normals, point)
    }
}

/// Largest signed distance from `point` to the edge lines of a hull. The first
/// edge wins ties. Inputs may be local or world space as long as they agree.
pub(crate) fn max_point_separation(
    vertices: &[Vec2],
    normals: &[Vec2],
    point: Vec2,
) -> PointSeparation {
    let mut best = PointSeparation {
        separation: f64::NEG_INFINITY,
        index: 0,
        normal: Vec2::ZERO,
    };
    for (index, (&vertex, &normal)) in vertices.iter().zip(normals).enumerate() {
        let separation = normal.dot(point - vertex);
        if separation > best.separation {
            best = PointSeparation {
                separation,
                index,
                normal,
            };
        }
    }
    best
}

/// Outward normal of the edge `a -> b` of a counter-clockwise hull.
fn outward_normal(a: Vec2, b: Vec2) -> Vec2 {
    let edge = b - a;
    Vec2::new(edge.y, -edge.x).normalize()
}

/// Shoelace formula; positive for counter-clockwise winding.
fn signed_area(vertices: &[Vec2]) -> f64 {
    let n = vertices.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        twice_area += vertices[i].cross(vertices[(i + 1) % n]);
    }
    twice_area * 0.5
}

fn centroid(vertices: &[Vec2], area: f64) -> Vec2 {
    // Fan from vertex 0; triangle areas are signed, so any convex winding works.
    let origin = vertices[0];
    let mut weighted = Vec2::ZERO;
    for i in 1..(vertices.len() - 1) {
        let v2 = vertices[i];
        let v3 = vertices[i + 1];
        let triangle_area = (v2 - origin).cross(v3 - origin) * 0.5;
        weighted += (origin + v2 + v3) / 3.0 * triangle_area;
    }
    weighted / area
}

/// Every vertex must lie on or inside every edge line of a counter-clockwise hull.
fn check_convex(vertices: &[Vec2]) -> PhysicsResult<()> {
    let n = vertices.len();
    for i in 0..n {
        let a = vertices[i];
        let edge = vertices[(i + 1) % n] - a;
        let scale = edge.magnitude();
        for (j, &v) in vertices.iter().enumerate() {
            if edge.cross(v - a) < -GEOMETRY_EPSILON * scale {
                return Err(GeometryDefect::NonConvex { index: j }.into());
            }
        }
    }
    Ok(())
}
