//! Narrow-phase detection and impulse resolution for a single pair.

use tracing::{trace, warn};

use crate::common::{Material, SimulationConfig};
use crate::math::vec2::{Vec2, LENGTH_EPSILON};
use crate::objects::{BodyHandle, BoundaryElement, RigidBody};

use super::event::{CollisionEvent, Participant};
use super::sat::{self, AxisOverlap, AxisSource, WorldShape};

/// Effective masses below this are treated as immovable.
const EFFECTIVE_MASS_EPSILON: f64 = 1e-12;

/// A participant frozen in world space, ready for the separating-axis test.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub participant: Participant,
    pub shape: WorldShape,
}

impl Collider {
    pub fn body(handle: BodyHandle, body: &RigidBody) -> Self {
        Self {
            participant: Participant::Body(handle),
            shape: WorldShape::of_body(body),
        }
    }

    pub fn boundary(index: usize, boundary: &BoundaryElement) -> Self {
        Self {
            participant: Participant::Boundary(index),
            shape: WorldShape::of_boundary(boundary),
        }
    }
}

/// What the resolver needs from one side of a contact.
///
/// Boundary elements implement the mutators as no-ops: they have infinite mass
/// and are never moved by a contact.
pub trait ContactResponder {
    fn position(&self) -> Vec2;
    fn velocity_at(&self, point: Vec2) -> Vec2;
    fn inv_mass(&self) -> f64;
    fn inv_inertia(&self) -> f64;
    fn material(&self) -> &Material;
    fn apply_impulse(&mut self, relative_point: Vec2, impulse: Vec2);
    fn translate(&mut self, offset: Vec2);
}

impl ContactResponder for RigidBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity_at(&self, point: Vec2) -> Vec2 {
        RigidBody::velocity_at(self, point)
    }

    fn inv_mass(&self) -> f64 {
        RigidBody::inv_mass(self)
    }

    fn inv_inertia(&self) -> f64 {
        RigidBody::inv_inertia(self)
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn apply_impulse(&mut self, relative_point: Vec2, impulse: Vec2) {
        RigidBody::apply_impulse(self, relative_point, impulse);
    }

    fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }
}

impl ContactResponder for BoundaryElement {
    fn position(&self) -> Vec2 {
        BoundaryElement::position(self)
    }

    fn velocity_at(&self, _point: Vec2) -> Vec2 {
        Vec2::ZERO
    }

    fn inv_mass(&self) -> f64 {
        0.0
    }

    fn inv_inertia(&self) -> f64 {
        0.0
    }

    fn material(&self) -> &Material {
        BoundaryElement::material(self)
    }

    fn apply_impulse(&mut self, _relative_point: Vec2, _impulse: Vec2) {}

    fn translate(&mut self, _offset: Vec2) {}
}

/// A shared boundary is just as immovable, so level geometry can be resolved
/// against without a mutable borrow or a copy.
impl ContactResponder for &BoundaryElement {
    fn position(&self) -> Vec2 {
        BoundaryElement::position(self)
    }

    fn velocity_at(&self, _point: Vec2) -> Vec2 {
        Vec2::ZERO
    }

    fn inv_mass(&self) -> f64 {
        0.0
    }

    fn inv_inertia(&self) -> f64 {
        0.0
    }

    fn material(&self) -> &Material {
        BoundaryElement::material(self)
    }

    fn apply_impulse(&mut self, _relative_point: Vec2, _impulse: Vec2) {}

    fn translate(&mut self, _offset: Vec2) {}
}

/// Impulse magnitudes applied while resolving one contact.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContactImpulse {
    /// Along the contact normal; 0 when the pair was already separating.
    pub normal_impulse: f64,
    /// Along the tangent, signed; Coulomb-bounded by `friction * normal_impulse`.
    pub tangent_impulse: f64,
    /// Distance each unit of inverse mass was moved along the normal by positional correction.
    pub correction: f64,
}

/// Stateless pairwise detector and resolver. Owned by the
/// [`Simulation`](crate::world::Simulation) and configured from its settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionDetector {
    correction_percent: f64,
    correction_slop: f64,
    edge_contact_sin: f64,
}

impl CollisionDetector {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            correction_percent: config.correction_percent,
            correction_slop: config.correction_slop,
            edge_contact_sin: config.edge_contact_angle.sin(),
        }
    }

    /// Separating-axis test between two participants.
    ///
    /// Returns `None` if any candidate axis separates them. Otherwise the axis
    /// of smallest overlap becomes the normal (first toward second) and the
    /// overlap becomes `-min_separation`. Against a boundary the normal never
    /// points back through the line.
    pub fn generate_collision_event(
        &self,
        first: &Collider,
        second: &Collider,
    ) -> Option<CollisionEvent> {
        let best = sat::minimum_overlap(&first.shape, &second.shape)?;
        let location = self.contact_location(&first.shape, &second.shape, &best);
        Some(CollisionEvent::new(
            first.participant,
            second.participant,
            best.axis,
            -best.overlap,
            location,
        ))
    }

    /// Applies the normal impulse, the friction impulse and positional correction
    /// for `event`. `first` and `second` must be the event's participants, in order.
    ///
    /// Returns `None` if neither side can move.
    pub fn resolve(
        &self,
        event: &CollisionEvent,
        first: &mut dyn ContactResponder,
        second: &mut dyn ContactResponder,
    ) -> Option<ContactImpulse> {
        let total_inv_mass = first.inv_mass() + second.inv_mass();
        if total_inv_mass <= 0.0 && first.inv_inertia() <= 0.0 && second.inv_inertia() <= 0.0 {
            warn!(
                first = %event.first(),
                second = %event.second(),
                "contact between two immovable participants ignored"
            );
            return None;
        }

        let mut result = ContactImpulse::default();
        let n = event.normal();
        let contact = event.location();
        let r_a = contact - first.position();
        let r_b = contact - second.position();

        let relative_velocity = second.velocity_at(contact) - first.velocity_at(contact);
        let relative_velocity_normal = relative_velocity.dot(n);

        // Only approaching pairs get an impulse; separating ones would gain energy
        if relative_velocity_normal < 0.0 {
            let effective_mass_normal = effective_mass(first, second, r_a, r_b, n);
            if effective_mass_normal <= EFFECTIVE_MASS_EPSILON {
                warn!(
                    first = %event.first(),
                    second = %event.second(),
                    "zero effective mass along contact normal"
                );
            } else {
                let e = Material::combined_restitution(first.material(), second.material());
                let j = -(1.0 + e) * relative_velocity_normal / effective_mass_normal;
                let impulse = n * j;
                first.apply_impulse(r_a, -impulse);
                second.apply_impulse(r_b, impulse);
                result.normal_impulse = j;

                result.tangent_impulse = apply_friction(first, second, contact, r_a, r_b, n, j);
            }
        }

        result.correction = self.correct_position(event, first, second, total_inv_mass);

        trace!(
            first = %event.first(),
            second = %event.second(),
            normal_impulse = result.normal_impulse,
            tangent_impulse = result.tangent_impulse,
            depth = event.penetration_depth(),
            "contact resolved"
        );
        Some(result)
    }

    /// Moves both sides apart along the normal by a `correction_percent` share of
    /// the depth beyond `correction_slop`, split by inverse mass.
    fn correct_position(
        &self,
        event: &CollisionEvent,
        first: &mut dyn ContactResponder,
        second: &mut dyn ContactResponder,
        total_inv_mass: f64,
    ) -> f64 {
        let correction_magnitude = (event.penetration_depth() - self.correction_slop).max(0.0);
        if correction_magnitude <= 0.0 || total_inv_mass <= 0.0 {
            return 0.0;
        }
        let per_inv_mass = correction_magnitude / total_inv_mass * self.correction_percent;
        let correction = event.normal() * per_inv_mass;
        first.translate(-correction * first.inv_mass());
        second.translate(correction * second.inv_mass());
        per_inv_mass
    }

    fn contact_location(&self, first: &WorldShape, second: &WorldShape, best: &AxisOverlap) -> Vec2 {
        let n = best.axis;
        match best.source {
            AxisSource::FirstFace(_) => self.incident_point(second, -n, first),
            AxisSource::SecondFace(_) => self.incident_point(first, n, second),
            AxisSource::Radial => match second {
                WorldShape::Disc { .. } => support(second, -n),
                WorldShape::Hull { .. } => support(first, n),
            },
        }
    }

    /// Deepest point of `incident` in direction `toward`, collapsed to the
    /// median of both edges when the incident edge lies flat against the
    /// reference face facing it.
    fn incident_point(&self, incident: &WorldShape, toward: Vec2, reference: &WorldShape) -> Vec2 {
        let WorldShape::Hull { vertices, .. } = incident else {
            return support(incident, toward);
        };
        let n = vertices.len();
        let Some(deepest) = deepest_index(vertices, toward) else {
            return support(incident, toward);
        };
        let prev = vertices[(deepest + n - 1) % n];
        let next = vertices[(deepest + 1) % n];
        let neighbour = if prev.dot(toward) > next.dot(toward) {
            prev
        } else {
            next
        };
        let deepest = vertices[deepest];

        if let Some((r0, r1)) = facing_face(reference, -toward) {
            let incident_dir = (neighbour - deepest).normalize();
            let reference_dir = (r1 - r0).normalize();
            if incident_dir != Vec2::ZERO
                && reference_dir != Vec2::ZERO
                && incident_dir.cross(reference_dir).abs() <= self.edge_contact_sin
            {
                return median_point([r0, r1, deepest, neighbour]);
            }
        }
        deepest
    }
}

impl Default for CollisionDetector {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}

/// Inverse effective mass of the pair along `direction` at lever arms `r_a`, `r_b`.
fn effective_mass(
    first: &dyn ContactResponder,
    second: &dyn ContactResponder,
    r_a: Vec2,
    r_b: Vec2,
    direction: Vec2,
) -> f64 {
    let ra_cross = r_a.cross(direction);
    let rb_cross = r_b.cross(direction);
    first.inv_mass()
        + second.inv_mass()
        + ra_cross * ra_cross * first.inv_inertia()
        + rb_cross * rb_cross * second.inv_inertia()
}

/// Coulomb friction against the post-impulse tangential velocity. Returns the signed impulse.
fn apply_friction(
    first: &mut dyn ContactResponder,
    second: &mut dyn ContactResponder,
    contact: Vec2,
    r_a: Vec2,
    r_b: Vec2,
    n: Vec2,
    normal_impulse: f64,
) -> f64 {
    let mu = Material::combined_friction(first.material(), second.material());
    if mu <= 0.0 {
        return 0.0;
    }
    let relative_velocity = second.velocity_at(contact) - first.velocity_at(contact);
    let tangent_velocity = relative_velocity - n * relative_velocity.dot(n);
    if tangent_velocity.magnitude() <= LENGTH_EPSILON {
        return 0.0;
    }
    let t = tangent_velocity.normalize();
    let effective_mass_tangent = effective_mass(first, second, r_a, r_b, t);
    if effective_mass_tangent <= EFFECTIVE_MASS_EPSILON {
        return 0.0;
    }
    let max_friction = mu * normal_impulse;
    let jt = (-relative_velocity.dot(t) / effective_mass_tangent).clamp(-max_friction, max_friction);
    let impulse = t * jt;
    first.apply_impulse(r_a, -impulse);
    second.apply_impulse(r_b, impulse);
    jt
}

/// Farthest point of `shape` in `direction`.
fn support(shape: &WorldShape, direction: Vec2) -> Vec2 {
    match shape {
        WorldShape::Disc { center, radius } => *center + direction * *radius,
        WorldShape::Hull {
            vertices, center, ..
        } => deepest_index(vertices, direction)
            .map(|i| vertices[i])
            .unwrap_or(*center),
    }
}

/// Index of the vertex farthest along `direction`; the first one wins ties.
fn deepest_index(vertices: &[Vec2], direction: Vec2) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in vertices.iter().enumerate() {
        let p = v.dot(direction);
        if best.map_or(true, |(_, b)| p > b) {
            best = Some((i, p));
        }
    }
    best.map(|(i, _)| i)
}

/// Endpoints of the face of `shape` whose outward normal is closest to `direction`.
fn facing_face(shape: &WorldShape, direction: Vec2) -> Option<(Vec2, Vec2)> {
    match shape {
        WorldShape::Disc { .. } => None,
        WorldShape::Hull {
            vertices, normals, ..
        } => {
            let face = deepest_index(normals, direction)?;
            Some((vertices[face], vertices[(face + 1) % vertices.len()]))
        }
    }
}

/// Per-coordinate median of four points: mean of the two middle values.
fn median_point(points: [Vec2; 4]) -> Vec2 {
    let mut xs = points.map(|p| p.x);
    let mut ys = points.map(|p| p.y);
    xs.sort_by(f64::total_cmp);
    ys.sort_by(f64::total_cmp);
    Vec2::new((xs[1] + xs[2]) * 0.5, (ys[1] + ys[2]) * 0.5)
}
