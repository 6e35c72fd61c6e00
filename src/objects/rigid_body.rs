use crate::common::Material;
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::{Rotation, Transform, Vec2};
use crate::shapes::polygon::max_point_separation;
use crate::shapes::{PointSeparation, Shape};

/// A movable body: shape, mass properties and kinematic state.
///
/// `position` is the world position of the center of mass. Shapes are stored
/// centred on their center of mass, so local coordinates are relative to it.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    // Geometry
    shape: Shape,
    pub material: Material,

    // Primary state
    pub position: Vec2,
    pub rotation: f64, // Radians
    pub linear_velocity: Vec2,
    pub angular_velocity: f64, // Radians per second

    // Accumulators for forces/torques applied during a time step
    pub force: Vec2,
    pub torque: f64,

    // Physical properties
    mass: f64,
    inv_mass: f64,    // 0.0 for static
    inertia: f64,
    inv_inertia: f64, // 0.0 for static / non-rotating
}

impl RigidBody {
    /// Creates a body of the given `mass` with inertia derived from the shape.
    /// A mass of exactly 0 creates a static body. Negative or non-finite masses are rejected.
    pub fn new(mass: f64, shape: impl Into<Shape>) -> PhysicsResult<Self> {
        let shape = shape.into();
        if !mass.is_finite() || mass < 0.0 {
            return Err(PhysicsError::InvalidMass { mass });
        }
        if mass == 0.0 {
            return Ok(Self::new_static(shape));
        }
        let inertia = shape.inertia(mass);
        Ok(Self::from_parts(shape, mass, inertia))
    }

    /// Creates a dynamic body with explicitly provided mass and moment of inertia.
    /// An infinite or zero `inertia` produces a body that never changes its spin.
    pub fn new_with_inertia(mass: f64, inertia: f64, shape: impl Into<Shape>) -> PhysicsResult<Self> {
        let shape = shape.into();
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass { mass });
        }
        if inertia.is_nan() || inertia < 0.0 {
            return Err(PhysicsError::InvalidMass { mass: inertia });
        }
        Ok(Self::from_parts(shape, mass, inertia))
    }

    /// Creates an immovable body: infinite mass and rotational inertia.
    pub fn new_static(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            material: Material::default(),
            position: Vec2::ZERO,
            rotation: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: f64::INFINITY,
            inv_inertia: 0.0,
        }
    }

    fn from_parts(shape: Shape, mass: f64, inertia: f64) -> Self {
        let inv_inertia = if inertia.is_finite() && inertia > 0.0 {
            1.0 / inertia
        } else {
            0.0
        };
        Self {
            mass,
            inv_mass: 1.0 / mass,
            inertia,
            inv_inertia,
            ..Self::new_static(shape)
        }
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
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    #[must_use]
    pub fn with_angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Mass in kilograms; 0 for static bodies.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inv_mass(&self) -> f64 {
        self.inv_mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn inv_inertia(&self) -> f64 {
        self.inv_inertia
    }

    pub fn restitution(&self) -> f64 {
        self.material.restitution
    }

    pub fn friction(&self) -> f64 {
        self.material.friction
    }

    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Current local-to-world transform.
    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }

    /// Maps a local point (relative to the center of mass) to world space.
    pub fn global_point(&self, local: Vec2) -> Vec2 {
        self.transform().apply(local)
    }

    /// Maps a world point to local space.
    pub fn local_point(&self, global: Vec2) -> Vec2 {
        self.transform().apply_inverse(global)
    }

    /// Number of stored points (see [`Shape::point_count`]).
    pub fn point_count(&self) -> usize {
        self.shape.point_count()
    }

    /// World position of polygon vertex `index`. For a circle, index 0 is its center.
    pub fn global_vertex(&self, index: usize) -> Option<Vec2> {
        match &self.shape {
            Shape::Circle(_) => (index == 0).then_some(self.position),
            Shape::Polygon(polygon) => polygon
                .vertices()
                .get(index)
                .map(|&v| self.global_point(v)),
        }
    }

    /// World outward normal of polygon edge `index`. Circles have no fixed normals.
    pub fn global_normal(&self, index: usize) -> Option<Vec2> {
        match &self.shape {
            Shape::Circle(_) => None,
            Shape::Polygon(polygon) => polygon
                .normals()
                .get(index)
                .map(|&n| Rotation::from_angle(self.rotation).apply(n)),
        }
    }

    /// Every [`global_vertex`](Self::global_vertex) in index order. A circle yields its center.
    pub fn global_vertices(&self) -> Vec<Vec2> {
        match &self.shape {
            Shape::Circle(_) => vec![self.position],
            Shape::Polygon(polygon) => {
                let transform = self.transform();
                polygon.vertices().iter().map(|&v| transform.apply(v)).collect()
            }
        }
    }

    /// All polygon edge normals in world space; empty for circles.
    pub fn global_normals(&self) -> Vec<Vec2> {
        match &self.shape {
            Shape::Circle(_) => Vec::new(),
            Shape::Polygon(polygon) => {
                let rotation = Rotation::from_angle(self.rotation);
                polygon.normals().iter().map(|&n| rotation.apply(n)).collect()
            }
        }
    }

    /// Signed distance from a world point to this body's surface.
    ///
    /// For polygons this is the largest edge distance with that edge's world normal.
    /// For circles it is the distance to the rim along the radial direction.
    pub fn point_separation(&self, point: Vec2) -> PointSeparation {
        match &self.shape {
            Shape::Circle(circle) => {
                let offset = point - self.position;
                PointSeparation {
                    separation: offset.magnitude() - circle.radius(),
                    index: 0,
                    normal: offset.normalize(),
                }
            }
            Shape::Polygon(_) => {
                max_point_separation(&self.global_vertices(), &self.global_normals(), point)
            }
        }
    }

    /// Velocity of the material point at world position `point`: v + w x r.
    pub fn velocity_at(&self, point: Vec2) -> Vec2 {
        self.linear_velocity + Vec2::cross_scalar(self.angular_velocity, point - self.position)
    }

    /// Applies a force at the center of mass.
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Applies a force at a specific point (in world coordinates).
    /// This generates both linear force and torque.
    pub fn apply_force_at_point(&mut self, force: Vec2, point_world: Vec2) {
        self.force += force;
        let radius_vector = point_world - self.position;
        self.torque += radius_vector.cross(force);
    }

    pub fn apply_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    /// Applies an instantaneous impulse at `relative_point`, an offset from the
    /// center of mass in world orientation.
    pub fn apply_impulse(&mut self, relative_point: Vec2, impulse: Vec2) {
        self.linear_velocity += impulse * self.inv_mass;
        self.angular_velocity += relative_point.cross(impulse) * self.inv_inertia;
    }

    /// Should typically be called after integration in each simulation step.
    pub fn clear_accumulators(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    pub fn momentum(&self) -> Vec2 {
        self.linear_velocity * self.mass
    }

    /// Translational plus rotational kinetic energy. Static bodies report 0.
    pub fn kinetic_energy(&self) -> f64 {
        if self.is_static() {
            return 0.0;
        }
        let rotational = if self.inertia.is_finite() {
            0.5 * self.inertia * self.angular_velocity * self.angular_velocity
        } else {
            0.0
        };
        0.5 * self.mass * self.linear_velocity.magnitude_squared() + rotational
    }
}
