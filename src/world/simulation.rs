use tracing::{debug, debug_span, info};

use crate::collision::{Collider, CollisionDetector, CollisionEvent};
use crate::common::SimulationConfig;
use crate::error::{PhysicsError, PhysicsResult};
use crate::integration::integrator;
use crate::objects::{BodyHandle, BoundaryElement, RigidBody};
use crate::player::{PlayerController, PlayerId};

/// Fixed-step driver and owner of every body, boundary and player controller.
///
/// Each [`step`](Simulation::step) runs these phases in this order:
///
/// 1. player controls are applied to their bodies
/// 2. gravity is applied and every live body is integrated, in slot order
/// 3. player bodies are clamped into their movement windows
/// 4. for each body `i` in slot order, the pairs `(j, i)` for every `j < i`
///    are detected and resolved, followed by `(boundary k, i)` for every boundary
///
/// Each pair is resolved as soon as it is detected, so later pairs see the
/// corrected state. Identical inputs give identical trajectories.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    detector: CollisionDetector,
    bodies: Vec<Option<RigidBody>>,
    boundaries: Vec<Option<BoundaryElement>>,
    players: Vec<Option<PlayerController>>,
    contacts: Vec<CollisionEvent>,
    time: f64,
    step_count: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        info!(
            gravity_x = config.gravity.x,
            gravity_y = config.gravity.y,
            correction_percent = config.correction_percent,
            correction_slop = config.correction_slop,
            "simulation created"
        );
        Self {
            detector: CollisionDetector::new(&config),
            config,
            bodies: Vec::new(),
            boundaries: Vec::new(),
            players: Vec::new(),
            contacts: Vec::new(),
            time: 0.0,
            step_count: 0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn detector(&self) -> &CollisionDetector {
        &self.detector
    }

    /// Seconds simulated so far.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Contacts detected during the most recent step, in resolution order.
    pub fn contacts(&self) -> &[CollisionEvent] {
        &self.contacts
    }

    // --- Bodies --- //

    /// Adds a rigid body to the simulation and returns its handle.
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len());
        info!(%handle, mass = body.mass(), "body added");
        self.bodies.push(Some(body));
        handle
    }

    /// Removes a body. Its slot stays empty so every other handle stays valid.
    /// Player controllers driving the body are removed with it.
    pub fn remove_body(&mut self, handle: BodyHandle) -> PhysicsResult<RigidBody> {
        let body = self
            .bodies
            .get_mut(handle.0)
            .and_then(Option::take)
            .ok_or(PhysicsError::UnknownBody { handle })?;
        for slot in self.players.iter_mut() {
            if slot.as_ref().is_some_and(|p| p.player_body() == handle) {
                *slot = None;
            }
        }
        info!(%handle, "body removed");
        Ok(body)
    }

    pub fn body(&self, handle: BodyHandle) -> PhysicsResult<&RigidBody> {
        self.bodies
            .get(handle.0)
            .and_then(Option::as_ref)
            .ok_or(PhysicsError::UnknownBody { handle })
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> PhysicsResult<&mut RigidBody> {
        self.bodies
            .get_mut(handle.0)
            .and_then(Option::as_mut)
            .ok_or(PhysicsError::UnknownBody { handle })
    }

    /// Live bodies in slot order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|body| (BodyHandle(i), body)))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.iter().flatten().count()
    }

    // --- Boundaries --- //

    /// Adds a boundary element and returns its index.
    pub fn add_boundary(&mut self, boundary: BoundaryElement) -> usize {
        let index = self.boundaries.len();
        info!(index, length = boundary.length(), "boundary added");
        self.boundaries.push(Some(boundary));
        index
    }

    pub fn remove_boundary(&mut self, index: usize) -> PhysicsResult<BoundaryElement> {
        let boundary = self
            .boundaries
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(PhysicsError::UnknownBoundary { index })?;
        info!(index, "boundary removed");
        Ok(boundary)
    }

    pub fn boundary(&self, index: usize) -> PhysicsResult<&BoundaryElement> {
        self.boundaries
            .get(index)
            .and_then(Option::as_ref)
            .ok_or(PhysicsError::UnknownBoundary { index })
    }

    /// Live boundaries in index order.
    pub fn boundaries(&self) -> impl Iterator<Item = (usize, &BoundaryElement)> {
        self.boundaries
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|boundary| (i, boundary)))
    }

    // --- Players --- //

    /// Registers a controller. Fails if its body is not in this simulation.
    pub fn add_player(&mut self, controller: PlayerController) -> PhysicsResult<PlayerId> {
        let handle = controller.player_body();
        self.body(handle)?;
        let id = PlayerId(self.players.len());
        info!(%id, %handle, "player controller added");
        self.players.push(Some(controller));
        Ok(id)
    }

    pub fn remove_player(&mut self, id: PlayerId) -> PhysicsResult<PlayerController> {
        let controller = self
            .players
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(PhysicsError::UnknownPlayer { id })?;
        info!(%id, "player controller removed");
        Ok(controller)
    }

    pub fn player(&self, id: PlayerId) -> PhysicsResult<&PlayerController> {
        self.players
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(PhysicsError::UnknownPlayer { id })
    }

    pub fn player_mut(&mut self, id: PlayerId) -> PhysicsResult<&mut PlayerController> {
        self.players
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(PhysicsError::UnknownPlayer { id })
    }

    /// The body driven by player `id`.
    pub fn player_body(&self, id: PlayerId) -> PhysicsResult<&RigidBody> {
        self.body(self.player(id)?.player_body())
    }

    // --- Stepping --- //

    /// Advances the simulation by one time step `dt`.
    ///
    /// Fails with [`PhysicsError::InvalidTimestep`] for a non-positive or
    /// non-finite `dt`, leaving every body untouched.
    pub fn step(&mut self, dt: f64) -> PhysicsResult<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(PhysicsError::InvalidTimestep { dt });
        }
        let index = self.step_count;
        let _span = debug_span!("step", index).entered();
        self.contacts.clear();

        // 1. Player input
        for controller in self.players.iter_mut().flatten() {
            if let Some(Some(body)) = self.bodies.get_mut(controller.player_body().0) {
                controller.apply_controls(body, dt);
            }
        }

        // 2. Gravity and integration
        let gravity = self.config.gravity;
        for body in self.bodies.iter_mut().flatten() {
            if !body.is_static() {
                let gravity_force = gravity * body.mass();
                body.apply_force(gravity_force);
            }
            integrator::integrate_damped(
                body,
                dt,
                self.config.linear_damping,
                self.config.angular_damping,
            );
        }

        // 3. Movement windows
        for controller in self.players.iter().flatten() {
            if let Some(Some(body)) = self.bodies.get_mut(controller.player_body().0) {
                controller.clamp_to_window(body);
            }
        }

        // 4. Detection and immediate resolution, pair by pair
        for i in 0..self.bodies.len() {
            for j in 0..i {
                self.handle_body_pair(j, i);
            }
            for k in 0..self.boundaries.len() {
                self.handle_boundary_pair(k, i);
            }
        }

        self.time += dt;
        self.step_count += 1;
        debug!(dt, contacts = self.contacts.len(), time = self.time, "step complete");
        Ok(())
    }

    fn handle_body_pair(&mut self, a: usize, b: usize) {
        let Some((body_a, body_b)) = get_mutable_body_pair(&mut self.bodies, a, b) else {
            return;
        };
        if body_a.is_static() && body_b.is_static() {
            return;
        }
        let event = self.detector.generate_collision_event(
            &Collider::body(BodyHandle(a), body_a),
            &Collider::body(BodyHandle(b), body_b),
        );
        if let Some(event) = event {
            self.detector.resolve(&event, body_a, body_b);
            self.contacts.push(event);
        }
    }

    fn handle_boundary_pair(&mut self, k: usize, i: usize) {
        let (Some(Some(boundary)), Some(Some(body))) =
            (self.boundaries.get(k), self.bodies.get_mut(i))
        else {
            return;
        };
        if body.is_static() {
            return;
        }
        let event = self.detector.generate_collision_event(
            &Collider::boundary(k, boundary),
            &Collider::body(BodyHandle(i), body),
        );
        if let Some(event) = event {
            let mut fixed = boundary;
            self.detector.resolve(&event, &mut fixed, body);
            self.contacts.push(event);
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

/// Mutable references to two distinct live slots, via `split_at_mut`.
/// `None` if the indices are equal, out of bounds or either slot is empty.
fn get_mutable_body_pair(
    bodies: &mut [Option<RigidBody>],
    idx_a: usize,
    idx_b: usize,
) -> Option<(&mut RigidBody, &mut RigidBody)> {
    if idx_a == idx_b || idx_a >= bodies.len() || idx_b >= bodies.len() {
        return None;
    }
    let (a, b) = if idx_a < idx_b {
        let (slice_a, slice_b) = bodies.split_at_mut(idx_b);
        (&mut slice_a[idx_a], &mut slice_b[0])
    } else {
        let (slice_b, slice_a) = bodies.split_at_mut(idx_a);
        (&mut slice_a[0], &mut slice_b[idx_b])
    };
    Some((a.as_mut()?, b.as_mut()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Material;
    use crate::math::vec2::Vec2;
    use crate::player::ControlInput;
    use crate::shapes::{Circle, Polygon};
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;

    fn ball(x: f64, y: f64) -> RigidBody {
        RigidBody::new(1.0, Circle::new(1.0).unwrap())
            .unwrap()
            .with_position(Vec2::new(x, y))
    }

    #[test]
    fn test_simulation_new() {
        let sim = Simulation::default();
        assert_eq!(sim.body_count(), 0);
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.step_count(), 0);
        assert!(sim.contacts().is_empty());
    }

    #[test]
    fn test_add_and_remove_body_keeps_handles() {
        let mut sim = Simulation::default();
        let a = sim.add_body(ball(0.0, 0.0));
        let b = sim.add_body(ball(5.0, 0.0));
        let c = sim.add_body(ball(10.0, 0.0));

        let removed = sim.remove_body(b).unwrap();
        assert_eq!(removed.position, Vec2::new(5.0, 0.0));
        assert_eq!(sim.body_count(), 2);
        assert_eq!(sim.body(c).unwrap().position, Vec2::new(10.0, 0.0));
        assert_eq!(sim.body(a).unwrap().position, Vec2::ZERO);
        assert_eq!(sim.body(b), Err(PhysicsError::UnknownBody { handle: b }));
        assert!(sim.remove_body(b).is_err());

        let handles: Vec<_> = sim.bodies().map(|(h, _)| h).collect();
        assert_eq!(handles, vec![a, c]);
    }

    #[test]
    fn test_step_rejects_invalid_dt() {
        let mut sim = Simulation::default();
        let h = sim.add_body(ball(0.0, 0.0).with_velocity(Vec2::new(1.0, 0.0)));
        for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(sim.step(dt), Err(PhysicsError::InvalidTimestep { .. })));
        }
        assert_eq!(sim.body(h).unwrap().position, Vec2::ZERO);
        assert_eq!(sim.step_count(), 0);
    }

    #[test]
    fn test_step_applies_gravity() {
        let mut sim = Simulation::new(SimulationConfig::default().with_gravity(Vec2::new(0.0, -10.0)));
        let h = sim.add_body(ball(0.0, 0.0));
        let wall = sim.add_body(RigidBody::new_static(Circle::new(1.0).unwrap()).with_position(Vec2::new(50.0, 0.0)));
        sim.step(0.1).unwrap();
        let body = sim.body(h).unwrap();
        assert_relative_eq!(body.linear_velocity.y, -1.0, epsilon = EPSILON);
        assert_relative_eq!(body.position.y, -0.1, epsilon = EPSILON);
        assert_eq!(sim.body(wall).unwrap().position, Vec2::new(50.0, 0.0));
        assert_relative_eq!(sim.time(), 0.1);
        assert_eq!(sim.step_count(), 1);
    }

    #[test]
    fn test_contacts_are_recorded_per_step() {
        let mut sim = Simulation::default();
        sim.add_body(ball(0.0, 0.0).with_velocity(Vec2::new(1.0, 0.0)));
        sim.add_body(ball(1.9, 0.0).with_velocity(Vec2::new(-1.0, 0.0)));
        sim.step(0.01).unwrap();
        assert_eq!(sim.contacts().len(), 1);
        let event = sim.contacts()[0];
        assert_relative_eq!(event.normal().x, 1.0, epsilon = EPSILON);
        assert_relative_eq!(event.normal().y, 0.0, epsilon = EPSILON);

        // After bouncing apart there is nothing left to report
        for _ in 0..20 {
            sim.step(0.01).unwrap();
        }
        assert!(sim.contacts().is_empty());
    }

    #[test]
    fn test_static_pairs_are_skipped() {
        let mut sim = Simulation::default();
        sim.add_body(RigidBody::new_static(Circle::new(1.0).unwrap()));
        sim.add_body(RigidBody::new_static(Circle::new(1.0).unwrap()).with_position(Vec2::new(0.5, 0.0)));
        sim.add_boundary(BoundaryElement::new(10.0).unwrap());
        sim.step(0.1).unwrap();
        assert!(sim.contacts().is_empty());
    }

    #[test]
    fn test_ball_rests_on_floor() {
        let mut sim = Simulation::new(SimulationConfig::default().with_gravity(Vec2::new(0.0, -9.81)));
        sim.add_boundary(BoundaryElement::new(20.0).unwrap());
        let h = sim.add_body(
            ball(0.0, 1.5).with_material(Material::new(0.0, 0.3)),
        );
        for _ in 0..600 {
            sim.step(1.0 / 60.0).unwrap();
        }
        let body = sim.body(h).unwrap();
        assert!((body.position.y - 1.0).abs() < 0.05, "y = {}", body.position.y);
        assert!(body.linear_velocity.magnitude() < 0.5);
    }

    #[test]
    fn test_player_moves_controlled_body() {
        let mut sim = Simulation::default();
        let h = sim.add_body(ball(0.0, 0.0));
        let id = sim
            .add_player(PlayerController::new(h).with_acceleration(10.0))
            .unwrap();
        sim.player_mut(id).unwrap().set_input(ControlInput {
            up: true,
            ..Default::default()
        });
        sim.step(0.1).unwrap();
        assert_relative_eq!(sim.player_body(id).unwrap().linear_velocity.y, 1.0, epsilon = EPSILON);
        assert_relative_eq!(sim.player_body(id).unwrap().position.y, 0.1, epsilon = EPSILON);
    }

    #[test]
    fn test_player_requires_live_body() {
        let mut sim = Simulation::default();
        let h = sim.add_body(ball(0.0, 0.0));
        let id = sim.add_player(PlayerController::new(h)).unwrap();
        sim.remove_body(h).unwrap();
        assert!(matches!(sim.player(id), Err(PhysicsError::UnknownPlayer { .. })));
        assert!(matches!(
            sim.add_player(PlayerController::new(h)),
            Err(PhysicsError::UnknownBody { .. })
        ));
    }

    #[test]
    fn test_remove_boundary() {
        let mut sim = Simulation::default();
        let k = sim.add_boundary(BoundaryElement::new(4.0).unwrap());
        assert!(sim.boundary(k).is_ok());
        sim.remove_boundary(k).unwrap();
        assert!(matches!(sim.boundary(k), Err(PhysicsError::UnknownBoundary { index }) if index == k));
        assert_eq!(sim.boundaries().count(), 0);
    }

    #[test]
    fn test_polygon_falls_onto_boundary() {
        let mut sim = Simulation::new(SimulationConfig::default().with_gravity(Vec2::new(0.0, -10.0)));
        sim.add_boundary(BoundaryElement::new(20.0).unwrap());
        let h = sim.add_body(
            RigidBody::new(1.0, Polygon::rectangle(2.0, 1.0).unwrap())
                .unwrap()
                .with_position(Vec2::new(0.0, 2.0))
                .with_material(Material::new(0.2, 0.5)),
        );
        for _ in 0..300 {
            sim.step(1.0 / 60.0).unwrap();
        }
        let body = sim.body(h).unwrap();
        assert!(body.position.y > 0.4 && body.position.y < 0.6, "y = {}", body.position.y);
        assert!(body.rotation.abs() < 0.05);
    }

    #[test]
    fn test_get_mutable_body_pair() {
        let mut slots = vec![Some(ball(0.0, 0.0)), None, Some(ball(2.0, 0.0))];
        let (a, b) = get_mutable_body_pair(&mut slots, 2, 0).unwrap();
        assert_eq!(a.position.x, 2.0);
        assert_eq!(b.position.x, 0.0);
        assert!(get_mutable_body_pair(&mut slots, 0, 1).is_none());
        assert!(get_mutable_body_pair(&mut slots, 0, 0).is_none());
        assert!(get_mutable_body_pair(&mut slots, 0, 7).is_none());
    }
}
