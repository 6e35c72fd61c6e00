//! Maps host input onto one designated body.
//!
//! The controller never owns its body. It names it by [`BodyHandle`] and is
//! handed the body by the [`Simulation`](crate::world::Simulation) at the start
//! of every step, before integration.

use std::fmt;

use crate::math::vec2::Vec2;
use crate::objects::{BodyHandle, RigidBody};

/// Velocity change per second of held direction input, in world units.
pub const DEFAULT_ACCELERATION: f64 = 100.0;

/// Identifies a controller registered with a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub(crate) usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player #{}", self.0)
    }
}

/// Input state for one step. Direction flags stay set until the host changes them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Extra force applied at the center of mass every step while set.
    pub force: Vec2,
}

impl ControlInput {
    /// Unit-per-axis direction of the held keys; opposite keys cancel. +y is up.
    pub fn direction(&self) -> Vec2 {
        let axis = |negative: bool, positive: bool| match (negative, positive) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        Vec2::new(axis(self.left, self.right), axis(self.down, self.up))
    }
}

/// Axis-aligned region the controlled body's position is clamped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementWindow {
    pub min: Vec2,
    pub max: Vec2,
}

impl MovementWindow {
    pub const UNBOUNDED: MovementWindow = MovementWindow {
        min: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        max: Vec2::new(f64::INFINITY, f64::INFINITY),
    };

    /// Builds a window from two corners in any order.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }
}

impl Default for MovementWindow {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerController {
    body: BodyHandle,
    acceleration: f64,
    maximum_speed: f64,
    window: MovementWindow,
    input: ControlInput,
    pending_impulses: Vec<(Vec2, Vec2)>,
}

impl PlayerController {
    pub fn new(body: BodyHandle) -> Self {
        Self {
            body,
            acceleration: DEFAULT_ACCELERATION,
            maximum_speed: f64::INFINITY,
            window: MovementWindow::UNBOUNDED,
            input: ControlInput::default(),
            pending_impulses: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_acceleration(mut self, acceleration: f64) -> Self {
        self.acceleration = acceleration.max(0.0);
        self
    }

    /// Caps the body's speed after control input is applied. Non-positive values are ignored.
    #[must_use]
    pub fn with_maximum_speed(mut self, maximum_speed: f64) -> Self {
        if maximum_speed > 0.0 {
            self.maximum_speed = maximum_speed;
        }
        self
    }

    #[must_use]
    pub fn with_movement_window(mut self, window: MovementWindow) -> Self {
        self.window = window;
        self
    }

    /// The controlled body.
    pub fn player_body(&self) -> BodyHandle {
        self.body
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    pub fn maximum_speed(&self) -> f64 {
        self.maximum_speed
    }

    pub fn movement_window(&self) -> &MovementWindow {
        &self.window
    }

    pub fn input(&self) -> &ControlInput {
        &self.input
    }

    pub fn set_input(&mut self, input: ControlInput) {
        self.input = input;
    }

    /// Queues an impulse through the center of mass for the next step.
    pub fn queue_impulse(&mut self, impulse: Vec2) {
        self.queue_impulse_at(Vec2::ZERO, impulse);
    }

    /// Queues an impulse at `relative_point` (offset from the center of mass) for the next step.
    pub fn queue_impulse_at(&mut self, relative_point: Vec2, impulse: Vec2) {
        self.pending_impulses.push((relative_point, impulse));
    }

    pub fn pending_impulses(&self) -> usize {
        self.pending_impulses.len()
    }

    /// Applies held input, the input force and queued impulses to `body`, then
    /// caps its speed. Runs before integration.
    pub fn apply_controls(&mut self, body: &mut RigidBody, dt: f64) {
        body.linear_velocity += self.input.direction() * (self.acceleration * dt);
        body.apply_force(self.input.force);
        for (relative_point, impulse) in self.pending_impulses.drain(..) {
            body.apply_impulse(relative_point, impulse);
        }

        let speed = body.linear_velocity.magnitude();
        if speed > self.maximum_speed {
            body.linear_velocity = body.linear_velocity * (self.maximum_speed / speed);
        }
    }

    /// Pulls `body` back inside the movement window. Runs after integration.
    pub fn clamp_to_window(&self, body: &mut RigidBody) {
        body.position = self.window.clamp(body.position);
    }
}
