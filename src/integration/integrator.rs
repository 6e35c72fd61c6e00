use crate::objects::rigid_body::RigidBody;

/// Integrates the rigid body's state forward in time using Semi-Implicit Euler.
/// Accumulated force and torque are consumed.
pub fn integrate(body: &mut RigidBody, dt: f64) {
    integrate_damped(body, dt, 0.0, 0.0);
}

/// Like [`integrate`], additionally scaling velocities by `1 / (1 + c * dt)` for
/// linear and angular damping coefficients `c`.
pub fn integrate_damped(body: &mut RigidBody, dt: f64, linear_damping: f64, angular_damping: f64) {
    if body.is_static() {
        // Static object: never moves, but must not hoard forces either
        body.clear_accumulators();
        return;
    }

    // --- Linear Motion --- //
    let linear_acceleration = body.force * body.inv_mass();
    body.linear_velocity += linear_acceleration * dt;
    if linear_damping > 0.0 {
        body.linear_velocity = body.linear_velocity * (1.0 / (1.0 + dt * linear_damping));
    }
    body.position += body.linear_velocity * dt;

    // --- Angular Motion --- //
    let angular_acceleration = body.torque * body.inv_inertia();
    body.angular_velocity += angular_acceleration * dt;
    if angular_damping > 0.0 {
        body.angular_velocity *= 1.0 / (1.0 + dt * angular_damping);
    }
    body.rotation = wrap_angle(body.rotation + body.angular_velocity * dt);

    body.clear_accumulators();
}

/// Wraps an angle in radians to the range [-PI, PI].
pub fn wrap_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}
