use crate::error::{GeometryDefect, PhysicsResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> PhysicsResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryDefect::InvalidRadius { radius }.into());
        }
        Ok(Self { radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    /// Moment of inertia of a uniform disc of `mass` about its center: m r^2 / 2.
    pub fn inertia(&self, mass: f64) -> f64 {
        0.5 * mass * self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhysicsError;

    #[test]
    fn test_circle_new() {
        let c = Circle::new(5.0).unwrap();
        assert_eq!(c.radius(), 5.0);
        assert_eq!(c.inertia(2.0), 25.0);
    }

    #[test]
    fn test_circle_new_invalid_radius() {
        for radius in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let err = Circle::new(radius).unwrap_err();
            assert!(matches!(
                err,
                PhysicsError::DegenerateGeometry {
                    defect: GeometryDefect::InvalidRadius { .. }
                }
            ));
        }
    }
}
