//! Tunables for a [`Simulation`](crate::world::Simulation).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;

/// Simulation-wide settings. Every field has a default, so partial configs
/// deserialize cleanly.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Acceleration applied to every dynamic body each step.
    pub gravity: Vec2,
    /// Fraction of linear velocity removed per second. 0 disables damping.
    pub linear_damping: f64,
    /// Fraction of angular velocity removed per second. 0 disables damping.
    pub angular_damping: f64,
    /// Share of the penetration removed per contact per step (Baumgarte bias).
    pub correction_percent: f64,
    /// Penetration depth tolerated without positional correction.
    pub correction_slop: f64,
    /// Largest angle (radians) between incident and reference edges that still counts as an edge contact.
    pub edge_contact_angle: f64,
}

impl SimulationConfig {
    pub const DEFAULT_CORRECTION_PERCENT: f64 = 0.2;
    pub const DEFAULT_CORRECTION_SLOP: f64 = 0.01;
    pub const DEFAULT_EDGE_CONTACT_ANGLE: f64 = std::f64::consts::PI / 180.0;

    #[must_use]
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    #[must_use]
    pub fn with_damping(mut self, linear: f64, angular: f64) -> Self {
        self.linear_damping = linear.max(0.0);
        self.angular_damping = angular.max(0.0);
        self
    }

    /// Sets the Baumgarte bias. `percent` is clamped into [0, 1].
    #[must_use]
    pub fn with_correction(mut self, percent: f64, slop: f64) -> Self {
        self.correction_percent = percent.clamp(0.0, 1.0);
        self.correction_slop = slop.max(0.0);
        self
    }

    #[must_use]
    pub fn with_edge_contact_angle(mut self, angle: f64) -> Self {
        self.edge_contact_angle = angle.clamp(0.0, std::f64::consts::FRAC_PI_2);
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
            correction_percent: Self::DEFAULT_CORRECTION_PERCENT,
            correction_slop: Self::DEFAULT_CORRECTION_SLOP,
            edge_contact_angle: Self::DEFAULT_EDGE_CONTACT_ANGLE,
        }
    }
}
