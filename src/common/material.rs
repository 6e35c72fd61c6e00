//! Surface coefficients and how two of them combine at a contact.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, PhysicsResult};

/// Represents the physical properties of a body surface affecting collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Material {
    /// Coefficient of restitution (bounciness). Range [0, 1].
    /// 0 = perfectly inelastic (no bounce), 1 = perfectly elastic.
    pub restitution: f64,
    /// Coulomb friction coefficient. Range [0, infinity).
    pub friction: f64,
}

impl Material {
    /// Frictionless, perfectly elastic surface.
    pub const ELASTIC: Material = Material {
        restitution: 1.0,
        friction: 0.0,
    };

    /// Creates a new material, clamping restitution into [0, 1] and friction to >= 0.
    pub fn new(restitution: f64, friction: f64) -> Self {
        Material {
            restitution: restitution.clamp(0.0, 1.0),
            friction: friction.max(0.0),
        }
    }

    /// Like [`Material::new`] but rejects NaN coefficients instead of letting them
    /// poison every impulse computed against this surface.
    pub fn try_new(restitution: f64, friction: f64) -> PhysicsResult<Self> {
        if restitution.is_nan() || friction.is_nan() {
            return Err(PhysicsError::InvalidMaterial);
        }
        Ok(Self::new(restitution, friction))
    }

    /// Effective restitution of a contact: the product of both coefficients.
    pub fn combined_restitution(a: &Material, b: &Material) -> f64 {
        a.restitution * b.restitution
    }

    /// Effective friction of a contact: the arithmetic mean of both coefficients.
    pub fn combined_friction(a: &Material, b: &Material) -> f64 {
        (a.friction + b.friction) * 0.5
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::ELASTIC
    }
}
