use std::fmt;

use crate::math::vec2::Vec2;
use crate::objects::BodyHandle;

/// One side of a contact: a movable body or a boundary element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Participant {
    Body(BodyHandle),
    Boundary(usize),
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Body(handle) => write!(f, "{handle}"),
            Participant::Boundary(index) => write!(f, "boundary #{index}"),
        }
    }
}

/// Where the contact is and which way each side is pushed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactGeometry {
    /// The single world-space contact point.
    pub location: Vec2,
    /// `normals[0]` points from the first participant to the second; `normals[1]` is its negation.
    pub normals: [Vec2; 2],
}

/// A detected contact between two participants. Produced fresh every step and
/// never modified after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    first: Participant,
    second: Participant,
    min_separation: f64,
    geometry: ContactGeometry,
}

impl CollisionEvent {
    /// `normal` must be a unit vector from `first` toward `second`.
    pub fn new(
        first: Participant,
        second: Participant,
        normal: Vec2,
        min_separation: f64,
        location: Vec2,
    ) -> Self {
        Self {
            first,
            second,
            min_separation,
            geometry: ContactGeometry {
                location,
                normals: [normal, -normal],
            },
        }
    }

    pub fn first(&self) -> Participant {
        self.first
    }

    pub fn second(&self) -> Participant {
        self.second
    }

    pub fn participants(&self) -> (Participant, Participant) {
        (self.first, self.second)
    }

    /// Global unit normal, first toward second.
    pub fn normal(&self) -> Vec2 {
        self.geometry.normals[0]
    }

    /// Smallest signed gap along the contact normal; negative while the shapes interpenetrate.
    pub fn min_separation(&self) -> f64 {
        self.min_separation
    }

    /// `-min_separation`, clamped at zero.
    pub fn penetration_depth(&self) -> f64 {
        (-self.min_separation).max(0.0)
    }

    pub fn geometry(&self) -> &ContactGeometry {
        &self.geometry
    }

    pub fn location(&self) -> Vec2 {
        self.geometry.location
    }
}
