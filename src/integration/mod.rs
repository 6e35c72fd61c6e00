pub mod integrator;

pub use integrator::{integrate, integrate_damped, wrap_angle};
