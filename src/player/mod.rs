pub mod controller;

pub use controller::{ControlInput, MovementWindow, PlayerController, PlayerId};
