pub mod config;
pub mod material;

pub use config::SimulationConfig;
pub use material::Material;
