pub mod agent;
pub mod components;
pub mod plugins;
pub mod resources;
pub mod server;
pub mod systems;
pub mod utils;
pub mod world;

pub use agent::{DiscreteAction, EnvBatch, FlyerEnv, StepOutcome, TrainingStage};
pub use resources::EnvConfig;
pub use world::FlightWorld;
