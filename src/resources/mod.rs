mod config;
mod gate_registry;
mod planet;

pub use config::{AgentConfig, ConfigError, ControlMode, EnvConfig, SimulationMode};
pub use gate_registry::{GateId, GateRegistry};
pub use planet::{Planet, PlanetConfig};
