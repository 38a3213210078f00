mod bird;
mod frame;
mod gate;

pub use bird::{Bird, BirdConfig, BirdControls, DeathCause, LocomotionState};
pub use frame::TangentFrame;
pub use gate::{Gate, GateConfig, GatePose};
