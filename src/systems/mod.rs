mod collision;
mod locomotion;
mod spawner;
mod spinner;

pub use collision::{detect_gate_contacts, GateContact};
pub use locomotion::{integrate_bird, integrate_radial, reset_bird};
pub(crate) use spawner::insert_gate;
pub use spawner::{spawn_gate, GateSpawner, SpawnerConfig};
pub use spinner::{PlanetSpinner, SpinnerConfig};
