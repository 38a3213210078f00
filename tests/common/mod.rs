mod assertions;
mod fixtures;
mod test_app;

pub use assertions::{assert_bird_on_shell, assert_observation_valid};
pub use fixtures::*;
pub use test_app::TestApp;
