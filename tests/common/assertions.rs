use approx::assert_relative_eq;
use sphere_flyer::world::FlightWorld;

/// Assert that an observation has the expected width and only finite slots
#[track_caller]
pub fn assert_observation_valid(obs: &[f32], width: usize) {
    assert_eq!(obs.len(), width, "Observation width changed");
    for (index, value) in obs.iter().enumerate() {
        assert!(value.is_finite(), "Observation slot {} is not finite", index);
    }
}

/// Assert that the bird sits at `radius + clearance + altitude` from the planet center
#[track_caller]
pub fn assert_bird_on_shell(world: &FlightWorld) {
    let bird = &world.bird;
    let expected =
        world.planet.radius + world.bird_config().ground_clearance + bird.altitude();
    let actual = (bird.position - world.planet.center).length();
    assert_relative_eq!(actual, expected, epsilon = 1e-3);
    assert!(bird.altitude() >= 0.0, "Altitude below the floor");
}
