use sphere_flyer::{
    agent::{DiscreteAction, FlyerEnv, NullHooks, Strafe, TrainingStage},
    resources::{EnvConfig, GateId},
};

/// Default config starting in `stage`.
pub fn create_test_config(stage: TrainingStage) -> EnvConfig {
    let mut config = EnvConfig::default();
    config.curriculum.start_stage = stage;
    config
}

/// Headless env that has already begun its first episode.
pub fn create_test_env(stage: TrainingStage) -> FlyerEnv<NullHooks> {
    let mut env = FlyerEnv::headless(create_test_config(stage));
    env.reset();
    env
}

/// Env with exactly one gate, centered on the bird's flight path `along` units ahead.
pub fn create_single_gate_env(stage: TrainingStage, along: f32) -> (FlyerEnv<NullHooks>, GateId) {
    let mut env = create_test_env(stage);
    env.world_mut().clear_gates();
    let id = env.world_mut().place_gate_ahead(along, 0.0, 0.0);
    (env, id)
}

pub fn idle() -> DiscreteAction {
    DiscreteAction::new(false, Strafe::None)
}

pub fn flap() -> DiscreteAction {
    DiscreteAction::new(true, Strafe::None)
}

/// Flaps from below `hold_altitude` whenever the bird is not climbing.
pub fn hover_policy(env: &FlyerEnv<NullHooks>, hold_altitude: f32) -> DiscreteAction {
    let bird = &env.world().bird;
    DiscreteAction::new(
        bird.altitude() < hold_altitude && bird.radial_velocity() <= 0.0,
        Strafe::None,
    )
}
