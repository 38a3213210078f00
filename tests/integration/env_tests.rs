use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use sphere_flyer::{
    agent::{DiscreteAction, EnvBatch, FlyerEnv, Strafe, TrainingStage},
    components::DeathCause,
    resources::EnvConfig,
};

use crate::common::{
    assert_bird_on_shell, assert_observation_valid, create_single_gate_env, create_test_config,
    create_test_env, flap, hover_policy, idle,
};

#[test]
fn test_idle_bird_settles_on_the_floor() {
    let mut env = create_test_env(TrainingStage::Survival);
    env.world_mut().bird.state.altitude = 6.0;

    for _ in 0..1000 {
        let outcome = env.step(idle());
        assert!(!outcome.terminated);
        assert_bird_on_shell(env.world());
    }

    assert_relative_eq!(env.world().bird.altitude(), 0.0, epsilon = 1e-5);
    assert_relative_eq!(env.world().bird.radial_velocity(), 0.0, epsilon = 1e-5);
}

#[test]
fn test_progress_reward_while_closing_on_a_gate() {
    let (mut env, id) = create_single_gate_env(TrainingStage::SimplePipes, 10.0);

    let mut last_along = f32::INFINITY;
    let mut last_total = env.episode().cumulative_reward;
    for _ in 0..100 {
        let outcome = env.step(idle());
        assert!(!outcome.terminated);

        let frame = env.world().frame();
        let center = env.world().gates.get(id).unwrap().center(&env.world().planet);
        let (along, _, _) = frame.decompose(center - env.world().bird.position);
        assert!(along < last_along, "gate stopped approaching");
        assert!(outcome.info.episode_reward >= last_total, "shaped reward decreased");

        last_along = along;
        last_total = outcome.info.episode_reward;
    }
    assert!(last_along < 10.0 && last_along > 0.0);
}

#[test]
fn test_passing_a_gate_scores_once() {
    let (mut env, _) = create_single_gate_env(TrainingStage::SimplePipes, 3.0);

    let mut scored_rewards = 0;
    for _ in 0..200 {
        let outcome = env.step(idle());
        assert!(!outcome.terminated);
        if outcome.reward > 2.0 {
            scored_rewards += 1;
        }
    }
    assert_eq!(scored_rewards, 1);
    assert_eq!(env.episode().score, 1);
}

#[test]
fn test_hitting_a_pipe_ends_the_episode() {
    let mut env = create_test_env(TrainingStage::SimplePipes);
    env.world_mut().clear_gates();
    env.world_mut().place_gate_ahead(3.0, 0.0, 5.0);

    let terminal = (0..200)
        .map(|_| env.step(idle()))
        .find(|outcome| outcome.terminated)
        .expect("bird should hit the lower pipe");

    assert_eq!(terminal.info.death_cause, Some(DeathCause::GateCollision));
    assert_relative_eq!(terminal.reward, -1.0, epsilon = 0.05);

    let after = env.step(flap());
    assert_eq!(after.reward, 0.0);
    assert!(after.terminated);
}

#[test]
fn test_reset_clears_spawned_gates() {
    let mut env = create_test_env(TrainingStage::FullGame);
    for _ in 0..600 {
        let action = hover_policy(&env, 2.0);
        if env.step(action).terminated {
            break;
        }
    }
    assert!(!env.world().gates.is_empty());

    env.reset();
    assert!(env.world().gates.is_empty());
    assert!(env.world().bird.is_alive());
    assert_eq!(env.episode().cumulative_reward, 0.0);
}

#[test]
fn test_hover_policy_survives() {
    let mut env = create_test_env(TrainingStage::Survival);
    let width = env.observation_width();

    for _ in 0..1000 {
        let action = hover_policy(&env, 3.0);
        let outcome = env.step(action);
        assert!(!outcome.terminated);
        assert!(outcome.reward > 0.0);
        assert_observation_valid(&outcome.observation, width);
    }
}

#[test]
fn test_observation_width_is_stable() {
    let mut config = create_test_config(TrainingStage::Survival);
    config.observation.lookahead_gates = 3;
    let mut env = FlyerEnv::headless(config);

    for stage in TrainingStage::ALL {
        env.set_stage(stage);
        let obs = env.reset();
        assert_observation_valid(&obs, 18);
        for i in 0..50 {
            let outcome = env.step(DiscreteAction::new(i % 10 == 0, Strafe::Right));
            assert_observation_valid(&outcome.observation, 18);
        }
    }
}

#[test]
fn test_reseed_reproduces_gate_layout() {
    let layout = |env: &FlyerEnv| {
        let planet = env.world().planet;
        env.world()
            .gates
            .iter()
            .map(|(_, gate)| gate.center(&planet))
            .collect::<Vec<_>>()
    };

    let run = |env: &mut FlyerEnv| {
        env.reset_with_seed(Some(99));
        for _ in 0..300 {
            env.step(idle());
        }
        layout(env)
    };

    let first = run(&mut create_test_env(TrainingStage::FullGame));
    assert!(!first.is_empty());
    assert_eq!(run(&mut create_test_env(TrainingStage::FullGame)), first);
}

#[test]
fn test_batch_matches_independent_envs() {
    let config = EnvConfig::default();
    let mut batch = EnvBatch::new(&config, 3);
    let initial = batch.reset_all();
    assert_eq!(initial.len(), 3);

    let steps = batch.step(&[idle(), flap(), idle()]).unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0].outcome.info.steps, 1);
    assert!(steps[1].outcome.observation[1] > 0.0);
}
