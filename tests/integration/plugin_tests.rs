use pretty_assertions::assert_eq;
use sphere_flyer::{
    agent::{AnimationClip, HookEvent, TrainingStage},
    plugins::GameHookEvent,
    resources::SimulationMode,
};

use crate::common::{create_test_config, flap, idle, TestApp};

#[test]
fn test_plugin_steps_on_fixed_update() {
    let mut app = TestApp::new(create_test_config(TrainingStage::Survival));
    assert!(app.latest().is_none());

    app.run_steps(idle(), 10);
    assert_eq!(app.env().episode().steps, 10);
    assert_eq!(app.latest().map(|step| step.info.steps), Some(10));
}

#[test]
fn test_plugin_stops_after_death() {
    let mut app = TestApp::new(create_test_config(TrainingStage::Survival));
    app.run_steps(flap(), 300);

    let env = app.env();
    assert!(env.is_done());
    let steps = env.episode().steps;
    assert!(steps < 300);

    app.run_steps(idle(), 5);
    assert_eq!(app.env().episode().steps, steps);
}

#[test]
fn test_interactive_agent_death_is_announced() {
    let mut config = create_test_config(TrainingStage::Survival);
    config.mode = SimulationMode::Interactive;
    let mut app = TestApp::new(config);

    app.run_steps(flap(), 300);
    let events = app.drain_hook_events();
    assert_eq!(
        events,
        vec![GameHookEvent(HookEvent::GameOver {
            ai_controlled: true
        })]
    );
    assert!(!events.contains(&GameHookEvent(HookEvent::PlayClip(AnimationClip::Dead))));
}
