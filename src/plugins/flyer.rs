use bevy::prelude::*;
use crossbeam_channel::Receiver;

use crate::{
    agent::{ChannelHooks, DiscreteAction, FlyerEnv, HookEvent, HumanInput, StepOutcome},
    resources::{ControlMode, EnvConfig},
};

/// The running environment.
#[derive(Resource, Deref, DerefMut)]
pub struct SimEnv(pub FlyerEnv<ChannelHooks>);

/// Keyboard state accumulated between fixed ticks.
#[derive(Resource, Default, Debug, Deref, DerefMut)]
pub struct HumanControls(pub HumanInput);

/// Action supplied by an agent for the next fixed tick.
#[derive(Resource, Default, Debug)]
pub struct PendingAction(pub Option<DiscreteAction>);

/// Outcome of the most recent fixed tick.
#[derive(Resource, Default, Debug)]
pub struct LatestStep(pub Option<StepOutcome>);

/// Presentation notification emitted by the environment.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameHookEvent(pub HookEvent);

#[derive(Resource, Deref)]
struct HookReceiver(Receiver<HookEvent>);

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum FlyerSystemSet {
    Input,
    Notifications,
}

/// Runs a [`FlyerEnv`] on Bevy's fixed timestep.
///
/// In `ControlMode::Human` the keyboard drives the bird. In `ControlMode::Agent` a tick only
/// advances when a [`PendingAction`] is available.
pub struct SphereFlyerPlugin {
    config: EnvConfig,
}

impl SphereFlyerPlugin {
    pub fn new(config: EnvConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SphereFlyerPlugin {
    fn build(&self, app: &mut App) {
        let (hooks, receiver) = ChannelHooks::new();
        let env = FlyerEnv::new(self.config.clone(), hooks);

        app.insert_resource(Time::<Fixed>::from_seconds(env.config().time_step as f64))
            .insert_resource(SimEnv(env))
            .insert_resource(HookReceiver(receiver))
            .init_resource::<HumanControls>()
            .init_resource::<PendingAction>()
            .init_resource::<LatestStep>()
            .add_event::<GameHookEvent>()
            .configure_sets(
                Update,
                (FlyerSystemSet::Input, FlyerSystemSet::Notifications).chain(),
            )
            .add_systems(Startup, begin_episode)
            .add_systems(
                Update,
                (
                    keyboard_input_system
                        .run_if(human_controlled)
                        .in_set(FlyerSystemSet::Input),
                    forward_hook_events.in_set(FlyerSystemSet::Notifications),
                ),
            )
            .add_systems(FixedUpdate, step_environment);
    }
}

fn human_controlled(env: Res<SimEnv>) -> bool {
    env.config().control == ControlMode::Human
}

fn begin_episode(mut env: ResMut<SimEnv>) {
    env.reset();
    info!("Stage: {}", env.stage_description());
}

fn keyboard_input_system(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut env: ResMut<SimEnv>,
    mut controls: ResMut<HumanControls>,
) {
    let Some(keys) = keys else {
        return;
    };

    if keys.just_pressed(KeyCode::Space) {
        controls.flap_pressed = true;
    }

    let left = keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]);
    let right = keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]);
    controls.axis = match (left, right) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };

    if keys.just_pressed(KeyCode::Enter) && env.restart_game() {
        controls.0 = HumanInput::default();
    }
}

fn step_environment(
    mut env: ResMut<SimEnv>,
    mut controls: ResMut<HumanControls>,
    mut pending: ResMut<PendingAction>,
    mut latest: ResMut<LatestStep>,
) {
    if env.is_done() {
        return;
    }

    let action = match env.config().control {
        ControlMode::Human => controls.take_action(),
        ControlMode::Agent => match pending.0.take() {
            Some(action) => action,
            None => return,
        },
    };

    latest.0 = Some(env.step(action));
}

fn forward_hook_events(receiver: Res<HookReceiver>, mut events: EventWriter<GameHookEvent>) {
    for event in receiver.try_iter() {
        events.send(GameHookEvent(event));
    }
}
