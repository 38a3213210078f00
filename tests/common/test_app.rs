use bevy::prelude::*;
use sphere_flyer::{
    agent::{ChannelHooks, DiscreteAction, FlyerEnv, StepOutcome},
    plugins::{GameHookEvent, LatestStep, PendingAction, SimEnv, SphereFlyerPlugin},
    resources::EnvConfig,
};

/// Headless Bevy app running the flyer plugin, stepped by hand.
pub struct TestApp {
    pub app: App,
}

impl TestApp {
    pub fn new(config: EnvConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(SphereFlyerPlugin::new(config));
        app.update();
        Self { app }
    }

    /// Queues `action` and runs one fixed tick.
    pub fn step(&mut self, action: DiscreteAction) {
        self.app.world_mut().resource_mut::<PendingAction>().0 = Some(action);
        self.app.world_mut().run_schedule(FixedUpdate);
    }

    pub fn run_steps(&mut self, action: DiscreteAction, steps: usize) {
        for _ in 0..steps {
            self.step(action);
        }
    }

    pub fn env(&self) -> &FlyerEnv<ChannelHooks> {
        &self.app.world().resource::<SimEnv>().0
    }

    pub fn latest(&self) -> Option<&StepOutcome> {
        self.app.world().resource::<LatestStep>().0.as_ref()
    }

    /// Runs a frame and returns the notifications forwarded during it.
    pub fn drain_hook_events(&mut self) -> Vec<GameHookEvent> {
        self.app.update();
        self.app
            .world()
            .resource::<Events<GameHookEvent>>()
            .iter_current_update_events()
            .copied()
            .collect()
    }
}
