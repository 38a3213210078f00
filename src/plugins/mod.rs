mod flyer;

pub use flyer::{
    FlyerSystemSet, GameHookEvent, HumanControls, LatestStep, PendingAction, SimEnv,
    SphereFlyerPlugin,
};
