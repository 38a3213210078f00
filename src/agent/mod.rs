mod action;
mod batch;
mod env;
mod episode;
mod hooks;
mod observation;
mod reward;
mod targeting;

pub use action::{ActionError, DiscreteAction, HumanInput, Strafe, ACTION_BRANCHES};
pub use batch::{BatchStep, EnvBatch};
pub use env::{FlyerEnv, StepInfo, StepOutcome};
pub use episode::{CurriculumConfig, EpisodeContext, TrainingStage};
pub use hooks::{AnimationClip, ChannelHooks, GameHooks, HookEvent, NullHooks, Scoreboard};
pub use observation::{
    encode_observation, ObservationConfig, BASE_OBSERVATION_WIDTH, LOOKAHEAD_SLOT_WIDTH,
    MAX_LOOKAHEAD_GATES,
};
pub use reward::{
    crossing_reward, gate_alignment_reward, stage_reward, survival_reward, FlightSample,
    FullGameShaping, RewardConfig, ShapingInput,
};
pub use targeting::{next_gate, sight, sight_gate, top_gates, GateSighting};
