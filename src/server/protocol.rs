use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

use crate::{
    agent::{StepInfo, StepOutcome, TrainingStage},
    utils::SimError,
};

/// Commands sent by the client, one JSON document per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    /// Build the environment from a configuration.
    Initialize { config: serde_json::Value },
    /// Begin a new episode, optionally reseeding first.
    Reset { seed: Option<u64> },
    /// Advance one tick with a discrete action.
    Step { flap: i64, strafe: i64 },
    /// Select the curriculum stage used from the next episode.
    SetStage { stage: TrainingStage },
    /// Advance the curriculum by one stage.
    NextStage,
    /// End the session.
    Close,
}

/// Server replies, one JSON document per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Ready {
        status: String,
        observation_width: usize,
        action_branches: [usize; 2],
    },
    Step {
        obs: Vec<f32>,
        reward: f32,
        terminated: bool,
        truncated: bool,
        info: StepInfo,
    },
    Stage {
        stage: TrainingStage,
        description: String,
    },
    Status {
        status: String,
    },
    Error {
        error: String,
    },
}

impl Response {
    pub fn error(error: impl ToString) -> Self {
        Response::Error {
            error: error.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

impl From<StepOutcome> for Response {
    fn from(outcome: StepOutcome) -> Self {
        Response::Step {
            obs: outcome.observation,
            reward: outcome.reward,
            terminated: outcome.terminated,
            truncated: outcome.truncated,
            info: outcome.info,
        }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Simulation(#[from] SimError),
}
