use bevy::prelude::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    agent::{ActionError, DiscreteAction, FlyerEnv, NullHooks, StepOutcome, TrainingStage},
    resources::EnvConfig,
};

/// Outcome of one environment inside a batch step.
///
/// Finished environments are reset immediately. `reset_observation` then holds the first
/// observation of the new episode while `outcome` still describes the terminal step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStep {
    pub outcome: StepOutcome,
    pub reset_observation: Option<Vec<f32>>,
}

/// Independent headless environments stepped in parallel.
#[derive(Debug)]
pub struct EnvBatch {
    envs: Vec<FlyerEnv<NullHooks>>,
}

impl EnvBatch {
    /// Builds `count` environments. Environment `i` uses seed `config.seed + i`.
    pub fn new(config: &EnvConfig, count: usize) -> Self {
        let envs = (0..count)
            .map(|i| FlyerEnv::headless(config.rebuild_with_seed(config.seed.wrapping_add(i as u64))))
            .collect();
        info!("Created batch of {} environments", count);
        Self { envs }
    }

    pub fn len(&self) -> usize {
        self.envs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    pub fn envs(&self) -> &[FlyerEnv<NullHooks>] {
        &self.envs
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut FlyerEnv<NullHooks>> {
        self.envs.get_mut(index)
    }

    pub fn reset_all(&mut self) -> Vec<Vec<f32>> {
        self.envs.par_iter_mut().map(|env| env.reset()).collect()
    }

    pub fn set_stage(&mut self, stage: TrainingStage) {
        for env in &mut self.envs {
            env.set_stage(stage);
        }
    }

    /// Steps every environment with its action.
    pub fn step(&mut self, actions: &[DiscreteAction]) -> Result<Vec<BatchStep>, ActionError> {
        if actions.len() != self.envs.len() {
            return Err(ActionError::BatchSize {
                expected: self.envs.len(),
                got: actions.len(),
            });
        }

        Ok(self
            .envs
            .par_iter_mut()
            .zip(actions.par_iter())
            .map(|(env, action)| {
                let outcome = env.step(*action);
                let reset_observation =
                    (outcome.terminated || outcome.truncated).then(|| env.reset());
                BatchStep {
                    outcome,
                    reset_observation,
                }
            })
            .collect())
    }
}
