use bevy::prelude::{info, warn, Resource};

use crate::{
    agent::{FlyerEnv, NullHooks, TrainingStage, ACTION_BRANCHES},
    resources::EnvConfig,
    server::{Command, Response, ServerError},
    utils::SimError,
};

/// Protocol state of one client connection.
///
/// Pure command handler: parsing a line and answering it touches no I/O.
#[derive(Resource, Debug, Default)]
pub struct ServerSession {
    env: Option<FlyerEnv<NullHooks>>,
    closed: bool,
}

impl ServerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.env.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn env(&self) -> Option<&FlyerEnv<NullHooks>> {
        self.env.as_ref()
    }

    /// Parses and answers one JSON line. Failures become `{ "error": ... }` replies.
    pub fn handle_line(&mut self, line: &str) -> Response {
        let result = serde_json::from_str::<Command>(line.trim())
            .map_err(ServerError::from)
            .and_then(|command| self.handle(command));

        result.unwrap_or_else(|e| {
            warn!("Command failed: {}", e);
            Response::error(e)
        })
    }

    pub fn handle(&mut self, command: Command) -> Result<Response, ServerError> {
        if self.closed {
            return Err(ServerError::Protocol("session closed".into()));
        }

        match command {
            Command::Initialize { config } => {
                if self.env.is_some() {
                    return Err(ServerError::Protocol("server already initialized".into()));
                }
                let config = EnvConfig::from_json(&config).map_err(SimError::from)?;
                let env = FlyerEnv::headless(config);
                let response = Response::Ready {
                    status: "ready".into(),
                    observation_width: env.observation_width(),
                    action_branches: ACTION_BRANCHES,
                };
                info!("Environment initialized, stage {}", env.stage());
                self.env = Some(env);
                Ok(response)
            }

            Command::Reset { seed } => {
                let env = self.env_mut()?;
                let obs = env.reset_with_seed(seed);
                Ok(Response::Step {
                    obs,
                    reward: 0.0,
                    terminated: false,
                    truncated: false,
                    info: env.info(),
                })
            }

            Command::Step { flap, strafe } => {
                let env = self.env_mut()?;
                let outcome = env.step_branches(flap, strafe).map_err(SimError::from)?;
                Ok(outcome.into())
            }

            Command::SetStage { stage } => {
                let env = self.env_mut()?;
                env.set_stage(stage);
                Ok(stage_response(env.stage()))
            }

            Command::NextStage => {
                let stage = self.env_mut()?.next_stage();
                Ok(stage_response(stage))
            }

            Command::Close => {
                info!("Close command received");
                self.closed = true;
                Ok(Response::Status {
                    status: "closed".into(),
                })
            }
        }
    }

    fn env_mut(&mut self) -> Result<&mut FlyerEnv<NullHooks>, ServerError> {
        self.env
            .as_mut()
            .ok_or(ServerError::Simulation(SimError::NotInitialized))
    }
}

fn stage_response(stage: TrainingStage) -> Response {
    Response::Stage {
        stage,
        description: stage.description().to_string(),
    }
}
