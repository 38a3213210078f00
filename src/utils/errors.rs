use thiserror::Error;

use crate::{agent::ActionError, resources::ConfigError};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid action: {0}")]
    Action(#[from] ActionError),

    #[error("Environment not initialized")]
    NotInitialized,
}
