use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{components::Bird, utils::STRAFE_DEADZONE};

/// Sizes of the two discrete action branches: flap, strafe.
pub const ACTION_BRANCHES: [usize; 2] = [2, 3];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("flap branch must be 0 or 1, got {0}")]
    InvalidFlap(i64),

    #[error("strafe branch must be 0, 1 or 2, got {0}")]
    InvalidStrafe(i64),

    #[error("expected {expected} actions, got {got}")]
    BatchSize { expected: usize, got: usize },
}

/// Lateral choice of the discrete action space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strafe {
    Left,
    #[default]
    None,
    Right,
}

impl Strafe {
    pub fn from_index(index: i64) -> Result<Self, ActionError> {
        match index {
            0 => Ok(Strafe::Left),
            1 => Ok(Strafe::None),
            2 => Ok(Strafe::Right),
            other => Err(ActionError::InvalidStrafe(other)),
        }
    }

    pub fn index(self) -> i64 {
        match self {
            Strafe::Left => 0,
            Strafe::None => 1,
            Strafe::Right => 2,
        }
    }

    /// Continuous input fed to locomotion.
    pub fn input(self) -> f32 {
        match self {
            Strafe::Left => -1.0,
            Strafe::None => 0.0,
            Strafe::Right => 1.0,
        }
    }

    /// Quantises an analog axis with a symmetric deadzone.
    pub fn from_axis(axis: f32, deadzone: f32) -> Self {
        if axis < -deadzone {
            Strafe::Left
        } else if axis > deadzone {
            Strafe::Right
        } else {
            Strafe::None
        }
    }
}

/// One decision of the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteAction {
    pub flap: bool,
    pub strafe: Strafe,
}

impl DiscreteAction {
    pub fn new(flap: bool, strafe: Strafe) -> Self {
        Self { flap, strafe }
    }

    /// Builds an action from raw branch indices.
    pub fn from_branches(flap: i64, strafe: i64) -> Result<Self, ActionError> {
        let flap = match flap {
            0 => false,
            1 => true,
            other => return Err(ActionError::InvalidFlap(other)),
        };
        Ok(Self {
            flap,
            strafe: Strafe::from_index(strafe)?,
        })
    }

    pub fn branches(&self) -> [i64; 2] {
        [self.flap as i64, self.strafe.index()]
    }

    /// Stages the action on the bird for the next tick.
    pub fn apply(&self, bird: &mut Bird) {
        if self.flap {
            bird.request_flap();
        }
        bird.set_strafe(self.strafe.input());
    }
}

/// Raw human input sampled between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HumanInput {
    /// Edge-triggered: set on key press, cleared when consumed.
    pub flap_pressed: bool,
    /// Analog lateral axis in `[-1, 1]`.
    pub axis: f32,
}

impl HumanInput {
    /// Converts to a discrete action and clears the flap edge.
    pub fn take_action(&mut self) -> DiscreteAction {
        let action = DiscreteAction {
            flap: self.flap_pressed,
            strafe: Strafe::from_axis(self.axis, STRAFE_DEADZONE),
        };
        self.flap_pressed = false;
        action
    }
}
