use bevy::math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::{
    components::TangentFrame,
    utils::{
        forward_of, BIRD_COLLISION_RADIUS, CEILING_GRACE, GRAVITY, GROUND_CLEARANCE,
        JUMP_HEIGHT, MAX_ALTITUDE, RADIAL_DAMPING, SIDE_SPEED_DEG,
    },
};

/// Tunables for the flying body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BirdConfig {
    /// Base height above the planet surface at zero altitude.
    pub ground_clearance: f32,
    /// Yaw rate at full strafe input (deg/s).
    pub side_speed_deg: f32,
    /// Apex height of a single flap from rest, ignoring damping.
    pub jump_height: f32,
    /// Inward acceleration magnitude.
    pub gravity: f32,
    /// Linear damping coefficient on radial velocity (1/s).
    pub radial_damping: f32,
    /// Altitude above the base radius beyond which the ceiling timer runs.
    pub max_altitude: f32,
    /// Seconds the bird may stay above the ceiling before dying.
    pub ceiling_grace: f32,
    pub collision_radius: f32,
    /// Radial direction of the bird at start, relative to the planet center.
    pub start_direction: Vec3,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            ground_clearance: GROUND_CLEARANCE,
            side_speed_deg: SIDE_SPEED_DEG,
            jump_height: JUMP_HEIGHT,
            gravity: GRAVITY,
            radial_damping: RADIAL_DAMPING,
            max_altitude: MAX_ALTITUDE,
            ceiling_grace: CEILING_GRACE,
            collision_radius: BIRD_COLLISION_RADIUS,
            start_direction: Vec3::Z,
        }
    }
}

impl BirdConfig {
    /// Outward speed added by one flap: `sqrt(2 g h)`.
    pub fn flap_impulse(&self) -> f32 {
        (2.0 * self.gravity.abs() * self.jump_height.max(0.0)).sqrt()
    }
}

/// Radial state of the bird, owned exclusively by the locomotion step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocomotionState {
    /// Height above the base radius, never negative.
    pub altitude: f32,
    /// Rate of altitude change, outward positive.
    pub radial_velocity: f32,
    pub alive: bool,
    pub over_ceiling_timer: f32,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self {
            altitude: 0.0,
            radial_velocity: 0.0,
            alive: true,
            over_ceiling_timer: 0.0,
        }
    }
}

/// Inputs staged for the next locomotion tick. Consumed exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BirdControls {
    pub flap: bool,
    /// Lateral input in `[-1, 1]`, positive steers toward `right`.
    pub strafe: f32,
}

impl BirdControls {
    /// Returns the staged inputs and clears them.
    pub fn take(&mut self) -> BirdControls {
        std::mem::take(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    GateCollision,
    Ceiling,
    External,
}

/// The flying body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    pub state: LocomotionState,
    pub controls: BirdControls,
    /// World position.
    pub position: Vec3,
    /// World orientation, local `-Z` along the direction of travel and `Y` along the
    /// surface normal.
    pub rotation: Quat,
    pub death_cause: Option<DeathCause>,
}

impl Bird {
    /// Bird resting on the surface along `config.start_direction`.
    pub fn new(config: &BirdConfig, center: Vec3, planet_radius: f32) -> Self {
        let direction = config.start_direction.try_normalize().unwrap_or(Vec3::Y);
        let position = center + direction * (planet_radius + config.ground_clearance);
        let frame = TangentFrame::compute(position, center, Vec3::Y, Vec3::X);

        Self {
            state: LocomotionState::default(),
            controls: BirdControls::default(),
            position,
            rotation: frame.rotation(),
            death_cause: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state.alive
    }

    pub fn altitude(&self) -> f32 {
        self.state.altitude
    }

    pub fn radial_velocity(&self) -> f32 {
        self.state.radial_velocity
    }

    /// Unit radial direction at the bird.
    pub fn normal(&self, center: Vec3) -> Vec3 {
        (self.position - center).try_normalize().unwrap_or(Vec3::Y)
    }

    /// Direction of travel.
    pub fn forward(&self) -> Vec3 {
        forward_of(self.rotation)
    }

    /// Lateral axis of the current orientation (`normal × forward`).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::NEG_X
    }

    /// Stages a flap for the next tick. Repeated requests within a tick collapse to one.
    pub fn request_flap(&mut self) {
        self.controls.flap = true;
    }

    /// Stages the lateral input for the next tick, clamped to `[-1, 1]`.
    pub fn set_strafe(&mut self, input: f32) {
        self.controls.strafe = if input.is_finite() {
            input.clamp(-1.0, 1.0)
        } else {
            0.0
        };
    }

    /// Transitions to dead. Returns `false` if the bird was already dead.
    pub fn kill(&mut self, cause: DeathCause) -> bool {
        if !self.state.alive {
            return false;
        }
        self.state.alive = false;
        self.death_cause = Some(cause);
        true
    }
}
