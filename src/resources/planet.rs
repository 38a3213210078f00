use bevy::math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::utils::PLANET_RADIUS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    pub center: Vec3,
    pub radius: f32,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: PLANET_RADIUS,
        }
    }
}

/// The spinning world. Everything attached to it (gates) is stored in its local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub center: Vec3,
    pub radius: f32,
    pub rotation: Quat,
}

impl Planet {
    pub fn new(config: &PlanetConfig) -> Self {
        Self {
            center: config.center,
            radius: config.radius,
            rotation: Quat::IDENTITY,
        }
    }

    /// Rotates the planet about a world axis through its center.
    pub fn rotate(&mut self, axis: Vec3, angle: f32) {
        self.rotation = (Quat::from_axis_angle(axis, angle) * self.rotation).normalize();
    }

    pub fn to_world_point(&self, local: Vec3) -> Vec3 {
        self.center + self.rotation * local
    }

    pub fn to_local_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.center)
    }

    pub fn to_world_rotation(&self, local: Quat) -> Quat {
        self.rotation * local
    }

    pub fn to_local_rotation(&self, world: Quat) -> Quat {
        self.rotation.inverse() * world
    }
}
