use bevy::math::Vec3;
use bevy::prelude::warn;
use serde::{Deserialize, Serialize};

use crate::{
    components::Bird,
    resources::Planet,
    utils::{project_on_plane, try_direction, SPIN_SPEED_DEG},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpinnerConfig {
    /// Planet spin rate (deg/s).
    pub angular_speed_deg: f32,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            angular_speed_deg: SPIN_SPEED_DEG,
        }
    }
}

/// Rotates the planet under the bird so the ground scrolls toward it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetSpinner {
    current_axis: Vec3,
}

impl Default for PlanetSpinner {
    fn default() -> Self {
        Self {
            current_axis: Vec3::Y,
        }
    }
}

impl PlanetSpinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis published by the last successful tick.
    pub fn current_axis(&self) -> Vec3 {
        self.current_axis
    }

    /// Recomputes the spin axis from the bird's heading and rotates the planet about it.
    ///
    /// Returns the axis in use for the rest of the tick. When neither the bird's forward
    /// nor its right vector survives projection onto the tangent plane the planet is left
    /// untouched and the previous axis is kept.
    pub fn tick(&mut self, config: &SpinnerConfig, planet: &mut Planet, bird: &Bird, dt: f32) -> Vec3 {
        let normal = bird.normal(planet.center);

        let Some(forward) = try_direction(project_on_plane(bird.forward(), normal))
            .or_else(|| try_direction(project_on_plane(bird.right(), normal)))
        else {
            warn!("Spin axis degenerate at {:?}; skipping planet rotation", bird.position);
            return self.current_axis;
        };

        let Some(axis) = try_direction(forward.cross(normal)) else {
            warn!("Spin axis degenerate at {:?}; skipping planet rotation", bird.position);
            return self.current_axis;
        };

        self.current_axis = axis;
        planet.rotate(axis, config.angular_speed_deg.to_radians() * dt);
        axis
    }

    pub fn reset(&mut self) {
        self.current_axis = Vec3::Y;
    }
}
