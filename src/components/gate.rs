use bevy::math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::{
    resources::Planet,
    utils::{
        forward_of, up_of, GAP_HALF_HEIGHT, GATE_HALF_THICKNESS, GATE_HALF_WIDTH, GATE_LIFETIME,
    },
};

/// Shape and lifetime of spawned gates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    /// Seconds before a gate is destroyed.
    pub lifetime: f32,
    /// Candidate heights of the gap center above the gate base. One is drawn per spawn.
    pub gap_center_heights: Vec<f32>,
    pub gap_half_height: f32,
    pub half_width: f32,
    pub half_thickness: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            lifetime: GATE_LIFETIME,
            gap_center_heights: vec![7.5, 9.0, 10.5],
            gap_half_height: GAP_HALF_HEIGHT,
            half_width: GATE_HALF_WIDTH,
            half_thickness: GATE_HALF_THICKNESS,
        }
    }
}

/// World-space axes and gap center of a gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatePose {
    pub center: Vec3,
    /// Points out of the gate face that looked at the bird when spawned.
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl GatePose {
    /// Offset of `point` from the gap center as (depth, lateral, height).
    pub fn local_offset(&self, point: Vec3) -> (f32, f32, f32) {
        let offset = point - self.center;
        (
            offset.dot(self.forward),
            offset.dot(self.right),
            offset.dot(self.up),
        )
    }
}

/// An obstacle gate attached to the planet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    /// Base of the gate in the planet frame.
    pub local_position: Vec3,
    /// Orientation in the planet frame, up along the local radial direction.
    pub local_rotation: Quat,
    /// Distance of the gap center above the base along the gate's up axis.
    pub center_height: f32,
    pub age: f32,
    pub lifetime: f32,
    pub scored: bool,
    /// Bird depth relative to the gate plane on the previous collision check.
    pub last_depth: Option<f32>,
}

impl Gate {
    pub fn new(local_position: Vec3, local_rotation: Quat, center_height: f32, lifetime: f32) -> Self {
        Self {
            local_position,
            local_rotation,
            center_height,
            age: 0.0,
            lifetime,
            scored: false,
            last_depth: None,
        }
    }

    pub fn world_position(&self, planet: &Planet) -> Vec3 {
        planet.to_world_point(self.local_position)
    }

    pub fn world_rotation(&self, planet: &Planet) -> Quat {
        planet.to_world_rotation(self.local_rotation)
    }

    /// World position of the gap center, the point the agent aims for.
    pub fn center(&self, planet: &Planet) -> Vec3 {
        self.world_position(planet) + up_of(self.world_rotation(planet)) * self.center_height
    }

    pub fn pose(&self, planet: &Planet) -> GatePose {
        let rotation = self.world_rotation(planet);
        let forward = forward_of(rotation);
        let up = up_of(rotation);
        GatePose {
            center: self.world_position(planet) + up * self.center_height,
            forward,
            right: up.cross(forward),
            up,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }

    /// Advances the lifetime timer. Returns `true` once the gate has expired.
    pub fn tick_lifetime(&mut self, dt: f32) -> bool {
        self.age += dt;
        !self.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resources::PlanetConfig, utils::orientation_from};
    use approx::assert_relative_eq;

    #[test]
    fn test_center_sits_above_base() {
        let planet = Planet::new(&PlanetConfig::default());
        let up = Vec3::Z;
        let gate = Gate::new(up * 20.0, orientation_from(Vec3::X, up), 9.0, 10.0);

        let center = gate.center(&planet);
        assert_relative_eq!(center.z, 29.0, epsilon = 1e-4);

        let pose = gate.pose(&planet);
        assert_relative_eq!(pose.forward.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(pose.right.dot(pose.forward), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_gate_follows_planet_rotation() {
        let mut planet = Planet::new(&PlanetConfig::default());
        let up = Vec3::Z;
        let gate = Gate::new(up * 20.0, orientation_from(Vec3::X, up), 0.0, 10.0);

        planet.rotate(Vec3::X, std::f32::consts::FRAC_PI_2);
        let world = gate.world_position(&planet);
        assert_relative_eq!(world.y, -20.0, epsilon = 1e-4);
        assert_relative_eq!(gate.pose(&planet).up.y, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_lifetime_expires() {
        let mut gate = Gate::new(Vec3::Z, Quat::IDENTITY, 0.0, 0.1);
        assert!(!gate.tick_lifetime(0.05));
        assert!(gate.tick_lifetime(0.05));
        assert!(!gate.is_alive());
    }
}
