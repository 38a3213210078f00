use bevy::math::{Quat, Vec3};
use bevy::prelude::debug;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    components::{Bird, Gate, GateConfig, TangentFrame},
    resources::{GateId, GateRegistry, Planet},
    utils::{
        orientation_from, project_on_plane, try_direction, AHEAD_ANGLE_DEG, GATE_ALTITUDE_OFFSET,
        MAX_SIDE_ANGLE_DEG, MIN_SIDE_ANGLE_DEG, SPAWN_INTERVAL,
    },
};

/// Placement and timing of procedurally spawned gates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpawnerConfig {
    pub enabled: bool,
    /// Seconds between bursts.
    pub interval: f32,
    /// Gates spawned per burst.
    pub burst: u32,
    /// Spawn a gate as soon as the spawner is enabled at episode begin.
    pub prime_on_enable: bool,
    /// Arc ahead of the bird at which gates appear (deg).
    pub ahead_angle_deg: f32,
    /// Range of the random sideways offset magnitude (deg).
    pub min_side_angle_deg: f32,
    pub max_side_angle_deg: f32,
    /// Radial offset of the gate base relative to the planet surface.
    pub altitude_offset: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: SPAWN_INTERVAL,
            burst: 1,
            prime_on_enable: false,
            ahead_angle_deg: AHEAD_ANGLE_DEG,
            min_side_angle_deg: MIN_SIDE_ANGLE_DEG,
            max_side_angle_deg: MAX_SIDE_ANGLE_DEG,
            altitude_offset: GATE_ALTITUDE_OFFSET,
        }
    }
}

/// Timer-driven gate factory.
///
/// The enablement and interval are owned by the spawner rather than read from the config
/// each tick so the curriculum can reconfigure them between episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSpawner {
    pub enabled: bool,
    pub interval: f32,
    timer: f32,
}

impl GateSpawner {
    pub fn new(config: &SpawnerConfig) -> Self {
        Self {
            enabled: config.enabled,
            interval: config.interval,
            timer: 0.0,
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Applies a curriculum setting. The running timer is kept.
    pub fn configure(&mut self, enabled: bool, interval: f32) {
        self.enabled = enabled;
        self.interval = interval;
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    /// Accumulates time and spawns a burst once the interval elapses.
    #[allow(clippy::too_many_arguments)]
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        config: &SpawnerConfig,
        gate_config: &GateConfig,
        planet: &Planet,
        bird: &Bird,
        spin_axis: Vec3,
        registry: &mut GateRegistry,
        rng: &mut R,
        dt: f32,
    ) -> Vec<GateId> {
        if !self.enabled {
            return Vec::new();
        }

        self.timer += dt;
        if self.timer < self.interval {
            return Vec::new();
        }
        self.timer = 0.0;

        (0..config.burst)
            .map(|_| spawn_gate(config, gate_config, planet, bird, spin_axis, registry, rng))
            .collect()
    }
}

/// Places one gate ahead of the bird with a random sideways offset and gap band.
pub fn spawn_gate<R: Rng + ?Sized>(
    config: &SpawnerConfig,
    gate_config: &GateConfig,
    planet: &Planet,
    bird: &Bird,
    spin_axis: Vec3,
    registry: &mut GateRegistry,
    rng: &mut R,
) -> GateId {
    let frame = TangentFrame::compute(bird.position, planet.center, spin_axis, bird.forward());

    // Rotating the normal about `right` tips it toward `forward`.
    let ahead = Quat::from_axis_angle(frame.right, config.ahead_angle_deg.to_radians()) * frame.normal;

    let magnitude = rng.gen_range(config.min_side_angle_deg..=config.max_side_angle_deg);
    let side = if rng.gen_bool(0.5) { magnitude } else { -magnitude };
    let direction = (Quat::from_axis_angle(frame.normal, side.to_radians()) * ahead).normalize();

    let base = planet.center + direction * (planet.radius + config.altitude_offset);
    let center_height = gate_config
        .gap_center_heights
        .choose(rng)
        .copied()
        .unwrap_or_default();

    let id = insert_gate(planet, bird, spin_axis, registry, gate_config, base, direction, center_height);
    debug!(
        "Spawned {} at side angle {:.1} deg, gap height {:.1}",
        id, side, center_height
    );
    id
}

/// Registers a gate with its base at `base` and up along `up`, facing the bird.
#[allow(clippy::too_many_arguments)]
pub(crate) fn insert_gate(
    planet: &Planet,
    bird: &Bird,
    spin_axis: Vec3,
    registry: &mut GateRegistry,
    gate_config: &GateConfig,
    base: Vec3,
    up: Vec3,
    center_height: f32,
) -> GateId {
    let facing = try_direction(project_on_plane(bird.position - base, up))
        .or_else(|| try_direction(spin_axis.cross(up)))
        .unwrap_or_else(|| up.any_orthonormal_vector());
    let rotation = orientation_from(facing, up);

    registry.insert(Gate::new(
        planet.to_local_point(base),
        planet.to_local_rotation(rotation),
        center_height,
        gate_config.lifetime,
    ))
}
