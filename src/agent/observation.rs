use bevy::prelude::warn;
use serde::{Deserialize, Serialize};

use crate::{
    agent::{GateSighting, TrainingStage},
    components::Bird,
    utils::{
        clamp_unit, MAX_ARC_LOOKAHEAD_DEG, OBS_ALONG_SCALE, OBS_ALTITUDE_SCALE,
        OBS_DELTA_ALONG_SCALE, OBS_LATERAL_SCALE, OBS_RADIAL_SCALE, OBS_VELOCITY_SCALE,
    },
};

/// Bird slots plus target-gate slots.
pub const BASE_OBSERVATION_WIDTH: usize = 9;
/// Slots per lookahead gate: along, lateral, radial.
pub const LOOKAHEAD_SLOT_WIDTH: usize = 3;
/// Upper bound on `lookahead_gates` accepted by configuration.
pub const MAX_LOOKAHEAD_GATES: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObservationConfig {
    /// Extra gates appended from the lookahead query.
    pub lookahead_gates: usize,
    /// Arc window of the lookahead query (deg).
    pub max_arc_lookahead_deg: f32,
    /// Altitude that maps to 1.0.
    pub altitude_scale: f32,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            lookahead_gates: 0,
            max_arc_lookahead_deg: MAX_ARC_LOOKAHEAD_DEG,
            altitude_scale: OBS_ALTITUDE_SCALE,
        }
    }
}

impl ObservationConfig {
    pub fn width(&self) -> usize {
        LOOKAHEAD_SLOT_WIDTH
            .saturating_mul(self.lookahead_gates)
            .saturating_add(BASE_OBSERVATION_WIDTH)
    }
}

/// Builds the fixed-width observation vector.
///
/// Gate slots are zero-filled in `Survival` and when no target exists.
/// `prev_observed_along` carries the finite-difference state between calls; it is only
/// touched when a target is observed.
pub fn encode_observation(
    config: &ObservationConfig,
    stage: TrainingStage,
    bird: &Bird,
    target: Option<&GateSighting>,
    lookahead: &[GateSighting],
    prev_observed_along: &mut Option<f32>,
) -> Vec<f32> {
    let mut obs = Vec::with_capacity(config.width());

    let altitude = bird.altitude();
    let scale = config.altitude_scale;
    obs.push(altitude / scale);
    obs.push(clamp_unit(bird.radial_velocity() / OBS_VELOCITY_SCALE));
    obs.push((scale - altitude) / scale);

    match target.filter(|_| stage.uses_gates()) {
        Some(gate) => {
            let delta_along = prev_observed_along.map_or(0.0, |prev| gate.along - prev);
            *prev_observed_along = Some(gate.along);

            let lateral_alignment = (-gate.lateral.abs() / 5.0).exp();
            let height_alignment = (-gate.radial.abs() / 2.0).exp();

            obs.extend([
                clamp_unit(gate.along / OBS_ALONG_SCALE),
                clamp_unit(gate.lateral / OBS_LATERAL_SCALE),
                clamp_unit(gate.radial / OBS_RADIAL_SCALE),
                clamp_unit(delta_along / OBS_DELTA_ALONG_SCALE),
                // Gates have no radial motion, so relative velocity is the bird's own.
                clamp_unit(bird.radial_velocity() / OBS_VELOCITY_SCALE),
                (lateral_alignment + height_alignment) / 2.0,
            ]);
        }
        None => obs.extend([0.0; 6]),
    }

    for slot in 0..config.lookahead_gates {
        match lookahead.get(slot).filter(|_| stage.uses_gates()) {
            Some(gate) => obs.extend([
                clamp_unit(gate.along / OBS_ALONG_SCALE),
                clamp_unit(gate.lateral / OBS_LATERAL_SCALE),
                clamp_unit(gate.radial / OBS_RADIAL_SCALE),
            ]),
            None => obs.extend([0.0; LOOKAHEAD_SLOT_WIDTH]),
        }
    }

    for (index, value) in obs.iter_mut().enumerate() {
        if !value.is_finite() {
            warn!("Non-finite observation slot {} ({}); zeroing", index, value);
            *value = 0.0;
        }
    }

    obs
}
