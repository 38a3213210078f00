use serde::{Deserialize, Serialize};

use crate::agent::{GateSighting, TrainingStage};

/// Shaping variant used in the `FullGame` stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FullGameShaping {
    /// Same gate terms as `SimplePipes`.
    #[default]
    GateAlignment,
    /// Stronger progress and height terms, proximity-weighted lateral term and a bonus for
    /// crossing the targeted gate.
    Crossing,
}

/// Weights of every shaping term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RewardConfig {
    // Survival
    pub target_altitude_fraction: f32,
    pub altitude_weight: f32,
    pub altitude_tolerance: f32,
    pub ceiling_danger_distance: f32,
    pub ceiling_penalty: f32,
    pub velocity_weight: f32,
    pub velocity_tolerance: f32,
    pub glide_bonus: f32,
    pub free_flap_streak: u32,
    pub flap_streak_penalty: f32,

    // Stage mixing
    pub simple_pipes_survival_scale: f32,
    pub full_game_survival_scale: f32,
    pub full_game_shaping: FullGameShaping,

    // Gate alignment
    pub progress_weight: f32,
    pub lateral_weight: f32,
    pub gate_altitude_weight: f32,
    pub gate_altitude_tolerance: f32,

    // Crossing variant
    pub crossing_progress_weight: f32,
    pub crossing_lateral_weight: f32,
    pub crossing_altitude_weight: f32,
    pub crossing_altitude_tolerance: f32,
    pub crossing_bonus: f32,

    // Events
    pub score_reward: f32,
    pub death_penalty: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            target_altitude_fraction: 0.25,
            altitude_weight: 0.02,
            altitude_tolerance: 1.5,
            ceiling_danger_distance: 4.0,
            ceiling_penalty: 0.1,
            velocity_weight: 0.01,
            velocity_tolerance: 1.5,
            glide_bonus: 0.002,
            free_flap_streak: 2,
            flap_streak_penalty: 0.005,

            simple_pipes_survival_scale: 0.1,
            full_game_survival_scale: 0.2,
            full_game_shaping: FullGameShaping::GateAlignment,

            progress_weight: 0.002,
            lateral_weight: 0.001,
            gate_altitude_weight: 0.01,
            gate_altitude_tolerance: 2.0,

            crossing_progress_weight: 0.005,
            crossing_lateral_weight: 0.001,
            crossing_altitude_weight: 0.02,
            crossing_altitude_tolerance: 1.5,
            crossing_bonus: 0.1,

            score_reward: 3.0,
            death_penalty: -1.0,
        }
    }
}

/// Bird state needed by the survival terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSample {
    pub altitude: f32,
    pub radial_velocity: f32,
    pub max_altitude: f32,
    pub flapped: bool,
    pub consecutive_flaps: u32,
}

/// Rewards hovering near the target altitude smoothly and without flap spam.
pub fn survival_reward(config: &RewardConfig, sample: &FlightSample) -> f32 {
    let mut reward = 0.0;

    let target = sample.max_altitude * config.target_altitude_fraction;
    let altitude_error = (sample.altitude - target).abs();
    reward += (-altitude_error / config.altitude_tolerance).exp() * config.altitude_weight;

    let ceiling_distance = sample.max_altitude - sample.altitude;
    if ceiling_distance < config.ceiling_danger_distance {
        reward -= (config.ceiling_danger_distance - ceiling_distance) / config.ceiling_danger_distance
            * config.ceiling_penalty;
    }

    reward += (-sample.radial_velocity.abs() / config.velocity_tolerance).exp() * config.velocity_weight;

    if !sample.flapped {
        reward += config.glide_bonus;
    }

    if sample.consecutive_flaps > config.free_flap_streak {
        reward -= config.flap_streak_penalty * (sample.consecutive_flaps - config.free_flap_streak) as f32;
    }

    reward
}

/// Progress toward the target plus lateral and height alignment.
///
/// Zero without a target, in which case `prev_along` is left untouched.
pub fn gate_alignment_reward(
    config: &RewardConfig,
    target: Option<&GateSighting>,
    prev_along: &mut Option<f32>,
) -> f32 {
    let Some(gate) = target else {
        return 0.0;
    };

    let progress = (prev_along.unwrap_or(gate.along) - gate.along).clamp(-1.0, 1.0);
    *prev_along = Some(gate.along);

    config.progress_weight * progress
        + config.lateral_weight * (-gate.lateral.abs()).exp()
        + config.gate_altitude_weight * (-gate.radial.abs() / config.gate_altitude_tolerance).exp()
}

/// Crossing variant of the gate shaping.
///
/// `crossed_previous` reports whether the gate targeted on the previous step now lies at
/// or behind the bird. The bonus is paid even when no new target is visible yet.
pub fn crossing_reward(
    config: &RewardConfig,
    target: Option<&GateSighting>,
    crossed_previous: bool,
    prev_along: &mut Option<f32>,
) -> f32 {
    let mut reward = if crossed_previous {
        config.crossing_bonus
    } else {
        0.0
    };

    let Some(gate) = target else {
        return reward;
    };

    let progress = (prev_along.unwrap_or(gate.along) - gate.along).clamp(-1.0, 1.0);
    *prev_along = Some(gate.along);
    reward += config.crossing_progress_weight * progress;

    let closeness = (1.0 / (1.0 + gate.along.abs())).clamp(0.0, 1.0);
    reward += closeness * (-gate.lateral.abs()).exp() * config.crossing_lateral_weight;

    reward += config.crossing_altitude_weight
        * (-gate.radial.abs() / config.crossing_altitude_tolerance).exp();

    reward
}

/// Per-step shaping state threaded through [`stage_reward`].
#[derive(Debug)]
pub struct ShapingInput<'a> {
    pub sample: FlightSample,
    pub target: Option<&'a GateSighting>,
    pub crossed_previous: bool,
}

/// Combines the terms active in `stage`.
pub fn stage_reward(
    config: &RewardConfig,
    stage: TrainingStage,
    input: &ShapingInput<'_>,
    prev_along: &mut Option<f32>,
) -> f32 {
    let survival = survival_reward(config, &input.sample);
    match stage {
        TrainingStage::Survival => survival,
        TrainingStage::SimplePipes => {
            survival * config.simple_pipes_survival_scale
                + gate_alignment_reward(config, input.target, prev_along)
        }
        TrainingStage::FullGame => {
            let gates = match config.full_game_shaping {
                FullGameShaping::GateAlignment => {
                    gate_alignment_reward(config, input.target, prev_along)
                }
                FullGameShaping::Crossing => {
                    crossing_reward(config, input.target, input.crossed_previous, prev_along)
                }
            };
            survival * config.full_game_survival_scale + gates
        }
    }
}
