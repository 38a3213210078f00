use bevy::prelude::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fs, path::Path};
use thiserror::Error;

use crate::{
    agent::{CurriculumConfig, ObservationConfig, RewardConfig, MAX_LOOKAHEAD_GATES},
    components::{BirdConfig, GateConfig},
    resources::PlanetConfig,
    systems::{SpawnerConfig, SpinnerConfig},
    utils::{DEFAULT_TIME_STEP, GATE_LIFETIME, PLANET_RADIUS, SPAWN_INTERVAL},
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Whether an external trainer is driving the environment.
///
/// Presentation notifications (game-over screen, animation clips) are only sent in
/// `Interactive` mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationMode {
    #[default]
    Training,
    Interactive,
}

/// Who supplies the actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    #[default]
    Agent,
    Human,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// Episodes reaching this many steps end truncated.
    pub max_episode_steps: Option<u32>,
}

/// Complete environment configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnvConfig {
    // Master seed
    pub seed: u64,
    // Fixed tick length (s)
    pub time_step: f32,

    pub mode: SimulationMode,
    pub control: ControlMode,

    pub planet: PlanetConfig,
    pub bird: BirdConfig,
    pub spinner: SpinnerConfig,
    pub spawner: SpawnerConfig,
    pub gate: GateConfig,

    pub curriculum: CurriculumConfig,
    pub observation: ObservationConfig,
    pub reward: RewardConfig,
    pub agent: AgentConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            time_step: DEFAULT_TIME_STEP,
            mode: SimulationMode::default(),
            control: ControlMode::default(),
            planet: PlanetConfig::default(),
            bird: BirdConfig::default(),
            spinner: SpinnerConfig::default(),
            spawner: SpawnerConfig::default(),
            gate: GateConfig::default(),
            curriculum: CurriculumConfig::default(),
            observation: ObservationConfig::default(),
            reward: RewardConfig::default(),
            agent: AgentConfig::default(),
        }
    }
}

impl EnvConfig {
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_value(value.clone())?;
        Ok(config.sanitized())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config.sanitized())
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loading config from {}", path.display());
        Self::from_yaml_str(&contents)
    }

    pub fn rebuild_with_seed(&self, seed: u64) -> Self {
        info!("Rebuilding config with seed: {}", seed);
        Self {
            seed,
            ..self.clone()
        }
    }

    pub fn is_training(&self) -> bool {
        self.mode == SimulationMode::Training
    }

    fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }

    /// Clamps invalid values into their valid ranges, logging each correction.
    ///
    /// Returns the names of the corrected fields.
    pub fn sanitize(&mut self) -> Vec<&'static str> {
        let mut fixes = Sanitizer::default();

        fixes.positive("time_step", &mut self.time_step, DEFAULT_TIME_STEP);

        fixes.positive("planet.radius", &mut self.planet.radius, PLANET_RADIUS);
        if !self.planet.center.is_finite() {
            fixes.record("planet.center", self.planet.center);
            self.planet.center = Default::default();
        }

        let bird = &mut self.bird;
        fixes.at_least("bird.ground_clearance", &mut bird.ground_clearance, 0.0);
        fixes.at_least("bird.side_speed_deg", &mut bird.side_speed_deg, 0.0);
        fixes.at_least("bird.jump_height", &mut bird.jump_height, 0.0);
        fixes.magnitude("bird.gravity", &mut bird.gravity);
        fixes.at_least("bird.radial_damping", &mut bird.radial_damping, 0.0);
        fixes.at_least("bird.max_altitude", &mut bird.max_altitude, 0.0);
        fixes.at_least("bird.ceiling_grace", &mut bird.ceiling_grace, 0.0);
        fixes.at_least("bird.collision_radius", &mut bird.collision_radius, 0.0);
        if bird.start_direction.try_normalize().is_none() {
            fixes.record("bird.start_direction", bird.start_direction);
            bird.start_direction = BirdConfig::default().start_direction;
        }

        if !self.spinner.angular_speed_deg.is_finite() {
            fixes.record("spinner.angular_speed_deg", self.spinner.angular_speed_deg);
            self.spinner.angular_speed_deg = SpinnerConfig::default().angular_speed_deg;
        }

        let spawner = &mut self.spawner;
        fixes.positive("spawner.interval", &mut spawner.interval, SPAWN_INTERVAL);
        fixes.magnitude("spawner.min_side_angle_deg", &mut spawner.min_side_angle_deg);
        fixes.magnitude("spawner.max_side_angle_deg", &mut spawner.max_side_angle_deg);
        if spawner.min_side_angle_deg > spawner.max_side_angle_deg {
            fixes.record("spawner.side_angle_range", spawner.min_side_angle_deg);
            std::mem::swap(&mut spawner.min_side_angle_deg, &mut spawner.max_side_angle_deg);
        }
        if !spawner.ahead_angle_deg.is_finite() {
            fixes.record("spawner.ahead_angle_deg", spawner.ahead_angle_deg);
            spawner.ahead_angle_deg = SpawnerConfig::default().ahead_angle_deg;
        }
        if !spawner.altitude_offset.is_finite() {
            fixes.record("spawner.altitude_offset", spawner.altitude_offset);
            spawner.altitude_offset = SpawnerConfig::default().altitude_offset;
        }

        let gate = &mut self.gate;
        fixes.positive("gate.lifetime", &mut gate.lifetime, GATE_LIFETIME);
        fixes.at_least("gate.gap_half_height", &mut gate.gap_half_height, 0.0);
        fixes.at_least("gate.half_width", &mut gate.half_width, 0.0);
        fixes.at_least("gate.half_thickness", &mut gate.half_thickness, 0.0);
        let before = gate.gap_center_heights.len();
        gate.gap_center_heights.retain(|h| h.is_finite());
        if gate.gap_center_heights.is_empty() {
            fixes.record("gate.gap_center_heights", before);
            gate.gap_center_heights = GateConfig::default().gap_center_heights;
        }

        let curriculum = &mut self.curriculum;
        fixes.positive(
            "curriculum.simple_pipes_interval",
            &mut curriculum.simple_pipes_interval,
            CurriculumConfig::default().simple_pipes_interval,
        );
        fixes.positive(
            "curriculum.full_game_interval",
            &mut curriculum.full_game_interval,
            CurriculumConfig::default().full_game_interval,
        );

        let observation = &mut self.observation;
        fixes.positive(
            "observation.altitude_scale",
            &mut observation.altitude_scale,
            ObservationConfig::default().altitude_scale,
        );
        if observation.lookahead_gates > MAX_LOOKAHEAD_GATES {
            fixes.record("observation.lookahead_gates", observation.lookahead_gates);
            observation.lookahead_gates = MAX_LOOKAHEAD_GATES;
        }
        if !(0.0..=180.0).contains(&observation.max_arc_lookahead_deg) {
            fixes.record(
                "observation.max_arc_lookahead_deg",
                observation.max_arc_lookahead_deg,
            );
            observation.max_arc_lookahead_deg = if observation.max_arc_lookahead_deg > 180.0 {
                180.0
            } else {
                0.0
            };
        }

        let reward = &mut self.reward;
        fixes.positive("reward.altitude_tolerance", &mut reward.altitude_tolerance, 1.5);
        fixes.positive("reward.velocity_tolerance", &mut reward.velocity_tolerance, 1.5);
        fixes.positive(
            "reward.gate_altitude_tolerance",
            &mut reward.gate_altitude_tolerance,
            2.0,
        );
        fixes.positive(
            "reward.crossing_altitude_tolerance",
            &mut reward.crossing_altitude_tolerance,
            1.5,
        );
        fixes.positive(
            "reward.ceiling_danger_distance",
            &mut reward.ceiling_danger_distance,
            4.0,
        );

        fixes.fields
    }
}

#[derive(Default)]
struct Sanitizer {
    fields: Vec<&'static str>,
}

impl Sanitizer {
    fn record<T: std::fmt::Debug>(&mut self, name: &'static str, value: T) {
        warn!("Invalid config value {} = {:?}; clamping", name, value);
        self.fields.push(name);
    }

    fn at_least(&mut self, name: &'static str, value: &mut f32, min: f32) {
        if !value.is_finite() || *value < min {
            self.record(name, *value);
            *value = min;
        }
    }

    fn positive(&mut self, name: &'static str, value: &mut f32, fallback: f32) {
        if !value.is_finite() || *value <= 0.0 {
            self.record(name, *value);
            *value = fallback;
        }
    }

    fn magnitude(&mut self, name: &'static str, value: &mut f32) {
        if !value.is_finite() {
            self.record(name, *value);
            *value = 0.0;
        } else if *value < 0.0 {
            self.record(name, *value);
            *value = value.abs();
        }
    }
}
